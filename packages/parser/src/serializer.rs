use crate::ast::BlockRecord;

/// Serialize records back to block markup.
pub fn serialize(records: &[BlockRecord]) -> String {
    Serializer::new().serialize(records)
}

/// Serializer converts block records back to markup text.
///
/// The inverse of the parser for any tree it produced itself: own markup
/// is written first, then children, so `parse(serialize(x))` is
/// structurally equivalent to `x`. Markup snapshots are written verbatim,
/// which keeps a still-invalid block invalid across a round trip.
pub struct Serializer {
    out: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self { out: String::new() }
    }

    pub fn serialize(mut self, records: &[BlockRecord]) -> String {
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                self.out.push_str("\n\n");
            }
            self.serialize_record(record);
        }
        self.out
    }

    fn serialize_record(&mut self, record: &BlockRecord) {
        self.out.push_str("<!-- blk:");
        self.out.push_str(&record.type_name);

        if !record.attributes.is_empty() {
            self.out.push(' ');
            self.out
                .push_str(&serde_json::Value::Object(record.attributes.clone()).to_string());
        }

        if record.markup.is_empty() && record.children.is_empty() {
            self.out.push_str(" /-->");
            return;
        }

        self.out.push_str(" -->");
        self.out.push_str(&record.markup);
        for child in &record.children {
            self.serialize_record(child);
        }
        self.out.push_str("<!-- /blk:");
        self.out.push_str(&record.type_name);
        self.out.push_str(" -->");
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AttributeMap, BlockId};
    use crate::id_generator::IDGenerator;
    use crate::parser::parse;
    use serde_json::json;

    #[test]
    fn test_serialize_leaf_block() {
        let mut attributes = AttributeMap::new();
        attributes.insert("height".to_string(), json!(32));
        let record = BlockRecord::new("demo/spacer", BlockId::new("a-1"), attributes, "");

        assert_eq!(
            serialize(&[record]),
            r#"<!-- blk:demo/spacer {"height":32} /-->"#
        );
    }

    #[test]
    fn test_serialize_block_with_body_and_children() {
        let child = BlockRecord::new(
            "demo/subtitle",
            BlockId::new("a-2"),
            AttributeMap::new(),
            "<h3></h3>",
        );
        let parent = BlockRecord::new(
            "demo/card",
            BlockId::new("a-1"),
            AttributeMap::new(),
            "<div></div>",
        )
        .with_children(vec![child]);

        assert_eq!(
            serialize(&[parent]),
            "<!-- blk:demo/card --><div></div><!-- blk:demo/subtitle --><h3></h3><!-- /blk:demo/subtitle --><!-- /blk:demo/card -->"
        );
    }

    #[test]
    fn test_round_trip_is_structurally_equivalent() {
        let source = r#"<!-- blk:demo/card {"x":1} --><div><!-- blk:demo/subtitle {"text":"Hi"} --><h3>Hi</h3><!-- /blk:demo/subtitle --></div><!-- /blk:demo/card -->

<!-- blk:demo/spacer {"height":16} /-->"#;

        let mut ids = IDGenerator::new("/round-trip.blk");
        let first = parse(source, &mut ids).unwrap();
        let reserialized = serialize(&first);
        let second = parse(&reserialized, &mut ids).unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert!(a.structural_eq(b));
        }
    }
}
