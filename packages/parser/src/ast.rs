use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute set of a block: name → JSON value.
///
/// Attributes carry all semantic state of a block and are the only input
/// needed to reconstruct it. Recovery never edits attribute values.
pub type AttributeMap = serde_json::Map<String, serde_json::Value>;

/// Host-assigned opaque identity of a block in the live document.
///
/// Stable for the lifetime of the node; used as the target of
/// replace-by-identity calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of an externally stored shared fragment.
///
/// This is the persisted-entity id, not a live-document id: multiple
/// blocks in a document may point at the same fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FragmentRef(pub u64);

impl fmt::Display for FragmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node of the block tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Stable block-kind identifier (`namespace/kind`).
    pub type_name: String,

    /// Host-assigned identity of this node.
    pub identity: BlockId,

    /// Semantic state; fully determines canonical markup together with
    /// `children`.
    pub attributes: AttributeMap,

    /// Nested blocks, in document order.
    pub children: Vec<BlockRecord>,

    /// The block's own serialized body as last written, children excluded.
    /// Validity compares this snapshot against the type's current
    /// canonical render.
    pub markup: String,

    /// Set only on records produced during a recovery pass, never on
    /// records read from storage.
    #[serde(skip)]
    pub was_recovered: bool,

    /// Identity of the record this one replaces, if any.
    #[serde(skip)]
    pub supersedes: Option<BlockId>,
}

impl BlockRecord {
    pub fn new(
        type_name: impl Into<String>,
        identity: BlockId,
        attributes: AttributeMap,
        markup: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            identity,
            attributes,
            children: Vec::new(),
            markup: markup.into(),
            was_recovered: false,
            supersedes: None,
        }
    }

    pub fn with_children(mut self, children: Vec<BlockRecord>) -> Self {
        self.children = children;
        self
    }

    /// Drop the transient recovery fields from this subtree.
    ///
    /// Transient fields live only for the duration of a recovery pass;
    /// a record handed back to the host for storage must not carry them,
    /// or the next pass would mistake it for freshly recovered.
    pub fn clear_recovery_flags(&mut self) {
        self.was_recovered = false;
        self.supersedes = None;
        for child in &mut self.children {
            child.clear_recovery_flags();
        }
    }

    /// Find a record by identity in this subtree.
    pub fn find(&self, identity: &BlockId) -> Option<&BlockRecord> {
        if &self.identity == identity {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(identity))
    }

    /// Structural equivalence: same types, attributes, markup and child
    /// structure, identities and transient recovery fields aside.
    pub fn structural_eq(&self, other: &BlockRecord) -> bool {
        self.type_name == other.type_name
            && self.attributes == other.attributes
            && self.markup == other.markup
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.structural_eq(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(type_name: &str, id: &str) -> BlockRecord {
        BlockRecord::new(type_name, BlockId::new(id), AttributeMap::new(), "")
    }

    #[test]
    fn test_find_descends_into_children() {
        let tree = record("demo/outer", "a-1").with_children(vec![record("demo/inner", "a-2")
            .with_children(vec![record("demo/leaf", "a-3")])]);

        assert!(tree.find(&BlockId::new("a-3")).is_some());
        assert!(tree.find(&BlockId::new("a-9")).is_none());
    }

    #[test]
    fn test_structural_eq_ignores_identity() {
        let left = record("demo/card", "a-1");
        let right = record("demo/card", "b-7");
        assert!(left.structural_eq(&right));

        let other_kind = record("demo/button", "b-7");
        assert!(!left.structural_eq(&other_kind));
    }

    #[test]
    fn test_transient_fields_are_not_serialized() {
        let mut rec = record("demo/card", "a-1");
        rec.was_recovered = true;
        rec.supersedes = Some(BlockId::new("a-0"));

        let json = serde_json::to_string(&rec).unwrap();
        let back: BlockRecord = serde_json::from_str(&json).unwrap();

        assert!(!back.was_recovered);
        assert!(back.supersedes.is_none());
    }
}
