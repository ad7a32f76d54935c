//! # Tree Recovery Walker
//!
//! Recursive repair of a block tree. The walk does not touch the live
//! document; it produces a new sequence of records based on the input,
//! children before parents. Replaced records carry `was_recovered = true`
//! and `supersedes` naming the record they stand in for; committing them
//! back to the host is the orchestrator's job, not the walker's.

use crate::tracker::FragmentTracker;
use mason_editor::{EditorHost, HostError};
use mason_parser::BlockRecord;
use tracing::{info, warn};

/// Whether a record is structurally invalid under the host's current
/// validation rules.
///
/// Delegates per record, every time: validity depends on the host's
/// current rule set and the record's current markup snapshot, so it must
/// not be cached.
pub fn is_invalid<H: EditorHost>(host: &H, record: &BlockRecord) -> bool {
    host.is_block_invalid(record)
}

/// Build a fresh, canonical instance of `record` carrying the same
/// attributes and the supplied children.
///
/// Fails with [`HostError::UnknownType`] when the record's type is not
/// registered; the caller decides how far that aborts the walk.
pub fn reconstruct<H: EditorHost>(
    host: &H,
    record: &BlockRecord,
    children: Vec<BlockRecord>,
) -> Result<BlockRecord, HostError> {
    host.create_block_instance(&record.type_name, record.attributes.clone(), children)
}

/// Walk a block sequence depth-first, repairing invalid records bottom-up.
///
/// Returns a sequence of the same length and order as the input. A parent
/// whose descendants changed is itself marked replaced even when its own
/// markup is valid: its serialized output embeds its children's markup, so
/// the swap has to propagate upward to be committed.
pub fn walk<H: EditorHost>(
    host: &H,
    records: Vec<BlockRecord>,
    tracker: &mut FragmentTracker,
) -> Vec<BlockRecord> {
    records
        .into_iter()
        .map(|record| walk_record(host, record, tracker))
        .collect()
}

fn walk_record<H: EditorHost>(
    host: &H,
    mut record: BlockRecord,
    tracker: &mut FragmentTracker,
) -> BlockRecord {
    if !record.children.is_empty() {
        let walked = walk(host, std::mem::take(&mut record.children), tracker);
        if walked.iter().any(|child| child.was_recovered) {
            record.supersedes = Some(record.identity.clone());
            record.was_recovered = true;
        }
        record.children = walked;
    }

    // Fragment pointers are tracked even when this record or one of its
    // ancestors is itself invalid; their repair is deferred to the
    // orchestrator's fragment phase.
    if let Some(fragment) = host.fragment_ref(&record) {
        tracker.register(record.identity.clone(), fragment);
    }

    if is_invalid(host, &record) {
        match reconstruct(host, &record, record.children.clone()) {
            Ok(mut rebuilt) => {
                rebuilt.supersedes = Some(record.identity.clone());
                rebuilt.was_recovered = true;
                info!(
                    type_name = %record.type_name,
                    identity = %record.identity,
                    "auto-recovered invalid block"
                );
                return rebuilt;
            }
            Err(error) => {
                // Unrecoverable for this node only; siblings continue.
                warn!(
                    type_name = %record.type_name,
                    identity = %record.identity,
                    %error,
                    "leaving invalid block in place"
                );
            }
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use mason_editor::{BlockType, MemoryHost};
    use mason_parser::{AttributeMap, BlockId, FragmentRef};
    use serde_json::json;

    fn host_with_types() -> MemoryHost {
        let host = MemoryHost::new("/walker.blk");
        host.register_type(BlockType::new("demo/card", |attrs, _| {
            let x = attrs.get("x").and_then(|v| v.as_i64()).unwrap_or(0);
            format!("<div class=\"card\" data-x=\"{}\"></div>", x)
        }));
        host.register_type(BlockType::new("demo/subtitle", |attrs, _| {
            let y = attrs.get("y").and_then(|v| v.as_i64()).unwrap_or(0);
            format!("<h3 data-y=\"{}\"></h3>", y)
        }));
        host
    }

    #[test]
    fn test_valid_tree_passes_through_unchanged() {
        let host = host_with_types();
        host.set_document(
            r#"<!-- blk:demo/card {"x":1} --><div class="card" data-x="1"></div><!-- /blk:demo/card -->"#,
        )
        .unwrap();

        let mut tracker = FragmentTracker::new();
        let walked = walk(&host, host.document_blocks(), &mut tracker);

        assert_eq!(walked.len(), 1);
        assert!(!walked[0].was_recovered);
        assert!(walked[0].supersedes.is_none());
    }

    #[test]
    fn test_idempotence_second_pass_recovers_nothing() {
        let host = host_with_types();
        host.set_document(r#"<!-- blk:demo/card {"x":1} --><div>stale</div><!-- /blk:demo/card -->"#)
            .unwrap();

        let mut tracker = FragmentTracker::new();
        let first = walk(&host, host.document_blocks(), &mut tracker);
        assert!(first[0].was_recovered);

        // Second walk over the already-repaired records.
        let cleaned: Vec<_> = first
            .into_iter()
            .map(|mut record| {
                record.clear_recovery_flags();
                record
            })
            .collect();
        let second = walk(&host, cleaned, &mut FragmentTracker::new());
        assert!(second.iter().all(|record| !record.was_recovered));
    }

    #[test]
    fn test_attribute_preservation_on_reconstruct() {
        let host = host_with_types();
        host.set_document(
            r#"<!-- blk:demo/card {"x":7,"label":"keep me"} --><div>stale</div><!-- /blk:demo/card -->"#,
        )
        .unwrap();

        let mut tracker = FragmentTracker::new();
        let walked = walk(&host, host.document_blocks(), &mut tracker);

        assert!(walked[0].was_recovered);
        assert_eq!(walked[0].attributes["x"], json!(7));
        assert_eq!(walked[0].attributes["label"], json!("keep me"));
    }

    #[test]
    fn test_child_recovery_propagates_to_valid_parent() {
        let host = host_with_types();
        host.set_document(
            r#"<!-- blk:demo/card {"x":1} --><div class="card" data-x="1"></div><!-- blk:demo/subtitle {"y":2} --><h3>stale</h3><!-- /blk:demo/subtitle --><!-- /blk:demo/card -->"#,
        )
        .unwrap();

        let original = host.document_blocks();
        let parent_identity = original[0].identity.clone();

        let mut tracker = FragmentTracker::new();
        let walked = walk(&host, original, &mut tracker);

        // Parent is marked replaced even though its own markup was valid.
        assert!(walked[0].was_recovered);
        assert_eq!(walked[0].supersedes, Some(parent_identity));
        assert!(walked[0].children[0].was_recovered);
        assert_eq!(walked[0].children[0].markup, "<h3 data-y=\"2\"></h3>");
    }

    #[test]
    fn test_reconstruct_propagates_unknown_type() {
        let host = host_with_types();
        let record = BlockRecord::new(
            "demo/unregistered",
            BlockId::new("a-1"),
            AttributeMap::new(),
            "<p></p>",
        );

        let err = reconstruct(&host, &record, Vec::new()).unwrap_err();
        assert!(matches!(err, HostError::UnknownType(_)));
    }

    #[test]
    fn test_fragment_inside_invalid_ancestor_is_still_tracked() {
        let host = host_with_types();
        host.set_document(
            r#"<!-- blk:demo/card {"x":1} --><div>stale</div><!-- blk:core/fragment {"ref":42} /--><!-- /blk:demo/card -->"#,
        )
        .unwrap();

        let mut tracker = FragmentTracker::new();
        let walked = walk(&host, host.document_blocks(), &mut tracker);

        assert!(walked[0].was_recovered);
        assert_eq!(tracker.pending(), &[FragmentRef(42)]);
    }
}
