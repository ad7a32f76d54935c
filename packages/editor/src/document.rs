//! Live document store: the ordered tree of blocks the user is editing.

use crate::errors::HostError;
use mason_parser::{BlockId, BlockRecord};

/// Owner of the live block tree.
#[derive(Debug, Default)]
pub struct DocumentStore {
    roots: Vec<BlockRecord>,
}

impl DocumentStore {
    pub fn new(roots: Vec<BlockRecord>) -> Self {
        Self { roots }
    }

    /// Snapshot of the live tree.
    pub fn blocks(&self) -> Vec<BlockRecord> {
        self.roots.clone()
    }

    pub fn find(&self, identity: &BlockId) -> Option<&BlockRecord> {
        self.roots.iter().find_map(|root| root.find(identity))
    }

    /// Replace one block by identity, anywhere in the tree.
    pub fn replace(
        &mut self,
        identity: &BlockId,
        replacement: BlockRecord,
    ) -> Result<(), HostError> {
        let mut replacement = Some(replacement);
        if Self::try_replace(&mut self.roots, identity, &mut replacement) {
            Ok(())
        } else {
            Err(HostError::BlockNotFound(identity.clone()))
        }
    }

    fn try_replace(
        records: &mut [BlockRecord],
        identity: &BlockId,
        replacement: &mut Option<BlockRecord>,
    ) -> bool {
        for record in records {
            if &record.identity == identity {
                if let Some(replacement) = replacement.take() {
                    *record = replacement;
                }
                return true;
            }
            if Self::try_replace(&mut record.children, identity, replacement) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mason_parser::AttributeMap;

    fn record(type_name: &str, id: &str) -> BlockRecord {
        BlockRecord::new(type_name, BlockId::new(id), AttributeMap::new(), "")
    }

    #[test]
    fn test_replace_top_level_block() {
        let mut store = DocumentStore::new(vec![record("demo/a", "x-1"), record("demo/b", "x-2")]);

        store
            .replace(&BlockId::new("x-2"), record("demo/c", "x-9"))
            .unwrap();

        let blocks = store.blocks();
        assert_eq!(blocks[1].type_name, "demo/c");
        assert_eq!(blocks[0].type_name, "demo/a");
    }

    #[test]
    fn test_replace_nested_block() {
        let tree = record("demo/outer", "x-1")
            .with_children(vec![record("demo/inner", "x-2")]);
        let mut store = DocumentStore::new(vec![tree]);

        store
            .replace(&BlockId::new("x-2"), record("demo/fixed", "x-9"))
            .unwrap();

        assert!(store.find(&BlockId::new("x-9")).is_some());
        assert!(store.find(&BlockId::new("x-2")).is_none());
    }

    #[test]
    fn test_replace_missing_block_is_an_error() {
        let mut store = DocumentStore::new(vec![record("demo/a", "x-1")]);

        let result = store.replace(&BlockId::new("x-404"), record("demo/b", "x-9"));
        assert_eq!(result, Err(HostError::BlockNotFound(BlockId::new("x-404"))));
    }
}
