//! Block-type registry: the host's knowledge of what each block kind
//! renders.

use crate::errors::HostError;
use mason_parser::{AttributeMap, BlockRecord};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Canonical renderer of a block kind: attributes (and children) to the
/// block's own markup.
pub type RenderFn = Arc<dyn Fn(&AttributeMap, &[BlockRecord]) -> String + Send + Sync>;

/// A registered block kind.
#[derive(Clone)]
pub struct BlockType {
    pub name: String,
    render: RenderFn,
}

impl BlockType {
    pub fn new(
        name: impl Into<String>,
        render: impl Fn(&AttributeMap, &[BlockRecord]) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            render: Arc::new(render),
        }
    }

    pub fn render(&self, attributes: &AttributeMap, children: &[BlockRecord]) -> String {
        (self.render)(attributes, children)
    }
}

impl fmt::Debug for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockType").field("name", &self.name).finish()
    }
}

/// Registry of block kinds, keyed by stable type name.
#[derive(Debug, Default)]
pub struct BlockTypeRegistry {
    types: HashMap<String, BlockType>,
}

impl BlockTypeRegistry {
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Register a block kind. Registering a name that already exists
    /// replaces its renderer. That is how a markup-convention change
    /// lands: snapshots written under the old renderer stop matching.
    pub fn register(&mut self, block_type: BlockType) {
        self.types.insert(block_type.name.clone(), block_type);
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// The markup a block of this type would render today.
    pub fn canonical_markup(
        &self,
        type_name: &str,
        attributes: &AttributeMap,
        children: &[BlockRecord],
    ) -> Result<String, HostError> {
        let block_type = self
            .types
            .get(type_name)
            .ok_or_else(|| HostError::UnknownType(type_name.to_string()))?;
        Ok(block_type.render(attributes, children))
    }
}
