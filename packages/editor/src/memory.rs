//! # In-Memory Reference Host
//!
//! A complete `EditorHost` over in-process state: block-type registry,
//! live document store, shared-fragment store, and the invalid-warning
//! overlay. Used by the recovery engine's tests and by embedders that do
//! not bring their own editor.
//!
//! Validity contract: a record is invalid iff its type is registered and
//! its markup snapshot differs from the type's current canonical render
//! of its attributes. Unregistered types are never classified invalid:
//! they cannot be re-rendered, so there is nothing to repair them with.

use crate::document::DocumentStore;
use crate::errors::HostError;
use crate::fragments::FragmentStore;
use crate::host::{EditorHost, FragmentContent};
use crate::registry::{BlockType, BlockTypeRegistry};
use mason_parser::{
    parse, serialize, AttributeMap, BlockId, BlockRecord, FragmentRef, IDGenerator,
};
use std::sync::{Mutex, MutexGuard};

/// Type name of shared-fragment pointer blocks.
pub const FRAGMENT_TYPE: &str = "core/fragment";

/// Attribute carrying the fragment identity on a pointer block.
pub const FRAGMENT_REF_ATTRIBUTE: &str = "ref";

/// Marker id of the overlay that hides invalid-block warnings during a
/// recovery pass. Fixed, so at most one overlay exists at a time.
pub const WARNING_OVERLAY_MARKER: &str = "mason-hide-invalid-warnings";

#[derive(Debug)]
struct HostState {
    registry: BlockTypeRegistry,
    document: DocumentStore,
    fragments: FragmentStore,
    ids: IDGenerator,
    /// Installed overlay style elements, by marker id.
    overlays: Vec<String>,
}

/// In-memory editor host.
#[derive(Debug)]
pub struct MemoryHost {
    state: Mutex<HostState>,
}

impl MemoryHost {
    pub fn new(document_path: &str) -> Self {
        let mut registry = BlockTypeRegistry::new();
        // Pointer blocks carry no markup of their own; their content
        // lives in the fragment store.
        registry.register(BlockType::new(FRAGMENT_TYPE, |_, _| String::new()));

        Self {
            state: Mutex::new(HostState {
                registry,
                document: DocumentStore::default(),
                fragments: FragmentStore::new(),
                ids: IDGenerator::new(document_path),
                overlays: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().expect("editor host state poisoned")
    }

    pub fn register_type(&self, block_type: BlockType) {
        self.state().registry.register(block_type);
    }

    /// Load the live document from markup.
    pub fn set_document(&self, markup: &str) -> Result<(), HostError> {
        let mut state = self.state();
        let roots = parse(markup, &mut state.ids)?;
        state.document = DocumentStore::new(roots);
        Ok(())
    }

    pub fn insert_fragment(&self, fragment: FragmentRef, content: &str) {
        self.state().fragments.insert(fragment, content);
    }

    pub fn insert_fragment_fetching(&self, fragment: FragmentRef) {
        self.state().fragments.insert_fetching(fragment);
    }

    pub fn finish_fragment_fetch(&self, fragment: FragmentRef, content: &str) {
        self.state().fragments.finish_fetch(fragment, content);
    }

    /// Snapshot of one live block, by identity.
    pub fn block(&self, identity: &BlockId) -> Option<BlockRecord> {
        self.state().document.find(identity).cloned()
    }

    pub fn warnings_suppressed(&self) -> bool {
        self.state()
            .overlays
            .iter()
            .any(|marker| marker == WARNING_OVERLAY_MARKER)
    }

    pub fn fragment_is_persisted(&self, fragment: FragmentRef) -> bool {
        self.state().fragments.is_persisted(fragment)
    }

    pub fn fragment_persist_calls(&self, fragment: FragmentRef) -> u32 {
        self.state().fragments.persist_calls(fragment)
    }
}

impl EditorHost for MemoryHost {
    fn document_blocks(&self) -> Vec<BlockRecord> {
        self.state().document.blocks()
    }

    fn replace_block(
        &self,
        identity: &BlockId,
        replacement: BlockRecord,
    ) -> Result<(), HostError> {
        self.state().document.replace(identity, replacement)
    }

    fn is_block_invalid(&self, record: &BlockRecord) -> bool {
        let state = self.state();
        if !state.registry.contains(&record.type_name) {
            return false;
        }
        match state.registry.canonical_markup(
            &record.type_name,
            &record.attributes,
            &record.children,
        ) {
            Ok(canonical) => canonical != record.markup,
            Err(_) => false,
        }
    }

    fn create_block_instance(
        &self,
        type_name: &str,
        attributes: AttributeMap,
        children: Vec<BlockRecord>,
    ) -> Result<BlockRecord, HostError> {
        let mut state = self.state();
        let markup = state
            .registry
            .canonical_markup(type_name, &attributes, &children)?;
        let identity = state.ids.new_id();
        Ok(BlockRecord::new(type_name, identity, attributes, markup).with_children(children))
    }

    fn fragment_ref(&self, record: &BlockRecord) -> Option<FragmentRef> {
        if record.type_name != FRAGMENT_TYPE {
            return None;
        }
        record
            .attributes
            .get(FRAGMENT_REF_ATTRIBUTE)
            .and_then(|value| value.as_u64())
            .map(FragmentRef)
    }

    fn create_fragment_reference(&self, fragment: FragmentRef) -> Result<BlockRecord, HostError> {
        let mut attributes = AttributeMap::new();
        attributes.insert(
            FRAGMENT_REF_ATTRIBUTE.to_string(),
            serde_json::Value::from(fragment.0),
        );
        self.create_block_instance(FRAGMENT_TYPE, attributes, Vec::new())
    }

    fn is_fragment_fetching(&self, fragment: FragmentRef) -> bool {
        self.state().fragments.is_fetching(fragment)
    }

    fn fragment_content(&self, fragment: FragmentRef) -> Result<FragmentContent, HostError> {
        self.state().fragments.content(fragment)
    }

    fn parse_markup(&self, content: &str) -> Result<Vec<BlockRecord>, HostError> {
        let mut state = self.state();
        Ok(parse(content, &mut state.ids)?)
    }

    fn serialize_markup(&self, records: &[BlockRecord]) -> String {
        serialize(records)
    }

    fn update_fragment_content(
        &self,
        fragment: FragmentRef,
        content: String,
    ) -> Result<(), HostError> {
        self.state().fragments.update_content(fragment, content)
    }

    fn persist_fragment(&self, fragment: FragmentRef) -> Result<(), HostError> {
        self.state().fragments.persist(fragment)
    }

    fn suppress_invalid_warnings(&self) {
        let mut state = self.state();
        if !state
            .overlays
            .iter()
            .any(|marker| marker == WARNING_OVERLAY_MARKER)
        {
            state.overlays.push(WARNING_OVERLAY_MARKER.to_string());
        }
    }

    fn restore_invalid_warnings(&self) {
        self.state()
            .overlays
            .retain(|marker| marker != WARNING_OVERLAY_MARKER);
    }
}
