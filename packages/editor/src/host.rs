//! # Editor Host Interface
//!
//! The formal seam between the recovery engine and the editor it runs
//! inside. The engine never reaches into editor state directly; everything
//! it needs is injected through this trait, so any editor (the in-memory
//! reference host here, or a real embedding) can sit on the other side.

use crate::errors::HostError;
use mason_parser::{AttributeMap, BlockId, BlockRecord, FragmentRef};
use serde::{Deserialize, Serialize};

/// Content of an externally stored shared fragment.
///
/// Created and persisted by the host outside the recovery engine; the
/// engine only reads, rewrites and re-persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentContent {
    pub fragment: FragmentRef,
    pub content: String,
}

/// Capabilities the recovery engine requires from its editor host.
pub trait EditorHost {
    /// Snapshot read of the live document tree.
    fn document_blocks(&self) -> Vec<BlockRecord>;

    /// Replace one block by identity, searched recursively through the
    /// live tree. Atomic per call; independent identities are replaced by
    /// independent calls.
    fn replace_block(&self, identity: &BlockId, replacement: BlockRecord)
        -> Result<(), HostError>;

    /// Structural validator: does this record's markup snapshot diverge
    /// from what its type would render today?
    fn is_block_invalid(&self, record: &BlockRecord) -> bool;

    /// Instantiate a fresh, canonical block of a registered type.
    fn create_block_instance(
        &self,
        type_name: &str,
        attributes: AttributeMap,
        children: Vec<BlockRecord>,
    ) -> Result<BlockRecord, HostError>;

    /// If this record is a shared-fragment pointer, the fragment it
    /// points at.
    fn fragment_ref(&self, record: &BlockRecord) -> Option<FragmentRef>;

    /// A fresh pointer block for a fragment.
    fn create_fragment_reference(&self, fragment: FragmentRef) -> Result<BlockRecord, HostError>;

    /// Whether the host is still asynchronously loading this fragment's
    /// content. Unknown fragments are not "fetching".
    fn is_fragment_fetching(&self, fragment: FragmentRef) -> bool;

    fn fragment_content(&self, fragment: FragmentRef) -> Result<FragmentContent, HostError>;

    /// Round-trip pair: `parse_markup(serialize_markup(x))` is
    /// structurally equivalent to `x` for any serializer-produced `x`.
    fn parse_markup(&self, content: &str) -> Result<Vec<BlockRecord>, HostError>;

    fn serialize_markup(&self, records: &[BlockRecord]) -> String;

    fn update_fragment_content(
        &self,
        fragment: FragmentRef,
        content: String,
    ) -> Result<(), HostError>;

    fn persist_fragment(&self, fragment: FragmentRef) -> Result<(), HostError>;

    /// Install the transient overlay hiding invalid-block warnings.
    /// Keyed by a fixed marker, so repeated calls install at most one
    /// overlay.
    fn suppress_invalid_warnings(&self);

    /// Remove the warning overlay, if installed.
    fn restore_invalid_warnings(&self);
}
