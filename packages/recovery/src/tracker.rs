//! Shared-fragment tracker: which fragments a walk encountered, and who
//! points at them.
//!
//! One tracker lives for exactly one recovery pass: the orchestrator
//! creates it, the walker appends to it, and fragment recovery reads it
//! before it is discarded at pass end. No tracker state survives between
//! passes.

use mason_parser::{BlockId, FragmentRef};

/// Per-pass registry of shared-fragment references.
#[derive(Debug, Default)]
pub struct FragmentTracker {
    entries: Vec<(BlockId, FragmentRef)>,
    pending: Vec<FragmentRef>,
}

impl FragmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `identity` points at `fragment`. Append-only.
    pub fn register(&mut self, identity: BlockId, fragment: FragmentRef) {
        if !self.pending.contains(&fragment) {
            self.pending.push(fragment);
        }
        self.entries.push((identity, fragment));
    }

    /// Deduplicated fragments awaiting recovery, in first-seen order.
    pub fn pending(&self) -> &[FragmentRef] {
        &self.pending
    }

    /// Every block identity that points at `fragment`, in registration
    /// order.
    pub fn consumers_of(&self, fragment: FragmentRef) -> Vec<BlockId> {
        self.entries
            .iter()
            .filter(|(_, entry)| *entry == fragment)
            .map(|(identity, _)| identity.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
