//! # Mason Recovery
//!
//! Automatic repair of invalid blocks in a live document and in shared
//! fragments.
//!
//! When a block type's markup conventions change, blocks saved under the
//! old conventions stop matching what the type renders today and the
//! editor flags them invalid. A recovery pass rebuilds those blocks from
//! their last-known attributes (losslessly, since attributes fully
//! determine markup) and swaps the rebuilt records back into the host.
//!
//! ## One pass
//!
//! ```text
//! orchestrator ── walk ──► walker (classify + reconstruct, bottom-up)
//!      │                      │
//!      │                      └──► fragment tracker (pointers seen)
//!      ├── commit main-tree replacements
//!      ├── readiness gate (bounded poll over tracked fragments)
//!      └── fragment recovery: parse → walk → serialize → persist
//!                             → repoint consumers
//! ```
//!
//! The engine owns no editor state: everything host-shaped is injected
//! through [`mason_editor::EditorHost`], and each pass borrows the
//! document for its duration only.

mod orchestrator;
mod readiness;
mod tracker;
mod walker;

pub use orchestrator::{PassSummary, RecoveryConfig, RecoveryOrchestrator};
pub use readiness::{await_ready, GateTimeout};
pub use tracker::FragmentTracker;
pub use walker::{is_invalid, reconstruct, walk};
