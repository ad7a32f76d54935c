//! # Mason Editor
//!
//! The document-editor host surface the recovery engine runs against.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: markup ⇄ BlockRecord trees          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: host surface                        │
//! │  - EditorHost collaborator trait            │
//! │  - Block-type registry (canonical renders)  │
//! │  - Live document store                      │
//! │  - Shared-fragment store                    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ recovery: automatic block repair            │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The recovery engine reaches the editor only through [`EditorHost`];
//! [`MemoryHost`] is a complete in-process implementation of it.

mod document;
mod errors;
mod fragments;
mod host;
mod memory;
mod registry;

pub use document::DocumentStore;
pub use errors::HostError;
pub use fragments::FragmentStore;
pub use host::{EditorHost, FragmentContent};
pub use memory::{
    MemoryHost, FRAGMENT_REF_ATTRIBUTE, FRAGMENT_TYPE, WARNING_OVERLAY_MARKER,
};
pub use registry::{BlockType, BlockTypeRegistry, RenderFn};
