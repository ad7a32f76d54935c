//! Error types for the editor host surface

use mason_parser::{BlockId, FragmentRef, ParseError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// The block-type registry has no entry for this name. Unrecoverable
    /// for the affected subtree: an unregistered type cannot be
    /// re-instantiated.
    #[error("Unknown block type: {0}")]
    UnknownType(String),

    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Fragment not found: {0}")]
    FragmentNotFound(FragmentRef),

    #[error("Fragment {0} is still being fetched")]
    FragmentUnavailable(FragmentRef),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}
