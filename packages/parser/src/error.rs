use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unterminated delimiter at {pos}")]
    UnterminatedDelimiter { pos: usize },

    #[error("Missing block type name in delimiter at {pos}")]
    MissingTypeName { pos: usize },

    #[error("Invalid block attributes at {pos}: {message}")]
    InvalidAttributes { pos: usize, message: String },

    #[error("Closing delimiter for '{type_name}' at {pos} has no matching opener")]
    UnexpectedClose { pos: usize, type_name: String },

    #[error("Mismatched closing delimiter at {pos}: opened '{opened}', closed '{closed}'")]
    MismatchedClose {
        pos: usize,
        opened: String,
        closed: String,
    },

    #[error("Block '{type_name}' opened at {pos} is never closed")]
    UnclosedBlock { pos: usize, type_name: String },
}

impl ParseError {
    pub fn unterminated_delimiter(pos: usize) -> Self {
        Self::UnterminatedDelimiter { pos }
    }

    pub fn missing_type_name(pos: usize) -> Self {
        Self::MissingTypeName { pos }
    }

    pub fn invalid_attributes(pos: usize, message: impl Into<String>) -> Self {
        Self::InvalidAttributes {
            pos,
            message: message.into(),
        }
    }

    pub fn unexpected_close(pos: usize, type_name: impl Into<String>) -> Self {
        Self::UnexpectedClose {
            pos,
            type_name: type_name.into(),
        }
    }

    pub fn mismatched_close(pos: usize, opened: impl Into<String>, closed: impl Into<String>) -> Self {
        Self::MismatchedClose {
            pos,
            opened: opened.into(),
            closed: closed.into(),
        }
    }

    pub fn unclosed_block(pos: usize, type_name: impl Into<String>) -> Self {
        Self::UnclosedBlock {
            pos,
            type_name: type_name.into(),
        }
    }
}
