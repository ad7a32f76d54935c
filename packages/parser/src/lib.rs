//! # Mason Parser
//!
//! Block markup grammar for Mason documents: the block data model, the
//! comment-delimited parser, and the serializer that inverts it.
//!
//! A document is an ordered tree of typed blocks. Each block serializes as
//! a pair of HTML-comment delimiters carrying its type name and a JSON
//! attribute object, wrapping its own markup body and its nested children.

pub mod ast;
pub mod error;
pub mod id_generator;
pub mod parser;
pub mod serializer;

pub use ast::{AttributeMap, BlockId, BlockRecord, FragmentRef};
pub use error::{ParseError, ParseResult};
pub use id_generator::{get_document_id, IDGenerator};
pub use parser::{parse, Parser};
pub use serializer::{serialize, Serializer};
