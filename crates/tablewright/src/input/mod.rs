//! Loading datasets from files.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{SourceFormat, SourceMetadata};
