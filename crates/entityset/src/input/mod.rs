//! Input reading and raw record handling.

mod reader;
mod record;
mod source;

pub use reader::{ReaderConfig, RecordReader};
pub use record::{value_text, RawRecord};
pub use source::{SourceFormat, SourceMetadata};
