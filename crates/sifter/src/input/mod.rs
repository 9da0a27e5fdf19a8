//! Input parsing: spreadsheet-like contact lists.

mod reader;
mod record;
mod source;

pub use reader::{TabularSource, fingerprint};
pub use record::{ContactRecord, InputSchema, RowWindow};
pub use source::{InputFormat, SourceMetadata};
