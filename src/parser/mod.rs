//! Package parsing.

mod docx;
mod options;

pub use docx::DocxParser;
pub(crate) use docx::rels_part_for;
pub use options::{ErrorMode, ParseOptions};
