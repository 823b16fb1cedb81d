//! Output: the `.docx` package writer and JSON reports.

mod docx;
mod json;

pub use docx::{save, to_bytes};
pub use json::{to_json, JsonFormat};
