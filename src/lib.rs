//! # docnorm
//!
//! Formatting normalization for Word (`.docx`) documents.
//!
//! Documents that passed through many hands accumulate ad-hoc paragraph
//! styles, manual fonts and sizes, stray colors and highlights, and odd
//! single letters in bold or italic. This library cleans them up in place
//! while keeping the emphasis that carries meaning.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docnorm::{Normalizer, RuleSet};
//!
//! fn main() -> docnorm::Result<()> {
//!     let mut doc = docnorm::open("draft.docx")?;
//!
//!     let mut rules = RuleSet::from_path("rules.json")?;
//!     let report = Normalizer::new().run(&mut doc, &mut rules)?;
//!     println!("{}", report.summary());
//!
//!     docnorm::save(&doc, "clean.docx")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Canonical styles**: collapse paragraph styles onto Normal, Heading 1, Heading 2
//! - **Override stripping**: fonts, sizes, colors, highlight, shading, spacing, indents
//! - **Trait preservation**: bold, italic, underline and strikethrough survive
//! - **Language tagging**: one language code on every run, all three script slots
//! - **Anomaly review**: single-character emphasis flagged with context for keep/revert
//! - **Metadata scrub**: author, comments, keywords, last-modified-by, title
//! - **Lossless round trip**: everything not normalized is written back untouched

pub mod detect;
pub mod error;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod writer;
pub mod xml;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, DocxFormat, DocxKind};
pub use error::{Error, Result};
pub use model::{
    Alignment, BodyContent, Document, LanguageSlot, Metadata, MetadataField, Paragraph,
    ParagraphGeometry, PropertyBag, PropertyKind, Run, Style, StyleKind, StyleSheet, Trait,
    TraitSet,
};
pub use normalize::{
    find_anomalies, AnomalyAction, AnomalyPolicy, AnomalyRecord, ConservativeDecisions,
    DecisionSource, LanguageCode, NormalizeOptions, NormalizeReport, Normalizer, RuleSet,
    ScanOptions, ScanReport, ScriptedDecisions, StripOptions, StripPreset, StyleMap, StyleTarget,
};
pub use parser::{DocxParser, ErrorMode, ParseOptions};
pub use writer::{to_bytes, to_json, JsonFormat};

use std::path::Path;

/// Open a `.docx` file.
///
/// # Example
///
/// ```no_run
/// let doc = docnorm::open("report.docx").unwrap();
/// println!("Paragraphs: {}", doc.paragraph_count());
/// ```
pub fn open<P: AsRef<Path>>(path: P) -> Result<Document> {
    DocxParser::open(path)?.parse()
}

/// Open a `.docx` file with custom options.
///
/// # Example
///
/// ```no_run
/// use docnorm::{open_with_options, ParseOptions};
///
/// let doc = open_with_options("report.docx", ParseOptions::new().lenient()).unwrap();
/// ```
pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    DocxParser::open_with_options(path, options)?.parse()
}

/// Load a document from `.docx` bytes.
pub fn open_bytes(data: &[u8]) -> Result<Document> {
    DocxParser::from_bytes(data)?.parse()
}

/// Save a document to `path`, replacing it atomically.
pub fn save<P: AsRef<Path>>(doc: &Document, path: P) -> Result<()> {
    writer::save(doc, path)
}

/// Open `input`, normalize it and save the result to `output`.
///
/// Nothing is written when the input is missing or malformed, or when
/// normalization fails.
///
/// # Example
///
/// ```no_run
/// use docnorm::{normalize_file, ConservativeDecisions, Normalizer};
///
/// let report = normalize_file("in.docx", "out.docx", &Normalizer::new(), &mut ConservativeDecisions)?;
/// # Ok::<(), docnorm::Error>(())
/// ```
pub fn normalize_file<P, Q, D>(
    input: P,
    output: Q,
    normalizer: &Normalizer,
    decisions: &mut D,
) -> Result<NormalizeReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    D: DecisionSource + ?Sized,
{
    let mut doc = open(input)?;
    let report = normalizer.run(&mut doc, decisions)?;
    save(&doc, output)?;
    Ok(report)
}
