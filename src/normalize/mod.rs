//! Formatting normalization.
//!
//! The pipeline collapses paragraph styles onto Normal / Heading 1 /
//! Heading 2, strips manual run overrides while keeping bold, italic,
//! underline and strikethrough, forces a language tag, reviews isolated
//! single-character emphasis and optionally clears identifying metadata.
//! Every choice is delegated to a [`DecisionSource`].

mod decision;
mod language;
mod metadata;
mod options;
mod pipeline;
mod report;
mod rules;
mod scanner;
mod stripper;
mod style_map;

pub use decision::{AnomalyAction, ConservativeDecisions, DecisionSource, ScriptedDecisions};
pub use language::{tag_document, LanguageCode};
pub use metadata::{scrub_metadata, SCRUBBED_FIELDS};
pub use options::{NormalizeOptions, ScanOptions, StripOptions, StripPreset};
pub use pipeline::Normalizer;
pub use report::NormalizeReport;
pub use rules::{AnomalyPolicy, RuleSet};
pub use scanner::{
    context_window, find_anomalies, scan_document, AnomalyRecord, ReviewedAnomaly, ScanReport,
};
pub use stripper::{strip_document, strip_paragraph, strip_run, RunOutcome, StripStats};
pub use style_map::{build_style_map, collect_style_names, StyleMap, StyleTarget};
