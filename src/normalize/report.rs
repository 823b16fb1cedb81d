//! Normalization report.

use serde::Serialize;

use super::scanner::ScanReport;
use super::stripper::StripStats;
use super::style_map::StyleMap;
use crate::model::MetadataField;

/// What a normalization run did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeReport {
    /// Paragraphs in the document
    pub paragraphs: usize,

    /// Runs in the document
    pub runs: usize,

    /// Language forced onto every run, if any
    pub language: Option<String>,

    /// Runs tagged with the language
    pub runs_tagged: usize,

    /// Style remappings that were decided
    pub style_map: StyleMap,

    /// Stripper counts
    pub strip: StripStats,

    /// Anomaly review, when performed
    pub review: Option<ScanReport>,

    /// Metadata fields that held a value and were cleared
    pub metadata_cleared: Vec<MetadataField>,
}

impl NormalizeReport {
    /// Number of anomalies reverted during review.
    pub fn reverted(&self) -> usize {
        self.review.as_ref().map_or(0, |r| r.reverted)
    }

    /// One-line summary for display.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("{} paragraphs", self.paragraphs),
            format!("{} styles remapped", self.style_map.len()),
            format!("{} runs stripped", self.strip.runs_stripped),
        ];
        if let Some(ref language) = self.language {
            parts.push(format!("language {}", language));
        }
        if let Some(ref review) = self.review {
            parts.push(format!(
                "{} of {} anomalies reverted",
                review.reverted,
                review.candidates()
            ));
        }
        if !self.metadata_cleared.is_empty() {
            parts.push(format!("{} metadata fields cleared", self.metadata_cleared.len()));
        }
        parts.join(", ")
    }
}
