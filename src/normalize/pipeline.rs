//! The normalization pipeline.

use super::decision::DecisionSource;
use super::language::{tag_document, LanguageCode};
use super::metadata::scrub_metadata;
use super::options::{NormalizeOptions, ScanOptions, StripOptions, StripPreset};
use super::report::NormalizeReport;
use super::scanner::scan_document;
use super::stripper::strip_document;
use super::style_map::build_style_map;
use crate::error::Result;
use crate::model::Document;

/// Runs the normalization stages over a document.
///
/// # Example
/// ```no_run
/// use docnorm::{ConservativeDecisions, Normalizer, StripPreset};
///
/// let mut doc = docnorm::open("draft.docx").unwrap();
/// let report = Normalizer::new()
///     .preset(StripPreset::Aggressive)
///     .run(&mut doc, &mut ConservativeDecisions)
///     .unwrap();
/// println!("{}", report.summary());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    /// Create a normalizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer with the given options.
    pub fn with_options(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Use a stripping preset.
    pub fn preset(mut self, preset: StripPreset) -> Self {
        self.options.strip = StripOptions::from_preset(preset);
        self
    }

    /// Set stripper options.
    pub fn strip_options(mut self, strip: StripOptions) -> Self {
        self.options.strip = strip;
        self
    }

    /// Set scanner options.
    pub fn scan_options(mut self, scan: ScanOptions) -> Self {
        self.options.scan = scan;
        self
    }

    /// Options in use.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize `doc` in place.
    ///
    /// Stages run in order: language choice, style mapping, stripping,
    /// language tagging, anomaly review, metadata scrub. A language code
    /// that is not a language tag is treated as no answer and tagging is
    /// skipped.
    pub fn run<D: DecisionSource + ?Sized>(
        &self,
        doc: &mut Document,
        decisions: &mut D,
    ) -> Result<NormalizeReport> {
        let language = match LanguageCode::parse(&decisions.choose_language_code()) {
            Ok(code) => code,
            Err(e) => {
                log::warn!("{}; skipping language tagging", e);
                None
            }
        };
        let style_map = build_style_map(doc, decisions);

        let mut report = NormalizeReport {
            paragraphs: doc.paragraph_count(),
            runs: doc.run_count(),
            language: language.as_ref().map(|c| c.to_string()),
            ..Default::default()
        };

        report.strip = strip_document(doc, &style_map, &self.options.strip);
        report.style_map = style_map;

        if let Some(ref code) = language {
            report.runs_tagged = tag_document(doc, code);
        }

        if decisions.choose_perform_review() {
            report.review = Some(scan_document(doc, decisions, &self.options.scan));
        }

        if decisions.choose_perform_metadata_scrub() {
            report.metadata_cleared = scrub_metadata(doc);
        }

        log::info!("Normalized: {}", report.summary());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LanguageSlot, MetadataField, Paragraph, Run, Style};
    use crate::normalize::decision::{AnomalyAction, ConservativeDecisions, ScriptedDecisions};
    use crate::normalize::style_map::StyleTarget;
    use crate::xml::Element;

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.styles.add(Style::paragraph("BodyText", "Body Text"));
        doc.metadata.author = Some("Jane Roe".to_string());

        let mut first = Paragraph::with_style("BodyText");
        first.add_text("Hello ");
        first.add_run(Run::bold("W"));
        let mut sized = Run::new("orld");
        sized
            .properties_mut()
            .set(Element::new("w:sz").with_attr("w:val", "30"));
        first.add_run(sized);
        doc.add_paragraph(first);
        doc.add_paragraph(Paragraph::with_text("Second"));
        doc
    }

    #[test]
    fn test_full_run() {
        let mut doc = sample();
        let mut decisions = ScriptedDecisions::new()
            .with_language("en-US")
            .with_style("Body Text", StyleTarget::Normal)
            .with_review([AnomalyAction::Revert])
            .with_scrub();

        let report = Normalizer::new().run(&mut doc, &mut decisions).unwrap();

        assert_eq!(report.paragraphs, 2);
        assert_eq!(report.style_map.get("Body Text"), Some(StyleTarget::Normal));
        assert_eq!(report.strip.paragraphs_restyled, 1);
        assert_eq!(report.strip.runs_stripped, 1);
        assert_eq!(report.runs_tagged, 4);
        assert_eq!(report.reverted(), 1);
        assert_eq!(report.metadata_cleared, vec![MetadataField::Author]);

        let first = doc.paragraphs().next().unwrap();
        assert_eq!(doc.style_name(first), "Normal");
        assert!(first.runs().all(|r| !r.traits().any()));
        assert!(first.runs().all(|r| r.language(LanguageSlot::Bidirectional) == Some("en-US")));
    }

    #[test]
    fn test_conservative_run_only_strips() {
        let mut doc = sample();
        let report = Normalizer::new().run(&mut doc, &mut ConservativeDecisions).unwrap();

        assert!(report.style_map.is_empty());
        assert!(report.review.is_none());
        assert!(report.language.is_none());
        assert_eq!(doc.metadata.author.as_deref(), Some("Jane Roe"));
        let bold = doc.paragraphs().next().unwrap().runs().nth(1).unwrap();
        assert!(bold.traits().bold);
    }

    #[test]
    fn test_invalid_language_is_skipped() {
        let mut doc = sample();
        let mut decisions = ScriptedDecisions::new()
            .with_language("english")
            .with_style("Body Text", StyleTarget::Normal);

        let report = Normalizer::new().run(&mut doc, &mut decisions).unwrap();
        assert!(report.language.is_none());
        assert_eq!(report.runs_tagged, 0);
        assert_eq!(decisions.asked_styles().len(), 2);
        assert_eq!(report.strip.paragraphs_restyled, 1);
        assert!(doc
            .paragraphs()
            .flat_map(|p| p.runs())
            .all(|r| r.language(LanguageSlot::Default).is_none()));
    }
}
