//! Isolated-format scanner.
//!
//! Walks each paragraph's runs keeping an absolute character offset and
//! flags runs whose trimmed text is a single character carrying bold,
//! italic, underline or strikethrough. Such runs are usually accidents
//! (a bolded space-adjacent letter, a stray italic comma) and each one is
//! put to the decision source with a window of surrounding text.

use std::ops::Range;

use serde::Serialize;

use super::decision::{AnomalyAction, DecisionSource};
use super::options::ScanOptions;
use crate::model::{Document, Paragraph, Trait, TraitSet};

/// Marker placed around the candidate run in the context string.
const OPEN_MARK: &str = "[[";
const CLOSE_MARK: &str = "]]";

/// A single-character run with active emphasis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnomalyRecord {
    /// Index of the paragraph in document order
    pub paragraph_index: usize,

    /// Character offset of the run within the paragraph text
    pub offset: usize,

    /// The single non-whitespace character
    pub character: char,

    /// Untrimmed text of the run
    pub run_text: String,

    /// Active traits, in label order
    pub traits: Vec<Trait>,

    /// Surrounding text with the run marked as `[[...]]`
    pub context: String,
}

impl AnomalyRecord {
    /// Labels of the active traits ("Bold", "Italic", ...).
    pub fn labels(&self) -> Vec<&'static str> {
        self.traits.iter().map(|t| t.label()).collect()
    }
}

/// An anomaly together with the decision taken for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewedAnomaly {
    /// The anomaly as presented
    #[serde(flatten)]
    pub record: AnomalyRecord,

    /// The decision
    pub action: AnomalyAction,
}

/// Outcome of a review pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Every anomaly presented, in document order
    pub reviewed: Vec<ReviewedAnomaly>,

    /// Number of runs whose traits were cleared
    pub reverted: usize,

    /// Number of runs left as they were
    pub kept: usize,

    /// Whether the review was stopped before the end of the document
    pub cancelled: bool,
}

impl ScanReport {
    /// Number of anomalies presented.
    pub fn candidates(&self) -> usize {
        self.reviewed.len()
    }
}

/// Character range of the context window around `offset`.
///
/// The window starts `radius` characters before the offset and ends
/// `radius` characters after the first character of the run, clamped to
/// the paragraph.
pub fn context_window(offset: usize, paragraph_len: usize, radius: usize) -> Range<usize> {
    let start = offset.saturating_sub(radius);
    let end = paragraph_len.min(offset + radius + 1);
    start..end
}

/// Build the marked context string for a run at `offset`.
///
/// The whole run text goes between the marks, so the suffix resumes after
/// the run (`offset + run_len`), not after its first character. A padded
/// run like `" x "` then reads `see[[ x ]]here` without repeating `x `.
fn build_context(chars: &[char], offset: usize, run_text: &str, radius: usize) -> String {
    let run_len = run_text.chars().count();
    let window = context_window(offset, chars.len(), radius);
    let suffix_start = (offset + run_len).min(window.end);

    let mut context = String::with_capacity(run_text.len() + radius * 2 + 4);
    context.extend(&chars[window.start..offset]);
    context.push_str(OPEN_MARK);
    context.push_str(run_text);
    context.push_str(CLOSE_MARK);
    context.extend(&chars[suffix_start..window.end]);
    context
}

/// Find the candidate runs of one paragraph as `(run index, record)` pairs.
fn paragraph_candidates(
    paragraph_index: usize,
    paragraph: &Paragraph,
    radius: usize,
) -> Vec<(usize, AnomalyRecord)> {
    let texts: Vec<String> = paragraph.runs().map(|r| r.text()).collect();
    let chars: Vec<char> = texts.iter().flat_map(|t| t.chars()).collect();

    let mut candidates = Vec::new();
    let mut offset = 0;
    for (run_index, (run, text)) in paragraph.runs().zip(&texts).enumerate() {
        let traits = run.traits();
        let mut trimmed = text.trim().chars();
        if let (Some(character), None) = (trimmed.next(), trimmed.next()) {
            if traits.any() {
                candidates.push((
                    run_index,
                    AnomalyRecord {
                        paragraph_index,
                        offset,
                        character,
                        run_text: text.clone(),
                        traits: traits.active(),
                        context: build_context(&chars, offset, text, radius),
                    },
                ));
            }
        }
        offset += text.chars().count();
    }
    candidates
}

/// List anomalies without changing anything.
pub fn find_anomalies(doc: &Document, options: &ScanOptions) -> Vec<AnomalyRecord> {
    doc.paragraphs()
        .enumerate()
        .flat_map(|(index, paragraph)| paragraph_candidates(index, paragraph, options.context_radius))
        .map(|(_, record)| record)
        .collect()
}

/// Review every anomaly with the decision source, reverting as instructed.
///
/// Paragraphs are visited in order and runs in order within each
/// paragraph. A `Stop` answer keeps the current run and ends the review;
/// reverts already applied stay applied.
pub fn scan_document<D: DecisionSource + ?Sized>(
    doc: &mut Document,
    decisions: &mut D,
    options: &ScanOptions,
) -> ScanReport {
    let mut report = ScanReport::default();

    'paragraphs: for (index, paragraph) in doc.paragraphs_mut().enumerate() {
        let candidates = paragraph_candidates(index, paragraph, options.context_radius);
        for (run_index, record) in candidates {
            let action = decisions.choose_anomaly_action(&record);
            log::debug!(
                "Paragraph {} offset {} {:?}: {:?}",
                record.paragraph_index,
                record.offset,
                record.context,
                action
            );
            match action {
                AnomalyAction::Revert => {
                    if let Some(run) = paragraph.runs_mut().nth(run_index) {
                        run.set_traits(TraitSet::NONE);
                    }
                    report.reverted += 1;
                }
                AnomalyAction::Keep | AnomalyAction::Stop => report.kept += 1,
            }
            report.reviewed.push(ReviewedAnomaly { record, action });
            if action == AnomalyAction::Stop {
                report.cancelled = true;
                break 'paragraphs;
            }
        }
    }

    log::info!(
        "Reviewed {} anomalies: {} reverted, {} kept{}",
        report.candidates(),
        report.reverted,
        report.kept,
        if report.cancelled { " (stopped)" } else { "" }
    );
    report
}
