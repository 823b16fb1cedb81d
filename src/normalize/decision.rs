//! Injectable decisions for the normalization pipeline.
//!
//! Every choice the pipeline cannot make on its own (language, style
//! remapping, whether to review anomalies and what to do with each one,
//! whether to scrub metadata) goes through a [`DecisionSource`]. The CLI
//! implements it with interactive prompts, [`RuleSet`](super::RuleSet)
//! implements it from a rules file, and [`ConservativeDecisions`] changes
//! as little as possible.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use super::scanner::AnomalyRecord;
use super::style_map::StyleTarget;

/// What to do with an isolated-format anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyAction {
    /// Leave the run as it is
    #[default]
    Keep,
    /// Clear all four emphasis traits on the run
    Revert,
    /// Keep this run and end the review
    Stop,
}

/// Source of the pipeline's decisions.
///
/// The provided methods are the conservative answers: no language, no
/// remapping, no review, keep every anomaly, no scrub.
pub trait DecisionSource {
    /// Language code to force onto every run; empty skips tagging.
    fn choose_language_code(&mut self) -> String {
        String::new()
    }

    /// Canonical target for a paragraph-style name; `None` leaves it unchanged.
    fn choose_style_target(&mut self, _style_name: &str) -> Option<StyleTarget> {
        None
    }

    /// Whether to review isolated-format anomalies.
    fn choose_perform_review(&mut self) -> bool {
        false
    }

    /// Decision for one anomaly.
    fn choose_anomaly_action(&mut self, _record: &AnomalyRecord) -> AnomalyAction {
        AnomalyAction::Keep
    }

    /// Whether to clear identifying metadata.
    fn choose_perform_metadata_scrub(&mut self) -> bool {
        false
    }
}

impl<D: DecisionSource + ?Sized> DecisionSource for &mut D {
    fn choose_language_code(&mut self) -> String {
        (**self).choose_language_code()
    }

    fn choose_style_target(&mut self, style_name: &str) -> Option<StyleTarget> {
        (**self).choose_style_target(style_name)
    }

    fn choose_perform_review(&mut self) -> bool {
        (**self).choose_perform_review()
    }

    fn choose_anomaly_action(&mut self, record: &AnomalyRecord) -> AnomalyAction {
        (**self).choose_anomaly_action(record)
    }

    fn choose_perform_metadata_scrub(&mut self) -> bool {
        (**self).choose_perform_metadata_scrub()
    }
}

/// Decision source that changes nothing it does not have to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConservativeDecisions;

impl DecisionSource for ConservativeDecisions {}

/// Decision source with answers fixed up front.
///
/// Anomaly actions are consumed in order; once they run out every further
/// anomaly is kept. Questions asked are recorded for inspection.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecisions {
    language: String,
    styles: HashMap<String, StyleTarget>,
    review: bool,
    actions: VecDeque<AnomalyAction>,
    scrub: bool,
    asked_styles: Vec<String>,
    seen: Vec<AnomalyRecord>,
}

impl ScriptedDecisions {
    /// Create a script that answers conservatively.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the language question with `code`.
    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language = code.into();
        self
    }

    /// Map `name` onto `target`.
    pub fn with_style(mut self, name: impl Into<String>, target: StyleTarget) -> Self {
        self.styles.insert(name.into(), target);
        self
    }

    /// Review anomalies, answering with `actions` in order.
    pub fn with_review(mut self, actions: impl IntoIterator<Item = AnomalyAction>) -> Self {
        self.review = true;
        self.actions = actions.into_iter().collect();
        self
    }

    /// Scrub metadata.
    pub fn with_scrub(mut self) -> Self {
        self.scrub = true;
        self
    }

    /// Style names asked about, in order.
    pub fn asked_styles(&self) -> &[String] {
        &self.asked_styles
    }

    /// Anomalies presented, in order.
    pub fn seen_anomalies(&self) -> &[AnomalyRecord] {
        &self.seen
    }
}

impl DecisionSource for ScriptedDecisions {
    fn choose_language_code(&mut self) -> String {
        self.language.clone()
    }

    fn choose_style_target(&mut self, style_name: &str) -> Option<StyleTarget> {
        self.asked_styles.push(style_name.to_string());
        self.styles.get(style_name).copied()
    }

    fn choose_perform_review(&mut self) -> bool {
        self.review
    }

    fn choose_anomaly_action(&mut self, record: &AnomalyRecord) -> AnomalyAction {
        self.seen.push(record.clone());
        self.actions.pop_front().unwrap_or_default()
    }

    fn choose_perform_metadata_scrub(&mut self) -> bool {
        self.scrub
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Trait;

    fn record() -> AnomalyRecord {
        AnomalyRecord {
            paragraph_index: 0,
            offset: 6,
            character: 'W',
            run_text: "W".to_string(),
            traits: vec![Trait::Bold],
            context: "Hello [[W]]orld".to_string(),
        }
    }

    #[test]
    fn test_conservative_defaults() {
        let mut decisions = ConservativeDecisions;
        assert_eq!(decisions.choose_language_code(), "");
        assert_eq!(decisions.choose_style_target("Body Text"), None);
        assert!(!decisions.choose_perform_review());
        assert_eq!(decisions.choose_anomaly_action(&record()), AnomalyAction::Keep);
        assert!(!decisions.choose_perform_metadata_scrub());
    }

    #[test]
    fn test_scripted_actions_run_out_to_keep() {
        let mut decisions = ScriptedDecisions::new().with_review([AnomalyAction::Revert]);
        assert!(decisions.choose_perform_review());
        assert_eq!(decisions.choose_anomaly_action(&record()), AnomalyAction::Revert);
        assert_eq!(decisions.choose_anomaly_action(&record()), AnomalyAction::Keep);
        assert_eq!(decisions.seen_anomalies().len(), 2);
    }

    #[test]
    fn test_mut_reference_forwards() {
        let mut decisions = ScriptedDecisions::new().with_language("de-DE");
        let mut borrowed = &mut decisions;
        assert_eq!(DecisionSource::choose_language_code(&mut borrowed), "de-DE");
    }
}
