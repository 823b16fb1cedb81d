//! Rules files: batch decisions loaded from JSON.
//!
//! ```json
//! {
//!   "language": "en-US",
//!   "styles": { "Body Text": "Normal", "Title": "Heading 1" },
//!   "style_patterns": [{ "pattern": "^Heading [3-9]$", "target": "Heading 2" }],
//!   "review": true,
//!   "anomalies": { "revert": ["Bold", "Italic"] },
//!   "scrub_metadata": true
//! }
//! ```
//!
//! Every field is optional. Exact style names win over patterns; patterns
//! are tried in file order.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use super::decision::{AnomalyAction, DecisionSource};
use super::language::LanguageCode;
use super::scanner::AnomalyRecord;
use super::style_map::StyleTarget;
use crate::error::{Error, Result};
use crate::model::Trait;

/// What a rules file does with anomalies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyPolicy {
    /// Keep every anomaly
    #[default]
    KeepAll,
    /// Revert every anomaly
    RevertAll,
    /// Revert anomalies whose active traits are all listed
    Revert(Vec<Trait>),
}

impl AnomalyPolicy {
    fn action(&self, record: &AnomalyRecord) -> AnomalyAction {
        let revert = match self {
            AnomalyPolicy::KeepAll => false,
            AnomalyPolicy::RevertAll => true,
            AnomalyPolicy::Revert(listed) => record.traits.iter().all(|t| listed.contains(t)),
        };
        if revert {
            AnomalyAction::Revert
        } else {
            AnomalyAction::Keep
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RuleFile {
    language: String,
    styles: HashMap<String, StyleTarget>,
    style_patterns: Vec<PatternRule>,
    review: bool,
    anomalies: AnomalyPolicy,
    scrub_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct PatternRule {
    pattern: String,
    target: StyleTarget,
}

/// Decisions read from a rules file.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    language: Option<LanguageCode>,
    styles: HashMap<String, StyleTarget>,
    patterns: Vec<(Regex, StyleTarget)>,
    review: bool,
    anomalies: AnomalyPolicy,
    scrub_metadata: bool,
}

impl RuleSet {
    /// Parse rules from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: RuleFile =
            serde_json::from_str(json).map_err(|e| Error::Rules(format!("invalid rules: {}", e)))?;

        let patterns = file
            .style_patterns
            .into_iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|re| (re, rule.target))
                    .map_err(|e| Error::Rules(format!("bad style pattern {:?}: {}", rule.pattern, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            language: LanguageCode::parse(&file.language)?,
            styles: file.styles,
            patterns,
            review: file.review,
            anomalies: file.anomalies,
            scrub_metadata: file.scrub_metadata,
        })
    }

    /// Load rules from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        let rules = Self::from_json(&json)?;
        log::info!(
            "Loaded rules from {}: {} style mappings, {} patterns",
            path.display(),
            rules.styles.len(),
            rules.patterns.len()
        );
        Ok(rules)
    }

    /// Override the language code.
    pub fn with_language(mut self, code: Option<LanguageCode>) -> Self {
        self.language = code;
        self
    }

    /// Target for a style name according to the rules.
    pub fn style_target(&self, name: &str) -> Option<StyleTarget> {
        self.styles.get(name).copied().or_else(|| {
            self.patterns
                .iter()
                .find(|(re, _)| re.is_match(name))
                .map(|(_, target)| *target)
        })
    }
}

impl DecisionSource for RuleSet {
    fn choose_language_code(&mut self) -> String {
        self.language.as_ref().map(|c| c.to_string()).unwrap_or_default()
    }

    fn choose_style_target(&mut self, style_name: &str) -> Option<StyleTarget> {
        self.style_target(style_name)
    }

    fn choose_perform_review(&mut self) -> bool {
        self.review
    }

    fn choose_anomaly_action(&mut self, record: &AnomalyRecord) -> AnomalyAction {
        self.anomalies.action(record)
    }

    fn choose_perform_metadata_scrub(&mut self) -> bool {
        self.scrub_metadata
    }
}
