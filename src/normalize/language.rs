//! Language tagging.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::Document;

fn language_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("language pattern is valid")
    })
}

/// A validated language tag such as `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse a language code.
    ///
    /// Returns `Ok(None)` for empty input (tagging is skipped) and
    /// `Err(Error::InvalidLanguageCode)` when the input is not shaped like
    /// a language tag.
    pub fn parse(input: &str) -> Result<Option<Self>> {
        let code = input.trim();
        if code.is_empty() {
            return Ok(None);
        }
        if !language_pattern().is_match(code) {
            return Err(Error::InvalidLanguageCode(code.to_string()));
        }
        Ok(Some(Self(code.to_string())))
    }

    /// The code as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Write `code` into the default, east-Asian and bidirectional language
/// slots of every run. Returns the number of runs tagged.
pub fn tag_document(doc: &mut Document, code: &LanguageCode) -> usize {
    let mut tagged = 0;
    for paragraph in doc.paragraphs_mut() {
        for run in paragraph.runs_mut() {
            run.set_language(code.as_str());
            tagged += 1;
        }
    }
    log::info!("Tagged {} runs as {}", tagged, code);
    tagged
}
