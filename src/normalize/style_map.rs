//! Mapping from observed paragraph-style names to canonical targets.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::decision::DecisionSource;
use crate::model::Document;

/// Canonical paragraph styles a style name can be collapsed onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleTarget {
    /// Body text
    #[serde(rename = "Normal", alias = "normal")]
    Normal,
    /// First-level heading
    #[serde(rename = "Heading 1", alias = "heading 1", alias = "heading1")]
    Heading1,
    /// Second-level heading
    #[serde(rename = "Heading 2", alias = "heading 2", alias = "heading2")]
    Heading2,
}

impl StyleTarget {
    /// All targets in menu order.
    pub const ALL: [StyleTarget; 3] = [StyleTarget::Normal, StyleTarget::Heading1, StyleTarget::Heading2];

    /// UI name of the target style.
    pub fn style_name(self) -> &'static str {
        match self {
            StyleTarget::Normal => "Normal",
            StyleTarget::Heading1 => "Heading 1",
            StyleTarget::Heading2 => "Heading 2",
        }
    }

    /// Interpret a menu answer: "1" Normal, "2" Heading 1, "3" Heading 2.
    ///
    /// Anything else means "leave unchanged".
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(StyleTarget::Normal),
            "2" => Some(StyleTarget::Heading1),
            "3" => Some(StyleTarget::Heading2),
            _ => None,
        }
    }

    /// Parse a style name ("Heading 1", "normal") into a target.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.style_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for StyleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.style_name())
    }
}

/// Decided style remappings; names left unchanged are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StyleMap {
    entries: BTreeMap<String, StyleTarget>,
}

impl StyleMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `name` onto `target`.
    pub fn insert(&mut self, name: impl Into<String>, target: StyleTarget) {
        self.entries.insert(name.into(), target);
    }

    /// Target for a style name, if it was remapped.
    pub fn get(&self, name: &str) -> Option<StyleTarget> {
        self.entries.get(name).copied()
    }

    /// Number of remapped names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is remapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remappings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, StyleTarget)> {
        self.entries.iter().map(|(name, target)| (name.as_str(), *target))
    }
}

impl FromIterator<(String, StyleTarget)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (String, StyleTarget)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Distinct paragraph-style names in use, in ascending order.
pub fn collect_style_names(doc: &Document) -> BTreeSet<String> {
    doc.paragraphs().map(|p| doc.style_name(p)).collect()
}

/// Ask the decision source about every style name in use.
pub fn build_style_map<D: DecisionSource + ?Sized>(doc: &Document, decisions: &mut D) -> StyleMap {
    let names = collect_style_names(doc);
    log::debug!("Found {} styles in use", names.len());

    let mut map = StyleMap::new();
    for name in names {
        match decisions.choose_style_target(&name) {
            Some(target) => {
                log::debug!("Style {:?} -> {}", name, target);
                map.insert(name, target);
            }
            None => log::debug!("Style {:?} unchanged", name),
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Paragraph, Style};
    use crate::normalize::decision::ScriptedDecisions;

    fn doc() -> Document {
        let mut doc = Document::new();
        doc.styles.add(Style::paragraph("BodyText", "Body Text"));
        doc.styles.add(Style::paragraph("Quote", "Quote"));
        doc.add_paragraph(Paragraph::with_style("Quote"));
        doc.add_paragraph(Paragraph::with_style("BodyText"));
        doc.add_paragraph(Paragraph::with_text("plain"));
        doc.add_paragraph(Paragraph::with_style("BodyText"));
        doc
    }

    #[test]
    fn test_collect_style_names_sorted_and_distinct() {
        let names: Vec<String> = collect_style_names(&doc()).into_iter().collect();
        assert_eq!(names, vec!["Body Text", "Normal", "Quote"]);
    }

    #[test]
    fn test_build_style_map_skips_unchanged() {
        let mut decisions = ScriptedDecisions::new()
            .with_style("Body Text", StyleTarget::Normal)
            .with_style("Quote", StyleTarget::Heading2);
        let map = build_style_map(&doc(), &mut decisions);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Body Text"), Some(StyleTarget::Normal));
        assert_eq!(map.get("Quote"), Some(StyleTarget::Heading2));
        assert_eq!(map.get("Normal"), None);
        assert_eq!(decisions.asked_styles(), ["Body Text", "Normal", "Quote"]);
    }

    #[test]
    fn test_from_choice() {
        assert_eq!(StyleTarget::from_choice("1"), Some(StyleTarget::Normal));
        assert_eq!(StyleTarget::from_choice(" 3\n"), Some(StyleTarget::Heading2));
        assert_eq!(StyleTarget::from_choice(""), None);
        assert_eq!(StyleTarget::from_choice("4"), None);
        assert_eq!(StyleTarget::from_choice("x"), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(StyleTarget::from_name("heading 1"), Some(StyleTarget::Heading1));
        assert_eq!(StyleTarget::from_name("Title"), None);
    }
}
