//! Run property bag (`w:rPr`) and the property kinds the normalizer knows about.

use crate::xml::Element;
use serde::{Deserialize, Serialize};

/// Kinds of run-level formatting properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// Character style reference (`w:rStyle`)
    CharacterStyle,
    /// Font family for all scripts (`w:rFonts`: ascii, hAnsi, eastAsia, cs)
    FontFamily,
    /// Bold (`w:b`)
    Bold,
    /// Complex-script bold (`w:bCs`)
    BoldComplex,
    /// Italic (`w:i`)
    Italic,
    /// Complex-script italic (`w:iCs`)
    ItalicComplex,
    /// Single strikethrough (`w:strike`)
    Strike,
    /// Double strikethrough (`w:dstrike`)
    DoubleStrike,
    /// Hidden text (`w:vanish`)
    Hidden,
    /// Foreground color (`w:color`)
    Color,
    /// Font size in half-points (`w:sz`)
    FontSize,
    /// Complex-script font size (`w:szCs`)
    FontSizeComplex,
    /// Highlight color (`w:highlight`)
    Highlight,
    /// Underline with its style detail (`w:u`)
    Underline,
    /// Text shading (`w:shd`)
    Shading,
    /// Superscript/subscript (`w:vertAlign`)
    VerticalAlign,
    /// Language tags (`w:lang`)
    Language,
}

impl PropertyKind {
    /// Qualified element name for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            PropertyKind::CharacterStyle => "w:rStyle",
            PropertyKind::FontFamily => "w:rFonts",
            PropertyKind::Bold => "w:b",
            PropertyKind::BoldComplex => "w:bCs",
            PropertyKind::Italic => "w:i",
            PropertyKind::ItalicComplex => "w:iCs",
            PropertyKind::Strike => "w:strike",
            PropertyKind::DoubleStrike => "w:dstrike",
            PropertyKind::Hidden => "w:vanish",
            PropertyKind::Color => "w:color",
            PropertyKind::FontSize => "w:sz",
            PropertyKind::FontSizeComplex => "w:szCs",
            PropertyKind::Highlight => "w:highlight",
            PropertyKind::Underline => "w:u",
            PropertyKind::Shading => "w:shd",
            PropertyKind::VerticalAlign => "w:vertAlign",
            PropertyKind::Language => "w:lang",
        }
    }
}

/// Element order of `w:rPr` children as required by the WordprocessingML schema.
const RUN_PROPERTY_ORDER: &[&str] = &[
    "w:rStyle",
    "w:rFonts",
    "w:b",
    "w:bCs",
    "w:i",
    "w:iCs",
    "w:caps",
    "w:smallCaps",
    "w:strike",
    "w:dstrike",
    "w:outline",
    "w:shadow",
    "w:emboss",
    "w:imprint",
    "w:noProof",
    "w:snapToGrid",
    "w:vanish",
    "w:webHidden",
    "w:color",
    "w:spacing",
    "w:w",
    "w:kern",
    "w:position",
    "w:sz",
    "w:szCs",
    "w:highlight",
    "w:u",
    "w:effect",
    "w:bdr",
    "w:shd",
    "w:fitText",
    "w:vertAlign",
    "w:rtl",
    "w:cs",
    "w:em",
    "w:lang",
    "w:eastAsianLayout",
    "w:specVanish",
    "w:oMath",
];

fn schema_rank(tag: &str) -> usize {
    RUN_PROPERTY_ORDER
        .iter()
        .position(|t| *t == tag)
        .unwrap_or(RUN_PROPERTY_ORDER.len())
}

/// The three language-tag slots of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageSlot {
    /// Latin/default script (`w:val`)
    Default,
    /// East-Asian script (`w:eastAsia`)
    EastAsian,
    /// Bidirectional script (`w:bidi`)
    Bidirectional,
}

impl LanguageSlot {
    /// All slots in attribute order.
    pub const ALL: [LanguageSlot; 3] = [
        LanguageSlot::Default,
        LanguageSlot::EastAsian,
        LanguageSlot::Bidirectional,
    ];

    /// Qualified attribute name on `w:lang`.
    pub fn attribute(self) -> &'static str {
        match self {
            LanguageSlot::Default => "w:val",
            LanguageSlot::EastAsian => "w:eastAsia",
            LanguageSlot::Bidirectional => "w:bidi",
        }
    }
}

/// Manual override properties of a run, stored as the children of `w:rPr`.
///
/// Unknown property elements are kept as-is, so the bag is open-ended: a
/// bulk [`clear`](PropertyBag::clear) removes everything, known or not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    entries: Vec<Element>,
}

impl PropertyBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_element(rpr: Element) -> Self {
        let entries = rpr
            .children
            .into_iter()
            .filter_map(|node| match node {
                crate::xml::Node::Element(e) => Some(e),
                _ => None,
            })
            .collect();
        Self { entries }
    }

    pub(crate) fn to_element(&self) -> Option<Element> {
        if self.entries.is_empty() {
            return None;
        }
        let mut rpr = Element::new("w:rPr");
        for entry in &self.entries {
            rpr = rpr.with_child(entry.clone());
        }
        Some(rpr)
    }

    /// All property elements in order.
    pub fn entries(&self) -> &[Element] {
        &self.entries
    }

    /// Number of property elements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bag holds no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the last entry of a kind (the one a reader honors).
    pub fn get(&self, kind: PropertyKind) -> Option<&Element> {
        self.get_tag(kind.tag())
    }

    /// Get the last entry with a raw tag name.
    pub fn get_tag(&self, tag: &str) -> Option<&Element> {
        self.entries.iter().rev().find(|e| e.name == tag)
    }

    /// Check if a kind is present.
    pub fn contains(&self, kind: PropertyKind) -> bool {
        self.get(kind).is_some()
    }

    /// Set an entry, replacing every existing entry with the same tag.
    ///
    /// New entries are inserted at their schema position.
    pub fn set(&mut self, element: Element) {
        match self.entries.iter().position(|e| e.name == element.name) {
            Some(index) => {
                let tag = element.name.clone();
                self.entries[index] = element;
                let mut seen = false;
                self.entries.retain(|e| {
                    if e.name != tag {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => {
                let rank = schema_rank(&element.name);
                let index = self
                    .entries
                    .iter()
                    .position(|e| schema_rank(&e.name) > rank)
                    .unwrap_or(self.entries.len());
                self.entries.insert(index, element);
            }
        }
    }

    /// Append an entry without removing existing ones.
    pub fn push(&mut self, element: Element) {
        self.entries.push(element);
    }

    /// Remove every entry of a kind. Absent kinds are a no-op.
    pub fn remove(&mut self, kind: PropertyKind) -> usize {
        self.remove_tag(kind.tag())
    }

    /// Remove every entry with a raw tag name.
    pub fn remove_tag(&mut self, tag: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != tag);
        before - self.entries.len()
    }

    /// Remove all properties.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Read an on/off property. `None` when absent.
    pub fn toggle(&self, kind: PropertyKind) -> Option<bool> {
        self.get(kind).map(toggle_value)
    }

    /// Read the underline state. `w:u w:val="none"` counts as off.
    pub fn underline(&self) -> Option<bool> {
        self.get(PropertyKind::Underline)
            .map(|u| !matches!(u.attr("w:val"), Some("none")))
    }

    /// Read a language slot, honoring the last `w:lang` that sets it.
    pub fn language(&self, slot: LanguageSlot) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.name == PropertyKind::Language.tag())
            .find_map(|e| e.attr(slot.attribute()))
    }
}

/// Interpret an on/off element such as `<w:b/>` or `<w:b w:val="0"/>`.
pub(crate) fn toggle_value(element: &Element) -> bool {
    !matches!(
        element.attr("w:val"),
        Some("0") | Some("false") | Some("off")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_inserts_in_schema_order() {
        let mut bag = PropertyBag::new();
        bag.set(Element::new("w:lang").with_attr("w:val", "en-US"));
        bag.set(Element::new("w:b"));
        bag.set(Element::new("w:rFonts").with_attr("w:ascii", "Arial"));
        bag.set(Element::new("w:sz").with_attr("w:val", "24"));

        let names: Vec<_> = bag.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["w:rFonts", "w:b", "w:sz", "w:lang"]);
    }

    #[test]
    fn test_set_replaces_duplicates() {
        let mut bag = PropertyBag::new();
        bag.push(Element::new("w:lang").with_attr("w:val", "de-DE"));
        bag.push(Element::new("w:lang").with_attr("w:eastAsia", "ja-JP"));
        bag.set(Element::new("w:lang").with_attr("w:val", "en-US"));

        assert_eq!(bag.len(), 1);
        assert_eq!(bag.language(LanguageSlot::Default), Some("en-US"));
        assert_eq!(bag.language(LanguageSlot::EastAsian), None);
    }

    #[test]
    fn test_language_last_wins() {
        let mut bag = PropertyBag::new();
        bag.push(Element::new("w:lang").with_attr("w:val", "de-DE"));
        bag.push(Element::new("w:lang").with_attr("w:val", "fr-FR"));
        assert_eq!(bag.language(LanguageSlot::Default), Some("fr-FR"));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut bag = PropertyBag::new();
        assert_eq!(bag.remove(PropertyKind::Highlight), 0);
        bag.set(Element::new("w:highlight").with_attr("w:val", "yellow"));
        assert_eq!(bag.remove(PropertyKind::Highlight), 1);
        assert!(bag.is_empty());
    }

    #[test]
    fn test_toggle_values() {
        let mut bag = PropertyBag::new();
        assert_eq!(bag.toggle(PropertyKind::Bold), None);
        bag.set(Element::new("w:b"));
        assert_eq!(bag.toggle(PropertyKind::Bold), Some(true));
        bag.set(Element::new("w:b").with_attr("w:val", "0"));
        assert_eq!(bag.toggle(PropertyKind::Bold), Some(false));
        bag.set(Element::new("w:u").with_attr("w:val", "none"));
        assert_eq!(bag.underline(), Some(false));
        bag.set(Element::new("w:u").with_attr("w:val", "double"));
        assert_eq!(bag.underline(), Some(true));
    }

    #[test]
    fn test_element_conversion() {
        let rpr = Element::new("w:rPr")
            .with_child(Element::new("w:i"))
            .with_text("\n");
        let bag = PropertyBag::from_element(rpr);
        assert_eq!(bag.len(), 1);
        assert!(bag.to_element().is_some());
        assert!(PropertyBag::new().to_element().is_none());
    }
}
