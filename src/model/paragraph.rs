//! Paragraph and run types.

use super::properties::{LanguageSlot, PropertyBag, PropertyKind};
use super::traits::TraitSet;
use crate::xml::{Element, Node};
use serde::{Deserialize, Serialize};

/// A body-level paragraph (`w:p`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Attributes of the `w:p` element (revision ids etc.)
    pub attributes: Vec<(String, String)>,

    /// Paragraph properties (`w:pPr`), kept as an element
    properties: Option<Element>,

    /// Runs and everything else found inside the paragraph, in order
    pub content: Vec<ParagraphContent>,
}

/// Inline content of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphContent {
    /// A direct child run
    Run(Run),
    /// Anything else (hyperlinks, bookmarks, fields), kept verbatim
    Other(Node),
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_run(Run::new(text));
        p
    }

    /// Create a paragraph with the given style identifier.
    pub fn with_style(style_id: &str) -> Self {
        let mut p = Self::new();
        p.set_style_id(Some(style_id));
        p
    }

    pub(crate) fn from_element(element: Element) -> Self {
        let mut paragraph = Self {
            attributes: element.attributes,
            properties: None,
            content: Vec::new(),
        };
        for node in element.children {
            match node {
                Node::Element(e) if e.name == "w:pPr" && paragraph.properties.is_none() => {
                    paragraph.properties = Some(e);
                }
                Node::Element(e) if e.name == "w:r" => {
                    paragraph.content.push(ParagraphContent::Run(Run::from_element(e)));
                }
                other => paragraph.content.push(ParagraphContent::Other(other)),
            }
        }
        paragraph
    }

    pub(crate) fn to_element(&self) -> Element {
        let mut element = Element::new("w:p");
        element.attributes = self.attributes.clone();
        if let Some(ref ppr) = self.properties {
            if !ppr.children.is_empty() || !ppr.attributes.is_empty() {
                element.children.push(Node::Element(ppr.clone()));
            }
        }
        for item in &self.content {
            match item {
                ParagraphContent::Run(run) => element.children.push(Node::Element(run.to_element())),
                ParagraphContent::Other(node) => element.children.push(node.clone()),
            }
        }
        element
    }

    /// Add a run.
    pub fn add_run(&mut self, run: Run) {
        self.content.push(ParagraphContent::Run(run));
    }

    /// Add plain text as a new run.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.add_run(Run::new(text));
    }

    /// Iterate over direct runs.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|c| match c {
            ParagraphContent::Run(run) => Some(run),
            ParagraphContent::Other(_) => None,
        })
    }

    /// Iterate mutably over direct runs.
    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut Run> {
        self.content.iter_mut().filter_map(|c| match c {
            ParagraphContent::Run(run) => Some(run),
            ParagraphContent::Other(_) => None,
        })
    }

    /// Concatenated text of the direct runs.
    pub fn text(&self) -> String {
        self.runs().map(|r| r.text()).collect()
    }

    /// Paragraph style identifier (`w:pStyle`), if set explicitly.
    pub fn style_id(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.child("w:pStyle"))
            .and_then(|s| s.attr("w:val"))
    }

    /// Set or clear the paragraph style identifier.
    pub fn set_style_id(&mut self, style_id: Option<&str>) {
        match style_id {
            Some(id) => {
                let ppr = self.properties_mut();
                match ppr.child_mut("w:pStyle") {
                    Some(style) => style.set_attr("w:val", id),
                    // pStyle is the first child of pPr.
                    None => ppr
                        .children
                        .insert(0, Node::Element(Element::new("w:pStyle").with_attr("w:val", id))),
                }
            }
            None => {
                if let Some(ppr) = self.properties.as_mut() {
                    ppr.remove_children("w:pStyle");
                }
            }
        }
    }

    fn properties_mut(&mut self) -> &mut Element {
        self.properties.get_or_insert_with(|| Element::new("w:pPr"))
    }

    /// Read the geometry overrides set directly on the paragraph.
    pub fn geometry(&self) -> ParagraphGeometry {
        let Some(ppr) = self.properties.as_ref() else {
            return ParagraphGeometry::default();
        };
        let spacing = ppr.child("w:spacing");
        let indent = ppr.child("w:ind");
        let number = |element: Option<&Element>, names: &[&str]| -> Option<i32> {
            let element = element?;
            names
                .iter()
                .find_map(|name| element.attr(name))
                .and_then(|v| v.parse().ok())
        };

        ParagraphGeometry {
            line_spacing: number(spacing, &["w:line"]),
            space_before: number(spacing, &["w:before"]),
            space_after: number(spacing, &["w:after"]),
            alignment: ppr
                .child("w:jc")
                .and_then(|jc| jc.attr("w:val"))
                .and_then(Alignment::from_val),
            indent_left: number(indent, &["w:left", "w:start"]),
            indent_right: number(indent, &["w:right", "w:end"]),
            first_line_indent: number(indent, &["w:firstLine"])
                .or_else(|| number(indent, &["w:hanging"]).map(|h| -h)),
        }
    }

    /// Write geometry overrides. `None` fields are removed so the value
    /// falls back to the paragraph style.
    pub fn set_geometry(&mut self, geometry: &ParagraphGeometry) {
        let ppr = self.properties_mut();

        let spacing = ensure_child(ppr, "w:spacing");
        set_number(spacing, "w:line", geometry.line_spacing);
        if geometry.line_spacing.is_some() {
            spacing.set_attr("w:lineRule", "auto");
        } else {
            spacing.remove_attr("w:lineRule");
        }
        set_number(spacing, "w:before", geometry.space_before);
        set_number(spacing, "w:after", geometry.space_after);
        if geometry.space_before.is_none() {
            spacing.remove_attr("w:beforeAutospacing");
        }
        if geometry.space_after.is_none() {
            spacing.remove_attr("w:afterAutospacing");
        }

        let indent = ensure_child(ppr, "w:ind");
        set_number(indent, "w:left", geometry.indent_left);
        set_number(indent, "w:right", geometry.indent_right);
        indent.remove_attr("w:start");
        indent.remove_attr("w:end");
        indent.remove_attr("w:hanging");
        match geometry.first_line_indent {
            Some(v) if v < 0 => {
                indent.remove_attr("w:firstLine");
                indent.set_attr("w:hanging", (-v).to_string());
            }
            other => set_number(indent, "w:firstLine", other),
        }

        match geometry.alignment {
            Some(alignment) => ensure_child(ppr, "w:jc").set_attr("w:val", alignment.as_val()),
            None => {
                ppr.remove_children("w:jc");
            }
        }

        for name in ["w:spacing", "w:ind"] {
            if ppr.child(name).is_some_and(|e| e.attributes.is_empty()) {
                ppr.remove_children(name);
            }
        }
    }

    /// Remove the direct `w:spacing` and `w:jc` overrides, whatever they hold
    /// (`*Lines` forms, autospacing, fractional or unknown values).
    ///
    /// Returns whether anything was removed.
    pub fn clear_spacing_alignment(&mut self) -> bool {
        self.remove_properties(&["w:spacing", "w:jc"])
    }

    /// Remove the direct `w:ind` override, including its `*Chars` forms.
    pub fn clear_indents(&mut self) -> bool {
        self.remove_properties(&["w:ind"])
    }

    fn remove_properties(&mut self, names: &[&str]) -> bool {
        let Some(ppr) = self.properties.as_mut() else {
            return false;
        };
        names.iter().map(|name| ppr.remove_children(name)).sum::<usize>() > 0
    }
}

/// Schema position of the pPr children this module creates.
fn ppr_rank(name: &str) -> usize {
    const ORDER: &[&str] = &[
        "w:pStyle",
        "w:keepNext",
        "w:keepLines",
        "w:pageBreakBefore",
        "w:framePr",
        "w:widowControl",
        "w:numPr",
        "w:suppressLineNumbers",
        "w:pBdr",
        "w:shd",
        "w:tabs",
        "w:suppressAutoHyphens",
        "w:kinsoku",
        "w:wordWrap",
        "w:overflowPunct",
        "w:topLinePunct",
        "w:autoSpaceDE",
        "w:autoSpaceDN",
        "w:bidi",
        "w:adjustRightInd",
        "w:snapToGrid",
        "w:spacing",
        "w:ind",
        "w:contextualSpacing",
        "w:mirrorIndents",
        "w:suppressOverlap",
        "w:jc",
    ];
    ORDER.iter().position(|n| *n == name).unwrap_or(ORDER.len())
}

fn ensure_child<'a>(parent: &'a mut Element, name: &str) -> &'a mut Element {
    let index = match parent.children.iter().position(|n| matches!(n, Node::Element(e) if e.name == name)) {
        Some(index) => index,
        None => {
            let rank = ppr_rank(name);
            let index = parent
                .children
                .iter()
                .position(|n| matches!(n, Node::Element(e) if ppr_rank(&e.name) > rank))
                .unwrap_or(parent.children.len());
            parent.children.insert(index, Node::Element(Element::new(name)));
            index
        }
    };
    match &mut parent.children[index] {
        Node::Element(e) => e,
        _ => unreachable!("index points at an element"),
    }
}

fn set_number(element: &mut Element, name: &str, value: Option<i32>) {
    match value {
        Some(v) => element.set_attr(name, v.to_string()),
        None => {
            element.remove_attr(name);
        }
    }
}

/// Paragraph geometry overrides, in twentieths of a point (line spacing in 240ths of a line).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphGeometry {
    /// Line spacing
    pub line_spacing: Option<i32>,

    /// Space before the paragraph
    pub space_before: Option<i32>,

    /// Space after the paragraph
    pub space_after: Option<i32>,

    /// Text alignment
    pub alignment: Option<Alignment>,

    /// Left indent
    pub indent_left: Option<i32>,

    /// Right indent
    pub indent_right: Option<i32>,

    /// First-line indent (negative for hanging)
    pub first_line_indent: Option<i32>,
}

impl ParagraphGeometry {
    /// Check if no override is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl Alignment {
    fn from_val(val: &str) -> Option<Self> {
        match val {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "distribute" => Some(Alignment::Justify),
            _ => None,
        }
    }

    fn as_val(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

/// A run of text with one formatting state (`w:r`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    /// Attributes of the `w:r` element
    pub attributes: Vec<(String, String)>,

    properties: PropertyBag,

    /// Run content other than properties (`w:t`, `w:tab`, `w:br`, ...)
    content: Vec<Node>,
}

impl Run {
    /// Create a run with plain text.
    pub fn new(text: impl Into<String>) -> Self {
        let mut run = Self::default();
        run.set_text(&text.into());
        run
    }

    /// Create a run with text and traits.
    pub fn with_traits(text: impl Into<String>, traits: TraitSet) -> Self {
        let mut run = Self::new(text);
        run.set_traits(traits);
        run
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::with_traits(
            text,
            TraitSet {
                bold: true,
                ..Default::default()
            },
        )
    }

    /// Create an italic run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::with_traits(
            text,
            TraitSet {
                italic: true,
                ..Default::default()
            },
        )
    }

    pub(crate) fn from_element(element: Element) -> Self {
        let mut run = Self {
            attributes: element.attributes,
            ..Default::default()
        };
        let mut seen_properties = false;
        for node in element.children {
            match node {
                Node::Element(e) if e.name == "w:rPr" && !seen_properties => {
                    seen_properties = true;
                    run.properties = PropertyBag::from_element(e);
                }
                other => run.content.push(other),
            }
        }
        run
    }

    pub(crate) fn to_element(&self) -> Element {
        let mut element = Element::new("w:r");
        element.attributes = self.attributes.clone();
        if let Some(rpr) = self.properties.to_element() {
            element.children.push(Node::Element(rpr));
        }
        element.children.extend(self.content.iter().cloned());
        element
    }

    /// Text of the run. Tabs and breaks read as `\t` and `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.content {
            let Node::Element(e) = node else { continue };
            match e.name.as_str() {
                "w:t" => out.push_str(&e.text()),
                "w:tab" | "w:ptab" => out.push('\t'),
                "w:br" | "w:cr" => out.push('\n'),
                "w:noBreakHyphen" => out.push('-'),
                "w:softHyphen" => out.push('\u{00AD}'),
                _ => {}
            }
        }
        out
    }

    /// Length of the run text in characters.
    pub fn char_len(&self) -> usize {
        self.text().chars().count()
    }

    /// Replace the run's content with `text`.
    ///
    /// Tabs become `w:tab`, line breaks become `w:br`; everything else
    /// (drawings, field characters) is discarded along with the old text.
    pub fn set_text(&mut self, text: &str) {
        self.content.clear();
        let mut pending = String::new();
        for c in text.chars() {
            match c {
                '\t' | '\n' | '\r' => {
                    self.flush_text(&mut pending);
                    let name = if c == '\t' { "w:tab" } else { "w:br" };
                    self.content.push(Node::Element(Element::new(name)));
                }
                _ => pending.push(c),
            }
        }
        self.flush_text(&mut pending);
    }

    fn flush_text(&mut self, pending: &mut String) {
        if pending.is_empty() {
            return;
        }
        let mut t = Element::new("w:t");
        if pending.starts_with(char::is_whitespace) || pending.ends_with(char::is_whitespace) {
            t.set_attr("xml:space", "preserve");
        }
        t.set_text(pending);
        self.content.push(Node::Element(t));
        pending.clear();
    }

    /// Manual override properties.
    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    /// Manual override properties, mutably.
    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    /// Emphasis traits set directly on the run.
    pub fn traits(&self) -> TraitSet {
        let bag = &self.properties;
        TraitSet {
            bold: bag.toggle(PropertyKind::Bold).unwrap_or(false),
            italic: bag.toggle(PropertyKind::Italic).unwrap_or(false),
            underline: bag.underline().unwrap_or(false),
            strikethrough: bag.toggle(PropertyKind::Strike).unwrap_or(false),
        }
    }

    /// Express traits directly on the run.
    ///
    /// A trait that is already on is left untouched, so an existing
    /// underline style (double, wavy) survives; off traits are removed.
    pub fn set_traits(&mut self, traits: TraitSet) {
        self.set_toggle(PropertyKind::Bold, traits.bold);
        self.set_toggle(PropertyKind::Italic, traits.italic);
        self.set_toggle(PropertyKind::Strike, traits.strikethrough);

        if !traits.underline {
            self.properties.remove(PropertyKind::Underline);
        } else if self.properties.underline() != Some(true) {
            self.properties
                .set(Element::new(PropertyKind::Underline.tag()).with_attr("w:val", "single"));
        }
    }

    fn set_toggle(&mut self, kind: PropertyKind, on: bool) {
        if !on {
            self.properties.remove(kind);
        } else if self.properties.toggle(kind) != Some(true) {
            self.properties.set(Element::new(kind.tag()));
        }
    }

    /// Character style identifier (`w:rStyle`).
    pub fn character_style(&self) -> Option<&str> {
        self.properties
            .get(PropertyKind::CharacterStyle)
            .and_then(|s| s.attr("w:val"))
    }

    /// Set or clear the character style.
    pub fn set_character_style(&mut self, style_id: Option<&str>) {
        match style_id {
            Some(id) => self
                .properties
                .set(Element::new(PropertyKind::CharacterStyle.tag()).with_attr("w:val", id)),
            None => {
                self.properties.remove(PropertyKind::CharacterStyle);
            }
        }
    }

    /// Check if the run is hidden text.
    pub fn is_hidden(&self) -> bool {
        self.properties.toggle(PropertyKind::Hidden).unwrap_or(false)
    }

    /// Set or clear the hidden flag.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.set_toggle(PropertyKind::Hidden, hidden);
    }

    /// Read a language slot.
    pub fn language(&self, slot: LanguageSlot) -> Option<&str> {
        self.properties.language(slot)
    }

    /// Write `code` into all three language slots, replacing existing tags.
    pub fn set_language(&mut self, code: &str) {
        let mut lang = Element::new(PropertyKind::Language.tag());
        for slot in LanguageSlot::ALL {
            lang.set_attr(slot.attribute(), code);
        }
        self.properties.set(lang);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_text() {
        let mut p = Paragraph::new();
        p.add_text("Hello ");
        p.add_run(Run::bold("W"));
        p.add_text("orld");
        assert_eq!(p.text(), "Hello World");
        assert_eq!(p.runs().count(), 3);
    }

    #[test]
    fn test_run_text_special_characters() {
        let run = Run::new("a\tb\nc");
        assert_eq!(run.text(), "a\tb\nc");
        assert_eq!(run.char_len(), 5);

        let element = run.to_element();
        let names: Vec<_> = element.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["w:t", "w:tab", "w:t", "w:br", "w:t"]);
    }

    #[test]
    fn test_whitespace_preserved() {
        let run = Run::new(" padded ");
        let element = run.to_element();
        let t = element.child("w:t").unwrap();
        assert_eq!(t.attr("xml:space"), Some("preserve"));
        assert_eq!(run.text(), " padded ");
    }

    #[test]
    fn test_traits_roundtrip() {
        let traits = TraitSet {
            bold: true,
            underline: true,
            ..Default::default()
        };
        let mut run = Run::with_traits("x", traits);
        assert_eq!(run.traits(), traits);

        run.set_traits(TraitSet::NONE);
        assert_eq!(run.traits(), TraitSet::NONE);
        assert!(run.properties().is_empty());
    }

    #[test]
    fn test_set_traits_keeps_underline_detail() {
        let mut run = Run::new("x");
        run.properties_mut()
            .set(Element::new("w:u").with_attr("w:val", "double"));
        run.set_traits(TraitSet {
            underline: true,
            ..Default::default()
        });
        let u = run.properties().get(PropertyKind::Underline).unwrap();
        assert_eq!(u.attr("w:val"), Some("double"));
    }

    #[test]
    fn test_explicit_off_toggle_reads_false() {
        let mut run = Run::new("x");
        run.properties_mut()
            .set(Element::new("w:b").with_attr("w:val", "false"));
        assert!(!run.traits().bold);
    }

    #[test]
    fn test_style_id() {
        let mut p = Paragraph::with_text("x");
        assert_eq!(p.style_id(), None);
        p.set_style_id(Some("BodyText"));
        assert_eq!(p.style_id(), Some("BodyText"));
        p.set_style_id(Some("Heading1"));
        assert_eq!(p.style_id(), Some("Heading1"));
        p.set_style_id(None);
        assert_eq!(p.style_id(), None);
    }

    #[test]
    fn test_geometry_roundtrip() {
        let mut p = Paragraph::with_style("BodyText");
        let geometry = ParagraphGeometry {
            line_spacing: Some(360),
            space_before: Some(120),
            space_after: Some(0),
            alignment: Some(Alignment::Justify),
            indent_left: Some(720),
            indent_right: None,
            first_line_indent: Some(-360),
        };
        p.set_geometry(&geometry);
        assert_eq!(p.geometry(), geometry);

        p.set_geometry(&ParagraphGeometry::default());
        assert!(p.geometry().is_empty());
        assert_eq!(p.style_id(), Some("BodyText"));

        let element = p.to_element();
        let ppr = element.child("w:pPr").unwrap();
        assert_eq!(ppr.elements().count(), 1);
    }

    #[test]
    fn test_element_roundtrip_keeps_other_content() {
        let element = Element::new("w:p")
            .with_attr("w:rsidR", "00AB")
            .with_child(Element::new("w:bookmarkStart").with_attr("w:id", "0"))
            .with_child(Element::new("w:r").with_child(Element::new("w:t").with_text("Hi")))
            .with_child(Element::new("w:bookmarkEnd").with_attr("w:id", "0"));
        let p = Paragraph::from_element(element.clone());
        assert_eq!(p.text(), "Hi");
        assert_eq!(p.to_element(), element);
    }

    #[test]
    fn test_language_slots() {
        let mut run = Run::new("x");
        run.set_language("en-US");
        run.set_language("en-US");
        for slot in LanguageSlot::ALL {
            assert_eq!(run.language(slot), Some("en-US"));
        }
        assert_eq!(run.properties().len(), 1);
    }
}
