//! Style definitions (`word/styles.xml`).

use super::properties::{toggle_value, PropertyBag, PropertyKind};
use crate::xml::{Element, XmlDocument};
use serde::{Deserialize, Serialize};

/// Kind of a style definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    /// Paragraph style
    Paragraph,
    /// Character (run) style
    Character,
    /// Table style
    Table,
    /// Numbering style
    Numbering,
}

impl StyleKind {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("character") => StyleKind::Character,
            Some("table") => StyleKind::Table,
            Some("numbering") => StyleKind::Numbering,
            _ => StyleKind::Paragraph,
        }
    }
}

/// A single style definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Style identifier referenced from paragraphs and runs
    pub id: String,

    /// UI name (e.g. "Heading 1")
    pub name: String,

    /// Style kind
    pub kind: StyleKind,

    /// Whether this is the default style of its kind
    pub is_default: bool,

    /// Parent style identifier
    pub based_on: Option<String>,

    /// Run properties defined by the style
    pub run_properties: PropertyBag,

    /// Created by the normalizer, not yet present in the package
    pub(crate) added: bool,
}

impl Style {
    /// Create a paragraph style.
    pub fn paragraph(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: StyleKind::Paragraph,
            is_default: false,
            based_on: None,
            run_properties: PropertyBag::new(),
            added: false,
        }
    }

    /// Create a character style.
    pub fn character(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: StyleKind::Character,
            ..Self::paragraph(id, name)
        }
    }

    fn from_element(element: &Element) -> Option<Self> {
        let id = element.attr("w:styleId")?.to_string();
        let name = element
            .child("w:name")
            .and_then(|n| n.attr("w:val"))
            .map(ui_name)
            .unwrap_or_else(|| id.clone());
        let run_properties = element
            .child("w:rPr")
            .cloned()
            .map(PropertyBag::from_element)
            .unwrap_or_default();

        Some(Self {
            id,
            name,
            kind: StyleKind::from_attr(element.attr("w:type")),
            is_default: element.attr("w:default").is_some_and(|v| v == "1" || v == "true"),
            based_on: element
                .child("w:basedOn")
                .and_then(|b| b.attr("w:val"))
                .map(str::to_string),
            run_properties,
            added: false,
        })
    }

    /// Serialize as a `w:style` element.
    pub(crate) fn to_element(&self) -> Element {
        let kind = match self.kind {
            StyleKind::Paragraph => "paragraph",
            StyleKind::Character => "character",
            StyleKind::Table => "table",
            StyleKind::Numbering => "numbering",
        };
        let mut element = Element::new("w:style")
            .with_attr("w:type", kind)
            .with_attr("w:styleId", self.id.as_str());
        if self.is_default {
            element.set_attr("w:default", "1");
        }
        element = element.with_child(Element::new("w:name").with_attr("w:val", internal_name(&self.name)));
        if let Some(ref parent) = self.based_on {
            element = element
                .with_child(Element::new("w:basedOn").with_attr("w:val", parent.as_str()))
                .with_child(Element::new("w:next").with_attr("w:val", parent.as_str()));
        }
        element = element.with_child(Element::new("w:qFormat"));
        if let Some(level) = heading_level(&self.name) {
            element = element.with_child(
                Element::new("w:pPr")
                    .with_child(Element::new("w:keepNext"))
                    .with_child(Element::new("w:outlineLvl").with_attr("w:val", (level - 1).to_string())),
            );
        }
        if let Some(rpr) = self.run_properties.to_element() {
            element = element.with_child(rpr);
        }
        element
    }
}

/// Map Word's internal lowercase built-in names to their UI names.
pub fn ui_name(internal: &str) -> String {
    if let Some(level) = internal.strip_prefix("heading ") {
        return format!("Heading {}", level);
    }
    match internal {
        "caption" => "Caption".to_string(),
        "footer" => "Footer".to_string(),
        "header" => "Header".to_string(),
        "title" => "Title".to_string(),
        "subtitle" => "Subtitle".to_string(),
        _ => internal.to_string(),
    }
}

fn internal_name(ui: &str) -> String {
    if heading_level(ui).is_some() {
        return ui.to_lowercase();
    }
    ui.to_string()
}

fn heading_level(name: &str) -> Option<u8> {
    name.strip_prefix("Heading ")?
        .parse::<u8>()
        .ok()
        .filter(|l| (1..=9).contains(l))
}

/// The set of styles defined by a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    styles: Vec<Style>,
}

impl StyleSheet {
    /// Create an empty style sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Style sheet with the canonical paragraph styles, used for new documents.
    pub fn builtin() -> Self {
        let mut normal = Style::paragraph("Normal", "Normal");
        normal.is_default = true;

        let mut sheet = Self::new();
        sheet.add(normal);
        for (id, name, size) in [("Heading1", "Heading 1", "32"), ("Heading2", "Heading 2", "26")] {
            let mut heading = Style::paragraph(id, name);
            heading.based_on = Some("Normal".to_string());
            heading.run_properties.set(Element::new("w:b"));
            heading.run_properties.set(Element::new("w:sz").with_attr("w:val", size));
            sheet.add(heading);
        }
        sheet
    }

    /// Parse the styles part.
    pub fn from_xml(xml: &XmlDocument) -> Self {
        let styles = xml
            .root
            .elements()
            .filter(|e| e.name == "w:style")
            .filter_map(Style::from_element)
            .collect();
        Self { styles }
    }

    /// Add a style definition.
    pub fn add(&mut self, style: Style) {
        self.styles.push(style);
    }

    /// All styles.
    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.styles.iter()
    }

    /// Number of styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if no styles are defined.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Get a style by identifier.
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.id == id)
    }

    /// Get a style by kind and UI name.
    pub fn by_name(&self, kind: StyleKind, name: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.kind == kind && s.name == name)
    }

    /// The default paragraph style.
    pub fn default_paragraph_style(&self) -> Option<&Style> {
        self.styles
            .iter()
            .find(|s| s.kind == StyleKind::Paragraph && s.is_default)
    }

    /// Resolve the UI name of a paragraph's style reference.
    ///
    /// Missing or unknown references fall back to the default paragraph style.
    pub fn paragraph_style_name(&self, id: Option<&str>) -> String {
        id.and_then(|id| self.get(id))
            .filter(|s| s.kind == StyleKind::Paragraph)
            .or_else(|| self.default_paragraph_style())
            .map_or_else(|| "Normal".to_string(), |s| s.name.clone())
    }

    /// Identifier of the paragraph style named `name`, adding a definition when missing.
    pub fn ensure_paragraph_style(&mut self, name: &str) -> String {
        if let Some(style) = self.by_name(StyleKind::Paragraph, name) {
            return style.id.clone();
        }

        let id: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        log::warn!("Style {:?} is not defined; adding it as {:?}", name, id);

        let mut style = Style::paragraph(id.clone(), name);
        style.based_on = self.default_paragraph_style().map(|s| s.id.clone());
        if heading_level(name).is_some() {
            style.run_properties.set(Element::new("w:b"));
        }
        style.added = true;
        self.styles.push(style);
        id
    }

    /// Styles created by the normalizer that the package does not define yet.
    pub fn added_styles(&self) -> impl Iterator<Item = &Style> {
        self.styles.iter().filter(|s| s.added)
    }

    /// Read an on/off property through a character style and its `basedOn` chain.
    pub fn character_toggle(&self, id: &str, kind: PropertyKind) -> Option<bool> {
        self.resolve(id, |bag| bag.get(kind).map(toggle_value))
    }

    /// Read the underline state through a character style chain.
    pub fn character_underline(&self, id: &str) -> Option<bool> {
        self.resolve(id, PropertyBag::underline)
    }

    fn resolve<F>(&self, id: &str, read: F) -> Option<bool>
    where
        F: Fn(&PropertyBag) -> Option<bool>,
    {
        let mut current = self.get(id);
        let mut depth = 0;
        while let Some(style) = current {
            if let Some(value) = read(&style.run_properties) {
                return Some(value);
            }
            depth += 1;
            if depth > self.styles.len() {
                break;
            }
            current = style.based_on.as_deref().and_then(|parent| self.get(parent));
        }
        None
    }
}
