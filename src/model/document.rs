//! Document-level types.

use super::{Paragraph, StyleSheet};
use crate::xml::{Element, Node, XmlDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A word-processing document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Core properties (title, author, etc.)
    pub metadata: Metadata,

    /// Style definitions
    pub styles: StyleSheet,

    /// Body content in order
    pub body: Vec<BodyContent>,

    /// Package the document was loaded from
    pub(crate) source: Option<Source>,
}

/// Parts of the loaded package needed to write the document back.
#[derive(Debug, Clone)]
pub(crate) struct Source {
    /// Every part of the zip, in archive order
    pub parts: Vec<Part>,

    /// Name of the main document part
    pub main_part: String,

    /// Main document XML with an emptied `w:body`
    pub shell: XmlDocument,

    /// Name of the core properties part, if any
    pub core_part: Option<String>,

    /// Name of the styles part, if any
    pub styles_part: Option<String>,
}

/// A raw package part.
#[derive(Debug, Clone)]
pub(crate) struct Part {
    pub name: String,
    pub data: Vec<u8>,
    pub compression: zip::CompressionMethod,
}

/// A child of `w:body`.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyContent {
    /// A paragraph
    Paragraph(Paragraph),
    /// Anything else (tables, section properties), kept verbatim
    Other(Node),
}

impl Document {
    /// Create a new empty document with the canonical styles.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            styles: StyleSheet::builtin(),
            body: Vec::new(),
            source: None,
        }
    }

    pub(crate) fn body_from_nodes(nodes: Vec<Node>) -> Vec<BodyContent> {
        nodes
            .into_iter()
            .map(|node| match node {
                Node::Element(e) if e.name == "w:p" => BodyContent::Paragraph(Paragraph::from_element(e)),
                other => BodyContent::Other(other),
            })
            .collect()
    }

    pub(crate) fn body_to_element(&self, mut body: Element) -> Element {
        body.children = self
            .body
            .iter()
            .map(|item| match item {
                BodyContent::Paragraph(p) => Node::Element(p.to_element()),
                BodyContent::Other(node) => node.clone(),
            })
            .collect();
        body
    }

    /// Add a paragraph at the end of the body.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.body.push(BodyContent::Paragraph(paragraph));
    }

    /// Iterate over body-level paragraphs in order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|b| match b {
            BodyContent::Paragraph(p) => Some(p),
            BodyContent::Other(_) => None,
        })
    }

    /// Iterate mutably over body-level paragraphs in order.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.body.iter_mut().filter_map(|b| match b {
            BodyContent::Paragraph(p) => Some(p),
            BodyContent::Other(_) => None,
        })
    }

    /// Number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().count()
    }

    /// Number of runs across all paragraphs.
    pub fn run_count(&self) -> usize {
        self.paragraphs().map(|p| p.runs().count()).sum()
    }

    /// Check if the document has no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraph_count() == 0
    }

    /// UI name of a paragraph's style.
    pub fn style_name(&self, paragraph: &Paragraph) -> String {
        self.styles.paragraph_style_name(paragraph.style_id())
    }

    /// Get plain text content of the document, one paragraph per line.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Named core-property fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    /// Document title
    Title,
    /// Subject
    Subject,
    /// Author (creator)
    Author,
    /// Keywords
    Keywords,
    /// Comments (description)
    Comments,
    /// Last modified by
    LastModifiedBy,
    /// Category
    Category,
}

impl MetadataField {
    /// All text fields.
    pub const ALL: [MetadataField; 7] = [
        MetadataField::Title,
        MetadataField::Subject,
        MetadataField::Author,
        MetadataField::Keywords,
        MetadataField::Comments,
        MetadataField::LastModifiedBy,
        MetadataField::Category,
    ];

    /// Qualified element name in `docProps/core.xml`.
    pub fn element_name(self) -> &'static str {
        match self {
            MetadataField::Title => "dc:title",
            MetadataField::Subject => "dc:subject",
            MetadataField::Author => "dc:creator",
            MetadataField::Keywords => "cp:keywords",
            MetadataField::Comments => "dc:description",
            MetadataField::LastModifiedBy => "cp:lastModifiedBy",
            MetadataField::Category => "cp:category",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MetadataField::Title => "Title",
            MetadataField::Subject => "Subject",
            MetadataField::Author => "Author",
            MetadataField::Keywords => "Keywords",
            MetadataField::Comments => "Comments",
            MetadataField::LastModifiedBy => "Last modified by",
            MetadataField::Category => "Category",
        };
        f.write_str(label)
    }
}

/// Document core properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Comments
    pub comments: Option<String>,

    /// Last author to save the document
    pub last_modified_by: Option<String>,

    /// Category
    pub category: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Parse `docProps/core.xml`.
    pub fn from_xml(xml: &XmlDocument) -> Self {
        let mut metadata = Self::default();
        for field in MetadataField::ALL {
            if let Some(element) = xml.root.child(field.element_name()) {
                metadata.set(field, Some(element.text()));
            }
        }
        metadata.created = read_date(xml, "dcterms:created");
        metadata.modified = read_date(xml, "dcterms:modified");
        metadata
    }

    /// Write text fields into an existing core-properties part.
    ///
    /// Fields present in the part are overwritten (cleared fields become
    /// empty elements); fields missing from the part are appended when set.
    pub(crate) fn apply_to_xml(&self, xml: &mut XmlDocument) {
        for field in MetadataField::ALL {
            let value = self.get(field).unwrap_or_default();
            match xml.root.child_mut(field.element_name()) {
                Some(element) => element.set_text(value),
                None if !value.is_empty() => xml.root.children.push(Node::Element(
                    Element::new(field.element_name()).with_text(value),
                )),
                None => {}
            }
        }
    }

    /// Get a text field.
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        let value = match field {
            MetadataField::Title => &self.title,
            MetadataField::Subject => &self.subject,
            MetadataField::Author => &self.author,
            MetadataField::Keywords => &self.keywords,
            MetadataField::Comments => &self.comments,
            MetadataField::LastModifiedBy => &self.last_modified_by,
            MetadataField::Category => &self.category,
        };
        value.as_deref()
    }

    /// Set a text field.
    pub fn set(&mut self, field: MetadataField, value: Option<String>) {
        let slot = match field {
            MetadataField::Title => &mut self.title,
            MetadataField::Subject => &mut self.subject,
            MetadataField::Author => &mut self.author,
            MetadataField::Keywords => &mut self.keywords,
            MetadataField::Comments => &mut self.comments,
            MetadataField::LastModifiedBy => &mut self.last_modified_by,
            MetadataField::Category => &mut self.category,
        };
        *slot = value;
    }

    /// Clear a text field to empty.
    pub fn clear(&mut self, field: MetadataField) {
        self.set(field, Some(String::new()));
    }

    /// Fields that currently hold a non-empty value.
    pub fn populated_fields(&self) -> Vec<MetadataField> {
        MetadataField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_some_and(|v| !v.is_empty()))
            .collect()
    }
}

fn read_date(xml: &XmlDocument, name: &str) -> Option<DateTime<Utc>> {
    let text = xml.root.child(name)?.text();
    match DateTime::parse_from_rfc3339(text.trim()) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            log::warn!("Ignoring unreadable {} date {:?}: {}", name, text, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORE: &str = r#"<cp:coreProperties xmlns:cp="urn:cp" xmlns:dc="urn:dc" xmlns:dcterms="urn:dcterms"><dc:title>Report</dc:title><dc:creator>Jane Roe</dc:creator><cp:lastModifiedBy>Sam</cp:lastModifiedBy><dcterms:created>2024-03-01T10:00:00Z</dcterms:created><dcterms:modified>garbage</dcterms:modified></cp:coreProperties>"#;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.run_count(), 0);
        assert!(doc.styles.default_paragraph_style().is_some());
    }

    #[test]
    fn test_plain_text() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("One"));
        doc.add_paragraph(Paragraph::with_text("Two"));
        assert_eq!(doc.plain_text(), "One\nTwo");
        assert_eq!(doc.paragraph_count(), 2);
    }

    #[test]
    fn test_metadata_from_xml() {
        let xml = XmlDocument::parse(CORE.as_bytes()).unwrap();
        let metadata = Metadata::from_xml(&xml);
        assert_eq!(metadata.title.as_deref(), Some("Report"));
        assert_eq!(metadata.author.as_deref(), Some("Jane Roe"));
        assert_eq!(metadata.keywords, None);
        assert!(metadata.created.is_some());
        assert!(metadata.modified.is_none());
    }

    #[test]
    fn test_metadata_apply_clears_present_fields() {
        let mut xml = XmlDocument::parse(CORE.as_bytes()).unwrap();
        let mut metadata = Metadata::from_xml(&xml);
        metadata.clear(MetadataField::Author);
        metadata.clear(MetadataField::Keywords);
        metadata.apply_to_xml(&mut xml);

        assert_eq!(xml.root.child("dc:creator").unwrap().text(), "");
        assert!(xml.root.child("cp:keywords").is_none());
        assert_eq!(xml.root.child("dc:title").unwrap().text(), "Report");
    }

    #[test]
    fn test_populated_fields() {
        let mut metadata = Metadata::default();
        metadata.title = Some("T".to_string());
        metadata.comments = Some(String::new());
        assert_eq!(metadata.populated_fields(), vec![MetadataField::Title]);
    }
}
