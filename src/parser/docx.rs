//! Word package parser using zip and quick-xml.

use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::{Document, Metadata, Part, Source, StyleSheet};
use crate::xml::XmlDocument;

use super::options::{ErrorMode, ParseOptions};

const PACKAGE_RELS: &str = "_rels/.rels";
const DEFAULT_MAIN_PART: &str = "word/document.xml";
const DEFAULT_STYLES_PART: &str = "word/styles.xml";
const DEFAULT_CORE_PART: &str = "docProps/core.xml";

const REL_OFFICE_DOCUMENT: &str = "/officeDocument";
const REL_STYLES: &str = "/styles";
const REL_CORE_PROPERTIES: &str = "/core-properties";

/// Word document parser.
pub struct DocxParser {
    parts: Vec<Part>,
    options: ParseOptions,
}

impl DocxParser {
    /// Open a document file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a document file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Load a document from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Load a document from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        detect_format_from_bytes(data)?;

        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut parts = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.push(Part {
                name: file.name().to_string(),
                data,
                compression: file.compression(),
            });
        }
        log::debug!("Read {} package parts", parts.len());

        Ok(Self { parts, options })
    }

    /// Load a document from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Parse the package and return a Document.
    pub fn parse(&self) -> Result<Document> {
        let package_rels = self.part_xml(PACKAGE_RELS).transpose()?;
        let main_part = package_rels
            .as_ref()
            .and_then(|rels| relationship_target(rels, "", REL_OFFICE_DOCUMENT))
            .and_then(|name| self.part_name(&name))
            .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());

        let mut shell = self
            .part_xml(&main_part)
            .ok_or_else(|| Error::MissingPart(main_part.clone()))??;
        let body = shell
            .root
            .child_mut("w:body")
            .ok_or_else(|| Error::Malformed(format!("{} has no w:body", main_part)))?;
        let body_nodes = std::mem::take(&mut body.children);

        let mut document = Document::new();
        document.body = Document::body_from_nodes(body_nodes);

        let styles_part = self
            .part_xml(&rels_part_for(&main_part))
            .and_then(|rels| rels.ok())
            .and_then(|rels| relationship_target(&rels, parent_dir(&main_part), REL_STYLES))
            .or_else(|| Some(DEFAULT_STYLES_PART.to_string()))
            .and_then(|name| self.part_name(&name));
        document.styles = match styles_part.as_deref() {
            Some(name) => match self.optional_xml(name)? {
                Some(xml) => StyleSheet::from_xml(&xml),
                None => StyleSheet::new(),
            },
            None => StyleSheet::new(),
        };

        let core_part = package_rels
            .as_ref()
            .and_then(|rels| relationship_target(rels, "", REL_CORE_PROPERTIES))
            .or_else(|| Some(DEFAULT_CORE_PART.to_string()))
            .and_then(|name| self.part_name(&name));
        if self.options.read_metadata {
            if let Some(name) = core_part.as_deref() {
                if let Some(xml) = self.optional_xml(name)? {
                    document.metadata = Metadata::from_xml(&xml);
                }
            }
        }

        log::info!(
            "Loaded {} paragraphs, {} runs, {} styles",
            document.paragraph_count(),
            document.run_count(),
            document.styles.len()
        );

        document.source = Some(Source {
            parts: self.parts.clone(),
            main_part,
            shell,
            core_part,
            styles_part,
        });
        Ok(document)
    }

    fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Actual (archive-cased) name of a part.
    fn part_name(&self, name: &str) -> Option<String> {
        self.part(name).map(|p| p.name.clone())
    }

    fn part_xml(&self, name: &str) -> Option<Result<XmlDocument>> {
        self.part(name).map(|p| XmlDocument::parse(&p.data))
    }

    /// Parse an optional part, honoring the error mode.
    fn optional_xml(&self, name: &str) -> Result<Option<XmlDocument>> {
        match self.part_xml(name) {
            None => Ok(None),
            Some(Ok(xml)) => Ok(Some(xml)),
            Some(Err(e)) => match self.options.error_mode {
                ErrorMode::Strict => Err(e),
                ErrorMode::Lenient => {
                    log::warn!("Skipping unreadable part {}: {}", name, e);
                    Ok(None)
                }
            },
        }
    }
}

/// Relationships part that belongs to `part` (`word/document.xml` -> `word/_rels/document.xml.rels`).
pub(crate) fn rels_part_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

fn parent_dir(part: &str) -> &str {
    part.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Find the target of the first relationship whose type ends with `type_suffix`.
fn relationship_target(rels: &XmlDocument, base_dir: &str, type_suffix: &str) -> Option<String> {
    rels.root
        .elements()
        .filter(|e| e.local_name() == "Relationship")
        .filter(|e| e.attr("TargetMode") != Some("External"))
        .find(|e| e.attr("Type").is_some_and(|t| t.ends_with(type_suffix)))
        .and_then(|e| e.attr("Target"))
        .map(|target| resolve_target(base_dir, target))
}

/// Resolve a relationship target relative to the source part's directory.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
