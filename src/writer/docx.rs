//! Word package writer.

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::model::{Document, Part, Source};
use crate::parser::rels_part_for;
use crate::xml::{Element, Node, XmlDocument};

const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_CORE: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
const NS_DCTERMS: &str = "http://purl.org/dc/terms/";
const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

const REL_TYPE_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const REL_TYPE_CORE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

/// Serialize a document into `.docx` bytes.
///
/// Documents loaded from a package are written back into that package:
/// only the main part, the styles part and the core properties change,
/// every other part is copied with its original compression.
pub fn to_bytes(doc: &Document) -> Result<Vec<u8>> {
    let parts = match doc.source {
        Some(ref source) => updated_parts(doc, source)?,
        None => new_package(doc)?,
    };
    write_package(&parts)
}

/// Save a document to `path`.
///
/// The package is serialized in memory first and then written to a
/// temporary file in the destination directory, which replaces the
/// destination only once it is complete.
pub fn save<P: AsRef<Path>>(doc: &Document, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(doc)?;

    let save_error = |reason: String| Error::Save {
        path: path.to_path_buf(),
        reason,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| save_error(e.to_string()))?;
    file.write_all(&bytes).map_err(|e| save_error(e.to_string()))?;
    file.flush().map_err(|e| save_error(e.to_string()))?;
    file.persist(path).map_err(|e| save_error(e.error.to_string()))?;

    log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn updated_parts(doc: &Document, source: &Source) -> Result<Vec<Part>> {
    let mut parts = source.parts.clone();

    let mut main = source.shell.clone();
    let body = main
        .root
        .child_mut("w:body")
        .ok_or_else(|| Error::Malformed(format!("{} has no w:body", source.main_part)))?;
    *body = doc.body_to_element(std::mem::take(body));
    replace_part(&mut parts, &source.main_part, main.to_bytes()?);

    if let Some(ref name) = source.core_part {
        if let Some(data) = part_data(&parts, name) {
            let mut core = XmlDocument::parse(data)?;
            doc.metadata.apply_to_xml(&mut core);
            replace_part(&mut parts, name, core.to_bytes()?);
        }
    } else if !doc.metadata.populated_fields().is_empty() {
        log::debug!("Package has no core properties part; metadata not written");
    }

    let added: Vec<Element> = doc.styles.added_styles().map(|s| s.to_element()).collect();
    if !added.is_empty() {
        match source.styles_part {
            Some(ref name) => {
                if let Some(data) = part_data(&parts, name) {
                    let mut styles = XmlDocument::parse(data)?;
                    append_styles(&mut styles.root, added);
                    replace_part(&mut parts, name, styles.to_bytes()?);
                }
            }
            None => add_styles_part(&mut parts, doc, &source.main_part)?,
        }
    }

    Ok(parts)
}

fn append_styles(root: &mut Element, added: Vec<Element>) {
    for style in added {
        let id = style.attr("w:styleId").unwrap_or_default().to_string();
        let exists = root
            .elements()
            .any(|e| e.name == "w:style" && e.attr("w:styleId") == Some(id.as_str()));
        if !exists {
            log::debug!("Adding style definition {:?}", id);
            root.children.push(Node::Element(style));
        }
    }
}

/// Add a styles part (and its relationship) to a package that had none.
fn add_styles_part(parts: &mut Vec<Part>, doc: &Document, main_part: &str) -> Result<()> {
    let dir = main_part.rsplit_once('/').map_or("", |(dir, _)| dir);
    let styles_name = if dir.is_empty() {
        "styles.xml".to_string()
    } else {
        format!("{}/styles.xml", dir)
    };

    let rels_name = rels_part_for(main_part);
    let mut rels = match part_data(parts, &rels_name) {
        Some(data) => XmlDocument::parse(data)?,
        None => XmlDocument::with_root(Element::new("Relationships").with_attr("xmlns", NS_PACKAGE_REL)),
    };
    let id = next_relationship_id(&rels.root);
    rels.root.children.push(Node::Element(relationship(
        &id,
        &format!("{}/styles", REL_TYPE_BASE),
        "styles.xml",
    )));
    replace_part(parts, &rels_name, rels.to_bytes()?);

    if let Some(data) = part_data(parts, "[Content_Types].xml") {
        let mut types = XmlDocument::parse(data)?;
        types.root.children.push(Node::Element(override_type(
            &styles_name,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
        )));
        replace_part(parts, "[Content_Types].xml", types.to_bytes()?);
    }

    replace_part(parts, &styles_name, styles_xml(doc).to_bytes()?);
    Ok(())
}

fn next_relationship_id(rels: &Element) -> String {
    let max = rels
        .elements()
        .filter_map(|e| e.attr("Id"))
        .filter_map(|id| id.strip_prefix("rId"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("rId{}", max + 1)
}

fn part_data<'a>(parts: &'a [Part], name: &str) -> Option<&'a [u8]> {
    parts
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .map(|p| p.data.as_slice())
}

/// Replace a part's data in place, or append a new deflated part.
fn replace_part(parts: &mut Vec<Part>, name: &str, data: Vec<u8>) {
    match parts.iter_mut().find(|p| p.name.eq_ignore_ascii_case(name)) {
        Some(part) => part.data = data,
        None => parts.push(Part {
            name: name.to_string(),
            data,
            compression: CompressionMethod::Deflated,
        }),
    }
}

fn write_package(parts: &[Part]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for part in parts {
        let compression = match part.compression {
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };
        let options = SimpleFileOptions::default().compression_method(compression);
        zip.start_file(part.name.as_str(), options)?;
        zip.write_all(&part.data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Minimal package for a document created in memory.
fn new_package(doc: &Document) -> Result<Vec<Part>> {
    let mut parts = Vec::new();

    let types = Element::new("Types")
        .with_attr("xmlns", NS_CONTENT_TYPES)
        .with_child(
            Element::new("Default")
                .with_attr("Extension", "rels")
                .with_attr("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        )
        .with_child(
            Element::new("Default")
                .with_attr("Extension", "xml")
                .with_attr("ContentType", "application/xml"),
        )
        .with_child(override_type(
            "word/document.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        ))
        .with_child(override_type(
            "word/styles.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
        ))
        .with_child(override_type(
            "docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml",
        ));
    replace_part(&mut parts, "[Content_Types].xml", XmlDocument::with_root(types).to_bytes()?);

    let package_rels = Element::new("Relationships")
        .with_attr("xmlns", NS_PACKAGE_REL)
        .with_child(relationship(
            "rId1",
            &format!("{}/officeDocument", REL_TYPE_BASE),
            "word/document.xml",
        ))
        .with_child(relationship("rId2", REL_TYPE_CORE, "docProps/core.xml"));
    replace_part(&mut parts, "_rels/.rels", XmlDocument::with_root(package_rels).to_bytes()?);

    let body = doc.body_to_element(Element::new("w:body"));
    let main = Element::new("w:document")
        .with_attr("xmlns:w", NS_MAIN)
        .with_attr("xmlns:r", NS_REL)
        .with_child(body);
    replace_part(&mut parts, "word/document.xml", XmlDocument::with_root(main).to_bytes()?);

    let document_rels = Element::new("Relationships")
        .with_attr("xmlns", NS_PACKAGE_REL)
        .with_child(relationship("rId1", &format!("{}/styles", REL_TYPE_BASE), "styles.xml"));
    replace_part(
        &mut parts,
        "word/_rels/document.xml.rels",
        XmlDocument::with_root(document_rels).to_bytes()?,
    );

    replace_part(&mut parts, "word/styles.xml", styles_xml(doc).to_bytes()?);
    replace_part(&mut parts, "docProps/core.xml", core_xml(doc).to_bytes()?);

    Ok(parts)
}

fn styles_xml(doc: &Document) -> XmlDocument {
    let mut root = Element::new("w:styles").with_attr("xmlns:w", NS_MAIN);
    for style in doc.styles.iter() {
        root.children.push(Node::Element(style.to_element()));
    }
    XmlDocument::with_root(root)
}

fn core_xml(doc: &Document) -> XmlDocument {
    let root = Element::new("cp:coreProperties")
        .with_attr("xmlns:cp", NS_CORE)
        .with_attr("xmlns:dc", NS_DC)
        .with_attr("xmlns:dcterms", NS_DCTERMS)
        .with_attr("xmlns:xsi", NS_XSI);
    let mut core = XmlDocument::with_root(root);
    doc.metadata.apply_to_xml(&mut core);

    for (name, date) in [
        ("dcterms:created", doc.metadata.created),
        ("dcterms:modified", doc.metadata.modified),
    ] {
        if let Some(date) = date {
            core.root.children.push(Node::Element(
                Element::new(name)
                    .with_attr("xsi:type", "dcterms:W3CDTF")
                    .with_text(date.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
            ));
        }
    }
    core
}

fn relationship(id: &str, kind: &str, target: &str) -> Element {
    Element::new("Relationship")
        .with_attr("Id", id)
        .with_attr("Type", kind)
        .with_attr("Target", target)
}

fn override_type(part: &str, content_type: &str) -> Element {
    Element::new("Override")
        .with_attr("PartName", format!("/{}", part))
        .with_attr("ContentType", content_type)
}
