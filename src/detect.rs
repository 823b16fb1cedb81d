//! Word package detection and validation.

use crate::error::{Error, Result};
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// Kind of word-processing package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocxKind {
    /// Regular document (`.docx`)
    Document,
    /// Macro-enabled document (`.docm`)
    MacroEnabled,
    /// Template (`.dotx` / `.dotm`)
    Template,
}

/// Package format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxFormat {
    /// Package kind
    pub kind: DocxKind,
    /// Number of parts in the archive
    pub part_count: usize,
}

impl std::fmt::Display for DocxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.kind {
            DocxKind::Document => "Word document",
            DocxKind::MacroEnabled => "Word macro-enabled document",
            DocxKind::Template => "Word template",
        };
        write!(f, "{} ({} parts)", label, self.part_count)
    }
}

/// Zip local file header magic.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const CONTENT_TYPES: &str = "[Content_Types].xml";
const MAIN_PART: &str = "word/document.xml";

const MAIN_CONTENT_TYPE: &str = "wordprocessingml.document.main+xml";
const MACRO_CONTENT_TYPE: &str = "ms-word.document.macroEnabled.main+xml";
const TEMPLATE_CONTENT_TYPES: [&str; 2] = [
    "wordprocessingml.template.main+xml",
    "ms-word.template.macroEnabledTemplate.main+xml",
];

/// Detect the package format from a file path.
///
/// # Example
/// ```no_run
/// use docnorm::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("report.docx").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocxFormat> {
    let data = std::fs::read(path)?;
    detect_format_from_bytes(&data)
}

/// Detect the package format from the complete file bytes.
///
/// Returns `Err(Error::UnknownFormat)` when the data is not a zip archive
/// or the archive holds no word-processing main part.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocxFormat> {
    if !data.starts_with(ZIP_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|_| Error::UnknownFormat)?;
    let part_count = archive.len();

    let content_types = match archive.by_name(CONTENT_TYPES) {
        Ok(mut file) => {
            let mut text = String::new();
            file.read_to_string(&mut text)?;
            Some(text)
        }
        Err(_) => None,
    };

    let kind = match content_types.as_deref().and_then(kind_from_content_types) {
        Some(kind) => kind,
        None if archive.by_name(MAIN_PART).is_ok() => DocxKind::Document,
        None => return Err(Error::UnknownFormat),
    };

    Ok(DocxFormat { kind, part_count })
}

fn kind_from_content_types(content_types: &str) -> Option<DocxKind> {
    if TEMPLATE_CONTENT_TYPES.iter().any(|t| content_types.contains(t)) {
        Some(DocxKind::Template)
    } else if content_types.contains(MACRO_CONTENT_TYPE) {
        Some(DocxKind::MacroEnabled)
    } else if content_types.contains(MAIN_CONTENT_TYPE) {
        Some(DocxKind::Document)
    } else {
        None
    }
}

/// Check if a file is a word-processing package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes hold a word-processing package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn package(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_detect_document() {
        let data = package(&[
            (
                CONTENT_TYPES,
                r#"<Types><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#,
            ),
            (MAIN_PART, "<w:document/>"),
        ]);
        let format = detect_format_from_bytes(&data).unwrap();
        assert_eq!(format.kind, DocxKind::Document);
        assert_eq!(format.part_count, 2);
    }

    #[test]
    fn test_detect_template() {
        let data = package(&[(
            CONTENT_TYPES,
            r#"<Types><Override ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml"/></Types>"#,
        )]);
        assert_eq!(detect_format_from_bytes(&data).unwrap().kind, DocxKind::Template);
    }

    #[test]
    fn test_detect_without_content_types() {
        let data = package(&[(MAIN_PART, "<w:document/>")]);
        assert_eq!(detect_format_from_bytes(&data).unwrap().kind, DocxKind::Document);
    }

    #[test]
    fn test_detect_other_zip() {
        let data = package(&[("xl/workbook.xml", "<workbook/>")]);
        assert!(matches!(detect_format_from_bytes(&data), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_format_from_bytes(b"%PDF-1.7");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_is_docx_bytes() {
        assert!(is_docx_bytes(&package(&[(MAIN_PART, "<w:document/>")])));
        assert!(!is_docx_bytes(b"PK\x03\x04 truncated"));
        assert!(!is_docx_bytes(b""));
    }
}
