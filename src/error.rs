//! Error types for docnorm library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docnorm operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, normalizing or saving a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input path does not exist.
    #[error("{} not found", .0.display())]
    InputNotFound(PathBuf),

    /// The file is not a word-processing package.
    #[error("Unknown file format: not a valid Word document")]
    UnknownFormat,

    /// Error reading or writing the zip container.
    #[error("Package error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Error parsing or writing XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A required package part is missing.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// The document structure is malformed.
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// The language code does not look like a language tag.
    #[error("Invalid language code: {0:?}")]
    InvalidLanguageCode(String),

    /// Error loading a rules file.
    #[error("Rules error: {0}")]
    Rules(String),

    /// Error rendering a report.
    #[error("Rendering error: {0}")]
    Render(String),

    /// The output could not be written.
    #[error("Failed to save {}: {reason}", path.display())]
    Save {
        /// Destination path
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(quick_xml::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InputNotFound(PathBuf::from("missing.docx"));
        assert_eq!(err.to_string(), "missing.docx not found");

        let err = Error::Save {
            path: PathBuf::from("out.docx"),
            reason: "permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to save out.docx: permission denied");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_invalid_language_display() {
        let err = Error::InvalidLanguageCode("e n".to_string());
        assert_eq!(err.to_string(), "Invalid language code: \"e n\"");
    }
}
