//! Document model for word-processing content.
//!
//! Paragraphs and runs are owned values decoded from the package XML.
//! Anything the normalizer does not interpret (tables, hyperlinks,
//! bookmarks, drawings) is carried along verbatim so that saving a
//! document only changes what was normalized.

mod document;
mod paragraph;
mod properties;
mod styles;
mod traits;

pub use document::{BodyContent, Document, Metadata, MetadataField};
pub(crate) use document::{Part, Source};
pub use paragraph::{Alignment, Paragraph, ParagraphContent, ParagraphGeometry, Run};
pub use properties::{LanguageSlot, PropertyBag, PropertyKind};
pub use styles::{ui_name, Style, StyleKind, StyleSheet};
pub use traits::{Trait, TraitSet};
