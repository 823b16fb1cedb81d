//! Preserved emphasis traits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four emphasis traits that survive normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Trait {
    /// Bold text
    Bold,
    /// Italic text
    Italic,
    /// Underlined text
    Underline,
    /// Strikethrough text
    Strikethrough,
}

impl Trait {
    /// All traits in label order.
    pub const ALL: [Trait; 4] = [
        Trait::Bold,
        Trait::Italic,
        Trait::Underline,
        Trait::Strikethrough,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Trait::Bold => "Bold",
            Trait::Italic => "Italic",
            Trait::Underline => "Underline",
            Trait::Strikethrough => "Strikethrough",
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of a run's emphasis traits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraitSet {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Strikethrough text
    pub strikethrough: bool,
}

impl TraitSet {
    /// A set with no active traits.
    pub const NONE: TraitSet = TraitSet {
        bold: false,
        italic: false,
        underline: false,
        strikethrough: false,
    };

    /// Build a set from a list of active traits.
    pub fn from_traits(traits: &[Trait]) -> Self {
        let mut set = Self::NONE;
        for t in traits {
            set.set(*t, true);
        }
        set
    }

    /// Check a single trait.
    pub fn has(&self, t: Trait) -> bool {
        match t {
            Trait::Bold => self.bold,
            Trait::Italic => self.italic,
            Trait::Underline => self.underline,
            Trait::Strikethrough => self.strikethrough,
        }
    }

    /// Turn a single trait on or off.
    pub fn set(&mut self, t: Trait, on: bool) {
        match t {
            Trait::Bold => self.bold = on,
            Trait::Italic => self.italic = on,
            Trait::Underline => self.underline = on,
            Trait::Strikethrough => self.strikethrough = on,
        }
    }

    /// Active traits in label order.
    pub fn active(&self) -> Vec<Trait> {
        Trait::ALL.into_iter().filter(|t| self.has(*t)).collect()
    }

    /// Check if any trait is active.
    pub fn any(&self) -> bool {
        self.bold || self.italic || self.underline || self.strikethrough
    }
}
