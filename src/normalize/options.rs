//! Normalization options and presets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stripping preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripPreset {
    /// Fonts, sizes, spacing and alignment only
    Minimal,
    /// Minimal plus color, highlight, shading, underline detail and indents
    #[default]
    Standard,
    /// Clear every manual run override
    Aggressive,
}

impl fmt::Display for StripPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StripPreset::Minimal => "minimal",
            StripPreset::Standard => "standard",
            StripPreset::Aggressive => "aggressive",
        })
    }
}

impl FromStr for StripPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(StripPreset::Minimal),
            "standard" => Ok(StripPreset::Standard),
            "aggressive" => Ok(StripPreset::Aggressive),
            other => Err(format!("unknown preset: {}", other)),
        }
    }
}

/// Options for the formatting stripper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripOptions {
    /// Remove font family overrides (all script variants)
    pub remove_fonts: bool,

    /// Remove font size overrides (normal and complex script)
    pub remove_sizes: bool,

    /// Remove foreground color
    pub remove_colors: bool,

    /// Remove highlighting
    pub remove_highlight: bool,

    /// Remove shading
    pub remove_shading: bool,

    /// Replace styled underlines (double, wavy, colored) with a plain single underline
    pub remove_underline_detail: bool,

    /// Clear line spacing, space before/after and alignment
    pub clear_spacing_alignment: bool,

    /// Clear left, right and first-line indents
    pub clear_indents: bool,

    /// Clear the run's character-style reference
    pub clear_character_style: bool,

    /// Empty the text of hidden runs
    pub erase_hidden_text: bool,

    /// Clear the entire run property bag before reapplying traits
    pub clear_all_overrides: bool,

    /// Keep emphasis that a run inherits from its character style
    pub resolve_character_styles: bool,
}

impl StripOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: StripPreset) -> Self {
        match preset {
            StripPreset::Minimal => Self::minimal(),
            StripPreset::Standard => Self::standard(),
            StripPreset::Aggressive => Self::aggressive(),
        }
    }

    /// Minimal stripping options.
    pub fn minimal() -> Self {
        Self {
            remove_fonts: true,
            remove_sizes: true,
            remove_colors: false,
            remove_highlight: false,
            remove_shading: false,
            remove_underline_detail: false,
            clear_spacing_alignment: true,
            clear_indents: false,
            clear_character_style: true,
            erase_hidden_text: true,
            clear_all_overrides: false,
            resolve_character_styles: true,
        }
    }

    /// Standard stripping options.
    pub fn standard() -> Self {
        Self {
            remove_colors: true,
            remove_highlight: true,
            remove_shading: true,
            remove_underline_detail: true,
            clear_indents: true,
            ..Self::minimal()
        }
    }

    /// Aggressive stripping options.
    pub fn aggressive() -> Self {
        Self {
            clear_all_overrides: true,
            ..Self::standard()
        }
    }

    /// Keep or drop the character-style emphasis when clearing the reference.
    pub fn with_character_styles(mut self, resolve: bool) -> Self {
        self.resolve_character_styles = resolve;
        self
    }

    /// Keep or erase hidden text.
    pub fn with_hidden_text_erased(mut self, erase: bool) -> Self {
        self.erase_hidden_text = erase;
        self
    }
}

impl Default for StripOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Options for the isolated-format scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Characters of context on each side of a candidate
    pub context_radius: usize,
}

impl ScanOptions {
    /// Set the context radius.
    pub fn with_context_radius(mut self, radius: usize) -> Self {
        self.context_radius = radius;
        self
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { context_radius: 30 }
    }
}

/// Options for the whole normalization pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Stripper options
    pub strip: StripOptions,

    /// Scanner options
    pub scan: ScanOptions,
}

impl NormalizeOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a stripping preset.
    pub fn with_preset(mut self, preset: StripPreset) -> Self {
        self.strip = StripOptions::from_preset(preset);
        self
    }

    /// Set stripper options.
    pub fn with_strip(mut self, strip: StripOptions) -> Self {
        self.strip = strip;
        self
    }

    /// Set scanner options.
    pub fn with_scan(mut self, scan: ScanOptions) -> Self {
        self.scan = scan;
        self
    }
}
