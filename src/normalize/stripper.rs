//! Formatting stripper: canonical styles, override removal, trait round-trip.

use serde::Serialize;

use super::options::StripOptions;
use super::style_map::{StyleMap, StyleTarget};
use crate::model::{
    BodyContent, Document, Paragraph, PropertyBag, PropertyKind, Run, StyleKind, StyleSheet, TraitSet,
};

/// Counts of what the stripper changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StripStats {
    /// Paragraphs moved onto a canonical style
    pub paragraphs_restyled: usize,

    /// Paragraphs that had geometry overrides cleared
    pub geometry_cleared: usize,

    /// Runs that lost at least one override
    pub runs_stripped: usize,

    /// Individual override properties removed
    pub overrides_removed: usize,

    /// Hidden runs whose text was erased
    pub hidden_runs_erased: usize,
}

impl StripStats {
    fn absorb(&mut self, other: StripStats) {
        self.paragraphs_restyled += other.paragraphs_restyled;
        self.geometry_cleared += other.geometry_cleared;
        self.runs_stripped += other.runs_stripped;
        self.overrides_removed += other.overrides_removed;
        self.hidden_runs_erased += other.hidden_runs_erased;
    }
}

/// Strip every paragraph of the document.
pub fn strip_document(doc: &mut Document, map: &StyleMap, options: &StripOptions) -> StripStats {
    let mut stats = StripStats::default();
    let Document { styles, body, .. } = doc;
    for item in body.iter_mut() {
        if let BodyContent::Paragraph(paragraph) = item {
            stats.absorb(strip_paragraph(paragraph, styles, map, options));
        }
    }
    log::info!(
        "Stripped {} runs ({} overrides), restyled {} paragraphs, erased {} hidden runs",
        stats.runs_stripped,
        stats.overrides_removed,
        stats.paragraphs_restyled,
        stats.hidden_runs_erased
    );
    stats
}

/// Remap the paragraph style, clear geometry overrides, then strip each run.
pub fn strip_paragraph(
    paragraph: &mut Paragraph,
    styles: &mut StyleSheet,
    map: &StyleMap,
    options: &StripOptions,
) -> StripStats {
    let mut stats = StripStats::default();

    let name = styles.paragraph_style_name(paragraph.style_id());
    if let Some(target) = map.get(&name) {
        apply_style_target(paragraph, styles, target);
        stats.paragraphs_restyled += 1;
    }

    let mut cleared = false;
    if options.clear_spacing_alignment {
        cleared |= paragraph.clear_spacing_alignment();
    }
    if options.clear_indents {
        cleared |= paragraph.clear_indents();
    }
    if cleared {
        stats.geometry_cleared += 1;
    }

    for run in paragraph.runs_mut() {
        match strip_run(run, styles, options) {
            RunOutcome::Erased => stats.hidden_runs_erased += 1,
            RunOutcome::Stripped(0) => {}
            RunOutcome::Stripped(removed) => {
                stats.runs_stripped += 1;
                stats.overrides_removed += removed;
            }
        }
    }
    stats
}

/// Point the paragraph at the canonical style, adding it to the sheet when missing.
fn apply_style_target(paragraph: &mut Paragraph, styles: &mut StyleSheet, target: StyleTarget) {
    let id = styles.ensure_paragraph_style(target.style_name());
    let is_default = styles
        .get(&id)
        .is_some_and(|s| s.kind == StyleKind::Paragraph && s.is_default);
    if is_default {
        paragraph.set_style_id(None);
    } else {
        paragraph.set_style_id(Some(&id));
    }
}

/// Result of stripping one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Hidden run; text replaced with nothing
    Erased,
    /// Number of override properties removed
    Stripped(usize),
}

/// Strip manual overrides from a run, keeping its emphasis traits.
///
/// Traits are captured first (including those inherited from the run's
/// character style), overrides are removed, and the traits are written
/// back as direct formatting. Running this twice changes nothing the
/// second time.
pub fn strip_run(run: &mut Run, styles: &StyleSheet, options: &StripOptions) -> RunOutcome {
    if options.erase_hidden_text && run.is_hidden() {
        if run.text().is_empty() {
            return RunOutcome::Stripped(0);
        }
        run.set_text("");
        return RunOutcome::Erased;
    }

    let traits = capture_traits(run, styles, options);
    let before = run.properties().clone();

    if options.clear_all_overrides {
        let hidden = run.is_hidden();
        run.properties_mut().clear();
        run.set_hidden(hidden);
    } else {
        let bag = run.properties_mut();
        if options.clear_character_style {
            bag.remove(PropertyKind::CharacterStyle);
        }
        if options.remove_fonts {
            bag.remove(PropertyKind::FontFamily);
        }
        if options.remove_sizes {
            bag.remove(PropertyKind::FontSize);
            bag.remove(PropertyKind::FontSizeComplex);
        }
        if options.remove_colors {
            bag.remove(PropertyKind::Color);
        }
        if options.remove_highlight {
            bag.remove(PropertyKind::Highlight);
        }
        if options.remove_shading {
            bag.remove(PropertyKind::Shading);
        }
        if options.remove_underline_detail && has_underline_detail(bag) {
            bag.remove(PropertyKind::Underline);
        }
    }

    run.set_traits(traits);

    let after = run.properties().entries();
    let removed = before
        .entries()
        .iter()
        .filter(|entry| !after.contains(entry))
        .count();
    if removed > 0 {
        log::trace!("Removed {} overrides from run {:?}", removed, run.text());
    }
    RunOutcome::Stripped(removed)
}

/// Traits to keep: direct formatting wins, otherwise the character style's.
fn capture_traits(run: &Run, styles: &StyleSheet, options: &StripOptions) -> TraitSet {
    let bag = run.properties();
    let style = run
        .character_style()
        .filter(|_| options.resolve_character_styles);
    let inherited = |kind: PropertyKind| style.and_then(|id| styles.character_toggle(id, kind));

    TraitSet {
        bold: bag.toggle(PropertyKind::Bold).or_else(|| inherited(PropertyKind::Bold)).unwrap_or(false),
        italic: bag
            .toggle(PropertyKind::Italic)
            .or_else(|| inherited(PropertyKind::Italic))
            .unwrap_or(false),
        underline: bag
            .underline()
            .or_else(|| style.and_then(|id| styles.character_underline(id)))
            .unwrap_or(false),
        strikethrough: bag
            .toggle(PropertyKind::Strike)
            .or_else(|| inherited(PropertyKind::Strike))
            .unwrap_or(false),
    }
}

/// An underline that is anything other than a plain single line.
fn has_underline_detail(bag: &PropertyBag) -> bool {
    bag.get(PropertyKind::Underline).is_some_and(|u| {
        let plain_value = matches!(u.attr("w:val"), None | Some("single") | Some("none"));
        !plain_value || u.attributes.iter().any(|(name, _)| name != "w:val")
    })
}
