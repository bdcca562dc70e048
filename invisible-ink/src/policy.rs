//! Choosing a replacement outline for each glyph.

use std::collections::HashSet;

use crate::{
    font::{Glyph, SourceFont},
    path::Path,
    simplify::{simplify_path, DEFAULT_TOLERANCE},
    Error,
};

/// Which glyphs may receive a non-empty replacement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    /// Every glyph is eligible.
    #[default]
    All,
    /// Only glyphs mapped to one of these code points are eligible.
    Only(HashSet<u32>),
}

impl Filter {
    /// Build a filter allowing each distinct character in `text`.
    pub fn from_text(text: &str) -> Self {
        Filter::Only(text.chars().map(u32::from).collect())
    }

    /// Returns `true` if a glyph mapped to `codepoint` is eligible.
    ///
    /// Unmapped glyphs are only eligible when there is no restriction.
    pub fn allows(&self, codepoint: Option<u32>) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(set) => codepoint.is_some_and(|cp| set.contains(&cp)),
        }
    }
}

/// Settings for generating a placeholder font.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub filter: Filter,
    /// Replace glyphs with solid blocks the size of their bounding box.
    pub use_solid_blocks: bool,
    /// Fail on outline commands that can't be simplified, instead of
    /// dropping them with a warning.
    pub strict: bool,
}

/// The kind of outline a glyph receives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Replacement<'a> {
    /// No outline at all.
    Empty,
    /// The simplified outline of this donor glyph, which has the same name.
    Donor(&'a Glyph),
    /// A rectangle covering the source glyph's bounding box.
    SolidBlock,
    /// The simplified outline of the source glyph itself.
    Simplified,
}

/// Decide what `glyph` should be replaced with.
///
/// The donor is only consulted by glyph name for the duration of the call.
pub fn choose_replacement<'a>(
    glyph: &Glyph,
    donor: Option<&'a SourceFont>,
    options: &Options,
) -> Replacement<'a> {
    let eligible = options.filter.allows(glyph.codepoint);
    let has_bbox = glyph.bbox.is_some();
    match donor {
        Some(donor) => {
            let donor_glyph = donor.glyph_by_name(&glyph.name).filter(|_| eligible);
            if let Some(donor_glyph) = donor_glyph {
                Replacement::Donor(donor_glyph)
            } else if options.use_solid_blocks && has_bbox {
                Replacement::SolidBlock
            } else {
                Replacement::Empty
            }
        }
        None if options.use_solid_blocks => {
            if eligible && has_bbox {
                Replacement::SolidBlock
            } else {
                Replacement::Empty
            }
        }
        None if eligible => Replacement::Simplified,
        None => Replacement::Empty,
    }
}

/// Build the replacement for a single glyph.
pub fn replace_glyph(
    glyph: &Glyph,
    donor: Option<&SourceFont>,
    options: &Options,
) -> Result<Glyph, Error> {
    let path = match choose_replacement(glyph, donor, options) {
        Replacement::Empty => Path::empty(),
        Replacement::SolidBlock => glyph.bbox.map(Path::rectangle).unwrap_or_default(),
        Replacement::Donor(donor_glyph) => simplified(&glyph.name, &donor_glyph.path, options)?,
        Replacement::Simplified => simplified(&glyph.name, &glyph.path, options)?,
    };
    Ok(glyph.with_path(path))
}

/// Build replacements for every glyph of `source`, in glyph order.
pub fn replace_glyphs(
    source: &SourceFont,
    donor: Option<&SourceFont>,
    options: &Options,
) -> Result<Vec<Glyph>, Error> {
    source
        .glyphs()
        .iter()
        .map(|glyph| replace_glyph(glyph, donor, options))
        .collect()
}

fn simplified(name: &str, path: &Path, options: &Options) -> Result<Path, Error> {
    let (simplified, polyline) = simplify_path(path, DEFAULT_TOLERANCE, false);
    if options.strict {
        polyline.into_strict(name)?;
    } else {
        for skipped in &polyline.skipped {
            log::warn!(
                "glyph '{name}': dropping unsupported path command {} at {}",
                skipped.command,
                skipped.index
            );
        }
    }
    Ok(simplified)
}
