//! Read-only glyph snapshots of a parsed font.

use std::collections::HashMap;

use kurbo::Rect;
use skrifa::{
    outline::DrawSettings,
    prelude::{LocationRef, Size},
    raw::{
        tables::{head::MacStyle, os2::SelectionFlags},
        TableProvider,
    },
    string::StringId,
    FontRef, GlyphId, MetadataProvider,
};

use crate::{
    path::{Path, PathPen},
    Error,
};

/// A single glyph: identity, metrics and outline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Glyph {
    /// The glyph name, used to match glyphs across fonts.
    pub name: String,
    /// The Unicode code point mapped to this glyph, if any.
    ///
    /// When several code points map to the same glyph this is the lowest.
    pub codepoint: Option<u32>,
    pub advance_width: u16,
    /// The bounds of the outline, absent for glyphs without one.
    pub bbox: Option<Rect>,
    pub path: Path,
}

impl Glyph {
    /// Create a glyph whose bounding box is computed from `path`.
    pub fn new(
        name: impl Into<String>,
        codepoint: Option<u32>,
        advance_width: u16,
        path: Path,
    ) -> Self {
        Glyph {
            name: name.into(),
            codepoint,
            advance_width,
            bbox: path.control_box(),
            path,
        }
    }

    /// A copy of this glyph's identity and metrics with a different outline.
    ///
    /// The bounding box follows the new outline.
    pub fn with_path(&self, path: Path) -> Self {
        Glyph::new(self.name.clone(), self.codepoint, self.advance_width, path)
    }
}

/// Weight, width and style bits as stored in the OS/2 table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontStyle {
    pub weight_class: u16,
    pub width_class: u16,
    /// The raw `fsSelection` bits.
    pub fs_selection: u16,
}

impl Default for FontStyle {
    fn default() -> Self {
        FontStyle {
            weight_class: 400,
            width_class: 5,
            fs_selection: SelectionFlags::REGULAR.bits(),
        }
    }
}

impl FontStyle {
    pub fn is_bold(&self) -> bool {
        self.selection().contains(SelectionFlags::BOLD)
    }

    pub fn is_italic(&self) -> bool {
        self.selection().contains(SelectionFlags::ITALIC)
    }

    fn selection(&self) -> SelectionFlags {
        SelectionFlags::from_bits_truncate(self.fs_selection)
    }
}

/// Font-level metadata needed to lay out text with the font.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontMetadata {
    pub family_name: Option<String>,
    pub subfamily_name: Option<String>,
    pub units_per_em: Option<u16>,
    pub ascender: i16,
    pub descender: i16,
    pub style: FontStyle,
}

/// A font decoded into glyph snapshots.
///
/// Nothing here borrows the original font data.
#[derive(Clone, Debug, Default)]
pub struct SourceFont {
    metadata: FontMetadata,
    glyphs: Vec<Glyph>,
    name_to_index: HashMap<String, usize>,
}

impl SourceFont {
    /// Parse the font in `data`.
    pub fn new(data: &[u8]) -> Result<Self, Error> {
        let font = FontRef::new(data)?;
        Self::from_font_ref(&font)
    }

    /// Decode every glyph of an already parsed font.
    pub fn from_font_ref(font: &FontRef) -> Result<Self, Error> {
        let num_glyphs = font.maxp()?.num_glyphs() as u32;
        let metadata = read_metadata(font);

        let mut codepoints: HashMap<GlyphId, u32> = HashMap::new();
        for (codepoint, gid) in font.charmap().mappings() {
            codepoints
                .entry(gid)
                .and_modify(|cp| *cp = (*cp).min(codepoint))
                .or_insert(codepoint);
        }

        let names = font.glyph_names();
        let outlines = font.outline_glyphs();
        let glyph_metrics = font.glyph_metrics(Size::unscaled(), LocationRef::default());

        let mut glyphs = Vec::with_capacity(num_glyphs as usize);
        for gid in (0..num_glyphs).map(GlyphId::new) {
            let name = names
                .get(gid)
                .map(|name| name.as_str().to_owned())
                .unwrap_or_else(|| format!("gid{}", gid.to_u32()));
            let advance_width = glyph_metrics
                .advance_width(gid)
                .map(|advance| advance.round().clamp(0.0, u16::MAX as f32) as u16)
                .unwrap_or_default();
            let mut pen = PathPen::default();
            if let Some(outline) = outlines.get(gid) {
                let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
                outline.draw(settings, &mut pen).map_err(|e| Error::Draw {
                    glyph: name.clone(),
                    reason: e.to_string(),
                })?;
            }
            glyphs.push(Glyph::new(
                name,
                codepoints.get(&gid).copied(),
                advance_width,
                pen.finish(),
            ));
        }
        log::debug!(
            "decoded {} glyphs from '{}'",
            glyphs.len(),
            metadata.family_name.as_deref().unwrap_or_default()
        );
        Ok(Self::from_parts(metadata, glyphs))
    }

    /// Build a font from already decoded glyphs.
    pub fn from_parts(metadata: FontMetadata, glyphs: Vec<Glyph>) -> Self {
        let mut name_to_index = HashMap::with_capacity(glyphs.len());
        for (i, glyph) in glyphs.iter().enumerate() {
            name_to_index.entry(glyph.name.clone()).or_insert(i);
        }
        SourceFont {
            metadata,
            glyphs,
            name_to_index,
        }
    }

    pub fn metadata(&self) -> &FontMetadata {
        &self.metadata
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn glyph(&self, index: usize) -> Option<&Glyph> {
        self.glyphs.get(index)
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// The index of the first glyph with this name.
    pub fn glyph_index(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    pub fn glyph_by_name(&self, name: &str) -> Option<&Glyph> {
        self.glyph_index(name).and_then(|i| self.glyph(i))
    }
}

fn read_metadata(font: &FontRef) -> FontMetadata {
    let string = |id| {
        font.localized_strings(id)
            .english_or_first()
            .map(|s| s.chars().collect::<String>())
    };
    let (ascender, descender) = font
        .hhea()
        .map(|hhea| (hhea.ascender().to_i16(), hhea.descender().to_i16()))
        .unwrap_or_default();
    FontMetadata {
        family_name: string(StringId::FAMILY_NAME),
        subfamily_name: string(StringId::SUBFAMILY_NAME),
        units_per_em: font.head().ok().map(|head| head.units_per_em()),
        ascender,
        descender,
        style: read_style(font),
    }
}

/// Prefer the OS/2 values, falling back to the `head` mac style bits.
fn read_style(font: &FontRef) -> FontStyle {
    if let Ok(os2) = font.os2() {
        return FontStyle {
            weight_class: os2.us_weight_class(),
            width_class: os2.us_width_class(),
            fs_selection: os2.fs_selection().bits(),
        };
    }
    let Ok(head) = font.head() else {
        return FontStyle::default();
    };
    let mac_style = head.mac_style();
    let mut selection = SelectionFlags::empty();
    if mac_style.contains(MacStyle::BOLD) {
        selection |= SelectionFlags::BOLD;
    }
    if mac_style.contains(MacStyle::ITALIC) {
        selection |= SelectionFlags::ITALIC;
    }
    if selection.is_empty() {
        selection = SelectionFlags::REGULAR;
    }
    FontStyle {
        weight_class: if selection.contains(SelectionFlags::BOLD) {
            700
        } else {
            400
        },
        fs_selection: selection.bits(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn glyph(name: &str) -> Glyph {
        Glyph::new(name, None, 500, Path::empty())
    }

    #[test]
    fn name_lookup_prefers_first_glyph() {
        let font = SourceFont::from_parts(
            FontMetadata::default(),
            vec![glyph(".notdef"), glyph("a"), glyph("a"), glyph("b")],
        );
        assert_eq!(font.glyph_count(), 4);
        assert_eq!(font.glyph_index("a"), Some(1));
        assert_eq!(font.glyph_index("b"), Some(3));
        assert_eq!(font.glyph_index("c"), None);
        assert_eq!(font.glyph_by_name(".notdef"), font.glyph(0));
    }

    #[test]
    fn bbox_follows_path() {
        let g = glyph("space");
        assert_eq!(g.bbox, None);
        let block = g.with_path(Path::rectangle(Rect::new(10.0, -20.0, 400.0, 700.0)));
        assert_eq!(block.bbox, Some(Rect::new(10.0, -20.0, 400.0, 700.0)));
        assert_eq!(block.name, "space");
        assert_eq!(block.advance_width, 500);
    }

    #[test]
    fn default_style_is_regular() {
        let style = FontStyle::default();
        assert_eq!((style.weight_class, style.width_class), (400, 5));
        assert!(!style.is_bold());
        assert!(!style.is_italic());
        let bold_italic = FontStyle {
            fs_selection: (SelectionFlags::BOLD | SelectionFlags::ITALIC).bits(),
            ..style
        };
        assert!(bold_italic.is_bold());
        assert!(bold_italic.is_italic());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            SourceFont::new(b"definitely not a font"),
            Err(Error::Decode(_))
        ));
    }
}
