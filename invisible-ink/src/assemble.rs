//! Compiling replacement glyphs into a new font.

use std::collections::HashSet;

use write_fonts::{
    tables::{
        cmap::{Cmap, CmapConflict},
        glyf::{Bbox, GlyfLocaBuilder, SimpleGlyph},
        head::{Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    types::{FWord, Fixed, GlyphId, NameId, UfWord},
    FontBuilder,
};

use crate::{
    font::{FontMetadata, Glyph, SourceFont},
    Error,
};

/// Appended to the source family name to name the placeholder family.
pub const FAMILY_NAME_SUFFIX: &str = " Placeholder";

const DEFAULT_SUBFAMILY_NAME: &str = "Regular";

// Windows platform, Unicode BMP encoding, English (United States)
const WINDOWS_PLATFORM_ID: u16 = 3;
const WINDOWS_BMP_ENCODING_ID: u16 = 1;
const WINDOWS_ENGLISH_US: u16 = 0x0409;

/// Font-level data that can't be taken from the source font.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("source font has no family name")]
    MissingFamilyName,
    #[error("source font has no units per em")]
    MissingUnitsPerEm,
    #[error("{0}")]
    CmapConflict(String),
}

impl From<CmapConflict> for AssemblyError {
    fn from(value: CmapConflict) -> Self {
        AssemblyError::CmapConflict(value.to_string())
    }
}

/// A compiled placeholder font.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceholderFont {
    /// The family name of the new font.
    pub name: String,
    /// The binary font data.
    pub data: Vec<u8>,
}

/// Package `glyphs` as the placeholder for `source`.
///
/// The new family name is the source family name with
/// [`FAMILY_NAME_SUFFIX`] appended; subfamily, units per em, ascender and
/// descender are copied unchanged. Glyph order is preserved.
pub fn assemble(source: &SourceFont, glyphs: &[Glyph]) -> Result<PlaceholderFont, Error> {
    let source_metadata = source.metadata();
    let family_name = source_metadata
        .family_name
        .as_deref()
        .ok_or(AssemblyError::MissingFamilyName)?;
    let units_per_em = source_metadata
        .units_per_em
        .ok_or(AssemblyError::MissingUnitsPerEm)?;
    let metadata = FontMetadata {
        family_name: Some(format!("{family_name}{FAMILY_NAME_SUFFIX}")),
        subfamily_name: source_metadata.subfamily_name.clone(),
        units_per_em: Some(units_per_em),
        ascender: source_metadata.ascender,
        descender: source_metadata.descender,
        style: source_metadata.style,
    };
    let data = build_font(&metadata, glyphs)?;
    let name = metadata.family_name.unwrap_or_default();
    log::info!("assembled '{name}' with {} glyphs", glyphs.len());
    Ok(PlaceholderFont { name, data })
}

/// Compile a TrueType font from metadata and glyphs.
///
/// Every outline must consist of lines and quadratic curves only.
pub fn build_font(metadata: &FontMetadata, glyphs: &[Glyph]) -> Result<Vec<u8>, Error> {
    let family_name = metadata
        .family_name
        .as_deref()
        .ok_or(AssemblyError::MissingFamilyName)?;
    let units_per_em = metadata
        .units_per_em
        .ok_or(AssemblyError::MissingUnitsPerEm)?;
    let subfamily_name = metadata
        .subfamily_name
        .as_deref()
        .unwrap_or(DEFAULT_SUBFAMILY_NAME);

    let mut glyf_builder = GlyfLocaBuilder::new();
    let mut h_metrics = Vec::with_capacity(glyphs.len());
    let mut font_bbox: Option<Bbox> = None;
    let mut stats = Stats::default();
    for glyph in glyphs {
        let simple = compile_glyph(glyph)?;
        glyf_builder
            .add_glyph(&simple)
            .map_err(|e| Error::Glyph {
                glyph: glyph.name.clone(),
                reason: e.to_string(),
            })?;
        let side_bearing = if simple.contours.is_empty() {
            0
        } else {
            font_bbox = Some(font_bbox.map_or(simple.bbox, |bbox| bbox.union(simple.bbox)));
            stats.add_outline(glyph.advance_width, &simple);
            simple.bbox.x_min
        };
        stats.advance_width_max = stats.advance_width_max.max(glyph.advance_width);
        h_metrics.push(LongMetric {
            advance: glyph.advance_width,
            side_bearing,
        });
    }
    let (glyf, loca, loca_format) = glyf_builder.build();
    let font_bbox = font_bbox.unwrap_or_default();

    let mut builder = FontBuilder::new();
    builder.add_table(&Head {
        font_revision: Fixed::from_f64(1.0),
        units_per_em,
        x_min: font_bbox.x_min,
        y_min: font_bbox.y_min,
        x_max: font_bbox.x_max,
        y_max: font_bbox.y_max,
        mac_style: mac_style(metadata),
        lowest_rec_ppem: 3,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
        ..Default::default()
    })?;
    builder.add_table(&Hhea {
        ascender: FWord::new(metadata.ascender),
        descender: FWord::new(metadata.descender),
        line_gap: FWord::new(0),
        advance_width_max: UfWord::new(stats.advance_width_max),
        min_left_side_bearing: FWord::new(stats.min_left_side_bearing),
        min_right_side_bearing: FWord::new(stats.min_right_side_bearing),
        x_max_extent: FWord::new(stats.x_max_extent),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: h_metrics.len() as u16,
    })?;
    builder.add_table(&Maxp {
        num_glyphs: glyphs.len() as u16,
        max_points: Some(stats.max_points),
        max_contours: Some(stats.max_contours),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(2),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    })?;
    builder.add_table(&os2(metadata, glyphs))?;
    builder.add_table(&Hmtx {
        h_metrics,
        left_side_bearings: Vec::new(),
    })?;
    builder.add_table(&cmap(glyphs)?)?;
    builder.add_table(&loca)?;
    builder.add_table(&glyf)?;
    builder.add_table(&name(family_name, subfamily_name))?;
    let post = Post::new_v2(glyphs.iter().map(|glyph| glyph.name.as_str()));
    builder.add_table(&post)?;
    Ok(builder.build())
}

fn compile_glyph(glyph: &Glyph) -> Result<SimpleGlyph, Error> {
    if glyph.path.is_empty() {
        return Ok(SimpleGlyph::default());
    }
    SimpleGlyph::from_bezpath(&glyph.path.outline).map_err(|e| Error::Glyph {
        glyph: glyph.name.clone(),
        reason: format!("{e:?}"),
    })
}

/// Horizontal metrics and maxima gathered while compiling glyphs.
#[derive(Default)]
struct Stats {
    advance_width_max: u16,
    min_left_side_bearing: i16,
    min_right_side_bearing: i16,
    x_max_extent: i16,
    max_points: u16,
    max_contours: u16,
    seen_outline: bool,
}

impl Stats {
    fn add_outline(&mut self, advance: u16, glyph: &SimpleGlyph) {
        let Bbox { x_min, x_max, .. } = glyph.bbox;
        let rsb = (advance as i32 - x_max as i32).clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        if self.seen_outline {
            self.min_left_side_bearing = self.min_left_side_bearing.min(x_min);
            self.min_right_side_bearing = self.min_right_side_bearing.min(rsb);
            self.x_max_extent = self.x_max_extent.max(x_max);
        } else {
            self.min_left_side_bearing = x_min;
            self.min_right_side_bearing = rsb;
            self.x_max_extent = x_max;
            self.seen_outline = true;
        }
        let points: usize = glyph.contours.iter().map(|contour| contour.len()).sum();
        self.max_points = self.max_points.max(points.min(u16::MAX as usize) as u16);
        self.max_contours = self
            .max_contours
            .max(glyph.contours.len().min(u16::MAX as usize) as u16);
    }
}

/// Map each glyph's code point, letting the first glyph win a shared one.
fn cmap(glyphs: &[Glyph]) -> Result<Cmap, AssemblyError> {
    let mut seen = HashSet::new();
    let mappings = glyphs.iter().enumerate().filter_map(|(gid, glyph)| {
        let ch = glyph.codepoint.and_then(char::from_u32)?;
        seen.insert(ch).then(|| (ch, GlyphId::new(gid as u32)))
    });
    Ok(Cmap::from_mappings(mappings)?)
}

fn os2(metadata: &FontMetadata, glyphs: &[Glyph]) -> Os2 {
    let bmp = |cp: u32| cp.min(0xFFFF) as u16;
    let first_char = glyphs.iter().filter_map(|g| g.codepoint).min().unwrap_or(0);
    let last_char = glyphs.iter().filter_map(|g| g.codepoint).max().unwrap_or(0);
    let inked: Vec<i32> = glyphs
        .iter()
        .filter(|g| g.advance_width > 0)
        .map(|g| g.advance_width as i32)
        .collect();
    let x_avg_char_width = if inked.is_empty() {
        0
    } else {
        (inked.iter().sum::<i32>() / inked.len() as i32) as i16
    };
    Os2 {
        x_avg_char_width,
        us_weight_class: metadata.style.weight_class,
        us_width_class: metadata.style.width_class,
        fs_selection: SelectionFlags::from_bits_truncate(metadata.style.fs_selection),
        us_first_char_index: bmp(first_char),
        us_last_char_index: bmp(last_char),
        s_typo_ascender: metadata.ascender,
        s_typo_descender: metadata.descender,
        s_typo_line_gap: 0,
        us_win_ascent: metadata.ascender.max(0) as u16,
        us_win_descent: metadata.descender.min(0).unsigned_abs(),
        ul_code_page_range_1: Some(1),
        ul_code_page_range_2: Some(0),
        ..Default::default()
    }
}

fn mac_style(metadata: &FontMetadata) -> MacStyle {
    let mut mac_style = MacStyle::empty();
    if metadata.style.is_bold() {
        mac_style |= MacStyle::BOLD;
    }
    if metadata.style.is_italic() {
        mac_style |= MacStyle::ITALIC;
    }
    mac_style
}

fn name(family_name: &str, subfamily_name: &str) -> Name {
    let full_name = format!("{family_name} {subfamily_name}");
    let postscript_name: String = format!("{family_name}-{subfamily_name}")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let strings = [
        (NameId::FAMILY_NAME, family_name.to_owned()),
        (NameId::SUBFAMILY_NAME, subfamily_name.to_owned()),
        (NameId::UNIQUE_ID, full_name.clone()),
        (NameId::FULL_NAME, full_name),
        (NameId::VERSION_STRING, String::from("Version 1.000")),
        (NameId::POSTSCRIPT_NAME, postscript_name),
    ];
    let mut table = Name::default();
    table.name_record = strings
        .into_iter()
        .map(|(name_id, string)| NameRecord {
            platform_id: WINDOWS_PLATFORM_ID,
            encoding_id: WINDOWS_BMP_ENCODING_ID,
            language_id: WINDOWS_ENGLISH_US,
            name_id,
            string: string.into(),
        })
        .collect();
    table.name_record.sort();
    table
}
