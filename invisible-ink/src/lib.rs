//! Placeholder fonts for progressive web font loading.
//!
//! A placeholder font keeps the metrics of a source font (advance widths,
//! ascender, descender, units per em) so that text laid out with it occupies
//! the same space, while its glyph outlines are removed, replaced with solid
//! blocks, or borrowed from a donor font. Replacement outlines are reduced
//! to simplified polygons.
//!
//! ```no_run
//! use invisible_ink::{create_placeholder_font, Filter, Options};
//!
//! let data = std::fs::read("Example-Regular.ttf").unwrap();
//! let options = Options {
//!     filter: Filter::from_text("Loading..."),
//!     use_solid_blocks: true,
//!     ..Default::default()
//! };
//! let placeholder = create_placeholder_font(&data, None, &options).unwrap();
//! assert!(placeholder.name.ends_with(" Placeholder"));
//! ```

mod assemble;
mod batch;
mod font;
mod path;
mod policy;
mod simplify;

use std::path::PathBuf;

use skrifa::raw::ReadError;
use thiserror::Error;
use write_fonts::BuilderError;

pub use assemble::{assemble, build_font, AssemblyError, PlaceholderFont, FAMILY_NAME_SUFFIX};
pub use batch::{process_batch, BatchOutcome, BatchReport, FileReport};
pub use font::{FontMetadata, FontStyle, Glyph, SourceFont};
pub use path::{Color, Path, PathStyle, Polyline, UnsupportedCommand};
pub use policy::{choose_replacement, replace_glyph, replace_glyphs, Filter, Options, Replacement};
pub use simplify::{simplify, simplify_path, DEFAULT_TOLERANCE};

/// Create a placeholder for the font in `data`.
///
/// Glyph outlines are chosen according to `options`; when `donor` is
/// provided, glyphs are matched to donor glyphs by name.
pub fn create_placeholder_font(
    data: &[u8],
    donor: Option<&SourceFont>,
    options: &Options,
) -> Result<PlaceholderFont, Error> {
    let source = SourceFont::new(data)?;
    let glyphs = replace_glyphs(&source, donor, options)?;
    assemble(&source, &glyphs)
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error reading font data: {0}")]
    Decode(#[from] ReadError),
    #[error("Error drawing glyph '{glyph}': {reason}")]
    Draw { glyph: String, reason: String },
    #[error("Unsupported path command '{command}' in glyph '{glyph}'")]
    UnsupportedCommand {
        glyph: String,
        command: &'static str,
    },
    #[error("Error assembling font: {0}")]
    Assembly(#[from] AssemblyError),
    #[error("Error compiling glyph '{glyph}': {reason}")]
    Glyph { glyph: String, reason: String },
    #[error("Error writing font: {0}")]
    Encode(#[from] BuilderError),
    #[error("Error reading '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
