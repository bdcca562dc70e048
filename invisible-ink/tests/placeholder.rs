use std::path::PathBuf;

use invisible_ink::{
    build_font, create_placeholder_font, process_batch, BatchOutcome, Filter, FontMetadata,
    FontStyle, Glyph, Options, Path, SourceFont,
};
use kurbo::{BezPath, Point, Rect};
use pretty_assertions::assert_eq;

fn metadata() -> FontMetadata {
    FontMetadata {
        family_name: Some("Test Serif".into()),
        subfamily_name: Some("Regular".into()),
        units_per_em: Some(1000),
        ascender: 800,
        descender: -200,
        ..Default::default()
    }
}

fn triangle() -> Path {
    Path::from_points(&[
        Point::new(0.0, 0.0),
        Point::new(300.0, 700.0),
        Point::new(600.0, 0.0),
    ])
}

fn bowl() -> Path {
    let mut outline = BezPath::new();
    outline.move_to((300.0, 0.0));
    outline.quad_to((600.0, 0.0), (600.0, 350.0));
    outline.quad_to((600.0, 700.0), (300.0, 700.0));
    outline.quad_to((0.0, 700.0), (0.0, 350.0));
    outline.quad_to((0.0, 0.0), (300.0, 0.0));
    outline.close_path();
    Path {
        outline,
        ..Default::default()
    }
}

/// A small TrueType font: `.notdef`, `A`, `B`, `O` and `space`.
fn source_font_data() -> Vec<u8> {
    let glyphs = vec![
        Glyph::new(".notdef", None, 500, Path::empty()),
        Glyph::new("A", Some('A' as u32), 600, triangle()),
        Glyph::new(
            "B",
            Some('B' as u32),
            620,
            Path::rectangle(Rect::new(50.0, 0.0, 570.0, 700.0)),
        ),
        Glyph::new("O", Some('O' as u32), 640, bowl()),
        Glyph::new("space", Some(' ' as u32), 250, Path::empty()),
    ];
    build_font(&metadata(), &glyphs).unwrap()
}

fn names(font: &SourceFont) -> Vec<&str> {
    font.glyphs().iter().map(|g| g.name.as_str()).collect()
}

fn advances(font: &SourceFont) -> Vec<u16> {
    font.glyphs().iter().map(|g| g.advance_width).collect()
}

#[test]
fn source_font_round_trips() {
    let font = SourceFont::new(&source_font_data()).unwrap();
    assert_eq!(names(&font), vec![".notdef", "A", "B", "O", "space"]);
    assert_eq!(advances(&font), vec![500, 600, 620, 640, 250]);
    assert_eq!(font.glyph_by_name("O").unwrap().codepoint, Some('O' as u32));
    assert_eq!(font.glyph_by_name(".notdef").unwrap().codepoint, None);
    assert_eq!(font.glyph_by_name("space").unwrap().bbox, None);
    assert_eq!(
        font.glyph_by_name("B").unwrap().bbox,
        Some(Rect::new(50.0, 0.0, 570.0, 700.0))
    );
}

#[test]
fn default_options_keep_every_glyph_visible() {
    let data = source_font_data();
    let source = SourceFont::new(&data).unwrap();
    let placeholder = create_placeholder_font(&data, None, &Options::default()).unwrap();
    assert_eq!(placeholder.name, "Test Serif Placeholder");

    let output = SourceFont::new(&placeholder.data).unwrap();
    assert_eq!(names(&output), names(&source));
    assert_eq!(advances(&output), advances(&source));
    assert_eq!(output.metadata().units_per_em, Some(1000));
    assert_eq!(output.metadata().ascender, 800);
    assert_eq!(output.metadata().descender, -200);
    for (before, after) in source.glyphs().iter().zip(output.glyphs()) {
        assert_eq!(before.path.is_empty(), after.path.is_empty(), "{}", before.name);
        assert_eq!(before.codepoint, after.codepoint, "{}", before.name);
    }
    assert_eq!(
        output.glyph_by_name("B").unwrap().bbox,
        source.glyph_by_name("B").unwrap().bbox
    );
}

#[test]
fn weight_and_style_bits_carry_over() {
    let style = FontStyle {
        weight_class: 600,
        width_class: 5,
        // italic
        fs_selection: 0x0001,
    };
    let metadata = FontMetadata {
        subfamily_name: Some("Semibold Italic".into()),
        style,
        ..metadata()
    };
    let glyphs = vec![Glyph::new("A", Some('A' as u32), 600, triangle())];
    let data = build_font(&metadata, &glyphs).unwrap();
    let placeholder = create_placeholder_font(&data, None, &Options::default()).unwrap();
    let output = SourceFont::new(&placeholder.data).unwrap();
    assert_eq!(output.metadata().style, style);
    assert!(output.metadata().style.is_italic());
    assert!(!output.metadata().style.is_bold());
}

#[test]
fn curves_are_flattened() {
    let data = source_font_data();
    let placeholder = create_placeholder_font(&data, None, &Options::default()).unwrap();
    let output = SourceFont::new(&placeholder.data).unwrap();
    let bowl = &output.glyph_by_name("O").unwrap().path;
    assert!(bowl
        .commands()
        .iter()
        .all(|el| !matches!(el, kurbo::PathEl::QuadTo(..) | kurbo::PathEl::CurveTo(..))));
}

#[test]
fn solid_blocks_for_filtered_characters() {
    let data = source_font_data();
    let options = Options {
        filter: Filter::from_text("A "),
        use_solid_blocks: true,
        ..Default::default()
    };
    let placeholder = create_placeholder_font(&data, None, &options).unwrap();
    let output = SourceFont::new(&placeholder.data).unwrap();

    let a = output.glyph_by_name("A").unwrap();
    assert_eq!(a.bbox, Some(Rect::new(0.0, 0.0, 600.0, 700.0)));
    assert_eq!(a.advance_width, 600);
    // filtered out, even though it has an outline
    assert!(output.glyph_by_name("B").unwrap().path.is_empty());
    // allowed, but has no bounding box
    assert!(output.glyph_by_name("space").unwrap().path.is_empty());
    assert_eq!(output.glyph_by_name("space").unwrap().advance_width, 250);
}

#[test]
fn donor_outlines_matched_by_name() {
    let data = source_font_data();
    let mut donor_glyphs = vec![Glyph::new(
        "A",
        None,
        1000,
        Path::rectangle(Rect::new(10.0, 20.0, 110.0, 220.0)),
    )];
    donor_glyphs.push(Glyph::new("unrelated", None, 1000, triangle()));
    let donor = SourceFont::from_parts(metadata(), donor_glyphs);
    let options = Options {
        use_solid_blocks: true,
        ..Default::default()
    };
    let placeholder = create_placeholder_font(&data, Some(&donor), &options).unwrap();
    let output = SourceFont::new(&placeholder.data).unwrap();

    let a = output.glyph_by_name("A").unwrap();
    assert_eq!(a.bbox, Some(Rect::new(10.0, 20.0, 110.0, 220.0)));
    // metrics come from the source, not the donor
    assert_eq!(a.advance_width, 600);
    // not in the donor, falls back to a block
    assert_eq!(
        output.glyph_by_name("O").unwrap().bbox,
        Some(Rect::new(0.0, 0.0, 600.0, 700.0))
    );
    assert!(output.glyph_by_name("space").unwrap().path.is_empty());
}

#[test]
fn donor_can_be_the_source_itself() {
    let data = source_font_data();
    let donor = SourceFont::new(&data).unwrap();
    let placeholder = create_placeholder_font(&data, Some(&donor), &Options::default()).unwrap();
    let output = SourceFont::new(&placeholder.data).unwrap();
    assert_eq!(names(&output), names(&donor));
    assert_eq!(
        output.glyph_by_name("A").unwrap().bbox,
        donor.glyph_by_name("A").unwrap().bbox
    );
}

#[test]
fn batch_reports_each_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("Good-Regular.ttf");
    let bad = dir.path().join("Bad-Regular.ttf");
    std::fs::write(&good, source_font_data()).unwrap();
    std::fs::write(&bad, b"not a font").unwrap();

    let paths: Vec<PathBuf> = vec![good.clone(), bad.clone()];
    let report = process_batch(&paths, None, &Options::default());
    assert_eq!(report.outcome(), BatchOutcome::PartialFailure);
    assert_eq!(report.outcome().exit_code(), 1);
    assert_eq!(report.files[0].path, good);
    assert_eq!(report.files[1].path, bad);
    let succeeded: Vec<_> = report.succeeded().map(|(_, font)| font.name.as_str()).collect();
    assert_eq!(succeeded, vec!["Test Serif Placeholder"]);
    assert!(matches!(
        report.failed().next(),
        Some((path, invisible_ink::Error::Decode(_))) if path == bad
    ));
}

#[test]
fn empty_batch_is_a_total_failure() {
    let report = process_batch(&[], None, &Options::default());
    assert_eq!(report.outcome(), BatchOutcome::TotalFailure);
}
