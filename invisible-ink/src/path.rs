//! Glyph outlines as sequences of drawing commands.

use kurbo::{BezPath, PathEl, Point, Rect};
use skrifa::outline::OutlinePen;

use crate::Error;

/// An RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
}

/// Rendering attributes carried alongside an outline.
///
/// These have no effect on the compiled font but every path carries them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            fill: Some(Color::BLACK),
            stroke: None,
            stroke_width: 1.0,
        }
    }
}

/// The outline of a single glyph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub outline: BezPath,
    pub style: PathStyle,
}

/// A drawing command that cannot be reduced to a point.
///
/// Only move, line, quadratic and close commands are understood; cubic
/// segments (as produced by CFF outlines) are reported here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnsupportedCommand {
    /// Position of the command in the path.
    pub index: usize,
    /// Short name of the command, e.g. `"CurveTo"`.
    pub command: &'static str,
}

/// The points of a path, along with any commands that were skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub skipped: Vec<UnsupportedCommand>,
}

impl Polyline {
    /// Returns the points, or an error if any command was skipped.
    pub fn into_strict(self, glyph: &str) -> Result<Vec<Point>, Error> {
        match self.skipped.first() {
            Some(skipped) => Err(Error::UnsupportedCommand {
                glyph: glyph.to_owned(),
                command: skipped.command,
            }),
            None => Ok(self.points),
        }
    }
}

impl Path {
    /// A path with no commands.
    ///
    /// The glyph keeps its advance width but draws nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A solid block covering `bounds`.
    ///
    /// The contour starts at the bottom right corner, runs clockwise in font
    /// coordinates and ends by repeating the start point instead of closing.
    pub fn rectangle(bounds: Rect) -> Self {
        let Rect { x0, y0, x1, y1 } = bounds;
        let mut outline = BezPath::new();
        outline.move_to((x1, y0));
        outline.line_to((x0, y0));
        outline.line_to((x0, y1));
        outline.line_to((x1, y1));
        outline.line_to((x1, y0));
        Self {
            outline,
            style: PathStyle::default(),
        }
    }

    /// Build a polygonal path: a move to the first point followed by a line
    /// to each remaining point.
    pub fn from_points(points: &[Point]) -> Self {
        let mut outline = BezPath::new();
        if let Some((first, rest)) = points.split_first() {
            outline.move_to(*first);
            for point in rest {
                outline.line_to(*point);
            }
        }
        Self {
            outline,
            style: PathStyle::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outline.elements().is_empty()
    }

    /// Number of drawing commands in the path.
    pub fn len(&self) -> usize {
        self.outline.elements().len()
    }

    pub fn commands(&self) -> &[PathEl] {
        self.outline.elements()
    }

    /// Reduce the path to the end point of each segment.
    ///
    /// Quadratic control points are dropped and close commands contribute
    /// nothing. Cubic segments are not supported; they are reported in
    /// [`Polyline::skipped`] and contribute no point.
    pub fn to_points(&self) -> Polyline {
        let mut polyline = Polyline::default();
        for (index, el) in self.outline.elements().iter().enumerate() {
            match *el {
                PathEl::MoveTo(pt) | PathEl::LineTo(pt) | PathEl::QuadTo(_, pt) => {
                    polyline.points.push(pt)
                }
                PathEl::ClosePath => (),
                PathEl::CurveTo(..) => polyline.skipped.push(UnsupportedCommand {
                    index,
                    command: "CurveTo",
                }),
            }
        }
        polyline
    }

    /// The smallest rectangle containing every point of every command,
    /// control points included.
    ///
    /// Returns `None` if the path has no commands.
    pub fn control_box(&self) -> Option<Rect> {
        if self.is_empty() {
            return None;
        }
        Some(self.outline.control_box())
    }
}

/// A pen that records a glyph outline into a [`Path`].
#[derive(Debug, Default)]
pub(crate) struct PathPen {
    path: BezPath,
}

impl PathPen {
    pub(crate) fn finish(self) -> Path {
        Path {
            outline: self.path,
            style: PathStyle::default(),
        }
    }
}

fn kurbo_point(x: f32, y: f32) -> Point {
    (x as f64, y as f64).into()
}

impl OutlinePen for PathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(kurbo_point(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(kurbo_point(x, y));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path.quad_to(kurbo_point(cx0, cy0), kurbo_point(x, y));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            kurbo_point(cx0, cy0),
            kurbo_point(cx1, cy1),
            kurbo_point(x, y),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
