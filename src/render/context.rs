//! Drawing-context capability shared by every render target
//!
//! The scene renderer only talks to [`DrawingContext`]; the screen buffer,
//! the SVG exporter and the test recorder each implement it.

use std::path::{Path, PathBuf};

use rusttype::{Font, Scale, point};

use crate::capture::image::RasterImage;
use crate::config::{FontSlant, FontSpec, FontWeight};
use crate::domain::{LogicalPoint, Rect, polygon_contains, segment_distance};
use crate::transform::Affine;

/// RGBA color with components in `0.0..=1.0`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to 8-bit channels
    pub fn to_rgba_u8(self) -> [u8; 4] {
        let c = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [c(self.r), c(self.g), c(self.b), c(self.a)]
    }
}

/// Font and size for one text run; `size` is in the current user units
#[derive(Clone, Copy, Debug)]
pub struct TextStyle<'a> {
    pub font: &'a FontSpec,
    pub size: f64,
    pub color: Color,
}

/// Measured text size in user units
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextExtents {
    pub width: f64,
    pub height: f64,
}

/// Result of testing a point against a path
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitTest {
    pub in_fill: bool,
    pub in_stroke: bool,
}

impl HitTest {
    pub fn hit(&self) -> bool {
        self.in_fill || self.in_stroke
    }
}

/// Test `p` against the closed polygon `path` stroked with `line_width`
pub fn hit_test_path(path: &[LogicalPoint], p: LogicalPoint, line_width: f64) -> HitTest {
    let half = line_width / 2.0;
    let in_stroke = !path.is_empty()
        && path
            .iter()
            .zip(path.iter().cycle().skip(1))
            .any(|(a, b)| segment_distance(*a, *b, p) <= half);
    HitTest {
        in_fill: polygon_contains(path, p),
        in_stroke,
    }
}

/// Cairo-style drawing capability
///
/// Paths are built with `move_to`/`line_to` in user space and consumed by
/// `stroke` or `fill`. Transforms post-multiply the current matrix, so the
/// last call applies first, and `save`/`restore` bracket them.
pub trait DrawingContext {
    /// Paint the whole surface with `color`, ignoring the current transform
    fn clear(&mut self, color: Color);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    fn rotate(&mut self, radians: f64);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    /// Stroke and clear the current path; `width` is in user units
    fn stroke(&mut self, color: Color, width: f64);
    /// Fill and clear the current path
    fn fill(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn measure_text(&self, text: &str, style: &TextStyle) -> TextExtents;
    /// Draw `text` with its baseline starting at `(x, y)`
    fn draw_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle);
    /// Blit `image` with its top-left corner at `(x, y)`
    fn draw_image(&mut self, image: &RasterImage, x: f64, y: f64);
}

/// Current transform plus the `save`/`restore` stack
#[derive(Clone, Debug, Default)]
pub struct TransformStack {
    pub current: Affine,
    saved: Vec<Affine>,
}

impl TransformStack {
    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    pub fn restore(&mut self) {
        match self.saved.pop() {
            Some(m) => self.current = m,
            None => log::warn!("restore() without matching save()"),
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current = self.current.then_apply(Affine::translation(dx, dy));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.current = self.current.then_apply(Affine::scaling(sx, sy));
    }

    pub fn rotate(&mut self, radians: f64) {
        self.current = self.current.then_apply(Affine::rotation(radians));
    }

    /// Map a user-space point to device space
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        self.current.apply(x, y)
    }

    /// Uniform scale factor of the current matrix, for line widths
    pub fn line_scale(&self) -> f64 {
        self.current.determinant().abs().sqrt()
    }
}

/// Text measurement and glyph outlines
///
/// With a loaded font, metrics come from its glyphs; without one, a fixed
/// per-character approximation keeps layout deterministic.
#[derive(Clone, Default)]
pub struct TextMeasure {
    font: Option<Font<'static>>,
}

impl std::fmt::Debug for TextMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextMeasure")
            .field("font_loaded", &self.font.is_some())
            .finish()
    }
}

const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

const APPROX_ADVANCE: f64 = 0.6;
const APPROX_HEIGHT: f64 = 0.7;

impl TextMeasure {
    /// Measurement without a font file
    pub fn approximate() -> Self {
        Self { font: None }
    }

    pub fn from_font(font: Font<'static>) -> Self {
        Self { font: Some(font) }
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        let data = std::fs::read(path).ok()?;
        Font::try_from_vec(data).map(Self::from_font)
    }

    /// DejaVu Sans compiled into the binary
    pub fn bundled() -> Self {
        match Font::try_from_bytes(BUNDLED_FONT) {
            Some(font) => Self::from_font(font),
            None => {
                log::warn!("Bundled font failed to parse, using approximate text metrics");
                Self::approximate()
            }
        }
    }

    /// Look `spec` up in the user and system font directories, falling back
    /// to the bundled face
    pub fn for_font(spec: &FontSpec) -> Self {
        match find_font_file(spec).and_then(|path| {
            log::debug!("Using font file {}", path.display());
            Self::from_file(&path)
        }) {
            Some(measure) => measure,
            None => {
                log::info!("No font file found for '{}', using bundled DejaVu Sans", spec.family);
                Self::bundled()
            }
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn font(&self) -> Option<&Font<'static>> {
        self.font.as_ref()
    }

    pub fn measure(&self, text: &str, size: f64) -> TextExtents {
        let Some(font) = &self.font else {
            return TextExtents {
                width: APPROX_ADVANCE * size * text.chars().count() as f64,
                height: APPROX_HEIGHT * size,
            };
        };
        let scale = Scale::uniform(size as f32);
        let width = font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        TextExtents {
            width: f64::from(width),
            height: f64::from(font.v_metrics(scale).ascent),
        }
    }
}

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = dirs::font_dir().into_iter().collect();
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(".fonts"));
    }
    dirs.extend(
        ["/usr/share/fonts", "/usr/local/share/fonts", "/Library/Fonts", "C:\\Windows\\Fonts"]
            .into_iter()
            .map(PathBuf::from),
    );
    dirs
}

/// Candidate file stems for a family and style, most specific first
fn font_stems(spec: &FontSpec) -> Vec<String> {
    let family: String = spec.family.chars().filter(|c| !c.is_whitespace()).collect();
    let family = family.to_lowercase();
    let style = match (spec.weight, spec.slant) {
        (FontWeight::Bold, FontSlant::Normal) => Some("bold"),
        (FontWeight::Bold, _) => Some("bolditalic"),
        (FontWeight::Normal, FontSlant::Normal) => None,
        (FontWeight::Normal, _) => Some("italic"),
    };
    let mut stems = Vec::new();
    if let Some(style) = style {
        stems.push(format!("{family}-{style}"));
        stems.push(format!("{family}{style}"));
    } else {
        stems.push(format!("{family}-regular"));
    }
    stems.push(family);
    stems
}

fn find_font_file(spec: &FontSpec) -> Option<PathBuf> {
    let stems = font_stems(spec);
    let files: Vec<PathBuf> = font_dirs().iter().flat_map(|d| collect_fonts(d, 3)).collect();
    stems.iter().find_map(|stem| {
        files.iter().find(|f| {
            f.file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|s| s.to_lowercase() == *stem)
        })
    }).cloned()
}

fn collect_fonts(dir: &Path, depth: usize) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if depth > 0 {
                out.extend(collect_fonts(&path, depth - 1));
            }
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
        {
            out.push(path);
        }
    }
    out
}
