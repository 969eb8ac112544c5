//! Exporting the annotated gel to SVG or PNG
//!
//! Both targets run the same scene renderer as the screen. The raster
//! target renders exactly the selected region; the vector target renders
//! the whole viewport and narrows the document with a `viewBox`.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::domain::{ExportSelection, Rect};
use crate::error::ExportError;
use crate::render::context::{DrawingContext, TextMeasure};
use crate::render::pixmap::PixmapSurface;
use crate::render::scene;
use crate::render::svg::SvgSurface;
use crate::session::state::{Mode, SessionState};

/// Export target
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportKind {
    #[default]
    Svg,
    Png,
}

impl ExportKind {
    pub fn extension(self) -> &'static str {
        match self {
            ExportKind::Svg => "svg",
            ExportKind::Png => "png",
        }
    }

    /// Kind named by the path's extension, if it names one
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        [ExportKind::Svg, ExportKind::Png]
            .into_iter()
            .find(|kind| ext.eq_ignore_ascii_case(kind.extension()))
    }
}

/// Append `.svg`/`.png` unless the path already ends with it (any case)
pub fn normalize_extension(path: &Path, kind: ExportKind) -> PathBuf {
    if ExportKind::from_path(path) == Some(kind) {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(kind.extension());
    PathBuf::from(name)
}

/// Directory of the opened image, else the pictures directory, else home
pub fn default_export_dir(source: Option<&Path>) -> Option<PathBuf> {
    source
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(dirs::picture_dir)
        .or_else(dirs::home_dir)
}

/// Timestamped file name in the default export directory
pub fn default_export_path(source: Option<&Path>, kind: ExportKind) -> Option<PathBuf> {
    let mut path = default_export_dir(source)?;
    let name = chrono::Local::now()
        .format("gel_%Y-%m-%d_%H-%M-%S")
        .to_string();
    path.push(format!("{}.{}", name, kind.extension()));
    Some(path)
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

/// Encode straight RGBA pixels as an in-memory PNG
pub fn encode_png(width: u32, height: u32, data: &[u8]) -> Result<Vec<u8>, ExportError> {
    let image = RgbaImage::from_raw(width, height, data.to_vec()).ok_or(ExportError::EmptyRegion)?;
    let mut out = Vec::new();
    write_png(&mut out, &image)?;
    Ok(out)
}

/// Device-space region to export: the selection clipped to the viewport,
/// or the whole viewport
///
/// A selection entirely outside the viewport yields an empty rectangle.
pub fn export_region(session: &SessionState, selection: Option<ExportSelection>) -> Rect {
    let viewport = Rect::from_xywh(0.0, 0.0, session.viewport_width, session.viewport_height);
    match selection {
        Some(selection) => session
            .transform_context()
            .logical_rect_to_device(selection.rect())
            .intersect(viewport)
            .unwrap_or_default(),
        None => viewport,
    }
}

/// Render the region to pixels; the image is exactly the region's rounded size
pub fn render_png(
    session: &SessionState,
    selection: Option<ExportSelection>,
    measure: TextMeasure,
) -> Result<RgbaImage, ExportError> {
    let region = export_region(session, selection);
    let width = region.width().round();
    let height = region.height().round();
    if width < 1.0 || height < 1.0 {
        return Err(ExportError::EmptyRegion);
    }
    let mut surface = PixmapSurface::new(width as u32, height as u32, measure)?;
    surface.translate(-region.left.round(), -region.top.round());
    scene::render(&mut surface, session);
    Ok(surface.to_rgba_image())
}

/// Render the viewport as SVG with the region as its `viewBox`
pub fn render_svg(
    session: &SessionState,
    selection: Option<ExportSelection>,
    measure: TextMeasure,
) -> Result<SvgSurface, ExportError> {
    let region = export_region(session, selection);
    if region.is_empty() {
        return Err(ExportError::EmptyRegion);
    }
    let mut surface = SvgSurface::new(session.viewport_width, session.viewport_height, measure);
    scene::render(&mut surface, session);
    surface.set_view_box(region);
    Ok(surface)
}

fn write_export(
    session: &SessionState,
    selection: Option<ExportSelection>,
    path: &Path,
    kind: ExportKind,
    measure: TextMeasure,
) -> Result<(), ExportError> {
    match kind {
        ExportKind::Svg => render_svg(session, selection, measure)?.write_to_file(path),
        ExportKind::Png => {
            let image = render_png(session, selection, measure)?;
            let file = std::fs::File::create(path)?;
            write_png(io::BufWriter::new(file), &image)?;
            Ok(())
        }
    }
}

/// Export the session to `path` and return the path actually written
///
/// The kind follows the path's extension (SVG when it has none), and the
/// extension is appended when missing. Whatever the outcome, the export
/// selection is cleared and the session returns to [`Mode::Idle`].
pub fn export_session(
    session: &mut SessionState,
    selection: Option<ExportSelection>,
    path: &Path,
    measure: TextMeasure,
) -> Result<PathBuf, ExportError> {
    let kind = ExportKind::from_path(path).unwrap_or_default();
    let path = normalize_extension(path, kind);
    let result = write_export(session, selection, &path, kind, measure);

    session.clear_export_selection();
    session.set_mode(Mode::Idle);

    match result {
        Ok(()) => {
            log::info!("Exported {}", path.display());
            Ok(path)
        }
        Err(err) => {
            log::error!("Export to {} failed: {}", path.display(), err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::image::RasterImage;
    use crate::domain::{LogicalPoint, PlacedLadder};

    fn session_with_image() -> SessionState {
        let mut session = SessionState::default();
        session.load_image(RasterImage::new(RgbaImage::new(200, 100)), None);
        session
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(
            normalize_extension(Path::new("/tmp/gel"), ExportKind::Svg),
            PathBuf::from("/tmp/gel.svg")
        );
        assert_eq!(
            normalize_extension(Path::new("/tmp/gel.SVG"), ExportKind::Svg),
            PathBuf::from("/tmp/gel.SVG")
        );
        assert_eq!(
            normalize_extension(Path::new("/tmp/gel.tif"), ExportKind::Png),
            PathBuf::from("/tmp/gel.tif.png")
        );
    }

    #[test]
    fn test_kind_from_path() {
        assert_eq!(ExportKind::from_path(Path::new("a.PNG")), Some(ExportKind::Png));
        assert_eq!(ExportKind::from_path(Path::new("a.svg")), Some(ExportKind::Svg));
        assert_eq!(ExportKind::from_path(Path::new("a")), None);
    }

    #[test]
    fn test_default_path_next_to_source() {
        let path = default_export_path(Some(Path::new("/data/gels/run1.tif")), ExportKind::Png).unwrap();
        assert_eq!(path.parent(), Some(Path::new("/data/gels")));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("gel_") && name.ends_with(".png"), "{}", name);
    }

    #[test]
    fn test_png_size_matches_selection() {
        let mut session = session_with_image();
        let selection = ExportSelection::new(LogicalPoint::new(-60.0, -20.0), LogicalPoint::new(60.4, 30.2));
        let image = render_png(&session, Some(selection), TextMeasure::approximate()).unwrap();
        assert_eq!((image.width(), image.height()), (120, 50));

        // Zoom scales the device-space region
        session.transform.set_zoom(2.0);
        let image = render_png(&session, Some(selection), TextMeasure::approximate()).unwrap();
        assert_eq!((image.width(), image.height()), (241, 100));

        let full = render_png(&session, None, TextMeasure::approximate()).unwrap();
        assert_eq!((full.width(), full.height()), (1000, 1000));
    }

    #[test]
    fn test_png_region_content() {
        let session = session_with_image();
        // Half on the black image (x < 100), half on the white background
        let selection = ExportSelection::new(LogicalPoint::new(90.0, -5.0), LogicalPoint::new(110.0, 5.0));
        let image = render_png(&session, Some(selection), TextMeasure::approximate()).unwrap();
        assert_eq!(image.get_pixel(2, 5).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(17, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_selection_is_clipped_to_viewport() {
        let session = session_with_image();
        let selection = ExportSelection::new(LogicalPoint::new(-600.0, -600.0), LogicalPoint::new(0.0, 0.0));
        assert_eq!(export_region(&session, Some(selection)), Rect::from_xywh(0.0, 0.0, 500.0, 500.0));
        let image = render_png(&session, Some(selection), TextMeasure::approximate()).unwrap();
        assert_eq!((image.width(), image.height()), (500, 500));

        let outside = ExportSelection::new(LogicalPoint::new(600.0, 600.0), LogicalPoint::new(700.0, 700.0));
        assert!(matches!(
            render_png(&session, Some(outside), TextMeasure::approximate()),
            Err(ExportError::EmptyRegion)
        ));
    }

    fn dark_pixels(image: &RgbaImage) -> usize {
        image.pixels().filter(|p| p.0[0] < 128).count()
    }

    #[test]
    fn test_png_draws_ladder_labels() {
        let mut session = SessionState::default();
        let name = session.config.ladder.clone();
        session.ladders.push(PlacedLadder::new(
            name,
            LogicalPoint::new(0.0, -300.0),
            LogicalPoint::new(0.0, 300.0),
        ));

        // No bands recorded, so text is the only ink
        let without_font = render_png(&session, None, TextMeasure::approximate()).unwrap();
        assert_eq!(dark_pixels(&without_font), 0);

        let measure = TextMeasure::for_font(&session.config.font);
        let image = render_png(&session, None, measure).unwrap();
        assert!(dark_pixels(&image) > 0);
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let session = session_with_image();
        let selection = ExportSelection::new(LogicalPoint::new(5.0, 5.0), LogicalPoint::new(5.0, 50.0));
        assert!(matches!(
            render_png(&session, Some(selection), TextMeasure::approximate()),
            Err(ExportError::EmptyRegion)
        ));
    }

    #[test]
    fn test_export_session_writes_and_resets() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with_image();
        session.set_mode(Mode::SelectExportRegion);
        let selection = ExportSelection::new(LogicalPoint::new(-10.0, -10.0), LogicalPoint::new(10.0, 10.0));
        session.export_selection = Some(selection);

        let written = export_session(
            &mut session,
            Some(selection),
            &dir.path().join("out"),
            TextMeasure::approximate(),
        )
        .unwrap();
        assert_eq!(written, dir.path().join("out.svg"));
        let svg = std::fs::read_to_string(&written).unwrap();
        assert!(svg.contains(r#"viewBox="490.000 490.000 20.000 20.000""#));
        assert!(session.export_selection.is_none());
        assert_eq!(session.mode, Mode::Idle);

        let png = export_session(&mut session, None, &dir.path().join("out.PNG"), TextMeasure::approximate()).unwrap();
        let decoded = image::open(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1000, 1000));
    }

    #[test]
    fn test_failed_export_still_resets() {
        let mut session = session_with_image();
        session.set_mode(Mode::SelectExportRegion);
        session.export_armed = true;
        let result = export_session(
            &mut session,
            None,
            Path::new("/nonexistent-dir/for/sure/out.png"),
            TextMeasure::approximate(),
        );
        assert!(matches!(result, Err(ExportError::Io(_))));
        assert_eq!(session.mode, Mode::Idle);
        assert!(!session.export_armed);
    }

    #[test]
    fn test_encode_png_signature() {
        let png = encode_png(1, 1, &[1, 2, 3, 255]).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert!(matches!(encode_png(2, 2, &[0; 4]), Err(ExportError::EmptyRegion)));
    }
}
