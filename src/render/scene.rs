//! Frame renderer
//!
//! Draws a [`SessionState`] onto any [`DrawingContext`] in a fixed order:
//! image, crop mask, ladders, lane labels, export selection. The crop mask
//! sits above the image and below the annotations so labels outside the
//! crop stay visible. Rendering never mutates the session.

use super::context::{Color, DrawingContext, TextStyle};
use crate::session::state::SessionState;
use crate::solver::{self, LabelSide};
use crate::transform::TransformContext;

/// Crop mask fill
pub const MASK_COLOR: Color = Color::WHITE;
/// Export selection outline
pub const SELECTION_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 0.8);
pub const ANNOTATION_COLOR: Color = Color::BLACK;

/// Device-pixel offsets of the ladder connecting line
const LINE_START_PX: f64 = 3.0;
const LINE_ELBOW_PX: f64 = 7.0;
const LINE_BAND_PX: f64 = 8.0;
const LINE_WIDTH_PX: f64 = 1.0;

/// Render one frame of `session`
pub fn render(ctx: &mut impl DrawingContext, session: &SessionState) {
    let view = session.transform_context();
    let zoom = session.transform.zoom();

    ctx.clear(Color::WHITE);
    ctx.save();
    ctx.translate(session.viewport_width / 2.0, session.viewport_height / 2.0);
    ctx.scale(zoom, zoom);
    ctx.translate(session.transform.pan_x, session.transform.pan_y);

    draw_image(ctx, session);
    draw_crop_mask(ctx, session, &view);
    draw_ladders(ctx, session, &view);
    draw_lane_labels(ctx, session, &view);
    draw_export_selection(ctx, session, &view);

    ctx.restore();
}

fn draw_image(ctx: &mut impl DrawingContext, session: &SessionState) {
    let (Some(raster), Some(placement)) = (&session.raster, &session.placement) else {
        return;
    };
    ctx.save();
    ctx.translate(placement.center.x, placement.center.y);
    ctx.rotate(placement.rotation);
    ctx.draw_image(
        raster,
        -f64::from(placement.width) / 2.0,
        -f64::from(placement.height) / 2.0,
    );
    ctx.restore();
}

fn draw_crop_mask(ctx: &mut impl DrawingContext, session: &SessionState, view: &TransformContext) {
    let Some(crop) = session.crop else {
        return;
    };
    for region in crop.mask_regions(view.visible_logical_rect()) {
        if !region.is_empty() {
            ctx.fill_rect(region, MASK_COLOR);
        }
    }
}

fn draw_ladders(ctx: &mut impl DrawingContext, session: &SessionState, view: &TransformContext) {
    let style = TextStyle {
        font: &session.config.font,
        size: view.scale_distance(session.config.font.size_px),
        color: ANNOTATION_COLOR,
    };
    let px = |d: f64| view.scale_distance(d);

    for ladder in &session.ladders {
        let Some(definition) = session.ladder_table.get(&ladder.definition) else {
            log::warn!("Ladder '{}' is not in the ladder table, skipping", ladder.definition);
            continue;
        };
        let layout = solver::layout(ladder, definition, session.config.unit);
        // Lines run from the label column toward the bands
        let dir = match layout.side {
            LabelSide::LeftOfBands => 1.0,
            LabelSide::RightOfBands => -1.0,
        };

        for tick in &layout.ticks {
            let extents = ctx.measure_text(&tick.label, &style);
            let text_x = match layout.side {
                LabelSide::LeftOfBands => layout.anchor_x - extents.width,
                LabelSide::RightOfBands => layout.anchor_x,
            };
            ctx.draw_text(text_x, tick.y, &tick.label, &style);

            if let Some(band) = tick.band {
                let lifted = tick.y - extents.height / 4.0;
                ctx.move_to(layout.anchor_x + dir * px(LINE_START_PX), lifted);
                ctx.line_to(layout.anchor_x + dir * px(LINE_ELBOW_PX), lifted);
                ctx.line_to(layout.band_x - dir * px(LINE_BAND_PX), band.y);
                ctx.line_to(layout.band_x, band.y);
                ctx.stroke(ANNOTATION_COLOR, px(LINE_WIDTH_PX));
            }
        }
    }
}

fn draw_lane_labels(ctx: &mut impl DrawingContext, session: &SessionState, view: &TransformContext) {
    let markers = &session.lane_markers;
    if markers.is_empty() {
        return;
    }
    let average_y = markers.iter().map(|m| m.y).sum::<f64>() / markers.len() as f64;
    let labels = &session.config.labels;
    let style = TextStyle {
        font: &session.config.font,
        size: view.scale_distance(session.config.font.size_px),
        color: ANNOTATION_COLOR,
    };

    for (index, marker) in markers.iter().enumerate() {
        let text = match labels.label(index) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("{}; remaining lanes are left unlabelled", err);
                break;
            }
        };
        if labels.is_custom() {
            ctx.save();
            ctx.translate(marker.x, average_y);
            ctx.rotate(labels.rotation_degrees.to_radians());
            ctx.draw_text(0.0, 0.0, &text, &style);
            ctx.restore();
        } else {
            let extents = ctx.measure_text(&text, &style);
            ctx.draw_text(marker.x - extents.width / 2.0, average_y, &text, &style);
        }
    }
}

fn draw_export_selection(
    ctx: &mut impl DrawingContext,
    session: &SessionState,
    view: &TransformContext,
) {
    if !session.export_armed {
        return;
    }
    let Some(selection) = session.export_selection else {
        return;
    };
    let [a, b, c, d] = selection.rect().corners();
    ctx.move_to(a.x, a.y);
    ctx.line_to(b.x, b.y);
    ctx.line_to(c.x, c.y);
    ctx.line_to(d.x, d.y);
    ctx.close_path();
    ctx.stroke(SELECTION_COLOR, view.scale_distance(1.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::image::RasterImage;
    use crate::domain::{
        CropBox, ExportSelection, LadderDefinition, LadderTable, LogicalPoint, MarkStyle,
        PlacedLadder,
    };
    use crate::render::recording::{DrawCommand, RecordingSurface};

    fn scenario_session() -> SessionState {
        let def = LadderDefinition::new("scenario", &[10000.0, 5000.0, 1000.0]).unwrap();
        let mut session = SessionState::new(Default::default(), LadderTable::new(vec![def]));
        session.load_image(RasterImage::new(image::RgbaImage::new(2000, 1500)), None);
        session.ladders.push(PlacedLadder::new(
            "scenario",
            LogicalPoint::new(0.0, -200.0),
            LogicalPoint::new(0.0, 200.0),
        ));
        session
    }

    fn strokes(surface: &RecordingSurface) -> usize {
        surface.count(|c| matches!(c, DrawCommand::Stroke { .. }))
    }

    #[test]
    fn test_scenario_three_ticks_no_lines() {
        let session = scenario_session();
        let mut surface = RecordingSurface::new();
        render(&mut surface, &session);

        assert_eq!(surface.texts(), ["10000 bp", "5000 bp", "1000 bp"]);
        assert_eq!(strokes(&surface), 0);

        let ys: Vec<f64> = surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        let mid = -200.0
            + (400.0 / (1000f64.log10() - 10000f64.log10())) * (5000f64.log10() - 10000f64.log10());
        assert!((ys[0] + 200.0).abs() < 1e-9);
        assert!((ys[1] - mid).abs() < 1e-9);
        assert!((ys[2] - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_draw_order() {
        let mut session = scenario_session();
        session.crop = Some(CropBox::new(LogicalPoint::new(-100.0, -50.0), LogicalPoint::new(100.0, 50.0)));
        session.lane_markers.push(LogicalPoint::new(10.0, 300.0));
        session.export_selection = Some(ExportSelection::new(LogicalPoint::ORIGIN, LogicalPoint::new(5.0, 5.0)));
        session.export_armed = true;

        let mut surface = RecordingSurface::new();
        render(&mut surface, &session);
        let pos = |pred: fn(&DrawCommand) -> bool| surface.commands.iter().position(pred).unwrap();

        let image = pos(|c| matches!(c, DrawCommand::Image { .. }));
        let mask = pos(|c| matches!(c, DrawCommand::FillRect { .. }));
        let ladder = pos(|c| matches!(c, DrawCommand::Text { text, .. } if text == "10000 bp"));
        let lane = pos(|c| matches!(c, DrawCommand::Text { text, .. } if text == "A"));
        let outline = pos(|c| matches!(c, DrawCommand::Stroke { color, .. } if *color == SELECTION_COLOR));

        assert!(matches!(surface.commands[0], DrawCommand::Clear(_)));
        assert!(image < mask && mask < ladder && ladder < lane && lane < outline);
        assert!(matches!(surface.commands.last(), Some(DrawCommand::Restore)));
    }

    #[test]
    fn test_band_lines_match_recorded_count() {
        let mut session = scenario_session();
        session.ladders[0].bands.push(LogicalPoint::new(100.0, -190.0));
        session.ladders[0].bands.push(LogicalPoint::new(100.0, -20.0));
        let mut surface = RecordingSurface::new();
        render(&mut surface, &session);
        assert_eq!(surface.texts(), ["10000 bp", "5000 bp"]);
        assert_eq!(strokes(&surface), 2);
    }

    #[test]
    fn test_left_of_bands_geometry() {
        let mut session = scenario_session();
        session.ladders[0].bands.push(LogicalPoint::new(100.0, -190.0));
        let mut surface = RecordingSurface::new();
        render(&mut surface, &session);

        // approximate metrics: width = 0.6 * 11 * 8 chars, height = 0.7 * 11
        let width = 0.6 * 11.0 * 8.0;
        let lifted = -200.0 - 0.7 * 11.0 / 4.0;
        let cmds = &surface.commands;
        let text_at = cmds
            .iter()
            .position(|c| matches!(c, DrawCommand::Text { .. }))
            .unwrap();
        match &cmds[text_at] {
            DrawCommand::Text { x, .. } => assert!((x + width).abs() < 1e-9),
            other => panic!("unexpected {:?}", other),
        }
        let path: Vec<(f64, f64)> = cmds[text_at + 1..text_at + 5]
            .iter()
            .map(|c| match c {
                DrawCommand::MoveTo(x, y) | DrawCommand::LineTo(x, y) => (*x, *y),
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        let expected = [(3.0, lifted), (7.0, lifted), (92.0, -190.0), (100.0, -190.0)];
        for (got, want) in path.iter().zip(expected) {
            assert!((got.0 - want.0).abs() < 1e-9 && (got.1 - want.1).abs() < 1e-9, "{:?}", path);
        }
    }

    #[test]
    fn test_lane_labels_share_average_y() {
        let mut session = scenario_session();
        session.ladders.clear();
        session.lane_markers = vec![LogicalPoint::new(-50.0, 10.0), LogicalPoint::new(50.0, 30.0)];
        let mut surface = RecordingSurface::new();
        render(&mut surface, &session);

        let half = 0.6 * 11.0 / 2.0;
        let texts: Vec<_> = surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { x, y, text, .. } => Some((*x, *y, text.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 2);
        assert!((texts[0].0 - (-50.0 - half)).abs() < 1e-9);
        assert!((texts[1].0 - (50.0 - half)).abs() < 1e-9);
        assert_eq!(texts[0].1, 20.0);
        assert_eq!(texts[1].1, 20.0);
        assert_eq!((texts[0].2.as_str(), texts[1].2.as_str()), ("A", "B"));
    }

    #[test]
    fn test_custom_labels_rotate_and_stop_at_list_end() {
        let mut session = scenario_session();
        session.ladders.clear();
        session.config.labels.marks = MarkStyle::Custom;
        session.config.labels.custom_marks = vec!["WT".to_string()];
        session.config.labels.set_rotation(45.0);
        session.lane_markers = vec![LogicalPoint::new(5.0, 0.0), LogicalPoint::new(25.0, 0.0)];

        let mut surface = RecordingSurface::new();
        render(&mut surface, &session);
        assert_eq!(surface.texts(), ["WT"]);
        assert!(surface.commands.contains(&DrawCommand::Rotate(45f64.to_radians())));
        assert!(surface.commands.contains(&DrawCommand::Translate(5.0, 0.0)));
    }

    #[test]
    fn test_crop_mask_fills_four_regions() {
        let mut session = scenario_session();
        session.ladders.clear();
        session.crop = Some(CropBox::new(LogicalPoint::new(-100.0, -50.0), LogicalPoint::new(100.0, 50.0)));
        let mut surface = RecordingSurface::new();
        render(&mut surface, &session);

        let area: f64 = surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, color } => {
                    assert_eq!(*color, MASK_COLOR);
                    Some(rect.area())
                }
                _ => None,
            })
            .sum();
        assert_eq!(area, 1000.0 * 1000.0 - 200.0 * 100.0);
    }

    #[test]
    fn test_selection_hidden_when_not_armed() {
        let mut session = scenario_session();
        session.ladders.clear();
        session.export_selection = Some(ExportSelection::new(LogicalPoint::ORIGIN, LogicalPoint::new(5.0, 5.0)));
        let mut surface = RecordingSurface::new();
        render(&mut surface, &session);
        assert_eq!(strokes(&surface), 0);
    }

    #[test]
    fn test_fonts_scale_with_zoom() {
        let mut session = scenario_session();
        session.transform.set_zoom(2.0);
        let mut surface = RecordingSurface::new();
        render(&mut surface, &session);
        assert!(surface
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { size, .. } if *size == 5.5)));
    }
}
