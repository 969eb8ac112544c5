//! Session event handlers
//!
//! Handles pointer events (the mode-driven state machine) and GUI commands.
//! Every handler mutates the session and returns the [`Effect`] the GUI has
//! to carry out; rendering happens afterwards as a pure read.

use crate::capture::image::ImageProvider;
use crate::domain::{CropBox, DevicePoint, ExportSelection, PlacedLadder};
use crate::error::GelError;
use crate::render::context::hit_test_path;
use crate::session::messages::{Command, Effect, Modifiers, PointerEvent};
use crate::session::state::{DragState, Mode, SessionState};

/// Radians of image rotation per logical unit of horizontal drag
pub const ROTATION_PER_UNIT: f64 = 0.01;

/// Handle a pointer event
///
/// Total over every (mode, event) pair: events a mode does not expect are
/// no-ops.
pub fn handle_pointer_event(session: &mut SessionState, event: PointerEvent) -> Effect {
    match event {
        PointerEvent::Down { position, .. } => pointer_down(session, position),
        PointerEvent::Move {
            position,
            modifiers,
            primary_held,
        } => {
            if primary_held && session.drag.pressed {
                pointer_drag(session, position, modifiers)
            } else {
                Effect::None
            }
        }
        PointerEvent::Up {
            position,
            modifiers,
        } => pointer_up(session, position, modifiers),
        PointerEvent::Wheel { notches } => {
            session.transform.zoom_by_notches(notches);
            Effect::Redraw
        }
    }
}

// ============================================================================
// Pointer handlers
// ============================================================================

fn pointer_down(session: &mut SessionState, position: DevicePoint) -> Effect {
    let view = session.transform_context();
    let p = view.device_to_logical(position);
    // The outline is hit on its fill or on its one-pixel stroke
    let image_hit = session.placement.as_ref().is_some_and(|placement| {
        hit_test_path(&placement.outline(), p, view.scale_distance(1.0)).hit()
    });

    session.drag = DragState {
        pressed: true,
        start: p,
        current: p,
        last_device: position,
        image_hit,
    };

    if session.mode == Mode::SelectExportRegion {
        session.export_armed = true;
        return Effect::Redraw;
    }
    Effect::None
}

fn pointer_drag(session: &mut SessionState, position: DevicePoint, modifiers: Modifiers) -> Effect {
    if modifiers.control() {
        // Pan: the logical point under the pointer stays put
        let zoom = session.transform.zoom();
        let dx = (position.x - session.drag.last_device.x) / zoom;
        let dy = (position.y - session.drag.last_device.y) / zoom;
        session.transform.pan_by(dx, dy);
        session.drag.last_device = position;
        return Effect::Redraw;
    }

    let new = session.transform_context().device_to_logical(position);
    let (dx, dy) = new.delta(session.drag.current);
    session.drag.current = new;
    session.drag.last_device = position;
    let DragState { start, current, .. } = session.drag;

    match session.mode {
        Mode::MoveImage => {
            if !session.drag.image_hit {
                return Effect::None;
            }
            if let Some(placement) = session.placement.as_mut() {
                placement.translate(dx, dy);
            }
        }
        Mode::AddLadderAnchor => {
            session.discard_ladder_in_progress();
            session
                .ladders
                .push(PlacedLadder::new(session.config.ladder.clone(), start, current));
            session.ladder_in_progress = true;
        }
        Mode::RotateImage => {
            if let Some(placement) = session.placement.as_mut() {
                placement.rotation = ROTATION_PER_UNIT * (start.x - current.x);
            }
        }
        Mode::CropImage => session.crop = Some(CropBox::new(start, current)),
        Mode::SelectExportRegion => {
            session.export_selection = Some(ExportSelection::new(start, current));
        }
        Mode::Idle | Mode::RecordLadderBands | Mode::LabelLanes => return Effect::None,
    }
    Effect::Redraw
}

fn pointer_up(session: &mut SessionState, position: DevicePoint, modifiers: Modifiers) -> Effect {
    let p = session.transform_context().device_to_logical(position);
    session.drag.pressed = false;

    if modifiers.control() {
        return Effect::None;
    }

    match session.mode {
        Mode::AddLadderAnchor => {
            if !session.ladder_in_progress {
                return Effect::None;
            }
            session.ladder_in_progress = false;
            log::debug!("Ladder '{}' placed", session.config.ladder);
            session.set_mode(Mode::RecordLadderBands);
            Effect::Redraw
        }
        Mode::RecordLadderBands => {
            let table = &session.ladder_table;
            let Some(ladder) = session.ladders.last_mut() else {
                return Effect::None;
            };
            let capacity = table.get(&ladder.definition).map_or(0, |d| d.len());
            if ladder.record_band(p, capacity) {
                log::debug!("Band {} of '{}' recorded", ladder.bands.len(), ladder.definition);
                Effect::Redraw
            } else {
                log::warn!(
                    "All {} bands of '{}' are already recorded, ignoring click",
                    capacity,
                    ladder.definition
                );
                Effect::None
            }
        }
        Mode::SelectExportRegion => {
            session.export_armed = false;
            session.set_mode(Mode::Idle);
            Effect::ExportRequested {
                selection: session.export_selection,
            }
        }
        Mode::LabelLanes => {
            if let Err(err) = session.config.labels.label(session.lane_markers.len()) {
                log::warn!("Lane not labelled: {}", err);
                return Effect::Rejected(err);
            }
            session.lane_markers.push(p);
            Effect::Redraw
        }
        Mode::Idle | Mode::MoveImage | Mode::RotateImage | Mode::CropImage => Effect::None,
    }
}

// ============================================================================
// Command handlers
// ============================================================================

/// Switch modes, dropping transient state that belongs to the mode being left
fn enter_mode(session: &mut SessionState, mode: Mode) {
    if session.mode == Mode::SelectExportRegion && mode != Mode::SelectExportRegion {
        session.clear_export_selection();
    }
    session.discard_ladder_in_progress();
    session.drag.pressed = false;
    session.set_mode(mode);
}

fn require_image(session: &SessionState) -> Result<(), GelError> {
    if session.has_image() {
        Ok(())
    } else {
        Err(GelError::NoImage)
    }
}

/// Handle a GUI command
///
/// On error the session is left as it was before the command.
pub fn handle_command(
    session: &mut SessionState,
    provider: &impl ImageProvider,
    command: Command,
) -> Result<Effect, GelError> {
    match command {
        Command::ShowOpenDialog => Ok(Effect::ShowOpenDialog),
        Command::Open(path) => {
            let raster = provider.open(&path)?;
            log::info!(
                "Opened {} ({}x{})",
                path.display(),
                raster.width(),
                raster.height()
            );
            session.load_image(raster, Some(path));
            Ok(Effect::Redraw)
        }
        Command::SaveImage => {
            require_image(session)?;
            enter_mode(session, Mode::Idle);
            session.clear_export_selection();
            Ok(Effect::ExportRequested { selection: None })
        }
        Command::ExportSelection => {
            require_image(session)?;
            session.clear_export_selection();
            enter_mode(session, Mode::SelectExportRegion);
            Ok(Effect::Redraw)
        }
        Command::PutLadder => {
            session.selected_ladder()?;
            enter_mode(session, Mode::AddLadderAnchor);
            Ok(Effect::Redraw)
        }
        Command::SelectLadder(name) => {
            session.ladder_table.require(&name)?;
            session.config.ladder = name;
            enter_mode(session, Mode::AddLadderAnchor);
            Ok(Effect::Redraw)
        }
        Command::SetUnit(unit) => {
            session.config.unit = unit;
            Ok(Effect::Redraw)
        }
        Command::SetMarkStyle(marks) => {
            let mut labels = session.config.labels.clone();
            labels.marks = marks;
            labels.labels(session.lane_markers.len())?;
            session.config.labels = labels;
            enter_mode(session, Mode::LabelLanes);
            Ok(Effect::Redraw)
        }
        Command::SetCustomMarks(text) => {
            let mut labels = session.config.labels.clone();
            labels.set_custom_marks_from_text(&text);
            labels.labels(session.lane_markers.len())?;
            session.config.labels = labels;
            Ok(Effect::Redraw)
        }
        Command::SetLabelRotation(degrees) => {
            session.config.labels.set_rotation(degrees);
            Ok(Effect::Redraw)
        }
        Command::SetFont(font) => {
            session.config.font = font;
            Ok(Effect::Redraw)
        }
        Command::MoveImage => mode_command(session, Mode::MoveImage),
        Command::RotateImage => mode_command(session, Mode::RotateImage),
        Command::CropImage => mode_command(session, Mode::CropImage),
        Command::LabelLanes => mode_command(session, Mode::LabelLanes),
        Command::InvertColors => {
            let raster = session.raster.as_ref().ok_or(GelError::NoImage)?;
            let inverted = provider.invert_colors(raster);
            session.replace_raster(inverted);
            Ok(Effect::Redraw)
        }
        Command::Grayscale => {
            let raster = session.raster.as_ref().ok_or(GelError::NoImage)?;
            let gray = provider.to_grayscale(raster);
            session.replace_raster(gray);
            Ok(Effect::Redraw)
        }
        Command::RemoveLadders => {
            session.clear_ladders();
            enter_mode(session, Mode::Idle);
            Ok(Effect::Redraw)
        }
        Command::RemoveLabels => {
            session.clear_lane_markers();
            enter_mode(session, Mode::Idle);
            Ok(Effect::Redraw)
        }
        Command::RemoveCrop => {
            session.crop = None;
            Ok(Effect::Redraw)
        }
        Command::Resize(width, height) => {
            session.set_viewport(width, height);
            Ok(Effect::Redraw)
        }
        Command::Cancel => {
            enter_mode(session, Mode::Idle);
            Ok(Effect::Redraw)
        }
    }
}

fn mode_command(session: &mut SessionState, mode: Mode) -> Result<Effect, GelError> {
    require_image(session)?;
    enter_mode(session, mode);
    Ok(Effect::Redraw)
}
