//! Message types for the annotation session
//!
//! This module contains:
//! - Pointer events coming from the canvas
//! - Commands coming from menus, toolbars and shortcuts
//! - Effects the GUI layer has to carry out after an event is handled

use std::path::PathBuf;

use crate::config::FontSpec;
use crate::domain::{DevicePoint, ExportSelection, MarkStyle, Unit};
use crate::error::ConfigurationError;

// ============================================================================
// Input Types
// ============================================================================

/// Keyboard modifiers held during an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Precision modifier: pans on drag, suppresses commits on release
    pub control: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        control: false,
        shift: false,
    };
    pub const CONTROL: Modifiers = Modifiers {
        control: true,
        shift: false,
    };

    pub fn control(self) -> bool {
        self.control
    }

    pub fn shift(self) -> bool {
        self.shift
    }
}

/// Raw pointer input in device coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Primary button pressed
    Down {
        position: DevicePoint,
        modifiers: Modifiers,
    },
    /// Pointer moved; `primary_held` is true while dragging
    Move {
        position: DevicePoint,
        modifiers: Modifiers,
        primary_held: bool,
    },
    /// Primary button released
    Up {
        position: DevicePoint,
        modifiers: Modifiers,
    },
    /// Wheel scrolled; positive notches zoom in
    Wheel { notches: i32 },
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self::Down {
            position: DevicePoint::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn drag(x: f64, y: f64) -> Self {
        Self::Move {
            position: DevicePoint::new(x, y),
            modifiers: Modifiers::NONE,
            primary_held: true,
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::Up {
            position: DevicePoint::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    /// The same event with `modifiers` held
    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        match self {
            Self::Down { position, .. } => Self::Down {
                position,
                modifiers,
            },
            Self::Move {
                position,
                primary_held,
                ..
            } => Self::Move {
                position,
                modifiers,
                primary_held,
            },
            Self::Up { position, .. } => Self::Up {
                position,
                modifiers,
            },
            wheel @ Self::Wheel { .. } => wheel,
        }
    }
}

/// Named keys used by shortcuts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Named {
    Escape,
}

/// A key press as delivered by the windowing layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Character(String),
    Named(Named),
}

// ============================================================================
// Commands
// ============================================================================

/// User intents from menus, toolbars, option controls and shortcuts
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Ask the GUI to show a file-open dialog
    ShowOpenDialog,
    /// Load the image at the path, replacing the session
    Open(PathBuf),
    /// Export the whole viewport
    SaveImage,
    /// Enter export-region selection; releasing the drag exports
    ExportSelection,
    /// Start placing the configured ladder
    PutLadder,
    /// Select a ladder by name and start placing it
    SelectLadder(String),
    SetUnit(Unit),
    /// Select a label style and start labelling lanes
    SetMarkStyle(MarkStyle),
    /// Replace the custom label list, one label per line
    SetCustomMarks(String),
    SetLabelRotation(f64),
    SetFont(FontSpec),
    MoveImage,
    RotateImage,
    CropImage,
    LabelLanes,
    InvertColors,
    Grayscale,
    RemoveLadders,
    RemoveLabels,
    RemoveCrop,
    /// Canvas resized (device pixels)
    Resize(f64, f64),
    /// Leave the current mode
    Cancel,
}

// ============================================================================
// Effects
// ============================================================================

/// What the GUI layer must do after an event was handled
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Effect {
    /// Nothing changed
    #[default]
    None,
    /// The session changed; repaint
    Redraw,
    /// Show the open dialog, then send [`Command::Open`]
    ShowOpenDialog,
    /// Ask for a destination and export; `selection` limits the region
    ExportRequested { selection: Option<ExportSelection> },
    /// The gesture was refused and left the session unchanged; show the error
    Rejected(ConfigurationError),
}

impl Effect {
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, Effect::None | Effect::ShowOpenDialog | Effect::Rejected(_))
    }
}
