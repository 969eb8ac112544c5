//! Annotation session management module
//!
//! This module contains:
//! - Session state and interaction modes
//! - Message types for pointer input, commands and effects
//! - The pointer state machine and command handlers
//! - Keyboard shortcuts

pub mod handlers;
pub mod messages;
pub mod shortcuts;
pub mod state;

pub use handlers::{handle_command, handle_pointer_event};
pub use messages::{Command, Effect, Key, Modifiers, Named, PointerEvent};
pub use state::{DragState, Mode, SessionState};
