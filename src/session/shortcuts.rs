use crate::session::messages::{Command, Key, Modifiers, Named};
use crate::session::state::{Mode, SessionState};

pub fn handle_key_event(session: &SessionState, key: &Key, modifiers: Modifiers) -> Option<Command> {
    // Image commands need something to work on
    let has_image = session.has_image();

    match key {
        Key::Named(Named::Escape) if session.mode != Mode::Idle => Some(Command::Cancel),
        Key::Character(c) if c.eq_ignore_ascii_case("o") && modifiers.control() => {
            Some(Command::ShowOpenDialog)
        }
        // Ctrl+Shift+S: export a dragged region
        Key::Character(c)
            if c.eq_ignore_ascii_case("s") && modifiers.control() && modifiers.shift() && has_image =>
        {
            Some(Command::ExportSelection)
        }
        Key::Character(c) if c.eq_ignore_ascii_case("s") && modifiers.control() && has_image => {
            Some(Command::SaveImage)
        }
        Key::Character(c) if modifiers.control() && has_image => match c.to_ascii_lowercase().as_str() {
            "l" => Some(Command::PutLadder),
            "m" => Some(Command::MoveImage),
            "i" => Some(Command::InvertColors),
            "g" => Some(Command::Grayscale),
            "r" => Some(Command::RotateImage),
            "k" => Some(Command::CropImage),
            "j" => Some(Command::LabelLanes),
            _ => None,
        },
        _ => None,
    }
}
