use crate::config::Tool;

/// Keys the overlay reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    Character(char),
}

/// Overlay action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    UnsetTool,
    SetTool(Tool),
    ClearCurrentSlice,
}

pub fn handle_key_event(key: Key, session_active: bool) -> Option<Command> {
    match key {
        Key::Escape => Some(Command::UnsetTool),
        // Tool shortcuts replace any running session
        Key::Character(c) if c.eq_ignore_ascii_case(&'r') => {
            Some(Command::SetTool(Tool::Rectangle))
        }
        Key::Character(c) if c.eq_ignore_ascii_case(&'p') => Some(Command::SetTool(Tool::Polygon)),
        // Clear shortcuts (idle only)
        Key::Delete | Key::Backspace if !session_active => Some(Command::ClearCurrentSlice),
        _ => None,
    }
}
