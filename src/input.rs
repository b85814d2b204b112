//! Input events and the keyboard command map.

use serde::Serialize;

use crate::geom::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Draws the crop rectangle.
    Primary,
    /// Selects and moves existing regions.
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Down(PointerButton, Point),
    Up(PointerButton, Point),
    Move(Point),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
}

/// Which workflow a session runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Edit labels of an existing image/label directory pair.
    Review,
    /// Turn incoming frames into a new dataset.
    Capture,
}

/// Operator commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Add a region from the crop rectangle with the class of this digit key.
    AddRegion(u8),
    DeleteSelected,
    ClearAll,
    Exit,
    Prev,
    Next,
    /// Re-save the current entry's labels.
    Save,
    /// Delete the current entry's image and label files.
    Purge,
    ToggleAdvance,
    ToggleExport,
}

impl Command {
    /// Maps a key to a command for `mode`; `None` for unbound keys.
    pub fn from_key(mode: Mode, key: Key) -> Option<Command> {
        let c = match key {
            Key::Escape => return Some(Command::Exit),
            Key::Char(c) => c,
        };

        if let Some(digit) = c.to_digit(10) {
            return Some(Command::AddRegion(digit as u8));
        }

        match (mode, c) {
            (_, 'x') => Some(Command::DeleteSelected),
            (_, 'z') => Some(Command::ClearAll),
            (Mode::Review, 'a') => Some(Command::Prev),
            (Mode::Review, 'd') => Some(Command::Next),
            (Mode::Review, 's') => Some(Command::Save),
            (Mode::Review, 'p') => Some(Command::Purge),
            (Mode::Capture, 'f') => Some(Command::ToggleAdvance),
            (Mode::Capture, ' ') => Some(Command::ToggleExport),
            _ => None,
        }
    }

    /// Whether the command means anything in `mode`.
    pub fn applies_to(&self, mode: Mode) -> bool {
        match self {
            Command::Prev | Command::Next | Command::Save | Command::Purge => mode == Mode::Review,
            Command::ToggleAdvance | Command::ToggleExport => mode == Mode::Capture,
            _ => true,
        }
    }
}

/// Help text listing the bindings for `mode`.
pub fn key_help(mode: Mode) -> &'static str {
    match mode {
        Mode::Review => concat!(
            "Left click and drag to define region\n",
            "Right click and drag to select & move existing region\n",
            "--> Press number to create new region\n",
            "--> Press 'a' or 'd' to move between training images\n",
            "--> Press 's' to re-save current training image/data\n",
            "--> Press 'x' to delete currently selected regions\n",
            "--> Press 'z' to delete all regions\n",
            "--> Press 'p' to purge current training image/data\n",
            "--> Press Esc to exit\n",
        ),
        Mode::Capture => concat!(
            "Left click and drag to define region\n",
            "Right click and drag to select & move existing region\n",
            "--> Press number to create new region\n",
            "--> Press 'x' to delete currently selected regions\n",
            "--> Press 'z' to delete all regions\n",
            "--> Press 'f' to toggle frame advance\n",
            "--> Press spacebar to toggle training data export\n",
            "--> Press Esc to exit\n",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_add_regions_in_both_modes() {
        for mode in [Mode::Review, Mode::Capture] {
            assert_eq!(
                Command::from_key(mode, Key::Char('7')),
                Some(Command::AddRegion(7))
            );
        }
    }

    #[test]
    fn mode_specific_keys() {
        assert_eq!(
            Command::from_key(Mode::Review, Key::Char('d')),
            Some(Command::Next)
        );
        assert_eq!(Command::from_key(Mode::Capture, Key::Char('d')), None);
        assert_eq!(
            Command::from_key(Mode::Capture, Key::Char(' ')),
            Some(Command::ToggleExport)
        );
        assert_eq!(Command::from_key(Mode::Review, Key::Char(' ')), None);
        assert_eq!(
            Command::from_key(Mode::Review, Key::Escape),
            Some(Command::Exit)
        );
    }

    #[test]
    fn applies_to_matches_key_map() {
        assert!(Command::Purge.applies_to(Mode::Review));
        assert!(!Command::Purge.applies_to(Mode::Capture));
        assert!(Command::ToggleAdvance.applies_to(Mode::Capture));
        assert!(Command::ClearAll.applies_to(Mode::Capture));
    }
}
