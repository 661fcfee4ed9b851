//! Closed set of special keys.
//!
//! Key names are resolved through a static table rather than looked up
//! dynamically, so an unknown name is a typed [`PagehandError::InvalidKey`].
//! Lookup is case-insensitive and accepts the usual aliases
//! (`BACK_SPACE`, `ARROW_LEFT`, `COMMAND`, ...).

use crate::result::{PagehandError, PagehandResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Special key understood by WebDriver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Key {
    Null,
    Cancel,
    Help,
    Backspace,
    Tab,
    Clear,
    Return,
    Enter,
    Shift,
    Control,
    Alt,
    Pause,
    Escape,
    Space,
    PageUp,
    PageDown,
    End,
    Home,
    Left,
    Up,
    Right,
    Down,
    Insert,
    Delete,
    Semicolon,
    Equals,
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    Multiply,
    Add,
    Separator,
    Subtract,
    Decimal,
    Divide,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Meta,
}

/// Name table, canonical names first, then aliases
const KEY_NAMES: &[(&str, Key)] = &[
    ("NULL", Key::Null),
    ("CANCEL", Key::Cancel),
    ("HELP", Key::Help),
    ("BACKSPACE", Key::Backspace),
    ("TAB", Key::Tab),
    ("CLEAR", Key::Clear),
    ("RETURN", Key::Return),
    ("ENTER", Key::Enter),
    ("SHIFT", Key::Shift),
    ("CONTROL", Key::Control),
    ("ALT", Key::Alt),
    ("PAUSE", Key::Pause),
    ("ESCAPE", Key::Escape),
    ("SPACE", Key::Space),
    ("PAGE_UP", Key::PageUp),
    ("PAGE_DOWN", Key::PageDown),
    ("END", Key::End),
    ("HOME", Key::Home),
    ("LEFT", Key::Left),
    ("UP", Key::Up),
    ("RIGHT", Key::Right),
    ("DOWN", Key::Down),
    ("INSERT", Key::Insert),
    ("DELETE", Key::Delete),
    ("SEMICOLON", Key::Semicolon),
    ("EQUALS", Key::Equals),
    ("NUMPAD0", Key::Numpad0),
    ("NUMPAD1", Key::Numpad1),
    ("NUMPAD2", Key::Numpad2),
    ("NUMPAD3", Key::Numpad3),
    ("NUMPAD4", Key::Numpad4),
    ("NUMPAD5", Key::Numpad5),
    ("NUMPAD6", Key::Numpad6),
    ("NUMPAD7", Key::Numpad7),
    ("NUMPAD8", Key::Numpad8),
    ("NUMPAD9", Key::Numpad9),
    ("MULTIPLY", Key::Multiply),
    ("ADD", Key::Add),
    ("SEPARATOR", Key::Separator),
    ("SUBTRACT", Key::Subtract),
    ("DECIMAL", Key::Decimal),
    ("DIVIDE", Key::Divide),
    ("F1", Key::F1),
    ("F2", Key::F2),
    ("F3", Key::F3),
    ("F4", Key::F4),
    ("F5", Key::F5),
    ("F6", Key::F6),
    ("F7", Key::F7),
    ("F8", Key::F8),
    ("F9", Key::F9),
    ("F10", Key::F10),
    ("F11", Key::F11),
    ("F12", Key::F12),
    ("META", Key::Meta),
    // aliases
    ("BACK_SPACE", Key::Backspace),
    ("ESC", Key::Escape),
    ("LEFT_SHIFT", Key::Shift),
    ("LEFT_CONTROL", Key::Control),
    ("CTRL", Key::Control),
    ("LEFT_ALT", Key::Alt),
    ("ARROW_LEFT", Key::Left),
    ("ARROW_UP", Key::Up),
    ("ARROW_RIGHT", Key::Right),
    ("ARROW_DOWN", Key::Down),
    ("COMMAND", Key::Meta),
];

impl Key {
    /// Resolve a key name
    ///
    /// # Errors
    ///
    /// Returns [`PagehandError::InvalidKey`] if the name is not in the table.
    pub fn from_name(name: &str) -> PagehandResult<Self> {
        let wanted = name.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        KEY_NAMES
            .iter()
            .find(|(n, _)| *n == wanted)
            .map(|(_, key)| *key)
            .ok_or_else(|| PagehandError::InvalidKey {
                name: name.to_string(),
            })
    }

    /// Canonical name
    #[must_use]
    pub fn name(self) -> &'static str {
        KEY_NAMES
            .iter()
            .find(|(_, key)| *key == self)
            .map_or("NULL", |(n, _)| n)
    }

    /// WebDriver code point (Unicode private use area)
    #[must_use]
    pub const fn code_point(self) -> char {
        match self {
            Self::Null => '\u{E000}',
            Self::Cancel => '\u{E001}',
            Self::Help => '\u{E002}',
            Self::Backspace => '\u{E003}',
            Self::Tab => '\u{E004}',
            Self::Clear => '\u{E005}',
            Self::Return => '\u{E006}',
            Self::Enter => '\u{E007}',
            Self::Shift => '\u{E008}',
            Self::Control => '\u{E009}',
            Self::Alt => '\u{E00A}',
            Self::Pause => '\u{E00B}',
            Self::Escape => '\u{E00C}',
            Self::Space => '\u{E00D}',
            Self::PageUp => '\u{E00E}',
            Self::PageDown => '\u{E00F}',
            Self::End => '\u{E010}',
            Self::Home => '\u{E011}',
            Self::Left => '\u{E012}',
            Self::Up => '\u{E013}',
            Self::Right => '\u{E014}',
            Self::Down => '\u{E015}',
            Self::Insert => '\u{E016}',
            Self::Delete => '\u{E017}',
            Self::Semicolon => '\u{E018}',
            Self::Equals => '\u{E019}',
            Self::Numpad0 => '\u{E01A}',
            Self::Numpad1 => '\u{E01B}',
            Self::Numpad2 => '\u{E01C}',
            Self::Numpad3 => '\u{E01D}',
            Self::Numpad4 => '\u{E01E}',
            Self::Numpad5 => '\u{E01F}',
            Self::Numpad6 => '\u{E020}',
            Self::Numpad7 => '\u{E021}',
            Self::Numpad8 => '\u{E022}',
            Self::Numpad9 => '\u{E023}',
            Self::Multiply => '\u{E024}',
            Self::Add => '\u{E025}',
            Self::Separator => '\u{E026}',
            Self::Subtract => '\u{E027}',
            Self::Decimal => '\u{E028}',
            Self::Divide => '\u{E029}',
            Self::F1 => '\u{E031}',
            Self::F2 => '\u{E032}',
            Self::F3 => '\u{E033}',
            Self::F4 => '\u{E034}',
            Self::F5 => '\u{E035}',
            Self::F6 => '\u{E036}',
            Self::F7 => '\u{E037}',
            Self::F8 => '\u{E038}',
            Self::F9 => '\u{E039}',
            Self::F10 => '\u{E03A}',
            Self::F11 => '\u{E03B}',
            Self::F12 => '\u{E03C}',
            Self::Meta => '\u{E03D}',
        }
    }

    /// Code point as a one-character string, as sent in key actions
    #[must_use]
    pub fn as_value(self) -> String {
        self.code_point().to_string()
    }
}

impl FromStr for Key {
    type Err = PagehandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod lookup_tests {
        use super::*;

        #[test]
        fn test_canonical_names() {
            assert_eq!(Key::from_name("ENTER").unwrap(), Key::Enter);
            assert_eq!(Key::from_name("TAB").unwrap(), Key::Tab);
            assert_eq!(Key::from_name("F12").unwrap(), Key::F12);
        }

        #[test]
        fn test_lookup_is_case_insensitive() {
            assert_eq!(Key::from_name("escape").unwrap(), Key::Escape);
            assert_eq!(Key::from_name(" page down ").unwrap(), Key::PageDown);
            assert_eq!(Key::from_name("page-up").unwrap(), Key::PageUp);
        }

        #[test]
        fn test_aliases() {
            assert_eq!(Key::from_name("BACK_SPACE").unwrap(), Key::Backspace);
            assert_eq!(Key::from_name("ARROW_LEFT").unwrap(), Key::Left);
            assert_eq!(Key::from_name("COMMAND").unwrap(), Key::Meta);
        }

        #[test]
        fn test_return_and_enter_are_distinct() {
            assert_ne!(
                Key::from_name("RETURN").unwrap().code_point(),
                Key::from_name("ENTER").unwrap().code_point()
            );
        }

        #[test]
        fn test_unknown_name_is_invalid_key() {
            let err = Key::from_name("HYPER").unwrap_err();
            assert!(matches!(err, PagehandError::InvalidKey { ref name } if name == "HYPER"));
        }

        #[test]
        fn test_from_str() {
            let key: Key = "space".parse().unwrap();
            assert_eq!(key, Key::Space);
        }
    }

    mod table_tests {
        use super::*;

        #[test]
        fn test_every_table_entry_round_trips_through_its_name() {
            for (name, key) in KEY_NAMES {
                assert_eq!(Key::from_name(name).unwrap(), *key);
                assert_eq!(Key::from_name(key.name()).unwrap(), *key);
            }
        }

        #[test]
        fn test_code_points() {
            assert_eq!(Key::Enter.code_point(), '\u{E007}');
            assert_eq!(Key::Escape.as_value(), "\u{E00C}");
            assert_eq!(Key::Meta.code_point(), '\u{E03D}');
        }

        #[test]
        fn test_display_uses_canonical_name() {
            assert_eq!(Key::Backspace.to_string(), "BACKSPACE");
        }
    }
}
