use std::collections::BTreeMap;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the unit step `(dx, dy)`; y grows downward like screen rows.
    #[must_use]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Mapping of key names to the direction they steer towards.
///
/// Key names follow the browser convention (`ArrowLeft`, `Escape`, `a`), see
/// [`key_name`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMap(BTreeMap<String, Direction>);

impl KeyMap {
    /// Arrow keys plus WASD.
    #[must_use]
    pub fn arrows_and_wasd() -> Self {
        let bindings = [
            ("ArrowLeft", Direction::Left),
            ("ArrowRight", Direction::Right),
            ("ArrowUp", Direction::Up),
            ("ArrowDown", Direction::Down),
            ("a", Direction::Left),
            ("d", Direction::Right),
            ("w", Direction::Up),
            ("s", Direction::Down),
        ];

        Self(
            bindings
                .into_iter()
                .map(|(key, direction)| (key.to_owned(), direction))
                .collect(),
        )
    }

    /// Looks up the direction bound to `key`, if any.
    #[must_use]
    pub fn direction_for(&self, key: &str) -> Option<Direction> {
        self.0.get(key).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::arrows_and_wasd()
    }
}

/// High-level input events consumed by the runtime loop.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum InputEvent {
    /// A named key press for the game's key listener.
    Key(String),
    Quit,
}

/// Returns the browser-style name of a key, or `None` for keys without one.
#[must_use]
pub fn key_name(key: KeyEvent) -> Option<String> {
    let name = match key.code {
        KeyCode::Left => "ArrowLeft".to_owned(),
        KeyCode::Right => "ArrowRight".to_owned(),
        KeyCode::Up => "ArrowUp".to_owned(),
        KeyCode::Down => "ArrowDown".to_owned(),
        KeyCode::Esc => "Escape".to_owned(),
        KeyCode::Enter => "Enter".to_owned(),
        KeyCode::Tab => "Tab".to_owned(),
        KeyCode::Backspace => "Backspace".to_owned(),
        KeyCode::Char(' ') => " ".to_owned(),
        KeyCode::Char(c) => c.to_string(),
        _ => return None,
    };

    Some(name)
}

/// Classifies a raw key event. Quit keys never reach the game.
#[must_use]
pub fn classify_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(InputEvent::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(InputEvent::Quit),
        _ => key_name(key).map(InputEvent::Key),
    }
}

/// Waits up to `timeout` for one key press.
pub fn poll_input(timeout: Duration) -> io::Result<Option<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) => Ok(classify_key(key)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::{classify_key, key_name, Direction, InputEvent, KeyMap};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn offsets_grow_downward() {
        assert_eq!(Direction::Up.offset(), (0, -1));
        assert_eq!(Direction::Down.offset(), (0, 1));
        assert_eq!(Direction::Left.offset(), (-1, 0));
        assert_eq!(Direction::Right.offset(), (1, 0));
    }

    #[test]
    fn default_keymap_binds_arrows_and_wasd() {
        let keymap = KeyMap::default();

        assert_eq!(keymap.direction_for("ArrowLeft"), Some(Direction::Left));
        assert_eq!(keymap.direction_for("ArrowDown"), Some(Direction::Down));
        assert_eq!(keymap.direction_for("w"), Some(Direction::Up));
        assert_eq!(keymap.direction_for("x"), None);
        assert_eq!(keymap.len(), 8);
    }

    #[test]
    fn keymap_deserializes_from_plain_object() {
        let keymap: KeyMap =
            serde_json::from_str(r#"{"h": "left", "l": "right"}"#).expect("keymap should parse");

        assert_eq!(keymap.direction_for("h"), Some(Direction::Left));
        assert_eq!(keymap.direction_for("l"), Some(Direction::Right));
        assert_eq!(keymap.direction_for("ArrowLeft"), None);
    }

    #[test]
    fn key_names_follow_browser_convention() {
        assert_eq!(key_name(press(KeyCode::Left)).as_deref(), Some("ArrowLeft"));
        assert_eq!(key_name(press(KeyCode::Up)).as_deref(), Some("ArrowUp"));
        assert_eq!(key_name(press(KeyCode::Char('a'))).as_deref(), Some("a"));
        assert_eq!(key_name(press(KeyCode::F(5))), None);
    }

    #[test]
    fn quit_keys_are_not_forwarded() {
        assert_eq!(classify_key(press(KeyCode::Char('q'))), Some(InputEvent::Quit));
        assert_eq!(classify_key(press(KeyCode::Esc)), Some(InputEvent::Quit));
        assert_eq!(
            classify_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputEvent::Quit)
        );
        assert_eq!(
            classify_key(press(KeyCode::Right)),
            Some(InputEvent::Key("ArrowRight".to_owned()))
        );
    }

    #[test]
    fn key_releases_are_dropped() {
        let release = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };

        assert_eq!(classify_key(release), None);
    }
}
