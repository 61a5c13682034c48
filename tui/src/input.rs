//! Keyboard mapping for the round loop. One action per keypress;
//! unrecognized keys are swallowed.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// One player action per input-loop iteration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Reveal,
    Flag,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Block until a key maps to an action.
pub fn read_action() -> io::Result<Action> {
    loop {
        if let Some(key) = next_key_press()? {
            if let Some(action) = map_key(key) {
                return Ok(action);
            }
        }
    }
}

/// Block for the acknowledgement keypress after a finished round.
pub fn wait_any_key() -> io::Result<()> {
    while next_key_press()?.is_none() {}
    Ok(())
}

/// `y`/`Y` accepts, anything else declines.
pub fn confirm() -> io::Result<bool> {
    loop {
        if let Some(key) = next_key_press()? {
            return Ok(matches!(key.code, KeyCode::Char('y' | 'Y')));
        }
    }
}

/// Next key-down event. Repeats and releases (reported by terminals with
/// the enhanced keyboard protocol) are dropped.
fn next_key_press() -> io::Result<Option<KeyEvent>> {
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

fn map_key(key: KeyEvent) -> Option<Action> {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
        (_, KeyCode::Up) => Some(Action::Move(Direction::Up)),
        (_, KeyCode::Down) => Some(Action::Move(Direction::Down)),
        (_, KeyCode::Left) => Some(Action::Move(Direction::Left)),
        (_, KeyCode::Right) => Some(Action::Move(Direction::Right)),
        (_, KeyCode::Enter) => Some(Action::Reveal),
        (_, KeyCode::Char(' ')) => Some(Action::Flag),
        (_, KeyCode::Char('q')) => Some(Action::Quit),
        _ => None,
    }
}
