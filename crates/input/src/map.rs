//! Key mapping from terminal events to player cursor actions.

use crate::types::{CursorAction, PlayerId};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key press to the player it belongs to and what it does.
///
/// Release and repeat events map to nothing.
pub fn map_key(key: KeyEvent) -> Option<(PlayerId, CursorAction)> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let mapped = match key.code {
        // Player 1
        KeyCode::Char('w') | KeyCode::Char('W') => (PlayerId::One, CursorAction::Up),
        KeyCode::Char('s') | KeyCode::Char('S') => (PlayerId::One, CursorAction::Down),
        KeyCode::Char('a') | KeyCode::Char('A') => (PlayerId::One, CursorAction::Left),
        KeyCode::Char('d') | KeyCode::Char('D') => (PlayerId::One, CursorAction::Right),
        KeyCode::Char(' ') => (PlayerId::One, CursorAction::Select),

        // Player 2
        KeyCode::Up => (PlayerId::Two, CursorAction::Up),
        KeyCode::Down => (PlayerId::Two, CursorAction::Down),
        KeyCode::Left => (PlayerId::Two, CursorAction::Left),
        KeyCode::Right => (PlayerId::Two, CursorAction::Right),
        KeyCode::Enter => (PlayerId::Two, CursorAction::Select),

        _ => return None,
    };
    Some(mapped)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
