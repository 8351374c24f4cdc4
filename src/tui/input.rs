//! Keyboard and mouse mapping.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use glitch_engine::Position;
use ratatui::layout::Rect;

/// What the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Click this cell.
    Play(Position),
    /// Move the keyboard selection.
    Select(Position),
    /// Start a new round.
    Reset,
    /// Leave the game.
    Quit,
}

/// Maps a terminal event to an action.
///
/// `selection` is the highlighted cell and `cells` the areas of the
/// cells as last drawn, in index order.
pub fn map_event(event: &Event, selection: Position, cells: &[Rect; 9]) -> Option<Action> {
    match event {
        Event::Key(key) => map_key(key, selection),
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            hit_test(cells, mouse.column, mouse.row).map(Action::Play)
        }
        _ => None,
    }
}

fn map_key(key: &KeyEvent, selection: Position) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Play(selection)),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .and_then(|d| Position::from_index(d as usize - 1))
            .map(Action::Play),
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            Some(Action::Select(move_cursor(selection, key.code)))
        }
        _ => None,
    }
}

/// Moves the selection one cell with the arrow keys, stopping at the edges.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());
    let (row, col) = match key {
        KeyCode::Up => (row.saturating_sub(1), col),
        KeyCode::Down => ((row + 1).min(2), col),
        KeyCode::Left => (row, col.saturating_sub(1)),
        KeyCode::Right => (row, (col + 1).min(2)),
        _ => (row, col),
    };
    Position::from_row_col(row, col).unwrap_or(cursor)
}

/// Cell containing the terminal coordinate, if any.
pub fn hit_test(cells: &[Rect; 9], column: u16, row: u16) -> Option<Position> {
    cells
        .iter()
        .position(|area| {
            area.width > 0
                && column >= area.x
                && column < area.x + area.width
                && row >= area.y
                && row < area.y + area.height
        })
        .and_then(Position::from_index)
}
