//! Translation of terminal events into [`Command`]s.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::Command;

/// Maps one terminal event to a command.
///
/// `board` is the inner area of the board pane. Each terminal cell holds two
/// pixels stacked vertically, so a click lands on the upper one.
pub fn command_for(event: &Event, board: Rect) -> Option<Command> {
    match event {
        Event::Key(key) => key_command(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                click_pixel(mouse.column, mouse.row, board)
                    .map(|(px, py)| Command::ToggleAt { px, py })
            }
            _ => None,
        },
        _ => None,
    }
}

fn key_command(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char(' ') => Some(Command::TogglePause),
        KeyCode::Enter => Some(Command::Step),
        KeyCode::Down => Some(Command::Faster),
        KeyCode::Up => Some(Command::Slower),
        _ => None,
    }
}

fn click_pixel(column: u16, row: u16, board: Rect) -> Option<(u32, u32)> {
    if column < board.x || row < board.y || column >= board.right() || row >= board.bottom() {
        return None;
    }
    let px = u32::from(column - board.x);
    let py = u32::from(row - board.y) * 2;
    Some((px, py))
}
