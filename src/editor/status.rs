use std::io;

use crossterm::{cursor, queue, style, terminal};

use super::state::{EditorState, Mode};
use super::ui::Layout;

pub fn render_status(
    stdout: &mut io::Stdout,
    layout: &Layout,
    state: &EditorState,
) -> anyhow::Result<()> {
    queue!(
        stdout,
        cursor::MoveTo(0, layout.status_y),
        terminal::Clear(terminal::ClearType::CurrentLine),
    )?;

    let mode_str = match &state.mode {
        Mode::Normal if state.playback.is_playing() => "PREVIEW",
        Mode::Normal => "EDIT",
        Mode::Confirm { .. } => "CONFIRM",
    };
    let file = state.file_path.display();
    let dirty_str = if state.dirty { " [modified]" } else { "" };
    // Replace newlines so a multi-line error doesn't scroll the terminal.
    let status: String = state
        .status_message
        .as_deref()
        .unwrap_or("")
        .chars()
        .map(|c| if c == '\n' { '↵' } else { c })
        .collect();

    queue!(
        stdout,
        style::SetAttribute(style::Attribute::Dim),
        style::Print(format!(" {mode_str} | {file}{dirty_str} {status}")),
        style::SetAttribute(style::Attribute::Reset),
    )?;

    Ok(())
}
