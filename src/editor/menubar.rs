use std::io;

use crossterm::{cursor, queue, style, terminal};

use crate::menubar::{item_width, print_menu_item};

use super::state::{EditorState, Mode};
use super::ui::Layout;

/// Items are listed in a consistent order:
///   pixel edits → cell edits → preview → file → escape/global
fn mode_items(state: &EditorState) -> Vec<(&'static str, bool)> {
    match &state.mode {
        Mode::Normal => vec![
            ("[←→↑↓] pixel", false),
            ("[Space] toggle", false),
            ("[Tab][Alt+←→↑↓] cell", false),
            ("[c]lear", false),
            ("[y]ank", false),
            ("[p]aste", state.session.clipboard().is_some()),
            ("[R]eset", false),
            ("[Enter] play", state.playback.is_playing()),
            ("[Ctrl-s]ave", false),
            ("[e]xport", false),
            ("[q]uit", false),
        ],
        Mode::Confirm { .. } => vec![
            ("[↑][↓] select", false),
            ("[Enter] confirm", false),
            ("[Esc] cancel", false),
        ],
    }
}

pub fn render_menubar(
    stdout: &mut io::Stdout,
    layout: &Layout,
    state: &EditorState,
) -> anyhow::Result<()> {
    if layout.menu_h == 0 {
        return Ok(());
    }

    queue!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(" "),
    )?;

    let mut x: u16 = 1; // leading space
    for (i, (item, active)) in mode_items(state).iter().enumerate() {
        let sep = if i > 0 { 2 } else { 0 };
        if x + sep + item_width(item) > layout.term_width {
            break; // No room: drop remaining items
        }
        if i > 0 {
            queue!(stdout, style::Print("  "))?;
        }
        print_menu_item(stdout, item, *active)?;
        x += sep + item_width(item);
    }

    Ok(())
}
