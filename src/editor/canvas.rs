use std::io;

use crossterm::{cursor, queue, style};

use crate::player::draw_lcd;
use crate::renderer::Renderer;
use crate::types::{GLYPH_COLUMNS, GLYPH_ROWS};

use super::state::EditorState;
use super::ui::{Layout, PIXEL_BOX_HEIGHT, PIXEL_BOX_WIDTH, PIXEL_WIDTH};

/// Draw the simulated LCD. While the preview plays it shows the current
/// animation tick; otherwise tick 0, which is the layout as edited.
pub fn render_lcd(stdout: &mut io::Stdout, layout: &Layout, state: &EditorState) -> anyhow::Result<()> {
    let plan = state.session.plan();
    let frame = Renderer::frame(plan, state.playback.tick());
    let highlight = if state.playback.is_playing() {
        None
    } else {
        Some((state.line, state.column))
    };
    draw_lcd(
        stdout,
        layout.lcd_x,
        layout.lcd_y,
        &frame,
        state.session.glyph_table(),
        highlight,
    )
}

/// Draw the magnified pixel editor for the selected cell.
pub fn render_pixel_editor(
    stdout: &mut io::Stdout,
    layout: &Layout,
    state: &EditorState,
) -> anyhow::Result<()> {
    let x = layout.pixel_x;
    let y = layout.pixel_y;
    let glyph = state.current_glyph();

    queue!(
        stdout,
        cursor::MoveTo(x, y - 1),
        style::SetAttribute(style::Attribute::Bold),
        style::Print(format!("Cell ({}, {:>2})", state.line, state.column)),
        style::SetAttribute(style::Attribute::Reset),
    )?;

    let inner = "\u{2500}".repeat(PIXEL_BOX_WIDTH as usize - 2);
    queue!(
        stdout,
        cursor::MoveTo(x, y),
        style::Print(format!("\u{250c}{inner}\u{2510}")),
        cursor::MoveTo(x, y + PIXEL_BOX_HEIGHT - 1),
        style::Print(format!("\u{2514}{inner}\u{2518}")),
    )?;

    for row in 0..GLYPH_ROWS {
        let sy = y + 1 + row as u16;
        queue!(stdout, cursor::MoveTo(x, sy), style::Print("\u{2502}"))?;
        for col in 0..GLYPH_COLUMNS {
            let on = glyph.get(row, col).unwrap_or(false);
            let at_cursor = row == state.pixel_row && col == state.pixel_col;

            let mut cs = style::ContentStyle::default();
            let text = if on { "\u{2588}\u{2588}" } else { "\u{00b7} " };
            if on {
                cs.foreground_color = Some(style::Color::White);
            } else {
                cs.attributes.set(style::Attribute::Dim);
            }
            if at_cursor {
                cs.attributes.set(style::Attribute::Reverse);
            }
            queue!(
                stdout,
                cursor::MoveTo(x + 1 + col as u16 * PIXEL_WIDTH, sy),
                style::PrintStyledContent(style::StyledContent::new(cs, text)),
            )?;
        }
        queue!(
            stdout,
            cursor::MoveTo(x + PIXEL_BOX_WIDTH - 1, sy),
            style::Print("\u{2502}"),
        )?;
    }

    queue!(
        stdout,
        cursor::MoveTo(x, y + PIXEL_BOX_HEIGHT),
        style::SetAttribute(style::Attribute::Dim),
        style::Print(format!("Active: {:>2}", glyph.active_count())),
        style::SetAttribute(style::Attribute::Reset),
    )?;

    Ok(())
}
