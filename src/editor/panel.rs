use std::io;

use crossterm::{cursor, queue, style};

use crate::types::{GenerationOptions, NumberFormat, ScrollDirection, Transmission};

use super::state::{EditorState, Mode};
use super::ui::{Layout, OPTIONS_WIDTH};

/// Options panel beside the pixel editor, replaced by the confirmation box
/// while one is open.
pub fn render_options_panel(
    stdout: &mut io::Stdout,
    layout: &Layout,
    state: &EditorState,
) -> anyhow::Result<()> {
    let x = layout.options_x;
    let y = layout.options_y;
    let max_width = OPTIONS_WIDTH as usize;

    if let Mode::Confirm { message, selected, .. } = &state.mode {
        queue!(
            stdout,
            cursor::MoveTo(x, y),
            style::SetAttribute(style::Attribute::Bold),
            style::Print("Confirm"),
            style::SetAttribute(style::Attribute::Reset),
            cursor::MoveTo(x, y + 2),
            style::SetAttribute(style::Attribute::Dim),
            style::Print(message.chars().take(max_width).collect::<String>()),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        for (i, label) in ["Yes", "No"].iter().enumerate() {
            queue!(stdout, cursor::MoveTo(x, y + 4 + i as u16))?;
            if i == *selected {
                queue!(
                    stdout,
                    style::SetAttribute(style::Attribute::Reverse),
                    style::Print(format!("> {label:<6}")),
                    style::SetAttribute(style::Attribute::Reset),
                )?;
            } else {
                queue!(stdout, style::Print(format!("  {label:<6}")))?;
            }
        }
        return Ok(());
    }

    queue!(
        stdout,
        cursor::MoveTo(x, y),
        style::SetAttribute(style::Attribute::Bold),
        style::Print("Options"),
        style::SetAttribute(style::Attribute::Reset),
    )?;

    for (i, (label, value)) in option_rows(state).iter().enumerate() {
        let row: String = format!("{label:<18}{value}").chars().take(max_width).collect();
        queue!(stdout, cursor::MoveTo(x, y + 2 + i as u16), style::Print(row))?;
    }
    Ok(())
}

fn option_rows(state: &EditorState) -> Vec<(&'static str, String)> {
    let options: &GenerationOptions = state.session.options();
    let on_off = |b: bool| String::from(if b { "on" } else { "off" });

    let interval = if options.scrolling_enabled && !options.buffered_scroll {
        format!("{} ms (naive: 300)", options.scroll_interval_ms)
    } else {
        format!("{} ms", options.scroll_interval_ms)
    };
    let preview = if state.playback.is_playing() {
        format!("tick {}", state.playback.tick())
    } else {
        "stopped".to_string()
    };

    vec![
        (
            "[t] Connection",
            match options.transmission {
                Transmission::Parallel => "Parallel".into(),
                Transmission::I2c => "I2C".into(),
            },
        ),
        (
            "[f] Format",
            match options.number_format {
                NumberFormat::Hex => "Hex".into(),
                NumberFormat::Binary => "Binary".into(),
            },
        ),
        ("[s] Scrolling", on_off(options.scrolling_enabled)),
        ("[b] Buffered", on_off(options.buffered_scroll)),
        (
            "[d] Direction",
            match options.scroll_direction {
                ScrollDirection::Left => "Left".into(),
                ScrollDirection::Right => "Right".into(),
            },
        ),
        ("[-][+] Interval", interval),
        ("Glyphs", state.session.glyph_table().len().to_string()),
        ("[Enter] Preview", preview),
    ]
}

/// Generated code, scrolled by `state.code_scroll` and clipped to the panel.
pub fn render_code_panel(
    stdout: &mut io::Stdout,
    layout: &Layout,
    state: &EditorState,
) -> anyhow::Result<()> {
    if layout.code_width < 4 || layout.code_height < 3 {
        return Ok(());
    }
    let x = layout.code_x;
    let y = layout.code_y;
    let width = layout.code_width as usize - 2;
    let code = state.session.code();
    let total = code.lines().count();

    queue!(
        stdout,
        cursor::MoveTo(x + 2, y),
        style::SetAttribute(style::Attribute::Bold),
        style::Print(format!("Sketch ({total} lines)")),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    for row in 0..layout.code_height {
        queue!(stdout, cursor::MoveTo(x, y + row), style::Print("\u{2502}"))?;
    }

    let visible = layout.code_height as usize - 2;
    for (i, line) in code.lines().skip(state.code_scroll).take(visible).enumerate() {
        let text: String = line.chars().take(width).collect();
        queue!(stdout, cursor::MoveTo(x + 2, y + 2 + i as u16), style::Print(text))?;
    }
    Ok(())
}
