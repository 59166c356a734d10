use crossterm::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::player::slot_at;
use crate::types::{GLYPH_COLUMNS, GLYPH_ROWS, NumberFormat, ScrollDirection, Transmission};

use super::config::matches_binding;
use super::state::{ConfirmAction, EditorState, Mode};
use super::ui::Layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Continue,
    Redraw,
    Save,
    Export,
    Quit,
}

pub fn handle_event(state: &mut EditorState, event: Event, layout: &Layout) -> Action {
    match event {
        Event::Key(key) => handle_key(state, key),
        Event::Mouse(mouse) => handle_mouse(state, mouse, layout),
        Event::Resize(_, _) => Action::Redraw,
        _ => Action::Continue,
    }
}

fn handle_key(state: &mut EditorState, key: KeyEvent) -> Action {
    match &state.mode {
        Mode::Normal => handle_normal(state, key),
        Mode::Confirm { .. } => handle_confirm(state, key),
    }
}

fn handle_normal(state: &mut EditorState, key: KeyEvent) -> Action {
    let bindings = state.config.key_bindings.clone();
    let step = state.config.interval_step_ms;
    let hit = |binding: &str| matches_binding(binding, &key);

    if hit(&bindings.quit) {
        if state.dirty {
            state.mode = Mode::Confirm {
                message: "Unsaved changes. Quit anyway?".into(),
                selected: 1,
                action: ConfirmAction::Quit,
            };
            return Action::Redraw;
        }
        return Action::Quit;
    }
    if hit(&bindings.save) {
        return Action::Save;
    }
    if hit(&bindings.export) {
        return Action::Export;
    }

    state.status_message = None;

    // Cell selection (checked before plain arrows so Alt-arrows win)
    if hit(&bindings.cell_left) {
        state.move_cell(0, -1);
    } else if hit(&bindings.cell_right) {
        state.move_cell(0, 1);
    } else if hit(&bindings.cell_up) {
        state.move_cell(-1, 0);
    } else if hit(&bindings.cell_down) {
        state.move_cell(1, 0);
    } else if hit(&bindings.next_cell) {
        state.step_cell(1);
    } else if hit(&bindings.prev_cell) {
        state.step_cell(-1);
    }
    // Pixel cursor
    else if matches_binding("Up", &key) {
        state.pixel_row = (state.pixel_row + GLYPH_ROWS - 1) % GLYPH_ROWS;
    } else if matches_binding("Down", &key) {
        state.pixel_row = (state.pixel_row + 1) % GLYPH_ROWS;
    } else if matches_binding("Left", &key) {
        state.pixel_col = (state.pixel_col + GLYPH_COLUMNS - 1) % GLYPH_COLUMNS;
    } else if matches_binding("Right", &key) {
        state.pixel_col = (state.pixel_col + 1) % GLYPH_COLUMNS;
    }
    // Cell edits
    else if hit(&bindings.toggle_pixel) {
        state.toggle_pixel_at_cursor();
    } else if hit(&bindings.clear_cell) {
        state.clear_cell();
    } else if hit(&bindings.copy_cell) {
        state.copy_cell();
    } else if hit(&bindings.paste_cell) {
        state.paste_cell();
    } else if hit(&bindings.reset_display) {
        state.mode = Mode::Confirm {
            message: "Clear all 32 cells?".into(),
            selected: 1,
            action: ConfirmAction::ResetDisplay,
        };
    }
    // Options
    else if hit(&bindings.transmission) {
        state.update_options(|o| {
            o.transmission = match o.transmission {
                Transmission::Parallel => Transmission::I2c,
                Transmission::I2c => Transmission::Parallel,
            }
        });
    } else if hit(&bindings.number_format) {
        state.update_options(|o| {
            o.number_format = match o.number_format {
                NumberFormat::Hex => NumberFormat::Binary,
                NumberFormat::Binary => NumberFormat::Hex,
            }
        });
    } else if hit(&bindings.scrolling) {
        state.update_options(|o| o.scrolling_enabled = !o.scrolling_enabled);
    } else if hit(&bindings.buffered) {
        state.update_options(|o| o.buffered_scroll = !o.buffered_scroll);
    } else if hit(&bindings.direction) {
        state.update_options(|o| {
            o.scroll_direction = match o.scroll_direction {
                ScrollDirection::Left => ScrollDirection::Right,
                ScrollDirection::Right => ScrollDirection::Left,
            }
        });
    } else if hit(&bindings.slower) {
        state.update_options(|o| o.scroll_interval_ms = o.scroll_interval_ms.saturating_add(step));
    } else if hit(&bindings.faster) {
        state.update_options(|o| {
            o.scroll_interval_ms = o.scroll_interval_ms.saturating_sub(step).max(1);
        });
    }
    // Preview and code panel
    else if hit(&bindings.play) {
        state.toggle_playback();
    } else if hit(&bindings.code_up) {
        state.code_scroll = state.code_scroll.saturating_sub(10);
    } else if hit(&bindings.code_down) {
        let lines = state.session.code().lines().count();
        state.code_scroll = (state.code_scroll + 10).min(lines.saturating_sub(1));
    } else {
        return Action::Continue;
    }

    Action::Redraw
}

fn handle_confirm(state: &mut EditorState, key: KeyEvent) -> Action {
    let Mode::Confirm { selected, .. } = &mut state.mode else {
        return Action::Continue;
    };
    let bindings = &state.config.key_bindings;

    match key.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
            *selected = 1 - *selected;
            Action::Redraw
        }
        KeyCode::Char('y') | KeyCode::Char('Y') => confirm(state, true),
        KeyCode::Char('n') | KeyCode::Char('N') => confirm(state, false),
        _ if matches_binding(&bindings.confirm, &key) => {
            let yes = *selected == 0;
            confirm(state, yes)
        }
        _ if matches_binding(&bindings.cancel, &key) => confirm(state, false),
        _ => Action::Continue,
    }
}

fn confirm(state: &mut EditorState, yes: bool) -> Action {
    let mode = std::mem::replace(&mut state.mode, Mode::Normal);
    let Mode::Confirm { action, .. } = mode else {
        return Action::Redraw;
    };
    if !yes {
        return Action::Redraw;
    }
    match action {
        ConfirmAction::ResetDisplay => {
            state.reset_display();
            Action::Redraw
        }
        ConfirmAction::Quit => Action::Quit,
    }
}

fn handle_mouse(state: &mut EditorState, mouse: MouseEvent, layout: &Layout) -> Action {
    if !matches!(state.mode, Mode::Normal) {
        return Action::Continue;
    }
    let (x, y) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some((row, col)) = layout.pixel_at(x, y) {
                state.begin_paint(row, col);
                return Action::Redraw;
            }
            if let Some((line, column)) = slot_at(layout.lcd_x, layout.lcd_y, x, y) {
                state.select_cell(line, column);
                return Action::Redraw;
            }
            Action::Continue
        }
        MouseEventKind::Drag(MouseButton::Left) => match layout.pixel_at(x, y) {
            Some((row, col)) if state.paint.is_some() => {
                state.pixel_row = row;
                state.pixel_col = col;
                state.paint_at(row, col);
                Action::Redraw
            }
            _ => Action::Continue,
        },
        MouseEventKind::Up(MouseButton::Left) => {
            state.end_paint();
            Action::Continue
        }
        MouseEventKind::ScrollDown => {
            let lines = state.session.code().lines().count();
            state.code_scroll = (state.code_scroll + 3).min(lines.saturating_sub(1));
            Action::Redraw
        }
        MouseEventKind::ScrollUp => {
            state.code_scroll = state.code_scroll.saturating_sub(3);
            Action::Redraw
        }
        _ => Action::Continue,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crossterm::event::{KeyModifiers, MouseEvent};

    use super::*;
    use crate::editor::config::EditorConfig;
    use crate::session::Session;

    fn state() -> EditorState {
        EditorState::with_session(Session::new(), PathBuf::from("t.json"), EditorConfig::default())
    }

    fn press(state: &mut EditorState, code: KeyCode) -> Action {
        let layout = Layout::compute(160, 50);
        handle_event(state, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)), &layout)
    }

    fn mouse(state: &mut EditorState, kind: MouseEventKind, column: u16, row: u16) -> Action {
        let layout = Layout::compute(160, 50);
        let event = MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        handle_event(state, Event::Mouse(event), &layout)
    }

    #[test]
    fn space_toggles_pixel_under_cursor() {
        let mut state = state();
        press(&mut state, KeyCode::Right);
        press(&mut state, KeyCode::Down);
        assert_eq!(press(&mut state, KeyCode::Char(' ')), Action::Redraw);
        assert_eq!(state.current_glyph().get(1, 1), Some(true));
        assert!(state.session.code().as_str().contains("byte char0[8]"));
    }

    #[test]
    fn dirty_quit_asks_for_confirmation() {
        let mut state = state();
        assert_eq!(press(&mut state, KeyCode::Char('q')), Action::Quit);

        press(&mut state, KeyCode::Char(' '));
        assert_eq!(press(&mut state, KeyCode::Char('q')), Action::Redraw);
        assert!(matches!(state.mode, Mode::Confirm { .. }));
        assert_eq!(press(&mut state, KeyCode::Esc), Action::Redraw);
        assert_eq!(state.mode, Mode::Normal);

        press(&mut state, KeyCode::Char('q'));
        assert_eq!(press(&mut state, KeyCode::Char('y')), Action::Quit);
    }

    #[test]
    fn reset_needs_confirmation() {
        let mut state = state();
        press(&mut state, KeyCode::Char(' '));
        press(&mut state, KeyCode::Char('R'));
        // Default selection is "No".
        press(&mut state, KeyCode::Enter);
        assert!(!state.session.display().is_blank());

        press(&mut state, KeyCode::Char('R'));
        press(&mut state, KeyCode::Up);
        press(&mut state, KeyCode::Enter);
        assert!(state.session.display().is_blank());
    }

    #[test]
    fn option_keys_regenerate_code() {
        let mut state = state();
        press(&mut state, KeyCode::Char('t'));
        assert!(state.session.code().as_str().starts_with("// I2C Connection"));
        press(&mut state, KeyCode::Char('s'));
        press(&mut state, KeyCode::Char('b'));
        press(&mut state, KeyCode::Char('+'));
        assert_eq!(state.session.options().scroll_interval_ms, 350);
        assert!(state.session.code().as_str().contains("SCROLL_DELAY_MS = 350;"));
    }

    #[test]
    fn faster_steps_down_to_one_millisecond() {
        let mut state = state();
        assert_eq!(press(&mut state, KeyCode::Char('-')), Action::Redraw);
        assert_eq!(state.session.options().scroll_interval_ms, 250);

        state.update_options(|o| o.scroll_interval_ms = 20);
        press(&mut state, KeyCode::Char('-'));
        assert_eq!(state.session.options().scroll_interval_ms, 1);
        press(&mut state, KeyCode::Char('-'));
        assert_eq!(state.session.options().scroll_interval_ms, 1);
    }

    #[test]
    fn unbound_function_keys_do_nothing() {
        let mut state = state();
        assert_eq!(press(&mut state, KeyCode::F(11)), Action::Continue);
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn mouse_drag_paints_and_click_selects_cell() {
        let mut state = state();
        let layout = Layout::compute(160, 50);
        let (px, py) = (layout.pixel_x + 1, layout.pixel_y + 1);

        mouse(&mut state, MouseEventKind::Down(MouseButton::Left), px, py);
        mouse(&mut state, MouseEventKind::Drag(MouseButton::Left), px + 2, py);
        mouse(&mut state, MouseEventKind::Drag(MouseButton::Left), px + 4, py);
        mouse(&mut state, MouseEventKind::Up(MouseButton::Left), px + 4, py);
        assert_eq!(state.current_glyph().active_count(), 3);

        let (sx, sy) = crate::player::slot_origin(layout.lcd_x, layout.lcd_y, 1, 7);
        mouse(&mut state, MouseEventKind::Down(MouseButton::Left), sx, sy);
        assert_eq!((state.line, state.column), (1, 7));
    }
}
