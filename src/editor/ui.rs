use crate::player::{LCD_BOX_HEIGHT, LCD_BOX_WIDTH};
use crate::types::{GLYPH_COLUMNS, GLYPH_ROWS};

/// Terminal columns per pixel in the magnified pixel editor.
pub const PIXEL_WIDTH: u16 = 2;
/// Pixel editor box size including border.
pub const PIXEL_BOX_WIDTH: u16 = GLYPH_COLUMNS as u16 * PIXEL_WIDTH + 2;
pub const PIXEL_BOX_HEIGHT: u16 = GLYPH_ROWS as u16 + 2;
/// Width of the options panel next to the pixel editor.
pub const OPTIONS_WIDTH: u16 = 34;
/// Narrowest code panel worth placing beside the LCD.
const MIN_SIDE_CODE_WIDTH: u16 = 30;

pub struct Layout {
    pub term_width: u16,
    pub menu_h: u16,
    pub lcd_x: u16,
    pub lcd_y: u16,
    /// Top-left of the pixel editor box (its title sits one row above).
    pub pixel_x: u16,
    pub pixel_y: u16,
    pub options_x: u16,
    pub options_y: u16,
    pub code_x: u16,
    pub code_y: u16,
    pub code_width: u16,
    pub code_height: u16,
    pub status_y: u16,
}

impl Layout {
    pub fn compute(term_width: u16, term_height: u16) -> Self {
        let menu_h: u16 = 1;
        let status_h: u16 = 1;
        let lcd_y = menu_h;
        let pixel_y = lcd_y + LCD_BOX_HEIGHT + 2;
        let options_x = PIXEL_BOX_WIDTH + 3;
        let status_y = term_height.saturating_sub(status_h);

        // Code goes beside the LCD when there is room, otherwise below it
        // next to the options panel.
        let side_x = LCD_BOX_WIDTH + 1;
        let (code_x, code_y) = if term_width >= side_x + MIN_SIDE_CODE_WIDTH {
            (side_x, menu_h)
        } else {
            (options_x + OPTIONS_WIDTH + 1, pixel_y - 1)
        };

        Layout {
            term_width,
            menu_h,
            lcd_x: 0,
            lcd_y,
            pixel_x: 1,
            pixel_y,
            options_x,
            options_y: pixel_y - 1,
            code_x,
            code_y,
            code_width: term_width.saturating_sub(code_x),
            code_height: status_y.saturating_sub(code_y),
            status_y,
        }
    }

    /// Which pixel of the magnified editor covers terminal cell `(tx, ty)`.
    pub fn pixel_at(&self, tx: u16, ty: u16) -> Option<(usize, usize)> {
        let dx = tx.checked_sub(self.pixel_x + 1)?;
        let dy = ty.checked_sub(self.pixel_y + 1)?;
        let row = dy as usize;
        let col = (dx / PIXEL_WIDTH) as usize;
        if row < GLYPH_ROWS && col < GLYPH_COLUMNS {
            Some((row, col))
        } else {
            None
        }
    }
}
