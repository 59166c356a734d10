//! Draws a heart in the first cell and a smiley in the last, then prints
//! the generated I2C sketch with buffered scrolling.
//!
//! Run with: cargo run --example heart

use lcd_glyph_studio::{
    engine::generate,
    types::{DisplayModel, GenerationOptions, GlyphBitmap, ScrollDirection, Transmission},
};

fn bitmap(rows: [&str; 8]) -> GlyphBitmap {
    GlyphBitmap::from_rows(rows.map(|row| {
        let mut pixels = [false; 5];
        for (pixel, ch) in pixels.iter_mut().zip(row.chars()) {
            *pixel = ch == '#';
        }
        pixels
    }))
}

fn main() -> anyhow::Result<()> {
    let heart = bitmap([
        ".....", ".#.#.", "#####", "#####", ".###.", "..#..", ".....", ".....",
    ]);
    let smiley = bitmap([
        ".....", ".#.#.", ".#.#.", ".....", "#...#", ".###.", ".....", ".....",
    ]);

    let mut display = DisplayModel::new();
    display.set_cell(0, 0, heart);
    display.set_cell(1, 15, smiley);
    // Same bitmap twice: shares one character slot.
    display.set_cell(0, 8, heart);

    let options = GenerationOptions {
        transmission: Transmission::I2c,
        scrolling_enabled: true,
        buffered_scroll: true,
        scroll_direction: ScrollDirection::Left,
        scroll_interval_ms: 250,
        ..GenerationOptions::default()
    };

    let code = generate(&display, &options);
    print!("{code}");
    Ok(())
}
