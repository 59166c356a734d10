use lcd_glyph_studio::engine::glyphs::build_glyph_table;
use lcd_glyph_studio::engine::layout::{plan_layout, scroll_column};
use lcd_glyph_studio::engine::{generate, Engine};
use lcd_glyph_studio::renderer::Renderer;
use lcd_glyph_studio::types::{
    DisplayModel, GenerationOptions, GlyphBitmap, NumberFormat, ScrollDirection, Transmission,
    LCD_COLUMNS,
};

fn single_pixel(row: usize, column: usize) -> GlyphBitmap {
    let mut glyph = GlyphBitmap::blank();
    glyph.set(row, column, true);
    glyph
}

fn scrolling(buffered: bool) -> GenerationOptions {
    GenerationOptions {
        scrolling_enabled: true,
        buffered_scroll: buffered,
        ..GenerationOptions::default()
    }
}

/// Two distinct glyphs and one repeat.
fn sample_display() -> DisplayModel {
    let mut display = DisplayModel::new();
    display.set_cell(0, 2, single_pixel(0, 0));
    display.set_cell(0, 9, single_pixel(7, 4));
    display.set_cell(1, 5, single_pixel(0, 0));
    display
}

fn all_options() -> Vec<GenerationOptions> {
    let mut out = Vec::new();
    for transmission in [Transmission::Parallel, Transmission::I2c] {
        for number_format in [NumberFormat::Hex, NumberFormat::Binary] {
            for (scrolling_enabled, buffered_scroll) in [(false, false), (true, false), (true, true)] {
                out.push(GenerationOptions {
                    transmission,
                    number_format,
                    scrolling_enabled,
                    buffered_scroll,
                    ..GenerationOptions::default()
                });
            }
        }
    }
    out
}

#[test]
fn generation_is_deterministic() {
    let display = sample_display();
    for options in all_options() {
        let first = generate(&display, &options);
        let second = generate(&display, &options);
        assert_eq!(first, second, "{options:?}");
    }
}

#[test]
fn empty_static_hex_sketch_only_clears_and_waits() {
    let code = generate(&DisplayModel::new(), &GenerationOptions::default());
    let text = code.as_str();

    assert!(!text.contains("byte char"));
    assert!(!text.contains("createChar"));
    assert!(!text.contains("setCursor"));
    assert!(text.ends_with("void loop() {\n  lcd.clear();\n  delay(2000);\n}\n"));
}

#[test]
fn single_pixel_sketch_declares_one_character() {
    let mut display = DisplayModel::new();
    display.set_cell(0, 0, single_pixel(0, 0));

    let compiled = Engine::compile(&display, &GenerationOptions::default());
    assert_eq!(compiled.glyphs.len(), 1);

    let text = compiled.code.as_str();
    assert!(text.contains("byte char0[8] = {\n    0x10,\n"));
    assert_eq!(text.matches("lcd.createChar(").count(), 1);
    assert_eq!(text.matches("lcd.setCursor(0, 0);").count(), 1);
    assert_eq!(text.matches("lcd.setCursor(").count(), 1);
    assert_eq!(text.matches("lcd.write(byte(0));").count(), 1);
}

#[test]
fn identical_bitmaps_share_index_zero() {
    let mut display = DisplayModel::new();
    display.set_cell(0, 3, single_pixel(2, 2));
    display.set_cell(1, 12, single_pixel(2, 2));

    let (table, placement) = build_glyph_table(&display);
    assert_eq!(table.len(), 1);
    assert_eq!(placement.get(0, 3), Some(0));
    assert_eq!(placement.get(1, 12), Some(0));

    let code = generate(&display, &GenerationOptions::default());
    assert_eq!(code.as_str().matches("lcd.createChar(").count(), 1);
    assert_eq!(code.as_str().matches("lcd.write(byte(0));").count(), 2);
}

#[test]
fn differing_bitmaps_get_distinct_indices() {
    let (table, placement) = build_glyph_table(&sample_display());
    assert_eq!(table.len(), 2);
    assert_eq!(placement.get(0, 2), Some(0));
    assert_eq!(placement.get(0, 9), Some(1));
    assert_eq!(placement.get(1, 5), Some(0));
    assert_eq!(placement.get(1, 0), None);
}

#[test]
fn more_than_eight_glyphs_are_emitted_without_limit() {
    let mut display = DisplayModel::new();
    for column in 0..10 {
        let mut glyph = GlyphBitmap::blank();
        for bit in 0..5 {
            glyph.set(0, bit, column & (1 << bit) != 0);
        }
        glyph.set(7, 0, true);
        display.set_cell(0, column, glyph);
    }

    let code = generate(&display, &GenerationOptions::default());
    assert!(code.as_str().contains("lcd.createChar(9, char9);"));
}

#[test]
fn left_scroll_wraps_around() {
    assert_eq!(scroll_column(5, 1, ScrollDirection::Left), 4);
    assert_eq!(scroll_column(5, 5, ScrollDirection::Left), 0);
    assert_eq!(scroll_column(5, 6, ScrollDirection::Left), 15);
}

#[test]
fn scroll_column_is_always_on_screen() {
    for column in 0..LCD_COLUMNS {
        for offset in [-1000, -17, -16, -1, 0, 1, 15, 16, 17, 1000, i64::MAX, i64::MIN] {
            for direction in [ScrollDirection::Left, ScrollDirection::Right] {
                let c = scroll_column(column, offset, direction);
                assert!(c < LCD_COLUMNS, "{column} {offset} {direction:?} -> {c}");
            }
        }
    }
}

#[test]
fn static_and_naive_cycles_rewrite_every_glyph() {
    let (_, placement) = build_glyph_table(&sample_display());

    for options in [GenerationOptions::default(), scrolling(false)] {
        let plan = plan_layout(&placement, &options);
        for tick in 0..20 {
            let cycle = Renderer::cycle(&plan, tick);
            assert!(cycle.clears);
            assert_eq!(cycle.writes.len(), 3);
        }
    }
}

#[test]
fn buffered_cycles_write_only_changed_slots() {
    let mut display = DisplayModel::new();
    // Line 0 alternates two glyphs, line 1 holds a single one.
    let a = single_pixel(0, 0);
    let b = single_pixel(1, 1);
    for column in 0..LCD_COLUMNS {
        display.set_cell(0, column, if column % 2 == 0 { a } else { b });
    }
    display.set_cell(1, 0, a);

    let (_, placement) = build_glyph_table(&display);
    let plan = plan_layout(&placement, &scrolling(true));

    let first = Renderer::cycle(&plan, 0);
    assert!(!first.clears);
    assert_eq!(first.writes.len(), 17);

    for tick in 1..40 {
        let prev = Renderer::frame(&plan, tick - 1);
        let next = Renderer::frame(&plan, tick);
        let cycle = Renderer::cycle(&plan, tick);

        assert!(!cycle.clears);
        for write in &cycle.writes {
            let (line, column) = (write.line as usize, write.column as usize);
            assert_ne!(prev.get(line, column), next.get(line, column));
            assert_eq!(write.slot, next.get(line, column));
        }
        // Line 1 has one glyph: it vacates one slot and fills another.
        let line1 = cycle.writes.iter().filter(|w| w.line == 1).count();
        assert_eq!(line1, 2);
    }
}

#[test]
fn naive_scroll_ignores_configured_interval() {
    let options = GenerationOptions {
        scroll_interval_ms: 900,
        ..scrolling(false)
    };
    let code = generate(&sample_display(), &options);
    assert!(code.as_str().contains("SCROLL_DELAY_MS = 300;"));

    let buffered = GenerationOptions {
        scroll_interval_ms: 900,
        ..scrolling(true)
    };
    let code = generate(&sample_display(), &buffered);
    assert!(code.as_str().contains("SCROLL_DELAY_MS = 900;"));
}

#[test]
fn every_sketch_has_setup_and_loop() {
    for options in all_options() {
        let code = generate(&sample_display(), &options);
        let text = code.as_str();
        assert!(text.contains("void setup() {"), "{options:?}");
        assert!(text.contains("void loop() {"), "{options:?}");
        assert!(text.ends_with("}\n"), "{options:?}");
        assert_eq!(text.matches('{').count(), text.matches('}').count(), "{options:?}");
    }
}
