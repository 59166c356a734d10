//! Code emitter.
//!
//! Assembles the sketch text from the glyph table and the render plan:
//! connection preamble, scroll helpers, `setup()` with the character table,
//! and the `loop()` variant matching the plan.

use crate::types::{
    GeneratedCode, GenerationOptions, LCD_LINES, ScrollDirection, Transmission,
};

use super::encode::encode_glyph;
use super::glyphs::GlyphTable;
use super::layout::{Placement, RenderPlan};

const INDENT: &str = "  ";

/// Line-oriented text builder with two-space indentation.
struct Sketch {
    text: String,
    depth: usize,
}

impl Sketch {
    fn new() -> Self {
        Sketch {
            text: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, line: &str) {
        for _ in 0..self.depth {
            self.text.push_str(INDENT);
        }
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }

    /// Emit `header {`, run `body` one level deeper, then `}`.
    fn block(&mut self, header: &str, body: impl FnOnce(&mut Self)) {
        self.line(&format!("{header} {{"));
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self.line("}");
    }

    fn if_else(
        &mut self,
        condition: &str,
        then: impl FnOnce(&mut Self),
        otherwise: impl FnOnce(&mut Self),
    ) {
        self.line(&format!("if ({condition}) {{"));
        self.depth += 1;
        then(self);
        self.depth -= 1;
        self.line("} else {");
        self.depth += 1;
        otherwise(self);
        self.depth -= 1;
        self.line("}");
    }

    fn finish(self) -> GeneratedCode {
        GeneratedCode::new(self.text)
    }
}

pub fn emit(glyphs: &GlyphTable, plan: &RenderPlan, options: &GenerationOptions) -> GeneratedCode {
    let mut sketch = Sketch::new();

    emit_preamble(&mut sketch, options.transmission);
    if let Some(direction) = plan.direction() {
        emit_scroll_globals(&mut sketch, plan, direction);
    }
    emit_setup(&mut sketch, glyphs, plan, options);
    sketch.blank();
    emit_loop(&mut sketch, plan);

    sketch.finish()
}

fn emit_preamble(sketch: &mut Sketch, transmission: Transmission) {
    match transmission {
        Transmission::I2c => {
            sketch.line("// I2C Connection");
            sketch.line("#include <Wire.h>");
            sketch.line("#include <LiquidCrystal_I2C.h>");
            sketch.blank();
            sketch.line("// Set the LCD address to 0x27 for a 16 chars and 2 line display");
            sketch.line("LiquidCrystal_I2C lcd(0x27, 16, 2);");
        }
        Transmission::Parallel => {
            sketch.line("// Basic Connection");
            sketch.line("#include <LiquidCrystal.h>");
            sketch.blank();
            sketch.line("// Initialize the library with the interface pins");
            sketch.line("// RS, Enable, D4, D5, D6, D7 pins");
            sketch.line("LiquidCrystal lcd(12, 11, 5, 4, 3, 2);");
        }
    }
    sketch.blank();
}

fn emit_scroll_globals(sketch: &mut Sketch, plan: &RenderPlan, direction: ScrollDirection) {
    sketch.line("const int LCD_COLUMNS = 16;");
    sketch.line(&format!(
        "const unsigned long SCROLL_DELAY_MS = {};",
        plan.interval_ms()
    ));
    sketch.line("int scrollOffset = 0;");
    if plan.redraws_partially() {
        sketch.blank();
        sketch.line("// Slot value meaning nothing is drawn there");
        sketch.line("const byte BLANK_SLOT = 255;");
        sketch.line(&format!("byte previousFrame[{LCD_LINES}][LCD_COLUMNS];"));
        sketch.line(&format!("byte currentFrame[{LCD_LINES}][LCD_COLUMNS];"));
    }
    sketch.blank();

    let shift = match direction {
        ScrollDirection::Left => "column - scrollOffset",
        ScrollDirection::Right => "column + scrollOffset",
    };
    sketch.line("// Column a glyph occupies after shifting by the current offset");
    sketch.block("int scrollColumn(int column)", |s| {
        s.line(&format!("int position = ({shift}) % LCD_COLUMNS;"));
        s.block("if (position < 0)", |s| s.line("position += LCD_COLUMNS;"));
        s.line("return position;");
    });
    sketch.blank();

    if plan.redraws_partially() {
        sketch.block("void placeGlyph(int line, int column, byte glyph)", |s| {
            s.line("currentFrame[line][scrollColumn(column)] = glyph;");
        });
        sketch.blank();
        sketch.line("// Only rewrite slots that differ from what is already on screen");
        sketch.block("void updateDisplay()", |s| {
            s.block(&for_each_line(), |s| {
                s.block("for (int column = 0; column < LCD_COLUMNS; column++)", |s| {
                    s.line("byte slot = currentFrame[line][column];");
                    s.block("if (slot != previousFrame[line][column])", |s| {
                        s.line("lcd.setCursor(column, line);");
                        s.if_else(
                            "slot == BLANK_SLOT",
                            |s| s.line("lcd.print(' ');"),
                            |s| s.line("lcd.write(slot);"),
                        );
                        s.line("previousFrame[line][column] = slot;");
                    });
                });
            });
        });
        sketch.blank();
    }
}

fn emit_setup(
    sketch: &mut Sketch,
    glyphs: &GlyphTable,
    plan: &RenderPlan,
    options: &GenerationOptions,
) {
    sketch.block("void setup()", |s| {
        match options.transmission {
            Transmission::I2c => {
                s.line("lcd.init(); // lcd.begin() can also be used");
                s.line("lcd.backlight();");
            }
            Transmission::Parallel => s.line("lcd.begin(16, 2);"),
        }

        for (index, glyph) in glyphs.iter() {
            s.blank();
            s.line(&format!("// Character {index}"));
            s.line(&format!("byte char{index}[8] = {{"));
            s.depth += 1;
            let rows = encode_glyph(glyph, options.number_format);
            let last = rows.len() - 1;
            for (i, literal) in rows.iter().enumerate() {
                let separator = if i < last { "," } else { "" };
                s.line(&format!("{literal}{separator}"));
            }
            s.depth -= 1;
            s.line("};");
            s.line(&format!("lcd.createChar({index}, char{index});"));
        }

        if plan.redraws_partially() {
            s.blank();
            fill_frame(s, "previousFrame");
            s.line("lcd.clear();");
        }
    });
}

fn emit_loop(sketch: &mut Sketch, plan: &RenderPlan) {
    sketch.block("void loop()", |s| match plan {
        RenderPlan::Static { placements } => {
            s.line("lcd.clear();");
            for placement in placements {
                write_glyph(s, placement, &placement.column.to_string());
            }
            s.line(&format!("delay({});", plan.interval_ms()));
        }
        RenderPlan::NaiveScroll { placements, .. } => {
            s.line("lcd.clear();");
            for placement in placements {
                write_glyph(s, placement, &format!("scrollColumn({})", placement.column));
            }
            advance_offset(s);
        }
        RenderPlan::BufferedScroll { placements, .. } => {
            fill_frame(s, "currentFrame");
            for p in placements {
                s.line(&format!("placeGlyph({}, {}, {});", p.line, p.column, p.glyph));
            }
            s.line("updateDisplay();");
            advance_offset(s);
        }
    });
}

fn write_glyph(sketch: &mut Sketch, placement: &Placement, column: &str) {
    sketch.line(&format!("lcd.setCursor({column}, {});", placement.line));
    sketch.line(&format!("lcd.write(byte({}));", placement.glyph));
}

fn advance_offset(sketch: &mut Sketch) {
    sketch.line("scrollOffset = (scrollOffset + 1) % LCD_COLUMNS;");
    sketch.line("delay(SCROLL_DELAY_MS);");
}

fn for_each_line() -> String {
    format!("for (int line = 0; line < {LCD_LINES}; line++)")
}

fn fill_frame(sketch: &mut Sketch, buffer: &str) {
    sketch.block(&for_each_line(), |s| {
        s.block("for (int column = 0; column < LCD_COLUMNS; column++)", |s| {
            s.line(&format!("{buffer}[line][column] = BLANK_SLOT;"));
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::glyphs::build_glyph_table;
    use crate::engine::layout::plan_layout;
    use crate::types::{DisplayModel, GlyphBitmap, NumberFormat};

    fn run(display: &DisplayModel, options: &GenerationOptions) -> String {
        let (table, placement) = build_glyph_table(display);
        let plan = plan_layout(&placement, options);
        emit(&table, &plan, options).to_string()
    }

    fn corner_pixel_display() -> DisplayModel {
        let mut display = DisplayModel::new();
        let mut glyph = GlyphBitmap::blank();
        glyph.set(0, 0, true);
        display.set_cell(0, 0, glyph);
        display
    }

    #[test]
    fn static_parallel_sketch_matches_expected_text() {
        let code = run(&corner_pixel_display(), &GenerationOptions::default());
        let expected = "\
// Basic Connection
#include <LiquidCrystal.h>

// Initialize the library with the interface pins
// RS, Enable, D4, D5, D6, D7 pins
LiquidCrystal lcd(12, 11, 5, 4, 3, 2);

void setup() {
  lcd.begin(16, 2);

  // Character 0
  byte char0[8] = {
    0x10,
    0x00,
    0x00,
    0x00,
    0x00,
    0x00,
    0x00,
    0x00
  };
  lcd.createChar(0, char0);
}

void loop() {
  lcd.clear();
  lcd.setCursor(0, 0);
  lcd.write(byte(0));
  delay(2000);
}
";
        assert_eq!(code, expected);
    }

    #[test]
    fn i2c_preamble_and_setup() {
        let options = GenerationOptions {
            transmission: Transmission::I2c,
            ..Default::default()
        };
        let code = run(&DisplayModel::new(), &options);
        assert!(code.starts_with("// I2C Connection\n#include <Wire.h>\n#include <LiquidCrystal_I2C.h>\n"));
        assert!(code.contains("LiquidCrystal_I2C lcd(0x27, 16, 2);"));
        assert!(code.contains("  lcd.init(); // lcd.begin() can also be used\n  lcd.backlight();\n"));
        assert!(!code.contains("lcd.begin(16, 2);"));
    }

    #[test]
    fn binary_literals_in_character_table() {
        let options = GenerationOptions {
            number_format: NumberFormat::Binary,
            ..Default::default()
        };
        let code = run(&corner_pixel_display(), &options);
        assert!(code.contains("    0b00010000,\n    0b00000000,\n"));
        assert!(code.contains("    0b00000000\n  };"));
    }

    #[test]
    fn naive_scroll_uses_fixed_cadence() {
        let options = GenerationOptions {
            scrolling_enabled: true,
            scroll_interval_ms: 900,
            ..Default::default()
        };
        let code = run(&corner_pixel_display(), &options);
        assert!(code.contains("const unsigned long SCROLL_DELAY_MS = 300;"));
        assert!(code.contains("int position = (column - scrollOffset) % LCD_COLUMNS;"));
        assert!(code.contains("  lcd.clear();\n  lcd.setCursor(scrollColumn(0), 0);\n  lcd.write(byte(0));\n"));
        assert!(code.contains("  scrollOffset = (scrollOffset + 1) % LCD_COLUMNS;\n  delay(SCROLL_DELAY_MS);\n}"));
        assert!(!code.contains("updateDisplay"));
    }

    #[test]
    fn buffered_scroll_emits_diff_routine_and_configured_interval() {
        let options = GenerationOptions {
            scrolling_enabled: true,
            buffered_scroll: true,
            scroll_direction: ScrollDirection::Right,
            scroll_interval_ms: 450,
            ..Default::default()
        };
        let code = run(&corner_pixel_display(), &options);
        assert!(code.contains("const unsigned long SCROLL_DELAY_MS = 450;"));
        assert!(code.contains("int position = (column + scrollOffset) % LCD_COLUMNS;"));
        assert!(code.contains("const byte BLANK_SLOT = 255;"));
        assert!(code.contains("if (slot != previousFrame[line][column]) {"));
        assert!(code.contains("  placeGlyph(0, 0, 0);\n  updateDisplay();\n"));
        // The loop itself never clears the whole display.
        let loop_body = code.split("void loop()").nth(1).unwrap();
        assert!(!loop_body.contains("lcd.clear()"));
    }

    #[test]
    fn buffered_setup_starts_from_blank_frame() {
        let options = GenerationOptions {
            scrolling_enabled: true,
            buffered_scroll: true,
            ..Default::default()
        };
        let code = run(&corner_pixel_display(), &options);
        let setup = code
            .split("void setup() {")
            .nth(1)
            .and_then(|rest| rest.split("void loop()").next())
            .unwrap();

        let reset = "\
  for (int line = 0; line < 2; line++) {
    for (int column = 0; column < LCD_COLUMNS; column++) {
      previousFrame[line][column] = BLANK_SLOT;
    }
  }
  lcd.clear();
}
";
        assert!(setup.ends_with(&format!("{reset}\n")), "setup was:\n{setup}");
        let created = setup.find("lcd.createChar(0, char0);").unwrap();
        assert!(created < setup.find("previousFrame[line][column] = BLANK_SLOT;").unwrap());

        // A vacated slot is overwritten with a space, a filled one with its glyph.
        assert!(code.contains(
            "        if (slot == BLANK_SLOT) {\n          lcd.print(' ');\n        } else {\n          lcd.write(slot);\n        }\n"
        ));
    }

    #[test]
    fn unbuffered_setup_has_no_frame_buffers() {
        for scrolling in [false, true] {
            let options = GenerationOptions {
                scrolling_enabled: scrolling,
                ..Default::default()
            };
            let code = run(&corner_pixel_display(), &options);
            assert!(!code.contains("previousFrame"));
            assert!(!code.contains("BLANK_SLOT"));
        }
    }

    #[test]
    fn braces_are_balanced_for_every_variant() {
        for (scrolling, buffered) in [(false, false), (true, false), (true, true)] {
            let options = GenerationOptions {
                scrolling_enabled: scrolling,
                buffered_scroll: buffered,
                ..Default::default()
            };
            let code = run(&corner_pixel_display(), &options);
            let open = code.matches('{').count();
            let close = code.matches('}').count();
            assert_eq!(open, close, "unbalanced braces:\n{code}");
        }
    }
}
