//! Engine: the sketch compiler.
//!
//! Turns a `DisplayModel` plus `GenerationOptions` into `GeneratedCode`:
//! deduplicate glyphs, encode their rows, plan the layout, emit the text.
//!
//! The engine is a pure function. It never touches terminals or files and
//! keeps no state between runs.

pub mod emit;
pub mod encode;
pub mod glyphs;
pub mod layout;
pub mod source;

use log::debug;

use crate::types::{DisplayModel, GeneratedCode, GenerationOptions};
use glyphs::{GlyphTable, PlacementMap};
use layout::RenderPlan;

/// Everything one pipeline run produces. The editor uses the table and plan
/// for its preview; the code is the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    pub glyphs: GlyphTable,
    pub placement: PlacementMap,
    pub plan: RenderPlan,
    pub code: GeneratedCode,
}

pub struct Engine;

impl Engine {
    /// Run the whole pipeline from scratch.
    pub fn compile(display: &DisplayModel, options: &GenerationOptions) -> Compiled {
        let (glyphs, placement) = glyphs::build_glyph_table(display);
        let plan = layout::plan_layout(&placement, options);
        let code = emit::emit(&glyphs, &plan, options);

        debug!(
            "compiled {} glyph(s) at {} position(s), animated={}",
            glyphs.len(),
            plan.placements().len(),
            plan.is_animated(),
        );

        Compiled {
            glyphs,
            placement,
            plan,
            code,
        }
    }
}

/// The single pure entry point: same inputs, byte-identical output.
pub fn generate(display: &DisplayModel, options: &GenerationOptions) -> GeneratedCode {
    Engine::compile(display, options).code
}
