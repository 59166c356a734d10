use std::{fs, path::Path, process};

use anyhow::{bail, Context, Result};
use log::info;

use lcd_glyph_studio::{
    editor::Editor,
    engine::{generate, source::DesignFile},
    player::Player,
};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const GENERATE_USAGE: &str = "lcd-glyph-studio generate <design.json> [output.ino]";
const PREVIEW_USAGE: &str = "lcd-glyph-studio preview <design.json>";
const EDIT_USAGE: &str = "lcd-glyph-studio edit <design.json>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("generate") => {
            let design_path = args.next().context(GENERATE_USAGE)?;
            let output_path = args.next();
            generate_sketch(&design_path, output_path.as_deref())
        }
        Some("preview") => {
            let path = args.next().context(PREVIEW_USAGE)?;
            preview(&path)
        }
        Some("edit") => {
            let path = args.next().context(EDIT_USAGE)?;
            edit(&path)
        }
        _ => bail!(
            "LCD Glyph Studio: custom characters for 16x2 displays\n\nUsage:\n  {GENERATE_USAGE}\n  {PREVIEW_USAGE}\n  {EDIT_USAGE}"
        ),
    }
}

fn load(path: &str) -> Result<DesignFile> {
    DesignFile::load(Path::new(path))
}

fn generate_sketch(design_path: &str, output_path: Option<&str>) -> Result<()> {
    let (display, options) = load(design_path)?.to_display()?;
    let code = generate(&display, &options);

    match output_path {
        Some(output_path) => {
            fs::write(output_path, code.as_str())
                .with_context(|| format!("Failed to write {output_path}"))?;
            info!("wrote {} lines to {output_path}", code.lines().count());
            eprintln!("Generated {design_path} -> {output_path}");
        }
        None => print!("{code}"),
    }

    Ok(())
}

fn preview(path: &str) -> Result<()> {
    let (display, options) = load(path)?.to_display()?;
    let mut player = Player::new(&display, &options);
    player.play()
}

fn edit(path: &str) -> Result<()> {
    let mut editor = Editor::open(path)?;
    editor.run()
}
