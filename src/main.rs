//! `mapper` command-line front end.
//!
//! Usage:
//!   mapper atlas tiles.png                 # validate an atlas
//!   mapper inspect level.map --atlas tiles.png
//!   mapper replay session.txt              # headless editing session
//!   mapper stitch --source ./sprites       # pack sprites into an atlas
//!   mapper loc .                           # count lines of code

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use mapper::atlas::AtlasIndex;
use mapper::atlas::generator::{self, StitchConfig};
use mapper::config::EditorConfig;
use mapper::editor::Editor;
use mapper::loc;
use mapper::script::Script;

#[derive(Parser)]
#[command(name = "mapper")]
#[command(about = "Tile-map editing core, atlas tooling and line counter")]
struct Cli {
    /// JSON editor config; defaults apply to missing fields
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an atlas image and print its layout
    Atlas { path: PathBuf },
    /// Load a map against an atlas and report what was dropped
    Inspect {
        map: PathBuf,
        #[arg(long)]
        atlas: PathBuf,
    },
    /// Replay a scripted editing session without a window
    Replay { script: PathBuf },
    /// Pack every sprite under a directory into one atlas PNG
    Stitch {
        #[arg(long, default_value = "./sprites")]
        source: PathBuf,
        #[arg(long, default_value = "output.png")]
        output: PathBuf,
        #[arg(long)]
        sprite_size: Option<u32>,
        /// Background colour treated as empty, as `r,g,b`
        #[arg(long, value_parser = parse_rgb)]
        background: Option<[u8; 3]>,
    },
    /// Count lines of code under a directory
    Loc {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn parse_rgb(s: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [r, g, b] = parts.as_slice() else {
        return Err(format!("expected r,g,b, got {s:?}"));
    };
    let channel = |c: &str| c.parse::<u8>().map_err(|_| format!("bad colour channel {c:?}"));
    Ok([channel(*r)?, channel(*g)?, channel(*b)?])
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Commands::Atlas { path } => show_atlas(&config, &path),
        Commands::Inspect { map, atlas } => inspect(config, &map, &atlas),
        Commands::Replay { script } => replay(config, &script),
        Commands::Stitch { source, output, sprite_size, background } => {
            let stitch_config = StitchConfig {
                source_dir: source,
                output,
                sprite_size: sprite_size.unwrap_or(config.sprite_size),
                background: background.unwrap_or(generator::DEFAULT_BACKGROUND),
            };
            stitch(&stitch_config)
        }
        Commands::Loc { dir } => count_loc(&dir),
    }
}

fn show_atlas(config: &EditorConfig, path: &Path) -> Result<()> {
    let atlas = AtlasIndex::load(path, config.sprite_size)
        .with_context(|| format!("loading atlas {}", path.display()))?;
    println!(
        "{}: {} tiles, {} per row, {}px sprites",
        path.display(),
        atlas.tile_count(),
        atlas.tiles_per_row(),
        atlas.sprite_size()
    );
    Ok(())
}

fn inspect(config: EditorConfig, map: &Path, atlas: &Path) -> Result<()> {
    let mut editor = Editor::new(config);
    editor.load_atlas(atlas).with_context(|| format!("loading atlas {}", atlas.display()))?;
    let report = editor.load_map(map).with_context(|| format!("loading map {}", map.display()))?;

    println!("{}", map.display());
    for (key, value) in editor.state.header.entries() {
        println!("  {key}: {value}");
    }
    println!("  tiles loaded: {}", report.tile_count);
    if let Some(b) = editor.state.store.bounds() {
        println!(
            "  bounds: ({}, {}) .. ({}, {})  [{}x{}]",
            b.min_x, b.min_y, b.max_x, b.max_y, b.width(), b.height()
        );
    }
    if !report.diagnostics.is_empty() {
        println!("  dropped {} entries:", report.diagnostics.len());
        for d in &report.diagnostics {
            println!("    {d}");
        }
    }
    Ok(())
}

fn replay(config: EditorConfig, path: &Path) -> Result<()> {
    let script = Script::load(path)?;
    let mut editor = Editor::new(config);
    let summary = script
        .run(&mut editor)
        .with_context(|| format!("replaying {}", path.display()))?;
    println!(
        "{} commands, {} tile changes, {} tiles on map",
        summary.commands,
        summary.tiles_changed,
        editor.state.store.len()
    );
    println!("{}", editor.state.status());
    Ok(())
}

fn stitch(config: &StitchConfig) -> Result<()> {
    let report = generator::stitch(config).context("stitching atlas")?;
    for (path, count) in &report.per_file {
        println!("  {}: {count} sprites", path.display());
    }
    println!(
        "Packed {} sprites into a {}x{} atlas ({} slots) at {}",
        report.sprite_count,
        report.atlas_size,
        report.atlas_size,
        report.capacity,
        config.output.display()
    );
    Ok(())
}

fn count_loc(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let report = loc::scan(dir);
    print!("{}", report.render(dir));
    Ok(())
}
