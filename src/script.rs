// =============================================================================
// SCRIPT.RS — Headless editing sessions
//
// A script is one editor event per line, replayed against an `Editor`
// without a window:
//
//   atlas sprites.png
//   press 512 384          # screen pixels
//   move 580 384
//   release
//   press 300 300 ctrl     # pan
//   save out.map
//   snapshot out.png
//
// Blank lines and `#` comments are skipped.  A `#` inside a word, or as the
// argument of `key`, is kept.  Parsing reports the first bad line; running
// stops at the first failed atlas or map operation.
// =============================================================================

use std::path::{Path, PathBuf};

use glam::IVec2;
use thiserror::Error;

use crate::atlas::AtlasError;
use crate::editor::Editor;
use crate::input::{Modifier, Modifiers, PointerButton};
use crate::map_file::MapError;
use crate::render::RgbaSurface;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },
    #[error("line {line}: {source}")]
    Atlas {
        line: usize,
        #[source]
        source: AtlasError,
    },
    #[error("line {line}: {source}")]
    Map {
        line: usize,
        #[source]
        source: MapError,
    },
    #[error("line {line}: no mode named {name:?}")]
    UnknownMode { line: usize, name: String },
    #[error("line {line}: failed to write snapshot {}: {source}", path.display())]
    Snapshot {
        line: usize,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

// ── Commands ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Atlas(PathBuf),
    Load(PathBuf),
    Save(PathBuf),
    Mode(String),
    Key(char),
    Press { pos: IVec2, modifiers: Modifiers },
    Move(IVec2),
    Release,
    Right(IVec2),
    Select(u32),
    Snapshot(PathBuf),
}

fn parse_err(line: usize, msg: impl Into<String>) -> ScriptError {
    ScriptError::Parse { line, msg: msg.into() }
}

fn parse_point(line: usize, args: &[&str]) -> Result<IVec2, ScriptError> {
    let [x, y, ..] = args else {
        return Err(parse_err(line, "expected <x> <y>"));
    };
    let x = x.parse().map_err(|_| parse_err(line, format!("bad x coordinate {x:?}")))?;
    let y = y.parse().map_err(|_| parse_err(line, format!("bad y coordinate {y:?}")))?;
    Ok(IVec2::new(x, y))
}

fn one_arg<'a>(line: usize, verb: &str, args: &[&'a str]) -> Result<&'a str, ScriptError> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(parse_err(line, format!("`{verb}` takes exactly one argument"))),
    }
}

fn no_args(line: usize, verb: &str, args: &[&str]) -> Result<(), ScriptError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(parse_err(line, format!("`{verb}` takes no arguments")))
    }
}

impl ScriptCommand {
    /// Parse one non-blank, non-comment line.
    pub fn parse(line: usize, text: &str) -> Result<Self, ScriptError> {
        let mut words = text.split_whitespace();
        let verb = words.next().ok_or_else(|| parse_err(line, "empty command"))?;
        let args: Vec<&str> = words.collect();

        Ok(match verb {
            "atlas" => ScriptCommand::Atlas(one_arg(line, verb, &args)?.into()),
            "load" => ScriptCommand::Load(one_arg(line, verb, &args)?.into()),
            "save" => ScriptCommand::Save(one_arg(line, verb, &args)?.into()),
            "snapshot" => ScriptCommand::Snapshot(one_arg(line, verb, &args)?.into()),
            "mode" => ScriptCommand::Mode(one_arg(line, verb, &args)?.to_string()),
            "key" => {
                let arg = one_arg(line, verb, &args)?;
                let mut chars = arg.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => ScriptCommand::Key(c),
                    _ => return Err(parse_err(line, format!("`key` expects one character, got {arg:?}"))),
                }
            }
            "press" => {
                let pos = parse_point(line, &args)?;
                let mut modifiers = Modifiers::NONE;
                for name in &args[2..] {
                    let m = Modifier::parse(name)
                        .ok_or_else(|| parse_err(line, format!("unknown modifier {name:?}")))?;
                    modifiers = modifiers.with(m);
                }
                ScriptCommand::Press { pos, modifiers }
            }
            "move" | "right" => {
                if args.len() != 2 {
                    return Err(parse_err(line, format!("`{verb}` expects <x> <y>")));
                }
                let pos = parse_point(line, &args)?;
                if verb == "move" { ScriptCommand::Move(pos) } else { ScriptCommand::Right(pos) }
            }
            "release" => {
                no_args(line, verb, &args)?;
                ScriptCommand::Release
            }
            "select" => {
                let arg = one_arg(line, verb, &args)?;
                ScriptCommand::Select(
                    arg.parse().map_err(|_| parse_err(line, format!("bad palette index {arg:?}")))?,
                )
            }
            other => return Err(parse_err(line, format!("unknown command {other:?}"))),
        })
    }
}

// ── Script ────────────────────────────────────────────────────────────────────

/// Drop a `#` comment.  A comment starts at a word beginning with `#`, so
/// `save maps/#1.map` keeps its path; the argument of `key` never starts one.
fn strip_comment(raw: &str) -> &str {
    let mut word_start = None;
    let mut word_index = 0;
    let mut verb = "";
    for (i, c) in raw.char_indices().chain(std::iter::once((raw.len(), ' '))) {
        match (c.is_whitespace(), word_start) {
            (false, None) => {
                if c == '#' && !(word_index == 1 && verb == "key") {
                    return &raw[..i];
                }
                word_start = Some(i);
            }
            (true, Some(start)) => {
                if word_index == 0 {
                    verb = &raw[start..i];
                }
                word_index += 1;
                word_start = None;
            }
            _ => {}
        }
    }
    raw
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    /// Commands with their 1-based source line.
    pub commands: Vec<(usize, ScriptCommand)>,
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub commands: usize,
    /// Tile changes made by paint strokes during the run.
    pub tiles_changed: usize,
}

impl Script {
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut commands = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            let body = strip_comment(raw).trim();
            if body.is_empty() {
                continue;
            }
            commands.push((i + 1, ScriptCommand::parse(i + 1, body)?));
        }
        Ok(Self { commands })
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ScriptError::Read { path: path.to_path_buf(), source })?;
        Self::parse(&text)
    }

    /// Replay every command against `editor`, stopping at the first failure.
    pub fn run(&self, editor: &mut Editor) -> Result<RunSummary, ScriptError> {
        let mut summary = RunSummary::default();
        for (line, cmd) in &self.commands {
            run_command(editor, *line, cmd)?;
            summary.commands += 1;
            summary.tiles_changed += editor.state.take_changes().len();
            log::debug!(target: "script", "line {line}: {cmd:?} -> {}", editor.state.status());
        }
        Ok(summary)
    }
}

fn run_command(editor: &mut Editor, line: usize, cmd: &ScriptCommand) -> Result<(), ScriptError> {
    match cmd {
        ScriptCommand::Atlas(path) => {
            editor.load_atlas(path).map_err(|source| ScriptError::Atlas { line, source })?;
        }
        ScriptCommand::Load(path) => {
            editor.load_map(path).map_err(|source| ScriptError::Map { line, source })?;
        }
        ScriptCommand::Save(path) => {
            editor.save_map(path).map_err(|source| ScriptError::Map { line, source })?;
        }
        ScriptCommand::Mode(name) => {
            if !editor.set_mode(name) {
                return Err(ScriptError::UnknownMode { line, name: name.clone() });
            }
        }
        ScriptCommand::Key(c) => editor.key_typed(*c),
        ScriptCommand::Press { pos, modifiers } => {
            editor.pointer_down(PointerButton::Primary, *pos, *modifiers);
        }
        ScriptCommand::Move(pos) => editor.pointer_move(*pos),
        ScriptCommand::Release => editor.pointer_up(PointerButton::Primary),
        ScriptCommand::Right(pos) => {
            editor.pointer_down(PointerButton::Secondary, *pos, Modifiers::NONE);
        }
        ScriptCommand::Select(index) => editor.select_panel_entry(*index),
        ScriptCommand::Snapshot(path) => {
            let viewport = editor.state.camera.viewport;
            let mut surface = RgbaSurface::new(viewport.x.max(1) as u32, viewport.y.max(1) as u32);
            editor.render(&mut surface);
            surface
                .into_image()
                .save(path)
                .map_err(|source| ScriptError::Snapshot { line, path: path.clone(), source })?;
            log::info!(target: "script", "snapshot written to {}", path.display());
        }
    }
    Ok(())
}
