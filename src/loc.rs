// =============================================================================
// LOC.RS — Lines-of-code counter
//
// Walks a source tree, classifies each line of every recognised file as
// blank, comment or code, and aggregates the counts per extension.
// Classification is line-based: a line that mixes code with a trailing
// comment counts as code.
// =============================================================================

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directory names never descended into (dot-directories are skipped too).
pub const SKIP_DIRS: &[&str] = &[
    ".git", ".svn", ".hg", "node_modules", "__pycache__", ".idea",
    "venv", ".venv", "env", ".env", "build", "dist", "target",
    ".gradle", ".mvn", "bin", "obj", ".vs", ".vscode",
];

// ── Comment styles ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `//` and `/* */`
    C,
    /// `#`
    Hash,
    /// `--` and `/* */`
    Sql,
    /// `--` and `--[[ ]]`
    Lua,
    /// `--` and `{- -}`
    Haskell,
    /// `<!-- -->`
    Html,
    /// `/* */`
    Css,
}

impl CommentStyle {
    pub fn line_comment(self) -> Option<&'static str> {
        match self {
            CommentStyle::C => Some("//"),
            CommentStyle::Hash => Some("#"),
            CommentStyle::Sql | CommentStyle::Lua | CommentStyle::Haskell => Some("--"),
            CommentStyle::Html | CommentStyle::Css => None,
        }
    }

    pub fn block_comment(self) -> Option<(&'static str, &'static str)> {
        match self {
            CommentStyle::C | CommentStyle::Sql | CommentStyle::Css => Some(("/*", "*/")),
            CommentStyle::Lua => Some(("--[[", "]]")),
            CommentStyle::Haskell => Some(("{-", "-}")),
            CommentStyle::Html => Some(("<!--", "-->")),
            CommentStyle::Hash => None,
        }
    }
}

/// Comment style for a file extension (without the dot, case-insensitive).
pub fn language_for(ext: &str) -> Option<CommentStyle> {
    use CommentStyle::*;
    Some(match ext.to_ascii_lowercase().as_str() {
        "c" | "h" | "cpp" | "hpp" | "cc" | "java" | "js" | "ts" | "jsx" | "tsx" | "cs" | "go"
        | "swift" | "kt" | "scala" | "rs" | "m" | "mm" => C,
        "py" | "rb" | "pl" | "sh" | "bash" | "zsh" | "r" | "yaml" | "yml" | "toml" => Hash,
        "sql" => Sql,
        "lua" => Lua,
        "hs" => Haskell,
        "html" | "xml" | "svg" => Html,
        "css" | "scss" | "less" => Css,
        _ => return None,
    })
}

// ── Counting ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineCounts {
    pub total: usize,
    pub code: usize,
    pub comment: usize,
    pub blank: usize,
}

impl std::ops::AddAssign for LineCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.code += rhs.code;
        self.comment += rhs.comment;
        self.blank += rhs.blank;
    }
}

/// Classify every line of `text` under `style`.
pub fn count_lines(text: &str, style: CommentStyle) -> LineCounts {
    let line_comment = style.line_comment();
    let block = style.block_comment();
    let mut counts = LineCounts::default();
    let mut in_block = false;

    for line in text.lines() {
        counts.total += 1;
        let stripped = line.trim();

        if stripped.is_empty() {
            counts.blank += 1;
            continue;
        }

        if in_block {
            counts.comment += 1;
            if block.is_some_and(|(_, end)| stripped.contains(end)) {
                in_block = false;
            }
            continue;
        }

        if let Some((start, end)) = block {
            if stripped.contains(start) {
                let before = stripped.split(start).next().unwrap_or("").trim();
                if stripped.contains(end) {
                    // Opened and closed on this line.
                    let after = stripped.rsplit(end).next().unwrap_or("").trim();
                    if before.is_empty() && after.is_empty() {
                        counts.comment += 1;
                    } else {
                        counts.code += 1;
                    }
                } else {
                    in_block = true;
                    let before_is_comment = line_comment.is_some_and(|lc| before.starts_with(lc));
                    if !before.is_empty() && !before_is_comment {
                        counts.code += 1;
                    } else {
                        counts.comment += 1;
                    }
                }
                continue;
            }
        }

        if line_comment.is_some_and(|lc| stripped.starts_with(lc)) {
            counts.comment += 1;
            continue;
        }

        counts.code += 1;
    }

    counts
}

// ── Scanning ──────────────────────────────────────────────────────────────────

fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || SKIP_DIRS.contains(&name)
}

/// Every recognised source file under `root` with its lowercase extension.
pub fn find_source_files(root: &Path) -> Vec<(PathBuf, String)> {
    let mut files: Vec<(PathBuf, String)> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !is_skipped_dir(&e.file_name().to_string_lossy())
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let ext = e.path().extension()?.to_str()?.to_ascii_lowercase();
            language_for(&ext)?;
            Some((e.into_path(), ext))
        })
        .collect();
    files.sort();
    files
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtStats {
    pub files: usize,
    pub counts: LineCounts,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LocReport {
    /// Keyed by lowercase extension without the dot.
    pub by_ext: BTreeMap<String, ExtStats>,
    pub totals: LineCounts,
    pub files: usize,
    /// Files that could not be read.
    pub skipped: usize,
}

/// Count every recognised file under `root`.
pub fn scan(root: &Path) -> LocReport {
    let mut report = LocReport::default();
    for (path, ext) in find_source_files(root) {
        let Some(style) = language_for(&ext) else { continue };
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) => {
                log::warn!(target: "loc", "could not read {}: {e}", path.display());
                report.skipped += 1;
                continue;
            }
        };
        let counts = count_lines(&String::from_utf8_lossy(&bytes), style);
        report.files += 1;
        report.totals += counts;
        let entry = report.by_ext.entry(ext).or_default();
        entry.files += 1;
        entry.counts += counts;
    }
    report
}

/// `1234567` → `"1,234,567"`.
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl LocReport {
    /// Human-readable table: per-extension rows by code count (descending),
    /// a TOTAL row, and a percentage summary.
    pub fn render(&self, root: &Path) -> String {
        let rule = "=".repeat(70);
        let thin = "-".repeat(70);
        let mut out = String::new();

        out.push('\n');
        out.push_str(&format!("{rule}\n  Lines of Code Summary: {}\n{rule}\n\n", root.display()));
        out.push_str(&format!(
            "{:<10} {:>8} {:>12} {:>12} {:>10} {:>12}\n{thin}\n",
            "Extension", "Files", "Code", "Comment", "Blank", "Total"
        ));

        let mut rows: Vec<_> = self.by_ext.iter().collect();
        rows.sort_by(|a, b| b.1.counts.code.cmp(&a.1.counts.code).then_with(|| a.0.cmp(b.0)));
        for (ext, stats) in rows {
            out.push_str(&Self::row(&format!(".{ext}"), stats.files, &stats.counts));
        }
        out.push_str(&format!("{thin}\n"));
        out.push_str(&Self::row("TOTAL", self.files, &self.totals));
        out.push('\n');

        let t = self.totals;
        if t.total > 0 {
            let pct = |n: usize| n as f64 / t.total as f64 * 100.0;
            out.push_str(&format!("  Code:    {:>12}  ({:.1}%)\n", format_number(t.code), pct(t.code)));
            out.push_str(&format!("  Comment: {:>12}  ({:.1}%)\n", format_number(t.comment), pct(t.comment)));
            out.push_str(&format!("  Blank:   {:>12}  ({:.1}%)\n", format_number(t.blank), pct(t.blank)));
            out.push('\n');
        }
        if self.skipped > 0 {
            out.push_str(&format!("  ({} file(s) could not be read)\n\n", self.skipped));
        }
        out
    }

    fn row(label: &str, files: usize, c: &LineCounts) -> String {
        format!(
            "{:<10} {:>8} {:>12} {:>12} {:>10} {:>12}\n",
            label,
            files,
            format_number(c.code),
            format_number(c.comment),
            format_number(c.blank),
            format_number(c.total)
        )
    }
}
