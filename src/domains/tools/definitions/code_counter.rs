//! Code counter tool definition.
//!
//! Counts lines in the files of a folder whose names match a regex.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use regex::RegexBuilder;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::domains::tools::args::ToolArgs;
use crate::domains::tools::handlers::ToolHandler;
use crate::domains::tools::schema::{ParamSpec, ParamType, Schema, ToolDescription};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the code counter, with defaults resolved.
#[derive(Debug, Clone)]
pub struct CodeCounterParams {
    pub folder: PathBuf,
    pub pattern: String,
    pub recursive: bool,
    pub exclude_empty: bool,
    pub show_details: bool,
    pub sort_by: SortBy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Name,
    Size,
    Unsorted,
}

impl CodeCounterParams {
    fn from_args(args: &ToolArgs) -> anyhow::Result<Self> {
        let folder = args.get_str("folder").context("Missing 'folder' parameter")?;
        let sort_by = match args.str_or("sort_by", "name").to_lowercase().as_str() {
            "name" => SortBy::Name,
            "size" => SortBy::Size,
            "none" => SortBy::Unsorted,
            other => bail!("Invalid sort_by '{other}': expected name, size or none"),
        };

        Ok(Self {
            folder: PathBuf::from(folder),
            pattern: args.str_or("pattern", ".*").to_string(),
            recursive: args.bool_or("recursive", true),
            exclude_empty: args.bool_or("exclude_empty", false),
            show_details: args.bool_or("show_details", true),
            sort_by,
        })
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

pub struct CodeCounterTool;

impl CodeCounterTool {
    pub const NAME: &'static str = "code_counter";

    pub const DESCRIPTION: &'static str =
        "Count lines of code in a folder, filtering file names with a regular expression.";

    fn schema() -> Schema {
        Schema::new()
            .param("folder", ParamSpec::required(ParamType::String, "Folder to scan"))
            .param(
                "pattern",
                ParamSpec::optional(ParamType::String, "Regular expression matched against file names (e.g. \\.rs$)")
                    .with_default(".*"),
            )
            .param(
                "recursive",
                ParamSpec::optional(ParamType::Bool, "Descend into subfolders").with_default(true),
            )
            .param(
                "exclude_empty",
                ParamSpec::optional(ParamType::Bool, "Leave blank lines out of the line totals")
                    .with_default(false),
            )
            .param(
                "show_details",
                ParamSpec::optional(ParamType::Bool, "List every matched file").with_default(true),
            )
            .param(
                "sort_by",
                ParamSpec::optional(ParamType::String, "File order: name, size (line count) or none")
                    .with_default("name"),
            )
    }

    /// Scan the folder and build the report.
    #[instrument(skip_all, fields(folder = %params.folder.display()))]
    pub fn count(params: &CodeCounterParams) -> anyhow::Result<String> {
        let matcher = RegexBuilder::new(&params.pattern)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("Invalid pattern '{}'", params.pattern))?;

        if !params.folder.is_dir() {
            bail!("Not a folder: {}", params.folder.display());
        }

        let mut files = Vec::new();
        collect_files(&params.folder, params.recursive, &mut |path: &Path| {
            path.file_name()
                .map(|name| matcher.is_match(&name.to_string_lossy()))
                .unwrap_or(false)
        }, &mut files);

        if files.is_empty() {
            return Ok(format!(
                "No files matching '{}' in folder '{}'",
                params.pattern,
                params.folder.display()
            ));
        }

        let mut stats: Vec<FileStats> = files
            .iter()
            .map(|path| FileStats::read(path, &params.folder))
            .collect();

        match params.sort_by {
            SortBy::Name => stats.sort_by(|a, b| a.relative.cmp(&b.relative)),
            SortBy::Size => stats.sort_by(|a, b| b.lines.cmp(&a.lines)),
            SortBy::Unsorted => {}
        }

        info!("Counted {} files", stats.len());
        Ok(render_report(params, &stats))
    }
}

#[async_trait::async_trait]
impl ToolHandler for CodeCounterTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription::new(Self::NAME, Self::DESCRIPTION).with_parameters(Self::schema())
    }

    async fn execute(&self, args: ToolArgs) -> anyhow::Result<Value> {
        let params = CodeCounterParams::from_args(&args)?;
        Self::count(&params).map(Value::String)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

#[derive(Debug)]
struct FileStats {
    relative: String,
    lines: usize,
    non_empty: usize,
    code: usize,
    bytes: u64,
}

impl FileStats {
    fn read(path: &Path, root: &Path) -> Self {
        let relative = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();
        let bytes = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        let content = match fs::read(path) {
            Ok(raw) => String::from_utf8_lossy(&raw).into_owned(),
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                String::new()
            }
        };

        let mut stats = Self {
            relative,
            lines: 0,
            non_empty: 0,
            code: 0,
            bytes,
        };
        for line in content.lines() {
            stats.lines += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            stats.non_empty += 1;
            if !is_comment(trimmed) {
                stats.code += 1;
            }
        }
        stats
    }

    fn counted_lines(&self, exclude_empty: bool) -> usize {
        if exclude_empty { self.non_empty } else { self.lines }
    }
}

fn is_comment(trimmed: &str) -> bool {
    ["//", "#", "/*", "*", "<!--"]
        .iter()
        .any(|marker| trimmed.starts_with(marker))
}

fn collect_files(
    dir: &Path,
    recursive: bool,
    matches: &mut dyn FnMut(&Path) -> bool,
    out: &mut Vec<PathBuf>,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to read directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                collect_files(&path, recursive, matches, out);
            }
        } else if path.is_file() && matches(&path) {
            out.push(path);
        }
    }
}

fn render_report(params: &CodeCounterParams, stats: &[FileStats]) -> String {
    let total_lines: usize = stats.iter().map(|s| s.counted_lines(params.exclude_empty)).sum();
    let total_non_empty: usize = stats.iter().map(|s| s.non_empty).sum();
    let total_code: usize = stats.iter().map(|s| s.code).sum();
    let total_bytes: u64 = stats.iter().map(|s| s.bytes).sum();

    let mut lines = vec![
        "Code line report".to_string(),
        "=".repeat(50),
        format!("Folder: {}", params.folder.display()),
        format!("Pattern: {}", params.pattern),
        format!("Recursive: {}", yes_no(params.recursive)),
        format!("Exclude empty lines: {}", yes_no(params.exclude_empty)),
        String::new(),
    ];

    if params.show_details {
        lines.push("Files:".to_string());
        lines.push("-".repeat(80));
        lines.push(format!(
            "{:<50} {:<8} {:<8} {:<8} {:<10}",
            "Path", "Lines", "Filled", "Code", "Size"
        ));
        lines.push("-".repeat(80));
        for stat in stats {
            lines.push(format!(
                "{:<50} {:<8} {:<8} {:<8} {:<10}",
                shorten(&stat.relative, 47),
                stat.counted_lines(params.exclude_empty),
                stat.non_empty,
                stat.code,
                format_size(stat.bytes)
            ));
        }
        lines.push("-".repeat(80));
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    lines.push(format!("  Files: {}", stats.len()));
    lines.push(format!("  Lines: {total_lines}"));
    lines.push(format!("  Non-empty lines: {total_non_empty}"));
    lines.push(format!("  Code lines: {total_code}"));
    lines.push(format!("  Total size: {}", format_size(total_bytes)));
    lines.push(format!(
        "  Average lines per file: {:.1}",
        total_lines as f64 / stats.len() as f64
    ));

    lines.join("\n")
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn shorten(path: &str, max: usize) -> String {
    let count = path.chars().count();
    if count <= max {
        return path.to_string();
    }
    let tail: String = path.chars().skip(count - (max - 3)).collect();
    format!("...{tail}")
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit_index = 0;
    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.1}{}", size, UNITS[unit_index])
}

// ============================================================================
// Tests
// ============================================================================
