//! # Page Builder CLI
//!
//! Command-line host for the page builder core.
//!
//! Loads the layout persisted in a data directory, replays a script of
//! editor commands against it and prints the resulting element list.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p builder-cli -- --data-dir ./page-data --script gestures.jsonl
//! ```
//!
//! Scripts hold one JSON [`Command`] per line; blank lines and lines starting
//! with `#` are skipped:
//!
//! ```text
//! # place a button and label it
//! {"type":"palette_drag_start","data":{"element_type":"button"}}
//! {"type":"drop","data":{"x":100,"y":100}}
//! {"type":"edit_text","data":{"value":"Click me"}}
//! {"type":"save_edit"}
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Context;
use builder_core::{Command, Editor, FileStore, KeyValueStore};
use clap::Parser;

/// Command-line arguments for builder-cli.
#[derive(Debug, Clone, Parser)]
#[command(name = "builder-cli")]
#[command(about = "Replay page builder commands against a persisted layout")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding the persisted layout
    #[arg(long, env = "PAGE_BUILDER_DATA_DIR", default_value = "page-data")]
    pub data_dir: PathBuf,

    /// Command script (JSON lines); reads stdin when omitted
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Pretty-print the resulting layout
    #[arg(long)]
    pub pretty: bool,
}

/// Runtime configuration resolved from [`CliArgs`].
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding the persisted layout.
    pub data_dir: PathBuf,
    /// Command script, or `None` for stdin.
    pub script: Option<PathBuf>,
    /// Pretty-print output.
    pub pretty: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from("page-data"),
            script: None,
            pretty: false,
        }
    }
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            data_dir: args.data_dir,
            script: args.script,
            pretty: args.pretty,
        }
    }
}

/// Parse one script line. Returns `None` for blank and comment lines.
///
/// # Errors
///
/// Returns an error if the line is not a valid command.
pub fn parse_line(line: &str) -> anyhow::Result<Option<Command>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let command = serde_json::from_str(trimmed)
        .with_context(|| format!("invalid command: {trimmed}"))?;
    Ok(Some(command))
}

/// Apply every command in `script` to `editor`, in order.
///
/// Returns the number of commands applied.
///
/// # Errors
///
/// Stops at the first unreadable line, malformed command or persistence
/// failure; commands before it stay applied.
pub fn replay<S, R>(editor: &mut Editor<S>, script: R) -> anyhow::Result<usize>
where
    S: KeyValueStore,
    R: BufRead,
{
    let mut applied = 0;
    for (index, line) in script.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        let Some(command) = parse_line(&line).with_context(|| format!("line {line_no}"))? else {
            continue;
        };
        editor
            .dispatch(command)
            .with_context(|| format!("line {line_no}: command failed"))?;
        applied += 1;
    }
    Ok(applied)
}

/// Load the layout, replay the configured script and render the result.
///
/// # Errors
///
/// Returns an error if the layout cannot be loaded, the script cannot be
/// replayed, or the result cannot be serialized.
pub fn run(config: &CliConfig, stdin: impl BufRead) -> anyhow::Result<String> {
    let sink = FileStore::new(&config.data_dir)
        .with_context(|| format!("cannot open data dir {}", config.data_dir.display()))?;
    let mut editor = Editor::load(sink).context("cannot load persisted layout")?;
    tracing::info!(
        "Loaded {} elements from {}",
        editor.store().len(),
        config.data_dir.display()
    );

    let applied = if let Some(ref path) = config.script {
        let file = std::fs::File::open(path)
            .with_context(|| format!("cannot open script {}", path.display()))?;
        replay(&mut editor, std::io::BufReader::new(file))?
    } else {
        replay(&mut editor, stdin)?
    };
    tracing::info!("Applied {applied} commands");

    editor.flush().context("cannot save layout")?;

    let elements = editor.store().snapshot();
    let rendered = if config.pretty {
        serde_json::to_string_pretty(&elements)?
    } else {
        serde_json::to_string(&elements)?
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use builder_core::{ElementStyle, MemoryStore, Position};

    const SCRIPT: &str = r#"
# place a button and label it
{"type":"palette_drag_start","data":{"element_type":"button"}}
{"type":"drag_over"}
{"type":"drop","data":{"x":100,"y":100}}
{"type":"edit_text","data":{"value":"Click me"}}
{"type":"edit_font_size","data":{"value":"16"}}
{"type":"edit_font_weight","data":{"value":"bold"}}
{"type":"save_edit"}
"#;

    #[test]
    fn test_parse_line_skips_blank_and_comments() {
        assert!(parse_line("").expect("blank").is_none());
        assert!(parse_line("   ").expect("spaces").is_none());
        assert!(parse_line("# note").expect("comment").is_none());
        assert_eq!(
            parse_line(r#"{"type":"cancel_edit"}"#).expect("command"),
            Some(Command::CancelEdit)
        );
    }

    #[test]
    fn test_parse_line_rejects_garbage() {
        assert!(parse_line("{not json").is_err());
    }

    #[test]
    fn test_replay_applies_commands_in_order() {
        let mut editor = Editor::load(MemoryStore::new()).expect("load");
        let applied = replay(&mut editor, SCRIPT.as_bytes()).expect("replay");

        assert_eq!(applied, 7);
        let element = editor.selected().expect("selected");
        assert_eq!(element.text, "Click me");
        assert_eq!(element.position, Position::new(100.0, 100.0));
        assert_eq!(element.style, ElementStyle::new("16px", "bold"));
    }

    #[test]
    fn test_replay_reports_bad_line() {
        let mut editor = Editor::load(MemoryStore::new()).expect("load");
        let script = "{\"type\":\"drag_over\"}\nnope\n";
        let err = replay(&mut editor, script.as_bytes()).expect_err("should fail");
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn test_run_persists_between_invocations() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = CliConfig {
            data_dir: dir.path().to_path_buf(),
            script: None,
            pretty: false,
        };

        let first = run(&config, SCRIPT.as_bytes()).expect("first run");
        assert!(first.contains("\"text\":\"Click me\""));

        let second = run(&config, "".as_bytes()).expect("second run");
        assert_eq!(first, second);
    }

    #[test]
    fn test_run_reads_script_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script_path = dir.path().join("gestures.jsonl");
        std::fs::write(&script_path, SCRIPT).expect("write script");

        let config = CliConfig {
            data_dir: dir.path().join("data"),
            script: Some(script_path),
            pretty: true,
        };
        let output = run(&config, "".as_bytes()).expect("run");
        assert!(output.contains("\"fontSize\": \"16px\""));
    }

    #[test]
    fn test_config_from_args() {
        let args = CliArgs::parse_from(["builder-cli", "--data-dir", "/tmp/layout", "--pretty"]);
        let config = CliConfig::from(args);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/layout"));
        assert!(config.pretty);
        assert!(config.script.is_none());
    }
}
