// SPDX-License-Identifier: MIT
//
// gled — a terminal line editor built on a gap buffer.
//
// This is the binary that wires the two crates together:
//
//   gled-term → terminal control, rendering, input parsing, event loop
//   gled-core → gap buffer, cursor position tracking, documents, search
//
// `Window` implements gled-term's App trait. Each keypress flows through:
//
//   stdin → parser → on_event → prompt / search / editor dispatch
//   paint → view → frame → diff renderer → terminal
//
// Logging goes to `--log-file` when given, filtered by `GLED_LOG`; the
// terminal itself is the editor's screen.

mod view;
mod window;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use gled_core::EditorOptions;
use gled_core::options::{DEFAULT_QUIT_TIMES, DEFAULT_TAB_STOP};
use gled_term::event_loop::EventLoop;
use tracing_subscriber::EnvFilter;

use crate::window::Window;

/// Environment variable holding the log filter (`info`, `gled_core=trace`, ...).
const LOG_ENV: &str = "GLED_LOG";

/// A terminal line editor built on a gap buffer
#[derive(Parser, Debug)]
#[command(name = "gled", version, about, long_about = None)]
struct Cli {
    /// Files to open, one document each
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Columns between tab stops
    #[arg(long, value_name = "N", default_value_t = DEFAULT_TAB_STOP)]
    tab_stop: usize,

    /// Extra ^X presses needed to close a modified document
    #[arg(long, value_name = "N", default_value_t = DEFAULT_QUIT_TIMES)]
    quit_times: u32,

    /// Write log events to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> Result<EditorOptions> {
        let options = EditorOptions::default()
            .with_tab_stop(self.tab_stop)
            .context("invalid --tab-stop")?
            .with_quit_times(self.quit_times);
        Ok(options)
    }
}

fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;
    let options = cli.options()?;

    let mut window = Window::with_files(options, &cli.files);
    tracing::info!(
        documents = window.document_count(),
        tab_stop = options.tab_stop(),
        "starting"
    );

    EventLoop::new()
        .run(&mut window)
        .context("terminal error")?;

    tracing::info!("exiting");
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["gled"]).unwrap();
        assert!(cli.files.is_empty());
        let options = cli.options().unwrap();
        assert_eq!(options.tab_stop(), DEFAULT_TAB_STOP);
        assert_eq!(options.quit_times(), DEFAULT_QUIT_TIMES);
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn cli_flags_and_files() {
        let cli = Cli::try_parse_from([
            "gled",
            "--tab-stop",
            "4",
            "--quit-times",
            "1",
            "--log-file",
            "gled.log",
            "a.txt",
            "b.txt",
        ])
        .unwrap();
        assert_eq!(cli.files, [PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert_eq!(cli.log_file, Some(PathBuf::from("gled.log")));
        let options = cli.options().unwrap();
        assert_eq!(options.tab_stop(), 4);
        assert_eq!(options.quit_times(), 1);
    }

    #[test]
    fn zero_tab_stop_is_rejected() {
        let cli = Cli::try_parse_from(["gled", "--tab-stop", "0"]).unwrap();
        assert!(cli.options().is_err());
    }

    #[test]
    fn clap_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
