//! CAN Monitor CLI Application
//!
//! Live view of a CAN bus dump arriving on standard input. It uses the
//! can-monitor library and adds:
//! - Command-line and TOML configuration
//! - Terminal rendering with changed bytes highlighted
//! - Plain text and JSON output for piping
//! - Quit handling for the full-screen view

use anyhow::{Context, Result};
use can_monitor::{
    FrameStore, IngestLoop, IngestStats, IngestStatus, LineFormat, MonitorConfig, RefreshLoop,
    SignalRegistry,
};
use clap::Parser;
use crossbeam_channel::bounded;
use std::io::{self, BufReader};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::thread::JoinHandle;

mod config;
mod terminal;
mod view;

use config::{AppConfig, DisplayMode};
use view::{Highlight, JsonView, View};

/// CAN Monitor - Live view of CAN frames read from stdin
#[derive(Parser, Debug)]
#[command(name = "can-monitor")]
#[command(about = "Live view of CAN bus frames read from stdin", long_about = None)]
#[command(version)]
struct Args {
    /// Input line format
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<LineFormat>,

    /// Refresh interval in milliseconds
    #[arg(short, long, value_name = "MS")]
    interval: Option<u64>,

    /// Only show these addresses (hex, can be repeated)
    #[arg(short, long, value_name = "ADDR", value_parser = parse_hex_address)]
    address: Vec<u32>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print plain text updates instead of a full-screen view
    #[arg(long, conflicts_with = "json")]
    plain: bool,

    /// Print one JSON object per update instead of a full-screen view
    #[arg(long)]
    json: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Apply command-line overrides on top of the file configuration
    fn merge_into(&self, mut app: AppConfig) -> AppConfig {
        if let Some(format) = self.format {
            app.input.format = format;
        }
        if let Some(interval) = self.interval {
            app.display.refresh_ms = interval;
        }
        if !self.address.is_empty() {
            app.filtering.addresses = Some(self.address.clone());
        }
        if self.plain {
            app.display.mode = DisplayMode::Plain;
        } else if self.json {
            app.display.mode = DisplayMode::Json;
        }
        app
    }
}

fn parse_hex_address(s: &str) -> std::result::Result<u32, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid hex address '{}': {}", s, e))
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("CAN Monitor CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using monitor library v{}", can_monitor::VERSION);

    let app = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    let app = args.merge_into(app);
    let monitor = app.monitor_config();
    monitor.validate().context("Invalid settings")?;
    log::debug!("Effective configuration: {:?}", monitor);

    run(&monitor, app.display.mode)
}

/// Start ingestion on stdin and drive the chosen presentation until it ends
fn run(monitor: &MonitorConfig, mode: DisplayMode) -> Result<()> {
    let store = FrameStore::new();
    let status = IngestStatus::new();

    // Never joined while running: stdin may block forever, and quitting must not wait for it
    let ingest = IngestLoop::from_config(store.clone(), status.clone(), monitor.clone())
        .spawn(BufReader::new(io::stdin()))
        .context("Failed to start ingestion thread")?;

    let registry = SignalRegistry::standard();
    let refresh = RefreshLoop::new(monitor.refresh_interval());
    let (stop_tx, stop_rx) = bounded::<()>(1);

    match mode {
        DisplayMode::Terminal => {
            let _guard = terminal::TerminalGuard::enter()?;
            terminal::spawn_quit_watcher(stop_tx)?;

            let mut draw_error = None;
            refresh.run(&stop_rx, || {
                let frames = store.snapshot();
                let signals = registry.decode_frames(&frames);
                let view = View {
                    frames: &frames,
                    signals: &signals,
                    state: status.state(),
                    stats: status.stats(),
                };
                match terminal::draw(&view.render(Highlight::Color)) {
                    Ok(()) => ControlFlow::Continue(()),
                    Err(e) => {
                        draw_error = Some(e);
                        ControlFlow::Break(())
                    }
                }
            });
            if let Some(e) = draw_error {
                return Err(e).context("Failed to draw view");
            }
        }
        DisplayMode::Plain | DisplayMode::Json => {
            // Keep the sender alive; these modes end with the input
            let _stop_tx = stop_tx;
            let mut last_lines = None;
            let mut write_error = None;

            refresh.run(&stop_rx, || {
                let state = status.state();
                let stats = status.stats();
                let finished = !status.is_running();
                if last_lines == Some(stats.lines) && !finished {
                    return ControlFlow::Continue(());
                }
                last_lines = Some(stats.lines);

                let frames = store.snapshot();
                let signals = registry.decode_frames(&frames);
                let view = View {
                    frames: &frames,
                    signals: &signals,
                    state,
                    stats,
                };
                if let Err(e) = print_update(&view, mode) {
                    write_error = Some(e);
                    return ControlFlow::Break(());
                }

                if finished {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            });
            if let Some(e) = write_error {
                return Err(e);
            }
        }
    }

    if ingest.is_finished() {
        report_ingest_result(ingest);
    }

    log::info!("Monitor stopped");
    Ok(())
}

/// Join a finished ingestion thread and log how it ended
fn report_ingest_result(handle: JoinHandle<IngestStats>) -> Option<IngestStats> {
    match handle.join() {
        Ok(stats) => {
            log::info!(
                "Ingested {} lines: {} frames, {} malformed, {} filtered",
                stats.lines,
                stats.frames,
                stats.malformed,
                stats.filtered
            );
            Some(stats)
        }
        Err(_) => {
            log::error!("Ingestion thread panicked; the view stopped at the last stored frames");
            None
        }
    }
}

/// Write one plain or JSON update to stdout
fn print_update(view: &View<'_>, mode: DisplayMode) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if mode == DisplayMode::Json {
        serde_json::to_writer(&mut stdout, &JsonView::from(view))
            .context("Failed to write JSON update")?;
        writeln!(stdout)?;
    } else {
        for line in view.render(Highlight::Marker) {
            writeln!(stdout, "{}", line)?;
        }
        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_address() {
        assert_eq!(parse_hex_address("0a194005"), Ok(0x0a194005));
        assert_eq!(parse_hex_address("0x7E8"), Ok(0x7e8));
        assert!(parse_hex_address("xyz").is_err());
    }

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from([
            "can-monitor",
            "--format",
            "verbose",
            "-i",
            "200",
            "-a",
            "0x063d4000",
            "--json",
        ]);
        let app = args.merge_into(AppConfig::default());

        assert_eq!(app.input.format, LineFormat::Verbose);
        assert_eq!(app.display.refresh_ms, 200);
        assert_eq!(app.display.mode, DisplayMode::Json);
        assert_eq!(app.filtering.addresses, Some(vec![0x063d4000]));
    }

    #[test]
    fn test_plain_conflicts_with_json() {
        assert!(Args::try_parse_from(["can-monitor", "--plain", "--json"]).is_err());
    }

    #[test]
    fn test_defaults_without_args() {
        let args = Args::parse_from(["can-monitor"]);
        let app = args.merge_into(AppConfig::default());
        assert_eq!(app.display.mode, DisplayMode::Terminal);
        assert!(app.monitor_config().validate().is_ok());
    }

    #[test]
    fn test_report_ingest_result() {
        let handle = std::thread::spawn(|| IngestStats {
            lines: 2,
            frames: 1,
            malformed: 1,
            filtered: 0,
        });
        assert_eq!(report_ingest_result(handle).map(|s| s.frames), Some(1));

        let handle = std::thread::spawn(|| -> IngestStats { panic!("ingest failed") });
        assert_eq!(report_ingest_result(handle), None);
    }

    #[test]
    fn test_panicked_ingest_ends_stream() {
        struct FailingReader;
        impl io::Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                panic!("stdin gone");
            }
        }

        let status = IngestStatus::new();
        let handle = IngestLoop::new(FrameStore::new(), status.clone(), LineFormat::Auto)
            .spawn(BufReader::new(FailingReader))
            .unwrap();
        assert!(report_ingest_result(handle).is_none());
        assert!(!status.is_running());
    }
}
