//! SlimTrace - replay a recorded capture and print the payload.

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use capture::stringify::format_args;
use slimtrace::{Clipboard, PlatformHooks, Replayer, Session, SlimTraceConfig, TraceResult};

/// SlimTrace - compress captured warnings and errors into an LLM-ready trace
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded capture (JSON lines), or `-` for stdin
    #[arg(default_value = "-")]
    input: String,

    /// URL of the observed page
    #[arg(long, default_value = "http://localhost:3000/")]
    url: String,

    /// Configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Display buffer capacity
    #[arg(long)]
    max_logs: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Writes the payload to stdout.
struct StdoutClipboard;

#[async_trait]
impl Clipboard for StdoutClipboard {
    async fn write_text(&self, text: &str) -> TraceResult<()> {
        writeln!(std::io::stdout(), "{}", text)?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries only the payload
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("SlimTrace v{}", slimtrace::VERSION);

    let mut config = match &args.config {
        Some(path) => SlimTraceConfig::from_file(path)?,
        None => SlimTraceConfig::default(),
    };
    if let Some(max_logs) = args.max_logs {
        config = config.with_max_display_logs(max_logs);
    }

    let hooks = PlatformHooks::new()
        .with_warn(|args| tracing::debug!("[WARN] {}", format_args(args)))
        .with_error(|args| tracing::debug!("[ERROR] {}", format_args(args)));
    let session = Session::attach(&config, hooks, &args.url)?;

    let mut replayer = Replayer::new(session);
    let applied = if args.input == "-" {
        replayer.replay(std::io::stdin().lock())?
    } else {
        replayer.replay(BufReader::new(File::open(&args.input)?))?
    };
    info!(applied, "replayed recorded events");

    let mut session = replayer.into_session();
    session.copy_to_clipboard(Arc::new(StdoutClipboard)).await?;
    session.detach();

    Ok(())
}
