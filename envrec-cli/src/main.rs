use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "envrec")]
#[command(about = "Replay envelope recordings and inspect known payloads", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the recording file
    recording: PathBuf,
}

fn main() -> Result<()> {
    // Setup logging; verbosity comes from RUST_LOG
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // A missing or extra argument shows usage and exits cleanly
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print()?;
            return Ok(());
        }
    };

    let stats = envrec_cli::run(&cli.recording)?;

    println!();
    println!("{}", "=== Replay Summary ===".bold());
    println!("Frames:            {}", stats.frames);
    println!("Records decoded:   {}", stats.records);
    println!("Dispatched:        {}", stats.dispatched);
    println!("Unknown types:     {}", stats.unknown);
    println!("Decode failures:   {}", stats.decode_failures);
    println!("Handler failures:  {}", stats.handler_failures);
    println!("Resync skipped:    {} bytes", stats.resync_bytes_skipped);
    if stats.truncated {
        println!("{}", "Recording ended mid-frame (truncated)".yellow());
    }

    Ok(())
}
