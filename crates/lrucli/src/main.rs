//! lru - line-oriented shell over an in-memory LRU cache

mod handler;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lrucache::{CacheConfig, LruCache};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::handler::CommandHandler;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of entries, must be > 0)
    #[arg(short, long, default_value_t = 128, allow_hyphen_values = true)]
    capacity: i64,

    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Validate the cache settings before any input is read
fn cache_config(args: &Args) -> Result<CacheConfig> {
    CacheConfig::new(args.capacity).context("invalid --capacity")
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so replies on stdout stay machine-readable
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let config = cache_config(&args)?;
    info!("Cache capacity: {}", config.capacity.get());

    let reader: Box<dyn BufRead> = match &args.script {
        Some(path) => {
            info!("Reading commands from {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let mut handler = CommandHandler::new(LruCache::with_config(config));
    let mut out = io::stdout().lock();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", lineno + 1))?;
        if let Some(reply) = handler.handle(&line) {
            debug!(line = lineno + 1, command = %line, "handled command");
            writeln!(out, "{}", reply)?;
        }
    }

    out.flush()?;
    Ok(())
}
