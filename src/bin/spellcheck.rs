//! Interactive spellchecker.
//!
//! Reads commands from stdin, one per line, and writes one reply per line
//! to stdout. See `typo_table::session` for the protocol.

use clap::Parser;
use std::io;
use tracing::info;
use typo_table::{Session, Spellchecker, DEFAULT_CAPACITY};

/// Spellchecker command line arguments.
#[derive(Parser, Debug)]
#[command(name = "spellcheck")]
#[command(about = "Register words and look up their single-edit misspellings")]
struct Args {
    /// Number of hash buckets
    #[arg(short, long, default_value_t = DEFAULT_CAPACITY, value_parser = parse_capacity)]
    capacity: usize,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_capacity(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("capacity must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!(capacity = args.capacity, "starting spellcheck session");

    let session = Session::new(Spellchecker::with_capacity(args.capacity));
    let summary = session.run(io::stdin().lock(), io::stdout().lock())?;

    info!(
        commands = summary.commands,
        released = summary.released,
        "session finished"
    );
    Ok(())
}
