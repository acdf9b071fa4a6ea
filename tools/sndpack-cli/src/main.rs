//! sndpack - extract and rebuild SND.PACK music containers
//!
//! # Commands
//!
//! - `sndpack extract --input <dir> --output <dir>` - unpack
//!   `music.idx.feral` / `music.dat.feral` into one Opus file per track
//! - `sndpack rebuild --input <dir> --output <dir>` - rebuild the container
//!   pair from a directory of Opus payload files
//!
//! # Provenance
//!
//! On rebuild, per-track provenance comes from an optional
//! `provenance.toml` next to the payloads:
//!
//! ```toml
//! [tracks]
//! "Rome_Battle_1.opus" = "original"
//! "Feral_Menu_2.opus" = "remaster"
//! ```
//!
//! Files the manifest does not name fall back to the compatibility rule:
//! a file name containing "Feral" is tagged as a remaster-only track.

mod extract;
mod manifest;
mod rebuild;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Codec for SND.PACK music containers (music.idx.feral / music.dat.feral)
#[derive(Parser)]
#[command(name = "sndpack")]
#[command(about = "Extract and rebuild SND.PACK music containers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every track from a container pair into a directory
    Extract(extract::ExtractArgs),

    /// Rebuild a container pair from a directory of Opus payloads
    Rebuild(rebuild::RebuildArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract(args) => extract::execute(args),
        Commands::Rebuild(args) => rebuild::execute(args),
    }
}
