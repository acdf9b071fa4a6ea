//! Rebuild command - reconstruct a container pair from loose payloads.

use anyhow::{Context, Result, bail};
use clap::Args;
use sndpack::{DAT_FILE_NAME, IDX_FILE_NAME, PackBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::manifest::{MANIFEST_FILE_NAME, ProvenanceManifest};

/// Arguments for the rebuild command
#[derive(Args)]
pub struct RebuildArgs {
    /// Directory of Opus payload files (one per track)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory to write music.idx.feral and music.dat.feral (created if
    /// absent)
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Execute the rebuild command
pub fn execute(args: RebuildArgs) -> Result<()> {
    let manifest = ProvenanceManifest::load(&args.input)?;
    let files = list_payload_files(&args.input)?;
    if files.is_empty() {
        bail!("No payload files in {}", args.input.display());
    }

    println!(
        "Rebuilding container from {} files in {}",
        files.len(),
        args.input.display()
    );

    let mut builder = PackBuilder::new();
    for file_name in &files {
        let path = args.input.join(file_name);
        let payload = fs::read(&path)
            .with_context(|| format!("Failed to read payload: {}", path.display()))?;
        let provenance = manifest.provenance_for(file_name);
        debug!("{} ({} bytes, {:?})", file_name, payload.len(), provenance);
        builder
            .push(file_name, provenance, payload)
            .with_context(|| format!("Bad payload: {}", path.display()))?;
    }

    let (idx, dat) = builder.finish().to_bytes();

    fs::create_dir_all(&args.output).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            args.output.display()
        )
    })?;
    let idx_path = args.output.join(IDX_FILE_NAME);
    let dat_path = args.output.join(DAT_FILE_NAME);
    fs::write(&idx_path, &idx)
        .with_context(|| format!("Failed to write {}", idx_path.display()))?;
    fs::write(&dat_path, &dat)
        .with_context(|| format!("Failed to write {}", dat_path.display()))?;

    println!("Created: {} ({} bytes)", idx_path.display(), idx.len());
    println!("Created: {} ({} bytes)", dat_path.display(), dat.len());

    Ok(())
}

/// Payload file names in `dir`, sorted so the track order is deterministic
/// across filesystems. The provenance manifest itself is not a payload.
fn list_payload_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory: {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == MANIFEST_FILE_NAME {
            continue;
        }
        files.push(name);
    }
    files.sort();
    Ok(files)
}
