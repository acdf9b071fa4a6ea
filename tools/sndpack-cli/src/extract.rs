//! Extract command - unpack a container pair into individual Opus files.

use anyhow::{Context, Result};
use clap::Args;
use sndpack::{DAT_FILE_NAME, IDX_FILE_NAME, SoundPack};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Arguments for the extract command
#[derive(Args)]
pub struct ExtractArgs {
    /// Directory containing music.idx.feral and music.dat.feral
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory to write one file per track (created if absent)
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Execute the extract command
pub fn execute(args: ExtractArgs) -> Result<()> {
    let idx_path = args.input.join(IDX_FILE_NAME);
    let dat_path = args.input.join(DAT_FILE_NAME);

    let idx = fs::read(&idx_path)
        .with_context(|| format!("Failed to read index file: {}", idx_path.display()))?;
    let dat = fs::read(&dat_path)
        .with_context(|| format!("Failed to read data file: {}", dat_path.display()))?;

    // All-or-nothing: the whole pair must parse before anything is written.
    let pack = SoundPack::parse(&idx, &dat)
        .with_context(|| format!("Malformed container pair in {}", args.input.display()))?;

    println!(
        "Extracting {} tracks from {}",
        pack.track_count(),
        args.input.display()
    );

    fs::create_dir_all(&args.output).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            args.output.display()
        )
    })?;

    for track in &pack.tracks {
        let file_name = track.record.file_name();
        let out_path = args.output.join(&file_name);
        debug!(
            "{} ({} bytes, {} Hz, {} ch)",
            file_name, track.record.length, track.record.sample_rate, track.record.channels
        );
        fs::write(&out_path, &track.payload)
            .with_context(|| format!("Failed to write {}", out_path.display()))?;
    }

    println!(
        "Wrote {} files to {}",
        pack.track_count(),
        args.output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sndpack::{PackBuilder, Provenance};
    use tempfile::tempdir;

    fn opus_payload(sample_rate: u32, channels: u8, body: &[u8]) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&sndpack::PAYLOAD_SIGNATURE);
        payload.extend_from_slice(&[0u8; 12]);
        payload.push(1);
        payload.push(19);
        payload.extend_from_slice(b"OpusHead");
        payload.push(1);
        payload.push(channels);
        payload.extend_from_slice(&312u16.to_le_bytes());
        payload.extend_from_slice(&sample_rate.to_le_bytes());
        payload.extend_from_slice(body);
        payload
    }

    fn write_pair(dir: &std::path::Path, idx: &[u8], dat: &[u8]) {
        fs::write(dir.join(IDX_FILE_NAME), idx).unwrap();
        fs::write(dir.join(DAT_FILE_NAME), dat).unwrap();
    }

    #[test]
    fn test_extract_three_tracks() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let out_dir = output.path().join("extracted");

        let names = ["a.opus", "b.opus", "c.opus"];
        let mut builder = PackBuilder::new();
        for (i, name) in names.iter().enumerate() {
            builder
                .push(
                    name,
                    Provenance::Original,
                    opus_payload(48000, 2, format!("body {i}").as_bytes()),
                )
                .unwrap();
        }
        let pack = builder.finish();
        let (idx, dat) = pack.to_bytes();
        write_pair(input.path(), &idx, &dat);

        execute(ExtractArgs {
            input: input.path().to_path_buf(),
            output: out_dir.clone(),
        })
        .unwrap();

        let mut written: Vec<_> = fs::read_dir(&out_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        written.sort();
        assert_eq!(written, names);

        for (name, track) in names.iter().zip(&pack.tracks) {
            let bytes = fs::read(out_dir.join(name)).unwrap();
            assert_eq!(bytes, track.payload);
        }
    }

    #[test]
    fn test_extract_missing_signature_writes_nothing() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let out_dir = output.path().join("extracted");

        let mut builder = PackBuilder::new();
        builder
            .push(
                "a.opus",
                Provenance::Original,
                opus_payload(48000, 2, b"one"),
            )
            .unwrap();
        builder
            .push(
                "b.opus",
                Provenance::Original,
                opus_payload(48000, 2, b"two"),
            )
            .unwrap();
        let pack = builder.finish();
        let (idx, mut dat) = pack.to_bytes();
        dat[pack.tracks[1].record.data_offset as usize] = b'X';
        write_pair(input.path(), &idx, &dat);

        let result = execute(ExtractArgs {
            input: input.path().to_path_buf(),
            output: out_dir.clone(),
        });
        assert!(result.is_err());
        // Parsing failed, so not even the output directory exists.
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_extract_missing_input_files() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();

        let result = execute(ExtractArgs {
            input: input.path().to_path_buf(),
            output: output.path().to_path_buf(),
        });
        assert!(result.is_err());
    }
}
