//! Provenance manifest parsing
//!
//! `provenance.toml` in the rebuild source directory assigns per-file
//! provenance explicitly instead of relying on the "Feral" file-name
//! rule:
//!
//! ```toml
//! [tracks]
//! "Rome_Battle_1.opus" = "original"
//! "Feral_Menu_2.opus" = "remaster"
//! ```
//!
//! Files without an entry fall back to the file-name rule, so existing
//! extracted libraries rebuild unchanged without a manifest.

use anyhow::{Context, Result};
use serde::Deserialize;
use sndpack::Provenance;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// File name of the optional manifest inside the rebuild source directory.
pub const MANIFEST_FILE_NAME: &str = "provenance.toml";

/// Parsed provenance manifest. An absent manifest is an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct ProvenanceManifest {
    #[serde(default)]
    pub tracks: BTreeMap<String, ProvenanceEntry>,
}

/// Per-file provenance declaration
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvenanceEntry {
    Original,
    Remaster,
}

impl From<ProvenanceEntry> for Provenance {
    fn from(entry: ProvenanceEntry) -> Self {
        match entry {
            ProvenanceEntry::Original => Provenance::Original,
            ProvenanceEntry::Remaster => Provenance::Remaster,
        }
    }
}

impl ProvenanceManifest {
    /// Load `provenance.toml` from `dir` if present.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse manifest text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Provenance for `file_name`: the explicit entry, or the
    /// compatibility file-name rule when the manifest has none.
    pub fn provenance_for(&self, file_name: &str) -> Provenance {
        self.tracks
            .get(file_name)
            .copied()
            .map(Provenance::from)
            .unwrap_or_else(|| Provenance::from_file_name(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_parsing() {
        let manifest_toml = r#"
[tracks]
"track1.opus" = "original"
"bonus.opus" = "remaster"
"#;
        let manifest = ProvenanceManifest::parse(manifest_toml).unwrap();
        assert_eq!(manifest.tracks.len(), 2);
        assert_eq!(
            manifest.provenance_for("track1.opus"),
            Provenance::Original
        );
        assert_eq!(manifest.provenance_for("bonus.opus"), Provenance::Remaster);
    }

    #[test]
    fn test_manifest_empty() {
        let manifest = ProvenanceManifest::parse("").unwrap();
        assert!(manifest.tracks.is_empty());
    }

    #[test]
    fn test_manifest_rejects_unknown_provenance() {
        let manifest_toml = r#"
[tracks]
"track1.opus" = "bootleg"
"#;
        assert!(ProvenanceManifest::parse(manifest_toml).is_err());
    }

    #[test]
    fn test_fallback_to_file_name_rule() {
        let manifest = ProvenanceManifest::default();
        assert_eq!(
            manifest.provenance_for("track1.opus"),
            Provenance::Original
        );
        assert_eq!(
            manifest.provenance_for("Feral_track2.opus"),
            Provenance::Remaster
        );
    }

    #[test]
    fn test_manifest_overrides_file_name_rule() {
        let manifest_toml = r#"
[tracks]
"Feral_track2.opus" = "original"
"#;
        let manifest = ProvenanceManifest::parse(manifest_toml).unwrap();
        assert_eq!(
            manifest.provenance_for("Feral_track2.opus"),
            Provenance::Original
        );
    }
}
