//! Codec for the SND.PACK paired music container.
//!
//! The remastered edition stores its music library as two co-located files:
//! `music.idx.feral` (per-track metadata) and `music.dat.feral`
//! (concatenated Ogg Opus payloads). Both files open with the same 24-byte
//! header. This crate models the byte-level grammar of that pair and
//! implements both directions over it:
//!
//! - [`SoundPack::parse`] — container pair → header + ordered track list,
//!   each track carrying its parsed metadata and exact payload bytes.
//! - [`PackBuilder`] / [`SoundPack::to_bytes`] — payload files →
//!   reconstructed, internally consistent pair.
//!
//! The whole container is held in memory; there is no streaming path.
//! Unknown header and record fields (`flags`, `reserved2`, `meta`) are
//! carried verbatim and never interpreted.
//!
//! # Modules
//!
//! - [`format`] - header, track record, delimiter constants
//! - [`container`] - [`SoundPack`] model, parse/serialize, [`PackBuilder`]
//! - [`probe`] - sample rate / channel count from an embedded OpusHead
//! - [`error`] - [`PackError`] taxonomy

pub mod container;
pub mod error;
pub mod format;
pub mod probe;

pub use container::{PackBuilder, SoundPack, Track};
pub use error::PackError;
pub use format::{
    DAT_FILE_NAME, IDX_FILE_NAME, MAX_PATH_LEN, PACK_MAGIC, PATH_TERMINATOR, PAYLOAD_SIGNATURE,
    PackHeader, Provenance, TRACK_PATH_PREFIX, TrackRecord,
};
pub use probe::{StreamInfo, probe_payload};
