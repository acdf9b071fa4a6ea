//! Error taxonomy for container parsing and rebuilding.

use thiserror::Error;

/// Errors produced while parsing or rebuilding a container pair.
///
/// There is no recovery path anywhere in the codec: every variant aborts
/// the enclosing operation before any output is produced.
#[derive(Debug, Error)]
pub enum PackError {
    /// File shorter than the 24-byte shared header.
    #[error("file too small for SND.PACK header ({len} bytes, need 24)")]
    TruncatedHeader { len: usize },

    #[error("bad magic bytes (expected \"SND.PACK\")")]
    BadMagic,

    /// Index ended inside a record's fixed fields.
    #[error("track {track}: index record truncated")]
    TruncatedRecord { track: usize },

    /// The bounded terminator scan ran out before `00 FF FF FF`.
    #[error("track {track}: no path terminator within {limit} bytes")]
    MissingTerminator { track: usize, limit: usize },

    #[error("{extra} trailing bytes after the last index record")]
    TrailingIndexBytes { extra: usize },

    /// The two headers of a pair disagree on the track count.
    #[error("track count mismatch: index header says {index}, data header says {data}")]
    CountMismatch { index: u32, data: u32 },

    /// Track paths double as extraction file names and must be unique.
    #[error("duplicate track path \"{path}\"")]
    DuplicatePath { path: String },

    /// Stored `data_offset` disagrees with the offset recomputed from the
    /// preceding lengths. Distinct from the malformed-container variants:
    /// the fields parsed fine, they just don't add up.
    #[error("track {track}: stored offset {stored} does not match computed offset {computed}")]
    OffsetMismatch {
        track: usize,
        stored: u64,
        computed: u64,
    },

    #[error("track {track}: payload [{offset}, {end}) exceeds data file ({data_len} bytes)")]
    PayloadOutOfBounds {
        track: usize,
        offset: u64,
        end: u64,
        data_len: usize,
    },

    /// Payload bytes at the stored offset do not open with the Ogg page
    /// signature.
    #[error("track {track}: payload does not start with the Ogg signature")]
    MissingSignature { track: usize },

    #[error("{extra} trailing bytes after the last payload")]
    TrailingDataBytes { extra: usize },

    /// Source file too short to read the OpusHead fields a rebuild needs.
    #[error("payload too short to probe the Opus header ({len} bytes, need 44)")]
    PayloadTooShort { len: usize },
}
