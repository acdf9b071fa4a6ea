//! Byte-level grammar of the SND.PACK container pair.
//!
//! Both files of a pair open with the same 24-byte header. The index file
//! then carries one variable-length track record per payload; the data
//! file carries the payloads themselves, each opening with a fixed Ogg
//! page signature. All integers are exact-width little-endian.
//!
//! # Header layout (both files)
//! ```text
//! 0x00: magic       "SND.PACK" (8 bytes)
//! 0x08: flags       u32 LE (opaque, preserved verbatim)
//! 0x0C: track_count u32 LE
//! 0x10: reserved2   8 bytes (opaque, preserved verbatim)
//! ```
//!
//! # Track record layout (index file)
//! ```text
//! 0x00: data_offset u32 LE (payload offset in the data file)
//! 0x04: length      u32 LE (payload byte count, signature included)
//! 0x08: sample_rate u32 LE (Hz)
//! 0x0C: meta        4 bytes (opaque, provenance-dependent)
//! 0x10: channels    u32 LE
//! 0x14: origin      u32 LE (0x0D original, 0x01 remaster)
//! 0x18: path        raw ASCII, no length prefix
//!  ...: terminator  00 FF FF FF
//! ```

use crate::error::PackError;

/// Container magic, shared by index and data files.
pub const PACK_MAGIC: &[u8; 8] = b"SND.PACK";

/// `flags` value written by the original packer. Meaning unknown.
pub const PACK_FLAGS: u32 = 4;

/// `reserved2` bytes written by the original packer. Meaning unknown,
/// carried verbatim.
pub const PACK_RESERVED2: [u8; 8] = [0x18, 0x00, 0x00, 0x00, 0x71, 0xFF, 0x23, 0x04];

/// Ogg page signature opening every payload: "OggS", stream structure
/// version 0, header type 2 (beginning of stream), zero granule position.
pub const PAYLOAD_SIGNATURE: [u8; 14] = [
    b'O', b'g', b'g', b'S', 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Sentinel closing every track record's path field.
pub const PATH_TERMINATOR: [u8; 4] = [0x00, 0xFF, 0xFF, 0xFF];

/// Bound on the terminator scan. Paths in shipped containers are well
/// under this; anything longer means a corrupt index.
pub const MAX_PATH_LEN: usize = 256;

/// Virtual path prefix stored for rebuilt tracks.
pub const TRACK_PATH_PREFIX: &str = "data/sounds/music/";

/// Index file name of a container pair.
pub const IDX_FILE_NAME: &str = "music.idx.feral";

/// Data file name of a container pair.
pub const DAT_FILE_NAME: &str = "music.dat.feral";

/// 24-byte header shared by both files of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackHeader {
    /// Opaque, preserved verbatim.
    pub flags: u32,
    pub track_count: u32,
    /// Opaque, preserved verbatim.
    pub reserved2: [u8; 8],
}

impl PackHeader {
    pub const SIZE: usize = 24;

    /// Header the original packer writes for `track_count` tracks.
    pub fn new(track_count: u32) -> Self {
        Self {
            flags: PACK_FLAGS,
            track_count,
            reserved2: PACK_RESERVED2,
        }
    }

    /// Write header to bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..8].copy_from_slice(PACK_MAGIC);
        bytes[8..12].copy_from_slice(&self.flags.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.track_count.to_le_bytes());
        bytes[16..24].copy_from_slice(&self.reserved2);
        bytes
    }

    /// Read header from the start of a file buffer, checking the magic.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PackError> {
        if bytes.len() < Self::SIZE {
            return Err(PackError::TruncatedHeader { len: bytes.len() });
        }
        if &bytes[0..8] != PACK_MAGIC {
            return Err(PackError::BadMagic);
        }
        let mut reserved2 = [0u8; 8];
        reserved2.copy_from_slice(&bytes[16..24]);
        Ok(Self {
            flags: read_u32_le(bytes, 8),
            track_count: read_u32_le(bytes, 12),
            reserved2,
        })
    }
}

/// Provenance tag distinguishing the base game's tracks from the
/// remaster-only additions. Stored in a record's `origin` field; each
/// value comes with a fixed `meta` word of unknown meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Base-game track (`origin` = 0x0D).
    Original,
    /// Remaster-only track (`origin` = 0x01).
    Remaster,
}

impl Provenance {
    /// `origin` value stored for this provenance.
    pub const fn origin(self) -> u32 {
        match self {
            Provenance::Original => 0x0D,
            Provenance::Remaster => 0x01,
        }
    }

    /// `meta` word observed alongside each origin value.
    pub const fn meta(self) -> [u8; 4] {
        match self {
            Provenance::Original => [0x00, 0x00, 0x00, 0x00],
            Provenance::Remaster => [0x08, 0x00, 0x00, 0x00],
        }
    }

    /// Map a stored `origin` value back, if it is one of the two known
    /// values.
    pub const fn from_origin(origin: u32) -> Option<Self> {
        match origin {
            0x0D => Some(Provenance::Original),
            0x01 => Some(Provenance::Remaster),
            _ => None,
        }
    }

    /// Compatibility default used when no manifest entry names the file:
    /// remaster-only tracks carry "Feral" in their file name.
    pub fn from_file_name(name: &str) -> Self {
        if name.contains("Feral") {
            Provenance::Remaster
        } else {
            Provenance::Original
        }
    }
}

/// One index-file entry: 24 fixed bytes, then the path and terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// Byte offset of the payload within the data file.
    pub data_offset: u32,
    /// Payload byte count, signature included.
    pub length: u32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Opaque provenance-dependent word, preserved verbatim.
    pub meta: [u8; 4],
    pub channels: u32,
    pub origin: u32,
    /// Raw path bytes as stored (ASCII, forward slashes).
    pub path: Vec<u8>,
}

impl TrackRecord {
    /// Size of the fixed-width fields before the path.
    pub const FIXED_SIZE: usize = 24;

    /// Parse one record starting at `bytes`. Returns the record and the
    /// number of bytes consumed (fixed fields + path + terminator).
    ///
    /// The path has no length prefix; its extent is found by scanning
    /// forward for [`PATH_TERMINATOR`], bounded by [`MAX_PATH_LEN`].
    pub fn parse(bytes: &[u8], track: usize) -> Result<(Self, usize), PackError> {
        if bytes.len() < Self::FIXED_SIZE {
            return Err(PackError::TruncatedRecord { track });
        }
        let mut meta = [0u8; 4];
        meta.copy_from_slice(&bytes[12..16]);

        let rest = &bytes[Self::FIXED_SIZE..];
        let path_len = find_terminator(rest).ok_or(PackError::MissingTerminator {
            track,
            limit: MAX_PATH_LEN,
        })?;

        let record = Self {
            data_offset: read_u32_le(bytes, 0),
            length: read_u32_le(bytes, 4),
            sample_rate: read_u32_le(bytes, 8),
            meta,
            channels: read_u32_le(bytes, 16),
            origin: read_u32_le(bytes, 20),
            path: rest[..path_len].to_vec(),
        };
        Ok((
            record,
            Self::FIXED_SIZE + path_len + PATH_TERMINATOR.len(),
        ))
    }

    /// Append the serialized record (fixed fields, path, terminator).
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.data_offset.to_le_bytes());
        out.extend_from_slice(&self.length.to_le_bytes());
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&self.meta);
        out.extend_from_slice(&self.channels.to_le_bytes());
        out.extend_from_slice(&self.origin.to_le_bytes());
        out.extend_from_slice(&self.path);
        out.extend_from_slice(&PATH_TERMINATOR);
    }

    /// Serialized size of this record.
    pub fn encoded_len(&self) -> usize {
        Self::FIXED_SIZE + self.path.len() + PATH_TERMINATOR.len()
    }

    /// Stored path decoded for presentation. The raw bytes in `path` stay
    /// authoritative for re-encoding.
    pub fn path_str(&self) -> String {
        String::from_utf8_lossy(&self.path).into_owned()
    }

    /// Base name of the stored path; directory components are dropped.
    /// Used as the extraction file name.
    pub fn file_name(&self) -> String {
        let start = self
            .path
            .iter()
            .rposition(|&b| b == b'/' || b == b'\\')
            .map_or(0, |i| i + 1);
        String::from_utf8_lossy(&self.path[start..]).into_owned()
    }

    /// Provenance for this record, if `origin` holds a known value.
    pub fn provenance(&self) -> Option<Provenance> {
        Provenance::from_origin(self.origin)
    }
}

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Position of the path terminator within `bytes`, scanning at most
/// `MAX_PATH_LEN` path bytes.
fn find_terminator(bytes: &[u8]) -> Option<usize> {
    let limit = bytes.len().min(MAX_PATH_LEN + PATH_TERMINATOR.len());
    bytes[..limit]
        .windows(PATH_TERMINATOR.len())
        .position(|w| w == PATH_TERMINATOR)
}
