//! In-memory model of a container pair and the two transformations over it.
//!
//! A pair is read once into memory, parsed into a [`SoundPack`], and either
//! exported track-by-track or re-serialized with [`SoundPack::to_bytes`].
//! [`PackBuilder`] goes the other way: it assembles a pack from loose
//! payload files, owning the offset bookkeeping and metadata derivation.

use std::collections::HashSet;

use crate::error::PackError;
use crate::format::{PAYLOAD_SIGNATURE, PackHeader, Provenance, TRACK_PATH_PREFIX, TrackRecord};
use crate::probe::probe_payload;

/// One track: its index record plus its payload bytes, signature included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub record: TrackRecord,
    pub payload: Vec<u8>,
}

/// A fully parsed container pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundPack {
    pub header: PackHeader,
    pub tracks: Vec<Track>,
}

impl SoundPack {
    /// Parse a container pair from the full contents of the index and data
    /// files.
    ///
    /// Payload slicing is driven by the stored `data_offset`/`length`
    /// fields rather than by scanning for the Ogg signature; the signature
    /// at each payload start and the cumulative offsets are then verified
    /// explicitly, so positional luck never stands in for consistency.
    pub fn parse(idx: &[u8], dat: &[u8]) -> Result<Self, PackError> {
        let header = PackHeader::from_bytes(idx)?;
        let dat_header = PackHeader::from_bytes(dat)?;
        if dat_header.track_count != header.track_count {
            return Err(PackError::CountMismatch {
                index: header.track_count,
                data: dat_header.track_count,
            });
        }

        // Index records, sequentially. No terminator separates the header
        // from the first record's fixed fields. Capacity comes from the
        // buffer, not the header, which is untrusted at this point.
        let mut records = Vec::with_capacity(idx.len() / 32);
        let mut cursor = PackHeader::SIZE;
        for track in 0..header.track_count as usize {
            let (record, consumed) = TrackRecord::parse(&idx[cursor..], track)?;
            cursor += consumed;
            records.push(record);
        }
        if cursor != idx.len() {
            return Err(PackError::TrailingIndexBytes {
                extra: idx.len() - cursor,
            });
        }

        // Paths double as extraction file names and must be unique.
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.path.clone()) {
                return Err(PackError::DuplicatePath {
                    path: record.path_str(),
                });
            }
        }

        // Payloads sliced by stored offset/length, with stored offsets
        // checked against the running total.
        let mut tracks = Vec::with_capacity(records.len());
        let mut computed = PackHeader::SIZE as u64;
        for (track, record) in records.into_iter().enumerate() {
            if u64::from(record.data_offset) != computed {
                return Err(PackError::OffsetMismatch {
                    track,
                    stored: u64::from(record.data_offset),
                    computed,
                });
            }
            let end = computed + u64::from(record.length);
            if end > dat.len() as u64 {
                return Err(PackError::PayloadOutOfBounds {
                    track,
                    offset: computed,
                    end,
                    data_len: dat.len(),
                });
            }
            let payload = &dat[computed as usize..end as usize];
            if !payload.starts_with(&PAYLOAD_SIGNATURE) {
                return Err(PackError::MissingSignature { track });
            }
            computed = end;
            tracks.push(Track {
                record,
                payload: payload.to_vec(),
            });
        }
        if computed != dat.len() as u64 {
            return Err(PackError::TrailingDataBytes {
                extra: dat.len() - computed as usize,
            });
        }

        Ok(Self { header, tracks })
    }

    /// Re-serialize into an (index, data) buffer pair.
    ///
    /// The header is written verbatim into both buffers and the opaque
    /// fields pass through untouched, so `parse` followed by `to_bytes`
    /// reproduces a well-formed pair byte for byte.
    pub fn to_bytes(&self) -> (Vec<u8>, Vec<u8>) {
        let header = self.header.to_bytes();

        let idx_len = PackHeader::SIZE
            + self
                .tracks
                .iter()
                .map(|t| t.record.encoded_len())
                .sum::<usize>();
        let dat_len =
            PackHeader::SIZE + self.tracks.iter().map(|t| t.payload.len()).sum::<usize>();

        let mut idx = Vec::with_capacity(idx_len);
        let mut dat = Vec::with_capacity(dat_len);
        idx.extend_from_slice(&header);
        dat.extend_from_slice(&header);

        for track in &self.tracks {
            track.record.write_to(&mut idx);
            dat.extend_from_slice(&track.payload);
        }

        (idx, dat)
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}

/// Assembles a container pair from individual payload files.
///
/// Payloads are pushed in the order they should appear in the container;
/// the builder tracks the next data offset and derives sample rate and
/// channel count from each payload's embedded OpusHead.
#[derive(Debug)]
pub struct PackBuilder {
    tracks: Vec<Track>,
    next_offset: u64,
}

impl PackBuilder {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            next_offset: PackHeader::SIZE as u64,
        }
    }

    /// Append one track. `file_name` becomes the base name of the stored
    /// virtual path.
    pub fn push(
        &mut self,
        file_name: &str,
        provenance: Provenance,
        payload: Vec<u8>,
    ) -> Result<(), PackError> {
        let info = probe_payload(&payload)?;
        let path = format!("{TRACK_PATH_PREFIX}{file_name}");

        let record = TrackRecord {
            data_offset: self.next_offset as u32,
            length: payload.len() as u32,
            sample_rate: info.sample_rate,
            meta: provenance.meta(),
            channels: info.channels,
            origin: provenance.origin(),
            path: path.into_bytes(),
        };

        self.next_offset += payload.len() as u64;
        self.tracks.push(Track { record, payload });
        Ok(())
    }

    /// Finish with a synthesized header counting the pushed tracks.
    pub fn finish(self) -> SoundPack {
        SoundPack {
            header: PackHeader::new(self.tracks.len() as u32),
            tracks: self.tracks,
        }
    }
}

impl Default for PackBuilder {
    fn default() -> Self {
        Self::new()
    }
}
