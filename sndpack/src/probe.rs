//! Payload probing for rebuild.
//!
//! When a container is rebuilt from loose payload files, sample rate and
//! channel count are not supplied anywhere else; they are read out of the
//! OpusHead packet embedded in each payload's first Ogg page:
//!
//! ```text
//! 0x00: Ogg page header ("OggS", type 2, granule, serial, seq, crc, lacing)
//! 0x1C: "OpusHead"
//! 0x24: version u8
//! 0x25: channel count u8
//! 0x26: pre-skip u16 LE
//! 0x28: input sample rate u32 LE
//! ```
//!
//! The fixed offsets (37 for channels, 40 for sample rate) assume a
//! single-segment first page, which holds for every payload observed in
//! shipped containers. This is a documented assumption about the Opus
//! sub-format, not a guaranteed invariant across all Ogg variants.

use crate::error::PackError;

/// Offset of the OpusHead channel-count byte within a payload.
pub const CHANNELS_OFFSET: usize = 37;

/// Offset of the OpusHead input-sample-rate field within a payload.
pub const SAMPLE_RATE_OFFSET: usize = 40;

/// Minimum payload size needed to read both derived fields.
pub const PROBE_MIN_LEN: usize = SAMPLE_RATE_OFFSET + 4;

/// Stream parameters derived from an embedded OpusHead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub sample_rate: u32,
    pub channels: u32,
}

/// Read sample rate and channel count out of a payload's OpusHead.
pub fn probe_payload(payload: &[u8]) -> Result<StreamInfo, PackError> {
    if payload.len() < PROBE_MIN_LEN {
        return Err(PackError::PayloadTooShort { len: payload.len() });
    }

    let sample_rate = u32::from_le_bytes([
        payload[SAMPLE_RATE_OFFSET],
        payload[SAMPLE_RATE_OFFSET + 1],
        payload[SAMPLE_RATE_OFFSET + 2],
        payload[SAMPLE_RATE_OFFSET + 3],
    ]);

    // Channel count is a single byte; the next two bytes are pre-skip and
    // must not be folded in. Widened to u32 for the record field.
    let channels = u32::from(payload[CHANNELS_OFFSET]);

    Ok(StreamInfo {
        sample_rate,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PAYLOAD_SIGNATURE;

    fn opus_payload(sample_rate: u32, channels: u8) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&PAYLOAD_SIGNATURE);
        payload.extend_from_slice(&[0u8; 12]); // serial, sequence, crc
        payload.push(1); // one lacing segment
        payload.push(19); // segment length (OpusHead packet)
        payload.extend_from_slice(b"OpusHead");
        payload.push(1); // version
        payload.push(channels);
        payload.extend_from_slice(&312u16.to_le_bytes()); // pre-skip
        payload.extend_from_slice(&sample_rate.to_le_bytes());
        payload
    }

    #[test]
    fn test_probe_reads_opus_head() {
        let payload = opus_payload(48000, 2);
        let info = probe_payload(&payload).unwrap();
        assert_eq!(info.sample_rate, 48000);
        assert_eq!(info.channels, 2);
    }

    #[test]
    fn test_probe_channels_ignores_pre_skip() {
        // Pre-skip 312 sits right after the channel byte; a two-byte read
        // would yield 0x3802 instead of 2.
        let payload = opus_payload(44100, 2);
        assert_eq!(payload[CHANNELS_OFFSET + 1], 0x38);
        let info = probe_payload(&payload).unwrap();
        assert_eq!(info.channels, 2);
    }

    #[test]
    fn test_probe_too_short() {
        let result = probe_payload(&[0u8; PROBE_MIN_LEN - 1]);
        assert!(matches!(
            result,
            Err(PackError::PayloadTooShort { .. })
        ));
    }
}
