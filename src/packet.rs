//! RTD frame decoding into structured packets.
//!
//! A frame is the byte run between the `0x16` and `0x17` markers, inclusive.
//! Inside it, the header is separated from the data payload by `0x02`, and
//! the payload from the trailing checksum by `0x04`:
//!
//! ```text
//! 0x16 <display id: 10> 0x01 <address: 10> <offset: 3> 0x02 <payload> 0x04 <checksum> 0x17
//! ```
//!
//! Decoding is a pure function of the frame bytes. The checksum bytes are
//! always located and carried on the packet; verifying them is opt-in via
//! [`DecodeOptions`] because real consoles emit traffic with checksums that
//! do not always validate.

use bytes::Bytes;

use crate::error::{Result, RtdError};

/// Begins a frame (SYN).
pub const FRAME_START: u8 = 0x16;
/// Ends a frame, inclusive (ETB).
pub const FRAME_END: u8 = 0x17;
/// Separates the display ID from the address within the header (SOH).
pub const HEADER_SEPARATOR: u8 = 0x01;
/// Separates the header from payload + checksum (STX).
pub const DATA_START: u8 = 0x02;
/// Separates the payload from the checksum bytes (EOT).
pub const DATA_END: u8 = 0x04;

// 0x16 + 10-char display ID + 0x01 + 10-char address + 3-digit offset.
const MIN_HEADER_LEN: usize = 25;

/// View of raw bytes as text, one char per byte (Latin-1).
///
/// Header fields and field slices must preserve every byte value 1:1, so no
/// multi-byte decoding is ever applied.
pub(crate) fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Options controlling frame decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Verify the trailing checksum bytes against the frame contents.
    ///
    /// Off by default: the protocol's correctness does not depend on it and
    /// some real traffic carries malformed checksums.
    pub verify_checksum: bool,
}

/// Header metadata of a decoded frame.
#[derive(Debug, Clone)]
pub struct Header {
    /// Raw header bytes, from the start marker up to (excluding) `0x02`.
    pub raw: Bytes,
    /// Display ID, 10 characters.
    pub display_id: String,
    /// Console address, 10 characters.
    pub address: String,
    /// 1-based item number at which this packet's payload begins.
    ///
    /// Translates global item numbers into payload-local indices: item `n`
    /// lives at payload index `n - offset - 1`.
    pub offset: usize,
}

/// Data payload of a decoded frame.
#[derive(Debug, Clone)]
pub struct Payload {
    /// Payload bytes between `0x02` and `0x04`.
    pub raw: Bytes,
    /// Checksum bytes following `0x04`, located but not verified by default.
    pub checksum: Bytes,
}

/// One decoded RTD frame.
///
/// Packets are transient: created per frame, applied to the schema tree, and
/// discarded. Cheap to clone (all byte storage is `Bytes`).
#[derive(Debug, Clone)]
pub struct Packet {
    /// The full frame, `0x16` through `0x17` inclusive.
    pub raw: Bytes,
    /// Header metadata.
    pub header: Header,
    /// Data payload.
    pub data: Payload,
}

impl Packet {
    /// Decode a frame with default options (checksum unverified).
    pub fn decode(frame: Bytes) -> Result<Self> {
        Self::decode_with(frame, &DecodeOptions::default())
    }

    /// Decode a frame into a packet.
    ///
    /// Returns [`RtdError::MalformedFrame`] when the data-start or data-end
    /// marker is missing or the header is shorter than its fixed layout; the
    /// driver drops such frames silently and the stream continues.
    pub fn decode_with(frame: Bytes, options: &DecodeOptions) -> Result<Self> {
        let data_start = frame
            .iter()
            .position(|&b| b == DATA_START)
            .ok_or(RtdError::malformed("no data-start marker"))?;

        let header_raw = frame.slice(..data_start);
        if header_raw.len() < MIN_HEADER_LEN {
            return Err(RtdError::malformed("header shorter than fixed layout"));
        }

        let display_id = latin1(&header_raw[1..11]);
        let address = latin1(&header_raw[12..22]);
        let offset = latin1(&header_raw[header_raw.len() - 3..])
            .parse()
            .map_err(|_| RtdError::malformed("offset is not a decimal number"))?;

        let body = data_start + 1;
        let data_end = body
            + frame[body..]
                .iter()
                .position(|&b| b == DATA_END)
                .ok_or(RtdError::malformed("no end-of-data marker"))?;

        let payload = frame.slice(body..data_end);

        // Checksum bytes run from after 0x04 to the frame-end marker.
        let checksum_end =
            if frame.last() == Some(&FRAME_END) { frame.len() - 1 } else { frame.len() };
        let checksum = frame.slice(data_end + 1..checksum_end.max(data_end + 1));

        if options.verify_checksum {
            let computed = frame_checksum(&frame[1..=data_end]);
            let expected = latin1(&checksum);
            if expected != computed {
                return Err(RtdError::ChecksumMismatch { expected, computed });
            }
        }

        Ok(Self {
            raw: frame,
            header: Header { raw: header_raw, display_id, address, offset },
            data: Payload { raw: payload, checksum },
        })
    }

    /// Slice the payload for a 1-based item window.
    ///
    /// Returns `None` when the window falls outside this packet's payload.
    /// That is the normal case for most fields on most packets: the console
    /// multiplexes different item windows across packets.
    pub fn item_slice(&self, item: usize, length: usize) -> Option<&[u8]> {
        let start = item.checked_sub(self.header.offset + 1)?;
        self.data.raw.get(start..start + length)
    }
}

/// Checksum over the covered frame region: low byte of the byte sum,
/// rendered as two uppercase ASCII hex characters.
///
/// The covered region is everything after the start marker through the
/// data-end marker, inclusive.
pub fn frame_checksum(covered: &[u8]) -> String {
    let sum = covered.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    format!("{sum:02X}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ADDRESS, DISPLAY_ID, build_frame};

    #[test]
    fn decodes_header_and_payload() {
        let frame = build_frame(0, b"00:30     ");
        let packet = Packet::decode(frame).unwrap();

        assert_eq!(packet.header.display_id, DISPLAY_ID);
        assert_eq!(packet.header.address, ADDRESS);
        assert_eq!(packet.header.offset, 0);
        assert_eq!(&packet.data.raw[..], b"00:30     ");
        assert_eq!(packet.data.checksum.len(), 2);
    }

    #[test]
    fn decodes_nonzero_offset() {
        let frame = build_frame(200, b"05:00   h");
        let packet = Packet::decode(frame).unwrap();
        assert_eq!(packet.header.offset, 200);
    }

    #[test]
    fn missing_data_start_is_malformed() {
        let mut v = vec![FRAME_START];
        v.extend_from_slice(b"just some header bytes");
        v.push(FRAME_END);

        let err = Packet::decode(Bytes::from(v)).unwrap_err();
        assert!(matches!(err, RtdError::MalformedFrame { .. }));
    }

    #[test]
    fn missing_data_end_is_malformed() {
        let mut v = vec![FRAME_START];
        v.extend_from_slice(b"0000000001");
        v.push(HEADER_SEPARATOR);
        v.extend_from_slice(b"0042100000");
        v.extend_from_slice(b"000");
        v.push(DATA_START);
        v.extend_from_slice(b"payload without end marker");
        v.push(FRAME_END);

        let err = Packet::decode(Bytes::from(v)).unwrap_err();
        assert!(matches!(err, RtdError::MalformedFrame { .. }));
    }

    #[test]
    fn short_header_is_malformed() {
        let mut v = vec![FRAME_START];
        v.extend_from_slice(b"short");
        v.push(DATA_START);
        v.extend_from_slice(b"data");
        v.push(DATA_END);
        v.push(FRAME_END);

        let err = Packet::decode(Bytes::from(v)).unwrap_err();
        assert!(matches!(err, RtdError::MalformedFrame { .. }));
    }

    #[test]
    fn checksum_unverified_by_default() {
        let frame = build_frame(0, b"data");
        // Corrupt the checksum bytes (second-to-last and third-to-last).
        let mut v = frame.to_vec();
        let n = v.len();
        v[n - 3] = b'!';
        v[n - 2] = b'!';

        assert!(Packet::decode(Bytes::from(v)).is_ok());
    }

    #[test]
    fn checksum_verification_opt_in() {
        let good = build_frame(0, b"data");
        let options = DecodeOptions { verify_checksum: true };
        assert!(Packet::decode_with(good.clone(), &options).is_ok());

        let mut v = good.to_vec();
        let n = v.len();
        v[n - 3] = b'!';
        v[n - 2] = b'!';
        let err = Packet::decode_with(Bytes::from(v), &options).unwrap_err();
        assert!(matches!(err, RtdError::ChecksumMismatch { .. }));
    }

    #[test]
    fn item_slice_respects_offset_window() {
        let frame = build_frame(200, b"05:00   ");
        let packet = Packet::decode(frame).unwrap();

        // Item 201 is payload index 0 under offset 200.
        assert_eq!(packet.item_slice(201, 5), Some(&b"05:00"[..]));
        // Item 200 precedes the window.
        assert_eq!(packet.item_slice(200, 1), None);
        // Window extends past the payload.
        assert_eq!(packet.item_slice(205, 8), None);
    }

    #[test]
    fn latin1_preserves_control_bytes() {
        let s = latin1(&[0x02, b'A', 0xFF]);
        assert_eq!(s.chars().collect::<Vec<_>>(), vec!['\u{2}', 'A', '\u{ff}']);
    }
}
