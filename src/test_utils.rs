//! Shared fixtures for building well-formed RTD frames in tests and benches.

use bytes::Bytes;

use crate::packet::{
    DATA_END, DATA_START, FRAME_END, FRAME_START, HEADER_SEPARATOR, Packet, frame_checksum,
};

/// Display ID used by all fixtures.
pub const DISPLAY_ID: &str = "0000000001";
/// Console address used by all fixtures.
pub const ADDRESS: &str = "0042100000";

/// Build a complete frame with a valid checksum.
pub fn build_frame(offset: usize, payload: &[u8]) -> Bytes {
    let mut v = vec![FRAME_START];
    v.extend_from_slice(DISPLAY_ID.as_bytes());
    v.push(HEADER_SEPARATOR);
    v.extend_from_slice(ADDRESS.as_bytes());
    v.extend_from_slice(format!("{offset:03}").as_bytes());
    v.push(DATA_START);
    v.extend_from_slice(payload);
    v.push(DATA_END);
    let checksum = frame_checksum(&v[1..]);
    v.extend_from_slice(checksum.as_bytes());
    v.push(FRAME_END);
    Bytes::from(v)
}

/// Build and decode a packet in one step.
pub fn packet(offset: usize, payload: &[u8]) -> Packet {
    Packet::decode(build_frame(offset, payload)).expect("fixture frame must decode")
}
