//! Protocol codec
//!
//! Encoding and decoding functions for the datagram protocol.
//!
//! ## Wire Format
//!
//! Every datagram holds exactly one frame:
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────┬─────────────────────────────┐
//! │ Magic (4)│ Kind (1) │ Len (4)  │ CRC (4)  │      Body (Len bytes)       │
//! └──────────┴──────────┴──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! - Magic: `PDB1`
//! - Kind: `0x01` request, `0x02` response
//! - Len / CRC: big-endian, CRC32 over the body
//! - Body: bincode (fixed-width integers) of `Request` / `Response`
//!
//! An encoded frame never exceeds [`MAX_SEND_SIZE`] and a received one is
//! rejected above [`MAX_DATAGRAM_SIZE`]; there is no fragmentation.

use bincode::Options;
use bytes::{Buf, BufMut, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Request, Response};
use crate::error::{DbError, Result};

/// Magic bytes identifying a PersonDB frame
pub const MAGIC: &[u8; 4] = b"PDB1";

/// Header size: Magic (4) + Kind (1) + Len (4) + CRC (4) = 13 bytes
pub const HEADER_SIZE: usize = 13;

/// Largest datagram either side will accept (64 KiB receive buffer)
pub const MAX_DATAGRAM_SIZE: usize = 64 * 1024;

/// Largest frame either side will send: the IPv4 UDP payload limit
/// (65535 - 8 byte UDP header - 20 byte IP header)
pub const MAX_SEND_SIZE: usize = 65_507;

/// Frame kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum FrameKind {
    Request = 0x01,
    Response = 0x02,
}

fn body_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_DATAGRAM_SIZE as u64)
        .reject_trailing_bytes()
}

// =============================================================================
// Request / Response
// =============================================================================

/// Encode a request into a single datagram
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    encode_frame(FrameKind::Request, request)
}

/// Decode a request from a received datagram
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    decode_frame(FrameKind::Request, bytes)
}

/// Encode a response into a single datagram
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    encode_frame(FrameKind::Response, response)
}

/// Decode a response from a received datagram
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    decode_frame(FrameKind::Response, bytes)
}

// =============================================================================
// Frame helpers
// =============================================================================

fn encode_frame<T: Serialize>(kind: FrameKind, value: &T) -> Result<Vec<u8>> {
    let body = body_options().serialize(value).map_err(|e| match *e {
        bincode::ErrorKind::SizeLimit => DbError::Protocol(format!(
            "Message does not fit in a datagram (max {} bytes)",
            MAX_DATAGRAM_SIZE
        )),
        other => DbError::Serialization(other.to_string()),
    })?;

    let total_len = HEADER_SIZE + body.len();
    if total_len > MAX_SEND_SIZE {
        return Err(DbError::Protocol(format!(
            "Message does not fit in a datagram: {} bytes (max {})",
            total_len, MAX_SEND_SIZE
        )));
    }

    let mut frame = BytesMut::with_capacity(total_len);
    frame.put_slice(MAGIC);
    frame.put_u8(kind as u8);
    frame.put_u32(body.len() as u32);
    frame.put_u32(crc32fast::hash(&body));
    frame.put_slice(&body);

    Ok(frame.to_vec())
}

fn decode_frame<T: DeserializeOwned>(expected: FrameKind, bytes: &[u8]) -> Result<T> {
    if bytes.len() < HEADER_SIZE {
        return Err(DbError::Protocol(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }
    if bytes.len() > MAX_DATAGRAM_SIZE {
        return Err(DbError::Protocol(format!(
            "Datagram too large: {} bytes (max {})",
            bytes.len(),
            MAX_DATAGRAM_SIZE
        )));
    }

    let mut header = &bytes[..HEADER_SIZE];
    if &header[..4] != MAGIC {
        return Err(DbError::Protocol(format!(
            "Invalid magic: expected {:?}, got {:?}",
            MAGIC,
            &header[..4]
        )));
    }
    header.advance(4);

    let kind = header.get_u8();
    if kind != expected as u8 {
        return Err(DbError::Protocol(format!(
            "Unexpected frame kind: 0x{:02x} (expected 0x{:02x})",
            kind, expected as u8
        )));
    }

    let body_len = header.get_u32() as usize;
    let expected_crc = header.get_u32();

    let body = &bytes[HEADER_SIZE..];
    if body.len() != body_len {
        return Err(DbError::Protocol(format!(
            "Length mismatch: header says {} bytes, got {}",
            body_len,
            body.len()
        )));
    }

    let actual_crc = crc32fast::hash(body);
    if actual_crc != expected_crc {
        return Err(DbError::Protocol(format!(
            "Checksum mismatch: expected {:08x}, got {:08x}",
            expected_crc, actual_crc
        )));
    }

    body_options()
        .deserialize(body)
        .map_err(|e| DbError::Protocol(format!("Malformed body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CommandType;

    #[test]
    fn test_header_layout() {
        let bytes = encode_request(&Request::new(CommandType::Info)).unwrap();
        assert_eq!(&bytes[..4], MAGIC);
        assert_eq!(bytes[4], 0x01);
        let body_len = u32::from_be_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]) as usize;
        assert_eq!(bytes.len(), HEADER_SIZE + body_len);
    }

    #[test]
    fn test_request_frame_is_not_a_response() {
        let bytes = encode_request(&Request::new(CommandType::Show)).unwrap();
        assert!(matches!(decode_response(&bytes), Err(DbError::Protocol(_))));
    }
}
