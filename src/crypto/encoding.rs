//! Serial number text encoding and decoding

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{KeyError, KeyResult};
use crate::types::SERIAL_ALPHABET;

/// Encode raw serial bytes as standard base64
pub fn encode_serial(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Strip everything that cannot be part of a serial, then base64 decode it
pub fn decode_serial(serial: &str) -> KeyResult<Vec<u8>> {
    let filtered = filter_serial(serial);
    STANDARD
        .decode(filtered.as_bytes())
        .map_err(|e| KeyError::encoding("serial number", e))
}

/// Keep only base64 alphabet characters.
///
/// Multi-byte UTF-8 sequences are skipped whole by their lead byte, without
/// decoding them.
pub fn filter_serial(serial: &str) -> String {
    let bytes = serial.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let ch = bytes[i];
        if ch.is_ascii() && SERIAL_ALPHABET.contains(&ch) {
            out.push(ch as char);
        }
        i += utf8_sequence_len(ch);
    }

    out
}

fn utf8_sequence_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7f => 1,
        // stray continuation byte
        0x80..=0xbf => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    }
}
