//! Block padding
//!
//! Layout of a padded block of `bits / 8` bytes:
//!
//! ```text
//! 00 02 | 8..15 random bytes in 1..=254 | 00 | record | filler in 0..=254
//! ```
//!
//! The filler goes after the record rather than before the separator, which
//! is where this differs from PKCS#1 type 2 padding.

use rand::Rng;

use crate::error::{FormatError, KeyResult, SizeError};

const HEADER: [u8; 2] = [0x00, 0x02];
const SEPARATOR: u8 = 0x00;

/// Wrap a packed record into a block of exactly `block_len` bytes.
pub fn pad_record<R: Rng>(
    record: &[u8],
    block_len: usize,
    rng: &mut R,
) -> KeyResult<Vec<u8>> {
    let run_len: usize = rng.gen_range(8..16);

    let mut block = Vec::with_capacity(block_len);
    block.extend_from_slice(&HEADER);
    block.extend((0..run_len).map(|_| rng.gen_range(1..=254u8)));
    block.push(SEPARATOR);
    block.extend_from_slice(record);

    if block.len() > block_len {
        return Err(SizeError::ContentTooLarge {
            size: block.len(),
            capacity: block_len,
        }
        .into());
    }

    let filler = block_len - block.len();
    block.extend((0..filler).map(|_| rng.gen_range(0..=254u8)));

    tracing::trace!(run_len, record_len = record.len(), filler, "padded record");
    Ok(block)
}

/// Return the part of a decoded block that follows the padding separator.
///
/// The first byte is skipped without being checked, since the leading
/// `0x00` of the header does not survive the trip through an integer.
pub fn unpad_record(block: &[u8]) -> KeyResult<&[u8]> {
    let separator = block
        .iter()
        .skip(1)
        .position(|&b| b == SEPARATOR)
        .ok_or(FormatError::MissingSeparator)?;
    Ok(&block[separator + 2..])
}
