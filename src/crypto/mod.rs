//! Cryptographic operations module

pub mod encoding;
pub mod powmod;

pub use encoding::{decode_serial, encode_serial, filter_serial};
pub use powmod::mod_pow;

use num_bigint::BigUint;
use num_traits::Zero;

/// Convert big-endian bytes to BigUint. An empty slice is zero.
pub fn bytes_to_bigint_be(data: &[u8]) -> BigUint {
    BigUint::from_bytes_be(data)
}

/// Convert BigUint to big-endian bytes without any leading zeros.
///
/// Zero becomes an empty buffer, and leading zero bytes of whatever buffer
/// produced `n` are not restored. Deployed serials depend on this, so the
/// conversion must not pad to the key length.
pub fn bigint_to_bytes_be(n: &BigUint) -> Vec<u8> {
    if n.is_zero() {
        return Vec::new();
    }
    n.to_bytes_be()
}
