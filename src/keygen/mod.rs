//! Serial number generation and parsing

pub mod padding;
pub mod record;
pub mod validation;

pub use padding::{pad_record, unpad_record};
pub use record::{pack_record, unpack_record};
pub use validation::validate_license;

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::Rng;

use crate::crypto::{bigint_to_bytes_be, bytes_to_bigint_be, decode_serial, encode_serial, mod_pow};
use crate::error::{KeyError, KeyResult, SizeError};
use crate::types::{KeyConfig, License, CURRENT_VERSION, DEFAULT_PUBLIC_EXPONENT};

/// How far the decoded serial length may drift from `bits / 8`.
///
/// The signed value loses its leading zero bytes when it is turned back into
/// bytes, so short serials are normal.
pub const LENGTH_TOLERANCE: usize = 6;

/// Generate a serial number for `license`, signed with the private key in `config`.
pub fn generate(license: &License, config: &KeyConfig) -> KeyResult<String> {
    generate_with_rng(license, config, &mut rand::thread_rng())
}

/// Same as [`generate`], drawing padding bytes from `rng`.
pub fn generate_with_rng<R: Rng>(
    license: &License,
    config: &KeyConfig,
    rng: &mut R,
) -> KeyResult<String> {
    // the product code always comes from the key, never from the caller
    let license = License {
        product_code: Some(config.product_code().to_vec()),
        version: license.version.or(Some(CURRENT_VERSION)),
        ..license.clone()
    };

    let record = pack_record(&license)?;
    let block = pad_record(&record, config.byte_len(), rng)?;

    let signed = mod_pow(
        &bytes_to_bigint_be(&block),
        &bytes_to_bigint_be(config.private()),
        &bytes_to_bigint_be(config.modulus()),
    )?;
    let serial = bigint_to_bytes_be(&signed);

    tracing::debug!(
        bits = config.bits(),
        record_len = record.len(),
        serial_len = serial.len(),
        "generated serial"
    );
    Ok(encode_serial(&serial))
}

/// Decode and verify a serial number.
///
/// `public`, `modulus` and `product_code` are base64, as exported by the
/// protection tool. The serial itself is untrusted and may carry whitespace
/// or other decoration around the base64 text.
pub fn parse(
    serial: &str,
    public: &str,
    modulus: &str,
    product_code: &str,
    bits: usize,
) -> KeyResult<License> {
    let public = decode_field("public exponent", public)?;
    let modulus = decode_field("modulus", modulus)?;
    let product_code = decode_field("product code", product_code)?;
    parse_raw(serial, &public, &modulus, &product_code, bits)
}

/// Parse a serial against a loaded key configuration.
///
/// `public` is the base64 public exponent. Without one, the exponent from the
/// key export is used, or 65537 if the export has none. The modulus, product
/// code and key size come from `config`.
pub fn parse_with_config(
    serial: &str,
    public: Option<&str>,
    config: &KeyConfig,
) -> KeyResult<License> {
    let public = match (public, config.public()) {
        (Some(text), _) => decode_field("public exponent", text)?,
        (None, Some(exported)) => exported.to_vec(),
        (None, None) => decode_field("public exponent", DEFAULT_PUBLIC_EXPONENT)?,
    };
    parse_raw(
        serial,
        &public,
        config.modulus(),
        config.product_code(),
        config.bits(),
    )
}

fn parse_raw(
    serial: &str,
    public: &[u8],
    modulus: &[u8],
    product_code: &[u8],
    bits: usize,
) -> KeyResult<License> {
    let expected = bits / 8;
    let signed = decode_serial(serial)?;
    if signed.len() + LENGTH_TOLERANCE < expected || signed.len() > expected + LENGTH_TOLERANCE {
        return Err(SizeError::SerialLength {
            actual: signed.len(),
            expected,
            tolerance: LENGTH_TOLERANCE,
        }
        .into());
    }

    let block = mod_pow(
        &bytes_to_bigint_be(&signed),
        &bytes_to_bigint_be(public),
        &bytes_to_bigint_be(modulus),
    )?;
    let block = bigint_to_bytes_be(&block);
    tracing::trace!(serial_len = signed.len(), block_len = block.len(), "verified serial");

    let license = unpack_record(unpad_record(&block)?)?;
    validate_license(&license, product_code)?;

    tracing::debug!(bits, "parsed serial");
    Ok(license)
}

fn decode_field(field: &'static str, value: &str) -> KeyResult<Vec<u8>> {
    STANDARD
        .decode(value.trim())
        .map_err(|e| KeyError::encoding(field, e))
}
