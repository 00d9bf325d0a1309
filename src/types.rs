//! Common types and constants

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::NaiveDate;

use crate::error::{ConfigError, KeyError, KeyResult};

/// Key sizes the serial format is defined for
pub const SUPPORTED_BITS: [usize; 6] = [128, 256, 512, 1024, 2048, 4096];

/// The only record version the parser accepts
pub const CURRENT_VERSION: u8 = 1;

/// Length of a decoded product code
pub const PRODUCT_CODE_LEN: usize = 8;

/// Public exponent 65537 as exported by the protection tool
pub const DEFAULT_PUBLIC_EXPONENT: &str = "AAEAAQ==";

/// Characters that may appear in a serial number
pub const SERIAL_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=";

/// Record tags
pub mod tag {
    pub const VERSION: u8 = 1;
    pub const NAME: u8 = 2;
    pub const EMAIL: u8 = 3;
    pub const HARDWARE_ID: u8 = 4;
    pub const EXPIRATION: u8 = 5;
    pub const RUNNING_TIME_LIMIT: u8 = 6;
    pub const PRODUCT_CODE: u8 = 7;
    pub const USER_DATA: u8 = 8;
    pub const MAX_BUILD: u8 = 9;
    pub const END: u8 = 255;
}

/// License attributes carried inside a serial number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct License {
    pub name: Option<String>,
    pub email: Option<String>,
    pub expiration: Option<NaiveDate>,
    /// Builds dated after this day are not covered by the license
    pub max_build: Option<NaiveDate>,
    pub hardware_id: Option<Vec<u8>>,
    /// Minutes the protected program may run per session
    pub running_time_limit: Option<u32>,
    pub user_data: Option<Vec<u8>>,
    pub product_code: Option<Vec<u8>>,
    pub version: Option<u8>,
}

/// Key material used to sign and verify serial numbers
#[derive(Clone, PartialEq, Eq)]
pub struct KeyConfig {
    algorithm: String,
    bits: usize,
    private: Vec<u8>,
    modulus: Vec<u8>,
    product_code: Vec<u8>,
    public: Option<Vec<u8>>,
}

impl KeyConfig {
    /// Build a configuration from the base64 strings the protection tool exports.
    pub fn new(
        algorithm: &str,
        bits: usize,
        private: &str,
        modulus: &str,
        product_code: &str,
    ) -> KeyResult<Self> {
        if algorithm.is_empty() {
            return Err(ConfigError::EmptyAlgorithm.into());
        }
        if !SUPPORTED_BITS.contains(&bits) {
            return Err(ConfigError::UnsupportedBits { bits }.into());
        }

        Ok(Self {
            algorithm: algorithm.to_string(),
            bits,
            private: decode_required("private", private)?,
            modulus: decode_required("modulus", modulus)?,
            product_code: decode_required("product code", product_code)?,
            public: None,
        })
    }

    /// Parse a key export made of `$exported_<name> = <value>;` lines.
    pub fn from_export(text: &str) -> KeyResult<Self> {
        let mut algorithm = None;
        let mut bits = None;
        let mut private = None;
        let mut modulus = None;
        let mut product_code = None;
        let mut public = None;

        for (name, value) in text.lines().filter_map(parse_export_line) {
            match name {
                "algorithm" => algorithm = Some(value),
                "bits" => bits = Some(value),
                "private" => private = Some(value),
                "modulus" => modulus = Some(value),
                "product_code" => product_code = Some(value),
                "public" => public = Some(value),
                _ => tracing::trace!(name, "ignoring unknown export entry"),
            }
        }

        let bits_text = require(bits, "exported_bits")?;
        let bits = bits_text.parse::<usize>().map_err(|_| ConfigError::InvalidBits {
            value: bits_text.to_string(),
        })?;

        let mut config = Self::new(
            require(algorithm, "exported_algorithm")?,
            bits,
            require(private, "exported_private")?,
            require(modulus, "exported_modulus")?,
            require(product_code, "exported_product_code")?,
        )?;
        if let Some(public) = public {
            config.public = Some(decode_required("public", public)?);
        }

        tracing::debug!(algorithm = %config.algorithm, bits, "loaded key export");
        Ok(config)
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Size in bytes of the padded block for this key
    pub fn byte_len(&self) -> usize {
        self.bits / 8
    }

    pub fn private(&self) -> &[u8] {
        &self.private
    }

    pub fn modulus(&self) -> &[u8] {
        &self.modulus
    }

    pub fn product_code(&self) -> &[u8] {
        &self.product_code
    }

    /// Public exponent, when the export carried one
    pub fn public(&self) -> Option<&[u8]> {
        self.public.as_deref()
    }
}

fn require<'a>(value: Option<&'a str>, field: &'static str) -> KeyResult<&'a str> {
    value.ok_or_else(|| ConfigError::MissingExport { field }.into())
}

fn decode_required(field: &'static str, value: &str) -> KeyResult<Vec<u8>> {
    if value.is_empty() {
        return Err(ConfigError::EmptyField { field }.into());
    }
    let bytes = STANDARD
        .decode(value)
        .map_err(|e| KeyError::encoding(field, e))?;
    if bytes.is_empty() {
        return Err(ConfigError::EmptyField { field }.into());
    }
    Ok(bytes)
}

// the private exponent stays out of logs and panic messages
impl fmt::Debug for KeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyConfig")
            .field("algorithm", &self.algorithm)
            .field("bits", &self.bits)
            .field("private", &format_args!("<{} bytes>", self.private.len()))
            .field("modulus", &STANDARD.encode(&self.modulus))
            .field("product_code", &STANDARD.encode(&self.product_code))
            .field("public", &self.public.as_deref().map(|p| STANDARD.encode(p)))
            .finish()
    }
}

/// Split `$exported_bits = 2048;` into `("bits", "2048")`.
fn parse_export_line(line: &str) -> Option<(&str, &str)> {
    let rest = &line[line.find("$exported_")? + "$exported_".len()..];
    let (name, value) = rest.split_once('=')?;
    let value = value.trim();
    let value = value.strip_suffix(';').unwrap_or(value).trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Some((name.trim(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const EXPORT: &str = r#"
/*
$exported_algorithm = "RSA";
$exported_bits = 512;
$exported_private = "AQID";
$exported_modulus = "BAUG";
$exported_product_code = "XgdTzLalxNk=";
*/
"#;

    #[test]
    fn test_rejects_unsupported_bits() {
        let err = KeyConfig::new("RSA", 768, "AQID", "BAUG", "XgdTzLalxNk=").unwrap_err();
        assert!(matches!(
            err,
            KeyError::Config(ConfigError::UnsupportedBits { bits: 768 })
        ));
    }

    #[test]
    fn test_rejects_empty_fields() {
        let err = KeyConfig::new("", 512, "AQID", "BAUG", "XgdTzLalxNk=").unwrap_err();
        assert!(matches!(err, KeyError::Config(ConfigError::EmptyAlgorithm)));

        let err = KeyConfig::new("RSA", 512, "AQID", "", "XgdTzLalxNk=").unwrap_err();
        assert!(matches!(
            err,
            KeyError::Config(ConfigError::EmptyField { field: "modulus" })
        ));
    }

    #[test]
    fn test_rejects_bad_base64() {
        let err = KeyConfig::new("RSA", 512, "AQID", "BAUG", "not base64!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_from_export() {
        let config = KeyConfig::from_export(EXPORT).unwrap();
        assert_eq!(config.algorithm(), "RSA");
        assert_eq!(config.bits(), 512);
        assert_eq!(config.byte_len(), 64);
        assert_eq!(config.private().to_vec(), vec![1, 2, 3]);
        assert_eq!(config.modulus().to_vec(), vec![4, 5, 6]);
        assert_eq!(
            config.product_code().to_vec(),
            vec![0x5e, 0x07, 0x53, 0xcc, 0xb6, 0xa5, 0xc4, 0xd9]
        );
        assert_eq!(config.public(), None);
    }

    #[test]
    fn test_from_export_missing_field() {
        let text = EXPORT.replace("$exported_modulus", "$ignored_modulus");
        let err = KeyConfig::from_export(&text).unwrap_err();
        assert!(matches!(
            err,
            KeyError::Config(ConfigError::MissingExport {
                field: "exported_modulus"
            })
        ));
    }

    #[test]
    fn test_from_export_bad_bits() {
        let text = EXPORT.replace("= 512;", "= lots;");
        let err = KeyConfig::from_export(&text).unwrap_err();
        assert!(matches!(err, KeyError::Config(ConfigError::InvalidBits { .. })));
    }

    #[test]
    fn test_debug_hides_private() {
        let config = KeyConfig::new("RSA", 512, "c2VjcmV0LWV4cG9uZW50", "BAUG", "XgdTzLalxNk=").unwrap();
        let text = format!("{config:?}");
        assert!(text.contains("<15 bytes>"), "{text}");
        assert!(!text.contains("c2VjcmV0LWV4cG9uZW50"), "{text}");
        assert!(!text.contains("115, 101, 99"), "{text}");
        assert!(text.contains("BAUG"), "{text}");
    }

    #[test]
    fn test_parse_export_line() {
        assert_eq!(
            parse_export_line("$exported_public = \"AAEAAQ==\";"),
            Some(("public", "AAEAAQ=="))
        );
        assert_eq!(parse_export_line("  $exported_bits=2048;"), Some(("bits", "2048")));
        assert_eq!(parse_export_line("exported_bits = 2048;"), None);
    }
}
