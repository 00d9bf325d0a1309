//! Error types for serial number generation and parsing

use thiserror::Error;

/// Coarse error category, for callers that only need to branch on the class
/// of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Encoding,
    Size,
    Format,
    Integrity,
    Validation,
    Arithmetic,
}

/// Errors returned by the key codec.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Malformed or unsupported key configuration.
    #[error("invalid key configuration: {0}")]
    Config(#[from] ConfigError),

    /// Base64 text (serial, key material or product code) failed to decode.
    #[error("invalid base64 in {field}")]
    Encoding {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    /// Content does not fit the block, or the serial has the wrong length.
    #[error(transparent)]
    Size(#[from] SizeError),

    /// The binary record is structurally invalid.
    #[error("serial number parsing error: {0}")]
    Format(#[from] FormatError),

    /// The record checksum does not match its contents.
    #[error("serial number CRC error: expected {expected:02x?}, found {found:02x?}")]
    Integrity { expected: [u8; 4], found: [u8; 4] },

    /// The record decoded fine but is not acceptable for this product.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Modular exponentiation was asked to work with a zero operand.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

impl KeyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Encoding { .. } => ErrorKind::Encoding,
            Self::Size(_) => ErrorKind::Size,
            Self::Format(_) => ErrorKind::Format,
            Self::Integrity { .. } => ErrorKind::Integrity,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Arithmetic(_) => ErrorKind::Arithmetic,
        }
    }

    pub(crate) fn encoding(field: &'static str, source: base64::DecodeError) -> Self {
        Self::Encoding { field, source }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("algorithm name is empty")]
    EmptyAlgorithm,

    #[error("unsupported key size: {bits} bits")]
    UnsupportedBits { bits: usize },

    #[error("{field} is empty")]
    EmptyField { field: &'static str },

    #[error("key export is missing ${field}")]
    MissingExport { field: &'static str },

    #[error("key export has a non-numeric bits value: {value:?}")]
    InvalidBits { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    #[error("content is too big to fit in key: {size}, maximal allowed is {capacity}")]
    ContentTooLarge { size: usize, capacity: usize },

    #[error("invalid serial length: {actual} bytes, expected {expected} \u{b1} {tolerance}")]
    SerialLength {
        actual: usize,
        expected: usize,
        tolerance: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("{field} is too long: {len} bytes")]
    FieldTooLong { field: &'static str, len: usize },

    #[error("invalid hardware id (not multiple of 4): {len}")]
    HardwareIdLength { len: usize },

    #[error("running time limit is incorrect: {value}")]
    RunningTimeLimit { value: u32 },

    #[error("product code has invalid size: {len}")]
    ProductCodeLength { len: usize },

    #[error("record has no fields")]
    EmptyRecord,

    #[error("corrupt chunk: tag {tag} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    #[error("truncated record: {needed} bytes needed at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{field} year {year} does not fit the record")]
    YearOutOfRange { field: &'static str, year: i32 },

    #[error("invalid date {year:04}-{month:02}-{day:02} in {field}")]
    MalformedDate {
        field: &'static str,
        year: u16,
        month: u8,
        day: u8,
    },

    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("record terminator not found")]
    MissingTerminator,

    #[error("checksum truncated: {available} of 4 bytes after terminator")]
    MissingChecksum { available: usize },

    #[error("padding separator not found")]
    MissingSeparator,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("incomplete serial number")]
    Incomplete,

    #[error("unsupported version: {version}")]
    UnsupportedVersion { version: u8 },

    #[error("invalid product code")]
    ProductCodeMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("modulus is zero")]
    ZeroModulus,

    #[error("exponent is zero")]
    ZeroExponent,
}

/// Result type for codec operations.
pub type KeyResult<T> = Result<T, KeyError>;
