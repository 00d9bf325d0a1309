//! vmp_keygen - serial numbers in the VMProtect key format
//!
//! A serial is a tagged license record, closed by a truncated SHA-1 checksum,
//! padded to the key size and signed with textbook RSA. The result is
//! base64 text that users paste into the protected application.
//!
//! ```no_run
//! use vmp_keygen::{generate, parse_with_config, KeyConfig, License};
//!
//! # fn main() -> Result<(), vmp_keygen::KeyError> {
//! let config = KeyConfig::from_export(&std::fs::read_to_string("key.txt").unwrap())?;
//! let license = License {
//!     name: Some("John Doe".into()),
//!     ..Default::default()
//! };
//! let serial = generate(&license, &config)?;
//! let decoded = parse_with_config(&serial, None, &config)?;
//! assert_eq!(decoded.name, license.name);
//! # Ok(())
//! # }
//! ```

pub mod crypto;
pub mod error;
pub mod keygen;
pub mod types;

pub use error::{ErrorKind, KeyError, KeyResult};
pub use keygen::{generate, generate_with_rng, parse, parse_with_config};
pub use types::{KeyConfig, License};
