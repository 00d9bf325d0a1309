//! License validation applied after a serial has been decoded

use crate::error::ValidationError;
use crate::types::{License, CURRENT_VERSION};

/// Check that a decoded license is complete and belongs to `product_code`.
pub fn validate_license(license: &License, product_code: &[u8]) -> Result<(), ValidationError> {
    let (Some(version), Some(code)) = (license.version, license.product_code.as_deref()) else {
        return Err(ValidationError::Incomplete);
    };
    if code.is_empty() {
        return Err(ValidationError::Incomplete);
    }

    // no forward compatibility: newer records are rejected outright
    if version != CURRENT_VERSION {
        return Err(ValidationError::UnsupportedVersion { version });
    }

    if code != product_code {
        return Err(ValidationError::ProductCodeMismatch);
    }

    Ok(())
}
