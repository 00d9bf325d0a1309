//! Modular exponentiation

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::ArithmeticError;

/// Compute `base^exponent mod modulus` with square-and-multiply.
///
/// A zero modulus or zero exponent means the key material is broken, so both
/// are rejected instead of being treated as identities.
pub fn mod_pow(
    base: &BigUint,
    exponent: &BigUint,
    modulus: &BigUint,
) -> Result<BigUint, ArithmeticError> {
    if modulus.is_zero() {
        return Err(ArithmeticError::ZeroModulus);
    }
    if exponent.is_zero() {
        return Err(ArithmeticError::ZeroExponent);
    }

    let mut square = base % modulus;
    let mut result = BigUint::one();
    let mut exp = exponent.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (result * &square) % modulus;
        }
        square = (&square * &square) % modulus;
        exp >>= 1;
    }

    Ok(result)
}
