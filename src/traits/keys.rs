//! Traits related to the key components

use num_bigint::BigUint;

/// Components shared by every key that can evaluate the forward permutation.
pub trait PublicKeyParts {
    /// Returns the modulus of the key.
    fn n(&self) -> &BigUint;

    /// Returns the public exponent of the key.
    fn e(&self) -> &BigUint;

    /// Returns the modulus size in bytes. Messages evaluated or inverted by
    /// this key have the same size.
    fn size(&self) -> usize {
        (self.n().bits() + 7) / 8
    }
}
