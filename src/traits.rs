//! Trapdoor-permutation trait definitions.

mod keys;

pub use keys::PublicKeyParts;
