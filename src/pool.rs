//! Multiplicative pool of derived public keys.
//!
//! Evaluating an RSA-style permutation `k` times in a row computes
//! `x^(e^k) mod n`. A party that only holds the public key can therefore buy
//! order-`k` composed evaluation for the price of a single exponentiation by
//! precomputing the exponents `e^2, e^3, ..., e^size` once. The exponents
//! are plain integer powers: reducing them modulo the totient would need the
//! factorization of the modulus, which a public party does not have.

use num_bigint::{BigUint, RandBigInt};
use pkcs8::{DecodePublicKey, EncodePublicKey, LineEnding};
use rand_core::CryptoRngCore;

use crate::algorithms::pad::uint_to_be_pad;
use crate::algorithms::tdp::tdp_eval;
use crate::errors::{Error, Result};
use crate::key::TdpPublicKey;
use crate::tdp::{check_input_size, check_message_size};
use crate::traits::PublicKeyParts;

/// Forward permutation with precomputed keys for composed evaluation up to a
/// fixed maximum order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TdpMultPool {
    base: TdpPublicKey,
    /// Derived keys for orders `2..=size`, in order. Each shares the base
    /// modulus and carries the base exponent raised one power further.
    derived: Vec<TdpPublicKey>,
    message_size: usize,
}

impl TdpMultPool {
    /// Builds a pool of the given size around a public key.
    ///
    /// A pool of size `size` supports evaluation orders `1..=size`; order 1
    /// is the base key itself. Fails with [`Error::InvalidPoolSize`] when
    /// `size` is zero.
    pub fn new(key: TdpPublicKey, message_size: usize, size: u8) -> Result<TdpMultPool> {
        if size == 0 {
            return Err(Error::InvalidPoolSize);
        }
        check_message_size(&key, message_size)?;

        let e0 = key.e().clone();
        let mut e = e0.clone();
        let mut derived = Vec::with_capacity(size as usize - 1);
        for _ in 1..size {
            e = &e * &e0;
            derived.push(TdpPublicKey::new_unchecked(key.n().clone(), e.clone()));
        }

        Ok(TdpMultPool {
            base: key,
            derived,
            message_size,
        })
    }

    /// Imports the base public key from its PEM encoding and builds a pool
    /// around it.
    pub fn from_public_key_pem(pem: &str, message_size: usize, size: u8) -> Result<TdpMultPool> {
        let key = TdpPublicKey::from_public_key_pem(pem)?;
        TdpMultPool::new(key, message_size, size)
    }

    /// Imports the base public key from its DER encoding and builds a pool
    /// around it.
    pub fn from_public_key_der(der: &[u8], message_size: usize, size: u8) -> Result<TdpMultPool> {
        let key = TdpPublicKey::from_public_key_der(der)?;
        TdpMultPool::new(key, message_size, size)
    }

    /// Returns the base public key.
    pub fn public_key(&self) -> &TdpPublicKey {
        &self.base
    }

    /// Re-exports the base public key in its canonical PEM encoding.
    pub fn public_key_pem(&self) -> Result<String> {
        Ok(self.base.to_public_key_pem(LineEnding::LF)?)
    }

    /// Re-exports the base public key in its canonical DER encoding.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        Ok(self.base.to_public_key_der()?.into_vec())
    }

    /// Message width in bytes.
    pub fn message_size(&self) -> usize {
        self.message_size
    }

    /// Largest composition order the pool can evaluate.
    pub fn maximum_order(&self) -> u8 {
        self.derived.len() as u8 + 1
    }

    /// Number of keys held by the pool, the `size` it was built with.
    pub fn pool_size(&self) -> u8 {
        self.maximum_order()
    }

    /// Evaluates the permutation composed `order` times on an exact-width
    /// message, as a single exponentiation.
    pub fn eval(&self, input: &[u8], order: u8) -> Result<Vec<u8>> {
        check_input_size(input, self.message_size)?;

        let key = match order {
            0 => {
                return Err(Error::InvalidOrder {
                    order,
                    maximum: self.maximum_order(),
                })
            }
            1 => &self.base,
            _ if order <= self.maximum_order() => &self.derived[order as usize - 2],
            _ => {
                return Err(Error::InvalidOrder {
                    order,
                    maximum: self.maximum_order(),
                })
            }
        };

        let m = BigUint::from_bytes_be(input);
        uint_to_be_pad(tdp_eval(key, &m), self.message_size)
    }

    /// Draws a message uniformly at random below the modulus.
    pub fn sample<R: CryptoRngCore + ?Sized>(&self, rng: &mut R) -> Result<Vec<u8>> {
        let value = rng.gen_biguint_below(self.base.n());
        uint_to_be_pad(value, self.message_size)
    }
}
