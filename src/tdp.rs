//! Forward and inverse trapdoor permutations.
//!
//! [`Tdp`] is the public-only capability: anyone holding the exported public
//! key can evaluate the permutation and sample messages. [`TdpInverse`] holds
//! the full key material and can additionally invert, fold any number of
//! inversions into a single exponentiation, and synthesize fresh key pairs.
//!
//! Both types are pinned to a message size at construction; instances with
//! different message sizes do not interoperate, and the mismatch surfaces as
//! an error instead of a wrong-width result.

use num_bigint::{BigUint, RandBigInt};
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::algorithms::pad::{uint_to_be_pad, uint_to_zeroizing_be_pad};
use crate::algorithms::tdp::{tdp_eval, tdp_invert_and_check};
use crate::errors::{Error, Result};
use crate::key::{TdpPrivateKey, TdpPublicKey};
use crate::traits::PublicKeyParts;

/// Checks that a key's modulus width matches the configured message size.
pub(crate) fn check_message_size(key: &impl PublicKeyParts, message_size: usize) -> Result<()> {
    if key.size() != message_size {
        return Err(Error::KeySizeMismatch {
            expected: message_size,
            actual: key.size(),
        });
    }
    Ok(())
}

/// Checks that an input message has exactly the permutation's width.
pub(crate) fn check_input_size(input: &[u8], message_size: usize) -> Result<()> {
    if input.len() != message_size {
        return Err(Error::InvalidInputSize {
            expected: message_size,
            actual: input.len(),
        });
    }
    Ok(())
}

/// Forward-only trapdoor permutation over `message_size`-byte messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tdp {
    key: TdpPublicKey,
    message_size: usize,
}

impl Tdp {
    /// Wraps a public key, checking it against the configured message size.
    pub fn new(key: TdpPublicKey, message_size: usize) -> Result<Tdp> {
        check_message_size(&key, message_size)?;
        Ok(Tdp { key, message_size })
    }

    /// Imports a public key from its PEM encoding.
    pub fn from_public_key_pem(pem: &str, message_size: usize) -> Result<Tdp> {
        let key = TdpPublicKey::from_public_key_pem(pem)?;
        Tdp::new(key, message_size)
    }

    /// Imports a public key from its DER encoding.
    pub fn from_public_key_der(der: &[u8], message_size: usize) -> Result<Tdp> {
        let key = TdpPublicKey::from_public_key_der(der)?;
        Tdp::new(key, message_size)
    }

    /// Returns the wrapped public key.
    pub fn public_key(&self) -> &TdpPublicKey {
        &self.key
    }

    /// Re-exports the public key in its canonical PEM encoding.
    pub fn public_key_pem(&self) -> Result<String> {
        Ok(self.key.to_public_key_pem(LineEnding::LF)?)
    }

    /// Re-exports the public key in its canonical DER encoding.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        Ok(self.key.to_public_key_der()?.into_vec())
    }

    /// Message width in bytes.
    pub fn message_size(&self) -> usize {
        self.message_size
    }

    /// Evaluates the permutation once on an exact-width message.
    pub fn eval(&self, input: &[u8]) -> Result<Vec<u8>> {
        eval_with(&self.key, input, self.message_size)
    }

    /// Draws a message uniformly at random below the modulus.
    pub fn sample<R: CryptoRngCore + ?Sized>(&self, rng: &mut R) -> Result<Vec<u8>> {
        sample_with(&self.key, rng, self.message_size)
    }
}

/// Trapdoor permutation with the private inversion capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TdpInverse {
    key: TdpPrivateKey,
    message_size: usize,
}

impl TdpInverse {
    /// Generates a fresh key pair for a `message_size`-byte message space.
    pub fn generate<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        message_size: usize,
    ) -> Result<TdpInverse> {
        let key = TdpPrivateKey::new(rng, message_size * 8)?;
        TdpInverse::new(key, message_size)
    }

    /// Wraps a private key, checking it against the configured message size.
    pub fn new(key: TdpPrivateKey, message_size: usize) -> Result<TdpInverse> {
        check_message_size(&key, message_size)?;
        Ok(TdpInverse { key, message_size })
    }

    /// Imports a private key from its PKCS#8 PEM encoding.
    pub fn from_private_key_pem(pem: &str, message_size: usize) -> Result<TdpInverse> {
        let key = TdpPrivateKey::from_pkcs8_pem(pem)?;
        TdpInverse::new(key, message_size)
    }

    /// Imports a private key from its PKCS#8 DER encoding.
    pub fn from_private_key_der(der: &[u8], message_size: usize) -> Result<TdpInverse> {
        let key = TdpPrivateKey::from_pkcs8_der(der)?;
        TdpInverse::new(key, message_size)
    }

    /// Returns the wrapped private key.
    pub fn private_key(&self) -> &TdpPrivateKey {
        &self.key
    }

    /// Returns an owned copy of the public components.
    pub fn public_key(&self) -> TdpPublicKey {
        self.key.to_public_key()
    }

    /// Exports the private key in its PKCS#8 PEM encoding.
    pub fn private_key_pem(&self) -> Result<Zeroizing<String>> {
        Ok(self.key.to_pkcs8_pem(LineEnding::LF)?)
    }

    /// Exports the private key in its PKCS#8 DER encoding.
    pub fn private_key_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        Ok(Zeroizing::new(self.key.to_pkcs8_der()?.as_bytes().to_vec()))
    }

    /// Exports the public components in their canonical PEM encoding.
    pub fn public_key_pem(&self) -> Result<String> {
        Ok(self.key.to_public_key().to_public_key_pem(LineEnding::LF)?)
    }

    /// Exports the public components in their canonical DER encoding.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        Ok(self.key.to_public_key().to_public_key_der()?.into_vec())
    }

    /// Message width in bytes.
    pub fn message_size(&self) -> usize {
        self.message_size
    }

    /// Evaluates the permutation once on an exact-width message.
    pub fn eval(&self, input: &[u8]) -> Result<Vec<u8>> {
        eval_with(&self.key, input, self.message_size)
    }

    /// Draws a message uniformly at random below the modulus.
    pub fn sample<R: CryptoRngCore + ?Sized>(&self, rng: &mut R) -> Result<Vec<u8>> {
        sample_with(&self.key, rng, self.message_size)
    }

    /// Inverts the permutation once on an exact-width message.
    pub fn invert(&self, input: &[u8]) -> Result<Vec<u8>> {
        check_input_size(input, self.message_size)?;

        let c = BigUint::from_bytes_be(input);
        let m = tdp_invert_and_check(&self.key, &c)?;
        uint_to_zeroizing_be_pad(m, self.message_size)
    }

    /// Applies [`invert`](Self::invert) `rounds` times, folded into a single
    /// exponentiation.
    ///
    /// The composed private exponent `d^rounds` is reduced modulo the Euler
    /// totient, which the private-key holder knows; a public party cannot do
    /// the analogous reduction and has to precompute a pool instead. Zero
    /// rounds return the input unchanged.
    pub fn invert_mult(&self, input: &[u8], rounds: usize) -> Result<Vec<u8>> {
        check_input_size(input, self.message_size)?;

        if rounds == 0 {
            return Ok(input.to_vec());
        }

        let c = BigUint::from_bytes_be(input);
        if &c >= self.key.n() {
            return Err(Error::InputOutOfRange);
        }

        let totient = self.key.totient();
        let folded = Zeroizing::new(
            self.key
                .d()
                .modpow(&BigUint::from(rounds as u64), &totient),
        );

        let m = c.modpow(&folded, self.key.n());
        uint_to_zeroizing_be_pad(m, self.message_size)
    }
}

fn eval_with(key: &impl PublicKeyParts, input: &[u8], message_size: usize) -> Result<Vec<u8>> {
    check_input_size(input, message_size)?;

    let m = BigUint::from_bytes_be(input);
    uint_to_be_pad(tdp_eval(key, &m), message_size)
}

fn sample_with<R: CryptoRngCore + ?Sized>(
    key: &impl PublicKeyParts,
    rng: &mut R,
    message_size: usize,
) -> Result<Vec<u8>> {
    let value = rng.gen_biguint_below(key.n());
    uint_to_be_pad(value, message_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    const MESSAGE_SIZE: usize = 64;

    fn inverse(seed: u8) -> (ChaCha8Rng, TdpInverse) {
        let mut rng = ChaCha8Rng::from_seed([seed; 32]);
        let inv = TdpInverse::generate(&mut rng, MESSAGE_SIZE).unwrap();
        (rng, inv)
    }

    #[test]
    fn eval_then_invert_is_identity() {
        let (mut rng, inv) = inverse(11);
        let tdp = Tdp::new(inv.public_key(), MESSAGE_SIZE).unwrap();

        for _ in 0..5 {
            let m = tdp.sample(&mut rng).unwrap();
            assert_eq!(m.len(), MESSAGE_SIZE);
            let c = tdp.eval(&m).unwrap();
            assert_eq!(inv.invert(&c).unwrap(), m);
        }
    }

    #[test]
    fn invert_then_eval_is_identity() {
        let (mut rng, inv) = inverse(12);
        let m = inv.sample(&mut rng).unwrap();
        let v = inv.invert(&m).unwrap();
        assert_eq!(inv.eval(&v).unwrap(), m);
    }

    #[test]
    fn input_width_is_validated() {
        let (_, inv) = inverse(13);
        for len in [MESSAGE_SIZE - 1, MESSAGE_SIZE + 1] {
            let input = vec![0u8; len];
            assert!(matches!(
                inv.eval(&input).unwrap_err(),
                Error::InvalidInputSize { .. }
            ));
            assert!(matches!(
                inv.invert(&input).unwrap_err(),
                Error::InvalidInputSize { .. }
            ));
            assert!(matches!(
                inv.invert_mult(&input, 3).unwrap_err(),
                Error::InvalidInputSize { .. }
            ));
        }
    }

    #[test]
    fn mismatched_message_size_is_rejected_at_construction() {
        let (_, inv) = inverse(14);
        let err = Tdp::new(inv.public_key(), MESSAGE_SIZE + 1).unwrap_err();
        assert!(matches!(err, Error::KeySizeMismatch { .. }));
    }

    #[test]
    fn invert_mult_matches_iterated_invert() {
        let (mut rng, inv) = inverse(15);
        let m = inv.sample(&mut rng).unwrap();

        assert_eq!(inv.invert_mult(&m, 0).unwrap(), m);

        let mut v = m.clone();
        for rounds in 1..=8 {
            v = inv.invert(&v).unwrap();
            assert_eq!(inv.invert_mult(&m, rounds).unwrap(), v);
        }
    }

    #[test]
    fn key_export_import_preserves_behavior() {
        let (mut rng, inv) = inverse(16);

        let pem = inv.public_key_pem().unwrap();
        let tdp = Tdp::from_public_key_pem(&pem, MESSAGE_SIZE).unwrap();
        assert_eq!(tdp.public_key_pem().unwrap(), pem);

        let sk_pem = inv.private_key_pem().unwrap();
        let imported = TdpInverse::from_private_key_pem(&sk_pem, MESSAGE_SIZE).unwrap();

        let m = tdp.sample(&mut rng).unwrap();
        let c = tdp.eval(&m).unwrap();
        assert_eq!(inv.eval(&m).unwrap(), c);
        assert_eq!(imported.invert(&c).unwrap(), m);
    }
}
