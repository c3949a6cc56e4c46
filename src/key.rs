//! Trapdoor-permutation key material.

use num_bigint::{BigInt, BigUint, ModInverse};
use num_integer::Integer;
use num_traits::{One, ToPrimitive};
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::algorithms::generate::generate_key_pair;
use crate::errors::{Error, Result};
use crate::traits::PublicKeyParts;

/// Deployment-wide public exponent. Every generated key and every pool
/// derivation starts from this value; it is not configurable per instance.
pub const PUBLIC_EXPONENT: u64 = 3;

/// Modulus and public exponent of a trapdoor permutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TdpPublicKey {
    n: BigUint,
    e: BigUint,
}

/// Full key material of a trapdoor permutation: the public components plus
/// the private exponent and the prime factorization of the modulus.
#[derive(Debug, Clone)]
pub struct TdpPrivateKey {
    pubkey_components: TdpPublicKey,
    /// Private exponent.
    d: BigUint,
    /// Prime factors of the modulus. Always exactly two.
    primes: Vec<BigUint>,
    /// Precomputed values to speed up inversion.
    precomputed: Option<PrecomputedValues>,
}

/// Precomputed CRT values for the private operation.
#[derive(Debug, Clone)]
pub(crate) struct PrecomputedValues {
    /// D mod (P-1)
    pub(crate) dp: BigUint,
    /// D mod (Q-1)
    pub(crate) dq: BigUint,
    /// Q^-1 mod P
    pub(crate) qinv: BigInt,
}

impl Zeroize for PrecomputedValues {
    fn zeroize(&mut self) {
        self.dp.zeroize();
        self.dq.zeroize();
        self.qinv.zeroize();
    }
}

impl PublicKeyParts for TdpPublicKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

impl TdpPublicKey {
    /// Maximum supported modulus size in bits.
    pub const MAX_SIZE: usize = 4096;

    /// Smallest acceptable public exponent.
    pub const MIN_PUB_EXPONENT: u64 = 3;

    /// Largest acceptable public exponent.
    pub const MAX_PUB_EXPONENT: u64 = (1 << 33) - 1;

    /// Creates a public key from its components after sanity checks.
    pub fn new(n: BigUint, e: BigUint) -> Result<Self> {
        let key = TdpPublicKey { n, e };
        check_public(&key)?;
        Ok(key)
    }

    /// Creates a public key without checking the components.
    ///
    /// Used for pool-derived keys, whose exponents deliberately exceed the
    /// bounds enforced on imported keys.
    pub(crate) fn new_unchecked(n: BigUint, e: BigUint) -> Self {
        TdpPublicKey { n, e }
    }
}

impl TdpPrivateKey {
    /// Generates a fresh two-prime key of the given modulus bit length with
    /// the deployment public exponent [`PUBLIC_EXPONENT`].
    pub fn new<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_size: usize) -> Result<TdpPrivateKey> {
        generate_key_pair(rng, bit_size, &BigUint::from(PUBLIC_EXPONENT))
    }

    /// Constructs a key from its components, validating them and
    /// precomputing the CRT values.
    pub fn from_components(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        primes: Vec<BigUint>,
    ) -> Result<TdpPrivateKey> {
        if primes.len() != 2 {
            return Err(Error::InvalidPrime);
        }

        let mut key = TdpPrivateKey {
            pubkey_components: TdpPublicKey { n, e },
            d,
            primes,
            precomputed: None,
        };

        key.validate()?;
        key.precompute()?;

        Ok(key)
    }

    /// Returns an owned copy of the public components.
    pub fn to_public_key(&self) -> TdpPublicKey {
        self.pubkey_components.clone()
    }

    /// Returns the private exponent of the key.
    pub fn d(&self) -> &BigUint {
        &self.d
    }

    /// Returns the prime factors of the modulus.
    pub fn primes(&self) -> &[BigUint] {
        &self.primes
    }

    pub(crate) fn precomputed(&self) -> Option<&PrecomputedValues> {
        self.precomputed.as_ref()
    }

    /// Euler totient of the modulus. Known only to the private key holder;
    /// exponent arithmetic for repeated inversion is reduced against it.
    pub(crate) fn totient(&self) -> Zeroizing<BigUint> {
        let mut phi = BigUint::one();
        for prime in &self.primes {
            phi *= prime - BigUint::one();
        }
        Zeroizing::new(phi)
    }

    /// Q^-1 mod P, as serialized in PKCS#1 private key encodings.
    pub(crate) fn crt_coefficient(&self) -> Option<BigUint> {
        (&self.primes[1]).mod_inverse(&self.primes[0])?.to_biguint()
    }

    /// Performs basic sanity checks on the key components.
    pub fn validate(&self) -> Result<()> {
        check_public(self)?;

        // The primes must multiply to the modulus.
        let mut m = BigUint::one();
        for prime in &self.primes {
            // Primes <= 1 would cause divide-by-zero below.
            if *prime <= BigUint::one() {
                return Err(Error::InvalidPrime);
            }
            m *= prime;
        }
        if m != self.pubkey_components.n {
            return Err(Error::InvalidModulus);
        }

        // d*e == 1 mod (p-1) for each prime, i.e. d inverts e.
        let de = &self.d * &self.pubkey_components.e;
        for prime in &self.primes {
            let congruence: BigUint = &de % (prime - BigUint::one());
            if !congruence.is_one() {
                return Err(Error::InvalidExponent);
            }
        }

        Ok(())
    }

    fn precompute(&mut self) -> Result<()> {
        if self.precomputed.is_some() {
            return Ok(());
        }

        let dp = &self.d % (&self.primes[0] - BigUint::one());
        let dq = &self.d % (&self.primes[1] - BigUint::one());
        let qinv = (&self.primes[1])
            .mod_inverse(&self.primes[0])
            .ok_or(Error::InvalidPrime)?;

        self.precomputed = Some(PrecomputedValues { dp, dq, qinv });

        Ok(())
    }
}

impl PublicKeyParts for TdpPrivateKey {
    fn n(&self) -> &BigUint {
        &self.pubkey_components.n
    }

    fn e(&self) -> &BigUint {
        &self.pubkey_components.e
    }
}

impl From<&TdpPrivateKey> for TdpPublicKey {
    fn from(private_key: &TdpPrivateKey) -> TdpPublicKey {
        private_key.to_public_key()
    }
}

impl PartialEq for TdpPrivateKey {
    #[inline]
    fn eq(&self, other: &TdpPrivateKey) -> bool {
        self.pubkey_components == other.pubkey_components
            && self.d == other.d
            && self.primes == other.primes
    }
}

impl Eq for TdpPrivateKey {}

impl Zeroize for TdpPrivateKey {
    fn zeroize(&mut self) {
        self.d.zeroize();
        for prime in self.primes.iter_mut() {
            prime.zeroize();
        }
        self.primes.clear();
        if let Some(mut precomputed) = self.precomputed.take() {
            precomputed.zeroize();
        }
    }
}

impl Drop for TdpPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Checks that a public key is well formed and within the supported bounds.
pub(crate) fn check_public(public_key: &impl PublicKeyParts) -> Result<()> {
    if public_key.n().bits() > TdpPublicKey::MAX_SIZE {
        return Err(Error::ModulusTooLarge);
    }
    if public_key.n().is_even() {
        return Err(Error::InvalidModulus);
    }

    let e = public_key
        .e()
        .to_u64()
        .ok_or(Error::PublicExponentTooLarge)?;
    if e < TdpPublicKey::MIN_PUB_EXPONENT {
        return Err(Error::PublicExponentTooSmall);
    }
    if e > TdpPublicKey::MAX_PUB_EXPONENT {
        return Err(Error::PublicExponentTooLarge);
    }
    if e & 1 == 0 {
        return Err(Error::InvalidExponent);
    }

    Ok(())
}
