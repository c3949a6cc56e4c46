//! Generation of two-prime trapdoor-permutation keys.

use num_bigint::{BigUint, ModInverse, RandPrime};
use num_integer::Integer;
use num_traits::One;
use rand_core::CryptoRngCore;

use crate::errors::{Error, Result};
use crate::key::TdpPrivateKey;

/// Attempt budget for modulus generation. With the per-prime rejection below
/// an attempt only fails on a duplicate prime or a short product, so this
/// bound is never reached in practice.
const MAX_MODULUS_ATTEMPTS: usize = 64;

/// Attempt budget for a single prime. A random prime `p` fails the
/// `gcd(e, p-1) == 1` requirement with probability roughly 1/2 for `e = 3`.
const MAX_PRIME_ATTEMPTS: usize = 128;

/// Generates a two-prime key pair of the given modulus bit size with public
/// exponent `exp`.
///
/// Primes are rejected until the exponent is invertible modulo `p - 1`, so
/// the private exponent always exists for the final modulus. All retries are
/// bounded; exhaustion surfaces as [`Error::KeyGeneration`].
pub(crate) fn generate_key_pair<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_size: usize,
    exp: &BigUint,
) -> Result<TdpPrivateKey> {
    if bit_size < 16 {
        return Err(Error::KeyGeneration);
    }

    for _ in 0..MAX_MODULUS_ATTEMPTS {
        let p = generate_prime(rng, bit_size / 2, exp)?;
        let q = generate_prime(rng, bit_size - p.bits(), exp)?;

        if p == q {
            continue;
        }

        let n = &p * &q;
        if n.bits() != bit_size {
            // `gen_prime` sets the two most significant bits of each prime,
            // so a short product indicates unbalanced factors. Retry.
            continue;
        }

        let totient = (&p - BigUint::one()) * (&q - BigUint::one());
        if let Some(d) = exp.clone().mod_inverse(&totient) {
            let d = d.to_biguint().ok_or(Error::KeyGeneration)?;
            return TdpPrivateKey::from_components(n, exp.clone(), d, vec![p, q]);
        }
    }

    Err(Error::KeyGeneration)
}

/// Draws random primes of the requested size until one satisfies
/// `gcd(exp, p - 1) == 1`.
fn generate_prime<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_size: usize,
    exp: &BigUint,
) -> Result<BigUint> {
    for _ in 0..MAX_PRIME_ATTEMPTS {
        let p = rng.gen_prime(bit_size);
        if (&p - BigUint::one()).gcd(exp).is_one() {
            return Ok(p);
        }
    }

    Err(Error::KeyGeneration)
}
