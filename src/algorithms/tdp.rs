//! Raw permutation arithmetic.
//!
//! The permutation is textbook RSA on fixed-width integers: forward
//! evaluation raises to the public exponent, inversion to the private one.
//! No padding is involved anywhere; callers operate on exact-width message
//! representatives below the modulus.

use num_bigint::{BigUint, IntoBigInt, IntoBigUint, ToBigInt};
use num_traits::Signed;
use zeroize::Zeroize;

use crate::errors::{Error, Result};
use crate::key::TdpPrivateKey;
use crate::traits::PublicKeyParts;

/// Forward evaluation: `m^e mod n`.
#[inline]
pub(crate) fn tdp_eval<K: PublicKeyParts>(key: &K, m: &BigUint) -> BigUint {
    m.modpow(key.e(), key.n())
}

/// Inversion: `c^d mod n`, via the CRT when the precomputed values are
/// available.
#[inline]
pub(crate) fn tdp_invert(priv_key: &TdpPrivateKey, c: &BigUint) -> Result<BigUint> {
    if c >= priv_key.n() {
        return Err(Error::InputOutOfRange);
    }

    let m = match priv_key.precomputed() {
        None => c.modpow(priv_key.d(), priv_key.n()),
        Some(precomputed) => {
            let p = &priv_key.primes()[0];
            let q = &priv_key.primes()[1];

            let mut m = c.modpow(&precomputed.dp, p).into_bigint().unwrap();
            let mut m2 = c.modpow(&precomputed.dq, q).into_bigint().unwrap();

            let p_int = p.to_bigint().unwrap();
            let q_int = q.to_bigint().unwrap();

            m -= &m2;
            while m.is_negative() {
                m += &p_int;
            }
            m *= &precomputed.qinv;
            m %= &p_int;
            m *= &q_int;
            m += &m2;

            m2.zeroize();

            m.into_biguint().ok_or(Error::Internal)?
        }
    };

    Ok(m)
}

/// Inversion with a consistency check against the forward map.
///
/// `m^e` is recomputed and compared with the original input, which catches
/// faults in the CRT computation.
#[inline]
pub(crate) fn tdp_invert_and_check(priv_key: &TdpPrivateKey, c: &BigUint) -> Result<BigUint> {
    let m = tdp_invert(priv_key, c)?;

    let check = tdp_eval(priv_key, &m);
    if c != &check {
        return Err(Error::Internal);
    }

    Ok(m)
}
