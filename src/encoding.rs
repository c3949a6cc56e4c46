//! PKCS#1 and PKCS#8 encoding support.
//!
//! Key material travels between parties as standard RSA encodings: the
//! public components as an `RSAPublicKey` structure inside SPKI, the private
//! components as an `RSAPrivateKey` structure inside PKCS#8. The blanket
//! impls in the `pkcs8` crate then provide the DER and PEM entry points
//! (`from_pkcs8_pem`, `to_public_key_pem`, ...) used by the wrapper types.

use core::convert::{TryFrom, TryInto};

use num_bigint::BigUint;
use num_traits::One;
use pkcs8::{
    der::{asn1::BitStringRef, AnyRef, Decode, Encode},
    Document, EncodePrivateKey, EncodePublicKey, SecretDocument,
};
use zeroize::Zeroizing;

use crate::key::{TdpPrivateKey, TdpPublicKey};
use crate::traits::PublicKeyParts;

/// Verify that the `AlgorithmIdentifier` for a key is correct.
fn verify_algorithm_id(algorithm: &pkcs8::AlgorithmIdentifierRef<'_>) -> pkcs8::spki::Result<()> {
    if algorithm.oid != pkcs1::ALGORITHM_OID {
        return Err(pkcs8::spki::Error::OidUnknown { oid: algorithm.oid });
    }
    if algorithm.parameters_any()? != AnyRef::NULL {
        return Err(pkcs8::spki::Error::KeyMalformed);
    }

    Ok(())
}

impl TryFrom<pkcs8::PrivateKeyInfo<'_>> for TdpPrivateKey {
    type Error = pkcs8::Error;

    fn try_from(private_key_info: pkcs8::PrivateKeyInfo<'_>) -> pkcs8::Result<Self> {
        verify_algorithm_id(&private_key_info.algorithm)
            .map_err(|_| pkcs8::Error::KeyMalformed)?;

        let pkcs1_key = pkcs1::RsaPrivateKey::from_der(private_key_info.private_key)
            .map_err(|_| pkcs8::Error::KeyMalformed)?;

        // Multi-prime keys are not supported.
        if pkcs1_key.version() != pkcs1::Version::TwoPrime {
            return Err(pkcs1::Error::Version.into());
        }

        let n = BigUint::from_bytes_be(pkcs1_key.modulus.as_bytes());
        let e = BigUint::from_bytes_be(pkcs1_key.public_exponent.as_bytes());
        let d = BigUint::from_bytes_be(pkcs1_key.private_exponent.as_bytes());
        let prime1 = BigUint::from_bytes_be(pkcs1_key.prime1.as_bytes());
        let prime2 = BigUint::from_bytes_be(pkcs1_key.prime2.as_bytes());

        TdpPrivateKey::from_components(n, e, d, vec![prime1, prime2])
            .map_err(|_| pkcs8::Error::KeyMalformed)
    }
}

impl TryFrom<pkcs8::SubjectPublicKeyInfoRef<'_>> for TdpPublicKey {
    type Error = pkcs8::spki::Error;

    fn try_from(spki: pkcs8::SubjectPublicKeyInfoRef<'_>) -> pkcs8::spki::Result<Self> {
        use pkcs8::spki::Error::KeyMalformed;

        verify_algorithm_id(&spki.algorithm)?;

        let pkcs1_key = pkcs1::RsaPublicKey::from_der(
            spki.subject_public_key.as_bytes().ok_or(KeyMalformed)?,
        )
        .map_err(|_| KeyMalformed)?;

        let n = BigUint::from_bytes_be(pkcs1_key.modulus.as_bytes());
        let e = BigUint::from_bytes_be(pkcs1_key.public_exponent.as_bytes());

        TdpPublicKey::new(n, e).map_err(|_| KeyMalformed)
    }
}

impl EncodePrivateKey for TdpPrivateKey {
    fn to_pkcs8_der(&self) -> pkcs8::Result<SecretDocument> {
        let modulus = self.n().to_bytes_be();
        let public_exponent = self.e().to_bytes_be();
        let private_exponent = Zeroizing::new(self.d().to_bytes_be());
        let prime1 = Zeroizing::new(self.primes()[0].to_bytes_be());
        let prime2 = Zeroizing::new(self.primes()[1].to_bytes_be());
        let exponent1 =
            Zeroizing::new((self.d() % (&self.primes()[0] - BigUint::one())).to_bytes_be());
        let exponent2 =
            Zeroizing::new((self.d() % (&self.primes()[1] - BigUint::one())).to_bytes_be());
        let coefficient = Zeroizing::new(
            self.crt_coefficient()
                .ok_or(pkcs8::Error::KeyMalformed)?
                .to_bytes_be(),
        );

        let private_key = Zeroizing::new(
            pkcs1::RsaPrivateKey {
                modulus: pkcs1::UintRef::new(&modulus)?,
                public_exponent: pkcs1::UintRef::new(&public_exponent)?,
                private_exponent: pkcs1::UintRef::new(&private_exponent)?,
                prime1: pkcs1::UintRef::new(&prime1)?,
                prime2: pkcs1::UintRef::new(&prime2)?,
                exponent1: pkcs1::UintRef::new(&exponent1)?,
                exponent2: pkcs1::UintRef::new(&exponent2)?,
                coefficient: pkcs1::UintRef::new(&coefficient)?,
                other_prime_infos: None,
            }
            .to_der()?,
        );

        pkcs8::PrivateKeyInfo::new(pkcs1::ALGORITHM_ID, private_key.as_ref()).try_into()
    }
}

impl EncodePublicKey for TdpPublicKey {
    fn to_public_key_der(&self) -> pkcs8::spki::Result<Document> {
        let modulus = self.n().to_bytes_be();
        let public_exponent = self.e().to_bytes_be();

        let subject_public_key = pkcs1::RsaPublicKey {
            modulus: pkcs1::UintRef::new(&modulus)?,
            public_exponent: pkcs1::UintRef::new(&public_exponent)?,
        }
        .to_der()?;

        pkcs8::SubjectPublicKeyInfoRef {
            algorithm: pkcs1::ALGORITHM_ID,
            subject_public_key: BitStringRef::new(0, subject_public_key.as_ref())?,
        }
        .try_into()
    }
}
