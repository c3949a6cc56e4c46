//! Error types.

/// Alias for [`core::result::Result`] with the `tdp` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid prime value.
    InvalidPrime,

    /// Invalid modulus.
    InvalidModulus,

    /// Invalid public exponent.
    InvalidExponent,

    /// Modulus too large.
    ModulusTooLarge,

    /// Public exponent too small.
    PublicExponentTooSmall,

    /// Public exponent too large.
    PublicExponentTooLarge,

    /// Modulus/exponent generation failed within the retry budget.
    KeyGeneration,

    /// Key width differs from the message size the instance was configured
    /// with.
    KeySizeMismatch {
        /// Configured message size in bytes.
        expected: usize,
        /// Byte width of the imported or generated modulus.
        actual: usize,
    },

    /// Message length differs from the permutation's message size.
    InvalidInputSize {
        /// Message size of the key, in bytes.
        expected: usize,
        /// Length of the rejected input, in bytes.
        actual: usize,
    },

    /// Input value is not below the modulus.
    InputOutOfRange,

    /// Multiplicative pool constructed with size zero.
    InvalidPoolSize,

    /// Evaluation order outside the range supported by the pool.
    InvalidOrder {
        /// Requested composition order.
        order: u8,
        /// Largest order the pool supports.
        maximum: u8,
    },

    /// Value is longer than the width it should be padded to.
    InvalidPadLen,

    /// PKCS#1 error.
    Pkcs1(pkcs1::Error),

    /// PKCS#8 error.
    Pkcs8(pkcs8::Error),

    /// SPKI error raised while parsing or serializing a public key.
    Spki(pkcs8::spki::Error),

    /// Internal error.
    Internal,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidPrime => write!(f, "invalid prime value"),
            Error::InvalidModulus => write!(f, "invalid modulus"),
            Error::InvalidExponent => write!(f, "invalid public exponent"),
            Error::ModulusTooLarge => write!(f, "modulus too large"),
            Error::PublicExponentTooSmall => write!(f, "public exponent too small"),
            Error::PublicExponentTooLarge => write!(f, "public exponent too large"),
            Error::KeyGeneration => write!(f, "key generation failed"),
            Error::KeySizeMismatch { expected, actual } => write!(
                f,
                "key size mismatch: expected a {expected}-byte modulus, got {actual} bytes"
            ),
            Error::InvalidInputSize { expected, actual } => write!(
                f,
                "invalid input size: expected {expected} bytes, got {actual}"
            ),
            Error::InputOutOfRange => write!(f, "input value is not below the modulus"),
            Error::InvalidPoolSize => write!(f, "pool size must be strictly positive"),
            Error::InvalidOrder { order, maximum } => write!(
                f,
                "invalid evaluation order {order}: must be in 1..={maximum}"
            ),
            Error::InvalidPadLen => write!(f, "invalid padding length"),
            Error::Pkcs1(err) => write!(f, "{err}"),
            Error::Pkcs8(err) => write!(f, "{err}"),
            Error::Spki(err) => write!(f, "{err}"),
            Error::Internal => write!(f, "internal error"),
        }
    }
}

impl From<pkcs1::Error> for Error {
    fn from(err: pkcs1::Error) -> Error {
        Error::Pkcs1(err)
    }
}

impl From<pkcs8::Error> for Error {
    fn from(err: pkcs8::Error) -> Error {
        Error::Pkcs8(err)
    }
}

impl From<pkcs8::spki::Error> for Error {
    fn from(err: pkcs8::spki::Error) -> Error {
        Error::Spki(err)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Pkcs1(err) => Some(err),
            Error::Pkcs8(err) => Some(err),
            Error::Spki(err) => Some(err),
            _ => None,
        }
    }
}
