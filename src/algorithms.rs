//! Useful algorithms.

pub(crate) mod generate;
pub(crate) mod pad;
pub(crate) mod tdp;
