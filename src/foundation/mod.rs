//! Shared primitives: time windows, clock formatting and the crate error type.

pub(crate) mod core;
pub(crate) mod error;
