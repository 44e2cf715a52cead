//! Error and hashing primitives shared across the crate.

pub mod error;
pub mod hash;
