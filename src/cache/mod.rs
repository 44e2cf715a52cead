//! The content-addressed output cache and its key derivation.

pub mod output;
