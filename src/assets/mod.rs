//! Resource loading: the asset cache, image decoding, and the font index.

pub mod cache;
pub mod decode;
pub mod fonts;
