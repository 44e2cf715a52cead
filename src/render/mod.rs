//! Compositing, encoding, and the render pipeline that ties the caches
//! together.

pub mod compositor;
pub mod encode;
pub mod pipeline;
