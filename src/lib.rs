//! Cardkit renders fixed-size social preview cards (OG images) on the CPU.
//!
//! A [`RenderRequest`] describes one card: title and description text, a
//! background gradient and optional background image, an optional border and
//! logo, fonts, and an output format. [`CardRenderer::render`] turns it into
//! encoded image bytes on a 1200x630 canvas.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: fonts and images load through the [`AssetCache`], which
//!    content-hashes every resource and never fetches the same identifier
//!    twice.
//! 2. **Look up**: a stable key over the request plus resolved content
//!    hashes is checked against the on-disk [`OutputCache`].
//! 3. **Compose**: on a miss, geometry is solved and the card is drawn in
//!    fixed z-order (gradient, background image, border, logo, text).
//! 4. **Encode**: the frame is written as PNG, JPEG, or WebP and stored
//!    back in the output cache.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Explicit caches**: all cached state lives in objects owned by the
//!   [`CardRenderer`], each with a reset operation; nothing is process
//!   global.
//! - **Graceful degradation**: an unavailable font or image omits that
//!   element instead of failing the render.
//!
//! # Getting started
//!
//! ```no_run
//! use cardkit::{CardRenderer, RenderRequest};
//!
//! let mut renderer = CardRenderer::new();
//! let mut request = RenderRequest::new("Hello, world!");
//! request.description = "An introduction to greeting planets.".into();
//! let png_bytes = renderer.render(&request)?;
//! # Ok::<(), cardkit::CardError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod cache;
mod card;
mod foundation;
mod layout;
mod render;

/// Slug derivation and page-to-slug dispatch for card endpoints.
pub mod routing;

pub use assets::cache::{AssetCache, BatchOutcome, ResolvedAsset};
pub use assets::decode::{DecodedImage, decode_image};
pub use assets::fonts::{FontResolver, TextBrush};
pub use cache::output::{CacheKey, OutputCache, ResolvedAssetHashes, cache_key};
pub use card::model::{
    BackgroundImage, BgFit, BgPlacement, BgPosition, BorderStyle, Direction, FontOverrides,
    FontStyle, LegacySize, LogicalSide, Logo, LogoSize, OutputFormat, PositionKeyword,
    RenderRequest, RgbColor,
};
pub use foundation::error::{CardError, CardResult};
pub use foundation::hash::{Digest128, content_hash};
pub use layout::geometry::{
    BgGeometry, CANVAS_HEIGHT, CANVAS_WIDTH, Margins, PhysicalSide, background_placement,
    logo_placement, physical_side,
};
pub use render::compositor::FrameRgba;
pub use render::encode::encode_frame;
pub use render::pipeline::{CardRenderer, RenderStats};
