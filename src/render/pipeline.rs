use crate::{
    assets::cache::AssetCache,
    assets::decode::{DecodedImage, decode_image},
    assets::fonts::FontResolver,
    cache::output::{OutputCache, ResolvedAssetHashes, cache_key},
    card::model::RenderRequest,
    foundation::error::{CardError, CardResult},
    render::{compositor, encode::encode_frame},
};

/// Counters describing how the renderer satisfied its requests so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Requests that went through compositing and encoding.
    pub renders: u64,
    /// Requests served from the output cache.
    pub cache_hits: u64,
}

/// The card rendering engine.
///
/// Owns the asset cache, the font index, and the output cache, so repeated
/// renders amortize resource fetching, font registration, and encoding.
/// One instance is meant to serve a whole batch of pages.
pub struct CardRenderer {
    assets: AssetCache,
    fonts: FontResolver,
    output: OutputCache,
    stats: RenderStats,
}

impl Default for CardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CardRenderer {
    /// Construct a renderer with empty caches.
    pub fn new() -> Self {
        Self {
            assets: AssetCache::new(),
            fonts: FontResolver::new(),
            output: OutputCache::new(),
            stats: RenderStats::default(),
        }
    }

    /// Counters accumulated since construction or the last [`reset`].
    ///
    /// [`reset`]: Self::reset
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Font family names registered so far, for diagnostics.
    pub fn font_families(&self) -> &[String] {
        self.fonts.family_names()
    }

    /// Drop every cached asset, registered font, and counter. On-disk
    /// output entries are left in place; they re-validate by content hash.
    pub fn reset(&mut self) {
        self.assets.clear();
        self.fonts.reset();
        self.output.reset();
        self.stats = RenderStats::default();
    }

    /// Render one card to encoded image bytes.
    ///
    /// Resolves fonts and images through the asset cache, consults the
    /// output cache when the request names a `cache_dir`, and composites
    /// and encodes only on a miss.
    #[tracing::instrument(skip_all, fields(title = %request.title))]
    pub fn render(&mut self, request: &RenderRequest) -> CardResult<Vec<u8>> {
        if request.bg_gradient.is_empty() {
            return Err(CardError::validation(
                "background gradient needs at least one color stop",
            ));
        }

        // Registration is unconditional: the asset cache namespace is shared
        // with images, so an identifier first cached as an image would report
        // nothing newly fetched even when the resolver has never seen it.
        // The resolver de-dupes per identifier, so repeats cost a set lookup.
        let font_batch = self.assets.resolve_batch(&request.fonts);
        self.fonts.register_new(&request.fonts, &font_batch.assets);

        let bg_asset = request
            .bg_image
            .as_ref()
            .map(|bg| self.assets.resolve(&bg.path));
        let logo_asset = request.logo.as_ref().map(|l| self.assets.resolve(&l.path));

        let hashes = ResolvedAssetHashes {
            fonts: font_batch
                .assets
                .iter()
                .map(|a| a.as_ref().map(|a| a.hash))
                .collect(),
            bg_image: bg_asset.as_ref().map(|a| a.as_ref().map(|a| a.hash)),
            logo: logo_asset.as_ref().map(|a| a.as_ref().map(|a| a.hash)),
        };
        let key = cache_key(request, &hashes);
        let ext = request.format.extension();

        let cache_dir = request.cache_dir.as_deref();
        if let Some(dir) = cache_dir
            && let Some(bytes) = self.output.lookup(dir, key, ext)
        {
            tracing::debug!(key = %key.to_hex(), "output cache hit");
            self.stats.cache_hits += 1;
            return Ok(bytes);
        }

        let bg_image = decode_optional(bg_asset.as_ref(), "background image");
        let logo = decode_optional(logo_asset.as_ref(), "logo");

        let frame = compositor::compose(
            request,
            bg_image.as_ref(),
            logo.as_ref(),
            &mut self.fonts,
        )?;
        let bytes = encode_frame(&frame, request.format, request.quality)?;
        self.stats.renders += 1;

        if let Some(dir) = cache_dir {
            self.output.store(dir, key, ext, &bytes);
        }
        Ok(bytes)
    }
}

// A missing or undecodable image degrades to an omitted element; the card
// still renders with its remaining layers.
fn decode_optional(
    asset: Option<&Option<crate::assets::cache::ResolvedAsset>>,
    what: &str,
) -> Option<DecodedImage> {
    let asset = asset?.as_ref()?;
    match decode_image(&asset.bytes) {
        Ok(img) => Some(img),
        Err(e) => {
            tracing::error!(error = %e, "failed to decode {what}, skipping");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
