use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use crate::{
    card::model::{
        BgFit, BgPlacement, BgPosition, BorderStyle, FontStyle, LegacySize, LogicalSide,
        LogoSize, OutputFormat, PositionKeyword, RenderRequest,
    },
    foundation::hash::{Digest128, StableHasher},
};

/// Output-cache key: a stable digest over every rendering-affecting input.
pub type CacheKey = Digest128;

/// Content hashes of the resources a request referenced, as resolved by the
/// asset cache. `Some(None)` means the resource was requested but turned out
/// unavailable; that state is part of the key because it changes the output.
#[derive(Clone, Debug, Default)]
pub struct ResolvedAssetHashes {
    /// One entry per font identifier, in request order.
    pub fonts: Vec<Option<Digest128>>,
    /// Background image hash, if a background image was requested.
    pub bg_image: Option<Option<Digest128>>,
    /// Logo hash, if a logo was requested.
    pub logo: Option<Option<Digest128>>,
}

// Bumped whenever the key layout changes, so stale entries miss cleanly.
const KEY_VERSION: u8 = 1;

/// Derive the output-cache key for a request plus its resolved asset
/// content hashes.
///
/// The walk covers every field of the request except `cache_dir`, and hashes
/// asset *content*, never paths or URLs, so the key changes if and only if
/// the rendered output would change.
pub fn cache_key(request: &RenderRequest, assets: &ResolvedAssetHashes) -> CacheKey {
    let mut h = StableHasher::new();
    h.write_u8(KEY_VERSION);
    h.write_str(&request.title);
    h.write_str(&request.description);
    h.write_bool(request.dir.is_rtl());

    h.write_u32(request.bg_gradient.len() as u32);
    for stop in &request.bg_gradient {
        h.write_bytes(stop);
    }

    match &request.bg_image {
        None => h.write_u8(0),
        Some(bg) => {
            h.write_u8(1);
            write_bg_placement(&mut h, &bg.placement);
        }
    }

    match &request.border {
        None => h.write_u8(0),
        Some(b) => {
            h.write_u8(1);
            write_border(&mut h, b);
        }
    }

    h.write_f64(request.padding);

    match &request.logo {
        None => h.write_u8(0),
        Some(logo) => {
            h.write_u8(1);
            match logo.size {
                None => h.write_u8(0),
                Some(LogoSize::Width(w)) => {
                    h.write_u8(1);
                    h.write_f64(w);
                }
                Some(LogoSize::WidthHeight(w, hh)) => {
                    h.write_u8(2);
                    h.write_f64(w);
                    h.write_f64(hh);
                }
            }
        }
    }

    write_font_style(&mut h, &request.font.title);
    write_font_style(&mut h, &request.font.description);

    h.write_u8(match request.format {
        OutputFormat::Png => 0,
        OutputFormat::Jpeg => 1,
        OutputFormat::Webp => 2,
    });
    h.write_u8(request.quality);

    h.write_u32(assets.fonts.len() as u32);
    for font in &assets.fonts {
        write_opt_digest(&mut h, *font);
    }
    match assets.bg_image {
        None => h.write_u8(0),
        Some(d) => {
            h.write_u8(1);
            write_opt_digest(&mut h, d);
        }
    }
    match assets.logo {
        None => h.write_u8(0),
        Some(d) => {
            h.write_u8(1);
            write_opt_digest(&mut h, d);
        }
    }

    h.finish()
}

fn write_opt_digest(h: &mut StableHasher, d: Option<Digest128>) {
    match d {
        None => h.write_u8(0),
        Some(d) => {
            h.write_u8(1);
            h.write_u64(d.hi);
            h.write_u64(d.lo);
        }
    }
}

fn write_bg_placement(h: &mut StableHasher, placement: &BgPlacement) {
    match placement {
        BgPlacement::Legacy { size, margin, crop } => {
            h.write_u8(0);
            h.write_u8(match size {
                None => 0,
                Some(LegacySize::Cover) => 1,
                Some(LegacySize::Contain) => 2,
            });
            for m in margin {
                h.write_f64(*m);
            }
            h.write_bool(*crop);
        }
        BgPlacement::Modern { fit, position } => {
            h.write_u8(1);
            h.write_u8(match fit {
                BgFit::None => 0,
                BgFit::Cover => 1,
                BgFit::Contain => 2,
                BgFit::Fill => 3,
            });
            write_position(h, *position);
        }
    }
}

fn write_position(h: &mut StableHasher, p: BgPosition) {
    h.write_u8(keyword_tag(p.block));
    h.write_u8(keyword_tag(p.inline));
}

fn keyword_tag(k: PositionKeyword) -> u8 {
    match k {
        PositionKeyword::Start => 0,
        PositionKeyword::Center => 1,
        PositionKeyword::End => 2,
    }
}

fn write_border(h: &mut StableHasher, b: &BorderStyle) {
    h.write_bytes(&b.color);
    h.write_f64(b.width);
    h.write_u8(match b.side {
        LogicalSide::BlockStart => 0,
        LogicalSide::BlockEnd => 1,
        LogicalSide::InlineStart => 2,
        LogicalSide::InlineEnd => 3,
    });
}

fn write_font_style(h: &mut StableHasher, style: &FontStyle) {
    h.write_bytes(&style.color);
    h.write_f64(style.size);
    h.write_f64(style.line_height);
    h.write_u16(style.weight);
    h.write_u32(style.families.len() as u32);
    for family in &style.families {
        h.write_str(family);
    }
}


/// Content-addressed on-disk store for encoded card images.
///
/// Both operations are best-effort: a failed read is a miss and a failed
/// write is logged and swallowed, because caching is an optimization, never
/// a correctness requirement.
pub struct OutputCache {
    created_dirs: Mutex<HashSet<PathBuf>>,
}

impl Default for OutputCache {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputCache {
    /// Construct a cache with no directories memoized yet.
    pub fn new() -> Self {
        Self {
            created_dirs: Mutex::new(HashSet::new()),
        }
    }

    /// Path of the entry for `key` under `dir`.
    pub fn entry_path(dir: &Path, key: CacheKey, ext: &str) -> PathBuf {
        dir.join(format!("{}.{ext}", key.to_hex()))
    }

    /// Read a cached entry. Any failure, including a missing file, is a
    /// cache miss.
    pub fn lookup(&self, dir: &Path, key: CacheKey, ext: &str) -> Option<Vec<u8>> {
        std::fs::read(Self::entry_path(dir, key, ext)).ok()
    }

    /// Write a cache entry, creating the directory on first use. IO
    /// failures never propagate.
    pub fn store(&self, dir: &Path, key: CacheKey, ext: &str, bytes: &[u8]) {
        if !self.ensure_dir(dir) {
            return;
        }
        let path = Self::entry_path(dir, key, ext);
        if let Err(e) = std::fs::write(&path, bytes) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write cache entry");
        }
    }

    /// Forget which directories were created, so the next store re-checks.
    pub fn reset(&self) {
        self.created_dirs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    // Directory creation is memoized per cache instance to avoid a
    // filesystem call on every store.
    fn ensure_dir(&self, dir: &Path) -> bool {
        let mut created = self
            .created_dirs
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if created.contains(dir) {
            return true;
        }
        match std::fs::create_dir_all(dir) {
            Ok(()) => {
                created.insert(dir.to_path_buf());
                true
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to create cache dir");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/output.rs"]
mod tests;
