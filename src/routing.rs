//! Slug derivation and per-page dispatch for card endpoints.
//!
//! Static-site generators hand over a map of page identifiers (source file
//! paths) to page data. This module derives one image slug per page and
//! finds the page entry a requested slug belongs to; how page data turns
//! into a [`RenderRequest`] stays with the caller.

use crate::{
    card::model::RenderRequest,
    foundation::error::CardResult,
    render::pipeline::CardRenderer,
};

/// Derive the default image slug for a page identifier.
///
/// Strips a leading `/src/pages` source root, swaps the file extension for
/// `.png`, and collapses a trailing `/index.png` into the parent slug:
/// `/src/pages/blog/post/index.md` becomes `/blog/post.png`.
pub fn default_slug(page_path: &str) -> String {
    let mut slug = page_path
        .strip_prefix("/src/pages")
        .unwrap_or(page_path)
        .to_string();
    let last_segment = slug.rfind('/').map_or(0, |i| i + 1);
    if let Some(dot) = slug[last_segment..].rfind('.') {
        slug.truncate(last_segment + dot);
    }
    slug.push_str(".png");
    if let Some(parent) = slug.strip_suffix("/index.png")
        && !parent.is_empty()
    {
        slug = format!("{parent}.png");
    }
    slug
}

/// Page-to-slug routing table.
///
/// Holds the page entries in their given order; lookup is first match by
/// slug equality, so duplicate slugs resolve to the earliest entry.
pub struct PageRoutes<P> {
    entries: Vec<(String, P)>,
    slug_fn: Box<dyn Fn(&str, &P) -> String + Send + Sync>,
}

impl<P> PageRoutes<P> {
    /// Build a routing table using [`default_slug`].
    pub fn new(entries: Vec<(String, P)>) -> Self {
        Self::with_slug_fn(entries, |path, _| default_slug(path))
    }

    /// Build a routing table with a caller-supplied slug function, e.g. to
    /// emit `.jpg` slugs for JPEG cards.
    pub fn with_slug_fn(
        entries: Vec<(String, P)>,
        slug_fn: impl Fn(&str, &P) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            entries,
            slug_fn: Box::new(slug_fn),
        }
    }

    /// Every output slug, in entry order.
    pub fn slugs(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(path, page)| (self.slug_fn)(path, page))
            .collect()
    }

    /// Find the page entry whose slug equals `slug`.
    pub fn find(&self, slug: &str) -> Option<(&str, &P)> {
        self.entries
            .iter()
            .find(|(path, page)| (self.slug_fn)(path, page) == slug)
            .map(|(path, page)| (path.as_str(), page))
    }

    /// Render the card for `slug`, or `Ok(None)` when no page entry
    /// matches. `to_request` maps the matched page entry to render options.
    pub fn render_for_slug(
        &self,
        renderer: &mut CardRenderer,
        slug: &str,
        to_request: impl FnOnce(&str, &P) -> RenderRequest,
    ) -> CardResult<Option<Vec<u8>>> {
        let Some((path, page)) = self.find(slug) else {
            tracing::debug!(slug, "no page entry for slug");
            return Ok(None);
        };
        let request = to_request(path, page);
        renderer.render(&request).map(Some)
    }
}

#[cfg(test)]
#[path = "../tests/unit/routing.rs"]
mod tests;
