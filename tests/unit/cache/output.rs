use super::*;

use crate::{
    card::model::{OutputFormat, RenderRequest},
    foundation::hash::{Digest128, content_hash},
};

fn request(title: &str) -> RenderRequest {
    let mut req = RenderRequest::new(title);
    req.fonts = vec![];
    req
}

#[test]
fn identical_inputs_yield_identical_keys() {
    let hashes = ResolvedAssetHashes::default();
    let a = cache_key(&request("Hello"), &hashes);
    let b = cache_key(&request("Hello"), &hashes);
    assert_eq!(a, b);
}

#[test]
fn rendering_affecting_fields_change_the_key() {
    let hashes = ResolvedAssetHashes::default();
    let base = cache_key(&request("Hello"), &hashes);

    assert_ne!(base, cache_key(&request("Other"), &hashes));

    let mut req = request("Hello");
    req.quality = 50;
    assert_ne!(base, cache_key(&req, &hashes));

    let mut req = request("Hello");
    req.format = OutputFormat::Jpeg;
    assert_ne!(base, cache_key(&req, &hashes));

    let mut req = request("Hello");
    req.padding = 80.0;
    assert_ne!(base, cache_key(&req, &hashes));
}

#[test]
fn cache_dir_does_not_participate_in_the_key() {
    let hashes = ResolvedAssetHashes::default();
    let without = cache_key(&request("Hello"), &hashes);

    let mut req = request("Hello");
    req.cache_dir = Some("/tmp/some/cache".into());
    assert_eq!(without, cache_key(&req, &hashes));
}

#[test]
fn asset_content_hashes_participate_in_the_key() {
    let req = request("Hello");
    let base = cache_key(&req, &ResolvedAssetHashes::default());

    // A font that resolved to some bytes.
    let with_font = ResolvedAssetHashes {
        fonts: vec![Some(content_hash(b"font v1"))],
        ..Default::default()
    };
    let v1 = cache_key(&req, &with_font);
    assert_ne!(base, v1);

    // The same font edited in place at the same path.
    let with_new_font = ResolvedAssetHashes {
        fonts: vec![Some(content_hash(b"font v2"))],
        ..Default::default()
    };
    assert_ne!(v1, cache_key(&req, &with_new_font));

    // An unavailable font is distinct from no font at all.
    let unavailable = ResolvedAssetHashes {
        fonts: vec![None],
        ..Default::default()
    };
    assert_ne!(base, cache_key(&req, &unavailable));
}

#[test]
fn entry_paths_are_hash_dot_extension() {
    let key = Digest128 { hi: 0xabc, lo: 1 };
    let path = OutputCache::entry_path(std::path::Path::new("/cache"), key, "png");
    assert_eq!(
        path.to_str().unwrap(),
        format!("/cache/{}.png", key.to_hex())
    );
}

#[test]
fn store_then_lookup_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let cache = OutputCache::new();
    let key = content_hash(b"some request");

    assert!(cache.lookup(dir.path(), key, "png").is_none());
    cache.store(dir.path(), key, "png", b"image bytes");
    assert_eq!(
        cache.lookup(dir.path(), key, "png").unwrap(),
        b"image bytes"
    );
    // A different extension is a different entry.
    assert!(cache.lookup(dir.path(), key, "jpg").is_none());
}

#[test]
fn store_creates_the_cache_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a/b/c");
    let cache = OutputCache::new();
    let key = content_hash(b"x");

    cache.store(&nested, key, "png", b"bytes");
    assert!(cache.lookup(&nested, key, "png").is_some());
}

#[test]
fn write_failures_are_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    // A file where the cache directory should be makes creation fail.
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, b"file in the way").unwrap();

    let cache = OutputCache::new();
    let key = content_hash(b"x");
    cache.store(&blocked, key, "png", b"bytes");
    assert!(cache.lookup(&blocked, key, "png").is_none());
}
