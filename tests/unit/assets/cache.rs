use super::*;

use std::io::Write;

use crate::foundation::hash::content_hash;

fn temp_asset(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn resolves_local_file_with_content_hash() {
    let file = temp_asset(b"font bytes");
    let cache = AssetCache::new();

    let asset = cache.resolve(file.path().to_str().unwrap()).unwrap();
    assert_eq!(asset.bytes.as_slice(), b"font bytes");
    assert_eq!(asset.hash, content_hash(b"font bytes"));
}

#[test]
fn identical_bytes_hash_identically_across_paths() {
    let a = temp_asset(b"same");
    let b = temp_asset(b"same");
    let cache = AssetCache::new();

    let ra = cache.resolve(a.path().to_str().unwrap()).unwrap();
    let rb = cache.resolve(b.path().to_str().unwrap()).unwrap();
    assert_eq!(ra.hash, rb.hash);
}

#[test]
fn batch_reports_whether_anything_was_fetched() {
    let file = temp_asset(b"abc");
    let id = file.path().to_str().unwrap().to_string();
    let cache = AssetCache::new();

    let first = cache.resolve_batch(std::slice::from_ref(&id));
    assert!(first.fetched_new);
    let second = cache.resolve_batch(std::slice::from_ref(&id));
    assert!(!second.fetched_new);
    assert_eq!(
        second.assets[0].as_ref().unwrap().bytes,
        first.assets[0].as_ref().unwrap().bytes
    );
}

#[test]
fn failed_fetch_is_remembered_and_not_retried() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("late.ttf");
    let id = path.to_str().unwrap().to_string();
    let cache = AssetCache::new();

    assert!(cache.resolve(&id).is_none());

    // The file appearing later does not un-poison the entry.
    std::fs::write(&path, b"now it exists").unwrap();
    assert!(cache.resolve(&id).is_none());
    let batch = cache.resolve_batch(std::slice::from_ref(&id));
    assert!(!batch.fetched_new);

    // An explicit clear drops the unavailable marker.
    cache.clear();
    assert!(cache.resolve(&id).is_some());
}

#[test]
fn batch_preserves_request_order() {
    let a = temp_asset(b"first");
    let b = temp_asset(b"second");
    let ids = vec![
        a.path().to_str().unwrap().to_string(),
        "/definitely/not/a/real/path.ttf".to_string(),
        b.path().to_str().unwrap().to_string(),
    ];
    let cache = AssetCache::new();

    let out = cache.resolve_batch(&ids);
    assert_eq!(out.assets.len(), 3);
    assert_eq!(out.assets[0].as_ref().unwrap().bytes.as_slice(), b"first");
    assert!(out.assets[1].is_none());
    assert_eq!(out.assets[2].as_ref().unwrap().bytes.as_slice(), b"second");
}
