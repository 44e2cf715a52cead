use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x6f67_6361_7264_2d31;

/// Stable 128-bit digest used for asset content hashes and output-cache keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Digest128 {
    /// High 64 bits of the digest.
    pub hi: u64,
    /// Low 64 bits of the digest.
    pub lo: u64,
}

impl Digest128 {
    /// Render the digest as a fixed-width lowercase hex string.
    pub fn to_hex(self) -> String {
        format!("{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Hash raw resource bytes. Content-addressed: two resources with identical
/// bytes hash identically regardless of where they were loaded from.
pub fn content_hash(bytes: &[u8]) -> Digest128 {
    let mut h = StableHasher::new();
    h.write_bytes(bytes);
    h.finish()
}

/// Structural hasher with a fixed seed and explicit little-endian encodings,
/// so digests are stable across platforms and process runs.
pub(crate) struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    pub(crate) fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    pub(crate) fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    pub(crate) fn write_u16(&mut self, v: u16) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        // Length-prefixed so adjacent strings cannot alias.
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    pub(crate) fn finish(self) -> Digest128 {
        let v = self.inner.digest128();
        Digest128 {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}
