use sha2::{Digest, Sha256};

/// Incremental SHA-256 over typed fields, used to name cached renders.
///
/// Floats are hashed by their bit pattern so equal inputs always produce
/// equal keys.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, value: &str) -> Self {
        self.hasher.update((value.len() as u64).to_le_bytes());
        self.hasher.update(value.as_bytes());
        self
    }

    pub fn uint(mut self, value: u64) -> Self {
        self.hasher.update(value.to_le_bytes());
        self
    }

    pub fn float(mut self, value: f64) -> Self {
        self.hasher.update(value.to_bits().to_le_bytes());
        self
    }

    pub fn finish(self) -> String {
        format!("{:x}", self.hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_and_order_sensitive() {
        let a = Fingerprint::new().uint(1).float(2.5).text("osm").finish();
        let b = Fingerprint::new().uint(1).float(2.5).text("osm").finish();
        let c = Fingerprint::new().float(2.5).uint(1).text("osm").finish();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn text_boundaries_are_unambiguous() {
        let a = Fingerprint::new().text("ab").text("c").finish();
        let b = Fingerprint::new().text("a").text("bc").finish();
        assert_ne!(a, b);
    }
}
