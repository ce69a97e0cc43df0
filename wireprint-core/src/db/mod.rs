//! Fingerprint Database: load-once, read-many reference catalogs for the
//! analyzer. A missing or unparseable catalog file disables that class of
//! lookups; it never fails startup.

pub mod http2;
pub mod ja3;
pub mod ja4;

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::warn;

pub use http2::Http2Catalog;
pub use ja3::Ja3Catalog;
pub use ja4::Ja4Catalog;

#[derive(Debug, Default)]
pub struct FingerprintDatabase {
    pub ja3: Ja3Catalog,
    pub ja4: Ja4Catalog,
    pub http2: Http2Catalog,
}

impl FingerprintDatabase {
    /// Loads every catalog from `dir`, logging once at warn level for each
    /// file that is absent or fails to parse and falling back to an empty
    /// catalog for it.
    pub fn load(dir: &Path) -> Self {
        FingerprintDatabase {
            ja3: load_catalog(&dir.join("ja3.json")).unwrap_or_default(),
            ja4: load_catalog(&dir.join("ja4.json")).unwrap_or_default(),
            http2: load_catalog(&dir.join("http2.json")).unwrap_or_default(),
        }
    }
}

fn load_catalog<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "fingerprint catalog missing, disabling its lookups");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "fingerprint catalog unparseable, disabling its lookups");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_missing_dir_yields_empty_catalogs() {
        let db = FingerprintDatabase::load(Path::new("/nonexistent/path/for/tests"));
        assert!(db.ja3.is_empty());
        assert!(db.ja4.is_empty());
        assert!(db.http2.is_empty());
    }
}
