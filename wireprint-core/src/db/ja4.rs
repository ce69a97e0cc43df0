use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    Low,
    Medium,
    High,
}

/// Entry keyed by the 4-char JA4 prefix (`t13d`, `t12i`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Ja4PrefixEntry {
    pub description: String,
    pub client_type: String,
    pub risk: Risk,
}

/// A full JA4 string observed often enough to catalog directly, taking
/// priority over the coarser prefix-only lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct Ja4KnownEntry {
    pub name: String,
    pub platform: String,
    pub risk: Risk,
}

#[derive(Debug, Deserialize, Default)]
pub struct Ja4Catalog {
    #[serde(default)]
    prefixes: HashMap<String, Ja4PrefixEntry>,
    #[serde(default)]
    known: HashMap<String, Ja4KnownEntry>,
}

impl Ja4Catalog {
    pub fn lookup_known(&self, ja4: &str) -> Option<&Ja4KnownEntry> {
        self.known.get(ja4)
    }

    pub fn lookup_prefix(&self, ja4: &str) -> Option<&Ja4PrefixEntry> {
        let prefix = ja4.get(..4)?;
        self.prefixes.get(prefix)
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.known.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_lookup_uses_first_four_chars() {
        let json = r#"{
            "prefixes": { "t13d": { "description": "TLS1.3, domain SNI", "client_type": "browser", "risk": "low" } },
            "known": {}
        }"#;
        let catalog: Ja4Catalog = serde_json::from_str(json).unwrap();
        let entry = catalog.lookup_prefix("t13d1516h2_8daaf6152771_b0da82dd1658").unwrap();
        assert_eq!(entry.client_type, "browser");
    }
}
