use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Http2Entry {
    pub name: String,
    pub version: String,
    pub platform: String,
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Http2Buckets {
    #[serde(default)]
    pub browsers: Vec<String>,
    #[serde(default)]
    pub impersonators: Vec<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
}

/// A reference browser signature used by the impersonator rule set: the
/// literal SETTINGS/WINDOW_UPDATE/pseudo-header constants live here, in
/// data, rather than hardcoded in the analyzer.
///
/// `settings_keys` are `(id, value)` pairs that must all be present for the
/// fingerprint to be considered a match for this browser's SETTINGS shape.
/// `starts_with` additionally requires the SETTINGS string (sorted,
/// `id:value` pairs joined by `;`) to begin with the given prefix — used for
/// Safari, whose rule is "starts with `2:0`" rather than "contains".
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceSignature {
    pub name: String,
    #[serde(default)]
    pub settings_keys: Vec<(u16, u32)>,
    #[serde(default)]
    pub starts_with: Option<String>,
    pub window_update: u32,
    pub pseudo_header_order: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct Http2Catalog {
    #[serde(default)]
    signatures: HashMap<String, Http2Entry>,
    #[serde(default)]
    pub buckets: Http2Buckets,
    #[serde(default)]
    pub reference_signatures: Vec<ReferenceSignature>,
}

impl Http2Catalog {
    pub fn lookup(&self, akamai: &str) -> Option<&Http2Entry> {
        self.signatures.get(akamai)
    }

    pub fn reference(&self, name: &str) -> Option<&ReferenceSignature> {
        self.reference_signatures.iter().find(|r| r.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty() && self.reference_signatures.is_empty()
    }
}
