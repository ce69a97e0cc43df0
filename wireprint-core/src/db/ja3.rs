use std::collections::HashMap;

use serde::Deserialize;

/// Category a JA3 hash was catalogued under. Lookups search browsers first,
/// then libraries, bots, malware, mobile, apps — the order the catalog
/// fixes for tie-breaking when a hash appears in more than one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ja3Kind {
    Browser,
    Library,
    Bot,
    Malware,
    Mobile,
    App,
}

impl Ja3Kind {
    fn priority(self) -> u8 {
        match self {
            Ja3Kind::Browser => 0,
            Ja3Kind::Library => 1,
            Ja3Kind::Bot => 2,
            Ja3Kind::Malware => 3,
            Ja3Kind::Mobile => 4,
            Ja3Kind::App => 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ja3Entry {
    pub name: String,
    pub platform: String,
    pub version: String,
    pub kind: Ja3Kind,
}

#[derive(Debug, Deserialize, Default)]
pub struct Ja3Catalog {
    #[serde(flatten)]
    entries: HashMap<String, Vec<Ja3Entry>>,
}

impl Ja3Catalog {
    /// Returns the catalogued entry for `hash`, preferring the browser
    /// category when a hash has been observed across more than one bucket.
    pub fn lookup(&self, hash: &str) -> Option<&Ja3Entry> {
        self.entries.get(hash)?.iter().min_by_key(|e| e.kind.priority())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
