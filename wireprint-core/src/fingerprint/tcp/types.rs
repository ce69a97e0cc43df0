use serde::Serialize;

/// Confidence the OS-inference table attaches to its guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// A single TCP option as observed on the wire, in transmission order.
#[derive(Debug, Clone, Serialize)]
pub struct TcpOptionEntry {
    pub kind: u8,
    pub name: String,
    /// Populated only for options whose payload the parser decodes
    /// (MSS, Window Scale, Timestamp, SACK).
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct TcpFingerprint {
    pub observed_ttl: u8,
    /// Rounded up to the next of `{32, 64, 128, 255}`.
    pub initial_ttl: u8,
    pub ip_version: u8,
    pub ip_flags: u8,
    pub window: u16,
    pub mss: Option<u16>,
    pub window_scale: Option<u8>,
    pub options: Vec<TcpOptionEntry>,
    /// One character per option, wire order: `M<mss>`, `W<scale>`, `S`, `K`,
    /// `T`, `N`. Empty when no options were captured.
    pub options_str: String,
    pub ts_val: Option<u32>,
    pub ts_ecr: Option<u32>,
    /// Best-effort, informational only (see module doc).
    pub estimated_uptime: Option<String>,
    /// MD5 over `<ipver>:<initial_ttl>:<options_str>:<window>:<ip_flags>`.
    pub signature_hash: String,
    pub inferred_os: String,
    pub confidence: Option<Confidence>,
    /// Anomalies local to this layer (malformed/unusual option sequences),
    /// separate from the cross-layer anomalies the analyzer produces.
    pub anomalies: Vec<String>,
}
