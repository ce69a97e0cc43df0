use serde::Serialize;

use crate::fingerprint::CombinedFingerprint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub risk_level: RiskLevel,
    /// Coarse label for how unusual this combination of signals is.
    pub uniqueness: String,
    pub detected_client: String,
    pub detected_os: String,
    pub is_bot: bool,
    pub is_spoofed: bool,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TlsAnalysis {
    pub protocol: String,
    pub client_type: String,
    pub client_name: String,
    pub client_version: Option<String>,
    pub ja3_popularity: String,
    pub ja4_popularity: String,
    pub cipher_strength: String,
    pub observations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Http2Analysis {
    pub detected: bool,
    pub client_match: Option<String>,
    pub is_impersonator: bool,
    pub impersonator_type: Option<String>,
    pub observations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TcpAnalysis {
    pub detected: bool,
    pub inferred_os: Option<String>,
    pub os_confidence: Option<String>,
    pub ttl_analysis: Option<String>,
    pub observations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyCheck {
    pub passed: bool,
    pub score: u8,
    pub anomalies: Vec<String>,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdviceItem {
    pub category: String,
    pub title: String,
    pub description: String,
    pub priority: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecurityAdvice {
    pub overall_risk: RiskLevel,
    pub for_defenders: Vec<AdviceItem>,
    pub for_pentesters: Vec<AdviceItem>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub summary: Summary,
    pub tls_analysis: TlsAnalysis,
    pub http2_analysis: Option<Http2Analysis>,
    pub tcp_analysis: Option<TcpAnalysis>,
    pub consistency_check: ConsistencyCheck,
    pub security_advice: SecurityAdvice,
    pub raw_fingerprint: CombinedFingerprint,
}

/// A browser declaring itself, parsed from the User-Agent header. Feeds the
/// consistency checker and client-type scoring; never fed back into
/// anything that must be deterministic from wire bytes alone.
#[derive(Debug, Clone, Default)]
pub struct ParsedUserAgent {
    pub raw: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub is_mobile: bool,
    pub is_library: bool,
    pub library_name: Option<String>,
    pub self_identifies_as_bot: bool,
}

// --- JSON response shape for GET /api/analysis ---

#[derive(Debug, Clone, Serialize)]
pub struct ClientSummary {
    #[serde(rename = "type")]
    pub kind: String,
    pub claimed: String,
    pub detected: String,
    #[serde(rename = "match")]
    pub matched: bool,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct FingerprintSummary {
    pub ja3: Option<String>,
    pub ja4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_os: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimpleAnalysisResult {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub is_bot: bool,
    pub is_spoofed: bool,
    pub client: ClientSummary,
    pub fingerprints: FingerprintSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<AnalysisResult>,
}
