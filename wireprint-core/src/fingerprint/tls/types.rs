use serde::Serialize;

/// A single TLS extension as observed on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct TlsExtension {
    pub id: u16,
    pub name: String,
    /// Populated only for the extension IDs the parser dispatches on
    /// (SNI, supported_groups, ec_point_formats, signature_algorithms,
    /// ALPN, supported_versions). Other extensions are retained by ID only.
    pub payload: Option<String>,
}

/// A single cipher suite as observed on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct CipherSuite {
    pub id: u16,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct TlsFingerprint {
    pub record_version: u16,
    pub client_version: u16,
    pub negotiated_version: Option<u16>,
    pub client_random: String,
    pub session_id: String,
    pub cipher_suites: Vec<CipherSuite>,
    pub extensions: Vec<TlsExtension>,
    pub sni: Option<String>,
    pub alpn: Vec<String>,
    pub compression_methods: Vec<u8>,
    pub supported_groups: Vec<u16>,
    pub ec_point_formats: Vec<u8>,
    pub signature_algorithms: Vec<u16>,
    pub supported_versions: Vec<u16>,
    pub ja3: String,
    pub ja3_hash: String,
    pub ja4: String,
    pub ja4_r: String,
}
