//! Shared fixture builders for the end-to-end scenario tests. Hand-built
//! `CombinedFingerprint` pieces, not byte-level captures — the wire-format
//! parsers have their own fixtures under `tests/fingerprint/`.

use wireprint_core::db::FingerprintDatabase;
use wireprint_core::fingerprint::http2::types::{Http2Fingerprint, SettingEntry};
use wireprint_core::fingerprint::tcp::{fingerprint_syn, RawSyn, TcpFingerprint};
use wireprint_core::fingerprint::tls::types::{CipherSuite, TlsExtension, TlsFingerprint};

/// A TLS fingerprint with enough browser-shaped signals (cipher/extension
/// counts, GREASE, dual ALPN, SNI, browser-only extension, supported
/// versions/sig-algs counts) to classify as `Browser` by the scoring rubric
/// in `analyzer::tls_analysis`.
pub fn browser_like_tls(sni: Option<&str>) -> TlsFingerprint {
    let mut cipher_suites: Vec<CipherSuite> = (0..22)
        .map(|i| CipherSuite { id: 0x1000 + i, name: format!("TLS_CIPHER_{i}") })
        .collect();
    cipher_suites.push(CipherSuite { id: 0x0a0a, name: "GREASE".to_string() });
    cipher_suites.push(CipherSuite { id: 0x1302, name: "TLS_AES_256_GCM_SHA384".to_string() });

    let mut extensions: Vec<TlsExtension> = (0..12)
        .map(|i| TlsExtension { id: 100 + i, name: format!("ext_{i}"), payload: None })
        .collect();
    extensions.push(TlsExtension { id: 0x4469, name: "encrypted_client_hello".to_string(), payload: None });

    TlsFingerprint {
        record_version: 0x0301,
        client_version: 0x0303,
        negotiated_version: Some(0x0304),
        cipher_suites,
        extensions,
        sni: sni.map(str::to_string),
        alpn: vec!["h2".to_string(), "http/1.1".to_string()],
        supported_groups: vec![0x001d, 0x0017],
        ec_point_formats: vec![0],
        signature_algorithms: (0..10).map(|i| 0x0400 + i).collect(),
        supported_versions: vec![0x0304, 0x0303, 0x0302, 0x0301],
        ..Default::default()
    }
}

/// A library-shaped TLS fingerprint: few ciphers, no ALPN, no SNI — the
/// shape `python-requests` and similar HTTP clients produce.
pub fn library_like_tls() -> TlsFingerprint {
    let cipher_suites = (0..7).map(|i| CipherSuite { id: 0x1000 + i, name: format!("TLS_CIPHER_{i}") }).collect();
    TlsFingerprint {
        record_version: 0x0301,
        client_version: 0x0303,
        negotiated_version: Some(0x0303),
        cipher_suites,
        extensions: Vec::new(),
        sni: None,
        alpn: Vec::new(),
        ..Default::default()
    }
}

pub fn chrome_http2(pseudo_header_order: &str) -> Http2Fingerprint {
    Http2Fingerprint {
        settings: vec![
            SettingEntry { id: 1, name: "HEADER_TABLE_SIZE".into(), value: 65536 },
            SettingEntry { id: 2, name: "ENABLE_PUSH".into(), value: 0 },
            SettingEntry { id: 4, name: "INITIAL_WINDOW_SIZE".into(), value: 6_291_456 },
            SettingEntry { id: 6, name: "MAX_HEADER_LIST_SIZE".into(), value: 262_144 },
        ],
        window_update: 15_663_105,
        pseudo_header_order: pseudo_header_order.to_string(),
        akamai: format!("1:65536;2:0;4:6291456;6:262144|15663105|0|{pseudo_header_order}"),
        ..Default::default()
    }
}

/// TCP SYN with no options — the macOS-shaped `window=65535` p0f signature.
pub fn tcp_macos(observed_ttl: u8, window: u16) -> TcpFingerprint {
    fingerprint_syn(&RawSyn { observed_ttl, ip_version: 4, window, ..Default::default() })
}

/// TCP SYN carrying a timestamp option — the signal `infer_os` needs to
/// distinguish Linux/Android from the bare `64 => Linux/Unix` fallback.
pub fn tcp_with_timestamp(observed_ttl: u8, window: u16) -> TcpFingerprint {
    let mut options = vec![2, 4, 0x05, 0xb4, 1, 1, 3, 3, 7];
    options.extend_from_slice(&[8, 10, 0, 1, 0x86, 0xa0, 0, 0, 0, 0]);
    fingerprint_syn(&RawSyn { observed_ttl, ip_version: 4, window, options, ..Default::default() })
}

/// An HTTP/2 catalog with the Chrome/Safari/Firefox reference signatures the
/// impersonator rule set (R1-R7) evaluates against, same fixture shape as
/// `analyzer::http2_analysis`'s own unit tests.
pub fn db_with_http2_references() -> FingerprintDatabase {
    let json = r#"{
        "signatures": {},
        "buckets": {"browsers": [], "impersonators": [], "libraries": []},
        "reference_signatures": [
            {"name": "chrome", "settings_keys": [[4, 6291456], [6, 262144]], "window_update": 15663105, "pseudo_header_order": "m,a,s,p"},
            {"name": "safari", "settings_keys": [[9, 1]], "starts_with": "2:0", "window_update": 10420225, "pseudo_header_order": "m,s,a"},
            {"name": "firefox", "settings_keys": [[4, 131072], [5, 16384]], "window_update": 12517377, "pseudo_header_order": "m,p,a,s"}
        ]
    }"#;
    FingerprintDatabase { http2: serde_json::from_str(json).unwrap(), ..Default::default() }
}

/// Same HTTP/2 catalog, plus a JA3 entry that resolves to "Chrome" — lets a
/// scenario exercise the Edge-uses-Chrome consistency exception for real,
/// through a database lookup rather than a hand-set `client_name`.
pub fn db_with_chrome_ja3(ja3_hash: &str) -> FingerprintDatabase {
    let mut db = db_with_http2_references();
    let json = format!(
        r#"{{ "{ja3_hash}": [{{"name": "Chrome", "platform": "any", "version": "124", "kind": "browser"}}] }}"#
    );
    db.ja3 = serde_json::from_str(&json).unwrap();
    db
}
