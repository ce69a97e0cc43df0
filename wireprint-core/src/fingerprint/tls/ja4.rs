use sha2::{Digest, Sha256};

use crate::fingerprint::tls::grease::is_grease;
use crate::fingerprint::tls::types::TlsFingerprint;

const EXT_SNI: u16 = 0;
const EXT_ALPN: u16 = 16;

fn version_code(version: u16) -> &'static str {
    match version {
        0x0304 => "13",
        0x0303 => "12",
        0x0302 => "11",
        0x0301 => "10",
        _ => "00",
    }
}

fn two_digit(count: usize) -> String {
    format!("{:02}", count.min(99))
}

/// Builds the JA4 prefix (`t<ver><sni><cc><ec><alpn>`) common to both JA4 and
/// JA4_r, plus the sorted, GREASE-stripped cipher and extension lists used by
/// both the hashed (JA4) and raw (JA4_r) bodies.
struct Ja4Parts {
    prefix: String,
    ciphers_hex: Vec<String>,
    ext_hex: Vec<String>,
    sigalgs_hex: Vec<String>,
}

fn build_parts(fp: &TlsFingerprint) -> Ja4Parts {
    let version = fp.negotiated_version.unwrap_or(fp.record_version);
    let sni_flag = if fp.sni.is_some() { 'd' } else { 'i' };

    let mut ciphers: Vec<u16> = fp
        .cipher_suites
        .iter()
        .map(|c| c.id)
        .filter(|id| !is_grease(*id))
        .collect();
    ciphers.sort_unstable();
    let cc = two_digit(ciphers.len());

    let mut ext_ids: Vec<u16> = fp
        .extensions
        .iter()
        .map(|e| e.id)
        .filter(|id| !is_grease(*id))
        .collect();
    let ec = two_digit(ext_ids.len());
    ext_ids.retain(|id| *id != EXT_SNI && *id != EXT_ALPN);
    ext_ids.sort_unstable();

    let alpn = fp
        .alpn
        .first()
        .map(|a| {
            let mut chars = a.chars();
            let c1 = chars.next().unwrap_or('0');
            let c2 = chars.next().unwrap_or('0');
            format!("{c1}{c2}")
        })
        .unwrap_or_else(|| "00".to_string());

    let prefix = format!("t{}{}{}{}{}", version_code(version), sni_flag, cc, ec, alpn);

    let ciphers_hex = ciphers.iter().map(|id| format!("{id:04x}")).collect();
    let ext_hex: Vec<String> = ext_ids.iter().map(|id| format!("{id:04x}")).collect();
    let mut sigalgs: Vec<u16> = fp.signature_algorithms.clone();
    sigalgs.sort_unstable();
    let sigalgs_hex: Vec<String> = sigalgs.iter().map(|a| format!("{a:04x}")).collect();

    Ja4Parts {
        prefix,
        ciphers_hex,
        ext_hex,
        sigalgs_hex,
    }
}

fn truncated_sha256(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)[..12].to_string()
}

/// Derives JA4 (`t<ver><sni><cc><ec><alpn>_<ciphers-hash>_<extensions-hash>`)
/// and its raw, human-readable companion JA4_r (same prefix, with the actual
/// sorted cipher/extension/signature-algorithm lists spelled out instead of
/// hashed) and writes both into `fp`.
pub fn apply_ja4(fp: &mut TlsFingerprint) {
    let parts = build_parts(fp);

    let ciphers_joined = parts.ciphers_hex.join(",");
    let ext_joined = format!("{}_{}", parts.ext_hex.join(","), parts.sigalgs_hex.join(","));

    let h1 = truncated_sha256(&ciphers_joined);
    let h2 = truncated_sha256(&ext_joined);
    fp.ja4 = format!("{}_{}_{}", parts.prefix, h1, h2);
    fp.ja4_r = format!("{}_{}_{}", parts.prefix, ciphers_joined, ext_joined);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::tls::types::CipherSuite;

    #[test]
    fn ja4_prefix_matches_expected_grammar() {
        let mut fp = TlsFingerprint {
            record_version: 0x0301,
            negotiated_version: Some(0x0304),
            sni: Some("example.com".to_string()),
            alpn: vec!["h2".to_string()],
            cipher_suites: vec![
                CipherSuite { id: 0x1301, name: "a".into() },
                CipherSuite { id: 0x0a0a, name: "grease".into() },
            ],
            ..Default::default()
        };
        apply_ja4(&mut fp);
        assert!(fp.ja4.starts_with("t13d01"));
        assert_eq!(fp.ja4.matches('_').count(), 2);
    }

    #[test]
    fn ja4_r_contains_raw_cipher_list_not_a_hash() {
        let mut fp = TlsFingerprint {
            negotiated_version: Some(0x0303),
            cipher_suites: vec![CipherSuite { id: 0x1301, name: "a".into() }],
            ..Default::default()
        };
        apply_ja4(&mut fp);
        assert!(fp.ja4_r.contains("1301"));
    }
}
