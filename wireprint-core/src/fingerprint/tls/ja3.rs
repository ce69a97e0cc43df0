use crate::fingerprint::tls::grease::is_grease;
use crate::fingerprint::tls::types::TlsFingerprint;

/// Builds the JA3 string and its MD5 hash and writes them into `fp.ja3` /
/// `fp.ja3_hash`. JA3 fields are decimal, comma-separated across the five
/// categories, dash-separated within each list, with GREASE values removed
/// from ciphers, extensions and supported groups.
pub fn apply_ja3(fp: &mut TlsFingerprint) {
    let ciphers = fp
        .cipher_suites
        .iter()
        .map(|c| c.id)
        .filter(|id| !is_grease(*id))
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join("-");

    let extensions = fp
        .extensions
        .iter()
        .map(|e| e.id)
        .filter(|id| !is_grease(*id))
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join("-");

    let groups = fp
        .supported_groups
        .iter()
        .copied()
        .filter(|id| !is_grease(*id))
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join("-");

    let ec_point_formats = fp
        .ec_point_formats
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("-");

    let ja3 = format!(
        "{},{},{},{},{}",
        fp.client_version, ciphers, extensions, groups, ec_point_formats
    );
    let hash = md5::compute(ja3.as_bytes());
    fp.ja3_hash = format!("{hash:x}");
    fp.ja3 = ja3;
}
