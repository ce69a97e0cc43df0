use std::fs;

use tempfile::tempdir;
use wireprint_core::db::FingerprintDatabase;

#[test]
fn loads_all_three_catalogs_from_disk() {
    let dir = tempdir().unwrap();

    fs::write(
        dir.path().join("ja3.json"),
        r#"{
            "abcd1234": [
                {"name": "Chrome", "platform": "any", "version": "124", "kind": "browser"}
            ]
        }"#,
    )
    .unwrap();

    fs::write(
        dir.path().join("ja4.json"),
        r#"{
            "prefixes": {
                "t13d": {"description": "TLS 1.3, no SNI, ciphers descending", "client_type": "bot", "risk": "high"}
            },
            "known": {
                "t13d1516h2_8daaf6152771_02713d6af862": {"name": "Chrome 124", "platform": "any", "risk": "low"}
            }
        }"#,
    )
    .unwrap();

    fs::write(
        dir.path().join("http2.json"),
        r#"{
            "signatures": {},
            "buckets": {"browsers": ["Chrome"], "impersonators": [], "libraries": []},
            "reference_signatures": [
                {
                    "name": "Chrome",
                    "settings_keys": [[1, 65536], [3, 1000]],
                    "window_update": 15663105,
                    "pseudo_header_order": "m,a,s,p"
                }
            ]
        }"#,
    )
    .unwrap();

    let db = FingerprintDatabase::load(dir.path());

    assert!(db.ja3.lookup("abcd1234").is_some());
    assert!(db.ja4.lookup_known("t13d1516h2_8daaf6152771_02713d6af862").is_some());
    assert!(!db.http2.is_empty());
    assert!(db.http2.reference("Chrome").is_some());
}

#[test]
fn missing_catalog_files_degrade_to_empty_without_failing() {
    let dir = tempdir().unwrap();

    let db = FingerprintDatabase::load(dir.path());

    assert!(db.ja3.is_empty());
    assert!(db.ja4.is_empty());
    assert!(db.http2.is_empty());
}

#[test]
fn malformed_catalog_file_degrades_to_empty_without_failing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("ja3.json"), "not valid json").unwrap();

    let db = FingerprintDatabase::load(dir.path());

    assert!(db.ja3.is_empty());
}
