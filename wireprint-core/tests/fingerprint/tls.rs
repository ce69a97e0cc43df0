//! Byte-level TLS ClientHello fixtures, built the way
//! `benches/bench_fingerprinting.rs` builds them, exercised through the
//! real parser + JA3/JA4 derivation pipeline.

use wireprint_core::fingerprint::tls::fingerprint_client_hello;

const EXT_SERVER_NAME: u16 = 0;
const EXT_SIGNATURE_ALGORITHMS: u16 = 13;

/// A record layer advertising TLS 1.0 (`0x0301`) around a TLS 1.2 (`0x0303`)
/// ClientHello body — the two numbers real captures commonly disagree on.
/// `sig_algs` lets callers pick an unsorted signature-algorithm list.
fn client_hello_with_versions(record_version: u16, client_version: u16, sig_algs: &[u16]) -> Vec<u8> {
    let mut handshake_body = Vec::new();
    handshake_body.extend_from_slice(&client_version.to_be_bytes());
    handshake_body.extend_from_slice(&[0u8; 32]);
    handshake_body.push(0); // session_id_len

    let ciphers: [u16; 2] = [0x1301, 0xc02f];
    handshake_body.extend_from_slice(&((ciphers.len() * 2) as u16).to_be_bytes());
    for c in ciphers {
        handshake_body.extend_from_slice(&c.to_be_bytes());
    }
    handshake_body.push(1); // compression methods len
    handshake_body.push(0);

    let mut extensions = Vec::new();

    let host = b"example.com";
    let mut sni_payload = Vec::new();
    sni_payload.extend_from_slice(&((host.len() + 3) as u16).to_be_bytes());
    sni_payload.push(0);
    sni_payload.extend_from_slice(&(host.len() as u16).to_be_bytes());
    sni_payload.extend_from_slice(host);
    extensions.extend_from_slice(&EXT_SERVER_NAME.to_be_bytes());
    extensions.extend_from_slice(&(sni_payload.len() as u16).to_be_bytes());
    extensions.extend_from_slice(&sni_payload);

    if !sig_algs.is_empty() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&((sig_algs.len() * 2) as u16).to_be_bytes());
        for a in sig_algs {
            payload.extend_from_slice(&a.to_be_bytes());
        }
        extensions.extend_from_slice(&EXT_SIGNATURE_ALGORITHMS.to_be_bytes());
        extensions.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        extensions.extend_from_slice(&payload);
    }

    handshake_body.extend_from_slice(&(extensions.len() as u16).to_be_bytes());
    handshake_body.extend_from_slice(&extensions);

    let mut record = Vec::new();
    record.push(22);
    record.extend_from_slice(&record_version.to_be_bytes());
    let mut handshake = Vec::new();
    handshake.push(1);
    handshake.extend_from_slice(&(handshake_body.len() as u32).to_be_bytes()[1..]);
    handshake.extend_from_slice(&handshake_body);
    record.extend_from_slice(&(handshake.len() as u16).to_be_bytes());
    record.extend_from_slice(&handshake);
    record
}

#[test]
fn ja3_uses_handshake_client_version_not_record_version() {
    let data = client_hello_with_versions(0x0301, 0x0303, &[]);
    let fp = fingerprint_client_hello(&data).expect("fixture should parse");

    assert_eq!(fp.record_version, 0x0301);
    assert_eq!(fp.client_version, 0x0303);
    assert!(
        fp.ja3.starts_with("771,"),
        "JA3 must lead with the decimal client_version (771), got {}",
        fp.ja3
    );
    assert!(!fp.ja3.starts_with("769,"), "JA3 must not use the record_version (769)");
}

#[test]
fn ja4_r_sorts_signature_algorithms_like_extensions_and_ciphers() {
    let unsorted = [0x0804u16, 0x0403, 0x0401];
    let data = client_hello_with_versions(0x0301, 0x0303, &unsorted);
    let fp = fingerprint_client_hello(&data).expect("fixture should parse");

    let sigalgs_part = fp.ja4_r.rsplit('_').next().expect("ja4_r has a signature-algorithms segment");
    assert_eq!(sigalgs_part, "0401,0403,0804");
}

#[test]
fn ja3_hash_is_32_lowercase_hex_chars() {
    let data = client_hello_with_versions(0x0301, 0x0303, &[]);
    let fp = fingerprint_client_hello(&data).expect("fixture should parse");

    assert_eq!(fp.ja3_hash.len(), 32);
    assert!(fp.ja3_hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}
