//! Micro benchmarks for TLS (JA3/JA4) and HTTP/2 (Akamai) fingerprinting.
//! Pure CPU - no network, no IO.
//!
//! TCP SYN fingerprinting is not included: it requires CAP_BPF and is
//! measured separately via Prometheus metrics in a staging environment.
//!
//! ```bash
//! cargo bench --bench bench_fingerprinting
//! ```
//!
//! Fixtures are built by hand to the exact wire shapes the parsers expect
//! (see `wireprint_core::fingerprint::tls::client_hello` and
//! `::http2::frame` for the grammar), rather than captured from a live
//! client, so the benchmark has no external dependency to keep in sync.

use criterion::{criterion_group, criterion_main, Criterion};
use wireprint_core::fingerprint::http2::fingerprint_connection_preface;
use wireprint_core::fingerprint::tls::fingerprint_client_hello;

/// A TLS 1.3 ClientHello with a GREASE cipher, three real ciphers, SNI,
/// supported_groups, signature_algorithms, ALPN and supported_versions
/// extensions - enough surface to exercise every JA3/JA4 code path.
fn client_hello_fixture() -> Vec<u8> {
    const EXT_SERVER_NAME: u16 = 0;
    const EXT_SUPPORTED_GROUPS: u16 = 10;
    const EXT_SIGNATURE_ALGORITHMS: u16 = 13;
    const EXT_ALPN: u16 = 16;
    const EXT_SUPPORTED_VERSIONS: u16 = 43;

    let mut handshake_body = Vec::new();
    handshake_body.extend_from_slice(&0x0303u16.to_be_bytes());
    handshake_body.extend_from_slice(&[0u8; 32]);
    handshake_body.push(0); // session_id_len

    let ciphers: [u16; 4] = [0x0a0a, 0x1301, 0x1302, 0xc02f];
    handshake_body.extend_from_slice(&((ciphers.len() * 2) as u16).to_be_bytes());
    for c in ciphers {
        handshake_body.extend_from_slice(&c.to_be_bytes());
    }
    handshake_body.push(1); // compression methods len
    handshake_body.push(0);

    let mut extensions = Vec::new();

    let host = b"www.example.com";
    let mut sni_payload = Vec::new();
    sni_payload.extend_from_slice(&((host.len() + 3) as u16).to_be_bytes());
    sni_payload.push(0);
    sni_payload.extend_from_slice(&(host.len() as u16).to_be_bytes());
    sni_payload.extend_from_slice(host);
    extensions.extend_from_slice(&EXT_SERVER_NAME.to_be_bytes());
    extensions.extend_from_slice(&(sni_payload.len() as u16).to_be_bytes());
    extensions.extend_from_slice(&sni_payload);

    let groups: [u16; 3] = [0x0a0a, 0x001d, 0x0017];
    let mut groups_payload = Vec::new();
    groups_payload.extend_from_slice(&((groups.len() * 2) as u16).to_be_bytes());
    for g in groups {
        groups_payload.extend_from_slice(&g.to_be_bytes());
    }
    extensions.extend_from_slice(&EXT_SUPPORTED_GROUPS.to_be_bytes());
    extensions.extend_from_slice(&(groups_payload.len() as u16).to_be_bytes());
    extensions.extend_from_slice(&groups_payload);

    let sigalgs: [u16; 2] = [0x0403, 0x0804];
    let mut sigalgs_payload = Vec::new();
    sigalgs_payload.extend_from_slice(&((sigalgs.len() * 2) as u16).to_be_bytes());
    for a in sigalgs {
        sigalgs_payload.extend_from_slice(&a.to_be_bytes());
    }
    extensions.extend_from_slice(&EXT_SIGNATURE_ALGORITHMS.to_be_bytes());
    extensions.extend_from_slice(&(sigalgs_payload.len() as u16).to_be_bytes());
    extensions.extend_from_slice(&sigalgs_payload);

    let mut alpn_payload = Vec::new();
    let protos: [&[u8]; 2] = [b"h2", b"http/1.1"];
    let mut list = Vec::new();
    for p in protos {
        list.push(p.len() as u8);
        list.extend_from_slice(p);
    }
    alpn_payload.extend_from_slice(&(list.len() as u16).to_be_bytes());
    alpn_payload.extend_from_slice(&list);
    extensions.extend_from_slice(&EXT_ALPN.to_be_bytes());
    extensions.extend_from_slice(&(alpn_payload.len() as u16).to_be_bytes());
    extensions.extend_from_slice(&alpn_payload);

    let versions: [u16; 2] = [0x0a0a, 0x0304];
    let mut versions_payload = Vec::new();
    versions_payload.push((versions.len() * 2) as u8);
    for v in versions {
        versions_payload.extend_from_slice(&v.to_be_bytes());
    }
    extensions.extend_from_slice(&EXT_SUPPORTED_VERSIONS.to_be_bytes());
    extensions.extend_from_slice(&(versions_payload.len() as u16).to_be_bytes());
    extensions.extend_from_slice(&versions_payload);

    handshake_body.extend_from_slice(&(extensions.len() as u16).to_be_bytes());
    handshake_body.extend_from_slice(&extensions);

    let mut record = Vec::new();
    record.push(22); // handshake content type
    record.extend_from_slice(&0x0301u16.to_be_bytes());
    let mut handshake = Vec::new();
    handshake.push(1); // ClientHello handshake type
    handshake.extend_from_slice(&(handshake_body.len() as u32).to_be_bytes()[1..]);
    handshake.extend_from_slice(&handshake_body);
    record.extend_from_slice(&(handshake.len() as u16).to_be_bytes());
    record.extend_from_slice(&handshake);
    record
}

/// Connection preface + a SETTINGS frame (4 entries) + a connection-level
/// WINDOW_UPDATE, no HEADERS block: exercises the Akamai string builder's
/// settings/window_update/priority sections and its default-pseudo-order
/// fallback path, the common case for a connection still mid-handshake.
fn http2_frames_fixture() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n");

    let settings: [(u16, u32); 4] = [(2, 0), (4, 2097152), (5, 16384), (6, 16384)];
    let mut settings_payload = Vec::new();
    for (id, value) in settings {
        settings_payload.extend_from_slice(&id.to_be_bytes());
        settings_payload.extend_from_slice(&value.to_be_bytes());
    }
    data.extend_from_slice(&(settings_payload.len() as u32).to_be_bytes()[1..]);
    data.push(0x04); // SETTINGS
    data.push(0x00); // flags
    data.extend_from_slice(&0u32.to_be_bytes()); // stream 0
    data.extend_from_slice(&settings_payload);

    let increment: u32 = 5_177_345;
    data.extend_from_slice(&4u32.to_be_bytes()[1..]);
    data.push(0x08); // WINDOW_UPDATE
    data.push(0x00);
    data.extend_from_slice(&0u32.to_be_bytes());
    data.extend_from_slice(&increment.to_be_bytes());

    data
}

const EXPECTED_JA4_PREFIX: &str = "t13d0305h2";
const EXPECTED_AKAMAI: &str = "2:0;4:2097152;5:16384;6:16384|5177345|0|m,a,s,p";

fn bench_tls_client_hello_parse(c: &mut Criterion) {
    let fixture = client_hello_fixture();

    let fp = fingerprint_client_hello(&fixture).expect("fixture should parse");
    assert!(
        fp.ja4.starts_with(EXPECTED_JA4_PREFIX),
        "JA4 fixture mismatch: got {}, expected prefix {EXPECTED_JA4_PREFIX}",
        fp.ja4
    );
    assert_eq!(fp.ja3_hash.len(), 32);

    c.bench_function("tls_client_hello_parse_and_fingerprint", |b| {
        b.iter(|| fingerprint_client_hello(std::hint::black_box(&fixture)));
    });
}

fn bench_http2_akamai_parse(c: &mut Criterion) {
    let fixture = http2_frames_fixture();

    let fp = fingerprint_connection_preface(&fixture).expect("fixture should parse");
    assert_eq!(fp.akamai, EXPECTED_AKAMAI, "Akamai fixture mismatch: got {}", fp.akamai);

    c.bench_function("http2_connection_preface_parse_and_fingerprint", |b| {
        b.iter(|| fingerprint_connection_preface(std::hint::black_box(&fixture)));
    });
}

criterion_group!(fingerprinting_benches, bench_tls_client_hello_parse, bench_http2_akamai_parse);
criterion_main!(fingerprinting_benches);
