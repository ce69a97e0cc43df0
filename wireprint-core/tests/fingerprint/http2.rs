//! Byte-level HTTP/2 connection-preface fixtures, built the way
//! `benches/bench_fingerprinting.rs` builds them, exercised through the real
//! frame interceptor + Akamai fingerprint builder.

use wireprint_core::fingerprint::http2::fingerprint_connection_preface;

fn settings_frame(entries: &[(u16, u32)]) -> Vec<u8> {
    let mut payload = Vec::new();
    for (id, value) in entries {
        payload.extend_from_slice(&id.to_be_bytes());
        payload.extend_from_slice(&value.to_be_bytes());
    }
    let mut frame = Vec::new();
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes()[1..]);
    frame.push(0x04); // SETTINGS
    frame.push(0x00);
    frame.extend_from_slice(&0u32.to_be_bytes());
    frame.extend_from_slice(&payload);
    frame
}

fn window_update_frame(increment: u32) -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(&4u32.to_be_bytes()[1..]);
    frame.push(0x08); // WINDOW_UPDATE
    frame.push(0x00);
    frame.extend_from_slice(&0u32.to_be_bytes());
    frame.extend_from_slice(&increment.to_be_bytes());
    frame
}

#[test]
fn akamai_string_has_four_parts_and_sorted_settings() {
    let mut data = Vec::new();
    data.extend_from_slice(b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n");
    data.extend_from_slice(&settings_frame(&[(6, 262144), (2, 0), (4, 6291456)]));
    data.extend_from_slice(&window_update_frame(15_663_105));

    let fp = fingerprint_connection_preface(&data).expect("fixture should parse");

    let parts: Vec<&str> = fp.akamai.split('|').collect();
    assert_eq!(parts.len(), 4, "Akamai string must have exactly 4 `|`-separated parts");
    assert_eq!(parts[0], "2:0;4:6291456;6:262144", "SETTINGS segment must sort ascending by id");
    assert_eq!(fp.window_update, 15_663_105);
    assert_eq!(fp.pseudo_header_order, "m,a,s,p", "falls back to the default order with no HEADERS frame");
    assert_eq!(fp.akamai_hash.len(), 32);
}

#[test]
fn missing_connection_preface_is_rejected() {
    let data = b"not a valid http2 preface".to_vec();
    assert!(fingerprint_connection_preface(&data).is_err());
}
