//! TCP SYN fingerprinting through the public `fingerprint_syn` entry point —
//! the capture-agent-facing API, distinct from the p0f table's own unit
//! tests in `src/fingerprint/tcp/signature.rs`.

use wireprint_core::fingerprint::tcp::{fingerprint_syn, RawSyn};

#[test]
fn windows_syn_without_timestamp_is_high_confidence() {
    let raw = RawSyn {
        observed_ttl: 128,
        ip_version: 4,
        ip_flags: 2,
        window: 8192,
        options: vec![2, 4, 0x05, 0xb4, 1, 1, 3, 3, 8],
        ..Default::default()
    };
    let fp = fingerprint_syn(&raw);

    assert_eq!(fp.initial_ttl, 128);
    assert_eq!(fp.inferred_os, "Windows");
    assert_eq!(fp.confidence, Some(wireprint_core::fingerprint::tcp::Confidence::High));
}

#[test]
fn network_device_label_has_a_space() {
    let raw = RawSyn { observed_ttl: 255, ip_version: 4, window: 1024, ..Default::default() };
    let fp = fingerprint_syn(&raw);

    assert_eq!(fp.inferred_os, "Network Device");
}

#[test]
fn no_options_yields_empty_options_str_and_os_inference_still_runs() {
    let raw = RawSyn { observed_ttl: 64, ip_version: 4, window: 65535, ..Default::default() };
    let fp = fingerprint_syn(&raw);

    assert_eq!(fp.options_str, "");
    assert_eq!(fp.inferred_os, "macOS/iOS");
}

#[test]
fn initial_ttl_is_rounded_up_and_never_below_observed() {
    let raw = RawSyn { observed_ttl: 50, ip_version: 4, window: 29200, ..Default::default() };
    let fp = fingerprint_syn(&raw);

    assert_eq!(fp.initial_ttl, 64);
    assert!(fp.initial_ttl as u16 >= fp.observed_ttl as u16);
}
