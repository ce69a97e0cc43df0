//! TCP SYN fingerprinting (p0f-style passive OS inference).
//!
//! The raw fields here come from the capture agent (eBPF/XDP on Linux, or a
//! stub that never produces a capture elsewhere) rather than from a
//! full packet parse: the capture layer already extracted TTL, window, IP
//! version/flags and the raw option bytes from the SYN.

pub mod options;
pub mod signature;
pub mod types;

pub use types::{Confidence, TcpFingerprint, TcpOptionEntry};

/// The fields a capture agent hands up for a single observed SYN.
#[derive(Debug, Clone, Default)]
pub struct RawSyn {
    pub observed_ttl: u8,
    pub ip_version: u8,
    pub ip_flags: u8,
    pub window: u16,
    pub options: Vec<u8>,
    /// Quirk bitmask (`wireprint_capture_common::quirk_bits`), `0` when the
    /// capture backend doesn't populate it (e.g. the stub agent never
    /// builds a `RawSyn` at all, so this only matters for live captures).
    pub quirks: u32,
}

/// Turns a capture agent's quirk bitmask into the human-readable anomaly
/// tags the analyzer deducts points for (spec §4.7.3's "TCP collector
/// anomalies" row, one `-10` per entry). Each bit after `DF` flags a SYN
/// packet shape real TCP stacks don't produce; their presence is itself the
/// signal, regardless of which specific bits are set.
fn quirk_anomalies(quirks: u32) -> Vec<String> {
    use wireprint_capture_common::quirk_bits::*;

    let mut tags = Vec::new();
    if quirks & NONZERO_ID != 0 {
        tags.push("IP ID nonzero despite DF set".to_string());
    }
    if quirks & ZERO_ID != 0 {
        tags.push("IP ID zero without DF set".to_string());
    }
    if quirks & MUST_BE_ZERO != 0 {
        tags.push("reserved IP flag bit set".to_string());
    }
    if quirks & ECN != 0 {
        tags.push("ECN flags set on SYN".to_string());
    }
    if quirks & SEQ_ZERO != 0 {
        tags.push("TCP sequence number is zero".to_string());
    }
    if quirks & ACK_NONZERO != 0 {
        tags.push("ACK number nonzero on SYN".to_string());
    }
    if quirks & NONZERO_URG != 0 {
        tags.push("urgent pointer nonzero without URG flag".to_string());
    }
    if quirks & URG != 0 {
        tags.push("URG flag set on SYN".to_string());
    }
    if quirks & PUSH != 0 {
        tags.push("PSH flag set on SYN".to_string());
    }
    tags
}

/// Builds a complete [`TcpFingerprint`] from a capture agent's raw SYN
/// fields: parses the option bytes, rounds the TTL, infers an OS and
/// confidence, and computes the signature hash and best-effort uptime.
pub fn fingerprint_syn(raw: &RawSyn) -> TcpFingerprint {
    let parsed = options::parse_options(&raw.options);
    let initial_ttl = signature::round_initial_ttl(raw.observed_ttl);
    let has_timestamp = parsed.ts_val.is_some();
    let (inferred_os, confidence) = signature::infer_os(initial_ttl, has_timestamp, raw.window);
    let hash = signature::signature_hash(
        raw.ip_version,
        initial_ttl,
        &parsed.options_str,
        raw.window,
        raw.ip_flags,
    );
    let estimated_uptime = signature::estimate_uptime(parsed.ts_val);

    let mut anomalies = Vec::new();
    if parsed.malformed {
        anomalies.push("truncated TCP options".to_string());
    }
    anomalies.extend(quirk_anomalies(raw.quirks));

    TcpFingerprint {
        observed_ttl: raw.observed_ttl,
        initial_ttl,
        ip_version: raw.ip_version,
        ip_flags: raw.ip_flags,
        window: raw.window,
        mss: parsed.mss,
        window_scale: parsed.window_scale,
        options: parsed.entries,
        options_str: parsed.options_str,
        ts_val: parsed.ts_val,
        ts_ecr: parsed.ts_ecr,
        estimated_uptime,
        signature_hash: hash,
        inferred_os,
        confidence: Some(confidence),
        anomalies,
    }
}
