use md5::compute;

use super::types::Confidence;

/// Rounds an observed TTL up to the nearest of the common initial-TTL values
/// (`{32, 64, 128, 255}`), the same buckets p0f-style passive fingerprinting
/// uses to undo mid-path hop decrements.
pub fn round_initial_ttl(observed: u8) -> u8 {
    const BUCKETS: [u8; 4] = [32, 64, 128, 255];
    BUCKETS.into_iter().find(|&b| observed <= b).unwrap_or(255)
}

/// Best-effort OS guess from initial TTL, timestamp-option presence and
/// window size. Informational only: never fed back into the initial TTL or
/// treated as authoritative by the analyzer.
pub fn infer_os(initial_ttl: u8, has_timestamp: bool, window: u16) -> (String, Confidence) {
    match initial_ttl {
        128 if !has_timestamp => ("Windows".to_string(), Confidence::High),
        128 => ("Windows".to_string(), Confidence::Medium),
        64 if window == 65535 => ("macOS/iOS".to_string(), Confidence::Medium),
        64 if has_timestamp && window < 20_000 => ("Android".to_string(), Confidence::Low),
        64 if has_timestamp => ("Linux".to_string(), Confidence::Medium),
        64 => ("Linux/Unix".to_string(), Confidence::Low),
        255 => ("Network Device".to_string(), Confidence::Medium),
        32 => ("Embedded/Old".to_string(), Confidence::Low),
        _ => ("Unknown".to_string(), Confidence::Low),
    }
}

/// MD5 over the p0f-style signature tuple, hex-encoded.
pub fn signature_hash(ip_version: u8, initial_ttl: u8, options_str: &str, window: u16, ip_flags: u8) -> String {
    let material = format!("{ip_version}:{initial_ttl}:{options_str}:{window}:{ip_flags}");
    format!("{:x}", compute(material.as_bytes()))
}

/// Estimates uptime from a TSval assuming the common 1kHz tick rate. Returns
/// `None` when no timestamp option was observed. This is a rough estimate,
/// never treated as authoritative by the analyzer.
pub fn estimate_uptime(ts_val: Option<u32>) -> Option<String> {
    let ticks = ts_val?;
    let total_secs = ticks as u64 / 1000;
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    Some(format!("{days}d {hours}h {minutes}m"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_ttl_to_nearest_bucket() {
        assert_eq!(round_initial_ttl(60), 64);
        assert_eq!(round_initial_ttl(64), 64);
        assert_eq!(round_initial_ttl(100), 128);
        assert_eq!(round_initial_ttl(250), 255);
    }

    #[test]
    fn infers_windows_without_timestamp_as_high_confidence() {
        let (os, conf) = infer_os(128, false, 8192);
        assert_eq!(os, "Windows");
        assert_eq!(conf, Confidence::High);
    }

    #[test]
    fn infers_macos_from_large_window() {
        let (os, _) = infer_os(64, true, 65535);
        assert_eq!(os, "macOS/iOS");
    }

    #[test]
    fn signature_hash_is_stable() {
        let a = signature_hash(4, 64, "M1460NW7ST", 29200, 0);
        let b = signature_hash(4, 64, "M1460NW7ST", 29200, 0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn estimates_uptime_from_tsval() {
        assert_eq!(estimate_uptime(None), None);
        let uptime = estimate_uptime(Some(90_000)).unwrap();
        assert_eq!(uptime, "0d 0h 1m");
    }
}
