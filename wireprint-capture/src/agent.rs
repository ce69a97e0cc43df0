use std::net::Ipv4Addr;

use tracing::{info, warn};
use wireprint_core::capture::CaptureAgent;
use wireprint_core::fingerprint::tcp::{fingerprint_syn, RawSyn, TcpFingerprint};

use crate::probe::EbpfProbe;
use crate::EbpfError;

/// Quirk bit carrying the IPv4 "Don't Fragment" flag, the only bit of
/// `wireprint_capture_common::quirk_bits` that `RawSyn::ip_flags` needs —
/// the other bits feed the analyzer's anomaly list off the raw fingerprint
/// directly, not the p0f-style signature hash.
const DF_FLAG: u8 = 0x2;

/// Wraps one [`EbpfProbe`] per captured interface. Per spec §4.1, "all
/// non-loopback interfaces that have addresses, plus the loopback" are
/// captured when no interface is named explicitly.
pub struct LiveCaptureAgent {
    probes: Vec<EbpfProbe>,
}

impl LiveCaptureAgent {
    pub fn new(iface: Option<&str>, listen_port: u16) -> Result<Self, EbpfError> {
        let names = match iface {
            Some(name) => vec![name.to_string()],
            None => discover_interfaces(),
        };

        if names.is_empty() {
            return Err(EbpfError::NoInterfaces);
        }

        let mut probes = Vec::with_capacity(names.len());
        let mut last_err = None;
        for name in &names {
            match EbpfProbe::new(name, Ipv4Addr::UNSPECIFIED, listen_port) {
                Ok(probe) => probes.push(probe),
                Err(e) => {
                    warn!(interface = %name, error = %e, "failed to attach XDP capture to interface");
                    last_err = Some(e);
                }
            }
        }

        if probes.is_empty() {
            return Err(last_err.unwrap_or(EbpfError::NoInterfaces));
        }

        Ok(LiveCaptureAgent { probes })
    }
}

impl CaptureAgent for LiveCaptureAgent {
    fn lookup(&self, src_ip: &str, src_port: u16) -> Option<TcpFingerprint> {
        let ip: Ipv4Addr = src_ip.parse().ok()?;
        for probe in &self.probes {
            if let Some(raw) = probe.lookup(ip, src_port) {
                let options = raw.options[..raw.optlen.min(40) as usize].to_vec();
                let ip_flags =
                    if raw.quirks & wireprint_capture_common::quirk_bits::DF != 0 { DF_FLAG } else { 0 };
                let syn = RawSyn {
                    observed_ttl: raw.ip_ttl,
                    ip_version: 4,
                    ip_flags,
                    window: u16::from_be(raw.window),
                    options,
                    quirks: raw.quirks,
                };
                return Some(fingerprint_syn(&syn));
            }
        }
        None
    }

    fn start(&self) {
        let ifaces: Vec<&str> = self.probes.iter().map(|p| p.interface()).collect();
        info!(interfaces = ?ifaces, "TCP SYN fingerprinting active (eBPF/XDP)");
    }
}

/// Lists non-loopback interfaces with a link present under `/sys/class/net`,
/// plus `lo` (required for same-host testing per spec §4.1).
fn discover_interfaces() -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(entries) = std::fs::read_dir("/sys/class/net") {
        for entry in entries.flatten() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    if !names.iter().any(|n| n == "lo") {
        names.push("lo".to_string());
    }
    names
}
