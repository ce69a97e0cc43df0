use super::types::TcpAnalysis;
use crate::fingerprint::tcp::TcpFingerprint;

pub fn analyze_tcp(fp: &TcpFingerprint) -> TcpAnalysis {
    let mut observations = Vec::new();
    for anomaly in &fp.anomalies {
        observations.push(anomaly.clone());
    }
    if fp.options.is_empty() {
        observations.push("no TCP options observed".to_string());
    }

    TcpAnalysis {
        detected: true,
        inferred_os: Some(fp.inferred_os.clone()),
        os_confidence: fp.confidence.map(|c| format!("{c:?}").to_lowercase()),
        ttl_analysis: Some(format!("observed={} initial={}", fp.observed_ttl, fp.initial_ttl)),
        observations,
    }
}
