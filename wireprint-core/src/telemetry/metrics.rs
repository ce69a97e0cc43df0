use opentelemetry::global;
use opentelemetry::metrics::{Counter, Histogram, Meter, UpDownCounter};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::Registry;
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    pub connections_total: Counter<u64>,
    pub connections_active: UpDownCounter<i64>,

    pub requests_total: Counter<u64>,
    pub requests_duration_seconds: Histogram<f64>,

    pub tls_fingerprints_extracted_total: Counter<u64>,
    pub tls_fingerprint_extraction_duration_seconds: Histogram<f64>,
    pub tls_fingerprint_failures_total: Counter<u64>,

    pub http2_fingerprints_extracted_total: Counter<u64>,
    pub http2_fingerprint_extraction_duration_seconds: Histogram<f64>,
    pub http2_fingerprint_failures_total: Counter<u64>,

    pub tcp_fingerprints_captured_total: Counter<u64>,
    pub tcp_capture_failures_total: Counter<u64>,

    pub store_overflow_clears_total: Counter<u64>,
    pub store_entries: UpDownCounter<i64>,

    pub analysis_requests_total: Counter<u64>,
    pub errors_total: Counter<u64>,
}

impl Metrics {
    fn new(meter: Meter) -> Self {
        Self {
            connections_total: meter
                .u64_counter("wireprint_connections_total")
                .with_description("Total number of connections accepted")
                .build(),
            connections_active: meter
                .i64_up_down_counter("wireprint_connections_active")
                .with_description("Number of active connections")
                .build(),

            requests_total: meter
                .u64_counter("wireprint_requests_total")
                .with_description("Total number of requests processed")
                .build(),
            requests_duration_seconds: meter
                .f64_histogram("wireprint_requests_duration_seconds")
                .with_description("Request duration in seconds")
                .build(),

            tls_fingerprints_extracted_total: meter
                .u64_counter("wireprint_tls_fingerprints_extracted_total")
                .with_description("Total number of TLS (JA3/JA4) fingerprints extracted")
                .build(),
            tls_fingerprint_extraction_duration_seconds: meter
                .f64_histogram("wireprint_tls_fingerprint_extraction_duration_seconds")
                .with_description("TLS fingerprint extraction duration in seconds")
                .build(),
            tls_fingerprint_failures_total: meter
                .u64_counter("wireprint_tls_fingerprint_failures_total")
                .with_description("Total number of malformed ClientHello parses")
                .build(),

            http2_fingerprints_extracted_total: meter
                .u64_counter("wireprint_http2_fingerprints_extracted_total")
                .with_description("Total number of HTTP/2 (Akamai) fingerprints extracted")
                .build(),
            http2_fingerprint_extraction_duration_seconds: meter
                .f64_histogram("wireprint_http2_fingerprint_extraction_duration_seconds")
                .with_description("HTTP/2 fingerprint extraction duration in seconds")
                .build(),
            http2_fingerprint_failures_total: meter
                .u64_counter("wireprint_http2_fingerprint_failures_total")
                .with_description("Total number of connections that closed before an HTTP/2 fingerprint was derived")
                .build(),

            tcp_fingerprints_captured_total: meter
                .u64_counter("wireprint_tcp_fingerprints_captured_total")
                .with_description("Total number of TCP SYN fingerprints captured")
                .build(),
            tcp_capture_failures_total: meter
                .u64_counter("wireprint_tcp_capture_failures_total")
                .with_description("Total number of capture backend errors")
                .build(),

            store_overflow_clears_total: meter
                .u64_counter("wireprint_store_overflow_clears_total")
                .with_description("Total number of times the fingerprint store was cleared for exceeding its capacity")
                .build(),
            store_entries: meter
                .i64_up_down_counter("wireprint_store_entries")
                .with_description("Current number of keys held in the fingerprint store")
                .build(),

            analysis_requests_total: meter
                .u64_counter("wireprint_analysis_requests_total")
                .with_description("Total number of /api/analysis requests served")
                .build(),

            errors_total: meter
                .u64_counter("wireprint_errors_total")
                .with_description("Total number of errors")
                .build(),
        }
    }
}

pub fn init_metrics() -> Result<(Arc<Metrics>, Registry), Box<dyn std::error::Error + Send + Sync>>
{
    let registry = Registry::default();

    let exporter = opentelemetry_prometheus::exporter().with_registry(registry.clone()).build()?;

    let meter_provider = SdkMeterProvider::builder().with_reader(exporter).build();

    global::set_meter_provider(meter_provider);

    let meter = global::meter("wireprint");
    let metrics = Arc::new(Metrics::new(meter));

    Ok((metrics, registry))
}
