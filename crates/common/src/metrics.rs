use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static RECORD_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "records_operations_total",
        "Record operations by collection, operation and outcome",
        &["collection", "operation", "outcome"]
    )
    .expect("register records_operations_total")
});

pub static STORE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "records_store_duration_seconds",
        "Whole-file load/save duration in seconds",
        &["collection", "phase"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("register records_store_duration")
});

/// Count one finished operation; `outcome` is `ok` or the error kind.
pub fn record_operation(collection: &str, operation: &str, outcome: &str) {
    RECORD_OPERATIONS_TOTAL
        .with_label_values(&[collection, operation, outcome])
        .inc();
}

pub fn observe_store(collection: &str, phase: &str, seconds: f64) {
    STORE_DURATION
        .with_label_values(&[collection, phase])
        .observe(seconds);
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_encoded_output() {
        record_operation("transactions", "create", "ok");
        observe_store("transactions", "load", 0.002);
        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("records_operations_total"));
        assert!(body.contains("records_store_duration_seconds"));
    }
}
