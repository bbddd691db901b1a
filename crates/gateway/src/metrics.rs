use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use std::time::Duration;

const METER_NAME: &str = "gateway";

/// Result class of a `/predict` call, recorded as the `outcome` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Rejected,
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Rejected => "rejected",
            Outcome::Failed => "failed",
        }
    }
}

/// Instruments are no-ops until a meter provider is installed.
#[derive(Clone)]
pub struct PredictionMetrics {
    predictions: Counter<u64>,
    duration: Histogram<f64>,
}

impl PredictionMetrics {
    pub fn new() -> Self {
        let meter = global::meter(METER_NAME);
        let latency_buckets = [
            0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 5.0, 10.0,
        ];

        let predictions = meter
            .u64_counter("gateway_predictions_total")
            .with_description("Prediction requests by outcome")
            .build();
        let duration = meter
            .f64_histogram("gateway_prediction_duration_seconds")
            .with_description("Time to handle a prediction request (upload + detection)")
            .with_unit("s")
            .with_boundaries(latency_buckets.to_vec())
            .build();

        Self {
            predictions,
            duration,
        }
    }

    pub fn record(&self, outcome: Outcome, elapsed: Duration) {
        let attributes = [KeyValue::new("outcome", outcome.as_str())];
        self.predictions.add(1, &attributes);
        self.duration.record(elapsed.as_secs_f64(), &attributes);
    }
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_provider_is_noop() {
        let metrics = PredictionMetrics::new();
        metrics.record(Outcome::Success, Duration::from_millis(120));
        metrics.record(Outcome::Failed, Duration::ZERO);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::Success.as_str(), "success");
        assert_eq!(Outcome::Rejected.as_str(), "rejected");
        assert_eq!(Outcome::Failed.as_str(), "failed");
    }
}
