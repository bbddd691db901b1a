use crate::labels::LabelSpace;
use serde::Deserialize;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Tuning knobs of the detection routine, owned by whoever calls it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectOptions {
    pub confidence_threshold: f32,
    pub max_results: usize,
    pub label_space: LabelSpace,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
            label_space: LabelSpace::default(),
        }
    }
}
