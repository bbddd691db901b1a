use crate::config::DetectOptions;
use crate::error::DetectError;
use crate::labels::{LabelSpace, label_for};
use serde::{Deserialize, Serialize};

/// One detected object, as reported to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

pub struct PostProcessor {
    pub confidence_threshold: f32,
    pub max_results: usize,
    pub label_space: LabelSpace,
}

impl PostProcessor {
    pub fn new(options: &DetectOptions) -> Self {
        Self {
            confidence_threshold: options.confidence_threshold,
            max_results: options.max_results,
            label_space: options.label_space,
        }
    }

    /// Turn raw per-instance outputs into the ranked prediction list.
    ///
    /// Instances scoring below the threshold are dropped, the rest are ordered
    /// by score (highest first, ties keep model order), capped at
    /// `max_results` and rounded to two decimals. Leading batch dimensions of
    /// size one are accepted; only the element count has to agree.
    #[tracing::instrument(skip_all, fields(candidates = scores.len()))]
    pub fn select(
        &self,
        labels: &ndarray::ArrayViewD<i64>,
        scores: &ndarray::ArrayViewD<f32>,
    ) -> Result<Vec<Prediction>, DetectError> {
        if labels.len() != scores.len() {
            return Err(DetectError::InvalidOutput(format!(
                "{} labels for {} scores",
                labels.len(),
                scores.len()
            )));
        }

        let mut kept: Vec<(i64, f32)> = labels
            .iter()
            .zip(scores.iter())
            .filter(|(_, score)| **score >= self.confidence_threshold)
            .map(|(label, score)| (*label, *score))
            .collect();

        kept.sort_by(|a, b| b.1.total_cmp(&a.1));
        kept.truncate(self.max_results);

        Ok(kept
            .into_iter()
            .map(|(class_index, score)| Prediction {
                label: label_for(class_index, self.label_space).to_string(),
                confidence: round_confidence(score),
            })
            .collect())
    }
}

#[inline]
fn round_confidence(score: f32) -> f32 {
    (score * 100.0).round() / 100.0
}
