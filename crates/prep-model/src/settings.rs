use serde::{Deserialize, Serialize};

/// Tuning knobs for the adaptive revision and weakness detection engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_guessed_correct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_intervals_days: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strong_threshold_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weakness_min_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weakness_threshold_percent: Option<f64>,
}
