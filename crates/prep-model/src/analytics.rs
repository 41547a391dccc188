//! Read-only analytics aggregates served to the dashboard.
//!
//! None of these are ever mutated client-side. They are fetched per
//! (exam, range) or (exam, metric, range) and every field is optional on the
//! wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::exam::ExamCategory;
use crate::exam_config::{ExamConfigType, ExamStatus};
use crate::ids::SubjectId;

// =============================================================================
// FILTER DIMENSIONS
// =============================================================================

/// Reporting window for analytics queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateRange {
    #[serde(rename = "today")]
    Today,
    #[default]
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
}

impl DateRange {
    pub const ALL: [DateRange; 3] = [Self::Today, Self::Last7Days, Self::Last30Days];

    /// Value of the `range` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Last7Days => "Last 7 days",
            Self::Last30Days => "Last 30 days",
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DateRange {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|range| range.as_param() == normalized || range.label().to_lowercase() == normalized)
            .ok_or_else(|| ModelError::UnknownRange(s.to_string()))
    }
}

/// Series selector for the time-series endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsMetric {
    ActiveUsers,
    QuestionsAnswered,
}

impl AnalyticsMetric {
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::ActiveUsers => "active_users",
            Self::QuestionsAnswered => "questions_answered",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ActiveUsers => "Active users",
            Self::QuestionsAnswered => "Questions answered",
        }
    }
}

// =============================================================================
// AGGREGATES
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsOverview {
    pub active_users: Option<f64>,
    pub average_accuracy: Option<f64>,
    pub average_study_minutes: Option<f64>,
    pub questions_answered: Option<f64>,
    pub total_rewards: Option<f64>,
    pub total_users: Option<f64>,
}

impl AnalyticsOverview {
    /// True when the server returned no figures at all.
    pub fn is_empty(&self) -> bool {
        self.active_users.is_none()
            && self.average_accuracy.is_none()
            && self.average_study_minutes.is_none()
            && self.questions_answered.is_none()
            && self.total_rewards.is_none()
            && self.total_users.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeSeriesPoint {
    pub date: Option<String>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsTimeSeries {
    pub metric: Option<AnalyticsMetric>,
    pub points: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectAccuracy {
    pub subject_id: Option<SubjectId>,
    pub subject_name: String,
    pub exam: Option<ExamCategory>,
    pub accuracy: Option<f64>,
    pub attempts: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectAccuracyResponse {
    pub subjects: Vec<SubjectAccuracy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeakTopic {
    pub subject_name: String,
    pub topic_name: String,
    pub exam: Option<ExamCategory>,
    pub accuracy: Option<f64>,
    pub attempts: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeakTopicsResponse {
    pub items: Vec<WeakTopic>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminEvent {
    pub id: String,
    pub name: String,
    pub exam: Option<ExamCategory>,
    #[serde(rename = "type")]
    pub kind: Option<ExamConfigType>,
    pub start_at: Option<String>,
    pub registered_count: Option<f64>,
    pub status: Option<ExamStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminEventsResponse {
    pub items: Vec<AdminEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminReferralSummary {
    pub total_referrals: Option<f64>,
    pub rewards_paid: Option<f64>,
    pub new_users: Option<f64>,
    pub range: Option<String>,
}

impl AdminReferralSummary {
    pub fn is_empty(&self) -> bool {
        self.total_referrals.is_none() && self.rewards_paid.is_none() && self.new_users.is_none()
    }
}
