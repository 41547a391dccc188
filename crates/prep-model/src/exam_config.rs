//! Exam configurations: mocks, subject tests, reward events and daily tests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::exam::ExamCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamConfigType {
    Mock,
    SubjectTest,
    RewardEvent,
    DailyTest,
}

impl ExamConfigType {
    pub const ALL: [ExamConfigType; 4] = [
        Self::Mock,
        Self::SubjectTest,
        Self::RewardEvent,
        Self::DailyTest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "MOCK",
            Self::SubjectTest => "SUBJECT_TEST",
            Self::RewardEvent => "REWARD_EVENT",
            Self::DailyTest => "DAILY_TEST",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mock => "Mock",
            Self::SubjectTest => "Subject Test",
            Self::RewardEvent => "Reward Event",
            Self::DailyTest => "Daily Test",
        }
    }
}

impl fmt::Display for ExamConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamConfigType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "exam type",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamStatus {
    Draft,
    Scheduled,
    Ongoing,
    Completed,
}

impl ExamStatus {
    pub const ALL: [ExamStatus; 4] = [
        Self::Draft,
        Self::Scheduled,
        Self::Ongoing,
        Self::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Scheduled => "SCHEDULED",
            Self::Ongoing => "ONGOING",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Scheduled => "Scheduled",
            Self::Ongoing => "Ongoing",
            Self::Completed => "Completed",
        }
    }
}

impl FromStr for ExamStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "exam status",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamConfig {
    pub id: String,
    pub exam: ExamCategory,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ExamConfigType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ExamStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_questions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks_per_correct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_per_wrong: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_start_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_end_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamConfigCreateRequest {
    pub exam: ExamCategory,
    pub name: String,
    pub num_questions: u32,
    pub time_limit_minutes: u32,
    #[serde(rename = "type")]
    pub kind: ExamConfigType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks_per_correct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_per_wrong: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_start_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_end_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamConfigUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam: Option<ExamCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_questions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ExamConfigType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks_per_correct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_per_wrong: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_start_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_end_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ExamStatus>,
}
