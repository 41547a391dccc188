//! Exam categories and the UI-level exam selection.
//!
//! `ExamCategory` is what the server stores on subjects, questions and exam
//! configs. `ExamSelection` adds the `ALL` wildcard, which never goes over the
//! wire: it means "send no exam filter".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Concrete exam category as stored server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExamCategory {
    #[serde(rename = "NEET_PG")]
    NeetPg,
    #[serde(rename = "NEET_UG")]
    NeetUg,
    #[serde(rename = "JEE")]
    Jee,
    #[serde(rename = "UPSC")]
    Upsc,
}

impl ExamCategory {
    /// All categories in display order.
    pub const ALL: [ExamCategory; 4] = [Self::NeetPg, Self::NeetUg, Self::Jee, Self::Upsc];

    /// Wire value, also used as the `exam` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeetPg => "NEET_PG",
            Self::NeetUg => "NEET_UG",
            Self::Jee => "JEE",
            Self::Upsc => "UPSC",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NeetPg => "NEET PG",
            Self::NeetUg => "NEET UG",
            Self::Jee => "JEE",
            Self::Upsc => "UPSC",
        }
    }
}

impl fmt::Display for ExamCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamCategory {
    type Err = ModelError;

    /// Accepts the wire value or the label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "NEET_PG" => Ok(Self::NeetPg),
            "NEET_UG" => Ok(Self::NeetUg),
            "JEE" => Ok(Self::Jee),
            "UPSC" => Ok(Self::Upsc),
            _ => Err(ModelError::UnknownExam(s.to_string())),
        }
    }
}

/// The exam filter chosen in the UI. `All` is the initial value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExamSelection {
    #[serde(rename = "ALL")]
    #[default]
    All,
    #[serde(untagged)]
    Exam(ExamCategory),
}

impl ExamSelection {
    /// Every selectable value, `All` first.
    pub const OPTIONS: [ExamSelection; 5] = [
        Self::All,
        Self::Exam(ExamCategory::NeetPg),
        Self::Exam(ExamCategory::NeetUg),
        Self::Exam(ExamCategory::Jee),
        Self::Exam(ExamCategory::Upsc),
    ];

    /// Server-side filter; `None` for the wildcard.
    pub fn as_filter(&self) -> Option<ExamCategory> {
        match self {
            Self::All => None,
            Self::Exam(exam) => Some(*exam),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// True when `exam` passes this selection.
    pub fn matches(&self, exam: ExamCategory) -> bool {
        match self {
            Self::All => true,
            Self::Exam(selected) => *selected == exam,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Exam(exam) => exam.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All Exams",
            Self::Exam(exam) => exam.label(),
        }
    }
}

impl From<ExamCategory> for ExamSelection {
    fn from(exam: ExamCategory) -> Self {
        Self::Exam(exam)
    }
}

impl fmt::Display for ExamSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamSelection {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<ExamCategory>().map(Self::Exam)
    }
}
