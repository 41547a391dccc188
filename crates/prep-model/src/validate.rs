//! Form drafts and their validation into typed API requests.
//!
//! A draft holds the raw strings an operator typed. `validate()` either
//! produces the request body or the complete list of rejected fields, so
//! invalid input never reaches the network.

use std::str::FromStr;

use crate::catalog::{ChoiceType, QuestionCreateRequest, SubjectCreateRequest, TopicCreateRequest};
use crate::content::{CouponRequest, PodcastCreateRequest};
use crate::error::FieldErrors;
use crate::exam::ExamCategory;
use crate::exam_config::{ExamConfigCreateRequest, ExamConfigType};
use crate::ids::{SubjectId, TopicId};
use crate::settings::AiSettings;

type Validated<T> = std::result::Result<T, FieldErrors>;

// =============================================================================
// FIELD HELPERS
// =============================================================================

fn required(errors: &mut FieldErrors, field: &'static str, value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, "is required");
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn required_exam(errors: &mut FieldErrors, field: &'static str, value: &str) -> Option<ExamCategory> {
    let raw = required(errors, field, value)?;
    match raw.parse::<ExamCategory>() {
        Ok(exam) => Some(exam),
        Err(_) => {
            errors.push(field, format!("unknown exam category {raw:?}"));
            None
        }
    }
}

fn optional_number<T: FromStr>(errors: &mut FieldErrors, field: &'static str, value: &str) -> Option<T> {
    let raw = optional_text(value)?;
    match raw.parse::<T>() {
        Ok(number) => Some(number),
        Err(_) => {
            errors.push(field, format!("{raw:?} is not a valid number"));
            None
        }
    }
}

fn required_positive(errors: &mut FieldErrors, field: &'static str, value: &str) -> Option<u32> {
    let raw = required(errors, field, value)?;
    match raw.parse::<u32>() {
        Ok(number) if number > 0 => Some(number),
        _ => {
            errors.push(field, "must be a positive whole number");
            None
        }
    }
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Splits a comma-separated list, trimming entries and dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// SUBJECTS AND TOPICS
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct SubjectDraft {
    pub exam: String,
    pub name: String,
}

impl SubjectDraft {
    pub fn validate(&self) -> Validated<SubjectCreateRequest> {
        let mut errors = FieldErrors::new();
        let exam = required_exam(&mut errors, "exam", &self.exam);
        let name = required(&mut errors, "name", &self.name);
        match (exam, name) {
            (Some(exam), Some(name)) => Ok(SubjectCreateRequest { exam, name }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TopicDraft {
    pub subject_id: String,
    pub name: String,
}

impl TopicDraft {
    pub fn validate(&self) -> Validated<TopicCreateRequest> {
        let mut errors = FieldErrors::new();
        let subject_id = required(&mut errors, "subjectId", &self.subject_id)
            .and_then(|id| SubjectId::new(id).ok());
        let name = required(&mut errors, "name", &self.name);
        match (subject_id, name) {
            (Some(subject_id), Some(name)) => Ok(TopicCreateRequest { subject_id, name }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// QUESTIONS
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct QuestionDraft {
    pub question_text: String,
    pub exam: String,
    pub subject_id: String,
    pub topic_id: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: String,
    pub choice_type: String,
    pub difficulty_level: String,
    pub explanation: String,
    pub is_active: Option<bool>,
    pub is_clinical: Option<bool>,
    pub is_high_yield: Option<bool>,
    pub is_image_based: Option<bool>,
}

impl QuestionDraft {
    pub fn validate(&self) -> Validated<QuestionCreateRequest> {
        let mut errors = FieldErrors::new();
        let question_text = required(&mut errors, "questionText", &self.question_text);
        let exam = required_exam(&mut errors, "exam", &self.exam);
        let subject_id = required(&mut errors, "subjectId", &self.subject_id)
            .and_then(|id| SubjectId::new(id).ok());
        let topic_id =
            required(&mut errors, "topicId", &self.topic_id).and_then(|id| TopicId::new(id).ok());
        let option_a = required(&mut errors, "optionA", &self.option_a);
        let option_b = required(&mut errors, "optionB", &self.option_b);
        let option_c = required(&mut errors, "optionC", &self.option_c);
        let option_d = required(&mut errors, "optionD", &self.option_d);

        let correct_option = match self.correct_option.trim().parse::<u8>() {
            Ok(index @ 1..=4) => Some(index),
            _ => {
                errors.push("correctOption", "must be between 1 and 4");
                None
            }
        };
        let choice_type = match self.choice_type.trim().to_lowercase().as_str() {
            "" => None,
            "single" => Some(ChoiceType::Single),
            "multi" => Some(ChoiceType::Multi),
            other => {
                errors.push("choiceType", format!("unknown choice type {other:?}"));
                None
            }
        };
        let difficulty_level = optional_number::<u8>(&mut errors, "difficultyLevel", &self.difficulty_level);

        match (
            question_text,
            exam,
            subject_id,
            topic_id,
            option_a,
            option_b,
            option_c,
            option_d,
            correct_option,
        ) {
            (
                Some(question_text),
                Some(exam),
                Some(subject_id),
                Some(topic_id),
                Some(option_a),
                Some(option_b),
                Some(option_c),
                Some(option_d),
                Some(correct_option),
            ) if errors.is_empty() => Ok(QuestionCreateRequest {
                question_text,
                exam,
                subject_id,
                topic_id,
                option_a,
                option_b,
                option_c,
                option_d,
                correct_option,
                choice_type,
                difficulty_level,
                explanation: optional_text(&self.explanation),
                is_active: self.is_active,
                is_clinical: self.is_clinical,
                is_high_yield: self.is_high_yield,
                is_image_based: self.is_image_based,
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// EXAMS, COUPONS, PODCASTS
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ExamConfigDraft {
    pub name: String,
    pub exam: String,
    pub kind: String,
    pub description: String,
    pub num_questions: String,
    pub time_limit_minutes: String,
    pub entry_fee: String,
    pub marks_per_correct: String,
    pub negative_per_wrong: String,
    pub schedule_start_at: String,
    pub schedule_end_at: String,
}

impl ExamConfigDraft {
    pub fn validate(&self) -> Validated<ExamConfigCreateRequest> {
        let mut errors = FieldErrors::new();
        let name = required(&mut errors, "name", &self.name);
        let exam = required_exam(&mut errors, "exam", &self.exam);
        let kind = required(&mut errors, "type", &self.kind).and_then(|raw| {
            raw.parse::<ExamConfigType>()
                .map_err(|_| errors.push("type", format!("unknown exam type {raw:?}")))
                .ok()
        });
        let num_questions = required_positive(&mut errors, "numQuestions", &self.num_questions);
        let time_limit_minutes =
            required_positive(&mut errors, "timeLimitMinutes", &self.time_limit_minutes);
        let entry_fee = optional_number(&mut errors, "entryFee", &self.entry_fee);
        let marks_per_correct = optional_number(&mut errors, "marksPerCorrect", &self.marks_per_correct);
        let negative_per_wrong =
            optional_number(&mut errors, "negativePerWrong", &self.negative_per_wrong);

        match (name, exam, kind, num_questions, time_limit_minutes) {
            (Some(name), Some(exam), Some(kind), Some(num_questions), Some(time_limit_minutes))
                if errors.is_empty() =>
            {
                Ok(ExamConfigCreateRequest {
                    exam,
                    name,
                    num_questions,
                    time_limit_minutes,
                    kind,
                    description: optional_text(&self.description),
                    entry_fee,
                    marks_per_correct,
                    negative_per_wrong,
                    schedule_start_at: optional_text(&self.schedule_start_at),
                    schedule_end_at: optional_text(&self.schedule_end_at),
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CouponDraft {
    pub code: String,
    pub kind: String,
    pub amount: String,
    pub description: String,
    pub expires_at: String,
    pub is_active: Option<bool>,
    pub max_uses_per_user: String,
    pub max_uses_total: String,
}

impl CouponDraft {
    pub fn validate(&self) -> Validated<CouponRequest> {
        let mut errors = FieldErrors::new();
        let code = required(&mut errors, "code", &self.code);
        let kind = required(&mut errors, "type", &self.kind);
        let amount = optional_number(&mut errors, "amount", &self.amount);
        let max_uses_per_user = optional_number(&mut errors, "maxUsesPerUser", &self.max_uses_per_user);
        let max_uses_total = optional_number(&mut errors, "maxUsesTotal", &self.max_uses_total);

        match (code, kind) {
            (Some(code), Some(kind)) if errors.is_empty() => Ok(CouponRequest {
                code,
                kind,
                amount,
                description: optional_text(&self.description),
                expires_at: optional_text(&self.expires_at),
                is_active: self.is_active,
                max_uses_per_user,
                max_uses_total,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PodcastDraft {
    pub title: String,
    pub audio_url: String,
    pub exam: String,
    pub subject_id: String,
    pub topic_id: String,
    pub description: String,
    pub duration_seconds: String,
    pub tags: String,
    pub is_active: Option<bool>,
}

impl PodcastDraft {
    pub fn validate(&self) -> Validated<PodcastCreateRequest> {
        let mut errors = FieldErrors::new();
        let title = required(&mut errors, "title", &self.title);
        let audio_url = required(&mut errors, "audioUrl", &self.audio_url).and_then(|url| {
            if is_http_url(&url) {
                Some(url)
            } else {
                errors.push("audioUrl", "must be a valid URL");
                None
            }
        });
        let exam = required_exam(&mut errors, "exam", &self.exam);
        let duration_seconds = optional_number(&mut errors, "durationSeconds", &self.duration_seconds);

        match (title, audio_url, exam) {
            (Some(title), Some(audio_url), Some(exam)) if errors.is_empty() => {
                Ok(PodcastCreateRequest {
                    title,
                    audio_url,
                    exam,
                    subject_id: optional_text(&self.subject_id).and_then(|id| SubjectId::new(id).ok()),
                    topic_id: optional_text(&self.topic_id).and_then(|id| TopicId::new(id).ok()),
                    description: optional_text(&self.description),
                    is_active: self.is_active,
                    duration_seconds,
                    tags: split_list(&self.tags),
                })
            }
            _ => Err(errors),
        }
    }
}

// =============================================================================
// AI SETTINGS
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct AiSettingsDraft {
    pub include_guessed_correct: Option<bool>,
    pub revision_enabled: Option<bool>,
    /// Comma-separated day offsets, e.g. `"1, 3, 7"`.
    pub revision_intervals_days: String,
    pub strong_threshold_percent: String,
    pub weakness_min_attempts: String,
    pub weakness_threshold_percent: String,
}

impl AiSettingsDraft {
    pub fn from_settings(settings: &AiSettings) -> Self {
        let intervals = settings
            .revision_intervals_days
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            include_guessed_correct: settings.include_guessed_correct,
            revision_enabled: settings.revision_enabled,
            revision_intervals_days: intervals,
            strong_threshold_percent: settings
                .strong_threshold_percent
                .map(|value| value.to_string())
                .unwrap_or_default(),
            weakness_min_attempts: settings
                .weakness_min_attempts
                .map(|value| value.to_string())
                .unwrap_or_default(),
            weakness_threshold_percent: settings
                .weakness_threshold_percent
                .map(|value| value.to_string())
                .unwrap_or_default(),
        }
    }

    /// Entries that are not whole numbers are dropped rather than rejected.
    pub fn validate(&self) -> Validated<AiSettings> {
        let mut errors = FieldErrors::new();
        let intervals: Vec<u32> = self
            .revision_intervals_days
            .split(',')
            .filter_map(|item| item.trim().parse::<u32>().ok())
            .collect();
        let strong_threshold_percent =
            optional_number(&mut errors, "strongThresholdPercent", &self.strong_threshold_percent);
        let weakness_min_attempts =
            optional_number(&mut errors, "weaknessMinAttempts", &self.weakness_min_attempts);
        let weakness_threshold_percent = optional_number(
            &mut errors,
            "weaknessThresholdPercent",
            &self.weakness_threshold_percent,
        );
        let settings = AiSettings {
            include_guessed_correct: self.include_guessed_correct,
            revision_enabled: self.revision_enabled,
            revision_intervals_days: (!intervals.is_empty()).then_some(intervals),
            strong_threshold_percent,
            weakness_min_attempts,
            weakness_threshold_percent,
        };
        errors.into_result(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_draft() -> QuestionDraft {
        QuestionDraft {
            question_text: "Which nerve supplies the deltoid?".to_string(),
            exam: "NEET_PG".to_string(),
            subject_id: "anatomy".to_string(),
            topic_id: "upper-limb".to_string(),
            option_a: "Axillary".to_string(),
            option_b: "Radial".to_string(),
            option_c: "Ulnar".to_string(),
            option_d: "Median".to_string(),
            correct_option: "1".to_string(),
            choice_type: "single".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_subject_draft_requires_name_and_exam() {
        let errors = SubjectDraft::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message_for("name"), Some("is required"));

        let request = SubjectDraft {
            exam: "jee".to_string(),
            name: " Physics ".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(request.exam, ExamCategory::Jee);
        assert_eq!(request.name, "Physics");
    }

    #[test]
    fn test_topic_draft_requires_subject() {
        let errors = TopicDraft {
            subject_id: String::new(),
            name: "Optics".to_string(),
        }
        .validate()
        .unwrap_err();
        assert!(errors.message_for("subjectId").is_some());
    }

    #[test]
    fn test_question_draft_valid() {
        let request = question_draft().validate().unwrap();
        assert_eq!(request.correct_option, 1);
        assert_eq!(request.choice_type, Some(ChoiceType::Single));
        assert_eq!(request.difficulty_level, None);
        assert_eq!(request.explanation, None);
    }

    #[test]
    fn test_question_draft_rejects_out_of_range_option() {
        let mut draft = question_draft();
        draft.correct_option = "5".to_string();
        draft.difficulty_level = "hard".to_string();
        let errors = draft.validate().unwrap_err();
        assert!(errors.message_for("correctOption").is_some());
        assert!(errors.message_for("difficultyLevel").is_some());
    }

    #[test]
    fn test_question_draft_without_topic_is_rejected() {
        let mut draft = question_draft();
        draft.topic_id = String::new();
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.message_for("topicId"), Some("is required"));
    }

    #[test]
    fn test_exam_draft_requires_positive_counts() {
        let draft = ExamConfigDraft {
            name: "Grand mock".to_string(),
            exam: "UPSC".to_string(),
            kind: "MOCK".to_string(),
            num_questions: "0".to_string(),
            time_limit_minutes: "120".to_string(),
            ..Default::default()
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.message_for("numQuestions").is_some());
    }

    #[test]
    fn test_exam_draft_valid() {
        let request = ExamConfigDraft {
            name: "Daily 10".to_string(),
            exam: "NEET_UG".to_string(),
            kind: "daily test".to_string(),
            num_questions: "10".to_string(),
            time_limit_minutes: "15".to_string(),
            entry_fee: "0".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(request.kind, ExamConfigType::DailyTest);
        assert_eq!(request.entry_fee, Some(0.0));
        assert_eq!(request.marks_per_correct, None);
    }

    #[test]
    fn test_coupon_draft_numbers() {
        let request = CouponDraft {
            code: "SAVE20".to_string(),
            kind: "PERCENT".to_string(),
            amount: "20".to_string(),
            max_uses_total: "".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(request.amount, Some(20.0));
        assert_eq!(request.max_uses_total, None);

        let errors = CouponDraft {
            code: "X".to_string(),
            kind: "FLAT".to_string(),
            max_uses_per_user: "many".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(errors.message_for("maxUsesPerUser").is_some());
    }

    #[test]
    fn test_podcast_draft_url_and_tags() {
        let draft = PodcastDraft {
            title: "Renal physiology".to_string(),
            audio_url: "https://cdn.example.com/ep1.mp3".to_string(),
            exam: "NEET_PG".to_string(),
            tags: "kidney, , high-yield ".to_string(),
            ..Default::default()
        };
        let request = draft.validate().unwrap();
        assert_eq!(request.tags, vec!["kidney", "high-yield"]);
        assert_eq!(request.subject_id, None);

        let errors = PodcastDraft {
            audio_url: "ftp://files".to_string(),
            ..draft
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.message_for("audioUrl"), Some("must be a valid URL"));
    }

    #[test]
    fn test_ai_settings_draft_drops_non_numeric_intervals() {
        let settings = AiSettingsDraft {
            revision_intervals_days: "1, 3, x, 7".to_string(),
            strong_threshold_percent: "".to_string(),
            weakness_min_attempts: "5".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(settings.revision_intervals_days, Some(vec![1, 3, 7]));
        assert_eq!(settings.strong_threshold_percent, None);
        assert_eq!(settings.weakness_min_attempts, Some(5));
    }

    #[test]
    fn test_ai_settings_draft_round_trips_existing_settings() {
        let settings = AiSettings {
            revision_intervals_days: Some(vec![2, 4]),
            weakness_threshold_percent: Some(40.0),
            ..Default::default()
        };
        let draft = AiSettingsDraft::from_settings(&settings);
        assert_eq!(draft.revision_intervals_days, "2, 4");
        assert_eq!(draft.validate().unwrap(), settings);
    }
}
