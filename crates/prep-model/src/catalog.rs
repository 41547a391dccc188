//! Subjects, topics and questions: the content catalog.
//!
//! Topics belong to a subject and subjects belong to an exam category, so the
//! exam of a topic is always reached through its parent subject.

use serde::{Deserialize, Serialize};

use crate::exam::ExamCategory;
use crate::ids::{SubjectId, TopicId};

// =============================================================================
// SUBJECTS AND TOPICS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub exam: ExamCategory,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: TopicId,
    pub subject_id: SubjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectCreateRequest {
    pub exam: ExamCategory,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicCreateRequest {
    pub subject_id: SubjectId,
    pub name: String,
}

// =============================================================================
// QUESTIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceType {
    #[default]
    Single,
    Multi,
}

impl ChoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question_text: String,
    pub exam: ExamCategory,
    pub subject_id: SubjectId,
    pub topic_id: TopicId,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    /// One-based index of the correct option (1 = A).
    pub correct_option: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_type: Option<ChoiceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_clinical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_high_yield: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_image_based: Option<bool>,
}

impl Question {
    /// Text of the correct option, if the index is in range.
    pub fn correct_option_text(&self) -> Option<&str> {
        match self.correct_option {
            1 => Some(&self.option_a),
            2 => Some(&self.option_b),
            3 => Some(&self.option_c),
            4 => Some(&self.option_d),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCreateRequest {
    pub question_text: String,
    pub exam: ExamCategory,
    pub subject_id: SubjectId,
    pub topic_id: TopicId,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_type: Option<ChoiceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_clinical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_high_yield: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_image_based: Option<bool>,
}

/// Partial update; absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam: Option<ExamCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<SubjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_a: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_b: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_d: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_type: Option<ChoiceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl From<QuestionCreateRequest> for QuestionUpdateRequest {
    fn from(request: QuestionCreateRequest) -> Self {
        Self {
            question_text: Some(request.question_text),
            exam: Some(request.exam),
            subject_id: Some(request.subject_id),
            topic_id: Some(request.topic_id),
            option_a: Some(request.option_a),
            option_b: Some(request.option_b),
            option_c: Some(request.option_c),
            option_d: Some(request.option_d),
            correct_option: Some(request.correct_option),
            choice_type: request.choice_type,
            difficulty_level: request.difficulty_level,
            explanation: request.explanation,
            is_active: request.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_decodes_camel_case() {
        let subject: Subject =
            serde_json::from_str(r#"{"id":"s1","exam":"NEET_PG","name":"Anatomy"}"#).unwrap();
        assert_eq!(subject.id.as_str(), "s1");
        assert_eq!(subject.exam, ExamCategory::NeetPg);
        assert_eq!(subject.is_active, None);
    }

    #[test]
    fn test_topic_decodes_subject_id() {
        let topic: Topic =
            serde_json::from_str(r#"{"id":"t1","subjectId":"s1","name":"Upper limb","isActive":true}"#)
                .unwrap();
        assert_eq!(topic.subject_id.as_str(), "s1");
        assert_eq!(topic.is_active, Some(true));
    }

    #[test]
    fn test_question_correct_option_text() {
        let question: Question = serde_json::from_str(
            r#"{"id":"q1","questionText":"2+2?","exam":"JEE","subjectId":"s","topicId":"t",
                "optionA":"3","optionB":"4","optionC":"5","optionD":"6","correctOption":2,
                "choiceType":"single"}"#,
        )
        .unwrap();
        assert_eq!(question.correct_option_text(), Some("4"));
        assert_eq!(question.choice_type, Some(ChoiceType::Single));
    }

    #[test]
    fn test_update_request_skips_absent_fields() {
        let update = QuestionUpdateRequest {
            explanation: Some("because".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"explanation":"because"}"#);
    }
}
