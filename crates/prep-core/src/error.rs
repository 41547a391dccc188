use prep_client::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("a subject must be selected before choosing a topic")]
    TopicWithoutSubject,
    #[error("topic {topic} does not belong to subject {subject}")]
    TopicOutsideSubject { topic: String, subject: String },
    #[error("subject {0} is not available for the selected exam")]
    SubjectOutsideExam(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
