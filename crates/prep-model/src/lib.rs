//! Domain model for the exam-prep admin back office.
//!
//! Wire types mirror the admin API's camelCase JSON. Every optional field
//! decodes leniently so partially populated server payloads never fail.

pub mod analytics;
pub mod catalog;
pub mod content;
pub mod error;
pub mod exam;
pub mod exam_config;
pub mod ids;
pub mod settings;
pub mod users;
pub mod validate;

pub use analytics::{
    AdminEvent, AdminEventsResponse, AdminReferralSummary, AnalyticsMetric, AnalyticsOverview,
    AnalyticsTimeSeries, DateRange, SubjectAccuracy, SubjectAccuracyResponse, TimeSeriesPoint,
    WeakTopic, WeakTopicsResponse,
};
pub use catalog::{
    ChoiceType, Question, QuestionCreateRequest, QuestionUpdateRequest, Subject,
    SubjectCreateRequest, Topic, TopicCreateRequest,
};
pub use content::{Coupon, CouponRequest, PodcastCreateRequest, PodcastEpisode};
pub use error::{FieldError, FieldErrors, ModelError, Result};
pub use exam::{ExamCategory, ExamSelection};
pub use exam_config::{
    ExamConfig, ExamConfigCreateRequest, ExamConfigType, ExamConfigUpdateRequest, ExamStatus,
};
pub use ids::{SubjectId, TopicId};
pub use settings::AiSettings;
pub use users::{
    AdminUser, AdminUserList, BulkDeleteRequest, BulkDeleteResponse, BulkStatusRequest,
    BulkStatusResponse, InviteRequest, InviteResponse, UserCreateRequest, UserRole,
    UserUpdateRequest,
};
