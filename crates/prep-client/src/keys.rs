//! Strongly typed query keys.
//!
//! A key identifies one cacheable read: the resource plus its normalized
//! filter values. Two keys are equal exactly when the server would be asked
//! the same question. [`QueryKey::family`] is the invalidation granularity.

use prep_model::{AnalyticsMetric, DateRange, ExamCategory, SubjectId, TopicId, UserRole};

use crate::transport::ApiRequest;

/// Number of weak topics the dashboard asks for.
pub const WEAK_TOPICS_LIMIT: u32 = 10;

/// First segment of a query key; what a mutation invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceFamily {
    Subjects,
    Topics,
    Questions,
    Exams,
    Coupons,
    Podcasts,
    Users,
    AiSettings,
    AnalyticsOverview,
    AnalyticsTimeSeries,
    SubjectAccuracy,
    WeakTopics,
    Events,
    Referrals,
}

impl ResourceFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subjects => "subjects",
            Self::Topics => "topics",
            Self::Questions => "questions",
            Self::Exams => "exams",
            Self::Coupons => "coupons",
            Self::Podcasts => "podcasts",
            Self::Users => "users",
            Self::AiSettings => "ai-settings",
            Self::AnalyticsOverview => "analytics-overview",
            Self::AnalyticsTimeSeries => "analytics-time-series",
            Self::SubjectAccuracy => "subject-accuracy",
            Self::WeakTopics => "weak-topics",
            Self::Events => "events",
            Self::Referrals => "referrals",
        }
    }

    /// Collection path for CRUD families.
    pub fn collection_path(&self) -> &'static str {
        match self {
            Self::Subjects => "/admin/subjects",
            Self::Topics => "/admin/topics",
            Self::Questions => "/admin/questions",
            Self::Exams => "/admin/exams",
            Self::Coupons => "/admin/coupons",
            Self::Podcasts => "/admin/podcasts",
            Self::Users => "/admin/users",
            Self::AiSettings => "/admin/ai-settings",
            Self::AnalyticsOverview => "/admin/analytics/overview",
            Self::AnalyticsTimeSeries => "/admin/analytics/time-series",
            Self::SubjectAccuracy => "/admin/analytics/subject-accuracy",
            Self::WeakTopics => "/admin/analytics/weak-topics",
            Self::Events => "/admin/events/upcoming",
            Self::Referrals => "/admin/referrals/summary",
        }
    }

    /// Path of a single record in a CRUD family.
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{id}", self.collection_path())
    }
}

// =============================================================================
// FILTERS
// =============================================================================

fn push_exam(query: &mut Vec<(&'static str, String)>, exam: Option<ExamCategory>) {
    if let Some(exam) = exam {
        query.push(("exam", exam.as_str().to_string()));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QuestionFilters {
    pub exam: Option<ExamCategory>,
    pub subject_id: Option<SubjectId>,
    pub topic_id: Option<TopicId>,
}

impl QuestionFilters {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        push_exam(&mut query, self.exam);
        if let Some(subject_id) = &self.subject_id {
            query.push(("subjectId", subject_id.to_string()));
        }
        if let Some(topic_id) = &self.topic_id {
            query.push(("topicId", topic_id.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExamFilters {
    pub exam: Option<ExamCategory>,
}

/// User list filters. Build with [`UserFilters::normalized`] so equivalent
/// filters share one cache entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UserFilters {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Vec<String>,
    pub role: Vec<UserRole>,
    pub username: Option<String>,
}

impl UserFilters {
    /// Drops zero pages, blank statuses and blank usernames.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.page = self.page.filter(|page| *page > 0);
        self.page_size = self.page_size.filter(|size| *size > 0);
        self.status = self
            .status
            .into_iter()
            .map(|status| status.trim().to_string())
            .filter(|status| !status.is_empty())
            .collect();
        self.username = self
            .username
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        self
    }

    /// The API accepts many statuses (comma-joined) but a single role, so
    /// only the first role is sent.
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("pageSize", page_size.to_string()));
        }
        if let Some(username) = &self.username {
            query.push(("username", username.clone()));
        }
        if !self.status.is_empty() {
            query.push(("status", self.status.join(",")));
        }
        if let Some(role) = self.role.first() {
            query.push(("role", role.as_str().to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AnalyticsFilters {
    pub exam: Option<ExamCategory>,
    pub range: DateRange,
}

impl AnalyticsFilters {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        push_exam(&mut query, self.exam);
        query.push(("range", self.range.as_param().to_string()));
        query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSeriesFilters {
    pub exam: Option<ExamCategory>,
    pub range: DateRange,
    pub metric: AnalyticsMetric,
}

// =============================================================================
// QUERY KEY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Subjects,
    /// `None` is "no subject selected", distinct from a subject with no topics.
    Topics {
        subject_id: Option<SubjectId>,
    },
    Questions(QuestionFilters),
    QuestionDetail(String),
    Exams(ExamFilters),
    ExamDetail(String),
    Coupons,
    CouponDetail(String),
    Podcasts,
    PodcastDetail(String),
    Users(UserFilters),
    AiSettings,
    AnalyticsOverview(AnalyticsFilters),
    AnalyticsTimeSeries(TimeSeriesFilters),
    SubjectAccuracy {
        exam: Option<ExamCategory>,
    },
    WeakTopics {
        exam: Option<ExamCategory>,
        limit: u32,
    },
    UpcomingEvents {
        exam: Option<ExamCategory>,
    },
    Referrals {
        range: DateRange,
    },
}

impl QueryKey {
    pub fn family(&self) -> ResourceFamily {
        match self {
            Self::Subjects => ResourceFamily::Subjects,
            Self::Topics { .. } => ResourceFamily::Topics,
            Self::Questions(_) | Self::QuestionDetail(_) => ResourceFamily::Questions,
            Self::Exams(_) | Self::ExamDetail(_) => ResourceFamily::Exams,
            Self::Coupons | Self::CouponDetail(_) => ResourceFamily::Coupons,
            Self::Podcasts | Self::PodcastDetail(_) => ResourceFamily::Podcasts,
            Self::Users(_) => ResourceFamily::Users,
            Self::AiSettings => ResourceFamily::AiSettings,
            Self::AnalyticsOverview(_) => ResourceFamily::AnalyticsOverview,
            Self::AnalyticsTimeSeries(_) => ResourceFamily::AnalyticsTimeSeries,
            Self::SubjectAccuracy { .. } => ResourceFamily::SubjectAccuracy,
            Self::WeakTopics { .. } => ResourceFamily::WeakTopics,
            Self::UpcomingEvents { .. } => ResourceFamily::Events,
            Self::Referrals { .. } => ResourceFamily::Referrals,
        }
    }

    /// The GET request that loads this key.
    pub fn to_request(&self) -> ApiRequest {
        let family = self.family();
        match self {
            Self::Subjects | Self::Coupons | Self::Podcasts | Self::AiSettings => {
                ApiRequest::get(family.collection_path())
            }
            Self::Topics { subject_id } => {
                let query = subject_id
                    .iter()
                    .map(|id| ("subjectId", id.to_string()))
                    .collect();
                ApiRequest::get(family.collection_path()).with_query(query)
            }
            Self::Questions(filters) => {
                ApiRequest::get(family.collection_path()).with_query(filters.query())
            }
            Self::QuestionDetail(id)
            | Self::ExamDetail(id)
            | Self::CouponDetail(id)
            | Self::PodcastDetail(id) => ApiRequest::get(family.item_path(id)),
            Self::Exams(filters) => {
                let mut query = Vec::new();
                push_exam(&mut query, filters.exam);
                ApiRequest::get(family.collection_path()).with_query(query)
            }
            Self::Users(filters) => {
                ApiRequest::get(family.collection_path()).with_query(filters.query())
            }
            Self::AnalyticsOverview(filters) => {
                ApiRequest::get(family.collection_path()).with_query(filters.query())
            }
            Self::AnalyticsTimeSeries(filters) => {
                let mut query = AnalyticsFilters {
                    exam: filters.exam,
                    range: filters.range,
                }
                .query();
                query.push(("metric", filters.metric.as_param().to_string()));
                ApiRequest::get(family.collection_path()).with_query(query)
            }
            Self::SubjectAccuracy { exam } | Self::UpcomingEvents { exam } => {
                let mut query = Vec::new();
                push_exam(&mut query, *exam);
                ApiRequest::get(family.collection_path()).with_query(query)
            }
            Self::WeakTopics { exam, limit } => {
                let mut query = Vec::new();
                push_exam(&mut query, *exam);
                query.push(("limit", limit.to_string()));
                ApiRequest::get(family.collection_path()).with_query(query)
            }
            Self::Referrals { range } => ApiRequest::get(family.collection_path())
                .with_query(vec![("range", range.as_param().to_string())]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: &str) -> SubjectId {
        SubjectId::new(id).unwrap()
    }

    #[test]
    fn test_topic_keys_distinguish_no_subject_from_subject() {
        let none = QueryKey::Topics { subject_id: None };
        let some = QueryKey::Topics {
            subject_id: Some(subject("s1")),
        };
        assert_ne!(none, some);
        assert_eq!(none.family(), some.family());
        assert!(none.to_request().query.is_empty());
        assert_eq!(
            some.to_request().query,
            vec![("subjectId", "s1".to_string())]
        );
    }

    #[test]
    fn test_detail_keys_share_family_with_lists() {
        let list = QueryKey::Questions(QuestionFilters::default());
        let detail = QueryKey::QuestionDetail("q1".to_string());
        assert_eq!(list.family(), detail.family());
        assert_eq!(detail.to_request().path, "/admin/questions/q1");
    }

    #[test]
    fn test_all_exams_sends_no_exam_parameter() {
        let key = QueryKey::AnalyticsOverview(AnalyticsFilters {
            exam: None,
            range: DateRange::Last30Days,
        });
        assert_eq!(key.to_request().query, vec![("range", "30d".to_string())]);

        let key = QueryKey::AnalyticsTimeSeries(TimeSeriesFilters {
            exam: Some(ExamCategory::Jee),
            range: DateRange::Today,
            metric: AnalyticsMetric::QuestionsAnswered,
        });
        let request = key.to_request();
        assert_eq!(request.path, "/admin/analytics/time-series");
        assert_eq!(
            request.query,
            vec![
                ("exam", "JEE".to_string()),
                ("range", "today".to_string()),
                ("metric", "questions_answered".to_string()),
            ]
        );
    }

    #[test]
    fn test_user_filters_normalize_to_the_same_key() {
        let a = UserFilters {
            page: Some(0),
            username: Some("  ".to_string()),
            status: vec![" ".to_string()],
            ..Default::default()
        }
        .normalized();
        assert_eq!(a, UserFilters::default());
    }

    #[test]
    fn test_user_filters_query() {
        let filters = UserFilters {
            page: Some(2),
            page_size: Some(25),
            status: vec!["ACTIVE".to_string(), "BLOCKED".to_string()],
            role: vec![UserRole::Admin, UserRole::User],
            username: Some("ravi".to_string()),
        };
        let request = QueryKey::Users(filters).to_request();
        assert_eq!(
            request.query,
            vec![
                ("page", "2".to_string()),
                ("pageSize", "25".to_string()),
                ("username", "ravi".to_string()),
                ("status", "ACTIVE,BLOCKED".to_string()),
                ("role", "ADMIN".to_string()),
            ]
        );
    }

    #[test]
    fn test_weak_topics_carry_limit() {
        let request = QueryKey::WeakTopics {
            exam: Some(ExamCategory::NeetUg),
            limit: WEAK_TOPICS_LIMIT,
        }
        .to_request();
        assert_eq!(request.path, "/admin/analytics/weak-topics");
        assert_eq!(
            request.query,
            vec![("exam", "NEET_UG".to_string()), ("limit", "10".to_string())]
        );
    }
}
