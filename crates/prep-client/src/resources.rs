//! Typed resource operations over the query cache.
//!
//! Reads go through [`QueryCache::fetch`]; every successful mutation
//! invalidates its family (and detail key) before returning, so any read
//! issued afterwards goes back to the server.

use std::sync::Arc;

use prep_model::{
    AdminEventsResponse, AdminReferralSummary, AdminUser, AdminUserList, AiSettings,
    AnalyticsOverview, AnalyticsTimeSeries, BulkDeleteRequest, BulkDeleteResponse,
    BulkStatusRequest, BulkStatusResponse, Coupon, CouponRequest, DateRange, ExamCategory,
    ExamConfig, ExamConfigCreateRequest, ExamConfigUpdateRequest, InviteRequest, InviteResponse,
    PodcastCreateRequest, PodcastEpisode, Question, QuestionCreateRequest, QuestionUpdateRequest,
    Subject, SubjectAccuracyResponse, SubjectCreateRequest, SubjectId, Topic, TopicCreateRequest,
    UserCreateRequest, UserUpdateRequest, WeakTopicsResponse,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::cache::{Invalidation, QueryCache};
use crate::error::Result;
use crate::keys::{
    AnalyticsFilters, ExamFilters, QueryKey, QuestionFilters, ResourceFamily, TimeSeriesFilters,
    UserFilters,
};
use crate::transport::{ApiRequest, Method, Transport};

/// Admin API client: a transport plus a shared query cache.
pub struct AdminClient<T> {
    transport: Arc<T>,
    cache: Arc<QueryCache>,
}

impl<T> Clone for AdminClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<T: Transport + 'static> AdminClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_cache(Arc::new(transport), Arc::new(QueryCache::new()))
    }

    pub fn with_cache(transport: Arc<T>, cache: Arc<QueryCache>) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // =========================================================================
    // PLUMBING
    // =========================================================================

    async fn query_value(&self, key: &QueryKey) -> Result<Value> {
        let request = key.to_request();
        let transport = Arc::clone(&self.transport);
        self.cache
            .fetch(key, move || async move { transport.execute(request).await })
            .await
    }

    async fn query<R: DeserializeOwned>(&self, key: QueryKey) -> Result<R> {
        let value = self.query_value(&key).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// A `null` body decodes as the empty value.
    async fn query_or_default<R: DeserializeOwned + Default>(&self, key: QueryKey) -> Result<R> {
        let value = self.query_value(&key).await?;
        let decoded: Option<R> = serde_json::from_value(value)?;
        Ok(decoded.unwrap_or_default())
    }

    async fn mutate<B, R>(
        &self,
        method: Method,
        path: String,
        body: Option<&B>,
        invalidations: &[Invalidation],
    ) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let mut request = ApiRequest::new(method, path);
        if let Some(body) = body {
            request = request.with_body(serde_json::to_value(body)?);
        }
        let path = request.path.clone();
        let value = self.transport.execute(request).await?;
        for invalidation in invalidations {
            self.cache.invalidate(invalidation);
        }
        info!(method = method.as_str(), %path, "mutation applied");
        Ok(serde_json::from_value(value)?)
    }

    async fn mutate_without_response<B: Serialize>(
        &self,
        method: Method,
        path: String,
        body: Option<&B>,
        invalidations: &[Invalidation],
    ) -> Result<()> {
        let _: Value = self.mutate(method, path, body, invalidations).await?;
        Ok(())
    }

    fn family(family: ResourceFamily) -> Invalidation {
        Invalidation::Family(family)
    }

    // =========================================================================
    // SUBJECTS AND TOPICS
    // =========================================================================

    pub async fn subjects(&self) -> Result<Vec<Subject>> {
        self.query_or_default(QueryKey::Subjects).await
    }

    pub async fn create_subject(&self, request: &SubjectCreateRequest) -> Result<Subject> {
        self.mutate(
            Method::Post,
            ResourceFamily::Subjects.collection_path().to_string(),
            Some(request),
            &[Self::family(ResourceFamily::Subjects)],
        )
        .await
    }

    /// Topics of one subject, or every topic when `subject_id` is `None`.
    pub async fn topics(&self, subject_id: Option<&SubjectId>) -> Result<Vec<Topic>> {
        self.query_or_default(QueryKey::Topics {
            subject_id: subject_id.cloned(),
        })
        .await
    }

    pub async fn create_topic(&self, request: &TopicCreateRequest) -> Result<Topic> {
        self.mutate(
            Method::Post,
            ResourceFamily::Topics.collection_path().to_string(),
            Some(request),
            &[Self::family(ResourceFamily::Topics)],
        )
        .await
    }

    // =========================================================================
    // QUESTIONS
    // =========================================================================

    pub async fn questions(&self, filters: QuestionFilters) -> Result<Vec<Question>> {
        self.query_or_default(QueryKey::Questions(filters)).await
    }

    pub async fn question(&self, id: &str) -> Result<Question> {
        self.query(QueryKey::QuestionDetail(id.to_string())).await
    }

    pub async fn create_question(&self, request: &QuestionCreateRequest) -> Result<Question> {
        self.mutate(
            Method::Post,
            ResourceFamily::Questions.collection_path().to_string(),
            Some(request),
            &[Self::family(ResourceFamily::Questions)],
        )
        .await
    }

    pub async fn update_question(
        &self,
        id: &str,
        request: &QuestionUpdateRequest,
    ) -> Result<Question> {
        self.mutate(
            Method::Patch,
            ResourceFamily::Questions.item_path(id),
            Some(request),
            &[
                Self::family(ResourceFamily::Questions),
                Invalidation::Exact(QueryKey::QuestionDetail(id.to_string())),
            ],
        )
        .await
    }

    pub async fn delete_question(&self, id: &str) -> Result<()> {
        self.mutate_without_response::<Value>(
            Method::Delete,
            ResourceFamily::Questions.item_path(id),
            None,
            &[Self::family(ResourceFamily::Questions)],
        )
        .await
    }

    // =========================================================================
    // EXAMS
    // =========================================================================

    pub async fn exams(&self, exam: Option<ExamCategory>) -> Result<Vec<ExamConfig>> {
        self.query_or_default(QueryKey::Exams(ExamFilters { exam })).await
    }

    pub async fn exam(&self, id: &str) -> Result<ExamConfig> {
        self.query(QueryKey::ExamDetail(id.to_string())).await
    }

    pub async fn create_exam(&self, request: &ExamConfigCreateRequest) -> Result<ExamConfig> {
        self.mutate(
            Method::Post,
            ResourceFamily::Exams.collection_path().to_string(),
            Some(request),
            &[Self::family(ResourceFamily::Exams)],
        )
        .await
    }

    pub async fn update_exam(
        &self,
        id: &str,
        request: &ExamConfigUpdateRequest,
    ) -> Result<ExamConfig> {
        self.mutate(
            Method::Patch,
            ResourceFamily::Exams.item_path(id),
            Some(request),
            &[
                Self::family(ResourceFamily::Exams),
                Invalidation::Exact(QueryKey::ExamDetail(id.to_string())),
            ],
        )
        .await
    }

    pub async fn delete_exam(&self, id: &str) -> Result<()> {
        self.mutate_without_response::<Value>(
            Method::Delete,
            ResourceFamily::Exams.item_path(id),
            None,
            &[Self::family(ResourceFamily::Exams)],
        )
        .await
    }

    // =========================================================================
    // COUPONS AND PODCASTS
    // =========================================================================

    pub async fn coupons(&self) -> Result<Vec<Coupon>> {
        self.query_or_default(QueryKey::Coupons).await
    }

    pub async fn coupon(&self, id: &str) -> Result<Coupon> {
        self.query(QueryKey::CouponDetail(id.to_string())).await
    }

    pub async fn create_coupon(&self, request: &CouponRequest) -> Result<Coupon> {
        self.mutate(
            Method::Post,
            ResourceFamily::Coupons.collection_path().to_string(),
            Some(request),
            &[Self::family(ResourceFamily::Coupons)],
        )
        .await
    }

    pub async fn update_coupon(&self, id: &str, request: &CouponRequest) -> Result<Coupon> {
        self.mutate(
            Method::Patch,
            ResourceFamily::Coupons.item_path(id),
            Some(request),
            &[
                Self::family(ResourceFamily::Coupons),
                Invalidation::Exact(QueryKey::CouponDetail(id.to_string())),
            ],
        )
        .await
    }

    pub async fn delete_coupon(&self, id: &str) -> Result<()> {
        self.mutate_without_response::<Value>(
            Method::Delete,
            ResourceFamily::Coupons.item_path(id),
            None,
            &[Self::family(ResourceFamily::Coupons)],
        )
        .await
    }

    pub async fn podcasts(&self) -> Result<Vec<PodcastEpisode>> {
        self.query_or_default(QueryKey::Podcasts).await
    }

    pub async fn podcast(&self, id: &str) -> Result<PodcastEpisode> {
        self.query(QueryKey::PodcastDetail(id.to_string())).await
    }

    pub async fn create_podcast(&self, request: &PodcastCreateRequest) -> Result<PodcastEpisode> {
        self.mutate(
            Method::Post,
            ResourceFamily::Podcasts.collection_path().to_string(),
            Some(request),
            &[Self::family(ResourceFamily::Podcasts)],
        )
        .await
    }

    pub async fn update_podcast(
        &self,
        id: &str,
        request: &PodcastCreateRequest,
    ) -> Result<PodcastEpisode> {
        self.mutate(
            Method::Patch,
            ResourceFamily::Podcasts.item_path(id),
            Some(request),
            &[
                Self::family(ResourceFamily::Podcasts),
                Invalidation::Exact(QueryKey::PodcastDetail(id.to_string())),
            ],
        )
        .await
    }

    pub async fn delete_podcast(&self, id: &str) -> Result<()> {
        self.mutate_without_response::<Value>(
            Method::Delete,
            ResourceFamily::Podcasts.item_path(id),
            None,
            &[Self::family(ResourceFamily::Podcasts)],
        )
        .await
    }

    // =========================================================================
    // USERS
    // =========================================================================

    pub async fn users(&self, filters: UserFilters) -> Result<AdminUserList> {
        self.query_or_default(QueryKey::Users(filters.normalized()))
            .await
    }

    pub async fn create_user(&self, request: &UserCreateRequest) -> Result<AdminUser> {
        self.mutate(
            Method::Post,
            ResourceFamily::Users.collection_path().to_string(),
            Some(request),
            &[Self::family(ResourceFamily::Users)],
        )
        .await
    }

    pub async fn update_user(&self, id: &str, request: &UserUpdateRequest) -> Result<AdminUser> {
        self.mutate(
            Method::Patch,
            ResourceFamily::Users.item_path(id),
            Some(request),
            &[Self::family(ResourceFamily::Users)],
        )
        .await
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.mutate_without_response::<Value>(
            Method::Delete,
            ResourceFamily::Users.item_path(id),
            None,
            &[Self::family(ResourceFamily::Users)],
        )
        .await
    }

    pub async fn bulk_user_status(&self, request: &BulkStatusRequest) -> Result<BulkStatusResponse> {
        self.mutate(
            Method::Post,
            ResourceFamily::Users.item_path("bulk-status"),
            Some(request),
            &[Self::family(ResourceFamily::Users)],
        )
        .await
    }

    pub async fn bulk_delete_users(&self, request: &BulkDeleteRequest) -> Result<BulkDeleteResponse> {
        self.mutate(
            Method::Post,
            ResourceFamily::Users.item_path("bulk-delete"),
            Some(request),
            &[Self::family(ResourceFamily::Users)],
        )
        .await
    }

    pub async fn invite_user(&self, request: &InviteRequest) -> Result<InviteResponse> {
        self.mutate(
            Method::Post,
            ResourceFamily::Users.item_path("invite"),
            Some(request),
            &[Self::family(ResourceFamily::Users)],
        )
        .await
    }

    // =========================================================================
    // AI SETTINGS
    // =========================================================================

    pub async fn ai_settings(&self) -> Result<AiSettings> {
        self.query_or_default(QueryKey::AiSettings).await
    }

    pub async fn update_ai_settings(&self, settings: &AiSettings) -> Result<AiSettings> {
        self.mutate(
            Method::Put,
            ResourceFamily::AiSettings.collection_path().to_string(),
            Some(settings),
            &[Self::family(ResourceFamily::AiSettings)],
        )
        .await
    }

    // =========================================================================
    // ANALYTICS
    // =========================================================================

    pub async fn analytics_overview(&self, filters: AnalyticsFilters) -> Result<AnalyticsOverview> {
        self.query_or_default(QueryKey::AnalyticsOverview(filters)).await
    }

    pub async fn analytics_time_series(
        &self,
        filters: TimeSeriesFilters,
    ) -> Result<AnalyticsTimeSeries> {
        self.query_or_default(QueryKey::AnalyticsTimeSeries(filters)).await
    }

    pub async fn subject_accuracy(
        &self,
        exam: Option<ExamCategory>,
    ) -> Result<SubjectAccuracyResponse> {
        self.query_or_default(QueryKey::SubjectAccuracy { exam }).await
    }

    pub async fn weak_topics(
        &self,
        exam: Option<ExamCategory>,
        limit: u32,
    ) -> Result<WeakTopicsResponse> {
        self.query_or_default(QueryKey::WeakTopics { exam, limit }).await
    }

    pub async fn upcoming_events(&self, exam: Option<ExamCategory>) -> Result<AdminEventsResponse> {
        self.query_or_default(QueryKey::UpcomingEvents { exam }).await
    }

    pub async fn referral_summary(&self, range: DateRange) -> Result<AdminReferralSummary> {
        self.query_or_default(QueryKey::Referrals { range }).await
    }
}
