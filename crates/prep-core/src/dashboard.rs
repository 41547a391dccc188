//! Analytics dashboard: independent tiles keyed by (exam, range).
//!
//! Every tile has its own [`TileState`]. A change of exam (through the
//! shared [`SelectionStore`]) or of range puts all tiles back into
//! `Loading` synchronously; [`Dashboard::refresh`] then fetches every tile
//! concurrently and lands each result on its own, as long as the key it was
//! fetched for is still the current one.
//!
//! Chart tiles keep their previous frame while loading. KPI cards and tables
//! do not.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use prep_client::{
    AdminClient, AnalyticsFilters, ApiError, TimeSeriesFilters, Transport, WEAK_TOPICS_LIMIT,
};
use prep_model::{AnalyticsMetric, DateRange, ExamSelection};
use tracing::{debug, info, warn};

use crate::derive::{
    ActivityPoint, EventRow, StatCard, SubjectAccuracyBar, WeakTopicRow, build_referral_snapshot,
    event_rows, filter_server_scoped, format_time_series, overview_cards, sort_weak_topics,
    subject_accuracy_bars, weak_topic_rows,
};
use crate::selection::{SelectionStore, Subscription};

// ============================================================================
// Tile state
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TileState<T> {
    Loading { previous: Option<T> },
    Ready(T),
    Empty,
    Error(ApiError),
}

impl<T> Default for TileState<T> {
    fn default() -> Self {
        Self::Loading { previous: None }
    }
}

impl<T> TileState<T> {
    /// `Ok(None)` is a successful fetch without data.
    pub fn settle(result: Result<Option<T>, ApiError>) -> Self {
        match result {
            Ok(Some(data)) => Self::Ready(data),
            Ok(None) => Self::Empty,
            Err(error) => Self::Error(error),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Data to display: the ready value, or the retained frame while loading.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            Self::Loading { previous } => previous.as_ref(),
            Self::Empty | Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading { .. } => "loading",
            Self::Ready(_) => "ready",
            Self::Empty => "empty",
            Self::Error(_) => "error",
        }
    }

    fn reload(&mut self, keep_previous: bool) {
        *self = match std::mem::take(self) {
            Self::Ready(data) if keep_previous => Self::Loading {
                previous: Some(data),
            },
            Self::Loading { previous } if keep_previous => Self::Loading { previous },
            _ => Self::Loading { previous: None },
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Overview,
    ActiveUsers,
    QuestionsAnswered,
    SubjectAccuracy,
    WeakTopics,
    UpcomingEvents,
    Referrals,
}

impl Tile {
    pub const ALL: [Tile; 7] = [
        Self::Overview,
        Self::ActiveUsers,
        Self::QuestionsAnswered,
        Self::SubjectAccuracy,
        Self::WeakTopics,
        Self::UpcomingEvents,
        Self::Referrals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::ActiveUsers => "active_users",
            Self::QuestionsAnswered => "questions_answered",
            Self::SubjectAccuracy => "subject_accuracy",
            Self::WeakTopics => "weak_topics",
            Self::UpcomingEvents => "upcoming_events",
            Self::Referrals => "referrals",
        }
    }

    /// Charts keep the previous frame while a new key loads.
    pub fn keeps_previous(&self) -> bool {
        matches!(
            self,
            Self::ActiveUsers | Self::QuestionsAnswered | Self::SubjectAccuracy
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardTiles {
    pub overview: TileState<[StatCard; 6]>,
    pub active_users: TileState<Vec<ActivityPoint>>,
    pub questions_answered: TileState<Vec<ActivityPoint>>,
    pub subject_accuracy: TileState<Vec<SubjectAccuracyBar>>,
    pub weak_topics: TileState<Vec<WeakTopicRow>>,
    pub upcoming_events: TileState<Vec<EventRow>>,
    pub referrals: TileState<[StatCard; 2]>,
}

impl DashboardTiles {
    fn reload(&mut self) {
        self.overview.reload(Tile::Overview.keeps_previous());
        self.active_users.reload(Tile::ActiveUsers.keeps_previous());
        self.questions_answered
            .reload(Tile::QuestionsAnswered.keeps_previous());
        self.subject_accuracy
            .reload(Tile::SubjectAccuracy.keeps_previous());
        self.weak_topics.reload(Tile::WeakTopics.keeps_previous());
        self.upcoming_events
            .reload(Tile::UpcomingEvents.keeps_previous());
        self.referrals.reload(Tile::Referrals.keeps_previous());
    }

    /// State label per tile, in display order.
    pub fn labels(&self) -> [(Tile, &'static str); 7] {
        [
            (Tile::Overview, self.overview.label()),
            (Tile::ActiveUsers, self.active_users.label()),
            (Tile::QuestionsAnswered, self.questions_answered.label()),
            (Tile::SubjectAccuracy, self.subject_accuracy.label()),
            (Tile::WeakTopics, self.weak_topics.label()),
            (Tile::UpcomingEvents, self.upcoming_events.label()),
            (Tile::Referrals, self.referrals.label()),
        ]
    }
}

// ============================================================================
// Dashboard
// ============================================================================

/// The filter tuple every tile is fetched for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DashboardKey {
    pub exam: ExamSelection,
    pub range: DateRange,
}

struct DashboardState {
    key: DashboardKey,
    tiles: DashboardTiles,
}

impl DashboardState {
    fn retarget(&mut self, key: DashboardKey) -> bool {
        if self.key == key {
            return false;
        }
        debug!(
            exam = key.exam.as_str(),
            range = key.range.as_param(),
            "dashboard key changed"
        );
        self.key = key;
        self.tiles.reload();
        true
    }
}

fn lock(state: &Mutex<DashboardState>) -> MutexGuard<'_, DashboardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Dashboard<T> {
    client: AdminClient<T>,
    state: Arc<Mutex<DashboardState>>,
    _subscription: Subscription,
}

impl<T: Transport + 'static> Dashboard<T> {
    /// Tiles start out loading for the store's current exam and `range`.
    pub fn new(client: AdminClient<T>, store: &SelectionStore, range: DateRange) -> Self {
        let state = Arc::new(Mutex::new(DashboardState {
            key: DashboardKey {
                exam: store.exam(),
                range,
            },
            tiles: DashboardTiles::default(),
        }));
        let weak = Arc::downgrade(&state);
        let subscription = store.subscribe(move |exam| {
            if let Some(state) = weak.upgrade() {
                let mut state = lock(&state);
                let key = DashboardKey {
                    exam,
                    range: state.key.range,
                };
                state.retarget(key);
            }
        });
        Self {
            client,
            state,
            _subscription: subscription,
        }
    }

    pub fn key(&self) -> DashboardKey {
        lock(&self.state).key
    }

    /// Snapshot of every tile.
    pub fn tiles(&self) -> DashboardTiles {
        lock(&self.state).tiles.clone()
    }

    pub fn set_range(&self, range: DateRange) -> bool {
        let mut state = lock(&self.state);
        let key = DashboardKey {
            exam: state.key.exam,
            range,
        };
        state.retarget(key)
    }

    /// Fetch every tile for the current key.
    ///
    /// Tiles land independently; a failure only affects its own tile.
    pub async fn refresh(&self) {
        let key = self.key();
        let DashboardKey { exam, range } = key;
        info!(
            exam = exam.as_str(),
            range = range.as_param(),
            "refreshing dashboard"
        );
        let filters = AnalyticsFilters {
            exam: exam.as_filter(),
            range,
        };
        let series_filters = |metric| TimeSeriesFilters {
            exam: exam.as_filter(),
            range,
            metric,
        };

        futures_util::join!(
            self.load(
                key,
                Tile::Overview,
                self.client.analytics_overview(filters),
                |overview| (!overview.is_empty()).then(|| overview_cards(Some(&overview), range)),
                |tiles, state| tiles.overview = state,
            ),
            self.load(
                key,
                Tile::ActiveUsers,
                self.client
                    .analytics_time_series(series_filters(AnalyticsMetric::ActiveUsers)),
                |series| (!series.points.is_empty()).then(|| format_time_series(Some(&series))),
                |tiles, state| tiles.active_users = state,
            ),
            self.load(
                key,
                Tile::QuestionsAnswered,
                self.client
                    .analytics_time_series(series_filters(AnalyticsMetric::QuestionsAnswered)),
                |series| (!series.points.is_empty()).then(|| format_time_series(Some(&series))),
                |tiles, state| tiles.questions_answered = state,
            ),
            self.load(
                key,
                Tile::SubjectAccuracy,
                self.client.subject_accuracy(exam.as_filter()),
                |response| {
                    let bars = subject_accuracy_bars(&response);
                    (!bars.is_empty()).then_some(bars)
                },
                |tiles, state| tiles.subject_accuracy = state,
            ),
            self.load(
                key,
                Tile::WeakTopics,
                self.client.weak_topics(exam.as_filter(), WEAK_TOPICS_LIMIT),
                |response| {
                    let items = sort_weak_topics(filter_server_scoped(response.items, exam));
                    (!items.is_empty()).then(|| weak_topic_rows(&items))
                },
                |tiles, state| tiles.weak_topics = state,
            ),
            self.load(
                key,
                Tile::UpcomingEvents,
                self.client.upcoming_events(exam.as_filter()),
                |response| {
                    let events = filter_server_scoped(response.items, exam);
                    (!events.is_empty()).then(|| event_rows(&events))
                },
                |tiles, state| tiles.upcoming_events = state,
            ),
            self.load(
                key,
                Tile::Referrals,
                self.client.referral_summary(range),
                |summary| {
                    (!summary.is_empty())
                        .then(|| build_referral_snapshot(Some(&summary), range.label()))
                },
                |tiles, state| tiles.referrals = state,
            ),
        );
    }

    async fn load<R, D>(
        &self,
        key: DashboardKey,
        tile: Tile,
        fetch: impl Future<Output = Result<R, ApiError>>,
        derive: impl FnOnce(R) -> Option<D>,
        store: impl FnOnce(&mut DashboardTiles, TileState<D>),
    ) {
        let outcome = TileState::settle(fetch.await.map(derive));
        let mut state = lock(&self.state);
        if state.key != key {
            warn!(
                tile = tile.as_str(),
                fetched_for = key.exam.as_str(),
                current = state.key.exam.as_str(),
                "discarding response for a stale dashboard key"
            );
            return;
        }
        if let Some(error) = outcome.error() {
            warn!(tile = tile.as_str(), %error, "dashboard tile failed");
        } else {
            debug!(tile = tile.as_str(), state = outcome.label(), "dashboard tile landed");
        }
        store(&mut state.tiles, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle() {
        assert_eq!(TileState::settle(Ok(Some(3))), TileState::Ready(3));
        assert_eq!(TileState::<u8>::settle(Ok(None)), TileState::Empty);
        assert_eq!(
            TileState::<u8>::settle(Err(ApiError::Timeout)),
            TileState::Error(ApiError::Timeout)
        );
    }

    #[test]
    fn test_reload_keeps_previous_frame_for_charts() {
        let mut chart = TileState::Ready(vec![1, 2]);
        chart.reload(true);
        assert_eq!(
            chart,
            TileState::Loading {
                previous: Some(vec![1, 2])
            }
        );
        assert_eq!(chart.data(), Some(&vec![1, 2]));

        chart.reload(true);
        assert_eq!(chart.data(), Some(&vec![1, 2]));
    }

    #[test]
    fn test_reload_drops_data_for_cards() {
        let mut card = TileState::Ready(7);
        card.reload(false);
        assert_eq!(card, TileState::Loading { previous: None });
        assert!(card.data().is_none());

        let mut failed = TileState::<u8>::Error(ApiError::Timeout);
        failed.reload(true);
        assert_eq!(failed, TileState::Loading { previous: None });
    }

    #[test]
    fn test_only_charts_keep_previous() {
        let keeping: Vec<_> = Tile::ALL
            .iter()
            .filter(|tile| tile.keeps_previous())
            .map(Tile::as_str)
            .collect();
        assert_eq!(
            keeping,
            vec!["active_users", "questions_answered", "subject_accuracy"]
        );
    }
}
