//! Client-side state for the admin back office.
//!
//! - [`selection`]: the shared exam filter with subscribe/notify
//! - [`derive`]: pure functions from server aggregates to display rows
//! - [`cascade`]: exam → subject → topic dependent dropdowns
//! - [`dashboard`]: independently loading analytics tiles

pub mod cascade;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod selection;

pub use cascade::{CascadeSelection, SelectOption, TopicBrowser, subject_options, topic_options};
pub use dashboard::{Dashboard, DashboardKey, DashboardTiles, Tile, TileState};
pub use derive::{
    ActivityPoint, EventBadge, EventRow, ExamScoped, PLACEHOLDER, StatCard, SubjectAccuracyBar,
    WeakTopicRow, build_referral_snapshot, filter_by_exam, filter_server_scoped,
    filter_topics_by_exam, format_time_series, normalized_accuracy, sort_weak_topics, to_percent,
};
pub use error::{CoreError, Result};
pub use selection::{SelectionStore, Subscription};
