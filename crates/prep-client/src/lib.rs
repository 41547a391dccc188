//! Admin API client.
//!
//! - [`transport`]: the request seam and the `reqwest` implementation
//! - [`keys`]: typed query keys and resource families
//! - [`cache`]: in-flight deduplication and invalidation
//! - [`resources`]: per-resource reads and mutations
//! - `memory`: canned-response transport for tests (`test-util` feature)

pub mod cache;
pub mod config;
pub mod error;
pub mod keys;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod resources;
pub mod transport;

pub use cache::{Invalidation, QueryCache};
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use keys::{
    AnalyticsFilters, ExamFilters, QueryKey, QuestionFilters, ResourceFamily, TimeSeriesFilters,
    UserFilters, WEAK_TOPICS_LIMIT,
};
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryTransport;
pub use resources::AdminClient;
pub use transport::{ApiRequest, HttpTransport, Method, Transport};
