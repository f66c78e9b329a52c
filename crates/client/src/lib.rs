//! Client-side workflow layer: the [`PromotionApi`] contract, an HTTP
//! implementation, an in-memory double, a query-scoped cache, and the
//! [`WorkflowService`] that ties them to a session.

pub mod api;
pub mod cache;
pub mod http;
pub mod memory;
pub mod service;

pub use api::{DocumentUpload, PromotionApi, RequestQuery, ReviewOutcome, ReviewSubmission};
pub use cache::{CachedListing, QueryCache};
pub use http::HttpPromotionApi;
pub use memory::InMemoryPromotionApi;
pub use service::WorkflowService;
