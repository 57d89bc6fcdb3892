pub mod metrics;
pub mod upstream;

pub use upstream::{FeedQuery, UpstreamClient, UpstreamError, UpstreamResponse};
