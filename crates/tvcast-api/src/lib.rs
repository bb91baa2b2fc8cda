// tvcast-api: Async client and wire types for the content feed

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::FeedClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{ContentResponse, FeedResponse, LiveFeedResponse, MovieResponse, VideoResponse};
