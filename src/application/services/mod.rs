/// Application Services
///
/// - `FeedService`: single-writer loop driving an `OrderBookEngine` from a
///   command channel, with a periodic display refresh

pub mod feed_service;

pub use feed_service::{EngineHandle, FeedCommand, FeedOutput, FeedService, SharedEngine};
