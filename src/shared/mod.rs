/// Shared utilities and types used across all layers
///
/// This module contains:
/// - Wire protocol (feed frames, subscription frames, product ids)
/// - Engine configuration
/// - Error types
/// - Prometheus metrics

pub mod config;
pub mod error;
pub mod metrics;
pub mod protocol;

// Re-export commonly used types
pub use config::EngineConfig;
pub use error::{ConfigError, FeedError};
pub use protocol::{FeedMessage, ProductId, SubscriptionRequest};
