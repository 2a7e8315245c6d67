/// Application Layer - Engine API and Services
///
/// Orchestrates the domain layer for feed adapters: parsing and validating
/// raw frames, driving the merge engine, and scheduling view refreshes.
///
/// ## Modules
/// - `engine`: `OrderBookEngine` (`apply`, `reset`, `snapshot_view`)
/// - `services`: `FeedService`, the async single-writer loop

pub mod engine;
pub mod services;

// Re-export key types
pub use engine::{ApplyOutcome, OrderBookEngine};
pub use services::{EngineHandle, FeedCommand, FeedOutput, FeedService};
