/// Domain Layer - Core Book Logic
///
/// Pure order-book maintenance with no I/O: storage, merge policy, input
/// validation and the derived display view. Everything here is synchronous
/// and can be tested in isolation.
///
/// ## Modules
/// - `orderbook`: per-side stores and the merge engine
/// - `validation`: admission rules for incoming levels
/// - `aggregation`: ranked rows, cumulative totals, spread

pub mod aggregation;
pub mod orderbook;
pub mod validation;

// Re-export key types
pub use aggregation::{AggregationView, BookView, SpreadMetrics, ViewRow};
pub use orderbook::{MergeEngine, OrderBook, Price, PriceLevel, PriceLevelStore, Side};
pub use validation::{LevelValidationError, LevelValidator};
