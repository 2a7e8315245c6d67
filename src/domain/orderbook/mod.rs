/// Domain Layer - OrderBook Module
///
/// Bounded, ordered price-level storage for a single instrument and the merge
/// policy that keeps it within its depth.
///
/// ## Components
/// - `level`: `Price`, `PriceLevel` and `Side`
/// - `store`: `PriceLevelStore`, one per side, `BTreeMap`-backed
/// - `merge`: `OrderBook` and `MergeEngine` (snapshot / delta / eviction)

pub mod level;
pub mod merge;
pub mod store;

pub use level::{Price, PriceLevel, Side};
pub use merge::{LevelOutcome, MergeEngine, MergeStats, OrderBook, DEFAULT_CAPACITY};
pub use store::{Levels, PriceLevelStore};
