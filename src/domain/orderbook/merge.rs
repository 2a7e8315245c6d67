/// MergeEngine - applies snapshots and deltas to a bounded two-sided book
///
/// ## Merge Rules
/// - **Snapshot**: both sides are cleared and repopulated with every level of
///   positive size. The capacity bound is enforced right after loading by
///   evicting from the worst end.
/// - **Delta**: each level goes through `apply_level_update`:
///   1. tracked price: replace (size > 0) or remove (size == 0)
///   2. untracked price with size 0: nothing to do
///   3. untracked price, side not full: insert
///   4. untracked price, side full: evict the worst level if the new price
///      ranks at least as well as it, otherwise drop the update
/// - **Clear**: both sides emptied at once
///
/// Each level update touches exactly one side.

use super::level::{Price, PriceLevel, Side};
use super::store::PriceLevelStore;
use tracing::trace;

/// Default number of levels retained per side
pub const DEFAULT_CAPACITY: usize = 25;

/// What a single level update did to its side
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelOutcome {
    /// Tracked price got a new size
    Updated,
    /// Tracked price removed (size 0)
    Removed,
    /// New price inserted while the side had room
    Inserted,
    /// New price inserted after evicting the worst level
    Evicted { evicted: Price },
    /// Size 0 for an untracked price
    Ignored,
    /// Side full and the new price ranks worse than everything retained
    Dropped,
}

/// Per-message counters, mostly for logging and metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub inserted: usize,
    pub updated: usize,
    pub removed: usize,
    pub evicted: usize,
    pub ignored: usize,
    pub dropped: usize,
    /// Invalid levels set aside before merging
    pub skipped: usize,
}

impl MergeStats {
    fn record(&mut self, outcome: LevelOutcome) {
        match outcome {
            LevelOutcome::Updated => self.updated += 1,
            LevelOutcome::Removed => self.removed += 1,
            LevelOutcome::Inserted => self.inserted += 1,
            LevelOutcome::Evicted { .. } => {
                self.inserted += 1;
                self.evicted += 1;
            }
            LevelOutcome::Ignored => self.ignored += 1,
            LevelOutcome::Dropped => self.dropped += 1,
        }
    }
}

/// Two-sided book: bids descending, asks ascending
#[derive(Debug, Clone)]
pub struct OrderBook {
    bids: PriceLevelStore,
    asks: PriceLevelStore,
}

impl OrderBook {
    pub fn new(capacity_per_side: usize) -> Self {
        Self {
            bids: PriceLevelStore::new(Side::Bid, capacity_per_side),
            asks: PriceLevelStore::new(Side::Ask, capacity_per_side),
        }
    }

    pub fn bids(&self) -> &PriceLevelStore {
        &self.bids
    }

    pub fn asks(&self) -> &PriceLevelStore {
        &self.asks
    }

    pub fn side(&self, side: Side) -> &PriceLevelStore {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut PriceLevelStore {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// Sole writer of an `OrderBook`
#[derive(Debug, Clone)]
pub struct MergeEngine {
    book: OrderBook,
}

impl MergeEngine {
    pub fn new(capacity_per_side: usize) -> Self {
        Self {
            book: OrderBook::new(capacity_per_side),
        }
    }

    /// Read-only access for views
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Replaces both sides with the snapshot contents
    pub fn apply_snapshot(&mut self, bids: &[PriceLevel], asks: &[PriceLevel]) -> MergeStats {
        self.book.bids.clear();
        self.book.asks.clear();

        let mut stats = MergeStats::default();
        for (side, levels) in [(Side::Bid, bids), (Side::Ask, asks)] {
            let store = self.book.side_mut(side);
            for level in levels.iter().filter(|level| level.size > 0.0) {
                store.insert(level.price, level.size);
                stats.inserted += 1;
            }
            stats.evicted += trim_to_capacity(store);
        }
        stats
    }

    /// Applies every level of a delta, bids first
    pub fn apply_delta(&mut self, bids: &[PriceLevel], asks: &[PriceLevel]) -> MergeStats {
        let mut stats = MergeStats::default();
        for (side, levels) in [(Side::Bid, bids), (Side::Ask, asks)] {
            for level in levels {
                stats.record(self.apply_level_update(side, level.price, level.size));
            }
        }
        stats
    }

    /// Merges one level into one side, enforcing the capacity bound
    pub fn apply_level_update(&mut self, side: Side, price: Price, size: f64) -> LevelOutcome {
        let store = self.book.side_mut(side);

        if store.remove(price).is_some() {
            if size > 0.0 {
                store.insert(price, size);
                return LevelOutcome::Updated;
            }
            return LevelOutcome::Removed;
        }

        if size <= 0.0 {
            return LevelOutcome::Ignored;
        }

        if !store.is_full() {
            store.insert(price, size);
            return LevelOutcome::Inserted;
        }

        match store.worst() {
            Some(worst) if side.ranks_at_least(price, worst) => {
                store.remove(worst);
                store.insert(price, size);
                trace!(side = %side, %price, evicted = %worst, "evicted worst level");
                LevelOutcome::Evicted { evicted: worst }
            }
            _ => LevelOutcome::Dropped,
        }
    }

    /// Empties both sides
    pub fn clear(&mut self) {
        self.book.bids.clear();
        self.book.asks.clear();
    }
}

/// Evicts worst levels until the store fits its capacity
fn trim_to_capacity(store: &mut PriceLevelStore) -> usize {
    let mut evicted = 0;
    while store.count() > store.capacity() {
        match store.worst() {
            Some(worst) => {
                store.remove(worst);
                evicted += 1;
            }
            None => break,
        }
    }
    evicted
}
