/// OrderBookEngine - the engine API exposed to feed adapters
///
/// Owns the merge engine (and through it the book) plus the aggregation
/// view. A single owner drives it:
/// - `apply(raw)` for every inbound frame, in arrival order
/// - `reset()` on disconnect / backgrounding
/// - `snapshot_view()` for presentation
///
/// `apply` never fails towards the caller. Frames that do not parse are
/// logged, counted and dropped. Inside a book frame, each invalid level is
/// skipped on its own and the remaining levels are still applied.

use crate::domain::aggregation::{AggregationView, BookView};
use crate::domain::orderbook::{MergeEngine, MergeStats, OrderBook, PriceLevel, Side};
use crate::domain::validation::LevelValidator;
use crate::shared::config::EngineConfig;
use crate::shared::error::FeedError;
use crate::shared::metrics::METRICS;
use crate::shared::protocol::{FeedMessage, ProductId};
use tracing::{debug, info, warn};

/// What `apply` did with a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Snapshot(MergeStats),
    Delta(MergeStats),
    /// `unsubscribed` event, book cleared
    Unsubscribed,
    /// Well-formed but not book data for this engine
    Ignored,
    /// Malformed frame, book untouched
    Rejected,
}

impl ApplyOutcome {
    fn kind(&self) -> &'static str {
        match self {
            ApplyOutcome::Snapshot(_) => "snapshot",
            ApplyOutcome::Delta(_) => "delta",
            ApplyOutcome::Unsubscribed => "unsubscribed",
            ApplyOutcome::Ignored => "ignored",
            ApplyOutcome::Rejected => "rejected",
        }
    }

    /// True when the book may have changed and the view should refresh
    pub fn changed_book(&self) -> bool {
        matches!(
            self,
            ApplyOutcome::Snapshot(_) | ApplyOutcome::Delta(_) | ApplyOutcome::Unsubscribed
        )
    }
}

pub struct OrderBookEngine {
    config: EngineConfig,
    merge: MergeEngine,
    view: AggregationView,
    validator: LevelValidator,
    cleared: bool,
}

impl OrderBookEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            merge: MergeEngine::new(config.capacity_per_side),
            view: AggregationView::new(config.shown_elements),
            validator: LevelValidator::new(),
            cleared: false,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn product_id(&self) -> &ProductId {
        &self.config.product_id
    }

    pub fn book(&self) -> &OrderBook {
        self.merge.book()
    }

    /// Book was reset or unsubscribed and has not seen a snapshot since
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Applies one raw frame; errors are logged and reported as `Rejected`
    pub fn apply(&mut self, raw: &str) -> ApplyOutcome {
        let timer = METRICS.apply_duration.start_timer();
        let outcome = match self.try_apply(raw) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, product = %self.config.product_id, "dropping feed message");
                METRICS.errors_total.with_label_values(&[err.kind()]).inc();
                ApplyOutcome::Rejected
            }
        };
        timer.observe_duration();

        METRICS.messages_total.with_label_values(&[outcome.kind()]).inc();
        if let ApplyOutcome::Snapshot(stats) | ApplyOutcome::Delta(stats) = outcome {
            self.record_stats(outcome.kind(), &stats);
        }
        outcome
    }

    /// Parses, validates and merges one frame
    ///
    /// Only a frame that fails to parse is an error. Invalid levels are
    /// counted in `MergeStats::skipped`.
    pub fn try_apply(&mut self, raw: &str) -> Result<ApplyOutcome, FeedError> {
        let message = FeedMessage::parse(raw)?;

        if let Some(product) = message.product_id.as_deref() {
            if product != self.config.product_id.as_str() {
                debug!(product, expected = %self.config.product_id, "ignoring other product");
                return Ok(ApplyOutcome::Ignored);
            }
        }

        let (raw_bids, raw_asks) = match (&message.bids, &message.asks) {
            (Some(bids), Some(asks)) => (bids, asks),
            _ if message.is_unsubscribed() => {
                info!(product = %self.config.product_id, "unsubscribed, clearing book");
                self.clear_all();
                return Ok(ApplyOutcome::Unsubscribed);
            }
            _ => {
                debug!(event = ?message.event, feed = ?message.feed, "ignoring non-book message");
                return Ok(ApplyOutcome::Ignored);
            }
        };

        let feed = message.feed.as_deref().unwrap_or_default();
        let is_snapshot = feed == self.config.snapshot_feed;
        if !is_snapshot && feed != self.config.delta_feed {
            debug!(feed, "ignoring unknown feed");
            return Ok(ApplyOutcome::Ignored);
        }

        let mut skipped = 0;
        let bids = self.admit_side(Side::Bid, raw_bids, &mut skipped);
        let asks = self.admit_side(Side::Ask, raw_asks, &mut skipped);

        if is_snapshot {
            let mut stats = self.merge.apply_snapshot(&bids, &asks);
            stats.skipped = skipped;
            self.cleared = false;
            debug!(
                bids = self.book().bids().count(),
                asks = self.book().asks().count(),
                evicted = stats.evicted,
                skipped,
                "snapshot loaded"
            );
            Ok(ApplyOutcome::Snapshot(stats))
        } else {
            let mut stats = self.merge.apply_delta(&bids, &asks);
            stats.skipped = skipped;
            Ok(ApplyOutcome::Delta(stats))
        }
    }

    /// Valid levels of one side; each invalid level is logged and counted
    fn admit_side(&self, side: Side, raw: &[[f64; 2]], skipped: &mut usize) -> Vec<PriceLevel> {
        let (levels, rejected) = self.validator.split_side(side, raw);
        for err in rejected {
            let err = FeedError::from(err);
            warn!(error = %err, product = %self.config.product_id, "skipping invalid level");
            METRICS.errors_total.with_label_values(&[err.kind()]).inc();
            *skipped += 1;
        }
        levels
    }

    /// Clears both sides and derived metrics and marks the book cleared
    pub fn reset(&mut self) {
        info!(product = %self.config.product_id, "resetting book");
        self.clear_all();
    }

    /// Resets and starts tracking another instrument
    pub fn switch_product(&mut self, product: ProductId) {
        info!(from = %self.config.product_id, to = %product, "switching product");
        self.config.product_id = product;
        self.clear_all();
    }

    /// Recomputes the display view from the current book
    pub fn snapshot_view(&mut self) -> BookView {
        if self.cleared {
            return BookView::empty(true);
        }
        self.view.refresh(self.merge.book(), false)
    }

    fn clear_all(&mut self) {
        self.merge.clear();
        self.view.reset();
        self.cleared = true;
        self.record_depth();
    }

    fn record_stats(&self, source: &str, stats: &MergeStats) {
        if stats.evicted > 0 {
            METRICS
                .evictions_total
                .with_label_values(&[source])
                .inc_by(stats.evicted as f64);
        }
        if stats.dropped > 0 {
            METRICS
                .dropped_updates_total
                .with_label_values(&[source])
                .inc_by(stats.dropped as f64);
        }
        self.record_depth();
    }

    fn record_depth(&self) {
        for side in [Side::Bid, Side::Ask] {
            METRICS
                .book_depth
                .with_label_values(&[side.as_str()])
                .set(self.book().side(side).count() as f64);
        }
    }
}

impl Default for OrderBookEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
