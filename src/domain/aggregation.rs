/// AggregationView - ranked rows, cumulative totals and spread
///
/// The view only ever borrows the book. It is recomputed after every applied
/// message and on the periodic display tick; between refreshes nothing it
/// produces is persisted except the last known spread, which survives a
/// one-sided book until the next reset.

use crate::domain::orderbook::{OrderBook, PriceLevelStore};
use serde::Serialize;

/// Default number of rows surfaced per side
pub const DEFAULT_SHOWN_ELEMENTS: usize = 12;

/// One displayed level with the running total up to and including it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewRow {
    pub price: f64,
    pub size: f64,
    pub total: f64,
}

impl ViewRow {
    /// Width of the depth bar as a percentage of the larger side total
    pub fn depth_percent(&self, max_total: f64) -> f64 {
        if max_total > 0.0 {
            self.total * 100.0 / max_total
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpreadMetrics {
    pub spread: f64,
    /// Spread relative to the best ask, percent, two decimals
    pub spread_percentage: f64,
}

impl SpreadMetrics {
    /// `None` unless both sides have a best price
    pub fn compute(book: &OrderBook) -> Option<Self> {
        let best_bid = book.best_bid()?.value();
        let best_ask = book.best_ask()?.value();

        let spread = best_ask - best_bid;
        let spread_percentage = ((spread / best_ask + f64::EPSILON) * 10_000.0).round() / 100.0;

        Some(Self {
            spread,
            spread_percentage,
        })
    }
}

/// Display-ready snapshot of the book
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookView {
    /// Best to worst
    pub bids: Vec<ViewRow>,
    /// Worst shown ask first, best ask last (nearest the spread line)
    pub asks: Vec<ViewRow>,
    pub bids_total: f64,
    pub asks_total: f64,
    pub spread: Option<SpreadMetrics>,
    /// Book was reset or unsubscribed and holds no data
    pub cleared: bool,
}

impl BookView {
    pub fn empty(cleared: bool) -> Self {
        Self {
            bids: Vec::new(),
            asks: Vec::new(),
            bids_total: 0.0,
            asks_total: 0.0,
            spread: None,
            cleared,
        }
    }

    /// Larger of the two shown totals, the scale for depth bars
    pub fn max_total(&self) -> f64 {
        self.bids_total.max(self.asks_total)
    }
}

#[derive(Debug, Clone)]
pub struct AggregationView {
    shown_elements: usize,
    last_spread: Option<SpreadMetrics>,
}

impl AggregationView {
    pub fn new(shown_elements: usize) -> Self {
        Self {
            shown_elements,
            last_spread: None,
        }
    }

    pub fn shown_elements(&self) -> usize {
        self.shown_elements
    }

    pub fn last_spread(&self) -> Option<SpreadMetrics> {
        self.last_spread
    }

    /// Recomputes rows and spread from the current book
    pub fn refresh(&mut self, book: &OrderBook, cleared: bool) -> BookView {
        let (bids, bids_total) = self.rows(book.bids());
        let (mut asks, asks_total) = self.rows(book.asks());
        asks.reverse();

        if let Some(spread) = SpreadMetrics::compute(book) {
            self.last_spread = Some(spread);
        }

        BookView {
            bids,
            asks,
            bids_total,
            asks_total,
            spread: self.last_spread,
            cleared,
        }
    }

    /// Forgets the retained spread
    pub fn reset(&mut self) {
        self.last_spread = None;
    }

    fn rows(&self, store: &PriceLevelStore) -> (Vec<ViewRow>, f64) {
        let mut total = 0.0;
        let rows = store
            .iter()
            .take(self.shown_elements)
            .map(|level| {
                total += level.size;
                ViewRow {
                    price: level.price.value(),
                    size: level.size,
                    total,
                }
            })
            .collect();
        (rows, total)
    }
}

impl Default for AggregationView {
    fn default() -> Self {
        Self::new(DEFAULT_SHOWN_ELEMENTS)
    }
}
