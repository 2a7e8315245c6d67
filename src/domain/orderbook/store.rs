/// PriceLevelStore - bounded, ordered collection of levels for one side
///
/// Levels are kept in a `BTreeMap` keyed by ascending price. The side decides
/// which end of the map is "best":
/// - Bid: best = highest price (back), worst = lowest price (front)
/// - Ask: best = lowest price (front), worst = highest price (back)
///
/// All point operations are O(log n). The store itself does not evict; the
/// capacity is recorded here so the merge layer can apply its policy.

use super::level::{Price, PriceLevel, Side};
use std::collections::btree_map;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct PriceLevelStore {
    side: Side,
    capacity: usize,
    levels: BTreeMap<Price, f64>,
}

impl PriceLevelStore {
    pub fn new(side: Side, capacity: usize) -> Self {
        Self {
            side,
            capacity,
            levels: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Upsert: overwrites the size if the price is already tracked
    #[inline]
    pub fn insert(&mut self, price: Price, size: f64) {
        self.levels.insert(price, size);
    }

    /// Removes the level, returning its size if it was tracked
    #[inline]
    pub fn remove(&mut self, price: Price) -> Option<f64> {
        self.levels.remove(&price)
    }

    #[inline]
    pub fn contains(&self, price: Price) -> bool {
        self.levels.contains_key(&price)
    }

    pub fn size_of(&self, price: Price) -> Option<f64> {
        self.levels.get(&price).copied()
    }

    /// Inside price: highest bid or lowest ask
    #[inline]
    pub fn best(&self) -> Option<Price> {
        match self.side {
            Side::Bid => self.levels.last_key_value(),
            Side::Ask => self.levels.first_key_value(),
        }
        .map(|(price, _)| *price)
    }

    /// Outside price: lowest retained bid or highest retained ask
    #[inline]
    pub fn worst(&self) -> Option<Price> {
        match self.side {
            Side::Bid => self.levels.first_key_value(),
            Side::Ask => self.levels.last_key_value(),
        }
        .map(|(price, _)| *price)
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.levels.len() >= self.capacity
    }

    /// Iterates levels from best to worst
    pub fn iter(&self) -> Levels<'_> {
        Levels {
            side: self.side,
            inner: self.levels.iter(),
        }
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }
}

impl<'a> IntoIterator for &'a PriceLevelStore {
    type Item = PriceLevel;
    type IntoIter = Levels<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Best-to-worst iterator over a store
pub struct Levels<'a> {
    side: Side,
    inner: btree_map::Iter<'a, Price, f64>,
}

impl<'a> Iterator for Levels<'a> {
    type Item = PriceLevel;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.side {
            Side::Bid => self.inner.next_back(),
            Side::Ask => self.inner.next(),
        };
        entry.map(|(price, size)| PriceLevel::new(*price, *size))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Levels<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(value: f64) -> Price {
        Price::new(value).unwrap()
    }

    fn prices(store: &PriceLevelStore) -> Vec<f64> {
        store.iter().map(|level| level.price.value()).collect()
    }

    #[test]
    fn test_bid_store_ordering() {
        let mut bids = PriceLevelStore::new(Side::Bid, 25);
        bids.insert(px(99.0), 1.0);
        bids.insert(px(101.0), 2.0);
        bids.insert(px(100.0), 3.0);

        assert_eq!(prices(&bids), vec![101.0, 100.0, 99.0]);
        assert_eq!(bids.best(), Some(px(101.0)));
        assert_eq!(bids.worst(), Some(px(99.0)));
    }

    #[test]
    fn test_ask_store_ordering() {
        let mut asks = PriceLevelStore::new(Side::Ask, 25);
        asks.insert(px(103.0), 1.0);
        asks.insert(px(101.0), 2.0);
        asks.insert(px(102.0), 3.0);

        assert_eq!(prices(&asks), vec![101.0, 102.0, 103.0]);
        assert_eq!(asks.best(), Some(px(101.0)));
        assert_eq!(asks.worst(), Some(px(103.0)));
    }

    #[test]
    fn test_insert_is_upsert() {
        let mut asks = PriceLevelStore::new(Side::Ask, 25);
        asks.insert(px(101.0), 2.0);
        asks.insert(px(101.0), 7.5);

        assert_eq!(asks.count(), 1);
        assert_eq!(asks.size_of(px(101.0)), Some(7.5));
    }

    #[test]
    fn test_remove_and_contains() {
        let mut bids = PriceLevelStore::new(Side::Bid, 25);
        bids.insert(px(100.0), 1.0);

        assert!(bids.contains(px(100.0)));
        assert_eq!(bids.remove(px(100.0)), Some(1.0));
        assert!(!bids.contains(px(100.0)));
        // removing an untracked price is a no-op
        assert_eq!(bids.remove(px(100.0)), None);
        assert!(bids.is_empty());
    }

    #[test]
    fn test_empty_store_has_no_ends() {
        let store = PriceLevelStore::new(Side::Bid, 25);
        assert_eq!(store.best(), None);
        assert_eq!(store.worst(), None);
        assert_eq!(store.iter().count(), 0);
    }

    #[test]
    fn test_single_level_is_both_ends() {
        let mut store = PriceLevelStore::new(Side::Ask, 25);
        store.insert(px(50.0), 1.0);
        assert_eq!(store.best(), store.worst());
    }

    #[test]
    fn test_clear_and_capacity() {
        let mut store = PriceLevelStore::new(Side::Bid, 2);
        store.insert(px(1.0), 1.0);
        assert!(!store.is_full());
        store.insert(px(2.0), 1.0);
        assert!(store.is_full());

        store.clear();
        assert_eq!(store.count(), 0);
        assert_eq!(store.capacity(), 2);
    }
}
