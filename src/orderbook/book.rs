//! Limit order book with an integrated matching engine.
//!
//! Two sorted ladders of price levels (bids descending, asks ascending), an
//! identifier index for O(1) cancel, and the order pool. Matching is strict
//! price-time priority: best price first, FIFO within a level, and every
//! fill executes at the maker's resting price.

use rustc_hash::FxHashMap;

use super::level::PriceLevel;
use super::metrics::BookMetrics;
use super::pool::OrderPool;
use super::queue::NIL;
use super::{Execution, Side};

/// Single-instrument limit order book.
///
/// The book owns its pool: every live order slot is reachable through
/// exactly one ladder queue and the identifier index, and released slots go
/// straight back to the free stack. The steady-state paths (`add_order`,
/// `cancel_order`, matching) never allocate.
#[derive(Debug)]
pub struct OrderBook {
    /// Sorted descending: best bid first.
    bids: Vec<PriceLevel>,
    /// Sorted ascending: best ask first.
    asks: Vec<PriceLevel>,
    /// Order id -> pool slot index.
    index: FxHashMap<u64, u32>,
    pool: OrderPool,
}

impl OrderBook {
    /// Create a book whose pool holds up to `capacity` resting orders.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_depth(capacity, 0)
    }

    /// Create a book, pre-sizing each ladder for `depth_hint` price levels
    /// so early ladder growth stays off the hot path.
    pub fn with_capacity_and_depth(capacity: usize, depth_hint: usize) -> Self {
        Self {
            bids: Vec::with_capacity(depth_hint),
            asks: Vec::with_capacity(depth_hint),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            pool: OrderPool::with_capacity(capacity),
        }
    }

    /// Add a limit order, matching it against the opposite side first.
    /// Fills are discarded; use [`add_order_with`](Self::add_order_with) to
    /// observe them.
    pub fn add_order(&mut self, id: u64, price: u64, qty: u32, side: Side) -> bool {
        self.add_order_with(id, price, qty, side, |_| {})
    }

    /// Add a limit order, invoking `on_execution` once per fill.
    ///
    /// The order first matches against the opposite ladder under
    /// price-time priority; any residual quantity rests in the book.
    /// Fills are reported in the order they occur (best price first, FIFO
    /// within a level) and always execute at the maker's resting price.
    ///
    /// Returns `false` without state change when `id` is already live, and
    /// `false` when the pool cannot hold the residual. In the latter case
    /// the crossing portion has already executed and been reported — those
    /// fills are final — and the residual is dropped.
    pub fn add_order_with<F>(&mut self, id: u64, price: u64, qty: u32, side: Side, mut on_execution: F) -> bool
    where
        F: FnMut(&Execution),
    {
        if self.index.contains_key(&id) {
            return false;
        }

        let remaining = match side {
            Side::Buy => self.match_buy(id, price, qty, &mut on_execution),
            Side::Sell => self.match_sell(id, price, qty, &mut on_execution),
        };

        if remaining == 0 {
            return true;
        }

        let Some(idx) = self.pool.acquire() else {
            return false;
        };

        {
            let order = self.pool.get_mut(idx);
            order.id = id;
            order.price = price;
            order.qty = remaining;
            order.side = side;
            order.prev = NIL;
            order.next = NIL;
        }

        match side {
            Side::Buy => self.add_to_bids(idx, price),
            Side::Sell => self.add_to_asks(idx, price),
        }
        self.index.insert(id, idx);

        true
    }

    /// Cancel a resting order by identifier.
    ///
    /// O(1) index lookup plus O(1) intrusive unlink; removing a level that
    /// became empty shifts the ladder. Returns `false` for unknown ids.
    pub fn cancel_order(&mut self, id: u64) -> bool {
        let Some(idx) = self.index.remove(&id) else {
            return false;
        };

        let (price, side) = {
            let order = self.pool.get(idx);
            (order.price, order.side)
        };

        let ladder = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        match level_position(ladder, price, side) {
            Some(pos) => {
                ladder[pos].remove(&mut self.pool, idx);
                if ladder[pos].is_empty() {
                    ladder.remove(pos);
                }
            }
            None => debug_assert!(false, "indexed order {id} missing from ladder"),
        }

        self.pool.release(idx);
        true
    }

    /// Apply an exchange-reported execution to a resting order: reduce its
    /// quantity (capped at what is resting) and release it when fully
    /// consumed. Returns `false` for unknown ids.
    ///
    /// This is how an ITCH Order Executed message lands on the book.
    pub fn execute_order(&mut self, id: u64, qty: u32) -> bool {
        let Some(&idx) = self.index.get(&id) else {
            return false;
        };

        let (price, side, resting) = {
            let order = self.pool.get(idx);
            (order.price, order.side, order.qty)
        };
        let fill = qty.min(resting);

        let ladder = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let Some(pos) = level_position(ladder, price, side) else {
            debug_assert!(false, "indexed order {id} missing from ladder");
            return false;
        };

        ladder[pos].reduce_volume(fill);
        let filled = {
            let order = self.pool.get_mut(idx);
            order.qty -= fill;
            order.is_filled()
        };

        if filled {
            // qty is zero, so the removal subtracts nothing further.
            ladder[pos].remove(&mut self.pool, idx);
            if ladder[pos].is_empty() {
                ladder.remove(pos);
            }
            self.index.remove(&id);
            self.pool.release(idx);
        }

        true
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Best (highest) bid price, if any bids rest.
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.first().map(|level| level.price)
    }

    /// Best (lowest) ask price, if any asks rest.
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.first().map(|level| level.price)
    }

    /// `best_ask - best_bid`, absent unless both sides are populated.
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Aggregate resting quantity at the best bid.
    pub fn best_bid_volume(&self) -> Option<u64> {
        self.bids.first().map(PriceLevel::total_volume)
    }

    /// Aggregate resting quantity at the best ask.
    pub fn best_ask_volume(&self) -> Option<u64> {
        self.asks.first().map(PriceLevel::total_volume)
    }

    pub fn bid_level_count(&self) -> usize {
        self.bids.len()
    }

    pub fn ask_level_count(&self) -> usize {
        self.asks.len()
    }

    /// Number of resting orders.
    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Look up a resting order by identifier.
    pub fn order(&self, id: u64) -> Option<&super::Order> {
        self.index.get(&id).map(|&idx| self.pool.get(idx))
    }

    /// Bid ladder, best first.
    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    /// Ask ladder, best first.
    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    pub fn pool(&self) -> &OrderPool {
        &self.pool
    }

    /// Snapshot of the top-of-book state.
    pub fn metrics(&self) -> BookMetrics {
        BookMetrics::capture(self)
    }

    // ------------------------------------------------------------------
    // Matching
    // ------------------------------------------------------------------

    /// Match an incoming buy against the asks, lowest price first.
    /// Returns the unmatched remainder.
    fn match_buy<F>(&mut self, taker_id: u64, price: u64, qty: u32, on_execution: &mut F) -> u32
    where
        F: FnMut(&Execution),
    {
        let mut remaining = qty;
        while remaining > 0 && !self.asks.is_empty() {
            if price < self.asks[0].price {
                break;
            }
            remaining = Self::match_at_level(
                &mut self.asks[0],
                &mut self.pool,
                &mut self.index,
                taker_id,
                remaining,
                Side::Sell,
                on_execution,
            );
            if self.asks[0].is_empty() {
                self.asks.remove(0);
            }
        }
        remaining
    }

    /// Match an incoming sell against the bids, highest price first.
    /// Returns the unmatched remainder.
    fn match_sell<F>(&mut self, taker_id: u64, price: u64, qty: u32, on_execution: &mut F) -> u32
    where
        F: FnMut(&Execution),
    {
        let mut remaining = qty;
        while remaining > 0 && !self.bids.is_empty() {
            if price > self.bids[0].price {
                break;
            }
            remaining = Self::match_at_level(
                &mut self.bids[0],
                &mut self.pool,
                &mut self.index,
                taker_id,
                remaining,
                Side::Buy,
                on_execution,
            );
            if self.bids[0].is_empty() {
                self.bids.remove(0);
            }
        }
        remaining
    }

    /// Consume makers at one crossed level, FIFO from the queue head.
    /// Returns the taker's unmatched remainder.
    fn match_at_level<F>(
        level: &mut PriceLevel,
        pool: &mut OrderPool,
        index: &mut FxHashMap<u64, u32>,
        taker_id: u64,
        qty: u32,
        maker_side: Side,
        on_execution: &mut F,
    ) -> u32
    where
        F: FnMut(&Execution),
    {
        let mut remaining = qty;
        while remaining > 0 {
            let Some(maker_idx) = level.front() else {
                break;
            };
            let (maker_id, maker_qty) = {
                let maker = pool.get(maker_idx);
                (maker.id, maker.qty)
            };

            let fill = remaining.min(maker_qty);
            on_execution(&Execution {
                maker_id,
                taker_id,
                price: level.price,
                qty: fill,
                maker_side,
            });

            remaining -= fill;
            level.reduce_volume(fill);
            let filled = {
                let maker = pool.get_mut(maker_idx);
                maker.qty -= fill;
                maker.is_filled()
            };

            if filled {
                level.pop_front(pool);
                index.remove(&maker_id);
                pool.release(maker_idx);
            }
        }
        remaining
    }

    // ------------------------------------------------------------------
    // Ladder maintenance
    // ------------------------------------------------------------------

    /// Insert a resting order into the bid ladder (descending), creating a
    /// level only if none exists at its price.
    fn add_to_bids(&mut self, idx: u32, price: u64) {
        let pos = self.bids.partition_point(|level| level.price > price);
        if pos < self.bids.len() && self.bids[pos].price == price {
            self.bids[pos].insert(&mut self.pool, idx);
        } else {
            let mut level = PriceLevel::new(price);
            level.insert(&mut self.pool, idx);
            self.bids.insert(pos, level);
        }
    }

    /// Insert a resting order into the ask ladder (ascending).
    fn add_to_asks(&mut self, idx: u32, price: u64) {
        let pos = self.asks.partition_point(|level| level.price < price);
        if pos < self.asks.len() && self.asks[pos].price == price {
            self.asks[pos].insert(&mut self.pool, idx);
        } else {
            let mut level = PriceLevel::new(price);
            level.insert(&mut self.pool, idx);
            self.asks.insert(pos, level);
        }
    }
}

/// Binary-search a ladder for the level at `price`. `side` names the
/// ladder's sort order (bids descend, asks ascend).
fn level_position(ladder: &[PriceLevel], price: u64, side: Side) -> Option<usize> {
    let pos = match side {
        Side::Buy => ladder.partition_point(|level| level.price > price),
        Side::Sell => ladder.partition_point(|level| level.price < price),
    };
    (pos < ladder.len() && ladder[pos].price == price).then_some(pos)
}
