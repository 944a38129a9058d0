//! Lot paginator: fixed-size pages over the filtered cards.

use rand::seq::SliceRandom;
use rand::Rng;

/// Cards per lot.
pub const LOT_SIZE: usize = 100;

/// Inclusive index range of one lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotBounds {
    pub start: usize,
    pub end: usize,
}

impl LotBounds {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }
}

/// Pagination math over a sequence of `len` items. Lots are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotPager {
    len: usize,
    lot_size: usize,
}

impl LotPager {
    pub fn new(len: usize) -> Self {
        Self::with_lot_size(len, LOT_SIZE)
    }

    pub fn with_lot_size(len: usize, lot_size: usize) -> Self {
        Self {
            len,
            lot_size: lot_size.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn lot_size(&self) -> usize {
        self.lot_size
    }

    /// `ceil(len / lot_size)`.
    pub fn num_lots(&self) -> usize {
        self.len.div_ceil(self.lot_size)
    }

    /// Bounds of `lot` (1-based), or `None` when the lot does not exist.
    pub fn bounds(&self, lot: usize) -> Option<LotBounds> {
        if lot == 0 || lot > self.num_lots() {
            return None;
        }
        let start = (lot - 1) * self.lot_size;
        let end = (lot * self.lot_size).min(self.len) - 1;
        Some(LotBounds { start, end })
    }

    /// Next lot, wrapping from the last back to 1.
    pub fn next_lot(&self, lot: usize) -> usize {
        if lot < self.num_lots() {
            lot + 1
        } else {
            1
        }
    }

    /// Previous lot, wrapping from 1 to the last.
    pub fn prev_lot(&self, lot: usize) -> usize {
        if lot > 1 {
            lot - 1
        } else {
            self.num_lots().max(1)
        }
    }
}

/// Shuffle each lot-sized chunk independently (Fisher-Yates), leaving lot
/// boundaries where they were.
pub fn shuffle_within_lots<T, R: Rng + ?Sized>(items: &mut [T], lot_size: usize, rng: &mut R) {
    for chunk in items.chunks_mut(lot_size.max(1)) {
        chunk.shuffle(rng);
    }
}
