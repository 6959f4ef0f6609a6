use {
    serde::{Deserialize, Serialize},
    std::ops::{Range, RangeFrom, RangeTo},
};

mod merge;

pub use merge::*;

/// An arc of the hash ring, bounded inclusively below and exclusively above
/// (`start..end`).
///
/// If `start >= end`, the arc passes through zero and is equivalent to the two
/// ranges `(..end)` and `(start..)`. An arc with `start == end` covers the
/// whole ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyRange<Idx> {
    pub start: Idx,
    pub end: Idx,
}

impl<Idx> KeyRange<Idx> {
    /// Creates a `KeyRange`.
    pub fn new(start: Idx, end: Idx) -> Self {
        Self { start, end }
    }
}

impl<Idx: PartialOrd<Idx> + Clone> KeyRange<Idx> {
    /// Returns `true` if the arc passes through zero.
    pub fn is_wrapping(&self) -> bool {
        !(self.start < self.end)
    }

    /// Returns `true` if `item` falls on the arc.
    pub fn contains(&self, item: &Idx) -> bool {
        if self.is_wrapping() {
            self.range_from().contains(&item) || self.range_to().contains(&item)
        } else {
            self.range_from().contains(&item) && self.range_to().contains(&item)
        }
    }

    /// Returns `true` if the two arcs share at least one position.
    pub fn is_overlapping(&self, other: &Self) -> bool {
        self.contains(&other.start) || other.contains(&self.start)
    }

    /// Moves `start` back to `other.start` when that grows the arc.
    pub fn extend_start(&mut self, other: &Self) {
        if other.start < self.start {
            if self.is_wrapping() && other.start < self.end {
                self.start = self.end.clone();
            } else {
                self.start = other.start.clone();
            }
        }
    }

    /// Moves `end` forward to `other.end` when that grows the arc.
    pub fn extend_end(&mut self, other: &Self) {
        if other.end > self.end {
            if self.is_wrapping() && other.end > self.start {
                self.end = self.start.clone();
            } else {
                self.end = other.end.clone();
            }
        }
    }

    fn range_from(&self) -> RangeFrom<&Idx> {
        &self.start..
    }

    fn range_to(&self) -> RangeTo<&Idx> {
        ..&self.end
    }
}

impl<Idx> From<Range<Idx>> for KeyRange<Idx> {
    fn from(value: Range<Idx>) -> Self {
        Self {
            start: value.start,
            end: value.end,
        }
    }
}

impl KeyRange<u32> {
    /// Number of ring positions on the arc. A full ring is `2^32`.
    pub fn size(&self) -> u64 {
        let (start, end) = (u64::from(self.start), u64::from(self.end));

        if self.is_wrapping() {
            (1u64 << 32) - (start - end)
        } else {
            end - start
        }
    }
}
