//! Time windows.
//!
//! # Time Model
//! All instants are minutes on a single run clock. The loader decides what
//! minute 0 means (midnight for the military clock, an arbitrary epoch for
//! raw minutes). Intervals are half-open: `[start, end)`.

use serde::{Deserialize, Serialize};

/// Largest magnitude accepted for an instant, duration or transition time
/// (minutes, a little under 1902 years).
pub const MAX_MINUTES: i64 = 1_000_000_000;

/// Whether `minutes` lies within `[-MAX_MINUTES, MAX_MINUTES]`.
#[inline]
pub fn in_range(minutes: i64) -> bool {
    (-MAX_MINUTES..=MAX_MINUTES).contains(&minutes)
}

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    /// Interval start (minutes, inclusive).
    pub start: i64,
    /// Interval end (minutes, exclusive).
    pub end: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Duration of this window (minutes). Zero for empty or inverted windows.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end.saturating_sub(self.start).max(0)
    }

    /// Whether the window admits no instant at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether `[start, end)` lies entirely inside this window.
    ///
    /// An empty window contains nothing, not even a zero-length interval.
    #[inline]
    pub fn contains_interval(&self, start: i64, end: i64) -> bool {
        !self.is_empty() && start >= self.start && end <= self.end && start <= end
    }

    /// Whether two windows overlap.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether both bounds are within [`MAX_MINUTES`].
    #[inline]
    pub fn in_range(&self) -> bool {
        in_range(self.start) && in_range(self.end)
    }
}
