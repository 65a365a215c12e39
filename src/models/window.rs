//! Exam time windows.
//!
//! # Time Model
//! All times are in milliseconds relative to an epoch chosen by the
//! consumer (e.g. Unix epoch, start of the exam session).
//!
//! # Boundaries
//! Unlike availability windows, exam windows are **closed** intervals:
//! an exam finishing at 12:00 collides with one starting at 12:00, since
//! the same examinee or room cannot be turned around in zero time.

use serde::{Deserialize, Serialize};

/// A closed time interval [start, finish].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExamWindow {
    /// Exam start (ms, inclusive).
    pub start_ms: i64,
    /// Exam finish (ms, inclusive).
    pub finish_ms: i64,
}

impl ExamWindow {
    /// Creates a window from a start time and a duration.
    pub fn new(start_ms: i64, duration_ms: i64) -> Self {
        Self {
            start_ms,
            finish_ms: start_ms + duration_ms,
        }
    }

    /// Duration of this window (ms).
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.finish_ms - self.start_ms
    }

    /// Whether a timestamp falls within this window (both ends inclusive).
    #[inline]
    pub fn contains(&self, time_ms: i64) -> bool {
        self.start_ms <= time_ms && time_ms <= self.finish_ms
    }

    /// Whether two windows overlap, sharing a boundary instant included.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.contains(other.start_ms) || other.contains(self.start_ms)
    }
}
