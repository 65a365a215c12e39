//! Classroom model.
//!
//! Classrooms carry two capacities:
//! - **exam capacity**: seats usable under strict exam spacing (preferred)
//! - **total capacity**: the physical maximum, used as overflow
//!
//! Classrooms with a court location are reserved for a separate exam
//! track and are never used by the assignment engine.

use serde::{Deserialize, Serialize};

use super::EntityId;

/// A room examinees can be seated in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique classroom identifier.
    pub id: EntityId,
    /// Room code (e.g. "A-101").
    pub code: String,
    /// Fill order (lower = filled first, positive).
    pub priority: u32,
    /// Physical seating maximum (>= 1).
    pub total_capacity: u32,
    /// Seats usable under exam spacing (>= 1, normally <= total).
    pub exam_capacity: u32,
    /// Court the room is reserved for, if any.
    pub court_location: Option<i16>,
}

impl Classroom {
    /// Creates a classroom whose exam capacity equals its total capacity.
    pub fn new(id: EntityId, code: impl Into<String>, total_capacity: u32) -> Self {
        Self {
            id,
            code: code.into(),
            priority: 1,
            total_capacity,
            exam_capacity: total_capacity,
            court_location: None,
        }
    }

    /// Sets the fill priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets both capacities.
    pub fn with_capacities(mut self, total_capacity: u32, exam_capacity: u32) -> Self {
        self.total_capacity = total_capacity;
        self.exam_capacity = exam_capacity;
        self
    }

    /// Reserves the room for a court.
    pub fn with_court_location(mut self, court: i16) -> Self {
        self.court_location = Some(court);
        self
    }

    /// Whether the engine may seat examinees here.
    #[inline]
    pub fn is_assignable(&self) -> bool {
        self.court_location.is_none()
    }

    /// Seat limit for the given capacity tier.
    ///
    /// The exam tier never exceeds the physical seat count.
    #[inline]
    pub fn capacity(&self, tier: CapacityTier) -> u32 {
        match tier {
            CapacityTier::Exam => self.exam_capacity.min(self.total_capacity),
            CapacityTier::Total => self.total_capacity,
        }
    }
}

/// Which classroom capacity acts as the seat limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityTier {
    /// Soft limit under exam spacing.
    Exam,
    /// Hard physical limit.
    Total,
}
