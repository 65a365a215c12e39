//! Seat capacity accounting.

use serde::Serialize;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::models::{CapacityTier, Classroom};

/// Summed classroom capacities of a sitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capacities {
    /// Sum of physical capacities.
    pub total_capacity: u64,
    /// Sum of exam-spacing capacities.
    pub exam_capacity: u64,
}

impl Capacities {
    /// Sums the capacities of the given classrooms.
    pub fn of<'c>(classrooms: impl IntoIterator<Item = &'c Classroom>) -> Self {
        classrooms
            .into_iter()
            .map(|c| Self {
                total_capacity: u64::from(c.total_capacity),
                exam_capacity: u64::from(c.capacity(CapacityTier::Exam)),
            })
            .sum()
    }

    /// Capacity for one tier.
    #[inline]
    pub fn get(&self, tier: CapacityTier) -> u64 {
        match tier {
            CapacityTier::Exam => self.exam_capacity,
            CapacityTier::Total => self.total_capacity,
        }
    }
}

impl Add for Capacities {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            total_capacity: self.total_capacity + rhs.total_capacity,
            exam_capacity: self.exam_capacity + rhs.exam_capacity,
        }
    }
}

impl AddAssign for Capacities {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Capacities {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Whether a sitting's classrooms can seat its examinees.
///
/// Variants are ordered from best to worst, so aggregating several
/// sittings is `max()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapacityStatus {
    /// Everyone fits under exam spacing.
    NoProblem,
    /// Everyone fits, but only by using total capacity.
    CouldUseMore,
    /// Even total capacity is too small.
    NotEnough,
}

impl CapacityStatus {
    /// Classifies `needed` seats against summed capacities.
    pub fn evaluate(needed: usize, capacities: Capacities) -> Self {
        let needed = needed as u64;
        if needed > capacities.total_capacity {
            Self::NotEnough
        } else if needed > capacities.exam_capacity {
            Self::CouldUseMore
        } else {
            Self::NoProblem
        }
    }

    /// Worst status across sittings (`NoProblem` when empty).
    pub fn worst(statuses: impl IntoIterator<Item = Self>) -> Self {
        statuses.into_iter().max().unwrap_or(Self::NoProblem)
    }
}
