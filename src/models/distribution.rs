//! Distribution (solution) model.
//!
//! A distribution is the finalized seating and staffing of one subject's
//! sitting: which examinees sit in which classroom, which vigilants watch
//! each classroom, and which specialists float across the sitting.
//!
//! Distributions borrow from the catalog snapshot they were computed
//! from; they are only meaningful while that snapshot is alive.

use serde::Serialize;

use super::{CapacityTier, Classroom, EntityId, Examinee, Subject, Vigilant};

/// Seating and staffing of one subject's sitting.
#[derive(Debug, Clone, Serialize)]
pub struct ExamDistribution<'a> {
    /// The subject being examined.
    pub subject: &'a Subject,
    /// Per-classroom allocations, in classroom priority order.
    pub classrooms: Vec<ClassroomAllocation<'a>>,
    /// Subject specialists attached to the whole sitting.
    pub specialists: Vec<&'a Vigilant>,
}

/// The examinees and vigilants placed in one classroom.
#[derive(Debug, Clone, Serialize)]
pub struct ClassroomAllocation<'a> {
    /// The classroom.
    pub classroom: &'a Classroom,
    /// Seated examinees, in (surname, name) order.
    pub examinees: Vec<&'a Examinee>,
    /// Invigilators, in (surname, name) order.
    pub vigilants: Vec<&'a Vigilant>,
}

impl<'a> ExamDistribution<'a> {
    /// Creates a distribution with no classrooms.
    pub fn empty(subject: &'a Subject) -> Self {
        Self {
            subject,
            classrooms: Vec::new(),
            specialists: Vec::new(),
        }
    }

    /// Whether nothing was seated.
    pub fn is_empty(&self) -> bool {
        self.classrooms.is_empty()
    }

    /// Total seated examinees.
    pub fn examinee_count(&self) -> usize {
        self.classrooms.iter().map(|c| c.examinees.len()).sum()
    }

    /// Total classroom vigilants (specialists excluded).
    pub fn vigilant_count(&self) -> usize {
        self.classrooms.iter().map(|c| c.vigilants.len()).sum()
    }

    /// Finds the allocation for a classroom.
    pub fn allocation_for_classroom(&self, classroom_id: EntityId) -> Option<&ClassroomAllocation<'a>> {
        self.classrooms.iter().find(|c| c.classroom.id == classroom_id)
    }

    /// Finds the classroom an examinee was seated in.
    pub fn classroom_of_examinee(&self, examinee_id: EntityId) -> Option<&'a Classroom> {
        self.classrooms
            .iter()
            .find(|c| c.examinees.iter().any(|e| e.id == examinee_id))
            .map(|c| c.classroom)
    }

    /// Finds the classroom a vigilant was placed in.
    pub fn classroom_of_vigilant(&self, vigilant_id: EntityId) -> Option<&'a Classroom> {
        self.classrooms
            .iter()
            .find(|c| c.vigilants.iter().any(|v| v.id == vigilant_id))
            .map(|c| c.classroom)
    }
}

impl<'a> ClassroomAllocation<'a> {
    /// Creates an allocation with no vigilants yet.
    pub fn new(classroom: &'a Classroom, examinees: Vec<&'a Examinee>) -> Self {
        Self {
            classroom,
            examinees,
            vigilants: Vec::new(),
        }
    }

    /// Examinees per vigilant. `None` when nobody watches the room.
    pub fn examinee_vigilant_ratio(&self) -> Option<f64> {
        if self.vigilants.is_empty() {
            return None;
        }
        Some(self.examinees.len() as f64 / self.vigilants.len() as f64)
    }

    /// Whether the room holds more examinees than its exam capacity.
    pub fn exceeds_exam_capacity(&self) -> bool {
        self.examinees.len() > self.classroom.capacity(CapacityTier::Exam) as usize
    }
}
