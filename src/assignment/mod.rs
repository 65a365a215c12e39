//! Exam sitting assignment engine.
//!
//! Groups subjects by exam collision, then seats each sitting's
//! examinees across classrooms and staffs the classrooms with vigilants.
//!
//! # Sitting kinds
//!
//! | Kind | Type | Resources |
//! |------|------|-----------|
//! | One subject | [`IndividualSitting`] | its own classrooms and vigilants |
//! | Overlapping subjects | [`CollidingSittingGroup`] | one shared pool, split per subject |
//! | Schedule | [`SittingSchedule`] | every child gets the whole pool |
//!
//! [`Sitting`] closes over the three kinds.
//!
//! # Capacity tiers
//!
//! Classrooms carry an exam capacity (seats usable under exam spacing)
//! and a total capacity (physical seats). Seating prefers exam capacity
//! and overflows into total capacity only when it must.
//!
//! # Errors
//!
//! `do_assignment` returns every [`AssignmentError`](crate::error::AssignmentError)
//! found; an empty list means each subject's distribution is ready.

mod capacity;
mod colliding;
mod composite;
mod grouping;
mod individual;
mod planner;
mod ratio;
mod report;
mod sitting;

pub use capacity::{Capacities, CapacityStatus};
pub use colliding::CollidingSittingGroup;
pub use composite::SittingSchedule;
pub use grouping::{
    find_exam_date_collisions, find_examinee_collisions, group_by_collision,
    group_examinees_by_subject, order_and_group, subjects_without_exam_date, CollisionPairs,
};
pub use individual::IndividualSitting;
pub use planner::{AssignmentRequest, ExamPlanner, PlanError, PlannedAssignment};
pub use report::{DistributionReport, SubjectReport};
pub use sitting::Sitting;
