//! End-to-end assignment pipeline.
//!
//! # Algorithm
//!
//! 1. Optionally validate the catalog, failing with every problem found.
//! 2. Group subjects by collision into a [`SittingSchedule`].
//! 3. Offer every sitting the classrooms, then the vigilants, then the
//!    examinees.
//! 4. Assign every sitting, collecting all errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use super::capacity::CapacityStatus;
use super::composite::SittingSchedule;
use super::grouping::group_by_collision;
use super::report::DistributionReport;
use crate::error::{AssignmentError, DistributionError};
use crate::models::{Classroom, ExamDistribution, Examinee, Subject, Vigilant};
use crate::validation::{validate_catalog, ValidationError};

/// Catalog snapshot to assign.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentRequest {
    /// Subjects to examine.
    pub subjects: Vec<Subject>,
    /// People sitting exams.
    pub examinees: Vec<Examinee>,
    /// Rooms available for every sitting.
    pub classrooms: Vec<Classroom>,
    /// Invigilation staff.
    pub vigilants: Vec<Vigilant>,
}

impl AssignmentRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subjects.
    pub fn with_subjects(mut self, subjects: Vec<Subject>) -> Self {
        self.subjects = subjects;
        self
    }

    /// Sets the examinees.
    pub fn with_examinees(mut self, examinees: Vec<Examinee>) -> Self {
        self.examinees = examinees;
        self
    }

    /// Sets the classrooms.
    pub fn with_classrooms(mut self, classrooms: Vec<Classroom>) -> Self {
        self.classrooms = classrooms;
        self
    }

    /// Sets the vigilants.
    pub fn with_vigilants(mut self, vigilants: Vec<Vigilant>) -> Self {
        self.vigilants = vigilants;
        self
    }
}

/// Why no schedule could be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The catalog has integrity problems.
    #[error("catalog failed validation with {} problem(s)", .0.len())]
    Invalid(Vec<ValidationError>),
    /// A subject could not be grouped (no exam date).
    #[error(transparent)]
    Grouping(#[from] AssignmentError),
}

/// A schedule after one assignment pass.
#[derive(Debug, Clone)]
pub struct PlannedAssignment<'a> {
    /// The assigned sittings.
    pub schedule: SittingSchedule<'a>,
    /// Every problem found while assigning (empty = success).
    pub errors: Vec<AssignmentError>,
    /// Worst capacity status across sittings.
    pub capacity: CapacityStatus,
}

impl<'a> PlannedAssignment<'a> {
    /// Whether every sitting was assigned.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Every subject's distribution in schedule order.
    pub fn distributions(&self) -> Result<Vec<&ExamDistribution<'a>>, DistributionError> {
        self.schedule.distributions()
    }

    /// Metrics over the distributions.
    pub fn report(&self) -> Result<DistributionReport, DistributionError> {
        Ok(DistributionReport::calculate(&self.distributions()?))
    }
}

/// Runs the whole assignment pipeline over a request.
///
/// # Example
///
/// ```
/// use exam_sittings::assignment::{AssignmentRequest, ExamPlanner};
/// use exam_sittings::models::{Classroom, EntityId, Examinee, Subject, Vigilant};
///
/// let request = AssignmentRequest::new()
///     .with_subjects(vec![Subject::new(EntityId(0), "Maths").with_exam(0, 7_200_000)])
///     .with_examinees(vec![Examinee::new(EntityId(0), "Ada", "Lovelace").with_subject(EntityId(0))])
///     .with_classrooms(vec![Classroom::new(EntityId(0), "A1", 30)])
///     .with_vigilants(vec![Vigilant::member(EntityId(0), "Alan", "Turing")]);
///
/// let planned = ExamPlanner::new().plan(&request).unwrap();
/// assert!(planned.is_complete());
/// assert_eq!(planned.distributions().unwrap()[0].examinee_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ExamPlanner {
    validate: bool,
}

impl Default for ExamPlanner {
    fn default() -> Self {
        Self { validate: true }
    }
}

impl ExamPlanner {
    /// Creates a planner that validates its input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns catalog validation on or off.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Groups, fills and assigns the request's catalog.
    #[instrument(skip_all, fields(subjects = request.subjects.len(), examinees = request.examinees.len()))]
    pub fn plan<'a>(&self, request: &'a AssignmentRequest) -> Result<PlannedAssignment<'a>, PlanError> {
        if self.validate {
            validate_catalog(
                &request.subjects,
                &request.examinees,
                &request.classrooms,
                &request.vigilants,
            )
            .map_err(PlanError::Invalid)?;
        }

        let mut schedule = group_by_collision(&request.subjects)?;
        schedule.add_classrooms(&request.classrooms);
        schedule.add_vigilants(&request.vigilants);
        schedule.add_examinees(&request.examinees);

        let errors = schedule.do_assignment();
        let capacity = schedule.has_enough_capacity();
        info!(
            sittings = schedule.len(),
            errors = errors.len(),
            ?capacity,
            "assignment planned"
        );

        Ok(PlannedAssignment {
            schedule,
            errors,
            capacity,
        })
    }
}
