//! Catalog validation.
//!
//! Checks the structural integrity of a catalog snapshot before
//! assignment. Detects:
//! - Duplicate IDs within one entity kind
//! - Enrolments and specialties naming unknown subjects
//! - Classrooms with zero capacity or priority, or more exam seats than
//!   physical seats
//! - Subjects with a non-positive exam duration or no exam date

use serde::Serialize;
use std::collections::HashSet;

use crate::models::{Classroom, EntityId, Examinee, Subject, Vigilant};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationErrorKind {
    /// Two entities of one kind share an ID.
    DuplicateId,
    /// An examinee or vigilant references a subject that doesn't exist.
    UnknownSubject,
    /// A classroom has zero total or exam capacity, or exam capacity
    /// above total capacity.
    InvalidCapacity,
    /// A classroom has priority zero.
    InvalidPriority,
    /// A subject's exam duration is zero or negative.
    InvalidDuration,
    /// A subject has no exam start or no exam duration.
    MissingExamDate,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn check_unique<I>(kind: &str, ids: I, errors: &mut Vec<ValidationError>) -> HashSet<EntityId>
where
    I: IntoIterator<Item = EntityId>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {kind} ID: {id}"),
            ));
        }
    }
    seen
}

/// Validates a catalog snapshot.
///
/// Checks:
/// 1. No duplicate IDs among subjects, examinees, vigilants, classrooms
/// 2. Every subject has an exam start and a positive duration
/// 3. Every enrolment and specialty names a known subject
/// 4. Every classroom has positive capacities and priority
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(
    subjects: &[Subject],
    examinees: &[Examinee],
    classrooms: &[Classroom],
    vigilants: &[Vigilant],
) -> ValidationResult {
    let mut errors = Vec::new();

    let subject_ids = check_unique("subject", subjects.iter().map(|s| s.id), &mut errors);
    check_unique("examinee", examinees.iter().map(|e| e.id), &mut errors);
    check_unique("vigilant", vigilants.iter().map(|v| v.id), &mut errors);
    check_unique("classroom", classrooms.iter().map(|c| c.id), &mut errors);

    for subject in subjects {
        if !subject.has_exam_date() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingExamDate,
                format!("Subject '{}' has no exam date", subject.name),
            ));
        }
        if let Some(duration) = subject.exam_duration_ms.filter(|&d| d <= 0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!(
                    "Subject '{}' has exam duration {duration} ms",
                    subject.name
                ),
            ));
        }
    }

    for examinee in examinees {
        for id in examinee
            .subject_ids
            .iter()
            .filter(|id| !subject_ids.contains(*id))
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownSubject,
                format!("Examinee {} is enrolled in unknown subject {id}", examinee.id),
            ));
        }
    }

    for vigilant in vigilants {
        for id in vigilant
            .specialty_ids
            .iter()
            .filter(|id| !subject_ids.contains(*id))
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownSubject,
                format!("Vigilant {} specializes in unknown subject {id}", vigilant.id),
            ));
        }
    }

    for classroom in classrooms {
        if classroom.total_capacity == 0
            || classroom.exam_capacity == 0
            || classroom.exam_capacity > classroom.total_capacity
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!(
                    "Classroom '{}' has capacities total={} exam={}",
                    classroom.code, classroom.total_capacity, classroom.exam_capacity
                ),
            ));
        }
        if classroom.priority == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPriority,
                format!("Classroom '{}' has priority 0", classroom.code),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
