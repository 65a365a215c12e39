//! Assignment error types.
//!
//! Every user-facing failure of the engine is returned as a value so the
//! caller can present the full list of problems in one round-trip. Each
//! variant carries the subject(s) it concerns; rendering and localization
//! are left to the caller.

use serde::Serialize;
use thiserror::Error;

use crate::models::Subject;

/// A problem preventing a sitting from being assigned.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AssignmentError {
    /// The sitting received zero usable classrooms.
    #[error("no classrooms available for subject '{}'", .subject.name)]
    NoClassrooms { subject: Subject },

    /// Summed total capacity is below the examinee count.
    #[error("not enough seats for subject '{}'", .subject.name)]
    NotEnoughSeats { subject: Subject },

    /// Fewer generic vigilants than classrooms needing coverage.
    #[error("not enough vigilants for subject '{}'", .subject.name)]
    NotEnoughVigilants { subject: Subject },

    /// A colliding group could not split its classroom pool.
    #[error("not enough classrooms for colliding subjects [{}]", subject_names(.subjects))]
    NotEnoughClassrooms { subjects: Vec<Subject> },

    /// A colliding group has no specialist for a subject.
    #[error("no specialist vigilant for subject '{}'", .subject.name)]
    MissingSpecialist { subject: Subject },

    /// The subject lacks an exam start or duration.
    #[error("subject '{}' has no exam date", .subject.name)]
    MissingExamDate { subject: Subject },
}

impl AssignmentError {
    /// Kebab-case tag of the variant (matches the serialized `type`).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoClassrooms { .. } => "no-classrooms",
            Self::NotEnoughSeats { .. } => "not-enough-seats",
            Self::NotEnoughVigilants { .. } => "not-enough-vigilants",
            Self::NotEnoughClassrooms { .. } => "not-enough-classrooms",
            Self::MissingSpecialist { .. } => "missing-specialist",
            Self::MissingExamDate { .. } => "missing-exam-date",
        }
    }

    /// Subjects the error is tagged with.
    pub fn subjects(&self) -> Vec<&Subject> {
        match self {
            Self::NotEnoughClassrooms { subjects } => subjects.iter().collect(),
            Self::NoClassrooms { subject }
            | Self::NotEnoughSeats { subject }
            | Self::NotEnoughVigilants { subject }
            | Self::MissingSpecialist { subject }
            | Self::MissingExamDate { subject } => vec![subject],
        }
    }
}

/// Reading a distribution that does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributionError {
    /// `do_assignment` has not completed successfully since the last change.
    #[error("assignment not done")]
    AssignmentNotDone,
}

fn subject_names(subjects: &[Subject]) -> String {
    subjects
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
