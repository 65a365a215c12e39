//! Distribution metrics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Seated | Examinees placed in a classroom |
//! | Classrooms used | Classrooms holding at least one examinee |
//! | Vigilants | Classroom vigilants plus floating specialists |
//! | Max ratio | Highest examinees-per-vigilant over used classrooms |
//! | Overflow | Classrooms seated beyond exam capacity |

use serde::Serialize;

use crate::models::{EntityId, ExamDistribution};

/// Metrics for one subject's distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectReport {
    /// Subject reported on.
    pub subject_id: EntityId,
    /// Subject display name.
    pub subject_name: String,
    /// Examinees placed in a classroom.
    pub seated: usize,
    /// Classrooms holding at least one examinee.
    pub classrooms_used: usize,
    /// Classroom vigilants plus floating specialists.
    pub vigilants: usize,
    /// Floating specialists.
    pub specialists: usize,
    /// `None` when no classroom is used.
    pub max_ratio: Option<f64>,
    /// Used classrooms seated beyond exam capacity.
    pub overflow_classrooms: usize,
}

impl SubjectReport {
    fn of(distribution: &ExamDistribution<'_>) -> Self {
        let used: Vec<_> = distribution
            .classrooms
            .iter()
            .filter(|a| !a.examinees.is_empty())
            .collect();

        Self {
            subject_id: distribution.subject.id,
            subject_name: distribution.subject.name.clone(),
            seated: distribution.examinee_count(),
            classrooms_used: used.len(),
            vigilants: distribution.vigilant_count() + distribution.specialists.len(),
            specialists: distribution.specialists.len(),
            max_ratio: used
                .iter()
                .filter_map(|a| a.examinee_vigilant_ratio())
                .reduce(f64::max),
            overflow_classrooms: used.iter().filter(|a| a.exceeds_exam_capacity()).count(),
        }
    }
}

/// Metrics over a whole schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionReport {
    /// Per-subject metrics in schedule order.
    pub subjects: Vec<SubjectReport>,
    /// Examinees seated across every subject.
    pub total_seated: usize,
    /// Overflowing classrooms across every subject.
    pub total_overflow_classrooms: usize,
    /// Worst examinees-per-vigilant ratio across every subject.
    pub max_ratio: Option<f64>,
}

impl DistributionReport {
    /// Computes metrics from assigned distributions.
    pub fn calculate(distributions: &[&ExamDistribution<'_>]) -> Self {
        let subjects: Vec<SubjectReport> =
            distributions.iter().map(|d| SubjectReport::of(d)).collect();

        Self {
            total_seated: subjects.iter().map(|s| s.seated).sum(),
            total_overflow_classrooms: subjects.iter().map(|s| s.overflow_classrooms).sum(),
            max_ratio: subjects.iter().filter_map(|s| s.max_ratio).reduce(f64::max),
            subjects,
        }
    }

    /// Metrics for one subject.
    pub fn subject(&self, subject_id: EntityId) -> Option<&SubjectReport> {
        self.subjects.iter().find(|s| s.subject_id == subject_id)
    }
}
