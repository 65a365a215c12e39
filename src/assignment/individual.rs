//! Single-subject sitting allocator.
//!
//! # Algorithm
//!
//! **Examinees** (proportional with deficit correction):
//! 1. Sort examinees by (surname, name) and classrooms by priority.
//! 2. Split seats proportionally to exam capacity when the summed exam
//!    capacity exceeds the examinee count, otherwise to total capacity.
//! 3. Floor each share, then hand out the remainder one by one,
//!    round-robin in priority order among classrooms below their exam
//!    capacity; if examinees are still left, repeat with total capacity
//!    as the ceiling.
//! 4. Slice the sorted examinees into contiguous runs per classroom.
//!
//! **Vigilants** (ratio balancing):
//! 1. Every classroom with examinees gets one vigilant.
//! 2. Each remaining vigilant goes to the classroom with the highest
//!    examinee-to-vigilant ratio (ties: lower priority number).
//! 3. Slice the sorted vigilants into runs in classroom order.
//!
//! Specialists are not placed in a classroom; they float across the
//! whole sitting.
//!
//! # Complexity
//! O(e log e + c * (e + v)) for e examinees, c classrooms, v vigilants.

use std::collections::BTreeMap;
use tracing::{debug, error, instrument, warn};

use super::capacity::{Capacities, CapacityStatus};
use super::ratio::{self, RatioEntry};
use crate::error::{AssignmentError, DistributionError};
use crate::models::{
    CapacityTier, Classroom, ClassroomAllocation, EntityId, ExamDistribution, Examinee, Subject,
    Vigilant,
};

/// The sitting of one subject.
///
/// Accumulates examinees, classrooms and vigilants, then computes an
/// [`ExamDistribution`] on [`do_assignment`](Self::do_assignment). Any
/// change to the working sets discards the previous distribution.
///
/// # Example
/// ```
/// use exam_sittings::assignment::IndividualSitting;
/// use exam_sittings::models::{Classroom, EntityId, Examinee, Subject, Vigilant};
///
/// let subject = Subject::new(EntityId(0), "Maths").with_exam(0, 7_200_000);
/// let examinees: Vec<_> = (1..=4)
///     .map(|i| Examinee::new(EntityId(i), "E", format!("S{i}")).with_subject(EntityId(0)))
///     .collect();
/// let classrooms = vec![Classroom::new(EntityId(10), "A", 4)];
/// let vigilants = vec![Vigilant::member(EntityId(20), "V", "W")];
///
/// let mut sitting = IndividualSitting::new(&subject);
/// sitting.add_examinees(&examinees);
/// sitting.add_classrooms(&classrooms);
/// sitting.add_vigilants(&vigilants);
///
/// assert!(sitting.do_assignment().is_empty());
/// assert_eq!(sitting.distribution().unwrap().examinee_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct IndividualSitting<'a> {
    subject: &'a Subject,
    examinees: BTreeMap<EntityId, &'a Examinee>,
    classrooms: BTreeMap<EntityId, &'a Classroom>,
    vigilants: BTreeMap<EntityId, &'a Vigilant>,
    specialists: BTreeMap<EntityId, &'a Vigilant>,
    distribution: Option<ExamDistribution<'a>>,
}

impl<'a> IndividualSitting<'a> {
    /// Creates an empty sitting for a subject.
    pub fn new(subject: &'a Subject) -> Self {
        Self {
            subject,
            examinees: BTreeMap::new(),
            classrooms: BTreeMap::new(),
            vigilants: BTreeMap::new(),
            specialists: BTreeMap::new(),
            distribution: None,
        }
    }

    /// The subject examined in this sitting.
    pub fn subject(&self) -> &'a Subject {
        self.subject
    }

    /// Adds the examinees of the pool that sit this subject.
    ///
    /// Re-adding an examinee is a no-op.
    pub fn add_examinees<I>(&mut self, examinees: I)
    where
        I: IntoIterator<Item = &'a Examinee>,
    {
        let subject_id = self.subject.id;
        self.examinees.extend(
            examinees
                .into_iter()
                .filter(|e| e.sits(subject_id))
                .map(|e| (e.id, e)),
        );
        self.reset_distribution();
    }

    /// Adds the classrooms of the pool without a court location.
    pub fn add_classrooms<I>(&mut self, classrooms: I)
    where
        I: IntoIterator<Item = &'a Classroom>,
    {
        self.classrooms.extend(
            classrooms
                .into_iter()
                .filter(|c| c.is_assignable())
                .map(|c| (c.id, c)),
        );
        self.reset_distribution();
    }

    /// Adds the member vigilants of the pool, split into specialists for
    /// this subject and generic invigilators.
    pub fn add_vigilants<I>(&mut self, vigilants: I)
    where
        I: IntoIterator<Item = &'a Vigilant>,
    {
        let subject_id = self.subject.id;
        for vigilant in vigilants.into_iter().filter(|v| v.invigilates()) {
            if vigilant.is_specialist_for(subject_id) {
                self.specialists.insert(vigilant.id, vigilant);
            } else {
                self.vigilants.insert(vigilant.id, vigilant);
            }
        }
        self.reset_distribution();
    }

    /// Drops every classroom.
    pub fn remove_classrooms(&mut self) {
        self.classrooms.clear();
        self.reset_distribution();
    }

    /// Drops every vigilant and specialist.
    pub fn remove_vigilants(&mut self) {
        self.vigilants.clear();
        self.specialists.clear();
        self.reset_distribution();
    }

    pub(crate) fn reset_distribution(&mut self) {
        self.distribution = None;
    }

    /// Number of examinees sitting this subject.
    pub fn examinee_count(&self) -> usize {
        self.examinees.len()
    }

    /// Number of assigned classrooms.
    pub fn classroom_count(&self) -> usize {
        self.classrooms.len()
    }

    /// Examinees in (surname, name) order.
    pub fn examinees(&self) -> Vec<&'a Examinee> {
        let mut examinees: Vec<_> = self.examinees.values().copied().collect();
        examinees.sort_by(|a, b| a.name_key().cmp(&b.name_key()));
        examinees
    }

    /// Classrooms in fill order (priority, then id).
    pub fn classrooms(&self) -> Vec<&'a Classroom> {
        let mut classrooms: Vec<_> = self.classrooms.values().copied().collect();
        classrooms.sort_by_key(|c| c.priority);
        classrooms
    }

    /// Generic vigilants in (surname, name) order.
    pub fn vigilants(&self) -> Vec<&'a Vigilant> {
        sorted_by_name(self.vigilants.values().copied())
    }

    /// Specialists for this subject in (surname, name) order.
    pub fn specialists(&self) -> Vec<&'a Vigilant> {
        sorted_by_name(self.specialists.values().copied())
    }

    /// Summed capacities of the assigned classrooms.
    pub fn capacities(&self) -> Capacities {
        Capacities::of(self.classrooms.values().copied())
    }

    /// Whether the classrooms can seat every examinee.
    pub fn has_enough_capacity(&self) -> CapacityStatus {
        CapacityStatus::evaluate(self.examinee_count(), self.capacities())
    }

    /// Seats examinees and places vigilants.
    ///
    /// Returns the problems found; an empty list means the distribution
    /// is available through [`distribution`](Self::distribution).
    #[instrument(skip(self), fields(subject = %self.subject.name, examinees = self.examinees.len()))]
    pub fn do_assignment(&mut self) -> Vec<AssignmentError> {
        self.reset_distribution();
        match self.assign() {
            Ok(distribution) => {
                debug!(
                    classrooms = distribution.classrooms.len(),
                    vigilants = distribution.vigilant_count(),
                    "sitting assigned"
                );
                self.distribution = Some(distribution);
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "sitting not assigned");
                vec![err]
            }
        }
    }

    /// Marks the sitting as deliberately left empty.
    pub fn use_empty_assignment(&mut self) {
        self.distribution = Some(ExamDistribution::empty(self.subject));
    }

    /// The computed distribution.
    pub fn distribution(&self) -> Result<&ExamDistribution<'a>, DistributionError> {
        self.distribution
            .as_ref()
            .ok_or(DistributionError::AssignmentNotDone)
    }

    fn assign(&self) -> Result<ExamDistribution<'a>, AssignmentError> {
        if self.classrooms.is_empty() {
            return Err(AssignmentError::NoClassrooms {
                subject: self.subject.clone(),
            });
        }
        if self.has_enough_capacity() == CapacityStatus::NotEnough {
            return Err(AssignmentError::NotEnoughSeats {
                subject: self.subject.clone(),
            });
        }
        if self.vigilants.len() < self.classrooms.len() {
            return Err(AssignmentError::NotEnoughVigilants {
                subject: self.subject.clone(),
            });
        }

        let mut allocations = self.seat_examinees()?;
        place_vigilants(&mut allocations, &self.vigilants());

        Ok(ExamDistribution {
            subject: self.subject,
            classrooms: allocations,
            specialists: self.specialists(),
        })
    }

    fn seat_examinees(&self) -> Result<Vec<ClassroomAllocation<'a>>, AssignmentError> {
        let examinees = self.examinees();
        let classrooms = self.classrooms();

        let counts = match seat_counts(&classrooms, examinees.len()) {
            Ok(counts) => counts,
            Err(unseated) => {
                error!(
                    subject = %self.subject.name,
                    unseated,
                    total = examinees.len(),
                    "total capacity could not fit examinees after passing the capacity check"
                );
                return Err(AssignmentError::NotEnoughSeats {
                    subject: self.subject.clone(),
                });
            }
        };

        let mut rest = examinees.into_iter();
        Ok(classrooms
            .into_iter()
            .zip(counts)
            .map(|(classroom, count)| {
                ClassroomAllocation::new(classroom, rest.by_ref().take(count).collect())
            })
            .collect())
    }
}

/// Seats per classroom (same order as `classrooms`).
///
/// Fails with the number of unseated examinees when even total
/// capacity runs out.
pub(crate) fn seat_counts(classrooms: &[&Classroom], examinees: usize) -> Result<Vec<usize>, usize> {
    let capacities = Capacities::of(classrooms.iter().copied());
    let share_tier = if capacities.exam_capacity > examinees as u64 {
        CapacityTier::Exam
    } else {
        CapacityTier::Total
    };
    let denominator = capacities.get(share_tier);

    let mut counts: Vec<usize> = classrooms
        .iter()
        .map(|c| {
            if denominator == 0 {
                0
            } else {
                (u64::from(c.capacity(share_tier)) * examinees as u64 / denominator) as usize
            }
        })
        .collect();

    let mut seated: usize = counts.iter().sum();
    for tier in [CapacityTier::Exam, CapacityTier::Total] {
        seated += fill_round_robin(classrooms, &mut counts, examinees - seated, tier);
    }

    if seated < examinees {
        Err(examinees - seated)
    } else {
        Ok(counts)
    }
}

/// Hands out up to `remaining` seats one at a time, cycling through the
/// classrooms still below their `tier` capacity. Returns seats handed out.
fn fill_round_robin(
    classrooms: &[&Classroom],
    counts: &mut [usize],
    mut remaining: usize,
    tier: CapacityTier,
) -> usize {
    let mut open: Vec<usize> = (0..classrooms.len())
        .filter(|&i| counts[i] < classrooms[i].capacity(tier) as usize)
        .collect();
    let mut cursor = 0;
    let mut handed = 0;

    while remaining > 0 && !open.is_empty() {
        let i = open[cursor];
        counts[i] += 1;
        handed += 1;
        remaining -= 1;
        if counts[i] < classrooms[i].capacity(tier) as usize {
            cursor = (cursor + 1) % open.len();
        } else {
            open.remove(cursor);
            if cursor >= open.len() {
                cursor = 0;
            }
        }
    }
    handed
}

fn place_vigilants<'a>(allocations: &mut [ClassroomAllocation<'a>], vigilants: &[&'a Vigilant]) {
    let staffed: Vec<usize> = (0..allocations.len())
        .filter(|&i| !allocations[i].examinees.is_empty())
        .collect();
    let mut entries: Vec<RatioEntry> = staffed
        .iter()
        .map(|&i| {
            let allocation = &allocations[i];
            RatioEntry::seeded(allocation.examinees.len(), u64::from(allocation.classroom.priority))
        })
        .collect();
    ratio::distribute(&mut entries, vigilants.len());

    let mut rest = vigilants.iter().copied();
    for (&i, entry) in staffed.iter().zip(&entries) {
        allocations[i].vigilants = rest.by_ref().take(entry.vigilants).collect();
    }
}

fn sorted_by_name<'a>(vigilants: impl Iterator<Item = &'a Vigilant>) -> Vec<&'a Vigilant> {
    let mut vigilants: Vec<_> = vigilants.collect();
    vigilants.sort_by(|a, b| a.name_key().cmp(&b.name_key()));
    vigilants
}
