//! Composite scheduler.
//!
//! Sittings in a schedule never overlap in time, so every sitting is
//! offered the whole classroom and vigilant pools.

use tracing::{debug, instrument, warn};

use super::capacity::{Capacities, CapacityStatus};
use super::individual::IndividualSitting;
use super::sitting::Sitting;
use crate::error::{AssignmentError, DistributionError};
use crate::models::{Classroom, ExamDistribution, Examinee, Subject, Vigilant};

/// Ordered list of sittings handled as one.
#[derive(Debug, Clone, Default)]
pub struct SittingSchedule<'a> {
    sittings: Vec<Sitting<'a>>,
}

impl<'a> SittingSchedule<'a> {
    /// Creates a schedule over the given sittings.
    pub fn new(sittings: Vec<Sitting<'a>>) -> Self {
        Self { sittings }
    }

    /// Appends a sitting.
    pub fn push(&mut self, sitting: impl Into<Sitting<'a>>) {
        self.sittings.push(sitting.into());
    }

    /// Child sittings in schedule order.
    pub fn sittings(&self) -> &[Sitting<'a>] {
        &self.sittings
    }

    /// Number of child sittings.
    pub fn len(&self) -> usize {
        self.sittings.len()
    }

    /// Whether the schedule has no sittings.
    pub fn is_empty(&self) -> bool {
        self.sittings.is_empty()
    }

    /// Offers the examinees to every sitting; each keeps its own subject's.
    pub fn add_examinees<I>(&mut self, examinees: I)
    where
        I: IntoIterator<Item = &'a Examinee>,
    {
        let examinees: Vec<&'a Examinee> = examinees.into_iter().collect();
        for sitting in &mut self.sittings {
            sitting.add_examinees(examinees.iter().copied());
        }
    }

    /// Gives every sitting the whole classroom pool.
    pub fn add_classrooms<I>(&mut self, classrooms: I)
    where
        I: IntoIterator<Item = &'a Classroom>,
    {
        let classrooms: Vec<&'a Classroom> = classrooms.into_iter().collect();
        for sitting in &mut self.sittings {
            sitting.add_classrooms(classrooms.iter().copied());
        }
    }

    /// Gives every sitting the whole vigilant pool.
    pub fn add_vigilants<I>(&mut self, vigilants: I)
    where
        I: IntoIterator<Item = &'a Vigilant>,
    {
        let vigilants: Vec<&'a Vigilant> = vigilants.into_iter().collect();
        for sitting in &mut self.sittings {
            sitting.add_vigilants(vigilants.iter().copied());
        }
    }

    /// Drops the classrooms of every sitting.
    pub fn remove_classrooms(&mut self) {
        for sitting in &mut self.sittings {
            sitting.remove_classrooms();
        }
    }

    /// Drops the vigilants of every sitting.
    pub fn remove_vigilants(&mut self) {
        for sitting in &mut self.sittings {
            sitting.remove_vigilants();
        }
    }

    /// Assigns every sitting, collecting all of their errors.
    ///
    /// A failing sitting does not stop the ones after it.
    #[instrument(skip(self), fields(sittings = self.sittings.len()))]
    pub fn do_assignment(&mut self) -> Vec<AssignmentError> {
        let mut errors = Vec::new();
        for (index, sitting) in self.sittings.iter_mut().enumerate() {
            let found = sitting.do_assignment();
            debug!(index, kind = sitting.kind(), errors = found.len(), "sitting done");
            errors.extend(found);
        }
        if !errors.is_empty() {
            warn!(errors = errors.len(), "schedule assigned with errors");
        }
        errors
    }

    /// Marks every sitting as deliberately left empty.
    pub fn use_empty_assignment(&mut self) {
        for sitting in &mut self.sittings {
            sitting.use_empty_assignment();
        }
    }

    /// Summed capacities of every sitting.
    pub fn capacities(&self) -> Capacities {
        self.sittings.iter().map(Sitting::capacities).sum()
    }

    /// Worst capacity status across sittings.
    pub fn has_enough_capacity(&self) -> CapacityStatus {
        CapacityStatus::worst(self.sittings.iter().map(Sitting::has_enough_capacity))
    }

    /// Every subject's distribution in schedule order.
    ///
    /// Fails if any sitting has not been assigned.
    pub fn distributions(&self) -> Result<Vec<&ExamDistribution<'a>>, DistributionError> {
        let mut distributions = Vec::new();
        for sitting in &self.sittings {
            distributions.extend(sitting.distributions()?);
        }
        Ok(distributions)
    }

    /// Every subject in schedule order.
    pub fn subjects(&self) -> Vec<&'a Subject> {
        self.sittings.iter().flat_map(Sitting::subjects).collect()
    }

    /// Every single-subject sitting in schedule order.
    pub fn individuals(&self) -> Vec<&IndividualSitting<'a>> {
        self.sittings.iter().flat_map(Sitting::individuals).collect()
    }
}
