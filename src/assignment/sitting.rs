//! The closed set of sitting kinds.

use super::capacity::{Capacities, CapacityStatus};
use super::colliding::CollidingSittingGroup;
use super::composite::SittingSchedule;
use super::individual::IndividualSitting;
use crate::error::{AssignmentError, DistributionError};
use crate::models::{Classroom, ExamDistribution, Examinee, Subject, Vigilant};

/// One node of a sitting schedule.
#[derive(Debug, Clone)]
pub enum Sitting<'a> {
    /// A subject whose exam overlaps no other.
    Individual(IndividualSitting<'a>),
    /// Subjects sharing a time window and one resource pool.
    Colliding(CollidingSittingGroup<'a>),
    /// A nested schedule.
    Composite(SittingSchedule<'a>),
}

impl<'a> Sitting<'a> {
    /// Adds examinees enrolled in this node's subjects.
    pub fn add_examinees<I>(&mut self, examinees: I)
    where
        I: IntoIterator<Item = &'a Examinee>,
    {
        match self {
            Self::Individual(s) => s.add_examinees(examinees),
            Self::Colliding(g) => g.add_examinees(examinees),
            Self::Composite(c) => c.add_examinees(examinees),
        }
    }

    /// Adds classrooms to this node's pool.
    pub fn add_classrooms<I>(&mut self, classrooms: I)
    where
        I: IntoIterator<Item = &'a Classroom>,
    {
        match self {
            Self::Individual(s) => s.add_classrooms(classrooms),
            Self::Colliding(g) => g.add_classrooms(classrooms),
            Self::Composite(c) => c.add_classrooms(classrooms),
        }
    }

    /// Adds vigilants to this node's pool.
    pub fn add_vigilants<I>(&mut self, vigilants: I)
    where
        I: IntoIterator<Item = &'a Vigilant>,
    {
        match self {
            Self::Individual(s) => s.add_vigilants(vigilants),
            Self::Colliding(g) => g.add_vigilants(vigilants),
            Self::Composite(c) => c.add_vigilants(vigilants),
        }
    }

    /// Drops every classroom.
    pub fn remove_classrooms(&mut self) {
        match self {
            Self::Individual(s) => s.remove_classrooms(),
            Self::Colliding(g) => g.remove_classrooms(),
            Self::Composite(c) => c.remove_classrooms(),
        }
    }

    /// Drops every vigilant.
    pub fn remove_vigilants(&mut self) {
        match self {
            Self::Individual(s) => s.remove_vigilants(),
            Self::Colliding(g) => g.remove_vigilants(),
            Self::Composite(c) => c.remove_vigilants(),
        }
    }

    /// Assigns this node, returning every problem found.
    pub fn do_assignment(&mut self) -> Vec<AssignmentError> {
        match self {
            Self::Individual(s) => s.do_assignment(),
            Self::Colliding(g) => g.do_assignment(),
            Self::Composite(c) => c.do_assignment(),
        }
    }

    /// Marks this node as deliberately left empty.
    pub fn use_empty_assignment(&mut self) {
        match self {
            Self::Individual(s) => s.use_empty_assignment(),
            Self::Colliding(g) => g.use_empty_assignment(),
            Self::Composite(c) => c.use_empty_assignment(),
        }
    }

    /// Summed classroom capacities.
    pub fn capacities(&self) -> Capacities {
        match self {
            Self::Individual(s) => s.capacities(),
            Self::Colliding(g) => g.capacities(),
            Self::Composite(c) => c.capacities(),
        }
    }

    /// Worst capacity status under this node.
    pub fn has_enough_capacity(&self) -> CapacityStatus {
        match self {
            Self::Individual(s) => s.has_enough_capacity(),
            Self::Colliding(g) => g.has_enough_capacity(),
            Self::Composite(c) => c.has_enough_capacity(),
        }
    }

    /// Distributions of every subject under this node, in order.
    pub fn distributions(&self) -> Result<Vec<&ExamDistribution<'a>>, DistributionError> {
        match self {
            Self::Individual(s) => Ok(vec![s.distribution()?]),
            Self::Colliding(g) => g.distributions(),
            Self::Composite(c) => c.distributions(),
        }
    }

    /// Subjects under this node, in order.
    pub fn subjects(&self) -> Vec<&'a Subject> {
        match self {
            Self::Individual(s) => vec![s.subject()],
            Self::Colliding(g) => g.subjects(),
            Self::Composite(c) => c.subjects(),
        }
    }

    /// Single-subject sittings under this node, in order.
    pub fn individuals(&self) -> Vec<&IndividualSitting<'a>> {
        match self {
            Self::Individual(s) => vec![s],
            Self::Colliding(g) => g.sittings().iter().collect(),
            Self::Composite(c) => c.individuals(),
        }
    }

    /// Short kind label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Individual(_) => "individual",
            Self::Colliding(_) => "colliding",
            Self::Composite(_) => "composite",
        }
    }
}

impl<'a> From<IndividualSitting<'a>> for Sitting<'a> {
    fn from(sitting: IndividualSitting<'a>) -> Self {
        Self::Individual(sitting)
    }
}

impl<'a> From<CollidingSittingGroup<'a>> for Sitting<'a> {
    fn from(group: CollidingSittingGroup<'a>) -> Self {
        Self::Colliding(group)
    }
}

impl<'a> From<SittingSchedule<'a>> for Sitting<'a> {
    fn from(schedule: SittingSchedule<'a>) -> Self {
        Self::Composite(schedule)
    }
}
