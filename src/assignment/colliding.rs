//! Colliding-sittings allocator.
//!
//! Subjects whose exams overlap share one pool of classrooms and
//! vigilants. The group first splits that pool between its subjects,
//! then lets each subject's [`IndividualSitting`] seat its examinees.
//!
//! # Algorithm
//!
//! **Classrooms**: subjects in start order walk the classrooms in
//! priority order, each taking consecutive rooms until its examinees
//! fit in their exam capacity (at least one room each). If the rooms
//! run out, the walk is retried against total capacity.
//!
//! **Vigilants**: each subject first takes one specialist, which seeds
//! its ratio entry. The rest are spread over subjects by highest
//! examinee-to-vigilant ratio (ties: earlier subject). Teams are then
//! cut from the pool in (surname, name) order, passing over a subject's
//! own extra specialists so another subject can use them.

use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

use super::capacity::{Capacities, CapacityStatus};
use super::individual::IndividualSitting;
use super::ratio::{self, RatioEntry};
use crate::error::{AssignmentError, DistributionError};
use crate::models::{
    CapacityTier, Classroom, EntityId, ExamDistribution, Examinee, Subject, Vigilant,
};

/// Sittings of subjects that share a time window.
#[derive(Debug, Clone)]
pub struct CollidingSittingGroup<'a> {
    sittings: Vec<IndividualSitting<'a>>,
    available_classrooms: BTreeMap<EntityId, &'a Classroom>,
    available_vigilants: BTreeMap<EntityId, &'a Vigilant>,
}

impl<'a> CollidingSittingGroup<'a> {
    /// Groups the given sittings.
    pub fn new(sittings: Vec<IndividualSitting<'a>>) -> Self {
        Self {
            sittings,
            available_classrooms: BTreeMap::new(),
            available_vigilants: BTreeMap::new(),
        }
    }

    /// Creates one empty sitting per subject.
    pub fn from_subjects(subjects: impl IntoIterator<Item = &'a Subject>) -> Self {
        Self::new(subjects.into_iter().map(IndividualSitting::new).collect())
    }

    /// Member sittings in group order.
    pub fn sittings(&self) -> &[IndividualSitting<'a>] {
        &self.sittings
    }

    /// Subjects in group order.
    pub fn subjects(&self) -> Vec<&'a Subject> {
        self.sittings.iter().map(|s| s.subject()).collect()
    }

    /// Adds examinees to every member sitting.
    pub fn add_examinees<I>(&mut self, examinees: I)
    where
        I: IntoIterator<Item = &'a Examinee>,
    {
        let examinees: Vec<&'a Examinee> = examinees.into_iter().collect();
        for sitting in &mut self.sittings {
            sitting.add_examinees(examinees.iter().copied());
        }
    }

    /// Adds classrooms without a court location to the shared pool.
    pub fn add_classrooms<I>(&mut self, classrooms: I)
    where
        I: IntoIterator<Item = &'a Classroom>,
    {
        self.available_classrooms.extend(
            classrooms
                .into_iter()
                .filter(|c| c.is_assignable())
                .map(|c| (c.id, c)),
        );
        self.reset_distributions();
    }

    /// Adds member vigilants to the shared pool.
    pub fn add_vigilants<I>(&mut self, vigilants: I)
    where
        I: IntoIterator<Item = &'a Vigilant>,
    {
        self.available_vigilants.extend(
            vigilants
                .into_iter()
                .filter(|v| v.invigilates())
                .map(|v| (v.id, v)),
        );
        self.reset_distributions();
    }

    /// Empties the shared classroom pool and every member's classrooms.
    pub fn remove_classrooms(&mut self) {
        self.available_classrooms.clear();
        for sitting in &mut self.sittings {
            sitting.remove_classrooms();
        }
    }

    /// Empties the shared vigilant pool and every member's vigilants.
    pub fn remove_vigilants(&mut self) {
        self.available_vigilants.clear();
        for sitting in &mut self.sittings {
            sitting.remove_vigilants();
        }
    }

    fn reset_distributions(&mut self) {
        for sitting in &mut self.sittings {
            sitting.reset_distribution();
        }
    }

    /// Splits the shared pools between subjects, then assigns each one.
    ///
    /// If either split fails, its errors are returned and no member
    /// sitting is assigned.
    #[instrument(skip(self), fields(subjects = self.sittings.len()))]
    pub fn do_assignment(&mut self) -> Vec<AssignmentError> {
        for sitting in &mut self.sittings {
            sitting.remove_classrooms();
            sitting.remove_vigilants();
        }

        let order = self.start_order();
        let mut errors = Vec::new();
        let rooms = self
            .partition_classrooms(&order)
            .map_err(|err| errors.push(err))
            .ok();
        let teams = self
            .partition_vigilants(&order)
            .map_err(|err| errors.push(err))
            .ok();

        let (Some(rooms), Some(teams)) = (rooms, teams) else {
            warn!(errors = errors.len(), "colliding group could not be split");
            return errors;
        };

        for ((&i, rooms), team) in order.iter().zip(rooms).zip(teams) {
            debug!(
                subject = %self.sittings[i].subject().name,
                classrooms = rooms.len(),
                vigilants = team.len(),
                "colliding subject share"
            );
            self.sittings[i].add_classrooms(rooms);
            self.sittings[i].add_vigilants(team);
        }

        self.sittings
            .iter_mut()
            .flat_map(|sitting| sitting.do_assignment())
            .collect()
    }

    /// Marks every member sitting as deliberately left empty.
    pub fn use_empty_assignment(&mut self) {
        for sitting in &mut self.sittings {
            sitting.use_empty_assignment();
        }
    }

    /// Member distributions in group order.
    pub fn distributions(&self) -> Result<Vec<&ExamDistribution<'a>>, DistributionError> {
        self.sittings.iter().map(|s| s.distribution()).collect()
    }

    /// Summed capacities of the member sittings.
    pub fn capacities(&self) -> Capacities {
        self.sittings.iter().map(|s| s.capacities()).sum()
    }

    /// Worst capacity status across member sittings.
    pub fn has_enough_capacity(&self) -> CapacityStatus {
        CapacityStatus::worst(self.sittings.iter().map(|s| s.has_enough_capacity()))
    }

    /// Member indices by exam start (then subject id).
    fn start_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.sittings.len()).collect();
        order.sort_by_key(|&i| {
            let subject = self.sittings[i].subject();
            (subject.exam_start_ms, subject.id)
        });
        order
    }

    fn not_enough_classrooms(&self, order: &[usize]) -> AssignmentError {
        AssignmentError::NotEnoughClassrooms {
            subjects: order
                .iter()
                .map(|&i| self.sittings[i].subject().clone())
                .collect(),
        }
    }

    fn partition_classrooms(
        &self,
        order: &[usize],
    ) -> Result<Vec<Vec<&'a Classroom>>, AssignmentError> {
        if self.available_classrooms.len() < order.len() {
            return Err(self.not_enough_classrooms(order));
        }

        let mut classrooms: Vec<&'a Classroom> =
            self.available_classrooms.values().copied().collect();
        classrooms.sort_by_key(|c| c.priority);
        let needs: Vec<usize> = order
            .iter()
            .map(|&i| self.sittings[i].examinee_count())
            .collect();

        [CapacityTier::Exam, CapacityTier::Total]
            .into_iter()
            .find_map(|tier| pack_classrooms(&classrooms, &needs, tier))
            .ok_or_else(|| self.not_enough_classrooms(order))
    }

    /// Specialist first, then the rest by ratio.
    fn partition_vigilants(
        &self,
        order: &[usize],
    ) -> Result<Vec<Vec<&'a Vigilant>>, AssignmentError> {
        let mut pool: Vec<&'a Vigilant> = self.available_vigilants.values().copied().collect();
        pool.sort_by(|a, b| a.name_key().cmp(&b.name_key()));

        let mut teams = Vec::with_capacity(order.len());
        for &i in order {
            let subject = self.sittings[i].subject();
            let Some(position) = pool.iter().position(|v| v.is_specialist_for(subject.id)) else {
                return Err(AssignmentError::MissingSpecialist {
                    subject: subject.clone(),
                });
            };
            teams.push(vec![pool.remove(position)]);
        }

        let mut entries: Vec<RatioEntry> = order
            .iter()
            .enumerate()
            .map(|(rank, &i)| RatioEntry::seeded(self.sittings[i].examinee_count(), rank as u64))
            .collect();
        ratio::distribute(&mut entries, order.len() + pool.len());

        let mut missing = Vec::with_capacity(teams.len());
        for ((team, entry), &i) in teams.iter_mut().zip(&entries).zip(order) {
            let subject_id = self.sittings[i].subject().id;
            let mut wanted = entry.vigilants - 1;
            pool.retain(|&v| {
                if wanted > 0 && !v.is_specialist_for(subject_id) {
                    team.push(v);
                    wanted -= 1;
                    false
                } else {
                    true
                }
            });
            missing.push(wanted);
        }

        // Specialists no other subject could take stay with their own team.
        let mut rest = pool.into_iter();
        for (team, wanted) in teams.iter_mut().zip(missing) {
            team.extend(rest.by_ref().take(wanted));
        }
        Ok(teams)
    }
}

/// Consecutive classroom runs covering each need in turn, or `None` if
/// the classrooms run out first.
fn pack_classrooms<'a>(
    classrooms: &[&'a Classroom],
    needs: &[usize],
    tier: CapacityTier,
) -> Option<Vec<Vec<&'a Classroom>>> {
    let mut rest = classrooms.iter().copied();
    needs
        .iter()
        .map(|&need| {
            let mut taken = Vec::new();
            let mut seats = 0usize;
            while taken.is_empty() || seats < need {
                let classroom = rest.next()?;
                seats += classroom.capacity(tier) as usize;
                taken.push(classroom);
            }
            Some(taken)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IdAllocator, VigilantRole};
    use std::collections::HashSet;

    const HOUR: i64 = 3_600_000;

    struct Fixture {
        subjects: Vec<Subject>,
        ids: IdAllocator,
    }

    impl Fixture {
        fn new(count: u32) -> Self {
            let subjects = (0..count)
                .map(|i| {
                    Subject::new(EntityId(i), format!("S{i}"))
                        .with_exam(9 * HOUR + i64::from(i) * HOUR, 2 * HOUR)
                })
                .collect();
            Self {
                subjects,
                ids: IdAllocator::starting_at(100),
            }
        }

        fn examinees(&mut self, subject: u32, n: usize) -> Vec<Examinee> {
            (0..n)
                .map(|_| {
                    let id = self.ids.next_id();
                    Examinee::new(id, "E", format!("{:04}", id.value()))
                        .with_subject(EntityId(subject))
                })
                .collect()
        }

        fn vigilant(&mut self, specialty: Option<u32>) -> Vigilant {
            let id = self.ids.next_id();
            let v = Vigilant::member(id, "V", format!("{:04}", id.value()));
            match specialty {
                Some(s) => v.with_specialty(EntityId(s)),
                None => v,
            }
        }

        fn classroom(&mut self, priority: u32, total: u32, exam: u32) -> Classroom {
            let id = self.ids.next_id();
            Classroom::new(id, format!("C{id}"), total)
                .with_priority(priority)
                .with_capacities(total, exam)
        }
    }

    #[test]
    fn test_missing_specialist() {
        let mut f = Fixture::new(2);
        let mut examinees = f.examinees(0, 3);
        examinees.extend(f.examinees(1, 3));
        let rooms = vec![f.classroom(1, 10, 10), f.classroom(2, 10, 10)];
        let vigilants = vec![f.vigilant(Some(0)), f.vigilant(None), f.vigilant(None)];

        let mut group = CollidingSittingGroup::from_subjects(&f.subjects);
        group.add_examinees(&examinees);
        group.add_classrooms(&rooms);
        group.add_vigilants(&vigilants);

        assert_eq!(
            group.do_assignment(),
            vec![AssignmentError::MissingSpecialist {
                subject: f.subjects[1].clone()
            }]
        );
        assert!(group.sittings().iter().all(|s| s.distribution().is_err()));
        assert_eq!(group.distributions().unwrap_err(), DistributionError::AssignmentNotDone);
    }

    #[test]
    fn test_fewer_classrooms_than_subjects() {
        let mut f = Fixture::new(2);
        let mut examinees = f.examinees(0, 1);
        examinees.extend(f.examinees(1, 1));
        let rooms = vec![f.classroom(1, 10, 10)];
        let vigilants = vec![f.vigilant(Some(0)), f.vigilant(Some(1))];

        let mut group = CollidingSittingGroup::from_subjects(&f.subjects);
        group.add_examinees(&examinees);
        group.add_classrooms(&rooms);
        group.add_vigilants(&vigilants);

        assert_eq!(
            group.do_assignment(),
            vec![AssignmentError::NotEnoughClassrooms {
                subjects: f.subjects.clone()
            }]
        );
    }

    #[test]
    fn test_both_partitions_report() {
        let mut f = Fixture::new(2);
        let rooms = vec![f.classroom(1, 10, 10)];
        let vigilants = vec![f.vigilant(None)];

        let mut group = CollidingSittingGroup::from_subjects(&f.subjects);
        group.add_classrooms(&rooms);
        group.add_vigilants(&vigilants);

        let kinds: Vec<_> = group.do_assignment().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["not-enough-classrooms", "missing-specialist"]);
    }

    #[test]
    fn test_classroom_partition_falls_back_to_total() {
        let mut f = Fixture::new(2);
        let mut examinees = f.examinees(0, 5);
        examinees.extend(f.examinees(1, 5));
        // Exam capacity 2 each: 4 rooms hold 8 < 10, but total 6 each covers.
        let rooms: Vec<_> = (1..=4).map(|p| f.classroom(p, 6, 2)).collect();
        let vigilants = vec![
            f.vigilant(Some(0)),
            f.vigilant(Some(1)),
            f.vigilant(None),
            f.vigilant(None),
        ];

        let mut group = CollidingSittingGroup::from_subjects(&f.subjects);
        group.add_examinees(&examinees);
        group.add_classrooms(&rooms);
        group.add_vigilants(&vigilants);

        assert!(group.do_assignment().is_empty());
        let first = group.sittings()[0].classrooms();
        let second = group.sittings()[1].classrooms();
        assert_eq!(first.iter().map(|c| c.id).collect::<Vec<_>>(), vec![rooms[0].id]);
        assert_eq!(second.iter().map(|c| c.id).collect::<Vec<_>>(), vec![rooms[1].id]);
    }

    #[test]
    fn test_exam_capacity_packing() {
        let mut f = Fixture::new(2);
        let mut examinees = f.examinees(0, 6);
        examinees.extend(f.examinees(1, 2));
        let rooms = vec![
            f.classroom(1, 10, 4),
            f.classroom(2, 10, 4),
            f.classroom(3, 10, 4),
            f.classroom(4, 10, 4),
        ];
        let vigilants: Vec<_> = [Some(0), Some(1), None, None, None, None]
            .into_iter()
            .map(|s| f.vigilant(s))
            .collect();

        let mut group = CollidingSittingGroup::from_subjects(&f.subjects);
        group.add_examinees(&examinees);
        group.add_classrooms(&rooms);
        group.add_vigilants(&vigilants);

        assert!(group.do_assignment().is_empty());
        let ids = |i: usize| -> Vec<EntityId> {
            group.sittings()[i].classrooms().iter().map(|c| c.id).collect()
        };
        assert_eq!(ids(0), vec![rooms[0].id, rooms[1].id]);
        assert_eq!(ids(1), vec![rooms[2].id]);

        // Seeds 6/1 and 2/1: four more vigilants take S0 to 4 (1.5),
        // S1 to 2 (1.0). Teams: S0 specialist + 3, S1 specialist + 1.
        assert_eq!(group.sittings()[0].specialists().len(), 1);
        assert_eq!(group.sittings()[0].vigilants().len(), 3);
        assert_eq!(group.sittings()[1].specialists().len(), 1);
        assert_eq!(group.sittings()[1].vigilants().len(), 1);

        let d = group.distributions().unwrap();
        assert_eq!(d.len(), 2);
        assert_eq!(d[0].examinee_count(), 6);
        assert_eq!(d[1].examinee_count(), 2);
    }

    #[test]
    fn test_zero_examinee_subject_takes_a_classroom() {
        let mut f = Fixture::new(2);
        let examinees = f.examinees(0, 3);
        let rooms = vec![f.classroom(1, 10, 10), f.classroom(2, 10, 10)];
        let vigilants: Vec<_> = [Some(0), Some(1), None, None]
            .into_iter()
            .map(|s| f.vigilant(s))
            .collect();

        let mut group = CollidingSittingGroup::from_subjects(&f.subjects);
        group.add_examinees(&examinees);
        group.add_classrooms(&rooms);
        group.add_vigilants(&vigilants);

        // Both generics go to S0 (3/1 beats 0/1), so S1's room is unstaffed.
        assert_eq!(
            group.do_assignment(),
            vec![AssignmentError::NotEnoughVigilants {
                subject: f.subjects[1].clone()
            }]
        );
        assert_eq!(group.sittings()[1].classroom_count(), 1);
        assert_eq!(group.sittings()[0].vigilants().len(), 2);
        assert!(group.sittings()[1].vigilants().is_empty());
    }

    #[test]
    fn test_vigilants_follow_examinee_ratio_not_classrooms() {
        let mut f = Fixture::new(2);
        let mut examinees = f.examinees(0, 25);
        examinees.extend(f.examinees(1, 20));
        let rooms = vec![
            f.classroom(1, 10, 10),
            f.classroom(2, 10, 10),
            f.classroom(3, 10, 10),
            f.classroom(4, 20, 20),
        ];
        let vigilants: Vec<_> = [Some(0), Some(1), None, None, None, None]
            .into_iter()
            .map(|s| f.vigilant(s))
            .collect();

        let mut group = CollidingSittingGroup::from_subjects(&f.subjects);
        group.add_examinees(&examinees);
        group.add_classrooms(&rooms);
        group.add_vigilants(&vigilants);

        // 25/1 > 20/1, 20/1 > 12.5, 12.5 > 10, 10 > 8.3: two generics each.
        assert_eq!(
            group.do_assignment(),
            vec![AssignmentError::NotEnoughVigilants {
                subject: f.subjects[0].clone()
            }]
        );
        assert_eq!(group.sittings()[0].classroom_count(), 3);
        assert_eq!(group.sittings()[0].vigilants().len(), 2);
        assert_eq!(group.sittings()[1].classroom_count(), 1);
        assert_eq!(group.sittings()[1].vigilants().len(), 2);
        assert!(group.sittings()[1].distribution().is_ok());
    }

    #[test]
    fn test_extra_specialist_goes_to_another_subject() {
        let mut f = Fixture::new(2);
        let mut examinees = f.examinees(0, 2);
        examinees.extend(f.examinees(1, 2));
        let rooms = vec![f.classroom(1, 10, 10), f.classroom(2, 10, 10)];
        // Pool in name order: two S0 specialists, one S1 specialist, one generic.
        let vigilants: Vec<_> = [Some(0), Some(0), Some(1), None]
            .into_iter()
            .map(|s| f.vigilant(s))
            .collect();

        let mut group = CollidingSittingGroup::from_subjects(&f.subjects);
        group.add_examinees(&examinees);
        group.add_classrooms(&rooms);
        group.add_vigilants(&vigilants);

        assert!(group.do_assignment().is_empty());
        let staff = |i: usize| -> Vec<EntityId> {
            group.sittings()[i].vigilants().iter().map(|v| v.id).collect()
        };
        assert_eq!(staff(0), vec![vigilants[3].id]);
        assert_eq!(staff(1), vec![vigilants[1].id]);
        assert_eq!(group.sittings()[0].specialists().len(), 1);
        assert_eq!(group.sittings()[1].specialists().len(), 1);
    }

    #[test]
    fn test_unplaceable_specialist_stays_with_its_subject() {
        let mut f = Fixture::new(2);
        let mut examinees = f.examinees(0, 1);
        examinees.extend(f.examinees(1, 4));
        let rooms = vec![f.classroom(1, 10, 10), f.classroom(2, 10, 10)];
        let vigilants: Vec<_> = [Some(0), Some(1), Some(1)]
            .into_iter()
            .map(|s| f.vigilant(s))
            .collect();

        let mut group = CollidingSittingGroup::from_subjects(&f.subjects);
        group.add_examinees(&examinees);
        group.add_classrooms(&rooms);
        group.add_vigilants(&vigilants);

        let errors = group.do_assignment();
        let kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["not-enough-vigilants", "not-enough-vigilants"]);
        assert_eq!(group.sittings()[1].specialists().len(), 2);
    }

    #[test]
    fn test_pools_filter_court_rooms_and_tribunal() {
        let mut f = Fixture::new(1);
        let court = f.classroom(1, 50, 50).with_court_location(1);
        let president = Vigilant::new(f.ids.next_id(), "P", "P", VigilantRole::President)
            .with_specialty(EntityId(0));

        let mut group = CollidingSittingGroup::from_subjects(&f.subjects);
        group.add_classrooms([&court]);
        group.add_vigilants([&president]);

        let kinds: Vec<_> = group.do_assignment().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["not-enough-classrooms", "missing-specialist"]);
    }

    #[test]
    fn test_shares_are_disjoint() {
        let mut f = Fixture::new(3);
        let mut examinees = Vec::new();
        for (subject, n) in [(0, 12), (1, 7), (2, 20)] {
            examinees.extend(f.examinees(subject, n));
        }
        let rooms: Vec<_> = (1..=6).map(|p| f.classroom(p, 12, 8)).collect();
        let mut vigilants: Vec<_> = (0..3).map(|s| f.vigilant(Some(s))).collect();
        vigilants.extend((0..9).map(|_| f.vigilant(None)));

        let mut group = CollidingSittingGroup::from_subjects(&f.subjects);
        group.add_examinees(&examinees);
        group.add_classrooms(&rooms);
        group.add_vigilants(&vigilants);

        assert!(group.do_assignment().is_empty());

        let mut rooms_seen = HashSet::new();
        let mut staff_seen = HashSet::new();
        for d in group.distributions().unwrap() {
            for allocation in &d.classrooms {
                assert!(rooms_seen.insert(allocation.classroom.id));
                for v in &allocation.vigilants {
                    assert!(staff_seen.insert(v.id));
                }
            }
            assert_eq!(d.specialists.len(), 1);
            assert!(staff_seen.insert(d.specialists[0].id));
        }
        assert_eq!(staff_seen.len(), vigilants.len());
    }

    #[test]
    fn test_capacity_aggregation() {
        let mut f = Fixture::new(2);
        let mut examinees = f.examinees(0, 4);
        examinees.extend(f.examinees(1, 4));
        let rooms = vec![f.classroom(1, 4, 4), f.classroom(2, 6, 2)];
        let vigilants: Vec<_> = [Some(0), Some(1), None, None]
            .into_iter()
            .map(|s| f.vigilant(s))
            .collect();

        let mut group = CollidingSittingGroup::from_subjects(&f.subjects);
        group.add_examinees(&examinees);
        group.add_classrooms(&rooms);
        group.add_vigilants(&vigilants);
        // Shares only exist after the split.
        assert_eq!(group.has_enough_capacity(), CapacityStatus::NotEnough);

        assert!(group.do_assignment().is_empty());
        assert_eq!(group.has_enough_capacity(), CapacityStatus::CouldUseMore);
        assert_eq!(
            group.capacities(),
            Capacities {
                total_capacity: 10,
                exam_capacity: 6
            }
        );
    }

    #[test]
    fn test_use_empty_assignment() {
        let f = Fixture::new(2);
        let mut group = CollidingSittingGroup::from_subjects(&f.subjects);
        group.use_empty_assignment();
        let d = group.distributions().unwrap();
        assert_eq!(d.len(), 2);
        assert!(d.iter().all(|d| d.is_empty()));
    }
}
