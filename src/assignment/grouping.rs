//! Collision grouping.
//!
//! # Algorithm
//! Subjects are sorted by exam start (then id). Walking that order, a
//! subject joins the current group iff it starts within the window of
//! the subject just before it; otherwise it opens a new group. Groups
//! therefore grow through chains of neighbouring overlaps: a subject is
//! compared with its predecessor only, not with the whole group.
//!
//! # Complexity
//! O(n log n) for grouping, O(n²) for pairwise collision listing.

use std::collections::BTreeMap;
use tracing::debug;

use super::colliding::CollidingSittingGroup;
use super::composite::SittingSchedule;
use super::individual::IndividualSitting;
use crate::error::AssignmentError;
use crate::models::{EntityId, ExamWindow, Examinee, Subject};

/// Pairs of subjects whose exams overlap.
pub type CollisionPairs<'a> = Vec<(&'a Subject, &'a Subject)>;

fn window_of(subject: &Subject) -> Result<ExamWindow, AssignmentError> {
    subject
        .exam_window()
        .ok_or_else(|| AssignmentError::MissingExamDate {
            subject: subject.clone(),
        })
}

/// Orders subjects by exam start and splits them into collision groups.
///
/// Empty input gives no groups. Fails on the first subject (in input
/// order) lacking a start time or duration.
pub fn order_and_group(subjects: &[Subject]) -> Result<Vec<Vec<&Subject>>, AssignmentError> {
    let mut timed = subjects
        .iter()
        .map(|s| window_of(s).map(|w| (w, s)))
        .collect::<Result<Vec<_>, _>>()?;
    timed.sort_by_key(|(w, s)| (w.start_ms, s.id));

    let mut groups: Vec<Vec<&Subject>> = Vec::new();
    let mut last: Option<ExamWindow> = None;
    for (window, subject) in timed {
        match (groups.last_mut(), last) {
            (Some(group), Some(previous)) if previous.contains(window.start_ms) => {
                group.push(subject);
            }
            _ => groups.push(vec![subject]),
        }
        last = Some(window);
    }

    debug!(
        subjects = subjects.len(),
        groups = groups.len(),
        "subjects grouped by collision"
    );
    Ok(groups)
}

/// Builds the sitting schedule for a list of subjects.
///
/// Single-subject groups become [`IndividualSitting`]s, larger ones
/// [`CollidingSittingGroup`]s. The result is always a schedule, even for
/// one group.
///
/// # Example
/// ```
/// use exam_sittings::assignment::group_by_collision;
/// use exam_sittings::models::{EntityId, Subject};
///
/// const HOUR: i64 = 3_600_000;
/// let subjects = vec![
///     Subject::new(EntityId(0), "Maths").with_exam(9 * HOUR, 2 * HOUR),
///     Subject::new(EntityId(1), "Physics").with_exam(10 * HOUR, 2 * HOUR),
///     Subject::new(EntityId(2), "History").with_exam(15 * HOUR, HOUR),
/// ];
/// let schedule = group_by_collision(&subjects).unwrap();
/// assert_eq!(schedule.len(), 2);
/// ```
pub fn group_by_collision(subjects: &[Subject]) -> Result<SittingSchedule<'_>, AssignmentError> {
    let mut schedule = SittingSchedule::default();
    for group in order_and_group(subjects)? {
        if group.len() == 1 {
            schedule.push(IndividualSitting::new(group[0]));
        } else {
            schedule.push(CollidingSittingGroup::from_subjects(group));
        }
    }
    Ok(schedule)
}

/// Subjects that cannot be grouped yet.
pub fn subjects_without_exam_date(subjects: &[Subject]) -> Vec<&Subject> {
    subjects.iter().filter(|s| !s.has_exam_date()).collect()
}

/// Every pair of colliding subjects, each pair once, ordered by id.
pub fn find_exam_date_collisions<'a, I>(subjects: I) -> Result<CollisionPairs<'a>, AssignmentError>
where
    I: IntoIterator<Item = &'a Subject>,
{
    let mut subjects: Vec<&'a Subject> = subjects.into_iter().collect();
    subjects.sort_by_key(|s| s.id);
    let windows = subjects
        .iter()
        .map(|s| window_of(s))
        .collect::<Result<Vec<_>, _>>()?;

    let mut pairs = Vec::new();
    for i in 0..subjects.len() {
        for j in i + 1..subjects.len() {
            if windows[i].overlaps(&windows[j]) {
                pairs.push((subjects[i], subjects[j]));
            }
        }
    }
    Ok(pairs)
}

/// Examinees enrolled in two subjects whose exams collide.
///
/// Subject ids missing from `subjects` are ignored.
pub fn find_examinee_collisions<'a>(
    examinees: &'a [Examinee],
    subjects: &'a [Subject],
) -> Result<Vec<(&'a Examinee, CollisionPairs<'a>)>, AssignmentError> {
    let by_id: BTreeMap<EntityId, &'a Subject> = subjects.iter().map(|s| (s.id, s)).collect();

    let mut found = Vec::new();
    for examinee in examinees {
        let enrolled = examinee
            .subject_ids
            .iter()
            .filter_map(|id| by_id.get(id).copied());
        let pairs = find_exam_date_collisions(enrolled)?;
        if !pairs.is_empty() {
            found.push((examinee, pairs));
        }
    }
    Ok(found)
}

/// Examinees of each subject, keyed by subject id.
///
/// Every subject gets an entry, even with no examinees. Enrolments in
/// unknown subjects are ignored.
pub fn group_examinees_by_subject<'a>(
    subjects: &[Subject],
    examinees: &'a [Examinee],
) -> BTreeMap<EntityId, Vec<&'a Examinee>> {
    let mut grouped: BTreeMap<EntityId, Vec<&'a Examinee>> =
        subjects.iter().map(|s| (s.id, Vec::new())).collect();
    for examinee in examinees {
        for id in &examinee.subject_ids {
            if let Some(list) = grouped.get_mut(id) {
                list.push(examinee);
            }
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::Sitting;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    const MINUTE: i64 = 60_000;
    const HOUR: i64 = 60 * MINUTE;

    fn subject(id: u32, start: i64, duration: i64) -> Subject {
        Subject::new(EntityId(id), format!("S{id}")).with_exam(start, duration)
    }

    fn ids(groups: &[Vec<&Subject>]) -> Vec<Vec<u32>> {
        groups
            .iter()
            .map(|g| g.iter().map(|s| s.id.value()).collect())
            .collect()
    }

    /// Six subjects on one day: three chained from noon, one alone at
    /// five, two starting together at half past seven.
    fn day() -> Vec<Subject> {
        vec![
            subject(0, 12 * HOUR, 2 * HOUR),
            subject(1, 19 * HOUR + 30 * MINUTE, 2 * HOUR),
            subject(2, 13 * HOUR, 2 * HOUR),
            subject(3, 14 * HOUR + 30 * MINUTE, 2 * HOUR),
            subject(4, 17 * HOUR, 2 * HOUR),
            subject(5, 19 * HOUR + 30 * MINUTE, 2 * HOUR),
        ]
    }

    #[test]
    fn test_groups_a_day() {
        let subjects = day();
        let groups = order_and_group(&subjects).unwrap();
        assert_eq!(ids(&groups), vec![vec![0, 2, 3], vec![4], vec![1, 5]]);
    }

    #[test]
    fn test_chain_groups_together() {
        let subjects = vec![
            subject(0, 9 * HOUR, 3 * HOUR),
            subject(1, 11 * HOUR, 2 * HOUR),
            subject(2, 12 * HOUR + 30 * MINUTE, 90 * MINUTE),
        ];
        let groups = order_and_group(&subjects).unwrap();
        assert_eq!(ids(&groups), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_group_follows_previous_subject() {
        // 2 overlaps the long exam 0 but not 1, the subject right before it.
        let subjects = vec![
            subject(0, 9 * HOUR, 8 * HOUR),
            subject(1, 10 * HOUR, HOUR),
            subject(2, 12 * HOUR, HOUR),
            subject(3, 18 * HOUR, HOUR),
        ];
        let groups = order_and_group(&subjects).unwrap();
        assert_eq!(ids(&groups), vec![vec![0, 1], vec![2], vec![3]]);
    }

    #[test]
    fn test_touching_windows_collide() {
        let subjects = vec![subject(0, 9 * HOUR, HOUR), subject(1, 10 * HOUR, HOUR)];
        let groups = order_and_group(&subjects).unwrap();
        assert_eq!(ids(&groups), vec![vec![0, 1]]);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let expected = ids(&order_and_group(&day()).unwrap());
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let mut shuffled = day();
            shuffled.shuffle(&mut rng);
            assert_eq!(ids(&order_and_group(&shuffled).unwrap()), expected);
        }
    }

    #[test]
    fn test_each_subject_joins_its_predecessor() {
        let mut rng = StdRng::seed_from_u64(7);
        let starts: Vec<i64> = (0..12).map(|i| i * 45 * MINUTE).collect();
        for _ in 0..20 {
            let mut subjects: Vec<Subject> = starts
                .iter()
                .enumerate()
                .map(|(i, &start)| subject(i as u32, start, (1 + (i as i64 % 3)) * 30 * MINUTE))
                .collect();
            subjects.shuffle(&mut rng);

            let groups = order_and_group(&subjects).unwrap();
            let ordered: Vec<&Subject> = groups.iter().flatten().copied().collect();
            let group_of = |id: EntityId| groups.iter().position(|g| g.iter().any(|s| s.id == id));
            for pair in ordered.windows(2) {
                let previous = pair[0].exam_window().unwrap();
                let next = pair[1].exam_window().unwrap();
                assert!(previous.start_ms <= next.start_ms);
                assert_eq!(
                    group_of(pair[0].id) == group_of(pair[1].id),
                    previous.contains(next.start_ms)
                );
            }
        }
    }

    #[test]
    fn test_missing_exam_date() {
        let subjects = vec![
            subject(0, 9 * HOUR, HOUR),
            Subject::new(EntityId(1), "Unscheduled"),
        ];
        assert_eq!(
            order_and_group(&subjects).unwrap_err(),
            AssignmentError::MissingExamDate {
                subject: subjects[1].clone()
            }
        );
        assert_eq!(subjects_without_exam_date(&subjects)[0].id, EntityId(1));
        assert!(group_by_collision(&subjects).is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(order_and_group(&[]).unwrap().is_empty());
        assert!(group_by_collision(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_group_by_collision_kinds() {
        let subjects = day();
        let schedule = group_by_collision(&subjects).unwrap();
        let kinds: Vec<_> = schedule.sittings().iter().map(Sitting::kind).collect();
        assert_eq!(kinds, vec!["colliding", "individual", "colliding"]);

        let single = vec![subject(0, 0, HOUR)];
        let schedule = group_by_collision(&single).unwrap();
        assert_eq!(schedule.len(), 1);
        assert!(matches!(schedule.sittings()[0], Sitting::Individual(_)));
    }

    #[test]
    fn test_find_exam_date_collisions() {
        let subjects = day();
        let pairs: Vec<_> = find_exam_date_collisions(&subjects)
            .unwrap()
            .iter()
            .map(|(a, b)| (a.id.value(), b.id.value()))
            .collect();
        assert_eq!(pairs, vec![(0, 2), (1, 5), (2, 3)]);
    }

    #[test]
    fn test_examinee_collisions() {
        let subjects = day();
        let examinees = vec![
            Examinee::new(EntityId(10), "A", "Clash").with_subjects([EntityId(0), EntityId(2)]),
            Examinee::new(EntityId(11), "B", "Fine").with_subjects([EntityId(0), EntityId(4)]),
            Examinee::new(EntityId(12), "C", "Ghost").with_subjects([EntityId(0), EntityId(99)]),
        ];
        let found = find_examinee_collisions(&examinees, &subjects).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0.id, EntityId(10));
        assert_eq!(found[0].1.len(), 1);
    }

    #[test]
    fn test_group_examinees_by_subject() {
        let subjects = day();
        let examinees = vec![
            Examinee::new(EntityId(10), "A", "A").with_subjects([EntityId(0), EntityId(2)]),
            Examinee::new(EntityId(11), "B", "B").with_subjects([EntityId(2), EntityId(99)]),
        ];
        let grouped = group_examinees_by_subject(&subjects, &examinees);
        assert_eq!(grouped.len(), 6);
        assert_eq!(grouped[&EntityId(0)].len(), 1);
        assert_eq!(grouped[&EntityId(2)].len(), 2);
        assert!(grouped[&EntityId(4)].is_empty());
    }
}
