//! Examinee-to-vigilant ratio balancing.
//!
//! # Algorithm
//! Every entry starts with its seeded vigilant count. Each further
//! vigilant goes to the entry with the highest `examinees / vigilants`
//! ratio; ties go to the lower `rank`, and equal ranks keep the earlier
//! entry. Ratios are compared by cross-multiplication so no floating
//! point is involved.
//!
//! # Complexity
//! O(v * n) for v vigilants over n entries.

use std::cmp::Ordering;

/// One ratio-tracked bucket (a classroom or a subject).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RatioEntry {
    pub examinees: usize,
    pub vigilants: usize,
    pub rank: u64,
}

impl RatioEntry {
    /// An entry seeded with one vigilant.
    pub fn seeded(examinees: usize, rank: u64) -> Self {
        Self {
            examinees,
            vigilants: 1,
            rank,
        }
    }

    fn cmp_ratio(&self, other: &Self) -> Ordering {
        (self.examinees as u128 * other.vigilants as u128)
            .cmp(&(other.examinees as u128 * self.vigilants as u128))
    }
}

/// Index of the entry that should receive the next vigilant.
pub(crate) fn highest_ratio(entries: &[RatioEntry]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, entry) in entries.iter().enumerate() {
        best = match best {
            None => Some(i),
            Some(b) => match entry.cmp_ratio(&entries[b]) {
                Ordering::Greater => Some(i),
                Ordering::Equal if entry.rank < entries[b].rank => Some(i),
                _ => Some(b),
            },
        };
    }
    best
}

/// Hands out vigilants until the entries hold `total` between them.
///
/// Returns how many were handed out. Nothing is handed out when there
/// are no entries.
pub(crate) fn distribute(entries: &mut [RatioEntry], total: usize) -> usize {
    let mut assigned: usize = entries.iter().map(|e| e.vigilants).sum();
    let mut handed = 0;
    while assigned < total {
        let Some(i) = highest_ratio(entries) else {
            break;
        };
        entries[i].vigilants += 1;
        assigned += 1;
        handed += 1;
    }
    handed
}
