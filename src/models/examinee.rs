//! Examinee model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::EntityId;

/// A person sitting one or more subject exams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Examinee {
    /// Unique examinee identifier.
    pub id: EntityId,
    /// Given name.
    pub name: String,
    /// Surname(s).
    pub surname: String,
    /// Subjects this examinee sits.
    #[serde(default)]
    pub subject_ids: BTreeSet<EntityId>,
}

impl Examinee {
    /// Creates an examinee enrolled in no subjects.
    pub fn new(id: EntityId, name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            surname: surname.into(),
            subject_ids: BTreeSet::new(),
        }
    }

    /// Enrolls in a subject.
    pub fn with_subject(mut self, subject_id: EntityId) -> Self {
        self.subject_ids.insert(subject_id);
        self
    }

    /// Enrolls in several subjects.
    pub fn with_subjects(mut self, subject_ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.subject_ids.extend(subject_ids);
        self
    }

    /// Whether this examinee sits the given subject.
    pub fn sits(&self, subject_id: EntityId) -> bool {
        self.subject_ids.contains(&subject_id)
    }

    /// Canonical ordering key: surname, then name, then id.
    ///
    /// The id tail keeps the order total so namesakes come out in the
    /// same order on every run.
    pub fn name_key(&self) -> (&str, &str, EntityId) {
        (&self.surname, &self.name, self.id)
    }
}
