//! Vigilant (invigilator) model.
//!
//! Vigilants staff exam sittings. Only [`VigilantRole::Member`] vigilants
//! invigilate classrooms; presidents and secretaries run the tribunal and
//! are never placed in a room. A vigilant is a *specialist* for every
//! subject in their specialty set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::EntityId;

/// Role within the examining tribunal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VigilantRole {
    /// Tribunal president.
    President,
    /// Tribunal secretary.
    Secretary,
    /// Regular member; the only role that invigilates.
    Member,
}

/// An invigilator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vigilant {
    /// Unique vigilant identifier.
    pub id: EntityId,
    /// Given name.
    pub name: String,
    /// Surname(s).
    pub surname: String,
    /// Tribunal role.
    pub role: VigilantRole,
    /// Subjects this vigilant is qualified to supervise as specialist.
    #[serde(default)]
    pub specialty_ids: BTreeSet<EntityId>,
}

impl Vigilant {
    /// Creates a vigilant with the given role.
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        surname: impl Into<String>,
        role: VigilantRole,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            surname: surname.into(),
            role,
            specialty_ids: BTreeSet::new(),
        }
    }

    /// Creates a member vigilant.
    pub fn member(id: EntityId, name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self::new(id, name, surname, VigilantRole::Member)
    }

    /// Adds a specialty subject.
    pub fn with_specialty(mut self, subject_id: EntityId) -> Self {
        self.specialty_ids.insert(subject_id);
        self
    }

    /// Whether this vigilant takes part in invigilation.
    #[inline]
    pub fn invigilates(&self) -> bool {
        self.role == VigilantRole::Member
    }

    /// Whether this vigilant is a specialist for the subject.
    #[inline]
    pub fn is_specialist_for(&self, subject_id: EntityId) -> bool {
        self.specialty_ids.contains(&subject_id)
    }

    /// Canonical ordering key: surname, then name, then id.
    pub fn name_key(&self) -> (&str, &str, EntityId) {
        (&self.surname, &self.name, self.id)
    }
}
