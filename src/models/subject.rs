//! Subject model.
//!
//! A subject is examined in a single sitting with a scheduled start time
//! and duration. Subjects whose exam windows overlap must be seated
//! together in one colliding group.

use serde::{Deserialize, Serialize};

use super::{EntityId, ExamWindow};

/// A subject with an (optionally) scheduled exam.
///
/// # Time Representation
/// Times are in milliseconds relative to the consumer's epoch.
/// A subject can only be grouped into sittings once both
/// `exam_start_ms` and `exam_duration_ms` are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: EntityId,
    /// Human-readable name.
    pub name: String,
    /// Exam start (ms). `None` = not scheduled yet.
    pub exam_start_ms: Option<i64>,
    /// Exam duration (ms, positive). `None` = not scheduled yet.
    pub exam_duration_ms: Option<i64>,
}

impl Subject {
    /// Creates an unscheduled subject.
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            exam_start_ms: None,
            exam_duration_ms: None,
        }
    }

    /// Schedules the exam.
    pub fn with_exam(mut self, start_ms: i64, duration_ms: i64) -> Self {
        self.exam_start_ms = Some(start_ms);
        self.exam_duration_ms = Some(duration_ms);
        self
    }

    /// Sets the exam start. Any sitting grouping built earlier is stale.
    pub fn set_exam_start(&mut self, start_ms: Option<i64>) {
        self.exam_start_ms = start_ms;
    }

    /// Sets the exam duration. Any sitting grouping built earlier is stale.
    pub fn set_exam_duration(&mut self, duration_ms: Option<i64>) {
        self.exam_duration_ms = duration_ms;
    }

    /// Whether both start and duration are set.
    pub fn has_exam_date(&self) -> bool {
        self.exam_start_ms.is_some() && self.exam_duration_ms.is_some()
    }

    /// Exam finish time (start + duration).
    pub fn exam_finish_ms(&self) -> Option<i64> {
        self.exam_window().map(|w| w.finish_ms)
    }

    /// The closed exam window, if scheduled.
    pub fn exam_window(&self) -> Option<ExamWindow> {
        match (self.exam_start_ms, self.exam_duration_ms) {
            (Some(start), Some(duration)) => Some(ExamWindow::new(start, duration)),
            _ => None,
        }
    }

    /// Whether this subject's exam overlaps another's.
    ///
    /// Unscheduled subjects never collide.
    pub fn collides_with(&self, other: &Subject) -> bool {
        match (self.exam_window(), other.exam_window()) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    }
}
