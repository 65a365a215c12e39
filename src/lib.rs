//! Exam sitting assignment.
//!
//! Assigns examinees, classrooms and invigilators ("vigilants") to the
//! exam sittings of a set of subjects, respecting time collisions,
//! classroom capacities and specialist staffing.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Subject`, `Examinee`, `Vigilant`,
//!   `Classroom`, `ExamDistribution`, ids and exam windows
//! - **`assignment`**: Collision grouping, single-subject and colliding
//!   allocators, the sitting schedule, the end-to-end planner and reports
//! - **`error`**: Assignment and distribution errors, returned as values
//! - **`validation`**: Catalog integrity checks (duplicate IDs, unknown
//!   subjects, capacities, exam dates)
//! - **`logging`**: `tracing` subscriber setup for hosts and tests
//!
//! # Example
//!
//! ```
//! use exam_sittings::assignment::{AssignmentRequest, ExamPlanner};
//! use exam_sittings::models::{Classroom, EntityId, Examinee, Subject, Vigilant};
//!
//! let request = AssignmentRequest::new()
//!     .with_subjects(vec![Subject::new(EntityId(0), "Maths").with_exam(0, 7_200_000)])
//!     .with_examinees(
//!         (1..=3)
//!             .map(|i| Examinee::new(EntityId(i), "E", format!("S{i}")).with_subject(EntityId(0)))
//!             .collect(),
//!     )
//!     .with_classrooms(vec![Classroom::new(EntityId(0), "A1", 10)])
//!     .with_vigilants(vec![Vigilant::member(EntityId(0), "V", "W")]);
//!
//! let planned = ExamPlanner::new().plan(&request).unwrap();
//! let report = planned.report().unwrap();
//! assert_eq!(report.total_seated, 3);
//! ```

pub mod assignment;
pub mod error;
pub mod logging;
pub mod models;
pub mod validation;
