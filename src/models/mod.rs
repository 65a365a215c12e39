//! Exam assignment domain models.
//!
//! Provides the catalog entities the assignment engine reads and the
//! distribution it produces.
//!
//! # Domain Mappings
//!
//! | exam-sittings | Scheduling term |
//! |---------------|-----------------|
//! | Subject | Task with a fixed time window |
//! | Classroom | Capacitated primary resource |
//! | Vigilant | Human resource with skills (specialties) |
//! | Examinee | Demand unit bound to subjects |
//! | ExamDistribution | Schedule for one sitting |

mod classroom;
mod distribution;
mod examinee;
mod id;
mod subject;
mod vigilant;
mod window;

pub use classroom::{CapacityTier, Classroom};
pub use distribution::{ClassroomAllocation, ExamDistribution};
pub use examinee::Examinee;
pub use id::{EntityId, IdAllocator};
pub use subject::Subject;
pub use vigilant::{Vigilant, VigilantRole};
pub use window::ExamWindow;
