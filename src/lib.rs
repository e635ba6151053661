//! University registration
//!
//! Students, courses, prerequisites and enrollments held in memory, with a
//! whole-registry binary snapshot for persistence.

pub mod domain;
pub use domain::{
    Config, Course, CourseCode, Enrollment, Registry, RegistryError, Student, StudentId,
    StudentView,
};

/// Binary snapshots and the filesystem backed store.
pub mod storage;
pub use storage::{SnapshotError, Store, StoreError};
