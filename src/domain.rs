//! Domain models for university registration.
//!
//! This module contains the students, courses and the registry that keeps the
//! relationships between them consistent.

/// Student identity and course history.
pub mod student;
pub use student::{InvalidStudentIdError, Student, StudentId};

/// Course codes, prerequisites and rosters.
pub mod course;
pub use course::{Course, CourseCode, InvalidCourseCodeError};

/// The registry of students and courses.
pub mod registry;
pub use registry::{Enrollment, Error as RegistryError, Inconsistency, Registry};

mod student_view;
pub use student_view::StudentView;

mod config;
pub use config::Config;
