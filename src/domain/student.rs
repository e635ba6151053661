use std::{
    cmp::Ordering,
    collections::BTreeSet,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use crate::domain::CourseCode;

/// A validated student identifier.
///
/// Identifiers are integers in the range `0..=999_999`, and are always
/// displayed zero-padded to six digits (e.g. `000042`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudentId(u32);

impl StudentId {
    /// The largest valid identifier.
    pub const MAX: u32 = 999_999;

    /// Creates a new `StudentId`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStudentIdError::OutOfRange`] if the value is greater
    /// than [`StudentId::MAX`].
    pub const fn new(value: u32) -> Result<Self, InvalidStudentIdError> {
        if value > Self::MAX {
            Err(InvalidStudentIdError::OutOfRange(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for StudentId {
    type Error = InvalidStudentIdError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StudentId> for u32 {
    fn from(id: StudentId) -> Self {
        id.0
    }
}

impl FromStr for StudentId {
    type Err = InvalidStudentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed
            .parse::<u32>()
            .map_err(|_| InvalidStudentIdError::NotANumber(trimmed.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// Error returned when a value is not a valid student identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidStudentIdError {
    /// The value exceeds [`StudentId::MAX`].
    #[error("Invalid student ID {0}: must be between 0 and 999999")]
    OutOfRange(u32),
    /// The string could not be parsed as a non-negative integer.
    #[error("Invalid student ID '{0}': must be a non-negative integer")]
    NotANumber(String),
}

/// A student, identified by their [`StudentId`].
///
/// A student keeps two disjoint sets of course codes: the courses they are
/// currently enrolled in, and the courses they have completed. Completed
/// courses are what prerequisites are checked against.
///
/// Enrollments can only be created through the
/// [`Registry`](crate::Registry), which updates the course roster at the same
/// time. Completion history can be built up freely before a student is
/// registered.
///
/// Equality, ordering and hashing consider the identifier only.
#[derive(Debug, Clone)]
pub struct Student {
    name: String,
    id: StudentId,
    enrolled: BTreeSet<CourseCode>,
    completed: BTreeSet<CourseCode>,
}

impl Student {
    /// Creates a student with no enrollments and no completed courses.
    #[must_use]
    pub fn new(name: impl Into<String>, id: StudentId) -> Self {
        Self {
            name: name.into(),
            id,
            enrolled: BTreeSet::new(),
            completed: BTreeSet::new(),
        }
    }

    /// The student's full name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The student's identifier.
    #[must_use]
    pub const fn id(&self) -> StudentId {
        self.id
    }

    /// The courses the student is currently enrolled in, in code order.
    pub fn enrolled_courses(&self) -> impl Iterator<Item = &CourseCode> {
        self.enrolled.iter()
    }

    /// The courses the student has completed, in code order.
    pub fn completed_courses(&self) -> impl Iterator<Item = &CourseCode> {
        self.completed.iter()
    }

    /// The number of courses the student is currently enrolled in.
    #[must_use]
    pub fn course_load(&self) -> usize {
        self.enrolled.len()
    }

    /// Whether the student is currently enrolled in the given course.
    #[must_use]
    pub fn is_enrolled_in(&self, code: &CourseCode) -> bool {
        self.enrolled.contains(code)
    }

    /// Whether the student has completed the given course.
    #[must_use]
    pub fn has_completed(&self, code: &CourseCode) -> bool {
        self.completed.contains(code)
    }

    /// Record a completed course.
    ///
    /// The course is dropped from the enrolled set, since a course is never
    /// both in progress and completed.
    ///
    /// Returns `true` if the course was not already recorded as completed.
    pub fn complete(&mut self, code: CourseCode) -> bool {
        self.enrolled.remove(&code);
        self.completed.insert(code)
    }

    /// Add a course to the enrolled set.
    ///
    /// Returns `true` if the student was not already enrolled.
    pub(crate) fn enroll(&mut self, code: CourseCode) -> bool {
        self.enrolled.insert(code)
    }

    /// Remove a course from the enrolled set.
    ///
    /// Returns `true` if the student was enrolled.
    pub(crate) fn unenroll(&mut self, code: &CourseCode) -> bool {
        self.enrolled.remove(code)
    }

    pub(crate) fn clear_enrollments(&mut self) {
        self.enrolled.clear();
    }
}

impl PartialEq for Student {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Student {}

impl Hash for Student {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Student {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Student {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Student {} ({})", self.name, self.id)
    }
}
