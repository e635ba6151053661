use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

use crate::domain::StudentId;

/// A validated course code, such as `CS101`.
///
/// Codes are non-empty and contain no whitespace. Surrounding whitespace is
/// trimmed on construction; case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CourseCode(NonEmptyString);

impl CourseCode {
    /// Creates a new `CourseCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCourseCodeError` if the string is empty after trimming
    /// or contains whitespace.
    pub fn new(s: String) -> Result<Self, InvalidCourseCodeError> {
        let trimmed = s.trim();
        if trimmed.chars().any(char::is_whitespace) {
            return Err(InvalidCourseCodeError(s));
        }

        let non_empty =
            NonEmptyString::new(trimmed.to_string()).map_err(|_| InvalidCourseCodeError(s))?;
        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for CourseCode {
    type Error = InvalidCourseCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for CourseCode {
    type Error = InvalidCourseCodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for CourseCode {
    type Err = InvalidCourseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for CourseCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for CourseCode {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid course code.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid course code '{0}': must be non-empty and contain no whitespace")]
pub struct InvalidCourseCodeError(String);

/// A course offered by a university.
///
/// Prerequisites are stored in the order they were added, without
/// duplicates. The roster lists enrolled students in enrollment order.
/// Both are managed by the [`Registry`](crate::Registry).
///
/// Equality considers the course code only.
#[derive(Debug, Clone)]
pub struct Course {
    name: String,
    code: CourseCode,
    prerequisites: Vec<CourseCode>,
    enrolled: Vec<StudentId>,
}

impl Course {
    /// Creates a course with no prerequisites and an empty roster.
    #[must_use]
    pub fn new(name: impl Into<String>, code: CourseCode) -> Self {
        Self {
            name: name.into(),
            code,
            prerequisites: Vec::new(),
            enrolled: Vec::new(),
        }
    }

    /// The course's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The course's unique code.
    #[must_use]
    pub const fn code(&self) -> &CourseCode {
        &self.code
    }

    /// The prerequisites of this course, in the order they were added.
    #[must_use]
    pub fn prerequisites(&self) -> &[CourseCode] {
        &self.prerequisites
    }

    /// The students currently enrolled, in enrollment order.
    #[must_use]
    pub fn enrolled_students(&self) -> &[StudentId] {
        &self.enrolled
    }

    /// Whether the given student is on the roster.
    #[must_use]
    pub fn has_student(&self, id: StudentId) -> bool {
        self.enrolled.contains(&id)
    }

    /// Whether the given course is a prerequisite of this one.
    #[must_use]
    pub fn has_prerequisite(&self, code: &CourseCode) -> bool {
        self.prerequisites.contains(code)
    }

    /// Append a student to the roster.
    ///
    /// Returns `false` if the student was already on it.
    pub(crate) fn add_student(&mut self, id: StudentId) -> bool {
        if self.has_student(id) {
            false
        } else {
            self.enrolled.push(id);
            true
        }
    }

    /// Remove a student from the roster.
    ///
    /// Returns `true` if the student was on it.
    pub(crate) fn remove_student(&mut self, id: StudentId) -> bool {
        if let Some(pos) = self.enrolled.iter().position(|s| *s == id) {
            self.enrolled.remove(pos);
            true
        } else {
            false
        }
    }

    pub(crate) fn clear_roster(&mut self) {
        self.enrolled.clear();
    }

    /// Append a prerequisite.
    ///
    /// Returns `false` if it was already listed.
    pub(crate) fn add_prerequisite(&mut self, code: CourseCode) -> bool {
        if self.has_prerequisite(&code) {
            false
        } else {
            self.prerequisites.push(code);
            true
        }
    }

    /// Remove a prerequisite.
    ///
    /// Returns `true` if it was listed.
    pub(crate) fn remove_prerequisite(&mut self, code: &CourseCode) -> bool {
        if let Some(pos) = self.prerequisites.iter().position(|p| p == code) {
            self.prerequisites.remove(pos);
            true
        } else {
            false
        }
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Course {}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}
