// StudentView - a borrowed view of a student with their courses resolved.

use std::fmt;

use crate::domain::{Course, Student};

/// A borrowed view of a student, with their enrolled course codes resolved to
/// the courses held by the [`Registry`](crate::Registry).
///
/// Produced by [`Registry::student_view`](crate::Registry::student_view).
/// Its [`Display`](fmt::Display) implementation renders the student's full
/// course load.
#[derive(Debug, Clone)]
pub struct StudentView<'a> {
    /// The student.
    pub student: &'a Student,
    /// The courses the student is enrolled in, in code order.
    pub courses: Vec<&'a Course>,
}

impl fmt::Display for StudentView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - Course Load: ", self.student)?;

        if self.courses.is_empty() {
            return write!(f, "none");
        }

        for (i, course) in self.courses.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{course}")?;
        }
        Ok(())
    }
}
