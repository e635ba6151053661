//! In-memory registry of students and courses.
//!
//! Entities never hold references to one another. A [`Student`] records the
//! [`CourseCode`]s it is enrolled in or has completed, and a [`Course`]
//! records its prerequisite codes and the [`StudentId`]s on its roster. The
//! [`Registry`] owns both indexes and is the only place that creates or
//! removes an enrollment, always updating both sides in the same call.

use std::{collections::BTreeMap, fmt};

use nonempty::NonEmpty;
use petgraph::{algo::has_path_connecting, graphmap::DiGraphMap};
use thiserror::Error;
use tracing::instrument;

use crate::domain::{Course, CourseCode, Student, StudentId, StudentView};

/// A university: the index of all students (by ID) and all courses (by code).
///
/// Invariant: a student's enrolled set contains a course if and only if that
/// course's roster contains the student. Every mutating operation preserves
/// this.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    name: String,
    motto: String,

    /// Registered students, keyed by ID.
    students: BTreeMap<StudentId, Student>,

    /// Offered courses, keyed by code.
    courses: BTreeMap<CourseCode, Course>,

    /// Maximum number of concurrent enrollments per student, if capped.
    max_course_load: Option<usize>,
}

/// Errors that can occur when mutating a [`Registry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A student with the same ID is already registered.
    #[error("student {0} is already registered")]
    DuplicateStudent(StudentId),

    /// A course with the same code is already offered.
    #[error("course {0} is already offered")]
    DuplicateCourse(CourseCode),

    /// No student is registered with this ID.
    #[error("student {0} not found")]
    UnknownStudent(StudentId),

    /// No course is offered with this code.
    #[error("course {0} not found")]
    UnknownCourse(CourseCode),

    /// The student has not completed every prerequisite of the course.
    #[error(
        "student {student} cannot enroll in {course}: missing prerequisites {}",
        join_codes(.missing)
    )]
    PrerequisiteNotMet {
        /// The student attempting to enroll.
        student: StudentId,
        /// The course being enrolled in.
        course: CourseCode,
        /// Every prerequisite the student has not completed, in prerequisite
        /// order.
        missing: NonEmpty<CourseCode>,
    },

    /// The student is not enrolled in the course.
    #[error("student {student} is not enrolled in {course}")]
    NotEnrolled {
        /// The student.
        student: StudentId,
        /// The course.
        course: CourseCode,
    },

    /// The student has already completed the course.
    #[error("student {student} has already completed {course}")]
    AlreadyCompleted {
        /// The student.
        student: StudentId,
        /// The course.
        course: CourseCode,
    },

    /// Adding the prerequisite would make the prerequisite graph cyclic.
    #[error("prerequisite {course} ← {prerequisite} would create a cycle")]
    PrerequisiteCycle {
        /// The course gaining a prerequisite.
        course: CourseCode,
        /// The prerequisite being added.
        prerequisite: CourseCode,
    },

    /// The course does not list the given prerequisite.
    #[error("{prerequisite} is not a prerequisite of {course}")]
    NotAPrerequisite {
        /// The course.
        course: CourseCode,
        /// The course that is not one of its prerequisites.
        prerequisite: CourseCode,
    },

    /// The student is already enrolled in the maximum number of courses.
    #[error("student {student} is already enrolled in the maximum of {limit} courses")]
    CourseLoadExceeded {
        /// The student.
        student: StudentId,
        /// The configured maximum course load.
        limit: usize,
    },
}

fn join_codes(codes: &NonEmpty<CourseCode>) -> String {
    codes
        .iter()
        .map(CourseCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A violation of the registry's internal consistency rules.
///
/// These can only arise from a damaged snapshot or a bug; the public
/// operations never produce them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Inconsistency {
    /// A student is enrolled in a course whose roster does not list them.
    #[error("student {student} is enrolled in {course} but missing from its roster")]
    MissingFromRoster {
        /// The student.
        student: StudentId,
        /// The course.
        course: CourseCode,
    },
    /// A course roster lists a student who is not enrolled in it.
    #[error("{course} lists student {student} who is not enrolled in it")]
    MissingEnrollment {
        /// The student.
        student: StudentId,
        /// The course.
        course: CourseCode,
    },
    /// A course roster lists the same student more than once.
    #[error("{course} lists student {student} more than once")]
    DuplicateRosterEntry {
        /// The student.
        student: StudentId,
        /// The course.
        course: CourseCode,
    },
    /// A student is enrolled in a course that is not offered.
    #[error("student {student} is enrolled in unknown course {course}")]
    UnknownEnrolledCourse {
        /// The student.
        student: StudentId,
        /// The missing course.
        course: CourseCode,
    },
    /// A course roster lists a student who is not registered.
    #[error("{course} lists unknown student {student}")]
    UnknownRosterStudent {
        /// The missing student.
        student: StudentId,
        /// The course.
        course: CourseCode,
    },
    /// A course lists a prerequisite that is not offered.
    #[error("{course} lists unknown prerequisite {prerequisite}")]
    UnknownPrerequisite {
        /// The course.
        course: CourseCode,
        /// The missing prerequisite.
        prerequisite: CourseCode,
    },
}

/// Result of enrolling a student in a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    /// The enrolled student.
    pub student: StudentId,
    /// The course enrolled in.
    pub course: CourseCode,
    /// Whether the student was already enrolled prior to this call.
    pub already_enrolled: bool,
}

impl Registry {
    /// Creates an empty registry for the named university.
    #[must_use]
    pub fn new(name: impl Into<String>, motto: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            motto: motto.into(),
            ..Self::default()
        }
    }

    /// The university's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The university's motto.
    #[must_use]
    pub fn motto(&self) -> &str {
        &self.motto
    }

    /// The maximum number of concurrent enrollments per student, if capped.
    #[must_use]
    pub const fn max_course_load(&self) -> Option<usize> {
        self.max_course_load
    }

    /// Cap (or uncap, with `None`) the number of concurrent enrollments per
    /// student.
    ///
    /// Existing enrollments above the cap are kept; only new enrollments are
    /// refused.
    pub const fn set_max_course_load(&mut self, limit: Option<usize>) {
        self.max_course_load = limit;
    }

    /// Register a student.
    ///
    /// Any enrollments carried by the value (for example a student cloned
    /// from another registry) are discarded, since the courses here do not
    /// list them. Completed courses are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateStudent`] if the ID is already registered.
    /// The registry is unchanged in that case.
    #[instrument(skip(self, student), fields(id = %student.id()))]
    pub fn add_student(&mut self, mut student: Student) -> Result<(), Error> {
        let id = student.id();
        if self.students.contains_key(&id) {
            return Err(Error::DuplicateStudent(id));
        }

        student.clear_enrollments();
        self.students.insert(id, student);
        Ok(())
    }

    /// Register a new student from a name and ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateStudent`] if the ID is already registered.
    pub fn register_student(
        &mut self,
        name: impl Into<String>,
        id: StudentId,
    ) -> Result<(), Error> {
        self.add_student(Student::new(name, id))
    }

    /// Offer a course.
    ///
    /// The course's roster is cleared. Any prerequisites it carries must
    /// already be offered.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateCourse`] if the code is already offered
    /// - [`Error::UnknownCourse`] if a listed prerequisite is not offered
    /// - [`Error::PrerequisiteCycle`] if the course lists itself
    #[instrument(skip(self, course), fields(code = %course.code()))]
    pub fn add_course(&mut self, mut course: Course) -> Result<(), Error> {
        let code = course.code().clone();
        if self.courses.contains_key(&code) {
            return Err(Error::DuplicateCourse(code));
        }

        for prerequisite in course.prerequisites() {
            if *prerequisite == code {
                return Err(Error::PrerequisiteCycle {
                    course: code,
                    prerequisite: prerequisite.clone(),
                });
            }
            if !self.courses.contains_key(prerequisite) {
                return Err(Error::UnknownCourse(prerequisite.clone()));
            }
        }

        course.clear_roster();
        self.courses.insert(code, course);
        Ok(())
    }

    /// Offer a new course from a name and code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCourse`] if the code is already offered.
    pub fn offer_course(&mut self, name: impl Into<String>, code: CourseCode) -> Result<(), Error> {
        self.add_course(Course::new(name, code))
    }

    /// Add `prerequisite` to the prerequisites of `course`.
    ///
    /// Returns `Ok(false)` if it was already listed, in which case nothing
    /// changes.
    ///
    /// Students already enrolled in `course` are not re-checked.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownCourse`] if either code is not offered
    /// - [`Error::PrerequisiteCycle`] if `course` would (transitively) become
    ///   a prerequisite of itself
    #[instrument(skip(self))]
    pub fn add_prerequisite(
        &mut self,
        course: &CourseCode,
        prerequisite: &CourseCode,
    ) -> Result<bool, Error> {
        let target = self
            .courses
            .get(course)
            .ok_or_else(|| Error::UnknownCourse(course.clone()))?;
        if !self.courses.contains_key(prerequisite) {
            return Err(Error::UnknownCourse(prerequisite.clone()));
        }

        if target.has_prerequisite(prerequisite) {
            return Ok(false);
        }

        if course == prerequisite || self.requires(prerequisite, course) {
            return Err(Error::PrerequisiteCycle {
                course: course.clone(),
                prerequisite: prerequisite.clone(),
            });
        }

        let target = self
            .courses
            .get_mut(course)
            .ok_or_else(|| Error::UnknownCourse(course.clone()))?;
        Ok(target.add_prerequisite(prerequisite.clone()))
    }

    /// Remove `prerequisite` from the prerequisites of `course`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownCourse`] if `course` is not offered
    /// - [`Error::NotAPrerequisite`] if it is not listed
    pub fn remove_prerequisite(
        &mut self,
        course: &CourseCode,
        prerequisite: &CourseCode,
    ) -> Result<(), Error> {
        let target = self
            .courses
            .get_mut(course)
            .ok_or_else(|| Error::UnknownCourse(course.clone()))?;

        if target.remove_prerequisite(prerequisite) {
            Ok(())
        } else {
            Err(Error::NotAPrerequisite {
                course: course.clone(),
                prerequisite: prerequisite.clone(),
            })
        }
    }

    /// Enroll a student in a course.
    ///
    /// The student must have completed every prerequisite of the course.
    /// Current enrollments do not count. On success the course is added to
    /// the student's enrolled set and the student to the course's roster.
    ///
    /// Enrolling a student who is already enrolled succeeds without changing
    /// anything, and reports [`Enrollment::already_enrolled`].
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownStudent`] or [`Error::UnknownCourse`] if either key
    ///   is not registered
    /// - [`Error::AlreadyCompleted`] if the student has completed the course
    /// - [`Error::PrerequisiteNotMet`] listing every missing prerequisite
    /// - [`Error::CourseLoadExceeded`] if a maximum course load is set and
    ///   the student has reached it
    #[instrument(skip(self))]
    pub fn enroll(&mut self, id: StudentId, code: &CourseCode) -> Result<Enrollment, Error> {
        let student = self
            .students
            .get_mut(&id)
            .ok_or(Error::UnknownStudent(id))?;
        let course = self
            .courses
            .get_mut(code)
            .ok_or_else(|| Error::UnknownCourse(code.clone()))?;

        if student.is_enrolled_in(code) {
            return Ok(Enrollment {
                student: id,
                course: code.clone(),
                already_enrolled: true,
            });
        }

        if student.has_completed(code) {
            return Err(Error::AlreadyCompleted {
                student: id,
                course: code.clone(),
            });
        }

        let missing: Vec<CourseCode> = course
            .prerequisites()
            .iter()
            .filter(|prerequisite| !student.has_completed(prerequisite))
            .cloned()
            .collect();

        if let Some(missing) = NonEmpty::from_vec(missing) {
            return Err(Error::PrerequisiteNotMet {
                student: id,
                course: code.clone(),
                missing,
            });
        }

        if let Some(limit) = self.max_course_load {
            if student.course_load() >= limit {
                return Err(Error::CourseLoadExceeded { student: id, limit });
            }
        }

        student.enroll(code.clone());
        course.add_student(id);
        tracing::debug!("enrolled {id} in {code}");

        Ok(Enrollment {
            student: id,
            course: code.clone(),
            already_enrolled: false,
        })
    }

    /// Remove a student from a course they are enrolled in.
    ///
    /// Both the student's enrolled set and the course's roster are updated.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownStudent`] or [`Error::UnknownCourse`] if either key
    ///   is not registered
    /// - [`Error::NotEnrolled`] if the student is not enrolled in the course
    #[instrument(skip(self))]
    pub fn unenroll(&mut self, id: StudentId, code: &CourseCode) -> Result<(), Error> {
        let student = self
            .students
            .get_mut(&id)
            .ok_or(Error::UnknownStudent(id))?;
        let course = self
            .courses
            .get_mut(code)
            .ok_or_else(|| Error::UnknownCourse(code.clone()))?;

        if !student.unenroll(code) {
            return Err(Error::NotEnrolled {
                student: id,
                course: code.clone(),
            });
        }
        course.remove_student(id);
        tracing::debug!("unenrolled {id} from {code}");

        Ok(())
    }

    /// Record that a student has completed a course.
    ///
    /// If the student is currently enrolled in the course, the enrollment is
    /// dropped on both sides.
    ///
    /// Returns `true` if the completion was not already recorded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStudent`] or [`Error::UnknownCourse`] if either
    /// key is not registered.
    #[instrument(skip(self))]
    pub fn complete_course(&mut self, id: StudentId, code: &CourseCode) -> Result<bool, Error> {
        let student = self
            .students
            .get_mut(&id)
            .ok_or(Error::UnknownStudent(id))?;
        let course = self
            .courses
            .get_mut(code)
            .ok_or_else(|| Error::UnknownCourse(code.clone()))?;

        if student.is_enrolled_in(code) {
            course.remove_student(id);
        }
        Ok(student.complete(code.clone()))
    }

    /// Remove a student from the registry.
    ///
    /// The student is removed from the roster of every course they are
    /// enrolled in. The returned value has no enrollments but keeps its
    /// completed courses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStudent`] if the ID is not registered.
    #[instrument(skip(self))]
    pub fn remove_student(&mut self, id: StudentId) -> Result<Student, Error> {
        let mut student = self
            .students
            .remove(&id)
            .ok_or(Error::UnknownStudent(id))?;

        for code in student.enrolled_courses() {
            if let Some(course) = self.courses.get_mut(code) {
                course.remove_student(id);
                tracing::debug!("removed {id} from the roster of {code}");
            }
        }
        student.clear_enrollments();

        Ok(student)
    }

    /// Remove a course from the registry.
    ///
    /// The course is dropped from the enrolled set of every student on its
    /// roster, and from the prerequisites of every other course. Completed
    /// course history is left untouched. The returned value has an empty
    /// roster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCourse`] if the code is not offered.
    #[instrument(skip(self))]
    pub fn remove_course(&mut self, code: &CourseCode) -> Result<Course, Error> {
        let mut course = self
            .courses
            .remove(code)
            .ok_or_else(|| Error::UnknownCourse(code.clone()))?;

        for id in course.enrolled_students() {
            if let Some(student) = self.students.get_mut(id) {
                student.unenroll(code);
                tracing::debug!("dropped {code} from the course load of {id}");
            }
        }

        for other in self.courses.values_mut() {
            if other.remove_prerequisite(code) {
                tracing::debug!("dropped {code} from the prerequisites of {}", other.code());
            }
        }
        course.clear_roster();

        Ok(course)
    }

    /// Looks up a student by ID.
    #[must_use]
    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.get(&id)
    }

    /// Looks up a course by code.
    #[must_use]
    pub fn course(&self, code: &CourseCode) -> Option<&Course> {
        self.courses.get(code)
    }

    /// Returns a view of a student with their enrolled courses resolved.
    #[must_use]
    pub fn student_view(&self, id: StudentId) -> Option<StudentView<'_>> {
        let student = self.students.get(&id)?;
        let courses = student
            .enrolled_courses()
            .filter_map(|code| self.courses.get(code))
            .collect();
        Some(StudentView { student, courses })
    }

    /// Returns an iterator over all students, in ID order.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    /// Returns an iterator over all courses, in code order.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    /// The number of registered students.
    #[must_use]
    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// The number of offered courses.
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Verify that enrollments agree on both sides and that every
    /// prerequisite is offered.
    ///
    /// # Errors
    ///
    /// Returns the first [`Inconsistency`] found.
    pub fn check_consistency(&self) -> Result<(), Inconsistency> {
        for student in self.students.values() {
            for code in student.enrolled_courses() {
                match self.courses.get(code) {
                    None => {
                        return Err(Inconsistency::UnknownEnrolledCourse {
                            student: student.id(),
                            course: code.clone(),
                        });
                    }
                    Some(course) if !course.has_student(student.id()) => {
                        return Err(Inconsistency::MissingFromRoster {
                            student: student.id(),
                            course: code.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        for course in self.courses.values() {
            let roster = course.enrolled_students();
            for (index, id) in roster.iter().enumerate() {
                if roster[..index].contains(id) {
                    return Err(Inconsistency::DuplicateRosterEntry {
                        student: *id,
                        course: course.code().clone(),
                    });
                }
                match self.students.get(id) {
                    None => {
                        return Err(Inconsistency::UnknownRosterStudent {
                            student: *id,
                            course: course.code().clone(),
                        });
                    }
                    Some(student) if !student.is_enrolled_in(course.code()) => {
                        return Err(Inconsistency::MissingEnrollment {
                            student: *id,
                            course: course.code().clone(),
                        });
                    }
                    Some(_) => {}
                }
            }

            for prerequisite in course.prerequisites() {
                if !self.courses.contains_key(prerequisite) {
                    return Err(Inconsistency::UnknownPrerequisite {
                        course: course.code().clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Enroll a student without checking prerequisites, completion or course
    /// load.
    ///
    /// Used when restoring a snapshot, where enrollments may legitimately
    /// predate prerequisites added later.
    pub(crate) fn restore_enrollment(
        &mut self,
        id: StudentId,
        code: &CourseCode,
    ) -> Result<(), Error> {
        let student = self
            .students
            .get_mut(&id)
            .ok_or(Error::UnknownStudent(id))?;
        let course = self
            .courses
            .get_mut(code)
            .ok_or_else(|| Error::UnknownCourse(code.clone()))?;

        if student.has_completed(code) {
            return Err(Error::AlreadyCompleted {
                student: id,
                course: code.clone(),
            });
        }

        student.enroll(code.clone());
        course.add_student(id);
        Ok(())
    }
}

impl Registry {
    /// Whether `course` (transitively) requires `prerequisite`.
    fn requires(&self, course: &CourseCode, prerequisite: &CourseCode) -> bool {
        let graph = self.prerequisite_graph();

        if !graph.contains_node(course.as_str()) || !graph.contains_node(prerequisite.as_str()) {
            return false;
        }

        has_path_connecting(&graph, course.as_str(), prerequisite.as_str(), None)
    }

    /// Prerequisite graph. Nodes are course codes, edges point from a course
    /// to each of its prerequisites.
    fn prerequisite_graph(&self) -> DiGraphMap<&str, ()> {
        let mut graph = DiGraphMap::with_capacity(self.courses.len(), self.courses.len());

        for (code, course) in &self.courses {
            graph.add_node(code.as_str());
            for prerequisite in course.prerequisites() {
                graph.add_edge(code.as_str(), prerequisite.as_str(), ());
            }
        }

        graph
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({})\nNumber of Students: {}\nNumber of Courses {}",
            self.name,
            self.motto,
            self.students.len(),
            self.courses.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u32) -> StudentId {
        StudentId::new(value).unwrap()
    }

    fn code(s: &str) -> CourseCode {
        CourseCode::try_from(s).unwrap()
    }

    /// Ana (1), Ben (2); CS101 and MATH100 with no prerequisites, CS201
    /// requiring CS101.
    fn make_registry() -> Registry {
        let mut registry = Registry::new("Test University", "Scientia");
        registry.register_student("Ana", id(1)).unwrap();
        registry.register_student("Ben", id(2)).unwrap();
        registry
            .offer_course("Intro to Programming", code("CS101"))
            .unwrap();
        registry
            .offer_course("Data Structures", code("CS201"))
            .unwrap();
        registry.offer_course("Calculus", code("MATH100")).unwrap();
        registry
            .add_prerequisite(&code("CS201"), &code("CS101"))
            .unwrap();
        registry
    }

    fn assert_enrolled(registry: &Registry, student: u32, course: &str, expected: bool) {
        let s = registry.student(id(student)).unwrap();
        let c = registry.course(&code(course)).unwrap();
        assert_eq!(s.is_enrolled_in(&code(course)), expected);
        assert_eq!(c.has_student(id(student)), expected);
    }

    #[test]
    fn duplicate_student_is_rejected_and_registry_unchanged() {
        let mut registry = make_registry();

        let err = registry
            .register_student("Impostor", id(1))
            .expect_err("duplicate ID should be rejected");
        assert_eq!(err, Error::DuplicateStudent(id(1)));

        assert_eq!(registry.student_count(), 2);
        assert_eq!(registry.student(id(1)).unwrap().name(), "Ana");
    }

    #[test]
    fn duplicate_course_is_rejected_and_registry_unchanged() {
        let mut registry = make_registry();

        let err = registry
            .offer_course("Something Else", code("CS101"))
            .expect_err("duplicate code should be rejected");
        assert_eq!(err, Error::DuplicateCourse(code("CS101")));

        assert_eq!(registry.course_count(), 3);
        assert_eq!(
            registry.course(&code("CS101")).unwrap().name(),
            "Intro to Programming"
        );
    }

    #[test]
    fn prerequisite_requires_known_courses() {
        let mut registry = make_registry();

        let err = registry
            .add_prerequisite(&code("CS999"), &code("CS101"))
            .expect_err("unknown course should be rejected");
        assert_eq!(err, Error::UnknownCourse(code("CS999")));

        let err = registry
            .add_prerequisite(&code("CS201"), &code("CS999"))
            .expect_err("unknown prerequisite should be rejected");
        assert_eq!(err, Error::UnknownCourse(code("CS999")));
    }

    #[test]
    fn duplicate_prerequisite_is_ignored() {
        let mut registry = make_registry();

        let added = registry
            .add_prerequisite(&code("CS201"), &code("CS101"))
            .unwrap();
        assert!(!added);
        assert_eq!(
            registry.course(&code("CS201")).unwrap().prerequisites(),
            &[code("CS101")]
        );
    }

    #[test]
    fn prerequisite_cycles_are_rejected() {
        let mut registry = make_registry();

        let err = registry
            .add_prerequisite(&code("CS101"), &code("CS101"))
            .expect_err("self prerequisite should be rejected");
        assert!(matches!(err, Error::PrerequisiteCycle { .. }));

        let err = registry
            .add_prerequisite(&code("CS101"), &code("CS201"))
            .expect_err("direct cycle should be rejected");
        match err {
            Error::PrerequisiteCycle {
                course,
                prerequisite,
            } => {
                assert_eq!(course, code("CS101"));
                assert_eq!(prerequisite, code("CS201"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        registry.offer_course("Algorithms", code("CS301")).unwrap();
        registry
            .add_prerequisite(&code("CS301"), &code("CS201"))
            .unwrap();
        let err = registry
            .add_prerequisite(&code("CS101"), &code("CS301"))
            .expect_err("transitive cycle should be rejected");
        assert!(matches!(err, Error::PrerequisiteCycle { .. }));

        assert!(registry.course(&code("CS101")).unwrap().prerequisites().is_empty());
    }

    #[test]
    fn enrollment_is_gated_on_prerequisites() {
        let mut registry = make_registry();

        let err = registry
            .enroll(id(1), &code("CS201"))
            .expect_err("prerequisite is unmet");
        match err {
            Error::PrerequisiteNotMet {
                student,
                course,
                missing,
            } => {
                assert_eq!(student, id(1));
                assert_eq!(course, code("CS201"));
                assert_eq!(missing, NonEmpty::new(code("CS101")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_enrolled(&registry, 1, "CS201", false);

        registry.complete_course(id(1), &code("CS101")).unwrap();

        let enrollment = registry.enroll(id(1), &code("CS201")).unwrap();
        assert!(!enrollment.already_enrolled);
        assert_enrolled(&registry, 1, "CS201", true);
    }

    #[test]
    fn current_enrollment_does_not_satisfy_a_prerequisite() {
        let mut registry = make_registry();

        registry.enroll(id(1), &code("CS101")).unwrap();

        let err = registry
            .enroll(id(1), &code("CS201"))
            .expect_err("being enrolled is not completion");
        assert!(matches!(err, Error::PrerequisiteNotMet { .. }));
    }

    #[test]
    fn every_missing_prerequisite_is_reported() {
        let mut registry = make_registry();
        registry
            .add_prerequisite(&code("CS201"), &code("MATH100"))
            .unwrap();
        registry.complete_course(id(2), &code("MATH100")).unwrap();

        let err = registry.enroll(id(1), &code("CS201")).unwrap_err();
        let Error::PrerequisiteNotMet { missing, .. } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(
            missing.into_iter().collect::<Vec<_>>(),
            vec![code("CS101"), code("MATH100")]
        );

        let err = registry.enroll(id(2), &code("CS201")).unwrap_err();
        let Error::PrerequisiteNotMet { missing, .. } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(missing, NonEmpty::new(code("CS101")));
    }

    #[test]
    fn enroll_with_unknown_keys_fails() {
        let mut registry = make_registry();

        assert_eq!(
            registry.enroll(id(99), &code("CS101")),
            Err(Error::UnknownStudent(id(99)))
        );
        assert_eq!(
            registry.enroll(id(1), &code("CS999")),
            Err(Error::UnknownCourse(code("CS999")))
        );
    }

    #[test]
    fn enrolling_twice_does_not_duplicate_the_roster_entry() {
        let mut registry = make_registry();

        registry.enroll(id(1), &code("CS101")).unwrap();
        let second = registry.enroll(id(1), &code("CS101")).unwrap();

        assert!(second.already_enrolled);
        assert_eq!(
            registry.course(&code("CS101")).unwrap().enrolled_students(),
            &[id(1)]
        );
        registry.check_consistency().unwrap();
    }

    #[test]
    fn completed_course_cannot_be_enrolled_in_again() {
        let mut registry = make_registry();
        registry.complete_course(id(1), &code("CS101")).unwrap();

        let err = registry.enroll(id(1), &code("CS101")).unwrap_err();
        assert_eq!(
            err,
            Error::AlreadyCompleted {
                student: id(1),
                course: code("CS101"),
            }
        );
    }

    #[test]
    fn completing_an_enrolled_course_drops_both_sides() {
        let mut registry = make_registry();
        registry.enroll(id(1), &code("CS101")).unwrap();

        assert!(registry.complete_course(id(1), &code("CS101")).unwrap());

        assert_enrolled(&registry, 1, "CS101", false);
        assert!(registry.student(id(1)).unwrap().has_completed(&code("CS101")));
        registry.check_consistency().unwrap();
    }

    #[test]
    fn course_load_limit_is_enforced() {
        let mut registry = make_registry();
        registry.set_max_course_load(Some(1));

        registry.enroll(id(1), &code("CS101")).unwrap();
        let err = registry.enroll(id(1), &code("MATH100")).unwrap_err();
        assert_eq!(
            err,
            Error::CourseLoadExceeded {
                student: id(1),
                limit: 1,
            }
        );

        // re-enrolling in a current course is still fine
        assert!(registry.enroll(id(1), &code("CS101")).unwrap().already_enrolled);
    }

    #[test]
    fn unenroll_succeeds_once() {
        let mut registry = make_registry();
        registry.enroll(id(1), &code("CS101")).unwrap();
        registry.enroll(id(2), &code("CS101")).unwrap();

        registry.unenroll(id(1), &code("CS101")).unwrap();
        assert_enrolled(&registry, 1, "CS101", false);
        assert_enrolled(&registry, 2, "CS101", true);

        let err = registry
            .unenroll(id(1), &code("CS101"))
            .expect_err("second unenroll should fail");
        assert_eq!(
            err,
            Error::NotEnrolled {
                student: id(1),
                course: code("CS101"),
            }
        );
        assert_eq!(
            registry.course(&code("CS101")).unwrap().enrolled_students(),
            &[id(2)]
        );
        registry.check_consistency().unwrap();
    }

    #[test]
    fn unenroll_with_unknown_keys_fails() {
        let mut registry = make_registry();

        assert_eq!(
            registry.unenroll(id(99), &code("CS101")),
            Err(Error::UnknownStudent(id(99)))
        );
        assert_eq!(
            registry.unenroll(id(1), &code("CS999")),
            Err(Error::UnknownCourse(code("CS999")))
        );
    }

    #[test]
    fn removing_a_student_cascades_to_rosters() {
        let mut registry = make_registry();
        registry.enroll(id(1), &code("CS101")).unwrap();
        registry.enroll(id(1), &code("MATH100")).unwrap();
        registry.enroll(id(2), &code("CS101")).unwrap();

        let removed = registry.remove_student(id(1)).unwrap();
        assert_eq!(removed.course_load(), 0);

        assert!(registry.student(id(1)).is_none());
        assert!(registry.courses().all(|course| !course.has_student(id(1))));
        assert!(registry.course(&code("CS101")).unwrap().has_student(id(2)));
        registry.check_consistency().unwrap();

        assert_eq!(
            registry.remove_student(id(1)).unwrap_err(),
            Error::UnknownStudent(id(1))
        );
    }

    #[test]
    fn removing_a_course_cascades_to_students_and_prerequisites() {
        let mut registry = make_registry();
        registry.complete_course(id(1), &code("CS101")).unwrap();
        registry.enroll(id(2), &code("CS101")).unwrap();
        registry.enroll(id(1), &code("CS201")).unwrap();

        let removed = registry.remove_course(&code("CS101")).unwrap();
        assert!(removed.enrolled_students().is_empty());

        assert!(registry.course(&code("CS101")).is_none());
        assert!(
            registry
                .students()
                .all(|student| !student.is_enrolled_in(&code("CS101")))
        );
        assert!(
            registry
                .courses()
                .all(|course| !course.has_prerequisite(&code("CS101")))
        );
        // completion history is not part of the cascade
        assert!(registry.student(id(1)).unwrap().has_completed(&code("CS101")));
        assert_enrolled(&registry, 1, "CS201", true);
        registry.check_consistency().unwrap();

        assert_eq!(
            registry.remove_course(&code("CS101")).unwrap_err(),
            Error::UnknownCourse(code("CS101"))
        );
    }

    #[test]
    fn students_added_from_elsewhere_lose_their_enrollments() {
        let mut registry = make_registry();
        registry.enroll(id(1), &code("CS101")).unwrap();
        registry.complete_course(id(1), &code("MATH100")).unwrap();
        let copy = registry.student(id(1)).unwrap().clone();

        let mut other = Registry::new("Other", "Motto");
        other.add_student(copy).unwrap();

        let student = other.student(id(1)).unwrap();
        assert_eq!(student.course_load(), 0);
        assert!(student.has_completed(&code("MATH100")));
        other.check_consistency().unwrap();
    }

    #[test]
    fn added_course_prerequisites_must_be_offered() {
        let registry = make_registry();
        let copy = registry.course(&code("CS201")).unwrap().clone();

        let mut other = Registry::new("Other", "Motto");
        assert_eq!(
            other.add_course(copy.clone()),
            Err(Error::UnknownCourse(code("CS101")))
        );

        other.offer_course("Intro", code("CS101")).unwrap();
        other.add_course(copy).unwrap();
        other.check_consistency().unwrap();
    }

    #[test]
    fn removing_a_prerequisite_requires_it_to_be_listed() {
        let mut registry = make_registry();

        assert_eq!(
            registry.remove_prerequisite(&code("CS201"), &code("MATH100")),
            Err(Error::NotAPrerequisite {
                course: code("CS201"),
                prerequisite: code("MATH100"),
            })
        );
        assert_eq!(
            registry.remove_prerequisite(&code("ZZ999"), &code("CS101")),
            Err(Error::UnknownCourse(code("ZZ999")))
        );

        registry
            .remove_prerequisite(&code("CS201"), &code("CS101"))
            .unwrap();
        assert!(
            registry
                .course(&code("CS201"))
                .unwrap()
                .prerequisites()
                .is_empty()
        );

        // Ana has completed nothing, but CS201 no longer asks for anything.
        registry.enroll(id(1), &code("CS201")).unwrap();
        assert_eq!(
            registry.remove_prerequisite(&code("CS201"), &code("CS101")),
            Err(Error::NotAPrerequisite {
                course: code("CS201"),
                prerequisite: code("CS101"),
            })
        );
    }

    #[test]
    fn student_view_lists_course_load() {
        let mut registry = make_registry();

        let view = registry.student_view(id(1)).unwrap();
        assert_eq!(
            view.to_string(),
            "Student Ana (000001) - Course Load: none"
        );

        registry.enroll(id(1), &code("CS101")).unwrap();
        registry.enroll(id(1), &code("MATH100")).unwrap();

        let view = registry.student_view(id(1)).unwrap();
        assert_eq!(
            view.to_string(),
            "Student Ana (000001) - Course Load: Intro to Programming (CS101), Calculus (MATH100)"
        );
        assert!(registry.student_view(id(99)).is_none());
    }

    #[test]
    fn display_summarises_the_registry() {
        let registry = make_registry();
        assert_eq!(
            registry.to_string(),
            "Test University (Scientia)\nNumber of Students: 2\nNumber of Courses 3"
        );
    }

    #[test]
    fn example_scenario() {
        let mut registry = Registry::new("U", "M");
        registry.register_student("Ana", id(1)).unwrap();
        registry.offer_course("Intro", code("CS101")).unwrap();
        registry.offer_course("Next", code("CS201")).unwrap();
        registry
            .add_prerequisite(&code("CS201"), &code("CS101"))
            .unwrap();

        assert!(registry.enroll(id(1), &code("CS201")).is_err());

        registry.complete_course(id(1), &code("CS101")).unwrap();
        assert!(registry.enroll(id(1), &code("CS201")).is_ok());

        assert!(
            registry
                .student(id(1))
                .unwrap()
                .is_enrolled_in(&code("CS201"))
        );
        assert_eq!(
            registry.course(&code("CS201")).unwrap().enrolled_students(),
            &[id(1)]
        );
    }

    #[test]
    fn consistency_check_detects_one_sided_enrollment() {
        let mut registry = make_registry();
        registry
            .students
            .get_mut(&id(1))
            .unwrap()
            .enroll(code("CS101"));

        assert_eq!(
            registry.check_consistency(),
            Err(Inconsistency::MissingFromRoster {
                student: id(1),
                course: code("CS101"),
            })
        );
    }
}
