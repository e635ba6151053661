//! Whole-registry binary snapshots.
//!
//! A snapshot is the 4-byte magic `REG\0`, the SHA-256 of the payload, and the
//! payload itself: the registry encoded with [borsh](https://borsh.io/).
//!
//! Decoding never trusts the payload. Every identifier is re-validated and the
//! registry is rebuilt through its own operations, so a snapshot that decodes
//! successfully always yields a consistent registry.

use std::{fmt::Display, fs, io, path::Path};

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::domain::{Course, CourseCode, Registry, Student, StudentId};

const MAGIC: [u8; 4] = *b"REG\0";
const CHECKSUM_LEN: usize = 32;
const HEADER_LEN: usize = MAGIC.len() + CHECKSUM_LEN;

/// Errors that can occur when reading or writing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot file does not exist.
    #[error("snapshot file not found")]
    NotFound,

    /// The snapshot file could not be read or written.
    #[error("failed to access snapshot: {0}")]
    Io(#[from] io::Error),

    /// The snapshot is truncated, fails its checksum, or describes an invalid
    /// registry.
    #[error("snapshot is corrupt: {0}")]
    Corrupt(String),
}

fn corrupt(reason: impl Display) -> SnapshotError {
    SnapshotError::Corrupt(reason.to_string())
}

#[derive(Debug, BorshSerialize, BorshDeserialize)]
struct RegistryRecord {
    name: String,
    motto: String,
    courses: Vec<CourseRecord>,
    students: Vec<StudentRecord>,
}

#[derive(Debug, BorshSerialize, BorshDeserialize)]
struct CourseRecord {
    name: String,
    code: String,
    prerequisites: Vec<String>,
    roster: Vec<u32>,
}

#[derive(Debug, BorshSerialize, BorshDeserialize)]
struct StudentRecord {
    name: String,
    id: u32,
    enrolled: Vec<String>,
    completed: Vec<String>,
}

impl From<&Registry> for RegistryRecord {
    fn from(registry: &Registry) -> Self {
        Self {
            name: registry.name().to_string(),
            motto: registry.motto().to_string(),
            courses: registry.courses().map(CourseRecord::from).collect(),
            students: registry.students().map(StudentRecord::from).collect(),
        }
    }
}

impl From<&Course> for CourseRecord {
    fn from(course: &Course) -> Self {
        Self {
            name: course.name().to_string(),
            code: course.code().to_string(),
            prerequisites: course
                .prerequisites()
                .iter()
                .map(ToString::to_string)
                .collect(),
            roster: course
                .enrolled_students()
                .iter()
                .map(|id| id.get())
                .collect(),
        }
    }
}

impl From<&Student> for StudentRecord {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name().to_string(),
            id: student.id().get(),
            enrolled: student.enrolled_courses().map(ToString::to_string).collect(),
            completed: student
                .completed_courses()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Encode a registry as snapshot bytes.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] if serialization fails.
pub fn encode(registry: &Registry) -> Result<Vec<u8>, SnapshotError> {
    let payload = borsh::to_vec(&RegistryRecord::from(registry))?;
    let checksum = Sha256::digest(&payload);

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&checksum);
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode snapshot bytes into a registry.
///
/// # Errors
///
/// Returns [`SnapshotError::Corrupt`] if the header is missing, the checksum
/// does not match, the payload cannot be decoded, or the decoded data does
/// not describe a consistent registry.
pub fn decode(bytes: &[u8]) -> Result<Registry, SnapshotError> {
    if bytes.len() < HEADER_LEN {
        return Err(corrupt("truncated header"));
    }
    let (magic, rest) = bytes.split_at(MAGIC.len());
    let (checksum, payload) = rest.split_at(CHECKSUM_LEN);

    if magic != MAGIC {
        return Err(corrupt("not a registry snapshot"));
    }
    if Sha256::digest(payload).as_slice() != checksum {
        return Err(corrupt("checksum mismatch"));
    }

    let record = borsh::from_slice::<RegistryRecord>(payload).map_err(corrupt)?;
    restore(record)
}

/// Write a registry snapshot to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] if the file cannot be written.
#[instrument(skip(registry))]
pub fn save(registry: &Registry, path: &Path) -> Result<(), SnapshotError> {
    let bytes = encode(registry)?;
    fs::write(path, bytes)?;
    tracing::debug!(
        "saved {} students and {} courses",
        registry.student_count(),
        registry.course_count()
    );
    Ok(())
}

/// Read a registry snapshot from `path`.
///
/// # Errors
///
/// Returns [`SnapshotError::NotFound`] if the file does not exist,
/// [`SnapshotError::Io`] if it cannot be read, and
/// [`SnapshotError::Corrupt`] if its contents are invalid.
#[instrument]
pub fn load(path: &Path) -> Result<Registry, SnapshotError> {
    let bytes = fs::read(path).map_err(|io_error| match io_error.kind() {
        io::ErrorKind::NotFound => SnapshotError::NotFound,
        _ => SnapshotError::Io(io_error),
    })?;

    decode(&bytes).inspect_err(|e| tracing::warn!("failed to load {}: {e}", path.display()))
}

fn restore(record: RegistryRecord) -> Result<Registry, SnapshotError> {
    let mut registry = Registry::new(record.name, record.motto);

    // Courses first, so prerequisites and enrollments can refer to them.
    let mut courses = Vec::with_capacity(record.courses.len());
    for course in record.courses {
        let code = CourseCode::new(course.code).map_err(corrupt)?;
        registry
            .offer_course(course.name, code.clone())
            .map_err(corrupt)?;
        courses.push((code, course.prerequisites, course.roster));
    }

    for (code, prerequisites, _) in &courses {
        for prerequisite in prerequisites {
            let prerequisite = CourseCode::new(prerequisite.clone()).map_err(corrupt)?;
            registry
                .add_prerequisite(code, &prerequisite)
                .map_err(corrupt)?;
        }
    }

    let mut enrolled = Vec::with_capacity(record.students.len());
    for student in record.students {
        let id = StudentId::new(student.id).map_err(corrupt)?;
        let mut entity = Student::new(student.name, id);
        for code in student.completed {
            entity.complete(CourseCode::new(code).map_err(corrupt)?);
        }
        registry.add_student(entity).map_err(corrupt)?;
        enrolled.push((id, student.enrolled));
    }

    for (code, _, roster) in &courses {
        for id in roster {
            let id = StudentId::new(*id).map_err(corrupt)?;
            registry.restore_enrollment(id, code).map_err(corrupt)?;
        }
    }

    // Each student's recorded enrollments must match the rosters exactly.
    for (id, codes) in enrolled {
        let Some(student) = registry.student(id) else {
            return Err(corrupt(format!("student {id} vanished during restore")));
        };
        let recorded = codes
            .into_iter()
            .map(|code| CourseCode::new(code).map_err(corrupt))
            .collect::<Result<Vec<_>, _>>()?;
        let actual: Vec<_> = student.enrolled_courses().cloned().collect();

        let mut expected = recorded;
        expected.sort();
        expected.dedup();
        if expected != actual {
            return Err(corrupt(format!(
                "enrollments of student {id} disagree with course rosters"
            )));
        }
    }

    registry.check_consistency().map_err(corrupt)?;
    Ok(registry)
}
