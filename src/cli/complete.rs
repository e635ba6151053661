use std::path::PathBuf;

use registrar::{CourseCode, Store, StudentId};
use tracing::instrument;

use crate::cli::{parse_course_code, parse_student_id, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The student's ID
    #[clap(value_parser = parse_student_id)]
    id: StudentId,

    /// The completed course
    #[clap(value_parser = parse_course_code)]
    code: CourseCode,
}

impl Command {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;
        let recorded = store.registry_mut().complete_course(self.id, &self.code)?;
        store.flush()?;

        if recorded {
            println!(
                "{}",
                format!("✅ Student {} completed {}", self.id, self.code).success()
            );
        } else {
            println!(
                "{}",
                format!("Student {} had already completed {}", self.id, self.code).dim()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use registrar::{CourseCode, Store, StudentId};
    use tempfile::tempdir;

    use super::Command;

    #[test]
    fn complete_run_moves_enrollment_to_history() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let id = StudentId::new(1).unwrap();
        let code = CourseCode::try_from("CS101").unwrap();

        let mut store = Store::init(root.clone(), "U", "M").unwrap();
        store.registry_mut().register_student("Ana", id).unwrap();
        store.registry_mut().offer_course("Intro", code.clone()).unwrap();
        store.registry_mut().enroll(id, &code).unwrap();
        store.flush().unwrap();

        Command {
            id,
            code: code.clone(),
        }
        .run(root.clone())
        .unwrap();

        let store = Store::open(root).unwrap();
        let student = store.registry().student(id).unwrap();
        assert!(student.has_completed(&code));
        assert!(!student.is_enrolled_in(&code));
        assert!(!store.registry().course(&code).unwrap().has_student(id));
    }
}
