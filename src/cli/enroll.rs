use std::path::PathBuf;

use registrar::{CourseCode, Store, StudentId};
use tracing::instrument;

use crate::cli::{parse_course_code, parse_student_id, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The student's ID
    #[clap(value_parser = parse_student_id)]
    id: StudentId,

    /// The course code
    #[clap(value_parser = parse_course_code)]
    code: CourseCode,
}

impl Command {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;
        let enrollment = store.registry_mut().enroll(self.id, &self.code)?;
        store.flush()?;

        if enrollment.already_enrolled {
            println!(
                "{}",
                format!("Student {} is already enrolled in {}", self.id, self.code).dim()
            );
        } else {
            println!(
                "{}",
                format!("✅ Enrolled student {} in {}", self.id, self.code).success()
            );
        }
        Ok(())
    }
}
