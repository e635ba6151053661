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
        store.registry_mut().unenroll(self.id, &self.code)?;
        store.flush()?;

        println!(
            "{}",
            format!("✅ Removed student {} from {}", self.id, self.code).success()
        );
        Ok(())
    }
}
