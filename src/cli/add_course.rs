use std::path::PathBuf;

use registrar::{CourseCode, Store};
use tracing::instrument;

use crate::cli::parse_course_code;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The course code (normalized to uppercase)
    #[clap(value_parser = parse_course_code)]
    code: CourseCode,

    /// The course name
    name: String,

    /// Codes of courses that must be completed before enrolling
    #[clap(long, short, value_delimiter = ',', value_parser = parse_course_code)]
    prerequisite: Vec<CourseCode>,
}

impl Command {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;

        let registry = store.registry_mut();
        registry.offer_course(self.name, self.code.clone())?;
        for prerequisite in &self.prerequisite {
            registry.add_prerequisite(&self.code, prerequisite)?;
        }
        // Nothing is written unless every step succeeded.
        store.flush()?;

        if let Some(course) = store.registry().course(&self.code) {
            println!("Offered {course}");
        }
        Ok(())
    }
}
