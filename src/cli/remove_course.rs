use std::path::PathBuf;

use registrar::{CourseCode, Store};
use tracing::instrument;

use crate::cli::{parse_course_code, prompt_to_proceed, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The code of the course to remove
    #[clap(value_parser = parse_course_code)]
    code: CourseCode,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;
        let registry = store.registry();

        let Some(course) = registry.course(&self.code) else {
            anyhow::bail!("Course {} not found", self.code);
        };

        if !self.yes {
            let dependents: Vec<_> = registry
                .courses()
                .filter(|other| other.has_prerequisite(&self.code))
                .collect();

            println!("Will remove {course}");
            if !course.enrolled_students().is_empty() {
                println!(
                    "\nWill unenroll {} student(s)",
                    course.enrolled_students().len()
                );
            }
            if !dependents.is_empty() {
                println!("\nWill drop it as a prerequisite of:");
                for dependent in dependents {
                    println!("  • {dependent}");
                }
            }
            prompt_to_proceed()?;
        }

        let course = store.registry_mut().remove_course(&self.code)?;
        store.flush()?;

        println!("{}", format!("✅ Removed {course}").success());
        Ok(())
    }
}
