use std::path::PathBuf;

use registrar::{Store, StudentId};
use tracing::instrument;

use crate::cli::{parse_student_id, prompt_to_proceed, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The ID of the student to remove
    #[clap(value_parser = parse_student_id)]
    id: StudentId,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;

        let Some(view) = store.registry().student_view(self.id) else {
            anyhow::bail!("Student {} not found", self.id);
        };

        if !self.yes {
            println!("Will remove {}", view.student);
            if !view.courses.is_empty() {
                println!("\nWill drop {} enrollment(s):", view.courses.len());
                for course in &view.courses {
                    println!("  • {course}");
                }
            }
            prompt_to_proceed()?;
        }

        let student = store.registry_mut().remove_student(self.id)?;
        store.flush()?;

        println!("{}", format!("✅ Removed {student}").success());
        Ok(())
    }
}
