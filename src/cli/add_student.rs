use std::path::PathBuf;

use registrar::{Store, StudentId};
use tracing::instrument;

use crate::cli::parse_student_id;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The student's full name
    name: String,

    /// The student's ID, between 0 and 999999
    #[clap(value_parser = parse_student_id)]
    id: StudentId,
}

impl Command {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;
        store.registry_mut().register_student(self.name, self.id)?;
        store.flush()?;

        if let Some(student) = store.registry().student(self.id) {
            println!("Registered {student}");
        }
        Ok(())
    }
}
