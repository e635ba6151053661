use std::path::PathBuf;

use registrar::{CourseCode, Store};
use tracing::instrument;

use crate::cli::{parse_course_code, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The course gaining (or losing) a prerequisite
    #[clap(value_parser = parse_course_code)]
    course: CourseCode,

    /// The prerequisite course
    #[clap(value_parser = parse_course_code)]
    prerequisite: CourseCode,

    /// Remove the prerequisite instead of adding it
    #[arg(long)]
    remove: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;

        if self.remove {
            store
                .registry_mut()
                .remove_prerequisite(&self.course, &self.prerequisite)?;
            store.flush()?;
            println!(
                "{} no longer requires {}",
                self.course, self.prerequisite
            );
            return Ok(());
        }

        let added = store
            .registry_mut()
            .add_prerequisite(&self.course, &self.prerequisite)?;
        store.flush()?;

        if added {
            println!("{} now requires {}", self.course, self.prerequisite);
        } else {
            println!(
                "{}",
                format!("{} already requires {}", self.course, self.prerequisite).dim()
            );
        }
        Ok(())
    }
}
