use std::{
    io::{self, BufRead},
    path::PathBuf,
};

mod add_course;
mod add_student;
mod complete;
mod enroll;
mod init;
mod list;
mod remove_course;
mod remove_student;
mod require;
mod show;
mod status;
mod terminal;
mod unenroll;

use clap::ArgAction;
use registrar::{CourseCode, StudentId};

/// Parse a course code, normalizing to uppercase.
///
/// This is a CLI boundary function that accepts lowercase input
/// and normalizes it before parsing.
fn parse_course_code(s: &str) -> Result<CourseCode, String> {
    s.to_uppercase().parse().map_err(|e| format!("{e}"))
}

fn parse_student_id(s: &str) -> Result<StudentId, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Ask for confirmation on stderr, exiting with status 130 unless the answer
/// is 'y'.
fn prompt_to_proceed() -> io::Result<()> {
    eprint!("\nProceed? (y/N) ");
    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    if !line.trim().eq_ignore_ascii_case("y") {
        println!("Cancelled");
        std::process::exit(130);
    }
    Ok(())
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The directory holding the registry
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(status::Command::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show registry status (default)
    Status(status::Command),

    /// Create a new, empty registry
    Init(init::Command),

    /// Register a student
    AddStudent(add_student::Command),

    /// Offer a course
    AddCourse(add_course::Command),

    /// Make one course a prerequisite of another
    Require(require::Command),

    /// Enroll a student in a course
    ///
    /// The student must have completed every prerequisite of the course.
    Enroll(enroll::Command),

    /// Remove a student from a course
    Unenroll(unenroll::Command),

    /// Record that a student has completed a course
    Complete(complete::Command),

    /// Remove a student and all of their enrollments
    RemoveStudent(remove_student::Command),

    /// Remove a course, its enrollments, and its use as a prerequisite
    RemoveCourse(remove_course::Command),

    /// Show a student or a course
    Show(show::Command),

    /// List students or courses
    List(list::Command),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root)?,
            Self::Init(command) => command.run(root)?,
            Self::AddStudent(command) => command.run(root)?,
            Self::AddCourse(command) => command.run(root)?,
            Self::Require(command) => command.run(root)?,
            Self::Enroll(command) => command.run(root)?,
            Self::Unenroll(command) => command.run(root)?,
            Self::Complete(command) => command.run(root)?,
            Self::RemoveStudent(command) => command.run(root)?,
            Self::RemoveCourse(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::List(command) => command.run(root)?,
        }
        Ok(())
    }
}
