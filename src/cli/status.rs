use std::path::PathBuf;

use clap::Parser;
use registrar::{Registry, Store};
use tracing::instrument;

use super::terminal::{Colorize, is_narrow, rule};

#[derive(Debug, Parser, Default)]
#[command(about = "Show student, course and enrollment totals")]
pub struct Command {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Totals shown by the status command.
#[derive(Debug, PartialEq, Eq)]
struct Summary {
    students: usize,
    courses: usize,
    enrollments: usize,
    completions: usize,
    /// Courses with at least one prerequisite.
    gated_courses: usize,
    max_course_load: Option<usize>,
}

impl Summary {
    fn of(registry: &Registry) -> Self {
        Self {
            students: registry.student_count(),
            courses: registry.course_count(),
            enrollments: registry
                .courses()
                .map(|course| course.enrolled_students().len())
                .sum(),
            completions: registry
                .students()
                .map(|student| student.completed_courses().count())
                .sum(),
            gated_courses: registry
                .courses()
                .filter(|course| !course.prerequisites().is_empty())
                .count(),
            max_course_load: registry.max_course_load(),
        }
    }
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = Store::open(root)?;
        let registry = store.registry();
        let summary = Summary::of(registry);

        match self.output {
            OutputFormat::Json => Self::output_json(registry, &summary)?,
            OutputFormat::Table if self.quiet => Self::output_quiet(&summary),
            OutputFormat::Table => Self::output_table(registry, &summary),
        }

        Ok(())
    }

    fn output_json(registry: &Registry, summary: &Summary) -> anyhow::Result<()> {
        use serde_json::json;

        let output = json!({
            "name": registry.name(),
            "motto": registry.motto(),
            "students": summary.students,
            "courses": summary.courses,
            "enrollments": summary.enrollments,
            "completions": summary.completions,
            "gated_courses": summary.gated_courses,
            "max_course_load": summary.max_course_load,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(summary: &Summary) {
        println!(
            "students={} courses={} enrollments={}",
            summary.students, summary.courses, summary.enrollments
        );
    }

    fn output_table(registry: &Registry, summary: &Summary) {
        println!("{registry}");
        println!("{}", rule(18));

        if summary.students == 0 && summary.courses == 0 {
            println!("Nothing registered yet. Start with 'reg add-course' and 'reg add-student'.");
            return;
        }

        if is_narrow() {
            println!("Enrollments: {}", summary.enrollments);
            println!("Completions: {}", summary.completions);
        } else {
            println!("{:<22} {}", "Enrollments", summary.enrollments);
            println!("{:<22} {}", "Completions", summary.completions);
            println!("{:<22} {}", "Courses with prereqs", summary.gated_courses);
        }

        println!();

        match summary.max_course_load {
            Some(limit) => println!("Max course load: {}", limit.to_string().warning()),
            None => println!("Max course load: {}", "unlimited".success()),
        }
    }
}
