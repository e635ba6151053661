use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use registrar::{Registry, Store};
use tracing::instrument;

use super::{
    show::{course_json, student_json},
    terminal::{Colorize, is_narrow, rule},
};

#[derive(Debug, Parser)]
#[command(about = "List students or courses")]
pub struct Command {
    /// What to list
    what: What,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum What {
    /// Registered students, in ID order
    Students,
    /// Offered courses, in code order
    Courses,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = Store::open(root)?;
        let registry = store.registry();

        match (self.what, self.output) {
            (What::Students, OutputFormat::Table) => render_students(registry),
            (What::Courses, OutputFormat::Table) => render_courses(registry),
            (what, OutputFormat::Json) => render_json(registry, what)?,
        }
        Ok(())
    }
}

fn render_students(registry: &Registry) {
    if registry.student_count() == 0 {
        println!("No students registered yet. Add one with 'reg add-student'.");
        return;
    }

    if is_narrow() {
        for student in registry.students() {
            println!("{student}");
        }
        return;
    }

    println!("{:<8} {:<24} {:>6} {:>9}", "ID", "Name", "Load", "Completed");
    println!("{}", rule(50));
    for student in registry.students() {
        println!(
            "{:<8} {:<24} {:>6} {:>9}",
            student.id().to_string(),
            student.name(),
            student.course_load(),
            student.completed_courses().count()
        );
    }
}

fn render_courses(registry: &Registry) {
    if registry.course_count() == 0 {
        println!("No courses offered yet. Add one with 'reg add-course'.");
        return;
    }

    if is_narrow() {
        for course in registry.courses() {
            println!("{course}");
        }
        return;
    }

    println!(
        "{:<10} {:<28} {:>8}  Prerequisites",
        "Code", "Name", "Enrolled"
    );
    println!("{}", rule(64));
    for course in registry.courses() {
        let prerequisites = if course.prerequisites().is_empty() {
            "–".dim()
        } else {
            course
                .prerequisites()
                .iter()
                .map(|code| code.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!(
            "{:<10} {:<28} {:>8}  {prerequisites}",
            course.code().as_str(),
            course.name(),
            course.enrolled_students().len(),
        );
    }
}

fn render_json(registry: &Registry, what: What) -> anyhow::Result<()> {
    let rows: Vec<serde_json::Value> = match what {
        What::Students => registry
            .students()
            .filter_map(|student| registry.student_view(student.id()))
            .map(|view| student_json(&view))
            .collect(),
        What::Courses => registry
            .courses()
            .map(|course| course_json(registry, course))
            .collect(),
    };

    serde_json::to_writer_pretty(std::io::stdout(), &rows)
        .context("failed to render json output")?;
    println!();
    Ok(())
}
