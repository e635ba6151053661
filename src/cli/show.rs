use std::path::PathBuf;

use clap::{Parser, Subcommand};
use registrar::{Course, CourseCode, Registry, Store, StudentId, StudentView};
use serde_json::json;
use tracing::instrument;

use super::{
    parse_course_code, parse_student_id,
    terminal::{Colorize, rule},
};

#[derive(Debug, Parser)]
#[command(about = "Display detailed information about a student or course")]
pub struct Command {
    #[command(subcommand)]
    target: Target,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty", global = true)]
    output: OutputFormat,
}

#[derive(Debug, Subcommand)]
enum Target {
    /// Show a student's enrollments and completed courses
    Student {
        /// The student's ID
        #[clap(value_parser = parse_student_id)]
        id: StudentId,
    },
    /// Show a course's prerequisites and roster
    Course {
        /// The course code
        #[clap(value_parser = parse_course_code)]
        code: CourseCode,
    },
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = Store::open(root)?;
        let registry = store.registry();

        match self.target {
            Target::Student { id } => {
                let Some(view) = registry.student_view(id) else {
                    anyhow::bail!("Student {id} not found");
                };
                match self.output {
                    OutputFormat::Pretty => output_student_pretty(&view),
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&student_json(&view))?);
                    }
                }
            }
            Target::Course { code } => {
                let Some(course) = registry.course(&code) else {
                    anyhow::bail!("Course {code} not found");
                };
                match self.output {
                    OutputFormat::Pretty => output_course_pretty(registry, course),
                    OutputFormat::Json => {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&course_json(registry, course))?
                        );
                    }
                }
            }
        }

        Ok(())
    }
}

fn output_student_pretty(view: &StudentView<'_>) {
    println!("{}", view.student);
    println!("{}", rule(view.student.to_string().chars().count()));

    println!("Enrolled:");
    if view.courses.is_empty() {
        println!("  {}", "none".dim());
    }
    for course in &view.courses {
        println!("  • {course}");
    }

    println!("Completed:");
    let mut completed = view.student.completed_courses().peekable();
    if completed.peek().is_none() {
        println!("  {}", "none".dim());
    }
    for code in completed {
        println!("  • {code}");
    }
}

fn output_course_pretty(registry: &Registry, course: &Course) {
    println!("{course}");
    println!("{}", rule(course.to_string().chars().count()));

    println!("Prerequisites:");
    if course.prerequisites().is_empty() {
        println!("  {}", "none".dim());
    }
    for code in course.prerequisites() {
        match registry.course(code) {
            Some(prerequisite) => println!("  • {prerequisite}"),
            None => println!("  • {code}"),
        }
    }

    println!("Roster ({}):", course.enrolled_students().len());
    for id in course.enrolled_students() {
        match registry.student(*id) {
            Some(student) => println!("  • {student}"),
            None => println!("  • {id}"),
        }
    }
}

pub(super) fn student_json(view: &StudentView<'_>) -> serde_json::Value {
    json!({
        "id": view.student.id().get(),
        "name": view.student.name(),
        "enrolled": view.courses.iter().map(|c| c.code().as_str()).collect::<Vec<_>>(),
        "completed": view.student.completed_courses().map(CourseCode::as_str).collect::<Vec<_>>(),
        "summary": view.to_string(),
    })
}

pub(super) fn course_json(registry: &Registry, course: &Course) -> serde_json::Value {
    json!({
        "code": course.code().as_str(),
        "name": course.name(),
        "prerequisites": course.prerequisites().iter().map(CourseCode::as_str).collect::<Vec<_>>(),
        "enrolled": course
            .enrolled_students()
            .iter()
            .map(|id| json!({
                "id": id.get(),
                "name": registry.student(*id).map(registrar::Student::name),
            }))
            .collect::<Vec<_>>(),
    })
}
