use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod config;
mod db;
mod error;
mod models;
mod progress;
mod report;
mod sync;
mod taxonomy;

use config::Config;
use db::Store;
use models::{
    AppData, EvaluationScores, ExpectationId, ExpectationPhase, ObjectiveRef, Phase,
    PreceptorProfile, Rating, ScoreCategory, SessionEvaluation, SkillRating, StudentProfile,
};
use progress::{EvaluationFilter, SortKey};
use sync::{DriveTransport, FileTransport};

#[derive(Parser)]
#[command(name = "preceptor-eval")]
#[command(about = "Session evaluation tracker for clinical preceptors", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a sample rotation into an empty document
    Seed,
    /// Show or replace the preceptor profile
    Preceptor {
        #[command(subcommand)]
        action: PreceptorCommand,
    },
    /// Manage students
    Student {
        #[command(subcommand)]
        action: StudentCommand,
    },
    /// Record and browse session evaluations
    Eval {
        #[command(subcommand)]
        action: EvalCommand,
    },
    /// Print phase-by-phase progress for one student
    Progress {
        #[arg(long)]
        student: String,
    },
    /// Print a summary across all students
    Dashboard,
    /// Print the scoring guide and the ids accepted by other commands
    Guide,
    /// Generate a markdown report
    Report {
        #[arg(long)]
        student: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Write one student's week-by-week scores as CSV
    Timeline {
        #[arg(long)]
        student: String,
        #[arg(long, default_value = "timeline.csv")]
        out: PathBuf,
    },
    /// Export the whole document as JSON
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the whole document with an exported JSON file
    Import {
        #[arg(long)]
        file: PathBuf,
    },
    /// Save to or load from Google Drive
    Drive {
        #[command(subcommand)]
        action: DriveCommand,
    },
}

#[derive(Subcommand)]
enum PreceptorCommand {
    Show,
    Set {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        institution: String,
        #[arg(long, default_value = "")]
        specialty: String,
        #[arg(long, default_value = "")]
        email: String,
    },
}

#[derive(Subcommand)]
enum StudentCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        program: String,
        #[arg(long, default_value = "")]
        year_level: String,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        photo: Option<String>,
    },
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        program: Option<String>,
        #[arg(long)]
        year_level: Option<String>,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        photo: Option<String>,
    },
    /// Delete a student and all of their evaluations
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Rate one clinical skill behavior (e.g. prof-min-a)
    Skill {
        #[arg(long)]
        id: String,
        #[arg(long)]
        skill: String,
        #[arg(long)]
        rating: SkillRating,
    },
}

#[derive(Subcommand)]
enum EvalCommand {
    List {
        #[arg(long)]
        student: Option<String>,
        #[arg(long)]
        phase: Option<Phase>,
        #[arg(long, default_value = "date")]
        sort: SortKey,
    },
    Add {
        #[arg(long)]
        student: String,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=52))]
        week: u32,
        #[command(flatten)]
        fields: EvaluationFields,
    },
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        student: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=52))]
        week: Option<u32>,
        #[command(flatten)]
        fields: EvaluationFields,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum DriveCommand {
    Push,
    Pull,
}

/// Evaluation fields shared by add and update. Absent flags leave a field alone.
#[derive(Args)]
struct EvaluationFields {
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    session_type: Option<String>,
    #[arg(long)]
    encounters: Option<u32>,
    /// Eight comma-separated 1-5 scores, knowledge first and initiative last,
    /// or a single score for every category
    #[arg(long, value_delimiter = ',')]
    scores: Vec<Rating>,
    #[arg(long)]
    overall: Option<Rating>,
    #[arg(long)]
    strengths: Option<String>,
    #[arg(long)]
    improve: Option<String>,
    #[arg(long)]
    plan: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// Catalog condition seen (repeatable)
    #[arg(long = "condition")]
    conditions: Vec<String>,
    /// Condition outside the catalog (repeatable)
    #[arg(long = "custom-condition")]
    custom_conditions: Vec<String>,
    /// Teaching topic as Category:Topic (repeatable)
    #[arg(long = "topic")]
    topics: Vec<String>,
    /// Expectation id such as 1-middle-a (repeatable)
    #[arg(long = "objective")]
    objectives: Vec<String>,
}

impl EvaluationFields {
    fn apply(self, evaluation: &mut SessionEvaluation) -> anyhow::Result<()> {
        if let Some(date) = self.date {
            evaluation.date = date;
        }
        if let Some(session_type) = self.session_type {
            let canonical = taxonomy::SESSION_TYPES
                .iter()
                .find(|t| t.eq_ignore_ascii_case(session_type.trim()))
                .with_context(|| {
                    format!(
                        "unknown session type '{session_type}', expected one of: {}",
                        taxonomy::SESSION_TYPES.join(", ")
                    )
                })?;
            evaluation.session_type = canonical.to_string();
        }
        if let Some(encounters) = self.encounters {
            evaluation.patient_encounters = encounters;
        }
        if self.scores.len() == 1 {
            evaluation.scores = EvaluationScores::uniform(self.scores[0]);
        } else if !self.scores.is_empty() {
            let ratings: [Rating; 8] = self.scores.try_into().map_err(|scores: Vec<Rating>| {
                anyhow::anyhow!("--scores needs 1 or 8 values, got {}", scores.len())
            })?;
            evaluation.scores = EvaluationScores::from_ordered(ratings);
        }
        if let Some(overall) = self.overall {
            evaluation.overall_rating = overall;
        }
        if let Some(strengths) = self.strengths {
            evaluation.strengths = strengths;
        }
        if let Some(improve) = self.improve {
            evaluation.areas_for_improvement = improve;
        }
        if let Some(plan) = self.plan {
            evaluation.action_plan = plan;
        }
        if let Some(notes) = self.notes {
            evaluation.preceptor_notes = notes;
        }

        if !self.conditions.is_empty() {
            let mut seen: Vec<String> = Vec::new();
            for name in &self.conditions {
                let canonical = taxonomy::catalog_condition(name).with_context(|| {
                    format!("'{name}' is not a catalog condition, use --custom-condition")
                })?;
                if !seen.iter().any(|c| c == canonical) {
                    seen.push(canonical.to_string());
                }
            }
            evaluation.conditions_seen = seen;
        }
        if !self.custom_conditions.is_empty() {
            let mut custom: Vec<String> = Vec::new();
            for name in self.custom_conditions {
                let name = name.trim().to_string();
                if !name.is_empty() && !custom.contains(&name) {
                    custom.push(name);
                }
            }
            evaluation.custom_conditions = custom;
        }
        if !self.topics.is_empty() {
            evaluation.teaching_topics.clear();
            for raw in &self.topics {
                let (category, topic) = raw
                    .split_once(':')
                    .map(|(c, t)| (c.trim(), t.trim()))
                    .filter(|(c, t)| !c.is_empty() && !t.is_empty())
                    .with_context(|| format!("topic '{raw}' must look like Category:Topic"))?;
                evaluation.add_topic(category, topic);
            }
        }
        if !self.objectives.is_empty() {
            let mut achieved: Vec<ObjectiveRef> = Vec::new();
            for raw in &self.objectives {
                let id: ExpectationId = raw.parse().map_err(anyhow::Error::msg)?;
                if taxonomy::expectation_text(&id).is_none() {
                    bail!("no expectation {id} in the clinical objectives");
                }
                let objective = ObjectiveRef::from(id);
                if !achieved.contains(&objective) {
                    achieved.push(objective);
                }
            }
            evaluation.objectives_achieved = achieved;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let pool = db::connect(&cli.config.database_url).await?;
    db::init_db(&pool)
        .await
        .context("failed to prepare the evaluation schema")?;
    let store = Store::new(pool, cli.config.storage_key.clone());

    match cli.command {
        Commands::Seed => {
            if store.seed().await? {
                println!("Sample rotation loaded.");
            } else {
                println!("Document already has students, nothing seeded.");
            }
        }
        Commands::Preceptor { action } => run_preceptor(&store, action).await?,
        Commands::Student { action } => run_student(&store, action).await?,
        Commands::Eval { action } => run_eval(&store, action).await?,
        Commands::Progress { student } => {
            let data = store.load().await;
            print!("{}", report::build_student_report(&data, &student)?);
        }
        Commands::Dashboard => {
            let data = store.load().await;
            print!("{}", report::build_dashboard_report(&data));
        }
        Commands::Guide => print_guide(),
        Commands::Report { student, out } => {
            let data = store.load().await;
            let text = match student.as_deref() {
                Some(id) => report::build_student_report(&data, id)?,
                None => report::build_dashboard_report(&data),
            };
            std::fs::write(&out, text)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Timeline { student, out } => {
            let data = store.load().await;
            if data.student(&student).is_none() {
                bail!("no student with id {student}");
            }
            let timeline = progress::student_timeline(&data.evaluations, &student);
            let rows = report::write_timeline_csv(&out, &timeline)?;
            println!("Wrote {rows} sessions to {}.", out.display());
        }
        Commands::Export { out } => {
            let out = out
                .unwrap_or_else(|| PathBuf::from(sync::export_file_name(Utc::now().date_naive())));
            let (transport, name) = file_transport(&out)?;
            let location = sync::push_snapshot(&store, &transport, &name).await?;
            println!("Exported to {location}.");
        }
        Commands::Import { file } => {
            let (transport, name) = file_transport(&file)?;
            match sync::pull_snapshot(&store, &transport, &name).await? {
                Some(data) => println!(
                    "Imported {} students and {} evaluations.",
                    data.students.len(),
                    data.evaluations.len()
                ),
                None => bail!("{} does not exist", file.display()),
            }
        }
        Commands::Drive { action } => {
            let transport = DriveTransport::new(cli.config.drive_token()?)?;
            let name = cli.config.drive_file.as_str();
            match action {
                DriveCommand::Push => {
                    let file_id = sync::push_snapshot(&store, &transport, name).await?;
                    println!("Saved to Google Drive as {name} ({file_id}).");
                }
                DriveCommand::Pull => match sync::pull_snapshot(&store, &transport, name).await? {
                    Some(data) => println!(
                        "Loaded {} students and {} evaluations from Google Drive.",
                        data.students.len(),
                        data.evaluations.len()
                    ),
                    None => println!("No saved data found on Google Drive."),
                },
            }
        }
    }

    Ok(())
}

fn file_transport(path: &Path) -> anyhow::Result<(FileTransport, String)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} is not a file path", path.display()))?
        .to_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((FileTransport::new(dir), name))
}

async fn run_preceptor(store: &Store, action: PreceptorCommand) -> anyhow::Result<()> {
    match action {
        PreceptorCommand::Show => {
            let preceptor = store.load().await.preceptor;
            if preceptor.name.is_empty() {
                println!("No preceptor profile yet. Use `preceptor set` to create one.");
            } else {
                println!("{}, {}", preceptor.name, preceptor.title);
                println!("{} ({})", preceptor.institution, preceptor.specialty);
                println!("{}", preceptor.email);
            }
        }
        PreceptorCommand::Set {
            name,
            title,
            institution,
            specialty,
            email,
        } => {
            store
                .replace_preceptor(PreceptorProfile {
                    name,
                    title,
                    institution,
                    specialty,
                    email,
                })
                .await?;
            println!("Preceptor profile saved.");
        }
    }
    Ok(())
}

async fn run_student(store: &Store, action: StudentCommand) -> anyhow::Result<()> {
    match action {
        StudentCommand::List => {
            let data = store.load().await;
            if data.students.is_empty() {
                println!("No students yet.");
                return Ok(());
            }
            for student in &data.students {
                let sessions = data
                    .evaluations
                    .iter()
                    .filter(|e| e.student_id == student.id)
                    .count();
                println!(
                    "- {} {} ({}, {} {}) {} sessions",
                    student.id,
                    student.name,
                    student.email,
                    student.program,
                    student.year_level,
                    sessions
                );
            }
        }
        StudentCommand::Add {
            name,
            email,
            program,
            year_level,
            start_date,
            photo,
        } => {
            let id = Uuid::new_v4().to_string();
            store
                .add_student(StudentProfile {
                    id: id.clone(),
                    name,
                    email,
                    program,
                    year_level,
                    start_date: start_date.map(|d| d.to_string()).unwrap_or_default(),
                    photo,
                    clinical_skill_scores: Vec::new(),
                })
                .await?;
            println!("Added student {id}.");
        }
        StudentCommand::Update {
            id,
            name,
            email,
            program,
            year_level,
            start_date,
            photo,
        } => {
            let data = store.load().await;
            let Some(mut student) = data.student(&id).cloned() else {
                println!("No student with id {id}, nothing updated.");
                return Ok(());
            };
            if let Some(name) = name {
                student.name = name;
            }
            if let Some(email) = email {
                student.email = email;
            }
            if let Some(program) = program {
                student.program = program;
            }
            if let Some(year_level) = year_level {
                student.year_level = year_level;
            }
            if let Some(start_date) = start_date {
                student.start_date = start_date.to_string();
            }
            if photo.is_some() {
                student.photo = photo;
            }
            store.update_student(student).await?;
            println!("Updated student {id}.");
        }
        StudentCommand::Delete { id } => {
            let removed = store.delete_student(&id).await?;
            println!("Deleted student {id} and {removed} evaluations.");
        }
        StudentCommand::Skill { id, skill, rating } => {
            if taxonomy::skill_behavior(&skill).is_none() {
                bail!("unknown clinical skill behavior {skill}");
            }
            let data = store.load().await;
            let Some(mut student) = data.student(&id).cloned() else {
                bail!("no student with id {id}");
            };
            student.set_skill(&skill, rating, Utc::now().date_naive());
            store.update_student(student).await?;
            println!("Recorded {skill} for student {id}.");
        }
    }
    Ok(())
}

async fn run_eval(store: &Store, action: EvalCommand) -> anyhow::Result<()> {
    match action {
        EvalCommand::List {
            student,
            phase,
            sort,
        } => {
            let data = store.load().await;
            let filter = EvaluationFilter {
                student_id: student,
                phase,
                sort,
            };
            let evaluations = progress::filter_evaluations(&data.evaluations, &filter);
            if evaluations.is_empty() {
                println!("No evaluations match.");
                return Ok(());
            }
            for evaluation in evaluations {
                println!(
                    "- {} {} W{} [{}] {} ({}): avg {:.1}, overall {}",
                    evaluation.id,
                    evaluation.date,
                    evaluation.week_number,
                    evaluation.derived_phase(),
                    data.student_name(&evaluation.student_id),
                    evaluation.session_type,
                    evaluation.scores.mean(),
                    taxonomy::rating_label(evaluation.overall_rating)
                );
            }
        }
        EvalCommand::Add {
            student,
            week,
            fields,
        } => {
            let data = store.load().await;
            if data.student(&student).is_none() {
                bail!("no student with id {student}");
            }
            let now = Utc::now();
            let id = Uuid::new_v4().to_string();
            let mut evaluation = SessionEvaluation::new(id, student, now.date_naive(), week, now);
            fields.apply(&mut evaluation)?;
            print_firsts(&data, &evaluation);
            let id = evaluation.id.clone();
            store.add_evaluation(evaluation).await?;
            println!("Added evaluation {id} (week {week}, {} phase).", Phase::for_week(week));
        }
        EvalCommand::Update {
            id,
            student,
            week,
            fields,
        } => {
            let data = store.load().await;
            let Some(mut evaluation) = data.evaluation(&id).cloned() else {
                println!("No evaluation with id {id}, nothing updated.");
                return Ok(());
            };
            if let Some(student) = student {
                evaluation.student_id = student;
            }
            if let Some(week) = week {
                evaluation.week_number = week;
            }
            fields.apply(&mut evaluation)?;
            evaluation.updated_at = Utc::now();
            print_firsts(&data, &evaluation);
            store.update_evaluation(evaluation).await?;
            println!("Updated evaluation {id}.");
        }
        EvalCommand::Delete { id } => {
            store.delete_evaluation(&id).await?;
            println!("Deleted evaluation {id}.");
        }
    }
    Ok(())
}

/// Lists what this session adds beyond the student's other sessions.
fn print_firsts(data: &AppData, evaluation: &SessionEvaluation) {
    let student_id = evaluation.student_id.as_str();
    let exclude = Some(evaluation.id.as_str());

    let seen = progress::previous_conditions(&data.evaluations, student_id, exclude);
    let new_conditions: Vec<&str> = evaluation
        .conditions_seen
        .iter()
        .chain(&evaluation.custom_conditions)
        .filter(|c| !seen.contains(*c))
        .map(String::as_str)
        .collect();
    if !new_conditions.is_empty() {
        println!("First time seeing: {}", new_conditions.join(", "));
    }

    let achieved = progress::previous_objectives(&data.evaluations, student_id, exclude);
    for id in evaluation
        .objectives_achieved
        .iter()
        .filter_map(ObjectiveRef::expectation)
        .filter(|id| !achieved.contains(*id))
    {
        let text = taxonomy::expectation_text(id).unwrap_or("");
        println!("First achieved {id}: {text}");
    }
}

fn print_guide() {
    println!("Score categories (--scores order):");
    for category in ScoreCategory::ALL {
        println!(
            "- {} [{}]: {}",
            category.label(),
            category.key(),
            category.description()
        );
    }

    println!();
    println!("Ratings:");
    for value in Rating::MIN..=Rating::MAX {
        if let Ok(rating) = Rating::new(value) {
            println!("- {value}: {}", taxonomy::rating_label(rating));
        }
    }

    println!();
    println!("Phases:");
    for phase in Phase::ALL {
        println!(
            "- {} ({}): {}",
            taxonomy::phase_label(phase),
            phase,
            taxonomy::phase_weeks(phase)
        );
    }

    println!();
    println!("Session types: {}", taxonomy::SESSION_TYPES.join(", "));

    println!();
    println!("Conditions ({}):", taxonomy::total_conditions());
    for group in taxonomy::CONDITION_CATALOG {
        println!("- {}: {}", group.category, group.conditions.join(", "));
    }

    println!();
    println!("Teaching topics:");
    for category in taxonomy::TEACHING_TOPIC_CATALOG {
        println!("- {}: {}", category.category, category.topics.join(", "));
    }

    println!();
    println!("Clinical objectives ({} expectations):", taxonomy::total_expectations());
    for objective in taxonomy::OBJECTIVES {
        println!("Outcome {}: {}", objective.id, objective.outcome);
        for phase in [ExpectationPhase::Middle, ExpectationPhase::Final] {
            for (index, text) in objective.expectations(phase).iter().enumerate() {
                let id = ExpectationId::new(objective.id, phase, index);
                println!("  {id}: {text}");
            }
        }
    }

    println!();
    println!("Clinical skills:");
    for skill in taxonomy::CLINICAL_SKILLS {
        println!("{} ({}):", skill.title, skill.category);
        for behavior in skill
            .minimal_expectations
            .iter()
            .chain(skill.exemplary_behaviors)
        {
            println!("  {}: {}", behavior.id, behavior.description);
        }
    }
}
