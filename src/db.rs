use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{debug, info, warn};

use crate::error::{Result, TrackerError};
use crate::models::{
    AppData, EvaluationScores, ExpectationId, ObjectiveRef, PreceptorProfile, Rating,
    SessionEvaluation, SkillRating, StudentProfile,
};

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await
        .with_context(|| format!("failed to open evaluation database at {database_url}"))
}

pub async fn init_db(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Parses export text into a document.
pub fn parse_snapshot(text: &str) -> Result<AppData> {
    serde_json::from_str(text).map_err(TrackerError::ImportParse)
}

/// Pretty-printed form used for export and file transfer.
pub fn render_snapshot(data: &AppData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Owns the evaluation document stored under one key of the `app_state` table.
///
/// Every mutation reads the whole document, changes one collection and writes
/// the whole document back. There is a single writer, so the last write wins.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
    key: String,
}

impl Store {
    pub fn new(pool: SqlitePool, key: impl Into<String>) -> Self {
        Store {
            pool,
            key: key.into(),
        }
    }

    /// Returns the stored document, or an empty one when the slot is missing or unreadable.
    pub async fn load(&self) -> AppData {
        match self.read_document().await {
            Ok(data) => data,
            Err(err) => {
                warn!(key = %self.key, error = %err, "could not read stored evaluations, starting empty");
                AppData::default()
            }
        }
    }

    pub async fn save(&self, data: &AppData) -> Result<()> {
        let value = serde_json::to_string(data)?;
        sqlx::query(
            r#"
            INSERT INTO app_state (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&self.key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(
            students = data.students.len(),
            evaluations = data.evaluations.len(),
            "saved evaluation document"
        );
        Ok(())
    }

    /// Stored document for a read-modify-write. Database failures propagate;
    /// undecodable or unparsable bytes yield the empty document.
    async fn read_document(&self) -> Result<AppData> {
        let row = sqlx::query("SELECT value FROM app_state WHERE key = ?")
            .bind(&self.key)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(AppData::default());
        };

        let raw: String = match row.try_get("value") {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key = %self.key, error = %err, "stored evaluations are not text, starting empty");
                return Ok(AppData::default());
            }
        };

        match serde_json::from_str(&raw) {
            Ok(data) => Ok(data),
            Err(err) => {
                warn!(key = %self.key, error = %err, "stored evaluations are corrupt, starting empty");
                Ok(AppData::default())
            }
        }
    }

    async fn apply<F>(&self, change: F) -> Result<AppData>
    where
        F: FnOnce(&mut AppData),
    {
        let mut data = self.read_document().await?;
        change(&mut data);
        self.save(&data).await?;
        Ok(data)
    }

    pub async fn replace_preceptor(&self, profile: PreceptorProfile) -> Result<AppData> {
        self.apply(|data| data.preceptor = profile).await
    }

    pub async fn add_student(&self, student: StudentProfile) -> Result<AppData> {
        info!(student_id = %student.id, "adding student");
        self.apply(|data| data.students.push(student)).await
    }

    /// Replaces the student with the same id; unknown ids leave the document as is.
    pub async fn update_student(&self, student: StudentProfile) -> Result<AppData> {
        self.apply(|data| {
            match data.students.iter_mut().find(|s| s.id == student.id) {
                Some(slot) => *slot = student,
                None => debug!(student_id = %student.id, "update skipped, no such student"),
            }
        })
        .await
    }

    /// Removes the student and every evaluation that references it.
    /// Returns how many evaluations went with it.
    pub async fn delete_student(&self, student_id: &str) -> Result<usize> {
        let mut removed = 0;
        self.apply(|data| {
            let before = data.evaluations.len();
            data.students.retain(|s| s.id != student_id);
            data.evaluations.retain(|e| e.student_id != student_id);
            removed = before - data.evaluations.len();
        })
        .await?;
        info!(student_id, evaluations_removed = removed, "deleted student");
        Ok(removed)
    }

    pub async fn add_evaluation(&self, mut evaluation: SessionEvaluation) -> Result<AppData> {
        evaluation.phase = evaluation.derived_phase();
        info!(evaluation_id = %evaluation.id, phase = %evaluation.phase, "adding evaluation");
        self.apply(|data| data.evaluations.push(evaluation)).await
    }

    pub async fn update_evaluation(&self, mut evaluation: SessionEvaluation) -> Result<AppData> {
        evaluation.phase = evaluation.derived_phase();
        self.apply(|data| {
            match data.evaluations.iter_mut().find(|e| e.id == evaluation.id) {
                Some(slot) => *slot = evaluation,
                None => debug!(evaluation_id = %evaluation.id, "update skipped, no such evaluation"),
            }
        })
        .await
    }

    pub async fn delete_evaluation(&self, evaluation_id: &str) -> Result<AppData> {
        self.apply(|data| data.evaluations.retain(|e| e.id != evaluation_id))
            .await
    }

    pub async fn export_snapshot(&self) -> Result<String> {
        let data = self.load().await;
        info!(
            students = data.students.len(),
            evaluations = data.evaluations.len(),
            "exporting evaluation document"
        );
        render_snapshot(&data)
    }

    /// Replaces the stored document with `text`. Nothing is written when parsing fails.
    pub async fn import_snapshot(&self, text: &str) -> Result<AppData> {
        let data = parse_snapshot(text)?;
        self.save(&data).await?;
        info!(
            students = data.students.len(),
            evaluations = data.evaluations.len(),
            "imported evaluation document"
        );
        Ok(data)
    }

    /// Loads a sample rotation when the document has no students yet.
    pub async fn seed(&self) -> anyhow::Result<bool> {
        let mut data = self.read_document().await?;
        if !data.students.is_empty() {
            return Ok(false);
        }

        data.preceptor = PreceptorProfile {
            name: "Morgan Reyes".to_string(),
            title: "MD, FACP".to_string(),
            institution: "Riverside Community Clinic".to_string(),
            specialty: "Internal Medicine".to_string(),
            email: "morgan.reyes@riverside.example.org".to_string(),
        };

        let students = [
            (
                "3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2",
                "Avery Lee",
                "avery.lee@med.example.edu",
                "MD",
                "MS3",
                "2026-01-05",
            ),
            (
                "0c22f1f1-9184-4fd4-9b21-28c68a6a89dc",
                "Jules Moreno",
                "jules.moreno@med.example.edu",
                "DO",
                "MS4",
                "2026-01-05",
            ),
        ];
        for (id, name, email, program, year_level, start_date) in students {
            data.students.push(StudentProfile {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                program: program.to_string(),
                year_level: year_level.to_string(),
                start_date: start_date.to_string(),
                photo: None,
                clinical_skill_scores: Vec::new(),
            });
        }
        let avery = students[0].0;
        let jules = students[1].0;
        let seed_date = NaiveDate::from_ymd_opt(2026, 1, 5).context("invalid date")?;
        data.students[0].set_skill("prof-min-d", SkillRating::Demonstrating, seed_date);
        data.students[0].set_skill("ebm-min-a", SkillRating::NotYet, seed_date);

        let now = Utc::now();
        let mut first = seeded_evaluation(
            "seed-001", avery, (2026, 1, 12), 2, [2, 2, 3, 4, 2, 2, 3, 3], 2, now,
        )?;
        first.conditions_seen = vec!["Hypertension".to_string(), "Diabetes".to_string()];
        first.add_topic("Cardiovascular", "Hypertension");
        first.strengths = "Warm rapport with patients".to_string();
        first.areas_for_improvement = "Organize the history of present illness".to_string();

        let mut second = seeded_evaluation(
            "seed-002", avery, (2026, 3, 9), 10, [3, 3, 3, 4, 3, 3, 3, 3], 3, now,
        )?;
        second.conditions_seen = vec!["COPD".to_string(), "Hypertension".to_string()];
        second.custom_conditions = vec!["Frostbite".to_string()];
        second.add_topic("Pulmonary/Respiratory", "COPD");
        second.objectives_achieved = vec![ObjectiveRef::Legacy(0)];

        let mut third = seeded_evaluation(
            "seed-003", avery, (2026, 5, 4), 18, [4, 3, 4, 4, 3, 4, 4, 4], 4, now,
        )?;
        third.conditions_seen = vec!["CHF".to_string(), "Syncope".to_string()];
        third.add_topic("Cardiovascular", "Heart failure");
        third.objectives_achieved = vec![
            expectation("1-middle-a")?,
            expectation("2-middle-a")?,
        ];

        let mut fourth = seeded_evaluation(
            "seed-004", avery, (2026, 8, 17), 33, [5, 4, 4, 5, 4, 4, 5, 4], 5, now,
        )?;
        fourth.conditions_seen = vec!["Headache".to_string(), "Depression".to_string()];
        fourth.add_topic("Neurology", "Headache");
        fourth.add_topic("Psychiatry/Behavioral Health", "Depression");
        fourth.objectives_achieved = vec![
            expectation("1-middle-a")?,
            expectation("1-final-a")?,
            expectation("3-final-c")?,
        ];

        let mut fifth = seeded_evaluation(
            "seed-005", jules, (2026, 2, 2), 5, [3, 3, 4, 4, 3, 3, 4, 3], 3, now,
        )?;
        fifth.session_type = "Hospital Rounds".to_string();
        fifth.patient_encounters = 4;
        fifth.conditions_seen = vec!["Pneumonia".to_string()];

        for evaluation in [first, second, third, fourth, fifth] {
            data.evaluations.push(evaluation);
        }

        self.save(&data).await?;
        info!(
            students = data.students.len(),
            evaluations = data.evaluations.len(),
            "seeded sample rotation"
        );
        Ok(true)
    }
}

fn seeded_evaluation(
    id: &str,
    student_id: &str,
    (year, month, day): (i32, u32, u32),
    week_number: u32,
    scores: [u8; 8],
    overall: u8,
    now: DateTime<Utc>,
) -> anyhow::Result<SessionEvaluation> {
    let date = NaiveDate::from_ymd_opt(year, month, day).context("invalid date")?;
    let mut ratings = [Rating::default(); 8];
    for (slot, value) in ratings.iter_mut().zip(scores) {
        *slot = Rating::new(value)?;
    }

    let mut evaluation = SessionEvaluation::new(id, student_id, date, week_number, now);
    evaluation.patient_encounters = 3;
    evaluation.scores = EvaluationScores::from_ordered(ratings);
    evaluation.overall_rating = Rating::new(overall)?;
    Ok(evaluation)
}

fn expectation(raw: &str) -> anyhow::Result<ObjectiveRef> {
    let id: ExpectationId = raw.parse().map_err(anyhow::Error::msg)?;
    Ok(id.into())
}

/// Store over a private in-memory database, for tests.
#[cfg(test)]
pub(crate) async fn memory_store(key: &str) -> Store {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    init_db(&pool).await.expect("migrations");
    Store::new(pool, key)
}
