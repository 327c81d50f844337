use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::models::{
    AppData, ObjectiveRef, Phase, ScoreCategory, SessionEvaluation, SkillRating,
};
use crate::progress::{self, CategoryAverages, ConditionCoverage, TopicCoverage};
use crate::taxonomy;

pub fn build_dashboard_report(data: &AppData) -> String {
    let summary = progress::dashboard_summary(data);
    let mut output = String::new();

    let preceptor = if data.preceptor.name.is_empty() {
        "unnamed preceptor".to_string()
    } else {
        format!("Dr. {}", data.preceptor.name)
    };

    let _ = writeln!(output, "# Preceptor Evaluation Dashboard");
    if data.preceptor.institution.is_empty() {
        let _ = writeln!(output, "Generated for {}", preceptor);
    } else {
        let _ = writeln!(
            output,
            "Generated for {} ({}, {})",
            preceptor, data.preceptor.institution, data.preceptor.specialty
        );
    }
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "{} students, {} evaluations, {} weeks logged, average overall rating {}",
        summary.students,
        summary.evaluations,
        summary.weeks_logged,
        summary
            .averages
            .as_ref()
            .map(|a| format!("{:.1}", a.overall_rating))
            .unwrap_or_else(|| "-".to_string())
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Phase Mix");
    for (phase, count) in &summary.phase_counts {
        let _ = writeln!(
            output,
            "- {} ({}): {} sessions",
            taxonomy::phase_label(*phase),
            taxonomy::phase_weeks(*phase),
            count
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Category Averages");
    write_averages(&mut output, summary.averages.as_ref());

    let _ = writeln!(output);
    write_conditions(&mut output, &summary.conditions);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Clinical Objectives");
    let _ = writeln!(
        output,
        "{} of {} expectations achieved ({:.0}%)",
        summary.objectives.achieved.len(),
        summary.objectives.total,
        summary.objectives.ratio * 100.0
    );

    let _ = writeln!(output);
    write_topics(&mut output, &summary.topics, summary.evaluations);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Sessions");
    if summary.recent.is_empty() {
        let _ = writeln!(output, "No evaluations recorded yet.");
    } else {
        for evaluation in &summary.recent {
            let _ = writeln!(
                output,
                "- {} week {} ({}): {} with overall {}",
                evaluation.date,
                evaluation.week_number,
                evaluation.session_type,
                data.student_name(&evaluation.student_id),
                taxonomy::rating_label(evaluation.overall_rating)
            );
        }
    }

    output
}

pub fn build_student_report(data: &AppData, student_id: &str) -> anyhow::Result<String> {
    let student = data
        .student(student_id)
        .with_context(|| format!("no student with id {student_id}"))?;
    let timeline = progress::student_timeline(&data.evaluations, student_id);
    let mut output = String::new();

    let _ = writeln!(output, "# Progress Report: {}", student.name);
    let _ = writeln!(
        output,
        "{} {}, started {} ({} sessions recorded)",
        student.program,
        student.year_level,
        if student.start_date.is_empty() {
            "-"
        } else {
            student.start_date.as_str()
        },
        timeline.len()
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Trend");
    match progress::trend(timeline.iter().copied()) {
        Some(trend) => {
            let _ = writeln!(
                output,
                "{}{:.2} average score change, from {:.1} to {:.1} across {} sessions",
                if trend.delta > 0.0 { "+" } else { "" },
                trend.delta,
                trend.first_mean,
                trend.last_mean,
                trend.sessions
            );
        }
        None => {
            let _ = writeln!(output, "At least two sessions are needed to show a trend.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Phase Comparison");
    for summary in progress::phase_breakdown(timeline.iter().copied()) {
        let _ = writeln!(
            output,
            "### {} ({}), {} sessions",
            taxonomy::phase_label(summary.phase),
            taxonomy::phase_weeks(summary.phase),
            summary.sessions
        );
        if summary.averages.is_some() {
            write_averages(&mut output, summary.averages.as_ref());
        } else {
            let _ = writeln!(output, "No evaluations in this phase yet.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Week by Week");
    if timeline.is_empty() {
        let _ = writeln!(output, "No evaluations recorded yet.");
    } else {
        for evaluation in &timeline {
            let scores: Vec<String> = ScoreCategory::ALL
                .iter()
                .map(|c| evaluation.scores.get(*c).to_string())
                .collect();
            let _ = writeln!(
                output,
                "- W{} {} [{}] scores {} overall {}",
                evaluation.week_number,
                evaluation.date,
                evaluation.derived_phase(),
                scores.join("/"),
                evaluation.overall_rating
            );
        }
    }

    let _ = writeln!(output);
    write_conditions(&mut output, &progress::condition_coverage(timeline.iter().copied()));

    let _ = writeln!(output);
    let coverage = progress::objective_coverage(timeline.iter().copied());
    let first = progress::first_achieved(timeline.iter().copied());
    let _ = writeln!(output, "## Clinical Objectives");
    let _ = writeln!(
        output,
        "{} of {} expectations achieved ({:.0}%)",
        coverage.achieved.len(),
        coverage.total,
        coverage.ratio * 100.0
    );
    for objective in &coverage.per_objective {
        if objective.achieved == 0 {
            continue;
        }
        let _ = writeln!(
            output,
            "- Outcome {}: {} ({}/{})",
            objective.objective_id, objective.outcome, objective.achieved, objective.total
        );
    }
    for (id, record) in &first {
        if let Some(text) = taxonomy::expectation_text(id) {
            let _ = writeln!(output, "  - {} first achieved {}: {}", id, record.date, text);
        }
    }
    let legacy: BTreeSet<&str> = timeline
        .iter()
        .flat_map(|e| e.objectives_achieved.iter())
        .filter_map(|objective| match objective {
            ObjectiveRef::Legacy(index) => {
                taxonomy::LEGACY_OBJECTIVES.get(*index as usize).copied()
            }
            _ => None,
        })
        .collect();
    if !legacy.is_empty() {
        let _ = writeln!(output, "Earlier objective list:");
        for text in legacy {
            let _ = writeln!(output, "- {text}");
        }
    }

    let _ = writeln!(output);
    write_topics(
        &mut output,
        &progress::topic_coverage(timeline.iter().copied()),
        timeline.len(),
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Clinical Skills");
    if student.clinical_skill_scores.is_empty() {
        let _ = writeln!(output, "No clinical skills rated yet.");
    } else {
        for score in &student.clinical_skill_scores {
            let description = taxonomy::skill_behavior(&score.skill_id)
                .map(|(_, behavior)| behavior.description)
                .unwrap_or("unknown behavior");
            let rating = match score.rating {
                SkillRating::Demonstrating => "demonstrating",
                SkillRating::NotYet => "not yet",
            };
            let _ = writeln!(
                output,
                "- {} ({}, {}): {}",
                score.skill_id, rating, score.date, description
            );
        }
    }

    Ok(output)
}

fn write_averages(output: &mut String, averages: Option<&CategoryAverages>) {
    let Some(averages) = averages else {
        let _ = writeln!(output, "No evaluations recorded yet.");
        return;
    };
    for category in ScoreCategory::ALL {
        let _ = writeln!(output, "- {}: {:.1}", category.label(), averages.get(category));
    }
    let _ = writeln!(output, "- Overall rating: {:.1}", averages.overall_rating);
}

fn write_conditions(output: &mut String, coverage: &ConditionCoverage) {
    let _ = writeln!(output, "## Conditions Seen");
    let _ = writeln!(
        output,
        "{} of {} catalog conditions ({:.0}%)",
        coverage.matched.len(),
        coverage.total,
        coverage.ratio * 100.0
    );
    if !coverage.matched.is_empty() {
        let matched: Vec<&str> = coverage.matched.iter().copied().collect();
        let _ = writeln!(output, "- Catalog: {}", matched.join(", "));
    }
    if !coverage.custom.is_empty() {
        let custom: Vec<&str> = coverage.custom.iter().map(String::as_str).collect();
        let _ = writeln!(output, "- Other: {}", custom.join(", "));
    }
}

fn write_topics(output: &mut String, topics: &[TopicCoverage], sessions: usize) {
    let _ = writeln!(output, "## Teaching Topics");
    if topics.is_empty() {
        let _ = writeln!(output, "No teaching topics recorded yet.");
        return;
    }
    for coverage in topics {
        let names: Vec<&str> = coverage.topics.iter().map(String::as_str).collect();
        let _ = writeln!(
            output,
            "- {}: {} of {} sessions ({})",
            coverage.category,
            coverage.sessions,
            sessions,
            names.join(", ")
        );
    }
}

#[derive(Debug, Serialize)]
struct TimelineRow<'a> {
    week: u32,
    date: String,
    phase: Phase,
    session_type: &'a str,
    patient_encounters: u32,
    clinical_knowledge: u8,
    clinical_reasoning: u8,
    patient_communication: u8,
    professional_behavior: u8,
    technical_skills: u8,
    documentation: u8,
    teamwork: u8,
    initiative: u8,
    overall: u8,
}

impl<'a> From<&'a SessionEvaluation> for TimelineRow<'a> {
    fn from(e: &'a SessionEvaluation) -> Self {
        TimelineRow {
            week: e.week_number,
            date: e.date.to_string(),
            phase: e.derived_phase(),
            session_type: &e.session_type,
            patient_encounters: e.patient_encounters,
            clinical_knowledge: e.scores.clinical_knowledge.value(),
            clinical_reasoning: e.scores.clinical_reasoning.value(),
            patient_communication: e.scores.patient_communication.value(),
            professional_behavior: e.scores.professional_behavior.value(),
            technical_skills: e.scores.technical_skills.value(),
            documentation: e.scores.documentation.value(),
            teamwork: e.scores.teamwork.value(),
            initiative: e.scores.initiative.value(),
            overall: e.overall_rating.value(),
        }
    }
}

/// Writes one CSV row per session, in timeline order.
pub fn write_timeline_csv(path: &Path, timeline: &[&SessionEvaluation]) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for evaluation in timeline {
        writer.serialize(TimelineRow::from(*evaluation))?;
    }
    writer.flush()?;
    Ok(timeline.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EvaluationScores, PreceptorProfile, Rating, StudentProfile};
    use chrono::{NaiveDate, Utc};

    fn sample_data() -> AppData {
        let mut data = AppData {
            preceptor: PreceptorProfile {
                name: "Morgan Reyes".to_string(),
                institution: "Riverside Community Clinic".to_string(),
                specialty: "Internal Medicine".to_string(),
                ..PreceptorProfile::default()
            },
            ..AppData::default()
        };
        data.students.push(StudentProfile {
            id: "s1".to_string(),
            name: "Avery Lee".to_string(),
            email: "avery@example.com".to_string(),
            program: "MD".to_string(),
            year_level: "MS3".to_string(),
            start_date: "2024-01-02".to_string(),
            photo: None,
            clinical_skill_scores: Vec::new(),
        });

        for (id, date, week, score) in [("e1", "2024-01-10", 1, 2), ("e2", "2024-05-20", 20, 4)] {
            let date: NaiveDate = date.parse().unwrap();
            let mut e = SessionEvaluation::new(id, "s1", date, week, Utc::now());
            e.scores = EvaluationScores::uniform(Rating::new(score).unwrap());
            e.conditions_seen = vec!["COPD".to_string()];
            data.evaluations.push(e);
        }
        data
    }

    #[test]
    fn dashboard_report_handles_empty_document() {
        let report = build_dashboard_report(&AppData::default());
        assert!(report.contains("Generated for unnamed preceptor"));
        assert!(report.contains("0 students, 0 evaluations, 0 weeks logged, average overall rating -"));
        assert!(report.contains("No teaching topics recorded yet."));
        assert!(report.contains("No evaluations recorded yet."));
    }

    #[test]
    fn dashboard_report_summarizes_sessions() {
        let report = build_dashboard_report(&sample_data());
        assert!(report.contains("Dr. Morgan Reyes (Riverside Community Clinic, Internal Medicine)"));
        assert!(report.contains("1 students, 2 evaluations, 2 weeks logged"));
        assert!(report.contains("- Early Phase (Weeks 1-12): 1 sessions"));
        assert!(report.contains("1 of 56 catalog conditions (2%)"));
        assert!(report.contains("- 2024-05-20 week 20 (Clinic Day): Avery Lee"));
    }

    #[test]
    fn student_report_shows_trend_and_phases() {
        let report = build_student_report(&sample_data(), "s1").unwrap();
        assert!(report.contains("# Progress Report: Avery Lee"));
        assert!(report.contains("+2.00 average score change, from 2.0 to 4.0 across 2 sessions"));
        assert!(report.contains("### Final Phase (Weeks 31-52), 0 sessions"));
        assert!(report.contains("No evaluations in this phase yet."));
        assert!(report.contains("No clinical skills rated yet."));
    }

    #[test]
    fn student_report_lists_legacy_objectives() {
        let mut data = sample_data();
        data.evaluations[0].objectives_achieved =
            vec![ObjectiveRef::Legacy(1), ObjectiveRef::parse("2-middle-a")];
        let report = build_student_report(&data, "s1").unwrap();
        assert!(report.contains("1 of 34 expectations achieved"));
        assert!(report.contains("Earlier objective list:"));
        assert!(report.contains("- Perform a physical examination"));
    }

    #[test]
    fn student_report_rejects_unknown_student() {
        assert!(build_student_report(&sample_data(), "nobody").is_err());
    }

    #[test]
    fn timeline_csv_has_one_row_per_session() {
        let data = sample_data();
        let timeline = progress::student_timeline(&data.evaluations, "s1");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timeline.csv");

        let rows = write_timeline_csv(&path, &timeline).unwrap();
        assert_eq!(rows, 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("week,date,phase,session_type"));
        assert_eq!(
            lines.next().unwrap(),
            "1,2024-01-10,early,Clinic Day,0,2,2,2,2,2,2,2,2,3"
        );
        assert!(lines.next().unwrap().starts_with("20,2024-05-20,middle,"));
    }
}
