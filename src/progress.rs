//! Derived views over evaluation records.
//!
//! Everything here is a pure function of its inputs. Empty inputs produce a
//! defined "no data" value (`None`, zero counts, a 0.0 ratio), never NaN.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::str::FromStr;

use chrono::NaiveDate;

use crate::models::{AppData, ExpectationId, ObjectiveRef, Phase, ScoreCategory, SessionEvaluation};
use crate::taxonomy;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAverages {
    pub sessions: usize,
    pub categories: BTreeMap<ScoreCategory, f64>,
    pub overall_rating: f64,
}

impl CategoryAverages {
    pub fn get(&self, category: ScoreCategory) -> f64 {
        self.categories.get(&category).copied().unwrap_or(0.0)
    }
}

/// Per-category arithmetic means, unrounded. `None` when there is nothing to average.
pub fn category_averages<'a, I>(evaluations: I) -> Option<CategoryAverages>
where
    I: IntoIterator<Item = &'a SessionEvaluation>,
{
    let mut totals = [0u32; 8];
    let mut overall_total = 0u32;
    let mut sessions = 0usize;

    for evaluation in evaluations {
        for (total, category) in totals.iter_mut().zip(ScoreCategory::ALL) {
            *total += u32::from(evaluation.scores.get(category).value());
        }
        overall_total += u32::from(evaluation.overall_rating.value());
        sessions += 1;
    }

    if sessions == 0 {
        return None;
    }

    let count = sessions as f64;
    let categories = ScoreCategory::ALL
        .into_iter()
        .zip(totals)
        .map(|(category, total)| (category, total as f64 / count))
        .collect();

    Some(CategoryAverages {
        sessions,
        categories,
        overall_rating: overall_total as f64 / count,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSummary {
    pub phase: Phase,
    pub sessions: usize,
    pub averages: Option<CategoryAverages>,
}

/// Buckets evaluations into early/middle/final by week number.
pub fn phase_breakdown<'a, I>(evaluations: I) -> Vec<PhaseSummary>
where
    I: IntoIterator<Item = &'a SessionEvaluation>,
{
    let evaluations: Vec<&SessionEvaluation> = evaluations.into_iter().collect();

    Phase::ALL
        .into_iter()
        .map(|phase| {
            let bucket: Vec<&SessionEvaluation> = evaluations
                .iter()
                .copied()
                .filter(|e| e.derived_phase() == phase)
                .collect();
            PhaseSummary {
                phase,
                sessions: bucket.len(),
                averages: category_averages(bucket),
            }
        })
        .collect()
}

/// One student's evaluations ordered by week; equal weeks keep insertion order.
pub fn student_timeline<'a, I>(evaluations: I, student_id: &str) -> Vec<&'a SessionEvaluation>
where
    I: IntoIterator<Item = &'a SessionEvaluation>,
{
    let mut timeline: Vec<&SessionEvaluation> = evaluations
        .into_iter()
        .filter(|e| e.student_id == student_id)
        .collect();
    timeline.sort_by_key(|e| e.week_number);
    timeline
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSummary {
    pub first_mean: f64,
    pub last_mean: f64,
    pub delta: f64,
    pub sessions: usize,
}

/// Change in mean score between the first and last session by week.
/// Needs at least two sessions.
pub fn trend<'a, I>(evaluations: I) -> Option<TrendSummary>
where
    I: IntoIterator<Item = &'a SessionEvaluation>,
{
    let mut ordered: Vec<&SessionEvaluation> = evaluations.into_iter().collect();
    if ordered.len() < 2 {
        return None;
    }
    ordered.sort_by_key(|e| e.week_number);

    let first_mean = ordered.first()?.scores.mean();
    let last_mean = ordered.last()?.scores.mean();
    Some(TrendSummary {
        first_mean,
        last_mean,
        delta: last_mean - first_mean,
        sessions: ordered.len(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionCoverage {
    /// Catalog entries seen at least once, in canonical spelling.
    pub matched: BTreeSet<&'static str>,
    /// Entries that match nothing in the catalog.
    pub custom: BTreeSet<String>,
    pub total: usize,
    pub ratio: f64,
}

/// Conditions seen against the fixed catalog.
///
/// Seen and custom entries both count toward `matched` when they name a
/// catalog condition; the denominator is always the catalog size.
pub fn condition_coverage<'a, I>(evaluations: I) -> ConditionCoverage
where
    I: IntoIterator<Item = &'a SessionEvaluation>,
{
    let mut matched = BTreeSet::new();
    let mut custom = BTreeSet::new();

    for evaluation in evaluations {
        for name in evaluation
            .conditions_seen
            .iter()
            .chain(evaluation.custom_conditions.iter())
        {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            match taxonomy::catalog_condition(name) {
                Some(canonical) => {
                    matched.insert(canonical);
                }
                None => {
                    custom.insert(name.to_string());
                }
            }
        }
    }

    let total = taxonomy::total_conditions();
    let ratio = bounded_ratio(matched.len(), total);
    ConditionCoverage {
        matched,
        custom,
        total,
        ratio,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveProgress {
    pub objective_id: &'static str,
    pub outcome: &'static str,
    pub achieved: usize,
    pub total: usize,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveCoverage {
    pub achieved: BTreeSet<ExpectationId>,
    pub total: usize,
    pub ratio: f64,
    pub per_objective: Vec<ObjectiveProgress>,
}

/// Expectations achieved against the versioned objectives.
/// Legacy indices and ids unknown to the taxonomy do not count.
pub fn objective_coverage<'a, I>(evaluations: I) -> ObjectiveCoverage
where
    I: IntoIterator<Item = &'a SessionEvaluation>,
{
    let achieved: BTreeSet<ExpectationId> = evaluations
        .into_iter()
        .flat_map(|e| e.objectives_achieved.iter())
        .filter_map(ObjectiveRef::expectation)
        .filter(|id| taxonomy::expectation_text(id).is_some())
        .cloned()
        .collect();

    let per_objective = taxonomy::OBJECTIVES
        .iter()
        .map(|objective| {
            let total = objective.expectation_count();
            let done = objective
                .expectation_ids()
                .filter(|id| achieved.contains(id))
                .count();
            ObjectiveProgress {
                objective_id: objective.id,
                outcome: objective.outcome,
                achieved: done,
                total,
                ratio: bounded_ratio(done, total),
            }
        })
        .collect();

    let total = taxonomy::total_expectations();
    let ratio = bounded_ratio(achieved.len(), total);
    ObjectiveCoverage {
        achieved,
        total,
        ratio,
        per_objective,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstAchieved {
    pub date: NaiveDate,
    pub evaluation_id: String,
}

/// Earliest evaluation achieving each expectation. Same-day ties go to the
/// smaller evaluation id, so input order never matters.
pub fn first_achieved<'a, I>(evaluations: I) -> BTreeMap<ExpectationId, FirstAchieved>
where
    I: IntoIterator<Item = &'a SessionEvaluation>,
{
    let mut first: BTreeMap<ExpectationId, FirstAchieved> = BTreeMap::new();

    for evaluation in evaluations {
        let candidate = (evaluation.date, evaluation.id.as_str());
        for id in evaluation
            .objectives_achieved
            .iter()
            .filter_map(ObjectiveRef::expectation)
        {
            let replace = first.get(id).map_or(true, |existing| {
                candidate < (existing.date, existing.evaluation_id.as_str())
            });
            if replace {
                first.insert(
                    id.clone(),
                    FirstAchieved {
                        date: evaluation.date,
                        evaluation_id: evaluation.id.clone(),
                    },
                );
            }
        }
    }

    first
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCoverage {
    pub category: String,
    pub topics: BTreeSet<String>,
    /// Sessions that touched the category at all.
    pub sessions: usize,
}

/// Distinct topics per teaching category, catalog categories first.
pub fn topic_coverage<'a, I>(evaluations: I) -> Vec<TopicCoverage>
where
    I: IntoIterator<Item = &'a SessionEvaluation>,
{
    let mut by_category: BTreeMap<String, TopicCoverage> = BTreeMap::new();

    for evaluation in evaluations {
        let mut touched: HashSet<&str> = HashSet::new();
        for entry in &evaluation.teaching_topics {
            if entry.topics.is_empty() {
                continue;
            }
            let coverage = by_category
                .entry(entry.category.clone())
                .or_insert_with(|| TopicCoverage {
                    category: entry.category.clone(),
                    topics: BTreeSet::new(),
                    sessions: 0,
                });
            coverage.topics.extend(entry.topics.iter().cloned());
            if touched.insert(entry.category.as_str()) {
                coverage.sessions += 1;
            }
        }
    }

    let mut ordered = Vec::with_capacity(by_category.len());
    for category in taxonomy::TEACHING_TOPIC_CATALOG {
        if let Some(coverage) = by_category.remove(category.category) {
            ordered.push(coverage);
        }
    }
    ordered.extend(by_category.into_values());
    ordered
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary<'a> {
    pub students: usize,
    pub evaluations: usize,
    /// Distinct week numbers with at least one session.
    pub weeks_logged: usize,
    pub phase_counts: Vec<(Phase, usize)>,
    pub averages: Option<CategoryAverages>,
    pub conditions: ConditionCoverage,
    pub objectives: ObjectiveCoverage,
    pub topics: Vec<TopicCoverage>,
    pub recent: Vec<&'a SessionEvaluation>,
}

pub fn dashboard_summary(data: &AppData) -> DashboardSummary<'_> {
    let phase_counts = phase_breakdown(&data.evaluations)
        .into_iter()
        .map(|summary| (summary.phase, summary.sessions))
        .collect();

    let mut recent: Vec<&SessionEvaluation> = data.evaluations.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(5);

    DashboardSummary {
        students: data.students.len(),
        evaluations: data.evaluations.len(),
        weeks_logged: data
            .evaluations
            .iter()
            .map(|e| e.week_number)
            .collect::<BTreeSet<_>>()
            .len(),
        phase_counts,
        averages: category_averages(&data.evaluations),
        conditions: condition_coverage(&data.evaluations),
        objectives: objective_coverage(&data.evaluations),
        topics: topic_coverage(&data.evaluations),
        recent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Week,
    Rating,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortKey::Date),
            "week" => Ok(SortKey::Week),
            "rating" => Ok(SortKey::Rating),
            other => Err(format!("unknown sort key '{other}' (expected date, week or rating)")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationFilter {
    pub student_id: Option<String>,
    pub phase: Option<Phase>,
    pub sort: SortKey,
}

/// Filters then sorts newest/highest first.
pub fn filter_evaluations<'a, I>(evaluations: I, filter: &EvaluationFilter) -> Vec<&'a SessionEvaluation>
where
    I: IntoIterator<Item = &'a SessionEvaluation>,
{
    let mut selected: Vec<&SessionEvaluation> = evaluations
        .into_iter()
        .filter(|e| {
            filter
                .student_id
                .as_deref()
                .map_or(true, |id| e.student_id == id)
        })
        .filter(|e| filter.phase.map_or(true, |phase| e.derived_phase() == phase))
        .collect();

    match filter.sort {
        SortKey::Date => selected.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::Week => selected.sort_by(|a, b| b.week_number.cmp(&a.week_number)),
        SortKey::Rating => selected.sort_by(|a, b| b.overall_rating.cmp(&a.overall_rating)),
    }
    selected
}

fn other_sessions<'a, I>(
    evaluations: I,
    student_id: &'a str,
    exclude_id: Option<&'a str>,
) -> impl Iterator<Item = &'a SessionEvaluation>
where
    I: IntoIterator<Item = &'a SessionEvaluation>,
    I::IntoIter: 'a,
{
    evaluations
        .into_iter()
        .filter(move |e| e.student_id == student_id && Some(e.id.as_str()) != exclude_id)
}

/// Conditions a student already saw in sessions other than `exclude_id`.
pub fn previous_conditions<'a, I>(
    evaluations: I,
    student_id: &'a str,
    exclude_id: Option<&'a str>,
) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a SessionEvaluation>,
    I::IntoIter: 'a,
{
    other_sessions(evaluations, student_id, exclude_id)
        .flat_map(|e| e.conditions_seen.iter().chain(e.custom_conditions.iter()))
        .cloned()
        .collect()
}

/// Expectations a student already achieved in sessions other than `exclude_id`.
pub fn previous_objectives<'a, I>(
    evaluations: I,
    student_id: &'a str,
    exclude_id: Option<&'a str>,
) -> BTreeSet<ExpectationId>
where
    I: IntoIterator<Item = &'a SessionEvaluation>,
    I::IntoIter: 'a,
{
    other_sessions(evaluations, student_id, exclude_id)
        .flat_map(|e| e.objectives_achieved.iter())
        .filter_map(ObjectiveRef::expectation)
        .cloned()
        .collect()
}

fn bounded_ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EvaluationScores, Rating};
    use chrono::Utc;

    fn rating(value: u8) -> Rating {
        Rating::new(value).unwrap()
    }

    fn evaluation(id: &str, student_id: &str, date: &str, week: u32, score: u8) -> SessionEvaluation {
        let date: NaiveDate = date.parse().unwrap();
        let mut e = SessionEvaluation::new(id, student_id, date, week, Utc::now());
        e.scores = EvaluationScores::uniform(rating(score));
        e.overall_rating = rating(score);
        e
    }

    fn with_objectives(mut e: SessionEvaluation, ids: &[&str]) -> SessionEvaluation {
        e.objectives_achieved = ids.iter().map(|raw| ObjectiveRef::parse(raw)).collect();
        e
    }

    #[test]
    fn empty_inputs_yield_no_data_values() {
        let none: Vec<SessionEvaluation> = Vec::new();
        assert!(category_averages(&none).is_none());
        assert!(trend(&none).is_none());

        let conditions = condition_coverage(&none);
        assert_eq!(conditions.ratio, 0.0);
        assert!(conditions.matched.is_empty());

        let objectives = objective_coverage(&none);
        assert_eq!(objectives.ratio, 0.0);
        assert!(objectives.per_objective.iter().all(|o| o.ratio == 0.0));

        assert!(topic_coverage(&none).is_empty());
        assert!(first_achieved(&none).is_empty());
        for summary in phase_breakdown(&none) {
            assert_eq!(summary.sessions, 0);
            assert!(summary.averages.is_none());
        }
    }

    #[test]
    fn category_average_is_exact_mean() {
        let mut low = evaluation("e1", "s1", "2024-01-10", 2, 3);
        low.scores.clinical_knowledge = rating(1);
        let mut high = evaluation("e2", "s1", "2024-01-17", 3, 3);
        high.scores.clinical_knowledge = rating(5);

        let averages = category_averages([&low, &high]).unwrap();
        assert_eq!(averages.get(ScoreCategory::ClinicalKnowledge), 3.0);
        assert_eq!(averages.get(ScoreCategory::Teamwork), 3.0);
        assert_eq!(averages.sessions, 2);
        assert_eq!(averages.overall_rating, 3.0);
    }

    #[test]
    fn trend_compares_first_and_last_week() {
        let late = evaluation("e2", "s1", "2024-05-20", 20, 4);
        let early = evaluation("e1", "s1", "2024-01-10", 1, 2);

        let summary = trend([&late, &early]).unwrap();
        assert_eq!(summary.first_mean, 2.0);
        assert_eq!(summary.last_mean, 4.0);
        assert_eq!(summary.delta, 2.0);
        assert_eq!(summary.sessions, 2);

        assert!(trend([&early]).is_none());
    }

    #[test]
    fn trend_keeps_insertion_order_for_equal_weeks() {
        let a = evaluation("a", "s1", "2024-01-10", 5, 1);
        let b = evaluation("b", "s1", "2024-01-11", 5, 5);
        let summary = trend([&a, &b]).unwrap();
        assert_eq!(summary.first_mean, 1.0);
        assert_eq!(summary.last_mean, 5.0);
    }

    #[test]
    fn phase_breakdown_uses_week_not_stored_phase() {
        let mut mislabeled = evaluation("e1", "s1", "2024-06-01", 31, 4);
        mislabeled.phase = Phase::Early;
        let early = evaluation("e2", "s1", "2024-01-10", 12, 2);
        let middle = evaluation("e3", "s1", "2024-03-10", 13, 3);

        let summaries = phase_breakdown([&mislabeled, &early, &middle]);
        let counts: Vec<(Phase, usize)> = summaries.iter().map(|s| (s.phase, s.sessions)).collect();
        assert_eq!(
            counts,
            vec![(Phase::Early, 1), (Phase::Middle, 1), (Phase::Final, 1)]
        );
        let final_avg = summaries[2].averages.as_ref().unwrap();
        assert_eq!(final_avg.get(ScoreCategory::Documentation), 4.0);
    }

    #[test]
    fn student_timeline_filters_and_orders_by_week() {
        let evaluations = vec![
            evaluation("e1", "s1", "2024-03-01", 9, 3),
            evaluation("e2", "s2", "2024-01-01", 1, 3),
            evaluation("e3", "s1", "2024-01-05", 2, 3),
            evaluation("e4", "s1", "2024-01-06", 2, 3),
        ];
        let ids: Vec<&str> = student_timeline(&evaluations, "s1")
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["e3", "e4", "e1"]);
    }

    #[test]
    fn condition_coverage_stays_within_catalog() {
        let mut first = evaluation("e1", "s1", "2024-01-10", 1, 3);
        first.conditions_seen = vec!["COPD".to_string(), "Asthma".to_string()];
        first.custom_conditions = vec!["copd".to_string(), "Frostbite".to_string()];
        let mut second = evaluation("e2", "s1", "2024-01-17", 2, 3);
        second.conditions_seen = vec!["Asthma".to_string()];
        second.custom_conditions = vec!["  ".to_string()];

        let coverage = condition_coverage([&first, &second]);
        assert_eq!(coverage.matched.len(), 2);
        assert!(coverage.custom.contains("Frostbite"));
        assert_eq!(coverage.total, 56);
        assert!((coverage.ratio - 2.0 / 56.0).abs() < 1e-12);

        let mut everything = evaluation("e3", "s1", "2024-01-24", 3, 3);
        everything.conditions_seen = taxonomy::CONDITION_CATALOG
            .iter()
            .flat_map(|g| g.conditions.iter().map(|c| c.to_string()))
            .collect();
        everything.custom_conditions = vec!["Frostbite".to_string(), "Heat Stroke".to_string()];
        assert_eq!(condition_coverage([&everything]).ratio, 1.0);
    }

    #[test]
    fn objective_coverage_ignores_legacy_and_unknown_ids() {
        let first = with_objectives(
            evaluation("e1", "s1", "2024-01-10", 14, 3),
            &["1-middle-a", "1-middle-b", "3", "9-final-a", "1-final-z"],
        );
        let second = with_objectives(
            evaluation("e2", "s1", "2024-02-10", 18, 3),
            &["1-middle-a", "5-final-a"],
        );

        let coverage = objective_coverage([&first, &second]);
        let achieved: Vec<String> = coverage.achieved.iter().map(|id| id.to_string()).collect();
        assert_eq!(achieved, vec!["1-middle-a", "1-middle-b", "5-final-a"]);
        assert_eq!(coverage.total, 34);
        assert!((coverage.ratio - 3.0 / 34.0).abs() < 1e-12);

        let outcome_one = &coverage.per_objective[0];
        assert_eq!(outcome_one.objective_id, "1");
        assert_eq!((outcome_one.achieved, outcome_one.total), (2, 4));
        assert_eq!(outcome_one.ratio, 0.5);
        let outcome_five = &coverage.per_objective[4];
        assert_eq!((outcome_five.achieved, outcome_five.total), (1, 2));
    }

    #[test]
    fn first_achieved_keeps_earliest_date_in_any_order() {
        let later = with_objectives(evaluation("b", "s1", "2024-02-01", 20, 3), &["1-middle-a"]);
        let earlier = with_objectives(evaluation("a", "s1", "2024-01-10", 15, 3), &["1-middle-a"]);
        let id: ExpectationId = "1-middle-a".parse().unwrap();
        let expected: NaiveDate = "2024-01-10".parse().unwrap();

        for order in [[&later, &earlier], [&earlier, &later]] {
            let first = first_achieved(order);
            assert_eq!(first[&id].date, expected);
            assert_eq!(first[&id].evaluation_id, "a");
        }
    }

    #[test]
    fn topic_coverage_counts_sessions_not_topics() {
        let mut first = evaluation("e1", "s1", "2024-01-10", 1, 3);
        first.add_topic("Cardiovascular", "Syncope");
        first.add_topic("Cardiovascular", "ASCVD");
        first.add_topic("Wilderness Medicine", "Altitude");
        let mut second = evaluation("e2", "s1", "2024-01-17", 2, 3);
        second.add_topic("Cardiovascular", "Syncope");
        second.add_topic("Neurology", "Stroke");
        second.teaching_topics.push(crate::models::TeachingTopics {
            category: "Geriatrics".to_string(),
            topics: Vec::new(),
        });

        let coverage = topic_coverage([&first, &second]);
        let categories: Vec<&str> = coverage.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, vec!["Cardiovascular", "Neurology", "Wilderness Medicine"]);
        assert_eq!(coverage[0].sessions, 2);
        assert_eq!(coverage[0].topics.len(), 2);
        assert_eq!(coverage[1].sessions, 1);
    }

    #[test]
    fn filter_evaluations_applies_student_phase_and_sort() {
        let evaluations = vec![
            evaluation("e1", "s1", "2024-01-10", 2, 2),
            evaluation("e2", "s1", "2024-04-10", 16, 5),
            evaluation("e3", "s2", "2024-02-10", 6, 4),
            evaluation("e4", "s1", "2024-02-10", 6, 3),
        ];

        let by_date = filter_evaluations(
            &evaluations,
            &EvaluationFilter {
                student_id: Some("s1".to_string()),
                ..EvaluationFilter::default()
            },
        );
        let ids: Vec<&str> = by_date.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e2", "e4", "e1"]);

        let early_by_rating = filter_evaluations(
            &evaluations,
            &EvaluationFilter {
                student_id: None,
                phase: Some(Phase::Early),
                sort: SortKey::Rating,
            },
        );
        let ids: Vec<&str> = early_by_rating.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e3", "e4", "e1"]);
    }

    #[test]
    fn previous_lookups_skip_current_session_and_other_students() {
        let mut current = evaluation("e1", "s1", "2024-01-10", 2, 3);
        current.conditions_seen = vec!["Asthma".to_string()];
        let mut earlier = with_objectives(evaluation("e0", "s1", "2024-01-03", 1, 3), &["2-middle-b", "4"]);
        earlier.custom_conditions = vec!["Frostbite".to_string()];
        let mut other = evaluation("x1", "s2", "2024-01-03", 1, 3);
        other.conditions_seen = vec!["COPD".to_string()];

        let evaluations = vec![current, earlier, other];
        let conditions = previous_conditions(&evaluations, "s1", Some("e1"));
        assert_eq!(conditions.into_iter().collect::<Vec<_>>(), vec!["Frostbite"]);

        let objectives = previous_objectives(&evaluations, "s1", Some("e1"));
        assert_eq!(objectives.len(), 1);
    }

    #[test]
    fn dashboard_summary_lists_recent_sessions_first() {
        let mut data = AppData::default();
        for (i, date) in ["2024-01-01", "2024-03-01", "2024-02-01", "2024-05-01", "2024-04-01", "2024-06-01"]
            .iter()
            .enumerate()
        {
            data.evaluations
                .push(evaluation(&format!("e{i}"), "s1", date, (i as u32) * 8 + 1, 3));
        }
        data.evaluations
            .push(evaluation("e6", "s1", "2023-12-01", 1, 3));

        let summary = dashboard_summary(&data);
        assert_eq!(summary.evaluations, 7);
        assert_eq!(summary.weeks_logged, 6);
        assert_eq!(summary.recent.len(), 5);
        assert_eq!(summary.recent[0].id, "e5");
        assert_eq!(summary.recent[4].id, "e2");
        let total: usize = summary.phase_counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 7);
        assert_eq!(summary.averages.unwrap().overall_rating, 3.0);
    }
}
