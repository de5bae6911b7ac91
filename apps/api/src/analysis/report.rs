//! Aggregation and report building.
//!
//! Only present sources take part: the overall score is the mean of the
//! scores that exist, and absent sources never appear as map keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::scoring::{score_source, SourceInput, SourceScore};
use crate::analysis::sources::{SourceId, SourceMetricsSet};
use crate::extraction::models::CandidateRecord;

pub const STRONG_THRESHOLD: u8 = 70;
pub const MODERATE_THRESHOLD: u8 = 40;
/// Platform sources below this get an improvement item.
pub const IMPROVEMENT_THRESHOLD: u8 = 50;
/// Platform sources below this get a High-priority item.
pub const HIGH_PRIORITY_THRESHOLD: u8 = 25;
/// The résumé gets its improvement item below this.
pub const RESUME_IMPROVEMENT_THRESHOLD: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrengthStatus {
    Strong,
    Moderate,
    Weak,
}

impl StrengthStatus {
    pub fn classify(score: u8) -> Self {
        match score {
            s if s >= STRONG_THRESHOLD => StrengthStatus::Strong,
            s if s >= MODERATE_THRESHOLD => StrengthStatus::Moderate,
            _ => StrengthStatus::Weak,
        }
    }
}

/// Declaration order is urgency order: `High` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStrength {
    pub source_id: SourceId,
    pub score: u8,
    pub status: StrengthStatus,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementItem {
    pub area: String,
    pub priority: Priority,
    pub tip: String,
}

/// The externally visible result of one analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// `None` when no source was present at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<u8>,
    pub score_breakdown: BTreeMap<SourceId, SourceScore>,
    pub profile_strength: BTreeMap<SourceId, ProfileStrength>,
    pub technical_strengths: Vec<String>,
    pub improvement_areas: Vec<ImprovementItem>,
    pub career_recommendations: Vec<String>,
    pub summary: String,
}

impl AnalysisReport {
    pub fn has_data(&self) -> bool {
        !self.score_breakdown.is_empty()
    }
}

/// Builds a fresh report from whatever is present. The résumé counts as a
/// source only when `candidate` is given.
pub fn build_report(
    candidate: Option<&CandidateRecord>,
    metrics: &SourceMetricsSet,
) -> AnalysisReport {
    let inputs = present_inputs(candidate, metrics);

    let score_breakdown: BTreeMap<SourceId, SourceScore> = inputs
        .iter()
        .map(|input| {
            let score = score_source(*input);
            (score.source_id, score)
        })
        .collect();

    let overall_score = mean_score(score_breakdown.values().map(|s| s.value));

    let profile_strength = inputs
        .iter()
        .map(|input| {
            let score = score_breakdown[&input.source_id()].value;
            (
                input.source_id(),
                ProfileStrength {
                    source_id: input.source_id(),
                    score,
                    status: StrengthStatus::classify(score),
                    details: strength_details(*input),
                },
            )
        })
        .collect();

    let technical_strengths = inputs
        .iter()
        .flat_map(|input| strength_bullets(*input, score_breakdown[&input.source_id()].value))
        .collect();

    // Stable sort: equal priorities keep source order.
    let mut improvement_areas: Vec<ImprovementItem> = score_breakdown
        .values()
        .filter_map(improvement_item)
        .collect();
    improvement_areas.sort_by_key(|item| item.priority);

    let career_recommendations = career_recommendations(overall_score, &score_breakdown);
    let summary = summarize(candidate, overall_score);

    debug!(
        overall = ?overall_score,
        sources = ?score_breakdown.keys().map(SourceId::as_str).collect::<Vec<_>>(),
        "built analysis report"
    );

    AnalysisReport {
        overall_score,
        score_breakdown,
        profile_strength,
        technical_strengths,
        improvement_areas,
        career_recommendations,
        summary,
    }
}

fn present_inputs<'a>(
    candidate: Option<&'a CandidateRecord>,
    metrics: &'a SourceMetricsSet,
) -> Vec<SourceInput<'a>> {
    let mut inputs = Vec::with_capacity(4);
    if let Some(record) = candidate {
        inputs.push(SourceInput::Resume(record));
    }
    if let Some(m) = &metrics.github {
        inputs.push(SourceInput::Github(m));
    }
    if let Some(m) = &metrics.leetcode {
        inputs.push(SourceInput::Leetcode(m));
    }
    if let Some(m) = &metrics.hackerrank {
        inputs.push(SourceInput::Hackerrank(m));
    }
    inputs
}

/// Rounded arithmetic mean, `None` for an empty set.
fn mean_score(scores: impl Iterator<Item = u8>) -> Option<u8> {
    let (sum, count) = scores.fold((0u32, 0u32), |(sum, n), s| (sum + s as u32, n + 1));
    if count == 0 {
        return None;
    }
    Some((sum as f64 / count as f64).round().clamp(0.0, 100.0) as u8)
}

fn strength_details(input: SourceInput<'_>) -> String {
    match input {
        SourceInput::Resume(r) => format!(
            "{} skill{} identified; experience section {}; degree {}",
            r.skills.len(),
            if r.skills.len() == 1 { "" } else { "s" },
            if r.experience_summary.is_found() { "found" } else { "missing" },
            if r.education_summary.is_found() { "found" } else { "missing" },
        ),
        SourceInput::Github(m) => format!(
            "{} repos, {} stars, {} followers",
            m.public_repos, m.total_stars, m.followers
        ),
        SourceInput::Leetcode(m) => format!(
            "{} problems solved ({} easy, {} medium, {} hard)",
            m.total_solved, m.easy_solved, m.medium_solved, m.hard_solved
        ),
        SourceInput::Hackerrank(m) => format!(
            "{} badges earned, {} challenges solved",
            m.total_badges, m.challenges_solved
        ),
    }
}

/// One bullet per source, plus the extracted skills for the résumé.
fn strength_bullets(input: SourceInput<'_>, score: u8) -> Vec<String> {
    match input {
        SourceInput::Resume(r) => {
            let mut bullets = vec![format!("Resume completeness: {score}/100")];
            if let Some(skills) = r.skills_summary.found() {
                bullets.push(format!("Core skills: {skills}"));
            }
            bullets
        }
        SourceInput::Github(m) => {
            let mut bullet = format!(
                "GitHub projects: {} public repos with {} stars",
                m.public_repos, m.total_stars
            );
            if let Some(top) = m.top_languages.first() {
                bullet.push_str(&format!(", mostly {}", top.language));
            }
            vec![bullet]
        }
        SourceInput::Leetcode(m) => vec![format!(
            "LeetCode solved: {} problems ({} hard)",
            m.total_solved, m.hard_solved
        )],
        SourceInput::Hackerrank(m) => vec![format!("HackerRank badges: {}", m.total_badges)],
    }
}

fn improvement_item(score: &SourceScore) -> Option<ImprovementItem> {
    let value = score.value;
    let (area, tip) = match score.source_id {
        SourceId::Resume => {
            if value >= RESUME_IMPROVEMENT_THRESHOLD {
                return None;
            }
            return Some(ImprovementItem {
                area: "Resume".to_string(),
                priority: Priority::Medium,
                tip: "Add quantified impact and metrics to each role and project".to_string(),
            });
        }
        SourceId::Github => ("GitHub", "Build and deploy more real-world public projects"),
        SourceId::Leetcode => ("DSA", "Solve more medium and hard problems"),
        SourceId::Hackerrank => (
            "HackerRank",
            "Earn more badges by completing skill-track challenges",
        ),
    };

    if value >= IMPROVEMENT_THRESHOLD {
        return None;
    }
    let priority = if value < HIGH_PRIORITY_THRESHOLD {
        Priority::High
    } else {
        Priority::Medium
    };
    Some(ImprovementItem {
        area: area.to_string(),
        priority,
        tip: tip.to_string(),
    })
}

/// Always three entries: a role target keyed on readiness, a next step for
/// the weakest present source, and open-source contribution.
fn career_recommendations(
    overall: Option<u8>,
    breakdown: &BTreeMap<SourceId, SourceScore>,
) -> Vec<String> {
    let role = match overall {
        None => "Upload your resume to receive role recommendations",
        Some(s) if s >= STRONG_THRESHOLD => {
            "Apply for mid-level software engineering and full-stack roles"
        }
        Some(s) if s >= MODERATE_THRESHOLD => "Apply for junior frontend / full-stack developer roles",
        Some(_) => "Target internships and entry-level developer roles",
    };

    // First minimum wins, and the map iterates in source priority order.
    let next_step = match breakdown.values().min_by_key(|s| s.value).map(|s| s.source_id) {
        None => "Connect your GitHub, LeetCode, and HackerRank profiles for a fuller analysis",
        Some(SourceId::Resume) => "Rewrite resume bullets around measurable outcomes",
        Some(SourceId::Github) => "Build 2-3 production-grade projects and publish them on GitHub",
        Some(SourceId::Leetcode) => {
            "Practice data structures and algorithms daily, focusing on medium problems"
        }
        Some(SourceId::Hackerrank) => "Earn HackerRank skill certificates in your core languages",
    };

    vec![
        role.to_string(),
        next_step.to_string(),
        "Contribute to open source projects in your primary stack".to_string(),
    ]
}

fn readiness_phrase(score: u8) -> &'static str {
    match StrengthStatus::classify(score) {
        StrengthStatus::Strong => "strong",
        StrengthStatus::Moderate => "moderate",
        StrengthStatus::Weak => "early-stage",
    }
}

fn summarize(candidate: Option<&CandidateRecord>, overall: Option<u8>) -> String {
    let name = candidate.and_then(|c| c.name.found());

    let Some(overall) = overall else {
        return format!(
            "Not enough data yet to assess {}. Upload a resume or connect a GitHub, LeetCode, or HackerRank profile to generate an analysis.",
            name.unwrap_or("this candidate")
        );
    };

    let skills = candidate
        .and_then(|c| c.skills_summary.found())
        .unwrap_or("software development");

    format!(
        "{} has a solid foundation in {}. The overall profile shows {} readiness for technical roles.",
        name.unwrap_or("Candidate"),
        skills,
        readiness_phrase(overall)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sources::{GithubMetrics, HackerrankMetrics, LanguageCount, LeetcodeMetrics};
    use crate::extraction::models::{
        Field, DEGREE_NOT_FOUND, EXPERIENCE_NOT_FOUND, NAME_NOT_FOUND, SKILLS_NOT_FOUND,
    };

    fn candidate(name: Option<&str>, skills: bool, experience: bool, education: bool) -> CandidateRecord {
        CandidateRecord {
            name: Field::or_sentinel(name.map(String::from), NAME_NOT_FOUND),
            email: Field::Found("dev@example.com".into()),
            phone: Field::Found("9876543210".into()),
            skills: if skills {
                vec!["Python".into(), "React".into()]
            } else {
                vec![]
            },
            skills_summary: if skills {
                Field::Found("Python, React".into())
            } else {
                Field::Missing(SKILLS_NOT_FOUND)
            },
            experience_summary: if experience {
                Field::Found("Approximately 2 roles identified (4 year references)".into())
            } else {
                Field::Missing(EXPERIENCE_NOT_FOUND)
            },
            education_summary: if education {
                Field::Found("B.Tech".into())
            } else {
                Field::Missing(DEGREE_NOT_FOUND)
            },
            document_type: None,
            text_length: 420,
        }
    }

    fn github(repos: u64, stars: u64, followers: u64) -> GithubMetrics {
        GithubMetrics {
            username: Some("octo".into()),
            public_repos: repos,
            total_stars: stars,
            followers,
            ..Default::default()
        }
    }

    fn leetcode(solved: u64) -> LeetcodeMetrics {
        LeetcodeMetrics {
            total_solved: solved,
            ..Default::default()
        }
    }

    fn hackerrank(badges: u64) -> HackerrankMetrics {
        HackerrankMetrics {
            total_badges: badges,
            ..Default::default()
        }
    }

    #[test]
    fn test_only_resume_full_credit_overall_100() {
        let c = candidate(Some("Jane Doe"), true, true, true);
        let report = build_report(Some(&c), &SourceMetricsSet::default());
        assert_eq!(report.score_breakdown[&SourceId::Resume].value, 100);
        assert_eq!(report.overall_score, Some(100));
        assert_eq!(report.score_breakdown.len(), 1);
        assert!(report.improvement_areas.is_empty());
    }

    #[test]
    fn test_single_source_overall_equals_that_score() {
        let metrics = SourceMetricsSet {
            leetcode: Some(leetcode(37)),
            ..Default::default()
        };
        let report = build_report(None, &metrics);
        assert_eq!(report.overall_score, Some(37));
    }

    #[test]
    fn test_mean_over_present_sources_only() {
        let c = candidate(Some("Jane Doe"), true, true, true); // 100
        let metrics = SourceMetricsSet {
            github: Some(github(2, 0, 0)), // 10
            ..Default::default()
        };
        let report = build_report(Some(&c), &metrics);
        assert_eq!(report.overall_score, Some(55));
    }

    #[test]
    fn test_mean_rounds_to_nearest() {
        // 100 / 3 = 33.33 -> 33, then 101 / 3 = 33.67 -> 34
        let c = candidate(None, true, true, true);
        let metrics = SourceMetricsSet {
            leetcode: Some(leetcode(0)),
            hackerrank: Some(HackerrankMetrics::default()),
            github: None,
        };
        let report = build_report(Some(&c), &metrics);
        assert_eq!(report.overall_score, Some(33));

        let metrics = SourceMetricsSet {
            leetcode: Some(leetcode(1)),
            hackerrank: Some(HackerrankMetrics::default()),
            github: None,
        };
        assert_eq!(build_report(Some(&c), &metrics).overall_score, Some(34));
    }

    #[test]
    fn test_absent_sources_are_not_keys() {
        let metrics = SourceMetricsSet {
            github: Some(github(1, 1, 1)),
            ..Default::default()
        };
        let report = build_report(None, &metrics);
        assert_eq!(report.score_breakdown.keys().copied().collect::<Vec<_>>(), vec![SourceId::Github]);
        assert_eq!(report.profile_strength.keys().copied().collect::<Vec<_>>(), vec![SourceId::Github]);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["scoreBreakdown"].get("leetcode").is_none());
        assert!(json["profileStrength"].get("resume").is_none());
        assert!(json["scoreBreakdown"].get("github").is_some());
    }

    #[test]
    fn test_zero_score_source_is_still_present() {
        let metrics = SourceMetricsSet {
            github: Some(github(0, 0, 0)),
            ..Default::default()
        };
        let report = build_report(None, &metrics);
        assert_eq!(report.score_breakdown[&SourceId::Github].value, 0);
        assert_eq!(report.overall_score, Some(0));
    }

    #[test]
    fn test_no_sources_returns_shell() {
        let report = build_report(None, &SourceMetricsSet::default());
        assert_eq!(report.overall_score, None);
        assert!(report.score_breakdown.is_empty());
        assert!(report.profile_strength.is_empty());
        assert!(report.technical_strengths.is_empty());
        assert!(report.improvement_areas.is_empty());
        assert_eq!(report.career_recommendations.len(), 3);
        assert!(report.summary.starts_with("Not enough data yet"));
        assert!(!report.has_data());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("overallScore").is_none());
    }

    #[test]
    fn test_strength_classification_thresholds() {
        assert_eq!(StrengthStatus::classify(100), StrengthStatus::Strong);
        assert_eq!(StrengthStatus::classify(70), StrengthStatus::Strong);
        assert_eq!(StrengthStatus::classify(69), StrengthStatus::Moderate);
        assert_eq!(StrengthStatus::classify(40), StrengthStatus::Moderate);
        assert_eq!(StrengthStatus::classify(39), StrengthStatus::Weak);
        assert_eq!(StrengthStatus::classify(0), StrengthStatus::Weak);
    }

    #[test]
    fn test_profile_strength_details_from_metrics() {
        let metrics = SourceMetricsSet {
            github: Some(github(12, 30, 4)),
            leetcode: Some(LeetcodeMetrics {
                total_solved: 150,
                easy_solved: 80,
                medium_solved: 60,
                hard_solved: 10,
                ..Default::default()
            }),
            hackerrank: Some(HackerrankMetrics {
                total_badges: 2,
                challenges_solved: 45,
                ..Default::default()
            }),
        };
        let report = build_report(None, &metrics);
        let gh = &report.profile_strength[&SourceId::Github];
        assert_eq!(gh.details, "12 repos, 30 stars, 4 followers");
        assert_eq!(gh.score, 40 + 40 + 8);
        assert_eq!(gh.status, StrengthStatus::Strong);
        assert_eq!(
            report.profile_strength[&SourceId::Leetcode].details,
            "150 problems solved (80 easy, 60 medium, 10 hard)"
        );
        let hr = &report.profile_strength[&SourceId::Hackerrank];
        assert_eq!(hr.score, 20);
        assert_eq!(hr.status, StrengthStatus::Weak);
    }

    #[test]
    fn test_technical_strengths_order() {
        let c = candidate(Some("Jane Doe"), true, true, false);
        let mut gh = github(3, 1, 0);
        gh.top_languages = vec![LanguageCount {
            language: "TypeScript".into(),
            count: 2,
        }];
        let metrics = SourceMetricsSet {
            github: Some(gh),
            leetcode: Some(leetcode(20)),
            hackerrank: Some(hackerrank(1)),
        };
        let report = build_report(Some(&c), &metrics);
        assert_eq!(
            report.technical_strengths,
            vec![
                "Resume completeness: 70/100".to_string(),
                "Core skills: Python, React".to_string(),
                "GitHub projects: 3 public repos with 1 stars, mostly TypeScript".to_string(),
                "LeetCode solved: 20 problems (0 hard)".to_string(),
                "HackerRank badges: 1".to_string(),
            ]
        );
    }

    #[test]
    fn test_sentinel_skills_not_echoed() {
        let c = candidate(None, false, true, true);
        let report = build_report(Some(&c), &SourceMetricsSet::default());
        assert_eq!(report.technical_strengths, vec!["Resume completeness: 60/100".to_string()]);
    }

    #[test]
    fn test_improvement_priorities() {
        let c = candidate(Some("Jane Doe"), true, false, false); // 40
        let metrics = SourceMetricsSet {
            github: Some(github(1, 0, 0)),  // 5  -> High
            leetcode: Some(leetcode(30)),   // 30 -> Medium
            hackerrank: Some(hackerrank(5)), // 50 -> none
        };
        let report = build_report(Some(&c), &metrics);
        assert_eq!(
            report.improvement_areas,
            vec![
                ImprovementItem {
                    area: "GitHub".into(),
                    priority: Priority::High,
                    tip: "Build and deploy more real-world public projects".into(),
                },
                ImprovementItem {
                    area: "Resume".into(),
                    priority: Priority::Medium,
                    tip: "Add quantified impact and metrics to each role and project".into(),
                },
                ImprovementItem {
                    area: "DSA".into(),
                    priority: Priority::Medium,
                    tip: "Solve more medium and hard problems".into(),
                },
            ]
        );
    }

    #[test]
    fn test_improvement_areas_rank_high_before_medium() {
        let metrics = SourceMetricsSet {
            leetcode: Some(leetcode(30)),    // Medium
            hackerrank: Some(hackerrank(1)), // High
            ..Default::default()
        };
        let report = build_report(None, &metrics);
        let ranked: Vec<(&str, Priority)> = report
            .improvement_areas
            .iter()
            .map(|i| (i.area.as_str(), i.priority))
            .collect();
        assert_eq!(ranked, vec![("HackerRank", Priority::High), ("DSA", Priority::Medium)]);
        assert!(Priority::High < Priority::Medium && Priority::Medium < Priority::Low);
    }

    #[test]
    fn test_improvement_boundaries() {
        let at = |badges| {
            let metrics = SourceMetricsSet {
                hackerrank: Some(hackerrank(badges)),
                ..Default::default()
            };
            build_report(None, &metrics).improvement_areas
        };
        assert!(at(5).is_empty()); // 50
        assert_eq!(at(4)[0].priority, Priority::Medium); // 40
        assert_eq!(at(3)[0].priority, Priority::Medium); // 30
        assert_eq!(at(2)[0].priority, Priority::High); // 20
    }

    #[test]
    fn test_resume_at_seventy_has_no_item() {
        let c = candidate(None, true, true, false); // 70
        let report = build_report(Some(&c), &SourceMetricsSet::default());
        assert!(report.improvement_areas.is_empty());
    }

    #[test]
    fn test_career_recommendations_follow_weakest_source() {
        let c = candidate(Some("Jane Doe"), true, true, true); // 100
        let metrics = SourceMetricsSet {
            leetcode: Some(leetcode(10)),
            github: Some(github(20, 20, 10)),
            ..Default::default()
        };
        let report = build_report(Some(&c), &metrics);
        assert_eq!(report.career_recommendations.len(), 3);
        assert!(report.career_recommendations[1].contains("data structures"));
    }

    #[test]
    fn test_career_recommendations_tie_uses_priority_order() {
        let metrics = SourceMetricsSet {
            github: Some(github(0, 0, 0)),
            leetcode: Some(leetcode(0)),
            ..Default::default()
        };
        let report = build_report(None, &metrics);
        assert!(report.career_recommendations[1].contains("GitHub"));
        assert!(report.career_recommendations[0].contains("entry-level"));
    }

    #[test]
    fn test_summary_wording() {
        let c = candidate(Some("Jane Doe"), true, true, true);
        let report = build_report(Some(&c), &SourceMetricsSet::default());
        assert_eq!(
            report.summary,
            "Jane Doe has a solid foundation in Python, React. The overall profile shows strong readiness for technical roles."
        );

        let c = candidate(None, false, false, false);
        let metrics = SourceMetricsSet {
            leetcode: Some(leetcode(90)),
            ..Default::default()
        };
        let report = build_report(Some(&c), &metrics); // (0 + 90) / 2 = 45
        assert_eq!(
            report.summary,
            "Candidate has a solid foundation in software development. The overall profile shows moderate readiness for technical roles."
        );

        let metrics = SourceMetricsSet {
            hackerrank: Some(hackerrank(1)),
            ..Default::default()
        };
        assert!(build_report(None, &metrics).summary.contains("early-stage"));
    }

    #[test]
    fn test_report_is_deterministic() {
        let c = candidate(Some("Jane Doe"), true, false, true);
        let metrics = SourceMetricsSet {
            github: Some(github(3, 10, 2)),
            leetcode: Some(leetcode(44)),
            hackerrank: Some(hackerrank(2)),
        };
        assert_eq!(build_report(Some(&c), &metrics), build_report(Some(&c), &metrics));
    }

    #[test]
    fn test_report_json_shape() {
        let c = candidate(Some("Jane Doe"), true, true, true);
        let metrics = SourceMetricsSet {
            github: Some(github(50, 500, 1000)),
            ..Default::default()
        };
        let json = serde_json::to_value(build_report(Some(&c), &metrics)).unwrap();
        assert_eq!(json["overallScore"], 100);
        assert_eq!(json["scoreBreakdown"]["github"]["value"], 100);
        assert_eq!(json["scoreBreakdown"]["github"]["sourceId"], "github");
        assert_eq!(json["profileStrength"]["resume"]["status"], "Strong");
        assert!(json["technicalStrengths"].is_array());
        assert!(json["improvementAreas"].is_array());
        assert!(json["careerRecommendations"].is_array());
        assert!(json["summary"].is_string());
    }
}
