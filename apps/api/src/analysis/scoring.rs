//! Per-source score normalizer.
//!
//! Each source has its own additive formula. Every term is capped on its own
//! and the sum is clamped to [0, 100], so one huge counter (a viral repo)
//! cannot buy the whole score.

use serde::{Deserialize, Serialize};

use crate::analysis::sources::{GithubMetrics, HackerrankMetrics, LeetcodeMetrics, SourceId};
use crate::extraction::models::CandidateRecord;

pub const MAX_SCORE: u8 = 100;

pub const RESUME_SKILLS_POINTS: u64 = 40;
pub const RESUME_EXPERIENCE_POINTS: u64 = 30;
pub const RESUME_EDUCATION_POINTS: u64 = 30;

pub const GITHUB_REPO_WEIGHT: u64 = 5;
pub const GITHUB_REPO_CAP: u64 = 40;
pub const GITHUB_STAR_WEIGHT: u64 = 2;
pub const GITHUB_STAR_CAP: u64 = 40;
pub const GITHUB_FOLLOWER_WEIGHT: u64 = 2;
pub const GITHUB_FOLLOWER_CAP: u64 = 20;

pub const HACKERRANK_BADGE_WEIGHT: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceScore {
    pub source_id: SourceId,
    /// Always within 0..=100.
    pub value: u8,
}

impl SourceScore {
    fn clamped(source_id: SourceId, raw: u64) -> Self {
        Self {
            source_id,
            value: raw.min(MAX_SCORE as u64) as u8,
        }
    }
}

/// Metrics for one source, borrowed from the request.
#[derive(Debug, Clone, Copy)]
pub enum SourceInput<'a> {
    Resume(&'a CandidateRecord),
    Github(&'a GithubMetrics),
    Leetcode(&'a LeetcodeMetrics),
    Hackerrank(&'a HackerrankMetrics),
}

impl SourceInput<'_> {
    pub fn source_id(&self) -> SourceId {
        match self {
            SourceInput::Resume(_) => SourceId::Resume,
            SourceInput::Github(_) => SourceId::Github,
            SourceInput::Leetcode(_) => SourceId::Leetcode,
            SourceInput::Hackerrank(_) => SourceId::Hackerrank,
        }
    }
}

pub fn score_source(input: SourceInput<'_>) -> SourceScore {
    let raw = match input {
        SourceInput::Resume(record) => resume_points(record),
        SourceInput::Github(m) => github_points(m),
        SourceInput::Leetcode(m) => leetcode_points(m),
        SourceInput::Hackerrank(m) => hackerrank_points(m),
    };
    SourceScore::clamped(input.source_id(), raw)
}

/// 40 for skills, 30 for an identified experience section, 30 for a degree.
fn resume_points(record: &CandidateRecord) -> u64 {
    let mut points = 0;
    if !record.skills.is_empty() || record.skills_summary.is_found() {
        points += RESUME_SKILLS_POINTS;
    }
    if record.experience_summary.is_found() {
        points += RESUME_EXPERIENCE_POINTS;
    }
    if record.education_summary.is_found() {
        points += RESUME_EDUCATION_POINTS;
    }
    points
}

fn github_points(m: &GithubMetrics) -> u64 {
    capped(m.public_repos, GITHUB_REPO_WEIGHT, GITHUB_REPO_CAP)
        + capped(m.total_stars, GITHUB_STAR_WEIGHT, GITHUB_STAR_CAP)
        + capped(m.followers, GITHUB_FOLLOWER_WEIGHT, GITHUB_FOLLOWER_CAP)
}

/// One point per solved problem.
fn leetcode_points(m: &LeetcodeMetrics) -> u64 {
    m.total_solved
}

fn hackerrank_points(m: &HackerrankMetrics) -> u64 {
    m.total_badges.saturating_mul(HACKERRANK_BADGE_WEIGHT)
}

fn capped(count: u64, weight: u64, cap: u64) -> u64 {
    count.saturating_mul(weight).min(cap)
}
