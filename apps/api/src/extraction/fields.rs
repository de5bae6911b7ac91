//! Field heuristics.
//!
//! Every field is found by an ordered chain of pure rules
//! `&NormalizedText -> Option<String>`; the first rule that returns `Some`
//! wins. Rules never fail and never look outside their input.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::normalizer::NormalizedText;

pub type Rule = fn(&NormalizedText) -> Option<String>;

/// Runs `rules` in order and returns the first hit.
pub fn first_match(rules: &[Rule], text: &NormalizedText) -> Option<String> {
    rules.iter().find_map(|rule| rule(text))
}

// ────────────────────────────────────────────────────────────────────────────
// Patterns
// ────────────────────────────────────────────────────────────────────────────

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

/// Supported shapes, leftmost match wins:
/// - Indian mobile: optional `+91`/`91` prefix, ten digits starting 6-9
/// - `(ddd) ddd-dddd`, optional `+1`
/// - `ddd-ddd-dddd` / `ddd.ddd.dddd` / `ddd ddd dddd`, optional `+CC`
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        (?:\+?91[-.\s]?)?[6-9]\d{9}\b
        | (?:\+?1[-.\s]?)?\(\d{3}\)\s?\d{3}[-.\s]\d{4}\b
        | (?:\+\d{1,3}[-.\s]?)?\b\d{3}[-.\s]\d{3}[-.\s]\d{4}\b
        ",
    )
    .unwrap()
});

static ALL_CAPS_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]+(?:\s+[A-Z]+)+$").unwrap());

static TITLE_CASE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+$").unwrap());

static NAME_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:full\s+name|name)\s*[:\-]\s*([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+){1,2})").unwrap()
});

static BARE_CAPS_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z ]*[A-Z]$").unwrap());

static SKILLS_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?i:technical\s+skills|key\s+skills|skills?|technologies|technology|tech\s+stack)\s*(?:[:\-]\s*(.*))?$",
    )
    .unwrap()
});

static EXPERIENCE_HEADING_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?i:(?:work|professional)\s+experience|experience|employment\s+history|work\s+history)\b",
    )
    .unwrap()
});

static EXPERIENCE_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:(?:work|professional)\s+experience|experience|employment\s+history)\b")
        .unwrap()
});

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \b(?:
            (?:Bachelor|Master)(?:'s|s)?(?:\s+(?:of|in)\s+[A-Z][A-Za-z]+(?:\s+[A-Z][A-Za-z]+){0,2})?
          | Doctor\s+of\s+[A-Z][a-z]+
          | Doctorate
          | Ph\.?\s?D\b\.?
          | [BM]\.(?:Tech|Sc|Com)\b\.?
          | [BM]\.(?:E|S|A)\.
          | [BM]Tech\b
          | [BM]Sc\b
          | MBA\b | BCA\b | MCA\b
        )",
    )
    .unwrap()
});

/// Headings that look like an ALL-CAPS name but are not one.
const SECTION_HEADINGS: &[&str] = &[
    "RESUME",
    "CURRICULUM VITAE",
    "CV",
    "EXPERIENCE",
    "WORK EXPERIENCE",
    "PROFESSIONAL EXPERIENCE",
    "EDUCATION",
    "SKILLS",
    "TECHNICAL SKILLS",
    "SUMMARY",
    "PROFESSIONAL SUMMARY",
    "OBJECTIVE",
    "CAREER OBJECTIVE",
    "PROFILE",
    "PROJECTS",
    "CONTACT",
    "CERTIFICATIONS",
    "ACHIEVEMENTS",
];

const NAME_SEARCH_LINES: usize = 5;
const EXPERIENCE_WINDOW_CHARS: usize = 500;
const SKILLS_CAPTURE_MAX_CHARS: usize = 300;

// ────────────────────────────────────────────────────────────────────────────
// Contact details
// ────────────────────────────────────────────────────────────────────────────

pub fn email(text: &NormalizedText) -> Option<String> {
    EMAIL_RE
        .find(&text.normalized)
        .map(|m| m.as_str().to_string())
}

pub fn phone(text: &NormalizedText) -> Option<String> {
    PHONE_RE
        .find(&text.normalized)
        .map(|m| m.as_str().trim().to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Name
// ────────────────────────────────────────────────────────────────────────────

pub const NAME_RULES: &[Rule] = &[name_from_first_line, name_from_label, name_from_caps_line];

/// First non-empty line, 3-49 chars, letters and spaces only, multi-word in
/// ALL CAPS or Title Case.
fn name_from_first_line(text: &NormalizedText) -> Option<String> {
    let line = text.lines.first()?;
    let len = line.chars().count();
    if !(3..50).contains(&len) {
        return None;
    }
    if !line.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()) {
        return None;
    }
    if is_section_heading(line) {
        return None;
    }
    if ALL_CAPS_NAME_RE.is_match(line) || TITLE_CASE_NAME_RE.is_match(line) {
        return Some(collapse_spaces(line));
    }
    None
}

/// `Name: Jane Doe` anywhere in the document.
fn name_from_label(text: &NormalizedText) -> Option<String> {
    text.lines
        .iter()
        .find_map(|line| NAME_LABEL_RE.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| collapse_spaces(m.as_str()))
}

/// A bare ALL-CAPS line of 3-40 chars near the top of the document.
fn name_from_caps_line(text: &NormalizedText) -> Option<String> {
    text.lines
        .iter()
        .take(NAME_SEARCH_LINES)
        .find(|line| {
            let len = line.chars().count();
            (3..=40).contains(&len) && BARE_CAPS_LINE_RE.is_match(line) && !is_section_heading(line)
        })
        .map(|line| collapse_spaces(line))
}

fn is_section_heading(line: &str) -> bool {
    let upper = collapse_spaces(line).to_uppercase();
    SECTION_HEADINGS.contains(&upper.as_str())
}

// ────────────────────────────────────────────────────────────────────────────
// Skills fallback
// ────────────────────────────────────────────────────────────────────────────

/// Text after a `Skills:` / `Technologies:` label, or the next line when the
/// label stands alone. Used only when the vocabulary matched nothing.
pub fn labelled_skills(text: &NormalizedText) -> Option<String> {
    let (idx, caps) = text
        .lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| SKILLS_LABEL_RE.captures(line).map(|c| (i, c)))?;

    let inline = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
    let captured = if inline.is_empty() {
        text.lines.get(idx + 1)?.as_str()
    } else {
        inline
    };

    let captured: String = captured.chars().take(SKILLS_CAPTURE_MAX_CHARS).collect();
    let captured = captured.trim();
    (!captured.is_empty()).then(|| captured.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

pub const EXPERIENCE_RULES: &[Rule] = &[experience_from_heading_line, experience_from_anywhere];

/// A line that starts with an experience heading; scans from that line on.
fn experience_from_heading_line(text: &NormalizedText) -> Option<String> {
    let idx = text
        .lines
        .iter()
        .position(|line| EXPERIENCE_HEADING_LINE_RE.is_match(line))?;
    let heading = EXPERIENCE_HEADING_LINE_RE.find(&text.lines[idx])?;

    let mut rest = text.lines[idx][heading.end()..].to_string();
    for line in &text.lines[idx + 1..] {
        if rest.chars().count() >= EXPERIENCE_WINDOW_CHARS {
            break;
        }
        rest.push(' ');
        rest.push_str(line);
    }
    Some(summarize_experience(&rest))
}

/// First heading occurrence anywhere in the flattened text.
fn experience_from_anywhere(text: &NormalizedText) -> Option<String> {
    let heading = EXPERIENCE_HEADING_RE.find(&text.normalized)?;
    Some(summarize_experience(&text.normalized[heading.end()..]))
}

/// Counts year tokens in the window after a heading. Two years usually
/// bracket one role.
fn summarize_experience(after_heading: &str) -> String {
    let window: String = after_heading.chars().take(EXPERIENCE_WINDOW_CHARS).collect();
    let years = YEAR_RE.find_iter(&window).count();

    match years {
        0 => "Experience section found, no dated roles identified".to_string(),
        n => {
            let roles = (n / 2).max(1);
            format!(
                "Approximately {} role{} identified ({} year reference{})",
                roles,
                if roles == 1 { "" } else { "s" },
                n,
                if n == 1 { "" } else { "s" }
            )
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

pub fn education(text: &NormalizedText) -> Option<String> {
    DEGREE_RE
        .find(&text.normalized)
        .map(|m| m.as_str().trim().to_string())
}

fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
