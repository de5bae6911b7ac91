//! Skill vocabulary matcher.
//!
//! A static, append-only table of canonical tags and their boundary-safe
//! patterns. Adding a skill is a table edit; nothing else changes.
//!
//! The `regex` crate has no look-around, so boundaries are written as
//! consuming classes: `(?:^|[^a-z0-9_])` before the token and a terminator
//! class after it. Since we only ask "does it occur", consuming the
//! neighbouring character is harmless.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// How a table pattern is wrapped before compilation.
#[derive(Debug, Clone, Copy)]
enum Boundary {
    /// Case-insensitive, bounded by non-word characters on both sides.
    Word,
    /// Used verbatim. The pattern carries its own flags and boundaries.
    Raw,
}

struct SkillPattern {
    tag: &'static str,
    boundary: Boundary,
    pattern: &'static str,
}

const fn word(tag: &'static str, pattern: &'static str) -> SkillPattern {
    SkillPattern {
        tag,
        boundary: Boundary::Word,
        pattern,
    }
}

const fn raw(tag: &'static str, pattern: &'static str) -> SkillPattern {
    SkillPattern {
        tag,
        boundary: Boundary::Raw,
        pattern,
    }
}

const SKILL_TABLE: &[SkillPattern] = &[
    // Languages
    word("JavaScript", r"javascript"),
    word("TypeScript", r"typescript"),
    word("Python", r"python"),
    word("Java", r"java"),
    // "C" must not fire on C++ / C#.
    raw("C", r"(?i)(?:^|[^a-z0-9_+#])c(?:$|[^a-z0-9_+#])"),
    raw("C++", r"(?i)(?:^|[^a-z0-9_])c\+\+(?:$|[^a-z0-9_+])"),
    raw("C#", r"(?i)(?:^|[^a-z0-9_])c#(?:$|[^a-z0-9_#])"),
    // "Go" in any case, but only when followed by punctuation, end of text or
    // a token that is not a lower-case word, so "ready to go now" stays quiet.
    // "Golang" always counts.
    raw(
        "Go",
        r"(?i:(?:^|[^a-z0-9_])golang(?:$|[^a-z0-9_]))|(?i:(?:^|[^a-z0-9_])go)(?:$|[,;/|).\]]|\s+[^a-z\s])",
    ),
    word("Rust", r"rust"),
    word("Kotlin", r"kotlin"),
    word("Swift", r"swift"),
    word("Ruby", r"ruby"),
    word("PHP", r"php"),
    word("SQL", r"sql"),
    word("HTML", r"html5?"),
    word("CSS", r"css3?"),
    // Frameworks and libraries
    word("React", r"react(?:\.?js)?"),
    word("Angular", r"angular(?:\.?js)?"),
    word("Vue", r"vue(?:\.?js)?"),
    word("Next.js", r"next\.?js"),
    word("Node.js", r"node\.?js"),
    word("Express", r"express\.?js"),
    word("Django", r"django"),
    word("Flask", r"flask"),
    word("Spring", r"spring(?:\s?boot)?"),
    word("Tailwind", r"tailwind(?:\s?css)?"),
    word("TensorFlow", r"tensorflow"),
    word("PyTorch", r"pytorch"),
    word("Machine Learning", r"machine\s+learning"),
    // Databases
    word("MongoDB", r"mongo(?:db)?"),
    word("MySQL", r"mysql"),
    word("PostgreSQL", r"postgres(?:ql)?"),
    word("Redis", r"redis"),
    word("Firebase", r"firebase"),
    // DevOps and cloud
    word("Docker", r"docker"),
    word("Kubernetes", r"kubernetes|k8s"),
    word("AWS", r"aws|amazon\s+web\s+services"),
    word("Azure", r"azure"),
    word("GCP", r"gcp|google\s+cloud"),
    word("Git", r"git"),
    word("Jenkins", r"jenkins"),
    word("CI/CD", r"ci\s?/\s?cd|ci-cd"),
    word("Linux", r"linux"),
    word("Terraform", r"terraform"),
    // APIs and methodologies
    word("GraphQL", r"graphql"),
    word("REST API", r"restful(?:\s+apis?)?|rest\s+apis?"),
    word("Agile", r"agile"),
    word("Scrum", r"scrum"),
];

struct CompiledSkill {
    tag: &'static str,
    regex: Regex,
}

static COMPILED_SKILLS: Lazy<Vec<CompiledSkill>> = Lazy::new(|| {
    SKILL_TABLE
        .iter()
        .filter_map(|entry| {
            let source = match entry.boundary {
                Boundary::Word => {
                    format!(r"(?i)(?:^|[^a-z0-9_])(?:{})(?:$|[^a-z0-9_])", entry.pattern)
                }
                Boundary::Raw => entry.pattern.to_string(),
            };
            match Regex::new(&source) {
                Ok(regex) => Some(CompiledSkill {
                    tag: entry.tag,
                    regex,
                }),
                Err(e) => {
                    warn!(tag = entry.tag, error = %e, "skipping uncompilable skill pattern");
                    None
                }
            }
        })
        .collect()
});

/// Returns the canonical tags found in `normalized`, in table order, each at
/// most once.
pub fn match_skills(normalized: &str) -> Vec<String> {
    COMPILED_SKILLS
        .iter()
        .filter(|skill| skill.regex.is_match(normalized))
        .map(|skill| skill.tag.to_string())
        .collect()
}

/// Number of tags in the vocabulary.
pub fn vocabulary_size() -> usize {
    COMPILED_SKILLS.len()
}
