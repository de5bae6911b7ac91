// Résumé extraction: plain text in, always-populated CandidateRecord out.
// Pure and deterministic; document decoding lives in `document`.

pub mod document;
pub mod fields;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod skills;

use tracing::debug;

use crate::extraction::fields::{first_match, EXPERIENCE_RULES, NAME_RULES};
use crate::extraction::models::{
    CandidateRecord, DocumentType, Field, DEGREE_NOT_FOUND, EMAIL_NOT_FOUND,
    EXPERIENCE_NOT_FOUND, NAME_NOT_FOUND, PHONE_NOT_FOUND, SKILLS_NOT_FOUND,
};
use crate::extraction::normalizer::normalize;
use crate::extraction::skills::match_skills;

/// Builds a `CandidateRecord` from decoded résumé text.
///
/// Never fails: each field that cannot be found carries its sentinel.
/// Identical input always yields an identical record.
pub fn extract_fields(text: &str, document_type: DocumentType) -> CandidateRecord {
    let text = normalize(text);

    let skills = match_skills(&text.normalized);
    let skills_summary = if skills.is_empty() {
        fields::labelled_skills(&text)
    } else {
        Some(skills.join(", "))
    };

    let record = CandidateRecord {
        name: Field::or_sentinel(first_match(NAME_RULES, &text), NAME_NOT_FOUND),
        email: Field::or_sentinel(fields::email(&text), EMAIL_NOT_FOUND),
        phone: Field::or_sentinel(fields::phone(&text), PHONE_NOT_FOUND),
        skills,
        skills_summary: Field::or_sentinel(skills_summary, SKILLS_NOT_FOUND),
        experience_summary: Field::or_sentinel(
            first_match(EXPERIENCE_RULES, &text),
            EXPERIENCE_NOT_FOUND,
        ),
        education_summary: Field::or_sentinel(fields::education(&text), DEGREE_NOT_FOUND),
        document_type: Some(document_type),
        text_length: text.normalized.chars().count(),
    };

    debug!(
        document_type = document_type.as_str(),
        text_length = record.text_length,
        name = record.name.is_found(),
        email = record.email.is_found(),
        phone = record.phone.is_found(),
        skills = record.skills.len(),
        experience = record.experience_summary.is_found(),
        education = record.education_summary.is_found(),
        "extracted candidate fields"
    );

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "JOHN SMITH\njohn@x.com\nSkills: Python, React\nExperience: 2020-2022 Acme Corp";

    #[test]
    fn test_scenario_sample_resume() {
        let record = extract_fields(SAMPLE, DocumentType::Pdf);
        assert_eq!(record.name.as_str(), "JOHN SMITH");
        assert_eq!(record.email.as_str(), "john@x.com");
        assert!(record.skills.contains(&"Python".to_string()));
        assert!(record.skills.contains(&"React".to_string()));
        assert_eq!(record.skills_summary.as_str(), "Python, React");
        assert!(record.experience_summary.is_found());
        assert_eq!(record.education_summary, Field::Missing(DEGREE_NOT_FOUND));
        assert_eq!(record.phone, Field::Missing(PHONE_NOT_FOUND));
        assert_eq!(record.document_type, Some(DocumentType::Pdf));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let a = extract_fields(SAMPLE, DocumentType::Docx);
        let b = extract_fields(SAMPLE, DocumentType::Docx);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_empty_document_is_all_sentinels() {
        let record = extract_fields("   \n\n  ", DocumentType::Pdf);
        assert_eq!(record.name, Field::Missing(NAME_NOT_FOUND));
        assert_eq!(record.email, Field::Missing(EMAIL_NOT_FOUND));
        assert_eq!(record.phone, Field::Missing(PHONE_NOT_FOUND));
        assert!(record.skills.is_empty());
        assert_eq!(record.skills_summary, Field::Missing(SKILLS_NOT_FOUND));
        assert_eq!(record.experience_summary, Field::Missing(EXPERIENCE_NOT_FOUND));
        assert_eq!(record.education_summary, Field::Missing(DEGREE_NOT_FOUND));
        assert_eq!(record.text_length, 0);
    }

    #[test]
    fn test_skills_fall_back_to_labelled_paragraph() {
        let record = extract_fields(
            "Jane Doe\nSkills: Haskell, Elm, OCaml\nEducation: B.Sc Mathematics",
            DocumentType::Pdf,
        );
        assert!(record.skills.is_empty());
        assert_eq!(record.skills_summary.as_str(), "Haskell, Elm, OCaml");
        assert_eq!(record.education_summary.as_str(), "B.Sc");
    }

    #[test]
    fn test_one_skill_per_line_keeps_go() {
        let record = extract_fields("Skills\nGo\nDocker", DocumentType::Pdf);
        assert_eq!(record.skills, vec!["Go", "Docker"]);
    }

    #[test]
    fn test_full_resume() {
        let text = "\
            Priya Sharma\n\
            priya.sharma@example.in | +91 9876543210\n\
            Technical Skills\n\
            Java, Spring Boot, MySQL, Docker, Kubernetes, AWS\n\
            Work Experience\n\
            Senior Engineer, Infosys 2021 - Present\n\
            Engineer, TCS 2018 - 2021\n\
            Education\n\
            B.Tech in Computer Science, 2014 - 2018\n";
        let record = extract_fields(text, DocumentType::Docx);
        assert_eq!(record.name.as_str(), "Priya Sharma");
        assert_eq!(record.email.as_str(), "priya.sharma@example.in");
        assert_eq!(record.phone.as_str(), "+91 9876543210");
        assert_eq!(
            record.skills,
            vec!["Java", "Spring", "MySQL", "Docker", "Kubernetes", "AWS"]
        );
        assert!(record.experience_summary.as_str().contains("role"));
        assert_eq!(record.education_summary.as_str(), "B.Tech");
    }

    #[test]
    fn test_record_serializes_with_sentinels_not_nulls() {
        let record = extract_fields("", DocumentType::Pdf);
        let value = serde_json::to_value(&record).unwrap();
        for key in [
            "name",
            "email",
            "phone",
            "skillsSummary",
            "experienceSummary",
            "educationSummary",
        ] {
            assert!(value[key].is_string(), "{key} should be a string");
        }
        assert_eq!(value["skills"], serde_json::json!([]));
    }
}
