use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const NAME_NOT_FOUND: &str = "Name not found";
pub const EMAIL_NOT_FOUND: &str = "Email not found";
pub const PHONE_NOT_FOUND: &str = "Phone not found";
pub const SKILLS_NOT_FOUND: &str = "Skills not found";
pub const EXPERIENCE_NOT_FOUND: &str = "Experience section not clearly identified";
pub const DEGREE_NOT_FOUND: &str = "Degree not found";

/// Placeholder used when a client sends an empty string for a field.
pub const NOT_PROVIDED: &str = "Not provided";

const SENTINELS: &[&str] = &[
    NAME_NOT_FOUND,
    EMAIL_NOT_FOUND,
    PHONE_NOT_FOUND,
    SKILLS_NOT_FOUND,
    EXPERIENCE_NOT_FOUND,
    DEGREE_NOT_FOUND,
    NOT_PROVIDED,
];

/// Kind of document the text was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Docx,
}

impl DocumentType {
    /// Detects the document kind from an upload's MIME type and file name.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        let content_type = content_type.unwrap_or("").to_lowercase();
        let file_name = file_name.unwrap_or("").to_lowercase();

        if content_type == "application/pdf" || file_name.ends_with(".pdf") {
            Some(DocumentType::Pdf)
        } else if content_type.contains("wordprocessingml")
            || content_type == "application/msword"
            || file_name.ends_with(".docx")
            || file_name.ends_with(".doc")
        {
            Some(DocumentType::Docx)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Docx => "docx",
        }
    }
}

/// Already-decoded résumé text. Never retained after extraction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub text: String,
    pub document_type: DocumentType,
}

/// An always-populated text field: either extracted content or the
/// human-readable placeholder chosen when the field was built.
///
/// Serialized as a plain string in both cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Field {
    Found(String),
    Missing(&'static str),
}

impl Field {
    /// Wraps an extraction result, substituting `sentinel` on a miss.
    pub fn or_sentinel(value: Option<String>, sentinel: &'static str) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Field::Found(v),
            _ => Field::Missing(sentinel),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Field::Found(_))
    }

    pub fn found(&self) -> Option<&str> {
        match self {
            Field::Found(v) => Some(v.as_str()),
            Field::Missing(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Field::Found(v) => v.as_str(),
            Field::Missing(s) => *s,
        }
    }
}

impl From<String> for Field {
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Field::Missing(NOT_PROVIDED);
        }
        match SENTINELS.iter().copied().find(|s| *s == trimmed) {
            Some(sentinel) => Field::Missing(sentinel),
            None => Field::Found(raw),
        }
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        match field {
            Field::Found(v) => v,
            Field::Missing(s) => s.to_string(),
        }
    }
}

// Hand-written so `'de` stays free of the `'static` sentinel borrow.
impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Field::from)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized candidate fields extracted from one résumé.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub name: Field,
    pub email: Field,
    pub phone: Field,
    /// Canonical tags in dictionary order.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Comma-joined tags, or the labelled skills paragraph when no tag matched.
    pub skills_summary: Field,
    pub experience_summary: Field,
    pub education_summary: Field,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(default)]
    pub text_length: usize,
}
