/// Two views of the same document text.
///
/// `normalized` has every whitespace run collapsed to a single space and is
/// used for position-independent scans (email, phone, skills). `lines` keeps
/// the line structure, trimmed and with blank lines dropped, for heuristics
/// that care where something sits in the document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText {
    pub normalized: String,
    pub lines: Vec<String>,
}

pub fn normalize(text: &str) -> NormalizedText {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    NormalizedText { normalized, lines }
}
