// Prompt constants for narrative enrichment.

/// System prompt for the report narrative. Enforces JSON-only output.
pub const NARRATIVE_SYSTEM: &str =
    "You are an experienced technical recruiter writing feedback for a software developer. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Keeps the model from contradicting or re-scoring the computed report.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Use only facts present in the report provided. \
    Do NOT invent skills, employers, projects, or numbers. \
    Do NOT change, recompute, or dispute any score. \
    If the report has no data for a platform, do not mention that platform.";

/// Narrative prompt template. Replace `{grounding}` and `{report_json}` before sending.
pub const NARRATIVE_PROMPT_TEMPLATE: &str = r#"Write short, encouraging career feedback based on the analysis report below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "headline": "One sentence describing the candidate's current standing",
  "overview": "Two to four sentences expanding on strengths and gaps",
  "nextSteps": ["Concrete action", "Concrete action", "Concrete action"]
}

Rules:
- nextSteps has between 1 and 5 entries, each under 120 characters.
- Refer to platforms by name (GitHub, LeetCode, HackerRank).
- Address the candidate in the second person.

{grounding}

ANALYSIS REPORT:
{report_json}"#;
