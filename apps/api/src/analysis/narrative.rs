//! Optional LLM elaboration of a finished report. The report itself is
//! never modified.

use serde::{Deserialize, Serialize};

use crate::analysis::prompts::{GROUNDING_INSTRUCTION, NARRATIVE_PROMPT_TEMPLATE, NARRATIVE_SYSTEM};
use crate::analysis::report::AnalysisReport;
use crate::errors::AppError;
use crate::llm_client::{Brief, LlmClient};

const MAX_NEXT_STEPS: usize = 5;
/// Output cap for one narrative; a headline, an overview and five steps.
const NARRATIVE_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub headline: String,
    pub overview: String,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

pub fn build_narrative_prompt(report: &AnalysisReport) -> Result<String, AppError> {
    let report_json = serde_json::to_string_pretty(report)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize report: {e}")))?;

    Ok(NARRATIVE_PROMPT_TEMPLATE
        .replace("{grounding}", GROUNDING_INSTRUCTION)
        .replace("{report_json}", &report_json))
}

pub async fn narrate(report: &AnalysisReport, llm: &LlmClient) -> Result<Narrative, AppError> {
    let prompt = build_narrative_prompt(report)?;
    let mut narrative: Narrative = llm
        .structured(Brief {
            system: NARRATIVE_SYSTEM,
            prompt: &prompt,
            max_tokens: NARRATIVE_MAX_TOKENS,
        })
        .await
        .map_err(|e| AppError::Llm(format!("Narrative generation failed: {e}")))?;

    narrative.next_steps.truncate(MAX_NEXT_STEPS);
    Ok(narrative)
}
