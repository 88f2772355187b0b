//! Gemini client — the production [`GenerativeBackend`] implementation.
//!
//! Wraps the Gemini `generateContent` REST endpoint. The two
//! structured operations request schema-constrained JSON output; cover
//! letters are plain text.
//!
//! Model: gemini-2.5-flash (hardcoded — do not make configurable to prevent drift)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::ai::prompts::{
    build_cover_letter_prompt, build_job_analysis_prompt, build_tailoring_prompt,
    job_analysis_schema, resume_document_schema,
};
use crate::ai::types::JobAnalysis;
use crate::ai::{AiError, GenerativeBackend};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all generative calls.
pub const MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_json_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Extracts the text of the first candidate's first text part.
    fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .iter()
            .find_map(|p| p.text.as_deref())
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, AiError> {
        if api_key.is_empty() {
            return Err(AiError::ApiKeyNotSet);
        }

        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .map_err(|e| AiError::GenerationFailed(e.to_string()))?,
            api_key,
        })
    }

    async fn generate(&self, prompt: &str, schema: Option<Value>) -> Result<String, AiError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: schema.map(|s| GenerationConfig {
                response_mime_type: "application/json",
                response_json_schema: s,
            }),
        };

        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AiError::GenerationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::GenerationFailed(format!(
                "API returned {status}: {body}"
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AiError::GenerationFailed(e.to_string()))?;

        let text = parsed
            .text()
            .ok_or_else(|| AiError::InvalidResponse("empty response content".to_string()))?;

        debug!("Gemini call succeeded: {} bytes", text.len());
        Ok(text.to_string())
    }

    /// Schema-constrained JSON generation.
    async fn generate_json(&self, prompt: &str, schema: Value) -> Result<String, AiError> {
        self.generate(prompt, Some(schema)).await
    }

    /// Plain text generation.
    async fn generate_text(&self, prompt: &str) -> Result<String, AiError> {
        self.generate(prompt, None).await
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn analyze_job(
        &self,
        profile_json: &str,
        job_description: &str,
    ) -> Result<JobAnalysis, AiError> {
        let prompt = build_job_analysis_prompt(profile_json, job_description);
        let text = self.generate_json(&prompt, job_analysis_schema()).await?;

        serde_json::from_str(strip_json_fences(&text))
            .map_err(|e| AiError::InvalidResponse(e.to_string()))
    }

    async fn tailor_document(
        &self,
        profile_json: &str,
        job_description: &str,
        analysis: &JobAnalysis,
    ) -> Result<Value, AiError> {
        let analysis_json = serde_json::to_string(analysis)
            .map_err(|e| AiError::GenerationFailed(e.to_string()))?;
        let prompt = build_tailoring_prompt(profile_json, job_description, &analysis_json);
        let text = self
            .generate_json(&prompt, resume_document_schema())
            .await?;

        serde_json::from_str(strip_json_fences(&text))
            .map_err(|e| AiError::InvalidResponse(e.to_string()))
    }

    async fn generate_cover_letter(
        &self,
        profile_json: &str,
        job_title: &str,
        company_name: &str,
        job_description: &str,
        cv_summary: Option<&str>,
    ) -> Result<String, AiError> {
        let prompt = build_cover_letter_prompt(
            profile_json,
            job_title,
            company_name,
            job_description,
            cv_summary,
        );
        let text = self.generate_text(&prompt).await?;
        Ok(text.trim().to_string())
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences the model
/// sometimes wraps JSON in despite the JSON response mime type.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_api_key() {
        assert!(matches!(
            GeminiClient::new(String::new()),
            Err(AiError::ApiKeyNotSet)
        ));
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_response_text_takes_first_text_part() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "hello"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), Some("hello"));

        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert_eq!(empty.text(), None);
    }
}
