//! Generative backend capability interface and the AI generation
//! pipeline built on top of it.
//!
//! ARCHITECTURAL RULE: no other module may call the Gemini API
//! directly. All model interactions go through [`GenerativeBackend`],
//! so any concrete implementation (hosted model, local model, test
//! double) satisfies the same input/output/error contract.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod gemini;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod store;
pub mod types;

pub use gemini::GeminiClient;
pub use types::JobAnalysis;

#[derive(Debug, Error)]
pub enum AiError {
    /// Misconfiguration, fatal at construction time.
    #[error("generative API key not set")]
    ApiKeyNotSet,

    /// Transport or backend failure. Safe for the caller to retry as a
    /// fresh request: nothing has been persisted when this surfaces.
    #[error("failed to generate content: {0}")]
    GenerationFailed(String),

    /// The backend answered, but the payload does not decode into the
    /// expected structured shape.
    #[error("invalid AI response: {0}")]
    InvalidResponse(String),
}

/// The three operations the generation pipeline needs from a model.
///
/// The two structured calls are schema-constrained at the transport
/// boundary; the orchestrator still decodes and validates every
/// response before trusting it.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Scores the profile against a job description and extracts
    /// matching/missing skills, experience notes, suggestions and
    /// keywords.
    async fn analyze_job(
        &self,
        profile_json: &str,
        job_description: &str,
    ) -> Result<JobAnalysis, AiError>;

    /// Produces a full tailored resume document as raw JSON. The
    /// caller decodes it into the document schema; a payload that does
    /// not decode is a tailoring failure, not a transport failure.
    async fn tailor_document(
        &self,
        profile_json: &str,
        job_description: &str,
        analysis: &JobAnalysis,
    ) -> Result<Value, AiError>;

    /// Unconstrained free text.
    async fn generate_cover_letter(
        &self,
        profile_json: &str,
        job_title: &str,
        company_name: &str,
        job_description: &str,
        cv_summary: Option<&str>,
    ) -> Result<String, AiError>;
}
