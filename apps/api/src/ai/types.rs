//! Request/response types for the AI generation surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::resume::ResumeDocument;

/// Structured job-fit analysis produced by the generative backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub match_score: i32,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub relevant_experiences: Vec<String>,
    pub suggestions: Vec<String>,
    pub keywords_to_include: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeJobResponse {
    pub analysis: JobAnalysis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateCvRequest {
    pub job_description: String,
    #[serde(default)]
    pub cv_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateCvResponse {
    pub cv: GeneratedCvData,
    pub analysis: JobAnalysis,
    pub credits_remaining: i32,
}

/// The slice of a saved CV returned from generation.
#[derive(Debug, Serialize)]
pub struct GeneratedCvData {
    pub id: Uuid,
    pub name: String,
    pub resume_data: ResumeDocument,
    pub match_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateCoverLetterRequest {
    #[serde(default)]
    pub cv_id: Option<Uuid>,
    pub job_title: String,
    pub company_name: String,
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateCoverLetterResponse {
    pub cover_letter: CoverLetterData,
    pub credits_remaining: i32,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterData {
    pub id: Uuid,
    pub content: String,
    pub job_title: String,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// The user's credit balance, including the derived remaining count.
#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub free_generations_used: i32,
    pub free_generations_limit: i32,
    pub paid_credits: i32,
    pub total_generations: i32,
    pub remaining: i32,
}
