//! Database row types, one struct per table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::resume::ResumeDocument;

/// The single master profile per user identity. Upsert semantics:
/// created on first write, never explicitly created.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MasterProfileRow {
    pub id: Uuid,
    pub user_id: String,
    pub resume_data: Json<ResumeDocument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A generated CV artifact: an ownership-copied document snapshot plus
/// provenance metadata. Never a live reference to the master profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub cv_data: Json<ResumeDocument>,
    pub template_id: Option<String>,
    pub job_url: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_description: Option<String>,
    pub match_score: Option<i32>,
    pub ai_suggestions: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List projection of a generated CV: all metadata, no document body.
/// Documents can be large; the collection listing never loads them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvSummaryRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub template_id: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub match_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `cv_id` is a weak reference: the linked CV may be deleted
/// independently (FK is ON DELETE SET NULL).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CoverLetterRow {
    pub id: Uuid,
    pub user_id: String,
    pub cv_id: Option<Uuid>,
    pub content: String,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-user generation allowance. Created lazily on first access.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserCreditRow {
    pub id: Uuid,
    pub user_id: String,
    pub free_generations_used: i32,
    pub free_generations_limit: i32,
    pub paid_credits: i32,
    pub total_generations: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
