//! Persistence seam for the generation pipeline.
//!
//! The orchestrator talks to storage only through [`GenerationStore`],
//! so the pipeline's sequencing (admission check, persist, then
//! consume) can be exercised against an in-memory double. Production
//! is the `PgPool` implementation below.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::credits::ledger;
use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::models::rows::{CoverLetterRow, CvRow, UserCreditRow};
use crate::profile::store as profile_store;

/// Column values for a freshly generated CV row.
pub struct NewCv<'a> {
    pub name: &'a str,
    pub document: &'a ResumeDocument,
    pub template_id: &'a str,
    pub job_url: Option<&'a str>,
    pub job_title: Option<&'a str>,
    pub company_name: Option<&'a str>,
    pub job_description: Option<&'a str>,
    pub match_score: i32,
    pub suggestions: Value,
}

/// Column values for a freshly generated cover letter row.
pub struct NewCoverLetter<'a> {
    pub cv_id: Option<Uuid>,
    pub content: &'a str,
    pub job_title: &'a str,
    pub company_name: &'a str,
}

#[async_trait]
pub trait GenerationStore: Send + Sync {
    async fn load_profile(&self, user_id: &str) -> Result<Option<ResumeDocument>, AppError>;

    /// The caller's ledger entry, created on first access.
    async fn credit_entry(&self, user_id: &str) -> Result<UserCreditRow, AppError>;

    /// Draws one credit. Called only after the artifact row exists.
    async fn consume_credit(&self, user_id: &str) -> Result<UserCreditRow, AppError>;

    /// Ownership-scoped CV lookup. `None` for missing or foreign ids.
    async fn find_cv(&self, user_id: &str, id: Uuid) -> Result<Option<CvRow>, AppError>;

    async fn insert_cv(&self, user_id: &str, cv: NewCv<'_>) -> Result<CvRow, AppError>;

    async fn insert_cover_letter(
        &self,
        user_id: &str,
        letter: NewCoverLetter<'_>,
    ) -> Result<CoverLetterRow, AppError>;
}

#[async_trait]
impl GenerationStore for PgPool {
    async fn load_profile(&self, user_id: &str) -> Result<Option<ResumeDocument>, AppError> {
        Ok(profile_store::get(self, user_id)
            .await?
            .map(|row| row.resume_data.0))
    }

    async fn credit_entry(&self, user_id: &str) -> Result<UserCreditRow, AppError> {
        ledger::get_or_create(self, user_id).await
    }

    async fn consume_credit(&self, user_id: &str) -> Result<UserCreditRow, AppError> {
        ledger::consume_one(self, user_id).await
    }

    async fn find_cv(&self, user_id: &str, id: Uuid) -> Result<Option<CvRow>, AppError> {
        let row =
            sqlx::query_as::<_, CvRow>("SELECT * FROM generated_cvs WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(self)
                .await?;

        Ok(row)
    }

    async fn insert_cv(&self, user_id: &str, cv: NewCv<'_>) -> Result<CvRow, AppError> {
        let row = sqlx::query_as::<_, CvRow>(
            r#"
            INSERT INTO generated_cvs
                (user_id, name, cv_data, template_id, job_url, job_title,
                 company_name, job_description, match_score, ai_suggestions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(cv.name)
        .bind(Json(cv.document))
        .bind(cv.template_id)
        .bind(cv.job_url)
        .bind(cv.job_title)
        .bind(cv.company_name)
        .bind(cv.job_description)
        .bind(cv.match_score)
        .bind(cv.suggestions)
        .fetch_one(self)
        .await?;

        Ok(row)
    }

    async fn insert_cover_letter(
        &self,
        user_id: &str,
        letter: NewCoverLetter<'_>,
    ) -> Result<CoverLetterRow, AppError> {
        let row = sqlx::query_as::<_, CoverLetterRow>(
            r#"
            INSERT INTO cover_letters (user_id, cv_id, content, job_title, company_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(letter.cv_id)
        .bind(letter.content)
        .bind(letter.job_title)
        .bind(letter.company_name)
        .fetch_one(self)
        .await?;

        Ok(row)
    }
}
