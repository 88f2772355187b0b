//! CRUD over cover letters, all scoped by user identity. Manual
//! creation here is free; only the generation pipeline charges credits.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::rows::CoverLetterRow;

#[derive(Debug, Deserialize)]
pub struct CreateCoverLetterRequest {
    pub content: String,
    #[serde(default)]
    pub cv_id: Option<Uuid>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCoverLetterRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

pub async fn list(pool: &PgPool, user_id: &str) -> Result<Vec<CoverLetterRow>, AppError> {
    let rows = sqlx::query_as::<_, CoverLetterRow>(
        "SELECT * FROM cover_letters WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get(pool: &PgPool, user_id: &str, id: Uuid) -> Result<CoverLetterRow, AppError> {
    sqlx::query_as::<_, CoverLetterRow>(
        "SELECT * FROM cover_letters WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Cover letter not found".to_string()))
}

pub async fn create(
    pool: &PgPool,
    user_id: &str,
    request: CreateCoverLetterRequest,
) -> Result<CoverLetterRow, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content is required".to_string()));
    }

    // The linked CV, when given, must belong to the caller.
    if let Some(cv_id) = request.cv_id {
        let owned: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM generated_cvs WHERE id = $1 AND user_id = $2",
        )
        .bind(cv_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        if owned.is_none() {
            return Err(AppError::Validation("linked CV not found".to_string()));
        }
    }

    let row = sqlx::query_as::<_, CoverLetterRow>(
        r#"
        INSERT INTO cover_letters (user_id, cv_id, content, job_title, company_name)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(request.cv_id)
    .bind(&request.content)
    .bind(&request.job_title)
    .bind(&request.company_name)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Partial update: absent fields keep their stored values.
pub async fn update(
    pool: &PgPool,
    user_id: &str,
    id: Uuid,
    request: UpdateCoverLetterRequest,
) -> Result<CoverLetterRow, AppError> {
    if let Some(content) = &request.content {
        if content.trim().is_empty() {
            return Err(AppError::Validation("content cannot be empty".to_string()));
        }
    }

    let row = sqlx::query_as::<_, CoverLetterRow>(
        r#"
        UPDATE cover_letters
        SET content = COALESCE($3, content),
            job_title = COALESCE($4, job_title),
            company_name = COALESCE($5, company_name),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&request.content)
    .bind(&request.job_title)
    .bind(&request.company_name)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| AppError::NotFound("Cover letter not found".to_string()))
}

pub async fn delete(pool: &PgPool, user_id: &str, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM cover_letters WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Cover letter not found".to_string()));
    }

    Ok(())
}
