//! CRUD over generated CVs. Every query is scoped by user identity, so
//! a foreign id behaves exactly like a missing one.

use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::models::rows::{CvRow, CvSummaryRow};
use crate::profile::store;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct CreateCvRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCvRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cv_data: Option<ResumeDocument>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
}

/// Normalizes raw pagination input. Page numbers are 1-based; an
/// out-of-range page size falls back to the default rather than
/// erroring or pinning to the bound.
pub fn clamp_pagination(page: Option<i64>, page_size: Option<i64>) -> (i64, i64) {
    let page = match page {
        Some(p) if p >= 1 => p,
        _ => 1,
    };
    let page_size = match page_size {
        Some(s) if (1..=MAX_PAGE_SIZE).contains(&s) => s,
        _ => DEFAULT_PAGE_SIZE,
    };
    (page, page_size)
}

pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + page_size - 1) / page_size
    }
}

/// Lists CV metadata only; the document body is never selected here.
pub async fn list(
    pool: &PgPool,
    user_id: &str,
    page: i64,
    page_size: i64,
) -> Result<(Vec<CvSummaryRow>, i64), AppError> {
    let total: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM generated_cvs WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    let rows = sqlx::query_as::<_, CvSummaryRow>(
        r#"
        SELECT id, user_id, name, template_id, job_title, company_name,
               match_score, created_at, updated_at
        FROM generated_cvs
        WHERE user_id = $1
        ORDER BY updated_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(page_size)
    .bind((page - 1) * page_size)
    .fetch_all(pool)
    .await?;

    Ok((rows, total))
}

pub async fn get(pool: &PgPool, user_id: &str, id: Uuid) -> Result<CvRow, AppError> {
    sqlx::query_as::<_, CvRow>("SELECT * FROM generated_cvs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("CV not found".to_string()))
}

/// Creates a CV seeded from a snapshot of the master profile. A user
/// with no profile gets an empty document; later edits to the profile
/// never propagate into the copy.
pub async fn create(
    pool: &PgPool,
    user_id: &str,
    request: CreateCvRequest,
) -> Result<CvRow, AppError> {
    let snapshot = match store::get(pool, user_id).await? {
        Some(row) => row.resume_data.0,
        None => ResumeDocument::empty(),
    };

    let name = request
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Untitled CV".to_string());
    let template_id = request
        .template_id
        .unwrap_or_else(|| "professional".to_string());

    let row = sqlx::query_as::<_, CvRow>(
        r#"
        INSERT INTO generated_cvs (user_id, name, cv_data, template_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&name)
    .bind(Json(&snapshot))
    .bind(&template_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Partial update: absent fields keep their stored values.
pub async fn update(
    pool: &PgPool,
    user_id: &str,
    id: Uuid,
    request: UpdateCvRequest,
) -> Result<CvRow, AppError> {
    if let Some(document) = &request.cv_data {
        crate::profile::validation::validate(document)
            .map_err(|e| AppError::Validation(e.to_string()))?;
    }

    let row = sqlx::query_as::<_, CvRow>(
        r#"
        UPDATE generated_cvs
        SET name = COALESCE($3, name),
            cv_data = COALESCE($4, cv_data),
            template_id = COALESCE($5, template_id),
            job_url = COALESCE($6, job_url),
            job_title = COALESCE($7, job_title),
            company_name = COALESCE($8, company_name),
            job_description = COALESCE($9, job_description),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&request.name)
    .bind(request.cv_data.as_ref().map(Json))
    .bind(&request.template_id)
    .bind(&request.job_url)
    .bind(&request.job_title)
    .bind(&request.company_name)
    .bind(&request.job_description)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| AppError::NotFound("CV not found".to_string()))
}

pub async fn delete(pool: &PgPool, user_id: &str, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM generated_cvs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("CV not found".to_string()));
    }

    Ok(())
}

/// Copies an existing CV under a " (Copy)" name. Analysis provenance
/// (match score, suggestions) is reset: it described the original
/// generation, not the copy. Duplication never touches the credit
/// ledger.
pub async fn duplicate(pool: &PgPool, user_id: &str, id: Uuid) -> Result<CvRow, AppError> {
    let source = get(pool, user_id, id).await?;

    let row = sqlx::query_as::<_, CvRow>(
        r#"
        INSERT INTO generated_cvs
            (user_id, name, cv_data, template_id, job_url, job_title,
             company_name, job_description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(copy_name(&source.name))
    .bind(&source.cv_data)
    .bind(&source.template_id)
    .bind(&source.job_url)
    .bind(&source.job_title)
    .bind(&source.company_name)
    .bind(&source.job_description)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

fn copy_name(name: &str) -> String {
    format!("{name} (Copy)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_pagination_defaults() {
        assert_eq!(clamp_pagination(None, None), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_clamp_pagination_bounds() {
        assert_eq!(clamp_pagination(Some(0), Some(0)), (1, DEFAULT_PAGE_SIZE));
        assert_eq!(clamp_pagination(Some(-3), Some(500)), (1, DEFAULT_PAGE_SIZE));
        assert_eq!(clamp_pagination(Some(4), Some(25)), (4, 25));
        assert_eq!(clamp_pagination(Some(2), Some(MAX_PAGE_SIZE)), (2, MAX_PAGE_SIZE));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
    }

    #[test]
    fn test_copy_name() {
        assert_eq!(copy_name("Backend CV"), "Backend CV (Copy)");
        assert_eq!(copy_name("Backend CV (Copy)"), "Backend CV (Copy) (Copy)");
    }
}
