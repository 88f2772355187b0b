//! Master profile storage: one resume document per user identity.
//!
//! Upsert semantics throughout — there is no explicit creation step.
//! The first write (full replace or section patch) creates the row.

use sqlx::types::Json;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::models::rows::MasterProfileRow;

pub async fn get(pool: &PgPool, user_id: &str) -> Result<Option<MasterProfileRow>, AppError> {
    let row = sqlx::query_as::<_, MasterProfileRow>(
        "SELECT * FROM master_profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn upsert(
    pool: &PgPool,
    user_id: &str,
    document: &ResumeDocument,
) -> Result<MasterProfileRow, AppError> {
    let row = sqlx::query_as::<_, MasterProfileRow>(
        r#"
        INSERT INTO master_profiles (user_id, resume_data)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE
            SET resume_data = EXCLUDED.resume_data,
                updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(Json(document))
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn delete(pool: &PgPool, user_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM master_profiles WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
