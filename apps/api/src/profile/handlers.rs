//! Axum route handlers for the master profile.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::CallerIdentity;
use crate::models::resume::{ResumeDocument, SectionName};
use crate::models::rows::MasterProfileRow;
use crate::profile::store;
use crate::profile::validation::validate;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: String,
    pub resume_data: ResumeDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileResponse {
    fn from_row(row: MasterProfileRow) -> Self {
        ProfileResponse {
            id: Some(row.id),
            user_id: row.user_id,
            resume_data: row.resume_data.0,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }

    /// The response for a user with no stored profile: an empty
    /// document rather than a 404, so clients can render the editor.
    fn absent(user_id: String) -> Self {
        ProfileResponse {
            id: None,
            user_id,
            resume_data: ResumeDocument::empty(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// GET /api/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
) -> Result<Json<ProfileResponse>, AppError> {
    let response = match store::get(&state.db, &user_id).await? {
        Some(row) => ProfileResponse::from_row(row),
        None => ProfileResponse::absent(user_id),
    };

    Ok(Json(response))
}

/// PUT /api/profile
///
/// Replaces the entire profile document. Creates the profile on first
/// write (upsert semantics — there is no separate creation endpoint).
pub async fn handle_update_profile(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Json(document): Json<ResumeDocument>,
) -> Result<Json<ProfileResponse>, AppError> {
    validate(&document).map_err(|e| AppError::Validation(e.to_string()))?;

    let row = store::upsert(&state.db, &user_id, &document).await?;
    Ok(Json(ProfileResponse::from_row(row)))
}

/// PATCH /api/profile/:section
///
/// Wholesale-replaces one named section of the profile document. The
/// section name must be one of the twelve closed names; the whole
/// document is re-validated before the write is committed.
pub async fn handle_update_section(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(section): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<ProfileResponse>, AppError> {
    let section: SectionName = section
        .parse()
        .map_err(|e: crate::models::resume::UnknownSection| AppError::Validation(e.to_string()))?;

    let mut document = match store::get(&state.db, &user_id).await? {
        Some(row) => row.resume_data.0,
        None => ResumeDocument::empty(),
    };

    document
        .apply_section(section, payload)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    validate(&document).map_err(|e| AppError::Validation(e.to_string()))?;

    let row = store::upsert(&state.db, &user_id, &document).await?;
    Ok(Json(ProfileResponse::from_row(row)))
}

/// DELETE /api/profile
pub async fn handle_delete_profile(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
) -> Result<StatusCode, AppError> {
    store::delete(&state.db, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
