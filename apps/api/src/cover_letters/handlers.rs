//! Route handlers for the cover letter collection. The generation
//! endpoint lives with the AI handlers; these cover the manual CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::cover_letters::service::{self, CreateCoverLetterRequest, UpdateCoverLetterRequest};
use crate::errors::AppError;
use crate::identity::CallerIdentity;
use crate::models::rows::CoverLetterRow;
use crate::state::AppState;
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct ListCoverLettersResponse {
    pub cover_letters: Vec<CoverLetterRow>,
    pub total: usize,
}

/// GET /api/cover-letters
pub async fn handle_list_cover_letters(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
) -> Result<Json<ListCoverLettersResponse>, AppError> {
    let rows = service::list(&state.db, &user_id).await?;
    let total = rows.len();

    Ok(Json(ListCoverLettersResponse {
        cover_letters: rows,
        total,
    }))
}

/// GET /api/cover-letters/:id
pub async fn handle_get_cover_letter(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<CoverLetterRow>, AppError> {
    let row = service::get(&state.db, &user_id, id).await?;
    Ok(Json(row))
}

/// POST /api/cover-letters
pub async fn handle_create_cover_letter(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Json(request): Json<CreateCoverLetterRequest>,
) -> Result<(StatusCode, Json<CoverLetterRow>), AppError> {
    let row = service::create(&state.db, &user_id, request).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/cover-letters/:id
pub async fn handle_update_cover_letter(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCoverLetterRequest>,
) -> Result<Json<CoverLetterRow>, AppError> {
    let row = service::update(&state.db, &user_id, id, request).await?;
    Ok(Json(row))
}

/// DELETE /api/cover-letters/:id
pub async fn handle_delete_cover_letter(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service::delete(&state.db, &user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
