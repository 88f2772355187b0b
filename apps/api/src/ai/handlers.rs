//! Route handlers for the generation endpoints. Thin wrappers: all
//! sequencing lives in the orchestrator.

use axum::{extract::State, Json};

use crate::ai::orchestrator;
use crate::ai::types::{
    AnalyzeJobRequest, AnalyzeJobResponse, GenerateCoverLetterRequest,
    GenerateCoverLetterResponse, GenerateCvRequest, GenerateCvResponse,
};
use crate::errors::AppError;
use crate::identity::CallerIdentity;
use crate::state::AppState;

/// POST /api/ai/analyze-job
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Json(request): Json<AnalyzeJobRequest>,
) -> Result<Json<AnalyzeJobResponse>, AppError> {
    let response = orchestrator::analyze_job(&state.db, state.ai.as_ref(), &user_id, request).await?;
    Ok(Json(response))
}

/// POST /api/ai/generate-cv
pub async fn handle_generate_cv(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Json(request): Json<GenerateCvRequest>,
) -> Result<Json<GenerateCvResponse>, AppError> {
    let response = orchestrator::generate_cv(&state.db, state.ai.as_ref(), &user_id, request).await?;
    Ok(Json(response))
}

/// POST /api/cover-letters/generate
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Json(request): Json<GenerateCoverLetterRequest>,
) -> Result<Json<GenerateCoverLetterResponse>, AppError> {
    let response =
        orchestrator::generate_cover_letter(&state.db, state.ai.as_ref(), &user_id, request)
            .await?;
    Ok(Json(response))
}
