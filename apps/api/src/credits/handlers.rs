use axum::{extract::State, Json};

use crate::ai::types::CreditsResponse;
use crate::credits::ledger;
use crate::errors::AppError;
use crate::identity::CallerIdentity;
use crate::state::AppState;

/// GET /api/credits
pub async fn handle_get_credits(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
) -> Result<Json<CreditsResponse>, AppError> {
    let entry = ledger::get_or_create(&state.db, &user_id).await?;

    Ok(Json(CreditsResponse {
        free_generations_used: entry.free_generations_used,
        free_generations_limit: entry.free_generations_limit,
        paid_credits: entry.paid_credits,
        total_generations: entry.total_generations,
        remaining: ledger::remaining(&entry),
    }))
}
