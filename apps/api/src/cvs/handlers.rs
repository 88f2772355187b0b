//! Route handlers and wire shapes for the CV collection.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::cvs::service::{self, CreateCvRequest, UpdateCvRequest};
use crate::errors::AppError;
use crate::identity::CallerIdentity;
use crate::models::resume::ResumeDocument;
use crate::models::rows::{CvRow, CvSummaryRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListCvsQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CvResponse {
    pub id: Uuid,
    pub name: String,
    pub cv_data: ResumeDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_suggestions: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry in the collection listing. Deliberately omits the
/// document body; clients fetch the full CV by id.
#[derive(Debug, Serialize)]
pub struct CvListItem {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ListCvsResponse {
    pub cvs: Vec<CvListItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

fn summary_to_list_item(row: CvSummaryRow) -> CvListItem {
    CvListItem {
        id: row.id,
        name: row.name,
        template_id: row.template_id,
        job_title: row.job_title,
        company_name: row.company_name,
        match_score: row.match_score,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub fn cv_to_response(row: CvRow) -> CvResponse {
    CvResponse {
        id: row.id,
        name: row.name,
        cv_data: row.cv_data.0,
        template_id: row.template_id,
        job_url: row.job_url,
        job_title: row.job_title,
        company_name: row.company_name,
        job_description: row.job_description,
        match_score: row.match_score,
        ai_suggestions: meaningful_suggestions(row.ai_suggestions),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Normalizes stored suggestions to a non-empty list of non-blank
/// strings, or drops the field entirely. Old rows may hold nulls or
/// odd shapes; those are not worth surfacing.
fn meaningful_suggestions(stored: Option<Value>) -> Option<Vec<String>> {
    let items = match stored {
        Some(Value::Array(items)) => items,
        _ => return None,
    };

    let suggestions: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .collect();

    if suggestions.is_empty() {
        None
    } else {
        Some(suggestions)
    }
}

/// GET /api/cvs
pub async fn handle_list_cvs(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Query(query): Query<ListCvsQuery>,
) -> Result<Json<ListCvsResponse>, AppError> {
    let (page, page_size) = service::clamp_pagination(query.page, query.page_size);
    let (rows, total) = service::list(&state.db, &user_id, page, page_size).await?;

    Ok(Json(ListCvsResponse {
        cvs: rows.into_iter().map(summary_to_list_item).collect(),
        total,
        page,
        page_size,
        total_pages: service::total_pages(total, page_size),
    }))
}

/// GET /api/cvs/:id
pub async fn handle_get_cv(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<CvResponse>, AppError> {
    let row = service::get(&state.db, &user_id, id).await?;
    Ok(Json(cv_to_response(row)))
}

/// POST /api/cvs
pub async fn handle_create_cv(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Json(request): Json<CreateCvRequest>,
) -> Result<(StatusCode, Json<CvResponse>), AppError> {
    let row = service::create(&state.db, &user_id, request).await?;
    Ok((StatusCode::CREATED, Json(cv_to_response(row))))
}

/// PUT /api/cvs/:id
pub async fn handle_update_cv(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCvRequest>,
) -> Result<Json<CvResponse>, AppError> {
    let row = service::update(&state.db, &user_id, id, request).await?;
    Ok(Json(cv_to_response(row)))
}

/// DELETE /api/cvs/:id
pub async fn handle_delete_cv(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service::delete(&state.db, &user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/cvs/:id/duplicate
pub async fn handle_duplicate_cv(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<CvResponse>), AppError> {
    let row = service::duplicate(&state.db, &user_id, id).await?;
    Ok((StatusCode::CREATED, Json(cv_to_response(row))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meaningful_suggestions_filters_blanks() {
        let stored = json!(["Lead with Rust", "", "   ", "Quantify impact"]);
        assert_eq!(
            meaningful_suggestions(Some(stored)),
            Some(vec!["Lead with Rust".to_string(), "Quantify impact".to_string()])
        );
    }

    #[test]
    fn test_meaningful_suggestions_drops_non_arrays() {
        assert_eq!(meaningful_suggestions(None), None);
        assert_eq!(meaningful_suggestions(Some(json!(null))), None);
        assert_eq!(meaningful_suggestions(Some(json!("just a string"))), None);
        assert_eq!(meaningful_suggestions(Some(json!([]))), None);
        assert_eq!(meaningful_suggestions(Some(json!(["", "  "]))), None);
    }

    #[test]
    fn test_list_items_omit_document_body() {
        let item = summary_to_list_item(CvSummaryRow {
            id: Uuid::new_v4(),
            user_id: "user_1".to_string(),
            name: "Backend CV".to_string(),
            template_id: Some("professional".to_string()),
            job_title: Some("Backend Engineer".to_string()),
            company_name: Some("Acme".to_string()),
            match_score: Some(82),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        });

        let encoded = serde_json::to_value(&item).unwrap();
        assert!(encoded.get("cv_data").is_none());
        assert!(encoded.get("job_description").is_none());
        assert_eq!(encoded["name"], "Backend CV");
        assert_eq!(encoded["match_score"], 82);
    }

    #[test]
    fn test_meaningful_suggestions_skips_non_string_items() {
        let stored = json!([1, {"text": "nested"}, "keep me"]);
        assert_eq!(
            meaningful_suggestions(Some(stored)),
            Some(vec!["keep me".to_string()])
        );
    }
}
