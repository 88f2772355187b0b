//! The AI generation pipeline: profile in, persisted artifact out.
//!
//! Credit ordering is load-bearing everywhere in this module: the
//! balance is checked before any model call, and one credit is consumed
//! only after the artifact row is committed. A model or decode failure
//! between those two points costs the user nothing and persists
//! nothing.

use serde_json::Value;
use tracing::{info, warn};

use crate::ai::store::{GenerationStore, NewCoverLetter, NewCv};
use crate::ai::types::{
    AnalyzeJobRequest, AnalyzeJobResponse, CoverLetterData, GenerateCoverLetterRequest,
    GenerateCoverLetterResponse, GenerateCvRequest, GenerateCvResponse, GeneratedCvData,
};
use crate::ai::{AiError, GenerativeBackend};
use crate::credits::ledger;
use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::models::rows::UserCreditRow;

const DEFAULT_TEMPLATE_ID: &str = "professional";

/// Loads the caller's master profile and renders it for prompting.
///
/// A missing profile and a profile without an owner name are treated
/// identically: both mean there is nothing meaningful to tailor from.
async fn load_usable_profile(
    store: &dyn GenerationStore,
    user_id: &str,
) -> Result<String, AppError> {
    let document = store
        .load_profile(user_id)
        .await?
        .ok_or(AppError::ProfileNotFound)?;

    if !document.has_owner_name() {
        return Err(AppError::ProfileNotFound);
    }

    serde_json::to_string_pretty(&document)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to render profile: {e}")))
}

/// Admission gate: the ledger entry when allowance remains, 402 when
/// none does.
async fn admit(store: &dyn GenerationStore, user_id: &str) -> Result<UserCreditRow, AppError> {
    let entry = store.credit_entry(user_id).await?;

    if ledger::remaining(&entry) <= 0 {
        return Err(AppError::OutOfCredits);
    }

    Ok(entry)
}

/// Draws the post-persist credit. A ledger failure here is logged and
/// absorbed; the artifact is already committed and the caller gets an
/// approximate remaining count instead of an error.
async fn settle_credit(
    store: &dyn GenerationStore,
    user_id: &str,
    before: &UserCreditRow,
) -> i32 {
    match store.consume_credit(user_id).await {
        Ok(after) => ledger::remaining(&after),
        Err(e) => {
            warn!("failed to consume credit for user {user_id}: {e}");
            (ledger::remaining(before) - 1).max(0)
        }
    }
}

/// Analysis only. Free of charge and persists nothing.
pub async fn analyze_job(
    store: &dyn GenerationStore,
    backend: &dyn GenerativeBackend,
    user_id: &str,
    request: AnalyzeJobRequest,
) -> Result<AnalyzeJobResponse, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation("job_description is required".to_string()));
    }

    let profile_json = load_usable_profile(store, user_id).await?;

    let mut analysis = backend
        .analyze_job(&profile_json, &request.job_description)
        .await?;
    analysis.match_score = clamp_score(analysis.match_score);

    Ok(AnalyzeJobResponse { analysis })
}

/// The full tailoring pipeline: analyze, tailor, persist, then charge.
pub async fn generate_cv(
    store: &dyn GenerationStore,
    backend: &dyn GenerativeBackend,
    user_id: &str,
    request: GenerateCvRequest,
) -> Result<GenerateCvResponse, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation("job_description is required".to_string()));
    }

    let before = admit(store, user_id).await?;
    let profile_json = load_usable_profile(store, user_id).await?;

    let mut analysis = backend
        .analyze_job(&profile_json, &request.job_description)
        .await?;
    analysis.match_score = clamp_score(analysis.match_score);

    let raw = backend
        .tailor_document(&profile_json, &request.job_description, &analysis)
        .await?;
    let tailored = decode_tailored(raw)?;

    let name = default_cv_name(request.cv_name.as_deref(), request.job_title.as_deref());
    let suggestions = serde_json::to_value(&analysis.suggestions)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode suggestions: {e}")))?;

    let row = store
        .insert_cv(
            user_id,
            NewCv {
                name: &name,
                document: &tailored,
                template_id: DEFAULT_TEMPLATE_ID,
                job_url: request.job_url.as_deref(),
                job_title: request.job_title.as_deref(),
                company_name: request.company_name.as_deref(),
                job_description: Some(&request.job_description),
                match_score: analysis.match_score,
                suggestions,
            },
        )
        .await?;

    let credits_remaining = settle_credit(store, user_id, &before).await;

    info!(cv_id = %row.id, score = analysis.match_score, "generated tailored CV");

    Ok(GenerateCvResponse {
        cv: GeneratedCvData {
            id: row.id,
            name: row.name,
            resume_data: row.cv_data.0,
            match_score: row.match_score.unwrap_or(analysis.match_score),
            job_title: row.job_title,
            company: row.company_name,
            created_at: row.created_at,
        },
        analysis,
        credits_remaining,
    })
}

/// Cover letter generation. Same credit ordering as CV generation; the
/// optionally linked CV supplies a fallback job description and a
/// summary hint for the prompt. The link is best-effort: an id that no
/// longer resolves (deleted CV) falls back silently and the stored
/// letter carries no link.
pub async fn generate_cover_letter(
    store: &dyn GenerationStore,
    backend: &dyn GenerativeBackend,
    user_id: &str,
    request: GenerateCoverLetterRequest,
) -> Result<GenerateCoverLetterResponse, AppError> {
    if request.job_title.trim().is_empty() || request.company_name.trim().is_empty() {
        return Err(AppError::Validation(
            "job_title and company_name are required".to_string(),
        ));
    }

    let before = admit(store, user_id).await?;
    let profile_json = load_usable_profile(store, user_id).await?;

    let linked_cv = match request.cv_id {
        Some(cv_id) => store.find_cv(user_id, cv_id).await?,
        None => None,
    };

    let job_description = resolve_job_description(
        request.job_description.as_deref(),
        linked_cv.as_ref().and_then(|cv| cv.job_description.as_deref()),
        &request.job_title,
        &request.company_name,
    );

    let cv_summary = linked_cv
        .as_ref()
        .and_then(|cv| cv.cv_data.0.basics.as_ref())
        .and_then(|b| b.summary.clone());

    let content = backend
        .generate_cover_letter(
            &profile_json,
            &request.job_title,
            &request.company_name,
            &job_description,
            cv_summary.as_deref(),
        )
        .await?;

    // Only a resolved link is stored; a stale request id would dangle.
    let row = store
        .insert_cover_letter(
            user_id,
            NewCoverLetter {
                cv_id: linked_cv.as_ref().map(|cv| cv.id),
                content: &content,
                job_title: &request.job_title,
                company_name: &request.company_name,
            },
        )
        .await?;

    let credits_remaining = settle_credit(store, user_id, &before).await;

    info!(cover_letter_id = %row.id, "generated cover letter");

    Ok(GenerateCoverLetterResponse {
        cover_letter: CoverLetterData {
            id: row.id,
            content: row.content,
            job_title: row.job_title.unwrap_or_default(),
            company_name: row.company_name.unwrap_or_default(),
            cv_id: row.cv_id,
            created_at: row.created_at,
        },
        credits_remaining,
    })
}

// ─────────────────────────────────────────────────────────────────────

/// A tailored payload that does not decode into the document schema is
/// a generation failure, and must surface before anything is persisted
/// or charged.
fn decode_tailored(raw: Value) -> Result<ResumeDocument, AppError> {
    serde_json::from_value(raw)
        .map_err(|e| AiError::InvalidResponse(format!("tailored document: {e}")).into())
}

fn clamp_score(score: i32) -> i32 {
    score.clamp(0, 100)
}

/// Explicit name wins; otherwise derive from the job title, with a
/// generic fallback when neither is present.
fn default_cv_name(cv_name: Option<&str>, job_title: Option<&str>) -> String {
    if let Some(name) = cv_name.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    match job_title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => format!("{title} CV"),
        None => "Tailored CV".to_string(),
    }
}

/// Fallback chain: the request's own description, then the linked CV's
/// stored description, then a synthesized one-liner so the prompt is
/// never empty.
fn resolve_job_description(
    requested: Option<&str>,
    linked: Option<&str>,
    job_title: &str,
    company_name: &str,
) -> String {
    if let Some(jd) = requested.map(str::trim).filter(|jd| !jd.is_empty()) {
        return jd.to_string();
    }
    if let Some(jd) = linked.map(str::trim).filter(|jd| !jd.is_empty()) {
        return jd.to_string();
    }
    format!("Position: {job_title} at {company_name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Basics;
    use crate::models::rows::{CoverLetterRow, CvRow};
    use crate::ai::types::JobAnalysis;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use sqlx::types::Json;
    use std::sync::Mutex;
    use uuid::Uuid;

    // ── test doubles ──────────────────────────────────────────────

    /// Canned backend. The tailored payload is configurable so decode
    /// failures can be driven from a test.
    struct StaticBackend {
        tailored: Value,
    }

    impl Default for StaticBackend {
        fn default() -> Self {
            StaticBackend {
                tailored: json!({"basics": {"name": "Ada Lovelace"}}),
            }
        }
    }

    #[async_trait]
    impl GenerativeBackend for StaticBackend {
        async fn analyze_job(&self, _: &str, _: &str) -> Result<JobAnalysis, AiError> {
            Ok(JobAnalysis {
                match_score: 80,
                matching_skills: vec!["Rust".to_string()],
                missing_skills: vec![],
                relevant_experiences: vec![],
                suggestions: vec!["Lead with systems work".to_string()],
                keywords_to_include: vec![],
            })
        }

        async fn tailor_document(
            &self,
            _: &str,
            _: &str,
            _: &JobAnalysis,
        ) -> Result<Value, AiError> {
            Ok(self.tailored.clone())
        }

        async fn generate_cover_letter(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: &str,
            _: Option<&str>,
        ) -> Result<String, AiError> {
            Ok("Dear Hiring Manager,".to_string())
        }
    }

    /// In-memory store recording the order of writes, so the tests can
    /// assert that persistence happens before the credit draw.
    struct FakeStore {
        profile: Option<ResumeDocument>,
        credits: Mutex<UserCreditRow>,
        cvs: Mutex<Vec<CvRow>>,
        letters: Mutex<Vec<CoverLetterRow>>,
        events: Mutex<Vec<&'static str>>,
    }

    impl FakeStore {
        fn with_named_profile(used: i32, limit: i32, paid: i32) -> Self {
            let profile = ResumeDocument {
                basics: Some(Basics {
                    name: Some("Ada Lovelace".to_string()),
                    ..Basics::default()
                }),
                ..ResumeDocument::default()
            };
            FakeStore {
                profile: Some(profile),
                credits: Mutex::new(UserCreditRow {
                    id: Uuid::new_v4(),
                    user_id: "user_1".to_string(),
                    free_generations_used: used,
                    free_generations_limit: limit,
                    paid_credits: paid,
                    total_generations: used,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                }),
                cvs: Mutex::new(vec![]),
                letters: Mutex::new(vec![]),
                events: Mutex::new(vec![]),
            }
        }

        fn events(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationStore for FakeStore {
        async fn load_profile(&self, _: &str) -> Result<Option<ResumeDocument>, AppError> {
            Ok(self.profile.clone())
        }

        async fn credit_entry(&self, _: &str) -> Result<UserCreditRow, AppError> {
            Ok(self.credits.lock().unwrap().clone())
        }

        async fn consume_credit(&self, _: &str) -> Result<UserCreditRow, AppError> {
            self.events.lock().unwrap().push("consume");
            let mut entry = self.credits.lock().unwrap();
            if entry.free_generations_used < entry.free_generations_limit {
                entry.free_generations_used += 1;
            } else {
                entry.paid_credits = (entry.paid_credits - 1).max(0);
            }
            entry.total_generations += 1;
            Ok(entry.clone())
        }

        async fn find_cv(&self, _: &str, id: Uuid) -> Result<Option<CvRow>, AppError> {
            Ok(self.cvs.lock().unwrap().iter().find(|cv| cv.id == id).cloned())
        }

        async fn insert_cv(&self, user_id: &str, cv: NewCv<'_>) -> Result<CvRow, AppError> {
            self.events.lock().unwrap().push("insert_cv");
            let row = CvRow {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                name: cv.name.to_string(),
                cv_data: Json(cv.document.clone()),
                template_id: Some(cv.template_id.to_string()),
                job_url: cv.job_url.map(str::to_string),
                job_title: cv.job_title.map(str::to_string),
                company_name: cv.company_name.map(str::to_string),
                job_description: cv.job_description.map(str::to_string),
                match_score: Some(cv.match_score),
                ai_suggestions: Some(cv.suggestions),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.cvs.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn insert_cover_letter(
            &self,
            user_id: &str,
            letter: NewCoverLetter<'_>,
        ) -> Result<CoverLetterRow, AppError> {
            self.events.lock().unwrap().push("insert_letter");
            let row = CoverLetterRow {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                cv_id: letter.cv_id,
                content: letter.content.to_string(),
                job_title: Some(letter.job_title.to_string()),
                company_name: Some(letter.company_name.to_string()),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.letters.lock().unwrap().push(row.clone());
            Ok(row)
        }
    }

    fn cv_request(jd: &str) -> GenerateCvRequest {
        GenerateCvRequest {
            job_description: jd.to_string(),
            cv_name: None,
            job_title: Some("Backend Engineer".to_string()),
            company_name: Some("Acme".to_string()),
            job_url: None,
        }
    }

    fn letter_request(cv_id: Option<Uuid>) -> GenerateCoverLetterRequest {
        GenerateCoverLetterRequest {
            cv_id,
            job_title: "Backend Engineer".to_string(),
            company_name: "Acme".to_string(),
            job_description: None,
        }
    }

    // ── pipeline sequencing ───────────────────────────────────────

    #[tokio::test]
    async fn test_generate_cv_consumes_one_credit_after_persist() {
        let store = FakeStore::with_named_profile(0, 3, 0);
        let backend = StaticBackend::default();

        let response = generate_cv(&store, &backend, "user_1", cv_request("Rust backend role"))
            .await
            .unwrap();

        assert_eq!(store.events(), vec!["insert_cv", "consume"]);
        assert_eq!(store.credits.lock().unwrap().free_generations_used, 1);
        assert_eq!(response.credits_remaining, 2);
        assert_eq!(response.cv.name, "Backend Engineer CV");
        assert_eq!(store.cvs.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_tailoring_decode_failure_charges_and_persists_nothing() {
        let store = FakeStore::with_named_profile(0, 3, 0);
        let backend = StaticBackend {
            tailored: json!({"basics": "not an object"}),
        };

        let err = generate_cv(&store, &backend, "user_1", cv_request("Rust backend role"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Ai(AiError::InvalidResponse(_))));
        assert!(store.events().is_empty());
        assert!(store.cvs.lock().unwrap().is_empty());
        assert_eq!(store.credits.lock().unwrap().free_generations_used, 0);
    }

    #[tokio::test]
    async fn test_exhausted_credits_block_before_anything_happens() {
        let store = FakeStore::with_named_profile(3, 3, 0);
        let backend = StaticBackend::default();

        let err = generate_cv(&store, &backend, "user_1", cv_request("Rust backend role"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::OutOfCredits));
        assert!(store.events().is_empty());
    }

    #[tokio::test]
    async fn test_nameless_profile_rejected() {
        let mut store = FakeStore::with_named_profile(0, 3, 0);
        store.profile = Some(ResumeDocument::default());
        let backend = StaticBackend::default();

        let err = generate_cv(&store, &backend, "user_1", cv_request("Rust backend role"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ProfileNotFound));
        assert!(store.events().is_empty());
    }

    #[tokio::test]
    async fn test_cover_letter_missing_linked_cv_falls_back_silently() {
        let store = FakeStore::with_named_profile(0, 3, 0);
        let backend = StaticBackend::default();

        // An id that resolves to nothing (e.g. the CV was deleted).
        let response =
            generate_cover_letter(&store, &backend, "user_1", letter_request(Some(Uuid::new_v4())))
                .await
                .unwrap();

        assert_eq!(store.events(), vec!["insert_letter", "consume"]);
        assert_eq!(response.cover_letter.cv_id, None);
        assert_eq!(response.credits_remaining, 2);

        let letters = store.letters.lock().unwrap();
        assert_eq!(letters.len(), 1);
        assert_eq!(letters[0].cv_id, None);
    }

    #[tokio::test]
    async fn test_cover_letter_links_resolved_cv() {
        let store = FakeStore::with_named_profile(0, 3, 0);
        let backend = StaticBackend::default();

        let cv = store
            .insert_cv(
                "user_1",
                NewCv {
                    name: "Backend Engineer CV",
                    document: &ResumeDocument::default(),
                    template_id: "professional",
                    job_url: None,
                    job_title: None,
                    company_name: None,
                    job_description: Some("stored description"),
                    match_score: 70,
                    suggestions: json!([]),
                },
            )
            .await
            .unwrap();
        store.events.lock().unwrap().clear();

        let response = generate_cover_letter(&store, &backend, "user_1", letter_request(Some(cv.id)))
            .await
            .unwrap();

        assert_eq!(response.cover_letter.cv_id, Some(cv.id));
    }

    // ── pure helpers ──────────────────────────────────────────────

    #[test]
    fn test_default_cv_name_explicit_wins() {
        assert_eq!(
            default_cv_name(Some("My Custom CV"), Some("Engineer")),
            "My Custom CV"
        );
    }

    #[test]
    fn test_default_cv_name_from_job_title() {
        assert_eq!(default_cv_name(None, Some("Backend Engineer")), "Backend Engineer CV");
        assert_eq!(default_cv_name(Some("  "), Some("Backend Engineer")), "Backend Engineer CV");
    }

    #[test]
    fn test_default_cv_name_generic_fallback() {
        assert_eq!(default_cv_name(None, None), "Tailored CV");
        assert_eq!(default_cv_name(Some(""), Some("")), "Tailored CV");
    }

    #[test]
    fn test_resolve_job_description_prefers_request() {
        let jd = resolve_job_description(Some("from request"), Some("from cv"), "Dev", "Acme");
        assert_eq!(jd, "from request");
    }

    #[test]
    fn test_resolve_job_description_falls_back_to_linked_cv() {
        let jd = resolve_job_description(Some("  "), Some("from cv"), "Dev", "Acme");
        assert_eq!(jd, "from cv");
    }

    #[test]
    fn test_resolve_job_description_synthesizes() {
        let jd = resolve_job_description(None, None, "Backend Engineer", "Acme");
        assert_eq!(jd, "Position: Backend Engineer at Acme");
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-5), 0);
        assert_eq!(clamp_score(42), 42);
        assert_eq!(clamp_score(150), 100);
    }

    #[test]
    fn test_decode_tailored_accepts_valid_document() {
        let raw = json!({"basics": {"name": "Ada Lovelace"}, "skills": []});
        let doc = decode_tailored(raw).unwrap();
        assert!(doc.has_owner_name());
    }

    #[test]
    fn test_decode_tailored_rejects_wrong_shape() {
        let raw = json!({"basics": "not an object"});
        let err = decode_tailored(raw).unwrap_err();
        assert!(matches!(err, AppError::Ai(AiError::InvalidResponse(_))));
    }
}
