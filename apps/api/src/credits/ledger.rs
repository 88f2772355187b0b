//! Credit ledger — per-user generation allowance.
//!
//! Entries are created lazily on first access. `remaining` is derived:
//! the free component is clamped at zero before paid credits are added,
//! so it can never go negative.
//!
//! Known gap: two concurrent generations for the same user can both
//! pass the admission pre-check before either calls `consume_one`. The
//! consume itself is a single conditional UPDATE, but admission is not
//! serialized per user.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::rows::UserCreditRow;

/// Total remaining credits: unclaimed free allowance plus paid balance.
pub fn remaining(entry: &UserCreditRow) -> i32 {
    (entry.free_generations_limit - entry.free_generations_used).max(0) + entry.paid_credits
}

/// Fetches the user's ledger entry, creating it on first access.
/// Idempotent; fails only on storage unavailability.
pub async fn get_or_create(pool: &PgPool, user_id: &str) -> Result<UserCreditRow, AppError> {
    let entry = sqlx::query_as::<_, UserCreditRow>(
        r#"
        INSERT INTO user_credits (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING *
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(entry)
}

/// Consumes one credit as a single conditional atomic update: the free
/// allowance is drawn down first, then the paid balance. The total
/// generation counter always advances.
///
/// Call this only after the generated artifact has been persisted.
/// Callers treat a failure here as non-fatal: the artifact is kept and
/// the failure is logged, never surfaced as a request error.
pub async fn consume_one(pool: &PgPool, user_id: &str) -> Result<UserCreditRow, AppError> {
    let entry = sqlx::query_as::<_, UserCreditRow>(
        r#"
        UPDATE user_credits
        SET free_generations_used = CASE
                WHEN free_generations_used < free_generations_limit
                THEN free_generations_used + 1
                ELSE free_generations_used
            END,
            paid_credits = CASE
                WHEN free_generations_used < free_generations_limit
                THEN paid_credits
                ELSE GREATEST(paid_credits - 1, 0)
            END,
            total_generations = total_generations + 1,
            updated_at = NOW()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn entry(used: i32, limit: i32, paid: i32) -> UserCreditRow {
        UserCreditRow {
            id: Uuid::new_v4(),
            user_id: "user_1".to_string(),
            free_generations_used: used,
            free_generations_limit: limit,
            paid_credits: paid,
            total_generations: used,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_remaining_fresh_entry() {
        assert_eq!(remaining(&entry(0, 3, 0)), 3);
    }

    #[test]
    fn test_remaining_exhausted_free() {
        assert_eq!(remaining(&entry(3, 3, 0)), 0);
    }

    #[test]
    fn test_remaining_adds_paid_credits() {
        assert_eq!(remaining(&entry(3, 3, 5)), 5);
        assert_eq!(remaining(&entry(1, 3, 2)), 4);
    }

    #[test]
    fn test_remaining_never_negative() {
        // Free overdraw is clamped before paid credits are added.
        assert_eq!(remaining(&entry(7, 3, 0)), 0);
        assert_eq!(remaining(&entry(7, 3, 2)), 2);
    }
}
