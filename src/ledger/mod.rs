//! Capacity ledger: the component that keeps a post's remaining-volunteer
//! counter and its set of live requests consistent.
//!
//! Every capacity mutation goes through here as a single SQLite transaction.
//! The capacity check is a conditional decrement (`WHERE volunteers_needed >
//! 0`), never a read-then-write pair, so concurrent submissions against the
//! same post cannot over-subscribe it. Duplicate prevention is enforced by
//! the unique `(post_id, volunteer_email)` index in the store; any rejected
//! submission rolls its transaction back and leaves no trace.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{SubmitRequestBody, VolunteerRequest};

/// Mediates request submission and withdrawal against post capacity.
#[derive(Clone)]
pub struct CapacityLedger {
    pool: SqlitePool,
}

impl CapacityLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Submit a volunteer request against a post.
    ///
    /// Atomically consumes one unit of the post's capacity and creates the
    /// request, or changes nothing: `NotFound` when the post does not exist,
    /// `CapacityExhausted` when its counter is zero, `DuplicateRequest` when
    /// this volunteer already has a live request against the post.
    pub async fn submit(&self, body: &SubmitRequestBody) -> Result<VolunteerRequest, AppError> {
        // Duplicate check first: re-applying to a full post is still a
        // duplicate, not a capacity rejection. This read runs outside the
        // transaction; the unique index at insert time remains the
        // authoritative guard against concurrent duplicates.
        let duplicate =
            sqlx::query("SELECT 1 FROM requests WHERE post_id = ? AND volunteer_email = ?")
                .bind(&body.post_id)
                .bind(&body.volunteer_email)
                .fetch_optional(&self.pool)
                .await?;

        if duplicate.is_some() {
            return Err(AppError::DuplicateRequest(format!(
                "A request by {} against post {} already exists",
                body.volunteer_email, body.post_id
            )));
        }

        let mut tx = self.pool.begin().await?;

        // Conditional decrement: capacity check and consumption in one
        // statement, atomic with respect to concurrent submitters. Kept as
        // the transaction's first statement so the write lock is taken up
        // front rather than upgraded from a read snapshot.
        let decremented = sqlx::query(
            "UPDATE posts SET volunteers_needed = volunteers_needed - 1 \
             WHERE id = ? AND volunteers_needed > 0",
        )
        .bind(&body.post_id)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            // Zero rows: post absent, or counter already at zero
            let exists = sqlx::query("SELECT 1 FROM posts WHERE id = ?")
                .bind(&body.post_id)
                .fetch_optional(&mut *tx)
                .await?;

            return Err(match exists {
                Some(_) => AppError::CapacityExhausted(format!(
                    "Post {} has no remaining volunteer capacity",
                    body.post_id
                )),
                None => AppError::NotFound(format!("Post {} not found", body.post_id)),
            });
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let inserted = sqlx::query(
            "INSERT INTO requests (id, post_id, post_title, volunteer_name, volunteer_email, \
             organizer_email, suggestion, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&body.post_id)
        .bind(&body.post_title)
        .bind(&body.volunteer_name)
        .bind(&body.volunteer_email)
        .bind(&body.organizer_email)
        .bind(&body.suggestion)
        .bind(&now)
        .execute(&mut *tx)
        .await;

        if let Err(err) = inserted {
            // Dropping the transaction rolls the decrement back, so a
            // rejected duplicate leaves the counter untouched.
            if is_unique_violation(&err) {
                return Err(AppError::DuplicateRequest(format!(
                    "A request by {} against post {} already exists",
                    body.volunteer_email, body.post_id
                )));
            }
            return Err(err.into());
        }

        tx.commit().await?;

        Ok(VolunteerRequest {
            id,
            post_id: body.post_id.clone(),
            post_title: body.post_title.clone(),
            volunteer_name: body.volunteer_name.clone(),
            volunteer_email: body.volunteer_email.clone(),
            organizer_email: body.organizer_email.clone(),
            suggestion: body.suggestion.clone(),
            created_at: now,
        })
    }

    /// Withdraw a live request and restore one unit of capacity to the post
    /// it referenced.
    ///
    /// The capacity target is read from the deleted request row itself, never
    /// from caller input, so a withdrawal can only ever credit the post its
    /// submission debited. Withdrawing an absent request is a `NotFound` with
    /// no side effects.
    pub async fn withdraw(&self, request_id: &str) -> Result<VolunteerRequest, AppError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            "DELETE FROM requests WHERE id = ? \
             RETURNING id, post_id, post_title, volunteer_name, volunteer_email, \
                       organizer_email, suggestion, created_at",
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = deleted else {
            return Err(AppError::NotFound(format!(
                "Request {} not found",
                request_id
            )));
        };

        let request = VolunteerRequest {
            id: row.get("id"),
            post_id: row.get("post_id"),
            post_title: row.get("post_title"),
            volunteer_name: row.get("volunteer_name"),
            volunteer_email: row.get("volunteer_email"),
            organizer_email: row.get("organizer_email"),
            suggestion: row.get("suggestion"),
            created_at: row.get("created_at"),
        };

        // Zero rows here only for a dangling request from pre-integrity
        // data, in which case the removal alone is the right outcome.
        sqlx::query("UPDATE posts SET volunteers_needed = volunteers_needed + 1 WHERE id = ?")
            .bind(&request.post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(request)
    }
}

/// Whether a sqlx error is a UNIQUE-constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
