//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity. Capacity
//! mutations (submit/withdraw accounting) live in the ledger module, not
//! here.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{CreatePostRequest, Post, UpdatePostRequest, VolunteerRequest};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

const POST_COLUMNS: &str = "id, title, description, category, location, volunteers_needed, \
     deadline, thumbnail, organizer_name, organizer_email, created_at";

const REQUEST_COLUMNS: &str = "id, post_id, post_title, volunteer_name, volunteer_email, \
     organizer_email, suggestion, created_at";

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== POST OPERATIONS ====================

    /// List posts with optional case-insensitive title filtering and
    /// 1-based page / size pagination.
    pub async fn list_posts(
        &self,
        search: Option<&str>,
        page: i64,
        size: i64,
    ) -> Result<Vec<Post>, AppError> {
        let offset = (page.max(1) - 1) * size;
        let pattern = like_pattern(search);

        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE title LIKE ? ESCAPE '\\' \
             ORDER BY created_at DESC LIMIT ? OFFSET ?"
        ))
        .bind(&pattern)
        .bind(size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    /// Count posts matching an optional title filter.
    pub async fn count_posts(&self, search: Option<&str>) -> Result<i64, AppError> {
        let pattern = like_pattern(search);

        // SQLite LIKE is case-insensitive for ASCII
        let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE title LIKE ? ESCAPE '\\'")
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("count"))
    }

    /// The posts with the soonest deadlines.
    pub async fn upcoming_posts(&self, limit: i64) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY deadline ASC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    /// Get a post by ID.
    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(post_from_row))
    }

    /// All posts created by one organizer.
    pub async fn posts_by_organizer(&self, email: &str) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE organizer_email = ? ORDER BY created_at DESC"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    /// Create a new post.
    pub async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO posts (id, title, description, category, location, volunteers_needed, \
             deadline, thumbnail, organizer_name, organizer_email, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.category)
        .bind(&request.location)
        .bind(request.volunteers_needed)
        .bind(&request.deadline)
        .bind(&request.thumbnail)
        .bind(&request.organizer_name)
        .bind(&request.organizer_email)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Post {
            id,
            title: request.title.clone(),
            description: request.description.clone(),
            category: request.category.clone(),
            location: request.location.clone(),
            volunteers_needed: request.volunteers_needed,
            deadline: request.deadline.clone(),
            thumbnail: request.thumbnail.clone(),
            organizer_name: request.organizer_name.clone(),
            organizer_email: request.organizer_email.clone(),
            created_at: now,
        })
    }

    /// Update a post's descriptive fields (admin edit).
    pub async fn update_post(
        &self,
        id: &str,
        request: &UpdatePostRequest,
    ) -> Result<Post, AppError> {
        let existing = self
            .get_post(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))?;

        let title = request.title.as_ref().unwrap_or(&existing.title);
        let description = request.description.clone().or(existing.description.clone());
        let category = request.category.clone().or(existing.category.clone());
        let location = request.location.clone().or(existing.location.clone());
        let volunteers_needed = request
            .volunteers_needed
            .unwrap_or(existing.volunteers_needed);
        let deadline = request.deadline.clone().or(existing.deadline.clone());
        let thumbnail = request.thumbnail.clone().or(existing.thumbnail.clone());
        let organizer_name = request
            .organizer_name
            .clone()
            .or(existing.organizer_name.clone());

        if volunteers_needed < 0 {
            return Err(AppError::Validation(
                "volunteersNeeded must not be negative".to_string(),
            ));
        }

        sqlx::query(
            "UPDATE posts SET title = ?, description = ?, category = ?, location = ?, \
             volunteers_needed = ?, deadline = ?, thumbnail = ?, organizer_name = ? \
             WHERE id = ?",
        )
        .bind(title)
        .bind(&description)
        .bind(&category)
        .bind(&location)
        .bind(volunteers_needed)
        .bind(&deadline)
        .bind(&thumbnail)
        .bind(&organizer_name)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Post {
            id: id.to_string(),
            title: title.clone(),
            description,
            category,
            location,
            volunteers_needed,
            deadline,
            thumbnail,
            organizer_name,
            organizer_email: existing.organizer_email,
            created_at: existing.created_at,
        })
    }

    /// Delete a post.
    ///
    /// Refuses when live requests still reference the post, so withdrawals
    /// always find their capacity target.
    pub async fn delete_post(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM posts WHERE id = ? \
             AND NOT EXISTS (SELECT 1 FROM requests WHERE requests.post_id = posts.id)",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish a missing post from one with live requests
            let exists = sqlx::query("SELECT 1 FROM posts WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

            return Err(match exists {
                Some(_) => AppError::Conflict(format!(
                    "Post {} has live volunteer requests and cannot be deleted",
                    id
                )),
                None => AppError::NotFound(format!("Post {} not found", id)),
            });
        }

        Ok(())
    }

    // ==================== REQUEST OPERATIONS ====================

    /// All live requests submitted by one volunteer.
    pub async fn requests_by_volunteer(
        &self,
        email: &str,
    ) -> Result<Vec<VolunteerRequest>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE volunteer_email = ? \
             ORDER BY created_at DESC"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(request_from_row).collect())
    }
}

/// Build a LIKE pattern from an optional substring search, escaping LIKE
/// metacharacters in the user input.
fn like_pattern(search: Option<&str>) -> String {
    match search {
        Some(s) if !s.is_empty() => {
            let escaped = s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
            format!("%{}%", escaped)
        }
        _ => "%".to_string(),
    }
}

fn post_from_row(row: &sqlx::sqlite::SqliteRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        category: row.get("category"),
        location: row.get("location"),
        volunteers_needed: row.get("volunteers_needed"),
        deadline: row.get("deadline"),
        thumbnail: row.get("thumbnail"),
        organizer_name: row.get("organizer_name"),
        organizer_email: row.get("organizer_email"),
        created_at: row.get("created_at"),
    }
}

fn request_from_row(row: &sqlx::sqlite::SqliteRow) -> VolunteerRequest {
    VolunteerRequest {
        id: row.get("id"),
        post_id: row.get("post_id"),
        post_title: row.get("post_title"),
        volunteer_name: row.get("volunteer_name"),
        volunteer_email: row.get("volunteer_email"),
        organizer_email: row.get("organizer_email"),
        suggestion: row.get("suggestion"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_plain() {
        assert_eq!(like_pattern(Some("beach")), "%beach%");
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern(Some("50%_off")), "%50\\%\\_off%");
    }

    #[test]
    fn test_like_pattern_empty_matches_all() {
        assert_eq!(like_pattern(None), "%");
        assert_eq!(like_pattern(Some("")), "%");
    }
}
