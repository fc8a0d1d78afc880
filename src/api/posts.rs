//! Post API endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::{CreatePostRequest, Post, PostCount, UpdatePostRequest};
use crate::AppState;

/// Query parameters for the paginated post listing.
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    20
}

/// GET /api/posts - List posts with substring title search and pagination.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<Vec<Post>> {
    if query.page < 1 || query.size < 1 {
        return Err(AppError::Validation(
            "page and size must be positive".to_string(),
        ));
    }

    let posts = state
        .repo
        .list_posts(query.search.as_deref(), query.page, query.size)
        .await?;
    success(posts)
}

/// GET /api/posts/count - Count posts matching the search filter.
pub async fn count_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<PostCount> {
    let count = state.repo.count_posts(query.search.as_deref()).await?;
    success(PostCount { count })
}

/// GET /api/posts/upcoming - The six posts with the soonest deadlines.
pub async fn upcoming_posts(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let posts = state.repo.upcoming_posts(6).await?;
    success(posts)
}

/// GET /api/posts/{id} - Get a single post.
pub async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Post> {
    match state.repo.get_post(&id).await? {
        Some(post) => success(post),
        None => Err(AppError::NotFound(format!("Post {} not found", id))),
    }
}

/// GET /api/posts/by-organizer/{email} - Posts created by the authenticated
/// organizer. The token's email must match the path email.
pub async fn posts_by_organizer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(email): Path<String>,
) -> ApiResult<Vec<Post>> {
    if claims.email != email {
        return Err(AppError::Forbidden("Forbidden access".to_string()));
    }

    let posts = state.repo.posts_by_organizer(&email).await?;
    success(posts)
}

/// POST /api/posts - Create a new post.
pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> ApiResult<Post> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if request.organizer_email.trim().is_empty() {
        return Err(AppError::Validation(
            "Organizer email is required".to_string(),
        ));
    }
    if request.volunteers_needed < 0 {
        return Err(AppError::Validation(
            "volunteersNeeded must not be negative".to_string(),
        ));
    }

    let post = state.repo.create_post(&request).await?;
    success(post)
}

/// PUT /api/posts/{id} - Update a post's descriptive fields.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePostRequest>,
) -> ApiResult<Post> {
    let post = state.repo.update_post(&id, &request).await?;
    success(post)
}

/// DELETE /api/posts/{id} - Delete a post without live requests.
pub async fn delete_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.repo.delete_post(&id).await?;
    success(())
}
