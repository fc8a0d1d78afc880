//! Volunteer request API endpoints.
//!
//! Submission and withdrawal go through the capacity ledger; this layer only
//! validates input and enforces the email-scoped read access.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::{success, ApiResult};
use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::{SubmitRequestBody, VolunteerRequest};
use crate::AppState;

/// GET /api/requests/by-volunteer/{email} - Live requests submitted by the authenticated
/// volunteer. The token's email must match the path email.
pub async fn list_requests(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(email): Path<String>,
) -> ApiResult<Vec<VolunteerRequest>> {
    if claims.email != email {
        return Err(AppError::Forbidden("Forbidden access".to_string()));
    }

    let requests = state.repo.requests_by_volunteer(&email).await?;
    success(requests)
}

/// POST /api/requests - Submit a volunteer request against a post.
pub async fn submit_request(
    State(state): State<AppState>,
    Json(body): Json<SubmitRequestBody>,
) -> ApiResult<VolunteerRequest> {
    if body.post_id.trim().is_empty() {
        return Err(AppError::Validation("postId is required".to_string()));
    }
    if body.volunteer_email.trim().is_empty() {
        return Err(AppError::Validation(
            "volunteerEmail is required".to_string(),
        ));
    }
    if body.organizer_email.trim().is_empty() {
        return Err(AppError::Validation(
            "organizerEmail is required".to_string(),
        ));
    }

    let request = state.ledger.submit(&body).await?;

    tracing::info!(
        "Request {} submitted by {} against post {}",
        request.id,
        request.volunteer_email,
        request.post_id
    );

    success(request)
}

/// DELETE /api/requests/{id} - Withdraw a live request, restoring capacity
/// to the post it referenced.
pub async fn withdraw_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<VolunteerRequest> {
    let request = state.ledger.withdraw(&id).await?;

    tracing::info!(
        "Request {} withdrawn, capacity restored to post {}",
        request.id,
        request.post_id
    );

    success(request)
}
