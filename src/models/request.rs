//! Volunteer request model.

use serde::{Deserialize, Serialize};

/// One applicant's application against one post.
///
/// Write-once/delete-once: a request is never updated after creation, only
/// withdrawn. At most one live request may exist per (post, volunteer email)
/// pair; the store enforces this with a unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerRequest {
    pub id: String,
    pub post_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer_name: Option<String>,
    pub volunteer_email: String,
    pub organizer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub created_at: String,
}

/// Request body for submitting a volunteer request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequestBody {
    pub post_id: String,
    #[serde(default)]
    pub post_title: Option<String>,
    #[serde(default)]
    pub volunteer_name: Option<String>,
    pub volunteer_email: String,
    pub organizer_email: String,
    #[serde(default)]
    pub suggestion: Option<String>,
}
