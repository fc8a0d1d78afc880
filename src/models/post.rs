//! Volunteer post model.

use serde::{Deserialize, Serialize};

/// A volunteer opportunity with a remaining-capacity counter.
///
/// `volunteers_needed` is the number of volunteers still wanted. The capacity
/// ledger decrements it on each accepted request and increments it on each
/// withdrawal; it never goes below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub volunteers_needed: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer_name: Option<String>,
    pub organizer_email: String,
    pub created_at: String,
}

/// Request body for creating a new post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub volunteers_needed: i64,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub organizer_name: Option<String>,
    pub organizer_email: String,
}

/// Request body for updating an existing post.
///
/// Only descriptive fields plus an explicit counter reset; the capacity
/// ledger owns the increment/decrement path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub volunteers_needed: Option<i64>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub organizer_name: Option<String>,
}

/// Response body for the matching-post count endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCount {
    pub count: i64,
}
