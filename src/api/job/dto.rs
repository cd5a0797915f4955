use chrono::{DateTime, Utc};
use serde::Serialize;

/// Job as returned to clients, with the owner's display data attached
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub category: String,
    pub skills: Vec<String>,
    pub user_id: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: String,
    pub author_photo: Option<String>,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub author_name: String,
    pub author_photo: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub replies: Vec<ReplyView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyView {
    pub id: i32,
    pub comment_id: i32,
    pub content: String,
    pub user_id: i32,
    pub author_name: String,
    pub author_photo: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Response carrying a single job
#[derive(Serialize)]
pub struct JobResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub job: JobView,
}

impl JobResponse {
    pub fn new(job: JobView) -> Self {
        Self { success: true, message: None, job }
    }

    pub fn with_message(message: &str, job: JobView) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            job,
        }
    }
}

/// Response for job listings
#[derive(Serialize)]
pub struct JobListResponse {
    pub success: bool,
    pub jobs: Vec<JobView>,
}

/// Response for operations without a payload
#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
