use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database representation of a job with all fields
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
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
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: i32,
    pub job_id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReplyRow {
    pub id: i32,
    pub comment_id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Display data of a user, owned by the account service
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub avatar: Option<String>,
}

/// Fields of a job about to be inserted
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub category: String,
    pub skills: Vec<String>,
    pub user_id: i32,
}

/// Partial update of a job. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub category: Option<String>,
    pub skills: Option<Vec<String>>,
    pub status: Option<String>,
}

/// Optional filters applied when listing jobs
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub user_id: Option<i32>,
}
