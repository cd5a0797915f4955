use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::models::{CommentRow, JobChanges, JobFilter, JobRow, NewJob, ReplyRow, UserRow};

/// Persistence of jobs and their discussion threads
///
/// Writes that depend on ownership or on a parent record take the
/// condition as an argument, so the check and the write happen in one
/// statement.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, job: &NewJob) -> Result<JobRow, sqlx::Error>;

    /// All jobs matching `filter`, newest first
    async fn find_all(&self, filter: &JobFilter) -> Result<Vec<JobRow>, sqlx::Error>;

    async fn find_by_id(&self, job_id: i32) -> Result<Option<JobRow>, sqlx::Error>;

    /// Applies `changes` only if `owner_id` still owns the job.
    /// Returns `None` when no row matched.
    async fn update_owned(
        &self,
        job_id: i32,
        owner_id: i32,
        changes: &JobChanges,
    ) -> Result<Option<JobRow>, sqlx::Error>;

    /// Deletes the job only if `owner_id` still owns it.
    /// Returns whether a row was removed.
    async fn delete_owned(&self, job_id: i32, owner_id: i32) -> Result<bool, sqlx::Error>;

    /// Comments of the given jobs, oldest first
    async fn comments_for(&self, job_ids: &[i32]) -> Result<Vec<CommentRow>, sqlx::Error>;

    /// Replies to the given comments, oldest first
    async fn replies_for(&self, comment_ids: &[i32]) -> Result<Vec<ReplyRow>, sqlx::Error>;

    /// Appends a comment if `job_id` still exists.
    /// Returns `None` otherwise.
    async fn insert_comment(
        &self,
        job_id: i32,
        user_id: i32,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Option<CommentRow>, sqlx::Error>;

    /// Appends a reply if `comment_id` exists and belongs to `job_id`.
    /// Returns `None` otherwise.
    async fn insert_reply(
        &self,
        job_id: i32,
        comment_id: i32,
        user_id: i32,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Option<ReplyRow>, sqlx::Error>;
}

/// Read-only access to user display data
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Users with the given ids. Unknown ids are simply absent.
    async fn find_many(&self, user_ids: &[i32]) -> Result<Vec<UserRow>, sqlx::Error>;
}
