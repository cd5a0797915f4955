use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use actix_web::{HttpResponse, ResponseError};
use chrono::Utc;
use sqlx::{Pool, Postgres};
use tracing::{error, info, warn};

use crate::api::validation::ErrorResponse;
use crate::config::Environment;
use crate::db::models::{CommentRow, JobChanges, JobFilter, JobRow, NewJob, ReplyRow, UserRow};
use crate::db::{JobRepository, JobStore, UserDirectory, UserRepository};
use super::dto::{CommentView, JobView, ReplyView};
use super::models::{CreateJob, JobQuery, JobStatus, UpdateJob};

/// Name shown for authors whose user record cannot be found
pub const UNKNOWN_AUTHOR: &str = "Unknown user";

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed while performing `context`
    DatabaseError {
        context: &'static str,
        source: sqlx::Error,
    },

    /// Validation failed
    ValidationError(String),

    /// Referenced job, comment or reply does not exist
    NotFound(String),

    /// Caller does not own the job
    Forbidden(String),
}

impl ServiceError {
    /// Wraps a database error with the operation it interrupted
    pub fn db(context: &'static str) -> impl FnOnce(sqlx::Error) -> ServiceError {
        move |source| ServiceError::DatabaseError { context, source }
    }

    fn job_not_found() -> Self {
        ServiceError::NotFound("Job not found".to_string())
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError { context, source } => write!(f, "{}: {}", context, source),
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::NotFound(msg) => write!(f, "{}", msg),
            ServiceError::Forbidden(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::DatabaseError { context, source } => {
                error!("{}: {:?}", context, source);
                HttpResponse::InternalServerError().json(database_error_response(context, source))
            }
            ServiceError::ValidationError(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse::new(msg.as_str()).error("Validation failed"))
            }
            ServiceError::NotFound(msg) => {
                warn!("Not found: {}", msg);
                HttpResponse::NotFound().json(ErrorResponse::new(msg.as_str()))
            }
            ServiceError::Forbidden(msg) => {
                warn!("Forbidden: {}", msg);
                HttpResponse::Forbidden().json(ErrorResponse::new(msg.as_str()))
            }
        }
    }
}

/// Builds the 500 body from a database failure
fn database_error_response(context: &str, source: &sqlx::Error) -> ErrorResponse {
    let pg_err = match source {
        sqlx::Error::Database(db_err) => db_err.try_downcast_ref::<sqlx::postgres::PgDatabaseError>(),
        _ => None,
    };

    let message = failure_message(
        context,
        pg_err.map(|e| e.code()),
        pg_err.and_then(|e| e.column()),
    );

    ErrorResponse::new(message)
        .error(source.to_string())
        .details(pg_err.and_then(|e| e.detail()).map(str::to_string))
        .stack(debug_trace(Environment::current(), source))
}

/// A NOT NULL violation (SQLSTATE 23502) names the offending column;
/// anything else reports the interrupted operation.
fn failure_message(context: &str, code: Option<&str>, column: Option<&str>) -> String {
    match code {
        Some("23502") => format!(
            "Required field \"{}\" cannot be null",
            column.unwrap_or("unknown")
        ),
        _ => context.to_string(),
    }
}

fn debug_trace(environment: Environment, source: &sqlx::Error) -> Option<String> {
    environment
        .exposes_debug_details()
        .then(|| format!("{:?}", source))
}

/// Job service containing business logic
pub struct JobService {
    jobs: Arc<dyn JobStore>,
    users: Arc<dyn UserDirectory>,
}

impl JobService {
    pub fn new(jobs: Arc<dyn JobStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { jobs, users }
    }

    /// Service backed by the PostgreSQL repositories
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self::new(
            Arc::new(JobRepository::new(pool.clone())),
            Arc::new(UserRepository::new(pool)),
        )
    }

    /// Create a job owned by `user_id`
    ///
    /// Field presence has already been checked by the extractor; the
    /// budget is parsed here.
    pub async fn create_job(&self, user_id: i32, input: CreateJob) -> Result<JobView, ServiceError> {
        let (Some(title), Some(description), Some(budget), Some(category)) =
            (input.title, input.description, input.budget, input.category)
        else {
            return Err(ServiceError::ValidationError(
                "Missing required fields (title, description, budget, category)".to_string(),
            ));
        };
        let budget = budget.amount().map_err(ServiceError::ValidationError)?;

        info!("Service: Creating job with title={} for user={}", title, user_id);

        let new_job = NewJob {
            title,
            description,
            budget,
            category,
            skills: input.skills.unwrap_or_default(),
            user_id,
        };
        let row = self
            .jobs
            .insert(&new_job)
            .await
            .map_err(ServiceError::db("Error creating job"))?;

        info!("Service: Job created successfully with id={}", row.id);
        self.single_view(row, "Error creating job").await
    }

    /// All jobs matching the query, each with author data
    pub async fn list_jobs(&self, query: JobQuery) -> Result<Vec<JobView>, ServiceError> {
        let status = match non_empty(query.status) {
            Some(raw) => Some(
                raw.parse::<JobStatus>()
                    .map_err(ServiceError::ValidationError)?
                    .as_str()
                    .to_string(),
            ),
            None => None,
        };

        let user_id = match non_empty(query.user_id) {
            Some(raw) => Some(raw.trim().parse::<i32>().map_err(|_| {
                ServiceError::ValidationError(format!("userId \"{}\" is not a valid identifier", raw))
            })?),
            None => None,
        };

        let filter = JobFilter {
            category: non_empty(query.category),
            search: non_empty(query.search),
            status,
            user_id,
        };

        let rows = self
            .jobs
            .find_all(&filter)
            .await
            .map_err(ServiceError::db("Error getting jobs"))?;

        info!("Service: Listing {} jobs", rows.len());
        self.assemble(rows, "Error getting jobs").await
    }

    pub async fn get_job(&self, job_id: i32) -> Result<JobView, ServiceError> {
        let row = self
            .jobs
            .find_by_id(job_id)
            .await
            .map_err(ServiceError::db("Error getting job"))?
            .ok_or_else(ServiceError::job_not_found)?;

        self.single_view(row, "Error getting job").await
    }

    /// Apply the fields present in `input` to a job owned by `user_id`
    pub async fn update_job(
        &self,
        user_id: i32,
        job_id: i32,
        input: UpdateJob,
    ) -> Result<JobView, ServiceError> {
        self.owned_job(user_id, job_id, "Error updating job", "You do not have permission to edit this job")
            .await?;

        let changes = JobChanges {
            title: input.title,
            description: input.description,
            budget: input
                .budget
                .map(|b| b.amount())
                .transpose()
                .map_err(ServiceError::ValidationError)?,
            category: input.category,
            skills: input.skills,
            status: input.status.map(|s| s.as_str().to_string()),
        };

        // The owner check is repeated inside the write; a miss here means
        // the job disappeared since it was read.
        let row = self
            .jobs
            .update_owned(job_id, user_id, &changes)
            .await
            .map_err(ServiceError::db("Error updating job"))?
            .ok_or_else(ServiceError::job_not_found)?;

        info!("Service: Job {} updated by user {}", job_id, user_id);
        self.single_view(row, "Error updating job").await
    }

    pub async fn delete_job(&self, user_id: i32, job_id: i32) -> Result<(), ServiceError> {
        self.owned_job(user_id, job_id, "Error deleting job", "You do not have permission to delete this job")
            .await?;

        let deleted = self
            .jobs
            .delete_owned(job_id, user_id)
            .await
            .map_err(ServiceError::db("Error deleting job"))?;
        if !deleted {
            return Err(ServiceError::job_not_found());
        }

        info!("Service: Job {} deleted by user {}", job_id, user_id);
        Ok(())
    }

    pub async fn add_comment(
        &self,
        user_id: i32,
        job_id: i32,
        content: &str,
    ) -> Result<JobView, ServiceError> {
        if content.is_empty() {
            return Err(ServiceError::ValidationError("Comment content is required".to_string()));
        }
        let job = self.existing_job(job_id, "Error adding comment").await?;

        let comment = self
            .jobs
            .insert_comment(job_id, user_id, content, Utc::now())
            .await
            .map_err(ServiceError::db("Error adding comment"))?
            .ok_or_else(ServiceError::job_not_found)?;

        info!("Service: Comment {} added to job {} by user {}", comment.id, job_id, user_id);
        self.single_view(job, "Error adding comment").await
    }

    /// Append a reply. The parent comment must exist and belong to the job.
    pub async fn add_reply(
        &self,
        user_id: i32,
        job_id: i32,
        comment_id: i32,
        content: &str,
    ) -> Result<JobView, ServiceError> {
        if content.is_empty() {
            return Err(ServiceError::ValidationError("Reply content is required".to_string()));
        }
        let job = self.existing_job(job_id, "Error adding reply").await?;

        let reply = self
            .jobs
            .insert_reply(job_id, comment_id, user_id, content, Utc::now())
            .await
            .map_err(ServiceError::db("Error adding reply"))?
            .ok_or_else(|| ServiceError::NotFound("Comment not found".to_string()))?;

        info!("Service: Reply {} added to comment {} by user {}", reply.id, comment_id, user_id);
        self.single_view(job, "Error adding reply").await
    }

    async fn existing_job(&self, job_id: i32, context: &'static str) -> Result<JobRow, ServiceError> {
        self.jobs
            .find_by_id(job_id)
            .await
            .map_err(ServiceError::db(context))?
            .ok_or_else(ServiceError::job_not_found)
    }

    async fn owned_job(
        &self,
        user_id: i32,
        job_id: i32,
        context: &'static str,
        denied: &str,
    ) -> Result<JobRow, ServiceError> {
        let job = self.existing_job(job_id, context).await?;
        if job.user_id != user_id {
            warn!("Service: User {} is not the owner of job {}", user_id, job_id);
            return Err(ServiceError::Forbidden(denied.to_string()));
        }
        Ok(job)
    }

    async fn single_view(&self, row: JobRow, context: &'static str) -> Result<JobView, ServiceError> {
        self.assemble(vec![row], context)
            .await?
            .pop()
            .ok_or_else(ServiceError::job_not_found)
    }

    /// Attaches comments, replies and author display data to `rows`.
    ///
    /// Issues one query each for comments, replies and users regardless
    /// of how many jobs are being assembled.
    async fn assemble(&self, rows: Vec<JobRow>, context: &'static str) -> Result<Vec<JobView>, ServiceError> {
        let job_ids: Vec<i32> = rows.iter().map(|job| job.id).collect();
        let comments = self
            .jobs
            .comments_for(&job_ids)
            .await
            .map_err(ServiceError::db(context))?;

        let comment_ids: Vec<i32> = comments.iter().map(|c| c.id).collect();
        let replies = self
            .jobs
            .replies_for(&comment_ids)
            .await
            .map_err(ServiceError::db(context))?;

        let user_ids: Vec<i32> = rows
            .iter()
            .map(|job| job.user_id)
            .chain(comments.iter().map(|c| c.user_id))
            .chain(replies.iter().map(|r| r.user_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let users: HashMap<i32, UserRow> = self
            .users
            .find_many(&user_ids)
            .await
            .map_err(ServiceError::db(context))?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let mut replies_by_comment: HashMap<i32, Vec<ReplyView>> = HashMap::new();
        for reply in replies {
            replies_by_comment
                .entry(reply.comment_id)
                .or_default()
                .push(reply_view(reply, &users));
        }

        let mut comments_by_job: HashMap<i32, Vec<CommentView>> = HashMap::new();
        for comment in comments {
            let replies = replies_by_comment.remove(&comment.id).unwrap_or_default();
            comments_by_job
                .entry(comment.job_id)
                .or_default()
                .push(comment_view(comment, replies, &users));
        }

        Ok(rows
            .into_iter()
            .map(|job| {
                let comments = comments_by_job.remove(&job.id).unwrap_or_default();
                job_view(job, comments, &users)
            })
            .collect())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn author(users: &HashMap<i32, UserRow>, user_id: i32) -> (String, Option<String>) {
    match users.get(&user_id) {
        Some(user) => (user.name.clone(), user.avatar.clone()),
        None => (UNKNOWN_AUTHOR.to_string(), None),
    }
}

fn job_view(job: JobRow, mut comments: Vec<CommentView>, users: &HashMap<i32, UserRow>) -> JobView {
    comments.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
    let (author_name, author_photo) = author(users, job.user_id);
    JobView {
        id: job.id,
        title: job.title,
        description: job.description,
        budget: job.budget,
        category: job.category,
        skills: job.skills,
        user_id: job.user_id,
        status: job.status,
        created_at: job.created_at,
        updated_at: job.updated_at,
        author_name,
        author_photo,
        comments,
    }
}

fn comment_view(comment: CommentRow, mut replies: Vec<ReplyView>, users: &HashMap<i32, UserRow>) -> CommentView {
    replies.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
    let (author_name, author_photo) = author(users, comment.user_id);
    CommentView {
        id: comment.id,
        content: comment.content,
        user_id: comment.user_id,
        author_name,
        author_photo,
        timestamp: comment.created_at,
        replies,
    }
}

fn reply_view(reply: ReplyRow, users: &HashMap<i32, UserRow>) -> ReplyView {
    let (author_name, author_photo) = author(users, reply.user_id);
    ReplyView {
        id: reply.id,
        comment_id: reply.comment_id,
        content: reply.content,
        user_id: reply.user_id,
        author_name,
        author_photo,
        timestamp: reply.created_at,
    }
}
