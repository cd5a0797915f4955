use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;

use crate::db::models::{CommentRow, JobChanges, JobFilter, JobRow, NewJob, ReplyRow};
use crate::db::store::JobStore;

const JOB_COLUMNS: &str =
    "id, title, description, budget, category, skills, user_id, status, created_at, updated_at";

/// Repository for Job database operations
pub struct JobRepository {
    pool: Pool<Postgres>,
}

impl JobRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for JobRepository {
    async fn insert(&self, job: &NewJob) -> Result<JobRow, sqlx::Error> {
        debug!("Creating job: title={}, user_id={}", job.title, job.user_id);

        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            INSERT INTO jobs (title, description, budget, category, skills, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(&job.title)
        .bind(&job.description)
        .bind(job.budget)
        .bind(&job.category)
        .bind(&job.skills)
        .bind(job.user_id)
        .fetch_one(&self.pool)
        .await?;

        debug!("Job created with id={}", row.id);
        Ok(row)
    }

    async fn find_all(&self, filter: &JobFilter) -> Result<Vec<JobRow>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE TRUE"));

        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category);
        }
        if let Some(status) = &filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(user_id) = filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(search) = &filter.search {
            // strpos avoids having to escape LIKE wildcards in user input
            query
                .push(" AND (strpos(lower(title), lower(")
                .push_bind(search)
                .push(")) > 0 OR strpos(lower(description), lower(")
                .push_bind(search)
                .push(")) > 0)");
        }
        query.push(" ORDER BY created_at DESC, id DESC");

        let rows = query.build_query_as::<JobRow>().fetch_all(&self.pool).await?;
        debug!("Job search returned {} rows for {:?}", rows.len(), filter);
        Ok(rows)
    }

    async fn find_by_id(&self, job_id: i32) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn update_owned(
        &self,
        job_id: i32,
        owner_id: i32,
        changes: &JobChanges,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        debug!("Updating job {} for owner {}: {:?}", job_id, owner_id, changes);

        sqlx::query_as::<_, JobRow>(&format!(
            r#"
            UPDATE jobs SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                budget = COALESCE($5, budget),
                category = COALESCE($6, category),
                skills = COALESCE($7, skills),
                status = COALESCE($8, status),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(owner_id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.budget)
        .bind(&changes.category)
        .bind(&changes.skills)
        .bind(&changes.status)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_owned(&self, job_id: i32, owner_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND user_id = $2")
            .bind(job_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        debug!("Delete of job {} affected {} rows", job_id, result.rows_affected());
        Ok(result.rows_affected() > 0)
    }

    async fn comments_for(&self, job_ids: &[i32]) -> Result<Vec<CommentRow>, sqlx::Error> {
        if job_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, job_id, user_id, content, created_at
            FROM job_comments
            WHERE job_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(job_ids)
        .fetch_all(&self.pool)
        .await
    }

    async fn replies_for(&self, comment_ids: &[i32]) -> Result<Vec<ReplyRow>, sqlx::Error> {
        if comment_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, ReplyRow>(
            r#"
            SELECT id, comment_id, user_id, content, created_at
            FROM comment_replies
            WHERE comment_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(comment_ids)
        .fetch_all(&self.pool)
        .await
    }

    async fn insert_comment(
        &self,
        job_id: i32,
        user_id: i32,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Option<CommentRow>, sqlx::Error> {
        sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO job_comments (job_id, user_id, content, created_at)
            SELECT j.id, $2, $3, $4
            FROM jobs j
            WHERE j.id = $1
            RETURNING id, job_id, user_id, content, created_at
            "#,
        )
        .bind(job_id)
        .bind(user_id)
        .bind(content)
        .bind(created_at)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_reply(
        &self,
        job_id: i32,
        comment_id: i32,
        user_id: i32,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Option<ReplyRow>, sqlx::Error> {
        sqlx::query_as::<_, ReplyRow>(
            r#"
            INSERT INTO comment_replies (comment_id, user_id, content, created_at)
            SELECT c.id, $3, $4, $5
            FROM job_comments c
            WHERE c.id = $2 AND c.job_id = $1
            RETURNING id, comment_id, user_id, content, created_at
            "#,
        )
        .bind(job_id)
        .bind(comment_id)
        .bind(user_id)
        .bind(content)
        .bind(created_at)
        .fetch_optional(&self.pool)
        .await
    }
}
