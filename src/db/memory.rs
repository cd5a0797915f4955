//! In-process stores used by the test suites.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::models::{CommentRow, JobChanges, JobFilter, JobRow, NewJob, ReplyRow, UserRow};
use crate::db::store::{JobStore, UserDirectory};

#[derive(Default)]
struct Tables {
    next_id: i32,
    remove_after_lookup: bool,
    jobs: Vec<JobRow>,
    comments: Vec<CommentRow>,
    replies: Vec<ReplyRow>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryJobStore {
    tables: Mutex<Tables>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job_count(&self) -> usize {
        self.tables.lock().unwrap().jobs.len()
    }

    pub fn reply_count(&self) -> usize {
        self.tables.lock().unwrap().replies.len()
    }

    /// The next `find_by_id` hit returns the job and then deletes it,
    /// as if another request removed it in between.
    pub fn remove_after_next_lookup(&self) {
        self.tables.lock().unwrap().remove_after_lookup = true;
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, job: &NewJob) -> Result<JobRow, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let row = JobRow {
            id: tables.next_id(),
            title: job.title.clone(),
            description: job.description.clone(),
            budget: job.budget,
            category: job.category.clone(),
            skills: job.skills.clone(),
            user_id: job.user_id,
            status: "open".to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.jobs.push(row.clone());
        Ok(row)
    }

    async fn find_all(&self, filter: &JobFilter) -> Result<Vec<JobRow>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        let search = filter.search.as_ref().map(|s| s.to_lowercase());
        let mut rows: Vec<JobRow> = tables
            .jobs
            .iter()
            .filter(|job| filter.category.as_ref().map_or(true, |c| &job.category == c))
            .filter(|job| filter.status.as_ref().map_or(true, |s| &job.status == s))
            .filter(|job| filter.user_id.map_or(true, |id| job.user_id == id))
            .filter(|job| {
                search.as_ref().map_or(true, |s| {
                    job.title.to_lowercase().contains(s) || job.description.to_lowercase().contains(s)
                })
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find_by_id(&self, job_id: i32) -> Result<Option<JobRow>, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let found = tables.jobs.iter().find(|job| job.id == job_id).cloned();
        if found.is_some() && tables.remove_after_lookup {
            tables.remove_after_lookup = false;
            tables.jobs.retain(|job| job.id != job_id);
        }
        Ok(found)
    }

    async fn update_owned(
        &self,
        job_id: i32,
        owner_id: i32,
        changes: &JobChanges,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let Some(job) = tables
            .jobs
            .iter_mut()
            .find(|job| job.id == job_id && job.user_id == owner_id)
        else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            job.title = title.clone();
        }
        if let Some(description) = &changes.description {
            job.description = description.clone();
        }
        if let Some(budget) = changes.budget {
            job.budget = budget;
        }
        if let Some(category) = &changes.category {
            job.category = category.clone();
        }
        if let Some(skills) = &changes.skills {
            job.skills = skills.clone();
        }
        if let Some(status) = &changes.status {
            job.status = status.clone();
        }
        job.updated_at = Utc::now();
        Ok(Some(job.clone()))
    }

    async fn delete_owned(&self, job_id: i32, owner_id: i32) -> Result<bool, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.jobs.len();
        tables.jobs.retain(|job| !(job.id == job_id && job.user_id == owner_id));
        if tables.jobs.len() == before {
            return Ok(false);
        }

        let removed: Vec<i32> = tables
            .comments
            .iter()
            .filter(|c| c.job_id == job_id)
            .map(|c| c.id)
            .collect();
        tables.comments.retain(|c| c.job_id != job_id);
        tables.replies.retain(|r| !removed.contains(&r.comment_id));
        Ok(true)
    }

    async fn comments_for(&self, job_ids: &[i32]) -> Result<Vec<CommentRow>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .comments
            .iter()
            .filter(|c| job_ids.contains(&c.job_id))
            .cloned()
            .collect())
    }

    async fn replies_for(&self, comment_ids: &[i32]) -> Result<Vec<ReplyRow>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .replies
            .iter()
            .filter(|r| comment_ids.contains(&r.comment_id))
            .cloned()
            .collect())
    }

    async fn insert_comment(
        &self,
        job_id: i32,
        user_id: i32,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Option<CommentRow>, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.jobs.iter().any(|job| job.id == job_id) {
            return Ok(None);
        }

        let row = CommentRow {
            id: tables.next_id(),
            job_id,
            user_id,
            content: content.to_string(),
            created_at,
        };
        tables.comments.push(row.clone());
        Ok(Some(row))
    }

    async fn insert_reply(
        &self,
        job_id: i32,
        comment_id: i32,
        user_id: i32,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Option<ReplyRow>, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        if !tables
            .comments
            .iter()
            .any(|c| c.id == comment_id && c.job_id == job_id)
        {
            return Ok(None);
        }

        let row = ReplyRow {
            id: tables.next_id(),
            comment_id,
            user_id,
            content: content.to_string(),
            created_at,
        };
        tables.replies.push(row.clone());
        Ok(Some(row))
    }
}

#[derive(Default)]
pub struct MemoryUserDirectory {
    users: Vec<UserRow>,
}

impl MemoryUserDirectory {
    pub fn with_users(users: Vec<UserRow>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_many(&self, user_ids: &[i32]) -> Result<Vec<UserRow>, sqlx::Error> {
        Ok(self
            .users
            .iter()
            .filter(|u| user_ids.contains(&u.id))
            .cloned()
            .collect())
    }
}
