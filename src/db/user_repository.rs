use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::db::models::UserRow;
use crate::db::store::UserDirectory;

/// Repository for reading user display data
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_many(&self, user_ids: &[i32]) -> Result<Vec<UserRow>, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, UserRow>("SELECT id, name, avatar FROM users WHERE id = ANY($1)")
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await?;

        debug!("Resolved {} of {} requested users", rows.len(), user_ids.len());
        Ok(rows)
    }
}
