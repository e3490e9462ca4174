use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use hotelbook_core::repository::SessionRepository;
use hotelbook_shared::Session;

pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: i32,
    user_id: i32,
    token: String,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find_session(
        &self,
        token: &str,
    ) -> Result<Option<Session>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, user_id, token, created_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Session {
            id: row.id,
            user_id: row.user_id,
            token: row.token,
            created_at: row.created_at,
        }))
    }
}
