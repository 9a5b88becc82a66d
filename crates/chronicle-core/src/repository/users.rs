use crate::error::CoreError;
use crate::repository::SqliteRepository;
use crate::timezone::parse_timezone;
use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use uuid::Uuid;

#[async_trait]
impl super::UserZoneSource for SqliteRepository {
    async fn find_user_timezone(&self, user_id: Uuid) -> Result<Option<Tz>, CoreError> {
        let timezone: Option<String> =
            sqlx::query_scalar("SELECT timezone FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(self.pool())
                .await?;

        timezone.as_deref().map(parse_timezone).transpose()
    }
}

impl SqliteRepository {
    /// Register a user with their timezone, replacing any stored zone
    pub async fn upsert_user(&self, user_id: Uuid, timezone: Tz) -> Result<(), CoreError> {
        sqlx::query(
            r#"INSERT INTO users (id, timezone, created_at) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET timezone = excluded.timezone"#,
        )
        .bind(user_id)
        .bind(timezone.name())
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        Ok(())
    }
}
