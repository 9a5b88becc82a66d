use crate::error::CoreError;
use crate::models::{BucketType, LabelTimeBucket};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

fn push_id_list(query_builder: &mut QueryBuilder<'_, Sqlite>, ids: &[Uuid]) {
    query_builder.push(" AND label_id IN (");
    let mut separated = query_builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

#[async_trait]
impl super::LabelBucketStore for SqliteRepository {
    async fn find_buckets(
        &self,
        owner_id: Uuid,
        label_ids: &[Uuid],
        bucket_type: BucketType,
        bucket_year: i32,
        bucket_values: &[i32],
    ) -> Result<Vec<LabelTimeBucket>, CoreError> {
        if label_ids.is_empty() || bucket_values.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM label_time_buckets WHERE owner_id = ");
        query_builder.push_bind(owner_id);
        query_builder.push(" AND bucket_type = ");
        query_builder.push_bind(bucket_type);
        query_builder.push(" AND bucket_year = ");
        query_builder.push_bind(bucket_year);
        push_id_list(&mut query_builder, label_ids);

        query_builder.push(" AND bucket_value IN (");
        let mut separated = query_builder.separated(", ");
        for value in bucket_values {
            separated.push_bind(*value);
        }
        separated.push_unseparated(")");
        query_builder.push(" ORDER BY id");

        let buckets = query_builder
            .build_query_as::<LabelTimeBucket>()
            .fetch_all(self.pool())
            .await?;
        Ok(buckets)
    }

    async fn find_all_buckets(
        &self,
        owner_id: Uuid,
        label_ids: &[Uuid],
    ) -> Result<Vec<LabelTimeBucket>, CoreError> {
        if label_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM label_time_buckets WHERE owner_id = ");
        query_builder.push_bind(owner_id);
        push_id_list(&mut query_builder, label_ids);
        query_builder.push(" ORDER BY id");

        let buckets = query_builder
            .build_query_as::<LabelTimeBucket>()
            .fetch_all(self.pool())
            .await?;
        Ok(buckets)
    }
}

impl SqliteRepository {
    /// Insert a raw bucket row. Rows are never merged, so several rows may
    /// exist for one logical bucket.
    pub async fn insert_bucket_row(
        &self,
        owner_id: Uuid,
        label_id: Uuid,
        bucket_type: BucketType,
        bucket_year: i32,
        bucket_value: i32,
        duration_minutes: i64,
    ) -> Result<LabelTimeBucket, CoreError> {
        let bucket = sqlx::query_as(
            r#"INSERT INTO label_time_buckets (label_id, owner_id, bucket_type, bucket_year, bucket_value, duration_minutes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *"#,
        )
        .bind(label_id)
        .bind(owner_id)
        .bind(bucket_type)
        .bind(bucket_year)
        .bind(bucket_value)
        .bind(duration_minutes)
        .fetch_one(self.pool())
        .await?;

        Ok(bucket)
    }
}
