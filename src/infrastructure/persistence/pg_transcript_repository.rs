use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{RepositoryError, TranscriptRepository};
use crate::domain::{OwnerId, RecordStatus, TranscriptId, TranscriptRecord};

pub struct PgTranscriptRepository {
    pool: PgPool,
}

impl PgTranscriptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = "id, owner_id, filename, file_path, transcription, file_size, \
     media_type, status, error_message, processing_ms, created_at, updated_at";

fn map_row(row: &PgRow) -> Result<TranscriptRecord, RepositoryError> {
    let status: String = row
        .try_get("status")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let status = status
        .parse::<RecordStatus>()
        .map_err(RepositoryError::QueryFailed)?;

    let id: Uuid = get(row, "id")?;
    let owner_id: Uuid = get(row, "owner_id")?;
    let file_size: i64 = get(row, "file_size")?;
    let processing_ms: Option<i64> = get(row, "processing_ms")?;
    let created_at: DateTime<Utc> = get(row, "created_at")?;
    let updated_at: DateTime<Utc> = get(row, "updated_at")?;

    Ok(TranscriptRecord {
        id: TranscriptId::from_uuid(id),
        owner_id: OwnerId::from_uuid(owner_id),
        filename: get(row, "filename")?,
        file_path: get(row, "file_path")?,
        transcription: get(row, "transcription")?,
        file_size: file_size as u64,
        media_type: get(row, "media_type")?,
        status,
        error_message: get(row, "error_message")?,
        processing_ms: processing_ms.map(|ms| ms as u64),
        created_at,
        updated_at,
    })
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
}

#[async_trait]
impl TranscriptRepository for PgTranscriptRepository {
    #[instrument(skip(self, record), fields(record_id = %record.id.as_uuid()))]
    async fn create(&self, record: &TranscriptRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO transcripts
                (id, owner_id, filename, file_path, transcription, file_size,
                 media_type, status, error_message, processing_ms, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.owner_id.as_uuid())
        .bind(&record.filename)
        .bind(&record.file_path)
        .bind(&record.transcription)
        .bind(record.file_size as i64)
        .bind(&record.media_type)
        .bind(record.status.as_str())
        .bind(&record.error_message)
        .bind(record.processing_ms.map(|ms| ms as i64))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(owner_id = %owner.as_uuid()))]
    async fn list_by_owner(
        &self,
        owner: OwnerId,
    ) -> Result<Vec<TranscriptRecord>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM transcripts WHERE owner_id = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(map_row).collect()
    }

    #[instrument(skip(self), fields(record_id = %id.as_uuid(), owner_id = %owner.as_uuid()))]
    async fn find_by_id_for_owner(
        &self,
        id: TranscriptId,
        owner: OwnerId,
    ) -> Result<Option<TranscriptRecord>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM transcripts WHERE id = $1 AND owner_id = $2",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.as_ref().map(map_row).transpose()
    }

    #[instrument(skip(self), fields(record_id = %id.as_uuid(), owner_id = %owner.as_uuid()))]
    async fn delete_by_id_for_owner(
        &self,
        id: TranscriptId,
        owner: OwnerId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM transcripts WHERE id = $1 AND owner_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
