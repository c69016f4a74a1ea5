//! PostgreSQL implementation of ProcessedCallbackRepository.
//!
//! `transaction_id` is the primary key; inserts use `ON CONFLICT DO NOTHING`
//! so concurrent deliveries of the same transaction cannot both record.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{CallbackId, DomainError, ErrorCode};
use crate::domain::purchase::{SettlementDecision, SettlementOutcome};
use crate::ports::{ProcessedCallbackRecord, ProcessedCallbackRepository, SaveResult};

pub struct PostgresProcessedCallbackRepository {
    pool: PgPool,
}

impl PostgresProcessedCallbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProcessedCallbackRow {
    transaction_id: String,
    request_key: String,
    callback_id: Uuid,
    status: String,
    decision: String,
    outcome: String,
    payload_sha256: String,
    processed_at: DateTime<Utc>,
}

fn parse_decision(s: &str) -> Result<SettlementDecision, DomainError> {
    match s {
        "none" => Ok(SettlementDecision::None),
        "payment_received" => Ok(SettlementDecision::PaymentReceived),
        "payment_reinstated" => Ok(SettlementDecision::PaymentReinstated),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid decision value: {}", s),
        )),
    }
}

fn parse_outcome(s: &str) -> Result<SettlementOutcome, DomainError> {
    match s {
        "applied" => Ok(SettlementOutcome::Applied),
        "already_applied" => Ok(SettlementOutcome::AlreadyApplied),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid outcome value: {}", s),
        )),
    }
}

impl TryFrom<ProcessedCallbackRow> for ProcessedCallbackRecord {
    type Error = DomainError;

    fn try_from(row: ProcessedCallbackRow) -> Result<Self, Self::Error> {
        Ok(ProcessedCallbackRecord {
            transaction_id: row.transaction_id,
            request_key: row.request_key,
            callback_id: CallbackId::from_uuid(row.callback_id),
            status: row.status,
            decision: parse_decision(&row.decision)?,
            outcome: parse_outcome(&row.outcome)?,
            payload_sha256: row.payload_sha256,
            processed_at: row.processed_at,
        })
    }
}

#[async_trait]
impl ProcessedCallbackRepository for PostgresProcessedCallbackRepository {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<ProcessedCallbackRecord>, DomainError> {
        let row: Option<ProcessedCallbackRow> = sqlx::query_as(
            r#"
            SELECT transaction_id, request_key, callback_id, status, decision,
                   outcome, payload_sha256, processed_at
            FROM processed_callback
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find processed callback: {}", e),
            )
        })?;

        row.map(ProcessedCallbackRecord::try_from).transpose()
    }

    async fn save(&self, record: ProcessedCallbackRecord) -> Result<SaveResult, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO processed_callback (
                transaction_id, request_key, callback_id, status, decision,
                outcome, payload_sha256, processed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (transaction_id) DO NOTHING
            "#,
        )
        .bind(&record.transaction_id)
        .bind(&record.request_key)
        .bind(record.callback_id.as_uuid())
        .bind(&record.status)
        .bind(record.decision.to_string())
        .bind(record.outcome_str())
        .bind(&record.payload_sha256)
        .bind(record.processed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save processed callback: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            Ok(SaveResult::AlreadyExists)
        } else {
            Ok(SaveResult::Inserted)
        }
    }
}
