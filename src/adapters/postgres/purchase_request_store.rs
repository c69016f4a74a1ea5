//! PostgreSQL implementation of PurchaseRequestStore.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, PaymentProfileId, StateMachine};
use crate::domain::purchase::{
    PurchaseRequest, PurchaseRequestState, SettlementDecision, SettlementOutcome,
};
use crate::ports::PurchaseRequestStore;

pub struct PostgresPurchaseRequestStore {
    pool: PgPool,
}

impl PostgresPurchaseRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, request_key: &str) -> Result<bool, DomainError> {
        let found: Option<(String,)> =
            sqlx::query_as("SELECT request_key FROM purchase_request WHERE request_key = $1")
                .bind(request_key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find purchase request: {}", e),
                    )
                })?;
        Ok(found.is_some())
    }
}

/// Database row representation of a purchase request.
#[derive(Debug, sqlx::FromRow)]
struct PurchaseRequestRow {
    request_key: String,
    payment_profile_id: i64,
    cost_amount: Decimal,
    cost_currency: String,
    provider_metadata: Option<String>,
    state: String,
}

impl TryFrom<PurchaseRequestRow> for PurchaseRequest {
    type Error = DomainError;

    fn try_from(row: PurchaseRequestRow) -> Result<Self, Self::Error> {
        let profile_id = PaymentProfileId::new(row.payment_profile_id).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid payment_profile_id: {}", e),
            )
        })?;
        let state = PurchaseRequestState::parse(&row.state).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid purchase request state: {}", row.state),
            )
        })?;

        Ok(PurchaseRequest::reconstitute(
            row.request_key,
            profile_id,
            row.cost_amount,
            row.cost_currency,
            row.provider_metadata,
            state,
        ))
    }
}

fn not_found(request_key: &str) -> DomainError {
    DomainError::new(
        ErrorCode::PurchaseRequestNotFound,
        format!("Purchase request not found: {}", request_key),
    )
}

#[async_trait]
impl PurchaseRequestStore for PostgresPurchaseRequestStore {
    async fn find_by_key(&self, request_key: &str) -> Result<Option<PurchaseRequest>, DomainError> {
        let row: Option<PurchaseRequestRow> = sqlx::query_as(
            r#"
            SELECT request_key, payment_profile_id, cost_amount, cost_currency,
                   provider_metadata, state
            FROM purchase_request
            WHERE request_key = $1
            "#,
        )
        .bind(request_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find purchase request: {}", e),
            )
        })?;

        row.map(PurchaseRequest::try_from).transpose()
    }

    async fn attach_provider_metadata(
        &self,
        request_key: &str,
        metadata: &str,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE purchase_request
            SET provider_metadata = $2, updated_at = NOW()
            WHERE request_key = $1
            "#,
        )
        .bind(request_key)
        .bind(metadata)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update provider metadata: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(not_found(request_key));
        }
        Ok(())
    }

    /// Conditional update: only rows in a state the decision may leave are
    /// touched, so redelivery affects zero rows.
    async fn apply_settlement(
        &self,
        request_key: &str,
        decision: SettlementDecision,
    ) -> Result<SettlementOutcome, DomainError> {
        let Some(target) = PurchaseRequestState::settlement_target(decision) else {
            return Ok(SettlementOutcome::AlreadyApplied);
        };

        let from_states: Vec<String> = [
            PurchaseRequestState::Pending,
            PurchaseRequestState::Completed,
            PurchaseRequestState::Reversed,
        ]
        .into_iter()
        .filter(|s| s.can_transition_to(&target))
        .map(|s| s.as_str().to_string())
        .collect();

        let result = sqlx::query(
            r#"
            UPDATE purchase_request
            SET state = $2, updated_at = NOW()
            WHERE request_key = $1 AND state = ANY($3)
            "#,
        )
        .bind(request_key)
        .bind(target.as_str())
        .bind(&from_states)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to apply settlement: {}", e),
            )
        })?;

        if result.rows_affected() > 0 {
            return Ok(SettlementOutcome::Applied);
        }

        if self.exists(request_key).await? {
            Ok(SettlementOutcome::AlreadyApplied)
        } else {
            Err(not_found(request_key))
        }
    }
}
