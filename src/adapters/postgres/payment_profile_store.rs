//! PostgreSQL implementation of PaymentProfileStore.

use async_trait::async_trait;
use secrecy::SecretString;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, PaymentProfileId};
use crate::domain::purchase::PaymentProfile;
use crate::ports::PaymentProfileStore;

pub struct PostgresPaymentProfileStore {
    pool: PgPool,
}

impl PostgresPaymentProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PaymentProfileRow {
    id: i64,
    provider_id: String,
    token: String,
    active: bool,
}

impl TryFrom<PaymentProfileRow> for PaymentProfile {
    type Error = DomainError;

    fn try_from(row: PaymentProfileRow) -> Result<Self, Self::Error> {
        let id = PaymentProfileId::new(row.id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid profile id: {}", e))
        })?;
        Ok(PaymentProfile::new(
            id,
            row.provider_id,
            SecretString::new(row.token),
            row.active,
        ))
    }
}

#[async_trait]
impl PaymentProfileStore for PostgresPaymentProfileStore {
    async fn get(&self, id: PaymentProfileId) -> Result<Option<PaymentProfile>, DomainError> {
        let row: Option<PaymentProfileRow> = sqlx::query_as(
            "SELECT id, provider_id, token, active FROM payment_profile WHERE id = $1",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find payment profile: {}", e),
            )
        })?;

        row.map(PaymentProfile::try_from).transpose()
    }
}
