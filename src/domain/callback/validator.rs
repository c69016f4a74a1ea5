//! Callback validation.
//!
//! Runs the ordered checks that decide whether a delivery is a genuine,
//! consistent notification for an open purchase request:
//!
//! 1. Source address is allow-listed
//! 2. Signature verifies against the gateway key
//! 3. Matched request's payment profile belongs to the calling provider
//! 4. Transaction id and request key are present
//! 5. Purchase request exists and is still open
//! 6. Amount and currency match the stored cost
//! 7. Host-platform hook
//!
//! The first failing check rejects the callback and nothing after it runs.
//! Store and key errors never escape; they become rejections.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::purchase::money::amounts_match;
use crate::domain::signature::SignatureVerifier;
use crate::ports::{KeyProvider, PaymentProfileStore, PlatformValidator, PurchaseRequestStore};

use super::allow_list::IpAllowList;
use super::redaction::CallbackLogDetails;
use super::rejection::{LogSeverity, Rejection, RejectionReason};
use super::state::{CallbackOutcome, CallbackState};

type StepResult = Result<(), RejectionReason>;

pub struct CallbackValidator {
    allow_list: IpAllowList,
    key_provider: Arc<dyn KeyProvider>,
    verifier: SignatureVerifier,
    purchase_requests: Arc<dyn PurchaseRequestStore>,
    payment_profiles: Arc<dyn PaymentProfileStore>,
    platform: Arc<dyn PlatformValidator>,
}

impl CallbackValidator {
    pub fn new(
        allow_list: IpAllowList,
        key_provider: Arc<dyn KeyProvider>,
        purchase_requests: Arc<dyn PurchaseRequestStore>,
        payment_profiles: Arc<dyn PaymentProfileStore>,
        platform: Arc<dyn PlatformValidator>,
    ) -> Self {
        Self {
            allow_list,
            key_provider,
            verifier: SignatureVerifier::new(),
            purchase_requests,
            payment_profiles,
            platform,
        }
    }

    /// Validates the callback in place, leaving it `Accepted` or `Rejected`.
    ///
    /// A state that has already left `Unvalidated` is left untouched.
    pub async fn validate(&self, state: &mut CallbackState) {
        if state.outcome() != CallbackOutcome::Unvalidated {
            return;
        }

        if let Err(reason) = self.run_core_checks(state).await {
            state.reject(reason);
            log_rejection(state);
            return;
        }

        if let Err(rejection) = self.platform.validate(state).await {
            state.reject_platform(rejection);
            log_rejection(state);
            return;
        }

        state.accept();
        tracing::info!(
            callback_id = %state.callback_id(),
            transaction_id = state.transaction_id().unwrap_or_default(),
            request_key = state.request_key().unwrap_or_default(),
            "Callback accepted"
        );
    }

    async fn run_core_checks(&self, state: &mut CallbackState) -> StepResult {
        self.check_source(state)?;
        self.check_signature(state).await?;
        self.check_provider(state).await?;
        check_identifiers(state)?;
        check_request_open(state)?;
        check_cost(state)?;
        Ok(())
    }

    fn check_source(&self, state: &CallbackState) -> StepResult {
        if self.allow_list.contains_str(state.source_ip()) {
            Ok(())
        } else {
            Err(RejectionReason::InvalidIpAddress)
        }
    }

    async fn check_signature(&self, state: &CallbackState) -> StepResult {
        let Some(signature) = state.signature() else {
            return Err(RejectionReason::EmptySignature);
        };

        let key = match self.key_provider.public_key().await {
            Ok(key) => key,
            Err(e) => {
                tracing::error!(
                    callback_id = %state.callback_id(),
                    error = %e,
                    "Cannot verify callback signature without gateway key"
                );
                return Err(RejectionReason::InvalidSignature);
            }
        };

        if self.verifier.verify(state.raw_payload(), signature, &key) {
            Ok(())
        } else {
            Err(RejectionReason::InvalidSignature)
        }
    }

    /// Looks up the purchase request and checks its provider binding.
    ///
    /// The looked-up request is kept on the state for the later checks.
    async fn check_provider(&self, state: &mut CallbackState) -> StepResult {
        let Some(request_key) = state.request_key().map(str::to_owned) else {
            return Ok(());
        };

        let request = self
            .purchase_requests
            .find_by_key(&request_key)
            .await
            .map_err(|e| {
                tracing::error!(
                    callback_id = %state.callback_id(),
                    request_key = %request_key,
                    error = %e,
                    "Purchase request lookup failed"
                );
                RejectionReason::InvalidPurchaseRequest
            })?;

        let profile_id = request.as_ref().map(|r| r.payment_profile_id());
        state.set_matched_request(request);

        let Some(profile_id) = profile_id else {
            return Ok(());
        };

        let profile = self.payment_profiles.get(profile_id).await.map_err(|e| {
            tracing::error!(
                callback_id = %state.callback_id(),
                payment_profile_id = %profile_id,
                error = %e,
                "Payment profile lookup failed"
            );
            RejectionReason::InvalidPurchaseRequest
        })?;

        match profile {
            Some(profile) if !profile.is_bound_to(state.provider_id()) => {
                Err(RejectionReason::InvalidProvider)
            }
            _ => Ok(()),
        }
    }
}

fn check_identifiers(state: &CallbackState) -> StepResult {
    if state.transaction_id().is_some() && state.request_key().is_some() {
        Ok(())
    } else {
        Err(RejectionReason::MissingTransactionData)
    }
}

fn check_request_open(state: &CallbackState) -> StepResult {
    match state.matched_request() {
        Some(request) if request.is_open() => Ok(()),
        _ => Err(RejectionReason::InvalidPurchaseRequest),
    }
}

fn check_cost(state: &CallbackState) -> StepResult {
    let Some(request) = state.matched_request() else {
        return Err(RejectionReason::InvalidPurchaseRequest);
    };

    let reported = state.fields().amount.unwrap_or(Decimal::ZERO);
    if !amounts_match(reported, request.cost_amount()) {
        return Err(RejectionReason::InvalidPaymentAmount);
    }

    if state.fields().currency.as_deref() != Some(request.cost_currency()) {
        return Err(RejectionReason::InvalidPaymentCurrency);
    }

    Ok(())
}

fn log_rejection(state: &CallbackState) {
    let reason = state.rejection_reason().unwrap_or_default();
    let integrity_failure = matches!(
        state.rejection(),
        Some(Rejection::Core(r)) if r.is_integrity_failure()
    );
    let details = CallbackLogDetails::from_state(state).to_log_string();

    match state.log_severity() {
        Some(LogSeverity::Info) => tracing::info!(
            callback_id = %state.callback_id(),
            source_ip = %state.source_ip(),
            reason = %reason,
            details = %details,
            "Callback skipped"
        ),
        _ => tracing::error!(
            callback_id = %state.callback_id(),
            source_ip = %state.source_ip(),
            reason = %reason,
            integrity_failure,
            details = %details,
            "Callback rejected"
        ),
    }
}
