//! Payment status flow.
//!
//! After checkout the order moves through the payment gateway:
//!
//! ```text
//! idle -> submitted -> polling -> completed
//!                              -> failed
//! ```
//!
//! Entering `submitted` fires the payment-initiation request immediately.
//! Status checks are single requests whose result directly drives the
//! phase - there is no retry-with-backoff. [`PaymentFlow::wait_for_terminal`]
//! re-checks at a fixed interval with a bounded attempt count; cancellation
//! is implicit only (dropping the future, e.g. on client disconnect,
//! abandons the poll mid-sleep).

use std::time::Duration;

use serde::Serialize;

use mboa_market_core::{PaymentStatus, TransactionRef};

use crate::api::types::{PaymentRequest, PaymentResponse};
use crate::api::{ApiError, MarketClient};

/// Where the payment stands, as far as this process has observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPhase {
    /// No payment has been initiated.
    Idle,
    /// Initiation request sent, no status observed yet.
    Submitted,
    /// Gateway reports the payment as still pending.
    Polling,
    /// Terminal: the gateway confirmed the payment.
    Completed,
    /// Terminal: the gateway reported failure.
    Failed,
}

impl PaymentPhase {
    /// Whether polling stops here.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Advance the phase with an observed gateway status.
    ///
    /// Terminal phases absorb: once completed or failed, later
    /// observations do not move the machine.
    #[must_use]
    pub const fn on_status(self, status: PaymentStatus) -> Self {
        if self.is_terminal() {
            return self;
        }
        match status {
            PaymentStatus::Completed => Self::Completed,
            PaymentStatus::Failed => Self::Failed,
            PaymentStatus::Pending => Self::Polling,
        }
    }
}

/// Interval between checks in the bounded wait loop.
pub const WAIT_INTERVAL: Duration = Duration::from_secs(2);

/// Maximum checks in the bounded wait loop (with [`WAIT_INTERVAL`], about
/// half a minute of gateway time).
pub const WAIT_MAX_CHECKS: u32 = 15;

/// Drives a payment through the gateway via the market API.
#[derive(Clone)]
pub struct PaymentFlow {
    api: MarketClient,
}

impl PaymentFlow {
    /// Create a flow over the market API client.
    #[must_use]
    pub const fn new(api: MarketClient) -> Self {
        Self { api }
    }

    /// Initiate an indirect payment: `idle -> submitted`, then advance on
    /// the response's status. When the response carries a `payment_link`,
    /// the caller redirects the shopper to the gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the initiation request fails; the phase never
    /// leaves `submitted` in that case.
    pub async fn start(
        &self,
        request: &PaymentRequest,
    ) -> Result<(PaymentResponse, PaymentPhase), ApiError> {
        let response = self.api.create_indirect_payment(request).await?;
        let phase = PaymentPhase::Submitted.on_status(response.status);
        Ok((response, phase))
    }

    /// One status check: a single request whose result drives the phase.
    ///
    /// # Errors
    ///
    /// Returns an error if the verification request fails.
    pub async fn check(
        &self,
        transaction_id: &TransactionRef,
    ) -> Result<(PaymentResponse, PaymentPhase), ApiError> {
        let response = self.api.verify_payment(transaction_id).await?;
        let phase = PaymentPhase::Polling.on_status(response.status);
        Ok((response, phase))
    }

    /// Check at a fixed interval until a terminal phase or the attempt
    /// budget runs out; returns the last observation either way.
    ///
    /// Dropping the returned future abandons the poll - there is no
    /// explicit cancellation token.
    ///
    /// # Errors
    ///
    /// Returns an error if any verification request fails.
    pub async fn wait_for_terminal(
        &self,
        transaction_id: &TransactionRef,
        interval: Duration,
        max_checks: u32,
    ) -> Result<(PaymentResponse, PaymentPhase), ApiError> {
        let mut observation = self.check(transaction_id).await?;

        for _ in 1..max_checks {
            if observation.1.is_terminal() {
                break;
            }
            tokio::time::sleep(interval).await;
            observation = self.check(transaction_id).await?;
        }

        Ok(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_phases() {
        assert!(PaymentPhase::Completed.is_terminal());
        assert!(PaymentPhase::Failed.is_terminal());
        assert!(!PaymentPhase::Idle.is_terminal());
        assert!(!PaymentPhase::Submitted.is_terminal());
        assert!(!PaymentPhase::Polling.is_terminal());
    }

    #[test]
    fn test_submitted_advances_on_status() {
        assert_eq!(
            PaymentPhase::Submitted.on_status(PaymentStatus::Pending),
            PaymentPhase::Polling
        );
        assert_eq!(
            PaymentPhase::Submitted.on_status(PaymentStatus::Completed),
            PaymentPhase::Completed
        );
        assert_eq!(
            PaymentPhase::Submitted.on_status(PaymentStatus::Failed),
            PaymentPhase::Failed
        );
    }

    #[test]
    fn test_pending_keeps_polling() {
        let mut phase = PaymentPhase::Submitted;
        for _ in 0..5 {
            phase = phase.on_status(PaymentStatus::Pending);
            assert_eq!(phase, PaymentPhase::Polling);
        }
    }

    #[test]
    fn test_terminal_phases_absorb() {
        // Once terminal, later observations do not move the machine
        assert_eq!(
            PaymentPhase::Completed.on_status(PaymentStatus::Failed),
            PaymentPhase::Completed
        );
        assert_eq!(
            PaymentPhase::Failed.on_status(PaymentStatus::Completed),
            PaymentPhase::Failed
        );
        assert_eq!(
            PaymentPhase::Completed.on_status(PaymentStatus::Pending),
            PaymentPhase::Completed
        );
    }

    #[test]
    fn test_idle_advances_too() {
        // Pages that land directly on the status view start from idle
        assert_eq!(
            PaymentPhase::Idle.on_status(PaymentStatus::Completed),
            PaymentPhase::Completed
        );
    }
}
