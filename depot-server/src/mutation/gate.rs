//! Step-up authentication gate
//!
//! Re-verifies the acting identity's credential immediately before a
//! sensitive action, independent of session validity. The state machine per
//! action is:
//!
//! ```text
//! Idle → AwaitingConfirmation → Verifying → Authorized
//!                     ↑                        │ (bad secret)
//!                     └──────── Rejected ◄─────┘
//! ```
//!
//! A rejection discards the submitted secret (nothing is retained) and the
//! gate stays interactable for another attempt. No retry limit is enforced
//! yet; `Rejected` carries the attempt count so a lockout can be added
//! without reshaping the machine.

use async_trait::async_trait;

use crate::db::repository::AccountRepository;
use crate::utils::validation::validate_reason;
use shared::error::{AppError, ErrorCode};

/// Sensitive action kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitiveAction {
    Edit,
    Delete,
    ViewHistory,
}

impl SensitiveAction {
    /// Mutating actions demand a justification; viewing history does not.
    pub fn requires_reason(&self) -> bool {
        !matches!(self, SensitiveAction::ViewHistory)
    }
}

/// External credential verification collaborator
///
/// Always called with the acting identity's own account id; the gate
/// never verifies somebody else's credential.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, account_id: &str, secret: &str) -> Result<bool, AppError>;
}

#[async_trait]
impl CredentialVerifier for AccountRepository {
    async fn verify(&self, account_id: &str, secret: &str) -> Result<bool, AppError> {
        let account = self
            .find_by_id(account_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;

        if !account.is_active {
            return Err(AppError::new(ErrorCode::AccountDisabled));
        }

        account
            .verify_password(secret)
            .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))
    }
}

/// Proof of a successful step-up verification
///
/// Only the gate can construct one; the mutation engine and the history
/// endpoints take it as a required argument, so no mutating or
/// history-reading path is reachable without passing verification first.
#[derive(Debug, Clone)]
pub struct Authorization {
    action: SensitiveAction,
    actor_id: String,
    actor_name: String,
    reason: Option<String>,
}

impl Authorization {
    pub fn action(&self) -> SensitiveAction {
        self.action
    }

    pub fn actor_id(&self) -> &str {
        &self.actor_id
    }

    pub fn actor_name(&self) -> &str {
        &self.actor_name
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Gate state per sensitive action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Idle,
    AwaitingConfirmation,
    Verifying,
    Authorized,
    Rejected { attempts: u32 },
}

/// Step-up gate over a credential verifier
pub struct StepUpGate<V: CredentialVerifier> {
    verifier: V,
    action: SensitiveAction,
    state: GateState,
}

impl<V: CredentialVerifier> StepUpGate<V> {
    pub fn new(verifier: V, action: SensitiveAction) -> Self {
        Self {
            verifier,
            action,
            state: GateState::Idle,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Open the confirmation step (the caller starts collecting input)
    pub fn begin(&mut self) {
        self.state = GateState::AwaitingConfirmation;
    }

    /// Submit the collected secret and reason for verification
    ///
    /// Input validation happens before the verifier is consulted, so a
    /// missing secret or justification never costs a credential check and
    /// never leaves partial state. The submitted secret is not retained in
    /// any state.
    pub async fn submit(
        &mut self,
        actor_id: &str,
        actor_name: &str,
        secret: &str,
        reason: Option<&str>,
    ) -> Result<Authorization, AppError> {
        match self.state {
            GateState::AwaitingConfirmation | GateState::Rejected { .. } => {}
            _ => {
                return Err(AppError::with_message(
                    ErrorCode::InvalidRequest,
                    "No confirmation pending for this action",
                ));
            }
        }

        if secret.is_empty() {
            return Err(AppError::new(ErrorCode::StepUpRequired));
        }
        let reason = if self.action.requires_reason() {
            let reason = reason.unwrap_or_default();
            validate_reason(reason)?;
            Some(reason.to_string())
        } else {
            None
        };

        let attempts = match self.state {
            GateState::Rejected { attempts } => attempts,
            _ => 0,
        };
        self.state = GateState::Verifying;

        match self.verifier.verify(actor_id, secret).await {
            Ok(true) => {
                self.state = GateState::Authorized;
                tracing::info!(
                    actor = %actor_id,
                    action = ?self.action,
                    "Step-up verification passed"
                );
                Ok(Authorization {
                    action: self.action,
                    actor_id: actor_id.to_string(),
                    actor_name: actor_name.to_string(),
                    reason,
                })
            }
            Ok(false) => {
                self.state = GateState::Rejected {
                    attempts: attempts + 1,
                };
                tracing::warn!(
                    actor = %actor_id,
                    action = ?self.action,
                    attempts = attempts + 1,
                    "Step-up verification rejected"
                );
                Err(AppError::invalid_credentials())
            }
            Err(err) => {
                self.state = GateState::Rejected {
                    attempts: attempts + 1,
                };
                Err(err)
            }
        }
    }
}

/// One-shot convenience for request handlers: begin + submit in one call
pub async fn authorize<V: CredentialVerifier>(
    verifier: V,
    action: SensitiveAction,
    actor_id: &str,
    actor_name: &str,
    secret: &str,
    reason: Option<&str>,
) -> Result<Authorization, AppError> {
    let mut gate = StepUpGate::new(verifier, action);
    gate.begin();
    gate.submit(actor_id, actor_name, secret, reason).await
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifier with one fixed secret
    struct FixedSecret(&'static str);

    #[async_trait]
    impl CredentialVerifier for FixedSecret {
        async fn verify(&self, _account_id: &str, secret: &str) -> Result<bool, AppError> {
            Ok(secret == self.0)
        }
    }

    #[tokio::test]
    async fn correct_secret_authorizes() {
        let mut gate = StepUpGate::new(FixedSecret("pw"), SensitiveAction::Delete);
        gate.begin();
        let auth = gate
            .submit("account:1", "Admin", "pw", Some("disposed of broken unit"))
            .await
            .unwrap();
        assert_eq!(auth.action(), SensitiveAction::Delete);
        assert_eq!(auth.actor_id(), "account:1");
        assert_eq!(auth.reason(), Some("disposed of broken unit"));
        assert_eq!(gate.state(), &GateState::Authorized);
    }

    #[tokio::test]
    async fn wrong_secret_rejects_and_allows_retry() {
        let mut gate = StepUpGate::new(FixedSecret("pw"), SensitiveAction::Edit);
        gate.begin();

        let err = gate
            .submit("account:1", "Admin", "nope", Some("fixing supplier name"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        assert_eq!(gate.state(), &GateState::Rejected { attempts: 1 });

        // Still interactable: a corrected secret goes through
        let auth = gate
            .submit("account:1", "Admin", "pw", Some("fixing supplier name"))
            .await
            .unwrap();
        assert_eq!(auth.action(), SensitiveAction::Edit);
    }

    #[tokio::test]
    async fn missing_reason_blocks_mutating_actions_before_verification() {
        let mut gate = StepUpGate::new(FixedSecret("pw"), SensitiveAction::Edit);
        gate.begin();
        let err = gate.submit("account:1", "Admin", "pw", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReasonRequired);
        // The verifier was never consulted: state stays awaiting
        assert_eq!(gate.state(), &GateState::AwaitingConfirmation);
    }

    #[tokio::test]
    async fn view_history_needs_no_reason() {
        let mut gate = StepUpGate::new(FixedSecret("pw"), SensitiveAction::ViewHistory);
        gate.begin();
        let auth = gate.submit("account:1", "Admin", "pw", None).await.unwrap();
        assert_eq!(auth.action(), SensitiveAction::ViewHistory);
        assert_eq!(auth.reason(), None);
    }

    #[tokio::test]
    async fn empty_secret_is_rejected_without_verification() {
        let mut gate = StepUpGate::new(FixedSecret("pw"), SensitiveAction::Delete);
        gate.begin();
        let err = gate
            .submit("account:1", "Admin", "", Some("reason"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::StepUpRequired);
    }

    #[tokio::test]
    async fn submit_without_begin_is_an_error() {
        let mut gate = StepUpGate::new(FixedSecret("pw"), SensitiveAction::Edit);
        let err = gate
            .submit("account:1", "Admin", "pw", Some("reason"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }
}
