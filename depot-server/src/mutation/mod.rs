//! Sensitive mutation pipeline
//!
//! Every destructive or sensitive operation flows through two pieces:
//!
//! - [`gate`]: step-up re-authentication (the acting identity re-enters
//!   its own password, plus a justification for mutating actions). Success
//!   mints an [`gate::Authorization`], the only value the engine accepts.
//! - [`engine`]: the mutation engine. It validates, reconciles stock for
//!   line-item records, persists through the generic record store, diffs
//!   the before/after drafts and appends the audit rows.

pub mod engine;
pub mod gate;

pub use engine::{MutationEngine, MutationError, MutationOutcome, MutationRequest};
pub use gate::{Authorization, CredentialVerifier, GateState, SensitiveAction, StepUpGate, authorize};
