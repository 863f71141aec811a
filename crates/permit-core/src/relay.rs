//! Atomic relay for permit-then-action call sequences.
//!
//! The relay lets a party holding nothing but a signed permit execute
//! the permit and a dependent call as one indivisible unit of work: the
//! target commits either every call's effects or none of them. The relay
//! itself holds no state and never interprets the payloads it forwards.

use async_trait::async_trait;
use thiserror::Error;

use alloy_primitives::{Address, Bytes};
use permit_ledger::LedgerError;
use permit_verifier::PermitError;

/// A business failure raised by one forwarded call, preserved unchanged.
#[derive(Debug, Error)]
pub enum CallError {
	/// The permit step failed verification.
	#[error(transparent)]
	Permit(#[from] PermitError),
	/// The ledger step failed.
	#[error(transparent)]
	Ledger(#[from] LedgerError),
}

/// Errors that can occur during relay execution.
#[derive(Debug, Error)]
pub enum RelayError {
	/// Error that occurs when a forwarded call fails. Carries the
	/// zero-based position of the failing call and the original error,
	/// untranslated.
	#[error("call {step} failed: {source}")]
	SubOperationFailed {
		/// Zero-based position of the failing call in the batch.
		step: usize,
		/// The sub-operation's own error.
		#[source]
		source: CallError,
	},
	/// Error that occurs when a payload cannot be decoded into a call.
	#[error("invalid call payload: {0}")]
	InvalidPayload(String),
}

/// A contract-like endpoint that executes encoded calls atomically.
///
/// Implementations must guarantee all-or-nothing semantics: if any call
/// in the batch fails, no effect of any call in the batch is retained.
#[async_trait]
pub trait CallTarget: Send + Sync {
	/// Executes the encoded calls in order as one unit of work, on
	/// behalf of `caller`.
	async fn execute_batch(&self, caller: Address, calls: &[Bytes]) -> Result<(), RelayError>;
}

/// Stateless sequencer for a permit call followed by a dependent call.
///
/// Purely a sequencing and atomicity boundary: the payloads are opaque,
/// so any two-step permit-then-action sequence fits this contract, not
/// only permit-then-transfer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicRelay;

impl AtomicRelay {
	pub fn new() -> Self {
		Self
	}

	/// Forwards the permit call and the dependent call to the target as
	/// one batch. A failure in either step surfaces unchanged as
	/// [`RelayError::SubOperationFailed`], with no state retained from
	/// either step.
	pub async fn execute(
		&self,
		target: &dyn CallTarget,
		caller: Address,
		permit_call: Bytes,
		action_call: Bytes,
	) -> Result<(), RelayError> {
		tracing::debug!(%caller, "Relaying permit and action as one unit");
		target
			.execute_batch(caller, &[permit_call, action_call])
			.await
	}
}
