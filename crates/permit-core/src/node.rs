//! The deployed token node: ledger plus verifier behind one boundary.
//!
//! `TokenNode` is what callers address, directly through the typed entry
//! points or through raw calldata via [`CallTarget`]. It owns no state
//! of its own beyond the ledger it guards and the verifier's cached
//! domain separator.

use async_trait::async_trait;

use alloy_primitives::{Address, Bytes, B256, U256};
use permit_ledger::{LedgerError, LedgerState, TokenLedger};
use permit_types::{current_timestamp, Allowance, DomainConfig, PermitMessage, PermitSignature};
use permit_verifier::{PermitError, PermitVerifier};

use crate::abi::{self, TokenCall};
use crate::relay::{CallError, CallTarget, RelayError};

/// One deployed permit token: a ledger and the verifier bound to this
/// deployment's signing domain.
pub struct TokenNode {
	ledger: TokenLedger,
	verifier: PermitVerifier,
}

impl TokenNode {
	/// Deploys a node for the given domain configuration. The domain
	/// separator is computed here, once, and cached for the node's
	/// lifetime.
	pub fn new(config: &DomainConfig) -> Self {
		Self {
			ledger: TokenLedger::new(),
			verifier: PermitVerifier::new(config),
		}
	}

	/// Returns the cached domain separator of this deployment.
	pub fn domain_separator(&self) -> B256 {
		self.verifier.domain_separator()
	}

	/// Computes the digest a holder must sign for the given message.
	pub fn permit_digest(&self, msg: &PermitMessage) -> B256 {
		self.verifier.digest(msg)
	}

	/// Returns the underlying ledger service.
	pub fn ledger(&self) -> &TokenLedger {
		&self.ledger
	}

	/// Credits an account. Externally authorized; only increases the
	/// balance.
	pub async fn mint(&self, to: Address, amount: U256) {
		self.ledger.mint(to, amount).await;
	}

	/// Returns the balance of the given account.
	pub async fn balance_of(&self, who: &Address) -> U256 {
		self.ledger.balance_of(who).await
	}

	/// Returns the current permit nonce of the given account.
	pub async fn nonce_of(&self, who: &Address) -> U256 {
		self.ledger.nonce_of(who).await
	}

	/// Returns the allowance the holder has granted the spender.
	pub async fn allowance(&self, holder: &Address, spender: &Address) -> Allowance {
		self.ledger.allowance(holder, spender).await
	}

	/// Applies a signed permit against the current wall-clock time.
	/// Callable by any party holding a valid signature.
	pub async fn permit(
		&self,
		msg: &PermitMessage,
		sig: &PermitSignature,
	) -> Result<(), PermitError> {
		let now = current_timestamp();
		self.ledger
			.transaction(|state| self.verifier.apply_at(state, msg, sig, now))
			.await
	}

	/// Moves tokens on behalf of `caller`, allowance-gated.
	pub async fn transfer_from(
		&self,
		caller: Address,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), LedgerError> {
		self.ledger.transfer_from(caller, from, to, amount).await
	}

	/// Dispatches one decoded call against a state draft.
	fn dispatch(
		&self,
		state: &mut LedgerState,
		caller: Address,
		call: &TokenCall,
		now: u64,
	) -> Result<(), CallError> {
		match call {
			TokenCall::permit(call) => {
				let msg = PermitMessage {
					holder: call.holder,
					spender: call.spender,
					nonce: call.nonce,
					expiry: call.expiry,
					allowed: call.allowed,
				};
				let sig = PermitSignature {
					v: call.v,
					r: call.r,
					s: call.s,
				};
				self.verifier.apply_at(state, &msg, &sig, now)?;
			}
			TokenCall::transferFrom(call) => {
				state.transfer_from(caller, call.src, call.dst, call.wad)?;
			}
		}
		Ok(())
	}
}

#[async_trait]
impl CallTarget for TokenNode {
	async fn execute_batch(&self, caller: Address, calls: &[Bytes]) -> Result<(), RelayError> {
		// Decode everything up front; a malformed payload must fail the
		// batch before any state is touched.
		let calls = calls
			.iter()
			.map(|data| abi::decode_call(data))
			.collect::<Result<Vec<_>, _>>()?;

		let now = current_timestamp();
		self.ledger
			.transaction(|state| {
				for (step, call) in calls.iter().enumerate() {
					self.dispatch(state, caller, call, now)
						.map_err(|source| RelayError::SubOperationFailed { step, source })?;
				}
				Ok(())
			})
			.await
	}
}
