//! Token ledger module for the permit token system.
//!
//! This module owns the only mutable shared state in the system: the
//! balance, nonce, and allowance maps. State is guarded by a single
//! read-write lock, so every logical operation runs to completion before
//! any other operation may observe or mutate it. The `transaction`
//! combinator extends that boundary over a batch of operations: effects
//! are committed only if the whole batch succeeds.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use alloy_primitives::{Address, U256};
use permit_types::Allowance;

mod state;

pub use state::LedgerState;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
	/// Error that occurs when the source balance does not cover a transfer.
	#[error("Insufficient balance")]
	InsufficientBalance,
	/// Error that occurs when the caller's finite allowance does not cover a transfer.
	#[error("Insufficient allowance")]
	InsufficientAllowance,
}

/// Async service guarding the ledger state behind one lock.
///
/// Cloning the service is cheap and shares the underlying state.
#[derive(Clone, Default)]
pub struct TokenLedger {
	state: Arc<RwLock<LedgerState>>,
}

impl TokenLedger {
	/// Creates a ledger with no accounts.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the balance of the given account.
	pub async fn balance_of(&self, who: &Address) -> U256 {
		self.state.read().await.balance_of(who)
	}

	/// Returns the current permit nonce of the given account.
	pub async fn nonce_of(&self, who: &Address) -> U256 {
		self.state.read().await.nonce_of(who)
	}

	/// Returns the allowance the holder has granted the spender.
	pub async fn allowance(&self, holder: &Address, spender: &Address) -> Allowance {
		self.state.read().await.allowance(holder, spender)
	}

	/// Credits the given account. See [`LedgerState::mint`].
	pub async fn mint(&self, to: Address, amount: U256) {
		self.state.write().await.mint(to, amount);
		tracing::info!(%to, %amount, "Minted tokens");
	}

	/// Moves tokens on behalf of `caller`. See [`LedgerState::transfer_from`].
	pub async fn transfer_from(
		&self,
		caller: Address,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), LedgerError> {
		self.state
			.write()
			.await
			.transfer_from(caller, from, to, amount)
	}

	/// Runs a batch of state mutations as one unit of work.
	///
	/// The closure operates on a draft copy of the state under the write
	/// lock. On `Ok` the draft replaces the live state; on `Err` it is
	/// discarded, so no partial effect of the batch is ever observable.
	pub async fn transaction<T, E>(
		&self,
		f: impl FnOnce(&mut LedgerState) -> Result<T, E>,
	) -> Result<T, E> {
		let mut guard = self.state.write().await;
		let mut draft = guard.clone();
		let out = f(&mut draft)?;
		*guard = draft;
		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn addr(byte: u8) -> Address {
		Address::repeat_byte(byte)
	}

	#[tokio::test]
	async fn transaction_commits_on_success() {
		let ledger = TokenLedger::new();
		ledger
			.transaction(|state| {
				state.mint(addr(1), U256::from(100));
				state.transfer_from(addr(1), addr(1), addr(2), U256::from(30))
			})
			.await
			.unwrap();

		assert_eq!(ledger.balance_of(&addr(1)).await, U256::from(70));
		assert_eq!(ledger.balance_of(&addr(2)).await, U256::from(30));
	}

	#[tokio::test]
	async fn transaction_rolls_back_every_effect_on_failure() {
		let ledger = TokenLedger::new();
		ledger.mint(addr(1), U256::from(100)).await;

		let result = ledger
			.transaction(|state| {
				// First step succeeds on the draft...
				state.grant_permit(addr(1), addr(2), true);
				// ...second step fails, which must also undo the first.
				state.transfer_from(addr(2), addr(1), addr(2), U256::from(200))
			})
			.await;

		assert!(matches!(result, Err(LedgerError::InsufficientBalance)));
		assert_eq!(ledger.nonce_of(&addr(1)).await, U256::ZERO);
		assert_eq!(
			ledger.allowance(&addr(1), &addr(2)).await,
			Allowance::Finite(U256::ZERO)
		);
		assert_eq!(ledger.balance_of(&addr(1)).await, U256::from(100));
	}

	#[tokio::test]
	async fn clones_share_state() {
		let ledger = TokenLedger::new();
		let view = ledger.clone();
		ledger.mint(addr(1), U256::from(5)).await;
		assert_eq!(view.balance_of(&addr(1)).await, U256::from(5));
	}
}
