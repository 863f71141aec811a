//! Account state types for the permit token ledger.
//!
//! This module defines the per-account record owned by the ledger:
//! a balance, a replay-protection nonce, and the allowances granted
//! to spenders.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A spender's allowance as granted by a holder.
///
/// The unlimited variant is a distinct sentinel, not a large finite
/// number: transfers never decrement it, so repeated transfers against
/// an unlimited allowance are idempotent with respect to the allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allowance {
	/// A finite amount, decremented by each transfer that consumes it.
	Finite(U256),
	/// The unlimited sentinel set by an `allowed = true` permit.
	Unlimited,
}

impl Allowance {
	/// Returns true if this allowance covers the given transfer amount.
	pub fn covers(&self, amount: U256) -> bool {
		match self {
			Allowance::Finite(available) => *available >= amount,
			Allowance::Unlimited => true,
		}
	}

	/// Returns true for the unlimited sentinel.
	pub fn is_unlimited(&self) -> bool {
		matches!(self, Allowance::Unlimited)
	}
}

impl Default for Allowance {
	fn default() -> Self {
		Allowance::Finite(U256::ZERO)
	}
}

/// Per-account ledger record.
///
/// Accounts are created implicitly on first balance or allowance
/// reference and persist for the lifetime of the ledger; there is no
/// explicit destruction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountState {
	/// Token balance held by this account.
	pub balance: U256,
	/// Permit nonce; starts at zero and increases by exactly one per
	/// successfully consumed permit.
	pub nonce: U256,
	/// Allowances granted by this account, keyed by spender.
	pub allowances: HashMap<Address, Allowance>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn finite_allowance_covers_up_to_amount() {
		let allowance = Allowance::Finite(U256::from(10));
		assert!(allowance.covers(U256::from(10)));
		assert!(!allowance.covers(U256::from(11)));
	}

	#[test]
	fn unlimited_allowance_covers_everything() {
		assert!(Allowance::Unlimited.covers(U256::MAX));
		assert!(Allowance::Unlimited.is_unlimited());
	}

	#[test]
	fn default_allowance_is_zero() {
		assert_eq!(Allowance::default(), Allowance::Finite(U256::ZERO));
		assert!(!Allowance::default().covers(U256::from(1)));
		// Zero transfers are always covered.
		assert!(Allowance::default().covers(U256::ZERO));
	}

	#[test]
	fn default_account_starts_empty() {
		let account = AccountState::default();
		assert_eq!(account.balance, U256::ZERO);
		assert_eq!(account.nonce, U256::ZERO);
		assert!(account.allowances.is_empty());
	}
}
