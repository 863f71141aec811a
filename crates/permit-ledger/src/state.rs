//! Pure, synchronous ledger state.
//!
//! `LedgerState` owns the balance/nonce/allowance maps and is the only
//! place they are mutated. Every mutating operation validates all of its
//! preconditions before touching any map, so a returned error implies no
//! state change at all. The async service in `lib.rs` wraps this state
//! in a single lock; transactional batching clones it and commits the
//! clone on success.

use crate::LedgerError;
use alloy_primitives::{Address, U256};
use permit_types::{AccountState, Allowance};
use std::collections::HashMap;

/// The balance, nonce, and allowance maps for every account.
///
/// Accounts are created implicitly on first reference and never
/// destroyed.
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
	accounts: HashMap<Address, AccountState>,
}

impl LedgerState {
	/// Creates an empty ledger state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the balance of the given account, zero if never seen.
	pub fn balance_of(&self, who: &Address) -> U256 {
		self.accounts
			.get(who)
			.map(|account| account.balance)
			.unwrap_or(U256::ZERO)
	}

	/// Returns the current permit nonce of the given account.
	pub fn nonce_of(&self, who: &Address) -> U256 {
		self.accounts
			.get(who)
			.map(|account| account.nonce)
			.unwrap_or(U256::ZERO)
	}

	/// Returns the allowance the holder has granted the spender.
	pub fn allowance(&self, holder: &Address, spender: &Address) -> Allowance {
		self.accounts
			.get(holder)
			.and_then(|account| account.allowances.get(spender).copied())
			.unwrap_or_default()
	}

	/// Credits the given account. Only ever increases a balance; nonces
	/// and allowances are untouched. Authorization is the caller's
	/// concern.
	pub fn mint(&mut self, to: Address, amount: U256) {
		self.accounts.entry(to).or_default().balance += amount;
	}

	/// Moves `amount` from `from` to `to` on behalf of `caller`.
	///
	/// Fails with `InsufficientBalance` before anything else if the
	/// source balance does not cover the amount. Unless the caller is
	/// the source account itself, the caller's allowance from `from`
	/// gates the transfer: a finite allowance below `amount` fails with
	/// `InsufficientAllowance`, a covering finite allowance is
	/// decremented, and an unlimited allowance is left untouched.
	pub fn transfer_from(
		&mut self,
		caller: Address,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), LedgerError> {
		if self.balance_of(&from) < amount {
			return Err(LedgerError::InsufficientBalance);
		}

		let remaining = if caller == from {
			None
		} else {
			match self.allowance(&from, &caller) {
				Allowance::Unlimited => None,
				Allowance::Finite(available) if available < amount => {
					return Err(LedgerError::InsufficientAllowance);
				}
				Allowance::Finite(available) => Some(available - amount),
			}
		};

		// All checks passed; apply every effect.
		self.accounts.entry(from).or_default().balance -= amount;
		self.accounts.entry(to).or_default().balance += amount;
		if let Some(remaining) = remaining {
			self.accounts
				.entry(from)
				.or_default()
				.allowances
				.insert(caller, Allowance::Finite(remaining));
		}

		tracing::debug!(
			%from,
			%to,
			%amount,
			"Transferred tokens"
		);
		Ok(())
	}

	/// Applies the effects of a verified permit: sets the spender's
	/// allowance to unlimited (`allowed`) or zero (`!allowed`) and
	/// advances the holder's nonce by exactly one. Both mutations happen
	/// together; verification failures must be raised before calling
	/// this.
	pub fn grant_permit(&mut self, holder: Address, spender: Address, allowed: bool) {
		let account = self.accounts.entry(holder).or_default();
		let allowance = if allowed {
			Allowance::Unlimited
		} else {
			Allowance::Finite(U256::ZERO)
		};
		account.allowances.insert(spender, allowance);
		account.nonce += U256::from(1);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn addr(byte: u8) -> Address {
		Address::repeat_byte(byte)
	}

	#[test]
	fn mint_only_touches_balance() {
		let mut state = LedgerState::new();
		state.mint(addr(1), U256::from(100));
		state.mint(addr(1), U256::from(50));
		assert_eq!(state.balance_of(&addr(1)), U256::from(150));
		assert_eq!(state.nonce_of(&addr(1)), U256::ZERO);
		assert_eq!(
			state.allowance(&addr(1), &addr(2)),
			Allowance::Finite(U256::ZERO)
		);
	}

	#[test]
	fn unknown_accounts_read_as_zero() {
		let state = LedgerState::new();
		assert_eq!(state.balance_of(&addr(9)), U256::ZERO);
		assert_eq!(state.nonce_of(&addr(9)), U256::ZERO);
		assert_eq!(
			state.allowance(&addr(9), &addr(8)),
			Allowance::Finite(U256::ZERO)
		);
	}

	#[test]
	fn transfer_requires_balance_before_allowance() {
		let mut state = LedgerState::new();
		// No balance and no allowance: balance is checked first.
		let result = state.transfer_from(addr(2), addr(1), addr(2), U256::from(1));
		assert!(matches!(result, Err(LedgerError::InsufficientBalance)));
	}

	#[test]
	fn transfer_without_allowance_fails() {
		let mut state = LedgerState::new();
		state.mint(addr(1), U256::from(100));
		let result = state.transfer_from(addr(2), addr(1), addr(2), U256::from(100));
		assert!(matches!(result, Err(LedgerError::InsufficientAllowance)));
		// Nothing moved.
		assert_eq!(state.balance_of(&addr(1)), U256::from(100));
		assert_eq!(state.balance_of(&addr(2)), U256::ZERO);
	}

	#[test]
	fn exact_finite_allowance_is_consumed_to_zero() {
		let mut state = LedgerState::new();
		state.mint(addr(1), U256::from(100));
		state
			.accounts
			.entry(addr(1))
			.or_default()
			.allowances
			.insert(addr(2), Allowance::Finite(U256::from(100)));

		state
			.transfer_from(addr(2), addr(1), addr(2), U256::from(100))
			.unwrap();
		assert_eq!(
			state.allowance(&addr(1), &addr(2)),
			Allowance::Finite(U256::ZERO)
		);
		assert_eq!(state.balance_of(&addr(2)), U256::from(100));
	}

	#[test]
	fn finite_allowance_below_amount_fails() {
		let mut state = LedgerState::new();
		state.mint(addr(1), U256::from(100));
		state
			.accounts
			.entry(addr(1))
			.or_default()
			.allowances
			.insert(addr(2), Allowance::Finite(U256::from(99)));

		let result = state.transfer_from(addr(2), addr(1), addr(2), U256::from(100));
		assert!(matches!(result, Err(LedgerError::InsufficientAllowance)));
	}

	#[test]
	fn unlimited_allowance_is_never_decremented() {
		let mut state = LedgerState::new();
		state.mint(addr(1), U256::from(100));
		state.grant_permit(addr(1), addr(2), true);

		for _ in 0..4 {
			state
				.transfer_from(addr(2), addr(1), addr(2), U256::from(25))
				.unwrap();
			assert_eq!(state.allowance(&addr(1), &addr(2)), Allowance::Unlimited);
		}
		assert_eq!(state.balance_of(&addr(1)), U256::ZERO);
		assert_eq!(state.balance_of(&addr(2)), U256::from(100));
	}

	#[test]
	fn holder_can_move_own_tokens_without_allowance() {
		let mut state = LedgerState::new();
		state.mint(addr(1), U256::from(100));
		state
			.transfer_from(addr(1), addr(1), addr(2), U256::from(40))
			.unwrap();
		assert_eq!(state.balance_of(&addr(1)), U256::from(60));
		assert_eq!(state.balance_of(&addr(2)), U256::from(40));
	}

	#[test]
	fn self_transfer_preserves_balance() {
		let mut state = LedgerState::new();
		state.mint(addr(1), U256::from(100));
		state
			.transfer_from(addr(1), addr(1), addr(1), U256::from(100))
			.unwrap();
		assert_eq!(state.balance_of(&addr(1)), U256::from(100));
	}

	#[test]
	fn grant_permit_sets_allowance_and_bumps_nonce() {
		let mut state = LedgerState::new();
		state.grant_permit(addr(1), addr(2), true);
		assert_eq!(state.allowance(&addr(1), &addr(2)), Allowance::Unlimited);
		assert_eq!(state.nonce_of(&addr(1)), U256::from(1));

		// A revoking permit resets the allowance and advances the nonce
		// again.
		state.grant_permit(addr(1), addr(2), false);
		assert_eq!(
			state.allowance(&addr(1), &addr(2)),
			Allowance::Finite(U256::ZERO)
		);
		assert_eq!(state.nonce_of(&addr(1)), U256::from(2));
	}

	#[test]
	fn failed_transfer_leaves_allowance_untouched() {
		let mut state = LedgerState::new();
		state.mint(addr(1), U256::from(10));
		state
			.accounts
			.entry(addr(1))
			.or_default()
			.allowances
			.insert(addr(2), Allowance::Finite(U256::from(10)));

		// Balance gate trips; the allowance must not have been touched.
		let result = state.transfer_from(addr(2), addr(1), addr(3), U256::from(11));
		assert!(matches!(result, Err(LedgerError::InsufficientBalance)));
		assert_eq!(
			state.allowance(&addr(1), &addr(2)),
			Allowance::Finite(U256::from(10))
		);
	}
}
