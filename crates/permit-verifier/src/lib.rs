//! Permit verification module for the permit token system.
//!
//! This module validates off-chain permit signatures against a claimed
//! holder identity and, on success, applies the granted allowance and
//! advances the holder's replay-protection nonce. The signing domain is
//! folded into a separator exactly once at construction; verification
//! never takes it as an input.

use alloy_primitives::{Address, PrimitiveSignature, B256, U256};
use permit_ledger::LedgerState;
use permit_types::{
	domain_separator, permit_digest, permit_struct_hash, permit_typehash, DomainConfig,
	PermitMessage, PermitSignature,
};
use thiserror::Error;

/// Errors that can occur during permit verification.
#[derive(Debug, Error)]
pub enum PermitError {
	/// Error that occurs when a permit with a nonzero expiry is checked past it.
	#[error("Permit expired")]
	Expired,
	/// Error that occurs when the permit nonce does not equal the holder's current nonce.
	#[error("Nonce mismatch")]
	NonceMismatch,
	/// Error that occurs when the signature does not recover to the claimed holder.
	#[error("Invalid signer")]
	InvalidSigner,
}

/// Validates permit signatures and applies their effects to the ledger.
///
/// The verifier is immutable after construction: it carries the permit
/// typehash and the cached domain separator, nothing else.
pub struct PermitVerifier {
	domain_separator: B256,
	permit_typehash: B256,
}

impl PermitVerifier {
	/// Creates a verifier for one deployment, computing the domain
	/// separator exactly once from the configured name, version, chain
	/// id, and contract identity.
	pub fn new(config: &DomainConfig) -> Self {
		Self {
			domain_separator: domain_separator(
				&config.name,
				&config.version,
				config.chain_id,
				&config.contract,
			),
			permit_typehash: permit_typehash(),
		}
	}

	/// Returns the cached domain separator.
	pub fn domain_separator(&self) -> B256 {
		self.domain_separator
	}

	/// Computes the digest a holder must sign for the given message.
	pub fn digest(&self, msg: &PermitMessage) -> B256 {
		let struct_hash = permit_struct_hash(
			&self.permit_typehash,
			&msg.holder,
			&msg.spender,
			msg.nonce,
			msg.expiry,
			msg.allowed,
		);
		permit_digest(&self.domain_separator, &struct_hash)
	}

	/// Verifies a permit against the ledger state at logical time `now`
	/// and, on success, applies its effects: the spender's allowance
	/// becomes unlimited (`allowed`) or zero (`!allowed`) and the
	/// holder's nonce advances by exactly one. Every check happens
	/// before any mutation, so an error implies the state is unchanged.
	pub fn apply_at(
		&self,
		state: &mut LedgerState,
		msg: &PermitMessage,
		sig: &PermitSignature,
		now: u64,
	) -> Result<(), PermitError> {
		if !msg.expiry.is_zero() && U256::from(now) > msg.expiry {
			return Err(PermitError::Expired);
		}
		if msg.nonce != state.nonce_of(&msg.holder) {
			return Err(PermitError::NonceMismatch);
		}

		let recovered = self.recover(&self.digest(msg), sig)?;
		if recovered == Address::ZERO || recovered != msg.holder {
			return Err(PermitError::InvalidSigner);
		}

		state.grant_permit(msg.holder, msg.spender, msg.allowed);
		tracing::info!(
			holder = %msg.holder,
			spender = %msg.spender,
			allowed = msg.allowed,
			"Applied permit"
		);
		Ok(())
	}

	/// Recovers the signing identity from a digest and signature. Pure:
	/// no state is read or written. Malformed signatures, including an
	/// unrecognized `v`, recover to an error rather than an identity.
	fn recover(&self, digest: &B256, sig: &PermitSignature) -> Result<Address, PermitError> {
		let parity = sig.parity().ok_or(PermitError::InvalidSigner)?;
		let signature = PrimitiveSignature::new(
			U256::from_be_bytes(sig.r.0),
			U256::from_be_bytes(sig.s.0),
			parity,
		);
		signature
			.recover_address_from_prehash(digest)
			.map_err(|_| PermitError::InvalidSigner)
	}
}
