//! Permit message and signature types.
//!
//! A permit is an off-chain signed authorization: the holder signs a
//! typed message granting (or revoking) a spender's allowance without
//! submitting anything themselves. These types are transient; they are
//! constructed per verification call and never stored.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// The typed message a holder signs to grant or revoke an allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitMessage {
	/// The account granting the allowance; must match the recovered signer.
	pub holder: Address,
	/// The account being granted the allowance.
	pub spender: Address,
	/// Must equal the holder's current stored nonce exactly.
	pub nonce: U256,
	/// Absolute expiry timestamp in seconds; zero means never expires.
	pub expiry: U256,
	/// True sets the spender's allowance to unlimited, false to zero.
	pub allowed: bool,
}

/// A recoverable ECDSA signature over a 32-byte digest, in the
/// `(v, r, s)` form the permit entry point accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitSignature {
	/// Recovery id; accepted as 0/1 or the legacy 27/28 encoding.
	pub v: u8,
	/// The `r` scalar of the signature.
	pub r: B256,
	/// The `s` scalar of the signature.
	pub s: B256,
}

impl PermitSignature {
	/// Normalizes `v` to a y-parity bit, accepting both the raw 0/1
	/// form and the legacy 27/28 form. Returns `None` for anything else.
	pub fn parity(&self) -> Option<bool> {
		match self.v {
			0 | 27 => Some(false),
			1 | 28 => Some(true),
			_ => None,
		}
	}

	/// Builds a signature from the 65-byte `r || s || v` wire form.
	pub fn from_raw(bytes: &[u8]) -> Option<Self> {
		if bytes.len() != 65 {
			return None;
		}
		Some(Self {
			v: bytes[64],
			r: B256::from_slice(&bytes[..32]),
			s: B256::from_slice(&bytes[32..64]),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parity_accepts_both_v_encodings() {
		let base = PermitSignature {
			v: 0,
			r: B256::ZERO,
			s: B256::ZERO,
		};
		assert_eq!(PermitSignature { v: 0, ..base }.parity(), Some(false));
		assert_eq!(PermitSignature { v: 27, ..base }.parity(), Some(false));
		assert_eq!(PermitSignature { v: 1, ..base }.parity(), Some(true));
		assert_eq!(PermitSignature { v: 28, ..base }.parity(), Some(true));
		assert_eq!(PermitSignature { v: 2, ..base }.parity(), None);
		assert_eq!(PermitSignature { v: 29, ..base }.parity(), None);
	}

	#[test]
	fn from_raw_rejects_wrong_length() {
		assert!(PermitSignature::from_raw(&[0u8; 64]).is_none());
		assert!(PermitSignature::from_raw(&[0u8; 66]).is_none());

		let mut raw = [0u8; 65];
		raw[0] = 0xaa;
		raw[32] = 0xbb;
		raw[64] = 28;
		let sig = PermitSignature::from_raw(&raw).unwrap();
		assert_eq!(sig.v, 28);
		assert_eq!(sig.r[0], 0xaa);
		assert_eq!(sig.s[0], 0xbb);
	}
}
