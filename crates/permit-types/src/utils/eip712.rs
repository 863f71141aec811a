//! EIP-712 utilities for the permit signing protocol.
//!
//! These helpers provide:
//! - Domain separator computation
//! - Permit struct hashing with fixed field order and widths
//! - Final digest computation (0x1901 || domainSeparator || structHash)
//! - A minimal ABI encoder for the static field types involved
//!
//! The exact construction is the anti-replay-across-contexts mechanism:
//! a signature over this digest is valid for one deployment, one chain,
//! and one message schema, and nothing else.

use alloy_primitives::{keccak256, Address, B256, U256};

/// EIP-712 domain type string. Field order is part of the contract.
pub const DOMAIN_TYPE: &str =
	"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Permit struct type string. Field order and widths must match exactly
/// what a valid signer signed.
pub const PERMIT_TYPE: &str =
	"Permit(address holder,address spender,uint256 nonce,uint256 expiry,bool allowed)";

/// Returns the typehash of the permit struct type string.
pub fn permit_typehash() -> B256 {
	keccak256(PERMIT_TYPE.as_bytes())
}

/// Computes the EIP-712 domain separator
/// (keccak256(abi.encode(typeHash, nameHash, versionHash, chainId, verifyingContract))).
///
/// Pure and deterministic; callers compute it exactly once at
/// construction and cache it. It is never an input to verification.
pub fn domain_separator(name: &str, version: &str, chain_id: u64, contract: &Address) -> B256 {
	let domain_typehash = keccak256(DOMAIN_TYPE.as_bytes());
	let name_hash = keccak256(name.as_bytes());
	let version_hash = keccak256(version.as_bytes());
	let mut enc = Eip712Encoder::new();
	enc.push_b256(&domain_typehash);
	enc.push_b256(&name_hash);
	enc.push_b256(&version_hash);
	enc.push_u256(U256::from(chain_id));
	enc.push_address(contract);
	keccak256(enc.finish())
}

/// Computes the permit struct hash: fixed-order, fixed-width encoding of
/// the six fields followed by a single keccak256.
pub fn permit_struct_hash(
	typehash: &B256,
	holder: &Address,
	spender: &Address,
	nonce: U256,
	expiry: U256,
	allowed: bool,
) -> B256 {
	let mut enc = Eip712Encoder::new();
	enc.push_b256(typehash);
	enc.push_address(holder);
	enc.push_address(spender);
	enc.push_u256(nonce);
	enc.push_u256(expiry);
	enc.push_bool(allowed);
	keccak256(enc.finish())
}

/// Computes the final digest: keccak256(0x1901 || domainSeparator || structHash).
pub fn permit_digest(domain_separator: &B256, struct_hash: &B256) -> B256 {
	let mut out = Vec::with_capacity(2 + 32 + 32);
	out.push(0x19);
	out.push(0x01);
	out.extend_from_slice(domain_separator.as_slice());
	out.extend_from_slice(struct_hash.as_slice());
	keccak256(out)
}

/// Minimal ABI encoder for static types used in EIP-712 struct hashing.
///
/// Every pushed value occupies exactly one 32-byte word: addresses are
/// left-padded, integers big-endian, booleans a 0/1 word.
pub struct Eip712Encoder {
	buf: Vec<u8>,
}

impl Default for Eip712Encoder {
	fn default() -> Self {
		Self::new()
	}
}

impl Eip712Encoder {
	pub fn new() -> Self {
		Self { buf: Vec::new() }
	}

	pub fn push_b256(&mut self, v: &B256) {
		self.buf.extend_from_slice(v.as_slice());
	}

	pub fn push_address(&mut self, addr: &Address) {
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(addr.as_slice());
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u256(&mut self, v: U256) {
		let word: [u8; 32] = v.to_be_bytes::<32>();
		self.buf.extend_from_slice(&word);
	}

	pub fn push_bool(&mut self, v: bool) {
		let mut word = [0u8; 32];
		word[31] = v as u8;
		self.buf.extend_from_slice(&word);
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}
