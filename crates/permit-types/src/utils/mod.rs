//! Utility functions shared across the permit token system.

/// EIP-712 domain, struct-hash, and digest construction.
pub mod eip712;
/// Small helpers for common operations.
pub mod helpers;

pub use eip712::{
	domain_separator, permit_digest, permit_struct_hash, permit_typehash, Eip712Encoder,
	DOMAIN_TYPE, PERMIT_TYPE,
};
pub use helpers::current_timestamp;
