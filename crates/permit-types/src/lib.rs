//! Common types module for the permit token system.
//!
//! This module defines the core data types and structures shared across
//! the ledger, verifier, and relay components. It provides a centralized
//! location for shared types to ensure consistency across all components.

/// Account-related types for balances, nonces, and allowances.
pub mod account;
/// Deployment configuration folded into the signing domain.
pub mod config;
/// Permit message and signature types.
pub mod permit;
/// Utility functions for hashing and common operations.
pub mod utils;

// Re-export all types for convenient access
pub use account::{AccountState, Allowance};
pub use config::{ConfigError, DomainConfig};
pub use permit::{PermitMessage, PermitSignature};
pub use utils::{
	current_timestamp, domain_separator, permit_digest, permit_struct_hash, permit_typehash,
	Eip712Encoder, DOMAIN_TYPE, PERMIT_TYPE,
};

// Re-export the primitive types used throughout the system so downstream
// crates agree on a single alloy version.
pub use alloy_primitives::{Address, Bytes, B256, U256};
