//! Deployment configuration for the permit token.
//!
//! The fields here are fixed at construction time and folded once into
//! the cached domain separator. They are never an input to verification
//! afterwards, only an output of construction.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// EIP-712 signing domain configuration.
///
/// Binds every signature to one deployment: token name, schema version,
/// chain, and the ledger's own identity. Two deployments differing in
/// any field produce disjoint signature domains.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DomainConfig {
	/// Token display name, e.g. "Dai Stablecoin".
	pub name: String,
	/// Schema version tag, fixed at deployment.
	pub version: String,
	/// Network/chain identifier.
	pub chain_id: u64,
	/// The deployed ledger's own identity.
	pub contract: Address,
}

impl DomainConfig {
	/// Loads and validates a domain configuration from a TOML string.
	pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
		let config: DomainConfig = toml::from_str(raw)?;
		config.validate()?;
		Ok(config)
	}

	/// Validates that all required configuration values are set.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.name.is_empty() {
			return Err(ConfigError::Validation(
				"token name must not be empty".to_string(),
			));
		}
		if self.version.is_empty() {
			return Err(ConfigError::Validation(
				"version must not be empty".to_string(),
			));
		}
		Ok(())
	}
}
