//! Core module for the permit token system.
//!
//! This module ties the ledger and verifier together into a deployed
//! token node, decodes raw call payloads for it, and provides the
//! atomic relay that executes a permit and a dependent call as one
//! indivisible unit of work.

/// Call codec for the token's externally callable surface.
pub mod abi;
/// The deployed token node addressed by callers.
pub mod node;
/// Stateless atomic sequencing of permit-then-action batches.
pub mod relay;

pub use abi::{decode_call, IPermitToken, TokenCall};
pub use node::TokenNode;
pub use relay::{AtomicRelay, CallError, CallTarget, RelayError};
