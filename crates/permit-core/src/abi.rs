//! Call codec for the permit token surface.
//!
//! The relay treats each forwarded call as opaque calldata; this module
//! is where that calldata is decoded into a dispatchable call. Encoding
//! follows the standard ABI convention, so payloads produced by any
//! conforming encoder round-trip through here.

use crate::relay::RelayError;
use alloy_sol_types::{sol, SolInterface};

sol! {
	/// The externally callable surface of the token: the two operations
	/// a relay may forward.
	interface IPermitToken {
		function permit(
			address holder,
			address spender,
			uint256 nonce,
			uint256 expiry,
			bool allowed,
			uint8 v,
			bytes32 r,
			bytes32 s
		) external;

		function transferFrom(address src, address dst, uint256 wad) external returns (bool);
	}
}

/// A decoded call ready for dispatch.
pub use IPermitToken::IPermitTokenCalls as TokenCall;

/// Decodes one raw call payload by selector.
///
/// Unknown selectors and malformed argument encodings fail with
/// [`RelayError::InvalidPayload`]; nothing is dispatched for them.
pub fn decode_call(data: &[u8]) -> Result<TokenCall, RelayError> {
	TokenCall::abi_decode(data, true).map_err(|err| RelayError::InvalidPayload(err.to_string()))
}
