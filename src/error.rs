//! Error types for market operations.
//!
//! Every fallible operation in this crate returns [`Error`]. Nothing is
//! recovered locally: reads, writes and conversions surface the underlying
//! cause so the calling program can report it and stop.

use std::fmt;

use alloy::{
    contract::Error as ContractError,
    primitives::{Bytes, TxHash},
    providers::{PendingTransactionError, WatchTxError},
    transports::TransportError,
};

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for market operations.
///
/// Covers configuration problems, RPC failures, contract rejections, decoding
/// failures and the arithmetic preconditions of the unit conversions.
#[derive(Debug, derive_more::IsVariant)]
pub enum Error {
    /// Missing or invalid configuration.
    ///
    /// Raised before any network call, e.g. when `PRIVATE_KEY` is not set or
    /// a write is attempted on a client without a signing account.
    Config(String),

    /// RPC transport error.
    ///
    /// Connection failures, HTTP errors and malformed JSON-RPC envelopes.
    Transport(TransportError),

    /// The node rejected the call.
    ///
    /// Most commonly the contract reverted during `eth_call` or gas
    /// estimation. `data` holds the raw revert payload when the node returns
    /// one.
    Revert {
        /// JSON-RPC error code
        code: i64,
        /// Error message, usually carrying the revert reason
        message: String,
        /// Raw revert data
        data: Option<Bytes>,
    },

    /// The transaction was mined but its receipt reports failure.
    Reverted {
        /// Hash of the failed transaction
        tx_hash: TxHash,
    },

    /// A contract returned data that doesn't match the expected schema.
    Decode(String),

    /// A division whose denominator has no safe fallback was zero.
    DivisionByZero(&'static str),

    /// A value does not fit the target numeric type.
    Overflow(String),

    /// A user supplied amount can't be converted to base units.
    InvalidAmount(String),

    /// Timed out waiting for a transaction to be confirmed.
    Timeout,

    /// Other error not covered by specific variants.
    Other(String),
}

impl Error {
    /// Returns true if this error may succeed on retry.
    ///
    /// Transport failures and confirmation timeouts are transient. Reverts,
    /// decode errors and configuration errors are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout)
    }

    /// Returns true if the contract refused the call, either before
    /// inclusion or in the mined receipt.
    #[must_use]
    pub fn is_contract_rejection(&self) -> bool {
        matches!(self, Error::Revert { .. } | Error::Reverted { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Transport(e) => write!(f, "Transport error: {}", e),
            Error::Revert { code, message, .. } => {
                write!(f, "Call rejected ({}): {}", code, message)
            }
            Error::Reverted { tx_hash } => write!(f, "Transaction {} reverted", tx_hash),
            Error::Decode(e) => write!(f, "Decode error: {}", e),
            Error::DivisionByZero(what) => write!(f, "Division by zero: {} is zero", what),
            Error::Overflow(e) => write!(f, "Overflow: {}", e),
            Error::InvalidAmount(e) => write!(f, "Invalid amount: {}", e),
            Error::Timeout => write!(f, "Timed out waiting for confirmation"),
            Error::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(e) => Some(e),
            _ => None,
        }
    }
}

// Conversion implementations for ergonomic error handling

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        match e.as_error_resp() {
            Some(resp) => Error::Revert {
                code: resp.code,
                message: resp.message.to_string(),
                data: resp.as_revert_data(),
            },
            None => Error::Transport(e),
        }
    }
}

impl From<ContractError> for Error {
    fn from(e: ContractError) -> Self {
        match e {
            ContractError::TransportError(e) => e.into(),
            ContractError::PendingTransactionError(e) => e.into(),
            ContractError::AbiError(e) => Error::Decode(e.to_string()),
            e @ ContractError::ZeroData(..) => Error::Decode(e.to_string()),
            e => Error::Other(e.to_string()),
        }
    }
}

impl From<PendingTransactionError> for Error {
    fn from(e: PendingTransactionError) -> Self {
        match e {
            PendingTransactionError::TransportError(e) => e.into(),
            PendingTransactionError::TxWatcher(WatchTxError::Timeout) => Error::Timeout,
            e => Error::Other(e.to_string()),
        }
    }
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Error::Timeout
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::Config(format!("URL parse error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use alloy::{
        rpc::json_rpc::ErrorPayload,
        transports::{RpcError, TransportErrorKind},
    };

    use super::*;

    #[test]
    fn test_error_response_is_revert() {
        let payload = ErrorPayload {
            code: 3,
            message: "execution reverted: insufficient collateral".into(),
            data: None,
        };
        let err = Error::from(TransportError::ErrorResp(payload));
        match err {
            Error::Revert { code, ref message, .. } => {
                assert_eq!(code, 3);
                assert!(message.contains("insufficient collateral"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.is_contract_rejection());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_contract_decode_failures() {
        let zero_data = ContractError::ZeroData(
            "market".into(),
            alloy::sol_types::Error::Overrun.into(),
        );
        let err = Error::from(zero_data);
        assert!(err.is_decode());
        assert!(err.to_string().contains("market"));

        let abi = ContractError::AbiError(alloy::sol_types::Error::Overrun.into());
        let err = Error::from(abi);
        assert!(err.is_decode());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_contract_error_response_is_revert() {
        let payload = ErrorPayload {
            code: 3,
            message: "execution reverted".into(),
            data: None,
        };
        let err = Error::from(ContractError::TransportError(TransportError::ErrorResp(payload)));
        assert!(matches!(err, Error::Revert { code: 3, .. }));
        assert!(err.is_contract_rejection());

        let err = Error::from(ContractError::TransportError(RpcError::Transport(
            TransportErrorKind::BackendGone,
        )));
        assert!(err.is_transport());
    }

    #[test]
    fn test_transport_is_retryable() {
        let err: Error = RpcError::Transport(TransportErrorKind::BackendGone).into();
        assert!(err.is_transport());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_timeout() {
        let err: Error = PendingTransactionError::TxWatcher(WatchTxError::Timeout).into();
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Timed out waiting for confirmation");
    }
}
