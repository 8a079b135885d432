//! Contract error types

use super::types::RequestKind;
use thiserror::Error;

/// The platform sent a request that breaks the invocation contract
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("{0} request is missing call state")]
    MissingState(RequestKind),
    #[error("option request is missing the option field")]
    MissingOption,
}

/// A flow hook could not produce its normal response
#[derive(Debug, Error)]
pub enum FlowError {
    /// Input arrived after the flow already ended the call
    #[error("call has already ended")]
    CallEnded,
    #[error("flow failure: {0}")]
    Internal(String),
}
