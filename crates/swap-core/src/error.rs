//! Error types returned by the exchange.

use crate::store::StorageError;
use crate::types::{Id, SwapStatus};
use thiserror::Error;

/// Category of a failed call, for callers that branch on the kind of
/// failure rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Authorization,
    InvalidTransition,
    Storage,
}

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("member not found: {0}")]
    MemberNotFound(Id),
    #[error("swap request not found: {0}")]
    RequestNotFound(Id),
    #[error("member {actor} is not allowed to {action}")]
    Unauthorized { actor: Id, action: &'static str },
    #[error("cannot {action} a {from} swap request")]
    InvalidTransition {
        from: SwapStatus,
        action: &'static str,
    },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ExchangeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::MemberNotFound(_) | Self::RequestNotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn unauthorized(actor: &Id, action: &'static str) -> Self {
        Self::Unauthorized {
            actor: actor.clone(),
            action,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
