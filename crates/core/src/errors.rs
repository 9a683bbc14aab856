use thiserror::Error;

use crate::domain::quotation::QuotationStatus;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("catalog item `{0}` not found")]
    CatalogItemNotFound(String),
    #[error("invalid quotation transition from {from:?} to {to:?}")]
    InvalidStatusTransition { from: QuotationStatus, to: QuotationStatus },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("integration failure: {0}")]
    Integration(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Collaborator failures (persistence, email) are surfaced verbatim and
    /// never retried here; the caller decides what to show the user.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Domain(_) => true,
            Self::Persistence(_) | Self::Integration(_) => true,
            Self::Configuration(_) => false,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::Validation(_)) => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Domain(DomainError::CatalogItemNotFound(_)) => {
                "The selected catalog item no longer exists."
            }
            Self::Domain(DomainError::InvalidStatusTransition { .. }) => {
                "The quotation is not in a state that allows this action."
            }
            Self::Persistence(_) | Self::Integration(_) => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Configuration(_) => "An unexpected internal error occurred.",
        }
    }
}
