// glowcart/src/error.rs
use thiserror::Error;

use crate::models::OrderStatus;

/// Failures of the local record store. Reads in the collection managers treat
/// these as an empty collection; writes report them to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to (de)serialize collection '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store quota exceeded: write needs {required} bytes, limit is {limit}")]
    QuotaExceeded { required: usize, limit: usize },

    #[error("Collection '{key}' was written by a newer format (version {found}, supported {supported})")]
    UnsupportedVersion { key: String, found: u64, supported: u32 },

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why an operation was refused before touching any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionFailure {
    #[error("the cart is empty")]
    EmptyCart,

    #[error("no customer is signed in")]
    Unauthenticated,

    #[error("the signed-in user is not an administrator")]
    Forbidden,

    #[error("product '{product_id}' is out of stock")]
    OutOfStock { product_id: String },

    #[error("product '{product_id}' has {available} in stock, {requested} requested")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },
}

/// Wiring errors raised by the step pipeline itself, as opposed to its handlers.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Step not found: {step_name}")]
    StepNotFound { step_name: String },

    #[error("Handler missing for non-optional step: {step_name}")]
    HandlerMissing { step_name: String },
}

#[derive(Debug, Error)]
pub enum ShopError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionFailure),

    #[error("Illegal order status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

impl ShopError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The precondition behind this error, if it is one.
    pub fn precondition(&self) -> Option<&PreconditionFailure> {
        match self {
            Self::Precondition(p) => Some(p),
            _ => None,
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub type ShopResult<T, E = ShopError> = std::result::Result<T, E>;
