// storefront/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;
use uuid::Uuid;

use crate::flow::FlowError;

#[derive(Debug, Error)]
pub enum ShopError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Cart item {item_id} does not belong to the requesting user")]
    Forbidden { item_id: Uuid },

    #[error("Your cart is empty.")]
    EmptyCart,

    #[error("Payment gateway error: {source}")]
    Gateway {
        #[source]
        source: AnyhowError,
    },

    #[error("Payment signature verification failed for gateway order '{order_id}'")]
    Signature { order_id: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {source}")]
    Storage {
        #[source]
        source: AnyhowError,
    },

    #[error(transparent)]
    Flow(#[from] FlowError),
}

impl ShopError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ShopError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn gateway(source: impl Into<AnyhowError>) -> Self {
        ShopError::Gateway { source: source.into() }
    }

    pub fn storage(source: impl Into<AnyhowError>) -> Self {
        ShopError::Storage { source: source.into() }
    }
}

pub type ShopResult<T, E = ShopError> = std::result::Result<T, E>;
