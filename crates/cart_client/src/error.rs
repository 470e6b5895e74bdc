use shared::{domain::CartItemId, error::DomainError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("cart item {0} is not in the cart")]
    UnknownItem(CartItemId),
    #[error("cart item {0} appears more than once")]
    DuplicateItem(CartItemId),
    #[error("cannot check out an empty cart")]
    EmptyCart,
    #[error("invalid phone number '{0}': expected digits only")]
    InvalidPhoneNumber(String),
    #[error("failed to build checkout url: {0}")]
    CheckoutUrl(#[from] url::ParseError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub type CartResult<T> = Result<T, CartError>;
