use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("invalid pack size '{0}': expected a whole number followed by g or kg")]
    InvalidPackSize(String),
    #[error("discount percentage {0} exceeds 100")]
    DiscountOutOfRange(u32),
}
