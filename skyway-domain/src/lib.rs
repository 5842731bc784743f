pub mod airplane;
pub mod airport;
pub mod baggage;
pub mod booking;
pub mod client;
pub mod fares;
pub mod flight;
pub mod payment;
pub mod rules;
pub mod seat;
pub mod validation;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Business rule violated: {0}")]
    RuleViolation(String),
    #[error("Unknown {kind} value: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

pub type DomainResult<T> = Result<T, DomainError>;
