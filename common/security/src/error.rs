use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecurityError {
    #[error("caller lacks a role permitted for this capability")]
    Forbidden,
}
