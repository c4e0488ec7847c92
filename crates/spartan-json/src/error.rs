use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueToJsonError {
    #[error("Non-finite number {0} cannot be represented in JSON")]
    NonFiniteNumber(f64),
}
