use thiserror::Error;
use uuid::Uuid;

/// Error type that captures billing operation failures.
///
/// Every public operation is all-or-nothing: when one of these is returned,
/// no registry has been mutated.
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Student not found: {0}")]
    StudentNotFound(Uuid),
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),
    #[error("Conflict: {0}")]
    Conflict(String),
}
