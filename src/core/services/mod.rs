pub mod invoice_service;
pub mod ledger_service;
pub mod payment_service;
pub mod student_service;

pub use invoice_service::{CreateInvoice, InvoiceService};
pub use ledger_service::{ExportRow, LedgerService, StatementLine};
pub use payment_service::{PaymentService, RecordPayment};
pub use student_service::StudentService;

use crate::errors::BillingError;

pub type ServiceResult<T> = Result<T, BillingError>;
