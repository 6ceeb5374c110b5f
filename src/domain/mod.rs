pub mod common;
pub mod entry;
pub mod invoice;
pub mod payment;
pub mod student;

pub use common::{Displayable, Identifiable, NamedEntity};
pub use entry::{EntryType, LedgerEntry};
pub use invoice::{ExtraExpense, Invoice, InvoiceStatus, NewExpense};
pub use payment::{Payment, PaymentKind, PaymentMode};
pub use student::{NewStudent, Student, StudentStatus};
