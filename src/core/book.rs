//! The in-memory aggregate owning every registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Identifiable, Invoice, LedgerEntry, Payment, Student};

fn find_by_id<T: Identifiable>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

fn find_by_id_mut<T: Identifiable>(items: &mut [T], id: Uuid) -> Option<&mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

/// Owns the student, invoice, payment, and ledger-entry registries.
///
/// Registries are plain `Vec`s so iteration order is insertion order; payment
/// allocation depends on that. All mutation goes through the services in
/// [`crate::core::services`], never through ad-hoc field writes. The book is
/// single-threaded state: callers sharing it across threads must wrap it in a
/// `Mutex` so no two operations interleave their read-modify-write sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingBook {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub ledger_entries: Vec<LedgerEntry>,
    entry_seq: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BillingBook {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            students: Vec::new(),
            invoices: Vec::new(),
            payments: Vec::new(),
            ledger_entries: Vec::new(),
            entry_seq: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_student(&mut self, student: Student) -> Uuid {
        let id = student.id;
        self.students.push(student);
        self.touch();
        id
    }

    pub fn add_invoice(&mut self, invoice: Invoice) -> Uuid {
        let id = invoice.id;
        self.invoices.push(invoice);
        self.touch();
        id
    }

    pub fn add_payment(&mut self, payment: Payment) -> Uuid {
        let id = payment.id;
        self.payments.push(payment);
        self.touch();
        id
    }

    /// Appends a ledger entry, stamping it with the next insertion sequence.
    pub fn append_entry(&mut self, mut entry: LedgerEntry) -> Uuid {
        self.entry_seq += 1;
        entry.seq = self.entry_seq;
        let id = entry.id;
        self.ledger_entries.push(entry);
        self.touch();
        id
    }

    pub fn student(&self, id: Uuid) -> Option<&Student> {
        find_by_id(&self.students, id)
    }

    pub fn student_mut(&mut self, id: Uuid) -> Option<&mut Student> {
        find_by_id_mut(&mut self.students, id)
    }

    pub fn invoice(&self, id: Uuid) -> Option<&Invoice> {
        find_by_id(&self.invoices, id)
    }

    pub fn invoice_mut(&mut self, id: Uuid) -> Option<&mut Invoice> {
        find_by_id_mut(&mut self.invoices, id)
    }

    pub fn payment(&self, id: Uuid) -> Option<&Payment> {
        find_by_id(&self.payments, id)
    }

    pub fn payment_mut(&mut self, id: Uuid) -> Option<&mut Payment> {
        find_by_id_mut(&mut self.payments, id)
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    pub fn invoice_count(&self) -> usize {
        self.invoices.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
