//! Invoice types and their derived paid/unpaid lifecycle.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// A billing document for one student and one period.
///
/// `total_amount`, `paid_amount`, `balance_amount`, and `status` are derived
/// fields. They are recomputed by the mutation paths in the services and must
/// never be set independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: Uuid,
    pub student_id: Uuid,
    /// Period key, e.g. "2024-04".
    pub month_year: String,
    /// Snapshot of the student's fee at issue time.
    pub base_fee: f64,
    #[serde(default)]
    pub extra_expenses: Vec<ExtraExpense>,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub balance_amount: f64,
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl Invoice {
    pub fn new(
        student_id: Uuid,
        month_year: impl Into<String>,
        base_fee: f64,
        issue_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id,
            month_year: month_year.into(),
            base_fee,
            extra_expenses: Vec::new(),
            total_amount: base_fee,
            paid_amount: 0.0,
            balance_amount: base_fee,
            status: InvoiceStatus::Unpaid,
            issue_date,
            due_date: None,
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Recomputes `status` from the current paid/total amounts.
    pub fn refresh_status(&mut self) {
        self.status = if self.balance_amount <= 0.0 {
            InvoiceStatus::Paid
        } else if self.paid_amount > 0.0 {
            InvoiceStatus::PartiallyPaid
        } else {
            InvoiceStatus::Unpaid
        };
    }

    /// Whether payment can still be applied to this invoice.
    pub fn is_open(&self) -> bool {
        self.balance_amount > 0.0
    }

    /// Temporal flag layered on top of the paid/unpaid axis. Never applies
    /// to settled invoices.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && self.balance_amount > 0.0,
            None => false,
        }
    }
}

impl Identifiable for Invoice {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Invoice {
    fn display_label(&self) -> String {
        format!("{} ({})", self.month_year, self.status)
    }
}

/// An ad-hoc charge appended to an invoice after issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtraExpense {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
}

impl ExtraExpense {
    pub fn new(description: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            date,
        }
    }
}

/// Input payload for appending an extra expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
}

/// Derived paid/unpaid states. `paid_amount` only ever grows toward
/// `total_amount`, so invoices move `Unpaid → PartiallyPaid → Paid`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvoiceStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvoiceStatus::Unpaid => "Unpaid",
            InvoiceStatus::PartiallyPaid => "Partially paid",
            InvoiceStatus::Paid => "Paid",
        };
        f.write_str(label)
    }
}
