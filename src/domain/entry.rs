//! Signed ledger entries, the raw material of the statement projection.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One debit/credit line in a student's history.
///
/// `amount` is signed: positive increases what the student owes (charge),
/// negative decreases it (payment or credit). Running balances are never
/// stored here; they are derived by scanning a student's entries oldest to
/// newest. `seq` is a book-wide insertion counter that keeps same-day
/// entries in first-in-first-out order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub entry_type: EntryType,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_year: Option<String>,
    pub amount: f64,
    pub seq: u64,
}

impl LedgerEntry {
    pub fn new(
        student_id: Uuid,
        date: NaiveDate,
        entry_type: EntryType,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id,
            date,
            entry_type,
            description: description.into(),
            month_year: None,
            amount,
            seq: 0,
        }
    }

    pub fn with_month_year(mut self, month_year: impl Into<String>) -> Self {
        self.month_year = Some(month_year.into());
        self
    }
}

/// Classifies ledger activity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Fee,
    Expense,
    Payment,
    Adjustment,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryType::Fee => "Fee",
            EntryType::Expense => "Expense",
            EntryType::Payment => "Payment",
            EntryType::Adjustment => "Adjustment",
        };
        f.write_str(label)
    }
}
