use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// An audit record of money received from a student.
///
/// Allocation happens once, as a side effect of recording. Later edits or
/// deletion of the record do not roll the allocation back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub amount: f64,
    pub date: NaiveDate,
    pub mode: PaymentMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub kind: PaymentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        student_id: Uuid,
        amount: f64,
        date: NaiveDate,
        mode: PaymentMode,
        kind: PaymentKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id,
            amount,
            date,
            mode,
            reference: None,
            kind,
            notes: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

impl Identifiable for Payment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Payment {
    fn display_label(&self) -> String {
        format!("{} NPR via {}", self.amount, self.mode)
    }
}

/// How the money arrived. Non-cash modes require a reference string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    MobileWallet,
    BankTransfer,
    Cheque,
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::MobileWallet => "Mobile wallet",
            PaymentMode::BankTransfer => "Bank transfer",
            PaymentMode::Cheque => "Cheque",
        };
        f.write_str(label)
    }
}

/// Whether the amount settles open invoices or tops up the advance pool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Regular,
    Advance,
}
