//! Domain types representing hostel residents.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// A resident tracked by the billing engine.
///
/// `advance_balance` is a non-negative credit pool. After registration it is
/// mutated only by payment recording and invoice creation, never edited
/// directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub room: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian_contact: Option<String>,
    /// Recurring monthly charge in NPR.
    pub fee_amount: f64,
    /// Credit pool in NPR, consumable against future invoices.
    pub advance_balance: f64,
    pub status: StudentStatus,
    pub joined_on: NaiveDate,
}

impl Student {
    pub fn new(name: impl Into<String>, room: impl Into<String>, fee_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            room: room.into(),
            phone: None,
            guardian_contact: None,
            fee_amount,
            advance_balance: 0.0,
            status: StudentStatus::Active,
            joined_on: chrono::Utc::now().date_naive(),
        }
    }

    pub fn with_advance(mut self, advance_balance: f64) -> Self {
        self.advance_balance = advance_balance;
        self
    }

    pub fn with_joined_on(mut self, joined_on: NaiveDate) -> Self {
        self.joined_on = joined_on;
        self
    }
}

impl Identifiable for Student {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Student {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Student {
    fn display_label(&self) -> String {
        format!("{} (room {})", self.name, self.room)
    }
}

/// Input payload for registering a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub room: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub guardian_contact: Option<String>,
    pub fee_amount: f64,
    /// Seed credit carried in at registration time.
    #[serde(default)]
    pub advance_balance: f64,
    pub joined_on: NaiveDate,
}

/// Enrollment states for a resident.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StudentStatus {
    Active,
    Inactive,
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StudentStatus::Active => "Active",
            StudentStatus::Inactive => "Inactive",
        };
        f.write_str(label)
    }
}
