//! Static fixture dataset loaded at process start.
//!
//! Everything goes through the public services so the seeded book satisfies
//! the same invariants as one built interactively.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::services::{
    CreateInvoice, InvoiceService, PaymentService, RecordPayment, StudentService,
};
use crate::core::BillingBook;
use crate::domain::{NewExpense, NewStudent, PaymentKind, PaymentMode};
use crate::errors::BillingError;

/// Builds the demo book the admin panel boots with.
pub fn demo_book() -> Result<BillingBook, BillingError> {
    let mut book = BillingBook::new("Everest Hostel");

    let aarav = register(
        &mut book,
        "Aarav Shrestha",
        "101",
        Some("9841000001"),
        9000.0,
        0.0,
        date(2024, 1, 5),
    )?;
    let binita = register(
        &mut book,
        "Binita Rai",
        "102",
        Some("9841000002"),
        8500.0,
        5000.0,
        date(2024, 1, 12),
    )?;
    let chirag = register(
        &mut book,
        "Chirag Thapa",
        "201",
        None,
        7500.0,
        0.0,
        date(2024, 2, 1),
    )?;

    // March invoices; Binita's is partly covered by her seeded advance.
    invoice(&mut book, aarav, "2024-03", 9000.0, date(2024, 3, 1))?;
    invoice(&mut book, binita, "2024-03", 8500.0, date(2024, 3, 1))?;
    invoice(&mut book, chirag, "2024-03", 7500.0, date(2024, 3, 1))?;

    // April invoices, one with an extra charge at issue time.
    invoice(&mut book, aarav, "2024-04", 9000.0, date(2024, 4, 1))?;
    InvoiceService::create(
        &mut book,
        CreateInvoice {
            student_id: chirag,
            month_year: "2024-04".into(),
            base_fee: 7500.0,
            extra_expenses: vec![NewExpense {
                description: "Laundry".into(),
                amount: 400.0,
                date: date(2024, 4, 1),
            }],
            issue_date: date(2024, 4, 1),
            due_date: Some(date(2024, 4, 10)),
        },
    )?;

    PaymentService::record(
        &mut book,
        RecordPayment {
            student_id: aarav,
            amount: 9000.0,
            date: date(2024, 3, 8),
            mode: PaymentMode::MobileWallet,
            reference: Some("ESW-44821".into()),
            kind: PaymentKind::Regular,
            notes: None,
        },
    )?;
    PaymentService::record(
        &mut book,
        RecordPayment {
            student_id: chirag,
            amount: 4000.0,
            date: date(2024, 3, 15),
            mode: PaymentMode::Cash,
            reference: None,
            kind: PaymentKind::Regular,
            notes: Some("Partial for March".into()),
        },
    )?;
    PaymentService::record(
        &mut book,
        RecordPayment {
            student_id: binita,
            amount: 6000.0,
            date: date(2024, 3, 20),
            mode: PaymentMode::BankTransfer,
            reference: Some("NIC-20240320-17".into()),
            kind: PaymentKind::Advance,
            notes: None,
        },
    )?;

    Ok(book)
}

fn register(
    book: &mut BillingBook,
    name: &str,
    room: &str,
    phone: Option<&str>,
    fee_amount: f64,
    advance_balance: f64,
    joined_on: NaiveDate,
) -> Result<Uuid, BillingError> {
    StudentService::register(
        book,
        NewStudent {
            name: name.into(),
            room: room.into(),
            phone: phone.map(Into::into),
            guardian_contact: None,
            fee_amount,
            advance_balance,
            joined_on,
        },
    )
}

fn invoice(
    book: &mut BillingBook,
    student_id: Uuid,
    month_year: &str,
    base_fee: f64,
    issue_date: NaiveDate,
) -> Result<Uuid, BillingError> {
    InvoiceService::create(
        book,
        CreateInvoice {
            student_id,
            month_year: month_year.into(),
            base_fee,
            extra_expenses: Vec::new(),
            issue_date,
            due_date: None,
        },
    )
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_book_seeds_cleanly() {
        let book = demo_book().expect("seed data must satisfy engine invariants");
        assert_eq!(book.student_count(), 3);
        assert_eq!(book.invoice_count(), 5);
        assert_eq!(book.payments.len(), 3);
        assert!(!book.ledger_entries.is_empty());
    }

    #[test]
    fn seeded_advances_stay_non_negative() {
        let book = demo_book().unwrap();
        assert!(book.students.iter().all(|s| s.advance_balance >= 0.0));
    }
}
