//! Read-side projection: per-student statements with running balances.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::BillingBook;
use crate::domain::{EntryType, LedgerEntry, NamedEntity};
use crate::errors::BillingError;

use super::ServiceResult;

/// One statement line: a ledger entry plus the balance after it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementLine {
    pub entry: LedgerEntry,
    /// What the student owes after this entry, prefix-summed over signed
    /// amounts in chronological order.
    pub running_balance: f64,
}

/// A row of the `Date, Student, Description, Type, Month/Year, Debit,
/// Credit, Balance` export layout the admin panel has always produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub student: String,
    pub description: String,
    pub entry_type: EntryType,
    pub month_year: Option<String>,
    pub debit: Option<f64>,
    pub credit: Option<f64>,
    pub balance: f64,
}

/// Pure projections over the ledger entries, plus the one explicit append.
pub struct LedgerService;

impl LedgerService {
    /// Appends a manual adjustment entry. Positive amounts charge the
    /// student, negative amounts credit them.
    pub fn append_adjustment(
        book: &mut BillingBook,
        student_id: Uuid,
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
    ) -> ServiceResult<Uuid> {
        if amount == 0.0 {
            return Err(BillingError::Validation(
                "Adjustment amount must be non-zero".into(),
            ));
        }
        if book.student(student_id).is_none() {
            return Err(BillingError::StudentNotFound(student_id));
        }
        let entry_id = book.append_entry(LedgerEntry::new(
            student_id,
            date,
            EntryType::Adjustment,
            description,
            amount,
        ));
        tracing::info!(student = %student_id, entry = %entry_id, amount, "adjustment appended");
        Ok(entry_id)
    }

    /// A student's statement, oldest entry first, with running balances.
    ///
    /// Same-day entries keep their insertion order. This is a pure function
    /// of the registries: identical book state yields identical output.
    pub fn statement_for(
        book: &BillingBook,
        student_id: Uuid,
    ) -> ServiceResult<Vec<StatementLine>> {
        if book.student(student_id).is_none() {
            return Err(BillingError::StudentNotFound(student_id));
        }
        let mut entries: Vec<&LedgerEntry> = book
            .ledger_entries
            .iter()
            .filter(|entry| entry.student_id == student_id)
            .collect();
        entries.sort_by_key(|entry| (entry.date, entry.seq));

        let mut balance = 0.0;
        let lines = entries
            .into_iter()
            .map(|entry| {
                balance += entry.amount;
                StatementLine {
                    entry: entry.clone(),
                    running_balance: balance,
                }
            })
            .collect();
        Ok(lines)
    }

    /// Display order: most recent entry first. Balances are carried over
    /// from the chronological scan, not recomputed.
    pub fn recent_first(book: &BillingBook, student_id: Uuid) -> ServiceResult<Vec<StatementLine>> {
        let mut lines = Self::statement_for(book, student_id)?;
        lines.reverse();
        Ok(lines)
    }

    /// The export projection consumed by the presentation layer's CSV/HTML
    /// writer. Positive amounts land in the debit column, negative in
    /// credit.
    pub fn export_rows(book: &BillingBook, student_id: Uuid) -> ServiceResult<Vec<ExportRow>> {
        let student = book
            .student(student_id)
            .ok_or(BillingError::StudentNotFound(student_id))?;
        let rows = Self::statement_for(book, student_id)?
            .into_iter()
            .map(|line| {
                let amount = line.entry.amount;
                ExportRow {
                    date: line.entry.date,
                    student: student.name().to_owned(),
                    description: line.entry.description,
                    entry_type: line.entry.entry_type,
                    month_year: line.entry.month_year,
                    debit: (amount > 0.0).then_some(amount),
                    credit: (amount < 0.0).then_some(-amount),
                    balance: line.running_balance,
                }
            })
            .collect();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::StudentService;
    use crate::domain::NewStudent;

    fn book_with_student() -> (BillingBook, Uuid) {
        let mut book = BillingBook::new("Ledger");
        let id = StudentService::register(
            &mut book,
            NewStudent {
                name: "Esha".into(),
                room: "E-3".into(),
                phone: None,
                guardian_contact: None,
                fee_amount: 8500.0,
                advance_balance: 0.0,
                joined_on: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            },
        )
        .unwrap();
        (book, id)
    }

    #[test]
    fn adjustment_rejects_zero_amount() {
        let (mut book, student_id) = book_with_student();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let err = LedgerService::append_adjustment(&mut book, student_id, "Waiver", 0.0, date)
            .expect_err("zero adjustment must fail");
        assert!(matches!(err, BillingError::Validation(_)));
        assert!(book.ledger_entries.is_empty());
    }

    #[test]
    fn same_day_entries_keep_insertion_order() {
        let (mut book, student_id) = book_with_student();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        LedgerService::append_adjustment(&mut book, student_id, "Damage charge", 500.0, date)
            .unwrap();
        LedgerService::append_adjustment(&mut book, student_id, "Goodwill waiver", -200.0, date)
            .unwrap();

        let lines = LedgerService::statement_for(&book, student_id).unwrap();
        assert_eq!(lines[0].entry.description, "Damage charge");
        assert_eq!(lines[0].running_balance, 500.0);
        assert_eq!(lines[1].entry.description, "Goodwill waiver");
        assert_eq!(lines[1].running_balance, 300.0);
    }

    #[test]
    fn statement_fails_for_unknown_student() {
        let (book, _) = book_with_student();
        let err = LedgerService::statement_for(&book, Uuid::new_v4())
            .expect_err("unknown student must fail");
        assert!(matches!(err, BillingError::StudentNotFound(_)));
    }
}
