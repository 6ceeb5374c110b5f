//! Payment recording and the greedy allocation pass.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::BillingBook;
use crate::domain::{EntryType, LedgerEntry, Payment, PaymentKind, PaymentMode};
use crate::errors::BillingError;

use super::ServiceResult;

/// Input payload for recording a payment.
#[derive(Debug, Clone)]
pub struct RecordPayment {
    pub student_id: Uuid,
    pub amount: f64,
    pub date: NaiveDate,
    pub mode: PaymentMode,
    pub reference: Option<String>,
    pub kind: PaymentKind,
    pub notes: Option<String>,
}

/// Records payments and applies them to invoices or the advance pool.
pub struct PaymentService;

impl PaymentService {
    /// Records a payment, allocating it as a side effect.
    ///
    /// Advance payments top up the student's credit pool and touch no
    /// invoice. Regular payments are applied greedily across the student's
    /// open invoices in registry insertion order. Any amount left after the
    /// last open invoice is settled stays on the payment record but is not
    /// credited anywhere; the original system drops it the same way.
    pub fn record(book: &mut BillingBook, input: RecordPayment) -> ServiceResult<Uuid> {
        if input.amount <= 0.0 {
            return Err(BillingError::Validation(
                "Payment amount must be positive".into(),
            ));
        }
        if input.mode != PaymentMode::Cash
            && input
                .reference
                .as_deref()
                .map_or(true, |r| r.trim().is_empty())
        {
            return Err(BillingError::Validation(format!(
                "A reference is required for {} payments",
                input.mode
            )));
        }
        if book.student(input.student_id).is_none() {
            return Err(BillingError::StudentNotFound(input.student_id));
        }

        match input.kind {
            PaymentKind::Advance => {
                let student = book
                    .student_mut(input.student_id)
                    .ok_or(BillingError::StudentNotFound(input.student_id))?;
                student.advance_balance += input.amount;
                tracing::info!(
                    student = %input.student_id,
                    amount = input.amount,
                    advance_balance = student.advance_balance,
                    "advance payment recorded"
                );
            }
            PaymentKind::Regular => {
                let mut remaining = input.amount;
                for invoice in book
                    .invoices
                    .iter_mut()
                    .filter(|invoice| invoice.student_id == input.student_id)
                {
                    if remaining <= 0.0 {
                        break;
                    }
                    if !invoice.is_open() {
                        continue;
                    }
                    let applied = remaining.min(invoice.balance_amount);
                    invoice.paid_amount += applied;
                    invoice.balance_amount = invoice.total_amount - invoice.paid_amount;
                    invoice.refresh_status();
                    remaining -= applied;
                }
                if remaining > 0.0 {
                    tracing::warn!(
                        student = %input.student_id,
                        unallocated = remaining,
                        "payment exceeds outstanding balances; remainder not credited"
                    );
                }
            }
        }

        let mut payment = Payment::new(
            input.student_id,
            input.amount,
            input.date,
            input.mode,
            input.kind,
        );
        payment.reference = input.reference;
        payment.notes = input.notes;
        let payment_id = payment.id;
        book.append_entry(LedgerEntry::new(
            input.student_id,
            input.date,
            EntryType::Payment,
            format!("Payment received ({})", input.mode),
            -input.amount,
        ));
        book.add_payment(payment);
        tracing::info!(
            payment = %payment_id,
            student = %input.student_id,
            amount = input.amount,
            kind = ?input.kind,
            "payment recorded"
        );
        Ok(payment_id)
    }

    /// Edits the audit record only. The allocation the payment originally
    /// performed is not recomputed, so invoice and advance state keep their
    /// old values; the audit trail can drift from them.
    pub fn update<F>(book: &mut BillingBook, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Payment),
    {
        let payment = book
            .payment_mut(id)
            .ok_or(BillingError::PaymentNotFound(id))?;
        mutator(payment);
        book.touch();
        tracing::info!(payment = %id, "payment record updated; allocation untouched");
        Ok(())
    }

    /// Deletes the audit record without reversing its allocation effects.
    pub fn remove(book: &mut BillingBook, id: Uuid) -> ServiceResult<Payment> {
        let position = book
            .payments
            .iter()
            .position(|payment| payment.id == id)
            .ok_or(BillingError::PaymentNotFound(id))?;
        let removed = book.payments.remove(position);
        book.touch();
        tracing::info!(payment = %id, "payment record removed; allocation untouched");
        Ok(removed)
    }

    pub fn get(book: &BillingBook, id: Uuid) -> ServiceResult<&Payment> {
        book.payment(id).ok_or(BillingError::PaymentNotFound(id))
    }

    pub fn list(book: &BillingBook) -> Vec<&Payment> {
        book.payments.iter().collect()
    }

    pub fn list_for_student(book: &BillingBook, student_id: Uuid) -> Vec<&Payment> {
        book.payments
            .iter()
            .filter(|payment| payment.student_id == student_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::StudentService;
    use crate::domain::NewStudent;
    use chrono::NaiveDate;

    fn book_with_student() -> (BillingBook, Uuid) {
        let mut book = BillingBook::new("Payments");
        let id = StudentService::register(
            &mut book,
            NewStudent {
                name: "Dipesh".into(),
                room: "D-7".into(),
                phone: None,
                guardian_contact: None,
                fee_amount: 9000.0,
                advance_balance: 0.0,
                joined_on: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            },
        )
        .unwrap();
        (book, id)
    }

    fn payment(student_id: Uuid, amount: f64, kind: PaymentKind) -> RecordPayment {
        RecordPayment {
            student_id,
            amount,
            date: NaiveDate::from_ymd_opt(2024, 4, 20).unwrap(),
            mode: PaymentMode::Cash,
            reference: None,
            kind,
            notes: None,
        }
    }

    #[test]
    fn record_requires_reference_for_non_cash_modes() {
        let (mut book, student_id) = book_with_student();
        let mut input = payment(student_id, 500.0, PaymentKind::Regular);
        input.mode = PaymentMode::BankTransfer;
        let err =
            PaymentService::record(&mut book, input).expect_err("missing reference must fail");
        assert!(matches!(err, BillingError::Validation(_)));
        assert!(book.payments.is_empty());
        assert!(book.ledger_entries.is_empty());
    }

    #[test]
    fn record_rejects_unknown_student() {
        let (mut book, _) = book_with_student();
        let err = PaymentService::record(
            &mut book,
            payment(Uuid::new_v4(), 500.0, PaymentKind::Regular),
        )
        .expect_err("unknown student must fail");
        assert!(matches!(err, BillingError::StudentNotFound(_)));
        assert!(book.payments.is_empty());
    }

    #[test]
    fn remove_returns_deleted_payment_and_keeps_allocation() {
        let (mut book, student_id) = book_with_student();
        let id =
            PaymentService::record(&mut book, payment(student_id, 2000.0, PaymentKind::Advance))
                .unwrap();
        assert_eq!(book.student(student_id).unwrap().advance_balance, 2000.0);

        let removed = PaymentService::remove(&mut book, id).unwrap();
        assert_eq!(removed.amount, 2000.0);
        // Deleting the audit record leaves the advance pool untouched.
        assert_eq!(book.student(student_id).unwrap().advance_balance, 2000.0);
    }
}
