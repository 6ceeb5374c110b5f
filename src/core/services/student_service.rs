//! Business logic for the student roster.

use uuid::Uuid;

use crate::core::BillingBook;
use crate::domain::{Displayable, NewStudent, Student, StudentStatus};
use crate::errors::BillingError;

use super::ServiceResult;

/// Validated CRUD over the student registry.
pub struct StudentService;

impl StudentService {
    /// Registers a student and returns the assigned identifier.
    ///
    /// The `advance_balance` carried in here is the only direct write that
    /// field ever receives; afterwards it moves solely through payment
    /// recording and invoice creation.
    pub fn register(book: &mut BillingBook, new: NewStudent) -> ServiceResult<Uuid> {
        if new.name.trim().is_empty() {
            return Err(BillingError::Validation("Student name is required".into()));
        }
        if new.fee_amount < 0.0 {
            return Err(BillingError::Validation(
                "Fee amount must not be negative".into(),
            ));
        }
        if new.advance_balance < 0.0 {
            return Err(BillingError::Validation(
                "Advance balance must not be negative".into(),
            ));
        }
        Self::validate_roster_slot(book, None, &new.name, &new.room)?;

        let mut student = Student::new(new.name, new.room, new.fee_amount)
            .with_advance(new.advance_balance)
            .with_joined_on(new.joined_on);
        student.phone = new.phone;
        student.guardian_contact = new.guardian_contact;
        let label = student.display_label();
        let id = book.add_student(student);
        tracing::info!(student = %id, %label, "student registered");
        Ok(id)
    }

    /// Updates identity, contact, fee, and status fields.
    ///
    /// `advance_balance` is deliberately not copied from `changes`; only the
    /// billing operations may move it.
    pub fn update(book: &mut BillingBook, id: Uuid, changes: Student) -> ServiceResult<()> {
        if changes.fee_amount < 0.0 {
            return Err(BillingError::Validation(
                "Fee amount must not be negative".into(),
            ));
        }
        Self::validate_roster_slot(book, Some(id), &changes.name, &changes.room)?;
        let student = book
            .student_mut(id)
            .ok_or(BillingError::StudentNotFound(id))?;
        student.name = changes.name;
        student.room = changes.room;
        student.phone = changes.phone;
        student.guardian_contact = changes.guardian_contact;
        student.fee_amount = changes.fee_amount;
        student.status = changes.status;
        student.joined_on = changes.joined_on;
        book.touch();
        tracing::info!(student = %id, "student updated");
        Ok(())
    }

    /// Removes a student. Fails while the student still owns invoices.
    pub fn remove(book: &mut BillingBook, id: Uuid) -> ServiceResult<()> {
        if book.student(id).is_none() {
            return Err(BillingError::StudentNotFound(id));
        }
        if book
            .invoices
            .iter()
            .any(|invoice| invoice.student_id == id)
        {
            return Err(BillingError::Conflict(
                "Student has invoices on record".into(),
            ));
        }
        book.students.retain(|student| student.id != id);
        book.touch();
        tracing::info!(student = %id, "student removed");
        Ok(())
    }

    pub fn get(book: &BillingBook, id: Uuid) -> ServiceResult<&Student> {
        book.student(id).ok_or(BillingError::StudentNotFound(id))
    }

    pub fn list(book: &BillingBook) -> Vec<&Student> {
        book.students.iter().collect()
    }

    pub fn list_active(book: &BillingBook) -> Vec<&Student> {
        book.students
            .iter()
            .filter(|student| student.status == StudentStatus::Active)
            .collect()
    }

    /// Sum of open invoice balances, the figure shown beside each roster row.
    pub fn outstanding_total(book: &BillingBook, id: Uuid) -> ServiceResult<f64> {
        Self::get(book, id)?;
        Ok(book
            .invoices
            .iter()
            .filter(|invoice| invoice.student_id == id)
            .map(|invoice| invoice.balance_amount)
            .sum())
    }

    fn validate_roster_slot(
        book: &BillingBook,
        exclude: Option<Uuid>,
        name: &str,
        room: &str,
    ) -> ServiceResult<()> {
        let normalized = name.trim().to_ascii_lowercase();
        let duplicate = book.students.iter().any(|student| {
            let existing = student.name.trim().to_ascii_lowercase();
            existing == normalized
                && student.room == room
                && exclude.map_or(true, |id| student.id != id)
        });
        if duplicate {
            Err(BillingError::Validation(format!(
                "Student `{}` is already registered in room {}",
                name, room
            )))
        } else {
            Ok(())
        }
    }
}
