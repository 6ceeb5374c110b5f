//! Traits shared by every billed entity.

use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier. Registry
/// lookups in [`crate::core::BillingBook`] are generic over this.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for notifications and logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}
