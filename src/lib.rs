#![doc(test(attr(deny(warnings))))]

//! Hostel Ledger offers the billing primitives behind a hostel admin panel:
//! student roster, invoicing with advance-credit consumption, payment
//! allocation, and a derived per-student ledger statement.

pub mod core;
pub mod domain;
pub mod errors;
pub mod seed;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Hostel Ledger tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
