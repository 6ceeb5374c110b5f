pub mod book;
pub mod services;

pub use book::BillingBook;
