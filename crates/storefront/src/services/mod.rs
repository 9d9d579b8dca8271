//! Business logic services.

pub mod checkout;
pub mod pricing;
