//! Core types for Clover Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod status;
pub mod tracking;

pub use email::{Email, EmailError};
pub use id::*;
pub use status::{OrderStatus, PaymentStatus};
pub use tracking::TrackingId;
