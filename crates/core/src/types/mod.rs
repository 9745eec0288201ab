//! Core types for Dona Oferta.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod format;
pub mod id;
pub mod phone;
pub mod plan;
pub mod postal_code;

pub use format::{DeliveryFormat, ExtractionMode};
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use plan::Plan;
pub use postal_code::{PostalCode, PostalCodeError};
