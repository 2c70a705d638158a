//! Checksum validation for fixed-format identifiers
//!
//! Pure functions mirroring the server-side check-digit arithmetic for the
//! portal's tax, duty and VAT reference formats, plus the generic Luhn
//! payment-card check. Compatible with both std and no_std environments.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod card;
pub mod identifier;

// Re-export all checksum predicates
pub use card::*;
pub use identifier::*;
