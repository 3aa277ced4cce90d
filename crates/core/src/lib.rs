//! `aurum-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the vault crates
//! (identifiers, value-object marker, domain error). No infrastructure concerns.

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{TransactionId, UserId, VaultStateId};
pub use value_object::ValueObject;
