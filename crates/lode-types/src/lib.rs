//! Foundation types for lode.
//!
//! This crate provides the content-addressed identifier type used throughout
//! the lode object store. Every other lode crate depends on `lode-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Content-addressed identifier (160-bit SHA-1 digest)
//! - [`TypeError`] — Identifier parsing failures

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::ObjectId;
