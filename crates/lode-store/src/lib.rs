//! Content-addressed object storage for lode.
//!
//! This crate implements a hash-keyed object store in the manner of a
//! version-control storage layer: immutable objects identified by the SHA-1
//! hash of their encoded form, stored zlib-compressed on disk under a
//! hash-derived path.
//!
//! # Object Model
//!
//! - [`Blob`] -- raw content (file contents, arbitrary data)
//! - [`Tree`] -- directory listing of [`TreeEntry`] records
//! - [`Object`] -- the sum type over the constructible variants
//!
//! Every object's encoded form is `<type> <size>\0<payload>`; the encoded
//! bytes, not the raw payload, are what gets hashed, so identity is a
//! function of kind and content together.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`LooseObjectStore`] -- one compressed file per object on disk
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Identity is derived, never chosen: hash of the encoded bytes.
//! 3. Decode is all-or-nothing; no partially decoded object escapes.
//! 4. Concurrent reads are always safe (objects are immutable).
//! 5. All I/O errors are propagated, never silently ignored, and none of
//!    them terminate the process from inside the core.

pub mod codec;
pub mod encoding;
pub mod error;
pub mod loose;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use loose::LooseObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{Blob, EntryMode, Object, ObjectKind, Tree, TreeEntry, TreeFormat};
pub use traits::ObjectStore;

pub use lode_types::ObjectId;
