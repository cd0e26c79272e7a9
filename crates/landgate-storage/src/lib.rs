//! LandGate registry storage abstractions.
//!
//! This crate defines the storage contract the verification engine is
//! written against:
//! - claim records and their derived verification fields
//! - point-in-time boundary snapshots for conflict scans
//! - spatial conflict records and their resolution lifecycle
//! - append-only, hash-linked audit events
//! - the grantor directory used for identity matching
//!
//! Design stance:
//! - The relational registry remains the transactional source of truth.
//! - Components depend on the traits here, never on a concrete backend.
//! - `InMemoryRegistry` is the deterministic reference adapter used in
//!   tests and local development.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod error;
pub mod memory;
mod model;
mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::InMemoryRegistry;
pub use model::{AuditAppend, AuditRecord, BoundaryRecord, GrantorRecord};
pub use traits::{
    AuditStore, BoundaryStore, ClaimStore, ConflictStore, GrantorDirectory, QueryWindow,
    RegistryStorage,
};
