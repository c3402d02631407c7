//! Repository layer for parcel persistence.
//!
//! # Responsibility
//! - Define the data access contract used by services and callers.
//! - Isolate SQLite query details from orchestration code.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `InvalidData`) in
//!   addition to DB transport errors.

pub mod parcel_repo;
