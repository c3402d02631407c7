//! Parcel tracking domain model.
//!
//! # Responsibility
//! - Define the data structures shared by repository, service and CLI layers.
//!
//! # Invariants
//! - Every stored parcel is identified by a storage-assigned `ParcelId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod parcel;
