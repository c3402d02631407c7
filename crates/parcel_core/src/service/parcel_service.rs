//! Parcel use-case service.
//!
//! # Responsibility
//! - Provide parcel entry points for CLI and embedding callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass the repository contract.
//! - Status changes are passed through without transition checks.

use crate::model::parcel::{ClientId, Parcel, ParcelId, ParcelStatus};
use crate::repo::parcel_repo::{ParcelRepository, RepoResult};

/// Use-case wrapper over a parcel repository.
pub struct ParcelService<R: ParcelRepository> {
    repo: R,
}

impl<R: ParcelRepository> ParcelService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new parcel for `client` stamped with the current time.
    ///
    /// # Contract
    /// - Status is `ParcelStatus::Registered`.
    /// - Returns the stored parcel with its assigned number.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> RepoResult<Parcel> {
        let mut parcel = Parcel::new(client, address);
        parcel.number = self.repo.add(&parcel)?;
        Ok(parcel)
    }

    pub fn add(&self, parcel: &Parcel) -> RepoResult<ParcelId> {
        self.repo.add(parcel)
    }

    pub fn get(&self, id: ParcelId) -> RepoResult<Parcel> {
        self.repo.get(id)
    }

    pub fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        self.repo.get_by_client(client)
    }

    pub fn set_address(&self, id: ParcelId, address: &str) -> RepoResult<()> {
        self.repo.set_address(id, address)
    }

    pub fn set_status(&self, id: ParcelId, status: ParcelStatus) -> RepoResult<()> {
        self.repo.set_status(id, status)
    }

    pub fn delete(&self, id: ParcelId) -> RepoResult<()> {
        self.repo.delete(id)
    }
}
