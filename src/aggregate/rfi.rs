//! RFI aggregate
//!
//! Maintains the append-only version history of one RFI. Every mutation
//! appends a new version snapshot; nothing is edited in place. The current
//! version is always the last element, exposed as a pure accessor rather
//! than a cached field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{derive_status, DomainError, Registration, RfiStatus, Version};

/// RFI aggregate root.
///
/// `seq` is an explicit per-aggregate sequence number compared-and-swapped
/// by the document store at write time, so concurrent writers cannot
/// silently lose updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfiAggregate {
    id: Uuid,

    created_at: DateTime<Utc>,

    /// Absent until publication; publishing twice is a domain error.
    published_at: Option<DateTime<Utc>>,

    /// Ordered, append-only; index 0 is earliest, last is current.
    /// Never empty once the aggregate exists.
    versions: Vec<Version>,

    /// At most one registration per vendor.
    registrations: Vec<Registration>,

    /// Optimistic concurrency token, bumped by the store on each write.
    seq: i64,
}

impl RfiAggregate {
    /// Create a new draft aggregate with its first version.
    pub fn new(id: Uuid, first_version: Version, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            published_at: None,
            versions: vec![first_version],
            registrations: Vec::new(),
            seq: 1,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn seq(&self) -> i64 {
        self.seq
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// The latest version. All default reads resolve through this; earlier
    /// versions remain addressable for audit.
    pub fn current_version(&self) -> &Version {
        // Invariant: versions is never empty, enforced by the constructor
        // and the append-only mutation contract.
        self.versions
            .last()
            .expect("RfiAggregate versions must never be empty")
    }

    /// Append a new version snapshot, making it current.
    pub fn append_version(&mut self, version: Version) {
        self.versions.push(version);
    }

    /// Transition from unpublished to published.
    pub fn publish(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.published_at.is_some() {
            return Err(DomainError::AlreadyPublished);
        }
        self.published_at = Some(now);
        Ok(())
    }

    /// Lifecycle status at `now`, derived from the current version.
    pub fn status(&self, now: DateTime<Utc>) -> RfiStatus {
        let current = self.current_version();
        derive_status(
            now,
            self.published_at,
            current.closing_at,
            current.grace_period_days,
        )
    }

    pub fn registration_for(&self, vendor: Uuid) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.vendor == vendor)
    }

    /// Add a vendor's registration; a vendor may register at most once.
    pub fn add_registration(&mut self, registration: Registration) -> Result<(), DomainError> {
        if self.registration_for(registration.vendor).is_some() {
            return Err(DomainError::DuplicateRegistration(registration.vendor));
        }
        self.registrations.push(registration);
        Ok(())
    }

    /// Replace a vendor's registration wholesale.
    pub fn replace_registration(&mut self, registration: Registration) -> Result<(), DomainError> {
        match self
            .registrations
            .iter_mut()
            .find(|r| r.vendor == registration.vendor)
        {
            Some(existing) => {
                *existing = registration;
                Ok(())
            }
            None => Err(DomainError::RegistrationNotFound(registration.vendor)),
        }
    }

    /// Remove a vendor's registration, returning it for notification.
    pub fn remove_registration(&mut self, vendor: Uuid) -> Result<Registration, DomainError> {
        let position = self
            .registrations
            .iter()
            .position(|r| r.vendor == vendor)
            .ok_or(DomainError::RegistrationNotFound(vendor))?;
        Ok(self.registrations.remove(position))
    }

    /// Remove every registration, returning them for notification. Used
    /// when a new version removes its discovery day.
    pub fn take_registrations(&mut self) -> Vec<Registration> {
        std::mem::take(&mut self.registrations)
    }

    pub(crate) fn bump_seq(&mut self) {
        self.seq += 1;
    }
}
