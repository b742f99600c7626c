//! Discovery day registration handlers
//!
//! Create, replace, and cancel a vendor's registration. Registrations are
//! not versioned: edits replace the attendee list wholesale.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::directory::UserDirectory;
use crate::domain::{
    Attendee, DomainError, OperationContext, Registration, UserKind, UserProfile,
    ValidationErrors, Version,
};
use crate::error::AppError;
use crate::notify::{registration_intents, Dispatcher, RegistrationAction};
use crate::store::DocumentStore;

use super::commands::{
    AttendeeParams, CancelRegistrationCommand, RegistrationCommand, RegistrationResult,
};

/// Handler for discovery day registrations
pub struct RegistrationHandler {
    store: Arc<dyn DocumentStore>,
    directory: Arc<dyn UserDirectory>,
    dispatcher: Dispatcher,
    ops_mailbox: String,
}

impl RegistrationHandler {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        directory: Arc<dyn UserDirectory>,
        dispatcher: Dispatcher,
        ops_mailbox: String,
    ) -> Self {
        Self {
            store,
            directory,
            dispatcher,
            ops_mailbox,
        }
    }

    /// Register a vendor's attendees for the discovery day.
    pub async fn register(
        &self,
        command: RegistrationCommand,
        context: &OperationContext,
    ) -> Result<RegistrationResult, AppError> {
        let vendor = self.owning_vendor(command.vendor_id, context).await?;
        let attendees = validate_attendees(&command.attendees)?;
        let now = Utc::now();

        let mut rfi = self.load(command.rfi_id).await?;
        check_session_open(rfi.current_version(), now)?;

        let registration = Registration {
            vendor: vendor.id,
            attendees,
        };
        rfi.add_registration(registration.clone())?;
        self.store.update(&rfi).await?;

        tracing::info!(
            rfi_id = %rfi.id(),
            vendor = %vendor.id,
            attendees = registration.attendees.len(),
            "Discovery day registration created"
        );

        self.dispatcher.dispatch(registration_intents(
            RegistrationAction::Created,
            &self.ops_mailbox,
            rfi.current_version(),
            &vendor,
            &registration,
        ));

        Ok(RegistrationResult {
            rfi_id: rfi.id(),
            vendor_id: vendor.id,
            attendee_count: registration.attendees.len(),
        })
    }

    /// Replace a vendor's registration wholesale.
    pub async fn edit(
        &self,
        command: RegistrationCommand,
        context: &OperationContext,
    ) -> Result<RegistrationResult, AppError> {
        let vendor = self.owning_vendor(command.vendor_id, context).await?;
        let attendees = validate_attendees(&command.attendees)?;
        let now = Utc::now();

        let mut rfi = self.load(command.rfi_id).await?;
        check_session_open(rfi.current_version(), now)?;

        let registration = Registration {
            vendor: vendor.id,
            attendees,
        };
        rfi.replace_registration(registration.clone())?;
        self.store.update(&rfi).await?;

        tracing::info!(
            rfi_id = %rfi.id(),
            vendor = %vendor.id,
            "Discovery day registration updated"
        );

        self.dispatcher.dispatch(registration_intents(
            RegistrationAction::Edited,
            &self.ops_mailbox,
            rfi.current_version(),
            &vendor,
            &registration,
        ));

        Ok(RegistrationResult {
            rfi_id: rfi.id(),
            vendor_id: vendor.id,
            attendee_count: registration.attendees.len(),
        })
    }

    /// Cancel a vendor's registration. Allowed even after the session has
    /// occurred; there is nothing left to protect.
    pub async fn cancel(
        &self,
        command: CancelRegistrationCommand,
        context: &OperationContext,
    ) -> Result<RegistrationResult, AppError> {
        let vendor = self.owning_vendor(command.vendor_id, context).await?;

        let mut rfi = self.load(command.rfi_id).await?;
        let registration = rfi.remove_registration(vendor.id)?;
        self.store.update(&rfi).await?;

        tracing::info!(
            rfi_id = %rfi.id(),
            vendor = %vendor.id,
            "Discovery day registration cancelled"
        );

        self.dispatcher.dispatch(registration_intents(
            RegistrationAction::Cancelled,
            &self.ops_mailbox,
            rfi.current_version(),
            &vendor,
            &registration,
        ));

        Ok(RegistrationResult {
            rfi_id: rfi.id(),
            vendor_id: vendor.id,
            attendee_count: registration.attendees.len(),
        })
    }

    async fn load(&self, rfi_id: Uuid) -> Result<crate::aggregate::RfiAggregate, AppError> {
        self.store
            .find_by_id(rfi_id)
            .await?
            .ok_or_else(|| DomainError::RfiNotFound(rfi_id).into())
    }

    /// Resolve the vendor profile and check the caller owns it.
    async fn owning_vendor(
        &self,
        vendor_id: Uuid,
        context: &OperationContext,
    ) -> Result<UserProfile, AppError> {
        let acting_user = context
            .acting_user
            .ok_or_else(|| AppError::MissingHeader("X-Request-User-Id".to_string()))?;
        if acting_user != vendor_id {
            return Err(AppError::Forbidden(
                "registrations may only be managed by the owning vendor".to_string(),
            ));
        }

        let profile = self
            .directory
            .find_user_by_id(vendor_id)
            .await?
            .ok_or(DomainError::UserNotFound(vendor_id))?;

        if profile.kind != UserKind::Vendor {
            return Err(AppError::Forbidden(
                "only vendors may register for a discovery day".to_string(),
            ));
        }

        Ok(profile)
    }
}

fn validate_attendees(params: &[AttendeeParams]) -> Result<Vec<Attendee>, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if params.is_empty() {
        errors.add("attendees", "must contain at least one attendee");
    }
    for (i, attendee) in params.iter().enumerate() {
        if attendee.name.trim().is_empty() {
            errors.add(format!("attendees[{}].name", i), "must not be empty");
        }
        if attendee.email.trim().is_empty() || !attendee.email.contains('@') {
            errors.add(
                format!("attendees[{}].email", i),
                "must be a valid email address",
            );
        }
    }

    errors.into_result()?;

    Ok(params
        .iter()
        .map(|a| Attendee {
            name: a.name.trim().to_string(),
            email: a.email.trim().to_string(),
            remote: a.remote,
        })
        .collect())
}

/// Registration requires a session that has not yet occurred.
fn check_session_open(version: &Version, now: DateTime<Utc>) -> Result<(), DomainError> {
    let day = version
        .discovery_day
        .as_ref()
        .ok_or(DomainError::NoDiscoveryDay)?;
    if now >= day.occurring_at {
        return Err(DomainError::RegistrationClosed {
            occurring_at: day.occurring_at,
        });
    }
    Ok(())
}
