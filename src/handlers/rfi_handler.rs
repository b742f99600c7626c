//! RFI create and edit handlers
//!
//! Edit is the heart of the system: it appends a complete new version,
//! reconciles addenda positionally, classifies the discovery day change,
//! and fans out notifications to affected registrations after the mutation
//! has durably succeeded.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::aggregate::RfiAggregate;
use crate::directory::UserDirectory;
use crate::domain::{classify, reconcile, DiscoveryDayChange, DomainError, OperationContext};
use crate::error::AppError;
use crate::notify::{session_change_intents, Dispatcher, NotificationIntent};
use crate::store::DocumentStore;

use super::commands::{CreateRfiCommand, CreateRfiResult, EditRfiCommand, EditRfiResult};
use super::validate::build_version;

/// Handler for creating a new RFI draft
pub struct CreateRfiHandler {
    store: Arc<dyn DocumentStore>,
    directory: Arc<dyn UserDirectory>,
}

impl CreateRfiHandler {
    pub fn new(store: Arc<dyn DocumentStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { store, directory }
    }

    pub async fn execute(
        &self,
        command: CreateRfiCommand,
        context: &OperationContext,
    ) -> Result<CreateRfiResult, AppError> {
        let created_by = context
            .acting_user
            .ok_or_else(|| AppError::MissingHeader("X-Request-User-Id".to_string()))?;
        let now = Utc::now();

        let addenda = reconcile(&[], &command.addenda, now);
        let version = build_version(
            &command.fields,
            created_by,
            now,
            true,
            addenda,
            self.directory.as_ref(),
        )
        .await?;

        let rfi = RfiAggregate::new(Uuid::new_v4(), version, now);
        self.store.insert(&rfi).await?;

        tracing::info!(rfi_id = %rfi.id(), created_by = %created_by, "RFI created");

        Ok(CreateRfiResult {
            rfi_id: rfi.id(),
            status: rfi.status(now),
        })
    }
}

/// Handler for appending a new version to an RFI
pub struct EditRfiHandler {
    store: Arc<dyn DocumentStore>,
    directory: Arc<dyn UserDirectory>,
    dispatcher: Dispatcher,
}

impl EditRfiHandler {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        directory: Arc<dyn UserDirectory>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            store,
            directory,
            dispatcher,
        }
    }

    pub async fn execute(
        &self,
        command: EditRfiCommand,
        context: &OperationContext,
    ) -> Result<EditRfiResult, AppError> {
        let created_by = context
            .acting_user
            .ok_or_else(|| AppError::MissingHeader("X-Request-User-Id".to_string()))?;
        let now = Utc::now();

        let mut rfi = self
            .store
            .find_by_id(command.rfi_id)
            .await?
            .ok_or(DomainError::RfiNotFound(command.rfi_id))?;

        let (current_addenda, old_discovery_day) = {
            let current = rfi.current_version();
            (current.addenda.clone(), current.discovery_day.clone())
        };

        let addenda = reconcile(&current_addenda, &command.addenda, now);
        let version = build_version(
            &command.fields,
            created_by,
            now,
            false,
            addenda,
            self.directory.as_ref(),
        )
        .await?;

        let change = classify(old_discovery_day.as_ref(), version.discovery_day.as_ref());
        rfi.append_version(version);

        // A removed session also removes every registration; the taken
        // list still drives the cancellation notices below.
        let affected = if change == DiscoveryDayChange::Removed {
            rfi.take_registrations()
        } else {
            rfi.registrations().to_vec()
        };

        self.store.update(&rfi).await?;

        tracing::info!(
            rfi_id = %rfi.id(),
            version_count = rfi.versions().len(),
            change = %change,
            "RFI version appended"
        );

        // The mutation is durable at this point. Everything below is
        // fire-and-forget fan-out; lookup failures are logged, never
        // surfaced.
        if change != DiscoveryDayChange::Unchanged {
            let current = rfi.current_version();
            let mut intents: Vec<NotificationIntent> = Vec::new();
            for registration in &affected {
                match self.directory.find_user_by_id(registration.vendor).await {
                    Ok(Some(vendor)) => {
                        intents.extend(session_change_intents(
                            current,
                            change,
                            registration,
                            &vendor,
                        ));
                    }
                    Ok(None) => {
                        tracing::warn!(
                            vendor = %registration.vendor,
                            "Vendor profile missing; skipping session change notice"
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            vendor = %registration.vendor,
                            error = %e,
                            "Vendor lookup failed during session change fan-out"
                        );
                    }
                }
            }
            self.dispatcher.dispatch(intents);
        }

        Ok(EditRfiResult {
            rfi_id: rfi.id(),
            version_count: rfi.versions().len(),
            discovery_day_change: change,
        })
    }
}
