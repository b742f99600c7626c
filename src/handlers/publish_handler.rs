//! Publish handler
//!
//! Transitions an RFI from unpublished to published exactly once, then
//! fans out to vendors whose interests intersect the RFI's categories.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::directory::UserDirectory;
use crate::domain::{match_vendors, DomainError, OperationContext, VendorMatch};
use crate::error::AppError;
use crate::notify::{publish_intents, Dispatcher};
use crate::store::DocumentStore;

use super::commands::PublishRfiResult;

/// Handler for publishing an RFI
pub struct PublishRfiHandler {
    store: Arc<dyn DocumentStore>,
    directory: Arc<dyn UserDirectory>,
    dispatcher: Dispatcher,
}

impl PublishRfiHandler {
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
        rfi_id: Uuid,
        context: &OperationContext,
    ) -> Result<PublishRfiResult, AppError> {
        let acting_user = context
            .acting_user
            .ok_or_else(|| AppError::MissingHeader("X-Request-User-Id".to_string()))?;
        let now = Utc::now();

        let mut rfi = self
            .store
            .find_by_id(rfi_id)
            .await?
            .ok_or(DomainError::RfiNotFound(rfi_id))?;

        // Publishing twice is a domain error; nothing is written and the
        // original publication timestamp stands.
        rfi.publish(now)?;
        self.store.update(&rfi).await?;

        tracing::info!(rfi_id = %rfi.id(), acting_user = %acting_user, "RFI published");

        // Mutation is durable; matching failures from here on are logged
        // and swallowed.
        let current = rfi.current_version();
        let matches: Vec<VendorMatch> = match self
            .directory
            .find_vendors_by_categories(&current.categories)
            .await
        {
            Ok(vendors) => match_vendors(&current.categories, &vendors),
            Err(e) => {
                tracing::error!(
                    rfi_id = %rfi.id(),
                    error = %e,
                    "Vendor lookup failed during publish fan-out"
                );
                Vec::new()
            }
        };

        self.dispatcher.dispatch(publish_intents(current, &matches));

        Ok(PublishRfiResult {
            rfi_id: rfi.id(),
            matched_vendors: matches.len(),
        })
    }
}
