//! API Routes
//!
//! HTTP endpoint definitions.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::RfiAggregate;
use crate::directory::UserDirectory;
use crate::domain::{DomainError, OperationContext, RfiStatus, Version};
use crate::error::AppError;
use crate::handlers::{
    AttendeeParams, CancelRegistrationCommand, CreateRfiCommand, CreateRfiHandler, EditRfiCommand,
    EditRfiHandler, PublishRfiHandler, RegistrationCommand, RegistrationHandler, RfiFields,
};
use crate::notify::Dispatcher;
use crate::store::DocumentStore;

/// Shared application state threaded into every route.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub directory: Arc<dyn UserDirectory>,
    pub dispatcher: Dispatcher,
    pub ops_mailbox: String,
}

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct CreateRfiRequest {
    #[serde(flatten)]
    pub fields: RfiFields,
    #[serde(default)]
    pub addenda: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateRfiResponse {
    pub rfi_id: Uuid,
    pub status: RfiStatus,
}

#[derive(Debug, Deserialize)]
pub struct EditRfiRequest {
    #[serde(flatten)]
    pub fields: RfiFields,
    #[serde(default)]
    pub addenda: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EditRfiResponse {
    pub rfi_id: Uuid,
    pub version_count: usize,
    pub discovery_day_change: String,
}

#[derive(Debug, Serialize)]
pub struct PublishRfiResponse {
    pub rfi_id: Uuid,
    pub matched_vendors: usize,
}

#[derive(Debug, Deserialize)]
pub struct RegistrationRequest {
    pub vendor_id: Uuid,
    pub attendees: Vec<AttendeeParams>,
}

#[derive(Debug, Deserialize)]
pub struct EditRegistrationRequest {
    pub attendees: Vec<AttendeeParams>,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub rfi_id: Uuid,
    pub vendor_id: Uuid,
    pub attendee_count: usize,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryDayResponse {
    pub occurring_at: DateTime<Utc>,
    pub venue: String,
    pub remote_access: String,
}

#[derive(Debug, Serialize)]
pub struct AddendumResponse {
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AttendeeResponse {
    pub name: String,
    pub email: String,
    pub remote: bool,
}

#[derive(Debug, Serialize)]
pub struct RegistrationDetail {
    pub vendor_id: Uuid,
    pub attendees: Vec<AttendeeResponse>,
}

#[derive(Debug, Serialize)]
pub struct RfiSummaryResponse {
    pub rfi_id: Uuid,
    pub rfi_number: String,
    pub title: String,
    pub entity: String,
    pub status: RfiStatus,
    pub closing_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub version_count: usize,
}

#[derive(Debug, Serialize)]
pub struct RfiListResponse {
    pub rfis: Vec<RfiSummaryResponse>,
}

/// Full projection of an RFI's current version.
#[derive(Debug, Serialize)]
pub struct RfiDetailResponse {
    pub rfi_id: Uuid,
    pub status: RfiStatus,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub version_count: usize,

    pub rfi_number: String,
    pub title: String,
    pub entity: String,
    pub description: String,
    pub categories: Vec<String>,
    pub closing_at: DateTime<Utc>,
    pub grace_period_days: u32,
    pub discovery_day: Option<DiscoveryDayResponse>,
    pub addenda: Vec<AddendumResponse>,
    pub attachments: Vec<Uuid>,
    pub buyer_contact: Uuid,
    pub program_staff_contact: Uuid,

    pub registrations: Vec<RegistrationDetail>,
}

fn version_projection(version: &Version) -> (Vec<String>, Option<DiscoveryDayResponse>) {
    let categories = version
        .categories
        .iter()
        .map(|c| c.as_str().to_string())
        .collect();
    let discovery_day = version.discovery_day.as_ref().map(|d| DiscoveryDayResponse {
        occurring_at: d.occurring_at,
        venue: d.venue.clone(),
        remote_access: d.remote_access.clone(),
    });
    (categories, discovery_day)
}

fn summary_of(rfi: &RfiAggregate, now: DateTime<Utc>) -> RfiSummaryResponse {
    let current = rfi.current_version();
    RfiSummaryResponse {
        rfi_id: rfi.id(),
        rfi_number: current.rfi_number.clone(),
        title: current.title.clone(),
        entity: current.entity.clone(),
        status: rfi.status(now),
        closing_at: current.closing_at,
        published_at: rfi.published_at(),
        version_count: rfi.versions().len(),
    }
}

fn detail_of(rfi: &RfiAggregate, now: DateTime<Utc>) -> RfiDetailResponse {
    let current = rfi.current_version();
    let (categories, discovery_day) = version_projection(current);

    RfiDetailResponse {
        rfi_id: rfi.id(),
        status: rfi.status(now),
        created_at: rfi.created_at(),
        published_at: rfi.published_at(),
        version_count: rfi.versions().len(),
        rfi_number: current.rfi_number.clone(),
        title: current.title.clone(),
        entity: current.entity.clone(),
        description: current.description.clone(),
        categories,
        closing_at: current.closing_at,
        grace_period_days: current.grace_period_days,
        discovery_day,
        addenda: current
            .addenda
            .iter()
            .map(|a| AddendumResponse {
                description: a.description.clone(),
                created_at: a.created_at,
                updated_at: a.updated_at,
            })
            .collect(),
        attachments: current.attachments.clone(),
        buyer_contact: current.buyer_contact,
        program_staff_contact: current.program_staff_contact,
        registrations: rfi
            .registrations()
            .iter()
            .map(|r| RegistrationDetail {
                vendor_id: r.vendor,
                attendees: r
                    .attendees
                    .iter()
                    .map(|a| AttendeeResponse {
                        name: a.name.clone(),
                        email: a.email.clone(),
                        remote: a.remote,
                    })
                    .collect(),
            })
            .collect(),
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/rfis", post(create_rfi).get(list_rfis))
        .route("/rfis/:rfi_id", get(get_rfi))
        .route("/rfis/:rfi_id/versions", post(edit_rfi))
        .route("/rfis/:rfi_id/publish", post(publish_rfi))
        .route("/rfis/:rfi_id/registrations", post(create_registration))
        .route(
            "/rfis/:rfi_id/registrations/:vendor_id",
            put(edit_registration).delete(cancel_registration),
        )
}

// =========================================================================
// POST /rfis
// =========================================================================

/// Create a new RFI draft
async fn create_rfi(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<CreateRfiRequest>,
) -> Result<(StatusCode, Json<CreateRfiResponse>), AppError> {
    let handler = CreateRfiHandler::new(state.store.clone(), state.directory.clone());

    let result = handler
        .execute(
            CreateRfiCommand {
                fields: request.fields,
                addenda: request.addenda,
            },
            &context,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRfiResponse {
            rfi_id: result.rfi_id,
            status: result.status,
        }),
    ))
}

// =========================================================================
// GET /rfis
// =========================================================================

/// List all RFIs, oldest first
async fn list_rfis(State(state): State<AppState>) -> Result<Json<RfiListResponse>, AppError> {
    let now = Utc::now();
    let rfis = state.store.list().await?;

    Ok(Json(RfiListResponse {
        rfis: rfis.iter().map(|rfi| summary_of(rfi, now)).collect(),
    }))
}

// =========================================================================
// GET /rfis/:rfi_id
// =========================================================================

/// Get an RFI's current version with derived status
async fn get_rfi(
    State(state): State<AppState>,
    Path(rfi_id): Path<Uuid>,
) -> Result<Json<RfiDetailResponse>, AppError> {
    let rfi = state
        .store
        .find_by_id(rfi_id)
        .await?
        .ok_or(DomainError::RfiNotFound(rfi_id))?;

    Ok(Json(detail_of(&rfi, Utc::now())))
}

// =========================================================================
// POST /rfis/:rfi_id/versions
// =========================================================================

/// Append a new version to an RFI
async fn edit_rfi(
    State(state): State<AppState>,
    Path(rfi_id): Path<Uuid>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<EditRfiRequest>,
) -> Result<Json<EditRfiResponse>, AppError> {
    let handler = EditRfiHandler::new(
        state.store.clone(),
        state.directory.clone(),
        state.dispatcher.clone(),
    );

    let result = handler
        .execute(
            EditRfiCommand {
                rfi_id,
                fields: request.fields,
                addenda: request.addenda,
            },
            &context,
        )
        .await?;

    Ok(Json(EditRfiResponse {
        rfi_id: result.rfi_id,
        version_count: result.version_count,
        discovery_day_change: result.discovery_day_change.to_string(),
    }))
}

// =========================================================================
// POST /rfis/:rfi_id/publish
// =========================================================================

/// Publish an RFI exactly once
async fn publish_rfi(
    State(state): State<AppState>,
    Path(rfi_id): Path<Uuid>,
    Extension(context): Extension<OperationContext>,
) -> Result<Json<PublishRfiResponse>, AppError> {
    let handler = PublishRfiHandler::new(
        state.store.clone(),
        state.directory.clone(),
        state.dispatcher.clone(),
    );

    let result = handler.execute(rfi_id, &context).await?;

    Ok(Json(PublishRfiResponse {
        rfi_id: result.rfi_id,
        matched_vendors: result.matched_vendors,
    }))
}

// =========================================================================
// POST /rfis/:rfi_id/registrations
// =========================================================================

/// Register a vendor's attendees for the discovery day
async fn create_registration(
    State(state): State<AppState>,
    Path(rfi_id): Path<Uuid>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), AppError> {
    let handler = registration_handler(&state);

    let result = handler
        .register(
            RegistrationCommand {
                rfi_id,
                vendor_id: request.vendor_id,
                attendees: request.attendees,
            },
            &context,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            rfi_id: result.rfi_id,
            vendor_id: result.vendor_id,
            attendee_count: result.attendee_count,
        }),
    ))
}

// =========================================================================
// PUT /rfis/:rfi_id/registrations/:vendor_id
// =========================================================================

/// Replace a vendor's registration
async fn edit_registration(
    State(state): State<AppState>,
    Path((rfi_id, vendor_id)): Path<(Uuid, Uuid)>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<EditRegistrationRequest>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let handler = registration_handler(&state);

    let result = handler
        .edit(
            RegistrationCommand {
                rfi_id,
                vendor_id,
                attendees: request.attendees,
            },
            &context,
        )
        .await?;

    Ok(Json(RegistrationResponse {
        rfi_id: result.rfi_id,
        vendor_id: result.vendor_id,
        attendee_count: result.attendee_count,
    }))
}

// =========================================================================
// DELETE /rfis/:rfi_id/registrations/:vendor_id
// =========================================================================

/// Cancel a vendor's registration
async fn cancel_registration(
    State(state): State<AppState>,
    Path((rfi_id, vendor_id)): Path<(Uuid, Uuid)>,
    Extension(context): Extension<OperationContext>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let handler = registration_handler(&state);

    let result = handler
        .cancel(CancelRegistrationCommand { rfi_id, vendor_id }, &context)
        .await?;

    Ok(Json(RegistrationResponse {
        rfi_id: result.rfi_id,
        vendor_id: result.vendor_id,
        attendee_count: result.attendee_count,
    }))
}

fn registration_handler(state: &AppState) -> RegistrationHandler {
    RegistrationHandler::new(
        state.store.clone(),
        state.directory.clone(),
        state.dispatcher.clone(),
        state.ops_mailbox.clone(),
    )
}
