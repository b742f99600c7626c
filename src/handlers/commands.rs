//! Command definitions
//!
//! Commands represent intentions to change the system state. Date, time,
//! and category fields arrive as strings and are validated into domain
//! types before any mutation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DiscoveryDayChange, RfiStatus};

/// Proposed discovery day session, pre-validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryDayParams {
    /// Session date, YYYY-MM-DD
    pub date: String,
    /// Session time, HH:MM (UTC)
    pub time: String,
    pub venue: String,
    #[serde(default)]
    pub remote_access: String,
}

/// Editable RFI content shared by create and edit commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfiFields {
    pub rfi_number: String,
    pub title: String,
    pub entity: String,
    pub description: String,

    /// Controlled-vocabulary values; order drives vendor matching
    pub categories: Vec<String>,

    /// Closing date, YYYY-MM-DD
    pub closing_date: String,
    /// Closing time, HH:MM (UTC)
    pub closing_time: String,

    pub grace_period_days: i64,

    #[serde(default)]
    pub discovery_day: Option<DiscoveryDayParams>,

    #[serde(default)]
    pub attachments: Vec<Uuid>,

    pub buyer_contact: Uuid,
    pub program_staff_contact: Uuid,
}

/// Command to create a new RFI draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRfiCommand {
    pub fields: RfiFields,
    /// Initial addendum descriptions, usually empty
    #[serde(default)]
    pub addenda: Vec<String>,
}

/// Command to append a new version to an existing RFI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRfiCommand {
    pub rfi_id: Uuid,
    pub fields: RfiFields,
    /// Proposed addendum descriptions, reconciled positionally against the
    /// current version's addenda
    #[serde(default)]
    pub addenda: Vec<String>,
}

/// One proposed attendee, pre-validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendeeParams {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub remote: bool,
}

/// Command to create or replace a vendor's discovery day registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationCommand {
    pub rfi_id: Uuid,
    pub vendor_id: Uuid,
    pub attendees: Vec<AttendeeParams>,
}

/// Command to cancel a vendor's registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRegistrationCommand {
    pub rfi_id: Uuid,
    pub vendor_id: Uuid,
}

/// Result of a successful create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRfiResult {
    pub rfi_id: Uuid,
    pub status: RfiStatus,
}

/// Result of a successful edit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRfiResult {
    pub rfi_id: Uuid,
    pub version_count: usize,
    pub discovery_day_change: DiscoveryDayChange,
}

/// Result of a successful publish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRfiResult {
    pub rfi_id: Uuid,
    pub matched_vendors: usize,
}

/// Result of a successful registration operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResult {
    pub rfi_id: Uuid,
    pub vendor_id: Uuid,
    pub attendee_count: usize,
}
