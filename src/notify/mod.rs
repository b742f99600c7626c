//! Notification subsystem
//!
//! Maps detected events to a fixed catalog of notification intents and
//! submits them to the mail collaborator through an outbound queue. Sends
//! are fire-and-forget relative to the triggering mutation: the appended
//! version, publication, or stored registration is the operation's success
//! condition regardless of delivery outcomes.

pub mod catalog;
pub mod dispatcher;
pub mod mailer;

pub use catalog::{
    publish_intents, registration_intents, session_change_intents, RegistrationAction,
};
pub use dispatcher::Dispatcher;
pub use mailer::{LoggingMailer, MailError, Mailer, RecordingMailer};

use serde::{Deserialize, Serialize};

/// Template kinds in the notification catalog. Rendering is the mail
/// collaborator's concern; the core only names the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Solo self-registered vendor: one combined notice
    SoloRegistrationChanged,
    /// Group registration, vendor owner notice
    VendorSessionChanged,
    /// Group registration, impacted attendee notice
    AttendeeSessionChanged,
    /// Session removed by a new version
    SessionCancelled,
    /// Publish fan-out to a matched vendor
    RfiMatchesInterests,

    RegistrationReceivedOps,
    RegistrationConfirmedVendor,
    AttendeeConfirmed,

    RegistrationUpdatedOps,
    RegistrationUpdatedVendor,
    AttendeeUpdated,

    RegistrationCancelledOps,
    RegistrationCancelledVendor,
    AttendeeCancelled,
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TemplateKind::SoloRegistrationChanged => "solo_registration_changed",
            TemplateKind::VendorSessionChanged => "vendor_session_changed",
            TemplateKind::AttendeeSessionChanged => "attendee_session_changed",
            TemplateKind::SessionCancelled => "session_cancelled",
            TemplateKind::RfiMatchesInterests => "rfi_matches_interests",
            TemplateKind::RegistrationReceivedOps => "registration_received_ops",
            TemplateKind::RegistrationConfirmedVendor => "registration_confirmed_vendor",
            TemplateKind::AttendeeConfirmed => "attendee_confirmed",
            TemplateKind::RegistrationUpdatedOps => "registration_updated_ops",
            TemplateKind::RegistrationUpdatedVendor => "registration_updated_vendor",
            TemplateKind::AttendeeUpdated => "attendee_updated",
            TemplateKind::RegistrationCancelledOps => "registration_cancelled_ops",
            TemplateKind::RegistrationCancelledVendor => "registration_cancelled_vendor",
            TemplateKind::AttendeeCancelled => "attendee_cancelled",
        };
        write!(f, "{}", s)
    }
}

/// One outbound notification: recipient, template, and template payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub to: String,
    pub subject: String,
    pub template: TemplateKind,
    pub payload: serde_json::Value,
}
