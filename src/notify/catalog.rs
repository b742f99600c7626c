//! Notification intent catalog
//!
//! Pure builders mapping each detected event to its set of intents.

use serde_json::json;

use crate::domain::{
    select_impacted, DiscoveryDayChange, Registration, UserProfile, VendorMatch, Version,
};

use super::{NotificationIntent, TemplateKind};

/// Intents for one registration after a discovery day change.
///
/// `Unchanged` yields nothing. `Removed` tells the vendor and every
/// attendee the session no longer exists. For the remaining kinds a solo
/// self-registration collapses to one vendor notice, while a group
/// registration yields a vendor notice plus one notice per impacted
/// attendee.
pub fn session_change_intents(
    version: &Version,
    change: DiscoveryDayChange,
    registration: &Registration,
    vendor: &UserProfile,
) -> Vec<NotificationIntent> {
    match change {
        DiscoveryDayChange::Unchanged => Vec::new(),

        DiscoveryDayChange::Removed => {
            let subject = format!("Discovery day cancelled: {}", version.title);
            let payload = json!({
                "rfi_number": version.rfi_number,
                "title": version.title,
            });

            let mut intents = vec![NotificationIntent {
                to: vendor.email.clone(),
                subject: subject.clone(),
                template: TemplateKind::SessionCancelled,
                payload: payload.clone(),
            }];
            for attendee in &registration.attendees {
                intents.push(NotificationIntent {
                    to: attendee.email.clone(),
                    subject: subject.clone(),
                    template: TemplateKind::SessionCancelled,
                    payload: payload.clone(),
                });
            }
            intents
        }

        DiscoveryDayChange::Rescheduled
        | DiscoveryDayChange::VenueChanged
        | DiscoveryDayChange::RemoteChanged => {
            let subject = format!("Discovery day updated: {}", version.title);
            let payload = json!({
                "rfi_number": version.rfi_number,
                "title": version.title,
                "change": change,
                "discovery_day": version.discovery_day,
            });

            if registration.is_solo(&vendor.email) {
                return vec![NotificationIntent {
                    to: vendor.email.clone(),
                    subject,
                    template: TemplateKind::SoloRegistrationChanged,
                    payload,
                }];
            }

            let mut intents = vec![NotificationIntent {
                to: vendor.email.clone(),
                subject: subject.clone(),
                template: TemplateKind::VendorSessionChanged,
                payload: payload.clone(),
            }];
            for attendee in select_impacted(change, &registration.attendees) {
                intents.push(NotificationIntent {
                    to: attendee.email.clone(),
                    subject: subject.clone(),
                    template: TemplateKind::AttendeeSessionChanged,
                    payload: payload.clone(),
                });
            }
            intents
        }
    }
}

/// Publish fan-out: one intent per matched vendor, carrying the
/// representative matched category.
pub fn publish_intents(version: &Version, matches: &[VendorMatch]) -> Vec<NotificationIntent> {
    matches
        .iter()
        .map(|m| NotificationIntent {
            to: m.vendor.email.clone(),
            subject: format!("New RFI matches your interests: {}", version.title),
            template: TemplateKind::RfiMatchesInterests,
            payload: json!({
                "rfi_number": version.rfi_number,
                "title": version.title,
                "matched_category": m.matched_category,
                "closing_at": version.closing_at,
            }),
        })
        .collect()
}

/// Registration lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationAction {
    Created,
    Edited,
    Cancelled,
}

impl RegistrationAction {
    fn templates(self) -> (TemplateKind, TemplateKind, TemplateKind) {
        match self {
            RegistrationAction::Created => (
                TemplateKind::RegistrationReceivedOps,
                TemplateKind::RegistrationConfirmedVendor,
                TemplateKind::AttendeeConfirmed,
            ),
            RegistrationAction::Edited => (
                TemplateKind::RegistrationUpdatedOps,
                TemplateKind::RegistrationUpdatedVendor,
                TemplateKind::AttendeeUpdated,
            ),
            RegistrationAction::Cancelled => (
                TemplateKind::RegistrationCancelledOps,
                TemplateKind::RegistrationCancelledVendor,
                TemplateKind::AttendeeCancelled,
            ),
        }
    }

    fn verb(self) -> &'static str {
        match self {
            RegistrationAction::Created => "received",
            RegistrationAction::Edited => "updated",
            RegistrationAction::Cancelled => "cancelled",
        }
    }
}

/// Intents for a registration created, edited, or cancelled: the operations
/// mailbox, the vendor, and every attendee each get a role-specific
/// template.
pub fn registration_intents(
    action: RegistrationAction,
    ops_mailbox: &str,
    version: &Version,
    vendor: &UserProfile,
    registration: &Registration,
) -> Vec<NotificationIntent> {
    let (ops_template, vendor_template, attendee_template) = action.templates();
    let subject = format!("Registration {}: {}", action.verb(), version.title);
    let payload = json!({
        "rfi_number": version.rfi_number,
        "title": version.title,
        "vendor": vendor.name,
        "attendee_count": registration.attendees.len(),
        "discovery_day": version.discovery_day,
    });

    let mut intents = vec![
        NotificationIntent {
            to: ops_mailbox.to_string(),
            subject: subject.clone(),
            template: ops_template,
            payload: payload.clone(),
        },
        NotificationIntent {
            to: vendor.email.clone(),
            subject: subject.clone(),
            template: vendor_template,
            payload: payload.clone(),
        },
    ];
    for attendee in &registration.attendees {
        intents.push(NotificationIntent {
            to: attendee.email.clone(),
            subject: subject.clone(),
            template: attendee_template,
            payload: payload.clone(),
        });
    }
    intents
}
