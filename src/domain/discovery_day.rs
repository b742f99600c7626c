//! Discovery day change classification and attendee impact selection
//!
//! Compares the discovery day sub-records of two consecutive versions and
//! decides which registered attendees must be told about the change.

use super::rfi::{Attendee, DiscoveryDay};

/// Classification of a discovery day change between two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryDayChange {
    Unchanged,
    Rescheduled,
    VenueChanged,
    RemoteChanged,
    Removed,
}

impl std::fmt::Display for DiscoveryDayChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DiscoveryDayChange::Unchanged => "unchanged",
            DiscoveryDayChange::Rescheduled => "rescheduled",
            DiscoveryDayChange::VenueChanged => "venue_changed",
            DiscoveryDayChange::RemoteChanged => "remote_changed",
            DiscoveryDayChange::Removed => "removed",
        };
        write!(f, "{}", s)
    }
}

/// Classify the discovery day change from `old` to `new`.
///
/// A reschedule is the dominant, most disruptive change: when `occurring_at`
/// differs it supersedes venue and remote-access comparisons even if those
/// texts also changed in the same edit. `occurring_at` is compared for exact
/// equality, not same calendar day.
///
/// A session appearing where none existed is a fresh creation, handled by
/// the registration flow rather than the change path, so it classifies as
/// `Unchanged` here.
pub fn classify(old: Option<&DiscoveryDay>, new: Option<&DiscoveryDay>) -> DiscoveryDayChange {
    match (old, new) {
        (None, _) => DiscoveryDayChange::Unchanged,
        (Some(_), None) => DiscoveryDayChange::Removed,
        (Some(old), Some(new)) => {
            if old.occurring_at != new.occurring_at {
                DiscoveryDayChange::Rescheduled
            } else if old.venue != new.venue {
                DiscoveryDayChange::VenueChanged
            } else if old.remote_access != new.remote_access {
                DiscoveryDayChange::RemoteChanged
            } else {
                DiscoveryDayChange::Unchanged
            }
        }
    }
}

/// Select the attendees impacted by a classified change.
///
/// A reschedule affects everyone; a venue change only in-person attendees;
/// a remote-access change only remote attendees. `Removed` is not an impact
/// filter: the cancellation path notifies the entire attendee list without
/// calling this, so it selects nobody here, as does `Unchanged`.
pub fn select_impacted(change: DiscoveryDayChange, attendees: &[Attendee]) -> Vec<&Attendee> {
    match change {
        DiscoveryDayChange::Rescheduled => attendees.iter().collect(),
        DiscoveryDayChange::VenueChanged => attendees.iter().filter(|a| !a.remote).collect(),
        DiscoveryDayChange::RemoteChanged => attendees.iter().filter(|a| a.remote).collect(),
        DiscoveryDayChange::Unchanged | DiscoveryDayChange::Removed => Vec::new(),
    }
}
