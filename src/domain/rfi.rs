//! RFI snapshot types
//!
//! A Version is one immutable edit of an RFI's content. Every field is a
//! complete snapshot; no version reads fields from another version except
//! through addenda reconciliation at construction time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Controlled vocabulary of commodity categories.
///
/// Vendors declare interest in these; vendor matching at publish time is
/// unordered set intersection against a version's category list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SoftwareDevelopment,
    CloudServices,
    CyberSecurity,
    DataAnalytics,
    NetworkInfrastructure,
    ItConsulting,
}

impl Category {
    /// Every value in the vocabulary, for listings and validation messages.
    pub const ALL: [Category; 6] = [
        Category::SoftwareDevelopment,
        Category::CloudServices,
        Category::CyberSecurity,
        Category::DataAnalytics,
        Category::NetworkInfrastructure,
        Category::ItConsulting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SoftwareDevelopment => "software_development",
            Category::CloudServices => "cloud_services",
            Category::CyberSecurity => "cyber_security",
            Category::DataAnalytics => "data_analytics",
            Category::NetworkInfrastructure => "network_infrastructure",
            Category::ItConsulting => "it_consulting",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value outside the category vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Optional scheduled session attached to a version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryDay {
    pub occurring_at: DateTime<Utc>,
    pub venue: String,
    pub remote_access: String,
}

/// Dated textual amendment attached to a version.
///
/// Addenda have no stable identifier; positional correspondence is the only
/// linkage between the addenda of consecutive versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addendum {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub description: String,
}

/// One person attending a discovery day session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: String,
    pub email: String,
    pub remote: bool,
}

/// One immutable edit of an RFI's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,

    /// Derived from a date+time pair at creation; must be in the future
    /// relative to creation except when explicitly re-edited.
    pub closing_at: DateTime<Utc>,

    /// Days added to `closing_at` before the late response window closes.
    pub grace_period_days: u32,

    pub rfi_number: String,
    pub title: String,
    pub entity: String,
    pub description: String,

    /// Non-empty, in the ordering that drives representative-category
    /// selection during vendor matching.
    pub categories: Vec<Category>,

    /// Absence means no session is attached to this version.
    pub discovery_day: Option<DiscoveryDay>,

    pub addenda: Vec<Addendum>,

    /// Opaque file references.
    pub attachments: Vec<Uuid>,

    /// Buyer-role user reference.
    pub buyer_contact: Uuid,

    /// Program-staff-role user reference.
    pub program_staff_contact: Uuid,
}

/// A vendor's declaration of attendees for a discovery day.
///
/// Replaced wholesale on edit; removed on cancel or when the owning RFI
/// version removes its discovery day. At most one per vendor per RFI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub vendor: Uuid,
    pub attendees: Vec<Attendee>,
}

impl Registration {
    /// A solo registration is a vendor registering only themselves: one
    /// attendee whose email is the vendor's own.
    pub fn is_solo(&self, vendor_email: &str) -> bool {
        self.attendees.len() == 1 && self.attendees[0].email.eq_ignore_ascii_case(vendor_email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_unknown_category() {
        let err = "basket_weaving".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("basket_weaving".to_string()));
    }

    #[test]
    fn test_category_serde_matches_as_str() {
        let json = serde_json::to_string(&Category::CloudServices).unwrap();
        assert_eq!(json, r#""cloud_services""#);
    }

    #[test]
    fn test_solo_registration() {
        let registration = Registration {
            vendor: Uuid::new_v4(),
            attendees: vec![Attendee {
                name: "Pat Vendor".to_string(),
                email: "pat@vendor.example".to_string(),
                remote: false,
            }],
        };

        assert!(registration.is_solo("Pat@Vendor.example"));
        assert!(!registration.is_solo("someone-else@vendor.example"));
    }

    #[test]
    fn test_group_registration_is_not_solo() {
        let registration = Registration {
            vendor: Uuid::new_v4(),
            attendees: vec![
                Attendee {
                    name: "Pat Vendor".to_string(),
                    email: "pat@vendor.example".to_string(),
                    remote: false,
                },
                Attendee {
                    name: "Sam Colleague".to_string(),
                    email: "sam@vendor.example".to_string(),
                    remote: true,
                },
            ],
        };

        assert!(!registration.is_solo("pat@vendor.example"));
    }
}
