//! User profiles
//!
//! Profiles resolved through the user directory collaborator. The core only
//! needs identity, contact email, role kind, and declared interest
//! categories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rfi::Category;

/// Role kind of a directory user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserKind {
    Buyer,
    ProgramStaff,
    Vendor,
}

impl UserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserKind::Buyer => "buyer",
            UserKind::ProgramStaff => "program_staff",
            UserKind::Vendor => "vendor",
        }
    }
}

impl std::fmt::Display for UserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(UserKind::Buyer),
            "program_staff" => Ok(UserKind::ProgramStaff),
            "vendor" => Ok(UserKind::Vendor),
            other => Err(format!("unknown user kind: {}", other)),
        }
    }
}

/// Directory user as seen by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub kind: UserKind,
    /// Categories of interest declared by vendors; empty for other kinds.
    pub interest_categories: Vec<Category>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_kind_round_trip() {
        for kind in [UserKind::Buyer, UserKind::ProgramStaff, UserKind::Vendor] {
            let parsed: UserKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_unknown_user_kind() {
        assert!("auditor".parse::<UserKind>().is_err());
    }
}
