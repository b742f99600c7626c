//! Lifecycle status derivation
//!
//! Pure point-in-time mapping from timestamps to a lifecycle status. Safe to
//! call repeatedly; deterministic for identical inputs, so callers may cache
//! the result alongside query responses.

use chrono::{DateTime, Duration, Utc};

/// Lifecycle status of an RFI at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RfiStatus {
    Unpublished,
    Open,
    /// Past closing but still within the grace window; late responses are
    /// accepted. Operators see this distinctly from `Expired`; ordinary
    /// users treat both as not-open.
    Closed,
    Expired,
}

impl std::fmt::Display for RfiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RfiStatus::Unpublished => "unpublished",
            RfiStatus::Open => "open",
            RfiStatus::Closed => "closed",
            RfiStatus::Expired => "expired",
        };
        write!(f, "{}", s)
    }
}

/// Derive the lifecycle status at `now`.
pub fn derive_status(
    now: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
    closing_at: DateTime<Utc>,
    grace_period_days: u32,
) -> RfiStatus {
    if published_at.is_none() {
        return RfiStatus::Unpublished;
    }

    if now < closing_at {
        RfiStatus::Open
    } else if now < closing_at + Duration::days(i64::from(grace_period_days)) {
        RfiStatus::Closed
    } else {
        RfiStatus::Expired
    }
}
