//! Addenda reconciliation
//!
//! Merges a proposed list of addendum descriptions against the current
//! version's addenda. Correspondence is strictly positional: there is no
//! addendum identifier, so reordering is indistinguishable from editing
//! in place.

use chrono::{DateTime, Utc};

use super::rfi::Addendum;

/// Reserved description value signaling "remove the addendum at this
/// position". Clients send it in place of a separate remove operation.
pub const DELETION_SENTINEL: &str = "$$REMOVE$$";

/// Reconcile a proposed addenda list against the current one.
///
/// Unchanged entries are carried over verbatim so timestamps do not churn.
/// Edited entries keep their original `created_at` and get `updated_at`
/// bumped to `now`. Positions with no current counterpart become brand-new
/// addenda. After the build pass, every entry whose description equals the
/// deletion sentinel is dropped.
///
/// A proposed list shorter than the current one silently drops the trailing
/// current entries, sentinel or not. That matches the observed behavior of
/// the positional protocol and is deliberately not "fixed" here.
pub fn reconcile(current: &[Addendum], proposed: &[String], now: DateTime<Utc>) -> Vec<Addendum> {
    let mut reconciled = Vec::with_capacity(proposed.len());

    for (i, description) in proposed.iter().enumerate() {
        match current.get(i) {
            Some(existing) if existing.description == *description => {
                reconciled.push(existing.clone());
            }
            Some(existing) => {
                reconciled.push(Addendum {
                    created_at: existing.created_at,
                    updated_at: now,
                    description: description.clone(),
                });
            }
            None => {
                reconciled.push(Addendum {
                    created_at: now,
                    updated_at: now,
                    description: description.clone(),
                });
            }
        }
    }

    reconciled.retain(|addendum| addendum.description != DELETION_SENTINEL);
    reconciled
}
