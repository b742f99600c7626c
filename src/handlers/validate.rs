//! Version field validation
//!
//! Builds a complete `Version` snapshot from raw command fields,
//! accumulating every per-field failure before rejecting. Nothing is
//! written until validation passes.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::directory::UserDirectory;
use crate::domain::{
    Addendum, Category, DiscoveryDay, UserKind, ValidationErrors, Version,
};
use crate::error::AppError;

use super::commands::RfiFields;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

fn parse_timestamp(
    date: &str,
    time: &str,
    date_field: &str,
    time_field: &str,
    errors: &mut ValidationErrors,
) -> Option<DateTime<Utc>> {
    let parsed_date = match NaiveDate::parse_from_str(date, DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(_) => {
            errors.add(date_field, "must be a valid date in YYYY-MM-DD format");
            None
        }
    };
    let parsed_time = match NaiveTime::parse_from_str(time, TIME_FORMAT) {
        Ok(t) => Some(t),
        Err(_) => {
            errors.add(time_field, "must be a valid time in HH:MM format");
            None
        }
    };

    match (parsed_date, parsed_time) {
        (Some(d), Some(t)) => Some(d.and_time(t).and_utc()),
        _ => None,
    }
}

fn require_text(value: &str, field: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(field, "must not be empty");
    }
}

async fn check_contact(
    directory: &dyn UserDirectory,
    user_id: Uuid,
    expected: UserKind,
    field: &str,
    errors: &mut ValidationErrors,
) -> Result<(), AppError> {
    match directory.find_user_by_id(user_id).await? {
        Some(profile) if profile.kind == expected => {}
        Some(profile) => {
            errors.add(
                field,
                format!("user holds the {} role, expected {}", profile.kind, expected),
            );
        }
        None => {
            errors.add(field, "user not found");
        }
    }
    Ok(())
}

/// Validate raw fields into a complete version snapshot.
///
/// `require_future_closing` holds on creation; re-edits may deliberately
/// move the closing time into the past. The reconciled `addenda` are built
/// by the caller since they need the previous version.
pub(crate) async fn build_version(
    fields: &RfiFields,
    created_by: Uuid,
    now: DateTime<Utc>,
    require_future_closing: bool,
    addenda: Vec<Addendum>,
    directory: &dyn UserDirectory,
) -> Result<Version, AppError> {
    let mut errors = ValidationErrors::new();

    require_text(&fields.rfi_number, "rfi_number", &mut errors);
    require_text(&fields.title, "title", &mut errors);
    require_text(&fields.entity, "entity", &mut errors);
    require_text(&fields.description, "description", &mut errors);

    let mut categories = Vec::with_capacity(fields.categories.len());
    if fields.categories.is_empty() {
        errors.add("categories", "must contain at least one category");
    }
    for raw in &fields.categories {
        match raw.parse::<Category>() {
            Ok(category) => {
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
            Err(e) => errors.add("categories", e.to_string()),
        }
    }

    let closing_at = parse_timestamp(
        &fields.closing_date,
        &fields.closing_time,
        "closing_date",
        "closing_time",
        &mut errors,
    );
    if let Some(closing_at) = closing_at {
        if require_future_closing && closing_at <= now {
            errors.add("closing_date", "must be in the future");
        }
    }

    let grace_period_days = if (0..=3650).contains(&fields.grace_period_days) {
        fields.grace_period_days as u32
    } else {
        errors.add("grace_period_days", "must be between 0 and 3650");
        0
    };

    let discovery_day = match &fields.discovery_day {
        Some(params) => {
            require_text(&params.venue, "discovery_day.venue", &mut errors);
            parse_timestamp(
                &params.date,
                &params.time,
                "discovery_day.date",
                "discovery_day.time",
                &mut errors,
            )
            .map(|occurring_at| DiscoveryDay {
                occurring_at,
                venue: params.venue.clone(),
                remote_access: params.remote_access.clone(),
            })
        }
        None => None,
    };

    check_contact(
        directory,
        fields.buyer_contact,
        UserKind::Buyer,
        "buyer_contact",
        &mut errors,
    )
    .await?;
    check_contact(
        directory,
        fields.program_staff_contact,
        UserKind::ProgramStaff,
        "program_staff_contact",
        &mut errors,
    )
    .await?;

    errors.into_result()?;

    // Unreachable in practice: a missing closing_at always records a
    // field error above, which fails into_result first.
    let closing_at = closing_at.ok_or_else(|| {
        AppError::Internal("closing timestamp missing after validation".to_string())
    })?;

    Ok(Version {
        created_at: now,
        created_by,
        closing_at,
        grace_period_days,
        rfi_number: fields.rfi_number.trim().to_string(),
        title: fields.title.trim().to_string(),
        entity: fields.entity.trim().to_string(),
        description: fields.description.trim().to_string(),
        categories,
        discovery_day,
        addenda,
        attachments: fields.attachments.clone(),
        buyer_contact: fields.buyer_contact,
        program_staff_contact: fields.program_staff_contact,
    })
}
