//! CSV ingestion for the user and contact tables.
//!
//! # Input shapes
//!
//! ```text
//! users.csv:    user_id,first_name,last_name,infected,date_diagnosis
//! contacts.csv: reporting_user,contact_user,contact_start,contact_end
//! ```
//!
//! `infected` is a case-insensitive, whitespace-tolerant yes/no token:
//! `"yes"` maps to `true`, anything else to `false`. `date_diagnosis` is
//! optional (empty for non-diagnosed users).
//!
//! # Integrity vs. quality
//!
//! Missing ids, unparseable timestamps, and duplicate user ids are fatal
//! [`LoadError`]s identifying the offending row. A contact whose end
//! precedes its start is NOT fatal: the event is kept (downstream metrics
//! do not consume duration), but each occurrence is logged at `warn` and
//! counted in [`LoadReport::negative_duration_count`].

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::ErrorCode;
use crate::model::{ContactEvent, User};

/// Accepted timestamp layouts for contact intervals.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Accepted date layouts for `date_diagnosis`.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while loading record tables.
///
/// Every variant names the offending record; the pipeline aborts on the
/// first integrity failure and no partial state escapes.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The underlying file could not be read or a row failed to parse as CSV.
    #[error("failed to read records: {0}")]
    Csv(#[from] csv::Error),

    /// A required field was empty.
    #[error("row {row}: missing required field `{field}`")]
    MissingField { row: usize, field: &'static str },

    /// A timestamp field did not match any accepted layout.
    #[error("row {row}: unparseable timestamp `{value}` in `{field}`")]
    InvalidTimestamp {
        row: usize,
        field: &'static str,
        value: String,
    },

    /// The same `user_id` appeared twice in the user table.
    #[error("row {row}: duplicate user id `{user_id}`")]
    DuplicateUserId { row: usize, user_id: String },
}

impl LoadError {
    /// The machine-readable code for this failure.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Csv(_) => ErrorCode::RecordReadFailed,
            Self::MissingField { .. } => ErrorCode::MissingField,
            Self::InvalidTimestamp { .. } => ErrorCode::InvalidTimestamp,
            Self::DuplicateUserId { .. } => ErrorCode::DuplicateUserId,
        }
    }
}

// ---------------------------------------------------------------------------
// LoadReport
// ---------------------------------------------------------------------------

/// Data-quality summary for a contact-table load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Number of contact events loaded.
    pub contacts_loaded: usize,
    /// Number of events whose end precedes their start (kept, but flagged).
    pub negative_duration_count: usize,
}

// ---------------------------------------------------------------------------
// Raw CSV rows
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UserRow {
    user_id: String,
    first_name: String,
    last_name: String,
    infected: String,
    #[serde(default)]
    date_diagnosis: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContactRow {
    reporting_user: String,
    contact_user: String,
    contact_start: String,
    contact_end: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load the user table from a CSV file.
///
/// # Errors
///
/// Returns a [`LoadError`] on unreadable input, an empty `user_id`, or a
/// duplicate `user_id`.
#[instrument]
pub fn load_users(path: &Path) -> Result<Vec<User>, LoadError> {
    let reader = csv::Reader::from_path(path)?;
    load_users_from(reader)
}

/// Load the contact table from a CSV file.
///
/// # Errors
///
/// Returns a [`LoadError`] on unreadable input, empty user ids, or
/// unparseable timestamps.
#[instrument]
pub fn load_contacts(path: &Path) -> Result<(Vec<ContactEvent>, LoadReport), LoadError> {
    let reader = csv::Reader::from_path(path)?;
    load_contacts_from(reader)
}

/// Load users from an already-open CSV reader.
///
/// # Errors
///
/// Returns a [`LoadError`] on malformed rows, an empty `user_id`, or a
/// duplicate `user_id`.
pub fn load_users_from<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<User>, LoadError> {
    let mut users = Vec::new();
    let mut seen = HashSet::new();

    for (index, result) in reader.deserialize::<UserRow>().enumerate() {
        let row = index + 2; // header occupies line 1
        let raw = result?;

        let id = required(&raw.user_id, row, "user_id")?;
        if !seen.insert(id.clone()) {
            return Err(LoadError::DuplicateUserId { row, user_id: id });
        }

        let date_diagnosis = match raw.date_diagnosis.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(parse_date(value, row)?),
        };

        users.push(User {
            id,
            first_name: raw.first_name.trim().to_string(),
            last_name: raw.last_name.trim().to_string(),
            infected: parse_infected_token(&raw.infected),
            date_diagnosis,
        });
    }

    debug!(count = users.len(), "loaded user table");
    Ok(users)
}

/// Load contact events from an already-open CSV reader.
///
/// # Errors
///
/// Returns a [`LoadError`] on malformed rows, empty user ids, or
/// unparseable timestamps.
pub fn load_contacts_from<R: Read>(
    mut reader: csv::Reader<R>,
) -> Result<(Vec<ContactEvent>, LoadReport), LoadError> {
    let mut contacts = Vec::new();
    let mut report = LoadReport::default();

    for (index, result) in reader.deserialize::<ContactRow>().enumerate() {
        let row = index + 2;
        let raw = result?;

        let event = ContactEvent {
            reporting_user: required(&raw.reporting_user, row, "reporting_user")?,
            contact_user: required(&raw.contact_user, row, "contact_user")?,
            contact_start: parse_datetime(&raw.contact_start, row, "contact_start")?,
            contact_end: parse_datetime(&raw.contact_end, row, "contact_end")?,
        };

        if event.has_negative_duration() {
            warn!(
                row,
                reporting_user = %event.reporting_user,
                contact_user = %event.contact_user,
                duration_minutes = event.duration_minutes(),
                "contact ends before it starts"
            );
            report.negative_duration_count += 1;
        }

        contacts.push(event);
    }

    report.contacts_loaded = contacts.len();
    debug!(
        count = report.contacts_loaded,
        negative = report.negative_duration_count,
        "loaded contact table"
    );
    Ok((contacts, report))
}

/// Map the `infected` column token to a boolean: a case-insensitive
/// `yes` is true, everything else (including blanks) is false.
#[must_use]
pub fn parse_infected_token(token: &str) -> bool {
    token.trim().eq_ignore_ascii_case("yes")
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn required(value: &str, row: usize, field: &'static str) -> Result<String, LoadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LoadError::MissingField { row, field });
    }
    Ok(trimmed.to_string())
}

fn parse_datetime(value: &str, row: usize, field: &'static str) -> Result<NaiveDateTime, LoadError> {
    let trimmed = value.trim();
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    Err(LoadError::InvalidTimestamp {
        row,
        field,
        value: trimmed.to_string(),
    })
}

fn parse_date(value: &str, row: usize) -> Result<NaiveDate, LoadError> {
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    Err(LoadError::InvalidTimestamp {
        row,
        field: "date_diagnosis",
        value: value.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
