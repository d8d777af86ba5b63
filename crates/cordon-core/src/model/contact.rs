use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A reported contact between two users over a time interval.
///
/// The pair is ordered: `reporting_user` is the one whose device reported
/// the contact, `contact_user` the one they met. Direction matters — the
/// transmission graph keeps the edge `reporting → contacted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub reporting_user: String,
    pub contact_user: String,
    pub contact_start: NaiveDateTime,
    pub contact_end: NaiveDateTime,
}

impl ContactEvent {
    /// Contact duration in minutes. Negative when the end precedes the
    /// start — a data-quality condition callers must surface, not an error
    /// (see [`crate::records::LoadReport`]).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_minutes(&self) -> f64 {
        (self.contact_end - self.contact_start).num_seconds() as f64 / 60.0
    }

    /// `true` when `contact_end` precedes `contact_start`.
    #[must_use]
    pub fn has_negative_duration(&self) -> bool {
        self.contact_end < self.contact_start
    }
}
