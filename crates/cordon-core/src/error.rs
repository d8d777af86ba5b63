use std::fmt;

/// Machine-readable error codes for scripted consumers of the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MissingField,
    InvalidTimestamp,
    DuplicateUserId,
    UnknownUser,
    RecordReadFailed,
    NegativeDuration,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingField => "E1101",
            Self::InvalidTimestamp => "E1102",
            Self::DuplicateUserId => "E1103",
            Self::UnknownUser => "E2101",
            Self::RecordReadFailed => "E1001",
            Self::NegativeDuration => "E1201",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingField => "Required field is missing",
            Self::InvalidTimestamp => "Unparseable timestamp",
            Self::DuplicateUserId => "Duplicate user id",
            Self::UnknownUser => "Contact references unknown user",
            Self::RecordReadFailed => "Record file read failed",
            Self::NegativeDuration => "Contact ends before it starts",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::MissingField => Some("Fill the empty column in the offending CSV row."),
            Self::InvalidTimestamp => {
                Some("Use `YYYY-MM-DD HH:MM:SS` (or RFC3339) timestamps in contact rows.")
            }
            Self::DuplicateUserId => Some("Deduplicate user_id values in the user table."),
            Self::UnknownUser => {
                Some("Add the missing user to the user table or drop the contact row.")
            }
            Self::RecordReadFailed => Some("Check the file path and read permissions."),
            Self::NegativeDuration => {
                Some("Swap contact_start/contact_end in the offending row if they were reversed.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
