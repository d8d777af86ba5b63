use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered user of the contact-tracing app.
///
/// `infected` is the ground-truth diagnosis flag from the user table;
/// `date_diagnosis` is present only for diagnosed users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub infected: bool,
    pub date_diagnosis: Option<NaiveDate>,
}

impl User {
    /// Display label used for graph nodes and report rows.
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_label_joins_names() {
        let user = User {
            id: "u-17".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            infected: false,
            date_diagnosis: None,
        };
        assert_eq!(user.display_label(), "Ada Lovelace");
    }
}
