//! CSV export of the four analysis artifacts.
//!
//! Column layouts match the published report format consumed by the
//! downstream dashboards:
//!
//! ```text
//! initially_infected_users.csv  Id,first_name,last_name,date_diagnosis
//! super_spreaders.csv           Id,Label,OutDegree,Betweenness
//! secondary_infected_users.csv  Id,first_name,last_name,date_diagnosis
//! evaluation_metrics.csv        Metric,Value
//! ```
//!
//! User lists are id-ascending; super-spreaders keep their ranked order;
//! metric rows keep the report order. NaN values serialize as `NaN`.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Serialize;

use cordon_core::model::User;
use cordon_graph::evaluate::EvaluationReport;
use cordon_graph::metrics::ranking::SuperSpreader;

/// File names of the four artifacts, in write order.
pub const ARTIFACT_FILES: [&str; 4] = [
    "initially_infected_users.csv",
    "super_spreaders.csv",
    "secondary_infected_users.csv",
    "evaluation_metrics.csv",
];

#[derive(Debug, Serialize)]
struct UserListRow<'a> {
    #[serde(rename = "Id")]
    id: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    date_diagnosis: String,
}

#[derive(Debug, Serialize)]
struct SpreaderRow<'a> {
    #[serde(rename = "Id")]
    id: &'a str,
    #[serde(rename = "Label")]
    label: &'a str,
    #[serde(rename = "OutDegree")]
    out_degree: f64,
    #[serde(rename = "Betweenness")]
    betweenness: f64,
}

#[derive(Debug, Serialize)]
struct MetricRow {
    #[serde(rename = "Metric")]
    metric: &'static str,
    #[serde(rename = "Value")]
    value: f64,
}

/// Write the initially-infected user list (every `infected = true` user).
///
/// # Errors
///
/// Returns an error when the file cannot be created or a row fails to
/// serialize.
pub fn write_initially_infected(path: &Path, users: &[User]) -> Result<()> {
    let rows: Vec<&User> = users.iter().filter(|u| u.infected).collect();
    write_user_list(path, rows)
}

/// Write the secondary-infected user list (the strictly 1-hop set).
///
/// # Errors
///
/// Returns an error when the file cannot be created or a row fails to
/// serialize.
pub fn write_secondary_infected(
    path: &Path,
    users: &[User],
    secondary: &BTreeSet<String>,
) -> Result<()> {
    let rows: Vec<&User> = users.iter().filter(|u| secondary.contains(&u.id)).collect();
    write_user_list(path, rows)
}

/// Write the ranked super-spreader table.
///
/// # Errors
///
/// Returns an error when the file cannot be created or a row fails to
/// serialize.
pub fn write_super_spreaders(path: &Path, spreaders: &[SuperSpreader]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    // serde-driven headers only appear with the first row; an empty table
    // must still carry them for downstream readers.
    if spreaders.is_empty() {
        writer.write_record(["Id", "Label", "OutDegree", "Betweenness"])?;
    }

    for row in spreaders {
        writer.serialize(SpreaderRow {
            id: &row.id,
            label: &row.label,
            out_degree: row.out_degree,
            betweenness: row.betweenness,
        })?;
    }

    writer.flush().context("failed to flush super-spreader table")?;
    Ok(())
}

/// Write the evaluation-metric table in report order.
///
/// # Errors
///
/// Returns an error when the file cannot be created or a row fails to
/// serialize.
pub fn write_metrics(path: &Path, report: &EvaluationReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for (metric, value) in report.rows() {
        writer.serialize(MetricRow { metric, value })?;
    }

    writer.flush().context("failed to flush metric table")?;
    Ok(())
}

fn write_user_list(path: &Path, mut rows: Vec<&User>) -> Result<()> {
    rows.sort_unstable_by(|a, b| a.id.cmp(&b.id));

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    if rows.is_empty() {
        writer.write_record(["Id", "first_name", "last_name", "date_diagnosis"])?;
    }

    for user in rows {
        writer.serialize(UserListRow {
            id: &user.id,
            first_name: &user.first_name,
            last_name: &user.last_name,
            date_diagnosis: user
                .date_diagnosis
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        })?;
    }

    writer.flush().context("failed to flush user list")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn user(id: &str, infected: bool, diagnosis: Option<(i32, u32, u32)>) -> User {
        User {
            id: id.to_string(),
            first_name: "First".into(),
            last_name: "Last".into(),
            infected,
            date_diagnosis: diagnosis.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        }
    }

    #[test]
    fn initially_infected_filters_and_sorts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("initially_infected_users.csv");
        let users = vec![
            user("u-9", true, Some((2021, 3, 2))),
            user("u-1", true, Some((2021, 3, 1))),
            user("u-5", false, None),
        ];

        write_initially_infected(&path, &users).expect("write");
        let body = std::fs::read_to_string(&path).expect("read back");

        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "Id,first_name,last_name,date_diagnosis");
        assert!(lines[1].starts_with("u-1,"), "id ascending: {body}");
        assert!(lines[2].starts_with("u-9,"));
        assert_eq!(lines.len(), 3, "non-infected users excluded");
        assert!(lines[1].ends_with("2021-03-01"));
    }

    #[test]
    fn missing_diagnosis_is_empty_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("secondary_infected_users.csv");
        let users = vec![user("u-2", false, None)];
        let secondary: BTreeSet<String> = ["u-2".to_string()].into_iter().collect();

        write_secondary_infected(&path, &users, &secondary).expect("write");
        let body = std::fs::read_to_string(&path).expect("read back");

        assert!(body.lines().nth(1).expect("data row").ends_with("Last,"));
    }

    #[test]
    fn super_spreaders_keep_ranked_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("super_spreaders.csv");
        let rows = vec![
            SuperSpreader {
                id: "u-7".into(),
                label: "Gail Ortiz".into(),
                out_degree: 0.5,
                betweenness: 0.25,
            },
            SuperSpreader {
                id: "u-3".into(),
                label: "Hans Berg".into(),
                out_degree: 0.5,
                betweenness: 0.125,
            },
        ];

        write_super_spreaders(&path, &rows).expect("write");
        let body = std::fs::read_to_string(&path).expect("read back");

        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "Id,Label,OutDegree,Betweenness");
        assert!(lines[1].starts_with("u-7,"), "ranked order preserved");
        assert!(lines[2].starts_with("u-3,"));
    }

    #[test]
    fn metric_table_serializes_nan() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("evaluation_metrics.csv");
        let report = EvaluationReport {
            network_density: 0.25,
            average_path_length: f64::NAN,
            clustering_coefficient: 0.0,
            precision: 1.0,
            recall: 1.0,
            f1_score: 1.0,
            reproduction_number: 2.0,
            mean_squared_error: 0.0,
            correlation: 1.0,
        };

        write_metrics(&path, &report).expect("write");
        let body = std::fs::read_to_string(&path).expect("read back");

        assert!(body.starts_with("Metric,Value"));
        assert!(body.contains("Network Density,0.25"));
        assert!(body.contains("Average Path Length,NaN"));
        assert_eq!(body.lines().count(), 10, "header plus nine metric rows");
    }
}
