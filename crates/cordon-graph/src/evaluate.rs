//! Evaluation metrics for the super-spreader ranking.
//!
//! # Overview
//!
//! The evaluation answers three questions about a finished analysis run:
//!
//! 1. **Structure** — what does the contact network look like (density,
//!    path length, clustering)?
//! 2. **Classification** — treating each super-spreader as a positive
//!    prediction, how well does the ranking match the ground-truth
//!    infection flags?
//! 3. **Epidemiology** — the empirical reproduction-number estimate from
//!    the 1-hop contact expansion.
//!
//! Undefined values degrade to NaN (path length on a fragmented graph, R0
//! with no initially-infected users, correlation on a zero-variance
//! vector); the metric table is always produced in full.
//!
//! # Classification scope
//!
//! Precision/recall/F1 compare the ground-truth flags *restricted to the
//! super-spreader set* against the all-positive prediction, i.e. they ask
//! "how many of the flagged super-spreaders were actually infected" — not
//! how a binary classifier performs over the whole population. MSE and
//! Pearson correlation DO range over the whole population, comparing the
//! infected vector against super-spreader membership. Degenerate
//! denominators yield 0.0 for precision/recall/F1 (the zero-division
//! convention; tested explicitly).

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use tracing::instrument;

use crate::graph::build::ContactGraph;
use crate::graph::stats::GraphStats;
use crate::metrics::ranking::SuperSpreader;

// ---------------------------------------------------------------------------
// EvaluationReport
// ---------------------------------------------------------------------------

/// The full evaluation-metric table for one analysis run.
///
/// [`EvaluationReport::rows`] yields the metrics in their stable report
/// order; any value may be NaN ("undefined for this dataset").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub network_density: f64,
    pub average_path_length: f64,
    pub clustering_coefficient: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub reproduction_number: f64,
    pub mean_squared_error: f64,
    pub correlation: f64,
}

impl EvaluationReport {
    /// Metric rows in report order, under their published names.
    #[must_use]
    pub fn rows(&self) -> [(&'static str, f64); 9] {
        [
            ("Network Density", self.network_density),
            ("Average Path Length", self.average_path_length),
            ("Clustering Coefficient", self.clustering_coefficient),
            ("Precision", self.precision),
            ("Recall", self.recall),
            ("F1 Score", self.f1_score),
            ("Reproduction Number R0", self.reproduction_number),
            ("Mean Squared Error", self.mean_squared_error),
            ("Correlation with Real Data", self.correlation),
        ]
    }
}

/// Compute the evaluation-metric table.
///
/// `initial` and `secondary` are the iteration-0 and strictly-1-hop sets
/// from [`crate::spread`]; passing the wider 2-hop labeling as `secondary`
/// would silently change what R0 means.
#[must_use]
#[instrument(skip_all, fields(nodes = cg.node_count(), spreaders = spreaders.len()))]
pub fn evaluate(
    cg: &ContactGraph,
    spreaders: &[SuperSpreader],
    initial: &BTreeSet<String>,
    secondary: &BTreeSet<String>,
) -> EvaluationReport {
    let stats = GraphStats::from_graph(cg);

    let (precision, recall, f1_score) = spreader_classification(cg, spreaders);
    let (mean_squared_error, correlation) = population_agreement(cg, spreaders);

    EvaluationReport {
        network_density: stats.density,
        average_path_length: stats.average_path_length,
        clustering_coefficient: stats.clustering_coefficient,
        precision,
        recall,
        f1_score,
        reproduction_number: reproduction_number(initial.len(), secondary.len()),
        mean_squared_error,
        correlation,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Precision/recall/F1 of the super-spreader set against the ground-truth
/// flags of its own members. Every member is a positive prediction, so
/// within the evaluated set there are no predicted negatives: recall
/// collapses to 1.0 whenever any true positive exists.
fn spreader_classification(cg: &ContactGraph, spreaders: &[SuperSpreader]) -> (f64, f64, f64) {
    let true_positives = spreaders
        .iter()
        .filter(|s| {
            cg.node_index(&s.id)
                .and_then(|idx| cg.node(idx))
                .is_some_and(|node| node.infected)
        })
        .count();

    let precision = ratio(true_positives, spreaders.len());
    let recall = ratio(true_positives, true_positives);
    let f1_score = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    (precision, recall, f1_score)
}

/// MSE and Pearson correlation between the ground-truth infected vector
/// and super-spreader membership, over the whole population.
#[allow(clippy::cast_precision_loss)]
fn population_agreement(cg: &ContactGraph, spreaders: &[SuperSpreader]) -> (f64, f64) {
    let n = cg.node_count();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }

    let spreader_ids: HashSet<&str> = spreaders.iter().map(|s| s.id.as_str()).collect();

    let mut actual = Vec::with_capacity(n);
    let mut predicted = Vec::with_capacity(n);
    for node in cg.graph.node_weights() {
        actual.push(f64::from(u8::from(node.infected)));
        predicted.push(f64::from(u8::from(spreader_ids.contains(node.id.as_str()))));
    }

    let mse = actual
        .iter()
        .zip(&predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum::<f64>()
        / n as f64;

    (mse, pearson(&actual, &predicted))
}

/// Pearson correlation coefficient; NaN when either vector has zero
/// variance.
#[allow(clippy::cast_precision_loss)]
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return f64::NAN;
    }
    covariance / denominator
}

#[allow(clippy::cast_precision_loss)]
fn reproduction_number(initial: usize, secondary: usize) -> f64 {
    if initial == 0 {
        return f64::NAN;
    }
    secondary as f64 / initial as f64
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
