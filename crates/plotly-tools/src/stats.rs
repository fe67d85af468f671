use log::debug;
use ndarray::{Array1, ArrayView1};
use statrs::statistics::Statistics;

use crate::config::{AgreementOptions, ScatterOptions};
use crate::error::{PlotError, Result};
use crate::layout::{compose_scatter, Figure};
use crate::table::Table;
use crate::trace::{RenderMode, Trace};

/// z-score of the limits of agreement (95% under a normal approximation).
pub const LIMITS_OF_AGREEMENT_Z: f64 = 1.96;

/// Bland-Altman statistics for two paired measurement columns.
#[derive(Debug, Clone, PartialEq)]
pub struct AgreementStats {
    /// Per-row average of the two measurements.
    pub means: Array1<f64>,
    /// Per-row difference, first minus second.
    pub diffs: Array1<f64>,
    pub mean_diff: f64,
    /// Sample standard deviation (n - 1) of `diffs`.
    pub std_diff: f64,
}

impl AgreementStats {
    /// Compute means, differences and their summary from two paired columns.
    ///
    /// # Arguments
    ///
    /// * `a` - First measurement per row.
    /// * `b` - Second measurement per row, same length as `a`.
    ///
    /// # Returns
    ///
    /// `InvalidInput` when the lengths differ or there are fewer than two
    /// rows, since the sample standard deviation is undefined below that.
    pub fn from_columns(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<Self> {
        if a.len() != b.len() {
            return Err(PlotError::invalid_input(format!(
                "paired columns must have equal lengths (got {} and {})",
                a.len(),
                b.len()
            )));
        }
        if a.len() < 2 {
            return Err(PlotError::invalid_input(
                "agreement analysis needs at least two rows",
            ));
        }

        let means = (&a + &b) / 2.0;
        let diffs = &a - &b;
        let mean_diff = diffs.iter().mean();
        let std_diff = diffs.iter().std_dev();

        Ok(Self {
            means,
            diffs,
            mean_diff,
            std_diff,
        })
    }

    pub fn upper_limit(&self) -> f64 {
        self.mean_diff + LIMITS_OF_AGREEMENT_Z * self.std_diff
    }

    pub fn lower_limit(&self) -> f64 {
        self.mean_diff - LIMITS_OF_AGREEMENT_Z * self.std_diff
    }

    /// Smallest and largest per-row mean.
    pub fn mean_range(&self) -> (f64, f64) {
        self.means.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
    }
}

fn limit_line(x_range: (f64, f64), level: f64, name: String) -> Result<Trace> {
    let (lo, hi) = x_range;
    Ok(Trace::new(vec![lo, hi], vec![level, level], name)?.with_mode(RenderMode::Lines))
}

/// Bland-Altman agreement plot of two table columns.
///
/// Plots the per-row mean against the per-row difference (`col1 - col2`),
/// with horizontal lines at `mean_diff ± 1.96 * std_diff` spanning the
/// range of means. The limit lines are named after their value, e.g.
/// `"+SD1.96: 3.661"`.
pub fn bland_altman(
    table: &Table,
    col1: &str,
    col2: &str,
    options: &AgreementOptions,
) -> Result<Figure> {
    let stats = AgreementStats::from_columns(table.column(col1)?, table.column(col2)?)?;
    debug!(
        "Bland-Altman {} vs {}: mean_diff={:.3}, std_diff={:.3}",
        col1, col2, stats.mean_diff, stats.std_diff
    );

    let name = options
        .name
        .clone()
        .unwrap_or_else(|| format!("{} vs {}", col1, col2));
    let points = Trace::new(stats.means.to_vec(), stats.diffs.to_vec(), name)?
        .with_mode(RenderMode::Markers)
        .with_text(options.text.clone())?;

    let x_range = stats.mean_range();
    let upper = stats.upper_limit();
    let lower = stats.lower_limit();
    let traces = vec![
        points,
        limit_line(x_range, upper, format!("+SD1.96: {:.3}", upper))?,
        limit_line(x_range, lower, format!("-SD1.96: {:.3}", lower))?,
    ];

    let scatter_options = ScatterOptions {
        title: options.title.clone(),
        identity: false,
        x_label: Some("Mean".to_string()),
        y_label: Some("Diff".to_string()),
        ..ScatterOptions::default()
    };
    compose_scatter(traces, &scatter_options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_agreement_stats_sample_std() {
        let a = array![10.0, 12.0, 14.0];
        let b = array![9.0, 13.0, 12.0];
        let stats = AgreementStats::from_columns(a.view(), b.view()).unwrap();

        assert_eq!(stats.diffs.to_vec(), vec![1.0, -1.0, 2.0]);
        assert_eq!(stats.means.to_vec(), vec![9.5, 12.5, 13.0]);
        assert!((stats.mean_diff - 2.0 / 3.0).abs() < 1e-9);
        assert!((stats.std_diff - (7.0f64 / 3.0).sqrt()).abs() < 1e-9);
        assert_eq!(stats.mean_range(), (9.5, 13.0));
    }

    #[test]
    fn test_single_row_rejected() {
        let a = array![1.0];
        let b = array![2.0];
        assert!(AgreementStats::from_columns(a.view(), b.view()).is_err());
    }
}
