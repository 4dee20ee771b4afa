//! ASCII exploratory charts for terminal output.
//!
//! Fixed-size character grids, deterministic for a given dataset, so the
//! output can be pinned by golden tests.
//!
//! Panels:
//! - funding histogram: `#` columns
//! - top industries / top locations: horizontal `#` bars with counts
//! - employees vs funding: `o` points

use std::collections::BTreeMap;

use crate::domain::Dataset;

/// Bins in the funding histogram.
pub const HISTOGRAM_BINS: usize = 30;
/// Categories shown per bar chart.
const TOP_CATEGORIES: usize = 10;
/// Label column width in bar charts.
const LABEL_WIDTH: usize = 14;

/// Render the four EDA panels for a dataset.
pub fn render_eda(dataset: &Dataset, width: usize, height: usize) -> String {
    let width = width.max(HISTOGRAM_BINS);
    let height = height.max(5);

    let funding: Vec<f64> = dataset.records.iter().map(|r| r.funding_amount).collect();
    let industries = top_counts(dataset.records.iter().map(|r| r.industry.as_str()), TOP_CATEGORIES);
    let locations = top_counts(dataset.records.iter().map(|r| r.location.as_str()), TOP_CATEGORIES);
    let points: Vec<(f64, f64)> = dataset
        .records
        .iter()
        .map(|r| (f64::from(r.employee_count), r.funding_amount))
        .collect();

    let mut out = String::new();
    out.push_str(&format!(
        "=== EDA: {} data, n={} ===\n\n",
        dataset.provenance.display_name(),
        dataset.len()
    ));
    out.push_str(&render_histogram(&funding, HISTOGRAM_BINS, width, height));
    out.push('\n');
    out.push_str("Top industries:\n");
    out.push_str(&render_bars(&industries, width));
    out.push('\n');
    out.push_str("Top locations:\n");
    out.push_str(&render_bars(&locations, width));
    out.push('\n');
    out.push_str(&render_scatter(&points, width, height));
    out
}

fn render_histogram(values: &[f64], bins: usize, width: usize, height: usize) -> String {
    let Some((lo, hi)) = value_range(values) else {
        return "Funding histogram: (no data)\n".to_string();
    };
    let bins = bins.max(1);
    let width = width.max(bins);
    // A single distinct value lands in bin 0.
    let span = if hi > lo { hi - lo } else { 1.0 };

    let mut counts = vec![0usize; bins];
    for &v in values {
        let b = (((v - lo) / span) * bins as f64).floor() as usize;
        counts[b.min(bins - 1)] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);

    let bar_heights: Vec<usize> = counts
        .iter()
        .map(|&c| ((c as f64 / max_count as f64) * height as f64).ceil() as usize)
        .collect();

    let mut grid = vec![vec![' '; width]; height];
    for x in 0..width {
        let h = bar_heights[x * bins / width];
        for (r, row) in grid.iter_mut().enumerate() {
            if h >= height - r {
                row[x] = '#';
            }
        }
    }

    let mut out = format!("Funding histogram: bins={bins} | funding=[{lo:.0}, {hi:.0}] USD | max count={max_count}\n");
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn render_bars(counts: &[(String, usize)], width: usize) -> String {
    let Some(max_count) = counts.iter().map(|(_, c)| *c).max() else {
        return "(no data)\n".to_string();
    };
    let bar_width = width.saturating_sub(LABEL_WIDTH + 8).max(1);

    let mut out = String::new();
    for (label, count) in counts {
        let len = ((*count as f64 / max_count as f64) * bar_width as f64).round() as usize;
        let bar = "#".repeat(len.max(1));
        let label: String = label.chars().take(LABEL_WIDTH).collect();
        out.push_str(&format!("{label:<width$} {bar} {count}\n", width = LABEL_WIDTH));
    }
    out
}

fn render_scatter(points: &[(f64, f64)], width: usize, height: usize) -> String {
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let (Some((x_lo, x_hi)), Some((y_lo, y_hi))) = (value_range(&xs), value_range(&ys)) else {
        return "Employees vs funding: (no data)\n".to_string();
    };

    let (x_min, x_max) = pad_range(x_lo, x_hi, 0.05);
    let (y_min, y_max) = pad_range(y_lo, y_hi, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for &(x, y) in points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = format!(
        "Employees vs funding: employees=[{x_lo:.0}, {x_hi:.0}] | funding=[{y_lo:.0}, {y_hi:.0}] USD\n"
    );
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

/// Most frequent labels first; equal counts in label order.
fn top_counts<'a>(labels: impl Iterator<Item = &'a str>, n: usize) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for &v in values {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if min_v.is_finite() && max_v.is_finite() {
        Some((min_v, max_v))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}
