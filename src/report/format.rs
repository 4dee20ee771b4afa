//! Formatted terminal output: run summary, leads table, dataset table.
//!
//! We keep formatting code in one place so:
//! - the ingestion/modeling code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{CompanyRecord, Dataset, LeadCandidate, ScoringConfig};
use crate::report::LeadSelection;

/// Format the run summary (dataset stats + model diagnostics).
pub fn format_run_summary(dataset: &Dataset, selection: &LeadSelection, config: &ScoringConfig) -> String {
    let mut out = String::new();

    out.push_str("=== leads - Funding Lead Scorer ===\n");
    out.push_str(&format!("Data: {} | n={}\n", dataset.provenance.display_name(), dataset.len()));
    out.push_str(&format!("Raised money: {:.1}%\n", dataset.positive_rate() * 100.0));

    let schema = selection.model.schema();
    out.push_str(&format!(
        "Features: {} columns ({} industries, {} locations, 3 numeric)\n",
        schema.width(),
        schema.industries().len(),
        schema.locations().len(),
    ));

    let forest = selection.model.forest();
    out.push_str(&format!(
        "Forest: trees={} | max_depth={} | mean nodes/tree={:.1} | seed={}\n",
        forest.n_trees(),
        config
            .forest
            .max_depth
            .map(|d| d.to_string())
            .unwrap_or_else(|| "none".to_string()),
        forest.mean_nodes(),
        config.forest.seed,
    ));
    if selection.report.is_some() {
        out.push_str(&format!("Split: train={} | test={}\n", selection.n_train, selection.n_test));
    }
    out.push_str(&format!(
        "Leads: {} of {} at probability >= {:.2}\n",
        selection.leads.len(),
        dataset.len(),
        config.threshold
    ));

    if let Some(report) = &selection.report {
        out.push_str("\nHeld-out classification report:\n");
        out.push_str(&report.to_string());
    }

    out
}

/// Format the top-N leads table.
pub fn format_leads(leads: &[LeadCandidate], top_n: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("Top leads ({} of {}):\n", leads.len().min(top_n), leads.len()));
    out.push_str(
        format!(
            "{:>4} {:<24} {:<14} {:<16} {:>14} {:>11}\n",
            "#", "name", "industry", "location", "funding_usd", "probability"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<4} {:-<24} {:-<14} {:-<16} {:-<14} {:-<11}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (i, lead) in leads.iter().take(top_n).enumerate() {
        out.push_str(
            format!(
                "{:>4} {:<24} {:<14} {:<16} {:>14} {:>11.3}\n",
                i + 1,
                truncate(&lead.name, 24),
                truncate(&lead.industry, 14),
                truncate(&lead.location, 16),
                fmt_usd(lead.funding_amount),
                lead.probability,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format a dataset as a plain table (all records).
pub fn format_dataset(dataset: &Dataset) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Dataset: {} | n={} | raised={:.1}%\n",
        dataset.provenance.display_name(),
        dataset.len(),
        dataset.positive_rate() * 100.0
    ));
    out.push_str(
        format!(
            "{:<24} {:>14} {:<14} {:<16} {:>9} {:>7} {:>6}\n",
            "name", "funding_usd", "industry", "location", "employees", "founded", "raised"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<24} {:-<14} {:-<14} {:-<16} {:-<9} {:-<7} {:-<6}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in &dataset.records {
        out.push_str(&format_record(r));
        out.push('\n');
    }

    out
}

fn format_record(r: &CompanyRecord) -> String {
    format!(
        "{:<24} {:>14} {:<14} {:<16} {:>9} {:>7} {:>6}",
        truncate(&r.name, 24),
        fmt_usd(r.funding_amount),
        truncate(&r.industry, 14),
        truncate(&r.location, 16),
        r.employee_count,
        r.founding_year,
        if r.raised_money { "yes" } else { "no" },
    )
    .trim_end()
    .to_string()
}

/// Whole dollars with thousands separators.
fn fmt_usd(v: f64) -> String {
    let whole = v.max(0.0).round() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::generate_sample;
    use crate::domain::Provenance;
    use crate::report::{ModelStage, select_leads};

    fn lead(name: &str, probability: f64) -> LeadCandidate {
        LeadCandidate {
            row: 0,
            name: name.to_string(),
            industry: "Healthcare".to_string(),
            location: "San Francisco".to_string(),
            funding_amount: 3_269_017.4,
            probability,
        }
    }

    #[test]
    fn leads_table_snapshot() {
        let txt = format_leads(&[lead("Acme", 0.93), lead("A very long company name indeed", 0.8)], 5);
        let expected = concat!(
            "Top leads (2 of 2):\n",
            "   # name                     industry       location            funding_usd probability\n",
            "---- ------------------------ -------------- ---------------- -------------- -----------\n",
            "   1 Acme                     Healthcare     San Francisco         3,269,017       0.930\n",
            "   2 A very long company nam. Healthcare     San Francisco         3,269,017       0.800\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn leads_table_respects_top_n() {
        let leads: Vec<_> = (0..10).map(|i| lead(&format!("L{i}"), 0.9)).collect();
        let txt = format_leads(&leads, 3);
        assert!(txt.starts_with("Top leads (3 of 10):\n"));
        assert_eq!(txt.lines().count(), 3 + 3);
    }

    #[test]
    fn usd_grouping() {
        assert_eq!(fmt_usd(0.0), "0");
        assert_eq!(fmt_usd(999.4), "999");
        assert_eq!(fmt_usd(1_000.0), "1,000");
        assert_eq!(fmt_usd(12_500_000.0), "12,500,000");
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("much too long", 6), "much .");
    }

    #[test]
    fn summary_mentions_provenance_and_report() {
        let ds = generate_sample(60, 3);
        let config = ScoringConfig::default();
        let sel = select_leads(ModelStage::Untrained, &ds, &config).unwrap();
        let txt = format_run_summary(&ds, &sel, &config);

        assert!(txt.contains("Data: synthetic | n=60"));
        assert!(txt.contains("Features: 13 columns (5 industries, 5 locations, 3 numeric)"));
        assert!(txt.contains("Forest: trees=100 | max_depth=none"));
        assert!(txt.contains("Split: train=48 | test=12"));
        assert!(txt.contains("Held-out classification report:"));
        assert!(txt.contains("weighted avg"));
    }

    #[test]
    fn dataset_table_lists_every_record() {
        let ds = Dataset::new(Provenance::Live, generate_sample(4, 1).records);
        let txt = format_dataset(&ds);
        assert!(txt.starts_with("Dataset: live | n=4"));
        assert_eq!(txt.lines().count(), 3 + 4);
        assert!(txt.contains("Company_3"));
    }
}
