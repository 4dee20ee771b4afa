//! Export the lead table (CSV) and the ingested dataset (JSON).
//!
//! Both exports are for external consumers (spreadsheets, plotting scripts).
//! Nothing written here is read back by the pipeline.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::domain::{Dataset, LeadCandidate, Provenance};
use crate::error::AppError;

/// Lead CSV columns, in order.
const LEAD_COLUMNS: [&str; 8] = [
    "rank",
    "row",
    "name",
    "industry",
    "location",
    "funding_amount",
    "probability",
    "provenance",
];

#[derive(Serialize)]
struct LeadRow<'a> {
    rank: usize,
    row: usize,
    name: &'a str,
    industry: &'a str,
    location: &'a str,
    funding_amount: f64,
    probability: f64,
    provenance: Provenance,
}

/// Write ranked leads to a CSV file (one row per lead, best first).
///
/// The header is always written, so an empty selection still yields a
/// readable file.
pub fn write_leads_csv(path: &Path, leads: &[LeadCandidate], provenance: Provenance) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create leads CSV '{}': {e}", path.display())))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    writer
        .write_record(LEAD_COLUMNS)
        .map_err(|e| AppError::new(2, format!("Failed to write leads CSV header: {e}")))?;

    for (i, lead) in leads.iter().enumerate() {
        writer
            .serialize(LeadRow {
                rank: i + 1,
                row: lead.row,
                name: &lead.name,
                industry: &lead.industry,
                location: &lead.location,
                funding_amount: lead.funding_amount,
                probability: lead.probability,
                provenance,
            })
            .map_err(|e| AppError::new(2, format!("Failed to write leads CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush leads CSV: {e}")))?;
    Ok(())
}

/// Write the dataset, unmodified and with its provenance, as pretty JSON.
pub fn write_dataset_json(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create dataset JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, dataset)
        .map_err(|e| AppError::new(2, format!("Failed to write dataset JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::generate_sample;

    fn lead(row: usize, name: &str, probability: f64) -> LeadCandidate {
        LeadCandidate {
            row,
            name: name.to_string(),
            industry: "Fintech".to_string(),
            location: "New York, NY".to_string(),
            funding_amount: 5_000_000.0,
            probability,
        }
    }

    #[test]
    fn leads_csv_has_header_rank_and_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leads.csv");
        let leads = vec![lead(4, "Acme", 0.91), lead(0, "Beta", 0.75)];

        write_leads_csv(&path, &leads, Provenance::Live).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "rank,row,name,industry,location,funding_amount,probability,provenance"
        );
        assert_eq!(lines[1], "1,4,Acme,Fintech,\"New York, NY\",5000000.0,0.91,live");
        assert!(lines[2].starts_with("2,0,Beta,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_selection_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.csv");

        write_leads_csv(&path, &[], Provenance::Synthetic).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines, vec!["rank,row,name,industry,location,funding_amount,probability,provenance"]);
        assert_eq!(lines[0].split(',').collect::<Vec<_>>(), LEAD_COLUMNS);
    }

    #[test]
    fn dataset_json_keeps_records_and_provenance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        let ds = generate_sample(12, 7);

        write_dataset_json(&path, &ds).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"provenance\": \"synthetic\""));
        let parsed: Dataset = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, ds);
    }

    #[test]
    fn unwritable_path_maps_to_io_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("leads.csv");
        let err = write_leads_csv(&path, &[], Provenance::Synthetic).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
