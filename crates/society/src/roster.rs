//! CSV roster import for bulk resident onboarding.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::records::ResidentRecord;
use crate::services::ResidentService;
use crate::structures::StructureError;

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(alias = "flat_number")]
    flat: String,
    name: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    pending_bills: Option<i64>,
}

impl RosterRow {
    fn into_record(self) -> ResidentRecord {
        ResidentRecord {
            flat_number: self.flat.trim().to_string(),
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            pending_bills: self.pending_bills.unwrap_or(0),
        }
    }
}

/// Outcome of a roster import; duplicate flats are skipped rather than aborting the import.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RosterImportSummary {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        residents: &mut ResidentService,
    ) -> Result<RosterImportSummary, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, residents)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        residents: &mut ResidentService,
    ) -> Result<RosterImportSummary, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut summary = RosterImportSummary::default();

        for row in csv_reader.deserialize::<RosterRow>() {
            let record = row?.into_record();
            let flat = record.flat_number.clone();
            match residents.add(record) {
                Ok(_) => summary.added.push(flat),
                Err(StructureError::DuplicateKey { .. }) => {
                    warn!(%flat, "roster row skipped: flat already has a resident");
                    summary.skipped.push(flat);
                }
                Err(other) => {
                    warn!(%flat, error = %other, "roster row skipped");
                    summary.skipped.push(flat);
                }
            }
        }

        Ok(summary)
    }
}
