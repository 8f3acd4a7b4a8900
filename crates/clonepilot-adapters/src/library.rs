//! CSV-backed curated sequence library
//!
//! The library file is the same shape the wet-lab team maintains by hand:
//! one row per plasmid with `Plasmid`, `Sequence`, `Promoter`,
//! `Selection Marker` and `Origin` columns. Extra columns (for example
//! `Expression Level`) are ignored. The whole file is loaded once at
//! startup; lookups scan the in-memory records.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use csv::ReaderBuilder;
use tracing::{debug, info, warn};

use clonepilot_assembly::{sanitize_sequence, SequenceRecord};
use clonepilot_core::{CollaboratorError, SequenceRepository};

use crate::error::AdapterError;

/// Column headers the loader looks for, matched case-insensitively
const COL_NAME: &str = "plasmid";
const COL_SEQUENCE: &str = "sequence";
const COL_PROMOTER: &str = "promoter";
const COL_MARKER: &str = "selection marker";
const COL_ORIGIN: &str = "origin";

/// In-memory curated library loaded from a CSV file
#[derive(Debug)]
pub struct CsvSequenceLibrary {
    records: Vec<SequenceRecord>,
}

impl CsvSequenceLibrary {
    /// Load the library from a CSV file on disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AdapterError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AdapterError::LibraryError(format!("cannot open {}: {}", path.display(), e))
        })?;
        let library = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            records = library.records.len(),
            "Loaded plasmid library"
        );
        Ok(library)
    }

    /// Load the library from any CSV reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AdapterError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| AdapterError::LibraryError(format!("cannot read headers: {}", e)))?
            .clone();

        let column = |wanted: &str| -> Option<usize> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        };

        let name_idx = column(COL_NAME).ok_or_else(|| {
            AdapterError::LibraryError("missing 'Plasmid' column".to_string())
        })?;
        let sequence_idx = column(COL_SEQUENCE).ok_or_else(|| {
            AdapterError::LibraryError("missing 'Sequence' column".to_string())
        })?;
        let promoter_idx = column(COL_PROMOTER);
        let marker_idx = column(COL_MARKER);
        let origin_idx = column(COL_ORIGIN);

        let field = |row: &csv::StringRecord, idx: Option<usize>| -> String {
            idx.and_then(|i| row.get(i))
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };

        let mut records = Vec::new();
        for (row_number, row) in csv_reader.records().enumerate() {
            let row = row?;

            // Rows where every field is blank are spacing, not data
            if row.iter().all(|f| f.trim().is_empty()) {
                continue;
            }

            let name = field(&row, Some(name_idx));
            if name.is_empty() {
                warn!(row = row_number + 2, "Skipping library row without a plasmid name");
                continue;
            }

            let sequence = sanitize_sequence(&field(&row, Some(sequence_idx)));
            let mut record = SequenceRecord::new(name, sequence);
            record.promoter = non_empty(field(&row, promoter_idx));
            record.selection_marker = non_empty(field(&row, marker_idx));
            record.origin = non_empty(field(&row, origin_idx));
            records.push(record);
        }

        Ok(Self { records })
    }

    /// Build a library directly from records, mainly for wiring tests
    pub fn from_records(records: Vec<SequenceRecord>) -> Self {
        Self { records }
    }

    /// Number of records in the library
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the library holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[async_trait]
impl SequenceRepository for CsvSequenceLibrary {
    async fn find_by_name(&self, name: &str) -> Result<Option<SequenceRecord>, CollaboratorError> {
        let wanted = name.trim();
        let hit = self
            .records
            .iter()
            .find(|record| record.name.eq_ignore_ascii_case(wanted));

        match hit {
            Some(record) if record.is_empty() => {
                // A named row without a sequence cannot back a design
                debug!(name = %record.name, "Library record has no sequence");
                Ok(None)
            }
            Some(record) => Ok(Some(record.clone())),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<SequenceRecord>, CollaboratorError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LIBRARY_CSV: &str = "\
Plasmid,Sequence,Promoter,Selection Marker,Origin,Expression Level
pcDNA3.1(+),ACGTACGTACGTACGTACGT,CMV,Ampicillin,pUC,high
,,,,,
pUC19,acgt acgtac gt,lac,Ampicillin,pMB1,medium
pEmpty,,T7,Kanamycin,,low
";

    fn library() -> CsvSequenceLibrary {
        CsvSequenceLibrary::from_reader(LIBRARY_CSV.as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn test_find_by_name_is_case_insensitive() {
        let library = library();
        let record = library.find_by_name("PCDNA3.1(+)").await.unwrap().unwrap();
        assert_eq!(record.name, "pcDNA3.1(+)");
        assert_eq!(record.sequence, "ACGTACGTACGTACGTACGT");
        assert_eq!(record.promoter.as_deref(), Some("CMV"));
        assert_eq!(record.selection_marker.as_deref(), Some("Ampicillin"));
        assert_eq!(record.origin.as_deref(), Some("pUC"));
    }

    #[tokio::test]
    async fn test_sequences_are_sanitized_on_load() {
        let library = library();
        let record = library.find_by_name("pUC19").await.unwrap().unwrap();
        assert_eq!(record.sequence, "ACGTACGTACGT");
    }

    #[tokio::test]
    async fn test_blank_rows_are_skipped() {
        let library = library();
        assert_eq!(library.len(), 3);
    }

    #[tokio::test]
    async fn test_record_without_sequence_reads_as_missing() {
        let library = library();
        assert!(library.find_by_name("pEmpty").await.unwrap().is_none());
        // The row itself is still part of the listing
        let names: Vec<String> = library
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert!(names.contains(&"pEmpty".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_name_reads_as_missing() {
        let library = library();
        assert!(library.find_by_name("pET-28a(+)").await.unwrap().is_none());
    }

    #[test]
    fn test_missing_plasmid_column_is_an_error() {
        let err = CsvSequenceLibrary::from_reader("Name,Sequence\nx,ACGT\n".as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("missing 'Plasmid' column"));
    }

    #[test]
    fn test_missing_sequence_column_is_an_error() {
        let err = CsvSequenceLibrary::from_reader("Plasmid,Promoter\nx,CMV\n".as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("missing 'Sequence' column"));
    }

    #[test]
    fn test_from_path_round_trip() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(LIBRARY_CSV.as_bytes()).unwrap();
        file.flush().unwrap();

        let library = CsvSequenceLibrary::from_path(file.path()).unwrap();
        assert_eq!(library.len(), 3);
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let err = CsvSequenceLibrary::from_path("/nonexistent/plasmids.csv").unwrap_err();
        assert!(err.to_string().contains("cannot open"));
    }
}
