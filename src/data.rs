//! Match records and dataset loading
//!
//! The input is a CSV file with at least the columns `Year`, `Winner` and
//! `Runner-up`, one row per final:
//! ```text
//! Year,Winner,Score,Runner-up
//! 2014,Germany,1-0,Argentina
//! ```
//! Extra columns are ignored.

use crate::error::DataLoadError;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Label folded into [`MODERN_LABEL`] at load time
pub const HISTORICAL_LABEL: &str = "West Germany";

/// Label that absorbs [`HISTORICAL_LABEL`]
pub const MODERN_LABEL: &str = "Germany";

const YEAR_COLUMN: &str = "Year";
const WINNER_COLUMN: &str = "Winner";
const RUNNER_UP_COLUMN: &str = "Runner-up";

const REQUIRED_COLUMNS: [&str; 3] = [YEAR_COLUMN, WINNER_COLUMN, RUNNER_UP_COLUMN];

/// A single World Cup final
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchRecord {
    /// Year the final was played
    pub year: i32,
    /// Country that won the final
    pub winner: String,
    /// Country that lost the final
    pub runner_up: String,
}

/// Row as it appears in the file, before validation
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Winner")]
    winner: String,
    #[serde(rename = "Runner-up")]
    runner_up: String,
}

/// All finals, in file order, with country labels normalized.
///
/// Immutable once built. The only constructors normalize, so a `Dataset`
/// never holds [`HISTORICAL_LABEL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<MatchRecord>,
}

impl Dataset {
    /// Load and normalize the dataset from a CSV file
    pub fn load_from_file(path: &Path) -> Result<Self, DataLoadError> {
        let file = std::fs::File::open(path).map_err(|e| DataLoadError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_reader(file, &path.display().to_string())
    }

    /// Load and normalize the dataset from any CSV source.
    ///
    /// `source` names the input in error messages.
    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self, DataLoadError> {
        let csv_error = |e: csv::Error| DataLoadError::Csv {
            path: source.to_string(),
            source: e,
        };

        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers = reader.headers().map_err(csv_error)?.clone();

        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(DataLoadError::MissingColumn {
                    path: source.to_string(),
                    column,
                });
            }
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(csv_error)?;
            records.push(parse_row(&row, &headers).map_err(|e| match e {
                RowError::Csv(e) => csv_error(e),
                RowError::Invalid(e) => e,
            })?);
        }

        if records.is_empty() {
            return Err(DataLoadError::NoRecords {
                path: source.to_string(),
            });
        }

        debug!("Read {} match records from {}", records.len(), source);
        Ok(Self::from_records(records))
    }

    /// Build a dataset from already-parsed records, normalizing labels
    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        let records: Vec<MatchRecord> = records
            .into_iter()
            .map(|record| MatchRecord {
                year: record.year,
                winner: normalize_label(record.winner),
                runner_up: normalize_label(record.runner_up),
            })
            .collect();

        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.year) {
                warn!(
                    "Duplicate final for {}; lookups use the first record",
                    record.year
                );
            }
            if record.winner == record.runner_up {
                warn!(
                    "Final {} lists {} as both winner and runner-up",
                    record.year, record.winner
                );
            }
        }

        Self { records }
    }

    /// All records in file order
    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record for the given year
    pub fn find_by_year(&self, year: i32) -> Option<&MatchRecord> {
        self.records.iter().find(|record| record.year == year)
    }

    /// Years in file order
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.records.iter().map(|record| record.year)
    }
}

enum RowError {
    Csv(csv::Error),
    Invalid(DataLoadError),
}

fn parse_row(row: &StringRecord, headers: &StringRecord) -> Result<MatchRecord, RowError> {
    let line = row.position().map(|p| p.line()).unwrap_or(0);
    let raw: RawRecord = row.deserialize(Some(headers)).map_err(RowError::Csv)?;

    let year = raw.year.parse::<i32>().map_err(|_| {
        RowError::Invalid(DataLoadError::InvalidYear {
            line,
            value: raw.year.clone(),
        })
    })?;

    if raw.winner.is_empty() {
        return Err(RowError::Invalid(DataLoadError::EmptyField {
            line,
            column: WINNER_COLUMN,
        }));
    }
    if raw.runner_up.is_empty() {
        return Err(RowError::Invalid(DataLoadError::EmptyField {
            line,
            column: RUNNER_UP_COLUMN,
        }));
    }

    Ok(MatchRecord {
        year,
        winner: raw.winner,
        runner_up: raw.runner_up,
    })
}

fn normalize_label(name: String) -> String {
    if name == HISTORICAL_LABEL {
        MODERN_LABEL.to_string()
    } else {
        name
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// The finals file shipped with the repository
    pub(crate) const FINALS_CSV: &str = include_str!("../fifa_world_cup_finals.csv");

    pub(crate) fn finals() -> Dataset {
        Dataset::from_reader(FINALS_CSV.as_bytes(), "fifa_world_cup_finals.csv").unwrap()
    }

    #[test]
    fn test_load_shipped_dataset() {
        let data = finals();

        assert_eq!(data.len(), 22);
        assert_eq!(data.records()[0].year, 1930);
        assert_eq!(data.records()[0].winner, "Uruguay");
        assert_eq!(data.records()[0].runner_up, "Argentina");
    }

    #[test]
    fn test_years_are_unique() {
        let data = finals();
        let years: HashSet<i32> = data.years().collect();

        assert_eq!(years.len(), data.len());
    }

    #[test]
    fn test_historical_label_is_normalized() {
        let data = finals();

        assert!(data
            .records()
            .iter()
            .all(|r| r.winner != HISTORICAL_LABEL && r.runner_up != HISTORICAL_LABEL));

        let final_1954 = data.find_by_year(1954).unwrap();
        assert_eq!(final_1954.winner, "Germany");

        let final_1966 = data.find_by_year(1966).unwrap();
        assert_eq!(final_1966.runner_up, "Germany");

        // Already-modern labels are untouched
        let final_2014 = data.find_by_year(2014).unwrap();
        assert_eq!(final_2014.winner, "Germany");
        assert_eq!(final_2014.runner_up, "Argentina");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let data = finals();
        let again = Dataset::from_records(data.records().to_vec());

        assert_eq!(data, again);
    }

    #[test]
    fn test_extra_columns_and_whitespace() {
        let csv = "Host, Year ,Winner,Runner-up\nSweden, 1958 , Brazil ,Sweden\n";
        let data = Dataset::from_reader(csv.as_bytes(), "inline").unwrap();

        assert_eq!(
            data.records(),
            &[MatchRecord {
                year: 1958,
                winner: "Brazil".to_string(),
                runner_up: "Sweden".to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_year_keeps_first() {
        let csv = "Year,Winner,Runner-up\n1970,Brazil,Italy\n1970,Italy,Brazil\n";
        let data = Dataset::from_reader(csv.as_bytes(), "inline").unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data.find_by_year(1970).unwrap().winner, "Brazil");
    }

    #[test]
    fn test_same_winner_and_runner_up_still_loads() {
        // "West Germany" v "Germany" collapses to one name after normalization
        let csv = "Year,Winner,Runner-up\n1974,West Germany,Germany\n1978,Argentina,Netherlands\n";
        let data = Dataset::from_reader(csv.as_bytes(), "inline").unwrap();

        assert_eq!(data.len(), 2);
        let record = data.find_by_year(1974).unwrap();
        assert_eq!(record.winner, "Germany");
        assert_eq!(record.runner_up, "Germany");
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::load_from_file(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileRead { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Year,Winner,Runner-up\n2010,Spain,Netherlands\n")
            .unwrap();

        let data = Dataset::load_from_file(file.path()).unwrap();
        assert_eq!(data.find_by_year(2010).unwrap().winner, "Spain");
    }

    #[test]
    fn test_missing_column() {
        let csv = "Year,Winner\n2010,Spain\n";
        let err = Dataset::from_reader(csv.as_bytes(), "inline").unwrap_err();

        match err {
            DataLoadError::MissingColumn { column, .. } => assert_eq!(column, "Runner-up"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_year() {
        let csv = "Year,Winner,Runner-up\n2010,Spain,Netherlands\nMMXIV,Germany,Argentina\n";
        let err = Dataset::from_reader(csv.as_bytes(), "inline").unwrap_err();

        match err {
            DataLoadError::InvalidYear { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "MMXIV");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_country() {
        let csv = "Year,Winner,Runner-up\n2010,Spain,\n";
        let err = Dataset::from_reader(csv.as_bytes(), "inline").unwrap_err();

        assert!(matches!(
            err,
            DataLoadError::EmptyField {
                column: "Runner-up",
                ..
            }
        ));
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let csv = "Year,Winner,Runner-up\n2010,Spain\n";
        let err = Dataset::from_reader(csv.as_bytes(), "inline").unwrap_err();

        assert!(matches!(err, DataLoadError::Csv { .. }));
    }

    #[test]
    fn test_header_only_file() {
        let csv = "Year,Winner,Runner-up\n";
        let err = Dataset::from_reader(csv.as_bytes(), "inline").unwrap_err();

        assert!(matches!(err, DataLoadError::NoRecords { .. }));
    }
}
