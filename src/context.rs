//! Application state built once at startup

use crate::aggregate::WinCount;
use crate::data::Dataset;
use crate::error::Result;
use crate::figure::{build_figure, Figure};
use std::path::Path;
use tracing::info;

/// Everything the dashboard reads while serving.
///
/// Built once and never mutated; handlers borrow it, the server shares
/// it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppContext {
    dataset: Dataset,
    wins: WinCount,
    figure: Figure,
}

impl AppContext {
    /// Load the dataset from disk and derive everything from it
    pub fn load(path: &Path) -> Result<Self> {
        let dataset = Dataset::load_from_file(path)?;
        info!(
            "Loaded {} World Cup finals from {}",
            dataset.len(),
            path.display()
        );
        Ok(Self::from_dataset(dataset))
    }

    /// Derive win counts and the map from a loaded dataset
    pub fn from_dataset(dataset: Dataset) -> Self {
        let wins = WinCount::from_dataset(&dataset);
        let figure = build_figure(&wins);
        info!("Built win-count map for {} countries", wins.len());

        Self {
            dataset,
            wins,
            figure,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn wins(&self) -> &WinCount {
        &self.wins
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::FINALS_CSV;
    use crate::error::{DataLoadError, Error};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_builds_derived_state() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FINALS_CSV.as_bytes()).unwrap();

        let ctx = AppContext::load(file.path()).unwrap();

        assert_eq!(ctx.dataset().len(), 22);
        assert_eq!(ctx.wins().get("Brazil"), Some(5));
        assert_eq!(ctx.figure().data[0].locations.len(), ctx.wins().len());
    }

    #[test]
    fn test_load_failure_is_data_load_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Year,Champion\n2022,Argentina\n").unwrap();

        let err = AppContext::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            Error::DataLoad(DataLoadError::MissingColumn { .. })
        ));
    }
}
