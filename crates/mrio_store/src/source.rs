//! Dataset sources: where per-period MRIO tables come from.
//!
//! `DatasetSource` is the seam between storage and the engine. The CSV
//! source is the production path; tests substitute in-memory sources.

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use mrio_core::tables::MrioTables;
use mrio_core::types::{DataIntegrityError, LabelUniverse, SectorKey};
use nalgebra::{DMatrix, DVector};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::StoreError;

/// Loads the complete table set for one period.
///
/// Implementations must be usable from multiple threads; the store only
/// ever calls `load` once per period at a time.
pub trait DatasetSource: Send + Sync {
    /// Load the tables for `period`, or [`StoreError::PeriodNotFound`] if
    /// no dataset exists for it.
    fn load(&self, period: i32) -> Result<MrioTables, StoreError>;
}

#[derive(Debug, Deserialize)]
struct LabelRecord {
    region: String,
    sector: String,
}

/// Reads one directory of CSV tables per period.
///
/// Layout under the dataset root:
///
/// ```text
/// <root>/<period>/labels.csv     region,sector header + one row per sector
/// <root>/<period>/a.csv          N×N technical coefficients, no header
/// <root>/<period>/x.csv          N gross-output values, one per line
/// <root>/<period>/y.csv          N final-demand values, one per line
/// <root>/<period>/leontief.csv   optional precomputed (I−A)⁻¹
/// <root>/<period>/ghosh.csv      optional precomputed (I−B)⁻¹
/// ```
///
/// When either inverse file is missing both are derived from A and X, so
/// the matrices always agree with each other.
#[derive(Debug, Clone)]
pub struct CsvDatasetSource {
    root: PathBuf,
}

impl CsvDatasetSource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The dataset root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_labels(path: &Path) -> Result<LabelUniverse, StoreError> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
        let mut keys = Vec::new();
        for record in reader.deserialize() {
            let record: LabelRecord = record?;
            keys.push(SectorKey::new(record.region, record.sector));
        }
        Ok(LabelUniverse::new(keys)?)
    }

    fn read_matrix(path: &Path, table: &'static str, n: usize) -> Result<DMatrix<f64>, StoreError> {
        // Flexible so that row-length problems surface as integrity
        // errors naming the table, not a generic csv error.
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(n);
        for record in reader.deserialize() {
            let row: Vec<f64> = record?;
            if row.len() != n {
                return Err(StoreError::Integrity(DataIntegrityError::LengthMismatch {
                    table,
                    expected: n,
                    got: row.len(),
                }));
            }
            rows.push(row);
        }
        if rows.len() != n {
            return Err(StoreError::Integrity(DataIntegrityError::LengthMismatch {
                table,
                expected: n,
                got: rows.len(),
            }));
        }
        Ok(DMatrix::from_row_iterator(
            n,
            n,
            rows.into_iter().flatten(),
        ))
    }

    fn read_vector(path: &Path, table: &'static str, n: usize) -> Result<DVector<f64>, StoreError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        let mut values = Vec::with_capacity(n);
        for record in reader.deserialize() {
            let row: Vec<f64> = record?;
            if row.len() != 1 {
                return Err(StoreError::Integrity(DataIntegrityError::LengthMismatch {
                    table,
                    expected: 1,
                    got: row.len(),
                }));
            }
            values.push(row[0]);
        }
        if values.len() != n {
            return Err(StoreError::Integrity(DataIntegrityError::LengthMismatch {
                table,
                expected: n,
                got: values.len(),
            }));
        }
        Ok(DVector::from_vec(values))
    }
}

impl DatasetSource for CsvDatasetSource {
    fn load(&self, period: i32) -> Result<MrioTables, StoreError> {
        let dir = self.root.join(period.to_string());
        if !dir.is_dir() {
            return Err(StoreError::PeriodNotFound { period });
        }

        let labels = Self::read_labels(&dir.join("labels.csv"))?;
        let n = labels.len();
        let a = Self::read_matrix(&dir.join("a.csv"), "A", n)?;
        let x = Self::read_vector(&dir.join("x.csv"), "X", n)?;
        let y = Self::read_vector(&dir.join("y.csv"), "Y", n)?;

        let leontief_path = dir.join("leontief.csv");
        let ghosh_path = dir.join("ghosh.csv");
        let tables = if leontief_path.is_file() && ghosh_path.is_file() {
            let leontief = Self::read_matrix(&leontief_path, "L", n)?;
            let ghosh = Self::read_matrix(&ghosh_path, "G", n)?;
            MrioTables::new(labels, a, x, y, leontief, ghosh)?
        } else {
            debug!(period, "inverse tables not shipped, deriving from A and X");
            MrioTables::derive(labels, a, x, y)?
        };

        info!(period, sectors = n, "dataset loaded");
        Ok(tables)
    }
}
