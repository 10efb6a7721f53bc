//! # mrio_store: Dataset Access and Caching
//!
//! Loads per-period MRIO tables from disk and caches them for the
//! lifetime of the process. The layer has three parts:
//!
//! - [`DatasetSource`]: the loading seam. [`CsvDatasetSource`] is the
//!   production implementation, reading one directory of CSV tables per
//!   period and deriving the inverses when they are not shipped.
//! - [`MatrixStore`]: a thread-safe per-period cache of `Arc<MrioTables>`
//!   with a stampede guard, so concurrent first requests for a period
//!   trigger exactly one load.
//! - [`MaterialityCatalog`]: the ecosystem-service to sector mapping
//!   consumed by shock-set expansion.

#![deny(missing_docs)]

pub mod cache;
pub mod materiality;
pub mod source;

mod error;

pub use cache::MatrixStore;
pub use error::StoreError;
pub use materiality::MaterialityCatalog;
pub use source::{CsvDatasetSource, DatasetSource};
