//! Ecosystem-service materiality catalog.
//!
//! Maps each ecosystem service to the sectors with a high materiality
//! dependency on it, in the style of the ENCORE dataset. The catalog
//! backs ecosystem-service shock requests: shocking a service shocks
//! every dependent sector.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use mrio_engine::EcosystemServiceResolver;
use serde::Deserialize;

use crate::error::StoreError;

#[derive(Debug, Deserialize)]
struct ServiceRecord {
    service: String,
    sectors: Vec<String>,
}

/// Service → dependent-sector lookup loaded from a JSON catalog.
///
/// The file is a JSON array of `{"service", "sectors"}` records. Later
/// records for the same service replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct MaterialityCatalog {
    services: HashMap<String, Vec<String>>,
}

impl MaterialityCatalog {
    /// Parse a catalog from a JSON document.
    pub fn from_json(document: &str) -> Result<Self, StoreError> {
        let records: Vec<ServiceRecord> = serde_json::from_str(document)?;
        let mut services = HashMap::with_capacity(records.len());
        for record in records {
            services.insert(record.service, record.sectors);
        }
        Ok(Self { services })
    }

    /// Load a catalog from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let document = fs::read_to_string(path)?;
        Self::from_json(&document)
    }

    /// Number of services in the catalog.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Service names in unspecified order.
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }
}

impl EcosystemServiceResolver for MaterialityCatalog {
    fn dependent_sectors(&self, service: &str) -> Option<Vec<String>> {
        self.services.get(service).cloned()
    }
}
