//! Expansion of user-level shock requests into flat shock sets.

use mrio_core::regions::RegionGroups;
use mrio_core::types::{LabelUniverse, SectorKey};
use tracing::debug;

use super::{Shock, ShockError, ShockSet};

/// Default cap on the exogenous block size |M|.
///
/// Solving inverts one |M|x|M| pivot per request (O(|M|^3)); beyond a few
/// hundred shocked sectors that inversion stops being negligible next to
/// the O(N^2) propagation work.
pub const DEFAULT_MAX_EXOGENOUS: usize = 512;

/// External mapping from a group name to member region codes, filtered to
/// the codes present in the given universe.
///
/// Returns `None` for an unknown group.
pub trait RegionGroupResolver {
    /// Member codes of `group` present in `universe`.
    fn members(&self, group: &str, universe: &LabelUniverse) -> Option<Vec<String>>;
}

impl RegionGroupResolver for RegionGroups {
    fn members(&self, group: &str, universe: &LabelUniverse) -> Option<Vec<String>> {
        self.members_in(group, universe)
    }
}

/// External mapping from an ecosystem-service identifier to the sector
/// names materially dependent on it (precomputed offline).
///
/// Returns `None` for an unknown service.
pub trait EcosystemServiceResolver {
    /// Sector names with high materiality to `service`.
    fn dependent_sectors(&self, service: &str) -> Option<Vec<String>>;
}

/// Which regions a single-sector or ecosystem-service shock applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionScope {
    /// One region code.
    Region(String),
    /// A named region group from the catalogue.
    Group(String),
    /// Every region in the label universe.
    All,
}

impl RegionScope {
    /// Parse a scope the way the UI encodes it: the sentinel `"All"`, a
    /// known group name, or otherwise a single region code.
    pub fn parse(value: &str, groups: &RegionGroups) -> Self {
        if value == "All" {
            RegionScope::All
        } else if groups.contains(value) {
            RegionScope::Group(value.to_string())
        } else {
            RegionScope::Region(value.to_string())
        }
    }
}

/// A user-level shock specification, before expansion.
#[derive(Debug, Clone, PartialEq)]
pub enum ShockRequest {
    /// One sector shocked across a region scope.
    Sector {
        /// Regions the shock applies to.
        scope: RegionScope,
        /// Sector name shocked in each region.
        sector: String,
        /// Output-reduction fraction in [0, 1].
        magnitude: f64,
    },
    /// Every sector materially dependent on an ecosystem service, shocked
    /// across a region scope.
    EcosystemService {
        /// Regions the shock applies to.
        scope: RegionScope,
        /// Ecosystem-service identifier (resolved externally).
        service: String,
        /// Output-reduction fraction in [0, 1].
        magnitude: f64,
    },
    /// An explicit list of elementary shocks (scenario-builder mode).
    Explicit(Vec<Shock>),
}

/// Expands [`ShockRequest`]s against a label universe.
///
/// Region groups and ecosystem services are resolved through traits so the
/// store layer (or tests) can supply catalogues; the built-in
/// [`RegionGroups`] satisfies the region side.
pub struct ShockSetBuilder<'a> {
    universe: &'a LabelUniverse,
    groups: &'a dyn RegionGroupResolver,
    services: Option<&'a dyn EcosystemServiceResolver>,
    max_exogenous: usize,
}

impl<'a> ShockSetBuilder<'a> {
    /// Create a builder for one period's universe.
    pub fn new(universe: &'a LabelUniverse, groups: &'a dyn RegionGroupResolver) -> Self {
        Self {
            universe,
            groups,
            services: None,
            max_exogenous: DEFAULT_MAX_EXOGENOUS,
        }
    }

    /// Attach an ecosystem-service resolver (required for
    /// [`ShockRequest::EcosystemService`]).
    pub fn with_services(mut self, services: &'a dyn EcosystemServiceResolver) -> Self {
        self.services = Some(services);
        self
    }

    /// Override the cap on expanded shock-set size.
    pub fn with_max_exogenous(mut self, cap: usize) -> Self {
        self.max_exogenous = cap;
        self
    }

    /// Expand a request into a flat, validated shock set.
    pub fn build(&self, request: &ShockRequest) -> Result<ShockSet, ShockError> {
        let set = match request {
            ShockRequest::Sector {
                scope,
                sector,
                magnitude,
            } => self.expand_sectors(scope, std::slice::from_ref(sector), *magnitude)?,
            ShockRequest::EcosystemService {
                scope,
                service,
                magnitude,
            } => {
                let services = self
                    .services
                    .ok_or_else(|| ShockError::UnknownEcosystemService(service.clone()))?;
                let sectors = services
                    .dependent_sectors(service)
                    .ok_or_else(|| ShockError::UnknownEcosystemService(service.clone()))?;
                self.expand_sectors(scope, &sectors, *magnitude)?
            }
            ShockRequest::Explicit(shocks) => {
                let mut set = ShockSet::new();
                for shock in shocks {
                    check_magnitude(shock.magnitude)?;
                    if !self.universe.contains(&shock.key()) {
                        return Err(ShockError::UnknownSector {
                            region: shock.region.clone(),
                            sector: shock.sector.clone(),
                        });
                    }
                    set.insert(shock.clone());
                }
                set
            }
        };

        if set.is_empty() {
            return Err(ShockError::EmptyShockSet);
        }
        if set.len() > self.max_exogenous {
            return Err(ShockError::TooManyShocks {
                count: set.len(),
                cap: self.max_exogenous,
            });
        }
        debug!(shocks = set.len(), "expanded shock request");
        Ok(set)
    }

    /// Expand (scope x sectors) to the pairs present in the universe.
    ///
    /// For a single-region scope a missing pair is an error; for group and
    /// all-regions scopes absent pairs are skipped, since not every region
    /// carries every sector.
    fn expand_sectors(
        &self,
        scope: &RegionScope,
        sectors: &[String],
        magnitude: f64,
    ) -> Result<ShockSet, ShockError> {
        check_magnitude(magnitude)?;

        let (regions, strict) = match scope {
            RegionScope::Region(code) => (vec![code.clone()], true),
            RegionScope::Group(name) => {
                let members = self
                    .groups
                    .members(name, self.universe)
                    .ok_or_else(|| ShockError::UnknownRegionGroup(name.clone()))?;
                (members, false)
            }
            RegionScope::All => (
                self.universe
                    .regions()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                false,
            ),
        };

        let mut set = ShockSet::new();
        for region in &regions {
            for sector in sectors {
                let key = SectorKey::new(region.clone(), sector.clone());
                if self.universe.contains(&key) {
                    set.insert(Shock::new(region.clone(), sector.clone(), magnitude));
                } else if strict {
                    return Err(ShockError::UnknownSector {
                        region: region.clone(),
                        sector: sector.clone(),
                    });
                }
            }
        }
        Ok(set)
    }
}

fn check_magnitude(magnitude: f64) -> Result<(), ShockError> {
    if !magnitude.is_finite() || !(0.0..=1.0).contains(&magnitude) {
        return Err(ShockError::MagnitudeOutOfRange { value: magnitude });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeServices;

    impl EcosystemServiceResolver for FakeServices {
        fn dependent_sectors(&self, service: &str) -> Option<Vec<String>> {
            match service {
                "Water supply" => Some(vec!["Farming".to_string(), "Mining".to_string()]),
                _ => None,
            }
        }
    }

    fn universe() -> LabelUniverse {
        LabelUniverse::new(vec![
            SectorKey::new("DE", "Farming"),
            SectorKey::new("DE", "Mining"),
            SectorKey::new("US", "Farming"),
            SectorKey::new("JP", "Mining"),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_region_sector() {
        let universe = universe();
        let groups = RegionGroups;
        let builder = ShockSetBuilder::new(&universe, &groups);
        let set = builder
            .build(&ShockRequest::Sector {
                scope: RegionScope::Region("DE".to_string()),
                sector: "Farming".to_string(),
                magnitude: 0.5,
            })
            .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.magnitude_of(&SectorKey::new("DE", "Farming")),
            Some(0.5)
        );
    }

    #[test]
    fn test_single_region_unknown_pair_fails() {
        let universe = universe();
        let groups = RegionGroups;
        let builder = ShockSetBuilder::new(&universe, &groups);
        let err = builder
            .build(&ShockRequest::Sector {
                scope: RegionScope::Region("US".to_string()),
                sector: "Mining".to_string(),
                magnitude: 0.5,
            })
            .unwrap_err();
        assert!(matches!(err, ShockError::UnknownSector { .. }));
    }

    #[test]
    fn test_all_regions_skips_missing_pairs() {
        let universe = universe();
        let groups = RegionGroups;
        let builder = ShockSetBuilder::new(&universe, &groups);
        let set = builder
            .build(&ShockRequest::Sector {
                scope: RegionScope::All,
                sector: "Mining".to_string(),
                magnitude: 0.25,
            })
            .unwrap();
        // US has no Mining row, so only DE and JP are shocked.
        assert_eq!(set.len(), 2);
        assert!(set.contains(&SectorKey::new("DE", "Mining")));
        assert!(set.contains(&SectorKey::new("JP", "Mining")));
    }

    #[test]
    fn test_group_scope_filters_to_universe() {
        let universe = universe();
        let groups = RegionGroups;
        let builder = ShockSetBuilder::new(&universe, &groups);
        let set = builder
            .build(&ShockRequest::Sector {
                scope: RegionScope::Group("EU27".to_string()),
                sector: "Farming".to_string(),
                magnitude: 0.1,
            })
            .unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&SectorKey::new("DE", "Farming")));
    }

    #[test]
    fn test_unknown_group_fails() {
        let universe = universe();
        let groups = RegionGroups;
        let builder = ShockSetBuilder::new(&universe, &groups);
        let err = builder
            .build(&ShockRequest::Sector {
                scope: RegionScope::Group("Atlantis".to_string()),
                sector: "Farming".to_string(),
                magnitude: 0.1,
            })
            .unwrap_err();
        assert_eq!(err, ShockError::UnknownRegionGroup("Atlantis".to_string()));
    }

    #[test]
    fn test_ecosystem_service_expansion() {
        let universe = universe();
        let groups = RegionGroups;
        let services = FakeServices;
        let builder = ShockSetBuilder::new(&universe, &groups).with_services(&services);
        let set = builder
            .build(&ShockRequest::EcosystemService {
                scope: RegionScope::Region("DE".to_string()),
                service: "Water supply".to_string(),
                magnitude: 0.3,
            })
            .unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_unknown_service_fails() {
        let universe = universe();
        let groups = RegionGroups;
        let services = FakeServices;
        let builder = ShockSetBuilder::new(&universe, &groups).with_services(&services);
        let err = builder
            .build(&ShockRequest::EcosystemService {
                scope: RegionScope::All,
                service: "Pollination".to_string(),
                magnitude: 0.3,
            })
            .unwrap_err();
        assert!(matches!(err, ShockError::UnknownEcosystemService(_)));
    }

    #[test]
    fn test_magnitude_out_of_range() {
        let universe = universe();
        let groups = RegionGroups;
        let builder = ShockSetBuilder::new(&universe, &groups);
        for bad in [-0.1, 1.01, f64::NAN, f64::INFINITY] {
            let err = builder
                .build(&ShockRequest::Sector {
                    scope: RegionScope::Region("DE".to_string()),
                    sector: "Farming".to_string(),
                    magnitude: bad,
                })
                .unwrap_err();
            assert!(matches!(err, ShockError::MagnitudeOutOfRange { .. }));
        }
    }

    #[test]
    fn test_explicit_list_validates_universe() {
        let universe = universe();
        let groups = RegionGroups;
        let builder = ShockSetBuilder::new(&universe, &groups);
        let err = builder
            .build(&ShockRequest::Explicit(vec![Shock::new(
                "FR", "Farming", 0.5,
            )]))
            .unwrap_err();
        assert!(matches!(err, ShockError::UnknownSector { .. }));
    }

    #[test]
    fn test_exogenous_cap() {
        let universe = universe();
        let groups = RegionGroups;
        let builder = ShockSetBuilder::new(&universe, &groups).with_max_exogenous(1);
        let err = builder
            .build(&ShockRequest::Sector {
                scope: RegionScope::All,
                sector: "Mining".to_string(),
                magnitude: 0.25,
            })
            .unwrap_err();
        assert!(matches!(err, ShockError::TooManyShocks { count: 2, cap: 1 }));
    }

    #[test]
    fn test_scope_parse() {
        let groups = RegionGroups;
        assert_eq!(RegionScope::parse("All", &groups), RegionScope::All);
        assert_eq!(
            RegionScope::parse("EU27", &groups),
            RegionScope::Group("EU27".to_string())
        );
        assert_eq!(
            RegionScope::parse("DE", &groups),
            RegionScope::Region("DE".to_string())
        );
    }
}
