//! Region-group catalogue and country naming.
//!
//! Static configuration mirroring the EXIOBASE region set: full names for
//! two-letter region codes and the named groupings used for aggregated
//! shock scenarios. Group membership is always filtered to the regions
//! actually present in a period's label universe, since older datasets
//! carry fewer regions.

use crate::types::LabelUniverse;

/// Named groupings of region codes for aggregated shock scenarios.
pub const REGION_GROUPS: &[(&str, &[&str])] = &[
    (
        "EU27",
        &[
            "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GR", "HR", "HU",
            "IE", "IT", "LT", "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK",
        ],
    ),
    (
        "OECD",
        &[
            "AU", "AT", "BE", "CA", "CH", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GR", "HU",
            "IE", "IT", "JP", "KR", "LT", "LU", "LV", "MX", "NL", "NO", "PL", "PT", "SE", "SI",
            "SK", "TR", "GB", "US",
        ],
    ),
    ("Africa", &["ZA", "WF"]),
    ("Americas", &["US", "CA", "BR", "MX", "WL"]),
    ("Asia-Pacific", &["JP", "CN", "KR", "IN", "AU", "TW", "ID", "WA"]),
    ("Europe (Non-EU27)", &["GB", "CH", "NO", "RU", "WE"]),
    ("Middle East", &["WM"]),
];

const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("AT", "Austria"),
    ("BE", "Belgium"),
    ("BG", "Bulgaria"),
    ("CY", "Cyprus"),
    ("CZ", "Czechia"),
    ("DE", "Germany"),
    ("DK", "Denmark"),
    ("EE", "Estonia"),
    ("ES", "Spain"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("GR", "Greece"),
    ("HR", "Croatia"),
    ("HU", "Hungary"),
    ("IE", "Ireland"),
    ("IT", "Italy"),
    ("LT", "Lithuania"),
    ("LU", "Luxembourg"),
    ("LV", "Latvia"),
    ("MT", "Malta"),
    ("NL", "Netherlands"),
    ("PL", "Poland"),
    ("PT", "Portugal"),
    ("RO", "Romania"),
    ("SE", "Sweden"),
    ("SI", "Slovenia"),
    ("SK", "Slovakia"),
    ("GB", "United Kingdom"),
    ("US", "United States"),
    ("JP", "Japan"),
    ("CN", "China"),
    ("CA", "Canada"),
    ("KR", "South Korea"),
    ("BR", "Brazil"),
    ("IN", "India"),
    ("MX", "Mexico"),
    ("RU", "Russia"),
    ("AU", "Australia"),
    ("CH", "Switzerland"),
    ("TR", "Turkey"),
    ("TW", "Taiwan"),
    ("NO", "Norway"),
    ("ID", "Indonesia"),
    ("ZA", "South Africa"),
    ("WA", "Rest of Asia and Pacific"),
    ("WL", "Rest of America"),
    ("WE", "Rest of Europe"),
    ("WF", "Rest of Africa"),
    ("WM", "Rest of Middle East"),
];

/// Full name for a region code, falling back to the code itself.
///
/// # Examples
///
/// ```rust
/// use mrio_core::regions::country_name;
///
/// assert_eq!(country_name("DE"), "Germany");
/// assert_eq!(country_name("C1"), "C1");
/// ```
pub fn country_name(code: &str) -> &str {
    COUNTRY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// The built-in region-group catalogue.
///
/// A zero-sized handle over [`REGION_GROUPS`] so callers can hold a value
/// implementing the engine's resolver trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionGroups;

impl RegionGroups {
    /// Names of all known groups, in catalogue order.
    pub fn names(&self) -> Vec<&'static str> {
        REGION_GROUPS.iter().map(|(name, _)| *name).collect()
    }

    /// Whether a group with this name exists.
    pub fn contains(&self, group: &str) -> bool {
        REGION_GROUPS.iter().any(|(name, _)| *name == group)
    }

    /// Raw member codes of a group, unfiltered.
    pub fn raw_members(&self, group: &str) -> Option<&'static [&'static str]> {
        REGION_GROUPS
            .iter()
            .find(|(name, _)| *name == group)
            .map(|(_, members)| *members)
    }

    /// Member codes of a group present in the given universe.
    ///
    /// Returns `None` for an unknown group name; an empty vector means the
    /// group exists but none of its members appear in this period's data.
    pub fn members_in(&self, group: &str, universe: &LabelUniverse) -> Option<Vec<String>> {
        let members = self.raw_members(group)?;
        let present = universe.regions();
        Some(
            members
                .iter()
                .filter(|code| present.contains(*code))
                .map(|code| (*code).to_string())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SectorKey;

    #[test]
    fn test_country_name_lookup() {
        assert_eq!(country_name("FR"), "France");
        assert_eq!(country_name("WM"), "Rest of Middle East");
        assert_eq!(country_name("XX"), "XX");
    }

    #[test]
    fn test_group_names() {
        let groups = RegionGroups;
        assert!(groups.contains("EU27"));
        assert!(groups.contains("Middle East"));
        assert!(!groups.contains("EU28"));
    }

    #[test]
    fn test_members_filtered_to_universe() {
        let universe = LabelUniverse::new(vec![
            SectorKey::new("DE", "Farming"),
            SectorKey::new("US", "Farming"),
            SectorKey::new("JP", "Farming"),
        ])
        .unwrap();

        let groups = RegionGroups;
        let eu = groups.members_in("EU27", &universe).unwrap();
        assert_eq!(eu, vec!["DE".to_string()]);

        let oecd = groups.members_in("OECD", &universe).unwrap();
        assert_eq!(oecd.len(), 3);

        assert!(groups.members_in("Atlantis", &universe).is_none());
    }
}
