//! Baseline valuation table and location multipliers.
//!
//! Baselines are pre-money reference values (USD) for a typical company at a
//! given stage in a given sector. Lookup falls back in a fixed chain:
//!
//! ```text
//! (stage, sector) -> (stage, default) -> (default, default)
//! ```

use std::collections::HashMap;

use crate::types::{Sector, Stage};

/// Key into the baseline table. `None` stands for the "default" row/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaselineKey {
    pub stage: Option<Stage>,
    pub sector: Option<Sector>,
}

impl BaselineKey {
    pub const DEFAULT: Self = Self {
        stage: None,
        sector: None,
    };

    pub fn new(stage: Option<Stage>, sector: Option<Sector>) -> Self {
        // `Other` has no column of its own
        let sector = sector.filter(|s| *s != Sector::Other);
        Self { stage, sector }
    }
}

/// Which level of the fallback chain produced a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineSource {
    StageAndSector,
    StageDefault,
    GlobalDefault,
}

/// Stage × sector baseline valuations.
#[derive(Debug, Clone)]
pub struct BaselineTable {
    entries: HashMap<BaselineKey, f64>,
}

const M: f64 = 1_000_000.0;

/// Global fallback when neither stage nor sector is known.
pub const GLOBAL_DEFAULT_BASELINE: f64 = 2.0 * M;

impl Default for BaselineTable {
    fn default() -> Self {
        use Sector::*;
        use Stage::*;

        // (stage, [(sector, value)], stage default)
        let rows: [(Stage, &[(Sector, f64)], f64); 6] = [
            (
                PreSeed,
                &[
                    (Saas, 1.5 * M),
                    (Fintech, 1.5 * M),
                    (Healthtech, 1.2 * M),
                    (Deeptech, 1.5 * M),
                    (Marketplace, 1.0 * M),
                    (Edtech, 0.9 * M),
                    (Ecommerce, 0.8 * M),
                    (Consumer, 0.8 * M),
                ],
                1.0 * M,
            ),
            (
                Seed,
                &[
                    (Saas, 5.0 * M),
                    (Fintech, 5.0 * M),
                    (Healthtech, 4.0 * M),
                    (Deeptech, 4.5 * M),
                    (Marketplace, 3.5 * M),
                    (Edtech, 3.0 * M),
                    (Ecommerce, 2.5 * M),
                    (Consumer, 2.5 * M),
                ],
                3.0 * M,
            ),
            (
                SeriesA,
                &[
                    (Saas, 15.0 * M),
                    (Fintech, 15.0 * M),
                    (Healthtech, 12.0 * M),
                    (Deeptech, 14.0 * M),
                    (Marketplace, 12.0 * M),
                    (Edtech, 9.0 * M),
                    (Ecommerce, 8.0 * M),
                    (Consumer, 8.0 * M),
                ],
                10.0 * M,
            ),
            (
                SeriesB,
                &[
                    (Saas, 45.0 * M),
                    (Fintech, 40.0 * M),
                    (Healthtech, 35.0 * M),
                    (Deeptech, 40.0 * M),
                    (Marketplace, 35.0 * M),
                    (Edtech, 25.0 * M),
                    (Ecommerce, 25.0 * M),
                    (Consumer, 25.0 * M),
                ],
                30.0 * M,
            ),
            (SeriesC, &[], 80.0 * M),
            (Growth, &[], 150.0 * M),
        ];

        let mut entries = HashMap::new();
        for (stage, sectors, stage_default) in rows {
            entries.insert(BaselineKey::new(Some(stage), None), stage_default);
            for &(sector, value) in sectors {
                entries.insert(BaselineKey::new(Some(stage), Some(sector)), value);
            }
        }
        entries.insert(BaselineKey::DEFAULT, GLOBAL_DEFAULT_BASELINE);

        Self { entries }
    }
}

impl BaselineTable {
    /// Override or add a single entry.
    pub fn insert(&mut self, key: BaselineKey, value: f64) {
        self.entries.insert(key, value);
    }

    /// Look up a baseline, walking the fallback chain.
    pub fn lookup(&self, stage: Option<Stage>, sector: Option<Sector>) -> (f64, BaselineSource) {
        let exact = BaselineKey::new(stage, sector);
        if exact.sector.is_some() {
            if let Some(&value) = self.entries.get(&exact) {
                return (value, BaselineSource::StageAndSector);
            }
        }

        if let Some(&value) = self.entries.get(&BaselineKey::new(stage, None)) {
            if stage.is_some() {
                return (value, BaselineSource::StageDefault);
            }
        }

        let value = self
            .entries
            .get(&BaselineKey::DEFAULT)
            .copied()
            .unwrap_or(GLOBAL_DEFAULT_BASELINE);
        (value, BaselineSource::GlobalDefault)
    }
}

// ============================================================================
// Location Multipliers
// ============================================================================

/// Ecosystem premium by city. Unknown locations get 1.0.
const LOCATION_MULTIPLIERS: &[(&str, f64)] = &[
    ("bangalore", 1.15),
    ("bengaluru", 1.15),
    ("mumbai", 1.10),
    ("delhi", 1.10),
    ("new delhi", 1.10),
    ("ncr", 1.10),
    ("gurgaon", 1.10),
    ("gurugram", 1.10),
    ("noida", 1.05),
    ("hyderabad", 1.05),
    ("pune", 1.05),
    ("chennai", 1.00),
    ("san francisco", 1.30),
    ("bay area", 1.30),
    ("new york", 1.20),
    ("london", 1.15),
    ("singapore", 1.15),
];

/// Normalize free-text location: trim, lowercase, `-`/`_` to space, collapse whitespace.
pub fn normalize_location(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Location multiplier for a free-text location.
///
/// The first comma-separated token is tried before the whole string, so
/// "Bengaluru, Karnataka, India" resolves to Bengaluru.
pub fn location_multiplier(location: Option<&str>) -> f64 {
    let Some(raw) = location else {
        return 1.0;
    };

    let normalized = normalize_location(raw);
    let city = normalized.split(',').next().unwrap_or("").trim();

    [city, normalized.as_str()]
        .iter()
        .find_map(|candidate| {
            LOCATION_MULTIPLIERS
                .iter()
                .find(|(name, _)| name == candidate)
                .map(|(_, m)| *m)
        })
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_lookup() {
        let table = BaselineTable::default();
        let (value, source) = table.lookup(Some(Stage::Seed), Some(Sector::Saas));
        assert_eq!(value, 5_000_000.0);
        assert_eq!(source, BaselineSource::StageAndSector);
    }

    #[test]
    fn test_stage_default_fallback() {
        let table = BaselineTable::default();
        let (value, source) = table.lookup(Some(Stage::Seed), Some(Sector::Other));
        assert_eq!(value, 3_000_000.0);
        assert_eq!(source, BaselineSource::StageDefault);

        // Series C has no sector columns
        let (value, source) = table.lookup(Some(Stage::SeriesC), Some(Sector::Saas));
        assert_eq!(value, 80_000_000.0);
        assert_eq!(source, BaselineSource::StageDefault);
    }

    #[test]
    fn test_global_default_fallback() {
        let table = BaselineTable::default();
        let (value, source) = table.lookup(None, Some(Sector::Fintech));
        assert_eq!(value, GLOBAL_DEFAULT_BASELINE);
        assert_eq!(source, BaselineSource::GlobalDefault);
    }

    #[test]
    fn test_override_entry() {
        let mut table = BaselineTable::default();
        table.insert(BaselineKey::new(Some(Stage::Seed), Some(Sector::Saas)), 6_000_000.0);
        assert_eq!(table.lookup(Some(Stage::Seed), Some(Sector::Saas)).0, 6_000_000.0);
    }

    #[test]
    fn test_location_multiplier() {
        assert_eq!(location_multiplier(Some("Bengaluru, Karnataka")), 1.15);
        assert_eq!(location_multiplier(Some("  NEW-DELHI ")), 1.10);
        assert_eq!(location_multiplier(Some("San_Francisco")), 1.30);
        assert_eq!(location_multiplier(Some("Lisbon")), 1.0);
        assert_eq!(location_multiplier(None), 1.0);
    }
}
