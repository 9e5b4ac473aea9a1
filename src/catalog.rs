//! Static game data used by every calculation.
//!
//! `GameData` bundles the race baselines, the talent catalog and the
//! outfit catalog. It is loaded once, validated on load, and then only
//! read. Calculations take it by reference, so the same snapshot can be
//! shared across threads. `GameDataStore` swaps whole snapshots when the
//! data is reloaded.

use crate::attribute::AttributeMap;
use crate::error::CalcError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// File names read by [`GameData::load_dir`].
pub const RACES_FILE: &str = "racialstats.json";
pub const TALENTS_FILE: &str = "talents.json";
pub const OUTFITS_FILE: &str = "outfits.json";

/// Talent stat keys that are flat bonuses rather than requirements.
pub const HEALTH_KEY: &str = "health";
pub const POSTURE_KEY: &str = "posture";
pub const ETHER_KEY: &str = "ether";
pub const CARRY_LOAD_KEY: &str = "carry load";
pub const PASSIVE_AGILITY_KEY: &str = "passive agility";

/// Free attribute values each race starts with.
///
/// Races absent from the table have an all-zero baseline.
///
/// # Examples
///
/// ```rust
/// use shrinestat::catalog::RaceBaselines;
///
/// let races = RaceBaselines::from_json(r#"{ "Etrean": { "Intelligence": 4, "Agility": 2 } }"#).unwrap();
/// assert_eq!(races.baseline("Etrean", "Intelligence"), 4);
/// assert_eq!(races.baseline("Etrean", "Strength"), 0);
/// assert_eq!(races.baseline("Unknown", "Intelligence"), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RaceBaselines {
    races: HashMap<String, AttributeMap>,
}

impl RaceBaselines {
    pub fn new(races: HashMap<String, AttributeMap>) -> Result<Self, CalcError> {
        let baselines = Self { races };
        baselines.validate()?;
        Ok(baselines)
    }

    pub fn from_json(json: &str) -> Result<Self, CalcError> {
        let races: HashMap<String, AttributeMap> = serde_json::from_str(json)
            .map_err(|e| CalcError::catalog("race baselines", e.to_string()))?;
        Self::new(races)
    }

    fn validate(&self) -> Result<(), CalcError> {
        for (race, baseline) in &self.races {
            if race.trim().is_empty() {
                return Err(CalcError::catalog("race baselines", "empty race name"));
            }
            if let Some((id, value)) = baseline.iter().find(|(_, v)| *v < 0) {
                return Err(CalcError::catalog(
                    "race baselines",
                    format!("{race} has negative baseline {value} for {id}"),
                ));
            }
        }
        Ok(())
    }

    pub fn get(&self, race: &str) -> Option<&AttributeMap> {
        self.races.get(race)
    }

    /// Baseline value for one attribute of one race, 0 when unknown.
    pub fn baseline(&self, race: &str, attribute: &str) -> i64 {
        self.races.get(race).map_or(0, |b| b.get(attribute))
    }

    pub fn len(&self) -> usize {
        self.races.len()
    }

    pub fn is_empty(&self) -> bool {
        self.races.is_empty()
    }
}

/// Numeric payload of a talent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TalentData {
    /// Attribute requirements and flat bonuses, keyed by name.
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
    /// Attunement requirements.
    #[serde(default)]
    pub attunements: BTreeMap<String, f64>,
}

/// One row of the talent catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentRecord {
    pub name: String,
    #[serde(default)]
    pub data: TalentData,
}

impl TalentRecord {
    /// Value of a key in the talent's stat block, 0 when absent.
    pub fn stat(&self, key: &str) -> f64 {
        self.data.stats.get(key).copied().unwrap_or(0.0)
    }

    pub fn health(&self) -> f64 {
        self.stat(HEALTH_KEY)
    }

    pub fn requires_attribute(&self, attribute: &str) -> bool {
        self.stat(attribute) != 0.0
    }

    pub fn requires_attunement(&self, attunement: &str) -> bool {
        self.data
            .attunements
            .get(attunement)
            .is_some_and(|v| *v != 0.0)
    }
}

/// Talent records indexed by exact name.
#[derive(Debug, Clone, Default)]
pub struct TalentCatalog {
    records: Vec<TalentRecord>,
    by_name: HashMap<String, usize>,
}

impl TalentCatalog {
    pub fn new(records: Vec<TalentRecord>) -> Result<Self, CalcError> {
        let mut by_name = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if record.name.trim().is_empty() {
                return Err(CalcError::catalog("talents", "empty talent name"));
            }
            let mut values = record.data.stats.values().chain(record.data.attunements.values());
            if values.any(|v| !v.is_finite()) {
                return Err(CalcError::catalog(
                    "talents",
                    format!("{} has a non-finite value", record.name),
                ));
            }
            if by_name.insert(record.name.clone(), idx).is_some() {
                return Err(CalcError::catalog(
                    "talents",
                    format!("duplicate name {}", record.name),
                ));
            }
        }
        Ok(Self { records, by_name })
    }

    pub fn from_json(json: &str) -> Result<Self, CalcError> {
        let records: Vec<TalentRecord> =
            serde_json::from_str(json).map_err(|e| CalcError::catalog("talents", e.to_string()))?;
        Self::new(records)
    }

    pub fn get(&self, name: &str) -> Option<&TalentRecord> {
        self.by_name.get(name).map(|&idx| &self.records[idx])
    }

    /// Flat health granted by a talent, `None` when unknown or zero.
    pub fn health_bonus(&self, name: &str) -> Option<f64> {
        self.get(name).map(TalentRecord::health).filter(|h| *h != 0.0)
    }

    /// The sparse talent -> health table.
    pub fn health_table(&self) -> BTreeMap<&str, f64> {
        self.records
            .iter()
            .filter(|r| r.health() != 0.0)
            .map(|r| (r.name.as_str(), r.health()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutfitResistances {
    #[serde(default)]
    pub physical: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitRecord {
    pub name: String,
    #[serde(default)]
    pub resistances: OutfitResistances,
}

/// Outfits indexed by case-insensitive name.
#[derive(Debug, Clone, Default)]
pub struct OutfitCatalog {
    records: Vec<OutfitRecord>,
    by_name: HashMap<String, usize>,
}

impl OutfitCatalog {
    pub fn new(records: Vec<OutfitRecord>) -> Result<Self, CalcError> {
        let mut by_name = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if record.name.trim().is_empty() {
                return Err(CalcError::catalog("outfits", "empty outfit name"));
            }
            let phys = record.resistances.physical;
            if !phys.is_finite() || !(0.0..=100.0).contains(&phys) {
                return Err(CalcError::catalog(
                    "outfits",
                    format!("{} has physical resistance {phys} outside 0..=100", record.name),
                ));
            }
            if by_name.insert(record.name.to_lowercase(), idx).is_some() {
                return Err(CalcError::catalog(
                    "outfits",
                    format!("duplicate name {}", record.name),
                ));
            }
        }
        Ok(Self { records, by_name })
    }

    pub fn from_json(json: &str) -> Result<Self, CalcError> {
        let records: Vec<OutfitRecord> =
            serde_json::from_str(json).map_err(|e| CalcError::catalog("outfits", e.to_string()))?;
        Self::new(records)
    }

    pub fn get(&self, name: &str) -> Option<&OutfitRecord> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&idx| &self.records[idx])
    }

    /// Base physical resistance of an outfit, 0 when unknown.
    pub fn physical(&self, name: &str) -> f64 {
        match self.get(name) {
            Some(outfit) => outfit.resistances.physical,
            None => {
                debug!(outfit = name, "outfit not in catalog, using 0 physical resistance");
                0.0
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read-only lookup tables shared by all calculations.
///
/// # Examples
///
/// ```rust
/// use shrinestat::GameData;
///
/// let data = GameData::from_json_strs(
///     r#"{ "Celtor": { "Charisma": 4 } }"#,
///     r#"[{ "name": "Vital", "data": { "stats": { "health": 10 } } }]"#,
///     r#"[{ "name": "Knight Armor", "resistances": { "physical": 20 } }]"#,
/// )
/// .unwrap();
///
/// assert_eq!(data.races.baseline("Celtor", "Charisma"), 4);
/// assert_eq!(data.talents.health_bonus("Vital"), Some(10.0));
/// assert_eq!(data.outfits.physical("knight armor"), 20.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub races: RaceBaselines,
    pub talents: TalentCatalog,
    pub outfits: OutfitCatalog,
}

impl GameData {
    pub fn new(races: RaceBaselines, talents: TalentCatalog, outfits: OutfitCatalog) -> Self {
        Self {
            races,
            talents,
            outfits,
        }
    }

    pub fn from_json_strs(races: &str, talents: &str, outfits: &str) -> Result<Self, CalcError> {
        let data = Self::new(
            RaceBaselines::from_json(races)?,
            TalentCatalog::from_json(talents)?,
            OutfitCatalog::from_json(outfits)?,
        );
        debug!(
            races = data.races.len(),
            talents = data.talents.len(),
            outfits = data.outfits.len(),
            "loaded game data"
        );
        Ok(data)
    }

    /// Load `racialstats.json`, `talents.json` and `outfits.json` from a
    /// directory. Any missing or malformed file fails the whole load.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, CalcError> {
        let dir = dir.as_ref();
        let read = |file: &str| {
            let path = dir.join(file);
            fs::read_to_string(&path).map_err(|e| CalcError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        };
        let data = Self::from_json_strs(&read(RACES_FILE)?, &read(TALENTS_FILE)?, &read(OUTFITS_FILE)?)?;
        debug!(dir = %dir.display(), "loaded game data directory");
        Ok(data)
    }
}

/// Holder for the current `GameData` snapshot.
///
/// Readers take an `Arc` to the snapshot and keep using it for the whole
/// computation. A reload builds a complete new `GameData` and swaps the
/// pointer, so no reader sees a half-updated table.
#[derive(Debug, Default)]
pub struct GameDataStore {
    current: RwLock<Arc<GameData>>,
}

impl GameDataStore {
    pub fn new(data: GameData) -> Self {
        Self {
            current: RwLock::new(Arc::new(data)),
        }
    }

    pub fn snapshot(&self) -> Arc<GameData> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Publish a new snapshot. Returns the one it replaced.
    pub fn replace(&self, data: GameData) -> Arc<GameData> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        debug!(
            talents = data.talents.len(),
            outfits = data.outfits.len(),
            "publishing new game data snapshot"
        );
        std::mem::replace(&mut *guard, Arc::new(data))
    }
}
