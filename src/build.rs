//! Character builds.
//!
//! A `CharacterBuild` is created once per lookup from the build
//! service's payload and never changes afterwards. Health and the four
//! combat flags are computed at construction; everything else is derived
//! on demand from the build and a `GameData` snapshot.

use crate::attribute::{AttributeMap, GroupedAttributes};
use crate::catalog::{
    GameData, CARRY_LOAD_KEY, ETHER_KEY, PASSIVE_AGILITY_KEY, POSTURE_KEY,
};
use crate::error::CalcError;
use crate::health::{compute_health, unique_talents};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const REINFORCED_ARMOR: &str = "Reinforced Armor";
pub const TO_THE_FINISH: &str = "To The Finish";
pub const CHAOTIC_CHARM: &str = "Chaotic Charm";
/// Mantra, not a talent.
pub const REINFORCE: &str = "Reinforce";
pub const VITALITY_TRAIT: &str = "Vitality";

/// Metadata block of the build payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildMeta {
    #[serde(rename = "Race", default)]
    pub race: String,
    #[serde(rename = "Outfit", default)]
    pub outfit: String,
}

/// `stats` block of the build payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStats {
    #[serde(default)]
    pub build_name: String,
    #[serde(default)]
    pub build_description: String,
    #[serde(default)]
    pub power: i64,
    #[serde(default)]
    pub traits: BTreeMap<String, i64>,
    #[serde(default)]
    pub meta: BuildMeta,
}

/// A build as the build-sharing service returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRecord {
    pub stats: BuildStats,
    #[serde(default)]
    pub talents: Vec<String>,
    #[serde(default)]
    pub mantras: Vec<String>,
    #[serde(default)]
    pub pre_shrine: GroupedAttributes,
    /// Final, post-shrine attributes.
    #[serde(default)]
    pub attributes: GroupedAttributes,
}

impl BuildRecord {
    pub fn from_json(json: &str) -> Result<Self, CalcError> {
        serde_json::from_str(json).map_err(|e| CalcError::InvalidBuild(e.to_string()))
    }
}

/// Conditional bonuses from talents and mantras.
///
/// They depend only on the character, so they are computed once per
/// build and shared by every EHP scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatFlags {
    /// Penetration resistance from Reinforced Armor.
    pub reinforced_armor: f64,
    /// To The Finish damage reduction value.
    pub to_the_finish: f64,
    /// Chaotic Charm damage reduction value.
    pub chaotic_charm: f64,
    /// Reinforce with at least 60 Fortitude.
    pub reinforce: bool,
}

impl CombatFlags {
    /// Derive the flags from equipped talents, mantras and post-shrine
    /// base attributes.
    ///
    /// ```rust
    /// use shrinestat::{AttributeMap, CombatFlags};
    ///
    /// let base = AttributeMap::from_pairs([("Fortitude", 75), ("Charisma", 40)]);
    /// let talents = vec!["Reinforced Armor".to_string(), "To The Finish".to_string()];
    /// let flags = CombatFlags::compute(&talents, &[], &base);
    ///
    /// assert_eq!(flags.reinforced_armor, 18.0);
    /// assert_eq!(flags.to_the_finish, 10.0);
    /// assert_eq!(flags.chaotic_charm, 0.0);
    /// assert!(!flags.reinforce);
    /// ```
    pub fn compute(talents: &[String], mantras: &[String], base: &AttributeMap) -> Self {
        let fortitude = base.get("Fortitude") as f64;
        let charisma = base.get("Charisma") as f64;
        let has_talent = |name: &str| talents.iter().any(|t| t == name);

        let reinforced_armor = if has_talent(REINFORCED_ARMOR) {
            10.0 + 0.8 * (fortitude - 65.0)
        } else {
            0.0
        };

        let to_the_finish = match (has_talent(TO_THE_FINISH), fortitude < 50.0) {
            (true, true) => 5.83 + (fortitude - 25.0) * 0.16,
            (true, false) => 10.0,
            (false, _) => 0.0,
        };

        let chaotic_charm = if has_talent(CHAOTIC_CHARM) {
            charisma * 0.15
        } else {
            0.0
        };

        let reinforce = fortitude >= 60.0 && mantras.iter().any(|m| m == REINFORCE);

        Self {
            reinforced_armor,
            to_the_finish,
            chaotic_charm,
            reinforce,
        }
    }

    /// The flags in their fixed order, with Reinforce as 1 or 0.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.reinforced_armor,
            self.to_the_finish,
            self.chaotic_charm,
            if self.reinforce { 1.0 } else { 0.0 },
        ]
    }
}

/// Talent-derived totals shown next to a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub base_health: f64,
    pub passive_agility: f64,
    pub posture: f64,
    pub ether: f64,
    pub carry_load: f64,
}

/// One user-supplied character build.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterBuild {
    name: String,
    description: String,
    race: String,
    outfit: String,
    power: i64,
    talents: Vec<String>,
    mantras: Vec<String>,
    traits: BTreeMap<String, i64>,
    pre: GroupedAttributes,
    post: GroupedAttributes,
    health: f64,
    flags: CombatFlags,
}

impl CharacterBuild {
    pub fn from_record(record: BuildRecord, data: &GameData) -> Self {
        let BuildRecord {
            stats,
            talents,
            mantras,
            pre_shrine,
            attributes,
        } = record;

        let fortitude = attributes.base.get("Fortitude");
        let health = compute_health(
            &stats.traits,
            stats.power as f64,
            fortitude as f64,
            &talents,
            &data.talents,
        );
        let flags = CombatFlags::compute(&talents, &mantras, &attributes.base);

        Self {
            name: stats.build_name,
            description: stats.build_description,
            race: stats.meta.race,
            outfit: stats.meta.outfit,
            power: stats.power,
            talents,
            mantras,
            traits: stats.traits,
            pre: pre_shrine,
            post: attributes,
            health,
            flags,
        }
    }

    pub fn from_json(json: &str, data: &GameData) -> Result<Self, CalcError> {
        Ok(Self::from_record(BuildRecord::from_json(json)?, data))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn race(&self) -> &str {
        &self.race
    }

    pub fn outfit(&self) -> &str {
        &self.outfit
    }

    pub fn power(&self) -> i64 {
        self.power
    }

    pub fn talents(&self) -> &[String] {
        &self.talents
    }

    pub fn mantras(&self) -> &[String] {
        &self.mantras
    }

    /// Trait value, 0 when the build doesn't list it.
    pub fn trait_value(&self, name: &str) -> i64 {
        self.traits.get(name).copied().unwrap_or(0)
    }

    pub fn pre_shrine(&self) -> &GroupedAttributes {
        &self.pre
    }

    pub fn post_shrine(&self) -> &GroupedAttributes {
        &self.post
    }

    /// Total health, computed once at construction.
    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn flags(&self) -> CombatFlags {
        self.flags
    }

    /// Summed talent bonuses for the build's secondary stats.
    pub fn summary(&self, data: &GameData) -> BuildSummary {
        let mut summary = BuildSummary {
            base_health: self.health,
            ..Default::default()
        };
        for record in unique_talents(&self.talents)
            .into_iter()
            .filter_map(|name| data.talents.get(name))
        {
            summary.passive_agility += record.stat(PASSIVE_AGILITY_KEY);
            summary.posture += record.stat(POSTURE_KEY);
            summary.ether += record.stat(ETHER_KEY);
            summary.carry_load += record.stat(CARRY_LOAD_KEY);
        }
        summary
    }
}

impl std::fmt::Display for CharacterBuild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.name, self.description)
    }
}
