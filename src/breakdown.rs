//! Itemized health and EHP breakdown.
//!
//! `breakdown_ehp` lists where a build's health comes from, in display
//! order, followed by the `Total` and `Final EHP` entries. Each talent's
//! health is attributed to exactly one category: the first base
//! attribute it requires, else the first attunement it requires, else
//! the catch-all `+HP Talents` line.

use crate::attribute::{GroupedAttributes, BASE_ATTRIBUTES};
use crate::build::{CharacterBuild, VITALITY_TRAIT};
use crate::catalog::{GameData, TalentRecord};
use crate::ehp::{build_physical_resistance, EhpTerms, ScenarioParams};
use crate::error::CalcError;
use crate::health::{fortitude_health, unique_talents, BASE_HEALTH, POWER_HEALTH, VITALITY_HEALTH};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const TRAIT_LABEL: &str = "Trait";
pub const POWER_LABEL: &str = "Power";
pub const BASE_HP_LABEL: &str = "Base HP";
pub const FORTITUDE_LABEL: &str = "Fortitude";
pub const ATTUNEMENT_TALENTS_LABEL: &str = "Attunement health talents";
pub const MISC_TALENTS_LABEL: &str = "+HP Talents";
pub const TOTAL_LABEL: &str = "Total";
pub const FINAL_EHP_LABEL: &str = "Final EHP";

/// Label of the per-attribute talent line.
pub fn stat_talents_label(stat: &str) -> String {
    format!("{stat} health talents")
}

/// Ordered health contributions with their EHP scaling.
///
/// Entries keep insertion order, which is the display order.
///
/// # Examples
///
/// ```rust
/// use shrinestat::ContributionBreakdown;
///
/// let mut breakdown = ContributionBreakdown::new(1.5, 100.0);
/// breakdown.push("Base HP", 196.0);
/// breakdown.push("Power", 80.0);
///
/// assert_eq!(breakdown.get("Power"), Some(80.0));
/// assert_eq!(breakdown.entries[0].0, "Base HP");
/// assert_eq!(breakdown.scaled()[1], ("Power".to_string(), 120.0));
/// assert_eq!(breakdown.kit_ehp(), 150.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    /// `(label, health)` pairs in display order.
    pub entries: Vec<(String, f64)>,
    ehp_factor: f64,
    kit_health: f64,
}

impl ContributionBreakdown {
    pub fn new(ehp_factor: f64, kit_health: f64) -> Self {
        Self {
            entries: Vec::new(),
            ehp_factor,
            kit_health,
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.entries.push((label.into(), value));
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| *v)
    }

    pub fn total(&self) -> Option<f64> {
        self.get(TOTAL_LABEL)
    }

    pub fn final_ehp(&self) -> Option<f64> {
        self.get(FINAL_EHP_LABEL)
    }

    /// Raw health to EHP multiplier for this scenario.
    pub fn ehp_factor(&self) -> f64 {
        self.ehp_factor
    }

    /// Every entry except `Final EHP`, multiplied by the EHP factor.
    pub fn scaled(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .filter(|(label, _)| label != FINAL_EHP_LABEL)
            .map(|(label, value)| (label.clone(), value * self.ehp_factor))
            .collect()
    }

    /// EHP contributed by the kit's health.
    pub fn kit_ehp(&self) -> f64 {
        self.kit_health * self.ehp_factor
    }
}

/// Base attribute keys of the post-shrine map, canonical ones first.
fn base_stat_order(post: &GroupedAttributes) -> Vec<&str> {
    let mut order: Vec<&str> = BASE_ATTRIBUTES
        .iter()
        .copied()
        .filter(|stat| post.base.contains(stat))
        .collect();
    order.extend(
        post.base
            .keys()
            .map(|id| id.as_str())
            .filter(|stat| !BASE_ATTRIBUTES.contains(stat)),
    );
    order
}

/// Sum the health of uncounted talents matching `pred` and mark them counted.
fn claim_health<F>(talents: &[&TalentRecord], counted: &mut [bool], pred: F) -> f64
where
    F: Fn(&TalentRecord) -> bool,
{
    let mut health = 0.0;
    for (talent, seen) in talents.iter().zip(counted.iter_mut()) {
        if !*seen && talent.health() != 0.0 && pred(*talent) {
            health += talent.health();
            *seen = true;
        }
    }
    health
}

/// Itemized health contributions and final EHP of a build.
///
/// The entries sum to the same health as [`CharacterBuild::health`], and
/// `Final EHP` matches [`compute_ehp`](crate::compute_ehp) for the same
/// scenario.
pub fn breakdown_ehp(
    build: &CharacterBuild,
    params: &ScenarioParams,
    data: &GameData,
) -> Result<ContributionBreakdown, CalcError> {
    let resistance = build_physical_resistance(build, params, data);
    let terms = EhpTerms::new(&build.flags(), resistance, params)?;
    let mut breakdown = ContributionBreakdown::new(terms.factor(), params.kit_health);

    breakdown.push(
        TRAIT_LABEL,
        build.trait_value(VITALITY_TRAIT) as f64 * VITALITY_HEALTH,
    );
    breakdown.push(POWER_LABEL, build.power() as f64 * POWER_HEALTH);
    breakdown.push(BASE_HP_LABEL, BASE_HEALTH);

    let talents: Vec<&TalentRecord> = unique_talents(build.talents())
        .into_iter()
        .filter_map(|name| {
            let record = data.talents.get(name);
            if record.is_none() {
                debug!(talent = name, "talent not in catalog, left out of breakdown");
            }
            record
        })
        .collect();
    let mut counted = vec![false; talents.len()];

    let post = build.post_shrine();
    for stat in base_stat_order(post) {
        if stat == FORTITUDE_LABEL {
            breakdown.push(FORTITUDE_LABEL, fortitude_health(post.base.get(stat) as f64));
        }
        let health = claim_health(&talents, &mut counted, |t| t.requires_attribute(stat));
        if health != 0.0 {
            breakdown.push(stat_talents_label(stat), health);
        }
    }

    let mut attunement_health = 0.0;
    for attunement in post.attunement.keys() {
        attunement_health += claim_health(&talents, &mut counted, |t| {
            t.requires_attunement(attunement.as_str())
        });
    }
    if attunement_health != 0.0 {
        breakdown.push(ATTUNEMENT_TALENTS_LABEL, attunement_health);
    }

    let misc_health = claim_health(&talents, &mut counted, |_| true);
    if misc_health != 0.0 {
        breakdown.push(MISC_TALENTS_LABEL, misc_health);
    }

    let total: f64 = breakdown.entries.iter().map(|(_, v)| v).sum();
    breakdown.push(TOTAL_LABEL, total);
    breakdown.push(FINAL_EHP_LABEL, terms.ehp(total, params.kit_health).round_ties_even());

    Ok(breakdown)
}
