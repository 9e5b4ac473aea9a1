//! Health pool calculation.

use crate::build::VITALITY_TRAIT;
use crate::catalog::TalentCatalog;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Flat health every character starts with.
pub const BASE_HEALTH: f64 = 196.0;
/// Health per point of the Vitality trait.
pub const VITALITY_HEALTH: f64 = 10.0;
/// Health per power level.
pub const POWER_HEALTH: f64 = 4.0;
/// Fortitude above this value gives half as much health per point.
pub const FORTITUDE_BREAKPOINT: f64 = 50.0;

/// Health granted by Fortitude.
///
/// Half a point of health per Fortitude up to 50, then a quarter point.
///
/// ```rust
/// use shrinestat::health::fortitude_health;
///
/// assert_eq!(fortitude_health(49.0), 24.5);
/// assert_eq!(fortitude_health(50.0), 25.0);
/// assert_eq!(fortitude_health(51.0), 25.25);
/// ```
pub fn fortitude_health(fortitude: f64) -> f64 {
    if fortitude <= FORTITUDE_BREAKPOINT {
        fortitude / 2.0
    } else {
        (fortitude - FORTITUDE_BREAKPOINT) / 4.0 + FORTITUDE_BREAKPOINT / 2.0
    }
}

/// Unique talent names, in first-seen order.
pub(crate) fn unique_talents(talents: &[String]) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    talents
        .iter()
        .map(String::as_str)
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Total health of a character.
///
/// `traits` is the build's trait map, of which only Vitality counts, and
/// `power` the character's power level. Every equipped talent with a health bonus in the catalog
/// adds it once, even if the talent is listed twice. Talents the catalog
/// doesn't know add nothing.
pub fn compute_health(
    traits: &BTreeMap<String, i64>,
    power: f64,
    fortitude: f64,
    talents: &[String],
    catalog: &TalentCatalog,
) -> f64 {
    let vitality = traits.get(VITALITY_TRAIT).copied().unwrap_or(0) as f64;
    let mut health = vitality * VITALITY_HEALTH + BASE_HEALTH + power * POWER_HEALTH;
    health += fortitude_health(fortitude);

    for talent in unique_talents(talents) {
        match catalog.get(talent) {
            Some(record) => health += record.health(),
            None => debug!(talent, "talent not in catalog, no health bonus"),
        }
    }
    health
}
