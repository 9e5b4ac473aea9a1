//! Shrine of Order simulation.
//!
//! The shrine takes every point a character has invested, beyond what
//! their race grants for free, and spreads it evenly over the attributes
//! that were invested in. No non-attunement attribute may fall more than
//! [`MAXIMUM_REDUCTION`] below its pre-shrine value; points those
//! attributes keep are taken evenly from the rest.
//!
//! ```text
//! [pre-shrine map] → even split → bottleneck passes → floor → refund → [post-order map]
//! ```

use crate::attribute::{AttributeId, AttributeMap, GroupedAttributes};
use crate::catalog::RaceBaselines;
use crate::error::CalcError;
use crate::numeric::Fraction;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Largest drop a non-attunement attribute may take.
pub const MAXIMUM_REDUCTION: i64 = 25;

/// Running point budget for one redistribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerContext {
    pub race: String,
    pub points_spent: i64,
}

impl PlayerContext {
    pub fn new(race: impl Into<String>) -> Self {
        Self {
            race: race.into(),
            points_spent: 0,
        }
    }

    /// Add the net investment of `attributes` to the running total.
    pub fn spend(&mut self, attributes: &AttributeMap, races: &RaceBaselines) {
        self.points_spent += net_points(attributes, &self.race, races);
    }
}

/// Points invested beyond the race baseline, summed over every attribute.
///
/// Attributes below their baseline contribute a negative amount.
pub fn net_points(attributes: &AttributeMap, race: &str, races: &RaceBaselines) -> i64 {
    attributes
        .iter()
        .map(|(id, value)| value - races.baseline(race, id.as_str()))
        .sum()
}

/// Full result of a shrine simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderOutcome {
    /// Post-order attribute values. Same key set as the input.
    pub attributes: AttributeMap,
    /// Net points available for redistribution.
    pub points_start: i64,
    /// Net points spent after flooring, before any refund.
    pub points_after_floor: i64,
    /// `points_start - points_after_floor`.
    pub spare_points: i64,
    /// Attributes the shrine redistributed into.
    pub affected: Vec<AttributeId>,
    /// Whether every affected attribute got one point back.
    pub refunded: bool,
}

/// Redistribute a grouped attribute map and return the flattened result.
///
/// # Examples
///
/// ```rust
/// use shrinestat::{redistribute, AttributeMap, GroupedAttributes};
/// use shrinestat::catalog::RaceBaselines;
///
/// let pre = GroupedAttributes {
///     base: AttributeMap::from_pairs([("Strength", 90), ("Agility", 10)]),
///     ..Default::default()
/// };
/// let post = redistribute(&pre, "Human", &RaceBaselines::default()).unwrap();
///
/// // Strength may only drop by 25; Agility absorbs the rest.
/// assert_eq!(post.get("Strength"), 65);
/// assert_eq!(post.get("Agility"), 35);
/// ```
pub fn redistribute(
    attributes: &GroupedAttributes,
    race: &str,
    races: &RaceBaselines,
) -> Result<AttributeMap, CalcError> {
    simulate_order(&attributes.flatten(), race, races).map(|outcome| outcome.attributes)
}

/// Run the shrine on a flat attribute map.
///
/// # Errors
///
/// Returns [`CalcError::NoInvestedAttributes`] when no attribute has net
/// investment, since there is nothing to divide the budget across.
pub fn simulate_order(
    attributes: &AttributeMap,
    race: &str,
    races: &RaceBaselines,
) -> Result<OrderOutcome, CalcError> {
    if races.get(race).is_none() {
        debug!(race, "race not in baseline table, using zero baseline");
    }

    let mut player = PlayerContext::new(race);
    player.spend(attributes, races);
    let points_start = player.points_spent;
    let preshrine = attributes;

    // An attribute sitting exactly at a non-zero race baseline was never invested in.
    let affected: Vec<AttributeId> = attributes
        .iter()
        .filter(|(id, value)| {
            let baseline = races.baseline(race, id.as_str());
            *value > 0 && !(baseline > 0 && *value == baseline)
        })
        .map(|(id, _)| id.clone())
        .collect();

    if affected.is_empty() {
        return Err(CalcError::NoInvestedAttributes {
            race: race.to_string(),
        });
    }

    let even_share = Fraction::new(points_start as i128, affected.len() as i128);
    let mut values = vec![even_share; affected.len()];
    let mut bottlenecked = vec![false; affected.len()];
    let cap = Fraction::from_int(MAXIMUM_REDUCTION);

    // Each pass clamps at least one new attribute or stops, so this runs
    // at most `affected.len()` times.
    let mut pass = 0;
    loop {
        pass += 1;
        let mut pool = Fraction::zero();
        let mut clamped = 0;

        for (idx, id) in affected.iter().enumerate() {
            if bottlenecked[idx] || id.is_attunement() {
                continue;
            }
            let pre = Fraction::from_int(preshrine.get(id.as_str()));
            if pre - values[idx] > cap {
                let floor_value = pre - cap;
                pool = pool + (floor_value - values[idx]);
                values[idx] = floor_value;
                bottlenecked[idx] = true;
                clamped += 1;
            }
        }

        if clamped == 0 {
            break;
        }

        let remaining = bottlenecked.iter().filter(|b| !**b).count();
        trace!(pass, clamped, remaining, pool = pool.to_f64(), "bottleneck pass");
        if remaining == 0 {
            break;
        }

        let share = pool / Fraction::from_int(remaining as i64);
        for (value, _) in values
            .iter_mut()
            .zip(bottlenecked.iter())
            .filter(|(_, b)| !**b)
        {
            *value = *value - share;
        }
    }

    let mut post = attributes.clone();
    for (id, value) in affected.iter().zip(values.iter()) {
        post.insert(id.clone(), value.floor());
    }

    let points_after_floor = net_points(&post, race, races);
    let spare_points = points_start - points_after_floor;

    // Only a remainder larger than the affected count is refunded, one point each.
    let refunded = spare_points > affected.len() as i64;
    if refunded {
        for id in &affected {
            let value = post.get(id.as_str());
            post.insert(id.clone(), value + 1);
        }
    }

    debug!(
        race,
        points_start,
        points_after_floor,
        spare_points,
        affected = affected.len(),
        refunded,
        "shrine of order simulated"
    );

    Ok(OrderOutcome {
        attributes: post,
        points_start,
        points_after_floor,
        spare_points,
        affected,
        refunded,
    })
}
