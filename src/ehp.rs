//! Effective health points.
//!
//! EHP estimates how much raw damage a build absorbs from an attacker
//! described by a [`ScenarioParams`], after resistances, penetration and
//! flag-based damage reduction.

use crate::build::{CharacterBuild, CombatFlags};
use crate::catalog::GameData;
use crate::error::CalcError;
use crate::resistance::{resistance_coefficient, scale_physical_resistance};
use serde::{Deserialize, Serialize};

/// Resistance Reinforce recalculates incoming damage against.
pub const REINFORCE_RESISTANCE: f64 = 10.0;
/// Penetration resistance Reinforce recalculates incoming damage against.
pub const REINFORCE_PENETRATION_RESISTANCE: f64 = 50.0;

/// Attacker profile and kit totals for one EHP evaluation.
///
/// Serialized with the short keys reporting code uses
/// (`dps`, `pen`, `kithp`, `kitresis`).
///
/// # Examples
///
/// ```rust
/// use shrinestat::ScenarioParams;
///
/// let phys = ScenarioParams::phys_kit();
/// assert_eq!(phys.kit_health, 112.0);
/// assert_eq!(phys.kit_resistance, 33.0);
///
/// let custom = ScenarioParams::custom_kit(130.0, 20.0);
/// assert_eq!(custom.dps, 100.0);
/// assert_eq!(custom.penetration, 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub dps: f64,
    #[serde(rename = "pen")]
    pub penetration: f64,
    #[serde(rename = "kithp")]
    pub kit_health: f64,
    #[serde(rename = "kitresis")]
    pub kit_resistance: f64,
}

impl ScenarioParams {
    pub const DEFAULT_DPS: f64 = 100.0;
    pub const DEFAULT_PENETRATION: f64 = 50.0;

    /// Default scalar scenario: 100 health and 50% physical from the kit.
    pub fn simple() -> Self {
        Self::custom_kit(100.0, 50.0)
    }

    /// Kit built around physical armor.
    pub fn phys_kit() -> Self {
        Self::custom_kit(112.0, 33.0)
    }

    /// Kit built around health.
    pub fn hp_kit() -> Self {
        Self::custom_kit(149.0, 7.0)
    }

    /// Default attacker against a kit whose totals were summed elsewhere.
    pub fn custom_kit(kit_health: f64, kit_resistance: f64) -> Self {
        Self {
            dps: Self::DEFAULT_DPS,
            penetration: Self::DEFAULT_PENETRATION,
            kit_health,
            kit_resistance,
        }
    }

    pub fn validate(&self) -> Result<(), CalcError> {
        let fields = [
            ("dps", self.dps),
            ("pen", self.penetration),
            ("kithp", self.kit_health),
            ("kitresis", self.kit_resistance),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(CalcError::InvalidScenario(format!("{name} is {value}")));
        }
        if self.dps <= 0.0 {
            return Err(CalcError::InvalidScenario(format!(
                "dps must be positive, got {}",
                self.dps
            )));
        }
        Ok(())
    }
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self::simple()
    }
}

/// `numerator / (100 - flag) + offset`, or 1 when the flag is unset.
fn reduction_multiplier(
    flag: &'static str,
    value: f64,
    numerator: f64,
    offset: f64,
) -> Result<f64, CalcError> {
    if value == 0.0 {
        Ok(1.0)
    } else if !value.is_finite() || value >= 100.0 {
        Err(CalcError::InvalidFlag { flag, value })
    } else {
        Ok(numerator / (100.0 - value) + offset)
    }
}

/// Combined multiplier from To The Finish and Chaotic Charm.
pub fn flag_multiplier(flags: &CombatFlags) -> Result<f64, CalcError> {
    let ttf = reduction_multiplier("To The Finish", flags.to_the_finish, 30.0, 0.7)?;
    let charm = reduction_multiplier("Chaotic Charm", flags.chaotic_charm, 25.0, 0.75)?;
    Ok(ttf * charm)
}

/// Intermediate values shared by the scalar and breakdown forms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EhpTerms {
    pub scaled_dps: f64,
    pub coefficient: f64,
    pub flag_multiplier: f64,
}

impl EhpTerms {
    pub(crate) fn new(
        flags: &CombatFlags,
        physical_resistance: f64,
        params: &ScenarioParams,
    ) -> Result<Self, CalcError> {
        params.validate()?;

        let scaled_dps = if flags.reinforce {
            params.dps
                * resistance_coefficient(
                    params.penetration,
                    REINFORCE_RESISTANCE,
                    REINFORCE_PENETRATION_RESISTANCE,
                )
        } else {
            params.dps
        };

        let coefficient =
            resistance_coefficient(params.penetration, physical_resistance, flags.reinforced_armor);
        if coefficient.is_nan() || coefficient <= 0.0 || scaled_dps * coefficient == 0.0 {
            return Err(CalcError::ZeroResistanceCoefficient {
                penetration: params.penetration,
                resistance: physical_resistance,
                penetration_resistance: flags.reinforced_armor,
            });
        }

        Ok(Self {
            scaled_dps,
            coefficient,
            flag_multiplier: flag_multiplier(flags)?,
        })
    }

    /// Unrounded EHP of a health pool plus kit health.
    pub(crate) fn ehp(&self, health: f64, kit_health: f64) -> f64 {
        // The scaled dps is kept on both sides of the division.
        (self.scaled_dps * (health + kit_health)) / (self.scaled_dps * self.coefficient)
            * self.flag_multiplier
    }

    /// Factor turning one point of raw health into EHP.
    pub(crate) fn factor(&self) -> f64 {
        self.flag_multiplier / self.coefficient
    }
}

/// Unrounded EHP for an explicit health pool.
///
/// `physical_resistance` is the already-stacked outfit and kit value.
///
/// ```rust
/// use shrinestat::{effective_health, CombatFlags, ScenarioParams};
///
/// let ehp = effective_health(300.0, &CombatFlags::default(), 50.0, &ScenarioParams::simple()).unwrap();
/// assert_eq!(ehp.round(), 533.0);
/// ```
pub fn effective_health(
    health: f64,
    flags: &CombatFlags,
    physical_resistance: f64,
    params: &ScenarioParams,
) -> Result<f64, CalcError> {
    let terms = EhpTerms::new(flags, physical_resistance, params)?;
    Ok(terms.ehp(health, params.kit_health))
}

/// Physical resistance a build has in a scenario.
pub fn build_physical_resistance(
    build: &CharacterBuild,
    params: &ScenarioParams,
    data: &GameData,
) -> f64 {
    scale_physical_resistance(
        params.kit_resistance,
        build.talents(),
        build.outfit(),
        &data.outfits,
    )
}

/// Rounded EHP of a build in a scenario.
///
/// Exact halves round to the nearest even number.
///
/// # Errors
///
/// Fails when the scenario is invalid, the resistance coefficient is not
/// positive, or a damage-reduction flag is 100 or more.
pub fn compute_ehp(
    build: &CharacterBuild,
    params: &ScenarioParams,
    data: &GameData,
) -> Result<i64, CalcError> {
    let resistance = build_physical_resistance(build, params, data);
    let ehp = effective_health(build.health(), &build.flags(), resistance, params)?;
    Ok(ehp.round_ties_even() as i64)
}
