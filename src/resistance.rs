//! Resistance interactions.
//!
//! Two resistance sources never add linearly. Each source only applies
//! to the damage the other let through, so `a` and `b` percent combine
//! into `a + b - a * b / 100`.

use crate::catalog::OutfitCatalog;

/// Talent pair that grants extra physical resistance on the outfit.
pub const PADDED_ARMOR: &str = "Padded Armor";
pub const STEEL_SCALES: &str = "Steel Scales";
/// Physical resistance added when both talents are equipped.
pub const SCALES_BONUS: f64 = 3.0;

/// Fraction of incoming damage that gets through.
///
/// `penetration` bypasses part of `resistance`, and
/// `penetration_resistance` blocks part of that bypass. All three are
/// percentages.
///
/// ```rust
/// use shrinestat::resistance::resistance_coefficient;
///
/// assert_eq!(resistance_coefficient(50.0, 50.0, 0.0), 0.75);
/// assert_eq!(resistance_coefficient(0.0, 40.0, 30.0), 0.6);
/// assert_eq!(resistance_coefficient(80.0, 0.0, 10.0), 1.0);
/// ```
pub fn resistance_coefficient(
    penetration: f64,
    resistance: f64,
    penetration_resistance: f64,
) -> f64 {
    1.0 - ((resistance / 100.0)
        * (1.0 - (penetration * (1.0 - penetration_resistance / 100.0) / 100.0)))
}

/// Combine two percentage resistances with diminishing returns.
pub fn stack_diminishing(base: f64, bonus: f64) -> f64 {
    base + bonus - (bonus * base / 100.0)
}

/// Physical resistance from the outfit stacked with a kit's bonus.
///
/// An outfit missing from the catalog counts as 0 physical resistance.
pub fn scale_physical_resistance(
    kit_resistance: f64,
    talents: &[String],
    outfit: &str,
    outfits: &OutfitCatalog,
) -> f64 {
    let mut outfit_phys = outfits.physical(outfit);
    let has = |name: &str| talents.iter().any(|t| t == name);
    if has(PADDED_ARMOR) && has(STEEL_SCALES) {
        outfit_phys = stack_diminishing(outfit_phys, SCALES_BONUS);
    }
    stack_diminishing(outfit_phys, kit_resistance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn outfits() -> OutfitCatalog {
        OutfitCatalog::from_json(r#"[{ "name": "Ironclad", "resistances": { "physical": 20 } }]"#)
            .unwrap()
    }

    #[test]
    fn test_zero_penetration_is_full_resistance() {
        for r in [0.0, 10.0, 55.0] {
            for pr in [0.0, 50.0, 90.0] {
                assert!(approx(resistance_coefficient(0.0, r, pr), 1.0 - r / 100.0));
            }
        }
    }

    #[test]
    fn test_zero_resistance_lets_everything_through() {
        for p in [0.0, 25.0, 100.0] {
            for pr in [0.0, 50.0, 100.0] {
                assert_eq!(resistance_coefficient(p, 0.0, pr), 1.0);
            }
        }
    }

    #[test]
    fn test_penetration_resistance_blocks_bypass() {
        // Full penetration resistance leaves the raw resistance untouched.
        assert!(approx(resistance_coefficient(50.0, 40.0, 100.0), 0.6));
        // Reinforce's fixed recalculation.
        assert!(approx(resistance_coefficient(50.0, 10.0, 50.0), 0.925));
    }

    #[test]
    fn test_stack_diminishing() {
        assert_eq!(stack_diminishing(0.0, 50.0), 50.0);
        assert_eq!(stack_diminishing(20.0, 50.0), 60.0);
    }

    #[test]
    fn test_scale_physical_without_talents() {
        let phys = scale_physical_resistance(33.0, &[], "Ironclad", &outfits());
        assert!(approx(phys, 20.0 + 33.0 - 33.0 * 0.2));
    }

    #[test]
    fn test_scale_physical_needs_both_talents() {
        let one = vec![PADDED_ARMOR.to_string()];
        let both = vec![PADDED_ARMOR.to_string(), STEEL_SCALES.to_string()];

        let base = scale_physical_resistance(0.0, &one, "Ironclad", &outfits());
        assert_eq!(base, 20.0);

        let boosted = scale_physical_resistance(0.0, &both, "Ironclad", &outfits());
        assert!(approx(boosted, 20.0 + 3.0 - 0.6));
    }

    #[test]
    fn test_unknown_outfit_uses_kit_only() {
        assert_eq!(scale_physical_resistance(50.0, &[], "Rags", &outfits()), 50.0);
    }
}
