//! Tests for health, EHP and the contribution breakdown.
//!
//! These tests verify:
//! - EHP of whole builds in the standard scenarios
//! - Breakdown categories, their exclusivity and their agreement with
//!   `compute_ehp`
//! - Combat flags and outfit talents feeding into EHP
//! - Sharing one game data snapshot across threads

use serde_json::json;
use shrinestat::breakdown::{
    stat_talents_label, ATTUNEMENT_TALENTS_LABEL, FINAL_EHP_LABEL, MISC_TALENTS_LABEL, TOTAL_LABEL,
};
use shrinestat::ehp::build_physical_resistance;
use shrinestat::*;

const RACES: &str = r#"{ "Etrean": { "Intelligence": 4, "Agility": 2 } }"#;

const TALENTS: &str = r#"[
    { "name": "Vital", "data": { "stats": { "health": 10 } } },
    { "name": "Brute", "data": { "stats": { "Strength": 20, "health": 5 } } },
    { "name": "Tank", "data": { "stats": { "Strength": 30, "Fortitude": 30, "health": 8 } } },
    { "name": "Stalwart", "data": { "stats": { "Fortitude": 40, "posture": 2 } } },
    { "name": "Frost Ward", "data": { "stats": { "health": 4 }, "attunements": { "Frostdraw": 20 } } },
    { "name": "Padded Armor", "data": { "stats": { "Fortitude": 25 } } },
    { "name": "Steel Scales", "data": { "stats": { "Fortitude": 40 } } }
]"#;

const OUTFITS: &str = r#"[
    { "name": "Ironclad", "resistances": { "physical": 20 } },
    { "name": "Bastion", "resistances": { "physical": 100 } }
]"#;

fn data() -> GameData {
    GameData::from_json_strs(RACES, TALENTS, OUTFITS).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Build payload with the given talents, mantras and final base attributes.
fn build_json(
    power: i64,
    vitality: i64,
    outfit: &str,
    talents: &[&str],
    mantras: &[&str],
    base: serde_json::Value,
) -> String {
    json!({
        "stats": {
            "buildName": "Test",
            "power": power,
            "traits": { "Vitality": vitality },
            "meta": { "Race": "Etrean", "Outfit": outfit }
        },
        "talents": talents,
        "mantras": mantras,
        "preShrine": { "base": base.clone() },
        "attributes": { "base": base, "attunements": { "Frostdraw": 20 } }
    })
    .to_string()
}

// ============================================================================
// Scalar EHP
// ============================================================================

/// Power 26, no talents, unknown outfit, default scenario.
#[test]
fn test_plain_build_ehp() {
    let data = data();
    let build = CharacterBuild::from_json(
        &build_json(26, 0, "Rags", &[], &[], json!({ "Strength": 40 })),
        &data,
    )
    .unwrap();

    // 196 + 26 * 4
    assert_eq!(build.health(), 300.0);
    // (300 + 100) / (1 - 0.5 * 0.5)
    assert_eq!(compute_ehp(&build, &ScenarioParams::simple(), &data).unwrap(), 533);
}

/// A more resistant kit always raises EHP for the same health.
#[test]
fn test_kit_resistance_raises_ehp() {
    let data = data();
    let build = CharacterBuild::from_json(
        &build_json(20, 0, "Ironclad", &[], &[], json!({ "Fortitude": 40 })),
        &data,
    )
    .unwrap();

    let low = compute_ehp(&build, &ScenarioParams::custom_kit(100.0, 10.0), &data).unwrap();
    let high = compute_ehp(&build, &ScenarioParams::custom_kit(100.0, 40.0), &data).unwrap();
    assert!(high > low);
}

/// Full resistance with no penetration lets nothing through.
#[test]
fn test_zero_coefficient_is_an_error() {
    let data = data();
    let build = CharacterBuild::from_json(
        &build_json(20, 0, "Bastion", &[], &[], json!({ "Strength": 40 })),
        &data,
    )
    .unwrap();
    let params = ScenarioParams {
        penetration: 0.0,
        ..ScenarioParams::custom_kit(0.0, 0.0)
    };

    let err = compute_ehp(&build, &params, &data).unwrap_err();
    assert!(matches!(err, CalcError::ZeroResistanceCoefficient { .. }));
    assert!(breakdown_ehp(&build, &params, &data).is_err());
}

// ============================================================================
// Breakdown
// ============================================================================

fn breakdown_build(data: &GameData) -> CharacterBuild {
    CharacterBuild::from_json(
        &build_json(
            10,
            2,
            "Ironclad",
            &["Brute", "Tank", "Stalwart", "Frost Ward", "Vital", "Unknown Talent"],
            &[],
            json!({ "Strength": 60, "Fortitude": 55 }),
        ),
        data,
    )
    .unwrap()
}

/// Each talent is counted once, in the first category it qualifies for.
#[test]
fn test_breakdown_categories() {
    let data = data();
    let build = breakdown_build(&data);
    let breakdown = breakdown_ehp(&build, &ScenarioParams::phys_kit(), &data).unwrap();

    let labels: Vec<&str> = breakdown.entries.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Trait",
            "Power",
            "Base HP",
            "Strength health talents",
            "Fortitude",
            ATTUNEMENT_TALENTS_LABEL,
            MISC_TALENTS_LABEL,
            TOTAL_LABEL,
            FINAL_EHP_LABEL,
        ]
    );

    assert_eq!(breakdown.get("Trait"), Some(20.0));
    assert_eq!(breakdown.get("Power"), Some(40.0));
    assert_eq!(breakdown.get("Base HP"), Some(196.0));
    // Brute and Tank; Tank also requires Fortitude but Strength comes first.
    assert_eq!(breakdown.get(&stat_talents_label("Strength")), Some(13.0));
    assert_eq!(breakdown.get(&stat_talents_label("Fortitude")), None);
    assert_eq!(breakdown.get("Fortitude"), Some(26.25));
    assert_eq!(breakdown.get(ATTUNEMENT_TALENTS_LABEL), Some(4.0));
    assert_eq!(breakdown.get(MISC_TALENTS_LABEL), Some(10.0));
}

/// Total equals the build's health, and the parts sum to the total.
#[test]
fn test_breakdown_total_matches_health() {
    let data = data();
    let build = breakdown_build(&data);
    let breakdown = breakdown_ehp(&build, &ScenarioParams::hp_kit(), &data).unwrap();

    assert_eq!(build.health(), 309.25);
    assert_eq!(breakdown.total(), Some(build.health()));

    let parts: f64 = breakdown
        .entries
        .iter()
        .filter(|(l, _)| l != TOTAL_LABEL && l != FINAL_EHP_LABEL)
        .map(|(_, v)| v)
        .sum();
    assert_eq!(parts, build.health());
}

/// Final EHP is the same number the scalar calculator returns.
#[test]
fn test_breakdown_final_matches_compute_ehp() {
    let data = data();
    let build = breakdown_build(&data);

    for params in [
        ScenarioParams::simple(),
        ScenarioParams::phys_kit(),
        ScenarioParams::hp_kit(),
    ] {
        let ehp = compute_ehp(&build, &params, &data).unwrap();
        let breakdown = breakdown_ehp(&build, &params, &data).unwrap();
        assert_eq!(breakdown.final_ehp(), Some(ehp as f64));
    }
}

/// An exact half rounds to the even neighbour in both forms.
#[test]
fn test_final_ehp_ties_round_to_even() {
    let data = data();
    let build = CharacterBuild::from_json(
        &build_json(0, 0, "Rags", &[], &[], json!({ "Fortitude": 52 })),
        &data,
    )
    .unwrap();
    let params = ScenarioParams::custom_kit(101.0, 0.0);

    // 196 + 25 + 2 / 4, coefficient 1, so raw EHP is 221.5 + 101.
    assert_eq!(build.health(), 221.5);
    assert_eq!(compute_ehp(&build, &params, &data).unwrap(), 322);

    let breakdown = breakdown_ehp(&build, &params, &data).unwrap();
    assert_eq!(breakdown.final_ehp(), Some(322.0));
}

/// Scaled entries use the scenario's health-to-EHP factor.
#[test]
fn test_breakdown_scaling() {
    let data = data();
    let build = breakdown_build(&data);
    let params = ScenarioParams::phys_kit();
    let breakdown = breakdown_ehp(&build, &params, &data).unwrap();

    let resistance = build_physical_resistance(&build, &params, &data);
    let factor = 1.0 / resistance_coefficient(params.penetration, resistance, 0.0);
    assert!(approx(breakdown.ehp_factor(), factor));
    assert!(approx(breakdown.kit_ehp(), 112.0 * factor));

    let scaled = breakdown.scaled();
    assert_eq!(scaled.len(), breakdown.entries.len() - 1);
    assert!(approx(scaled[2].1, 196.0 * factor));
}

// ============================================================================
// Flags and outfit talents
// ============================================================================

/// To The Finish and Chaotic Charm multiply EHP.
#[test]
fn test_damage_reduction_flags() {
    let data = data();
    let base = json!({ "Fortitude": 55, "Charisma": 40 });
    let plain =
        CharacterBuild::from_json(&build_json(20, 0, "Ironclad", &[], &[], base.clone()), &data)
            .unwrap();
    let flagged = CharacterBuild::from_json(
        &build_json(20, 0, "Ironclad", &["To The Finish", "Chaotic Charm"], &[], base),
        &data,
    )
    .unwrap();

    let flags = flagged.flags();
    assert_eq!(flags.to_the_finish, 10.0);
    assert!(approx(flags.chaotic_charm, 6.0));

    let params = ScenarioParams::phys_kit();
    let resistance = build_physical_resistance(&plain, &params, &data);
    let without = effective_health(plain.health(), &plain.flags(), resistance, &params).unwrap();
    let with = effective_health(flagged.health(), &flags, resistance, &params).unwrap();

    let multiplier = (30.0 / 90.0 + 0.7) * (25.0 / 94.0 + 0.75);
    assert!(approx(with, without * multiplier));
}

/// Reinforce scales both sides of the ratio, so EHP doesn't move.
#[test]
fn test_reinforce_leaves_ehp_unchanged() {
    let data = data();
    let base = json!({ "Fortitude": 60 });
    let plain =
        CharacterBuild::from_json(&build_json(20, 0, "Ironclad", &[], &[], base.clone()), &data)
            .unwrap();
    let reinforced =
        CharacterBuild::from_json(&build_json(20, 0, "Ironclad", &[], &["Reinforce"], base), &data)
            .unwrap();

    assert!(reinforced.flags().reinforce);
    let params = ScenarioParams::phys_kit();
    assert_eq!(
        compute_ehp(&plain, &params, &data).unwrap(),
        compute_ehp(&reinforced, &params, &data).unwrap()
    );
}

/// Reinforced Armor's penetration resistance raises EHP.
#[test]
fn test_reinforced_armor_raises_ehp() {
    let data = data();
    let base = json!({ "Fortitude": 75 });
    let plain =
        CharacterBuild::from_json(&build_json(20, 0, "Ironclad", &[], &[], base.clone()), &data)
            .unwrap();
    let armored = CharacterBuild::from_json(
        &build_json(20, 0, "Ironclad", &["Reinforced Armor"], &[], base),
        &data,
    )
    .unwrap();

    assert_eq!(armored.flags().reinforced_armor, 18.0);
    let params = ScenarioParams::simple();
    assert!(compute_ehp(&armored, &params, &data).unwrap() > compute_ehp(&plain, &params, &data).unwrap());
}

/// Padded Armor with Steel Scales adds 3 physical to the outfit first.
#[test]
fn test_padded_armor_with_steel_scales() {
    let data = data();
    let base = json!({ "Fortitude": 40 });
    let one = CharacterBuild::from_json(
        &build_json(20, 0, "Ironclad", &["Padded Armor"], &[], base.clone()),
        &data,
    )
    .unwrap();
    let both = CharacterBuild::from_json(
        &build_json(20, 0, "Ironclad", &["Padded Armor", "Steel Scales"], &[], base),
        &data,
    )
    .unwrap();

    let params = ScenarioParams::simple();
    // 20 stacked with 50.
    assert!(approx(build_physical_resistance(&one, &params, &data), 60.0));
    // 20 stacked with 3 gives 22.4, then stacked with 50.
    assert!(approx(build_physical_resistance(&both, &params, &data), 61.2));
    assert!(compute_ehp(&both, &params, &data).unwrap() >= compute_ehp(&one, &params, &data).unwrap());
}

// ============================================================================
// Shared snapshots
// ============================================================================

/// Readers keep the snapshot they took while a reload is published.
#[test]
fn test_concurrent_snapshot_readers() {
    let store = GameDataStore::new(data());
    let payload = build_json(26, 0, "Rags", &["Vital"], &[], json!({ "Strength": 40 }));

    let results: Vec<i64> = std::thread::scope(|scope| {
        let readers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let snapshot = store.snapshot();
                    let build = CharacterBuild::from_json(&payload, &snapshot).unwrap();
                    compute_ehp(&build, &ScenarioParams::simple(), &snapshot).unwrap()
                })
            })
            .collect();

        let boosted = TALENTS.replace(r#""health": 10"#, r#""health": 20"#);
        store.replace(GameData::from_json_strs(RACES, &boosted, OUTFITS).unwrap());

        readers.into_iter().map(|r| r.join().unwrap()).collect()
    });

    // 310 / 0.75 + 100 / 0.75 before the reload, 320 after.
    for ehp in results {
        assert!(ehp == 547 || ehp == 560, "unexpected ehp {ehp}");
    }

    let build = CharacterBuild::from_json(&payload, &store.snapshot()).unwrap();
    assert_eq!(build.health(), 320.0);
}
