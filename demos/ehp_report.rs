//! Build report example: Shrine of Order, stat evolution and EHP breakdowns
//!
//! This example demonstrates:
//! - Loading game data from JSON
//! - Simulating the Shrine of Order on a pre-shrine build
//! - Comparing pre-shrine, order and post-shrine attributes
//! - Scalar EHP and itemized breakdowns for both kit presets
//!
//! Run with `RUST_LOG=shrinestat=debug` to see catalog misses and the
//! shrine's bottleneck passes.

use shrinestat::*;

const RACES: &str = r#"{
    "Etrean": { "Intelligence": 4, "Agility": 2 },
    "Celtor": { "Charisma": 4, "Intelligence": 2 }
}"#;

const TALENTS: &str = r#"[
    { "name": "Vital", "data": { "stats": { "health": 10 } } },
    { "name": "Hardened", "data": { "stats": { "Fortitude": 40, "health": 7.5, "posture": 1 } } },
    { "name": "Frost Ward", "data": { "stats": { "health": 4 }, "attunements": { "Frostdraw": 30 } } },
    { "name": "Quick Step", "data": { "stats": { "Agility": 20, "passive agility": 5 } } }
]"#;

const OUTFITS: &str = r#"[
    { "name": "Ironclad", "resistances": { "physical": 20 } },
    { "name": "Scholar Robes", "resistances": { "physical": 5 } }
]"#;

const BUILD: &str = r#"{
    "stats": {
        "buildName": "Frost Warden",
        "buildDescription": "Fortitude frontliner with a frost kit",
        "power": 20,
        "traits": { "Vitality": 3 },
        "meta": { "Race": "Etrean", "Outfit": "Ironclad" }
    },
    "talents": ["Vital", "Hardened", "Frost Ward", "Quick Step", "To The Finish"],
    "mantras": ["Reinforce"],
    "preShrine": {
        "base": { "Strength": 0, "Fortitude": 90, "Agility": 10, "Intelligence": 4 },
        "weapon": { "Heavy Wep.": 40 },
        "attunement": { "Frostdraw": 60 }
    },
    "attributes": {
        "base": { "Strength": 0, "Fortitude": 70, "Agility": 40, "Intelligence": 4 },
        "weapon": { "Heavy Wep.": 50 },
        "attunements": { "Frostdraw": 70 }
    }
}"#;

fn main() -> Result<(), CalcError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let data = GameData::from_json_strs(RACES, TALENTS, OUTFITS)?;
    let build = CharacterBuild::from_json(BUILD, &data)?;

    println!("=== {} ===\n", build.name());
    println!("{}\n", build.description());

    // ===== Shrine of Order =====
    println!("1. Shrine of Order\n");

    let outcome = simulate_order(&build.pre_shrine().flatten(), build.race(), &data.races)?;
    println!(
        "  Points: {} start, {} after flooring, {} spare{}",
        outcome.points_start,
        outcome.points_after_floor,
        outcome.spare_points,
        if outcome.refunded { " (refunded)" } else { "" }
    );
    println!(
        "  {:<14} {:>5} {:>5} {:>5}",
        "Attribute", "Pre", "Order", "Post"
    );
    for row in stat_evolution(&build, &data.races)? {
        let marker = if row.reinvested() { " *" } else { "" };
        println!(
            "  {:<14} {:>5} {:>5} {:>5}{}",
            row.attribute, row.pre, row.order, row.post, marker
        );
    }
    println!("  (* reinvested after the shrine)\n");

    // ===== Health =====
    println!("2. Health\n");

    let summary = build.summary(&data);
    println!("  Health:          {:.2}", summary.base_health);
    println!("  Posture:         {:.2}", summary.posture);
    println!("  Passive agility: {:.2}", summary.passive_agility);
    println!("  Flags:           {:?}\n", build.flags().as_array());

    // ===== EHP =====
    println!("3. Effective health\n");

    for (name, params) in [
        ("Simple", ScenarioParams::simple()),
        ("Phys kit", ScenarioParams::phys_kit()),
        ("HP kit", ScenarioParams::hp_kit()),
    ] {
        println!("  {name}: {} EHP", compute_ehp(&build, &params, &data)?);
    }

    for (name, params) in [
        ("Phys kit", ScenarioParams::phys_kit()),
        ("HP kit", ScenarioParams::hp_kit()),
    ] {
        let breakdown = breakdown_ehp(&build, &params, &data)?;
        println!("\n  {name} breakdown (x{:.3}):", breakdown.ehp_factor());
        for ((label, raw), (_, scaled)) in breakdown.entries.iter().zip(breakdown.scaled()) {
            println!("    {label:<28} {raw:>8.2} {scaled:>9.2}");
        }
        if let Some(ehp) = breakdown.final_ehp() {
            println!("    {:<28} {:>18.0}", "Final EHP", ehp);
        }
        println!("    Kit health adds {:.2} EHP", breakdown.kit_ehp());
    }

    Ok(())
}
