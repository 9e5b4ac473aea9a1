//! # shrinestat - Shrine of Order and EHP calculators for character builds
//!
//! A pure, deterministic calculation core for build reporting:
//! - **Shrine of Order** simulation (even redistribution of invested
//!   attribute points with a per-attribute reduction cap)
//! - **Health** totals with the Fortitude breakpoint and talent bonuses
//! - **Resistance** stacking and penetration interaction
//! - **Effective health points** for an attacker/kit scenario, as a
//!   scalar or as an itemized breakdown
//!
//! ## Core Concepts
//!
//! ### Data flow
//!
//! ```text
//! [BuildRecord] + [GameData] → [CharacterBuild] → compute_ehp / breakdown_ehp
//!                                     │
//!                                     └→ redistribute (pre-shrine map) → post-order map
//! ```
//!
//! 1. **GameData** holds the static catalogs: race baselines, talents and
//!    outfits. It is loaded once and only read afterwards.
//! 2. **CharacterBuild** is constructed once from the build service's
//!    payload; its health and combat flags are fixed at construction.
//! 3. Every calculation is a plain function over borrowed data, so a
//!    single `GameData` snapshot can serve concurrent requests.
//!
//! ## Example
//!
//! ```rust
//! use shrinestat::*;
//!
//! let data = GameData::from_json_strs(
//!     r#"{ "Etrean": { "Intelligence": 4 } }"#,
//!     r#"[{ "name": "Vital", "data": { "stats": { "health": 10 } } }]"#,
//!     r#"[{ "name": "Knight Armor", "resistances": { "physical": 20 } }]"#,
//! )
//! .unwrap();
//!
//! let build = CharacterBuild::from_json(
//!     r#"{
//!         "stats": {
//!             "buildName": "Knight",
//!             "power": 20,
//!             "traits": { "Vitality": 2 },
//!             "meta": { "Race": "Etrean", "Outfit": "Knight Armor" }
//!         },
//!         "talents": ["Vital"],
//!         "preShrine": { "base": { "Strength": 90, "Agility": 10, "Intelligence": 4 } },
//!         "attributes": { "base": { "Strength": 65, "Agility": 35, "Fortitude": 40, "Intelligence": 4 } }
//!     }"#,
//!     &data,
//! )
//! .unwrap();
//!
//! // 20 + 196 + 80 + 20 + 10
//! assert_eq!(build.health(), 326.0);
//!
//! let post = redistribute(build.pre_shrine(), build.race(), &data.races).unwrap();
//! assert_eq!(post.get("Strength"), 65);
//! assert_eq!(post.get("Intelligence"), 4);
//!
//! let ehp = compute_ehp(&build, &ScenarioParams::simple(), &data).unwrap();
//! let breakdown = breakdown_ehp(&build, &ScenarioParams::simple(), &data).unwrap();
//! assert_eq!(breakdown.final_ehp(), Some(ehp as f64));
//! ```
//!
//! ## Modules
//!
//! - [`attribute`] - Attribute names, groups and maps
//! - [`numeric`] - Exact fractions for the shrine simulation
//! - [`catalog`] - Static game data and snapshot store
//! - [`shrine`] - Shrine of Order redistribution
//! - [`build`] - Build payloads, character builds and combat flags
//! - [`health`] - Health pool
//! - [`resistance`] - Resistance coefficient and stacking
//! - [`ehp`] - Scenarios and effective health
//! - [`breakdown`] - Itemized health/EHP contributions
//! - [`evolution`] - Pre/order/post comparison rows
//! - [`error`] - Error types

pub mod attribute;
pub mod breakdown;
pub mod build;
pub mod catalog;
pub mod ehp;
pub mod error;
pub mod evolution;
pub mod health;
pub mod numeric;
pub mod resistance;
pub mod shrine;

// Re-export main types for convenience
pub use attribute::{AttributeGroup, AttributeId, AttributeMap, GroupedAttributes};
pub use build::{BuildRecord, BuildSummary, CharacterBuild, CombatFlags};
pub use catalog::{GameData, GameDataStore};
pub use error::CalcError;

// Re-export the calculations
pub use breakdown::{breakdown_ehp, ContributionBreakdown};
pub use ehp::{compute_ehp, effective_health, ScenarioParams};
pub use evolution::{stat_evolution, EvolutionRow};
pub use health::compute_health;
pub use resistance::{resistance_coefficient, scale_physical_resistance};
pub use shrine::{redistribute, simulate_order, OrderOutcome, PlayerContext, MAXIMUM_REDUCTION};
