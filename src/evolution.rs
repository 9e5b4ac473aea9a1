//! Pre-shrine, order and post-shrine comparison rows.
//!
//! Reporting code plots how each attribute moves from the pre-shrine
//! build, through the simulated Shrine of Order, to the build's actual
//! final values. This module produces the rows; drawing them is left to
//! the caller.

use crate::attribute::{AttributeGroup, AttributeId};
use crate::build::CharacterBuild;
use crate::catalog::RaceBaselines;
use crate::error::CalcError;
use crate::shrine::simulate_order;
use serde::{Deserialize, Serialize};

/// One attribute's value before the shrine, after it, and in the final build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionRow {
    pub attribute: AttributeId,
    /// `None` for attributes outside the three known groups.
    pub group: Option<AttributeGroup>,
    pub pre: i64,
    pub order: i64,
    pub post: i64,
}

impl EvolutionRow {
    /// The player reinvested into this attribute after the shrine.
    pub fn reinvested(&self) -> bool {
        self.order != self.post
    }
}

/// Comparison rows for every attribute that is non-zero at some stage.
///
/// Rows come in base, weapon, attunement order, each group in canonical
/// order, followed by any other attributes the pre-shrine map carries.
pub fn stat_evolution(
    build: &CharacterBuild,
    races: &RaceBaselines,
) -> Result<Vec<EvolutionRow>, CalcError> {
    let pre = build.pre_shrine().flatten();
    let post = build.post_shrine().flatten();
    let order = simulate_order(&pre, build.race(), races)?.attributes;

    let mut names: Vec<&str> = AttributeGroup::ALL
        .iter()
        .flat_map(|group| group.members().iter().copied())
        .filter(|name| pre.contains(name))
        .collect();
    names.extend(
        pre.keys()
            .map(|id| id.as_str())
            .filter(|name| AttributeGroup::of(name).is_none()),
    );

    let rows = names
        .into_iter()
        .map(|name| EvolutionRow {
            attribute: AttributeId::new(name),
            group: AttributeGroup::of(name),
            pre: pre.get(name),
            order: order.get(name),
            post: post.get(name),
        })
        .filter(|row| row.pre != 0 || row.order != 0 || row.post != 0)
        .collect();

    Ok(rows)
}
