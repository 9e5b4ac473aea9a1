//! Attribute identifiers and attribute maps.
//!
//! Provides `AttributeId`, an interned attribute name, `AttributeGroup`
//! for the three attribute categories, and the `AttributeMap` /
//! `GroupedAttributes` containers a build carries.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Base attribute names.
pub const BASE_ATTRIBUTES: [&str; 6] = [
    "Strength",
    "Fortitude",
    "Agility",
    "Intelligence",
    "Willpower",
    "Charisma",
];

/// Weapon proficiency names, as the build service spells them.
pub const WEAPON_ATTRIBUTES: [&str; 3] = ["Heavy Wep.", "Medium Wep.", "Light Wep."];

/// Elemental attunement names.
pub const ATTUNEMENTS: [&str; 7] = [
    "Flamecharm",
    "Frostdraw",
    "Thundercall",
    "Galebreathe",
    "Shadowcast",
    "Ironsing",
    "Bloodrend",
];

/// Interned attribute name.
///
/// Uses `Arc<str>` so cloning is cheap and comparison is by content.
///
/// # Examples
///
/// ```rust
/// use shrinestat::AttributeId;
///
/// let str_id = AttributeId::new("Strength");
/// let same: AttributeId = "Strength".into();
/// assert_eq!(str_id, same);
/// assert!(!str_id.is_attunement());
/// assert!(AttributeId::new("Flamecharm").is_attunement());
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct AttributeId(Arc<str>);

impl Serialize for AttributeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AttributeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(AttributeId::from(s))
    }
}

impl AttributeId {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The group this attribute belongs to, if it is a known name.
    pub fn group(&self) -> Option<AttributeGroup> {
        AttributeGroup::of(self.as_str())
    }

    /// Attunements are exempt from the shrine's reduction cap.
    pub fn is_attunement(&self) -> bool {
        self.group() == Some(AttributeGroup::Attunement)
    }
}

impl From<&str> for AttributeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AttributeId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl Borrow<str> for AttributeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AttributeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// The three disjoint attribute categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttributeGroup {
    Base,
    Weapon,
    Attunement,
}

impl AttributeGroup {
    /// Classify an attribute name. Unknown names have no group.
    pub fn of(name: &str) -> Option<Self> {
        if BASE_ATTRIBUTES.contains(&name) {
            Some(AttributeGroup::Base)
        } else if WEAPON_ATTRIBUTES.contains(&name) {
            Some(AttributeGroup::Weapon)
        } else if ATTUNEMENTS.contains(&name) {
            Some(AttributeGroup::Attunement)
        } else {
            None
        }
    }

    /// Canonical member names in display order.
    pub fn members(self) -> &'static [&'static str] {
        match self {
            AttributeGroup::Base => &BASE_ATTRIBUTES,
            AttributeGroup::Weapon => &WEAPON_ATTRIBUTES,
            AttributeGroup::Attunement => &ATTUNEMENTS,
        }
    }

    pub const ALL: [AttributeGroup; 3] = [
        AttributeGroup::Base,
        AttributeGroup::Weapon,
        AttributeGroup::Attunement,
    ];
}

/// Mapping from attribute name to integer value.
///
/// Reads of absent attributes return 0. The key set is whatever was
/// inserted; nothing in this crate adds or removes keys from a map it
/// was handed.
///
/// # Examples
///
/// ```rust
/// use shrinestat::AttributeMap;
///
/// let map = AttributeMap::from_pairs([("Strength", 40), ("Agility", 20)]);
/// assert_eq!(map.get("Strength"), 40);
/// assert_eq!(map.get("Charisma"), 0);
/// assert_eq!(map.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap {
    values: BTreeMap<AttributeId, i64>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<AttributeId>,
        I: IntoIterator<Item = (K, i64)>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> i64 {
        self.values.get(name).copied().unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn insert(&mut self, id: impl Into<AttributeId>, value: i64) {
        self.values.insert(id.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &AttributeId> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributeId, i64)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }

    /// Add every entry of `other` into this map, summing shared keys.
    pub fn merge(&mut self, other: &AttributeMap) {
        for (id, value) in other.iter() {
            *self.values.entry(id.clone()).or_insert(0) += value;
        }
    }
}

/// Attributes as the build service groups them.
///
/// The service names the attunement block `attunement` in pre-shrine
/// data and `attunements` in post-shrine data; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedAttributes {
    #[serde(default)]
    pub base: AttributeMap,
    #[serde(default)]
    pub weapon: AttributeMap,
    #[serde(default, alias = "attunements")]
    pub attunement: AttributeMap,
}

impl GroupedAttributes {
    /// Merge the three groups into one map.
    pub fn flatten(&self) -> AttributeMap {
        let mut flat = AttributeMap::new();
        flat.merge(&self.weapon);
        flat.merge(&self.attunement);
        flat.merge(&self.base);
        flat
    }
}
