//! Ship upgrade catalog and availability rules.

use std::{collections::BTreeMap, fmt};

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    content::TechCatalog,
    error::{GameError, GameResult},
};

/// Ship attributes an upgrade can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipAttribute {
    /// Maximum cargo units.
    CargoCapacity,
    /// Hull tier.
    ShipLevel,
    /// Fuel burned per distance unit; lower is better.
    FuelEfficiency,
    /// Maximum fuel units.
    FuelTankCapacity,
    /// Passengers the life support can sustain.
    LifeSupportExpansion,
    /// Passenger berths.
    PassengerPodCapacity,
}

impl ShipAttribute {
    /// Whether a smaller value is the improvement.
    pub fn lower_is_better(self) -> bool {
        matches!(self, ShipAttribute::FuelEfficiency)
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ShipAttribute::CargoCapacity => "cargo capacity",
            ShipAttribute::ShipLevel => "ship level",
            ShipAttribute::FuelEfficiency => "fuel burn per distance",
            ShipAttribute::FuelTankCapacity => "fuel tank",
            ShipAttribute::LifeSupportExpansion => "life support",
            ShipAttribute::PassengerPodCapacity => "passenger pods",
        }
    }
}

impl fmt::Display for ShipAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A purchasable upgrade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Upgrade {
    /// Category such as `Propulsion`.
    pub category: String,
    /// Upgrade name, unique across the tree.
    pub name: String,
    /// Tier compared against the player's recorded level for this name.
    pub level: u32,
    /// Price in credits.
    pub cost: f64,
    /// Attribute values the upgrade sets.
    pub effects: BTreeMap<ShipAttribute, f64>,
}

impl Upgrade {
    /// Short description of the effects, e.g. `cargo capacity 250`.
    pub fn effects_summary(&self) -> String {
        self.effects
            .iter()
            .map(|(attribute, value)| format!("{attribute} {value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Static upgrade catalog.
#[derive(Debug, Clone, Default)]
pub struct TechnologyTree {
    upgrades: Vec<Upgrade>,
}

impl TechnologyTree {
    /// Flatten a category -> name -> definition catalog.
    pub fn new(catalog: TechCatalog) -> Self {
        let upgrades = catalog
            .into_iter()
            .flat_map(|(category, entries)| {
                entries.into_iter().map(move |(name, def)| Upgrade {
                    category: category.clone(),
                    name,
                    level: def.level,
                    cost: def.cost,
                    effects: def.effects,
                })
            })
            .collect();
        Self { upgrades }
    }

    /// Every upgrade, grouped by category in catalog order.
    pub fn upgrades(&self) -> &[Upgrade] {
        &self.upgrades
    }

    /// Category names in catalog order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for upgrade in &self.upgrades {
            if !categories.contains(&upgrade.category.as_str()) {
                categories.push(&upgrade.category);
            }
        }
        categories
    }

    /// Look up an upgrade by category and name.
    pub fn find(&self, category: &str, name: &str) -> GameResult<&Upgrade> {
        self.upgrades
            .iter()
            .find(|upgrade| upgrade.category == category && upgrade.name == name)
            .ok_or_else(|| GameError::UnknownUpgrade {
                category: category.to_string(),
                name: name.to_string(),
            })
    }

    /// Upgrades whose level exceeds the recorded level for the same name.
    pub fn available_upgrades(&self, tech_state: &BTreeMap<String, u32>) -> Vec<&Upgrade> {
        self.upgrades
            .iter()
            .filter(|upgrade| upgrade.level > tech_state.get(&upgrade.name).copied().unwrap_or(0))
            .collect()
    }

    /// Pick one available upgrade at random.
    pub fn random_available(
        &self,
        tech_state: &BTreeMap<String, u32>,
        rng: &mut impl Rng,
    ) -> Option<&Upgrade> {
        self.available_upgrades(tech_state).choose(rng).copied()
    }
}
