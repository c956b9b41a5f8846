#![allow(missing_docs)]

//! Random events fired after every successful jump.

use std::fmt;

use once_cell::sync::Lazy;
use rand::{
    distributions::{Distribution, WeightedIndex},
    seq::{IteratorRandom, SliceRandom},
    Rng,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    economy::Market,
    error::GameResult,
    player::{AppliedEffect, Player},
    tech::TechnologyTree,
    universe::Planet,
};

/// Most units a trade opportunity can hand out.
pub const MAX_WINDFALL: u32 = 10;
/// Range of the credit share pirates take.
pub const PIRATE_SHARE: std::ops::RangeInclusive<f64> = 0.10..=0.30;
/// Relative drop of the local economy during a market crash.
pub const CRASH_ECONOMY_DROP: f64 = 0.10;
/// Lowest economy level a crash can push a planet to.
pub const MIN_ECONOMY_LEVEL: f64 = 0.1;

/// Event catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TradeOpportunity,
    PirateEncounter,
    MarketCrash,
    TechnologicalBreakthrough,
    FuelShortage,
    CargoLoss,
}

impl EventKind {
    /// Every event in catalog order.
    pub const ALL: [EventKind; 6] = [
        EventKind::TradeOpportunity,
        EventKind::PirateEncounter,
        EventKind::MarketCrash,
        EventKind::TechnologicalBreakthrough,
        EventKind::FuelShortage,
        EventKind::CargoLoss,
    ];

    /// Relative selection weight.
    pub fn weight(self) -> f64 {
        match self {
            EventKind::TradeOpportunity => 0.3,
            EventKind::PirateEncounter => 0.2,
            EventKind::MarketCrash => 0.1,
            EventKind::TechnologicalBreakthrough => 0.2,
            EventKind::FuelShortage => 0.1,
            EventKind::CargoLoss => 0.1,
        }
    }

    /// Headline shown when the event fires.
    pub fn description(self) -> &'static str {
        match self {
            EventKind::TradeOpportunity => "Discovered a rare trade opportunity!",
            EventKind::PirateEncounter => "Pirates attempt to intercept your cargo!",
            EventKind::MarketCrash => "Sudden market crash affects commodity prices!",
            EventKind::TechnologicalBreakthrough => "A new technology has been discovered!",
            EventKind::FuelShortage => "A fuel leak drains your tanks!",
            EventKind::CargoLoss => "A hull breach vents part of your cargo!",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// What an event actually did.
#[derive(Debug, Clone, PartialEq)]
pub enum EventEffect {
    Windfall {
        commodity: String,
        quantity: u32,
        price: f64,
    },
    CreditsStolen(f64),
    MarketCrashed {
        economy_level: f64,
    },
    UpgradeGranted {
        name: String,
        changes: Vec<AppliedEffect>,
    },
    FuelLost(f64),
    CargoLost {
        commodity: String,
        quantity: u32,
    },
    /// The event found nothing to act on.
    NoEffect,
}

/// A resolved event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome {
    pub kind: EventKind,
    pub effect: EventEffect,
}

impl EventOutcome {
    /// Player-facing summary.
    pub fn message(&self) -> String {
        let detail = match &self.effect {
            EventEffect::Windfall {
                commodity,
                quantity,
                price,
            } => format!("You receive {quantity} {commodity} (worth {price:.2} each)."),
            EventEffect::CreditsStolen(amount) => format!("They escape with {amount:.2} credits."),
            EventEffect::MarketCrashed { economy_level } => format!(
                "Base prices halve; the local economy drops to {:.0}%.",
                economy_level * 100.0
            ),
            EventEffect::UpgradeGranted { name, .. } => format!("{name} installed for free."),
            EventEffect::FuelLost(amount) => format!("You lose {amount:.1} fuel."),
            EventEffect::CargoLost {
                commodity,
                quantity,
            } => format!("You lose {quantity} {commodity}."),
            EventEffect::NoEffect => "Nothing comes of it.".to_string(),
        };
        format!("{} {detail}", self.kind.description())
    }
}

/// Everything an event may touch.
pub struct EventTargets<'a> {
    pub player: &'a mut Player,
    pub market: &'a mut Market,
    pub tech: &'a TechnologyTree,
    /// Planet the player just arrived at.
    pub planet: &'a mut Planet,
}

static EVENT_WEIGHTS: Lazy<WeightedIndex<f64>> = Lazy::new(|| {
    WeightedIndex::new(EventKind::ALL.map(EventKind::weight)).expect("invalid event weights")
});

/// Weighted picker over [`EventKind::ALL`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EventGenerator;

impl EventGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Draw an event proportionally to its weight.
    pub fn generate_event(&self, rng: &mut impl Rng) -> EventKind {
        EventKind::ALL[EVENT_WEIGHTS.sample(rng)]
    }

    /// Draw an event and apply it. An effect that cannot be applied leaves
    /// the targets untouched and is reported as having no effect.
    pub fn fire(&self, targets: EventTargets<'_>, rng: &mut impl Rng) -> EventOutcome {
        let kind = self.generate_event(rng);
        match resolve(kind, targets, rng) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(?err, %kind, "event could not be applied");
                EventOutcome {
                    kind,
                    effect: EventEffect::NoEffect,
                }
            }
        }
    }
}

/// Apply one event's effect.
pub fn resolve(
    kind: EventKind,
    targets: EventTargets<'_>,
    rng: &mut impl Rng,
) -> GameResult<EventOutcome> {
    let EventTargets {
        player,
        market,
        tech,
        planet,
    } = targets;

    let effect = match kind {
        EventKind::TradeOpportunity => {
            let free = player.cargo_free().min(MAX_WINDFALL);
            match market.commodities().choose(rng).map(|c| c.name.clone()) {
                Some(commodity) if free > 0 => {
                    let price = market.price(&commodity, planet, rng)?;
                    let quantity = rng.gen_range(1..=free);
                    player.receive_cargo(&commodity, quantity, price)?;
                    EventEffect::Windfall {
                        commodity,
                        quantity,
                        price,
                    }
                }
                _ => EventEffect::NoEffect,
            }
        }
        EventKind::PirateEncounter => {
            let share = rng.gen_range(PIRATE_SHARE);
            EventEffect::CreditsStolen(player.lose_credits(player.credits() * share))
        }
        EventKind::MarketCrash => {
            market.apply_market_crash();
            planet.economy_level =
                (planet.economy_level * (1.0 - CRASH_ECONOMY_DROP)).max(MIN_ECONOMY_LEVEL);
            EventEffect::MarketCrashed {
                economy_level: planet.economy_level,
            }
        }
        EventKind::TechnologicalBreakthrough => {
            match tech.random_available(player.tech_levels(), rng).cloned() {
                Some(upgrade) => EventEffect::UpgradeGranted {
                    changes: player.install_upgrade(&upgrade),
                    name: upgrade.name,
                },
                None => EventEffect::NoEffect,
            }
        }
        EventKind::FuelShortage => EventEffect::FuelLost(player.halve_fuel()),
        EventKind::CargoLoss => {
            let held = player
                .inventory()
                .iter()
                .map(|(name, lot)| (name.clone(), lot.quantity))
                .choose(rng);
            match held {
                Some((commodity, available)) => {
                    let quantity = rng.gen_range(1..=available);
                    player.jettison_cargo(&commodity, quantity)?;
                    EventEffect::CargoLost {
                        commodity,
                        quantity,
                    }
                }
                None => EventEffect::NoEffect,
            }
        }
    };

    let outcome = EventOutcome { kind, effect };
    info!(event = ?kind, effect = ?outcome.effect, "event resolved");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        content::{default_commodities, UpgradeDef},
        tech::ShipAttribute,
        universe::Demographics,
    };
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::BTreeMap;

    struct World {
        player: Player,
        market: Market,
        tech: TechnologyTree,
        planet: Planet,
    }

    impl World {
        fn new() -> Self {
            let mut catalog = BTreeMap::new();
            catalog.insert(
                "Cargo".to_string(),
                BTreeMap::from([(
                    "Basic Cargo Pods".to_string(),
                    UpgradeDef {
                        level: 1,
                        cost: 1500.0,
                        effects: BTreeMap::from([(ShipAttribute::CargoCapacity, 150.0)]),
                    },
                )]),
            );
            Self {
                player: Player::new(1_000.0),
                market: Market::new(default_commodities()),
                tech: TechnologyTree::new(catalog),
                planet: Planet {
                    name: "Proxima".to_string(),
                    planet_type: "Mining".to_string(),
                    climate: "Arid".to_string(),
                    geology: "Silicate".to_string(),
                    economy_level: 0.8,
                    resources: BTreeMap::from([("raw_materials".to_string(), 0.5)]),
                    demographics: Demographics {
                        population: 1000,
                        settlements: 1,
                        spaceports: 1,
                    },
                    history: String::new(),
                    frontier: false,
                },
            }
        }

        fn resolve(&mut self, kind: EventKind, rng: &mut StdRng) -> EventOutcome {
            resolve(
                kind,
                EventTargets {
                    player: &mut self.player,
                    market: &mut self.market,
                    tech: &self.tech,
                    planet: &mut self.planet,
                },
                rng,
            )
            .unwrap()
        }
    }

    #[test]
    fn selection_follows_weights() {
        let generator = EventGenerator::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut counts = BTreeMap::new();
        for _ in 0..10_000 {
            *counts
                .entry(format!("{:?}", generator.generate_event(&mut rng)))
                .or_insert(0u32) += 1;
        }
        assert_eq!(counts.len(), 6);
        let trade = counts["TradeOpportunity"];
        let crash = counts["MarketCrash"];
        assert!((2_700..3_300).contains(&trade), "trade opportunities: {trade}");
        assert!((800..1_200).contains(&crash), "market crashes: {crash}");
    }

    #[test]
    fn trade_opportunity_grants_free_cargo() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(2);
        let outcome = world.resolve(EventKind::TradeOpportunity, &mut rng);
        let EventEffect::Windfall { commodity, quantity, .. } = outcome.effect else {
            panic!("expected windfall, got {:?}", outcome.effect);
        };
        assert!((1..=MAX_WINDFALL).contains(&quantity));
        assert_eq!(world.player.held(&commodity), quantity);
        assert_eq!(world.player.credits(), 1_000.0);
    }

    #[test]
    fn trade_opportunity_needs_cargo_space() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(3);
        world.player.receive_cargo("fuel", 100, 1.0).unwrap();
        let outcome = world.resolve(EventKind::TradeOpportunity, &mut rng);
        assert_eq!(outcome.effect, EventEffect::NoEffect);
        assert_eq!(world.player.cargo_used(), 100);
    }

    #[test]
    fn pirates_take_a_share_of_credits() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(4);
        let outcome = world.resolve(EventKind::PirateEncounter, &mut rng);
        let EventEffect::CreditsStolen(stolen) = outcome.effect else {
            panic!("expected theft");
        };
        assert!((100.0..=300.0).contains(&stolen));
        assert_eq!(world.player.credits(), 1_000.0 - stolen);
    }

    #[test]
    fn market_crash_halves_prices_and_dents_economy() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(5);
        let before = world.market.commodity("fuel").unwrap().base_price;
        world.resolve(EventKind::MarketCrash, &mut rng);
        assert_eq!(world.market.commodity("fuel").unwrap().base_price, before / 2.0);
        assert!((world.planet.economy_level - 0.72).abs() < 1e-9);

        world.planet.economy_level = 0.105;
        world.resolve(EventKind::MarketCrash, &mut rng);
        assert_eq!(world.planet.economy_level, MIN_ECONOMY_LEVEL);
    }

    #[test]
    fn breakthrough_installs_each_upgrade_once() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(6);
        let outcome = world.resolve(EventKind::TechnologicalBreakthrough, &mut rng);
        assert!(matches!(outcome.effect, EventEffect::UpgradeGranted { .. }));
        assert_eq!(world.player.cargo_capacity(), 150);
        assert_eq!(world.player.credits(), 1_000.0);

        let outcome = world.resolve(EventKind::TechnologicalBreakthrough, &mut rng);
        assert_eq!(outcome.effect, EventEffect::NoEffect);
    }

    #[test]
    fn fuel_shortage_halves_fuel() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = world.resolve(EventKind::FuelShortage, &mut rng);
        assert_eq!(outcome.effect, EventEffect::FuelLost(50.0));
        assert_eq!(world.player.fuel_level(), 50.0);
    }

    #[test]
    fn cargo_loss_takes_part_of_one_hold() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(8);
        assert_eq!(
            world.resolve(EventKind::CargoLoss, &mut rng).effect,
            EventEffect::NoEffect
        );

        world.player.add_cargo("raw_materials", 5, 10.0).unwrap();
        let outcome = world.resolve(EventKind::CargoLoss, &mut rng);
        let EventEffect::CargoLost { commodity, quantity } = outcome.effect else {
            panic!("expected cargo loss");
        };
        assert_eq!(commodity, "raw_materials");
        assert!((1..=5).contains(&quantity));
        assert_eq!(world.player.held("raw_materials"), 5 - quantity);
    }

    #[test]
    fn messages_lead_with_the_headline() {
        let outcome = EventOutcome {
            kind: EventKind::FuelShortage,
            effect: EventEffect::FuelLost(12.5),
        };
        assert_eq!(
            outcome.message(),
            "A fuel leak drains your tanks! You lose 12.5 fuel."
        );
    }
}
