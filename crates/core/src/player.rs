#![allow(missing_docs)]

//! The player ledger: credits, cargo, fuel, experience and trade statistics.
//!
//! Every mutation goes through a method that validates first and mutates last,
//! so a rejected operation leaves the ledger untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{GameError, GameResult},
    quests::{Quest, QuestKind},
    tech::{ShipAttribute, Upgrade},
};

/// Experience needed per level: level `n + 1` is reached at `n * LEVEL_STEP`.
pub const LEVEL_STEP: u64 = 100;
/// Cargo capacity of a new ship.
pub const STARTING_CARGO_CAPACITY: u32 = 100;
/// Fuel tank of a new ship; it starts full.
pub const STARTING_FUEL_TANK: f64 = 100.0;
/// Fuel burned per distance unit by a new ship.
pub const STARTING_FUEL_EFFICIENCY: f64 = 1.0;

const FUEL_EPSILON: f64 = 1e-9;

/// Fuel needed to cover `distance` at the given burn rate.
pub fn fuel_required(distance: f64, efficiency: f64) -> f64 {
    distance * efficiency
}

/// Experience at which `level` is reached.
pub fn experience_for_level(level: u32) -> u64 {
    LEVEL_STEP * u64::from(level.saturating_sub(1))
}

/// Units of one commodity in the hold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CargoLot {
    /// Units held.
    pub quantity: u32,
    /// Weighted average price paid per unit.
    pub avg_buy_price: f64,
}

/// Kind of ledger entry in the trade history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TradeKind {
    Buy,
    Sell,
    /// Cargo received for free.
    Windfall,
    /// Cargo lost without payment.
    Jettison,
}

/// One entry of the append-only trade history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeRecord {
    pub turn: u32,
    pub kind: TradeKind,
    pub commodity: String,
    pub quantity: u32,
    pub price_per_unit: f64,
    /// Realised profit, for sales only.
    pub profit: Option<f64>,
}

/// A remembered pair of planets the player can shuttle between.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TradeRoute {
    pub origin: String,
    pub destination: String,
}

impl TradeRoute {
    /// The other end of the route when standing at `planet`.
    pub fn other_end(&self, planet: &str) -> Option<&str> {
        if self.origin == planet {
            Some(&self.destination)
        } else if self.destination == planet {
            Some(&self.origin)
        } else {
            None
        }
    }

    fn same_pair(&self, a: &str, b: &str) -> bool {
        self.other_end(a) == Some(b)
    }
}

/// Fixed reward granted on reaching a level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum LevelBenefit {
    CargoCapacity(u32),
    ShipLevel(u32),
    FuelTank(f64),
    PassengerPods(u32),
    LifeSupport(u32),
    Credits(f64),
}

impl LevelBenefit {
    /// Benefit for reaching `level`; the starting levels grant nothing.
    pub fn for_level(level: u32) -> Option<Self> {
        let benefit = match level {
            0 | 1 => return None,
            2 => LevelBenefit::CargoCapacity(50),
            3 => LevelBenefit::ShipLevel(1),
            4 => LevelBenefit::FuelTank(50.0),
            5 => LevelBenefit::PassengerPods(2),
            6 => LevelBenefit::LifeSupport(2),
            _ => LevelBenefit::Credits(250.0 * f64::from(level)),
        };
        Some(benefit)
    }

    /// Human-readable description.
    pub fn describe(&self) -> String {
        match self {
            LevelBenefit::CargoCapacity(amount) => format!("+{amount} cargo capacity"),
            LevelBenefit::ShipLevel(amount) => format!("+{amount} ship level"),
            LevelBenefit::FuelTank(amount) => format!("+{amount} fuel tank capacity"),
            LevelBenefit::PassengerPods(amount) => format!("+{amount} passenger pods"),
            LevelBenefit::LifeSupport(amount) => format!("+{amount} life support"),
            LevelBenefit::Credits(amount) => format!("+{amount:.0} credits"),
        }
    }
}

/// A level gained and what it granted.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelUp {
    pub level: u32,
    pub benefit: LevelBenefit,
}

/// Result of a successful sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleOutcome {
    pub revenue: f64,
    pub profit: f64,
    pub experience: u64,
    pub level_ups: Vec<LevelUp>,
}

/// An attribute change caused by an upgrade.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedEffect {
    pub attribute: ShipAttribute,
    pub old: f64,
    pub new: f64,
}

/// The player's ship and books.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    credits: f64,
    inventory: BTreeMap<String, CargoLot>,
    cargo_used: u32,
    cargo_capacity: u32,
    fuel_level: f64,
    fuel_tank_capacity: f64,
    fuel_efficiency: f64,
    ship_level: u32,
    life_support_expansion: u32,
    passenger_pod_capacity: u32,
    level: u32,
    experience: u64,
    active_quests: Vec<Quest>,
    trade_history: Vec<TradeRecord>,
    tech_levels: BTreeMap<String, u32>,
    trade_routes: Vec<TradeRoute>,
    total_profit: f64,
    total_loss: f64,
    total_fuel_used: f64,
    total_trips: u32,
    turn: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(10_000.0)
    }
}

impl Player {
    /// A fresh player with an empty hold and a full tank.
    pub fn new(starting_credits: f64) -> Self {
        Self {
            credits: starting_credits.max(0.0),
            inventory: BTreeMap::new(),
            cargo_used: 0,
            cargo_capacity: STARTING_CARGO_CAPACITY,
            fuel_level: STARTING_FUEL_TANK,
            fuel_tank_capacity: STARTING_FUEL_TANK,
            fuel_efficiency: STARTING_FUEL_EFFICIENCY,
            ship_level: 1,
            life_support_expansion: 0,
            passenger_pod_capacity: 0,
            level: 1,
            experience: 0,
            active_quests: Vec::new(),
            trade_history: Vec::new(),
            tech_levels: BTreeMap::new(),
            trade_routes: Vec::new(),
            total_profit: 0.0,
            total_loss: 0.0,
            total_fuel_used: 0.0,
            total_trips: 0,
            turn: 1,
        }
    }

    pub fn credits(&self) -> f64 {
        self.credits
    }

    pub fn inventory(&self) -> &BTreeMap<String, CargoLot> {
        &self.inventory
    }

    /// Cargo lot for a commodity, if any is held.
    pub fn cargo(&self, commodity: &str) -> Option<&CargoLot> {
        self.inventory.get(commodity)
    }

    /// Units of a commodity in the hold.
    pub fn held(&self, commodity: &str) -> u32 {
        self.cargo(commodity).map(|lot| lot.quantity).unwrap_or(0)
    }

    pub fn cargo_used(&self) -> u32 {
        self.cargo_used
    }

    pub fn cargo_capacity(&self) -> u32 {
        self.cargo_capacity
    }

    pub fn cargo_free(&self) -> u32 {
        self.cargo_capacity.saturating_sub(self.cargo_used)
    }

    pub fn fuel_level(&self) -> f64 {
        self.fuel_level
    }

    pub fn fuel_tank_capacity(&self) -> f64 {
        self.fuel_tank_capacity
    }

    pub fn fuel_efficiency(&self) -> f64 {
        self.fuel_efficiency
    }

    pub fn ship_level(&self) -> u32 {
        self.ship_level
    }

    pub fn life_support_expansion(&self) -> u32 {
        self.life_support_expansion
    }

    pub fn passenger_pod_capacity(&self) -> u32 {
        self.passenger_pod_capacity
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    /// Experience still missing for the next level.
    pub fn experience_to_next_level(&self) -> u64 {
        experience_for_level(self.level + 1).saturating_sub(self.experience)
    }

    pub fn active_quests(&self) -> &[Quest] {
        &self.active_quests
    }

    pub fn trade_history(&self) -> &[TradeRecord] {
        &self.trade_history
    }

    /// Recorded upgrade level per upgrade name.
    pub fn tech_levels(&self) -> &BTreeMap<String, u32> {
        &self.tech_levels
    }

    pub fn trade_routes(&self) -> &[TradeRoute] {
        &self.trade_routes
    }

    pub fn total_profit(&self) -> f64 {
        self.total_profit
    }

    pub fn total_loss(&self) -> f64 {
        self.total_loss
    }

    pub fn net_profit(&self) -> f64 {
        self.total_profit - self.total_loss
    }

    pub fn total_fuel_used(&self) -> f64 {
        self.total_fuel_used
    }

    pub fn total_trips(&self) -> u32 {
        self.total_trips
    }

    /// Current turn number, starting at 1.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Move the turn counter forward.
    pub fn advance_turn(&mut self) {
        self.turn += 1;
    }

    /// Buy `quantity` units at `price_per_unit`.
    pub fn add_cargo(&mut self, good: &str, quantity: u32, price_per_unit: f64) -> GameResult<()> {
        check_price(price_per_unit)?;
        self.check_space(quantity)?;
        let total_cost = f64::from(quantity) * price_per_unit;
        if total_cost > self.credits {
            return Err(GameError::InsufficientCredits {
                required: total_cost,
                available: self.credits,
            });
        }

        self.stow(good, quantity, price_per_unit);
        self.credits -= total_cost;
        self.record(TradeKind::Buy, good, quantity, price_per_unit, None);
        debug!(good, quantity, price_per_unit, "cargo bought");
        Ok(())
    }

    /// Sell `quantity` units at `price_per_unit`, booking profit or loss.
    pub fn sell_cargo(
        &mut self,
        good: &str,
        quantity: u32,
        price_per_unit: f64,
    ) -> GameResult<SaleOutcome> {
        check_price(price_per_unit)?;
        let lot = self.check_held(good, quantity)?;

        let profit = (price_per_unit - lot.avg_buy_price) * f64::from(quantity);
        let revenue = f64::from(quantity) * price_per_unit;
        if profit > 0.0 {
            self.total_profit += profit;
        } else {
            self.total_loss += -profit;
        }

        self.unstow(good, quantity);
        self.credits += revenue;
        self.record(TradeKind::Sell, good, quantity, price_per_unit, Some(profit));
        debug!(good, quantity, price_per_unit, profit, "cargo sold");

        let experience = if profit > 0.0 { profit.floor() as u64 } else { 0 };
        let level_ups = self.gain_experience(experience);
        Ok(SaleOutcome {
            revenue,
            profit,
            experience,
            level_ups,
        })
    }

    /// Put cargo in the hold without paying for it.
    pub fn receive_cargo(&mut self, good: &str, quantity: u32, price_per_unit: f64) -> GameResult<()> {
        check_price(price_per_unit)?;
        self.check_space(quantity)?;
        self.stow(good, quantity, price_per_unit);
        self.record(TradeKind::Windfall, good, quantity, price_per_unit, None);
        Ok(())
    }

    /// Lose cargo without compensation.
    pub fn jettison_cargo(&mut self, good: &str, quantity: u32) -> GameResult<()> {
        let lot = self.check_held(good, quantity)?;
        self.unstow(good, quantity);
        self.record(TradeKind::Jettison, good, quantity, lot.avg_buy_price, None);
        Ok(())
    }

    /// Add experience, applying every level crossed on the way.
    pub fn gain_experience(&mut self, amount: u64) -> Vec<LevelUp> {
        self.experience += amount;
        let mut level_ups = Vec::new();
        while self.experience >= experience_for_level(self.level + 1) {
            self.level += 1;
            let Some(benefit) = LevelBenefit::for_level(self.level) else {
                continue;
            };
            self.apply_benefit(benefit);
            info!(level = self.level, benefit = %benefit.describe(), "level up");
            level_ups.push(LevelUp {
                level: self.level,
                benefit,
            });
        }
        level_ups
    }

    fn apply_benefit(&mut self, benefit: LevelBenefit) {
        match benefit {
            LevelBenefit::CargoCapacity(amount) => self.cargo_capacity += amount,
            LevelBenefit::ShipLevel(amount) => self.ship_level += amount,
            LevelBenefit::FuelTank(amount) => self.fuel_tank_capacity += amount,
            LevelBenefit::PassengerPods(amount) => self.passenger_pod_capacity += amount,
            LevelBenefit::LifeSupport(amount) => self.life_support_expansion += amount,
            LevelBenefit::Credits(amount) => self.credits += amount,
        }
    }

    /// Burn fuel for a trip of `distance`; returns the fuel consumed.
    pub fn travel(&mut self, distance: f64) -> GameResult<f64> {
        let required = fuel_required(distance, self.fuel_efficiency);
        if self.fuel_level < required {
            return Err(GameError::InsufficientFuel {
                required,
                available: self.fuel_level,
            });
        }
        self.fuel_level -= required;
        self.total_fuel_used += required;
        self.total_trips += 1;
        Ok(required)
    }

    /// Buy `units` of fuel at `price_per_unit`; returns the total cost.
    pub fn refuel(&mut self, units: f64, price_per_unit: f64) -> GameResult<f64> {
        check_price(price_per_unit)?;
        if !units.is_finite() || units <= 0.0 {
            return Err(GameError::InvalidQuantity);
        }
        let room = self.fuel_tank_capacity - self.fuel_level;
        if units > room + FUEL_EPSILON {
            return Err(GameError::FuelTankFull {
                requested: units,
                room,
            });
        }
        let cost = units * price_per_unit;
        if cost > self.credits {
            return Err(GameError::InsufficientCredits {
                required: cost,
                available: self.credits,
            });
        }
        self.fuel_level = (self.fuel_level + units).min(self.fuel_tank_capacity);
        self.credits -= cost;
        Ok(cost)
    }

    /// Lose half of the fuel in the tank.
    pub fn halve_fuel(&mut self) -> f64 {
        let lost = self.fuel_level / 2.0;
        self.fuel_level -= lost;
        lost
    }

    /// Receive credits.
    pub fn earn(&mut self, amount: f64) {
        self.credits += amount.max(0.0);
    }

    /// Lose up to `amount` credits; the balance never drops below zero.
    pub fn lose_credits(&mut self, amount: f64) -> f64 {
        let lost = amount.max(0.0).min(self.credits);
        self.credits -= lost;
        lost
    }

    /// Pay for an upgrade and install it.
    pub fn purchase_upgrade(&mut self, upgrade: &Upgrade) -> GameResult<Vec<AppliedEffect>> {
        if upgrade.cost > self.credits {
            return Err(GameError::InsufficientCredits {
                required: upgrade.cost,
                available: self.credits,
            });
        }
        self.credits -= upgrade.cost;
        Ok(self.install_upgrade(upgrade))
    }

    /// Install an upgrade without paying and record its level.
    pub fn install_upgrade(&mut self, upgrade: &Upgrade) -> Vec<AppliedEffect> {
        let recorded = self.tech_levels.entry(upgrade.name.clone()).or_insert(0);
        *recorded = (*recorded).max(upgrade.level);
        let applied = self.apply_upgrade(upgrade);
        info!(upgrade = %upgrade.name, changes = applied.len(), "upgrade installed");
        applied
    }

    /// Apply an upgrade's effects. Values never regress the ship: capacities keep
    /// the larger value and fuel burn keeps the smaller one.
    pub fn apply_upgrade(&mut self, upgrade: &Upgrade) -> Vec<AppliedEffect> {
        let mut applied = Vec::new();
        for (&attribute, &value) in &upgrade.effects {
            let old = self.attribute(attribute);
            let new = if attribute.lower_is_better() {
                old.min(value)
            } else {
                old.max(value)
            };
            if new != old {
                self.set_attribute(attribute, new);
                applied.push(AppliedEffect {
                    attribute,
                    old,
                    new: self.attribute(attribute),
                });
            }
        }
        applied
    }

    /// Current value of a ship attribute.
    pub fn attribute(&self, attribute: ShipAttribute) -> f64 {
        match attribute {
            ShipAttribute::CargoCapacity => f64::from(self.cargo_capacity),
            ShipAttribute::ShipLevel => f64::from(self.ship_level),
            ShipAttribute::FuelEfficiency => self.fuel_efficiency,
            ShipAttribute::FuelTankCapacity => self.fuel_tank_capacity,
            ShipAttribute::LifeSupportExpansion => f64::from(self.life_support_expansion),
            ShipAttribute::PassengerPodCapacity => f64::from(self.passenger_pod_capacity),
        }
    }

    fn set_attribute(&mut self, attribute: ShipAttribute, value: f64) {
        let whole = value.max(0.0).round() as u32;
        match attribute {
            ShipAttribute::CargoCapacity => self.cargo_capacity = whole,
            ShipAttribute::ShipLevel => self.ship_level = whole,
            ShipAttribute::FuelEfficiency => self.fuel_efficiency = value.max(0.0),
            ShipAttribute::FuelTankCapacity => self.fuel_tank_capacity = value.max(0.0),
            ShipAttribute::LifeSupportExpansion => self.life_support_expansion = whole,
            ShipAttribute::PassengerPodCapacity => self.passenger_pod_capacity = whole,
        }
    }

    /// Check whether a quest's requirements are met by the ship.
    pub fn check_quest_requirements(&self, quest: &Quest) -> GameResult<()> {
        if quest.kind != QuestKind::PassengerTransport {
            return Ok(());
        }
        if self.passenger_pod_capacity < quest.required_quantity {
            return Err(GameError::PassengerCapacity {
                required: quest.required_quantity,
                available: self.passenger_pod_capacity,
            });
        }
        if self.life_support_expansion < quest.required_quantity {
            return Err(GameError::LifeSupportCapacity {
                required: quest.required_quantity,
                available: self.life_support_expansion,
            });
        }
        Ok(())
    }

    /// Track an accepted quest.
    pub fn add_active_quest(&mut self, quest: Quest) {
        self.active_quests.push(quest);
    }

    /// Remove and return every active quest completed at `planet`.
    ///
    /// Cargo deliveries also need at least `required_quantity` units in the hold.
    pub fn complete_quests_at(&mut self, planet: &str) -> Vec<Quest> {
        let held = self.cargo_used;
        let (done, open): (Vec<Quest>, Vec<Quest>) =
            self.active_quests.drain(..).partition(|quest| {
                quest.destination == planet
                    && (quest.kind != QuestKind::CargoDelivery || held >= quest.required_quantity)
            });
        self.active_quests = open;
        done
    }

    /// Remember a route; returns false when the pair is already known.
    pub fn add_trade_route(&mut self, origin: &str, destination: &str) -> bool {
        if origin == destination
            || self
                .trade_routes
                .iter()
                .any(|route| route.same_pair(origin, destination))
        {
            return false;
        }
        self.trade_routes.push(TradeRoute {
            origin: origin.to_string(),
            destination: destination.to_string(),
        });
        true
    }

    fn check_space(&self, quantity: u32) -> GameResult<()> {
        if quantity == 0 {
            return Err(GameError::InvalidQuantity);
        }
        let free = self.cargo_free();
        if quantity > free {
            return Err(GameError::InsufficientCargoSpace {
                requested: quantity,
                free,
            });
        }
        Ok(())
    }

    fn check_held(&self, good: &str, quantity: u32) -> GameResult<CargoLot> {
        if quantity == 0 {
            return Err(GameError::InvalidQuantity);
        }
        let lot = *self
            .inventory
            .get(good)
            .ok_or_else(|| GameError::CommodityNotHeld(good.to_string()))?;
        if quantity > lot.quantity {
            return Err(GameError::InsufficientQuantity {
                commodity: good.to_string(),
                requested: quantity,
                held: lot.quantity,
            });
        }
        Ok(lot)
    }

    fn stow(&mut self, good: &str, quantity: u32, price_per_unit: f64) {
        let lot = self.inventory.entry(good.to_string()).or_insert(CargoLot {
            quantity: 0,
            avg_buy_price: price_per_unit,
        });
        let old_quantity = f64::from(lot.quantity);
        let new_quantity = old_quantity + f64::from(quantity);
        lot.avg_buy_price =
            (old_quantity * lot.avg_buy_price + f64::from(quantity) * price_per_unit) / new_quantity;
        lot.quantity += quantity;
        self.cargo_used += quantity;
    }

    fn unstow(&mut self, good: &str, quantity: u32) {
        if let Some(lot) = self.inventory.get_mut(good) {
            lot.quantity -= quantity;
            if lot.quantity == 0 {
                self.inventory.remove(good);
            }
        }
        self.cargo_used -= quantity;
    }

    fn record(
        &mut self,
        kind: TradeKind,
        good: &str,
        quantity: u32,
        price_per_unit: f64,
        profit: Option<f64>,
    ) {
        self.trade_history.push(TradeRecord {
            turn: self.turn,
            kind,
            commodity: good.to_string(),
            quantity,
            price_per_unit,
            profit,
        });
    }
}

fn check_price(price: f64) -> GameResult<()> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(GameError::InvalidPrice(price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upgrade(effects: &[(ShipAttribute, f64)], cost: f64) -> Upgrade {
        Upgrade {
            category: "Test".to_string(),
            name: "Test Upgrade".to_string(),
            level: 1,
            cost,
            effects: effects.iter().copied().collect(),
        }
    }

    fn passenger_quest(quantity: u32) -> Quest {
        Quest {
            id: 1,
            title: "Ferry".to_string(),
            description: "Ferry colonists".to_string(),
            backstory: String::new(),
            kind: QuestKind::PassengerTransport,
            reward: 500.0,
            destination: "Proxima".to_string(),
            required_quantity: quantity,
        }
    }

    #[test]
    fn add_cargo_updates_space_and_credits() {
        let mut player = Player::new(10_000.0);
        player.add_cargo("fuel", 10, 25.5).unwrap();
        assert_eq!(player.cargo_used(), 10);
        assert_eq!(player.credits(), 10_000.0 - 255.0);
        assert_eq!(player.held("fuel"), 10);
        assert_eq!(player.trade_history().len(), 1);
        assert_eq!(player.trade_history()[0].kind, TradeKind::Buy);
    }

    #[test]
    fn add_cargo_rejects_without_mutation() {
        let mut player = Player::new(1_000.0);
        let before = player.clone();

        assert_eq!(
            player.add_cargo("ore", 101, 1.0),
            Err(GameError::InsufficientCargoSpace {
                requested: 101,
                free: 100
            })
        );
        assert_eq!(
            player.add_cargo("ore", 20, 100.0),
            Err(GameError::InsufficientCredits {
                required: 2_000.0,
                available: 1_000.0
            })
        );
        assert_eq!(player.add_cargo("ore", 0, 1.0), Err(GameError::InvalidQuantity));
        assert!(player.add_cargo("ore", 1, -5.0).is_err());
        assert_eq!(player, before);
    }

    #[test]
    fn weighted_average_buy_price() {
        let mut player = Player::new(10_000.0);
        player.add_cargo("ore", 10, 100.0).unwrap();
        player.add_cargo("ore", 10, 200.0).unwrap();
        let lot = player.cargo("ore").unwrap();
        assert_eq!(lot.quantity, 20);
        assert_eq!(lot.avg_buy_price, 150.0);
    }

    #[test]
    fn oversell_fails_without_mutation() {
        let mut player = Player::new(10_000.0);
        player.add_cargo("ore", 5, 100.0).unwrap();
        let before = player.clone();
        assert_eq!(
            player.sell_cargo("ore", 6, 150.0),
            Err(GameError::InsufficientQuantity {
                commodity: "ore".to_string(),
                requested: 6,
                held: 5
            })
        );
        assert_eq!(
            player.sell_cargo("spice", 1, 150.0),
            Err(GameError::CommodityNotHeld("spice".to_string()))
        );
        assert_eq!(player, before);
    }

    #[test]
    fn profitable_sale_books_profit_and_experience() {
        let mut player = Player::new(10_000.0);
        player.add_cargo("ore", 10, 100.0).unwrap();
        let outcome = player.sell_cargo("ore", 4, 112.5).unwrap();
        assert_eq!(outcome.profit, (112.5 - 100.0) * 4.0);
        assert_eq!(outcome.revenue, 450.0);
        assert_eq!(outcome.experience, 50);
        assert_eq!(player.total_profit(), 50.0);
        assert_eq!(player.total_loss(), 0.0);
        assert_eq!(player.experience(), 50);
        assert_eq!(player.held("ore"), 6);
        assert_eq!(player.cargo_used(), 6);
        assert_eq!(player.credits(), 10_000.0 - 1_000.0 + 450.0);
    }

    #[test]
    fn losing_sale_books_loss_without_experience() {
        let mut player = Player::new(10_000.0);
        player.add_cargo("ore", 10, 100.0).unwrap();
        let outcome = player.sell_cargo("ore", 10, 80.0).unwrap();
        assert_eq!(outcome.profit, -200.0);
        assert_eq!(outcome.experience, 0);
        assert_eq!(player.total_loss(), 200.0);
        assert_eq!(player.total_profit(), 0.0);
        assert_eq!(player.experience(), 0);
        assert!(player.cargo("ore").is_none());
        assert_eq!(player.cargo_used(), 0);
    }

    #[test]
    fn crossing_threshold_levels_up_once() {
        let mut player = Player::new(0.0);
        assert!(player.gain_experience(95).is_empty());
        let capacity = player.cargo_capacity();
        let level_ups = player.gain_experience(10);
        assert_eq!(
            level_ups,
            vec![LevelUp {
                level: 2,
                benefit: LevelBenefit::CargoCapacity(50)
            }]
        );
        assert_eq!(player.level(), 2);
        assert_eq!(player.cargo_capacity(), capacity + 50);
        assert!(player.gain_experience(0).is_empty());
        assert_eq!(player.cargo_capacity(), capacity + 50);
    }

    #[test]
    fn large_gain_levels_up_in_sequence() {
        let mut player = Player::new(0.0);
        let level_ups = player.gain_experience(300);
        let levels: Vec<u32> = level_ups.iter().map(|up| up.level).collect();
        assert_eq!(levels, vec![2, 3, 4]);
        assert_eq!(player.ship_level(), 2);
        assert_eq!(player.fuel_tank_capacity(), STARTING_FUEL_TANK + 50.0);
        assert_eq!(player.experience_to_next_level(), 100);
    }

    #[test]
    fn late_levels_grant_pods_life_support_and_credits() {
        let mut player = Player::new(0.0);
        player.gain_experience(300);
        let pods = player.passenger_pod_capacity();
        let life_support = player.life_support_expansion();
        let cargo = player.cargo_capacity();

        let level_ups = player.gain_experience(300);
        assert_eq!(
            level_ups,
            vec![
                LevelUp {
                    level: 5,
                    benefit: LevelBenefit::PassengerPods(2)
                },
                LevelUp {
                    level: 6,
                    benefit: LevelBenefit::LifeSupport(2)
                },
                LevelUp {
                    level: 7,
                    benefit: LevelBenefit::Credits(1750.0)
                },
            ]
        );
        assert_eq!(player.level(), 7);
        assert_eq!(player.passenger_pod_capacity(), pods + 2);
        assert_eq!(player.life_support_expansion(), life_support + 2);
        assert_eq!(player.credits(), 1750.0);
        assert_eq!(player.cargo_capacity(), cargo);

        assert_eq!(
            player.gain_experience(100),
            vec![LevelUp {
                level: 8,
                benefit: LevelBenefit::Credits(2000.0)
            }]
        );
        assert_eq!(player.credits(), 3750.0);
        assert_eq!(player.passenger_pod_capacity(), pods + 2);
    }

    #[test]
    fn starting_levels_have_no_benefit() {
        assert_eq!(LevelBenefit::for_level(0), None);
        assert_eq!(LevelBenefit::for_level(1), None);
        assert_eq!(
            LevelBenefit::for_level(2),
            Some(LevelBenefit::CargoCapacity(50))
        );
    }

    #[test]
    fn travel_consumes_exact_fuel() {
        let mut player = Player::new(0.0);
        let used = player.travel(7.5).unwrap();
        assert_eq!(used, 7.5);
        assert_eq!(player.fuel_level(), STARTING_FUEL_TANK - 7.5);
        assert_eq!(player.total_trips(), 1);
        assert_eq!(player.total_fuel_used(), 7.5);
    }

    #[test]
    fn travel_without_fuel_is_rejected() {
        let mut player = Player::new(0.0);
        player.halve_fuel();
        player.halve_fuel();
        let before = player.clone();
        assert!(matches!(
            player.travel(30.0),
            Err(GameError::InsufficientFuel { .. })
        ));
        assert_eq!(player, before);
    }

    #[test]
    fn refuel_respects_tank_and_credits() {
        let mut player = Player::new(100.0);
        assert!(matches!(
            player.refuel(1.0, 1.0),
            Err(GameError::FuelTankFull { .. })
        ));
        player.travel(40.0).unwrap();
        assert!(matches!(
            player.refuel(40.0, 5.0),
            Err(GameError::InsufficientCredits { .. })
        ));
        let cost = player.refuel(20.0, 5.0).unwrap();
        assert_eq!(cost, 100.0);
        assert_eq!(player.credits(), 0.0);
        assert_eq!(player.fuel_level(), 80.0);
    }

    #[test]
    fn upgrades_never_regress() {
        let mut player = Player::new(0.0);
        player.apply_upgrade(&upgrade(&[(ShipAttribute::CargoCapacity, 250.0)], 0.0));
        assert_eq!(player.cargo_capacity(), 250);
        let applied = player.apply_upgrade(&upgrade(&[(ShipAttribute::CargoCapacity, 150.0)], 0.0));
        assert!(applied.is_empty());
        assert_eq!(player.cargo_capacity(), 250);

        player.apply_upgrade(&upgrade(&[(ShipAttribute::FuelEfficiency, 0.6)], 0.0));
        player.apply_upgrade(&upgrade(&[(ShipAttribute::FuelEfficiency, 0.8)], 0.0));
        assert_eq!(player.fuel_efficiency(), 0.6);
    }

    #[test]
    fn purchase_records_tech_level_and_charges() {
        let mut player = Player::new(1_000.0);
        let pods = upgrade(&[(ShipAttribute::PassengerPodCapacity, 4.0)], 600.0);
        let applied = player.purchase_upgrade(&pods).unwrap();
        assert_eq!(
            applied,
            vec![AppliedEffect {
                attribute: ShipAttribute::PassengerPodCapacity,
                old: 0.0,
                new: 4.0
            }]
        );
        assert_eq!(player.credits(), 400.0);
        assert_eq!(player.tech_levels().get("Test Upgrade"), Some(&1));
        assert!(matches!(
            player.purchase_upgrade(&pods),
            Err(GameError::InsufficientCredits { .. })
        ));
    }

    #[test]
    fn passenger_quests_need_pods_and_life_support() {
        let mut player = Player::new(0.0);
        assert!(matches!(
            player.check_quest_requirements(&passenger_quest(3)),
            Err(GameError::PassengerCapacity { .. })
        ));
        player.apply_upgrade(&upgrade(&[(ShipAttribute::PassengerPodCapacity, 4.0)], 0.0));
        assert!(matches!(
            player.check_quest_requirements(&passenger_quest(3)),
            Err(GameError::LifeSupportCapacity { .. })
        ));
        player.apply_upgrade(&upgrade(&[(ShipAttribute::LifeSupportExpansion, 3.0)], 0.0));
        assert!(player.check_quest_requirements(&passenger_quest(3)).is_ok());
    }

    #[test]
    fn completes_quests_by_destination() {
        let mut player = Player::new(0.0);
        let mut other = passenger_quest(0);
        other.id = 2;
        other.destination = "Arcturus".to_string();
        player.add_active_quest(passenger_quest(0));
        player.add_active_quest(other);
        let done = player.complete_quests_at("Proxima");
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, 1);
        assert_eq!(player.active_quests().len(), 1);
        assert!(player.complete_quests_at("Proxima").is_empty());
    }

    #[test]
    fn cargo_delivery_needs_a_full_enough_hold() {
        let mut player = Player::new(1_000.0);
        let mut delivery = passenger_quest(10);
        delivery.kind = QuestKind::CargoDelivery;
        player.add_active_quest(delivery);

        assert!(player.complete_quests_at("Proxima").is_empty());
        assert_eq!(player.active_quests().len(), 1);

        player.add_cargo("ore", 9, 1.0).unwrap();
        assert!(player.complete_quests_at("Proxima").is_empty());
        player.add_cargo("grain", 1, 1.0).unwrap();
        let done = player.complete_quests_at("Proxima");
        assert_eq!(done.len(), 1);
        assert!(player.active_quests().is_empty());
        assert_eq!(player.cargo_used(), 10);
    }

    #[test]
    fn windfall_and_jettison() {
        let mut player = Player::new(0.0);
        player.receive_cargo("ore", 5, 40.0).unwrap();
        assert_eq!(player.credits(), 0.0);
        assert_eq!(player.cargo("ore").unwrap().avg_buy_price, 40.0);
        player.jettison_cargo("ore", 5).unwrap();
        assert_eq!(player.cargo_used(), 0);
        assert!(player.cargo("ore").is_none());
        let kinds: Vec<TradeKind> = player.trade_history().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![TradeKind::Windfall, TradeKind::Jettison]);
    }

    #[test]
    fn pirates_cannot_drive_credits_negative() {
        let mut player = Player::new(100.0);
        assert_eq!(player.lose_credits(250.0), 100.0);
        assert_eq!(player.credits(), 0.0);
    }

    #[test]
    fn trade_routes_are_unique_pairs() {
        let mut player = Player::new(0.0);
        assert!(player.add_trade_route("A", "B"));
        assert!(!player.add_trade_route("B", "A"));
        assert!(!player.add_trade_route("A", "A"));
        assert_eq!(player.trade_routes()[0].other_end("B"), Some("A"));
        assert_eq!(player.trade_routes()[0].other_end("C"), None);
    }
}
