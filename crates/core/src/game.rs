#![allow(missing_docs)]

//! Turn orchestration: wires the universe, market, player, quests, technology
//! tree and events together behind a small action API.

use anyhow::{bail, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::AppConfig,
    content::Content,
    economy::{Commodity, Market, MarketOverview},
    error::{GameError, GameResult},
    events::{EventGenerator, EventOutcome, EventTargets},
    player::{LevelUp, Player},
    quests::{Quest, QuestBoard},
    story::Storyline,
    tech::{TechnologyTree, Upgrade},
    universe::{Planet, PlanetGenerator, Universe},
};

/// Name of the commodity sold at the fuel pump.
pub const FUEL_COMMODITY: &str = "fuel";
/// Fuel price used when the catalog has no fuel commodity.
pub const FLAT_FUEL_PRICE: f64 = 10.0;

/// Build the session RNG, seeded when a seed is configured.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Parameters fixed at game creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub difficulty: u32,
    pub starting_credits: f64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulty: 2,
            starting_credits: 10_000.0,
        }
    }
}

impl From<&AppConfig> for GameSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            difficulty: config.difficulty,
            starting_credits: config.starting_credits,
        }
    }
}

/// One player decision.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Buy { commodity: String, quantity: u32 },
    Sell { commodity: String, quantity: u32 },
    Travel { destination: String },
    /// Travel to the other end of a saved route.
    FollowRoute { index: usize },
    /// Remember a route from the current planet.
    SaveRoute { destination: String },
    Refuel { units: f64 },
    PurchaseUpgrade { category: String, name: String },
    Scan,
    ChartFrontier,
    MarketOverview,
    Quit,
}

/// What happened during an action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnReport {
    pub messages: Vec<String>,
    pub level_ups: Vec<LevelUp>,
    /// Story chapters unlocked by those level-ups.
    pub chapters: Vec<String>,
    pub completed_quests: Vec<Quest>,
    pub event: Option<EventOutcome>,
    pub scan: Option<Planet>,
    pub overview: Option<MarketOverview>,
}

impl TurnReport {
    fn message(text: impl Into<String>) -> Self {
        Self {
            messages: vec![text.into()],
            ..Self::default()
        }
    }

    fn push(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
    }

    fn add_level_ups(&mut self, level_ups: Vec<LevelUp>) {
        for level_up in &level_ups {
            self.push(format!(
                "Level up! You reached level {} ({}).",
                level_up.level,
                level_up.benefit.describe()
            ));
            if let Some(chapter) = Storyline::chapter(level_up.level) {
                self.chapters.push(chapter.to_string());
            }
        }
        self.level_ups.extend(level_ups);
    }
}

/// Everything needed to resume a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSnapshot {
    pub settings: GameSettings,
    pub player: Player,
    /// Planets including charted frontier worlds, plus the trade network.
    pub universe: Universe,
    pub quest_pool: Vec<Quest>,
    /// Current planet, by name.
    pub current_planet: String,
    /// Commodities with their current base prices.
    pub commodities: Vec<Commodity>,
    pub game_over: bool,
    pub intro_shown: bool,
}

/// A running session.
#[derive(Debug)]
pub struct Game {
    settings: GameSettings,
    universe: Universe,
    generator: PlanetGenerator,
    market: Market,
    player: Player,
    quests: QuestBoard,
    tech: TechnologyTree,
    events: EventGenerator,
    current_planet: String,
    game_over: bool,
    intro_shown: bool,
    rng: StdRng,
}

impl Game {
    /// Generate a new universe and drop the player on a random planet.
    pub fn new(settings: GameSettings, content: &Content, mut rng: StdRng) -> Result<Self> {
        let generator = PlanetGenerator::new(content.planets.clone());
        let universe = generator.generate(settings.difficulty, &mut rng);
        let Some(start) = universe
            .planets
            .choose(&mut rng)
            .map(|planet| planet.name.clone())
        else {
            bail!("planet catalog has no names");
        };
        let quests = QuestBoard::from_templates(&content.quests, &universe, &mut rng);
        info!(
            difficulty = settings.difficulty,
            planets = universe.planets.len(),
            quests = quests.pool().len(),
            start = %start,
            "new game"
        );

        Ok(Self {
            settings,
            universe,
            generator,
            market: Market::new(content.commodities.clone()),
            player: Player::new(settings.starting_credits),
            quests,
            tech: TechnologyTree::new(content.technologies.clone()),
            events: EventGenerator::new(),
            current_planet: start,
            game_over: false,
            intro_shown: false,
            rng,
        })
    }

    /// Resume from a snapshot; the current planet must exist in it.
    pub fn restore(snapshot: GameSnapshot, content: &Content, rng: StdRng) -> GameResult<Self> {
        if !snapshot.universe.contains(&snapshot.current_planet) {
            return Err(GameError::UnknownPlanet(snapshot.current_planet));
        }
        let player = &snapshot.player;
        let referenced = player
            .active_quests()
            .iter()
            .map(|quest| quest.destination.as_str())
            .chain(
                player
                    .trade_routes()
                    .iter()
                    .flat_map(|route| [route.origin.as_str(), route.destination.as_str()]),
            );
        for name in referenced {
            if !snapshot.universe.contains(name) {
                return Err(GameError::UnknownPlanet(name.to_string()));
            }
        }
        let market = if snapshot.commodities.is_empty() {
            Market::new(content.commodities.clone())
        } else {
            Market::from_commodities(snapshot.commodities)
        };
        info!(
            planet = %snapshot.current_planet,
            turn = snapshot.player.turn(),
            "game restored"
        );

        Ok(Self {
            settings: snapshot.settings,
            universe: snapshot.universe,
            generator: PlanetGenerator::new(content.planets.clone()),
            market,
            player: snapshot.player,
            quests: QuestBoard::restore(snapshot.quest_pool),
            tech: TechnologyTree::new(content.technologies.clone()),
            events: EventGenerator::new(),
            current_planet: snapshot.current_planet,
            game_over: snapshot.game_over,
            intro_shown: snapshot.intro_shown,
            rng,
        })
    }

    /// Capture the whole session.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            settings: self.settings,
            player: self.player.clone(),
            universe: self.universe.clone(),
            quest_pool: self.quests.pool().to_vec(),
            current_planet: self.current_planet.clone(),
            commodities: self.market.commodities().to_vec(),
            game_over: self.game_over,
            intro_shown: self.intro_shown,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn quest_board(&self) -> &QuestBoard {
        &self.quests
    }

    pub fn difficulty(&self) -> u32 {
        self.settings.difficulty
    }

    pub fn current_planet_name(&self) -> &str {
        &self.current_planet
    }

    pub fn current_planet(&self) -> GameResult<&Planet> {
        self.universe.require(&self.current_planet)
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn intro_shown(&self) -> bool {
        self.intro_shown
    }

    /// Record that the opening chapter has been displayed.
    pub fn mark_intro_shown(&mut self) {
        self.intro_shown = true;
    }

    /// Story chapters the player has unlocked so far.
    pub fn story_so_far(&self) -> Vec<&'static str> {
        Storyline::chapters_up_to(self.player.level())
    }

    /// Upgrades the player can still buy.
    pub fn available_upgrades(&self) -> Vec<&Upgrade> {
        self.tech.available_upgrades(self.player.tech_levels())
    }

    /// Planets other than the current one, with travel distance.
    pub fn destinations(&self) -> GameResult<Vec<(String, f64)>> {
        self.universe
            .planets
            .iter()
            .filter(|planet| planet.name != self.current_planet)
            .map(|planet| {
                self.universe
                    .distance(&self.current_planet, &planet.name)
                    .map(|distance| (planet.name.clone(), distance))
            })
            .collect()
    }

    /// Live prices on the current planet.
    pub fn quote(&mut self) -> GameResult<Vec<(String, f64)>> {
        let planet = self.universe.require(&self.current_planet)?;
        self.market.quote(planet, &mut self.rng)
    }

    /// Quest offers for the start of a turn.
    pub fn begin_turn(&mut self) -> GameResult<Vec<Quest>> {
        self.ensure_running()?;
        Ok(self.quests.offer_quests(self.player.level(), &mut self.rng))
    }

    /// Accept one of the offered quests.
    pub fn accept_quest(&mut self, id: u32) -> GameResult<Quest> {
        self.ensure_running()?;
        self.quests.accept(id, &mut self.player)
    }

    /// Close the turn.
    pub fn end_turn(&mut self) {
        self.player.advance_turn();
        debug!(turn = self.player.turn(), "turn advanced");
    }

    /// Carry out one action.
    pub fn perform(&mut self, action: Action) -> GameResult<TurnReport> {
        self.ensure_running()?;
        match action {
            Action::Buy {
                commodity,
                quantity,
            } => self.buy(&commodity, quantity),
            Action::Sell {
                commodity,
                quantity,
            } => self.sell(&commodity, quantity),
            Action::Travel { destination } => self.travel(&destination),
            Action::FollowRoute { index } => self.follow_trade_route(index),
            Action::SaveRoute { destination } => self.save_trade_route(&destination),
            Action::Refuel { units } => self.refuel(units),
            Action::PurchaseUpgrade { category, name } => self.purchase_upgrade(&category, &name),
            Action::Scan => self.scan_planet(),
            Action::ChartFrontier => self.chart_frontier(),
            Action::MarketOverview => self.market_overview(),
            Action::Quit => {
                self.game_over = true;
                info!(
                    turn = self.player.turn(),
                    credits = self.player.credits(),
                    "game over"
                );
                Ok(TurnReport::message(format!(
                    "You retire with {:.2} credits and a net profit of {:.2}.",
                    self.player.credits(),
                    self.player.net_profit()
                )))
            }
        }
    }

    fn ensure_running(&self) -> GameResult<()> {
        if self.game_over {
            Err(GameError::GameOver)
        } else {
            Ok(())
        }
    }

    fn local_price(&mut self, commodity: &str) -> GameResult<f64> {
        let planet = self.universe.require(&self.current_planet)?;
        self.market.price(commodity, planet, &mut self.rng)
    }

    fn buy(&mut self, commodity: &str, quantity: u32) -> GameResult<TurnReport> {
        let price = self.local_price(commodity)?;
        self.player.add_cargo(commodity, quantity, price)?;
        Ok(TurnReport::message(format!(
            "Bought {quantity} {commodity} at {price:.2} each ({:.2} total).",
            price * f64::from(quantity)
        )))
    }

    fn sell(&mut self, commodity: &str, quantity: u32) -> GameResult<TurnReport> {
        let price = self.local_price(commodity)?;
        let outcome = self.player.sell_cargo(commodity, quantity, price)?;
        let mut report = TurnReport::message(format!(
            "Sold {quantity} {commodity} at {price:.2} each for {:.2} ({} {:.2}).",
            outcome.revenue,
            if outcome.profit > 0.0 { "profit" } else { "loss" },
            outcome.profit.abs()
        ));
        report.add_level_ups(outcome.level_ups);
        Ok(report)
    }

    /// Jump to another planet; an event fires on arrival.
    fn travel(&mut self, destination: &str) -> GameResult<TurnReport> {
        if destination == self.current_planet {
            return Err(GameError::AlreadyDocked(destination.to_string()));
        }
        let index = self
            .universe
            .planets
            .iter()
            .position(|planet| planet.name == destination)
            .ok_or_else(|| GameError::UnknownPlanet(destination.to_string()))?;
        let distance = self.universe.distance(&self.current_planet, destination)?;
        // Nothing below may fail once fuel is burned.
        let fuel = self.player.travel(distance)?;
        info!(from = %self.current_planet, to = destination, distance, fuel, "travelled");
        self.current_planet = destination.to_string();

        let mut report = TurnReport::message(format!(
            "Arrived at {destination} after {distance:.1} units, burning {fuel:.1} fuel."
        ));
        let outcome = self.events.fire(
            EventTargets {
                player: &mut self.player,
                market: &mut self.market,
                tech: &self.tech,
                planet: &mut self.universe.planets[index],
            },
            &mut self.rng,
        );
        report.push(outcome.message());
        report.event = Some(outcome);
        Ok(report)
    }

    fn follow_trade_route(&mut self, index: usize) -> GameResult<TurnReport> {
        let destination = self
            .player
            .trade_routes()
            .get(index)
            .and_then(|route| route.other_end(&self.current_planet))
            .map(str::to_string)
            .ok_or_else(|| GameError::RouteUnavailable(format!("route {}", index + 1)))?;
        self.travel(&destination)
    }

    fn save_trade_route(&mut self, destination: &str) -> GameResult<TurnReport> {
        self.universe.require(destination)?;
        if !self.player.add_trade_route(&self.current_planet, destination) {
            return Err(GameError::RouteUnavailable(destination.to_string()));
        }
        Ok(TurnReport::message(format!(
            "Trade route {} <-> {destination} saved.",
            self.current_planet
        )))
    }

    fn refuel(&mut self, units: f64) -> GameResult<TurnReport> {
        let price = if self.market.has_commodity(FUEL_COMMODITY) {
            self.local_price(FUEL_COMMODITY)?
        } else {
            FLAT_FUEL_PRICE
        };
        let cost = self.player.refuel(units, price)?;
        Ok(TurnReport::message(format!(
            "Refuelled {units:.1} units for {cost:.2} credits."
        )))
    }

    fn purchase_upgrade(&mut self, category: &str, name: &str) -> GameResult<TurnReport> {
        let upgrade = self.tech.find(category, name)?.clone();
        if !self
            .available_upgrades()
            .iter()
            .any(|available| available.name == upgrade.name)
        {
            return Err(GameError::UpgradeUnavailable(upgrade.name));
        }
        let changes = self.player.purchase_upgrade(&upgrade)?;
        let mut report = TurnReport::message(format!(
            "Installed {} for {:.2} credits.",
            upgrade.name, upgrade.cost
        ));
        for change in changes {
            report.push(format!(
                "{}: {} -> {}",
                change.attribute, change.old, change.new
            ));
        }
        Ok(report)
    }

    /// Survey the current planet and complete quests bound to it.
    fn scan_planet(&mut self) -> GameResult<TurnReport> {
        let planet = self.universe.require(&self.current_planet)?.clone();
        let completed = self.player.complete_quests_at(&planet.name);
        let mut report = TurnReport::message(format!("Scan of {} complete.", planet.name));
        for quest in &completed {
            info!(quest = %quest.title, planet = %planet.name, "quest completed");
            report.push(format!("Quest complete: {}.", quest.title));
        }
        report.completed_quests = completed;
        report.scan = Some(planet);
        Ok(report)
    }

    fn chart_frontier(&mut self) -> GameResult<TurnReport> {
        let planet = self.generator.spawn_frontier(&mut self.universe, &mut self.rng);
        let name = planet.name.clone();
        let lanes = self.universe.neighbours(&name).len();
        info!(planet = %name, lanes, "frontier charted");
        Ok(TurnReport::message(format!(
            "Charted the frontier world {name} ({lanes} lanes)."
        )))
    }

    fn market_overview(&mut self) -> GameResult<TurnReport> {
        let overview = self
            .market
            .market_overview(&self.universe.planets, &mut self.rng)?;
        Ok(TurnReport {
            messages: vec![format!(
                "Market overview of {} planets.",
                overview.rows.len()
            )],
            overview: Some(overview),
            ..TurnReport::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        content::{default_commodities, PlanetCatalog, QuestTemplate, UpgradeDef},
        quests::QuestKind,
        tech::ShipAttribute,
    };
    use std::collections::BTreeMap;

    fn content() -> Content {
        let quests = (0..3)
            .map(|i| QuestTemplate {
                title: format!("Delivery {i}"),
                description: "Haul {quantity} crates to {destination}.".to_string(),
                backstory: String::new(),
                kind: QuestKind::CargoDelivery,
                reward: 250.0,
                destination: None,
                required_quantity: 5,
            })
            .collect();
        let mut technologies = BTreeMap::new();
        technologies.insert(
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
        Content {
            commodities: default_commodities(),
            quests,
            technologies,
            planets: PlanetCatalog::default(),
        }
    }

    fn game(seed: u64) -> Game {
        Game::new(GameSettings::default(), &content(), make_rng(Some(seed))).unwrap()
    }

    fn other_planet(game: &Game) -> String {
        game.destinations().unwrap()[0].0.clone()
    }

    #[test]
    fn new_game_places_player_on_a_planet() {
        let game = game(1);
        assert_eq!(game.universe().planets.len(), 9);
        assert!(game.current_planet().is_ok());
        assert_eq!(game.quest_board().pool().len(), 3);
        assert_eq!(game.player().credits(), 10_000.0);
        assert_eq!(game.destinations().unwrap().len(), 8);
    }

    #[test]
    fn buy_then_sell_round_trips_cargo() {
        let mut game = game(2);
        game.perform(Action::Buy {
            commodity: "raw_materials".to_string(),
            quantity: 5,
        })
        .unwrap();
        assert_eq!(game.player().held("raw_materials"), 5);
        assert!(game.player().credits() < 10_000.0);

        game.perform(Action::Sell {
            commodity: "raw_materials".to_string(),
            quantity: 5,
        })
        .unwrap();
        assert_eq!(game.player().held("raw_materials"), 0);
        assert_eq!(game.player().trade_history().len(), 2);
    }

    #[test]
    fn unknown_commodity_is_a_data_error() {
        let mut game = game(3);
        let err = game
            .perform(Action::Buy {
                commodity: "spice".to_string(),
                quantity: 1,
            })
            .unwrap_err();
        assert_eq!(err, GameError::UnknownCommodity("spice".to_string()));
        assert!(!err.is_rule_violation());
    }

    #[test]
    fn travel_moves_and_fires_one_event() {
        let mut game = game(4);
        let destination = other_planet(&game);
        let report = game
            .perform(Action::Travel {
                destination: destination.clone(),
            })
            .unwrap();
        assert_eq!(game.current_planet_name(), destination);
        assert_eq!(game.player().total_trips(), 1);
        assert!(report.event.is_some());
        assert!(game.player().total_fuel_used() > 0.0);
    }

    #[test]
    fn failed_travel_leaves_the_session_unchanged() {
        let mut game = game(14);
        let before = game.snapshot();
        assert_eq!(
            game.perform(Action::Travel {
                destination: "Nowhere".to_string()
            }),
            Err(GameError::UnknownPlanet("Nowhere".to_string()))
        );
        assert_eq!(game.snapshot(), before);

        let gone = other_planet(&game);
        let mut pruned = game.snapshot();
        pruned.universe.planets.retain(|planet| planet.name != gone);
        let mut game = Game::restore(pruned, &content(), make_rng(Some(2))).unwrap();
        let before = game.snapshot();
        assert_eq!(
            game.perform(Action::Travel {
                destination: gone.clone()
            }),
            Err(GameError::UnknownPlanet(gone))
        );
        assert_eq!(game.snapshot(), before);
        assert_eq!(game.player().total_trips(), 0);
    }

    #[test]
    fn travel_to_current_planet_is_rejected() {
        let mut game = game(5);
        let here = game.current_planet_name().to_string();
        assert_eq!(
            game.perform(Action::Travel {
                destination: here.clone()
            }),
            Err(GameError::AlreadyDocked(here))
        );
        assert_eq!(game.player().total_trips(), 0);
    }

    #[test]
    fn trade_routes_can_be_saved_and_followed() {
        let mut game = game(6);
        let home = game.current_planet_name().to_string();
        let destination = other_planet(&game);
        game.perform(Action::SaveRoute {
            destination: destination.clone(),
        })
        .unwrap();
        assert!(game
            .perform(Action::SaveRoute {
                destination: destination.clone()
            })
            .is_err());

        game.perform(Action::FollowRoute { index: 0 }).unwrap();
        assert_eq!(game.current_planet_name(), destination);
        game.perform(Action::FollowRoute { index: 0 }).unwrap();
        assert_eq!(game.current_planet_name(), home);
        assert!(matches!(
            game.perform(Action::FollowRoute { index: 3 }),
            Err(GameError::RouteUnavailable(_))
        ));
    }

    #[test]
    fn scanning_destination_completes_quest() {
        let mut game = game(7);
        let offers = game.begin_turn().unwrap();
        assert_eq!(offers.len(), 1);
        let quest = game.accept_quest(offers[0].id).unwrap();
        assert_eq!(game.player().credits(), 10_250.0);
        assert_eq!(game.quest_board().pool().len(), 2);

        if quest.destination != game.current_planet_name() {
            game.perform(Action::Travel {
                destination: quest.destination.clone(),
            })
            .unwrap();
        }
        let held = game.player().cargo_used();
        if held < quest.required_quantity {
            let report = game.perform(Action::Scan).unwrap();
            assert!(report.completed_quests.is_empty());
            assert_eq!(game.player().active_quests().len(), 1);
            game.perform(Action::Buy {
                commodity: "fuel".to_string(),
                quantity: quest.required_quantity - held,
            })
            .unwrap();
        }
        let report = game.perform(Action::Scan).unwrap();
        assert_eq!(report.completed_quests, vec![quest]);
        assert!(game.player().active_quests().is_empty());
        assert_eq!(
            report.scan.map(|planet| planet.name),
            Some(game.current_planet_name().to_string())
        );
    }

    #[test]
    fn upgrades_can_only_be_bought_once() {
        let mut game = game(8);
        game.perform(Action::PurchaseUpgrade {
            category: "Cargo".to_string(),
            name: "Basic Cargo Pods".to_string(),
        })
        .unwrap();
        assert_eq!(game.player().cargo_capacity(), 150);
        assert_eq!(game.player().credits(), 8_500.0);
        assert_eq!(
            game.perform(Action::PurchaseUpgrade {
                category: "Cargo".to_string(),
                name: "Basic Cargo Pods".to_string(),
            }),
            Err(GameError::UpgradeUnavailable("Basic Cargo Pods".to_string()))
        );
        assert!(game.available_upgrades().is_empty());
    }

    #[test]
    fn refuel_uses_the_local_fuel_price() {
        let mut game = game(9);
        let destination = other_planet(&game);
        game.perform(Action::Travel { destination }).unwrap();
        let fuel = game.player().fuel_level();
        let credits = game.player().credits();
        game.perform(Action::Refuel { units: 0.5 }).unwrap();
        assert!((game.player().fuel_level() - (fuel + 0.5)).abs() < 1e-9);
        assert!(game.player().credits() < credits);
    }

    #[test]
    fn charting_adds_a_frontier_planet() {
        let mut game = game(10);
        let before = game.universe().planets.len();
        game.perform(Action::ChartFrontier).unwrap();
        assert_eq!(game.universe().planets.len(), before + 1);
        assert!(game.universe().planets.last().unwrap().frontier);
    }

    #[test]
    fn overview_lists_every_planet() {
        let mut game = game(11);
        let report = game.perform(Action::MarketOverview).unwrap();
        let overview = report.overview.unwrap();
        assert_eq!(overview.rows.len(), game.universe().planets.len());
        assert_eq!(overview.commodities.len(), default_commodities().len());
    }

    #[test]
    fn quitting_ends_the_game() {
        let mut game = game(12);
        game.perform(Action::Quit).unwrap();
        assert!(game.is_over());
        assert_eq!(game.perform(Action::Scan), Err(GameError::GameOver));
        assert_eq!(game.begin_turn(), Err(GameError::GameOver));
    }

    #[test]
    fn snapshot_restores_the_session() {
        let mut game = game(13);
        game.perform(Action::ChartFrontier).unwrap();
        game.perform(Action::Buy {
            commodity: "fuel".to_string(),
            quantity: 3,
        })
        .unwrap();
        game.mark_intro_shown();
        game.end_turn();

        let snapshot = game.snapshot();
        let restored = Game::restore(snapshot.clone(), &content(), make_rng(Some(1))).unwrap();
        assert_eq!(restored.player(), game.player());
        assert_eq!(restored.current_planet_name(), game.current_planet_name());
        assert_eq!(restored.universe().planets.len(), game.universe().planets.len());
        assert_eq!(restored.quest_board(), game.quest_board());
        assert!(restored.intro_shown());
        assert_eq!(restored.player().turn(), 2);

        let mut broken = snapshot.clone();
        broken.current_planet = "Nowhere".to_string();
        assert!(matches!(
            Game::restore(broken, &content(), make_rng(None)),
            Err(GameError::UnknownPlanet(name)) if name == "Nowhere"
        ));
    }

    #[test]
    fn restore_rejects_dangling_quests_and_routes() {
        let game = game(15);
        let here = game.current_planet_name().to_string();

        let mut routed = game.snapshot();
        assert!(routed.player.add_trade_route(&here, "Atlantis"));
        assert!(matches!(
            Game::restore(routed, &content(), make_rng(None)),
            Err(GameError::UnknownPlanet(name)) if name == "Atlantis"
        ));

        let mut quested = game.snapshot();
        let mut quest = quested.quest_pool[0].clone();
        quest.destination = "Lemuria".to_string();
        quested.player.add_active_quest(quest);
        assert!(matches!(
            Game::restore(quested, &content(), make_rng(None)),
            Err(GameError::UnknownPlanet(name)) if name == "Lemuria"
        ));

        assert!(Game::restore(game.snapshot(), &content(), make_rng(None)).is_ok());
    }

    #[test]
    fn level_ups_unlock_story_chapters() {
        let mut report = TurnReport::default();
        let mut player = Player::new(0.0);
        report.add_level_ups(player.gain_experience(250));
        assert_eq!(report.level_ups.len(), 2);
        assert_eq!(report.chapters.len(), 2);
        assert_eq!(report.messages.len(), 2);
    }
}
