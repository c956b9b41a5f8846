//! Prompt-driven turn flow on top of [`Game`].

use std::time::Duration;

use hauler_core::{
    economy::MarketOverview,
    game::{Action, Game, TurnReport},
    quests::Quest,
    universe::Planet,
    GameError,
};
use tracing::{error, info};

use crate::{
    input::{parse_choice, parse_number, InputError},
    typewriter::MessageLog,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    Buy,
    Sell,
    Travel,
    FollowRoute,
    SaveRoute,
    Refuel,
    Upgrade,
    Scan,
    ChartFrontier,
    MarketOverview,
    SaveAndExit,
    Retire,
}

pub const MAIN_CHOICES: [MainChoice; 12] = [
    MainChoice::Buy,
    MainChoice::Sell,
    MainChoice::Travel,
    MainChoice::FollowRoute,
    MainChoice::SaveRoute,
    MainChoice::Refuel,
    MainChoice::Upgrade,
    MainChoice::Scan,
    MainChoice::ChartFrontier,
    MainChoice::MarketOverview,
    MainChoice::SaveAndExit,
    MainChoice::Retire,
];

impl MainChoice {
    pub fn label(self) -> &'static str {
        match self {
            MainChoice::Buy => "Buy goods",
            MainChoice::Sell => "Sell goods",
            MainChoice::Travel => "Travel",
            MainChoice::FollowRoute => "Follow trade route",
            MainChoice::SaveRoute => "Save trade route",
            MainChoice::Refuel => "Refuel",
            MainChoice::Upgrade => "Upgrade ship",
            MainChoice::Scan => "Scan planet",
            MainChoice::ChartFrontier => "Chart the frontier",
            MainChoice::MarketOverview => "Market overview",
            MainChoice::SaveAndExit => "Save and return to menu",
            MainChoice::Retire => "Retire",
        }
    }
}

/// What the numbered prompt is currently asking for.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Quest offers at the start of a turn; 0 declines.
    Quests,
    Main,
    Commodity(Side),
    Quantity {
        side: Side,
        commodity: String,
        max: u32,
    },
    Destination,
    FollowRoute,
    SaveRoute,
    Refuel {
        max: u32,
    },
    Upgrade,
    GameOver,
}

/// Content of the details panel when no prompt claims it.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Market,
    Scan(Planet),
    Overview(MarketOverview),
}

/// Result of submitting a line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// An action completed; the turn is over.
    TurnDone,
    /// Leave the play screen.
    Exit,
}

/// A game on the play screen with its prompt state.
pub struct PlayState {
    pub game: Game,
    pub prompt: Prompt,
    pub offers: Vec<Quest>,
    pub quote: Vec<(String, f64)>,
    pub detail: Detail,
    pub log: MessageLog,
    pub notice: Option<String>,
}

impl PlayState {
    /// Wrap a new game and show the opening chapter.
    pub fn start(mut game: Game, text_delay: Duration) -> Self {
        let mut log = MessageLog::new(text_delay);
        if !game.intro_shown() {
            log.extend(game.story_so_far());
            game.mark_intro_shown();
        }
        let mut state = Self::with_log(game, log);
        state.begin_turn();
        state
    }

    /// Wrap a restored game.
    pub fn resume(game: Game, text_delay: Duration) -> Self {
        let mut log = MessageLog::new(text_delay);
        log.push(format!(
            "Welcome back, captain. Turn {} at {}.",
            game.player().turn(),
            game.current_planet_name()
        ));
        let mut state = Self::with_log(game, log);
        if state.game.is_over() {
            state.prompt = Prompt::GameOver;
            state.log.push("This voyage has already ended.");
        } else {
            state.begin_turn();
        }
        state
    }

    fn with_log(game: Game, log: MessageLog) -> Self {
        Self {
            game,
            prompt: Prompt::Main,
            offers: Vec::new(),
            quote: Vec::new(),
            detail: Detail::Market,
            log,
            notice: None,
        }
    }

    /// Close the finished turn and open the next one.
    pub fn next_turn(&mut self) {
        if self.game.is_over() {
            self.prompt = Prompt::GameOver;
            return;
        }
        self.game.end_turn();
        self.begin_turn();
    }

    fn begin_turn(&mut self) {
        self.refresh_quote();
        match self.game.begin_turn() {
            Ok(offers) => {
                self.offers = offers;
                self.prompt = if self.offers.is_empty() {
                    Prompt::Main
                } else {
                    Prompt::Quests
                };
            }
            Err(err) => {
                self.report_error(err);
                self.prompt = Prompt::GameOver;
            }
        }
    }

    fn refresh_quote(&mut self) {
        match self.game.quote() {
            Ok(quote) => self.quote = quote,
            Err(err) => {
                error!(?err, "failed to quote local market");
                self.quote.clear();
            }
        }
    }

    fn open_main(&mut self) {
        self.prompt = Prompt::Main;
    }

    /// Esc: back out of the current sub-prompt.
    pub fn cancel(&mut self) -> Step {
        match self.prompt {
            Prompt::GameOver => Step::Exit,
            Prompt::Main => {
                self.notice = Some(format!(
                    "Choose {} to save and leave",
                    MAIN_CHOICES.len() - 1
                ));
                Step::Continue
            }
            _ => {
                self.open_main();
                Step::Continue
            }
        }
    }

    /// Numbered options for the current prompt.
    pub fn options(&self) -> Vec<String> {
        match &self.prompt {
            Prompt::Quests => self
                .offers
                .iter()
                .map(|quest| {
                    format!(
                        "{} ({}, {:.0} cr) to {}",
                        quest.title,
                        quest.kind.label(),
                        quest.reward,
                        quest.destination
                    )
                })
                .collect(),
            Prompt::Main => MAIN_CHOICES
                .iter()
                .map(|choice| choice.label().to_string())
                .collect(),
            Prompt::Commodity(Side::Buy) => self
                .quote
                .iter()
                .map(|(name, price)| format!("{name} @ {price:.2}"))
                .collect(),
            Prompt::Commodity(Side::Sell) => self
                .game
                .player()
                .inventory()
                .iter()
                .map(|(name, lot)| {
                    format!(
                        "{name} x{} (paid {:.2})",
                        lot.quantity, lot.avg_buy_price
                    )
                })
                .collect(),
            Prompt::Destination | Prompt::SaveRoute => self
                .destinations()
                .iter()
                .map(|(name, distance)| format!("{name} ({distance:.1} units)"))
                .collect(),
            Prompt::FollowRoute => self
                .game
                .player()
                .trade_routes()
                .iter()
                .map(|route| format!("{} <-> {}", route.origin, route.destination))
                .collect(),
            Prompt::Upgrade => self
                .game
                .available_upgrades()
                .iter()
                .map(|upgrade| {
                    format!(
                        "{}: {} (L{}, {:.0} cr) {}",
                        upgrade.category,
                        upgrade.name,
                        upgrade.level,
                        upgrade.cost,
                        upgrade.effects_summary()
                    )
                })
                .collect(),
            Prompt::Quantity { .. } | Prompt::Refuel { .. } | Prompt::GameOver => Vec::new(),
        }
    }

    /// One-line question shown above the options.
    pub fn question(&self) -> String {
        match &self.prompt {
            Prompt::Quests => "Quest offers (0 declines)".to_string(),
            Prompt::Main => "What next?".to_string(),
            Prompt::Commodity(Side::Buy) => "Buy which commodity?".to_string(),
            Prompt::Commodity(Side::Sell) => "Sell which commodity?".to_string(),
            Prompt::Quantity {
                side,
                commodity,
                max,
            } => {
                let verb = match side {
                    Side::Buy => "buy",
                    Side::Sell => "sell",
                };
                format!("How many {commodity} to {verb}? (max {max}, 0 cancels)")
            }
            Prompt::Destination => "Travel where?".to_string(),
            Prompt::FollowRoute => "Follow which route?".to_string(),
            Prompt::SaveRoute => "Save a route to where?".to_string(),
            Prompt::Refuel { max } => format!("Buy how much fuel? (max {max}, 0 cancels)"),
            Prompt::Upgrade => "Install which upgrade?".to_string(),
            Prompt::GameOver => "Game over. Press Enter to return to the menu.".to_string(),
        }
    }

    /// Planets other than the current one with distances.
    pub fn destinations(&self) -> Vec<(String, f64)> {
        match self.game.destinations() {
            Ok(destinations) => destinations,
            Err(err) => {
                error!(?err, "failed to list destinations");
                Vec::new()
            }
        }
    }

    /// Handle a submitted line. Invalid input leaves the game untouched.
    pub fn submit(&mut self, raw: &str) -> Step {
        match self.try_submit(raw) {
            Ok(step) => step,
            Err(err) => {
                self.notice = Some(err.to_string());
                Step::Continue
            }
        }
    }

    fn try_submit(&mut self, raw: &str) -> Result<Step, InputError> {
        let step = match self.prompt.clone() {
            Prompt::Quests => {
                let choice = parse_number(raw, 0, self.offers.len() as u64)? as usize;
                if choice == 0 {
                    self.open_main();
                } else {
                    self.accept_offer(choice - 1);
                }
                Step::Continue
            }
            Prompt::Main => {
                let choice = MAIN_CHOICES[parse_choice(raw, MAIN_CHOICES.len())?];
                self.choose(choice)
            }
            Prompt::Commodity(side) => {
                let options = self.options();
                let index = parse_choice(raw, options.len())?;
                self.pick_commodity(side, index);
                Step::Continue
            }
            Prompt::Quantity {
                side,
                commodity,
                max,
            } => {
                let quantity = parse_number(raw, 0, u64::from(max))? as u32;
                if quantity == 0 {
                    self.open_main();
                    Step::Continue
                } else {
                    let action = match side {
                        Side::Buy => Action::Buy {
                            commodity,
                            quantity,
                        },
                        Side::Sell => Action::Sell {
                            commodity,
                            quantity,
                        },
                    };
                    self.act(action)
                }
            }
            Prompt::Destination => {
                let destinations = self.destinations();
                let index = parse_choice(raw, destinations.len())?;
                let destination = destinations[index].0.clone();
                self.act(Action::Travel { destination })
            }
            Prompt::FollowRoute => {
                let index = parse_choice(raw, self.game.player().trade_routes().len())?;
                self.act(Action::FollowRoute { index })
            }
            Prompt::SaveRoute => {
                let destinations = self.destinations();
                let index = parse_choice(raw, destinations.len())?;
                let destination = destinations[index].0.clone();
                self.act(Action::SaveRoute { destination })
            }
            Prompt::Refuel { max } => {
                let units = parse_number(raw, 0, u64::from(max))?;
                if units == 0 {
                    self.open_main();
                    Step::Continue
                } else {
                    self.act(Action::Refuel {
                        units: units as f64,
                    })
                }
            }
            Prompt::Upgrade => {
                let available: Vec<(String, String)> = self
                    .game
                    .available_upgrades()
                    .iter()
                    .map(|upgrade| (upgrade.category.clone(), upgrade.name.clone()))
                    .collect();
                let index = parse_choice(raw, available.len())?;
                let (category, name) = available[index].clone();
                self.act(Action::PurchaseUpgrade { category, name })
            }
            Prompt::GameOver => Step::Exit,
        };
        Ok(step)
    }

    fn accept_offer(&mut self, index: usize) {
        let Some(id) = self.offers.get(index).map(|quest| quest.id) else {
            return;
        };
        match self.game.accept_quest(id) {
            Ok(quest) => {
                self.log.push(format!(
                    "Quest accepted: {} {:.0} credits paid up front.",
                    quest.description, quest.reward
                ));
                if !quest.backstory.is_empty() {
                    self.log.push(quest.backstory);
                }
                self.offers.clear();
                self.open_main();
            }
            Err(err) => self.report_error(err),
        }
    }

    fn choose(&mut self, choice: MainChoice) -> Step {
        let player = self.game.player();
        match choice {
            MainChoice::Buy => self.prompt = Prompt::Commodity(Side::Buy),
            MainChoice::Sell if player.inventory().is_empty() => {
                self.notice = Some("Your hold is empty".to_string());
            }
            MainChoice::Sell => self.prompt = Prompt::Commodity(Side::Sell),
            MainChoice::Travel => self.prompt = Prompt::Destination,
            MainChoice::FollowRoute if player.trade_routes().is_empty() => {
                self.notice = Some("No trade routes saved yet".to_string());
            }
            MainChoice::FollowRoute => self.prompt = Prompt::FollowRoute,
            MainChoice::SaveRoute => self.prompt = Prompt::SaveRoute,
            MainChoice::Refuel => {
                let room = (player.fuel_tank_capacity() - player.fuel_level()).floor();
                if room < 1.0 {
                    self.notice = Some("The tank is full".to_string());
                } else {
                    self.prompt = Prompt::Refuel { max: room as u32 };
                }
            }
            MainChoice::Upgrade if self.game.available_upgrades().is_empty() => {
                self.notice = Some("No upgrades left to buy".to_string());
            }
            MainChoice::Upgrade => self.prompt = Prompt::Upgrade,
            MainChoice::Scan => return self.act(Action::Scan),
            MainChoice::ChartFrontier => return self.act(Action::ChartFrontier),
            MainChoice::MarketOverview => return self.act(Action::MarketOverview),
            MainChoice::SaveAndExit => return Step::Exit,
            MainChoice::Retire => return self.act(Action::Quit),
        }
        Step::Continue
    }

    fn pick_commodity(&mut self, side: Side, index: usize) {
        let player = self.game.player();
        let (commodity, max) = match side {
            Side::Buy => {
                let Some((name, price)) = self.quote.get(index) else {
                    return;
                };
                let affordable = if *price > 0.0 {
                    (player.credits() / price).floor().min(f64::from(u32::MAX)) as u32
                } else {
                    u32::MAX
                };
                (name.clone(), player.cargo_free().min(affordable))
            }
            Side::Sell => {
                let Some((name, lot)) = player.inventory().iter().nth(index) else {
                    return;
                };
                (name.clone(), lot.quantity)
            }
        };
        if max == 0 {
            self.notice = Some(match side {
                Side::Buy => format!("No room or credits for {commodity}"),
                Side::Sell => format!("You hold no {commodity}"),
            });
            self.open_main();
            return;
        }
        self.prompt = Prompt::Quantity {
            side,
            commodity,
            max,
        };
    }

    fn act(&mut self, action: Action) -> Step {
        match self.game.perform(action) {
            Ok(report) => {
                self.absorb(report);
                self.refresh_quote();
                if self.game.is_over() {
                    self.prompt = Prompt::GameOver;
                } else {
                    self.open_main();
                }
                Step::TurnDone
            }
            Err(err) => {
                self.report_error(err);
                self.open_main();
                Step::Continue
            }
        }
    }

    fn absorb(&mut self, report: TurnReport) {
        self.log.extend(report.messages);
        for chapter in report.chapters {
            self.log.push(format!("A new chapter begins: {chapter}"));
        }
        self.detail = if let Some(planet) = report.scan {
            Detail::Scan(planet)
        } else if let Some(overview) = report.overview {
            Detail::Overview(overview)
        } else {
            Detail::Market
        };
    }

    fn report_error(&mut self, err: GameError) {
        if err.is_rule_violation() {
            info!(%err, "action rejected");
            self.notice = Some(format!("Cannot do that: {err}"));
        } else {
            error!(?err, "turn failed");
            self.notice = Some(format!("Error: {err}"));
        }
    }
}
