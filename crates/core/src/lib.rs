#![warn(clippy::all, missing_docs)]

//! Core simulation for the Hauler space-trading game.
//!
//! This crate hosts the content catalogs, universe generation, market,
//! player ledger, quests, technology tree, random events, configuration
//! and save handling used by the terminal UI.

pub mod config;
pub mod content;
pub mod economy;
pub mod error;
pub mod events;
pub mod game;
pub mod player;
pub mod quests;
pub mod save;
pub mod story;
pub mod tech;
pub mod universe;

pub use config::AppConfig;
pub use content::{Content, ContentLoader};
pub use economy::{Market, MarketOverview};
pub use error::{GameError, GameResult};
pub use events::{EventGenerator, EventKind, EventOutcome};
pub use game::{Action, Game, GameSettings, GameSnapshot, TurnReport};
pub use player::Player;
pub use quests::{Quest, QuestBoard, QuestKind};
pub use save::{SaveEntry, SaveManager};
pub use story::Storyline;
pub use tech::{ShipAttribute, TechnologyTree, Upgrade};
pub use universe::{Planet, PlanetGenerator, Universe};
