#![allow(missing_docs)]

//! Quest templates turned into concrete offers, and the board that hands them out.

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    content::{render_template, QuestTemplate},
    error::{GameError, GameResult},
    player::Player,
    universe::Universe,
};

/// Quest type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
    /// Carry passengers; needs pods and life support for `required_quantity`.
    PassengerTransport,
    CargoDelivery,
    Exploration,
}

impl QuestKind {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            QuestKind::PassengerTransport => "passenger transport",
            QuestKind::CargoDelivery => "cargo delivery",
            QuestKind::Exploration => "exploration",
        }
    }
}

/// A concrete quest bound to a destination in the current universe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quest {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub backstory: String,
    pub kind: QuestKind,
    pub reward: f64,
    /// Scanning this planet completes the quest.
    pub destination: String,
    pub required_quantity: u32,
}

/// Number of offers shown to a player of the given level.
pub fn offer_count(level: u32) -> usize {
    if level < 4 {
        1
    } else if level < 11 {
        2
    } else {
        3
    }
}

/// The pool of quests not yet accepted.
///
/// Offering never changes the pool; accepting removes exactly the accepted quest.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuestBoard {
    pool: Vec<Quest>,
}

impl QuestBoard {
    /// Bind every template to a destination and fill the pool.
    pub fn from_templates(
        templates: &[QuestTemplate],
        universe: &Universe,
        rng: &mut impl Rng,
    ) -> Self {
        let mut board = Self::default();
        let mut next_id = 0;
        for template in templates {
            let destination = template
                .destination
                .as_deref()
                .filter(|name| universe.contains(name))
                .map(str::to_string)
                .or_else(|| {
                    universe
                        .planets
                        .choose(rng)
                        .map(|planet| planet.name.clone())
                });
            let Some(destination) = destination else {
                continue;
            };
            next_id += 1;
            let values = [
                ("destination", destination.clone()),
                ("quantity", template.required_quantity.to_string()),
            ];
            board.pool.push(Quest {
                id: next_id,
                title: template.title.clone(),
                description: render_template(&template.description, &values),
                backstory: render_template(&template.backstory, &values),
                kind: template.kind,
                reward: template.reward,
                destination,
                required_quantity: template.required_quantity,
            });
        }
        board
    }

    /// Rebuild a board from a saved pool.
    pub fn restore(pool: Vec<Quest>) -> Self {
        Self { pool }
    }

    /// Quests still available.
    pub fn pool(&self) -> &[Quest] {
        &self.pool
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Sample offers for a player level without replacement.
    pub fn offer_quests(&self, level: u32, rng: &mut impl Rng) -> Vec<Quest> {
        self.pool
            .choose_multiple(rng, offer_count(level))
            .cloned()
            .collect()
    }

    /// Accept a quest: check requirements, pay the reward and hand it to the player.
    pub fn accept(&mut self, id: u32, player: &mut Player) -> GameResult<Quest> {
        let index = self
            .pool
            .iter()
            .position(|quest| quest.id == id)
            .ok_or(GameError::QuestUnavailable(id))?;
        player.check_quest_requirements(&self.pool[index])?;

        let quest = self.pool.remove(index);
        player.earn(quest.reward);
        player.add_active_quest(quest.clone());
        info!(quest = %quest.title, reward = quest.reward, "quest accepted");
        Ok(quest)
    }
}
