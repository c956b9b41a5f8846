//! Planets, the trade network between them, and the generator that builds both.

use std::collections::BTreeMap;

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    content::{render_template, PlanetCatalog},
    error::{GameError, GameResult},
};

/// Resource kinds a planet can be rich in. They double as commodity names.
pub const RESOURCE_TYPES: [&str; 5] = [
    "raw_materials",
    "agricultural_goods",
    "technological_goods",
    "luxury_goods",
    "industrial_goods",
];

/// Chance that two planets share a direct lane.
pub const LANE_PROBABILITY: f64 = 0.7;
/// Distance used between planets without a direct lane.
pub const DEEP_SPACE_DISTANCE: f64 = 12.0;

const ECONOMY_RANGE: std::ops::Range<f64> = 0.3..1.0;
const RESOURCE_WEIGHT_RANGE: std::ops::RangeInclusive<f64> = 0.1..=1.0;
const LANE_DISTANCE_RANGE: std::ops::Range<f64> = 1.0..10.0;

const CLIMATES: &[&str] = &[
    "Arid",
    "Temperate",
    "Frozen",
    "Tropical",
    "Toxic",
    "Volcanic",
];
const GEOLOGIES: &[&str] = &[
    "Silicate",
    "Iron-rich",
    "Carbonaceous",
    "Ice-crusted",
    "Tectonically active",
];
const HISTORY_TEMPLATES: &[&str] = &[
    "{name} was settled as a {type} world; its {population} inhabitants still argue about who arrived first.",
    "Surveyors rated {name} a {climate} backwater until {settlements} settlements grew around its spaceports.",
    "{name} sits on {geology} bedrock that made its founders rich and its {type} economy restless.",
    "Traders remember {name} for a boom that lifted its economy to {economy}% of the core worlds.",
];

/// Population figures for a planet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Demographics {
    /// Total inhabitants.
    pub population: u64,
    /// Number of settlements.
    pub settlements: u32,
    /// Operational spaceports.
    pub spaceports: u32,
}

/// A location the player can trade at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    /// Unique name; planets compare equal by name.
    pub name: String,
    /// Type tag such as `Mining` or `Trading Hub`.
    pub planet_type: String,
    /// Climate tag.
    pub climate: String,
    /// Geology tag.
    pub geology: String,
    /// Price multiplier applied to every commodity, usually 0.3–1.0.
    pub economy_level: f64,
    /// Resource abundance, resource name -> multiplier in 0.1–1.0.
    pub resources: BTreeMap<String, f64>,
    /// Population figures.
    pub demographics: Demographics,
    /// Flavour text.
    pub history: String,
    /// Whether the planet was charted during play.
    #[serde(default)]
    pub frontier: bool,
}

impl PartialEq for Planet {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Planet {}

impl Planet {
    /// Abundance multiplier for a resource, if the planet has it.
    pub fn resource(&self, name: &str) -> Option<f64> {
        self.resources.get(name).copied()
    }
}

/// A direct lane between two planets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lane {
    /// One endpoint.
    pub from: String,
    /// The other endpoint.
    pub to: String,
    /// Lane length in distance units.
    pub distance: f64,
}

impl Lane {
    fn connects(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// The live planet collection with its trade network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Universe {
    /// Planets in generation order; frontier planets are appended.
    pub planets: Vec<Planet>,
    /// Lanes of the trade network.
    pub lanes: Vec<Lane>,
    /// Names not yet used, consumed by frontier charting.
    pub name_pool: Vec<String>,
    /// Number of frontier planets charted so far.
    #[serde(default)]
    pub frontier_count: u32,
}

impl Universe {
    /// Look up a planet by name.
    pub fn planet(&self, name: &str) -> Option<&Planet> {
        self.planets.iter().find(|planet| planet.name == name)
    }

    /// Mutable lookup by name.
    pub fn planet_mut(&mut self, name: &str) -> Option<&mut Planet> {
        self.planets.iter_mut().find(|planet| planet.name == name)
    }

    /// Look up a planet, treating absence as a data error.
    pub fn require(&self, name: &str) -> GameResult<&Planet> {
        self.planet(name)
            .ok_or_else(|| GameError::UnknownPlanet(name.to_string()))
    }

    /// Whether a planet with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.planet(name).is_some()
    }

    /// Direct lane between two planets, if any.
    pub fn lane(&self, a: &str, b: &str) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.connects(a, b))
    }

    /// Travel distance between two planets.
    pub fn distance(&self, from: &str, to: &str) -> GameResult<f64> {
        self.require(from)?;
        self.require(to)?;
        if from == to {
            return Ok(0.0);
        }
        Ok(self
            .lane(from, to)
            .map(|lane| lane.distance)
            .unwrap_or(DEEP_SPACE_DISTANCE))
    }

    /// Planets sharing a lane with `name`, with distances.
    pub fn neighbours(&self, name: &str) -> Vec<(&str, f64)> {
        self.lanes
            .iter()
            .filter_map(|lane| {
                if lane.from == name {
                    Some((lane.to.as_str(), lane.distance))
                } else if lane.to == name {
                    Some((lane.from.as_str(), lane.distance))
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Produces planets and the trade network from a planet catalog.
#[derive(Debug, Clone)]
pub struct PlanetGenerator {
    catalog: PlanetCatalog,
}

impl PlanetGenerator {
    /// Build a generator drawing from the given catalog.
    pub fn new(catalog: PlanetCatalog) -> Self {
        Self { catalog }
    }

    /// Number of planets for a difficulty, before clamping to the name pool.
    pub fn planet_count(difficulty: u32) -> usize {
        5 + 2 * difficulty as usize
    }

    /// Generate a fresh universe of `5 + 2 * difficulty` planets.
    pub fn generate(&self, difficulty: u32, rng: &mut impl Rng) -> Universe {
        let mut pool = self.catalog.names.clone();
        pool.shuffle(rng);
        let count = Self::planet_count(difficulty).min(pool.len());
        let name_pool = pool.split_off(count);

        let planets: Vec<Planet> = pool
            .into_iter()
            .map(|name| self.make_planet(name, false, rng))
            .collect();

        let mut lanes = Vec::new();
        for i in 0..planets.len() {
            for j in (i + 1)..planets.len() {
                if let Some(lane) = roll_lane(&planets[i].name, &planets[j].name, rng) {
                    lanes.push(lane);
                }
            }
        }

        info!(
            planets = planets.len(),
            lanes = lanes.len(),
            difficulty,
            "universe generated"
        );
        Universe {
            planets,
            lanes,
            name_pool,
            frontier_count: 0,
        }
    }

    /// Chart a new frontier planet, append it to the universe and return it.
    pub fn spawn_frontier<'u>(&self, universe: &'u mut Universe, rng: &mut impl Rng) -> &'u Planet {
        universe.frontier_count += 1;
        let name = match universe.name_pool.pop() {
            Some(name) => name,
            None => {
                let mut index = universe.frontier_count;
                loop {
                    let candidate = format!("Frontier-{index}");
                    if !universe.contains(&candidate) {
                        break candidate;
                    }
                    index += 1;
                }
            }
        };

        let planet = self.make_planet(name, true, rng);
        let new_lanes: Vec<Lane> = universe
            .planets
            .iter()
            .filter_map(|existing| roll_lane(&existing.name, &planet.name, rng))
            .collect();
        debug!(planet = %planet.name, lanes = new_lanes.len(), "frontier planet charted");
        universe.lanes.extend(new_lanes);
        universe.planets.push(planet);
        let last = universe.planets.len() - 1;
        &universe.planets[last]
    }

    fn make_planet(&self, name: String, frontier: bool, rng: &mut impl Rng) -> Planet {
        let planet_type = self
            .catalog
            .types
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| "Unclassified".to_string());
        let climate = pick(CLIMATES, rng);
        let geology = pick(GEOLOGIES, rng);
        let economy_level = rng.gen_range(ECONOMY_RANGE);

        let resource_count = rng.gen_range(3..=4);
        let resources = RESOURCE_TYPES
            .choose_multiple(rng, resource_count)
            .map(|resource| resource.to_string())
            .collect::<Vec<_>>()
            .into_iter()
            .map(|resource| (resource, rng.gen_range(RESOURCE_WEIGHT_RANGE)))
            .collect();

        let demographics = Demographics {
            population: rng.gen_range(10_000..5_000_000),
            settlements: rng.gen_range(1..=40),
            spaceports: rng.gen_range(1..=5),
        };

        let template = pick(HISTORY_TEMPLATES, rng);
        let history = render_template(
            template,
            &[
                ("name", name.clone()),
                ("type", planet_type.to_lowercase()),
                ("climate", climate.to_lowercase()),
                ("geology", geology.to_lowercase()),
                ("population", demographics.population.to_string()),
                ("settlements", demographics.settlements.to_string()),
                ("economy", format!("{:.0}", economy_level * 100.0)),
            ],
        );

        Planet {
            name,
            planet_type,
            climate: climate.to_string(),
            geology: geology.to_string(),
            economy_level,
            resources,
            demographics,
            history,
            frontier,
        }
    }
}

fn pick<'a>(options: &[&'a str], rng: &mut impl Rng) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

fn roll_lane(a: &str, b: &str, rng: &mut impl Rng) -> Option<Lane> {
    if rng.gen_bool(LANE_PROBABILITY) {
        Some(Lane {
            from: a.to_string(),
            to: b.to_string(),
            distance: rng.gen_range(LANE_DISTANCE_RANGE),
        })
    } else {
        None
    }
}
