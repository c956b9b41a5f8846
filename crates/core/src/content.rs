//! Static content: commodity, quest, technology and planet catalogs.

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::{Captures, Regex};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, warn};

use crate::{quests::QuestKind, tech::ShipAttribute};

/// Commodity catalog file name.
pub const COMMODITIES_FILE: &str = "commodities.json";
/// Quest catalog file name.
pub const QUESTS_FILE: &str = "quests.json";
/// Technology catalog file name.
pub const TECHNOLOGIES_FILE: &str = "technologies.json";
/// Planet name/type catalog file name.
pub const PLANETS_FILE: &str = "planets.json";

/// Placeholders a quest description may use.
pub const QUEST_PLACEHOLDERS: &[&str] = &["destination", "quantity"];

/// A tradeable good as declared in `commodities.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommodityDef {
    /// Unique commodity name, also used as a resource key on planets.
    pub name: String,
    /// Galaxy-wide reference price.
    pub base_price: f64,
    /// Fractional price swing, e.g. `0.1` for ±10%.
    pub price_volatility: f64,
}

/// A quest template as declared in `quests.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestTemplate {
    /// Short title shown in offer lists.
    pub title: String,
    /// Description; `{destination}` and `{quantity}` are substituted.
    pub description: String,
    /// Flavour text.
    #[serde(default)]
    pub backstory: String,
    /// Quest type.
    pub kind: QuestKind,
    /// Credits paid on acceptance.
    pub reward: f64,
    /// Fixed destination; a random planet is chosen when absent or unknown.
    #[serde(default)]
    pub destination: Option<String>,
    /// Passengers or units the quest involves.
    #[serde(default)]
    pub required_quantity: u32,
}

/// A single upgrade entry in `technologies.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpgradeDef {
    /// Tier of the upgrade; gates availability.
    pub level: u32,
    /// Price in credits.
    pub cost: f64,
    /// Ship attributes set by the upgrade.
    pub effects: BTreeMap<ShipAttribute, f64>,
}

/// Technology catalog: category -> upgrade name -> definition.
pub type TechCatalog = BTreeMap<String, BTreeMap<String, UpgradeDef>>;

/// Planet names and types used by the generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanetCatalog {
    /// Name pool, drawn without replacement.
    pub names: Vec<String>,
    /// Planet type tags.
    #[serde(default = "default_planet_types")]
    pub types: Vec<String>,
}

impl Default for PlanetCatalog {
    fn default() -> Self {
        Self {
            names: DEFAULT_PLANET_NAMES.iter().map(|s| s.to_string()).collect(),
            types: default_planet_types(),
        }
    }
}

fn default_planet_types() -> Vec<String> {
    DEFAULT_PLANET_TYPES.iter().map(|s| s.to_string()).collect()
}

/// Every catalog a game session needs.
#[derive(Debug, Clone)]
pub struct Content {
    /// Commodity catalog.
    pub commodities: Vec<CommodityDef>,
    /// Quest templates.
    pub quests: Vec<QuestTemplate>,
    /// Technology tree.
    pub technologies: TechCatalog,
    /// Planet names and types.
    pub planets: PlanetCatalog,
}

static DEFAULT_PLANET_NAMES: &[&str] = &[
    "New Terra",
    "Proxima",
    "Arcturus",
    "Orion Prime",
    "Sigma Outpost",
    "Epsilon Station",
    "Nova Haven",
    "Quantum Nexus",
    "Helios Prime",
    "Crimson Horizon",
    "Vega Reach",
    "Tau Ceti Landing",
    "Kepler's Rest",
    "Draco Anchorage",
    "Lyra Drift",
    "Cygnus Gate",
    "Altair Deep",
    "Rigel Yards",
    "Polaris Hold",
    "Sirius Bazaar",
    "Ember Verge",
    "Halcyon",
    "Meridian",
    "Obsidian Reach",
    "Zephyr Station",
];

static DEFAULT_PLANET_TYPES: &[&str] = &[
    "Desert",
    "Oceanic",
    "Industrial",
    "Agricultural",
    "High-Tech",
    "Mining",
    "Trading Hub",
    "Research Colony",
];

static DEFAULT_COMMODITIES: Lazy<Vec<CommodityDef>> = Lazy::new(|| {
    [
        ("raw_materials", 80.0, 0.10),
        ("agricultural_goods", 120.0, 0.15),
        ("technological_goods", 420.0, 0.12),
        ("luxury_goods", 380.0, 0.20),
        ("industrial_goods", 210.0, 0.08),
        ("fuel", 40.0, 0.05),
    ]
    .into_iter()
    .map(|(name, base_price, price_volatility)| CommodityDef {
        name: name.to_string(),
        base_price,
        price_volatility,
    })
    .collect()
});

/// Built-in commodity catalog used when `commodities.json` is missing.
pub fn default_commodities() -> Vec<CommodityDef> {
    DEFAULT_COMMODITIES.clone()
}

/// Thread-safe content loader that caches parsed catalogs.
pub struct ContentLoader {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    root_path: PathBuf,
    cache: Option<Content>,
}

impl ContentLoader {
    /// Build a loader rooted at the given data directory.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                root_path: root_path.into(),
                cache: None,
            })),
        }
    }

    /// Directory the catalogs are read from.
    pub fn root_path(&self) -> PathBuf {
        self.inner.read().root_path.clone()
    }

    /// Point the loader at a new directory, dropping cached catalogs.
    pub fn refresh(&self, root_path: impl Into<PathBuf>) {
        let mut inner = self.inner.write();
        inner.root_path = root_path.into();
        inner.cache = None;
    }

    /// Return all catalogs, reading them on first use.
    pub fn content(&self) -> Result<Content> {
        let mut inner = self.inner.write();
        if let Some(content) = inner.cache.as_ref() {
            return Ok(content.clone());
        }
        let content = load_content(&inner.root_path)?;
        info!(
            commodities = content.commodities.len(),
            quests = content.quests.len(),
            categories = content.technologies.len(),
            "content loaded"
        );
        inner.cache = Some(content.clone());
        Ok(content)
    }

    /// Commodity catalog, falling back to the built-in one.
    pub fn commodities(&self) -> Result<Vec<CommodityDef>> {
        load_commodities(&self.root_path())
    }

    /// Quest templates; a missing file is an error.
    pub fn quests(&self) -> Result<Vec<QuestTemplate>> {
        load_quests(&self.root_path())
    }

    /// Technology catalog; a missing file is an error.
    pub fn technologies(&self) -> Result<TechCatalog> {
        load_technologies(&self.root_path())
    }

    /// Planet catalog, falling back to the built-in pool.
    pub fn planets(&self) -> Result<PlanetCatalog> {
        load_planets(&self.root_path())
    }
}

fn load_content(root: &Path) -> Result<Content> {
    Ok(Content {
        commodities: load_commodities(root)?,
        quests: load_quests(root)?,
        technologies: load_technologies(root)?,
        planets: load_planets(root)?,
    })
}

fn load_commodities(root: &Path) -> Result<Vec<CommodityDef>> {
    let path = root.join(COMMODITIES_FILE);
    if !path.is_file() {
        warn!(
            "{} not found; using built-in commodity catalog",
            path.display()
        );
        return Ok(default_commodities());
    }
    let commodities: Vec<CommodityDef> = read_json(&path)?;
    validate_commodities(&commodities).with_context(|| format!("invalid {}", path.display()))?;
    Ok(commodities)
}

fn load_quests(root: &Path) -> Result<Vec<QuestTemplate>> {
    let path = root.join(QUESTS_FILE);
    let quests: Vec<QuestTemplate> = read_json(&path)?;
    for quest in &quests {
        if !quest.reward.is_finite() || quest.reward < 0.0 {
            bail!(
                "invalid {}: quest '{}' has negative reward",
                path.display(),
                quest.title
            );
        }
        check_placeholders(&quest.description, QUEST_PLACEHOLDERS).with_context(|| {
            format!("invalid {}: quest '{}'", path.display(), quest.title)
        })?;
    }
    Ok(quests)
}

fn load_technologies(root: &Path) -> Result<TechCatalog> {
    let path = root.join(TECHNOLOGIES_FILE);
    let catalog: TechCatalog = read_json(&path)?;
    for (category, upgrades) in &catalog {
        for (name, upgrade) in upgrades {
            if upgrade.level == 0 {
                bail!(
                    "invalid {}: {category}/{name} must have level >= 1",
                    path.display()
                );
            }
            if !upgrade.cost.is_finite() || upgrade.cost < 0.0 {
                bail!(
                    "invalid {}: {category}/{name} has negative cost",
                    path.display()
                );
            }
            if upgrade.effects.values().any(|value| !value.is_finite()) {
                bail!(
                    "invalid {}: {category}/{name} has a non-numeric effect",
                    path.display()
                );
            }
        }
    }
    Ok(catalog)
}

fn load_planets(root: &Path) -> Result<PlanetCatalog> {
    let path = root.join(PLANETS_FILE);
    if !path.is_file() {
        return Ok(PlanetCatalog::default());
    }
    let catalog: PlanetCatalog = read_json(&path)?;
    let unique: HashSet<&str> = catalog.names.iter().map(String::as_str).collect();
    if unique.len() != catalog.names.len() {
        bail!("invalid {}: duplicate planet names", path.display());
    }
    if catalog.types.is_empty() {
        bail!("invalid {}: no planet types", path.display());
    }
    Ok(catalog)
}

fn validate_commodities(commodities: &[CommodityDef]) -> Result<()> {
    if commodities.is_empty() {
        bail!("commodity catalog is empty");
    }
    let mut seen = HashSet::new();
    for commodity in commodities {
        if !seen.insert(commodity.name.as_str()) {
            bail!("duplicate commodity {}", commodity.name);
        }
        if !commodity.base_price.is_finite() || commodity.base_price <= 0.0 {
            bail!("commodity {} must have a positive base_price", commodity.name);
        }
        if !(0.0..1.0).contains(&commodity.price_volatility) {
            bail!(
                "commodity {} must have price_volatility in [0, 1)",
                commodity.name
            );
        }
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("invalid placeholder regex"));

/// Substitute `{key}` placeholders; unknown keys are left untouched.
pub fn render_template(template: &str, values: &[(&str, String)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            let key = &caps[1];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Fail with the list of placeholders a template uses that are not provided.
pub fn check_placeholders(template: &str, allowed: &[&str]) -> Result<()> {
    let unknown: Vec<String> = PLACEHOLDER_RE
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .filter(|key| !allowed.contains(&key.as_str()))
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("unknown placeholders: {}", unknown.join(", ")))
    }
}
