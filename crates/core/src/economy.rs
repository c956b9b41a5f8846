//! Commodity definitions and live per-planet pricing.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    content::CommodityDef,
    error::{GameError, GameResult},
    universe::Planet,
};

/// Multiplier used for commodities a planet has no resource entry for.
pub const ABSENT_RESOURCE_MULTIPLIER: f64 = 0.5;
/// Factor a market crash applies to every base price.
pub const CRASH_FACTOR: f64 = 0.5;

/// A tradeable good for the current session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commodity {
    /// Unique name.
    pub name: String,
    /// Reference price; market crashes scale it down permanently.
    pub base_price: f64,
    /// Fractional price swing.
    pub price_volatility: f64,
}

impl From<CommodityDef> for Commodity {
    fn from(def: CommodityDef) -> Self {
        Self {
            name: def.name,
            base_price: def.base_price,
            price_volatility: def.price_volatility,
        }
    }
}

/// One row of a market overview.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketRow {
    /// Planet name.
    pub planet: String,
    /// Prices in the same order as [`MarketOverview::commodities`].
    pub prices: Vec<f64>,
}

/// Prices of every commodity on every planet, sampled at one moment.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketOverview {
    /// Column headers.
    pub commodities: Vec<String>,
    /// One row per planet.
    pub rows: Vec<MarketRow>,
}

impl MarketOverview {
    /// Price of a commodity on a planet within this snapshot.
    pub fn price(&self, planet: &str, commodity: &str) -> Option<f64> {
        let column = self.commodities.iter().position(|name| name == commodity)?;
        self.rows
            .iter()
            .find(|row| row.planet == planet)
            .and_then(|row| row.prices.get(column).copied())
    }
}

/// Price engine. Prices are never cached: every query draws a fresh swing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Market {
    commodities: Vec<Commodity>,
}

impl Market {
    /// Build a market from catalog definitions.
    pub fn new(defs: impl IntoIterator<Item = CommodityDef>) -> Self {
        Self {
            commodities: defs.into_iter().map(Commodity::from).collect(),
        }
    }

    /// Rebuild a market from previously saved commodities.
    pub fn from_commodities(commodities: Vec<Commodity>) -> Self {
        Self { commodities }
    }

    /// Commodities in catalog order.
    pub fn commodities(&self) -> &[Commodity] {
        &self.commodities
    }

    /// Commodity names in catalog order.
    pub fn commodity_names(&self) -> Vec<String> {
        self.commodities.iter().map(|c| c.name.clone()).collect()
    }

    /// Look up a commodity; unknown names are a data error.
    pub fn commodity(&self, name: &str) -> GameResult<&Commodity> {
        self.commodities
            .iter()
            .find(|commodity| commodity.name == name)
            .ok_or_else(|| GameError::UnknownCommodity(name.to_string()))
    }

    /// Whether the catalog contains `name`.
    pub fn has_commodity(&self, name: &str) -> bool {
        self.commodities.iter().any(|commodity| commodity.name == name)
    }

    /// Live price of a commodity on a planet.
    ///
    /// `base_price * (1 + swing) * economy_level * resource_multiplier`, where the
    /// swing is drawn uniformly from `±price_volatility`. The result is rounded to
    /// cents and never negative.
    pub fn price(&self, commodity: &str, planet: &Planet, rng: &mut impl Rng) -> GameResult<f64> {
        let commodity = self.commodity(commodity)?;
        let volatility = commodity.price_volatility.abs();
        let swing = if volatility > 0.0 {
            rng.gen_range(-volatility..=volatility)
        } else {
            0.0
        };
        let resource_multiplier = planet
            .resource(&commodity.name)
            .unwrap_or(ABSENT_RESOURCE_MULTIPLIER);
        let price =
            commodity.base_price * (1.0 + swing) * planet.economy_level * resource_multiplier;
        Ok(round_cents(price.max(0.0)))
    }

    /// Live prices of every commodity on one planet, in catalog order.
    pub fn quote(&self, planet: &Planet, rng: &mut impl Rng) -> GameResult<Vec<(String, f64)>> {
        self.commodities
            .iter()
            .map(|commodity| {
                self.price(&commodity.name, planet, rng)
                    .map(|price| (commodity.name.clone(), price))
            })
            .collect()
    }

    /// Sample every commodity on every planet for display.
    pub fn market_overview(
        &self,
        planets: &[Planet],
        rng: &mut impl Rng,
    ) -> GameResult<MarketOverview> {
        let rows = planets
            .iter()
            .map(|planet| {
                let prices = self
                    .quote(planet, rng)?
                    .into_iter()
                    .map(|(_, price)| price)
                    .collect();
                Ok(MarketRow {
                    planet: planet.name.clone(),
                    prices,
                })
            })
            .collect::<GameResult<Vec<_>>>()?;
        Ok(MarketOverview {
            commodities: self.commodity_names(),
            rows,
        })
    }

    /// Permanently halve every base price.
    pub fn apply_market_crash(&mut self) {
        for commodity in &mut self.commodities {
            commodity.base_price *= CRASH_FACTOR;
        }
        info!(
            commodities = self.commodities.len(),
            "market crash halved base prices"
        );
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::Demographics;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::BTreeMap;

    fn planet(economy_level: f64, resources: &[(&str, f64)]) -> Planet {
        Planet {
            name: "Proxima".to_string(),
            planet_type: "Mining".to_string(),
            climate: "Arid".to_string(),
            geology: "Silicate".to_string(),
            economy_level,
            resources: resources
                .iter()
                .map(|(name, weight)| (name.to_string(), *weight))
                .collect::<BTreeMap<_, _>>(),
            demographics: Demographics {
                population: 1000,
                settlements: 1,
                spaceports: 1,
            },
            history: String::new(),
            frontier: false,
        }
    }

    fn market() -> Market {
        Market::new([
            CommodityDef {
                name: "raw_materials".to_string(),
                base_price: 100.0,
                price_volatility: 0.0,
            },
            CommodityDef {
                name: "luxury_goods".to_string(),
                base_price: 400.0,
                price_volatility: 0.2,
            },
        ])
    }

    #[test]
    fn price_follows_formula_without_volatility() {
        let mut rng = StdRng::seed_from_u64(1);
        let market = market();
        let rich = planet(0.8, &[("raw_materials", 0.5)]);
        assert_eq!(market.price("raw_materials", &rich, &mut rng).unwrap(), 40.0);

        let absent = planet(0.8, &[]);
        assert_eq!(
            market.price("raw_materials", &absent, &mut rng).unwrap(),
            100.0 * 0.8 * ABSENT_RESOURCE_MULTIPLIER
        );
    }

    #[test]
    fn price_stays_within_volatility_band() {
        let mut rng = StdRng::seed_from_u64(2);
        let market = market();
        let planet = planet(1.0, &[("luxury_goods", 1.0)]);
        for _ in 0..500 {
            let price = market.price("luxury_goods", &planet, &mut rng).unwrap();
            assert!((320.0..=480.0).contains(&price), "price {price} out of band");
        }
    }

    #[test]
    fn price_is_not_memoized() {
        let mut rng = StdRng::seed_from_u64(3);
        let market = market();
        let planet = planet(1.0, &[("luxury_goods", 1.0)]);
        let samples: Vec<f64> = (0..20)
            .map(|_| market.price("luxury_goods", &planet, &mut rng).unwrap())
            .collect();
        assert!(samples.windows(2).any(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn unknown_commodity_is_an_error() {
        let mut rng = StdRng::seed_from_u64(4);
        let err = market()
            .price("spice", &planet(1.0, &[]), &mut rng)
            .unwrap_err();
        assert_eq!(err, GameError::UnknownCommodity("spice".to_string()));
    }

    #[test]
    fn market_crash_halves_each_time() {
        let mut market = market();
        market.apply_market_crash();
        assert_eq!(market.commodity("raw_materials").unwrap().base_price, 50.0);
        assert_eq!(market.commodity("luxury_goods").unwrap().base_price, 200.0);
        market.apply_market_crash();
        assert_eq!(market.commodity("raw_materials").unwrap().base_price, 25.0);
        assert_eq!(market.commodity("luxury_goods").unwrap().base_price, 100.0);
    }

    #[test]
    fn overview_covers_every_planet_and_commodity() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut second = planet(0.5, &[("raw_materials", 1.0)]);
        second.name = "Arcturus".to_string();
        let planets = vec![planet(1.0, &[("raw_materials", 1.0)]), second];
        let overview = market().market_overview(&planets, &mut rng).unwrap();
        assert_eq!(overview.commodities, vec!["raw_materials", "luxury_goods"]);
        assert_eq!(overview.rows.len(), 2);
        assert_eq!(overview.price("Proxima", "raw_materials"), Some(100.0));
        assert_eq!(overview.price("Arcturus", "raw_materials"), Some(50.0));
        assert_eq!(overview.price("Arcturus", "spice"), None);
    }
}
