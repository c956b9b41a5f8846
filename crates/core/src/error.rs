#![allow(missing_docs)]

//! Domain errors raised by ledger, market, quest and upgrade operations.

use thiserror::Error;

/// Convenience alias for results carrying a [`GameError`].
pub type GameResult<T> = Result<T, GameError>;

/// Everything a game operation can refuse to do.
///
/// Rule violations are the player's business: they are reported and the turn
/// continues. The remaining variants point at broken content or a corrupt
/// snapshot and should abort whatever requested them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("invalid price {0}")]
    InvalidPrice(f64),
    #[error("not enough cargo space (requested {requested}, free {free})")]
    InsufficientCargoSpace { requested: u32, free: u32 },
    #[error("not enough credits (requires {required:.2}, have {available:.2})")]
    InsufficientCredits { required: f64, available: f64 },
    #[error("no {0} in cargo")]
    CommodityNotHeld(String),
    #[error("not enough {commodity} to sell (requested {requested}, held {held})")]
    InsufficientQuantity {
        commodity: String,
        requested: u32,
        held: u32,
    },
    #[error("not enough fuel (requires {required:.1}, have {available:.1})")]
    InsufficientFuel { required: f64, available: f64 },
    #[error("fuel tank cannot take {requested:.1} more units (room for {room:.1})")]
    FuelTankFull { requested: f64, room: f64 },
    #[error("already docked at {0}")]
    AlreadyDocked(String),
    #[error("passenger pods hold {available}, quest needs {required}")]
    PassengerCapacity { required: u32, available: u32 },
    #[error("life support covers {available}, quest needs {required}")]
    LifeSupportCapacity { required: u32, available: u32 },
    #[error("upgrade {0} is not available")]
    UpgradeUnavailable(String),
    #[error("quest #{0} is not on offer")]
    QuestUnavailable(u32),
    #[error("no usable trade route: {0}")]
    RouteUnavailable(String),
    #[error("the game is over")]
    GameOver,
    #[error("unknown commodity {0}")]
    UnknownCommodity(String),
    #[error("unknown planet {0}")]
    UnknownPlanet(String),
    #[error("unknown upgrade {category}/{name}")]
    UnknownUpgrade { category: String, name: String },
}

impl GameError {
    /// True when the player broke a game rule, false for content or data errors.
    pub fn is_rule_violation(&self) -> bool {
        !matches!(
            self,
            GameError::UnknownCommodity(_)
                | GameError::UnknownPlanet(_)
                | GameError::UnknownUpgrade { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_data_errors() {
        assert!(GameError::InvalidQuantity.is_rule_violation());
        assert!(GameError::InsufficientFuel {
            required: 5.0,
            available: 1.0
        }
        .is_rule_violation());
        assert!(!GameError::UnknownCommodity("spice".to_string()).is_rule_violation());
        assert!(!GameError::UnknownPlanet("Nowhere".to_string()).is_rule_violation());
    }

    #[test]
    fn messages_carry_amounts() {
        let err = GameError::InsufficientCredits {
            required: 1500.0,
            available: 999.5,
        };
        assert_eq!(
            err.to_string(),
            "not enough credits (requires 1500.00, have 999.50)"
        );
    }
}
