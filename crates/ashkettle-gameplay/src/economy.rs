//! Shop economy: wallet, price table, item effects.
//!
//! Enemies pay out currency on death; the shop between scenes sells
//! stat-modifying items from a fixed price table. Each item resolves to a
//! list of [`ItemEffect`]s the player applies to their stats and weapons.
//! Active-ability items (dash, freeze) have no passive effects here; their
//! abilities are granted by ownership.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::rng::GameRng;

/// Currency paid out when the player picks up a dropped collectible.
pub const COLLECTIBLE_VALUE: u64 = 150;

/// Economy error types.
#[derive(Debug, Error)]
pub enum EconomyError {
    /// Not enough currency for a purchase.
    #[error("insufficient funds: need {needed}, have {have}")]
    InsufficientFunds {
        /// Amount needed.
        needed: u64,
        /// Amount available.
        have: u64,
    },
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;

/// A wallet holding the run's currency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wallet {
    balance: u64,
}

impl Wallet {
    /// Creates a wallet with a starting balance.
    #[must_use]
    pub fn new(initial: u64) -> Self {
        Self { balance: initial }
    }

    /// Current balance.
    #[must_use]
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Adds currency.
    pub fn earn(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Removes currency, rejecting overdrafts.
    pub fn spend(&mut self, amount: u64) -> EconomyResult<()> {
        if self.balance < amount {
            return Err(EconomyError::InsufficientFunds {
                needed: amount,
                have: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }
}

/// Everything the shop sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopItem {
    /// Restores health to full.
    HealthRefill,
    /// Bigger magazines.
    DeepPockets,
    /// Permanent max-health bonus.
    CoeurDeVie,
    /// Active ability: freeze nearby enemies.
    Freeze,
    /// Active ability: dash.
    WingsOfVoice,
    /// Temporary combat stimulant.
    AdrenalineShot,
    /// Flat damage increase.
    ProteinPowder,
    /// One guaranteed revive.
    FinalDestination,
    /// Faster firing.
    SwiftExecution,
    /// Much faster firing at a damage cost.
    ApollyonsPit,
    /// Faster movement.
    PumpedUpKicks,
    /// Doubled pellets at a damage cost.
    DoubleTap,
    /// Bigger projectiles and a small damage bonus.
    CannonballSplash,
    /// Faster reloads.
    GungHoGloves,
}

impl ShopItem {
    /// Items that can be stocked in the shop's sale slots. The health
    /// refill is a fixed counter service, not a slot item.
    pub const STOCKABLE: [Self; 13] = [
        Self::DeepPockets,
        Self::CoeurDeVie,
        Self::Freeze,
        Self::WingsOfVoice,
        Self::AdrenalineShot,
        Self::ProteinPowder,
        Self::FinalDestination,
        Self::SwiftExecution,
        Self::ApollyonsPit,
        Self::PumpedUpKicks,
        Self::DoubleTap,
        Self::CannonballSplash,
        Self::GungHoGloves,
    ];

    /// Display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::HealthRefill => "Health Refill",
            Self::DeepPockets => "Deep Pockets",
            Self::CoeurDeVie => "Coeur De Vie",
            Self::Freeze => "Freeze",
            Self::WingsOfVoice => "Wings of Voice",
            Self::AdrenalineShot => "Adrenaline Shot",
            Self::ProteinPowder => "Protein Powder",
            Self::FinalDestination => "Final Destination",
            Self::SwiftExecution => "Swift Execution",
            Self::ApollyonsPit => "Apollyon's Pit",
            Self::PumpedUpKicks => "Pumped Up Kicks",
            Self::DoubleTap => "Double Tap",
            Self::CannonballSplash => "Cannonball Splash",
            Self::GungHoGloves => "Gung Ho Gloves",
        }
    }

    /// Shop price.
    #[must_use]
    pub fn price(self) -> u64 {
        match self {
            Self::HealthRefill => 100,
            Self::Freeze => 200,
            Self::DeepPockets => 300,
            Self::CoeurDeVie => 400,
            Self::GungHoGloves => 500,
            Self::CannonballSplash => 600,
            Self::AdrenalineShot | Self::PumpedUpKicks => 700,
            Self::SwiftExecution => 800,
            Self::ApollyonsPit => 1100,
            Self::FinalDestination => 1200,
            Self::WingsOfVoice => 1500,
            Self::ProteinPowder => 1600,
            Self::DoubleTap => 2000,
        }
    }

    /// Passive stat effects applied on purchase. Active-ability items
    /// return an empty slice.
    #[must_use]
    pub fn effects(self) -> &'static [ItemEffect] {
        match self {
            Self::HealthRefill => &[ItemEffect::FullHeal],
            Self::DeepPockets => &[ItemEffect::AmmoBonus(0.1)],
            Self::CoeurDeVie => &[ItemEffect::MaxHealthBonus(25.0)],
            Self::ProteinPowder => &[ItemEffect::DamageMultiplier(1.4)],
            Self::SwiftExecution => &[ItemEffect::FireRateMultiplier(1.15)],
            Self::ApollyonsPit => &[
                ItemEffect::FireRateMultiplier(2.0),
                ItemEffect::DamageMultiplier(0.65),
            ],
            Self::PumpedUpKicks => &[ItemEffect::SpeedMultiplier(1.05)],
            Self::DoubleTap => &[
                ItemEffect::DoublePellets,
                ItemEffect::DamageMultiplier(0.7),
            ],
            Self::CannonballSplash => &[ItemEffect::DamageMultiplier(1.1)],
            Self::GungHoGloves => &[ItemEffect::ReloadMultiplier(0.75)],
            Self::Freeze | Self::WingsOfVoice | Self::AdrenalineShot | Self::FinalDestination => {
                &[]
            }
        }
    }
}

/// A single stat mutation granted by an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Multiplies weapon damage.
    DamageMultiplier(f32),
    /// Multiplies weapon fire rate.
    FireRateMultiplier(f32),
    /// Multiplies movement speed.
    SpeedMultiplier(f32),
    /// Multiplies reload time (below 1 is faster).
    ReloadMultiplier(f32),
    /// Grows magazines by a fraction of their size, at least one round.
    AmmoBonus(f32),
    /// Adds flat max health and heals to the new maximum.
    MaxHealthBonus(f32),
    /// Doubles pellets per shot on every weapon.
    DoublePellets,
    /// Restores health to full.
    FullHeal,
}

/// Picks two distinct items for the shop's sale slots.
#[must_use]
pub fn stock_shop(rng: &mut GameRng) -> [ShopItem; 2] {
    let first = *rng
        .choose(&ShopItem::STOCKABLE)
        .unwrap_or(&ShopItem::DeepPockets);
    let mut second = first;
    while second == first {
        second = *rng
            .choose(&ShopItem::STOCKABLE)
            .unwrap_or(&ShopItem::DeepPockets);
    }
    debug!(
        first = first.display_name(),
        second = second.display_name(),
        "shop stocked"
    );
    [first, second]
}

/// Pays for an item and hands back its effects for the caller to apply.
pub fn purchase(wallet: &mut Wallet, item: ShopItem) -> EconomyResult<&'static [ItemEffect]> {
    wallet.spend(item.price())?;
    debug!(item = item.display_name(), "item purchased");
    Ok(item.effects())
}
