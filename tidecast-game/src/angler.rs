//! The player's profile between sessions: purse, creel, rods and quest log.

use serde::Serialize;
use thiserror::Error;

use crate::constants::{DEFAULT_ROD_ID, DEFAULT_WORLD_ID};
use crate::fish::CaughtFish;
use crate::quests::{GoalPayout, QuestDef, QuestLog};
use crate::session::{Loadout, SessionResult};
use crate::tuning::{RodParams, TuningCatalog};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error("no rod with id `{0}` in the shop")]
    UnknownRod(String),
    #[error("{rod} costs {price} but only {money} is available")]
    InsufficientFunds { rod: String, price: i64, money: i64 },
}

/// What a successful shop interaction did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShopOutcome {
    /// The rod was already owned and is now equipped.
    Equipped,
    Purchased { price: i64 },
}

#[derive(Debug, Clone)]
pub struct Angler {
    character_id: String,
    money: i64,
    creel: Vec<CaughtFish>,
    owned_rods: Vec<String>,
    equipped_rod: String,
    quests: QuestLog,
    landed: u64,
}

impl Angler {
    /// A fresh angler: no money, an empty creel and only the starter rod.
    #[must_use]
    pub fn new(character_id: &str, quests: QuestDef) -> Self {
        Self {
            character_id: character_id.to_string(),
            money: 0,
            creel: Vec::new(),
            owned_rods: vec![DEFAULT_ROD_ID.to_string()],
            equipped_rod: DEFAULT_ROD_ID.to_string(),
            quests: QuestLog::new(quests),
            landed: 0,
        }
    }

    #[must_use]
    pub const fn with_money(mut self, money: i64) -> Self {
        self.money = money;
        self
    }

    /// Loadout for the next cast in `world_id`.
    #[must_use]
    pub fn loadout(&self, world_id: i32) -> Loadout {
        Loadout {
            world_id,
            character_id: self.character_id.clone(),
            rod_id: self.equipped_rod.clone(),
        }
    }

    /// Loadout in the default world.
    #[must_use]
    pub fn default_loadout(&self) -> Loadout {
        self.loadout(DEFAULT_WORLD_ID)
    }

    /// Book a finished session. Landed fish go to the creel and count toward
    /// quests; quest money is credited at once. Catches are only paid for
    /// when the creel is sold.
    pub fn record(&mut self, result: &SessionResult) -> Vec<GoalPayout> {
        if !result.success {
            return Vec::new();
        }
        self.landed = self.landed.saturating_add(1);
        self.creel.push(result.fish.clone());
        self.quests.on_fish_caught(&result.fish);
        let payouts = self.quests.collect_payouts();
        for payout in &payouts {
            self.money = self.money.saturating_add(payout.money.max(0));
        }
        payouts
    }

    /// Sell everything in the creel; returns the amount credited.
    pub fn sell_creel(&mut self) -> i64 {
        let total = self
            .creel
            .drain(..)
            .fold(0_i64, |sum, fish| sum.saturating_add(fish.price));
        self.money = self.money.saturating_add(total);
        if total > 0 {
            log::debug!("sold creel for {total}; purse now {}", self.money);
        }
        total
    }

    /// Equip an owned rod, or buy and equip it if the purse allows.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::UnknownRod`] for ids missing from the catalog and
    /// [`ShopError::InsufficientFunds`] when the rod is not owned and costs
    /// more than the purse holds.
    pub fn buy_or_equip(
        &mut self,
        catalog: &TuningCatalog,
        rod_id: &str,
    ) -> Result<ShopOutcome, ShopError> {
        let rod = catalog
            .rod(rod_id)
            .ok_or_else(|| ShopError::UnknownRod(rod_id.to_string()))?;
        if self.owns(rod_id) {
            self.equipped_rod = rod.id.clone();
            return Ok(ShopOutcome::Equipped);
        }
        if self.money < rod.price {
            return Err(ShopError::InsufficientFunds {
                rod: rod.display_name.clone(),
                price: rod.price,
                money: self.money,
            });
        }
        self.money -= rod.price;
        self.owned_rods.push(rod.id.clone());
        self.equipped_rod = rod.id.clone();
        log::debug!("bought {} for {}", rod.id, rod.price);
        Ok(ShopOutcome::Purchased { price: rod.price })
    }

    #[must_use]
    pub fn owns(&self, rod_id: &str) -> bool {
        self.owned_rods.iter().any(|owned| owned == rod_id)
    }

    #[must_use]
    pub const fn money(&self) -> i64 {
        self.money
    }

    #[must_use]
    pub fn creel(&self) -> &[CaughtFish] {
        &self.creel
    }

    /// Value of the creel if sold now.
    #[must_use]
    pub fn creel_value(&self) -> i64 {
        self.creel
            .iter()
            .fold(0_i64, |sum, fish| sum.saturating_add(fish.price))
    }

    #[must_use]
    pub fn equipped_rod(&self) -> &str {
        &self.equipped_rod
    }

    #[must_use]
    pub fn owned_rods(&self) -> &[String] {
        &self.owned_rods
    }

    #[must_use]
    pub fn character_id(&self) -> &str {
        &self.character_id
    }

    #[must_use]
    pub const fn quests(&self) -> &QuestLog {
        &self.quests
    }

    /// Fish landed over the angler's lifetime, sold or not.
    #[must_use]
    pub const fn landed(&self) -> u64 {
        self.landed
    }
}

/// Rod shown in 1-based shop slot `slot`, in catalog order.
#[must_use]
pub fn rod_for_slot(catalog: &TuningCatalog, slot: usize) -> Option<&RodParams> {
    slot.checked_sub(1).and_then(|index| catalog.rods().get(index))
}
