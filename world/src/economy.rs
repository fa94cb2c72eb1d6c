//! Player currency and lives.

/// Side effects enemy deaths and arrivals have on the player.
pub trait PlayerEconomy {
    /// Adds coins to the player's total.
    fn grant_coins(&mut self, amount: f32);

    /// Removes lives from the player, never going below zero.
    fn lose_lives(&mut self, amount: u32);
}

/// Authoritative coin and life totals of the defending player.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerLedger {
    coins: f32,
    lives: u32,
}

impl PlayerLedger {
    /// Creates a ledger with the provided starting totals.
    #[must_use]
    pub const fn new(coins: f32, lives: u32) -> Self {
        Self { coins, lives }
    }

    /// Current coin total.
    #[must_use]
    pub const fn coins(&self) -> f32 {
        self.coins
    }

    /// Remaining lives.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Deducts `amount` coins if the player can afford it.
    pub fn spend_coins(&mut self, amount: f32) -> bool {
        if amount > self.coins {
            return false;
        }
        self.coins -= amount;
        true
    }
}

impl PlayerEconomy for PlayerLedger {
    fn grant_coins(&mut self, amount: f32) {
        self.coins += amount.max(0.0);
    }

    fn lose_lives(&mut self, amount: u32) {
        self.lives = self.lives.saturating_sub(amount);
    }
}
