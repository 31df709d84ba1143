//! Health, mana and passive regeneration.
//!
//! Health is always clamped to `[0, max]`.  Two damage channels exist:
//!
//! - [`DamageKind::Normal`]: combat damage.  Starts the health flash timer
//!   (purely visual; there is no gameplay invulnerability window).
//! - [`DamageKind::Void`]: out-of-world damage.  Applied instantly with no
//!   flash.
//!
//! Reaching zero never removes an entity; the lifecycle stage resets the
//! owning actor to its spawn point (see [`crate::combat::respawn_system`]).

use crate::config::HealthConfig;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    Normal,
    Void,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    /// Remaining tint time after a knockback-carrying hit.
    pub hit_flash: f32,
    /// Remaining bar flash after normal damage.
    pub health_flash: f32,
    /// Channel of the most recent damage, if any since the last reset.
    pub last_damage: Option<DamageKind>,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            hit_flash: 0.0,
            health_flash: 0.0,
            last_damage: None,
        }
    }

    /// Apply damage on the given channel.  Non-positive amounts are a no-op.
    /// Returns `true` when this call emptied the pool.
    pub fn damage(&mut self, amount: f32, kind: DamageKind, cfg: &HealthConfig) -> bool {
        if !(amount > 0.0) || self.is_depleted() {
            return false;
        }
        self.current = (self.current - amount).clamp(0.0, self.max);
        self.last_damage = Some(kind);
        if kind == DamageKind::Normal {
            self.health_flash = cfg.health_flash_duration;
        }
        self.is_depleted()
    }

    pub fn take_damage(&mut self, amount: f32, cfg: &HealthConfig) -> bool {
        self.damage(amount, DamageKind::Normal, cfg)
    }

    pub fn take_void_damage(&mut self, amount: f32, cfg: &HealthConfig) -> bool {
        self.damage(amount, DamageKind::Void, cfg)
    }

    /// Restore up to `max`.  Non-positive amounts are a no-op.
    pub fn heal(&mut self, amount: f32) {
        if amount > 0.0 {
            self.current = (self.current + amount).min(self.max);
        }
    }

    /// Start the red hit tint.
    pub fn mark_hit(&mut self, cfg: &HealthConfig) {
        self.hit_flash = cfg.hit_flash_duration;
    }

    pub fn tick_flashes(&mut self, dt: f32) {
        self.hit_flash = (self.hit_flash - dt).max(0.0);
        self.health_flash = (self.health_flash - dt).max(0.0);
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_flashing(&self) -> bool {
        self.hit_flash > 0.0
    }

    pub fn ratio(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// Full health, flashes cleared.
    pub fn reset(&mut self) {
        *self = Self::new(self.max);
    }
}

/// Player resource accrued by landing arrows.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Mana {
    pub current: f32,
    pub max: f32,
}

impl Mana {
    pub fn new(max: f32) -> Self {
        Self { current: 0.0, max }
    }

    pub fn gain(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }

    pub fn ratio(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

/// Heals a fixed amount on a fixed interval, whatever else is happening.
#[derive(Component, Debug, Clone)]
pub struct Regeneration {
    pub amount: f32,
    pub interval: f32,
    elapsed: f32,
}

impl Regeneration {
    pub fn new(cfg: &HealthConfig) -> Self {
        Self {
            amount: cfg.regen_amount,
            interval: cfg.regen_interval,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt`; returns the total amount to heal this tick.
    pub fn tick(&mut self, dt: f32) -> f32 {
        if self.interval <= 0.0 {
            return 0.0;
        }
        self.elapsed += dt;
        let mut healed = 0.0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            healed += self.amount;
        }
        healed
    }
}
