//! Knockback: a temporary horizontal velocity override with its own decay.
//!
//! Applying knockback **overwrites** the stored horizontal knockback velocity
//! and **adds** the vertical component straight onto the body's velocity, so
//! repeated hits in the air stack upward pops while horizontal shoves simply
//! replace each other.  Gravity owns the vertical component afterwards.

use super::body::ActorBody;
use crate::config::KnockbackConfig;
use bevy::prelude::*;

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Knockback {
    pub active: bool,
    pub vel_x: f32,
    pub remaining: f32,
}

impl Knockback {
    /// Start (or replace) a knockback from `force`.
    ///
    /// Duration is `max(min, |force| / force_per_second) * duration_multiplier`
    /// capped at the configured maximum.
    pub fn apply(
        &mut self,
        body: &mut ActorBody,
        force: Vec2,
        duration_multiplier: f32,
        cfg: &KnockbackConfig,
    ) {
        self.vel_x = force.x;
        body.vel.y += force.y;

        let base = (force.length() / cfg.force_per_second).max(cfg.min_duration);
        self.remaining = (base * duration_multiplier.max(0.0)).min(cfg.max_duration);
        self.active = true;
    }

    /// Advance one tick.  Returns the horizontal velocity override while the
    /// knockback is still in effect.
    pub fn tick(&mut self, grounded: bool, dt: f32, cfg: &KnockbackConfig) -> Option<f32> {
        if !self.active {
            return None;
        }
        self.remaining -= dt;
        self.vel_x *= if grounded {
            cfg.ground_decay
        } else {
            cfg.air_decay
        };
        if self.vel_x.abs() < cfg.epsilon || self.remaining <= 0.0 {
            self.clear();
            return None;
        }
        Some(self.vel_x)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
