//! Rush mode: a short damage boost earned by dashing through a charging cross.
//!
//! Activation happens in the player system when a dash starts while any
//! enemy's melee cross is charging.  While active, player hits deal
//! `damage_multiplier` times their damage and the enemy switches to its
//! stricter evasion (always dodges aligned arrows, never predicts).  The
//! cooldown is measured from activation.

use crate::config::RushConfig;
use bevy::prelude::*;

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct RushMode {
    pub remaining: f32,
    pub cooldown: f32,
}

impl RushMode {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Start rush mode if off cooldown.
    pub fn try_activate(&mut self, cfg: &RushConfig) -> bool {
        if self.cooldown > 0.0 {
            return false;
        }
        self.remaining = cfg.duration;
        self.cooldown = cfg.cooldown;
        true
    }

    pub fn damage_multiplier(&self, cfg: &RushConfig) -> f32 {
        if self.is_active() {
            cfg.damage_multiplier
        } else {
            1.0
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
        self.cooldown = (self.cooldown - dt).max(0.0);
    }
}

pub fn rush_tick_system(time: Res<Time>, mut rush: ResMut<RushMode>) {
    let was_active = rush.is_active();
    rush.tick(time.delta_secs());
    if was_active && !rush.is_active() {
        info!("rush mode ended; ready again in {:.1}s", rush.cooldown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_is_gated_by_cooldown() {
        let cfg = RushConfig::default();
        let mut rush = RushMode::default();
        assert!(rush.try_activate(&cfg));
        assert!(rush.is_active());
        assert_eq!(rush.damage_multiplier(&cfg), cfg.damage_multiplier);

        rush.tick(cfg.duration + 0.01);
        assert!(!rush.is_active());
        assert_eq!(rush.damage_multiplier(&cfg), 1.0);
        assert!(!rush.try_activate(&cfg), "cooldown runs from activation");

        rush.tick(cfg.cooldown);
        assert!(rush.try_activate(&cfg));
    }
}
