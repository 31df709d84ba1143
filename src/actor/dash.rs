//! Player dash: a short burst in one of eight directions.
//!
//! The cooldown is measured from dash start, so it keeps running while the
//! dash itself is active.  Speed starts at `initial_speed` and decays
//! geometrically each tick.  A dashing actor ignores combat damage.

use crate::config::DashConfig;
use crate::geometry::sign_or_zero;
use bevy::prelude::*;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Dash {
    pub active: bool,
    pub direction: Vec2,
    pub speed: f32,
    pub remaining: f32,
    pub cooldown: f32,
    /// Last non-zero horizontal facing (`-1` or `1`).
    pub facing: f32,
}

impl Default for Dash {
    fn default() -> Self {
        Self {
            active: false,
            direction: Vec2::ZERO,
            speed: 0.0,
            remaining: 0.0,
            cooldown: 0.0,
            facing: 1.0,
        }
    }
}

impl Dash {
    pub fn ready(&self) -> bool {
        !self.active && self.cooldown <= 0.0
    }

    /// Dash direction for the given 8-way input, falling back to facing.
    pub fn direction_for(&self, input: Vec2) -> Vec2 {
        let snapped = Vec2::new(sign_or_zero(input.x), sign_or_zero(input.y));
        if snapped == Vec2::ZERO {
            Vec2::new(self.facing, 0.0)
        } else {
            snapped.normalize_or_zero()
        }
    }

    /// Begin a dash if off cooldown.  Returns `false` (and changes nothing)
    /// otherwise.
    pub fn try_start(&mut self, input: Vec2, cfg: &DashConfig) -> bool {
        if !self.ready() {
            return false;
        }
        self.direction = self.direction_for(input);
        self.speed = cfg.initial_speed;
        self.remaining = cfg.duration;
        self.cooldown = cfg.cooldown;
        self.active = true;
        true
    }

    /// Advance one tick.  Returns the velocity override while dashing.
    pub fn tick(&mut self, dt: f32, cfg: &DashConfig) -> Option<Vec2> {
        self.cooldown = (self.cooldown - dt).max(0.0);
        if !self.active {
            return None;
        }
        let vel = self.direction * self.speed;
        self.speed *= cfg.deceleration;
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.active = false;
            self.speed = 0.0;
        }
        Some(vel)
    }

    pub fn update_facing(&mut self, x: f32) {
        if x != 0.0 {
            self.facing = x.signum();
        }
    }

    pub fn reset(&mut self) {
        let facing = self.facing;
        *self = Self {
            facing,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_dash_within_cooldown_is_ignored() {
        let cfg = DashConfig::default();
        let mut dash = Dash::default();
        assert!(dash.try_start(Vec2::X, &cfg));
        dash.tick(1.0 / 60.0, &cfg);
        let snapshot = dash.clone();
        assert!(!dash.try_start(-Vec2::X, &cfg));
        assert_eq!(dash, snapshot);
    }

    #[test]
    fn dash_ends_after_duration_and_cooldown_keeps_running() {
        let cfg = DashConfig::default();
        let mut dash = Dash::default();
        dash.try_start(Vec2::ZERO, &cfg);
        let dt = 1.0 / 60.0;
        let mut ticks = 0;
        while dash.active {
            dash.tick(dt, &cfg);
            ticks += 1;
        }
        // One tick of slack for float accumulation in the timer.
        assert!((ticks as f32 - cfg.duration / dt).abs() <= 1.0, "{ticks}");
        assert!(dash.cooldown > 0.0);
        assert!(!dash.ready());
    }

    #[test]
    fn no_input_dashes_along_facing() {
        let mut dash = Dash::default();
        dash.update_facing(-3.0);
        assert_eq!(dash.direction_for(Vec2::ZERO), Vec2::new(-1.0, 0.0));
        let diag = dash.direction_for(Vec2::new(0.7, -0.2));
        assert!((diag.length() - 1.0).abs() < 1e-6);
        assert!(diag.x > 0.0 && diag.y < 0.0);
    }

    #[test]
    fn speed_decays_geometrically() {
        let cfg = DashConfig::default();
        let mut dash = Dash::default();
        dash.try_start(Vec2::X, &cfg);
        let v0 = dash.tick(1.0 / 60.0, &cfg).unwrap();
        let v1 = dash.tick(1.0 / 60.0, &cfg).unwrap();
        assert!((v1.x - v0.x * cfg.deceleration).abs() < 1e-5);
    }
}
