//! Player weapons behind one [`Weapon`] interface.
//!
//! A weapon is aimed every tick, then fed the trigger edges for that tick.  It
//! answers with at most one [`WeaponAction`]: the bow fires an arrow on
//! release, the knife starts a swing on a fresh press.  Hit resolution for
//! both lives in [`crate::combat`].
//!
//! The [`Loadout`] component holds both weapons and routes input to the
//! selected one only.  Switching weapons resets the one being put away, which
//! cancels a half-drawn bow or an in-flight swing.

pub mod bow;
pub mod knife;

pub use bow::{assisted_angle, Bow};
pub use knife::{Knife, SwingPhase};

use crate::config::CombatConfig;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeaponKind {
    #[default]
    Bow,
    Knife,
}

/// Trigger state for one tick.  `*_pressed` / `*_released` are edges,
/// `primary_held` is a level.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trigger {
    pub primary_pressed: bool,
    pub primary_released: bool,
    pub primary_held: bool,
    pub secondary_pressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponAction {
    /// Loose an arrow along `angle` (radians) with draw strength `charge`.
    Fire { angle: f32, charge: f32 },
    /// A knife swing started with the given strength multiplier.
    Swing { strength: f32 },
}

pub trait Weapon {
    fn kind(&self) -> WeaponKind;

    /// Point the weapon from `origin` toward `target`.  A zero-length aim
    /// keeps the previous angle.
    fn aim(&mut self, origin: Vec2, target: Vec2);

    /// Advance timers by `dt` and react to this tick's trigger.
    fn update(&mut self, dt: f32, trigger: &Trigger) -> Option<WeaponAction>;

    /// Seconds until the weapon can act again.
    fn cooldown(&self) -> f32;

    /// Drop any in-progress draw or swing.
    fn reset(&mut self);
}

#[derive(Component, Debug, Clone)]
pub struct Loadout {
    pub bow: Bow,
    pub knife: Knife,
    pub selected: WeaponKind,
}

impl Loadout {
    pub fn new(cfg: &CombatConfig) -> Self {
        Self {
            bow: Bow::new(&cfg.bow),
            knife: Knife::new(&cfg.knife),
            selected: WeaponKind::Bow,
        }
    }

    pub fn active_mut(&mut self) -> &mut dyn Weapon {
        match self.selected {
            WeaponKind::Bow => &mut self.bow,
            WeaponKind::Knife => &mut self.knife,
        }
    }

    pub fn active(&self) -> &dyn Weapon {
        match self.selected {
            WeaponKind::Bow => &self.bow,
            WeaponKind::Knife => &self.knife,
        }
    }

    /// Switch weapons; the outgoing weapon is reset.  Selecting the current
    /// weapon is a no-op.
    pub fn select(&mut self, kind: WeaponKind) {
        if kind != self.selected {
            self.active_mut().reset();
            self.selected = kind;
        }
    }

    /// `true` while the bow is drawn (used by the enemy's predictive dodge).
    pub fn is_charging_bow(&self) -> bool {
        self.selected == WeaponKind::Bow && self.bow.is_drawn
    }

    pub fn reset(&mut self) {
        self.bow.reset();
        self.knife.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_cancels_the_draw() {
        let cfg = CombatConfig::default();
        let mut loadout = Loadout::new(&cfg);
        loadout.active_mut().update(
            0.5,
            &Trigger {
                primary_held: true,
                primary_pressed: true,
                ..default()
            },
        );
        assert!(loadout.is_charging_bow());

        loadout.select(WeaponKind::Knife);
        assert!(!loadout.bow.is_drawn);
        assert_eq!(loadout.bow.charge, 0.0);
        assert_eq!(loadout.active().kind(), WeaponKind::Knife);
    }

    #[test]
    fn reselecting_is_a_no_op() {
        let cfg = CombatConfig::default();
        let mut loadout = Loadout::new(&cfg);
        loadout.active_mut().update(
            0.5,
            &Trigger {
                primary_held: true,
                ..default()
            },
        );
        loadout.select(WeaponKind::Bow);
        assert!(loadout.bow.is_drawn);
    }
}
