//! Knife: a quick two-phase stab.
//!
//! The swing is timed purely by elapsed time since the trigger: a fast
//! extension (`forward_ratio` of the duration) followed by a slow withdrawal.
//! It can only hit during the extension, and at most once per swing.  A new
//! swing needs a fresh press edge and an expired cooldown; the secondary
//! button swings with `secondary_multiplier` strength (reach, force, damage).

use super::{Trigger, Weapon, WeaponAction, WeaponKind};
use crate::config::KnifeConfig;
use crate::geometry::{from_heading, heading, square};
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingPhase {
    Extending,
    Withdrawing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Knife {
    pub angle: f32,
    pub swinging: bool,
    /// Seconds left in the current swing.
    pub time_left: f32,
    pub cooldown: f32,
    pub strength: f32,
    /// The current swing already connected.
    pub has_hit: bool,
    cfg: KnifeConfig,
}

impl Knife {
    pub fn new(cfg: &KnifeConfig) -> Self {
        Self {
            angle: 0.0,
            swinging: false,
            time_left: 0.0,
            cooldown: 0.0,
            strength: 1.0,
            has_hit: false,
            cfg: cfg.clone(),
        }
    }

    fn start(&mut self, strength: f32) {
        self.swinging = true;
        self.time_left = self.cfg.stab_duration;
        self.cooldown = self.cfg.cooldown;
        self.strength = strength;
        self.has_hit = false;
    }

    pub fn phase(&self) -> Option<SwingPhase> {
        if !self.swinging {
            return None;
        }
        let forward = self.cfg.stab_duration * self.cfg.forward_ratio;
        if self.time_left > self.cfg.stab_duration - forward {
            Some(SwingPhase::Extending)
        } else {
            Some(SwingPhase::Withdrawing)
        }
    }

    /// Current blade extension beyond the resting offset.
    pub fn extension(&self) -> f32 {
        let reach = self.cfg.extension * self.strength;
        let duration = self.cfg.stab_duration;
        let forward = duration * self.cfg.forward_ratio;
        let back = duration - forward;
        match self.phase() {
            None => 0.0,
            Some(SwingPhase::Extending) if forward > 0.0 => {
                reach * (1.0 - (self.time_left - back) / forward).clamp(0.0, 1.0)
            }
            Some(SwingPhase::Extending) => reach,
            Some(SwingPhase::Withdrawing) if back > 0.0 => {
                reach * (self.time_left / back).clamp(0.0, 1.0)
            }
            Some(SwingPhase::Withdrawing) => 0.0,
        }
    }

    /// Blade tip position for a wielder centred at `origin`.
    pub fn tip(&self, origin: Vec2) -> Vec2 {
        origin + from_heading(self.angle) * (self.cfg.offset + self.extension())
    }

    pub fn hitbox(&self, origin: Vec2) -> Rect {
        square(self.tip(origin), self.cfg.hitbox_size)
    }

    /// The blade can still connect this swing.
    pub fn can_hit(&self) -> bool {
        self.phase() == Some(SwingPhase::Extending) && !self.has_hit
    }

    pub fn register_hit(&mut self) {
        self.has_hit = true;
    }
}

impl Weapon for Knife {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Knife
    }

    fn aim(&mut self, origin: Vec2, target: Vec2) {
        let d = target - origin;
        if d != Vec2::ZERO {
            self.angle = heading(d);
        }
    }

    fn update(&mut self, dt: f32, trigger: &Trigger) -> Option<WeaponAction> {
        if self.swinging {
            self.time_left -= dt;
            if self.time_left <= 0.0 {
                self.swinging = false;
                self.time_left = 0.0;
            }
        }
        if self.cooldown > 0.0 {
            self.cooldown -= dt;
        }

        if (trigger.primary_pressed || trigger.secondary_pressed) && self.cooldown <= 0.0 {
            let strength = if trigger.secondary_pressed {
                self.cfg.secondary_multiplier
            } else {
                1.0
            };
            self.start(strength);
            return Some(WeaponAction::Swing { strength });
        }
        None
    }

    fn cooldown(&self) -> f32 {
        self.cooldown.max(0.0)
    }

    fn reset(&mut self) {
        *self = Self::new(&self.cfg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn press() -> Trigger {
        Trigger {
            primary_pressed: true,
            primary_held: true,
            ..default()
        }
    }

    fn hold() -> Trigger {
        Trigger {
            primary_held: true,
            ..default()
        }
    }

    #[test]
    fn press_starts_swing_in_extension() {
        let mut knife = Knife::new(&KnifeConfig::default());
        assert_eq!(
            knife.update(DT, &press()),
            Some(WeaponAction::Swing { strength: 1.0 })
        );
        assert_eq!(knife.phase(), Some(SwingPhase::Extending));
        assert!(knife.can_hit());
    }

    #[test]
    fn holding_does_not_retrigger() {
        let cfg = KnifeConfig::default();
        let mut knife = Knife::new(&cfg);
        knife.update(DT, &press());
        let mut swings = 0;
        for _ in 0..120 {
            if knife.update(DT, &hold()).is_some() {
                swings += 1;
            }
        }
        assert_eq!(swings, 0);
        assert!(!knife.swinging);
    }

    #[test]
    fn hit_only_once_and_only_while_extending() {
        let cfg = KnifeConfig::default();
        let mut knife = Knife::new(&cfg);
        knife.update(DT, &press());
        knife.register_hit();
        assert!(!knife.can_hit());

        let mut knife = Knife::new(&cfg);
        knife.update(DT, &press());
        let mut saw_withdraw = false;
        while knife.swinging {
            if knife.phase() == Some(SwingPhase::Withdrawing) {
                saw_withdraw = true;
                assert!(!knife.can_hit());
            }
            knife.update(DT, &Trigger::default());
        }
        assert!(saw_withdraw);
    }

    #[test]
    fn extension_peaks_at_phase_boundary() {
        let cfg = KnifeConfig::default();
        let mut knife = Knife::new(&cfg);
        knife.update(DT, &press());
        knife.time_left = cfg.stab_duration * (1.0 - cfg.forward_ratio);
        assert!((knife.extension() - cfg.extension).abs() < 1e-4);
    }

    #[test]
    fn secondary_swing_reaches_further() {
        let cfg = KnifeConfig::default();
        let mut knife = Knife::new(&cfg);
        let action = knife.update(
            DT,
            &Trigger {
                secondary_pressed: true,
                ..default()
            },
        );
        assert_eq!(
            action,
            Some(WeaponAction::Swing {
                strength: cfg.secondary_multiplier
            })
        );
        knife.time_left = cfg.stab_duration * (1.0 - cfg.forward_ratio);
        assert!((knife.extension() - cfg.extension * cfg.secondary_multiplier).abs() < 1e-4);
    }

    #[test]
    fn cooldown_gates_a_fresh_press() {
        let mut knife = Knife::new(&KnifeConfig::default());
        knife.update(DT, &press());
        assert!(knife.update(DT, &press()).is_none());
        assert!(knife.cooldown() > 0.0);
    }
}
