//! Bow: hold to draw, release to fire.
//!
//! `charge = clamp(held / charge_time, 0, 1)` and the arrow's initial speed
//! lerps from base to max with it (see [`crate::projectile::Arrow::new`]).

use super::{Trigger, Weapon, WeaponAction, WeaponKind};
use crate::config::BowConfig;
use crate::geometry::{heading, wrap_radians};
use bevy::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Bow {
    /// Aim in radians, y-down.
    pub angle: f32,
    pub is_drawn: bool,
    /// Seconds the current draw has been held.
    pub held: f32,
    pub charge: f32,
    charge_time: f32,
}

impl Bow {
    pub fn new(cfg: &BowConfig) -> Self {
        Self {
            angle: 0.0,
            is_drawn: false,
            held: 0.0,
            charge: 0.0,
            charge_time: cfg.charge_time,
        }
    }

    fn release(&mut self) {
        self.is_drawn = false;
        self.held = 0.0;
        self.charge = 0.0;
    }
}

impl Weapon for Bow {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Bow
    }

    fn aim(&mut self, origin: Vec2, target: Vec2) {
        let d = target - origin;
        if d != Vec2::ZERO {
            self.angle = heading(d);
        }
    }

    fn update(&mut self, dt: f32, trigger: &Trigger) -> Option<WeaponAction> {
        if trigger.primary_held || trigger.primary_pressed {
            self.is_drawn = true;
            self.held += dt;
            self.charge = if self.charge_time > 0.0 {
                (self.held / self.charge_time).clamp(0.0, 1.0)
            } else {
                1.0
            };
        }

        if trigger.primary_released && self.is_drawn {
            let action = WeaponAction::Fire {
                angle: self.angle,
                charge: self.charge,
            };
            self.release();
            return Some(action);
        }

        if !trigger.primary_held && !trigger.primary_pressed {
            // Button came up without a release edge reaching us.
            self.release();
        }
        None
    }

    fn cooldown(&self) -> f32 {
        0.0
    }

    fn reset(&mut self) {
        self.angle = 0.0;
        self.release();
    }
}

/// Aim assist: if a target sits within the assist window of `angle`, rotate
/// part of the way toward the closest such target.  The correction is
/// `error * strength`, capped at `assist_max_deg`; never a full snap.
pub fn assisted_angle(
    origin: Vec2,
    angle: f32,
    targets: impl IntoIterator<Item = Vec2>,
    cfg: &BowConfig,
) -> f32 {
    let window = cfg.assist_window_deg.to_radians();
    let cap = cfg.assist_max_deg.to_radians();

    let best = targets
        .into_iter()
        .filter_map(|t| {
            let d = t - origin;
            if d == Vec2::ZERO {
                return None;
            }
            let error = wrap_radians(heading(d) - angle);
            (error.abs() <= window).then_some((d.length_squared(), error))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0));

    match best {
        Some((_, error)) => angle + (error * cfg.assist_strength).clamp(-cap, cap),
        None => angle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held() -> Trigger {
        Trigger {
            primary_held: true,
            ..default()
        }
    }

    #[test]
    fn charge_saturates_and_release_fires() {
        let cfg = BowConfig::default();
        let mut bow = Bow::new(&cfg);
        let dt = 1.0 / 60.0;
        for _ in 0..200 {
            assert!(bow.update(dt, &held()).is_none());
        }
        assert_eq!(bow.charge, 1.0);

        let action = bow.update(
            dt,
            &Trigger {
                primary_released: true,
                ..default()
            },
        );
        assert_eq!(
            action,
            Some(WeaponAction::Fire {
                angle: 0.0,
                charge: 1.0
            })
        );
        assert!(!bow.is_drawn);
        assert_eq!(bow.charge, 0.0);
    }

    #[test]
    fn charge_is_proportional_to_hold() {
        let cfg = BowConfig::default();
        let mut bow = Bow::new(&cfg);
        bow.update(cfg.charge_time / 2.0, &held());
        assert!((bow.charge - 0.5).abs() < 1e-5);
    }

    #[test]
    fn release_without_draw_does_nothing() {
        let mut bow = Bow::new(&BowConfig::default());
        let action = bow.update(
            0.1,
            &Trigger {
                primary_released: true,
                ..default()
            },
        );
        assert!(action.is_none());
    }

    #[test]
    fn zero_aim_keeps_previous_angle() {
        let mut bow = Bow::new(&BowConfig::default());
        bow.aim(Vec2::ZERO, Vec2::new(0.0, 10.0));
        let a = bow.angle;
        bow.aim(Vec2::ONE, Vec2::ONE);
        assert_eq!(bow.angle, a);
    }

    #[test]
    fn assist_is_partial_and_capped() {
        let cfg = BowConfig::default();
        // Target 10° below the aim line: corrected by half the error.
        let target = Vec2::new(100.0 * 10f32.to_radians().cos(), 100.0 * 10f32.to_radians().sin());
        let a = assisted_angle(Vec2::ZERO, 0.0, [target], &cfg);
        assert!((a.to_degrees() - 5.0).abs() < 1e-3, "{}", a.to_degrees());

        // Full-strength assist on a 29° error is still capped.
        let eager = BowConfig {
            assist_strength: 1.0,
            ..cfg.clone()
        };
        let far = Vec2::new(100.0 * 29f32.to_radians().cos(), 100.0 * 29f32.to_radians().sin());
        let b = assisted_angle(Vec2::ZERO, 0.0, [far], &eager);
        assert!((b.to_degrees() - eager.assist_max_deg).abs() < 1e-3);

        // Outside the window: untouched.
        let behind = Vec2::new(-100.0, 0.0);
        assert_eq!(assisted_angle(Vec2::ZERO, 0.0, [behind], &cfg), 0.0);
    }

    #[test]
    fn assist_prefers_the_closest_target() {
        let cfg = BowConfig::default();
        let near = Vec2::new(50.0, 5.0);
        let far = Vec2::new(500.0, -50.0);
        let a = assisted_angle(Vec2::ZERO, 0.0, [far, near], &cfg);
        assert!(a > 0.0, "should lean toward the near target below the line");
    }
}
