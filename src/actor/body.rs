//! Shared physical body for the player and the enemy.
//!
//! ## Tick order inside [`ActorBody::integrate`]
//!
//! 1. Horizontal velocity: either taken from an override (knockback, dash,
//!    dodge) or accelerated by `input + vel * friction`, dead-zoned and
//!    clamped to `max_speed`.
//! 2. Jump / variable-height jump release.
//! 3. Vertical velocity: override, or gravity capped at terminal velocity.
//! 4. Move on x, resolve against tiles; then move on y, resolve against tiles.
//! 5. Smooth the visual tilt toward a target derived from horizontal speed.
//!
//! Resolution snaps the body flush against the nearest boundary of every tile
//! it overlaps in the direction of travel, so the body never ends a tick
//! inside a tile.

use crate::config::ActorTuning;
use crate::constants::VELOCITY_DEADZONE;
use crate::geometry::smooth_angle;
use crate::world::TileWorld;
use bevy::prelude::*;

/// Per-tick locomotion request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Drive {
    /// Horizontal input in `[-1, 1]`, scaled by the tuning's acceleration.
    pub move_x: f32,
    pub jump: bool,
    pub jump_released: bool,
    /// Replaces the horizontal velocity outright (no friction, no clamp).
    pub override_x: Option<f32>,
    /// Replaces the vertical velocity outright (no gravity).
    pub override_y: Option<f32>,
}

/// Set when the horizontal pass was stopped by a tile this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub wall: bool,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct ActorBody {
    /// Top-left corner.
    pub pos: Vec2,
    pub vel: Vec2,
    /// Horizontal acceleration accumulated this tick.
    pub acc_x: f32,
    pub grounded: bool,
    pub jumps_left: u8,
    /// Visual tilt in degrees.
    pub angle: f32,
    pub spawn: Vec2,
    pub tuning: ActorTuning,
}

impl ActorBody {
    pub fn new(spawn: Vec2, tuning: ActorTuning) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            acc_x: 0.0,
            grounded: false,
            jumps_left: tuning.max_jumps,
            angle: 0.0,
            spawn,
            tuning,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.tuning.width, self.tuning.height)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.pos, self.pos + self.size())
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size() * 0.5
    }

    /// Advance one tick.
    pub fn integrate(&mut self, drive: Drive, world: &TileWorld) -> Contacts {
        let t = &self.tuning;

        // ── Horizontal velocity ───────────────────────────────────────────
        if let Some(vx) = drive.override_x {
            self.acc_x = 0.0;
            self.vel.x = vx;
        } else {
            let friction = if self.grounded {
                t.ground_friction
            } else {
                t.air_friction
            };
            self.acc_x = drive.move_x.clamp(-1.0, 1.0) * t.acceleration + self.vel.x * friction;
            self.vel.x += self.acc_x;
            if self.vel.x.abs() < VELOCITY_DEADZONE {
                self.vel.x = 0.0;
            }
            self.vel.x = self.vel.x.clamp(-t.max_speed, t.max_speed);
        }

        // ── Jump ──────────────────────────────────────────────────────────
        if drive.jump && self.jumps_left > 0 {
            self.vel.y = t.jump_velocity;
            self.grounded = false;
            self.jumps_left -= 1;
        }
        if drive.jump_released && self.vel.y < 0.0 {
            self.vel.y *= 0.5;
        }

        // ── Vertical velocity ─────────────────────────────────────────────
        match drive.override_y {
            Some(vy) => self.vel.y = vy,
            None => self.vel.y = (self.vel.y + t.gravity).min(t.terminal_velocity),
        }

        // ── Move & resolve ────────────────────────────────────────────────
        let dx = self.vel.x;
        let contacts = Contacts {
            wall: self.move_x(dx, world),
        };

        self.grounded = false;
        let dy = self.vel.y;
        self.pos.y += dy;
        if dy != 0.0 {
            let rect = self.rect();
            if dy > 0.0 {
                if let Some(top) = world.overlapping(rect).map(|t| t.min.y).reduce(f32::min) {
                    self.pos.y = top - self.tuning.height;
                    self.vel.y = 0.0;
                    self.land();
                }
            } else if let Some(bottom) = world.overlapping(rect).map(|t| t.max.y).reduce(f32::max)
            {
                self.pos.y = bottom;
                self.vel.y = 0.0;
            }
        }

        // ── Tilt ──────────────────────────────────────────────────────────
        let target = if self.grounded {
            0.0
        } else {
            self.vel.x * self.tuning.tilt_per_speed
        };
        self.angle = smooth_angle(self.angle, target, self.tuning.tilt_smoothing);

        contacts
    }

    /// Translate horizontally by `dx` and resolve against tiles.  Returns
    /// `true` if a wall stopped the body.
    pub fn move_x(&mut self, dx: f32, world: &TileWorld) -> bool {
        if dx == 0.0 {
            return false;
        }
        self.pos.x += dx;
        let rect = self.rect();
        let snap = if dx > 0.0 {
            world
                .overlapping(rect)
                .map(|t| t.min.x)
                .reduce(f32::min)
                .map(|left| left - self.tuning.width)
        } else {
            world.overlapping(rect).map(|t| t.max.x).reduce(f32::max)
        };
        match snap {
            Some(x) => {
                self.pos.x = x;
                self.vel.x = 0.0;
                true
            }
            None => false,
        }
    }

    fn land(&mut self) {
        self.grounded = true;
        self.angle = 0.0;
        self.jumps_left = self.tuning.max_jumps;
    }

    /// Impulsive hop that spends a jump charge (used by evasive AI moves).
    pub fn hop(&mut self, scale: f32) {
        if self.jumps_left > 0 {
            self.vel.y = self.tuning.jump_velocity * scale;
            self.grounded = false;
            self.jumps_left -= 1;
        }
    }

    /// Back to the spawn point with no motion.  Idempotent.
    pub fn reset_to_spawn(&mut self) {
        self.pos = self.spawn;
        self.vel = Vec2::ZERO;
        self.acc_x = 0.0;
        self.grounded = false;
        self.jumps_left = self.tuning.max_jumps;
        self.angle = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_world() -> TileWorld {
        // Floor tiles occupy y in [80, 120).
        TileWorld::from_rows(&["          ", "          ", "XXXXXXXXXX"], 40.0).unwrap()
    }

    fn body_at(x: f32, y: f32) -> ActorBody {
        ActorBody::new(Vec2::new(x, y), ActorTuning::default())
    }

    #[test]
    fn falling_body_lands_flush_and_restores_jumps() {
        let world = floor_world();
        let mut body = body_at(100.0, 0.0);
        body.jumps_left = 0;
        for _ in 0..120 {
            body.integrate(Drive::default(), &world);
        }
        assert!(body.grounded);
        assert_eq!(body.rect().max.y, 80.0);
        assert_eq!(body.jumps_left, body.tuning.max_jumps);
        assert!(!world.collides(body.rect()));
    }

    #[test]
    fn jump_sets_upward_velocity_and_spends_a_charge() {
        let world = floor_world();
        let mut body = body_at(100.0, 48.0);
        body.integrate(Drive::default(), &world);
        assert!(body.grounded);

        body.integrate(
            Drive {
                jump: true,
                ..default()
            },
            &world,
        );
        assert_eq!(body.jumps_left, 1);
        assert!(body.vel.y < 0.0);
        assert!(!body.grounded);
    }

    #[test]
    fn releasing_jump_halves_ascent() {
        let world = floor_world();
        let mut body = body_at(100.0, 48.0);
        body.integrate(Drive::default(), &world);
        body.integrate(
            Drive {
                jump: true,
                ..default()
            },
            &world,
        );
        let rising = body.vel.y;
        body.integrate(
            Drive {
                jump_released: true,
                ..default()
            },
            &world,
        );
        let expected = rising * 0.5 + body.tuning.gravity;
        assert!((body.vel.y - expected).abs() < 1e-5);
    }

    #[test]
    fn speed_is_clamped_and_wall_stops_motion() {
        let world =
            TileWorld::from_rows(&["     X", "     X", "XXXXXX"], 40.0).unwrap();
        let mut body = body_at(100.0, 48.0);
        let mut hit_wall = false;
        for _ in 0..120 {
            let c = body.integrate(
                Drive {
                    move_x: 1.0,
                    ..default()
                },
                &world,
            );
            assert!(body.vel.x <= body.tuning.max_speed);
            hit_wall |= c.wall;
            assert!(!world.collides(body.rect()));
        }
        assert!(hit_wall);
        assert_eq!(body.rect().max.x, 200.0);
    }

    #[test]
    fn small_velocity_snaps_to_zero() {
        let world = floor_world();
        let mut body = body_at(100.0, 48.0);
        body.vel.x = 0.05;
        body.integrate(Drive::default(), &world);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn override_bypasses_clamp() {
        let world = floor_world();
        let mut body = body_at(100.0, 48.0);
        body.integrate(
            Drive {
                override_x: Some(15.0),
                ..default()
            },
            &world,
        );
        assert_eq!(body.vel.x, 15.0);
    }

    #[test]
    fn reset_twice_equals_reset_once() {
        let world = floor_world();
        let mut body = body_at(100.0, 0.0);
        for _ in 0..10 {
            body.integrate(
                Drive {
                    move_x: 1.0,
                    ..default()
                },
                &world,
            );
        }
        body.reset_to_spawn();
        let once = body.clone();
        body.reset_to_spawn();
        assert_eq!(body, once);
        assert_eq!(body.pos, body.spawn);
    }
}
