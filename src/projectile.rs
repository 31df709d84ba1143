//! Arrows: ballistic projectiles that pierce a bounded number of platforms.
//!
//! ## Flight
//!
//! Each tick: gravity is added to the vertical velocity, the arrow moves in a
//! straight line, and its heading is recomputed from the *current* velocity.
//!
//! ## Platforms
//!
//! Entering a tile spends one pierce (velocity × `pierce_slowdown`, plus a
//! forward nudge so the arrow does not stick).  Entering a tile with the
//! budget already spent kills the arrow.  An arrow still inside the tile it
//! just pierced does not spend again until it has left solid ground.
//!
//! Arrows leaving the cull box around the level are killed; dead arrows are
//! despawned in the lifecycle stage.

use crate::actor::Team;
use crate::config::{ArrowConfig, CombatConfig};
use crate::geometry::{from_heading, heading, square};
use crate::particles::{spawn_sparks, ParticleKind};
use crate::rng::SimRng;
use crate::trail::Trail;
use crate::world::TileWorld;
use bevy::prelude::*;

/// Result of touching a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformContact {
    Pierced,
    Destroyed,
}

#[derive(Component, Debug, Clone)]
pub struct Arrow {
    /// Centre of the arrow.
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians, derived from velocity.
    pub angle: f32,
    /// Draw strength in `[0, 1]`.
    pub charge: f32,
    pub owner: Team,
    pub shooter: Option<Entity>,
    pub pierce_count: u8,
    pub pierce_cap: u8,
    pub alive: bool,
    inside_tile: bool,
}

impl Arrow {
    pub fn new(pos: Vec2, angle: f32, charge: f32, owner: Team, cfg: &ArrowConfig) -> Self {
        let charge = charge.clamp(0.0, 1.0);
        let speed = cfg.base_speed + (cfg.max_speed - cfg.base_speed) * charge;
        Self {
            pos,
            vel: from_heading(angle) * speed,
            angle,
            charge,
            owner,
            shooter: None,
            pierce_count: 0,
            pierce_cap: cfg.pierce_cap,
            alive: true,
            inside_tile: false,
        }
    }

    pub fn with_shooter(mut self, shooter: Entity) -> Self {
        self.shooter = Some(shooter);
        self
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn hitbox(&self, cfg: &ArrowConfig) -> Rect {
        square(self.pos, cfg.hitbox_size)
    }

    /// Spend a pierce, or die if the budget is exhausted.
    pub fn hit_platform(&mut self, cfg: &ArrowConfig) -> PlatformContact {
        if self.pierce_count < self.pierce_cap {
            self.pierce_count += 1;
            self.vel *= cfg.pierce_slowdown;
            self.pos += self.vel.normalize_or_zero() * cfg.pierce_nudge;
            PlatformContact::Pierced
        } else {
            self.alive = false;
            PlatformContact::Destroyed
        }
    }

    /// Advance one tick.  Returns the platform contact made this tick, if any.
    pub fn step(&mut self, world: &TileWorld, cull: Rect, cfg: &ArrowConfig) -> Option<PlatformContact> {
        if !self.alive {
            return None;
        }
        self.vel.y += cfg.gravity;
        self.pos += self.vel;
        self.angle = heading(self.vel);

        let touching = world.collides(self.hitbox(cfg));
        let contact = match (touching, self.inside_tile) {
            (true, false) => {
                self.inside_tile = true;
                Some(self.hit_platform(cfg))
            }
            (false, _) => {
                self.inside_tile = false;
                None
            }
            (true, true) => None,
        };

        if !cull.contains(self.pos) {
            self.alive = false;
        }
        contact
    }
}

/// An arrow entity with its trail seeded at the spawn point.
pub fn arrow_bundle(arrow: Arrow, cfg: &ArrowConfig) -> impl Bundle {
    let mut trail = Trail::new(cfg.trail_length);
    trail.push(arrow.pos);
    (Name::new("Arrow"), arrow, trail)
}

/// Flight system: move arrows, extend their trails, spark on pierce.
pub fn arrow_flight_system(
    mut commands: Commands,
    config: Res<CombatConfig>,
    world: Res<TileWorld>,
    mut rng: ResMut<SimRng>,
    mut arrows: Query<(&mut Arrow, &mut Trail)>,
) {
    let cull = world.cull_box(config.world.projectile_cull_margin);
    for (mut arrow, mut trail) in arrows.iter_mut() {
        let contact = arrow.step(&world, cull, &config.arrow);
        if arrow.alive {
            trail.push(arrow.pos);
        }
        if contact.is_some() {
            spawn_sparks(
                &mut commands,
                &mut rng,
                &config.particles,
                arrow.pos,
                ParticleKind::Ricochet,
            );
        }
    }
}

/// Remove arrows that died this tick (platform, cull box or hit).
pub fn despawn_dead_arrows(mut commands: Commands, arrows: Query<(Entity, &Arrow)>) {
    for (entity, arrow) in arrows.iter() {
        if !arrow.alive {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_sky() -> (TileWorld, Rect) {
        let world = TileWorld::from_rows(&["X"], 40.0).unwrap();
        let cull = world.cull_box(1000.0);
        (world, cull)
    }

    #[test]
    fn full_charge_reaches_max_speed() {
        let cfg = ArrowConfig::default();
        let arrow = Arrow::new(Vec2::ZERO, 0.3, 1.0, Team::Player, &cfg);
        assert!((arrow.speed() - cfg.max_speed).abs() < 1e-4);
        let weak = Arrow::new(Vec2::ZERO, 0.3, 0.0, Team::Player, &cfg);
        assert!((weak.speed() - cfg.base_speed).abs() < 1e-4);
    }

    #[test]
    fn one_tick_adds_exactly_gravity() {
        let cfg = ArrowConfig::default();
        let (world, cull) = open_sky();
        let mut arrow = Arrow::new(Vec2::new(200.0, -200.0), 0.0, 1.0, Team::Player, &cfg);
        let vy0 = arrow.vel.y;
        arrow.step(&world, cull, &cfg);
        assert!((arrow.vel.y - vy0 - cfg.gravity).abs() < 1e-6);
        assert!(arrow.alive);
    }

    #[test]
    fn heading_follows_velocity() {
        let cfg = ArrowConfig::default();
        let (world, cull) = open_sky();
        let mut arrow = Arrow::new(Vec2::new(200.0, -200.0), 0.0, 0.0, Team::Player, &cfg);
        for _ in 0..30 {
            arrow.step(&world, cull, &cfg);
        }
        assert!(arrow.angle > 0.0, "arrow should be nosing down in y-down space");
        assert!((arrow.angle - heading(arrow.vel)).abs() < 1e-6);
    }

    #[test]
    fn pierce_is_monotonic_and_capped() {
        let cfg = ArrowConfig::default();
        let mut arrow = Arrow::new(Vec2::ZERO, 0.0, 1.0, Team::Player, &cfg);
        let mut last = 0;
        for _ in 0..cfg.pierce_cap {
            assert_eq!(arrow.hit_platform(&cfg), PlatformContact::Pierced);
            assert!(arrow.pierce_count > last);
            assert!(arrow.pierce_count <= arrow.pierce_cap);
            last = arrow.pierce_count;
            assert!(arrow.alive);
        }
        assert_eq!(arrow.hit_platform(&cfg), PlatformContact::Destroyed);
        assert!(!arrow.alive);
        assert_eq!(arrow.pierce_count, arrow.pierce_cap);
    }

    #[test]
    fn pierce_slows_the_arrow() {
        let cfg = ArrowConfig::default();
        let mut arrow = Arrow::new(Vec2::ZERO, 0.0, 1.0, Team::Player, &cfg);
        let before = arrow.speed();
        arrow.hit_platform(&cfg);
        assert!((arrow.speed() - before * cfg.pierce_slowdown).abs() < 1e-4);
    }

    #[test]
    fn wall_crossing_spends_one_pierce() {
        let cfg = ArrowConfig::default();
        // A single column of tiles at x in [80, 120).
        let world = TileWorld::from_rows(&["  X ", "  X ", "  X "], 40.0).unwrap();
        let cull = world.cull_box(1000.0);
        let mut arrow = Arrow::new(Vec2::new(20.0, 60.0), 0.0, 0.0, Team::Player, &cfg);
        arrow.vel = Vec2::new(6.0, 0.0);
        let cfg = ArrowConfig {
            gravity: 0.0,
            ..cfg
        };
        let mut contacts = 0;
        for _ in 0..40 {
            if arrow.step(&world, cull, &cfg).is_some() {
                contacts += 1;
            }
        }
        assert_eq!(contacts, 1);
        assert_eq!(arrow.pierce_count, 1);
        assert!(arrow.alive);
    }

    #[test]
    fn leaving_cull_box_kills() {
        let cfg = ArrowConfig::default();
        let (world, _) = open_sky();
        let tight = world.cull_box(10.0);
        let mut arrow = Arrow::new(Vec2::new(20.0, 20.0), 0.0, 1.0, Team::Player, &cfg);
        for _ in 0..5 {
            arrow.step(&world, tight, &cfg);
        }
        assert!(!arrow.alive);
    }
}
