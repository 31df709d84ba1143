//! Particle effects: impact sparks, pierce ricochets, and the boss's damaging
//! strike burst.
//!
//! ## Design
//!
//! Particles are lightweight ECS entities with a [`Particle`] component that
//! stores their own physics state.  They are spawned by [`spawn_burst`], which
//! takes only `&mut Commands` plus the shared RNG, and advanced by
//! [`particle_update_system`] in the `Particles` stage.
//!
//! | Kind | Damage | Spawned by |
//! |---|---|---|
//! | [`ParticleKind::Impact`] | none | arrow / knife hits |
//! | [`ParticleKind::Ricochet`] | none | arrow pierces a platform |
//! | [`ParticleKind::Strike`] | per particle, once | enemy melee completion |
//!
//! Motion is per tick (gravity then drag); lifetime is in seconds.  A damaging
//! particle is spent after its first hit so it cannot damage the same target
//! twice.

use crate::config::{CombatConfig, ParticleConfig};
use crate::geometry::{from_heading, square};
use crate::rng::SimRng;
use bevy::prelude::*;

// ── Component ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Impact,
    Ricochet,
    Strike,
}

#[derive(Component, Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Time alive so far (s).
    pub age: f32,
    /// Total lifetime (s); the entity is despawned when `age >= lifetime`.
    pub lifetime: f32,
    pub kind: ParticleKind,
    /// Damage dealt on contact, if this particle can hurt.
    pub damage: Option<f32>,
    /// Set once a damaging particle has landed its hit.
    pub spent: bool,
}

impl Particle {
    /// Advance one tick.  Returns `false` once the lifetime has elapsed.
    pub fn step(&mut self, dt: f32, cfg: &ParticleConfig) -> bool {
        self.pos += self.vel;
        self.vel.y += cfg.gravity;
        self.vel *= cfg.drag;
        self.age += dt;
        self.age < self.lifetime
    }

    /// Remaining lifetime in `[0, 1]`, for alpha and size falloff.
    pub fn life_ratio(&self) -> f32 {
        if self.lifetime > 0.0 {
            (1.0 - self.age / self.lifetime).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn hitbox(&self, cfg: &ParticleConfig) -> Rect {
        square(self.pos, cfg.size * 2.0)
    }

    /// Damage this particle can still deal.
    pub fn live_damage(&self) -> Option<f32> {
        if self.spent {
            None
        } else {
            self.damage
        }
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Spawn `count` particles radiating from `origin` with random heading, speed
/// and lifetime.
pub fn spawn_burst(
    commands: &mut Commands,
    rng: &mut SimRng,
    cfg: &ParticleConfig,
    origin: Vec2,
    count: usize,
    kind: ParticleKind,
    damage: Option<f32>,
) {
    for _ in 0..count {
        let speed = rng.range(cfg.speed_min, cfg.speed_max);
        let vel = from_heading(rng.angle()) * speed;
        let lifetime =
            cfg.lifetime + rng.range(-cfg.lifetime_jitter, cfg.lifetime_jitter);
        commands.spawn(Particle {
            pos: origin,
            vel,
            age: 0.0,
            lifetime: lifetime.max(0.0),
            kind,
            damage,
            spent: false,
        });
    }
}

/// Non-damaging sparks using the configured default count.
pub fn spawn_sparks(
    commands: &mut Commands,
    rng: &mut SimRng,
    cfg: &ParticleConfig,
    origin: Vec2,
    kind: ParticleKind,
) {
    spawn_burst(commands, rng, cfg, origin, cfg.count, kind, None);
}

// ── Update system ─────────────────────────────────────────────────────────────

/// Move every particle and despawn those whose lifetime has run out.
pub fn particle_update_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<CombatConfig>,
    mut query: Query<(Entity, &mut Particle)>,
) {
    let dt = time.delta_secs();
    for (entity, mut particle) in query.iter_mut() {
        if !particle.step(dt, &config.particles) {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(damage: Option<f32>) -> Particle {
        Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(4.0, 0.0),
            age: 0.0,
            lifetime: 0.1,
            kind: ParticleKind::Strike,
            damage,
            spent: false,
        }
    }

    #[test]
    fn gravity_and_drag_apply_each_tick() {
        let cfg = ParticleConfig::default();
        let mut p = particle(None);
        p.step(1.0 / 60.0, &cfg);
        assert_eq!(p.pos, Vec2::new(4.0, 0.0));
        assert!((p.vel.x - 4.0 * cfg.drag).abs() < 1e-6);
        assert!((p.vel.y - cfg.gravity * cfg.drag).abs() < 1e-6);
    }

    #[test]
    fn expires_after_lifetime() {
        let cfg = ParticleConfig::default();
        let mut p = particle(None);
        let mut ticks = 0;
        while p.step(1.0 / 60.0, &cfg) {
            ticks += 1;
        }
        assert!(ticks >= 5 && ticks <= 6, "{ticks}");
        assert_eq!(p.life_ratio(), 0.0);
    }

    #[test]
    fn spent_particle_deals_no_damage() {
        let mut p = particle(Some(5.0));
        assert_eq!(p.live_damage(), Some(5.0));
        p.spent = true;
        assert_eq!(p.live_damage(), None);
    }

    #[test]
    fn burst_spawns_requested_count() {
        let mut app = App::new();
        app.insert_resource(SimRng::from_seed(3));
        app.add_systems(Update, |mut commands: Commands, mut rng: ResMut<SimRng>| {
            let cfg = ParticleConfig::default();
            spawn_burst(
                &mut commands,
                &mut rng,
                &cfg,
                Vec2::ZERO,
                15,
                ParticleKind::Strike,
                Some(5.0),
            );
        });
        app.update();

        let world = app.world_mut();
        let mut q = world.query::<&Particle>();
        let particles: Vec<&Particle> = q.iter(world).collect();
        assert_eq!(particles.len(), 15);
        let cfg = ParticleConfig::default();
        for p in particles {
            assert_eq!(p.damage, Some(5.0));
            let speed = p.vel.length();
            assert!(speed >= cfg.speed_min - 1e-4 && speed <= cfg.speed_max + 1e-4);
        }
    }
}
