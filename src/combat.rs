//! Combat resolution and actor lifecycle.
//!
//! ## Combat stage (after every actor and projectile has moved)
//!
//! | System | Attacker → target | Effect |
//! |---|---|---|
//! | [`arrow_hit_system`] | arrow → actor of another team | consume arrow, knockback, damage, shooter gains mana |
//! | [`knife_hit_system`] | player knife → enemy | knockback, damage, wielder heals |
//! | [`enemy_strike_system`] | queued cross / lightning → player | damage, cross knockback |
//! | [`particle_hit_system`] | strike particle → player | damage once per particle |
//! | [`separation_system`] | player ↔ enemy | push overlapping bodies apart |
//! | [`regeneration_system`] | | passive healing |
//! | [`flash_tick_system`] | | visual flash timers |
//!
//! A dashing player ignores every hit.  Player-dealt damage is scaled by the
//! rush multiplier.
//!
//! ## Lifecycle stage
//!
//! [`void_damage_system`] then [`respawn_system`]: actors below the kill line
//! take void damage, and any actor at zero health is reset to its spawn point
//! with transient state cleared.

use crate::actor::{ActorBody, Dash, Knockback, Team};
use crate::config::CombatConfig;
use crate::enemy::{Enemy, EnemyBrain, StrikeKind};
use crate::geometry::{from_heading, overlaps};
use crate::health::{Health, Mana, Regeneration};
use crate::particles::{spawn_sparks, Particle, ParticleKind};
use crate::player::Player;
use crate::projectile::Arrow;
use crate::rng::SimRng;
use crate::rush::RushMode;
use crate::trail::Trail;
use crate::weapons::{Loadout, WeaponKind};
use crate::world::TileWorld;
use bevy::prelude::*;

fn is_dashing(dash: Option<&Dash>) -> bool {
    dash.is_some_and(|d| d.active)
}

// ── Knockback shaping ─────────────────────────────────────────────────────────

/// Knockback from an arrow: along the flight direction, stronger for faster
/// arrows, weaker for every pierce already spent, with an upward pop.
pub fn arrow_knockback(arrow: &Arrow, cfg: &CombatConfig) -> Vec2 {
    let a = &cfg.arrow;
    let dir = arrow.vel.normalize_or_zero();
    let speed_factor = (arrow.speed() / a.base_speed).max(1.0);
    let falloff = a.pierce_falloff.powi(i32::from(arrow.pierce_count));
    let magnitude = cfg.knockback.base_force * a.knockback_multiplier * speed_factor * falloff;
    Vec2::new(dir.x * magnitude, dir.y * magnitude * 0.5 - a.knockback_lift)
}

pub fn arrow_damage(arrow: &Arrow, cfg: &CombatConfig, rush: &RushMode) -> f32 {
    let base = cfg.arrow.base_damage + cfg.arrow.charge_damage_bonus * arrow.charge;
    if arrow.owner == Team::Player {
        base * rush.damage_multiplier(&cfg.rush)
    } else {
        base
    }
}

/// Knockback from a knife swing along the blade, vertical halved.
pub fn knife_knockback(angle: f32, strength: f32, cfg: &CombatConfig) -> Vec2 {
    let dir = from_heading(angle);
    let magnitude = cfg.knockback.base_force * strength;
    Vec2::new(dir.x * magnitude, dir.y * magnitude * 0.5)
}

/// Cross knockback pushes the player away from the anchor and up.
pub fn cross_knockback(anchor: Vec2, target: Vec2, force: f32) -> Vec2 {
    let side = if target.x >= anchor.x { 1.0 } else { -1.0 };
    Vec2::new(side * force, -force * 0.5)
}

// ── Combat systems ────────────────────────────────────────────────────────────

#[allow(clippy::type_complexity)]
pub fn arrow_hit_system(
    mut commands: Commands,
    config: Res<CombatConfig>,
    rush: Res<RushMode>,
    mut rng: ResMut<SimRng>,
    mut arrows: Query<&mut Arrow>,
    mut targets: Query<(
        &Team,
        &mut ActorBody,
        &mut Knockback,
        &mut Health,
        Option<&Dash>,
    )>,
    mut mana: Query<&mut Mana>,
) {
    for mut arrow in arrows.iter_mut() {
        if !arrow.alive {
            continue;
        }
        let hitbox = arrow.hitbox(&config.arrow);
        for (team, mut body, mut knockback, mut health, dash) in targets.iter_mut() {
            if *team == arrow.owner || is_dashing(dash) || !overlaps(hitbox, body.rect()) {
                continue;
            }

            let force = arrow_knockback(&arrow, &config);
            knockback.apply(&mut body, force, 1.0, &config.knockback);
            let damage = arrow_damage(&arrow, &config, &rush);
            health.take_damage(damage, &config.health);
            health.mark_hit(&config.health);
            debug!("arrow hit {:?} for {:.1}", team, damage);

            if let Some(shooter) = arrow.shooter {
                if let Ok(mut pool) = mana.get_mut(shooter) {
                    pool.gain(config.arrow.mana_on_hit);
                }
            }
            spawn_sparks(
                &mut commands,
                &mut rng,
                &config.particles,
                arrow.pos,
                ParticleKind::Impact,
            );
            arrow.alive = false;
            break;
        }
    }
}

pub fn knife_hit_system(
    mut commands: Commands,
    config: Res<CombatConfig>,
    rush: Res<RushMode>,
    mut rng: ResMut<SimRng>,
    mut players: Query<(&ActorBody, &mut Loadout, &mut Health), With<Player>>,
    mut enemies: Query<
        (&mut ActorBody, &mut Knockback, &mut Health),
        (With<Enemy>, Without<Player>),
    >,
) {
    for (player_body, mut loadout, mut player_health) in players.iter_mut() {
        if loadout.selected != WeaponKind::Knife || !loadout.knife.can_hit() {
            continue;
        }
        let hitbox = loadout.knife.hitbox(player_body.center());
        for (mut body, mut knockback, mut health) in enemies.iter_mut() {
            if !overlaps(hitbox, body.rect()) {
                continue;
            }
            let strength = loadout.knife.strength;
            let force = knife_knockback(loadout.knife.angle, strength, &config);
            knockback.apply(&mut body, force, 1.0, &config.knockback);
            let damage = config.knife.damage * strength * rush.damage_multiplier(&config.rush);
            health.take_damage(damage, &config.health);
            health.mark_hit(&config.health);
            player_health.heal(config.knife.heal_on_hit);
            loadout.knife.register_hit();
            spawn_sparks(
                &mut commands,
                &mut rng,
                &config.particles,
                hitbox.center(),
                ParticleKind::Impact,
            );
            debug!("knife hit for {:.1}", damage);
            break;
        }
    }
}

/// Resolve the enemy attacks that landed this tick.  The queue is always
/// drained, even when the player dodges.
pub fn enemy_strike_system(
    config: Res<CombatConfig>,
    mut enemies: Query<&mut EnemyBrain>,
    mut players: Query<(&mut ActorBody, &mut Knockback, &mut Health, Option<&Dash>), With<Player>>,
) {
    for mut brain in enemies.iter_mut() {
        if brain.pending.is_empty() {
            continue;
        }
        let strikes = std::mem::take(&mut brain.pending);
        for (mut body, mut knockback, mut health, dash) in players.iter_mut() {
            if is_dashing(dash) {
                continue;
            }
            for strike in &strikes {
                health.take_damage(strike.damage, &config.health);
                if strike.kind == StrikeKind::Cross {
                    let force = cross_knockback(strike.origin, body.center(), strike.knockback);
                    knockback.apply(&mut body, force, 1.0, &config.knockback);
                    health.mark_hit(&config.health);
                }
                debug!("{:?} hit the player for {:.1}", strike.kind, strike.damage);
            }
        }
    }
}

pub fn particle_hit_system(
    config: Res<CombatConfig>,
    mut particles: Query<&mut Particle>,
    mut players: Query<(&ActorBody, &mut Health, Option<&Dash>), With<Player>>,
) {
    for mut particle in particles.iter_mut() {
        let Some(damage) = particle.live_damage() else {
            continue;
        };
        let hitbox = particle.hitbox(&config.particles);
        for (body, mut health, dash) in players.iter_mut() {
            if is_dashing(dash) || !overlaps(hitbox, body.rect()) {
                continue;
            }
            health.take_damage(damage, &config.health);
            particle.spent = true;
            break;
        }
    }
}

/// Push overlapping player and enemy bodies apart horizontally.
pub fn separation_system(
    config: Res<CombatConfig>,
    world: Res<TileWorld>,
    mut players: Query<&mut ActorBody, With<Player>>,
    mut enemies: Query<&mut ActorBody, (With<Enemy>, Without<Player>)>,
) {
    let push = config.world.separation_speed;
    for mut player in players.iter_mut() {
        for mut enemy in enemies.iter_mut() {
            if !overlaps(player.rect(), enemy.rect()) {
                continue;
            }
            let side = if player.center().x < enemy.center().x {
                -1.0
            } else {
                1.0
            };
            player.move_x(side * push, &world);
            enemy.move_x(-side * push, &world);
        }
    }
}

pub fn regeneration_system(time: Res<Time>, mut query: Query<(&mut Health, &mut Regeneration)>) {
    let dt = time.delta_secs();
    for (mut health, mut regen) in query.iter_mut() {
        let amount = regen.tick(dt);
        if amount > 0.0 {
            health.heal(amount);
        }
    }
}

pub fn flash_tick_system(time: Res<Time>, mut query: Query<&mut Health>) {
    let dt = time.delta_secs();
    for mut health in query.iter_mut() {
        health.tick_flashes(dt);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

pub fn void_damage_system(
    config: Res<CombatConfig>,
    world: Res<TileWorld>,
    mut query: Query<(&ActorBody, &mut Health)>,
) {
    let kill_line = world.kill_line(config.world.void_margin);
    for (body, mut health) in query.iter_mut() {
        if body.pos.y > kill_line {
            health.take_void_damage(config.world.void_damage, &config.health);
        }
    }
}

/// Reset every actor whose health ran out.  Running it twice on the same
/// actor leaves the same state as running it once.
#[allow(clippy::type_complexity)]
pub fn respawn_system(
    mut query: Query<(
        Option<&Name>,
        &mut ActorBody,
        &mut Knockback,
        &mut Health,
        Option<&mut Dash>,
        Option<&mut Loadout>,
        Option<&mut EnemyBrain>,
        Option<&mut Trail>,
    )>,
) {
    for (name, mut body, mut knockback, mut health, dash, loadout, brain, trail) in query.iter_mut() {
        if !health.is_depleted() {
            continue;
        }
        let cause = health.last_damage;
        reset_actor(&mut body, &mut knockback, &mut health);
        if let Some(mut dash) = dash {
            dash.reset();
        }
        if let Some(mut loadout) = loadout {
            loadout.reset();
        }
        if let Some(mut brain) = brain {
            brain.reset();
        }
        if let Some(mut trail) = trail {
            trail.clear();
        }
        info!(
            "{} respawned at {:?} ({:?})",
            name.map_or("actor", |n| n.as_str()),
            body.spawn,
            cause
        );
    }
}

/// Shared part of a respawn.
pub fn reset_actor(body: &mut ActorBody, knockback: &mut Knockback, health: &mut Health) {
    body.reset_to_spawn();
    knockback.clear();
    health.reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArrowConfig;

    #[test]
    fn faster_arrows_push_harder() {
        let cfg = CombatConfig::default();
        let slow = Arrow::new(Vec2::ZERO, 0.0, 0.0, Team::Player, &cfg.arrow);
        let fast = Arrow::new(Vec2::ZERO, 0.0, 1.0, Team::Player, &cfg.arrow);
        let slow_kb = arrow_knockback(&slow, &cfg);
        let fast_kb = arrow_knockback(&fast, &cfg);
        assert!(fast_kb.x > slow_kb.x);
        assert!(slow_kb.y < 0.0, "always pops upward");
        // Base speed floors the ratio at 1.
        let expected = cfg.knockback.base_force * cfg.arrow.knockback_multiplier;
        assert!((slow_kb.x - expected).abs() < 1e-4);
    }

    #[test]
    fn pierced_arrows_push_less() {
        let cfg = CombatConfig::default();
        let fresh = Arrow::new(Vec2::ZERO, 0.0, 1.0, Team::Player, &cfg.arrow);
        let mut worn = fresh.clone();
        worn.pierce_count = 2;
        let ratio = arrow_knockback(&worn, &cfg).x / arrow_knockback(&fresh, &cfg).x;
        assert!((ratio - cfg.arrow.pierce_falloff.powi(2)).abs() < 1e-4);
    }

    #[test]
    fn damage_scales_with_charge_and_rush() {
        let cfg = CombatConfig::default();
        let a = ArrowConfig::default();
        let arrow = Arrow::new(Vec2::ZERO, 0.0, 1.0, Team::Player, &a);
        let mut rush = RushMode::default();
        assert_eq!(arrow_damage(&arrow, &cfg, &rush), a.base_damage + a.charge_damage_bonus);
        rush.try_activate(&cfg.rush);
        assert_eq!(
            arrow_damage(&arrow, &cfg, &rush),
            (a.base_damage + a.charge_damage_bonus) * cfg.rush.damage_multiplier
        );
        let hostile = Arrow::new(Vec2::ZERO, 0.0, 0.0, Team::Enemy, &a);
        assert_eq!(arrow_damage(&hostile, &cfg, &rush), a.base_damage);
    }

    #[test]
    fn cross_pushes_away_from_anchor() {
        let left = cross_knockback(Vec2::new(100.0, 0.0), Vec2::new(80.0, 0.0), 6.0);
        assert_eq!(left, Vec2::new(-6.0, -3.0));
        let right = cross_knockback(Vec2::new(100.0, 0.0), Vec2::new(120.0, 0.0), 6.0);
        assert_eq!(right, Vec2::new(6.0, -3.0));
    }

    #[test]
    fn secondary_knife_hits_harder() {
        let cfg = CombatConfig::default();
        let light = knife_knockback(0.0, 1.0, &cfg);
        let heavy = knife_knockback(0.0, cfg.knife.secondary_multiplier, &cfg);
        assert!(heavy.x > light.x);
        assert_eq!(light.y, 0.0);
    }
}
