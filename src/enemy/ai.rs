//! Enemy decision making.
//!
//! ## Per-tick order
//!
//! 1. Cooldowns and evasion timers tick; a finished evasion dash bleeds off
//!    most of its horizontal speed.
//! 2. Knockback ticks.
//! 3. Attack machines advance against the player's current centre.  A
//!    finished cross releases its strike burst.
//! 4. Decisions, unless stunned or mid-dash:
//!    evasion dash → predictive dodge → melee trigger → lightning trigger →
//!    locomotion.  A charging cross ignores knockback stun.
//! 5. Random hop timer.
//! 6. Physics with the highest-priority velocity override
//!    (knockback, then evasion dash, then dodge).  Hitting a wall reverses
//!    the walking direction.
//!
//! With no player in the world the enemy still falls and collides but makes
//! no decisions.

use super::state::{EnemyBrain, StrikeBurst};
use super::Enemy;
use crate::actor::{ActorBody, Drive, Knockback, Team};
use crate::config::{CombatConfig, EnemyAiConfig};
use crate::particles::{spawn_burst, ParticleKind};
use crate::player::Player;
use crate::projectile::Arrow;
use crate::rng::SimRng;
use crate::rush::RushMode;
use crate::weapons::Loadout;
use crate::world::TileWorld;
use bevy::prelude::*;

/// What the enemy knows about the player this tick.
#[derive(Debug, Clone, Copy)]
struct Target {
    center: Vec2,
    charging_bow: bool,
}

/// An incoming arrow is close and pointed at `center` tightly enough to be
/// worth evading.
pub fn arrow_threatens(center: Vec2, arrow: &Arrow, rush_active: bool, cfg: &EnemyAiConfig) -> bool {
    if !arrow.alive || arrow.owner == Team::Enemy {
        return false;
    }
    let offset = center - arrow.pos;
    let dist = offset.length();
    if dist >= cfg.evade_detection_range {
        return false;
    }
    let heading = arrow.vel.normalize_or_zero();
    if heading == Vec2::ZERO {
        return false;
    }
    let toward = offset / dist.max(1.0);
    let threshold = if rush_active {
        cfg.evade_threshold_rush
    } else {
        cfg.evade_threshold
    };
    heading.dot(toward) > threshold
}

#[allow(clippy::too_many_arguments)]
pub fn enemy_ai_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<CombatConfig>,
    world: Res<TileWorld>,
    rush: Res<RushMode>,
    mut rng: ResMut<SimRng>,
    players: Query<(&ActorBody, &Loadout), With<Player>>,
    arrows: Query<&Arrow>,
    mut enemies: Query<
        (&mut ActorBody, &mut Knockback, &mut EnemyBrain, Option<&StrikeBurst>),
        (With<Enemy>, Without<Player>),
    >,
) {
    let dt = time.delta_secs();
    let ai = &config.enemy_ai;
    let rush_active = rush.is_active();
    let target = players.single().ok().map(|(body, loadout)| Target {
        center: body.center(),
        charging_bow: loadout.is_charging_bow(),
    });

    for (mut body, mut knockback, mut brain, burst) in enemies.iter_mut() {
        if brain.tick_timers(dt) {
            body.vel.x *= ai.dash_exit_damping;
        }
        let knockback_vel = knockback.tick(body.grounded, dt, &config.knockback);

        if let Some(target) = target {
            if let Some(anchor) = brain.advance_attacks(dt, target.center, ai) {
                if let Some(burst) = burst {
                    spawn_burst(
                        &mut commands,
                        &mut rng,
                        &config.particles,
                        anchor,
                        burst.count,
                        ParticleKind::Strike,
                        Some(burst.damage),
                    );
                }
            }

            let stunned = knockback_vel.is_some() && !brain.melee.is_charging();
            if !stunned && !brain.is_dashing() {
                let center = body.center();
                let to_player = target.center - center;
                let distance = to_player.length();

                // Evasion dash against incoming player arrows.
                if brain.dash_cooldown.ready() {
                    for arrow in arrows.iter() {
                        if !arrow_threatens(center, arrow, rush_active, ai) {
                            continue;
                        }
                        if !rush_active && !rng.chance(ai.dodge_chance) {
                            continue;
                        }
                        let left = rng.coin_flip();
                        if brain.start_evasion(arrow.vel, left, ai) {
                            if body.grounded && rng.chance(ai.evade_jump_chance) {
                                body.hop(ai.evade_jump_scale);
                            }
                            debug!("enemy evades arrow at {:?}", arrow.pos);
                        }
                        break;
                    }
                }

                // Predictive dodge while the player is drawing.
                if !rush_active
                    && target.charging_bow
                    && distance <= ai.dodge_detection_range
                    && brain.dodge_cooldown.ready()
                    && rng.chance(ai.dodge_chance)
                    && brain.start_dodge(to_player, ai)
                {
                    if body.grounded && rng.chance(ai.evade_jump_chance) {
                        body.hop(ai.evade_jump_scale);
                    }
                    debug!("enemy sidesteps a drawn bow");
                }

                if distance <= ai.melee_range && brain.start_melee(target.center, ai) {
                    debug!("enemy cross charging at {:?}", target.center);
                }
                if distance <= ai.lightning_range && brain.start_lightning(target.center.x, ai) {
                    debug!("enemy lightning warning at x={:.1}", target.center.x);
                }

                brain.steer(to_player, ai);
            }
        }

        brain.jump_timer += dt;
        let mut jump = false;
        if brain.jump_timer >= brain.jump_interval && body.grounded {
            jump = rng.chance(ai.jump_chance);
            brain.jump_timer = 0.0;
            brain.jump_interval = rng.range(ai.jump_interval_min, ai.jump_interval_max);
        }

        let override_x = knockback_vel
            .or_else(|| brain.dash.map(|d| d.direction * ai.dash_speed))
            .or_else(|| brain.dodge.map(|d| d.direction * ai.dodge_speed));
        let drive = Drive {
            move_x: brain.move_direction,
            jump,
            override_x,
            ..default()
        };
        let contacts = body.integrate(drive, &world);
        if contacts.wall {
            brain.move_direction = -brain.move_direction;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArrowConfig;

    fn arrow_at(pos: Vec2, angle: f32, owner: Team) -> Arrow {
        Arrow::new(pos, angle, 1.0, owner, &ArrowConfig::default())
    }

    #[test]
    fn arrow_aimed_at_enemy_threatens() {
        let cfg = EnemyAiConfig::default();
        let arrow = arrow_at(Vec2::new(-100.0, 0.0), 0.0, Team::Player);
        assert!(arrow_threatens(Vec2::ZERO, &arrow, false, &cfg));
    }

    #[test]
    fn arrow_flying_away_does_not_threaten() {
        let cfg = EnemyAiConfig::default();
        let arrow = arrow_at(Vec2::new(-100.0, 0.0), std::f32::consts::PI, Team::Player);
        assert!(!arrow_threatens(Vec2::ZERO, &arrow, false, &cfg));
    }

    #[test]
    fn distant_or_friendly_arrows_are_ignored() {
        let cfg = EnemyAiConfig::default();
        let far = arrow_at(Vec2::new(-500.0, 0.0), 0.0, Team::Player);
        assert!(!arrow_threatens(Vec2::ZERO, &far, false, &cfg));
        let own = arrow_at(Vec2::new(-100.0, 0.0), 0.0, Team::Enemy);
        assert!(!arrow_threatens(Vec2::ZERO, &own, false, &cfg));
    }

    #[test]
    fn rush_needs_tighter_alignment() {
        let cfg = EnemyAiConfig::default();
        // About 50° off: cos ≈ 0.64, between the two thresholds.
        let angle = 50f32.to_radians();
        let arrow = arrow_at(Vec2::new(-100.0, 0.0), angle, Team::Player);
        assert!(arrow_threatens(Vec2::ZERO, &arrow, false, &cfg));
        assert!(!arrow_threatens(Vec2::ZERO, &arrow, true, &cfg));
    }
}
