//! The player actor and its per-tick control system.
//!
//! ## Pipeline (one fixed tick)
//!
//! 1. Weapon selection from [`FrameInput::select_weapon`].
//! 2. Dash trigger.  Starting a dash while an enemy cross is charging also
//!    tries to start [`RushMode`].
//! 3. Velocity override: dash first, then knockback.  A dash cancels the
//!    jump for that tick.
//! 4. Body integration against the tile world.
//! 5. Dash cosmetics: roll and trail while dashing, trail fade otherwise.
//! 6. Active weapon aims at the pointer and consumes the trigger edges.  A
//!    bow release spawns an aim-assisted arrow; knife hits are resolved in
//!    [`crate::combat`].
//!
//! Input arrives only through [`FrameInput`], so tests drive the player by
//! writing that resource directly.

use crate::actor::{ActorBody, Dash, Drive, Knockback, Team};
use crate::config::CombatConfig;
use crate::enemy::{Enemy, EnemyBrain};
use crate::geometry::from_heading;
use crate::health::{Health, Mana, Regeneration};
use crate::input::FrameInput;
use crate::projectile::{arrow_bundle, Arrow};
use crate::rush::RushMode;
use crate::trail::Trail;
use crate::weapons::{assisted_angle, Loadout, WeaponAction};
use crate::world::TileWorld;
use bevy::prelude::*;

/// Marker for the player-controlled actor.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

pub fn player_bundle(cfg: &CombatConfig, spawn: Vec2) -> impl Bundle {
    (
        Player,
        Name::new("Player"),
        Team::Player,
        ActorBody::new(spawn, cfg.player.clone()),
        Knockback::default(),
        Dash::default(),
        Health::new(cfg.player.max_health),
        Mana::new(cfg.health.player_max_mana),
        Regeneration::new(&cfg.health),
        Loadout::new(cfg),
        Trail::new(cfg.dash.trail_length),
    )
}

#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn player_control_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<CombatConfig>,
    world: Res<TileWorld>,
    input: Res<FrameInput>,
    mut rush: ResMut<RushMode>,
    mut players: Query<
        (
            Entity,
            &mut ActorBody,
            &mut Knockback,
            &mut Dash,
            &mut Loadout,
            &mut Trail,
        ),
        With<Player>,
    >,
    enemies: Query<(&ActorBody, &EnemyBrain), (With<Enemy>, Without<Player>)>,
) {
    let dt = time.delta_secs();

    for (entity, mut body, mut knockback, mut dash, mut loadout, mut trail) in players.iter_mut() {
        if let Some(kind) = input.select_weapon {
            loadout.select(kind);
        }

        dash.update_facing(input.move_axis.x);
        if input.dash_pressed && dash.try_start(input.move_axis, &config.dash) {
            debug!("player dash {:?}", dash.direction);
            let cross_charging = enemies
                .iter()
                .any(|(_, brain)| brain.melee.is_charging());
            if cross_charging && rush.try_activate(&config.rush) {
                info!("rush mode for {:.1}s", config.rush.duration);
            }
        }

        let dash_vel = dash.tick(dt, &config.dash);
        let knockback_vel = knockback.tick(body.grounded, dt, &config.knockback);

        let mut drive = Drive {
            move_x: input.move_axis.x,
            jump: input.jump_pressed,
            jump_released: input.jump_released,
            ..default()
        };
        if let Some(v) = dash_vel {
            drive.override_x = Some(v.x);
            drive.override_y = Some(v.y);
            drive.jump = false;
        } else if let Some(vx) = knockback_vel {
            drive.override_x = Some(vx);
        }
        body.integrate(drive, &world);

        if dash_vel.is_some() {
            body.angle += config.dash.roll_speed * dash.facing;
            let center = body.center();
            trail.push(center);
        } else {
            trail.fade();
        }

        let origin = body.center();
        let weapon = loadout.active_mut();
        weapon.aim(origin, input.pointer);
        match weapon.update(dt, &input.trigger()) {
            Some(WeaponAction::Fire { angle, charge }) => {
                let angle = assisted_angle(
                    origin,
                    angle,
                    enemies.iter().map(|(enemy, _)| enemy.center()),
                    &config.bow,
                );
                let spawn = origin + from_heading(angle) * config.bow.spawn_offset;
                let arrow = Arrow::new(spawn, angle, charge, Team::Player, &config.arrow)
                    .with_shooter(entity);
                debug!("arrow loosed at {:.2} rad, charge {:.2}", angle, charge);
                commands.spawn(arrow_bundle(arrow, &config.arrow));
            }
            Some(WeaponAction::Swing { strength }) => {
                debug!("knife swing, strength {:.1}", strength);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_starts_full_with_empty_mana() {
        let cfg = CombatConfig::default();
        let mut world = World::new();
        let e = world.spawn(player_bundle(&cfg, Vec2::new(10.0, 20.0))).id();
        let health = world.get::<Health>(e).unwrap();
        assert_eq!(health.current, cfg.player.max_health);
        assert_eq!(world.get::<Mana>(e).unwrap().current, 0.0);
        assert_eq!(world.get::<ActorBody>(e).unwrap().pos, Vec2::new(10.0, 20.0));
        assert_eq!(*world.get::<Team>(e).unwrap(), Team::Player);
    }
}
