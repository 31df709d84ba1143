//! Gizmo rendering of the simulation state.
//!
//! Everything is drawn as wireframes straight from component state; the sim
//! has no `Transform`s.  Sim space is y-down, so every point is flipped with
//! [`to_screen`] on the way out.

use bevy::prelude::*;
use quiverfall::actor::{ActorBody, Dash};
use quiverfall::config::CombatConfig;
use quiverfall::enemy::{EnemyBrain, LightningPhase, MeleePhase};
use quiverfall::geometry::from_heading;
use quiverfall::health::Health;
use quiverfall::hud::HudSnapshot;
use quiverfall::particles::{Particle, ParticleKind};
use quiverfall::player::Player;
use quiverfall::projectile::Arrow;
use quiverfall::trail::Trail;
use quiverfall::weapons::{Loadout, WeaponKind};
use quiverfall::world::TileWorld;

fn to_screen(p: Vec2) -> Vec2 {
    Vec2::new(p.x, -p.y)
}

fn rect_outline(gizmos: &mut Gizmos, rect: Rect, color: Color) {
    gizmos.rect_2d(to_screen(rect.center()), rect.size(), color);
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Keep the camera centred on the player.
pub fn camera_follow_system(
    players: Query<&ActorBody, With<Player>>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let (Ok(body), Ok(mut camera)) = (players.single(), cameras.single_mut()) else {
        return;
    };
    let target = to_screen(body.center());
    camera.translation.x = target.x;
    camera.translation.y = target.y;
}

pub fn draw_world_system(mut gizmos: Gizmos, world: Res<TileWorld>) {
    let tile = Color::srgb(0.45, 0.4, 0.35);
    for rect in world.tiles() {
        rect_outline(&mut gizmos, *rect, tile);
    }
}

pub fn draw_actors_system(
    mut gizmos: Gizmos,
    config: Res<CombatConfig>,
    actors: Query<(
        &ActorBody,
        &Health,
        Option<&Dash>,
        Option<&Loadout>,
        Option<&EnemyBrain>,
    )>,
) {
    for (body, health, dash, loadout, brain) in actors.iter() {
        let base = if brain.is_some() {
            Color::srgb(0.8, 0.3, 0.9)
        } else {
            Color::srgb(0.3, 0.8, 1.0)
        };
        let color = if health.is_flashing() {
            Color::srgb(1.0, 0.2, 0.2)
        } else if dash.is_some_and(|d| d.active) {
            Color::srgba(0.3, 0.8, 1.0, 0.4)
        } else if brain.is_some_and(|b| b.is_dashing() || b.is_dodging()) {
            Color::srgba(0.8, 0.3, 0.9, 0.4)
        } else {
            base
        };
        let center = body.center();
        gizmos.rect_2d(
            Isometry2d::new(to_screen(center), Rot2::degrees(-body.angle)),
            body.size(),
            color,
        );

        // Health bar above the body.
        let top = center - Vec2::new(0.0, body.size().y * 0.5 + 8.0);
        let width = body.size().x;
        let left = top - Vec2::new(width * 0.5, 0.0);
        let bar = if health.health_flash > 0.0 {
            Color::WHITE
        } else {
            Color::srgb(0.2, 0.9, 0.3)
        };
        gizmos.line_2d(
            to_screen(left),
            to_screen(left + Vec2::new(width * health.ratio(), 0.0)),
            bar,
        );

        if let Some(loadout) = loadout {
            draw_weapon(&mut gizmos, &config, center, loadout);
        }
        if let Some(brain) = brain {
            draw_attacks(&mut gizmos, &config, body, brain);
        }
    }
}

fn draw_weapon(gizmos: &mut Gizmos, config: &CombatConfig, center: Vec2, loadout: &Loadout) {
    match loadout.selected {
        WeaponKind::Bow => {
            let dir = from_heading(loadout.bow.angle);
            let reach = config.bow.spawn_offset * (0.5 + 0.5 * loadout.bow.charge);
            let color = if loadout.bow.is_drawn {
                Color::srgb(1.0, 0.9, 0.3)
            } else {
                Color::srgb(0.6, 0.5, 0.3)
            };
            gizmos.line_2d(to_screen(center), to_screen(center + dir * reach), color);
        }
        WeaponKind::Knife => {
            let knife = &loadout.knife;
            gizmos.line_2d(
                to_screen(center),
                to_screen(knife.tip(center)),
                Color::srgb(0.85, 0.85, 0.9),
            );
            if knife.can_hit() {
                rect_outline(gizmos, knife.hitbox(center), Color::srgb(1.0, 0.4, 0.2));
            }
        }
    }
}

fn draw_attacks(gizmos: &mut Gizmos, config: &CombatConfig, body: &ActorBody, brain: &EnemyBrain) {
    if let MeleePhase::Charging {
        anchor,
        rotation,
        extent,
        ..
    } = brain.melee
    {
        let color = Color::srgb(1.0, 0.5, 0.1);
        for arm in 0..4 {
            let angle = (rotation + 90.0 * arm as f32).to_radians();
            gizmos.line_2d(
                to_screen(anchor),
                to_screen(anchor + from_heading(angle) * extent),
                color,
            );
        }
    }

    let column_top = body.center().y - 2000.0;
    let column_bottom = body.center().y + 2000.0;
    let half = config.enemy_ai.lightning_width * 0.5;
    let color = match brain.lightning {
        LightningPhase::Idle => None,
        LightningPhase::Warning { .. } => Some(Color::srgba(1.0, 1.0, 0.3, 0.3)),
        LightningPhase::Striking { .. } => Some(Color::srgb(1.0, 1.0, 0.8)),
    };
    if let (Some(x), Some(color)) = (brain.lightning.target_x(), color) {
        for edge in [x - half, x + half] {
            gizmos.line_2d(
                to_screen(Vec2::new(edge, column_top)),
                to_screen(Vec2::new(edge, column_bottom)),
                color,
            );
        }
    }
}

pub fn draw_projectiles_system(
    mut gizmos: Gizmos,
    config: Res<CombatConfig>,
    arrows: Query<(&Arrow, &Trail)>,
    trails: Query<&Trail, (With<Player>, Without<Arrow>)>,
    particles: Query<&Particle>,
) {
    for (arrow, trail) in arrows.iter() {
        for (a, b, alpha) in trail.segments() {
            gizmos.line_2d(to_screen(a), to_screen(b), Color::srgba(1.0, 1.0, 1.0, alpha * 0.6));
        }
        let tail = arrow.pos - from_heading(arrow.angle) * config.arrow.hitbox_size;
        gizmos.line_2d(to_screen(tail), to_screen(arrow.pos), Color::WHITE);
    }

    for trail in trails.iter() {
        for (a, b, alpha) in trail.segments() {
            gizmos.line_2d(to_screen(a), to_screen(b), Color::srgba(0.3, 0.8, 1.0, alpha * 0.5));
        }
    }

    for particle in particles.iter() {
        let color = match particle.kind {
            ParticleKind::Impact => Color::srgba(1.0, 0.9, 0.5, particle.life_ratio()),
            ParticleKind::Ricochet => Color::srgba(0.8, 0.8, 0.8, particle.life_ratio()),
            ParticleKind::Strike => Color::srgba(1.0, 0.4, 0.1, particle.life_ratio()),
        };
        gizmos.circle_2d(
            to_screen(particle.pos),
            config.particles.size * particle.life_ratio().max(0.3),
            color,
        );
    }
}

/// Mana and rush indicators pinned to the camera's top-left corner.
pub fn draw_hud_system(
    mut gizmos: Gizmos,
    hud: Res<HudSnapshot>,
    cameras: Query<&Transform, With<Camera2d>>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };
    let origin = camera.translation.truncate() + Vec2::new(-560.0, 300.0);
    let width = 200.0;

    let health = if hud.player_max_health > 0.0 {
        hud.player_health / hud.player_max_health
    } else {
        0.0
    };
    let mana = if hud.max_mana > 0.0 {
        hud.mana / hud.max_mana
    } else {
        0.0
    };
    let bars = [
        (health, Color::srgb(0.2, 0.9, 0.3)),
        (mana, Color::srgb(0.3, 0.5, 1.0)),
        (hud.boss_health_ratio.unwrap_or(0.0), Color::srgb(0.8, 0.3, 0.9)),
    ];
    for (row, (ratio, color)) in bars.into_iter().enumerate() {
        let y = origin.y - row as f32 * 12.0;
        gizmos.line_2d(
            Vec2::new(origin.x, y),
            Vec2::new(origin.x + width * ratio, y),
            color,
        );
    }
    if hud.rush_active {
        gizmos.circle_2d(origin + Vec2::new(width + 20.0, 0.0), 6.0, Color::srgb(1.0, 0.2, 0.2));
    }
}
