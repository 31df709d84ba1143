//! Quiverfall: a tile-platformer combat simulation.
//!
//! A player with a bow and a knife fights a boss that spins a melee cross,
//! calls down lightning, and dashes out of the way of incoming arrows.  The
//! whole simulation runs headless in `FixedUpdate`; the binary only adds a
//! window, input mapping and gizmo debug drawing.
//!
//! ## Tick order
//!
//! | Set | Systems |
//! |---|---|
//! | [`SimSet::Player`] | input → dash / knockback → body → weapons |
//! | [`SimSet::Enemy`] | AI decisions → attack machines → body |
//! | [`SimSet::Projectiles`] | arrow flight, pierce, culling |
//! | [`SimSet::Particles`] | particle motion and expiry |
//! | [`SimSet::Combat`] | hit resolution, separation, regeneration, timers |
//! | [`SimSet::Lifecycle`] | void damage, respawn, arrow cleanup, HUD |
//!
//! Input edges in [`input::FrameInput`] are cleared after the tick.

pub mod actor;
pub mod combat;
pub mod config;
pub mod constants;
pub mod enemy;
pub mod error;
pub mod geometry;
pub mod health;
pub mod hud;
pub mod input;
pub mod particles;
pub mod player;
pub mod projectile;
pub mod rng;
pub mod rush;
pub mod testing;
pub mod trail;
pub mod weapons;
pub mod world;

use bevy::prelude::*;
use config::CombatConfig;
use constants::{RNG_SEED, TICK_HZ};
use hud::HudSnapshot;
use input::FrameInput;
use rng::SimRng;
use rush::RushMode;
use world::TileWorld;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Player,
    Enemy,
    Projectiles,
    Particles,
    Combat,
    Lifecycle,
}

/// Registers every simulation resource and system.  Works with or without
/// `DefaultPlugins`.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        let seed = app
            .world()
            .get_resource::<CombatConfig>()
            .map_or(RNG_SEED, |c| c.seed);

        app.init_resource::<CombatConfig>()
            .insert_resource(SimRng::from_seed(seed))
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .init_resource::<TileWorld>()
            .init_resource::<FrameInput>()
            .init_resource::<RushMode>()
            .init_resource::<HudSnapshot>()
            .configure_sets(
                FixedUpdate,
                (
                    SimSet::Player,
                    SimSet::Enemy,
                    SimSet::Projectiles,
                    SimSet::Particles,
                    SimSet::Combat,
                    SimSet::Lifecycle,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    player::player_control_system.in_set(SimSet::Player),
                    enemy::enemy_ai_system.in_set(SimSet::Enemy),
                    projectile::arrow_flight_system.in_set(SimSet::Projectiles),
                    particles::particle_update_system.in_set(SimSet::Particles),
                    (
                        combat::arrow_hit_system,
                        combat::knife_hit_system,
                        combat::enemy_strike_system,
                        combat::particle_hit_system,
                        combat::separation_system,
                        combat::regeneration_system,
                        combat::flash_tick_system,
                        rush::rush_tick_system,
                    )
                        .chain()
                        .in_set(SimSet::Combat),
                    (
                        combat::void_damage_system,
                        combat::respawn_system,
                        projectile::despawn_dead_arrows,
                        hud::hud_snapshot_system,
                    )
                        .chain()
                        .in_set(SimSet::Lifecycle),
                    input::clear_input_edges.after(SimSet::Lifecycle),
                ),
            );
    }
}
