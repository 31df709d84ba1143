//! Headless harness for driving the simulation tick by tick.
//!
//! The app built by [`headless_app`] has no window, renderer or input
//! plugins.  [`step`] advances the clock by exactly one fixed tick and runs
//! `FixedUpdate` once, so scenarios are fully deterministic for a given seed.

use crate::config::CombatConfig;
use crate::constants::TICK_HZ;
use crate::enemy::enemy_bundle;
use crate::error::ConfigResult;
use crate::player::player_bundle;
use crate::rng::SimRng;
use crate::world::TileWorld;
use crate::CombatPlugin;
use bevy::prelude::*;
use std::time::Duration;

/// Walled box with a one-tile floor whose top edge is at [`FLOOR_TOP`].
pub const FLAT_ARENA: &[&str] = &[
    "X                            X",
    "X                            X",
    "X                            X",
    "X                            X",
    "X                            X",
    "X                            X",
    "X                            X",
    "X                            X",
    "X                            X",
    "X                            X",
    "XXXXXXXXXXXXXXXXXXXXXXXXXXXXXX",
];

/// Top edge of the [`FLAT_ARENA`] floor at the default tile size.
pub const FLOOR_TOP: f32 = 400.0;

pub fn flat_arena(tile_size: f32) -> ConfigResult<TileWorld> {
    TileWorld::from_rows(FLAT_ARENA, tile_size)
}

/// Simulation app with the default config and the given level.
pub fn headless_app(world: TileWorld) -> App {
    let mut app = App::new();
    app.insert_resource(Time::<()>::default())
        .add_plugins(CombatPlugin)
        .insert_resource(world);
    app
}

/// Advance one fixed tick.
pub fn step(app: &mut App) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f64(1.0 / TICK_HZ));
    app.world_mut().run_schedule(FixedUpdate);
}

pub fn step_n(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        step(app);
    }
}

/// Spawn a player and an enemy standing on the floor at the given left
/// edges.  Returns `(player, enemy)`.
pub fn spawn_duel(app: &mut App, player_x: f32, enemy_x: f32) -> (Entity, Entity) {
    let player = spawn_player(app, player_x);
    let world = app.world_mut();
    let config = world.resource::<CombatConfig>().clone();
    let spawn = Vec2::new(enemy_x, FLOOR_TOP - config.player.height);
    let bundle = {
        let mut rng = world.resource_mut::<SimRng>();
        enemy_bundle(&config, spawn, &mut rng)
    };
    let enemy = world.spawn(bundle).id();
    (player, enemy)
}

/// Spawn only a player standing on the floor at `x`.
pub fn spawn_player(app: &mut App, x: f32) -> Entity {
    let world = app.world_mut();
    let config = world.resource::<CombatConfig>().clone();
    let spawn = Vec2::new(x, FLOOR_TOP - config.player.height);
    world.spawn(player_bundle(&config, spawn)).id()
}
