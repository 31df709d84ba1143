use bevy::prelude::*;
use bevy::window::WindowResolution;
use quiverfall::config::{load_combat_config, CombatConfig};
use quiverfall::enemy::enemy_bundle;
use quiverfall::player::player_bundle;
use quiverfall::rng::SimRng;
use quiverfall::world::TileWorld;
use quiverfall::CombatPlugin;

mod controls;
mod debug_draw;

/// Build the default arena and place both fighters on it.
fn setup_arena(mut commands: Commands, config: Res<CombatConfig>, mut rng: ResMut<SimRng>) {
    let tile = config.world.tile_size;
    let world = match TileWorld::default_level(tile) {
        Ok(world) => world,
        Err(e) => {
            error!("default level failed to build: {e}");
            return;
        }
    };
    info!(
        "arena ready: {} tiles, bounds {:?}",
        world.tiles().len(),
        world.bounds()
    );
    commands.insert_resource(world);

    let player_spawn = Vec2::new(100.0, 10.0 * tile - config.player.height);
    commands.spawn(player_bundle(&config, player_spawn));

    let enemy_spawn = Vec2::new(400.0, 8.0 * tile - config.player.height);
    commands.spawn(enemy_bundle(&config, enemy_spawn, &mut rng));
    info!("player at {player_spawn:?}, enemy at {enemy_spawn:?}");
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Quiverfall".into(),
                resolution: WindowResolution::new(1200, 680),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.06, 0.06, 0.1)))
        // Defaults first; load_combat_config overwrites them from
        // assets/combat.toml (if present) before anything is spawned.
        .insert_resource(CombatConfig::default())
        .add_plugins(CombatPlugin)
        .add_systems(
            Startup,
            (
                load_combat_config,
                debug_draw::setup_camera,
                setup_arena.after(load_combat_config),
            ),
        )
        .add_systems(
            Update,
            (
                controls::keyboard_mouse_input_system,
                debug_draw::camera_follow_system,
                debug_draw::draw_world_system,
                debug_draw::draw_actors_system,
                debug_draw::draw_projectiles_system,
                debug_draw::draw_hud_system.after(debug_draw::camera_follow_system),
            ),
        )
        .run();
}
