//! Read-only snapshot of the values a HUD draws.
//!
//! Rebuilt at the end of every tick so renderers and tests never need to
//! query the simulation components themselves.

use crate::actor::Dash;
use crate::enemy::Enemy;
use crate::health::{Health, Mana};
use crate::player::Player;
use crate::rush::RushMode;
use crate::weapons::{Loadout, WeaponKind};
use bevy::prelude::*;

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub player_health: f32,
    pub player_max_health: f32,
    /// Health bar should flash (recent normal damage).
    pub player_health_flash: bool,
    pub mana: f32,
    pub max_mana: f32,
    /// Boss health in `[0, 1]`, `None` without an enemy.
    pub boss_health_ratio: Option<f32>,
    pub rush_active: bool,
    pub rush_remaining: f32,
    pub selected_weapon: WeaponKind,
    pub bow_drawn: bool,
    pub bow_charge: f32,
    pub weapon_cooldown: f32,
    pub dash_cooldown: f32,
}

pub fn hud_snapshot_system(
    mut hud: ResMut<HudSnapshot>,
    rush: Res<RushMode>,
    players: Query<(&Health, Option<&Mana>, Option<&Loadout>, Option<&Dash>), With<Player>>,
    enemies: Query<&Health, (With<Enemy>, Without<Player>)>,
) {
    let mut next = HudSnapshot {
        boss_health_ratio: enemies.iter().next().map(Health::ratio),
        rush_active: rush.is_active(),
        rush_remaining: rush.remaining,
        ..default()
    };

    if let Ok((health, mana, loadout, dash)) = players.single() {
        next.player_health = health.current;
        next.player_max_health = health.max;
        next.player_health_flash = health.health_flash > 0.0;
        if let Some(mana) = mana {
            next.mana = mana.current;
            next.max_mana = mana.max;
        }
        if let Some(loadout) = loadout {
            next.selected_weapon = loadout.selected;
            next.bow_drawn = loadout.bow.is_drawn;
            next.bow_charge = loadout.bow.charge;
            next.weapon_cooldown = loadout.active().cooldown();
        }
        if let Some(dash) = dash {
            next.dash_cooldown = dash.cooldown;
        }
    }

    if *hud != next {
        *hud = next;
    }
}
