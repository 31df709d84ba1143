//! The boss enemy: body, attack machines and AI.
//!
//! - [`state`] holds the per-enemy attack and evasion state ([`EnemyBrain`]).
//! - [`ai`] is the single system that reads the player, decides, and drives
//!   the enemy's [`ActorBody`].

pub mod ai;
pub mod state;

pub use ai::enemy_ai_system;
pub use state::{
    Cooldown, EnemyBrain, EnemyStrike, Evasion, LightningPhase, MeleePhase, StrikeBurst,
    StrikeKind,
};

use crate::actor::{ActorBody, Knockback, Team};
use crate::config::CombatConfig;
use crate::health::Health;
use crate::rng::SimRng;
use bevy::prelude::*;

/// Marker for enemy actors.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

/// Components for one enemy spawned at `spawn` (top-left of its body).
pub fn enemy_bundle(cfg: &CombatConfig, spawn: Vec2, rng: &mut SimRng) -> impl Bundle {
    let ai = &cfg.enemy_ai;
    let brain = EnemyBrain::new(
        rng.sign(),
        rng.range(ai.jump_interval_min, ai.jump_interval_max),
    );
    (
        Enemy,
        Name::new("Enemy"),
        Team::Enemy,
        ActorBody::new(spawn, cfg.enemy_tuning()),
        Knockback::default(),
        Health::new(cfg.enemy.max_health),
        brain,
        StrikeBurst::new(ai),
    )
}
