//! Runtime combat configuration loaded from `assets/combat.toml`.
//!
//! [`CombatConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_combat_config`] reads
//! `assets/combat.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the constants you care about:
//!
//! ```toml
//! seed = 7
//!
//! [enemy_ai]
//! melee_range = 50.0
//!
//! [arrow]
//! pierce_cap = 5
//! ```
//!
//! The configuration is immutable once the simulation starts: systems read it
//! through `Res<CombatConfig>` and constructors take the relevant section by
//! reference.  Keep `src/constants.rs` in sync: it remains the authoritative
//! default source.

use crate::constants::*;
use crate::error::{require_decay, require_positive, require_unit, ConfigResult};
use crate::rng::SimRng;
use bevy::prelude::*;
use serde::Deserialize;

/// Path of the optional override file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/combat.toml";

/// Every tunable of the combat core, grouped by concern.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Seed for AI rolls and particle bursts.
    pub seed: u64,
    pub world: WorldConfig,
    pub player: ActorTuning,
    pub enemy: EnemyBodyConfig,
    pub knockback: KnockbackConfig,
    pub dash: DashConfig,
    pub bow: BowConfig,
    pub arrow: ArrowConfig,
    pub knife: KnifeConfig,
    pub enemy_ai: EnemyAiConfig,
    pub particles: ParticleConfig,
    pub health: HealthConfig,
    pub rush: RushConfig,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            seed: RNG_SEED,
            world: WorldConfig::default(),
            player: ActorTuning::default(),
            enemy: EnemyBodyConfig::default(),
            knockback: KnockbackConfig::default(),
            dash: DashConfig::default(),
            bow: BowConfig::default(),
            arrow: ArrowConfig::default(),
            knife: KnifeConfig::default(),
            enemy_ai: EnemyAiConfig::default(),
            particles: ParticleConfig::default(),
            health: HealthConfig::default(),
            rush: RushConfig::default(),
        }
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub tile_size: f32,
    pub void_margin: f32,
    pub void_damage: f32,
    pub projectile_cull_margin: f32,
    pub separation_speed: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            void_margin: VOID_MARGIN,
            void_damage: VOID_DAMAGE,
            projectile_cull_margin: PROJECTILE_CULL_MARGIN,
            separation_speed: ACTOR_SEPARATION_SPEED,
        }
    }
}

// ── Actor bodies ──────────────────────────────────────────────────────────────

/// Physical parameters of one actor kind.
///
/// Player and enemy run the same integration code
/// ([`crate::actor::body::ActorBody::integrate`]); only these numbers differ.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActorTuning {
    pub width: f32,
    pub height: f32,
    /// Horizontal acceleration at full input.
    pub acceleration: f32,
    pub ground_friction: f32,
    pub air_friction: f32,
    pub max_speed: f32,
    /// Negative: y-down world.
    pub jump_velocity: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub max_jumps: u8,
    pub tilt_per_speed: f32,
    pub tilt_smoothing: f32,
    pub max_health: f32,
}

impl Default for ActorTuning {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            acceleration: PLAYER_ACC,
            ground_friction: GROUND_FRICTION,
            air_friction: AIR_FRICTION,
            max_speed: PLAYER_MAX_SPEED,
            jump_velocity: JUMP_STRENGTH,
            gravity: GRAVITY,
            terminal_velocity: TERMINAL_VELOCITY,
            max_jumps: MAX_JUMPS,
            tilt_per_speed: PLAYER_TILT_PER_SPEED,
            tilt_smoothing: PLAYER_TILT_SMOOTHING,
            max_health: PLAYER_MAX_HP,
        }
    }
}

/// Enemy overrides on top of the player's body tuning.
///
/// The boss shares gravity, friction and jump strength with the player; only
/// its pace, tilt and health pool differ.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyBodyConfig {
    pub acceleration: f32,
    pub max_speed: f32,
    pub tilt_per_speed: f32,
    pub tilt_smoothing: f32,
    pub max_health: f32,
}

impl Default for EnemyBodyConfig {
    fn default() -> Self {
        Self {
            acceleration: ENEMY_ACC,
            max_speed: ENEMY_MAX_SPEED,
            tilt_per_speed: ENEMY_TILT_PER_SPEED,
            tilt_smoothing: ENEMY_TILT_SMOOTHING,
            max_health: ENEMY_MAX_HP,
        }
    }
}

// ── Knockback / dash ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct KnockbackConfig {
    pub base_force: f32,
    pub min_duration: f32,
    pub max_duration: f32,
    pub force_per_second: f32,
    pub ground_decay: f32,
    pub air_decay: f32,
    pub epsilon: f32,
}

impl Default for KnockbackConfig {
    fn default() -> Self {
        Self {
            base_force: BASE_KNOCKBACK_FORCE,
            min_duration: KNOCKBACK_MIN_DURATION,
            max_duration: KNOCKBACK_MAX_DURATION,
            force_per_second: KNOCKBACK_FORCE_PER_SECOND,
            ground_decay: KNOCKBACK_GROUND_DECAY,
            air_decay: KNOCKBACK_AIR_DECAY,
            epsilon: KNOCKBACK_EPSILON,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub initial_speed: f32,
    pub deceleration: f32,
    pub duration: f32,
    pub cooldown: f32,
    pub roll_speed: f32,
    pub trail_length: usize,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            initial_speed: DASH_INITIAL_SPEED,
            deceleration: DASH_DECELERATION,
            duration: DASH_DURATION,
            cooldown: DASH_COOLDOWN,
            roll_speed: DASH_ROLL_SPEED,
            trail_length: DASH_TRAIL_LENGTH,
        }
    }
}

// ── Weapons ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BowConfig {
    pub charge_time: f32,
    pub spawn_offset: f32,
    pub assist_window_deg: f32,
    pub assist_strength: f32,
    pub assist_max_deg: f32,
}

impl Default for BowConfig {
    fn default() -> Self {
        Self {
            charge_time: BOW_CHARGE_TIME,
            spawn_offset: BOW_OFFSET,
            assist_window_deg: BOW_ASSIST_WINDOW_DEG,
            assist_strength: BOW_ASSIST_STRENGTH,
            assist_max_deg: BOW_ASSIST_MAX_DEG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArrowConfig {
    pub base_speed: f32,
    pub max_speed: f32,
    pub gravity: f32,
    pub hitbox_size: f32,
    pub pierce_cap: u8,
    pub pierce_slowdown: f32,
    pub pierce_nudge: f32,
    pub knockback_multiplier: f32,
    pub knockback_lift: f32,
    pub pierce_falloff: f32,
    pub base_damage: f32,
    pub charge_damage_bonus: f32,
    pub mana_on_hit: f32,
    pub trail_length: usize,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self {
            base_speed: ARROW_BASE_SPEED,
            max_speed: ARROW_MAX_SPEED,
            gravity: ARROW_GRAVITY,
            hitbox_size: ARROW_HITBOX_SIZE,
            pierce_cap: ARROW_PIERCE_COUNT,
            pierce_slowdown: ARROW_PIERCE_SLOWDOWN,
            pierce_nudge: ARROW_PIERCE_NUDGE,
            knockback_multiplier: ARROW_KNOCKBACK_MULTIPLIER,
            knockback_lift: ARROW_KNOCKBACK_LIFT,
            pierce_falloff: ARROW_PIERCE_FALLOFF,
            base_damage: ARROW_BASE_DAMAGE,
            charge_damage_bonus: ARROW_CHARGE_DAMAGE_BONUS,
            mana_on_hit: ARROW_MANA_ON_HIT,
            trail_length: TRAIL_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct KnifeConfig {
    pub offset: f32,
    pub stab_duration: f32,
    pub forward_ratio: f32,
    pub extension: f32,
    pub hitbox_size: f32,
    pub cooldown: f32,
    pub secondary_multiplier: f32,
    pub damage: f32,
    pub heal_on_hit: f32,
}

impl Default for KnifeConfig {
    fn default() -> Self {
        Self {
            offset: KNIFE_OFFSET,
            stab_duration: KNIFE_STAB_DURATION,
            forward_ratio: KNIFE_STAB_FORWARD_RATIO,
            extension: KNIFE_STAB_EXTENSION,
            hitbox_size: KNIFE_HITBOX_SIZE,
            cooldown: KNIFE_ATTACK_COOLDOWN,
            secondary_multiplier: KNIFE_RIGHT_CLICK_MULTIPLIER,
            damage: KNIFE_DAMAGE,
            heal_on_hit: KNIFE_HEAL_ON_HIT,
        }
    }
}

// ── Enemy AI ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyAiConfig {
    // melee cross
    pub melee_range: f32,
    pub melee_cooldown: f32,
    pub cross_max_extent: f32,
    pub cross_min_extent: f32,
    pub cross_spin_deg_per_sec: f32,
    pub melee_damage: f32,
    pub melee_knockback: f32,
    pub strike_burst_count: usize,
    pub strike_burst_damage: f32,
    // lightning
    pub lightning_range: f32,
    pub lightning_cooldown: f32,
    pub lightning_warning: f32,
    pub lightning_strike: f32,
    pub lightning_width: f32,
    pub lightning_damage: f32,
    // locomotion
    pub follow_distance: f32,
    pub charging_creep: f32,
    pub jump_interval_min: f32,
    pub jump_interval_max: f32,
    pub jump_chance: f32,
    // evasion dash
    pub evade_detection_range: f32,
    pub evade_threshold: f32,
    pub evade_threshold_rush: f32,
    pub dodge_chance: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    pub dash_exit_damping: f32,
    pub evade_jump_chance: f32,
    pub evade_jump_scale: f32,
    // predictive dodge
    pub dodge_detection_range: f32,
    pub dodge_speed: f32,
    pub dodge_duration: f32,
    pub dodge_cooldown: f32,
}

impl Default for EnemyAiConfig {
    fn default() -> Self {
        Self {
            melee_range: ENEMY_ATTACK_RANGE,
            melee_cooldown: ENEMY_ATTACK_COOLDOWN,
            cross_max_extent: ENEMY_CROSS_MAX_EXTENT,
            cross_min_extent: ENEMY_CROSS_MIN_EXTENT,
            cross_spin_deg_per_sec: ENEMY_CROSS_SPIN_DEG_PER_SEC,
            melee_damage: ENEMY_STAFF_DAMAGE,
            melee_knockback: ENEMY_ATTACK_KNOCKBACK_FORCE,
            strike_burst_count: ENEMY_STRIKE_BURST_COUNT,
            strike_burst_damage: ENEMY_STRIKE_BURST_DAMAGE,
            lightning_range: ENEMY_LIGHTNING_RANGE,
            lightning_cooldown: ENEMY_LIGHTNING_COOLDOWN,
            lightning_warning: ENEMY_LIGHTNING_WARNING,
            lightning_strike: ENEMY_LIGHTNING_STRIKE,
            lightning_width: ENEMY_LIGHTNING_WIDTH,
            lightning_damage: ENEMY_LIGHTNING_DAMAGE,
            follow_distance: ENEMY_FOLLOW_DISTANCE,
            charging_creep: ENEMY_CHARGING_CREEP,
            jump_interval_min: ENEMY_JUMP_INTERVAL_MIN,
            jump_interval_max: ENEMY_JUMP_INTERVAL_MAX,
            jump_chance: ENEMY_JUMP_CHANCE,
            evade_detection_range: ENEMY_ARROW_DETECTION_RANGE,
            evade_threshold: ENEMY_EVADE_THRESHOLD,
            evade_threshold_rush: ENEMY_EVADE_THRESHOLD_RUSH,
            dodge_chance: ENEMY_DODGE_CHANCE,
            dash_speed: ENEMY_DASH_SPEED,
            dash_duration: ENEMY_DASH_DURATION,
            dash_cooldown: ENEMY_DASH_COOLDOWN,
            dash_exit_damping: ENEMY_DASH_EXIT_DAMPING,
            evade_jump_chance: ENEMY_EVADE_JUMP_CHANCE,
            evade_jump_scale: ENEMY_EVADE_JUMP_SCALE,
            dodge_detection_range: ENEMY_DODGE_DETECTION_RANGE,
            dodge_speed: ENEMY_DODGE_SPEED,
            dodge_duration: ENEMY_DODGE_DURATION,
            dodge_cooldown: ENEMY_DODGE_COOLDOWN,
        }
    }
}

// ── Particles / health / rush ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub speed_min: f32,
    pub speed_max: f32,
    pub lifetime: f32,
    pub lifetime_jitter: f32,
    pub gravity: f32,
    pub drag: f32,
    pub size: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            speed_min: PARTICLE_SPEED_MIN,
            speed_max: PARTICLE_SPEED_MAX,
            lifetime: PARTICLE_LIFETIME,
            lifetime_jitter: PARTICLE_LIFETIME_JITTER,
            gravity: PARTICLE_GRAVITY,
            drag: PARTICLE_DRAG,
            size: PARTICLE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub hit_flash_duration: f32,
    pub health_flash_duration: f32,
    pub regen_amount: f32,
    pub regen_interval: f32,
    pub player_max_mana: f32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            hit_flash_duration: HIT_FLASH_DURATION,
            health_flash_duration: HEALTH_FLASH_DURATION,
            regen_amount: REGEN_AMOUNT,
            regen_interval: REGEN_INTERVAL,
            player_max_mana: PLAYER_MAX_MANA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RushConfig {
    pub damage_multiplier: f32,
    pub duration: f32,
    pub cooldown: f32,
}

impl Default for RushConfig {
    fn default() -> Self {
        Self {
            damage_multiplier: RUSH_DAMAGE_MULTIPLIER,
            duration: RUSH_DURATION,
            cooldown: RUSH_COOLDOWN,
        }
    }
}

// ── Construction & validation ─────────────────────────────────────────────────

impl CombatConfig {
    /// Parse a TOML document and validate the result.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: CombatConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Body tuning for the boss: player physics with enemy pace and health.
    pub fn enemy_tuning(&self) -> ActorTuning {
        ActorTuning {
            acceleration: self.enemy.acceleration,
            max_speed: self.enemy.max_speed,
            tilt_per_speed: self.enemy.tilt_per_speed,
            tilt_smoothing: self.enemy.tilt_smoothing,
            max_health: self.enemy.max_health,
            ..self.player.clone()
        }
    }

    /// Reject values that would make the simulation degenerate (division by
    /// zero, runaway decay, impossible probabilities).
    pub fn validate(&self) -> ConfigResult<()> {
        require_positive("world.tile_size", self.world.tile_size)?;
        require_positive("world.void_damage", self.world.void_damage)?;

        require_positive("player.width", self.player.width)?;
        require_positive("player.height", self.player.height)?;
        require_positive("player.max_speed", self.player.max_speed)?;
        require_positive("player.terminal_velocity", self.player.terminal_velocity)?;
        require_positive("player.max_health", self.player.max_health)?;
        require_positive("enemy.max_speed", self.enemy.max_speed)?;
        require_positive("enemy.max_health", self.enemy.max_health)?;

        require_positive("knockback.force_per_second", self.knockback.force_per_second)?;
        require_decay("knockback.ground_decay", self.knockback.ground_decay)?;
        require_decay("knockback.air_decay", self.knockback.air_decay)?;
        require_decay("dash.deceleration", self.dash.deceleration)?;
        require_positive("dash.duration", self.dash.duration)?;

        require_positive("bow.charge_time", self.bow.charge_time)?;
        require_unit("bow.assist_strength", self.bow.assist_strength)?;
        require_positive("arrow.base_speed", self.arrow.base_speed)?;
        if self.arrow.max_speed < self.arrow.base_speed {
            return Err(crate::error::ConfigError::OutOfRange {
                name: "arrow.max_speed",
                value: self.arrow.max_speed,
                range: "[arrow.base_speed, ∞)",
            });
        }

        require_positive("knife.stab_duration", self.knife.stab_duration)?;
        require_decay("knife.forward_ratio", self.knife.forward_ratio)?;

        require_positive("enemy_ai.cross_spin_deg_per_sec", self.enemy_ai.cross_spin_deg_per_sec)?;
        if self.enemy_ai.cross_min_extent > self.enemy_ai.cross_max_extent {
            return Err(crate::error::ConfigError::OutOfRange {
                name: "enemy_ai.cross_min_extent",
                value: self.enemy_ai.cross_min_extent,
                range: "[0, enemy_ai.cross_max_extent]",
            });
        }
        require_unit("enemy_ai.dodge_chance", self.enemy_ai.dodge_chance)?;
        require_unit("enemy_ai.jump_chance", self.enemy_ai.jump_chance)?;
        require_unit("enemy_ai.evade_jump_chance", self.enemy_ai.evade_jump_chance)?;

        require_decay("particles.drag", self.particles.drag)?;
        require_positive("health.regen_interval", self.health.regen_interval)?;
        require_positive("rush.duration", self.rush.duration)?;
        Ok(())
    }
}

/// Startup system: attempt to load [`CONFIG_PATH`] and overwrite the
/// [`CombatConfig`] resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse and validation errors
/// are logged but do not abort the game.  A missing file is silently ignored.
/// The RNG is re-seeded from the final config so a `seed` override applies.
pub fn load_combat_config(mut config: ResMut<CombatConfig>, mut rng: ResMut<SimRng>) {
    match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => match CombatConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded combat config from {CONFIG_PATH}");
            }
            Err(e) => {
                warn!("Ignoring {CONFIG_PATH}: {e}; using defaults");
            }
        },
        Err(_) => {
            info!("No {CONFIG_PATH} found; using compiled defaults");
        }
    }
    *rng = SimRng::from_seed(config.seed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(CombatConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let cfg = CombatConfig::from_toml_str(
            r#"
            seed = 7

            [enemy_ai]
            melee_range = 50.0

            [arrow]
            pierce_cap = 5
            "#,
        )
        .unwrap();

        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.enemy_ai.melee_range, 50.0);
        assert_eq!(cfg.arrow.pierce_cap, 5);
        // untouched keys keep defaults
        assert_eq!(cfg.enemy_ai.melee_cooldown, ENEMY_ATTACK_COOLDOWN);
        assert_eq!(cfg.arrow.base_speed, ARROW_BASE_SPEED);
        assert_eq!(cfg.player.gravity, GRAVITY);
    }

    #[test]
    fn invalid_probability_is_rejected() {
        let err = CombatConfig::from_toml_str("[enemy_ai]\ndodge_chance = 2.0\n").unwrap_err();
        assert!(err.to_string().contains("enemy_ai.dodge_chance"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = CombatConfig::from_toml_str("[arrow\nbase_speed = ").unwrap_err();
        assert!(matches!(err, crate::error::ConfigError::Parse(_)));
    }

    #[test]
    fn enemy_tuning_inherits_player_physics() {
        let cfg = CombatConfig::default();
        let enemy = cfg.enemy_tuning();
        assert_eq!(enemy.gravity, cfg.player.gravity);
        assert_eq!(enemy.jump_velocity, cfg.player.jump_velocity);
        assert!(enemy.max_speed < cfg.player.max_speed);
        assert_eq!(enemy.max_health, ENEMY_MAX_HP);
    }
}
