//! Centralised combat and physics constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place.  [`crate::config::CombatConfig::default`] mirrors
//! every value, and `assets/combat.toml` can override any subset at startup.
//!
//! ## Units
//!
//! World space is y-down (screen convention), measured in pixels.  Velocities,
//! accelerations and per-tick decay factors are expressed **per simulation
//! tick** (60 Hz).  Every timer, cooldown and duration is in **seconds** and is
//! decremented by the real fixed-step delta.

// ── Simulation clock ──────────────────────────────────────────────────────────

/// Fixed simulation rate.  Per-tick constants below are tuned for this rate.
pub const TICK_HZ: f64 = 60.0;

/// Seed for [`crate::rng::SimRng`].  Same seed + same inputs → same match.
pub const RNG_SEED: u64 = 0x5EED_A220;

// ── World ─────────────────────────────────────────────────────────────────────

/// Edge length of one solid tile.
pub const TILE_SIZE: f32 = 40.0;

/// Distance below the bottom of the tile map at which void damage applies.
pub const VOID_MARGIN: f32 = 100.0;

/// Void damage amount.  Large enough to empty any health pool in one hit.
pub const VOID_DAMAGE: f32 = 10_000.0;

/// Projectiles further than this outside the tile map bounds are killed.
pub const PROJECTILE_CULL_MARGIN: f32 = 1000.0;

/// Horizontal speed used to push overlapping actors apart.
pub const ACTOR_SEPARATION_SPEED: f32 = 2.0;

// ── Player body ───────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f32 = 32.0;
pub const PLAYER_HEIGHT: f32 = 32.0;
pub const PLAYER_ACC: f32 = 0.5;
/// Friction coefficients are negative: `acc += vel * friction`.
pub const GROUND_FRICTION: f32 = -0.1;
pub const AIR_FRICTION: f32 = -0.05;
pub const PLAYER_MAX_SPEED: f32 = 5.0;
/// Upward (negative) velocity set by a jump.
pub const JUMP_STRENGTH: f32 = -12.0;
pub const GRAVITY: f32 = 0.7;
pub const TERMINAL_VELOCITY: f32 = 10.0;
pub const MAX_JUMPS: u8 = 2;
/// Horizontal speeds below this snap to zero.
pub const VELOCITY_DEADZONE: f32 = 0.1;
/// Airborne tilt target in degrees per unit of horizontal speed.
pub const PLAYER_TILT_PER_SPEED: f32 = 3.0;
pub const PLAYER_TILT_SMOOTHING: f32 = 0.1;
pub const PLAYER_MAX_HP: f32 = 100.0;

// ── Enemy body ────────────────────────────────────────────────────────────────

/// Enemy locomotion runs at 70% of the player's acceleration.
pub const ENEMY_ACC: f32 = PLAYER_ACC * 0.7;
/// Enemy top speed is 80% of the player's.
pub const ENEMY_MAX_SPEED: f32 = PLAYER_MAX_SPEED * 0.8;
pub const ENEMY_TILT_PER_SPEED: f32 = 2.0;
pub const ENEMY_TILT_SMOOTHING: f32 = 0.08;
/// The boss has a deep health pool.
pub const ENEMY_MAX_HP: f32 = 500.0;

// ── Knockback ─────────────────────────────────────────────────────────────────

pub const BASE_KNOCKBACK_FORCE: f32 = 4.0;
pub const KNOCKBACK_MIN_DURATION: f32 = 0.1;
pub const KNOCKBACK_MAX_DURATION: f32 = 0.5;
/// Knockback duration = force magnitude / this divisor (then clamped).
pub const KNOCKBACK_FORCE_PER_SECOND: f32 = 30.0;
/// Per-tick horizontal knockback decay on the ground (0.88 × 0.92).
pub const KNOCKBACK_GROUND_DECAY: f32 = 0.81;
/// Per-tick horizontal knockback decay in the air (0.88 × 0.98).
pub const KNOCKBACK_AIR_DECAY: f32 = 0.86;
/// Knockback ends once its horizontal speed drops below this.
pub const KNOCKBACK_EPSILON: f32 = 0.1;

// ── Dash ──────────────────────────────────────────────────────────────────────

pub const DASH_INITIAL_SPEED: f32 = 20.0;
/// Per-tick speed multiplier while dashing.
pub const DASH_DECELERATION: f32 = 0.85;
pub const DASH_DURATION: f32 = 0.15;
/// Measured from dash start.
pub const DASH_COOLDOWN: f32 = 0.8;
/// Visual roll in degrees per tick while dashing.
pub const DASH_ROLL_SPEED: f32 = 8.0;
pub const DASH_TRAIL_LENGTH: usize = 8;

// ── Bow ───────────────────────────────────────────────────────────────────────

/// Seconds of hold to reach full charge.
pub const BOW_CHARGE_TIME: f32 = 1.1;
/// Arrow spawn distance from the shooter's centre along the aim.
pub const BOW_OFFSET: f32 = 50.0;
/// Aim assist only engages when the target is within this cone (degrees).
pub const BOW_ASSIST_WINDOW_DEG: f32 = 30.0;
/// Fraction of the angular error corrected by aim assist.
pub const BOW_ASSIST_STRENGTH: f32 = 0.5;
/// Hard cap on the aim assist correction (degrees).
pub const BOW_ASSIST_MAX_DEG: f32 = 15.0;

// ── Arrow ─────────────────────────────────────────────────────────────────────

pub const ARROW_BASE_SPEED: f32 = 8.0;
pub const ARROW_MAX_SPEED: f32 = 24.0;
pub const ARROW_GRAVITY: f32 = 0.2;
pub const ARROW_HITBOX_SIZE: f32 = 16.0;
/// Number of platform contacts an arrow survives.
pub const ARROW_PIERCE_COUNT: u8 = 3;
/// Velocity multiplier applied on each pierce.
pub const ARROW_PIERCE_SLOWDOWN: f32 = 0.9;
/// Forward nudge applied on each pierce so the arrow does not stick.
pub const ARROW_PIERCE_NUDGE: f32 = 4.0;
pub const ARROW_KNOCKBACK_MULTIPLIER: f32 = 1.2;
/// Upward pop added to arrow knockback.
pub const ARROW_KNOCKBACK_LIFT: f32 = 1.5;
/// Knockback multiplier per pierce already consumed.
pub const ARROW_PIERCE_FALLOFF: f32 = 0.85;
pub const ARROW_BASE_DAMAGE: f32 = 10.0;
/// Extra damage at full charge.
pub const ARROW_CHARGE_DAMAGE_BONUS: f32 = 20.0;
pub const ARROW_MANA_ON_HIT: f32 = 10.0;
pub const TRAIL_LENGTH: usize = 12;

// ── Knife ─────────────────────────────────────────────────────────────────────

pub const KNIFE_OFFSET: f32 = 30.0;
pub const KNIFE_STAB_DURATION: f32 = 0.25;
/// Share of the swing spent extending; the remainder is withdrawal.
pub const KNIFE_STAB_FORWARD_RATIO: f32 = 0.3;
pub const KNIFE_STAB_EXTENSION: f32 = 30.0;
pub const KNIFE_HITBOX_SIZE: f32 = 20.0;
pub const KNIFE_ATTACK_COOLDOWN: f32 = 0.35;
/// Strength of a secondary-button swing.
pub const KNIFE_RIGHT_CLICK_MULTIPLIER: f32 = 2.0;
pub const KNIFE_DAMAGE: f32 = 12.0;
pub const KNIFE_HEAL_ON_HIT: f32 = 2.0;

// ── Enemy AI: melee cross ─────────────────────────────────────────────────────

pub const ENEMY_ATTACK_RANGE: f32 = 80.0;
pub const ENEMY_ATTACK_COOLDOWN: f32 = 1.5;
pub const ENEMY_CROSS_MAX_EXTENT: f32 = 120.0;
pub const ENEMY_CROSS_MIN_EXTENT: f32 = 25.0;
/// 1.5 full rotations per second.
pub const ENEMY_CROSS_SPIN_DEG_PER_SEC: f32 = 540.0;
pub const ENEMY_STAFF_DAMAGE: f32 = 20.0;
pub const ENEMY_ATTACK_KNOCKBACK_FORCE: f32 = 6.0;
pub const ENEMY_STRIKE_BURST_COUNT: usize = 15;
pub const ENEMY_STRIKE_BURST_DAMAGE: f32 = 5.0;

// ── Enemy AI: lightning ───────────────────────────────────────────────────────

pub const ENEMY_LIGHTNING_RANGE: f32 = 400.0;
pub const ENEMY_LIGHTNING_COOLDOWN: f32 = 3.0;
pub const ENEMY_LIGHTNING_WARNING: f32 = 1.0;
pub const ENEMY_LIGHTNING_STRIKE: f32 = 0.3;
/// Twice the player width.
pub const ENEMY_LIGHTNING_WIDTH: f32 = 64.0;
pub const ENEMY_LIGHTNING_DAMAGE: f32 = 15.0;

// ── Enemy AI: locomotion ──────────────────────────────────────────────────────

/// Beyond this distance the enemy walks toward the player.
pub const ENEMY_FOLLOW_DISTANCE: f32 = 30.0;
/// Direction magnitude used to creep toward the player while the cross spins.
pub const ENEMY_CHARGING_CREEP: f32 = 0.3;
pub const ENEMY_JUMP_INTERVAL_MIN: f32 = 1.0;
pub const ENEMY_JUMP_INTERVAL_MAX: f32 = 3.0;
pub const ENEMY_JUMP_CHANCE: f32 = 0.3;

// ── Enemy AI: evasion dash ────────────────────────────────────────────────────

pub const ENEMY_ARROW_DETECTION_RANGE: f32 = 200.0;
/// Alignment dot product needed to evade during normal play.
pub const ENEMY_EVADE_THRESHOLD: f32 = 0.4;
/// Alignment dot product needed to evade during player rush mode.
pub const ENEMY_EVADE_THRESHOLD_RUSH: f32 = 0.8;
pub const ENEMY_DODGE_CHANCE: f32 = 0.5;
/// 800 px/s expressed per tick.
pub const ENEMY_DASH_SPEED: f32 = 800.0 / 60.0;
pub const ENEMY_DASH_DURATION: f32 = 0.3;
pub const ENEMY_DASH_COOLDOWN: f32 = 2.0;
/// Horizontal velocity multiplier when an evasion dash ends.
pub const ENEMY_DASH_EXIT_DAMPING: f32 = 0.3;
pub const ENEMY_EVADE_JUMP_CHANCE: f32 = 0.6;
/// Evasive hops use a slightly lower jump.
pub const ENEMY_EVADE_JUMP_SCALE: f32 = 0.8;

// ── Enemy AI: predictive dodge ────────────────────────────────────────────────

pub const ENEMY_DODGE_DETECTION_RANGE: f32 = 300.0;
pub const ENEMY_DODGE_SPEED: f32 = 6.0;
pub const ENEMY_DODGE_DURATION: f32 = 0.4;
pub const ENEMY_DODGE_COOLDOWN: f32 = 1.5;

// ── Particles ─────────────────────────────────────────────────────────────────

pub const PARTICLE_COUNT: usize = 8;
pub const PARTICLE_SPEED_MIN: f32 = 2.0;
pub const PARTICLE_SPEED_MAX: f32 = 6.0;
pub const PARTICLE_LIFETIME: f32 = 1.0;
/// Lifetime is randomised by ± this amount.
pub const PARTICLE_LIFETIME_JITTER: f32 = 0.2;
pub const PARTICLE_GRAVITY: f32 = 0.2;
/// Per-tick velocity multiplier (air resistance).
pub const PARTICLE_DRAG: f32 = 0.98;
/// Half-extent of a particle's hit box.
pub const PARTICLE_SIZE: f32 = 3.0;

// ── Health ────────────────────────────────────────────────────────────────────

pub const HIT_FLASH_DURATION: f32 = 0.15;
pub const HEALTH_FLASH_DURATION: f32 = 0.2;
pub const REGEN_AMOUNT: f32 = 1.0;
pub const REGEN_INTERVAL: f32 = 0.5;
pub const PLAYER_MAX_MANA: f32 = 100.0;

// ── Rush mode ─────────────────────────────────────────────────────────────────

pub const RUSH_DAMAGE_MULTIPLIER: f32 = 2.0;
pub const RUSH_DURATION: f32 = 3.0;
/// Measured from activation.
pub const RUSH_COOLDOWN: f32 = 6.0;
