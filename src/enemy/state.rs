//! Enemy attack and evasion state.
//!
//! Two independent attack machines run side by side:
//!
//! | Machine | States | Entry | One-shot effect |
//! |---|---|---|---|
//! | melee cross | `Idle → Charging → Idle` | distance ≤ melee range, cooldown ready | damage when the cross reaches its minimum extent |
//! | lightning | `Idle → Warning → Striking → Idle` | distance ≤ lightning range, cooldown ready | damage once while striking |
//!
//! Transitions depend only on elapsed time and distance.  Only a respawn
//! ([`EnemyBrain::reset`]) interrupts them.  Damage is not applied here:
//! landed attacks are queued as [`EnemyStrike`]s and drained by the combat
//! stage, which owns the player's health.

use crate::config::EnemyAiConfig;
use crate::geometry::sign_or_zero;
use bevy::prelude::*;

// ── Cooldowns ─────────────────────────────────────────────────────────────────

/// Countdown gate.  Ready once it reaches zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cooldown(f32);

impl Cooldown {
    pub fn ready(&self) -> bool {
        self.0 <= 0.0
    }

    pub fn start(&mut self, secs: f32) {
        self.0 = secs;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.0 > 0.0 {
            self.0 -= dt;
        }
    }
}

// ── Attack phases ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum MeleePhase {
    #[default]
    Idle,
    Charging {
        /// Player centre when the attack was triggered.
        anchor: Vec2,
        /// Degrees turned so far.
        rotation: f32,
        /// Current arm length.
        extent: f32,
        /// The one damage check has happened.
        struck: bool,
    },
}

impl MeleePhase {
    pub fn is_charging(&self) -> bool {
        matches!(self, MeleePhase::Charging { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum LightningPhase {
    #[default]
    Idle,
    Warning {
        target_x: f32,
        timer: f32,
    },
    Striking {
        target_x: f32,
        timer: f32,
        struck: bool,
    },
}

impl LightningPhase {
    pub fn target_x(&self) -> Option<f32> {
        match *self {
            LightningPhase::Idle => None,
            LightningPhase::Warning { target_x, .. } | LightningPhase::Striking { target_x, .. } => {
                Some(target_x)
            }
        }
    }
}

/// A timed horizontal velocity override (evasion dash or predictive dodge).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evasion {
    /// `-1` or `1`.
    pub direction: f32,
    pub remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeKind {
    Cross,
    Lightning,
}

/// An attack that connected this tick, waiting for combat resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStrike {
    pub kind: StrikeKind,
    /// Where the hit came from (knockback pushes away from here).
    pub origin: Vec2,
    pub damage: f32,
    pub knockback: f32,
}

/// Optional capability: emit damaging particles when the cross completes.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct StrikeBurst {
    pub count: usize,
    pub damage: f32,
}

impl StrikeBurst {
    pub fn new(cfg: &EnemyAiConfig) -> Self {
        Self {
            count: cfg.strike_burst_count,
            damage: cfg.strike_burst_damage,
        }
    }
}

// ── Brain ─────────────────────────────────────────────────────────────────────

#[derive(Component, Debug, Clone, PartialEq)]
pub struct EnemyBrain {
    pub melee: MeleePhase,
    pub lightning: LightningPhase,
    pub melee_cooldown: Cooldown,
    pub lightning_cooldown: Cooldown,
    pub dash_cooldown: Cooldown,
    pub dodge_cooldown: Cooldown,
    pub dash: Option<Evasion>,
    pub dodge: Option<Evasion>,
    /// Locomotion intent in `[-1, 1]`.
    pub move_direction: f32,
    pub jump_timer: f32,
    pub jump_interval: f32,
    pub pending: Vec<EnemyStrike>,
}

impl EnemyBrain {
    pub fn new(move_direction: f32, jump_interval: f32) -> Self {
        Self {
            melee: MeleePhase::Idle,
            lightning: LightningPhase::Idle,
            melee_cooldown: Cooldown::default(),
            lightning_cooldown: Cooldown::default(),
            dash_cooldown: Cooldown::default(),
            dodge_cooldown: Cooldown::default(),
            dash: None,
            dodge: None,
            move_direction,
            jump_timer: 0.0,
            jump_interval,
            pending: Vec::new(),
        }
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_some()
    }

    pub fn is_dodging(&self) -> bool {
        self.dodge.is_some()
    }

    /// Tick cooldowns and evasion timers.  Returns `true` if an evasion dash
    /// ended this tick.
    pub fn tick_timers(&mut self, dt: f32) -> bool {
        self.melee_cooldown.tick(dt);
        self.lightning_cooldown.tick(dt);
        self.dash_cooldown.tick(dt);
        self.dodge_cooldown.tick(dt);

        if let Some(dodge) = &mut self.dodge {
            dodge.remaining -= dt;
            if dodge.remaining <= 0.0 {
                self.dodge = None;
            }
        }

        if let Some(dash) = &mut self.dash {
            dash.remaining -= dt;
            if dash.remaining <= 0.0 {
                self.dash = None;
                return true;
            }
        }
        false
    }

    /// Advance both attack machines with the player at `target`.  Landed
    /// attacks are pushed onto [`Self::pending`].  Returns the cross anchor
    /// when the melee attack completed this tick.
    pub fn advance_attacks(&mut self, dt: f32, target: Vec2, cfg: &EnemyAiConfig) -> Option<Vec2> {
        self.advance_lightning(dt, target, cfg);
        self.advance_melee(dt, target, cfg)
    }

    fn advance_lightning(&mut self, dt: f32, target: Vec2, cfg: &EnemyAiConfig) {
        self.lightning = match self.lightning {
            LightningPhase::Idle => LightningPhase::Idle,
            LightningPhase::Warning { target_x, timer } => {
                let timer = timer - dt;
                if timer <= 0.0 {
                    LightningPhase::Striking {
                        target_x,
                        timer: cfg.lightning_strike,
                        struck: false,
                    }
                } else {
                    LightningPhase::Warning { target_x, timer }
                }
            }
            LightningPhase::Striking {
                target_x,
                timer,
                struck,
            } => {
                let timer = timer - dt;
                if timer <= 0.0 {
                    LightningPhase::Idle
                } else {
                    LightningPhase::Striking {
                        target_x,
                        timer,
                        struck,
                    }
                }
            }
        };

        if let LightningPhase::Striking {
            target_x, struck, ..
        } = &mut self.lightning
        {
            if !*struck && (target.x - *target_x).abs() <= cfg.lightning_width * 0.5 {
                *struck = true;
                self.pending.push(EnemyStrike {
                    kind: StrikeKind::Lightning,
                    origin: Vec2::new(*target_x, target.y),
                    damage: cfg.lightning_damage,
                    knockback: 0.0,
                });
            }
        }
    }

    fn advance_melee(&mut self, dt: f32, target: Vec2, cfg: &EnemyAiConfig) -> Option<Vec2> {
        let MeleePhase::Charging {
            anchor,
            rotation,
            extent,
            struck,
        } = &mut self.melee
        else {
            return None;
        };

        *rotation += cfg.cross_spin_deg_per_sec * dt;
        let done = *rotation >= 360.0;
        let shrink_per_degree = (cfg.cross_max_extent - cfg.cross_min_extent) / 360.0;
        *extent = if done {
            cfg.cross_min_extent
        } else {
            (cfg.cross_max_extent - *rotation * shrink_per_degree).max(cfg.cross_min_extent)
        };

        // The strike is checked in the same tick the cross bottoms out, even
        // when that is also the tick it completes.
        if !*struck && *extent <= cfg.cross_min_extent {
            *struck = true;
            if target.distance(*anchor) <= *extent {
                self.pending.push(EnemyStrike {
                    kind: StrikeKind::Cross,
                    origin: *anchor,
                    damage: cfg.melee_damage,
                    knockback: cfg.melee_knockback,
                });
            }
        }

        if done {
            let anchor = *anchor;
            self.melee = MeleePhase::Idle;
            Some(anchor)
        } else {
            None
        }
    }

    /// Enter `Charging` anchored at `anchor` if idle and off cooldown.
    pub fn start_melee(&mut self, anchor: Vec2, cfg: &EnemyAiConfig) -> bool {
        if self.melee.is_charging() || !self.melee_cooldown.ready() {
            return false;
        }
        self.melee = MeleePhase::Charging {
            anchor,
            rotation: 0.0,
            extent: cfg.cross_max_extent,
            struck: false,
        };
        self.melee_cooldown.start(cfg.melee_cooldown);
        true
    }

    /// Enter `Warning` over column `target_x` if idle and off cooldown.
    pub fn start_lightning(&mut self, target_x: f32, cfg: &EnemyAiConfig) -> bool {
        if self.lightning != LightningPhase::Idle || !self.lightning_cooldown.ready() {
            return false;
        }
        self.lightning = LightningPhase::Warning {
            target_x,
            timer: cfg.lightning_warning,
        };
        self.lightning_cooldown.start(cfg.lightning_cooldown);
        true
    }

    /// Dash sideways relative to an incoming arrow's velocity.  `left` picks
    /// which perpendicular; the horizontal sign of that perpendicular is the
    /// dash direction.
    pub fn start_evasion(&mut self, arrow_vel: Vec2, left: bool, cfg: &EnemyAiConfig) -> bool {
        if self.is_dashing() || !self.dash_cooldown.ready() {
            return false;
        }
        let perp = if left { arrow_vel.perp() } else { -arrow_vel.perp() };
        let direction = if perp.x > 0.0 { 1.0 } else { -1.0 };
        self.dash = Some(Evasion {
            direction,
            remaining: cfg.dash_duration,
        });
        self.dash_cooldown.start(cfg.dash_cooldown);
        true
    }

    /// Short lateral dodge perpendicular to the enemy→player vector.
    pub fn start_dodge(&mut self, to_player: Vec2, cfg: &EnemyAiConfig) -> bool {
        if !self.dodge_cooldown.ready() {
            return false;
        }
        let direction = if to_player.x.abs() > to_player.y.abs() {
            if to_player.y > 0.0 {
                1.0
            } else {
                -1.0
            }
        } else if to_player.x < 0.0 {
            1.0
        } else {
            -1.0
        };
        self.dodge = Some(Evasion {
            direction,
            remaining: cfg.dodge_duration,
        });
        self.dodge_cooldown.start(cfg.dodge_cooldown);
        true
    }

    /// Pick the locomotion intent toward a player `to_player` away.
    pub fn steer(&mut self, to_player: Vec2, cfg: &EnemyAiConfig) {
        let side = sign_or_zero(to_player.x);
        self.move_direction = if to_player.length() > cfg.follow_distance {
            side
        } else if self.melee.is_charging() {
            side * cfg.charging_creep
        } else {
            0.0
        };
    }

    /// Clear every transient state.  Idempotent.
    pub fn reset(&mut self) {
        let move_direction = self.move_direction;
        let jump_interval = self.jump_interval;
        *self = Self::new(move_direction, jump_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn brain() -> EnemyBrain {
        EnemyBrain::new(1.0, 2.0)
    }

    #[test]
    fn melee_completes_after_one_rotation() {
        let cfg = EnemyAiConfig::default();
        let mut b = brain();
        let anchor = Vec2::new(100.0, 100.0);
        assert!(b.start_melee(anchor, &cfg));
        assert!(b.melee.is_charging());

        let mut ticks = 0;
        let mut finished = None;
        while finished.is_none() {
            finished = b.advance_attacks(DT, anchor, &cfg);
            ticks += 1;
            assert!(ticks <= 45, "cross never finished");
        }
        assert!((39..=41).contains(&ticks), "{ticks}");
        assert_eq!(finished, Some(anchor));
        assert_eq!(b.melee, MeleePhase::Idle);
        // Player stood on the anchor: exactly one strike.
        assert_eq!(b.pending.len(), 1);
        assert_eq!(b.pending[0].kind, StrikeKind::Cross);
    }

    #[test]
    fn melee_misses_a_player_outside_min_extent() {
        let cfg = EnemyAiConfig::default();
        let mut b = brain();
        let anchor = Vec2::ZERO;
        b.start_melee(anchor, &cfg);
        let away = Vec2::new(cfg.cross_min_extent + 5.0, 0.0);
        for _ in 0..45 {
            b.advance_attacks(DT, away, &cfg);
        }
        assert!(b.pending.is_empty());
    }

    #[test]
    fn extent_shrinks_monotonically() {
        let cfg = EnemyAiConfig::default();
        let mut b = brain();
        b.start_melee(Vec2::ZERO, &cfg);
        let mut last = cfg.cross_max_extent;
        while let MeleePhase::Charging { .. } = b.melee {
            b.advance_attacks(DT, Vec2::splat(1000.0), &cfg);
            if let MeleePhase::Charging { extent, .. } = b.melee {
                assert!(extent <= last);
                assert!(extent >= cfg.cross_min_extent);
                last = extent;
            }
        }
    }

    #[test]
    fn melee_respects_cooldown() {
        let cfg = EnemyAiConfig::default();
        let mut b = brain();
        b.start_melee(Vec2::ZERO, &cfg);
        for _ in 0..45 {
            b.advance_attacks(DT, Vec2::ZERO, &cfg);
            b.tick_timers(DT);
        }
        assert_eq!(b.melee, MeleePhase::Idle);
        assert!(!b.start_melee(Vec2::ZERO, &cfg), "cooldown still running");
        for _ in 0..60 {
            b.tick_timers(DT);
        }
        assert!(b.start_melee(Vec2::ZERO, &cfg));
    }

    #[test]
    fn lightning_warns_then_strikes_once() {
        let cfg = EnemyAiConfig::default();
        let mut b = brain();
        assert!(b.start_lightning(50.0, &cfg));
        let player = Vec2::new(60.0, 0.0);
        let mut saw_striking = false;
        for _ in 0..120 {
            b.advance_attacks(DT, player, &cfg);
            saw_striking |= matches!(b.lightning, LightningPhase::Striking { .. });
        }
        assert!(saw_striking);
        assert_eq!(b.lightning, LightningPhase::Idle);
        let bolts = b
            .pending
            .iter()
            .filter(|s| s.kind == StrikeKind::Lightning)
            .count();
        assert_eq!(bolts, 1);
    }

    #[test]
    fn lightning_misses_outside_column() {
        let cfg = EnemyAiConfig::default();
        let mut b = brain();
        b.start_lightning(0.0, &cfg);
        for _ in 0..120 {
            b.advance_attacks(DT, Vec2::new(cfg.lightning_width, 0.0), &cfg);
        }
        assert!(b.pending.is_empty());
    }

    #[test]
    fn attacks_are_independent() {
        let cfg = EnemyAiConfig::default();
        let mut b = brain();
        assert!(b.start_melee(Vec2::ZERO, &cfg));
        assert!(b.start_lightning(0.0, &cfg));
        assert!(b.melee.is_charging());
        assert_ne!(b.lightning, LightningPhase::Idle);
    }

    #[test]
    fn evasion_dash_is_perpendicular_and_gated() {
        let cfg = EnemyAiConfig::default();
        let mut b = brain();
        // Arrow falling straight down: perpendiculars point left / right.
        assert!(b.start_evasion(Vec2::new(0.0, 10.0), true, &cfg));
        let first = b.dash.unwrap().direction;
        assert!(!b.start_evasion(Vec2::new(0.0, 10.0), false, &cfg));

        let mut other = brain();
        other.start_evasion(Vec2::new(0.0, 10.0), false, &cfg);
        assert_eq!(other.dash.unwrap().direction, -first);
    }

    #[test]
    fn dash_end_is_reported_once() {
        let cfg = EnemyAiConfig::default();
        let mut b = brain();
        b.start_evasion(Vec2::X, true, &cfg);
        let ends: usize = (0..60).map(|_| b.tick_timers(DT) as usize).sum();
        assert_eq!(ends, 1);
        assert!(!b.is_dashing());
    }

    #[test]
    fn dodge_is_lateral() {
        let cfg = EnemyAiConfig::default();
        let mut b = brain();
        // Player mostly to the right and slightly below → dodge toward +x.
        assert!(b.start_dodge(Vec2::new(100.0, 10.0), &cfg));
        assert_eq!(b.dodge.unwrap().direction, 1.0);
        assert!(!b.start_dodge(Vec2::new(100.0, 10.0), &cfg));
    }

    #[test]
    fn steering() {
        let cfg = EnemyAiConfig::default();
        let mut b = brain();
        b.steer(Vec2::new(-200.0, 0.0), &cfg);
        assert_eq!(b.move_direction, -1.0);
        b.steer(Vec2::new(10.0, 0.0), &cfg);
        assert_eq!(b.move_direction, 0.0);
        b.start_melee(Vec2::ZERO, &cfg);
        b.steer(Vec2::new(10.0, 0.0), &cfg);
        assert_eq!(b.move_direction, cfg.charging_creep);
    }

    #[test]
    fn reset_is_idempotent() {
        let cfg = EnemyAiConfig::default();
        let mut b = brain();
        b.start_melee(Vec2::ZERO, &cfg);
        b.start_lightning(0.0, &cfg);
        b.start_evasion(Vec2::X, true, &cfg);
        b.reset();
        let once = b.clone();
        b.reset();
        assert_eq!(b, once);
        assert_eq!(b.melee, MeleePhase::Idle);
        assert!(b.dash_cooldown.ready());
    }
}
