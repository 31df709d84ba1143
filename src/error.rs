//! Error types for configuration and level loading.
//!
//! The simulation itself never fails: degenerate physical states are handled by
//! policy (zero vectors normalise to zero, health clamps, exhausted resources
//! no-op).  Errors only exist at the edges where external data enters the core.

use thiserror::Error;

/// Errors raised while loading `assets/combat.toml` or a tile map.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML parsing failed.
    #[error("failed to parse combat config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A tunable is outside its safe operating range.
    #[error("'{name}' = {value} is outside safe range {range}")]
    OutOfRange {
        /// Dotted config key (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        range: &'static str,
    },

    /// The tile map has no solid tiles or ragged rows that cannot be parsed.
    #[error("invalid level map: {0}")]
    InvalidLevel(String),
}

/// Convenience alias: a `Result` using [`ConfigError`] as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value > 0`.
pub fn require_positive(name: &'static str, value: f32) -> ConfigResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            range: "(0, ∞)",
        })
    }
}

/// Returns an error unless `0 <= value <= 1`.
pub fn require_unit(name: &'static str, value: f32) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            range: "[0, 1]",
        })
    }
}

/// Returns an error unless `0 < value < 1` (per-tick decay factors).
pub fn require_decay(name: &'static str, value: f32) -> ConfigResult<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            range: "(0, 1)",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_and_nan() {
        assert!(require_positive("x", 1.0).is_ok());
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_positive("x", f32::NAN).is_err());
    }

    #[test]
    fn decay_is_open_interval() {
        assert!(require_decay("d", 0.5).is_ok());
        assert!(require_decay("d", 1.0).is_err());
        assert!(require_decay("d", 0.0).is_err());
    }

    #[test]
    fn out_of_range_message_names_the_key() {
        let err = require_unit("enemy_ai.dodge_chance", 1.5).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("enemy_ai.dodge_chance"), "{msg}");
        assert!(msg.contains("[0, 1]"), "{msg}");
    }
}
