//! Physically simulated characters.
//!
//! Player and enemy are both built from the same pieces:
//!
//! | Component | Role |
//! |---|---|
//! | [`ActorBody`] | position, velocity, tile collision, jump budget, tilt |
//! | [`Knockback`] | externally imposed horizontal override |
//! | [`Dash`] | player-only burst + invulnerability |
//! | [`Team`] | hit filtering for projectiles |
//!
//! Health lives in [`crate::health`].

pub mod body;
pub mod dash;
pub mod knockback;

pub use body::{ActorBody, Contacts, Drive};
pub use dash::Dash;
pub use knockback::Knockback;

use bevy::prelude::*;

/// Which side an actor or projectile fights for.  Projectiles only hit actors
/// of a different team.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Player,
    Enemy,
}
