//! Per-tick input abstraction.
//!
//! [`FrameInput`] is the only way player intent enters the simulation.  The
//! binary fills it from keyboard and mouse; tests write it directly.  Edge
//! fields accumulate (logical OR) until a fixed tick consumes them, after which
//! [`clear_input_edges`] resets them.  Level fields (axes, held buttons,
//! pointer) are simply overwritten by whoever produces input.

use crate::weapons::{Trigger, WeaponKind};
use bevy::prelude::*;

#[derive(Resource, Debug, Clone, Default)]
pub struct FrameInput {
    /// Horizontal in `x`, vertical in `y` (y-down: up is negative), each in
    /// `[-1, 1]`.
    pub move_axis: Vec2,
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub dash_pressed: bool,
    pub primary_pressed: bool,
    pub primary_released: bool,
    pub primary_held: bool,
    pub secondary_pressed: bool,
    /// Pointer in world space (y-down), already camera-corrected.
    pub pointer: Vec2,
    pub select_weapon: Option<WeaponKind>,
}

impl FrameInput {
    pub fn trigger(&self) -> Trigger {
        Trigger {
            primary_pressed: self.primary_pressed,
            primary_released: self.primary_released,
            primary_held: self.primary_held,
            secondary_pressed: self.secondary_pressed,
        }
    }

    /// Reset edge-triggered fields; levels are left alone.
    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.jump_released = false;
        self.dash_pressed = false;
        self.primary_pressed = false;
        self.primary_released = false;
        self.secondary_pressed = false;
        self.select_weapon = None;
    }
}

/// Runs after every fixed tick so an edge is seen by exactly one tick.
pub fn clear_input_edges(mut input: ResMut<FrameInput>) {
    input.clear_edges();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearing_keeps_levels() {
        let mut input = FrameInput {
            move_axis: Vec2::X,
            primary_held: true,
            primary_pressed: true,
            jump_pressed: true,
            pointer: Vec2::new(5.0, 6.0),
            select_weapon: Some(WeaponKind::Knife),
            ..default()
        };
        input.clear_edges();
        assert!(!input.primary_pressed && !input.jump_pressed);
        assert!(input.primary_held);
        assert_eq!(input.move_axis, Vec2::X);
        assert_eq!(input.pointer, Vec2::new(5.0, 6.0));
        assert_eq!(input.select_weapon, None);
    }
}
