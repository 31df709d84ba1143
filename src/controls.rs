//! Keyboard and mouse → [`FrameInput`].
//!
//! Runs in `Update`, which may run several times per fixed tick or not at
//! all.  Edge fields are OR-ed in so no press is lost; the simulation clears
//! them once a tick has consumed them.
//!
//! | Action | Binding |
//! |---|---|
//! | move | A / D, arrows |
//! | aim vertical (dash) | W / S |
//! | jump | Space |
//! | dash | Left Shift |
//! | fire / stab | left mouse |
//! | heavy stab | right mouse |
//! | weapon | 1 bow, 2 knife |

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use quiverfall::input::FrameInput;
use quiverfall::weapons::WeaponKind;

fn axis(keys: &ButtonInput<KeyCode>, negative: &[KeyCode], positive: &[KeyCode]) -> f32 {
    let pos = keys.any_pressed(positive.iter().copied()) as i8;
    let neg = keys.any_pressed(negative.iter().copied()) as i8;
    f32::from(pos - neg)
}

pub fn keyboard_mouse_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut input: ResMut<FrameInput>,
) {
    input.move_axis = Vec2::new(
        axis(
            &keys,
            &[KeyCode::KeyA, KeyCode::ArrowLeft],
            &[KeyCode::KeyD, KeyCode::ArrowRight],
        ),
        // Sim space is y-down: W points up, which is negative.
        axis(
            &keys,
            &[KeyCode::KeyW, KeyCode::ArrowUp],
            &[KeyCode::KeyS, KeyCode::ArrowDown],
        ),
    );

    input.jump_pressed |= keys.just_pressed(KeyCode::Space);
    input.jump_released |= keys.just_released(KeyCode::Space);
    input.dash_pressed |= keys.just_pressed(KeyCode::ShiftLeft);

    input.primary_pressed |= mouse.just_pressed(MouseButton::Left);
    input.primary_released |= mouse.just_released(MouseButton::Left);
    input.primary_held = mouse.pressed(MouseButton::Left);
    input.secondary_pressed |= mouse.just_pressed(MouseButton::Right);

    if keys.just_pressed(KeyCode::Digit1) {
        input.select_weapon = Some(WeaponKind::Bow);
    } else if keys.just_pressed(KeyCode::Digit2) {
        input.select_weapon = Some(WeaponKind::Knife);
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    if let Some(world) = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world_2d(camera_transform, cursor).ok())
    {
        input.pointer = Vec2::new(world.x, -world.y);
    }
}
