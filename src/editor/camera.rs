use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use super::EditorState;
use crate::constants::camera::FAST_MULTIPLIER;
use crate::utils::{pointer_over_ui, should_process_input};

pub struct EditorCameraPlugin;

impl Plugin for EditorCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_editor_camera)
            .add_systems(Update, (camera_look, camera_movement));
    }
}

/// Marker component for the editor camera
#[derive(Component)]
pub struct EditorCamera;

/// Fly camera state
#[derive(Component)]
pub struct FlyCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: -std::f32::consts::FRAC_PI_6, // Look slightly down
            speed: 10.0,
            sensitivity: 0.003,
        }
    }
}

fn spawn_editor_camera(mut commands: Commands) {
    let fly_cam = FlyCamera::default();
    let rotation = Quat::from_euler(EulerRot::YXZ, fly_cam.yaw, fly_cam.pitch, 0.0);

    commands.spawn((
        EditorCamera,
        fly_cam,
        Camera3d::default(),
        Transform::from_translation(Vec3::new(0.0, 5.0, 10.0)).with_rotation(rotation),
    ));
}

/// Look around with right mouse button drag
fn camera_look(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    editor_state: Res<EditorState>,
    mut query: Query<(&mut FlyCamera, &mut Transform), With<EditorCamera>>,
    mut contexts: EguiContexts,
) {
    if !editor_state.editor_active || !mouse_button.pressed(MouseButton::Right) {
        return;
    }

    if pointer_over_ui(&mut contexts) {
        return;
    }

    let delta = mouse_motion.delta;
    if delta == Vec2::ZERO {
        return;
    }

    for (mut fly_cam, mut transform) in &mut query {
        fly_cam.yaw -= delta.x * fly_cam.sensitivity;
        fly_cam.pitch = (fly_cam.pitch - delta.y * fly_cam.sensitivity)
            .clamp(-std::f32::consts::FRAC_PI_2 + 0.1, std::f32::consts::FRAC_PI_2 - 0.1);

        transform.rotation = Quat::from_euler(EulerRot::YXZ, fly_cam.yaw, fly_cam.pitch, 0.0);
    }
}

/// WASD movement while the right mouse button is held
fn camera_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    editor_state: Res<EditorState>,
    mut query: Query<(&FlyCamera, &mut Transform), With<EditorCamera>>,
    mut contexts: EguiContexts,
) {
    // WASD without the right button is left to other bindings
    if !mouse_button.pressed(MouseButton::Right) {
        return;
    }

    if !should_process_input(&editor_state, &mut contexts) {
        return;
    }

    let fast = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    let speed_mult = if fast { FAST_MULTIPLIER } else { 1.0 };

    for (fly_cam, mut transform) in &mut query {
        let direction = fly_direction(&keyboard, &transform);
        transform.translation += direction * fly_cam.speed * speed_mult * time.delta_secs();
    }
}

/// Unit movement direction from WASD and Space/Ctrl relative to the camera, or zero
pub fn fly_direction(keyboard: &ButtonInput<KeyCode>, transform: &Transform) -> Vec3 {
    let bindings = [
        (KeyCode::KeyW, transform.forward().as_vec3()),
        (KeyCode::KeyS, transform.back().as_vec3()),
        (KeyCode::KeyA, transform.left().as_vec3()),
        (KeyCode::KeyD, transform.right().as_vec3()),
        (KeyCode::Space, transform.up().as_vec3()),
        (KeyCode::ControlLeft, transform.down().as_vec3()),
        (KeyCode::ControlRight, transform.down().as_vec3()),
    ];

    bindings
        .iter()
        .filter(|(key, _)| keyboard.pressed(*key))
        .map(|(_, dir)| *dir)
        .sum::<Vec3>()
        .normalize_or_zero()
}
