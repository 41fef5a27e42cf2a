//! Shared utility functions for the editor

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::editor::{EditorCamera, EditorState};

/// Check if keyboard input should be processed by editor systems.
///
/// Returns `false` (block input) if:
/// - The editor is disabled (`editor_state.editor_active` is false)
/// - The egui UI wants keyboard input (e.g., text fields are focused)
pub fn should_process_input(editor_state: &EditorState, contexts: &mut EguiContexts) -> bool {
    if !editor_state.editor_active {
        return false;
    }

    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.wants_keyboard_input() {
            return false;
        }
    }

    true
}

/// True when egui owns the pointer (hovering a window or dragging a widget)
pub fn pointer_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
        .unwrap_or(false)
}

/// Ray from the editor camera through the cursor, with the camera transform
pub fn cursor_ray(
    window_query: &Query<&Window, With<PrimaryWindow>>,
    camera_query: &Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
) -> Option<(Ray3d, GlobalTransform)> {
    let window = window_query.single().ok()?;
    let cursor_position = window.cursor_position()?;
    let (camera, camera_transform) = camera_query.single().ok()?;
    let ray = camera.viewport_to_world(camera_transform, cursor_position).ok()?;
    Some((ray, *camera_transform))
}

/// Untransformed bounds of a collider.
///
/// Avian bakes the entity scale into the collider shape, so it is divided back out.
pub fn collider_local_bounds(collider: &Collider) -> (Vec3, Vec3) {
    let aabb = collider.aabb(Vec3::ZERO, Quat::IDENTITY);
    let scale = collider.scale();
    let unscale = |v: Vec3| {
        Vec3::new(
            if scale.x == 0.0 { v.x } else { v.x / scale.x },
            if scale.y == 0.0 { v.y } else { v.y / scale.y },
            if scale.z == 0.0 { v.z } else { v.z / scale.z },
        )
    };
    let (a, b) = (unscale(aabb.min), unscale(aabb.max));
    (a.min(b), a.max(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unscaled_collider_bounds() {
        let (min, max) = collider_local_bounds(&Collider::cuboid(2.0, 4.0, 6.0));
        assert!((min - Vec3::new(-1.0, -2.0, -3.0)).length() < 1e-4);
        assert!((max - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-4);
    }

    #[test]
    fn scaled_collider_reports_unscaled_bounds() {
        let mut collider = Collider::cuboid(2.0, 2.0, 2.0);
        collider.set_scale(Vec3::new(3.0, 1.0, 0.5), 8);
        let (min, max) = collider_local_bounds(&collider);
        assert!((min + Vec3::ONE).length() < 1e-3);
        assert!((max - Vec3::ONE).length() < 1e-3);
    }
}
