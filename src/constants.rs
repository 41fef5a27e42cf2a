//! Centralized constants for the scale gizmo
//!
//! Numeric thresholds used by the drag math, input bindings, and the default
//! values used by the demo scene. Visual tunables (colors, handle sizes) live
//! in [`crate::ui::GizmoSettings`] instead.

use bevy::prelude::*;

/// Degeneracy thresholds for the drag math
pub mod thresholds {
    /// Minimum |cos| between drag and scale axis before a drag is considered perpendicular.
    /// Also the minimum alignment for a group member axis to receive a world factor.
    pub const PERPENDICULAR_EPSILON: f32 = 0.001;
    /// Minimum magnitude of a local drag or origin component to change that axis
    pub const AXIS_EPSILON: f32 = 0.001;
    /// Ray/plane dot product below which the ray counts as parallel
    pub const PLANE_PARALLEL_EPSILON: f32 = 1e-4;
}

/// Handle picking
pub mod picking {
    /// Camera distance beyond which the click radius starts to grow
    pub const CLICK_DISTANCE_FALLOFF: f32 = 5.0;
    /// Segments and denominators shorter than this are treated as degenerate
    pub const SEGMENT_EPSILON: f32 = 0.0001;
    /// Maximum distance for click-selection raycasts
    pub const SELECTION_RAY_LENGTH: f32 = 100.0;
    /// Two clicks on the same entity within this many seconds form a double-click
    pub const DOUBLE_CLICK_SECS: f32 = 0.35;
}

/// Key bindings
pub mod keys {
    use super::*;

    /// Toggle wrap/center drag mode
    pub const TOGGLE_DRAG_MODE: KeyCode = KeyCode::KeyT;
    /// Hold while dragging to move selected meshes into a prefab
    pub const PREFAB_ATTACH: KeyCode = KeyCode::KeyB;
}

/// Transaction history
pub mod history {
    /// Description recorded for every scale gesture
    pub const DRAG_TRANSACTION: &str = "Mesh drag transaction";
    /// Description recorded for prefab attach gestures
    pub const ATTACH_TRANSACTION: &str = "Prefab attach transaction";
    /// Maximum number of recorded gestures to keep
    pub const MAX_HISTORY: usize = 100;
}

/// Default material colors for the demo scene
pub mod demo_colors {
    use super::*;

    pub const CUBE: Color = Color::srgb(0.8, 0.7, 0.6);
    pub const SLAB: Color = Color::srgb(0.6, 0.7, 0.8);
    pub const PILLAR: Color = Color::srgb(0.7, 0.8, 0.6);
    pub const GROUND: Color = Color::srgb(0.3, 0.3, 0.32);
}

/// Camera movement
pub mod camera {
    /// Speed multiplier while Shift is held
    pub const FAST_MULTIPLIER: f32 = 3.0;
    /// Scale from mouse pixels to world units for attach-mode translation
    pub const ATTACH_DRAG_SPEED: f32 = 0.01;
}
