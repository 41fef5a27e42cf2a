//! # Bevy Scale Gizmo
//!
//! Axis-drag non-uniform scaling for Bevy scenes built on Avian3D colliders.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_scale_gizmo::EditorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(EditorPlugin)
//!         .run();
//! }
//! ```
//!
//! ## Making Entities Scalable
//!
//! Any entity with `SceneEntity` and a `Collider` can be selected and scaled:
//!
//! ```ignore
//! commands.spawn((
//!     Name::new("Crate"),
//!     SceneEntity,
//!     Collider::cuboid(1.0, 1.0, 1.0),
//!     Transform::default(),
//! ));
//! ```
//!
//! ## Controls
//!
//! - **Left click** a mesh to select it, Shift-click to build a group
//! - **Drag a handle** to scale along that axis
//! - **T** switches between wrap (opposite face fixed) and center scaling
//! - **Hold B** while dragging to carry the selection into a prefab
//! - **Right mouse + WASD** flies the camera
//! - **F2** settings, **F9** preview mode, **F10** editor on/off
//!
//! The scaling core in [`gizmos`] has no ECS dependency: [`gizmos::AxisDragger`]
//! works over any [`gizmos::InstanceRegistry`].

pub mod commands;
pub mod constants;
pub mod editor;
pub mod gizmos;
pub mod prefabs;
pub mod scene;
pub mod selection;
pub mod ui;
pub mod utils;

// Re-export the main plugin
pub use editor::EditorPlugin;

// Re-export commonly used types
pub use scene::{Locked, MeshShape, SceneEntity, spawn_mesh_instance};

// Re-export selection types
pub use selection::Selected;

// Re-export the scale gizmo surface
pub use gizmos::{AxisDragger, DragMode, DragOutcome, InstanceRegistry, ScaleGizmo, ScaleGizmoPlugin};

// Re-export prefab types
pub use prefabs::{AttachCandidate, PrefabRoot, spawn_prefab_root};

// Re-export settings and history
pub use commands::{CommandHistory, DragTransaction, GestureRecord, TransactionBegun, TransactionEnded};
pub use ui::GizmoSettings;
