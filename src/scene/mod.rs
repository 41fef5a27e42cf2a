mod primitives;

pub use primitives::*;

use bevy::prelude::*;

/// Marker component for entities that are part of the editable scene
#[derive(Component, Default, Reflect)]
#[reflect(Component)]
pub struct SceneEntity;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SceneEntity>()
            .register_type::<Locked>()
            .register_type::<MeshInstanceMarker>();
    }
}
