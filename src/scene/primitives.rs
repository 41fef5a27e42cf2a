use avian3d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::SceneEntity;
use crate::constants::demo_colors;

/// Marker component for locked entities (never scaled or attached)
#[derive(Component, Serialize, Deserialize, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Locked;

/// Box-shaped mesh kinds the editor can spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum MeshShape {
    Cube,
    /// Wide and flat
    Slab,
    /// Tall and thin
    Pillar,
}

#[derive(Component, Serialize, Deserialize, Clone, Reflect)]
#[reflect(Component)]
pub struct MeshInstanceMarker {
    pub shape: MeshShape,
}

impl MeshShape {
    pub fn size(&self) -> Vec3 {
        match self {
            MeshShape::Cube => Vec3::ONE,
            MeshShape::Slab => Vec3::new(2.0, 0.25, 1.5),
            MeshShape::Pillar => Vec3::new(0.4, 2.0, 0.4),
        }
    }

    pub fn default_color(&self) -> Color {
        match self {
            MeshShape::Cube => demo_colors::CUBE,
            MeshShape::Slab => demo_colors::SLAB,
            MeshShape::Pillar => demo_colors::PILLAR,
        }
    }

    pub fn create_mesh(&self) -> Mesh {
        let size = self.size();
        Cuboid::new(size.x, size.y, size.z).into()
    }

    pub fn create_collider(&self) -> Collider {
        let size = self.size();
        Collider::cuboid(size.x, size.y, size.z)
    }
}

/// Spawn a selectable mesh instance
pub fn spawn_mesh_instance(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    shape: MeshShape,
    transform: Transform,
    name: &str,
) -> Entity {
    commands
        .spawn((
            SceneEntity,
            Name::new(name.to_string()),
            MeshInstanceMarker { shape },
            Mesh3d(meshes.add(shape.create_mesh())),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: shape.default_color(),
                ..default()
            })),
            transform,
            RigidBody::Static,
            shape.create_collider(),
        ))
        .id()
}
