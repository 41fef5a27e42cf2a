//! Standalone demo: a few boxes, a prefab and the scale gizmo.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_scale_gizmo::constants::demo_colors;
use bevy_scale_gizmo::{EditorPlugin, MeshShape, SceneEntity, spawn_mesh_instance, spawn_prefab_root};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Bevy Scale Gizmo".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EditorPlugin)
        .add_systems(Startup, setup_demo_scene)
        .run();
}

fn setup_demo_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Ground has no SceneEntity marker, so it can't be selected or scaled
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(40.0, 40.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: demo_colors::GROUND,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.01, 0.0),
    ));

    spawn_mesh_instance(
        &mut commands,
        &mut meshes,
        &mut materials,
        MeshShape::Cube,
        Transform::from_xyz(-2.0, 0.5, 0.0),
        "Cube",
    );
    spawn_mesh_instance(
        &mut commands,
        &mut meshes,
        &mut materials,
        MeshShape::Cube,
        Transform::from_xyz(0.0, 0.5, -1.5).with_rotation(Quat::from_rotation_y(0.6)),
        "Rotated Cube",
    );
    spawn_mesh_instance(
        &mut commands,
        &mut meshes,
        &mut materials,
        MeshShape::Pillar,
        Transform::from_xyz(2.0, 1.0, 0.0),
        "Pillar",
    );

    // A prefab with two slabs; carry meshes into it with B
    let prefab = spawn_prefab_root(&mut commands, Transform::from_xyz(0.0, 0.0, 4.0), "Table Prefab");
    let top = spawn_mesh_instance(
        &mut commands,
        &mut meshes,
        &mut materials,
        MeshShape::Slab,
        Transform::from_xyz(0.0, 1.0, 0.0),
        "Table Top",
    );
    let shelf = spawn_mesh_instance(
        &mut commands,
        &mut meshes,
        &mut materials,
        MeshShape::Slab,
        Transform::from_xyz(0.0, 0.25, 0.0).with_scale(Vec3::new(0.8, 1.0, 0.8)),
        "Shelf",
    );
    commands.entity(prefab).add_children(&[top, shelf]);

    // Locked meshes are selectable but never scaled or carried
    commands.spawn((
        SceneEntity,
        bevy_scale_gizmo::Locked,
        Name::new("Locked Block"),
        Mesh3d(meshes.add(Cuboid::new(1.0, 0.5, 1.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: demo_colors::SLAB,
            ..default()
        })),
        Transform::from_xyz(-4.0, 0.25, 3.0),
        RigidBody::Static,
        Collider::cuboid(1.0, 0.5, 1.0),
    ));
}
