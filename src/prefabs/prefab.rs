use avian3d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::gizmos::BracketBox;
use crate::scene::SceneEntity;
use crate::utils::collider_local_bounds;

/// Marker on the root entity of a prefab (the group container meshes attach to)
#[derive(Component, Reflect, Serialize, Deserialize, Clone, Debug, Default)]
#[reflect(Component, Serialize, Deserialize)]
pub struct PrefabRoot;

/// Set on the prefab that will receive the selected meshes when the mouse is released
#[derive(Component, Reflect, Clone, Copy, Debug, Default)]
#[reflect(Component)]
pub struct AttachCandidate;

/// Spawn an empty prefab root
pub fn spawn_prefab_root(commands: &mut Commands, transform: Transform, name: &str) -> Entity {
    commands
        .spawn((
            SceneEntity,
            PrefabRoot,
            Name::new(name.to_string()),
            transform,
            Visibility::default(),
        ))
        .id()
}

/// World AABB of a collider under `global`
pub fn collider_world_aabb(collider: &Collider, global: &GlobalTransform) -> (Vec3, Vec3) {
    let (min, max) = collider_local_bounds(collider);
    BracketBox::world_aabb(min, max, &global.compute_transform())
}

/// Union of the world AABBs of every descendant with a collider, skipping `exclude`
pub fn prefab_bounds(
    root: Entity,
    children: &Query<&Children>,
    colliders: &Query<(&Collider, &GlobalTransform)>,
    exclude: &[Entity],
) -> Option<(Vec3, Vec3)> {
    let mut bounds: Option<(Vec3, Vec3)> = None;
    let mut stack = vec![root];

    while let Some(entity) = stack.pop() {
        if let Ok(kids) = children.get(entity) {
            stack.extend_from_slice(&kids[..]);
        }
        if entity == root || exclude.contains(&entity) {
            continue;
        }
        let Ok((collider, global)) = colliders.get(entity) else {
            continue;
        };
        let (min, max) = collider_world_aabb(collider, global);
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(min), hi.max(max)),
            None => (min, max),
        });
    }

    bounds
}

/// Nearest ancestor of `entity` marked [`PrefabRoot`]
pub fn find_prefab_root(
    entity: Entity,
    prefabs: &Query<(), With<PrefabRoot>>,
    parents: &Query<&ChildOf>,
) -> Option<Entity> {
    let mut current = parents.get(entity).ok()?.parent();
    while !prefabs.contains(current) {
        current = parents.get(current).ok()?.parent();
    }
    Some(current)
}

/// Every attached mesh under `root`
pub fn prefab_members(root: Entity, children: &Query<&Children>, meshes: &Query<(), With<Collider>>) -> Vec<Entity> {
    let mut members = Vec::new();
    let mut stack = vec![root];
    while let Some(entity) = stack.pop() {
        if let Ok(kids) = children.get(entity) {
            stack.extend_from_slice(&kids[..]);
        }
        if entity != root && meshes.contains(entity) {
            members.push(entity);
        }
    }
    members
}

/// True when `point` lies strictly inside the box; points on a face are outside
pub fn contains_strict(min: Vec3, max: Vec3, point: Vec3) -> bool {
    point.cmpgt(min).all() && point.cmplt(max).all()
}

/// First prefab whose bounds strictly contain any of `points`
pub fn find_attach_candidate(prefabs: &[(Entity, (Vec3, Vec3))], points: &[Vec3]) -> Option<Entity> {
    prefabs
        .iter()
        .find(|(_, (min, max))| points.iter().any(|p| contains_strict(*min, *max, *p)))
        .map(|(entity, _)| *entity)
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::SystemState;

    use super::*;

    #[test]
    fn containment_excludes_faces() {
        let (min, max) = (Vec3::splat(-1.0), Vec3::ONE);
        assert!(contains_strict(min, max, Vec3::ZERO));
        assert!(contains_strict(min, max, Vec3::new(0.999, -0.999, 0.5)));
        assert!(!contains_strict(min, max, Vec3::new(1.0, 0.0, 0.0)));
        assert!(!contains_strict(min, max, Vec3::new(0.0, -1.0, 0.0)));
        assert!(!contains_strict(min, max, Vec3::new(0.0, 0.0, 3.0)));
    }

    #[test]
    fn first_containing_prefab_wins() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let prefabs = [
            (a, (Vec3::new(10.0, -1.0, -1.0), Vec3::new(12.0, 1.0, 1.0))),
            (b, (Vec3::splat(-5.0), Vec3::splat(5.0))),
        ];

        assert_eq!(find_attach_candidate(&prefabs, &[Vec3::ZERO]), Some(b));
        assert_eq!(find_attach_candidate(&prefabs, &[Vec3::ZERO, Vec3::new(11.0, 0.0, 0.0)]), Some(a));
        assert_eq!(find_attach_candidate(&prefabs, &[Vec3::splat(50.0)]), None);
        assert_eq!(find_attach_candidate(&[], &[Vec3::ZERO]), None);
    }

    #[test]
    fn members_and_root_follow_the_hierarchy() {
        let mut world = World::new();
        let root = world.spawn((PrefabRoot, Transform::IDENTITY)).id();
        let leg = world.spawn((Collider::cuboid(1.0, 1.0, 1.0), ChildOf(root))).id();
        let pivot = world.spawn((Transform::IDENTITY, ChildOf(root))).id();
        let knob = world.spawn((Collider::cuboid(1.0, 1.0, 1.0), ChildOf(pivot))).id();
        let loose = world.spawn(Collider::cuboid(1.0, 1.0, 1.0)).id();

        let mut state: SystemState<(
            Query<(), With<PrefabRoot>>,
            Query<&ChildOf>,
            Query<&Children>,
            Query<(), With<Collider>>,
        )> = SystemState::new(&mut world);
        let (prefabs, parents, children, meshes) = state.get(&world);

        assert_eq!(find_prefab_root(knob, &prefabs, &parents), Some(root));
        assert_eq!(find_prefab_root(leg, &prefabs, &parents), Some(root));
        assert_eq!(find_prefab_root(loose, &prefabs, &parents), None);
        assert_eq!(find_prefab_root(root, &prefabs, &parents), None);

        let mut members = prefab_members(root, &children, &meshes);
        members.sort();
        let mut expected = vec![leg, knob];
        expected.sort();
        assert_eq!(members, expected);
    }

    #[test]
    fn collider_aabb_follows_rotation_and_translation() {
        let global = GlobalTransform::from(
            Transform::from_xyz(3.0, 0.0, 0.0).with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
        );
        let (min, max) = collider_world_aabb(&Collider::cuboid(4.0, 2.0, 2.0), &global);
        assert!((min - Vec3::new(2.0, -1.0, -2.0)).length() < 1e-3);
        assert!((max - Vec3::new(4.0, 1.0, 2.0)).length() < 1e-3);
    }
}
