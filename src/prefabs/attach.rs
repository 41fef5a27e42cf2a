use avian3d::prelude::*;
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use super::prefab::{AttachCandidate, PrefabRoot, find_attach_candidate, prefab_bounds};
use crate::commands::{CommandHistory, DragTransaction, TransactionBegun, TransactionEnded};
use crate::constants::camera::ATTACH_DRAG_SPEED;
use crate::constants::history::ATTACH_TRANSACTION;
use crate::constants::keys::PREFAB_ATTACH;
use crate::editor::{EditorCamera, EditorState};
use crate::gizmos::{BevyGizmoSink, BracketBox, BracketGizmoGroup, HandleColors, ScaleGizmoGroup, ScaleGizmoSet, draw_bracket};
use crate::scene::Locked;
use crate::selection::Selected;
use crate::ui::GizmoSettings;
use crate::utils::pointer_over_ui;

/// Meshes carried by the current attach gesture
#[derive(Resource, Default, Debug)]
pub struct PrefabAttachState {
    pub moving: Vec<Entity>,
}

impl PrefabAttachState {
    pub fn is_active(&self) -> bool {
        !self.moving.is_empty()
    }
}

pub struct PrefabAttachPlugin;

impl Plugin for PrefabAttachPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PrefabAttachState>()
            .add_systems(
                Update,
                (drive_prefab_attach, finish_prefab_attach).chain().in_set(ScaleGizmoSet::Drag),
            )
            .add_systems(Update, draw_prefab_brackets.after(ScaleGizmoSet::Drag));
    }
}

/// B held with the left button: detach, carry and flag the target prefab
#[allow(clippy::too_many_arguments)]
fn drive_prefab_attach(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    editor_state: Res<EditorState>,
    camera_query: Query<&GlobalTransform, With<EditorCamera>>,
    mut selected: Query<(Entity, &mut Transform, &GlobalTransform, Option<&ChildOf>), (With<Selected>, With<Collider>, Without<Locked>)>,
    prefabs: Query<Entity, With<PrefabRoot>>,
    flagged: Query<Entity, With<AttachCandidate>>,
    children: Query<&Children>,
    colliders: Query<(&Collider, &GlobalTransform)>,
    mut state: ResMut<PrefabAttachState>,
    mut transaction: ResMut<DragTransaction>,
    mut begun: MessageWriter<TransactionBegun>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    if !editor_state.editor_active || !mouse_button.pressed(MouseButton::Left) || !keyboard.pressed(PREFAB_ATTACH) {
        return;
    }
    if !state.is_active() && pointer_over_ui(&mut contexts) {
        return;
    }

    if !state.is_active() {
        let mut moving: Vec<Entity> = selected.iter().map(|(e, ..)| e).collect();
        if moving.is_empty() {
            return;
        }
        moving.sort();

        let before = selected.iter().map(|(e, t, ..)| (e, *t)).collect();
        if let Some(message) = open_attach_transaction(&mut transaction, before) {
            begun.write(message);
        }
        info!("Prefab attach: carrying {} mesh(es)", moving.len());
        state.moving = moving;
    }

    let (camera_right, camera_up) = camera_query
        .single()
        .map(|t| (t.right().as_vec3(), t.up().as_vec3()))
        .unwrap_or((Vec3::X, Vec3::Y));
    let delta = mouse_motion.delta;
    let offset = camera_right * delta.x * ATTACH_DRAG_SPEED + camera_up * -delta.y * ATTACH_DRAG_SPEED;

    let mut locations = Vec::new();
    for (entity, mut transform, global, child_of) in selected.iter_mut() {
        if !state.moving.contains(&entity) {
            continue;
        }
        // Parented meshes are detached first and carried from the next frame
        if child_of.is_some() {
            commands.entity(entity).remove_parent_in_place();
            locations.push(global.translation());
            continue;
        }
        transform.translation += offset;
        locations.push(transform.translation);
    }

    let mut candidates: Vec<(Entity, (Vec3, Vec3))> = prefabs
        .iter()
        .filter_map(|prefab| prefab_bounds(prefab, &children, &colliders, &state.moving).map(|b| (prefab, b)))
        .collect();
    candidates.sort_by_key(|(e, _)| *e);
    let candidate = find_attach_candidate(&candidates, &locations);

    for entity in flagged.iter() {
        if Some(entity) != candidate {
            commands.entity(entity).remove::<AttachCandidate>();
        }
    }
    if let Some(entity) = candidate {
        commands.entity(entity).insert(AttachCandidate);
    }
}

/// Open the attach transaction unless a scale drag already owns this gesture
pub fn open_attach_transaction(
    transaction: &mut DragTransaction,
    before: Vec<(Entity, Transform)>,
) -> Option<TransactionBegun> {
    if let Some(current) = transaction.description() {
        debug!("Prefab attach joins open transaction '{}'", current);
        return None;
    }
    transaction.begin(ATTACH_TRANSACTION, before).then(|| TransactionBegun {
        description: ATTACH_TRANSACTION.to_string(),
    })
}

/// Left button released: parent carried meshes to the flagged prefab
fn finish_prefab_attach(
    mouse_button: Res<ButtonInput<MouseButton>>,
    transforms: Query<&Transform>,
    flagged: Query<Entity, With<AttachCandidate>>,
    mut state: ResMut<PrefabAttachState>,
    mut transaction: ResMut<DragTransaction>,
    mut history: ResMut<CommandHistory>,
    mut ended: MessageWriter<TransactionEnded>,
    mut commands: Commands,
) {
    if !state.is_active() || mouse_button.pressed(MouseButton::Left) {
        return;
    }

    let moving = std::mem::take(&mut state.moving);
    if let Some(prefab) = flagged.iter().next() {
        for &entity in &moving {
            commands.entity(entity).set_parent_in_place(prefab);
        }
        info!("Prefab attach: {} mesh(es) attached to {:?}", moving.len(), prefab);
    } else {
        debug!("Prefab attach: no prefab under the carried meshes");
    }
    for entity in flagged.iter() {
        commands.entity(entity).remove::<AttachCandidate>();
    }

    if transaction.description() == Some(ATTACH_TRANSACTION) {
        let after = moving
            .iter()
            .filter_map(|&e| transforms.get(e).ok().map(|t| (e, *t)))
            .collect();
        if let Some(record) = transaction.end(after, &mut history) {
            ended.write(record);
        }
    }
}

/// Bracket every prefab, highlighting the attach candidate
fn draw_prefab_brackets(
    mut gizmos: Gizmos<ScaleGizmoGroup>,
    mut brackets: Gizmos<BracketGizmoGroup>,
    prefabs: Query<(Entity, Has<AttachCandidate>), With<PrefabRoot>>,
    children: Query<&Children>,
    colliders: Query<(&Collider, &GlobalTransform)>,
    settings: Res<GizmoSettings>,
    editor_state: Res<EditorState>,
) {
    if !editor_state.gizmos_visible {
        return;
    }

    let mut sink = BevyGizmoSink {
        gizmos: &mut gizmos,
        brackets: &mut brackets,
        colors: HandleColors::from_settings(&settings),
    };

    for (prefab, is_candidate) in prefabs.iter() {
        let Some(bounds) = prefab_bounds(prefab, &children, &colliders, &[]) else {
            continue;
        };
        let Some(bracket) = BracketBox::from_world_aabbs([bounds]) else {
            continue;
        };
        draw_bracket(&mut sink, &bracket, settings.prefab_bracket_style(is_candidate), &settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::history::DRAG_TRANSACTION;

    #[test]
    fn attach_opens_its_own_transaction_when_idle() {
        let mut world = World::new();
        let mesh = world.spawn_empty().id();
        let mut transaction = DragTransaction::default();

        let begun = open_attach_transaction(&mut transaction, vec![(mesh, Transform::IDENTITY)]);
        assert_eq!(begun.map(|m| m.description), Some(ATTACH_TRANSACTION.to_string()));
        assert_eq!(transaction.description(), Some(ATTACH_TRANSACTION));
        assert_eq!(transaction.entities(), vec![mesh]);
    }

    #[test]
    fn attach_leaves_an_open_scale_transaction_alone() {
        let mut world = World::new();
        let mesh = world.spawn_empty().id();
        let mut transaction = DragTransaction::default();
        assert!(transaction.begin(DRAG_TRANSACTION, vec![(mesh, Transform::IDENTITY)]));

        let begun = open_attach_transaction(&mut transaction, vec![(mesh, Transform::from_xyz(1.0, 0.0, 0.0))]);
        assert!(begun.is_none());
        assert_eq!(transaction.description(), Some(DRAG_TRANSACTION));
    }
}
