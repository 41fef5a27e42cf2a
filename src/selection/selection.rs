use avian3d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::constants::picking::{DOUBLE_CLICK_SECS, SELECTION_RAY_LENGTH};
use crate::editor::{EditorCamera, EditorState};
use crate::gizmos::{PickResult, ScaleGizmo, ScaleGizmoSet};
use crate::prefabs::{PrefabRoot, find_prefab_root, prefab_members};
use crate::scene::SceneEntity;
use crate::utils::{cursor_ray, pointer_over_ui};

/// Marker component for selected entities
#[derive(Component, Default)]
pub struct Selected;

/// Resource to track multi-selection state
#[derive(Resource, Default)]
pub struct SelectionState {
    pub multi_select: bool,
    /// Ctrl held: clicks inside a prefab toggle single members
    pub toggle_member: bool,
}

/// Last click, for double-click detection
#[derive(Resource, Default, Debug)]
pub struct ClickTracker {
    last: Option<(Entity, f32)>,
}

impl ClickTracker {
    /// Record a click on `entity` at `now` seconds; true when it completes a double-click
    pub fn register(&mut self, entity: Entity, now: f32) -> bool {
        let double = self
            .last
            .is_some_and(|(last, at)| last == entity && now - at <= DOUBLE_CLICK_SECS);
        self.last = if double { None } else { Some((entity, now)) };
        double
    }
}

/// What a click does to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// Replace the selection with this entity
    Replace(Entity),
    /// Shift-click on an unselected entity
    Add(Entity),
    /// Shift-click on a selected entity
    Remove(Entity),
    Clear,
    Keep,
}

/// Decide the selection change for a click that hit `hit` (a selectable entity, if any)
pub fn resolve_click(hit: Option<Entity>, multi_select: bool, hit_already_selected: bool) -> SelectionChange {
    match (hit, multi_select) {
        (Some(entity), false) => SelectionChange::Replace(entity),
        (Some(entity), true) if hit_already_selected => SelectionChange::Remove(entity),
        (Some(entity), true) => SelectionChange::Add(entity),
        (None, false) => SelectionChange::Clear,
        (None, true) => SelectionChange::Keep,
    }
}

/// What a click on a mesh attached to a prefab does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefabClick {
    /// Select the prefab root; `exclusive` also drops every other selection
    SelectRoot { exclusive: bool },
    /// Drop the prefab root and flip the clicked member
    ToggleMember,
    /// Replace the selected prefab root with all of its members
    SelectMembers,
    /// Drop the prefab root, then select like a plain mesh
    Plain,
}

pub fn resolve_prefab_click(double_click: bool, toggle_member: bool, only_prefab_selected: bool) -> PrefabClick {
    match (double_click, toggle_member) {
        (true, toggle) => PrefabClick::SelectRoot { exclusive: !toggle },
        (false, true) => PrefabClick::ToggleMember,
        (false, false) if only_prefab_selected => PrefabClick::SelectMembers,
        (false, false) => PrefabClick::Plain,
    }
}

pub struct SelectionSystemPlugin;

impl Plugin for SelectionSystemPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectionState>()
            .init_resource::<ClickTracker>()
            .add_systems(
                Update,
                (update_multi_select_state, handle_click_selection)
                    .chain()
                    .after(ScaleGizmoSet::Pick)
                    .before(ScaleGizmoSet::Drag),
            );
    }
}

/// Track Shift for multi-selection and Ctrl for member toggling
fn update_multi_select_state(keyboard: Res<ButtonInput<KeyCode>>, mut state: ResMut<SelectionState>) {
    state.multi_select = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    state.toggle_member = keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);
}

/// Click-to-select by raycast. A press that grabbed a scale handle leaves the selection alone.
#[allow(clippy::too_many_arguments)]
fn handle_click_selection(
    mouse_button: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
    spatial_query: SpatialQuery,
    scene_entities: Query<(), With<SceneEntity>>,
    prefab_query: PrefabQueries,
    selected: Query<Entity, With<Selected>>,
    selection_state: Res<SelectionState>,
    editor_state: Res<EditorState>,
    scale_gizmo: Res<ScaleGizmo>,
    mut clicks: ResMut<ClickTracker>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    if !mouse_button.just_pressed(MouseButton::Left) || !editor_state.editor_active {
        return;
    }
    if matches!(scale_gizmo.last_pick, PickResult::AxisHandle { .. }) || scale_gizmo.dragger.is_dragging() {
        return;
    }
    if pointer_over_ui(&mut contexts) {
        return;
    }
    let Some((ray, _)) = cursor_ray(&window_query, &camera_query) else {
        return;
    };

    let hit = spatial_query
        .cast_ray(ray.origin, ray.direction, SELECTION_RAY_LENGTH, true, &SpatialQueryFilter::default())
        .and_then(|hit| find_selectable_ancestor(hit.entity, &scene_entities, &prefab_query.parents));
    let double_click = hit.is_some_and(|e| clicks.register(e, time.elapsed_secs()));

    let owner = hit.and_then(|member| {
        find_prefab_root(member, &prefab_query.prefabs, &prefab_query.parents).map(|prefab| (member, prefab))
    });
    if let Some((member, prefab)) = owner {
        let only_prefab_selected = selected.iter().eq([prefab]);
        let action = resolve_prefab_click(double_click, selection_state.toggle_member, only_prefab_selected);
        debug!("Prefab click on {:?} in {:?}: {:?}", member, prefab, action);
        match action {
            PrefabClick::SelectRoot { exclusive } => {
                if exclusive {
                    for other in selected.iter().filter(|&e| e != prefab) {
                        commands.entity(other).remove::<Selected>();
                    }
                }
                commands.entity(prefab).insert(Selected);
                return;
            }
            PrefabClick::ToggleMember => {
                commands.entity(prefab).remove::<Selected>();
                if selected.contains(member) {
                    commands.entity(member).remove::<Selected>();
                } else {
                    commands.entity(member).insert(Selected);
                }
                return;
            }
            PrefabClick::SelectMembers => {
                commands.entity(prefab).remove::<Selected>();
                for entity in prefab_members(prefab, &prefab_query.children, &prefab_query.meshes) {
                    commands.entity(entity).insert(Selected);
                }
                return;
            }
            PrefabClick::Plain => {
                commands.entity(prefab).remove::<Selected>();
            }
        }
    }

    let already_selected = hit.is_some_and(|e| selected.contains(e));
    match resolve_click(hit, selection_state.multi_select, already_selected) {
        SelectionChange::Replace(entity) => {
            for other in selected.iter().filter(|&e| e != entity) {
                commands.entity(other).remove::<Selected>();
            }
            commands.entity(entity).insert(Selected);
        }
        SelectionChange::Add(entity) => {
            commands.entity(entity).insert(Selected);
        }
        SelectionChange::Remove(entity) => {
            commands.entity(entity).remove::<Selected>();
        }
        SelectionChange::Clear => {
            for entity in selected.iter() {
                commands.entity(entity).remove::<Selected>();
            }
        }
        SelectionChange::Keep => {}
    }
}

/// Hierarchy lookups for prefab-aware clicks
#[derive(SystemParam)]
struct PrefabQueries<'w, 's> {
    prefabs: Query<'w, 's, (), With<PrefabRoot>>,
    parents: Query<'w, 's, &'static ChildOf>,
    children: Query<'w, 's, &'static Children>,
    meshes: Query<'w, 's, (), With<Collider>>,
}

/// The hit entity itself, or the nearest ancestor marked [`SceneEntity`]
fn find_selectable_ancestor(
    entity: Entity,
    scene_entities: &Query<(), With<SceneEntity>>,
    parents: &Query<&ChildOf>,
) -> Option<Entity> {
    let mut current = entity;
    loop {
        if scene_entities.contains(current) {
            return Some(current);
        }
        current = parents.get(current).ok()?.parent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_resolution() {
        let mut world = World::new();
        let e = world.spawn_empty().id();

        assert_eq!(resolve_click(Some(e), false, true), SelectionChange::Replace(e));
        assert_eq!(resolve_click(Some(e), true, false), SelectionChange::Add(e));
        assert_eq!(resolve_click(Some(e), true, true), SelectionChange::Remove(e));
        assert_eq!(resolve_click(None, false, false), SelectionChange::Clear);
        assert_eq!(resolve_click(None, true, false), SelectionChange::Keep);
    }

    #[test]
    fn prefab_click_resolution() {
        // Double-click takes the root; Ctrl keeps the rest of the selection
        assert_eq!(resolve_prefab_click(true, false, false), PrefabClick::SelectRoot { exclusive: true });
        assert_eq!(resolve_prefab_click(true, true, true), PrefabClick::SelectRoot { exclusive: false });
        assert_eq!(resolve_prefab_click(false, true, true), PrefabClick::ToggleMember);
        assert_eq!(resolve_prefab_click(false, false, true), PrefabClick::SelectMembers);
        assert_eq!(resolve_prefab_click(false, false, false), PrefabClick::Plain);
    }

    #[test]
    fn double_click_needs_same_entity_in_time() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut clicks = ClickTracker::default();

        assert!(!clicks.register(a, 1.0));
        assert!(clicks.register(a, 1.2));
        // A third quick click starts a new pair
        assert!(!clicks.register(a, 1.3));

        assert!(!clicks.register(b, 1.4));
        assert!(!clicks.register(a, 1.5));
        assert!(!clicks.register(a, 1.5 + DOUBLE_CLICK_SECS + 0.1));
    }
}
