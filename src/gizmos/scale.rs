use std::collections::HashMap;

use avian3d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::gizmos::config::GizmoConfigStore;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use super::dragger::{AxisDragger, DragOutcome, InstanceRegistry};
use super::picking::{PickResult, pick_handle};
use super::projector::CursorRay;
use super::render::{BevyGizmoSink, BracketGizmoGroup, HandleColors, ScaleGizmoGroup, draw_dragger, handle_draws};
use crate::commands::{CommandHistory, DragTransaction, TransactionBegun, TransactionEnded};
use crate::constants::history::DRAG_TRANSACTION;
use crate::constants::keys::{PREFAB_ATTACH, TOGGLE_DRAG_MODE};
use crate::editor::{EditorCamera, EditorState};
use crate::scene::{Locked, SceneEntity};
use crate::selection::Selected;
use crate::ui::GizmoSettings;
use crate::utils::{collider_local_bounds, cursor_ray, pointer_over_ui, should_process_input};

/// Ordering of the scale gizmo systems within a frame
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScaleGizmoSet {
    /// Selection to target, anchor refresh
    Sync,
    /// Handle hit test on press
    Pick,
    /// Per-frame drag
    Drag,
}

/// Scale gizmo state for the editor
#[derive(Resource, Default)]
pub struct ScaleGizmo {
    pub dragger: AxisDragger<Entity>,
    /// Result of the most recent left-button press
    pub last_pick: PickResult,
    pub last_outcome: Option<DragOutcome>,
}

pub struct ScaleGizmoPlugin;

impl Plugin for ScaleGizmoPlugin {
    fn build(&self, app: &mut App) {
        let mode = app
            .world()
            .get_resource::<GizmoSettings>()
            .map(|s| s.default_mode)
            .unwrap_or_default();

        app.insert_resource(ScaleGizmo {
            dragger: AxisDragger::new(mode),
            ..default()
        })
        .init_gizmo_group::<ScaleGizmoGroup>()
        .init_gizmo_group::<BracketGizmoGroup>()
        .configure_sets(Update, (ScaleGizmoSet::Sync, ScaleGizmoSet::Pick, ScaleGizmoSet::Drag).chain())
        .add_systems(Update, (sync_scale_targets, toggle_drag_mode).chain().in_set(ScaleGizmoSet::Sync))
        .add_systems(Update, handle_scale_handle_press.in_set(ScaleGizmoSet::Pick))
        .add_systems(Update, drive_scale_drag.in_set(ScaleGizmoSet::Drag))
        .add_systems(Update, (configure_scale_gizmo_lines, draw_scale_gizmo).after(ScaleGizmoSet::Drag));
    }
}

/// [`InstanceRegistry`] over scene entities with colliders.
///
/// World transforms written during a frame are kept in an overlay, since
/// `GlobalTransform` is only propagated later in the frame.
#[derive(SystemParam)]
pub struct SceneRegistry<'w, 's> {
    instances: Query<'w, 's, (&'static mut Transform, &'static Collider), (With<SceneEntity>, Without<Locked>)>,
    globals: Query<'w, 's, (&'static GlobalTransform, Option<&'static ChildOf>)>,
}

/// Overlay view used by systems; the overlay lives only for one system run
pub struct SceneRegistryView<'a, 'w, 's> {
    params: &'a mut SceneRegistry<'w, 's>,
    written: HashMap<Entity, Transform>,
}

impl<'w, 's> SceneRegistry<'w, 's> {
    pub fn view(&mut self) -> SceneRegistryView<'_, 'w, 's> {
        SceneRegistryView {
            params: self,
            written: HashMap::new(),
        }
    }
}

impl SceneRegistryView<'_, '_, '_> {
    fn parent_global(&self, entity: Entity) -> Option<GlobalTransform> {
        let (_, child_of) = self.params.globals.get(entity).ok()?;
        let parent = child_of?.parent();
        self.params.globals.get(parent).ok().map(|(g, _)| *g)
    }

    /// Current local transforms of `handles`, for transaction records
    pub fn local_transforms(&self, handles: &[Entity]) -> Vec<(Entity, Transform)> {
        handles
            .iter()
            .filter_map(|&e| self.params.instances.get(e).ok().map(|(t, _)| (e, *t)))
            .collect()
    }
}

impl InstanceRegistry<Entity> for SceneRegistryView<'_, '_, '_> {
    fn world_transform(&self, handle: Entity) -> Option<Transform> {
        if let Some(t) = self.written.get(&handle) {
            return Some(*t);
        }
        let (local, _) = self.params.instances.get(handle).ok()?;
        Some(match self.parent_global(handle) {
            Some(parent) => parent.mul_transform(*local).compute_transform(),
            None => *local,
        })
    }

    fn set_world_transform(&mut self, handle: Entity, transform: Transform) -> bool {
        let local = match self.parent_global(handle) {
            Some(parent) => GlobalTransform::from(transform).reparented_to(&parent),
            None => transform,
        };
        let Ok((mut current, _)) = self.params.instances.get_mut(handle) else {
            return false;
        };
        *current = local;
        self.written.insert(handle, transform);
        true
    }

    fn local_bounds(&self, handle: Entity) -> Option<(Vec3, Vec3)> {
        let (_, collider) = self.params.instances.get(handle).ok()?;
        Some(collider_local_bounds(collider))
    }
}

/// Reduce the selection to a drag target and refresh its anchors
fn sync_scale_targets(
    mut gizmo: ResMut<ScaleGizmo>,
    selected: Query<Entity, (With<Selected>, With<Collider>, With<SceneEntity>, Without<Locked>)>,
    mut registry: SceneRegistry,
) {
    let mut handles: Vec<Entity> = selected.iter().collect();
    handles.sort();
    gizmo.dragger.set_targets(&handles);

    if gizmo.dragger.target().is_none() || gizmo.dragger.is_dragging() {
        return;
    }
    if let Err(e) = gizmo.dragger.refresh_anchors(&registry.view()) {
        debug!("Scale anchors unavailable: {}", e);
    }
}

/// T toggles wrap/center while no handle is held
fn toggle_drag_mode(
    keyboard: Res<ButtonInput<KeyCode>>,
    editor_state: Res<EditorState>,
    mut gizmo: ResMut<ScaleGizmo>,
    mut settings: ResMut<GizmoSettings>,
    mut contexts: EguiContexts,
) {
    if !keyboard.just_pressed(TOGGLE_DRAG_MODE) || !should_process_input(&editor_state, &mut contexts) {
        return;
    }
    if !gizmo.dragger.toggle_mode() {
        return;
    }

    let mode = gizmo.dragger.mode();
    info!("Drag mode: {}", mode.label());
    settings.default_mode = mode;
    settings.save_logged();
}

/// Grasp a handle on left press, remembering the pick so selection can skip it
fn handle_scale_handle_press(
    mouse_button: Res<ButtonInput<MouseButton>>,
    editor_state: Res<EditorState>,
    settings: Res<GizmoSettings>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
    mut gizmo: ResMut<ScaleGizmo>,
    mut contexts: EguiContexts,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    gizmo.last_pick = PickResult::None;

    if !editor_state.editor_active || pointer_over_ui(&mut contexts) {
        gizmo.last_pick = PickResult::Other;
        return;
    }
    if gizmo.dragger.target().is_none() || !gizmo.dragger.anchors().is_ready() {
        return;
    }
    let Some((ray, _)) = cursor_ray(&window_query, &camera_query) else {
        return;
    };

    let handles = handle_draws(&gizmo.dragger, &settings);
    let pick = pick_handle(ray.origin, *ray.direction, &handles, settings.click_radius);
    if let PickResult::AxisHandle { axis, flipped } = pick {
        debug!("Grasped {} handle (flipped: {})", axis.label(), flipped);
        gizmo.dragger.grasp(axis, flipped);
    }
    gizmo.last_pick = pick;
}

/// Drive the grasped handle and bracket the gesture in a transaction
#[allow(clippy::too_many_arguments)]
fn drive_scale_drag(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
    mut gizmo: ResMut<ScaleGizmo>,
    mut registry: SceneRegistry,
    mut transaction: ResMut<DragTransaction>,
    mut history: ResMut<CommandHistory>,
    mut begun: MessageWriter<TransactionBegun>,
    mut ended: MessageWriter<TransactionEnded>,
) {
    if !gizmo.dragger.is_dragging() {
        return;
    }

    let mut view = registry.view();
    let handles = gizmo.dragger.target().map(|t| t.handles()).unwrap_or_default();

    if !mouse_button.pressed(MouseButton::Left) {
        gizmo.dragger.release();
        gizmo.last_outcome = None;
        end_drag_transaction(&mut transaction, &mut history, &mut ended, view.local_transforms(&handles));
        return;
    }

    // Attach mode moves the meshes itself; re-latch once it lets go
    if keyboard.pressed(PREFAB_ATTACH) {
        gizmo.dragger.reset_offset();
        return;
    }

    let Some((ray, camera_transform)) = cursor_ray(&window_query, &camera_query) else {
        return;
    };
    let cursor = CursorRay::from_camera(ray, &camera_transform);

    let before = view.local_transforms(&handles);
    let outcome = gizmo.dragger.drag(&mut view, &cursor);

    match outcome {
        DragOutcome::Applied(_) | DragOutcome::Degenerate if !transaction.is_open() => {
            if transaction.begin(DRAG_TRANSACTION, before) {
                begun.write(TransactionBegun {
                    description: DRAG_TRANSACTION.to_string(),
                });
            }
        }
        DragOutcome::TargetLost => {
            warn!("Scale target lost mid-drag, releasing");
            gizmo.dragger.release();
            end_drag_transaction(&mut transaction, &mut history, &mut ended, view.local_transforms(&handles));
        }
        _ => {}
    }

    if let DragOutcome::Applied(factor) = outcome {
        debug!("Scale factor {:?}", factor);
    }
    gizmo.last_outcome = Some(outcome);
}

fn end_drag_transaction(
    transaction: &mut DragTransaction,
    history: &mut CommandHistory,
    ended: &mut MessageWriter<TransactionEnded>,
    after: Vec<(Entity, Transform)>,
) {
    if transaction.description() != Some(DRAG_TRANSACTION) {
        return;
    }
    if let Some(record) = transaction.end(after, history) {
        ended.write(record);
    }
}

/// Keep gizmo line widths in sync with the settings
fn configure_scale_gizmo_lines(settings: Res<GizmoSettings>, mut config_store: ResMut<GizmoConfigStore>) {
    if !settings.is_changed() {
        return;
    }
    let (config, _) = config_store.config_mut::<ScaleGizmoGroup>();
    config.line.width = 3.0;
    config.depth_bias = -1.0;

    let (config, _) = config_store.config_mut::<BracketGizmoGroup>();
    config.line.width = settings.group_bracket_thickness.max(settings.prefab_bracket_thickness);
}

fn draw_scale_gizmo(
    mut gizmos: Gizmos<ScaleGizmoGroup>,
    mut brackets: Gizmos<BracketGizmoGroup>,
    gizmo: Res<ScaleGizmo>,
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
    draw_dragger(&mut sink, &gizmo.dragger, &settings);
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::SystemState;

    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn registry_round_trips_through_parent_space() {
        let mut world = World::new();
        let parent_transform = Transform::from_xyz(10.0, 0.0, 0.0).with_scale(Vec3::splat(2.0));
        let parent = world
            .spawn((parent_transform, GlobalTransform::from(parent_transform)))
            .id();
        let local = Transform::from_xyz(1.0, 0.0, 0.0);
        let child = world
            .spawn((
                SceneEntity,
                Collider::cuboid(1.0, 1.0, 1.0),
                local,
                GlobalTransform::from(parent_transform).mul_transform(local),
                ChildOf(parent),
            ))
            .id();

        let mut state: SystemState<SceneRegistry> = SystemState::new(&mut world);
        let mut registry = state.get_mut(&mut world);
        let mut view = registry.view();

        let world_t = view.world_transform(child).unwrap();
        assert!(approx(world_t.translation, Vec3::new(12.0, 0.0, 0.0)));
        assert!(approx(world_t.scale, Vec3::splat(2.0)));

        let mut target = world_t;
        target.translation = Vec3::new(14.0, 0.0, 0.0);
        assert!(view.set_world_transform(child, target));
        // Overlay answers before transforms propagate
        assert!(approx(view.world_transform(child).unwrap().translation, target.translation));

        let written = view.local_transforms(&[child]);
        assert!(approx(written[0].1.translation, Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn registry_ignores_locked_and_missing() {
        let mut world = World::new();
        let locked = world
            .spawn((SceneEntity, Locked, Collider::cuboid(1.0, 1.0, 1.0), Transform::IDENTITY))
            .id();
        let gone = world.spawn_empty().id();
        world.despawn(gone);

        let mut state: SystemState<SceneRegistry> = SystemState::new(&mut world);
        let mut registry = state.get_mut(&mut world);
        let mut view = registry.view();

        assert!(view.world_transform(locked).is_none());
        assert!(view.local_bounds(gone).is_none());
        assert!(!view.set_world_transform(gone, Transform::IDENTITY));
    }
}
