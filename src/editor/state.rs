use avian3d::debug_render::PhysicsGizmos;
use bevy::gizmos::config::GizmoConfigStore;
use bevy::prelude::*;
use bevy_infinite_grid::InfiniteGridSettings;

/// Editor-wide state resource
#[derive(Debug, Resource)]
pub struct EditorState {
    /// Whether the editor is active (F10 to toggle)
    /// When false, all UI, hotkeys and gizmo input are disabled
    pub editor_active: bool,
    /// Whether gizmos are visible
    pub gizmos_visible: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            editor_active: true,
            gizmos_visible: true,
        }
    }
}

/// Event to toggle preview mode (hides all gizmos and debug rendering)
#[derive(Message)]
pub struct TogglePreviewModeEvent;

/// Event to toggle the editor on/off (F10)
#[derive(Message)]
pub struct ToggleEditorEvent;

pub struct EditorStatePlugin;

impl Plugin for EditorStatePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditorState>()
            .add_message::<TogglePreviewModeEvent>()
            .add_message::<ToggleEditorEvent>()
            .add_systems(Update, (handle_toggle_preview_mode, handle_toggle_editor));
    }
}

fn set_debug_visuals(
    visible: bool,
    gizmo_config: &mut GizmoConfigStore,
    grids: &mut Query<&mut Visibility, With<InfiniteGridSettings>>,
) {
    let physics_config = gizmo_config.config_mut::<PhysicsGizmos>().0;
    physics_config.enabled = visible;

    for mut visibility in grids.iter_mut() {
        *visibility = if visible { Visibility::Visible } else { Visibility::Hidden };
    }
}

/// Handle toggling preview mode
fn handle_toggle_preview_mode(
    mut events: MessageReader<TogglePreviewModeEvent>,
    mut editor_state: ResMut<EditorState>,
    mut gizmo_config: ResMut<GizmoConfigStore>,
    mut grids: Query<&mut Visibility, With<InfiniteGridSettings>>,
) {
    for _ in events.read() {
        editor_state.gizmos_visible = !editor_state.gizmos_visible;
        set_debug_visuals(editor_state.gizmos_visible, &mut gizmo_config, &mut grids);

        info!(
            "Preview mode: {}",
            if editor_state.gizmos_visible { "OFF" } else { "ON" }
        );
    }
}

/// Handle toggling the editor on/off
fn handle_toggle_editor(
    mut events: MessageReader<ToggleEditorEvent>,
    mut editor_state: ResMut<EditorState>,
    mut gizmo_config: ResMut<GizmoConfigStore>,
    mut grids: Query<&mut Visibility, With<InfiniteGridSettings>>,
) {
    for _ in events.read() {
        editor_state.editor_active = !editor_state.editor_active;
        editor_state.gizmos_visible = editor_state.editor_active;
        set_debug_visuals(editor_state.editor_active, &mut gizmo_config, &mut grids);

        info!(
            "Editor: {}",
            if editor_state.editor_active { "ON" } else { "OFF" }
        );
    }
}

#[cfg(test)]
mod tests {
    use bevy::gizmos::config::GizmoConfig;

    use super::*;

    fn toggle_app() -> App {
        let mut store = GizmoConfigStore::default();
        store.insert(GizmoConfig::default(), PhysicsGizmos::default());

        let mut app = App::new();
        app.init_resource::<EditorState>()
            .insert_resource(store)
            .add_message::<ToggleEditorEvent>()
            .add_message::<TogglePreviewModeEvent>()
            .add_systems(Update, (handle_toggle_preview_mode, handle_toggle_editor));
        app
    }

    #[test]
    fn editor_toggle_hides_gizmos() {
        let mut app = toggle_app();
        app.world_mut().write_message(ToggleEditorEvent);
        app.update();

        let state = app.world().resource::<EditorState>();
        assert!(!state.editor_active);
        assert!(!state.gizmos_visible);
    }

    #[test]
    fn preview_mode_keeps_editor_active() {
        let mut app = toggle_app();
        app.world_mut().write_message(TogglePreviewModeEvent);
        app.update();

        let state = app.world().resource::<EditorState>();
        assert!(state.editor_active);
        assert!(!state.gizmos_visible);
    }
}
