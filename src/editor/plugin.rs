use avian3d::debug_render::PhysicsDebugPlugin;
use avian3d::prelude::{Physics, PhysicsPlugins};
use avian3d::schedule::PhysicsTime;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use super::camera::EditorCameraPlugin;
use super::input::EditorInputPlugin;
use super::state::EditorStatePlugin;
use crate::commands::CommandsPlugin;
use crate::gizmos::EditorGizmosPlugin;
use crate::prefabs::PrefabsPlugin;
use crate::scene::ScenePlugin;
use crate::selection::SelectionPlugin;
use crate::ui::UiPlugin;

/// Main editor plugin that bundles the scale gizmo with a minimal editor shell
pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((EguiPlugin::default(), PhysicsPlugins::default(), PhysicsDebugPlugin))
            .add_plugins((EditorStatePlugin, EditorInputPlugin, EditorCameraPlugin, CommandsPlugin, ScenePlugin))
            // GizmoSettings must exist before the gizmo plugin builds
            .add_plugins((UiPlugin, EditorGizmosPlugin, SelectionPlugin, PrefabsPlugin))
            .add_systems(Startup, prepare_editor_view);
    }
}

/// Light the view and freeze the simulation; colliders only serve picking and bounds
fn prepare_editor_view(mut commands: Commands, mut physics_time: ResMut<Time<Physics>>) {
    commands.spawn(AmbientLight {
        brightness: 300.0,
        ..default()
    });
    physics_time.set_relative_speed(0.0);
    info!("Editor view ready, physics paused");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_view_pauses_physics() {
        let mut app = App::new();
        app.insert_resource(Time::<Physics>::default())
            .add_systems(Startup, prepare_editor_view);
        app.update();

        assert_eq!(app.world().resource::<Time<Physics>>().relative_speed(), 0.0);
        let lights = app
            .world_mut()
            .query::<&AmbientLight>()
            .iter(app.world())
            .count();
        assert_eq!(lights, 1);
    }
}
