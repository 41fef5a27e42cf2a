use bevy::prelude::*;
use bevy_egui::EguiContexts;

use super::state::{ToggleEditorEvent, TogglePreviewModeEvent};

pub struct EditorInputPlugin;

impl Plugin for EditorInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, handle_editor_shortcuts);
    }
}

/// F10 toggles the editor, F9 toggles preview mode
fn handle_editor_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut editor_events: MessageWriter<ToggleEditorEvent>,
    mut preview_events: MessageWriter<TogglePreviewModeEvent>,
    mut contexts: EguiContexts,
) {
    // Don't handle shortcuts when UI wants keyboard input
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.wants_keyboard_input() {
            return;
        }
    }

    if keyboard.just_pressed(KeyCode::F10) {
        editor_events.write(ToggleEditorEvent);
    }
    if keyboard.just_pressed(KeyCode::F9) {
        preview_events.write(TogglePreviewModeEvent);
    }
}
