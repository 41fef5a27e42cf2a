use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

use crate::commands::CommandHistory;
use crate::editor::EditorState;
use crate::gizmos::{AxisId, DragOutcome, ScaleGizmo, SceneRegistry};
use crate::prefabs::PrefabAttachState;

use super::GizmoSettings;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, draw_scale_hud);
    }
}

fn outcome_label(outcome: Option<DragOutcome>) -> String {
    match outcome {
        None | Some(DragOutcome::Idle) => "-".to_string(),
        Some(DragOutcome::NotReady) => "Not ready".to_string(),
        Some(DragOutcome::Degenerate) => "Perpendicular".to_string(),
        Some(DragOutcome::TargetLost) => "Target lost".to_string(),
        Some(DragOutcome::Applied(f)) => format!("x{:.3} y{:.3} z{:.3}", f.x, f.y, f.z),
    }
}

/// Small status window for the scale gizmo
fn draw_scale_hud(
    mut contexts: EguiContexts,
    gizmo: Res<ScaleGizmo>,
    attach: Res<PrefabAttachState>,
    history: Res<CommandHistory>,
    settings: Res<GizmoSettings>,
    editor_state: Res<EditorState>,
    mut registry: SceneRegistry,
) -> Result {
    if !editor_state.editor_active || !settings.show_hud {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;
    let dragger = &gizmo.dragger;

    let target = match dragger.target() {
        None => "None".to_string(),
        Some(t) if t.is_group() => format!("Group ({})", t.handles().len()),
        Some(_) => "Single".to_string(),
    };
    let axis = match dragger.session().active_axis {
        AxisId::None => "-".to_string(),
        axis if dragger.session().axis_flipped => format!("-{}", axis.label()),
        axis => format!("+{}", axis.label()),
    };
    let pivot = dragger
        .expected_pivot(&registry.view())
        .map(|p| format!("({:.2}, {:.2}, {:.2})", p.x, p.y, p.z))
        .unwrap_or_else(|| "-".to_string());

    egui::Window::new("Scale")
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .anchor(egui::Align2::LEFT_BOTTOM, [10.0, -10.0])
        .show(ctx, |ui| {
            egui::Grid::new("scale_hud_grid").num_columns(2).show(ui, |ui| {
                ui.label("Mode:");
                ui.strong(dragger.mode().label());
                ui.end_row();

                ui.label("Target:");
                ui.label(target);
                ui.end_row();

                ui.label("Axis:");
                ui.label(axis);
                ui.end_row();

                ui.label("Pivot:");
                ui.label(pivot);
                ui.end_row();

                ui.label("Last:");
                ui.label(outcome_label(gizmo.last_outcome));
                ui.end_row();

                if attach.is_active() {
                    ui.label("Attach:");
                    ui.colored_label(egui::Color32::YELLOW, format!("{} mesh(es)", attach.moving.len()));
                    ui.end_row();
                }

                ui.label("History:");
                ui.label(match history.last_description() {
                    Some(last) => format!("{} ({})", history.len(), last),
                    None => "0".to_string(),
                });
                ui.end_row();
            });
            ui.weak("T: toggle mode  B: attach  F2: settings");
        });

    Ok(())
}
