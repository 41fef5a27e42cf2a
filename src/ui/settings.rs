use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::editor::EditorState;
use crate::gizmos::{BracketStyle, DragMode};

/// Errors reading or writing the settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is malformed: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}

/// Scale gizmo settings that persist to disk
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GizmoSettings {
    /// Drag mode used when the editor starts
    #[serde(default)]
    pub default_mode: DragMode,
    /// Shaft length of wrap-mode handles
    #[serde(default = "default_wrap_handle_length")]
    pub wrap_handle_length: f32,
    /// Shaft length of center-mode handles
    #[serde(default = "default_center_handle_length")]
    pub center_handle_length: f32,
    /// Edge of the cube head / height of the cone head
    #[serde(default = "default_handle_head_size")]
    pub handle_head_size: f32,
    /// Base pick radius around a handle shaft
    #[serde(default = "default_click_radius")]
    pub click_radius: f32,
    #[serde(default = "default_wrap_color")]
    pub wrap_color: [f32; 3],
    #[serde(default = "default_center_color")]
    pub center_color: [f32; 3],
    /// Color of the grasped handle
    #[serde(default = "default_active_color")]
    pub active_color: [f32; 3],
    /// Bracket line length as a fraction of the shortest box edge
    #[serde(default = "default_bracket_offset_factor")]
    pub bracket_offset_factor: f32,
    /// Outward push of bracket corners as a fraction of the line length
    #[serde(default = "default_bracket_padding_factor")]
    pub bracket_padding_factor: f32,
    #[serde(default = "default_single_bracket_color")]
    pub single_bracket_color: [f32; 3],
    #[serde(default = "default_group_bracket_color")]
    pub group_bracket_color: [f32; 3],
    #[serde(default = "default_group_bracket_thickness")]
    pub group_bracket_thickness: f32,
    #[serde(default = "default_single_bracket_color")]
    pub prefab_bracket_color: [f32; 3],
    /// Prefab that will receive the selection on release
    #[serde(default = "default_active_color")]
    pub prefab_attach_color: [f32; 3],
    #[serde(default = "default_prefab_bracket_thickness")]
    pub prefab_bracket_thickness: f32,
    /// Show the drag status window
    #[serde(default = "default_show_hud")]
    pub show_hud: bool,
}

fn default_wrap_handle_length() -> f32 {
    0.4
}

fn default_center_handle_length() -> f32 {
    0.6
}

fn default_handle_head_size() -> f32 {
    0.08
}

fn default_click_radius() -> f32 {
    0.08
}

fn default_wrap_color() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_center_color() -> [f32; 3] {
    [0.0, 0.0, 1.0]
}

fn default_active_color() -> [f32; 3] {
    [1.0, 1.0, 0.0]
}

fn default_bracket_offset_factor() -> f32 {
    0.2
}

fn default_bracket_padding_factor() -> f32 {
    0.08
}

fn default_single_bracket_color() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_group_bracket_color() -> [f32; 3] {
    [0.0, 0.5, 0.0]
}

fn default_group_bracket_thickness() -> f32 {
    8.0
}

fn default_prefab_bracket_thickness() -> f32 {
    10.0
}

fn default_show_hud() -> bool {
    true
}

impl Default for GizmoSettings {
    fn default() -> Self {
        Self {
            default_mode: DragMode::Wrap,
            wrap_handle_length: default_wrap_handle_length(),
            center_handle_length: default_center_handle_length(),
            handle_head_size: default_handle_head_size(),
            click_radius: default_click_radius(),
            wrap_color: default_wrap_color(),
            center_color: default_center_color(),
            active_color: default_active_color(),
            bracket_offset_factor: default_bracket_offset_factor(),
            bracket_padding_factor: default_bracket_padding_factor(),
            single_bracket_color: default_single_bracket_color(),
            group_bracket_color: default_group_bracket_color(),
            group_bracket_thickness: default_group_bracket_thickness(),
            prefab_bracket_color: default_single_bracket_color(),
            prefab_attach_color: default_active_color(),
            prefab_bracket_thickness: default_prefab_bracket_thickness(),
            show_hud: default_show_hud(),
        }
    }
}

pub fn rgb([r, g, b]: [f32; 3]) -> Color {
    Color::srgb(r, g, b)
}

impl GizmoSettings {
    pub fn single_bracket_style(&self) -> BracketStyle {
        BracketStyle {
            color: rgb(self.single_bracket_color),
            thickness: 0.0,
        }
    }

    pub fn group_bracket_style(&self) -> BracketStyle {
        BracketStyle {
            color: rgb(self.group_bracket_color),
            thickness: self.group_bracket_thickness,
        }
    }

    pub fn prefab_bracket_style(&self, attach_candidate: bool) -> BracketStyle {
        let color = if attach_candidate {
            self.prefab_attach_color
        } else {
            self.prefab_bracket_color
        };
        BracketStyle {
            color: rgb(color),
            thickness: self.prefab_bracket_thickness,
        }
    }

    /// Get the settings file path
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("bevy_scale_gizmo");
            p.push("settings.ron");
            p
        })
    }

    pub fn from_ron(content: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(content)?)
    }

    pub fn to_ron(&self) -> Result<String, SettingsError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        Self::from_ron(&fs::read_to_string(path)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Load settings from disk, or return defaults if missing or malformed
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(SettingsError::Io(_)) => Self::default(),
            Err(e) => {
                warn!("Ignoring gizmo settings at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::file_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_logged(&self) {
        match self.save() {
            Ok(path) => info!("Gizmo settings saved to: {:?}", path),
            Err(e) => error!("Failed to save gizmo settings: {}", e),
        }
    }
}

/// Resource to track if the settings window is open
#[derive(Resource, Default)]
pub struct SettingsWindowState {
    pub open: bool,
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        // Tests and embedding apps may insert their own settings first
        if !app.world().contains_resource::<GizmoSettings>() {
            app.insert_resource(GizmoSettings::load());
        }
        app.init_resource::<SettingsWindowState>()
            .add_systems(Update, toggle_settings_window)
            .add_systems(EguiPrimaryContextPass, draw_settings_window);
    }
}

/// F2 opens the settings window
fn toggle_settings_window(keyboard: Res<ButtonInput<KeyCode>>, mut window_state: ResMut<SettingsWindowState>) {
    if keyboard.just_pressed(KeyCode::F2) {
        window_state.open = !window_state.open;
    }
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut [f32; 3]) -> bool {
    ui.label(label);
    let changed = ui.color_edit_button_rgb(color).changed();
    ui.end_row();
    changed
}

/// Draw the settings window
fn draw_settings_window(
    mut contexts: EguiContexts,
    mut settings: ResMut<GizmoSettings>,
    mut window_state: ResMut<SettingsWindowState>,
    editor_state: Res<EditorState>,
) -> Result {
    if !editor_state.editor_active || !window_state.open {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;
    let mut changed = false;

    egui::Window::new("Scale Gizmo Settings")
        .open(&mut window_state.open)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Handles");
            egui::Grid::new("scale_gizmo_handles_grid")
                .num_columns(2)
                .spacing([10.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Wrap length:");
                    changed |= ui
                        .add(egui::Slider::new(&mut settings.wrap_handle_length, 0.1..=2.0).step_by(0.05))
                        .changed();
                    ui.end_row();

                    ui.label("Center length:");
                    changed |= ui
                        .add(egui::Slider::new(&mut settings.center_handle_length, 0.1..=2.0).step_by(0.05))
                        .changed();
                    ui.end_row();

                    ui.label("Head size:");
                    changed |= ui
                        .add(egui::Slider::new(&mut settings.handle_head_size, 0.02..=0.3).step_by(0.01))
                        .changed();
                    ui.end_row();

                    ui.label("Click radius:");
                    changed |= ui
                        .add(egui::Slider::new(&mut settings.click_radius, 0.02..=0.3).step_by(0.01))
                        .changed();
                    ui.end_row();

                    changed |= color_row(ui, "Wrap color:", &mut settings.wrap_color);
                    changed |= color_row(ui, "Center color:", &mut settings.center_color);
                    changed |= color_row(ui, "Active color:", &mut settings.active_color);
                });

            ui.add_space(8.0);
            ui.separator();
            ui.add_space(4.0);

            ui.heading("Brackets");
            egui::Grid::new("scale_gizmo_brackets_grid")
                .num_columns(2)
                .spacing([10.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Length factor:");
                    changed |= ui
                        .add(egui::Slider::new(&mut settings.bracket_offset_factor, 0.05..=0.5).step_by(0.01))
                        .changed();
                    ui.end_row();

                    changed |= color_row(ui, "Mesh:", &mut settings.single_bracket_color);
                    changed |= color_row(ui, "Group:", &mut settings.group_bracket_color);
                    changed |= color_row(ui, "Prefab:", &mut settings.prefab_bracket_color);
                    changed |= color_row(ui, "Attach target:", &mut settings.prefab_attach_color);

                    ui.label("Show status:");
                    changed |= ui.checkbox(&mut settings.show_hud, "").changed();
                    ui.end_row();
                });
        });

    if changed {
        settings.save_logged();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ron_round_trip_keeps_values() {
        let settings = GizmoSettings {
            default_mode: DragMode::Center,
            wrap_handle_length: 1.5,
            prefab_attach_color: [1.0, 0.5, 0.0],
            ..default()
        };
        let text = settings.to_ron().unwrap();
        assert_eq!(GizmoSettings::from_ron(&text).unwrap(), settings);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings = GizmoSettings::from_ron("(default_mode: Center, click_radius: 0.2)").unwrap();
        assert_eq!(settings.default_mode, DragMode::Center);
        assert_eq!(settings.click_radius, 0.2);
        assert_eq!(settings.wrap_handle_length, default_wrap_handle_length());
        assert_eq!(settings.group_bracket_color, [0.0, 0.5, 0.0]);
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let err = GizmoSettings::from_ron("(default_mode: Sideways)").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn save_and_load_through_file() {
        let dir = std::env::temp_dir().join(format!("bevy_scale_gizmo_test_{}", std::process::id()));
        let path = dir.join("settings.ron");
        let settings = GizmoSettings {
            show_hud: false,
            ..default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(GizmoSettings::load_from(&path).unwrap(), settings);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn prefab_style_highlights_attach_candidate() {
        let settings = GizmoSettings::default();
        assert_eq!(settings.prefab_bracket_style(true).color, Color::srgb(1.0, 1.0, 0.0));
        assert_eq!(settings.prefab_bracket_style(false).color, Color::srgb(0.0, 1.0, 0.0));
        assert_eq!(settings.single_bracket_style().thickness, 0.0);
    }
}
