//! Draw requests for scale handles and selection brackets.
//!
//! The controller only produces [`HandleDraw`] values and bracket segments;
//! a [`RenderSink`] decides how they reach the screen.

use bevy::gizmos::config::GizmoConfigGroup;
use bevy::prelude::*;

use super::anchors::{AxisId, BracketBox};
use super::dragger::{AxisDragger, DragMode};
use crate::ui::{GizmoSettings, rgb};

/// Handle placement for wrap mode: axis and flip per anchor index
const WRAP_HANDLES: [(AxisId, bool); 6] = [
    (AxisId::Z, true),
    (AxisId::Z, false),
    (AxisId::X, true),
    (AxisId::X, false),
    (AxisId::Y, true),
    (AxisId::Y, false),
];

/// Edges between [`BracketBox::aabb_corners`] indices
const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0),
    (4, 5), (5, 6), (6, 7), (7, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

const DIR_X: [f32; 8] = [1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0];
const DIR_Y: [f32; 8] = [1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0];
const DIR_Z: [f32; 8] = [1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleHead {
    Cube,
    Cone,
}

/// Which material a handle is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleMaterial {
    Wrap,
    Center,
    Active,
}

/// One axis handle: a shaft from `origin` along `direction` with a head at the tip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleDraw {
    pub origin: Vec3,
    pub direction: Vec3,
    pub length: f32,
    pub head: HandleHead,
    pub head_size: f32,
    pub material: HandleMaterial,
    pub axis: AxisId,
    pub flipped: bool,
}

impl HandleDraw {
    pub fn tip(&self) -> Vec3 {
        self.origin + self.direction * self.length
    }
}

/// Bracket style for one kind of box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketStyle {
    pub color: Color,
    pub thickness: f32,
}

/// Host draw layer
pub trait RenderSink {
    fn handle(&mut self, handle: &HandleDraw);
    fn line(&mut self, start: Vec3, end: Vec3, color: Color, thickness: f32);
}

/// Handles for the dragger's current mode and target. Empty until anchors are ready.
pub fn handle_draws<H>(dragger: &AxisDragger<H>, settings: &GizmoSettings) -> Vec<HandleDraw> {
    let anchors = dragger.anchors();
    let Some(bracket) = dragger.bracket() else {
        return Vec::new();
    };
    if !anchors.is_ready() {
        return Vec::new();
    }

    let session = dragger.session();
    let material = |axis: AxisId, flipped: bool, idle: HandleMaterial| {
        if session.active_axis == axis && session.axis_flipped == flipped {
            HandleMaterial::Active
        } else {
            idle
        }
    };
    let direction = |axis: AxisId, flipped: bool| {
        let dir = axis.index().map(|i| bracket.axes[i]).unwrap_or(Vec3::ZERO);
        if flipped { -dir } else { dir }
    };

    match dragger.mode() {
        DragMode::Wrap => WRAP_HANDLES
            .iter()
            .zip(anchors.points())
            .map(|(&(axis, flipped), &origin)| HandleDraw {
                origin,
                direction: direction(axis, flipped),
                length: settings.wrap_handle_length,
                head: HandleHead::Cube,
                head_size: settings.handle_head_size,
                material: material(axis, flipped, HandleMaterial::Wrap),
                axis,
                flipped,
            })
            .collect(),
        DragMode::Center => [AxisId::X, AxisId::Y, AxisId::Z]
            .into_iter()
            .map(|axis| HandleDraw {
                origin: anchors.center(),
                direction: direction(axis, false),
                length: settings.center_handle_length,
                head: HandleHead::Cone,
                head_size: settings.handle_head_size,
                material: material(axis, false, HandleMaterial::Center),
                axis,
                flipped: false,
            })
            .collect(),
    }
}

/// Three short corner lines per box corner, pushed slightly outward
pub fn bracket_lines(bracket: &BracketBox, offset_factor: f32, padding_factor: f32) -> Vec<(Vec3, Vec3)> {
    let offset = bracket.min_edge_length() * offset_factor;
    let padding = offset * padding_factor;
    let [ax, ay, az] = bracket.axes;

    let mut lines = Vec::with_capacity(24);
    for (k, corner) in bracket.corners.iter().enumerate() {
        let (dx, dy, dz) = (ax * DIR_X[k], ay * DIR_Y[k], az * DIR_Z[k]);
        let start = *corner - (dx + dy + dz) * padding;
        lines.push((start, start + dx * offset));
        lines.push((start, start + dy * offset));
        lines.push((start, start + dz * offset));
    }
    lines
}

pub fn draw_bracket(sink: &mut impl RenderSink, bracket: &BracketBox, style: BracketStyle, settings: &GizmoSettings) {
    for (start, end) in bracket_lines(bracket, settings.bracket_offset_factor, settings.bracket_padding_factor) {
        sink.line(start, end, style.color, style.thickness);
    }
}

/// Emit everything the dragger shows: brackets first, then handles
pub fn draw_dragger<H>(sink: &mut impl RenderSink, dragger: &AxisDragger<H>, settings: &GizmoSettings) {
    let Some(target) = dragger.target() else {
        return;
    };

    if let super::dragger::DragTarget::Group { members } = target {
        for bracket in members.iter().filter_map(|m| m.bracket.as_ref()) {
            draw_bracket(sink, bracket, settings.single_bracket_style(), settings);
        }
        if let Some(bracket) = dragger.bracket() {
            draw_bracket(sink, bracket, settings.group_bracket_style(), settings);
        }
    } else if let Some(bracket) = dragger.bracket() {
        draw_bracket(sink, bracket, settings.single_bracket_style(), settings);
    }

    for handle in handle_draws(dragger, settings) {
        sink.handle(&handle);
    }
}

/// Handle and thin bracket lines
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct ScaleGizmoGroup;

/// Heavy bracket lines for groups and prefabs
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct BracketGizmoGroup;

/// [`RenderSink`] over Bevy immediate-mode gizmos
pub struct BevyGizmoSink<'a, 'w, 's, 'bw, 'bs> {
    pub gizmos: &'a mut Gizmos<'w, 's, ScaleGizmoGroup>,
    pub brackets: &'a mut Gizmos<'bw, 'bs, BracketGizmoGroup>,
    pub colors: HandleColors,
}

/// Resolved handle colors
#[derive(Debug, Clone, Copy)]
pub struct HandleColors {
    pub wrap: Color,
    pub center: Color,
    pub active: Color,
}

impl HandleColors {
    pub fn from_settings(settings: &GizmoSettings) -> Self {
        Self {
            wrap: rgb(settings.wrap_color),
            center: rgb(settings.center_color),
            active: rgb(settings.active_color),
        }
    }

    fn for_material(&self, material: HandleMaterial) -> Color {
        match material {
            HandleMaterial::Wrap => self.wrap,
            HandleMaterial::Center => self.center,
            HandleMaterial::Active => self.active,
        }
    }
}

impl RenderSink for BevyGizmoSink<'_, '_, '_, '_, '_> {
    fn handle(&mut self, handle: &HandleDraw) {
        let color = self.colors.for_material(handle.material);
        let tip = handle.tip();
        self.gizmos.line(handle.origin, tip, color);

        let dir = handle.direction.normalize_or_zero();
        let rotation = if dir == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            Quat::from_rotation_arc(Vec3::Z, dir)
        };

        match handle.head {
            HandleHead::Cube => {
                let half = handle.head_size * 0.5;
                let corners = BracketBox::aabb_corners(Vec3::splat(-half), Vec3::splat(half))
                    .map(|c| tip + rotation * c);
                for (a, b) in CUBE_EDGES {
                    self.gizmos.line(corners[a], corners[b], color);
                }
            }
            HandleHead::Cone => {
                let apex = tip + dir * handle.head_size * 2.0;
                let radius = handle.head_size * 0.5;
                self.gizmos.circle(Isometry3d::new(tip, rotation), radius, color);
                for i in 0..4 {
                    let angle = i as f32 * std::f32::consts::FRAC_PI_2;
                    let rim = tip + rotation * Vec3::new(angle.cos(), angle.sin(), 0.0) * radius;
                    self.gizmos.line(rim, apex, color);
                }
            }
        }
    }

    fn line(&mut self, start: Vec3, end: Vec3, color: Color, thickness: f32) {
        if thickness > 0.0 {
            self.brackets.line(start, end, color);
        } else {
            self.gizmos.line(start, end, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        handles: Vec<HandleDraw>,
        lines: Vec<(Vec3, Vec3, f32)>,
    }

    impl RenderSink for RecordingSink {
        fn handle(&mut self, handle: &HandleDraw) {
            self.handles.push(*handle);
        }

        fn line(&mut self, start: Vec3, end: Vec3, _color: Color, thickness: f32) {
            self.lines.push((start, end, thickness));
        }
    }

    fn unit_box() -> BracketBox {
        BracketBox::from_local_bounds(Vec3::splat(-1.0), Vec3::ONE, &Transform::IDENTITY)
    }

    #[test]
    fn brackets_point_inward_from_padded_corners() {
        let lines = bracket_lines(&unit_box(), 0.2, 0.08);
        assert_eq!(lines.len(), 24);

        // Corner 0 is the min corner; its lines run toward +X, +Y, +Z
        let (start, end) = lines[0];
        let padding = 2.0 * 0.2 * 0.08;
        assert!((start - Vec3::splat(-1.0 - padding)).length() < 1e-5);
        assert!((end - start - Vec3::new(0.4, 0.0, 0.0)).length() < 1e-5);

        // Corner 6 is the max corner; its lines run toward -X, -Y, -Z
        let (start, end) = lines[6 * 3 + 2];
        assert!((start - Vec3::splat(1.0 + padding)).length() < 1e-5);
        assert!((end - start - Vec3::new(0.0, 0.0, -0.4)).length() < 1e-5);
    }

    #[test]
    fn wrap_handles_sit_on_faces_and_point_outward() {
        let mut dragger: AxisDragger<usize> = AxisDragger::new(DragMode::Wrap);
        dragger.set_targets(&[0]);
        let registry = SingleBox;
        dragger.refresh_anchors(&registry).unwrap();
        dragger.grasp(AxisId::X, true);

        let handles = handle_draws(&dragger, &GizmoSettings::default());
        assert_eq!(handles.len(), 6);
        let left = handles.iter().find(|h| h.axis == AxisId::X && h.flipped).unwrap();
        assert_eq!(left.origin, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(left.direction, Vec3::NEG_X);
        assert_eq!(left.material, HandleMaterial::Active);
        assert_eq!(left.head, HandleHead::Cube);

        let top = handles.iter().find(|h| h.axis == AxisId::Z && !h.flipped).unwrap();
        assert_eq!(top.origin, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(top.direction, Vec3::Z);
        assert_eq!(top.material, HandleMaterial::Wrap);
    }

    #[test]
    fn center_handles_share_origin() {
        let mut dragger: AxisDragger<usize> = AxisDragger::new(DragMode::Center);
        dragger.set_targets(&[0]);
        dragger.refresh_anchors(&SingleBox).unwrap();

        let handles = handle_draws(&dragger, &GizmoSettings::default());
        assert_eq!(handles.len(), 3);
        assert!(handles.iter().all(|h| h.origin == Vec3::ZERO && h.head == HandleHead::Cone));
        assert!(handles.iter().all(|h| h.material == HandleMaterial::Center));
    }

    #[test]
    fn nothing_drawn_without_target() {
        let dragger: AxisDragger<usize> = AxisDragger::default();
        let mut sink = RecordingSink::default();
        draw_dragger(&mut sink, &dragger, &GizmoSettings::default());
        assert!(sink.handles.is_empty());
        assert!(sink.lines.is_empty());
    }

    #[test]
    fn single_target_draws_thin_bracket_and_handles() {
        let mut dragger: AxisDragger<usize> = AxisDragger::default();
        dragger.set_targets(&[0]);
        dragger.refresh_anchors(&SingleBox).unwrap();

        let mut sink = RecordingSink::default();
        draw_dragger(&mut sink, &dragger, &GizmoSettings::default());
        assert_eq!(sink.handles.len(), 6);
        assert_eq!(sink.lines.len(), 24);
        assert!(sink.lines.iter().all(|(_, _, thickness)| *thickness == 0.0));
    }

    struct SingleBox;

    impl crate::gizmos::InstanceRegistry<usize> for SingleBox {
        fn world_transform(&self, handle: usize) -> Option<Transform> {
            (handle == 0).then_some(Transform::IDENTITY)
        }

        fn set_world_transform(&mut self, _handle: usize, _transform: Transform) -> bool {
            false
        }

        fn local_bounds(&self, handle: usize) -> Option<(Vec3, Vec3)> {
            (handle == 0).then_some((Vec3::splat(-1.0), Vec3::ONE))
        }
    }
}
