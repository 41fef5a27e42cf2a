use bevy::prelude::*;

use super::anchors::AxisId;
use super::render::HandleDraw;
use crate::constants::picking::{CLICK_DISTANCE_FALLOFF, SEGMENT_EPSILON};

/// What the cursor landed on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PickResult {
    #[default]
    None,
    AxisHandle { axis: AxisId, flipped: bool },
    /// Some other editor element (scene geometry, UI)
    Other,
}

/// Closest handle to the ray within `click_radius`, widened with camera distance
pub fn pick_handle(ray_origin: Vec3, ray_dir: Vec3, handles: &[HandleDraw], click_radius: f32) -> PickResult {
    let mut closest: Option<(f32, &HandleDraw)> = None;

    for handle in handles {
        let distance = ray_to_line_segment_distance(ray_origin, ray_dir, handle.origin, handle.tip());
        let camera_distance = (handle.tip() - ray_origin).length();
        let radius = click_radius * (camera_distance / CLICK_DISTANCE_FALLOFF).max(1.0);

        if distance < radius && closest.is_none_or(|(best, _)| distance < best) {
            closest = Some((distance, handle));
        }
    }

    match closest {
        Some((_, handle)) => PickResult::AxisHandle {
            axis: handle.axis,
            flipped: handle.flipped,
        },
        None => PickResult::None,
    }
}

/// Distance between a ray and a line segment
pub fn ray_to_line_segment_distance(ray_origin: Vec3, ray_dir: Vec3, seg_start: Vec3, seg_end: Vec3) -> f32 {
    let seg_dir = seg_end - seg_start;
    let seg_len = seg_dir.length();

    if seg_len < SEGMENT_EPSILON {
        return point_to_ray_distance(seg_start, ray_origin, ray_dir);
    }

    let seg_dir_norm = seg_dir / seg_len;

    let w0 = ray_origin - seg_start;
    let a = ray_dir.dot(ray_dir);
    let b = ray_dir.dot(seg_dir_norm);
    let c = seg_dir_norm.dot(seg_dir_norm);
    let d = ray_dir.dot(w0);
    let e = seg_dir_norm.dot(w0);

    let denom = a * c - b * b;

    let (sc, tc) = if denom.abs() < SEGMENT_EPSILON {
        // Parallel
        (0.0, e / c)
    } else {
        ((b * e - c * d) / denom, (a * e - b * d) / denom)
    };

    let closest_on_ray = ray_origin + ray_dir * sc.max(0.0);
    let closest_on_seg = seg_start + seg_dir_norm * tc.clamp(0.0, seg_len);
    (closest_on_ray - closest_on_seg).length()
}

fn point_to_ray_distance(point: Vec3, ray_origin: Vec3, ray_dir: Vec3) -> f32 {
    let w = point - ray_origin;
    let along = w.dot(ray_dir);
    if along <= 0.0 {
        return w.length();
    }
    let closest = ray_origin + ray_dir * (along / ray_dir.dot(ray_dir));
    (point - closest).length()
}
