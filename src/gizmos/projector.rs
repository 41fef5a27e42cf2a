//! Converts a cursor ray into a world-space drag of an anchor point.

use bevy::prelude::*;

use super::anchors::AxisId;
use crate::constants::thresholds::PLANE_PARALLEL_EPSILON;

/// Cursor ray for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorRay {
    /// Camera position
    pub eye: Vec3,
    /// Direction from the eye through the cursor pixel
    pub pixel_dir: Vec3,
    /// Camera forward direction
    pub camera_dir: Vec3,
}

impl CursorRay {
    pub fn new(eye: Vec3, pixel_dir: Vec3, camera_dir: Vec3) -> Self {
        Self {
            eye,
            pixel_dir: pixel_dir.normalize_or_zero(),
            camera_dir: camera_dir.normalize_or_zero(),
        }
    }

    /// Build from a Bevy viewport ray and the camera's world transform
    pub fn from_camera(ray: Ray3d, camera_transform: &GlobalTransform) -> Self {
        Self::new(ray.origin, *ray.direction, *camera_transform.forward())
    }
}

/// Inputs for one projection, rebuilt every drag update
#[derive(Debug, Clone, Copy)]
pub struct MovementParams {
    pub eye: Vec3,
    pub pixel_dir: Vec3,
    pub camera_dir: Vec3,
    pub position: Vec3,
    pub axes: [Vec3; 3],
    pub plane_normal: Vec3,
    pub normal_to_remove: Vec3,
}

impl MovementParams {
    /// `None` when `axis` is `AxisId::None`
    pub fn new(cursor: &CursorRay, position: Vec3, axes: [Vec3; 3], axis: AxisId) -> Option<Self> {
        let (plane_normal, normal_to_remove) =
            axis_plane_normal_and_mask(axis, axes, cursor.camera_dir)?;
        Some(Self {
            eye: cursor.eye,
            pixel_dir: cursor.pixel_dir,
            camera_dir: cursor.camera_dir,
            position,
            axes,
            plane_normal,
            normal_to_remove,
        })
    }
}

/// Pick the projection plane normal and the axis to mute for a drag along `axis`.
///
/// Of the two non-active axes, the one more aligned with the view becomes the
/// plane normal; ties go to the second candidate.
pub fn axis_plane_normal_and_mask(
    axis: AxisId,
    axes: [Vec3; 3],
    camera_dir: Vec3,
) -> Option<(Vec3, Vec3)> {
    let [x, y, z] = axes;
    let (a, b) = match axis {
        AxisId::X => (y, z),
        AxisId::Y => (x, z),
        AxisId::Z => (x, y),
        AxisId::None => return None,
    };

    if camera_dir.dot(a).abs() > camera_dir.dot(b).abs() {
        Some((a, b))
    } else {
        Some((b, a))
    }
}

/// Intersection of a ray with a plane, `None` when the ray is parallel to it
pub fn ray_plane_intersection(origin: Vec3, dir: Vec3, plane_point: Vec3, normal: Vec3) -> Option<Vec3> {
    let denom = dir.dot(normal);
    if denom.abs() <= PLANE_PARALLEL_EPSILON {
        return None;
    }
    let t = (plane_point - origin).dot(normal) / denom;
    Some(origin + dir * t)
}

/// One-shot cache of the cursor-to-anchor offset at the start of a drag
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InitialOffset {
    pub cached: bool,
    pub offset: Vec3,
    pub position: Vec3,
}

impl InitialOffset {
    /// Offset captured on first use, held until `reset`
    pub fn latch(&mut self, requested: Vec3, position: Vec3) -> Vec3 {
        if !self.cached {
            self.cached = true;
            self.offset = requested - position;
            self.position = position;
        }
        self.offset
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// World-space displacement of `params.position` for this frame
pub fn translation_delta(params: &MovementParams, latch: &mut InitialOffset) -> Vec3 {
    let requested = ray_plane_intersection(
        params.eye,
        params.pixel_dir,
        params.position,
        params.plane_normal,
    )
    .unwrap_or(params.position);

    let mut delta = requested - params.position;
    delta -= latch.latch(requested, params.position);

    let mute = params.normal_to_remove.normalize_or_zero();
    delta -= mute * delta.dot(mute);

    let candidate = params.position + delta - params.eye;
    if candidate.dot(params.camera_dir) <= 0.0 {
        return Vec3::ZERO;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];

    fn looking_down_neg_z(pixel_dir: Vec3) -> CursorRay {
        CursorRay::new(Vec3::new(0.0, 0.0, 10.0), pixel_dir, Vec3::NEG_Z)
    }

    #[test]
    fn plane_normal_is_the_axis_facing_the_camera() {
        let (normal, mute) = axis_plane_normal_and_mask(AxisId::X, WORLD, Vec3::NEG_Z).unwrap();
        assert_eq!(normal, Vec3::Z);
        assert_eq!(mute, Vec3::Y);

        let (normal, mute) = axis_plane_normal_and_mask(AxisId::Z, WORLD, Vec3::NEG_Y).unwrap();
        assert_eq!(normal, Vec3::Y);
        assert_eq!(mute, Vec3::X);

        assert!(axis_plane_normal_and_mask(AxisId::None, WORLD, Vec3::NEG_Z).is_none());
    }

    #[test]
    fn tie_goes_to_second_candidate() {
        let camera_dir = Vec3::new(0.0, 1.0, 1.0).normalize();
        let (normal, mute) = axis_plane_normal_and_mask(AxisId::X, WORLD, camera_dir).unwrap();
        assert_eq!(normal, Vec3::Z);
        assert_eq!(mute, Vec3::Y);
    }

    #[test]
    fn first_frame_is_latched_to_zero() {
        let cursor = looking_down_neg_z(Vec3::new(0.3, 0.1, -1.0));
        let params = MovementParams::new(&cursor, Vec3::ZERO, WORLD, AxisId::X).unwrap();
        let mut latch = InitialOffset::default();
        assert_eq!(translation_delta(&params, &mut latch), Vec3::ZERO);
        assert!(latch.cached);
    }

    #[test]
    fn relative_motion_after_latch_is_axis_constrained() {
        let mut latch = InitialOffset::default();

        // Grab 1 unit right of and 1 unit above the anchor
        let grab = looking_down_neg_z(Vec3::new(1.0, 1.0, -10.0));
        let params = MovementParams::new(&grab, Vec3::ZERO, WORLD, AxisId::X).unwrap();
        translation_delta(&params, &mut latch);

        // Cursor moves to (4, 3) on the z = 0 plane
        let moved = looking_down_neg_z(Vec3::new(4.0, 3.0, -10.0));
        let params = MovementParams::new(&moved, Vec3::ZERO, WORLD, AxisId::X).unwrap();
        let delta = translation_delta(&params, &mut latch);
        assert!((delta - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn parallel_ray_keeps_anchor_in_place() {
        assert!(ray_plane_intersection(Vec3::ZERO, Vec3::X, Vec3::ZERO, Vec3::Z).is_none());

        let cursor = CursorRay::new(Vec3::new(0.0, 0.0, 10.0), Vec3::X, Vec3::NEG_Z);
        let params = MovementParams::new(&cursor, Vec3::ZERO, WORLD, AxisId::X).unwrap();
        let mut latch = InitialOffset::default();
        assert_eq!(translation_delta(&params, &mut latch), Vec3::ZERO);
        assert_eq!(latch.offset, Vec3::ZERO);
    }

    #[test]
    fn drag_behind_camera_is_discarded() {
        // Anchor sits behind the eye
        let cursor = looking_down_neg_z(Vec3::new(0.5, 0.0, -1.0));
        let anchor = Vec3::new(0.0, 0.0, 20.0);
        let params = MovementParams::new(&cursor, anchor, WORLD, AxisId::X).unwrap();
        let mut latch = InitialOffset {
            cached: true,
            ..default()
        };
        assert_eq!(translation_delta(&params, &mut latch), Vec3::ZERO);
    }

    #[test]
    fn reset_clears_latch() {
        let mut latch = InitialOffset::default();
        latch.latch(Vec3::ONE, Vec3::ZERO);
        assert_eq!(latch.latch(Vec3::splat(5.0), Vec3::ZERO), Vec3::ONE);
        latch.reset();
        assert!(!latch.cached);
        assert_eq!(latch.latch(Vec3::splat(5.0), Vec3::ZERO), Vec3::splat(5.0));
    }
}
