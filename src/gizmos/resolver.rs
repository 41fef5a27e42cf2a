//! Scale ratio from a drag, group decomposition and pivot repositioning.

use bevy::prelude::*;

use crate::constants::thresholds::{AXIS_EPSILON, PERPENDICULAR_EPSILON};

/// Reasons a drag frame produces no scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScaleError {
    #[error("drag is perpendicular to the scale axis")]
    PerpendicularDrag,
    #[error("anchor vertices are not computed yet")]
    NotReady,
    #[error("target instance no longer exists")]
    TargetLost,
}

fn safe_recip(v: Vec3) -> Vec3 {
    let r = |c: f32| if c == 0.0 { 0.0 } else { 1.0 / c };
    Vec3::new(r(v.x), r(v.y), r(v.z))
}

/// World direction into `frame`'s local space, dividing out scale
pub fn inverse_transform_vector(frame: &Transform, v: Vec3) -> Vec3 {
    (frame.rotation.inverse() * v) * safe_recip(frame.scale)
}

/// Local direction into world space, applying scale
pub fn transform_vector(frame: &Transform, v: Vec3) -> Vec3 {
    frame.rotation * (v * frame.scale)
}

/// Factor for one local axis: `|(o + d) / o|`, neutral when either side is too small
pub fn scale_component(origin: f32, drag: f32) -> f32 {
    if drag.abs() > AXIS_EPSILON && origin.abs() > AXIS_EPSILON {
        let factor = ((origin + drag) / origin).abs();
        if factor.is_finite() { factor } else { 1.0 }
    } else {
        1.0
    }
}

/// Per-local-axis scale factor for moving `grabbed` by `drag` while `opposite` stays put.
pub fn scale_ratio(grabbed: Vec3, opposite: Vec3, frame: &Transform, drag: Vec3) -> Result<Vec3, ScaleError> {
    let origin = grabbed - opposite;
    let alignment = drag.normalize_or_zero().dot(origin.normalize_or_zero()).abs();
    if alignment < PERPENDICULAR_EPSILON {
        return Err(ScaleError::PerpendicularDrag);
    }

    let origin_local = inverse_transform_vector(frame, origin);
    let axis_local = origin_local.normalize_or_zero();
    let drag_local = axis_local * axis_local.dot(inverse_transform_vector(frame, drag));

    Ok(Vec3::new(
        scale_component(origin_local.x, drag_local.x),
        scale_component(origin_local.y, drag_local.y),
        scale_component(origin_local.z, drag_local.z),
    ))
}

/// Express a world-aligned scale factor along a rotated member's own axes.
pub fn decompose_world_scale(world_factor: Vec3, member_rotation: Quat) -> Vec3 {
    let local_axes = [member_rotation * Vec3::X, member_rotation * Vec3::Y, member_rotation * Vec3::Z];
    let world_axes = [Vec3::X, Vec3::Y, Vec3::Z];
    let mut local = Vec3::ONE;

    for (w, world_axis) in world_axes.iter().enumerate() {
        let factor = world_factor[w];
        if factor == 1.0 {
            continue;
        }
        for (m, member_axis) in local_axes.iter().enumerate() {
            if member_axis.dot(*world_axis).abs() >= PERPENDICULAR_EPSILON {
                local[m] *= factor;
            }
        }
    }
    local
}

/// Where `location` lands after scaling by `factor` (in `frame`'s axes) about `pivot`
pub fn scale_about_pivot(location: Vec3, pivot: Vec3, frame: &Transform, factor: Vec3) -> Vec3 {
    let local = inverse_transform_vector(frame, location - pivot) * factor;
    pivot + transform_vector(frame, local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perpendicular_drag_is_rejected() {
        let result = scale_ratio(Vec3::X, Vec3::NEG_X, &Transform::IDENTITY, Vec3::Y * 5.0);
        assert_eq!(result, Err(ScaleError::PerpendicularDrag));
    }

    #[test]
    fn zero_drag_or_coincident_anchors_are_rejected() {
        let frame = Transform::IDENTITY;
        assert!(scale_ratio(Vec3::X, Vec3::NEG_X, &frame, Vec3::ZERO).is_err());
        assert!(scale_ratio(Vec3::ONE, Vec3::ONE, &frame, Vec3::X).is_err());
    }

    #[test]
    fn neutral_axes_stay_exactly_one() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..64 {
            let drag = Vec3::new(rng.f32() * 200.0 - 100.0, rng.f32(), rng.f32());
            if drag.x.abs() < 0.01 {
                continue;
            }
            let ratio = scale_ratio(Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), &Transform::IDENTITY, drag)
                .unwrap();
            assert_eq!(ratio.y, 1.0);
            assert_eq!(ratio.z, 1.0);
        }
    }

    #[test]
    fn component_is_neutral_for_tiny_inputs_and_clamps_non_finite() {
        assert_eq!(scale_component(0.0, 10.0), 1.0);
        assert_eq!(scale_component(5.0, 0.0005), 1.0);
        assert_eq!(scale_component(2.0, 1.0), 1.5);
        assert_eq!(scale_component(2.0, -3.0), 0.5);
        assert_eq!(scale_component(f32::NAN, 1.0), 1.0);
        assert_eq!(scale_component(f32::INFINITY, 1.0), 1.0);
    }

    #[test]
    fn drag_collapses_onto_origin_axis() {
        // Off-axis drag only contributes its projection
        let ratio = scale_ratio(Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO, &Transform::IDENTITY, Vec3::new(1.0, 3.0, 0.0))
            .unwrap();
        assert!((ratio.x - 1.5).abs() < 1e-5);
        assert_eq!(ratio.y, 1.0);
    }

    #[test]
    fn ratio_is_measured_in_local_frame() {
        // Rotated 90 degrees about Z: world Y is local -X
        let frame = Transform::from_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2))
            .with_scale(Vec3::splat(2.0));
        let ratio = scale_ratio(Vec3::new(0.0, 4.0, 0.0), Vec3::ZERO, &frame, Vec3::new(0.0, 2.0, 0.0)).unwrap();
        assert!((ratio.x - 1.5).abs() < 1e-4);
        assert_eq!(ratio.y, 1.0);
        assert_eq!(ratio.z, 1.0);
    }

    #[test]
    fn identity_member_gets_world_factor() {
        let factor = Vec3::new(1.25, 0.5, 1.0);
        assert_eq!(decompose_world_scale(factor, Quat::IDENTITY), factor);
    }

    #[test]
    fn rotated_member_swaps_axes() {
        let factor = Vec3::new(2.0, 1.0, 1.0);
        let local = decompose_world_scale(factor, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        assert_eq!(local.x, 1.0);
        assert_eq!(local.y, 1.0);
        assert_eq!(local.z, 2.0);
    }

    #[test]
    fn diagonal_member_blends_factor() {
        let factor = Vec3::new(2.0, 1.0, 1.0);
        let local = decompose_world_scale(factor, Quat::from_rotation_y(std::f32::consts::FRAC_PI_4));
        assert_eq!(local, Vec3::new(2.0, 1.0, 2.0));
    }

    #[test]
    fn pivot_is_a_fixed_point() {
        let frame = Transform::from_rotation(Quat::from_rotation_x(0.7)).with_scale(Vec3::new(1.0, 3.0, 0.5));
        let pivot = Vec3::new(1.0, -2.0, 4.0);
        let factor = Vec3::new(1.7, 0.4, 2.2);
        let moved = scale_about_pivot(pivot, pivot, &frame, factor);
        assert!((moved - pivot).length() < 1e-5);
    }

    #[test]
    fn local_vector_round_trips_through_frame() {
        let frame = Transform::from_rotation(Quat::from_rotation_y(1.1)).with_scale(Vec3::new(2.0, 0.5, 3.0));
        let v = Vec3::new(0.3, -1.2, 4.0);
        let back = transform_vector(&frame, inverse_transform_vector(&frame, v));
        assert!((back - v).length() < 1e-4);
        assert_eq!(inverse_transform_vector(&Transform::from_scale(Vec3::ZERO), v), Vec3::ZERO);
    }
}
