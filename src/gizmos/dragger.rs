use std::fmt::Debug;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::anchors::{AnchorVertexSet, AxisId, BracketBox};
use super::projector::{CursorRay, InitialOffset, MovementParams, translation_delta};
use super::resolver::{ScaleError, decompose_world_scale, scale_about_pivot, scale_ratio};

/// Where scaling is anchored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragMode {
    /// Anchor at the face opposite the grabbed handle
    #[default]
    Wrap,
    /// Anchor at the bounding-box center
    Center,
}

impl DragMode {
    pub fn toggled(self) -> Self {
        match self {
            DragMode::Wrap => DragMode::Center,
            DragMode::Center => DragMode::Wrap,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DragMode::Wrap => "Wrap",
            DragMode::Center => "Center",
        }
    }
}

/// Access to externally owned instances.
///
/// Handles are non-owning; every method returns `None`/`false` for an
/// instance that no longer exists.
pub trait InstanceRegistry<H> {
    fn world_transform(&self, handle: H) -> Option<Transform>;
    fn set_world_transform(&mut self, handle: H, transform: Transform) -> bool;
    /// Untransformed bounds (min, max) of the instance's mesh
    fn local_bounds(&self, handle: H) -> Option<(Vec3, Vec3)>;
}

/// One member of a group target with its own oriented anchors
#[derive(Debug, Clone)]
pub struct GroupMember<H> {
    pub handle: H,
    pub anchors: AnchorVertexSet,
    pub bracket: Option<BracketBox>,
}

impl<H> GroupMember<H> {
    fn new(handle: H) -> Self {
        Self {
            handle,
            anchors: AnchorVertexSet::default(),
            bracket: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DragTarget<H> {
    Single { handle: H },
    Group { members: Vec<GroupMember<H>> },
}

impl<H: Copy> DragTarget<H> {
    pub fn handles(&self) -> Vec<H> {
        match self {
            DragTarget::Single { handle } => vec![*handle],
            DragTarget::Group { members } => members.iter().map(|m| m.handle).collect(),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, DragTarget::Group { .. })
    }
}

/// Grasped handle and the initial-offset latch
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragSession {
    pub active_axis: AxisId,
    pub axis_flipped: bool,
    pub offset: InitialOffset,
}

/// What a call to [`AxisDragger::drag`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// No handle grasped
    Idle,
    /// Anchors could not be computed
    NotReady,
    /// Drag perpendicular to the scale axis, nothing applied
    Degenerate,
    /// Every target instance is gone
    TargetLost,
    /// Scale factor applied to the target(s)
    Applied(Vec3),
}

/// Axis-drag scaling controller over instances addressed by `H`
#[derive(Debug, Clone)]
pub struct AxisDragger<H> {
    mode: DragMode,
    session: DragSession,
    target: Option<DragTarget<H>>,
    anchors: AnchorVertexSet,
    bracket: Option<BracketBox>,
}

impl<H> Default for AxisDragger<H> {
    fn default() -> Self {
        Self::new(DragMode::default())
    }
}

impl<H> AxisDragger<H> {
    pub fn new(mode: DragMode) -> Self {
        Self {
            mode,
            session: DragSession::default(),
            target: None,
            anchors: AnchorVertexSet::default(),
            bracket: None,
        }
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn target(&self) -> Option<&DragTarget<H>> {
        self.target.as_ref()
    }

    /// Anchors of the whole target (single box or group union)
    pub fn anchors(&self) -> &AnchorVertexSet {
        &self.anchors
    }

    pub fn bracket(&self) -> Option<&BracketBox> {
        self.bracket.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.active_axis != AxisId::None
    }

    /// Switch Wrap/Center. Refused while a handle is grasped.
    pub fn toggle_mode(&mut self) -> bool {
        if self.is_dragging() {
            debug!("Drag mode toggle ignored while dragging {:?}", self.session.active_axis);
            return false;
        }
        self.mode = self.mode.toggled();
        true
    }

    /// Begin dragging a handle. Grasping `AxisId::None` releases.
    pub fn grasp(&mut self, axis: AxisId, flipped: bool) {
        if axis == AxisId::None {
            self.release();
            return;
        }
        self.session.active_axis = axis;
        self.session.axis_flipped = flipped;
        self.session.offset.reset();
    }

    pub fn release(&mut self) {
        self.session = DragSession::default();
    }

    /// Drop the latched grab offset so the next frame re-latches.
    ///
    /// Used when something other than the scale drag moved the target mid-gesture.
    pub fn reset_offset(&mut self) {
        self.session.offset.reset();
    }

    /// Face the projector tracks: the grasped face in both modes, since it is the
    /// point that moves as the scale changes
    pub fn tracked_anchor(&self) -> Vec3 {
        self.anchors
            .axis_anchor(self.session.active_axis, self.session.axis_flipped)
    }

    /// Fixed point of the current scale operation
    pub fn pivot_anchor(&self) -> Vec3 {
        match self.mode {
            DragMode::Wrap => self
                .anchors
                .opposite(self.session.active_axis, self.session.axis_flipped),
            DragMode::Center => self.anchors.center(),
        }
    }
}

impl<H: Copy + Eq + Debug> AxisDragger<H> {
    /// Reduce a selection to a target: none, single, or group.
    ///
    /// A different selection replaces all anchor data and ends any drag.
    pub fn set_targets(&mut self, handles: &[H]) {
        let unchanged = match &self.target {
            Some(target) => target.handles() == handles,
            None => handles.is_empty(),
        };
        if unchanged {
            return;
        }

        self.target = match handles {
            [] => None,
            [handle] => Some(DragTarget::Single { handle: *handle }),
            _ => Some(DragTarget::Group {
                members: handles.iter().copied().map(GroupMember::new).collect(),
            }),
        };
        self.anchors.clear();
        self.bracket = None;
        self.release();
    }

    /// Recompute anchors from the instances' current transforms and bounds.
    pub fn refresh_anchors(&mut self, registry: &impl InstanceRegistry<H>) -> Result<(), ScaleError> {
        self.anchors.clear();
        self.bracket = None;

        let Some(target) = self.target.as_mut() else {
            return Err(ScaleError::NotReady);
        };

        let bracket = match target {
            DragTarget::Single { handle } => {
                let (Some(world), Some((min, max))) =
                    (registry.world_transform(*handle), registry.local_bounds(*handle))
                else {
                    return Err(ScaleError::TargetLost);
                };
                BracketBox::from_local_bounds(min, max, &world)
            }
            DragTarget::Group { members } => {
                let mut aabbs = Vec::with_capacity(members.len());
                for member in members.iter_mut() {
                    let world = registry.world_transform(member.handle);
                    let bounds = registry.local_bounds(member.handle);
                    let (Some(world), Some((min, max))) = (world, bounds) else {
                        member.anchors.clear();
                        member.bracket = None;
                        continue;
                    };
                    let own = BracketBox::from_local_bounds(min, max, &world);
                    member.anchors = own.anchors();
                    member.bracket = Some(own);
                    aabbs.push(BracketBox::world_aabb(min, max, &world));
                }
                BracketBox::from_world_aabbs(aabbs).ok_or(ScaleError::TargetLost)?
            }
        };

        self.anchors = bracket.anchors();
        self.bracket = Some(bracket);
        Ok(())
    }

    /// Advance the drag by one frame
    pub fn drag(&mut self, registry: &mut impl InstanceRegistry<H>, cursor: &CursorRay) -> DragOutcome {
        if !self.is_dragging() {
            return DragOutcome::Idle;
        }

        match self.refresh_anchors(registry) {
            Ok(()) => {}
            Err(ScaleError::TargetLost) => return DragOutcome::TargetLost,
            Err(_) => return DragOutcome::NotReady,
        }
        let Some(axes) = self.bracket.map(|b| b.axes) else {
            return DragOutcome::NotReady;
        };
        if !self.anchors.is_ready() {
            return DragOutcome::NotReady;
        }

        let Some(params) = MovementParams::new(cursor, self.tracked_anchor(), axes, self.session.active_axis) else {
            return DragOutcome::NotReady;
        };
        let delta = translation_delta(&params, &mut self.session.offset);

        self.apply_drag(registry, self.tracked_anchor(), self.pivot_anchor(), delta)
    }

    /// Scale the target so `grabbed` follows `drag` while `pivot` stays fixed
    pub fn apply_drag(
        &self,
        registry: &mut impl InstanceRegistry<H>,
        grabbed: Vec3,
        pivot: Vec3,
        drag: Vec3,
    ) -> DragOutcome {
        match &self.target {
            None => DragOutcome::NotReady,
            Some(DragTarget::Single { handle }) => {
                let Some(frame) = registry.world_transform(*handle) else {
                    return DragOutcome::TargetLost;
                };
                let factor = match scale_ratio(grabbed, pivot, &frame, drag) {
                    Ok(factor) => factor,
                    Err(_) => return DragOutcome::Degenerate,
                };

                let mut scaled = frame;
                scaled.scale *= factor;
                scaled.translation = scale_about_pivot(frame.translation, pivot, &frame, factor);
                if !registry.set_world_transform(*handle, scaled) {
                    return DragOutcome::TargetLost;
                }
                DragOutcome::Applied(factor)
            }
            Some(DragTarget::Group { members }) => {
                let frame = Transform::IDENTITY;
                let factor = match scale_ratio(grabbed, pivot, &frame, drag) {
                    Ok(factor) => factor,
                    Err(_) => return DragOutcome::Degenerate,
                };

                let mut applied = 0;
                for member in members {
                    let Some(mut world) = registry.world_transform(member.handle) else {
                        continue;
                    };
                    world.scale *= decompose_world_scale(factor, world.rotation);
                    world.translation = scale_about_pivot(world.translation, pivot, &frame, factor);
                    if registry.set_world_transform(member.handle, world) {
                        applied += 1;
                    }
                }

                if applied == 0 {
                    DragOutcome::TargetLost
                } else {
                    DragOutcome::Applied(factor)
                }
            }
        }
    }

    /// Pivot shown to the user: the instance origin, or the group's Bottom anchor
    pub fn expected_pivot(&self, registry: &impl InstanceRegistry<H>) -> Option<Vec3> {
        match self.target.as_ref()? {
            DragTarget::Single { handle } => registry.world_transform(*handle).map(|t| t.translation),
            DragTarget::Group { .. } => self.anchors.points().first().copied(),
        }
    }
}
