//! Bounding-box corners and the six face-center anchors derived from them.
//!
//! Corner winding is fixed: the bottom face (min Z) first, then the top face
//! with the same XY pattern:
//!
//! ```text
//! c0 (minX, minY)   c1 (minX, maxY)   c2 (maxX, maxY)   c3 (maxX, minY)
//! ```

use bevy::prelude::*;

/// Which principal axis handle is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AxisId {
    X,
    Y,
    Z,
    #[default]
    None,
}

impl AxisId {
    /// Index into a `Vec3` / `[Vec3; 3]`, `None` for `AxisId::None`
    pub fn index(self) -> Option<usize> {
        match self {
            AxisId::X => Some(0),
            AxisId::Y => Some(1),
            AxisId::Z => Some(2),
            AxisId::None => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AxisId::X => "X",
            AxisId::Y => "Y",
            AxisId::Z => "Z",
            AxisId::None => "None",
        }
    }
}

/// Face of a bounding box, in anchor-set order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorFace {
    Bottom = 0,
    Top = 1,
    Left = 2,
    Right = 3,
    Back = 4,
    Front = 5,
}

impl AnchorFace {
    pub const ALL: [AnchorFace; 6] = [
        AnchorFace::Bottom,
        AnchorFace::Top,
        AnchorFace::Left,
        AnchorFace::Right,
        AnchorFace::Back,
        AnchorFace::Front,
    ];

    /// Corner indices averaged to get this face's center
    fn corners(self) -> [usize; 4] {
        match self {
            AnchorFace::Bottom => [0, 1, 2, 3],
            AnchorFace::Top => [4, 5, 6, 7],
            AnchorFace::Left => [0, 1, 5, 4],
            AnchorFace::Right => [3, 2, 6, 7],
            AnchorFace::Back => [0, 3, 4, 7],
            AnchorFace::Front => [1, 2, 5, 6],
        }
    }

    /// Face reached by an axis handle.
    ///
    /// The pairing is a fixed convention: X maps to Right/Left, Y to Front/Back
    /// and Z to Top/Bottom, with the flipped handle taking the lower index.
    pub fn for_axis(axis: AxisId, flipped: bool) -> Option<AnchorFace> {
        let face = match (axis, flipped) {
            (AxisId::X, false) => AnchorFace::Right,
            (AxisId::X, true) => AnchorFace::Left,
            (AxisId::Y, false) => AnchorFace::Front,
            (AxisId::Y, true) => AnchorFace::Back,
            (AxisId::Z, false) => AnchorFace::Top,
            (AxisId::Z, true) => AnchorFace::Bottom,
            (AxisId::None, _) => return None,
        };
        Some(face)
    }
}

/// Eight world-space corners plus the axis directions used to offset bracket lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketBox {
    pub corners: [Vec3; 8],
    pub axes: [Vec3; 3],
}

impl BracketBox {
    /// Corners of an axis-aligned box in its own space
    pub fn aabb_corners(min: Vec3, max: Vec3) -> [Vec3; 8] {
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(max.x, min.y, max.z),
        ]
    }

    /// Oriented box of a single instance.
    ///
    /// Axes follow the instance rotation and are negated on mirrored axes so
    /// brackets keep pointing outward.
    pub fn from_local_bounds(min: Vec3, max: Vec3, world: &Transform) -> Self {
        let corners = Self::aabb_corners(min, max).map(|c| world.transform_point(c));
        let rot = world.rotation;
        let signed = |axis: Vec3, s: f32| if s < 0.0 { -axis } else { axis };
        let axes = [
            signed(rot * Vec3::X, world.scale.x),
            signed(rot * Vec3::Y, world.scale.y),
            signed(rot * Vec3::Z, world.scale.z),
        ];
        Self { corners, axes }
    }

    /// World-aligned union of several world AABBs. `None` when the iterator is empty.
    pub fn from_world_aabbs(aabbs: impl IntoIterator<Item = (Vec3, Vec3)>) -> Option<Self> {
        let (min, max) = aabbs
            .into_iter()
            .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))?;
        Some(Self {
            corners: Self::aabb_corners(min, max),
            axes: [Vec3::X, Vec3::Y, Vec3::Z],
        })
    }

    /// World AABB of an instance's local bounds under `world`
    pub fn world_aabb(min: Vec3, max: Vec3, world: &Transform) -> (Vec3, Vec3) {
        Self::aabb_corners(min, max)
            .iter()
            .map(|c| world.transform_point(*c))
            .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), p| {
                (lo.min(p), hi.max(p))
            })
    }

    pub fn anchors(&self) -> AnchorVertexSet {
        AnchorVertexSet::from_corners(&self.corners)
    }

    /// Shortest of the three edges leaving corner 0
    pub fn min_edge_length(&self) -> f32 {
        let c = &self.corners;
        c[0].distance(c[1]).min(c[0].distance(c[3])).min(c[0].distance(c[4]))
    }
}

/// Face-center anchors in `[Bottom, Top, Left, Right, Back, Front]` order, or empty
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorVertexSet {
    points: Vec<Vec3>,
}

impl AnchorVertexSet {
    pub fn from_corners(corners: &[Vec3; 8]) -> Self {
        let points = AnchorFace::ALL
            .iter()
            .map(|face| {
                let idx = face.corners();
                idx.iter().map(|&i| corners[i]).sum::<Vec3>() / 4.0
            })
            .collect();
        Self { points }
    }

    pub fn is_ready(&self) -> bool {
        self.points.len() == 6
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Anchor at a face, `Vec3::ZERO` when not ready
    pub fn face(&self, face: AnchorFace) -> Vec3 {
        self.points.get(face as usize).copied().unwrap_or(Vec3::ZERO)
    }

    /// Anchor an axis handle sits on, `Vec3::ZERO` when not ready or axis is `None`
    pub fn axis_anchor(&self, axis: AxisId, flipped: bool) -> Vec3 {
        match AnchorFace::for_axis(axis, flipped) {
            Some(face) => self.face(face),
            None => Vec3::ZERO,
        }
    }

    /// The anchor across the box from `axis_anchor(axis, flipped)`
    pub fn opposite(&self, axis: AxisId, flipped: bool) -> Vec3 {
        self.axis_anchor(axis, !flipped)
    }

    /// Midpoint of the Bottom and Top anchors
    pub fn center(&self) -> Vec3 {
        if !self.is_ready() {
            return Vec3::ZERO;
        }
        (self.points[0] + self.points[1]) * 0.5
    }
}
