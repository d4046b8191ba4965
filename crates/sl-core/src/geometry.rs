use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Affine pair mapping a zone's local space into a shared reference space.
///
/// `position_transform` maps points (translation included), while
/// `rotation_transform` maps directions and orientations. Both are kept
/// invertible; [`ZoneTransform::from_placement`] only ever builds rigid
/// transforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneTransform {
    /// Transform applied to positions.
    pub position_transform: Mat4,
    /// Transform applied to rotations and direction vectors.
    pub rotation_transform: Mat3,
}

impl Default for ZoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoneTransform {
    /// The transform that leaves everything in place.
    pub const IDENTITY: Self = Self {
        position_transform: Mat4::IDENTITY,
        rotation_transform: Mat3::IDENTITY,
    };

    /// Build a transform from an explicit pair.
    pub fn new(position_transform: Mat4, rotation_transform: Mat3) -> Self {
        Self {
            position_transform,
            rotation_transform,
        }
    }

    /// Transform for a zone placed at `position` with `rotation` (Euler degrees).
    pub fn from_placement(position: Vec3, rotation: Vec3) -> Self {
        let rotation_transform = euler_to_mat3(rotation);
        let position_transform =
            Mat4::from_translation(position) * Mat4::from_mat3(rotation_transform);
        Self {
            position_transform,
            rotation_transform,
        }
    }

    /// The inverse pair, mapping reference space back into the zone.
    pub fn inverse(&self) -> Self {
        Self {
            position_transform: self.position_transform.inverse(),
            rotation_transform: self.rotation_transform.inverse(),
        }
    }

    /// Apply `self` first, then `next`.
    pub fn then(&self, next: &ZoneTransform) -> Self {
        Self {
            position_transform: next.position_transform * self.position_transform,
            rotation_transform: next.rotation_transform * self.rotation_transform,
        }
    }

    /// The zone-to-zone transform taking coordinates local to `source` into
    /// coordinates local to `dest`, both given relative to the same reference.
    pub fn between(source: &ZoneTransform, dest: &ZoneTransform) -> Self {
        source.then(&dest.inverse())
    }

    /// Map a local point into reference space.
    pub fn apply_point(&self, p: Vec3) -> Vec3 {
        self.position_transform.transform_point3(p)
    }

    /// Map a reference-space point back into local space.
    pub fn unapply_point(&self, p: Vec3) -> Vec3 {
        self.position_transform.inverse().transform_point3(p)
    }

    /// Rotate a local direction into reference space.
    pub fn apply_direction(&self, v: Vec3) -> Vec3 {
        self.rotation_transform * v
    }

    /// Rotate a reference-space direction back into local space.
    pub fn unapply_direction(&self, v: Vec3) -> Vec3 {
        self.rotation_transform.inverse() * v
    }
}

/// Where a zone sits inside another zone.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZonePlacement {
    /// Offset of the placed zone's origin.
    pub position: Vec3,
    /// Orientation of the placed zone, Euler degrees.
    pub rotation: Vec3,
}

impl ZonePlacement {
    /// Create a placement.
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    /// The transform from the placed zone into its host.
    pub fn to_transform(&self) -> ZoneTransform {
        ZoneTransform::from_placement(self.position, self.rotation)
    }
}

/// Map `position` through the zone transform; unchanged without one.
pub fn transform_position(position: Vec3, transform: Option<&ZoneTransform>) -> Vec3 {
    match transform {
        Some(t) => t.apply_point(position),
        None => position,
    }
}

/// Compose `rotation` (Euler degrees) with the zone transform's rotation and
/// re-extract Euler angles; unchanged without a transform.
pub fn transform_rotation(rotation: Vec3, transform: Option<&ZoneTransform>) -> Vec3 {
    match transform {
        Some(t) => apply_rotation(rotation, t.rotation_transform),
        None => rotation,
    }
}

/// Rotate an orientation given as Euler degrees by `rotation_transform`.
pub fn apply_rotation(rotation: Vec3, rotation_transform: Mat3) -> Vec3 {
    mat3_to_euler(rotation_transform * euler_to_mat3(rotation))
}

/// Rotation matrix for Euler degrees applied X, then Y, then Z.
pub fn euler_to_mat3(degrees: Vec3) -> Mat3 {
    Mat3::from_euler(
        EulerRot::ZYX,
        degrees.z.to_radians(),
        degrees.y.to_radians(),
        degrees.x.to_radians(),
    )
}

/// Euler degrees (X, Y, Z order) of a pure rotation matrix.
pub fn mat3_to_euler(m: Mat3) -> Vec3 {
    let (z, y, x) = Quat::from_mat3(&m).to_euler(EulerRot::ZYX);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}
