use glam::{DVec2, DVec3};
use std::collections::BTreeMap;

pub type CameraId = u32;
pub type TagId = u32;
pub type PointId = u64;

/// Corners per planar marker.
pub const CORNERS_PER_TAG: usize = 4;

/// Global id of one physical marker corner.
pub fn corner_point_id(tag_id: TagId, corner_index: usize) -> PointId {
    tag_id as PointId * CORNERS_PER_TAG as PointId + corner_index as PointId
}

/// Flattened 3-D reference map, point id to world position.
pub type ReferencePointSet = BTreeMap<PointId, DVec3>;

/// Pixel observations of one camera in one frame, keyed by point id.
pub type PointObservations = BTreeMap<PointId, DVec2>;
