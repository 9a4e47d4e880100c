use std::path::Path;

use glam::{DQuat, DVec3};
use serde::Deserialize;

use crate::error::DatasetError;
use crate::io::object_from_json;
use crate::types::{CORNERS_PER_TAG, ReferencePointSet, TagId, corner_point_id};

/// Source of the 3-D reference point set named by `world_reference`.
pub trait ReferenceLoader {
    fn load_reference(&self, path: &Path) -> Result<ReferencePointSet, DatasetError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReconstructedTag {
    pub id: TagId,
    pub tag_width: f64,
    pub tag_height: f64,
    /// Quaternion as `[w, x, y, z]`.
    pub rotation: [f64; 4],
    pub translation: [f64; 3],
}

impl ReconstructedTag {
    /// World positions of the four corners, in corner index order.
    pub fn corners(&self) -> Option<[DVec3; CORNERS_PER_TAG]> {
        let [w, x, y, z] = self.rotation;
        let q = DQuat::from_xyzw(x, y, z, w);
        let norm = q.length();
        if !norm.is_finite() || norm < f64::EPSILON {
            return None;
        }
        let q = q / norm;
        let t = DVec3::from_array(self.translation);
        let (hw, hh) = (0.5 * self.tag_width, 0.5 * self.tag_height);
        let local = [
            DVec3::new(-hw, -hh, 0.0),
            DVec3::new(hw, -hh, 0.0),
            DVec3::new(hw, hh, 0.0),
            DVec3::new(-hw, hh, 0.0),
        ];
        Some(local.map(|p| q * p + t))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reconstruction {
    pub reconstructed_tags: Vec<ReconstructedTag>,
}

/// Maps every reconstructed tag corner to its point id.
pub fn flatten_reconstruction(
    reconstruction: &Reconstruction,
    path: &Path,
) -> Result<ReferencePointSet, DatasetError> {
    let mut points = ReferencePointSet::new();
    for tag in &reconstruction.reconstructed_tags {
        let corners = tag.corners().ok_or_else(|| DatasetError::InvalidDocument {
            path: path.to_path_buf(),
            reason: format!("tag {} has a degenerate rotation", tag.id),
        })?;
        for (c, p) in corners.into_iter().enumerate() {
            points.insert(corner_point_id(tag.id, c), p);
        }
    }
    Ok(points)
}

/// Reads a `reconstructed_tags` JSON file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconstructionJsonLoader;

impl ReferenceLoader for ReconstructionJsonLoader {
    fn load_reference(&self, path: &Path) -> Result<ReferencePointSet, DatasetError> {
        let reconstruction: Reconstruction = object_from_json(path)?;
        let points = flatten_reconstruction(&reconstruction, path)?;
        log::info!(
            "Read reconstructions! {} tags, {} points",
            reconstruction.reconstructed_tags.len(),
            points.len()
        );
        Ok(points)
    }
}
