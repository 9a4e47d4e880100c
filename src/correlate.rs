use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::Path;

use serde_json::Value;

use crate::camera::CameraAssets;
use crate::config::{FrameEntry, FrameKeys};
use crate::detection::{DetectionIndex, DetectionResult};
use crate::error::DatasetError;
use crate::joints::JointInfo;
use crate::types::{CameraId, PointObservations};

/// One synchronized snapshot: joint ticks plus every marker corner each camera saw.
///
/// `joint_ticks[j]` belongs to joint `j` of the kinematic chain. Every camera of the
/// dataset has an entry in `observations`, empty when it saw nothing in this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationFrame {
    pub joint_ticks: Vec<i64>,
    pub observations: BTreeMap<CameraId, PointObservations>,
}

impl CalibrationFrame {
    pub fn joint_angles(&self, joints: &[JointInfo]) -> Vec<f64> {
        joints
            .iter()
            .zip(&self.joint_ticks)
            .map(|(joint, &ticks)| joint.ticks_to_radians(ticks))
            .collect()
    }

    pub fn observation_count(&self) -> usize {
        self.observations.values().map(BTreeMap::len).sum()
    }
}

/// Expands every tag observation of one image into its corner point observations.
pub fn observations_in_image(
    detections: &DetectionResult,
    image_index: usize,
    frame_index: usize,
    camera_id: CameraId,
) -> Result<PointObservations, DatasetError> {
    let mut points = PointObservations::new();
    for tag in detections.observations_in_image(image_index) {
        for (point_id, pixel) in tag.point_observations() {
            match points.entry(point_id) {
                Entry::Vacant(v) => {
                    v.insert(pixel);
                }
                Entry::Occupied(_) => {
                    return Err(DatasetError::DuplicatePointObservation {
                        frame_index,
                        camera_id,
                        point_id,
                    });
                }
            }
        }
    }
    Ok(points)
}

struct CameraDetections<'a> {
    detections: &'a DetectionResult,
    index: DetectionIndex,
}

/// Attaches detections to calibration frames.
///
/// Lookup tables are built once so each frame only costs a hash lookup per camera.
pub struct FrameCorrelator<'a> {
    keys: FrameKeys,
    cameras: BTreeMap<CameraId, CameraDetections<'a>>,
    base_dir: &'a Path,
}

impl<'a> FrameCorrelator<'a> {
    pub fn new<M>(joint_count: usize, cameras: &'a CameraAssets<M>, base_dir: &'a Path) -> Self {
        let cameras: BTreeMap<_, _> = cameras
            .iter()
            .map(|(&id, asset)| {
                (
                    id,
                    CameraDetections {
                        detections: &asset.detections,
                        index: DetectionIndex::new(&asset.detections),
                    },
                )
            })
            .collect();
        FrameCorrelator {
            keys: FrameKeys::new(joint_count, cameras.keys().copied()),
            cameras,
            base_dir,
        }
    }

    pub fn correlate(
        &self,
        frame_index: usize,
        node: &Value,
    ) -> Result<CalibrationFrame, DatasetError> {
        let entry = self.keys.decode(frame_index, node, self.base_dir)?;
        self.correlate_entry(frame_index, &entry)
    }

    pub fn correlate_entry(
        &self,
        frame_index: usize,
        entry: &FrameEntry,
    ) -> Result<CalibrationFrame, DatasetError> {
        let mut observations = BTreeMap::new();
        for (&camera_id, camera) in &self.cameras {
            let image_index = entry
                .image_paths
                .get(&camera_id)
                .and_then(|path| camera.index.find(path));
            let points = match image_index {
                Some(image_index) => {
                    log::trace!(
                        "frame {} camera {}: matched detection image {}",
                        frame_index,
                        camera_id,
                        image_index
                    );
                    observations_in_image(camera.detections, image_index, frame_index, camera_id)?
                }
                None => {
                    log::debug!(
                        "frame {} camera {}: no detections for {:?}",
                        frame_index,
                        camera_id,
                        entry.image_paths.get(&camera_id)
                    );
                    PointObservations::new()
                }
            };
            observations.insert(camera_id, points);
        }
        Ok(CalibrationFrame {
            joint_ticks: entry.joint_ticks.clone(),
            observations,
        })
    }
}

/// Correlates every `calibration_frames` entry, keeping input order.
pub fn correlate_frames<M>(
    frames: &[Value],
    joint_count: usize,
    cameras: &CameraAssets<M>,
    base_dir: &Path,
) -> Result<Vec<CalibrationFrame>, DatasetError> {
    let correlator = FrameCorrelator::new(joint_count, cameras, base_dir);
    frames
        .iter()
        .enumerate()
        .map(|(i, node)| correlator.correlate(i, node))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{DetectedImage, TagObservation};
    use glam::DVec2;

    fn tag(tag_id: u32, image_index: usize) -> TagObservation {
        TagObservation {
            tag_id,
            image_index,
            corners: [DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y],
        }
    }

    #[test]
    fn duplicate_tag_in_one_image_is_rejected() {
        let detections = DetectionResult {
            images: vec![DetectedImage {
                filename: "a.png".to_string(),
            }],
            tag_observations: vec![tag(3, 0), tag(4, 0), tag(3, 0)],
        };
        let err = observations_in_image(&detections, 0, 7, 2).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::DuplicatePointObservation {
                frame_index: 7,
                camera_id: 2,
                point_id: 12
            }
        ));
    }

    #[test]
    fn same_tag_in_other_images_is_fine() {
        let detections = DetectionResult {
            images: vec![],
            tag_observations: vec![tag(3, 0), tag(3, 1)],
        };
        let points = observations_in_image(&detections, 1, 0, 0).unwrap();
        assert_eq!(points.keys().copied().collect::<Vec<_>>(), vec![12, 13, 14, 15]);
    }

    #[test]
    fn joint_angles_scale_ticks() {
        let joints = vec![
            JointInfo {
                name: "pan".to_string(),
                ticks_to_rad: 0.5,
                angular_noise_std_dev: 0.0,
            },
            JointInfo {
                name: "tilt".to_string(),
                ticks_to_rad: -2.0,
                angular_noise_std_dev: 0.0,
            },
        ];
        let frame = CalibrationFrame {
            joint_ticks: vec![4, 3],
            observations: BTreeMap::new(),
        };
        assert_eq!(frame.joint_angles(&joints), vec![2.0, -6.0]);
    }
}
