use std::collections::HashMap;
use std::path::Path;

use glam::DVec2;
use serde::Deserialize;

use crate::error::DatasetError;
use crate::io::object_from_json;
use crate::types::{CORNERS_PER_TAG, PointId, TagId, corner_point_id};

/// Parser for a camera's `marker_detections.json`.
pub trait DetectionLoader {
    fn load_detections(&self, path: &Path) -> Result<DetectionResult, DatasetError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectedImage {
    pub filename: String,
}

/// One detected marker: its id, the image it was found in and its 4 corners.
#[derive(Debug, Clone, PartialEq)]
pub struct TagObservation {
    pub tag_id: TagId,
    pub image_index: usize,
    pub corners: [DVec2; CORNERS_PER_TAG],
}

impl TagObservation {
    /// Expands the tag into one point observation per corner.
    pub fn point_observations(&self) -> impl Iterator<Item = (PointId, DVec2)> + '_ {
        self.corners
            .iter()
            .enumerate()
            .map(|(c, p)| (corner_point_id(self.tag_id, c), *p))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
    pub images: Vec<DetectedImage>,
    pub tag_observations: Vec<TagObservation>,
}

impl DetectionResult {
    pub fn observations_in_image(
        &self,
        image_index: usize,
    ) -> impl Iterator<Item = &TagObservation> + '_ {
        self.tag_observations
            .iter()
            .filter(move |o| o.image_index == image_index)
    }
}

/// Filename component of a path, if it is valid UTF-8.
pub fn file_name_of(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Basename to image index lookup for one detection result.
///
/// Only the filename component is compared, directories are ignored. When two images
/// share a basename the first one wins.
#[derive(Debug, Clone, Default)]
pub struct DetectionIndex {
    by_file_name: HashMap<String, usize>,
}

impl DetectionIndex {
    pub fn new(detections: &DetectionResult) -> DetectionIndex {
        let mut by_file_name = HashMap::with_capacity(detections.images.len());
        for (i, image) in detections.images.iter().enumerate() {
            if let Some(name) = file_name_of(Path::new(&image.filename)) {
                by_file_name.entry(name.to_string()).or_insert(i);
            }
        }
        DetectionIndex { by_file_name }
    }

    pub fn find(&self, image_path: &Path) -> Option<usize> {
        file_name_of(image_path).and_then(|name| self.by_file_name.get(name).copied())
    }
}

#[derive(Deserialize)]
struct PixelJson {
    x: f64,
    y: f64,
}

#[derive(Deserialize)]
struct ImageJson {
    filename: String,
}

#[derive(Deserialize)]
struct TagObservationJson {
    tag_id: TagId,
    image_id: usize,
    corners: [PixelJson; CORNERS_PER_TAG],
}

#[derive(Deserialize)]
struct DetectionResultJson {
    images: Vec<ImageJson>,
    #[serde(default)]
    tag_observations: Vec<TagObservationJson>,
}

impl From<DetectionResultJson> for DetectionResult {
    fn from(j: DetectionResultJson) -> Self {
        DetectionResult {
            images: j
                .images
                .into_iter()
                .map(|i| DetectedImage {
                    filename: i.filename,
                })
                .collect(),
            tag_observations: j
                .tag_observations
                .into_iter()
                .map(|o| TagObservation {
                    tag_id: o.tag_id,
                    image_index: o.image_id,
                    corners: o.corners.map(|p| DVec2::new(p.x, p.y)),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionJsonLoader;

impl DetectionLoader for DetectionJsonLoader {
    fn load_detections(&self, path: &Path) -> Result<DetectionResult, DatasetError> {
        let j: DetectionResultJson = object_from_json(path)?;
        Ok(j.into())
    }
}
