use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::dataset::CalibrationDataset;
use crate::error::DatasetError;
use crate::types::CameraId;

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: &Path) -> Result<T, DatasetError> {
    let file = File::open(file_path).map_err(|e| DatasetError::io(file_path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| DatasetError::Parse {
        path: file_path.to_path_buf(),
        source,
    })
}

/// Serializes an object to a pretty printed JSON file.
pub fn object_to_json<T: Serialize>(output_path: &Path, object: &T) -> Result<(), DatasetError> {
    let file = File::create(output_path).map_err(|e| DatasetError::io(output_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, object).map_err(|source| DatasetError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|e| DatasetError::io(output_path, e))
}

/// Directory every relative path of a root document is resolved against.
pub fn dataset_dir(root_file: &Path) -> PathBuf {
    root_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Absolute paths are kept, relative ones are joined onto `base_dir`.
pub fn resolve_path(base_dir: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Per-camera part of a [`DatasetSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraSummary {
    pub camera_id: CameraId,
    pub detection_images: usize,
    pub tag_observations: usize,
    /// Point observations of this camera in every frame.
    pub observations_per_frame: Vec<usize>,
    pub frames_without_observations: usize,
}

/// Overview of a loaded dataset, written by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub joint_names: Vec<String>,
    pub reference_points: usize,
    pub frame_count: usize,
    pub total_observations: usize,
    pub cameras: Vec<CameraSummary>,
}

impl DatasetSummary {
    pub fn new<M>(dataset: &CalibrationDataset<M>) -> DatasetSummary {
        let cameras: Vec<CameraSummary> = dataset
            .cameras
            .iter()
            .map(|(&camera_id, asset)| {
                let observations_per_frame: Vec<usize> = dataset
                    .frames
                    .iter()
                    .map(|f| f.observations.get(&camera_id).map_or(0, |o| o.len()))
                    .collect();
                CameraSummary {
                    camera_id,
                    detection_images: asset.detections.images.len(),
                    tag_observations: asset.detections.tag_observations.len(),
                    frames_without_observations: observations_per_frame
                        .iter()
                        .filter(|&&n| n == 0)
                        .count(),
                    observations_per_frame,
                }
            })
            .collect();
        DatasetSummary {
            joint_names: dataset.joints.iter().map(|j| j.name.clone()).collect(),
            reference_points: dataset.reference_points.len(),
            frame_count: dataset.frames.len(),
            total_observations: cameras
                .iter()
                .flat_map(|c| c.observations_per_frame.iter())
                .sum(),
            cameras,
        }
    }
}

pub fn write_summary<M>(
    output_path: &Path,
    dataset: &CalibrationDataset<M>,
) -> Result<(), DatasetError> {
    object_to_json(output_path, &DatasetSummary::new(dataset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_dataset_dir() {
        let base = Path::new("/data/rig");
        assert_eq!(
            resolve_path(base, "cam0/img.png"),
            PathBuf::from("/data/rig/cam0/img.png")
        );
        assert_eq!(resolve_path(base, "/abs/img.png"), PathBuf::from("/abs/img.png"));
    }

    #[test]
    fn dataset_dir_of_bare_file_name_is_empty() {
        assert_eq!(dataset_dir(Path::new("root.json")), PathBuf::new());
        assert_eq!(dataset_dir(Path::new("/a/b/root.json")), PathBuf::from("/a/b"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = object_from_json::<serde_json::Value>(Path::new("no/such/file.json"))
            .unwrap_err();
        assert!(matches!(err, DatasetError::NotFound { .. }));
    }
}
