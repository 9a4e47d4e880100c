use std::fmt;
use std::path::PathBuf;

use crate::types::{CameraId, PointId};

/// What was wrong with a field of the root document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    Missing,
    WrongType { expected: &'static str },
    Duplicate,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing => write!(f, "is missing"),
            FieldProblem::WrongType { expected } => write!(f, "is not a valid {expected}"),
            FieldProblem::Duplicate => write!(f, "is duplicated"),
        }
    }
}

/// The two files every camera directory has to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFile {
    Intrinsics,
    Detections,
}

impl AssetFile {
    pub fn file_name(&self) -> &'static str {
        match self {
            AssetFile::Intrinsics => "camera_intrinsics.json",
            AssetFile::Detections => "marker_detections.json",
        }
    }
}

impl fmt::Display for AssetFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid document {}: {reason}", .path.display())]
    InvalidDocument { path: PathBuf, reason: String },
    #[error("{} {problem}", field_path(.location, .field))]
    ConfigField {
        location: String,
        field: String,
        problem: FieldProblem,
    },
    #[error("Failed to load {file} for camera {camera_id} from {}", .path.display())]
    CameraAssetLoad {
        camera_id: CameraId,
        file: AssetFile,
        path: PathBuf,
        #[source]
        source: Box<DatasetError>,
    },
    #[error("Calibration frame {frame_index} has no tick value for joint {joint_index}")]
    MissingJointTick {
        frame_index: usize,
        joint_index: usize,
    },
    #[error(
        "Point {point_id} observed twice by camera {camera_id} in calibration frame {frame_index}"
    )]
    DuplicatePointObservation {
        frame_index: usize,
        camera_id: CameraId,
        point_id: PointId,
    },
}

fn field_path(location: &str, field: &str) -> String {
    if field.is_empty() {
        location.to_string()
    } else {
        format!("{location}.{field}")
    }
}

impl DatasetError {
    pub(crate) fn field(
        location: impl Into<String>,
        field: impl Into<String>,
        problem: FieldProblem,
    ) -> DatasetError {
        DatasetError::ConfigField {
            location: location.into(),
            field: field.into(),
            problem,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> DatasetError {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            DatasetError::NotFound { path }
        } else {
            DatasetError::Io { path, source }
        }
    }
}
