//! Loader for kinematic calibration datasets.
//!
//! A dataset joins a kinematic chain description, per-camera intrinsics and per-camera
//! marker detections into one sequence of [`CalibrationFrame`]s, each holding the joint
//! ticks of a pose and every marker corner the cameras observed at that pose.

pub mod camera;
pub mod config;
pub mod correlate;
pub mod dataset;
pub mod detection;
pub mod error;
pub mod intrinsics;
pub mod io;
pub mod joints;
pub mod reference;
pub mod types;

pub use camera::{CameraAsset, CameraAssets};
pub use correlate::CalibrationFrame;
pub use dataset::{CalibrationDataset, DatasetLoader};
pub use detection::{DetectionLoader, DetectionResult, TagObservation};
pub use error::{AssetFile, DatasetError, FieldProblem};
pub use intrinsics::{CameraIntrinsics, IntrinsicsLoader};
pub use joints::JointInfo;
pub use reference::ReferenceLoader;
pub use types::{CameraId, PointId, ReferencePointSet};
