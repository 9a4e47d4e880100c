use std::path::Path;

use crate::camera::{CameraAssets, load_camera_assets};
use crate::config::RootDocument;
use crate::correlate::{CalibrationFrame, correlate_frames};
use crate::detection::{DetectionJsonLoader, DetectionLoader};
use crate::error::DatasetError;
use crate::intrinsics::{CameraIntrinsics, IntrinsicsJsonLoader, IntrinsicsLoader};
use crate::joints::{JointInfo, parse_joints};
use crate::reference::{ReconstructionJsonLoader, ReferenceLoader};
use crate::types::ReferencePointSet;

/// Everything a kinematic calibration needs, correlated per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationDataset<M = CameraIntrinsics> {
    pub reference_points: ReferencePointSet,
    pub joints: Vec<JointInfo>,
    pub cameras: CameraAssets<M>,
    pub frames: Vec<CalibrationFrame>,
}

impl CalibrationDataset<CameraIntrinsics> {
    /// Loads a dataset with the JSON parsers for every sub-file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let loader: DatasetLoader = DatasetLoader::default();
        loader.load(path)
    }
}

/// Loads a root calibration document with the given sub-file parsers.
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader<
    R = ReconstructionJsonLoader,
    I = IntrinsicsJsonLoader,
    D = DetectionJsonLoader,
> {
    pub reference_loader: R,
    pub intrinsics_loader: I,
    pub detection_loader: D,
}

impl<R, I, D> DatasetLoader<R, I, D>
where
    R: ReferenceLoader,
    I: IntrinsicsLoader,
    D: DetectionLoader,
{
    pub fn new(reference_loader: R, intrinsics_loader: I, detection_loader: D) -> Self {
        DatasetLoader {
            reference_loader,
            intrinsics_loader,
            detection_loader,
        }
    }

    pub fn load(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<CalibrationDataset<I::Model>, DatasetError> {
        let path = path.as_ref();
        log::info!("Loading calibration data from {}", path.display());
        let document = RootDocument::from_json_file(path)?;
        self.load_document(&document)
    }

    /// Runs all loading stages on an already parsed root document.
    pub fn load_document(
        &self,
        document: &RootDocument,
    ) -> Result<CalibrationDataset<I::Model>, DatasetError> {
        let reference_points = self
            .reference_loader
            .load_reference(&document.world_reference()?)?;

        let joints = parse_joints(document.kinematic_chain()?)?;
        log::info!("Read {} joints from {}", joints.len(), document.path().display());

        let cameras = load_camera_assets(
            &document.cameras()?,
            &self.intrinsics_loader,
            &self.detection_loader,
        )?;

        let frames = correlate_frames(
            document.calibration_frames()?,
            joints.len(),
            &cameras,
            document.base_dir(),
        )?;
        log::info!(
            "Read {} calibration frames with {} point observations",
            frames.len(),
            frames.iter().map(CalibrationFrame::observation_count).sum::<usize>()
        );

        Ok(CalibrationDataset {
            reference_points,
            joints,
            cameras,
            frames,
        })
    }
}
