use std::collections::BTreeMap;
use std::path::Path;

use crate::config::CameraEntry;
use crate::detection::{DetectionLoader, DetectionResult};
use crate::error::{AssetFile, DatasetError, FieldProblem};
use crate::intrinsics::IntrinsicsLoader;
use crate::types::CameraId;

/// Everything loaded from one camera directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraAsset<M> {
    pub intrinsics: M,
    pub detections: DetectionResult,
}

pub type CameraAssets<M> = BTreeMap<CameraId, CameraAsset<M>>;

/// Loads intrinsics and detections of every declared camera.
///
/// Fails on the first camera whose files cannot be loaded; a partial camera set is never returned.
/// A camera id repeated in `entries` is a `Duplicate` error located at the repeating entry.
pub fn load_camera_assets<I, D>(
    entries: &[CameraEntry],
    intrinsics_loader: &I,
    detection_loader: &D,
) -> Result<CameraAssets<I::Model>, DatasetError>
where
    I: IntrinsicsLoader,
    D: DetectionLoader,
{
    let mut assets = CameraAssets::new();
    for (i, entry) in entries.iter().enumerate() {
        let camera_id = entry.camera_id;

        let intrinsics_path = entry.camera_path.join(AssetFile::Intrinsics.file_name());
        log::info!(
            "Trying to load camera intrinsics for camera {} from {} ...",
            camera_id,
            intrinsics_path.display()
        );
        let intrinsics = intrinsics_loader
            .load_intrinsics(&intrinsics_path)
            .map_err(asset_error(camera_id, AssetFile::Intrinsics, &intrinsics_path))?;

        let detections_path = entry.camera_path.join(AssetFile::Detections.file_name());
        log::info!(
            "Trying to load marker detections for camera {} from {} ...",
            camera_id,
            detections_path.display()
        );
        let detections = detection_loader
            .load_detections(&detections_path)
            .map_err(asset_error(camera_id, AssetFile::Detections, &detections_path))?;
        log::debug!(
            "camera {}: {} images, {} tag observations",
            camera_id,
            detections.images.len(),
            detections.tag_observations.len()
        );

        if assets
            .insert(
                camera_id,
                CameraAsset {
                    intrinsics,
                    detections,
                },
            )
            .is_some()
        {
            return Err(DatasetError::field(
                format!("cameras[{i}]"),
                "camera_id",
                FieldProblem::Duplicate,
            ));
        }
    }
    Ok(assets)
}

fn asset_error(
    camera_id: CameraId,
    file: AssetFile,
    path: &Path,
) -> impl FnOnce(DatasetError) -> DatasetError {
    let path = path.to_path_buf();
    move |source| DatasetError::CameraAssetLoad {
        camera_id,
        file,
        path,
        source: Box::new(source),
    }
}
