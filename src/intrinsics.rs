use std::path::Path;

use nalgebra as na;
use serde::Deserialize;

use crate::error::DatasetError;
use crate::io::object_from_json;

/// Parser for a camera's `camera_intrinsics.json`.
pub trait IntrinsicsLoader {
    type Model;
    fn load_intrinsics(&self, path: &Path) -> Result<Self::Model, DatasetError>;
}

/// Pinhole camera matrix plus distortion coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraIntrinsics {
    pub width: u32,
    pub height: u32,
    pub camera_matrix: na::Matrix3<f64>,
    pub distortion: na::DVector<f64>,
}

impl CameraIntrinsics {
    pub fn fx(&self) -> f64 {
        self.camera_matrix[(0, 0)]
    }
    pub fn fy(&self) -> f64 {
        self.camera_matrix[(1, 1)]
    }
    pub fn cx(&self) -> f64 {
        self.camera_matrix[(0, 2)]
    }
    pub fn cy(&self) -> f64 {
        self.camera_matrix[(1, 2)]
    }
}

#[derive(Deserialize)]
struct IntrinsicsJson {
    width: u32,
    height: u32,
    camera_matrix: [f64; 9],
    #[serde(default)]
    distortion_coefficients: Vec<f64>,
}

impl From<IntrinsicsJson> for CameraIntrinsics {
    fn from(j: IntrinsicsJson) -> Self {
        CameraIntrinsics {
            width: j.width,
            height: j.height,
            camera_matrix: na::Matrix3::from_row_slice(&j.camera_matrix),
            distortion: na::DVector::from_vec(j.distortion_coefficients),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntrinsicsJsonLoader;

impl IntrinsicsLoader for IntrinsicsJsonLoader {
    type Model = CameraIntrinsics;

    fn load_intrinsics(&self, path: &Path) -> Result<CameraIntrinsics, DatasetError> {
        let j: IntrinsicsJson = object_from_json(path)?;
        Ok(j.into())
    }
}
