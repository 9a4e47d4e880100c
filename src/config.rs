//! Field access on the root calibration document.
//!
//! The document is read as a generic `serde_json::Value` so that every missing
//! or mistyped field can be reported with the location it was expected at.
//! Numeric fields also accept strings holding a number, e.g. `"joint_ticks_0": "1200"`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{DatasetError, FieldProblem};
use crate::io::{dataset_dir, object_from_json, resolve_path};
use crate::types::CameraId;

/// Named view on one JSON object, remembering where it sits in the document.
pub struct Fields<'a> {
    location: String,
    object: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(location: impl Into<String>, value: &'a Value) -> Result<Fields<'a>, DatasetError> {
        let location = location.into();
        match value.as_object() {
            Some(object) => Ok(Fields { location, object }),
            None => Err(DatasetError::field(
                location,
                "",
                FieldProblem::WrongType { expected: "object" },
            )),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field)
    }

    fn require(&self, field: &str) -> Result<&'a Value, DatasetError> {
        self.get(field)
            .ok_or_else(|| DatasetError::field(&self.location, field, FieldProblem::Missing))
    }

    fn wrong_type(&self, field: &str, expected: &'static str) -> DatasetError {
        DatasetError::field(&self.location, field, FieldProblem::WrongType { expected })
    }

    pub fn str(&self, field: &str) -> Result<&'a str, DatasetError> {
        self.require(field)?
            .as_str()
            .ok_or_else(|| self.wrong_type(field, "string"))
    }

    pub fn f64(&self, field: &str) -> Result<f64, DatasetError> {
        value_as_f64(self.require(field)?).ok_or_else(|| self.wrong_type(field, "number"))
    }

    pub fn i64(&self, field: &str) -> Result<i64, DatasetError> {
        self.i64_value(field, self.require(field)?)
    }

    /// Converts an already looked-up value of `field`.
    pub fn i64_value(&self, field: &str, value: &Value) -> Result<i64, DatasetError> {
        value_as_i64(value).ok_or_else(|| self.wrong_type(field, "integer"))
    }

    pub fn camera_id(&self, field: &str) -> Result<CameraId, DatasetError> {
        CameraId::try_from(self.i64(field)?).map_err(|_| self.wrong_type(field, "camera id"))
    }

    pub fn array(&self, field: &str) -> Result<&'a [Value], DatasetError> {
        self.require(field)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.wrong_type(field, "array"))
    }
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// One entry of the `cameras` list with its directory already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraEntry {
    pub camera_id: CameraId,
    pub camera_path: PathBuf,
}

/// The root calibration document together with the directory its relative paths refer to.
pub struct RootDocument {
    path: PathBuf,
    base_dir: PathBuf,
    root: Value,
}

impl RootDocument {
    pub fn from_json_file(path: &Path) -> Result<RootDocument, DatasetError> {
        let root: Value = object_from_json(path)?;
        RootDocument::from_value(path, dataset_dir(path), root)
    }

    /// Wraps an in-memory document; `base_dir` plays the role of the file's directory.
    pub fn from_value(
        path: impl Into<PathBuf>,
        base_dir: impl Into<PathBuf>,
        root: Value,
    ) -> Result<RootDocument, DatasetError> {
        let path = path.into();
        if !root.is_object() {
            return Err(DatasetError::InvalidDocument {
                path,
                reason: "root of a calibration document must be an object".to_string(),
            });
        }
        Ok(RootDocument {
            path,
            base_dir: base_dir.into(),
            root,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn fields(&self) -> Result<Fields<'_>, DatasetError> {
        Fields::new("root", &self.root)
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        resolve_path(&self.base_dir, path)
    }

    pub fn world_reference(&self) -> Result<PathBuf, DatasetError> {
        Ok(self.resolve(self.fields()?.str("world_reference")?))
    }

    pub fn kinematic_chain(&self) -> Result<&[Value], DatasetError> {
        self.fields()?.array("kinematic_chain")
    }

    pub fn calibration_frames(&self) -> Result<&[Value], DatasetError> {
        self.fields()?.array("calibration_frames")
    }

    /// Camera entries in input order. A camera id may only be declared once.
    pub fn cameras(&self) -> Result<Vec<CameraEntry>, DatasetError> {
        let mut entries: Vec<CameraEntry> = Vec::new();
        for (i, node) in self.fields()?.array("cameras")?.iter().enumerate() {
            let fields = Fields::new(format!("cameras[{i}]"), node)?;
            let camera_id = fields.camera_id("camera_id")?;
            if entries.iter().any(|e| e.camera_id == camera_id) {
                return Err(DatasetError::field(
                    fields.location(),
                    "camera_id",
                    FieldProblem::Duplicate,
                ));
            }
            let camera_path = self.resolve(fields.str("camera_path")?);
            entries.push(CameraEntry {
                camera_id,
                camera_path,
            });
        }
        Ok(entries)
    }
}

/// Per-frame values in decoded form, before correlation with detections.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameEntry {
    pub joint_ticks: Vec<i64>,
    pub image_paths: BTreeMap<CameraId, PathBuf>,
}

/// Keys of the positional per-frame fields, built once per load.
#[derive(Debug, Clone)]
pub struct FrameKeys {
    joint_tick_keys: Vec<String>,
    image_path_keys: BTreeMap<CameraId, String>,
}

impl FrameKeys {
    pub fn new(joint_count: usize, camera_ids: impl IntoIterator<Item = CameraId>) -> FrameKeys {
        FrameKeys {
            joint_tick_keys: (0..joint_count).map(|j| format!("joint_ticks_{j}")).collect(),
            image_path_keys: camera_ids
                .into_iter()
                .map(|id| (id, format!("camera_image_path_{id}")))
                .collect(),
        }
    }

    /// Reads the tick vector and the resolved image path of every camera from one frame node.
    pub fn decode(
        &self,
        frame_index: usize,
        node: &Value,
        base_dir: &Path,
    ) -> Result<FrameEntry, DatasetError> {
        let fields = Fields::new(format!("calibration_frames[{frame_index}]"), node)?;

        let mut joint_ticks = Vec::with_capacity(self.joint_tick_keys.len());
        for (joint_index, key) in self.joint_tick_keys.iter().enumerate() {
            let value = fields.get(key).ok_or(DatasetError::MissingJointTick {
                frame_index,
                joint_index,
            })?;
            joint_ticks.push(fields.i64_value(key, value)?);
        }

        let mut image_paths = BTreeMap::new();
        for (&camera_id, key) in &self.image_path_keys {
            image_paths.insert(camera_id, resolve_path(base_dir, fields.str(key)?));
        }

        Ok(FrameEntry {
            joint_ticks,
            image_paths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(root: Value) -> RootDocument {
        RootDocument::from_value("/data/root.json", "/data", root).unwrap()
    }

    #[test]
    fn numbers_may_be_given_as_strings() {
        let node = json!({"a": "1200", "b": " -3 ", "c": "0.5", "d": true});
        let fields = Fields::new("x", &node).unwrap();
        assert_eq!(fields.i64("a").unwrap(), 1200);
        assert_eq!(fields.i64("b").unwrap(), -3);
        assert_eq!(fields.f64("c").unwrap(), 0.5);
        assert!(matches!(
            fields.i64("d"),
            Err(DatasetError::ConfigField {
                problem: FieldProblem::WrongType { .. },
                ..
            })
        ));
    }

    #[test]
    fn duplicate_camera_ids_are_rejected() {
        let doc = document(json!({
            "cameras": [
                {"camera_id": 1, "camera_path": "cam1"},
                {"camera_id": 1, "camera_path": "cam1b"},
            ]
        }));
        match doc.cameras() {
            Err(DatasetError::ConfigField {
                location,
                field,
                problem,
            }) => {
                assert_eq!(location, "cameras[1]");
                assert_eq!(field, "camera_id");
                assert_eq!(problem, FieldProblem::Duplicate);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn camera_paths_are_resolved() {
        let doc = document(json!({
            "cameras": [
                {"camera_id": 0, "camera_path": "cam0"},
                {"camera_id": 3, "camera_path": "/elsewhere/cam3"},
            ]
        }));
        let cameras = doc.cameras().unwrap();
        assert_eq!(cameras[0].camera_path, PathBuf::from("/data/cam0"));
        assert_eq!(cameras[1].camera_id, 3);
        assert_eq!(cameras[1].camera_path, PathBuf::from("/elsewhere/cam3"));
    }

    #[test]
    fn negative_camera_id_is_wrong_type() {
        let doc = document(json!({"cameras": [{"camera_id": -1, "camera_path": "c"}]}));
        assert!(matches!(
            doc.cameras(),
            Err(DatasetError::ConfigField { ref field, .. }) if field == "camera_id"
        ));
    }

    #[test]
    fn frame_keys_follow_positional_naming() {
        let keys = FrameKeys::new(2, [0, 7]);
        let node = json!({
            "camera_image_path_0": "a/img0.png",
            "camera_image_path_7": "/abs/img7.png",
            "joint_ticks_0": 10,
            "joint_ticks_1": "-20",
            "joint_ticks_2": 99,
        });
        let entry = keys.decode(0, &node, Path::new("/d")).unwrap();
        assert_eq!(entry.joint_ticks, vec![10, -20]);
        assert_eq!(entry.image_paths[&0], PathBuf::from("/d/a/img0.png"));
        assert_eq!(entry.image_paths[&7], PathBuf::from("/abs/img7.png"));
    }

    #[test]
    fn decode_reports_missing_tick() {
        let keys = FrameKeys::new(3, [0]);
        let node = json!({
            "camera_image_path_0": "img0.png",
            "joint_ticks_0": 1,
            "joint_ticks_1": 2,
        });
        let err = keys.decode(4, &node, Path::new("/d")).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingJointTick {
                frame_index: 4,
                joint_index: 2
            }
        ));
    }

    #[test]
    fn decode_reports_missing_image_path() {
        let keys = FrameKeys::new(0, [2]);
        let err = keys.decode(0, &json!({}), Path::new("/d")).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ConfigField { ref field, problem: FieldProblem::Missing, .. }
                if field == "camera_image_path_2"
        ));
    }

    #[test]
    fn document_keeps_its_path_and_directory() {
        let doc = document(json!({"world_reference": "ref/tags.json"}));
        assert_eq!(doc.path(), Path::new("/data/root.json"));
        assert_eq!(doc.base_dir(), Path::new("/data"));
        assert_eq!(doc.world_reference().unwrap(), PathBuf::from("/data/ref/tags.json"));
    }

    #[test]
    fn root_must_be_object() {
        assert!(matches!(
            RootDocument::from_value("r.json", "", json!([1, 2])),
            Err(DatasetError::InvalidDocument { .. })
        ));
    }
}
