use serde_json::Value;

use crate::config::Fields;
use crate::error::DatasetError;

/// One joint of the kinematic chain.
#[derive(Debug, Clone, PartialEq)]
pub struct JointInfo {
    pub name: String,
    pub ticks_to_rad: f64,
    pub angular_noise_std_dev: f64,
}

impl JointInfo {
    pub fn ticks_to_radians(&self, ticks: i64) -> f64 {
        ticks as f64 * self.ticks_to_rad
    }
}

/// Parses the `kinematic_chain` list. The returned order is the input order.
pub fn parse_joints(kinematic_chain: &[Value]) -> Result<Vec<JointInfo>, DatasetError> {
    kinematic_chain
        .iter()
        .enumerate()
        .map(|(j, node)| {
            let fields = Fields::new(format!("kinematic_chain[{j}]"), node)?;
            Ok(JointInfo {
                name: fields.str("name")?.to_string(),
                ticks_to_rad: fields.f64("ticks_to_rad")?,
                angular_noise_std_dev: fields.f64("angular_noise_std_dev")?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldProblem;
    use serde_json::json;

    #[test]
    fn keeps_input_order() {
        let chain = json!([
            {"name": "tilt", "ticks_to_rad": 0.001, "angular_noise_std_dev": 0.01},
            {"name": "pan", "ticks_to_rad": 0.002, "angular_noise_std_dev": 0.02},
        ]);
        let joints = parse_joints(chain.as_array().unwrap()).unwrap();
        let names: Vec<_> = joints.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["tilt", "pan"]);
        assert_eq!(joints[1].ticks_to_radians(500), 1.0);
    }

    #[test]
    fn missing_field_names_field_and_joint() {
        let chain = json!([
            {"name": "pan", "ticks_to_rad": 0.001, "angular_noise_std_dev": 0.01},
            {"name": "tilt", "angular_noise_std_dev": 0.01},
        ]);
        match parse_joints(chain.as_array().unwrap()) {
            Err(DatasetError::ConfigField {
                location,
                field,
                problem,
            }) => {
                assert_eq!(location, "kinematic_chain[1]");
                assert_eq!(field, "ticks_to_rad");
                assert_eq!(problem, FieldProblem::Missing);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wrong_typed_name_is_rejected() {
        let chain = json!([{"name": 3, "ticks_to_rad": 0.1, "angular_noise_std_dev": 0.1}]);
        assert!(matches!(
            parse_joints(chain.as_array().unwrap()),
            Err(DatasetError::ConfigField {
                problem: FieldProblem::WrongType { expected: "string" },
                ..
            })
        ));
    }
}
