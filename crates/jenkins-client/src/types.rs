//! Typed projections of Jenkins API payloads.

use std::{collections::HashMap, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Jenkins build outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuildResult {
    Success,
    Failure,
    Unstable,
    Aborted,
    #[serde(rename = "NOT_BUILT")]
    NotBuilt,
}

/// One job as returned by the top-level job listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    /// Job name.
    pub name: String,
    /// Canonical job URL on the Jenkins server.
    pub url: String,
    /// Status color indicator (e.g. `blue`, `red`, `disabled`).
    pub color: String,
    /// Whether the job can currently be built.
    pub buildable: bool,
}

/// One numbered execution of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    /// Build number, unique per job.
    pub number: u32,
    /// Canonical build URL.
    pub url: String,
    /// Final outcome; absent while the build is still running.
    #[serde(default)]
    pub result: Option<BuildResult>,
    /// Whether the build is currently in progress.
    pub building: bool,
    /// Start time as Unix epoch milliseconds.
    pub timestamp: u64,
    /// Duration in milliseconds; zero while running.
    pub duration: u64,
}

/// Detailed view of a single job, including its recent builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    pub name: String,
    /// Job description; Jenkins reports `null` when none is set.
    #[serde(default)]
    pub description: Option<String>,
    pub buildable: bool,
    /// Recent builds, most recent first as returned upstream.
    #[serde(default)]
    pub builds: Vec<BuildSummary>,
    /// The most recent build, if the job has ever been built.
    #[serde(default)]
    pub last_build: Option<BuildSummary>,
    /// Number the next build of this job will receive.
    pub next_build_number: u32,
}

/// Scalar value for one build parameter.
///
/// Jenkins accepts parameters as form-encoded strings; callers may pass
/// strings, numbers or booleans and each is coerced to its string form when
/// the trigger request is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Caller-supplied parameters for a parameterized build trigger.
pub type BuildParameters = HashMap<String, ParameterValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_result_deserializes_from_jenkins_format() {
        assert_eq!(
            serde_json::from_str::<BuildResult>("\"SUCCESS\"").unwrap(),
            BuildResult::Success
        );
        assert_eq!(
            serde_json::from_str::<BuildResult>("\"FAILURE\"").unwrap(),
            BuildResult::Failure
        );
        assert_eq!(
            serde_json::from_str::<BuildResult>("\"NOT_BUILT\"").unwrap(),
            BuildResult::NotBuilt
        );
    }

    #[test]
    fn test_build_summary_result_absent_while_running() {
        let body = r#"
        {
          "number": 43,
          "url": "http://jenkins/job/my-job/43/",
          "building": true,
          "result": null,
          "timestamp": 1704067200000,
          "duration": 0
        }
        "#;
        let build: BuildSummary = serde_json::from_str(body).unwrap();
        assert!(build.building);
        assert_eq!(build.result, None);
        assert_eq!(build.duration, 0);
    }

    #[test]
    fn test_job_detail_tolerates_missing_optional_fields() {
        let body = r#"
        {
          "name": "fresh-job",
          "description": null,
          "buildable": true,
          "builds": [],
          "lastBuild": null,
          "nextBuildNumber": 1
        }
        "#;
        let detail: JobDetail = serde_json::from_str(body).unwrap();
        assert_eq!(detail.description, None);
        assert!(detail.builds.is_empty());
        assert_eq!(detail.last_build, None);
        assert_eq!(detail.next_build_number, 1);
    }

    #[test]
    fn test_job_detail_round_trips_camel_case_fields() {
        let body = r#"{"name":"app","description":"nightly","buildable":true,"builds":[{"number":7,"url":"http://jenkins/job/app/7/","result":"SUCCESS","building":false,"timestamp":1704067200000,"duration":120000}],"lastBuild":{"number":7,"url":"http://jenkins/job/app/7/","result":"SUCCESS","building":false,"timestamp":1704067200000,"duration":120000},"nextBuildNumber":8}"#;
        let detail: JobDetail = serde_json::from_str(body).unwrap();
        let serialized = serde_json::to_value(&detail).unwrap();
        let original: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(serialized, original);
    }

    #[test]
    fn test_parameter_value_coerces_to_string_form() {
        assert_eq!(ParameterValue::Bool(true).to_string(), "true");
        assert_eq!(
            ParameterValue::Number(serde_json::Number::from(3)).to_string(),
            "3"
        );
        assert_eq!(ParameterValue::Text("main".to_string()).to_string(), "main");
    }

    #[test]
    fn test_parameter_value_deserializes_each_scalar_kind() {
        let params: BuildParameters =
            serde_json::from_str(r#"{"branch":"main","retries":3,"clean":false}"#).unwrap();
        assert_eq!(
            params.get("branch"),
            Some(&ParameterValue::Text("main".to_string()))
        );
        assert_eq!(
            params.get("retries"),
            Some(&ParameterValue::Number(serde_json::Number::from(3)))
        );
        assert_eq!(params.get("clean"), Some(&ParameterValue::Bool(false)));
    }
}
