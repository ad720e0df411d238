//! Static tool catalog and argument parsing.
//!
//! The catalog is the discoverable contract surface: five tools, each with
//! a name, description and input schema generated from its typed argument
//! struct. Incoming invocations parse into the [`ToolCall`] enum before any
//! upstream work happens, so malformed requests never reach the Jenkins
//! client.

use std::{borrow::Cow, sync::Arc};

use jenkins_client::BuildParameters;
use rmcp::model::{JsonObject, Tool};
use schemars::JsonSchema;
use serde::{Deserialize, de::DeserializeOwned};

pub const LIST_JOBS: &str = "list_jenkins_jobs";
pub const GET_JOB_DETAILS: &str = "get_job_details";
pub const TRIGGER_BUILD: &str = "trigger_build";
pub const GET_BUILD_LOG: &str = "get_build_log";
pub const GET_BUILD_STATUS: &str = "get_build_status";

/// Arguments for tools addressing a job.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobArgs {
    /// Name of the Jenkins job.
    pub job_name: String,
}

/// Arguments for tools addressing one build of a job.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildArgs {
    /// Name of the Jenkins job.
    pub job_name: String,
    /// Build number to look up.
    pub build_number: u32,
}

/// Arguments for the build trigger tool.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriggerBuildArgs {
    /// Name of the Jenkins job to trigger.
    pub job_name: String,
    /// Build parameters as key-value pairs.
    #[serde(default)]
    pub parameters: Option<BuildParameters>,
}

/// One tool invocation, parsed into its strongly-typed arguments.
#[derive(Debug)]
pub enum ToolCall {
    ListJobs,
    GetJobDetails(JobArgs),
    TriggerBuild(TriggerBuildArgs),
    GetBuildLog(BuildArgs),
    GetBuildStatus(BuildArgs),
}

/// Reasons an invocation cannot be dispatched.
///
/// Both variants surface as error envelopes, never as transport faults.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: &'static str, message: String },
}

impl ToolCall {
    /// Resolves a tool name and raw argument object into a typed call.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::UnknownTool`] for names outside the catalog and
    /// [`CallError::InvalidArguments`] when a required field is absent or
    /// of the wrong primitive type.
    pub fn parse(name: &str, arguments: Option<JsonObject>) -> Result<Self, CallError> {
        let args = serde_json::Value::Object(arguments.unwrap_or_default());
        match name {
            LIST_JOBS => Ok(Self::ListJobs),
            GET_JOB_DETAILS => parse_args(GET_JOB_DETAILS, args).map(Self::GetJobDetails),
            TRIGGER_BUILD => parse_args(TRIGGER_BUILD, args).map(Self::TriggerBuild),
            GET_BUILD_LOG => parse_args(GET_BUILD_LOG, args).map(Self::GetBuildLog),
            GET_BUILD_STATUS => parse_args(GET_BUILD_STATUS, args).map(Self::GetBuildStatus),
            other => Err(CallError::UnknownTool(other.to_string())),
        }
    }
}

fn parse_args<T: DeserializeOwned>(
    tool: &'static str,
    args: serde_json::Value,
) -> Result<T, CallError> {
    serde_json::from_value(args).map_err(|err| CallError::InvalidArguments {
        tool,
        message: err.to_string(),
    })
}

/// Returns the static tool catalog.
///
/// Defined once; the dispatcher validates against exactly this surface and
/// callers discover it via the list operation.
pub fn catalog() -> Vec<Tool> {
    vec![
        tool(
            LIST_JOBS,
            "Get a list of all available Jenkins jobs",
            empty_input_schema(),
        ),
        tool(
            GET_JOB_DETAILS,
            "Get detailed information about a specific Jenkins job",
            input_schema::<JobArgs>(),
        ),
        tool(
            TRIGGER_BUILD,
            "Trigger a build for a specific Jenkins job",
            input_schema::<TriggerBuildArgs>(),
        ),
        tool(
            GET_BUILD_LOG,
            "Get the console log for a specific build",
            input_schema::<BuildArgs>(),
        ),
        tool(
            GET_BUILD_STATUS,
            "Get the status of a specific build",
            input_schema::<BuildArgs>(),
        ),
    ]
}

fn tool(name: &'static str, description: &'static str, schema: JsonObject) -> Tool {
    Tool::new(
        Cow::Borrowed(name),
        Cow::Borrowed(description),
        Arc::new(schema),
    )
}

/// Generates the input schema for an argument struct.
fn input_schema<T: JsonSchema>() -> JsonObject {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => JsonObject::default(),
    }
}

/// Schema for tools that take no arguments.
fn empty_input_schema() -> JsonObject {
    match serde_json::json!({
        "type": "object",
        "properties": {},
        "required": []
    }) {
        serde_json::Value::Object(map) => map,
        _ => JsonObject::default(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: serde_json::Value) -> JsonObject {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_catalog_exposes_expected_names() {
        let names: Vec<_> = catalog().iter().map(|tool| tool.name.to_string()).collect();
        assert_eq!(
            names,
            vec![
                LIST_JOBS,
                GET_JOB_DETAILS,
                TRIGGER_BUILD,
                GET_BUILD_LOG,
                GET_BUILD_STATUS
            ]
        );
    }

    #[test]
    fn test_catalog_schemas_declare_required_fields() {
        let tools = catalog();
        let by_name = |name: &str| {
            tools
                .iter()
                .find(|tool| tool.name == name)
                .unwrap_or_else(|| panic!("missing tool {name}"))
        };

        let details_schema = serde_json::to_value(by_name(GET_JOB_DETAILS).input_schema.as_ref())
            .unwrap();
        let required = details_schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("jobName")));

        let log_schema =
            serde_json::to_value(by_name(GET_BUILD_LOG).input_schema.as_ref()).unwrap();
        let required = log_schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("jobName")));
        assert!(required.contains(&json!("buildNumber")));

        let trigger_schema =
            serde_json::to_value(by_name(TRIGGER_BUILD).input_schema.as_ref()).unwrap();
        let required = trigger_schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("jobName")));
        assert!(!required.contains(&json!("parameters")));
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = ToolCall::parse("deploy_to_prod", None).unwrap_err();
        assert!(matches!(err, CallError::UnknownTool(name) if name == "deploy_to_prod"));
    }

    #[test]
    fn test_parse_list_jobs_ignores_arguments() {
        let call = ToolCall::parse(LIST_JOBS, None).unwrap();
        assert!(matches!(call, ToolCall::ListJobs));
    }

    #[test]
    fn test_parse_missing_required_field_names_it() {
        let err = ToolCall::parse(GET_JOB_DETAILS, Some(JsonObject::new())).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(GET_JOB_DETAILS));
        assert!(message.contains("jobName"));
    }

    #[test]
    fn test_parse_wrong_primitive_type_is_rejected() {
        let args = object(json!({"jobName": "app", "buildNumber": "42"}));
        let err = ToolCall::parse(GET_BUILD_STATUS, Some(args)).unwrap_err();
        assert!(matches!(err, CallError::InvalidArguments { .. }));
    }

    #[test]
    fn test_parse_trigger_build_with_parameters() {
        let args = object(json!({
            "jobName": "app",
            "parameters": {"branch": "main", "retries": 3, "clean": true}
        }));
        let ToolCall::TriggerBuild(parsed) = ToolCall::parse(TRIGGER_BUILD, Some(args)).unwrap()
        else {
            panic!("expected trigger call");
        };
        assert_eq!(parsed.job_name, "app");
        assert_eq!(parsed.parameters.unwrap().len(), 3);
    }

    #[test]
    fn test_parse_trigger_build_without_parameters() {
        let args = object(json!({"jobName": "app"}));
        let ToolCall::TriggerBuild(parsed) = ToolCall::parse(TRIGGER_BUILD, Some(args)).unwrap()
        else {
            panic!("expected trigger call");
        };
        assert!(parsed.parameters.is_none());
    }
}
