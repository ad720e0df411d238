//! MCP service bridging the tool catalog to the Jenkins client.
//!
//! Every invocation outcome — success, unknown tool, invalid arguments,
//! upstream failure — is wrapped in the same result envelope
//! (`content` + `isError`). Callers never see a different structural shape
//! and upstream failures never escape as transport faults.

use std::{future::Future, sync::Arc};

use jenkins_client::{JenkinsClient, JenkinsError};
use rmcp::{
    RoleServer,
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData, JsonObject, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::tools::{self, ToolCall};

/// The MCP server handler.
///
/// Holds the upstream client behind an `Arc`; invocations share no other
/// state, so concurrent calls need no locking.
#[derive(Clone)]
pub struct JenkinsService {
    client: Arc<JenkinsClient>,
}

impl JenkinsService {
    #[must_use]
    pub fn new(client: JenkinsClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Runs one invocation end to end and wraps the outcome in an envelope.
    pub(crate) async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> CallToolResult {
        let call = match ToolCall::parse(name, arguments) {
            Ok(call) => call,
            Err(err) => {
                warn!(tool = name, error = %err, "rejected tool invocation");
                return error_envelope(&err.to_string());
            }
        };
        match self.execute(call).await {
            Ok(result) => result,
            Err(err) => {
                warn!(tool = name, error = %err, "tool invocation failed upstream");
                error_envelope(&err.to_string())
            }
        }
    }

    async fn execute(&self, call: ToolCall) -> Result<CallToolResult, JenkinsError> {
        match call {
            ToolCall::ListJobs => {
                let jobs = self.client.list_jobs().await?;
                Ok(json_envelope(&jobs))
            }
            ToolCall::GetJobDetails(args) => {
                let detail = self.client.get_job_detail(&args.job_name).await?;
                Ok(json_envelope(&detail))
            }
            ToolCall::TriggerBuild(args) => {
                let location = self
                    .client
                    .trigger_build(&args.job_name, args.parameters.as_ref())
                    .await?;
                Ok(text_envelope(location))
            }
            ToolCall::GetBuildLog(args) => {
                let log = self
                    .client
                    .get_build_log(&args.job_name, args.build_number)
                    .await?;
                Ok(text_envelope(log))
            }
            ToolCall::GetBuildStatus(args) => {
                let status = self
                    .client
                    .get_build_status(&args.job_name, args.build_number)
                    .await?;
                Ok(json_envelope(&status))
            }
        }
    }
}

/// Success envelope carrying a record pretty-printed as JSON text.
fn json_envelope<T: Serialize>(value: &T) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => text_envelope(text),
        Err(err) => error_envelope(&format!("failed to serialize response: {err}")),
    }
}

/// Success envelope carrying raw text.
fn text_envelope(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

/// Error envelope; the only signal of failure is the `isError` flag plus
/// the message text.
fn error_envelope(message: &str) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {message}"))])
}

impl ServerHandler for JenkinsService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Exposes job and build operations of a Jenkins server: list jobs, \
                 inspect a job, trigger builds, and fetch build logs and status."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: tools::catalog(),
                next_cursor: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        let service = self.clone();
        async move {
            debug!(tool = %request.name, "invoking tool");
            Ok(service.dispatch(&request.name, request.arguments).await)
        }
    }
}
