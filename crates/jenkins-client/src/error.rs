//! Error taxonomy for upstream Jenkins calls.

use std::time::Duration;

/// Maximum length of the response-body snippet carried by protocol errors.
const SNIPPET_LEN: usize = 200;

/// Failures raised by [`JenkinsClient`](crate::JenkinsClient) operations.
///
/// Each variant maps one class of upstream behavior; callers match on the
/// variant rather than inspecting status codes. No variant is retried by
/// the client itself.
#[derive(Debug, thiserror::Error)]
pub enum JenkinsError {
    /// The named job does not exist on the server.
    #[error("job \"{job}\" not found on the Jenkins server")]
    JobNotFound { job: String },

    /// The named job exists but has no build with this number.
    #[error("build #{number} of job \"{job}\" not found")]
    BuildNotFound { job: String, number: u32 },

    /// The server refused to queue a build for this job.
    #[error("job \"{job}\" is not buildable (Jenkins responded with status {status})")]
    JobNotBuildable { job: String, status: u16 },

    /// The configured credentials were rejected (401 or 403).
    #[error("Jenkins rejected the configured credentials (status {status})")]
    Auth { status: u16 },

    /// The server did not answer within the request timeout.
    #[error("Jenkins did not respond within {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The server could not be reached at the network level.
    #[error("failed to reach the Jenkins server: {0}")]
    Unavailable(String),

    /// The server answered with an unclassified status or an undecodable
    /// payload.
    #[error("unexpected response from Jenkins (status {status}): {detail}")]
    Protocol { status: u16, detail: String },
}

impl JenkinsError {
    /// Classifies a transport-level `reqwest` failure.
    pub(crate) fn from_transport(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                timeout_secs: timeout.as_secs(),
            }
        } else {
            Self::Unavailable(err.to_string())
        }
    }

    /// Builds a protocol error from a status code and response body,
    /// truncating the body to a diagnostic snippet.
    pub(crate) fn protocol(status: u16, body: &str) -> Self {
        let trimmed = body.trim();
        let detail = if trimmed.is_empty() {
            "empty response body".to_string()
        } else if trimmed.chars().count() > SNIPPET_LEN {
            let snippet: String = trimmed.chars().take(SNIPPET_LEN).collect();
            format!("{snippet}…")
        } else {
            trimmed.to_string()
        };
        Self::Protocol { status, detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_not_found_names_job_and_number() {
        let err = JenkinsError::BuildNotFound {
            job: "deploy".to_string(),
            number: 999,
        };
        let message = err.to_string();
        assert!(message.contains("deploy"));
        assert!(message.contains("999"));
    }

    #[test]
    fn test_protocol_truncates_long_bodies() {
        let body = "x".repeat(500);
        let JenkinsError::Protocol { status, detail } = JenkinsError::protocol(500, &body) else {
            panic!("expected protocol error");
        };
        assert_eq!(status, 500);
        assert!(detail.chars().count() <= SNIPPET_LEN + 1);
        assert!(detail.ends_with('…'));
    }

    #[test]
    fn test_protocol_reports_empty_body() {
        let err = JenkinsError::protocol(502, "   ");
        assert!(err.to_string().contains("empty response body"));
    }
}
