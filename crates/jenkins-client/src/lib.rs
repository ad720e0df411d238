//! HTTP client for the Jenkins REST API.
//!
//! Wraps the small slice of the Jenkins remote-access API needed to drive
//! job and build operations:
//!
//! - [`JenkinsClient::list_jobs`]: list all jobs with their status color
//! - [`JenkinsClient::get_job_detail`]: one job with its recent builds
//! - [`JenkinsClient::trigger_build`]: queue a build, optionally parameterized
//! - [`JenkinsClient::get_build_log`]: full console output of one build
//! - [`JenkinsClient::get_build_status`]: status record of one build
//!
//! Every operation is a single HTTP round trip authenticated with basic
//! auth (username + API token) and bounded by a fixed request timeout.
//! Responses are surfaced as typed records that re-serialize to exactly the
//! field projection Jenkins returned; failures map onto the
//! [`JenkinsError`] taxonomy. The client holds no per-call state, so one
//! instance can serve concurrent callers.

pub mod config;
pub mod error;
pub mod types;

use std::time::Duration;

use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

pub use crate::{
    config::{ConfigError, JenkinsConfig},
    error::JenkinsError,
    types::{BuildParameters, BuildResult, BuildSummary, JobDetail, JobSummary, ParameterValue},
};

/// Fixed bound for one upstream round trip.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Field projections requested from the Jenkins `api/json` endpoints.
const JOBS_TREE: &str = "jobs[name,url,color,buildable]";
const JOB_DETAIL_TREE: &str = "name,description,buildable,builds[number,url,result,building,timestamp,duration],lastBuild[number,url,result,building,timestamp,duration],nextBuildNumber";
const BUILD_TREE: &str = "number,url,result,building,timestamp,duration";

/// Returned by [`JenkinsClient::trigger_build`] when Jenkins omits the
/// queue-item `Location` header. Documented fallback, kept verbatim.
const TRIGGER_FALLBACK: &str = "Build triggered successfully";

/// Envelope of the top-level job listing.
#[derive(Debug, Deserialize)]
struct JobsResponse {
    jobs: Vec<JobSummary>,
}

/// Client for one Jenkins server.
///
/// Owns the connection configuration exclusively; cloning shares the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct JenkinsClient {
    http: reqwest::Client,
    config: JenkinsConfig,
    timeout: Duration,
}

impl JenkinsClient {
    /// Creates a client with the standard request timeout.
    #[must_use]
    pub fn new(config: JenkinsConfig) -> Self {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    /// Creates a client with an explicit request timeout.
    #[must_use]
    pub fn with_timeout(config: JenkinsConfig, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            timeout,
        }
    }

    /// Lists every job known to the server.
    ///
    /// # Errors
    ///
    /// Returns [`JenkinsError::Auth`] on rejected credentials,
    /// [`JenkinsError::Timeout`] / [`JenkinsError::Unavailable`] on
    /// transport failures, and [`JenkinsError::Protocol`] on any other
    /// status or an undecodable payload.
    pub async fn list_jobs(&self) -> Result<Vec<JobSummary>, JenkinsError> {
        debug!("listing jenkins jobs");
        let url = format!("{}/api/json?tree={}", self.config.base_url(), JOBS_TREE);
        let response = self.send(self.http.get(&url)).await?;
        let response = Self::check_status(response, || JenkinsError::protocol(404, "not found"))
            .await?;
        let listing: JobsResponse = self.decode(response).await?;
        Ok(listing.jobs)
    }

    /// Fetches one job with its recent builds.
    ///
    /// The job name may contain slashes, spaces and reserved characters;
    /// it is percent-encoded as a single path segment.
    ///
    /// # Errors
    ///
    /// Returns [`JenkinsError::JobNotFound`] when the server responds 404;
    /// otherwise the same failure classes as [`Self::list_jobs`].
    pub async fn get_job_detail(&self, job_name: &str) -> Result<JobDetail, JenkinsError> {
        debug!(job = job_name, "fetching job detail");
        let url = format!(
            "{}/job/{}/api/json?tree={}",
            self.config.base_url(),
            urlencoding::encode(job_name),
            JOB_DETAIL_TREE
        );
        let response = self.send(self.http.get(&url)).await?;
        let response = Self::check_status(response, || JenkinsError::JobNotFound {
            job: job_name.to_string(),
        })
        .await?;
        self.decode(response).await
    }

    /// Queues a build of `job_name`.
    ///
    /// A present, non-empty parameter map is sent form-url-encoded (every
    /// value coerced to its string form) to the parameterized trigger
    /// endpoint; otherwise a bodyless POST hits the plain trigger endpoint.
    ///
    /// Returns the queue-item reference from the `Location` response header
    /// verbatim, or a fixed success string when the header is absent.
    /// Triggering is asynchronous: a successful return means the request
    /// was queued, not that a build has started — poll the job for the
    /// resulting build.
    ///
    /// # Errors
    ///
    /// Returns [`JenkinsError::JobNotFound`] on 404 and
    /// [`JenkinsError::JobNotBuildable`] on 400/409; otherwise the same
    /// failure classes as [`Self::list_jobs`].
    pub async fn trigger_build(
        &self,
        job_name: &str,
        parameters: Option<&BuildParameters>,
    ) -> Result<String, JenkinsError> {
        let job = urlencoding::encode(job_name);
        let params = parameters.filter(|params| !params.is_empty());

        let response = if let Some(params) = params {
            debug!(job = job_name, count = params.len(), "triggering parameterized build");
            let url = format!(
                "{}/job/{}/buildWithParameters",
                self.config.base_url(),
                job
            );
            let form: Vec<(&str, String)> = params
                .iter()
                .map(|(name, value)| (name.as_str(), value.to_string()))
                .collect();
            self.send(self.http.post(&url).form(&form)).await?
        } else {
            debug!(job = job_name, "triggering build");
            let url = format!("{}/job/{}/build", self.config.base_url(), job);
            self.send(self.http.post(&url)).await?
        };

        let status = response.status();
        if status.is_success() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|value| value.to_str().ok());
            return Ok(location.map_or_else(|| TRIGGER_FALLBACK.to_string(), str::to_string));
        }
        match status.as_u16() {
            401 | 403 => Err(JenkinsError::Auth {
                status: status.as_u16(),
            }),
            404 => Err(JenkinsError::JobNotFound {
                job: job_name.to_string(),
            }),
            400 | 409 => Err(JenkinsError::JobNotBuildable {
                job: job_name.to_string(),
                status: status.as_u16(),
            }),
            code => {
                let body = response.text().await.unwrap_or_default();
                Err(JenkinsError::protocol(code, &body))
            }
        }
    }

    /// Fetches the full console output of one build as plain text.
    ///
    /// The entire log is returned in one transfer; for long builds this can
    /// be large.
    ///
    /// # Errors
    ///
    /// Returns [`JenkinsError::BuildNotFound`] when the server responds
    /// 404; otherwise the same failure classes as [`Self::list_jobs`].
    pub async fn get_build_log(
        &self,
        job_name: &str,
        build_number: u32,
    ) -> Result<String, JenkinsError> {
        debug!(job = job_name, build = build_number, "fetching console log");
        let url = format!(
            "{}/job/{}/{}/consoleText",
            self.config.base_url(),
            urlencoding::encode(job_name),
            build_number
        );
        let response = self.send(self.http.get(&url)).await?;
        let response = Self::check_status(response, || JenkinsError::BuildNotFound {
            job: job_name.to_string(),
            number: build_number,
        })
        .await?;
        response
            .text()
            .await
            .map_err(|err| JenkinsError::from_transport(&err, self.timeout))
    }

    /// Fetches the status record of one build.
    ///
    /// # Errors
    ///
    /// Returns [`JenkinsError::BuildNotFound`] when the server responds
    /// 404; otherwise the same failure classes as [`Self::list_jobs`].
    pub async fn get_build_status(
        &self,
        job_name: &str,
        build_number: u32,
    ) -> Result<BuildSummary, JenkinsError> {
        debug!(job = job_name, build = build_number, "fetching build status");
        let url = format!(
            "{}/job/{}/{}/api/json?tree={}",
            self.config.base_url(),
            urlencoding::encode(job_name),
            build_number,
            BUILD_TREE
        );
        let response = self.send(self.http.get(&url)).await?;
        let response = Self::check_status(response, || JenkinsError::BuildNotFound {
            job: job_name.to_string(),
            number: build_number,
        })
        .await?;
        self.decode(response).await
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, JenkinsError> {
        request
            .timeout(self.timeout)
            .basic_auth(self.config.username(), Some(self.config.api_token()))
            .send()
            .await
            .map_err(|err| JenkinsError::from_transport(&err, self.timeout))
    }

    /// Passes 2xx responses through and classifies everything else.
    /// 404 is mapped by the caller since its meaning depends on the
    /// operation (missing job vs. missing build).
    async fn check_status(
        response: reqwest::Response,
        on_not_found: impl FnOnce() -> JenkinsError,
    ) -> Result<reqwest::Response, JenkinsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status.as_u16() {
            401 | 403 => Err(JenkinsError::Auth {
                status: status.as_u16(),
            }),
            404 => Err(on_not_found()),
            code => {
                let body = response.text().await.unwrap_or_default();
                Err(JenkinsError::protocol(code, &body))
            }
        }
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, JenkinsError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| JenkinsError::from_transport(&err, self.timeout))?;
        serde_json::from_str(&body).map_err(|err| JenkinsError::Protocol {
            status,
            detail: format!("failed to decode payload: {err}"),
        })
    }
}
