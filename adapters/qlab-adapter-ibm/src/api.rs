//! Thin REST client for the IBM Quantum Cloud API.
//!
//! Only the calls the adapter makes are covered: the IAM key exchange,
//! device listing, and the SamplerV2 job lifecycle.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::IbmConfig;
use crate::error::{IbmError, IbmResult};

const API_VERSION: &str = "2025-05-01";
const USER_AGENT: &str = concat!("qlab/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const IAM_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const APIKEY_GRANT: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Authenticated client for one service instance.
///
/// The IAM bearer token and `Service-CRN` ride along as default headers.
pub struct IbmClient {
    http: Client,
    base: String,
}

impl fmt::Debug for IbmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmClient")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl IbmClient {
    /// Trade the API key for a bearer token, then build the API client.
    #[instrument(skip(config), fields(endpoint = %config.endpoint()))]
    pub async fn connect(config: &IbmConfig) -> IbmResult<Self> {
        let token = exchange_api_key(config).await?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(session_headers(&token, config.service_crn())?)
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base: config.endpoint().to_owned(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.base)
    }

    /// Send and decode, turning a 404 into `missing()`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        missing: impl FnOnce() -> IbmError,
    ) -> IbmResult<T> {
        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(missing());
        }
        Ok(ensure_success(response).await?.json().await?)
    }

    /// Every device visible to the instance, with live status.
    ///
    /// A device whose configuration cannot be read is logged and left out.
    #[instrument(skip(self))]
    pub async fn list_backends(&self) -> IbmResult<Vec<BackendInfo>> {
        let listing: DeviceList = ensure_success(self.http.get(self.url("backends")).send().await?)
            .await?
            .json()
            .await?;

        let mut found = Vec::new();
        for DeviceRef { name } in listing.devices {
            match self.get_backend(&name).await {
                Ok(info) => found.push(info),
                Err(err) => warn!(backend = %name, error = %err, "device skipped"),
            }
        }
        debug!(count = found.len(), "devices listed");
        Ok(found)
    }

    /// Configuration and status of one device.
    ///
    /// An unreadable status marks the device non-operational rather than
    /// failing the call.
    pub async fn get_backend(&self, name: &str) -> IbmResult<BackendInfo> {
        let raw: RawConfiguration = self
            .fetch(
                self.http.get(self.url(&format!("backends/{name}/configuration"))),
                || IbmError::BackendUnavailable(name.to_owned()),
            )
            .await?;

        let response = self
            .http
            .get(self.url(&format!("backends/{name}/status")))
            .send()
            .await?;
        let status = match response.status() {
            code if code.is_success() => response.json::<RawStatus>().await?.into(),
            code => BackendStatus {
                operational: false,
                status_msg: Some(format!("status unavailable ({code})")),
                pending_jobs: u32::MAX,
            },
        };

        Ok(raw.into_info(status))
    }

    /// Queue one OpenQASM 3 program on the SamplerV2 primitive. Returns the job id.
    #[instrument(skip(self, qasm))]
    pub async fn submit_sampler_job(
        &self,
        backend: &str,
        qasm: &str,
        shots: u32,
    ) -> IbmResult<String> {
        let payload = serde_json::json!({
            "program_id": "sampler",
            "backend": backend,
            "params": {
                "version": 2,
                "pubs": [[qasm, {}, shots]],
            },
        });
        let request = self.http.post(self.url("jobs")).json(&payload);
        let accepted: Accepted = ensure_success(request.send().await?).await?.json().await?;
        debug!(job_id = %accepted.id, "job accepted");
        Ok(accepted.id)
    }

    pub async fn get_job_status(&self, job_id: &str) -> IbmResult<RemoteJob> {
        self.fetch(self.http.get(self.url(&format!("jobs/{job_id}"))), || {
            IbmError::JobNotFound(job_id.to_owned())
        })
        .await
    }

    pub async fn get_job_results(&self, job_id: &str) -> IbmResult<SamplerOutput> {
        self.fetch(
            self.http.get(self.url(&format!("jobs/{job_id}/results"))),
            || IbmError::JobNotFound(job_id.to_owned()),
        )
        .await
    }
}

async fn exchange_api_key(config: &IbmConfig) -> IbmResult<String> {
    let iam = Client::builder()
        .timeout(IAM_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;

    let response = iam
        .post(config.iam_url())
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::ACCEPT, "application/json")
        .body(format!("grant_type={APIKEY_GRANT}&apikey={}", config.api_key()))
        .send()
        .await
        .map_err(|e| IbmError::IamTokenExchange(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = text_or_placeholder(response).await;
        return Err(IbmError::IamTokenExchange(format!("{status}: {body}")));
    }

    let token: IamToken = response
        .json()
        .await
        .map_err(|e| IbmError::IamTokenExchange(format!("unreadable token response: {e}")))?;
    debug!("bearer token obtained");
    Ok(token.access_token)
}

fn session_headers(token: &str, service_crn: &str) -> IbmResult<HeaderMap> {
    let invalid = |what: &str| IbmError::InvalidCredential(format!("{what} is not a valid header value"));

    let mut bearer =
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| invalid("IAM token"))?;
    bearer.set_sensitive(true);
    let crn = HeaderValue::from_str(service_crn).map_err(|_| invalid("service CRN"))?;
    let json = HeaderValue::from_static("application/json");

    Ok(HeaderMap::from_iter([
        (header::AUTHORIZATION, bearer),
        (header::CONTENT_TYPE, json.clone()),
        (header::ACCEPT, json),
        (HeaderName::from_static("service-crn"), crn),
        (
            HeaderName::from_static("ibm-api-version"),
            HeaderValue::from_static(API_VERSION),
        ),
    ]))
}

/// Pass a 2xx response through; anything else becomes [`IbmError::Api`].
async fn ensure_success(response: Response) -> IbmResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = text_or_placeholder(response).await;
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody { message: Some(m) }) => m,
        _ => body,
    };
    Err(IbmError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn text_or_placeholder(response: Response) -> String {
    response.text().await.unwrap_or_else(|_| "<no body>".into())
}

#[derive(Deserialize)]
struct IamToken {
    access_token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct Accepted {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DeviceList {
    devices: Vec<DeviceRef>,
}

#[derive(Debug, Deserialize)]
struct DeviceRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawConfiguration {
    backend_name: String,
    n_qubits: u32,
    #[serde(default)]
    basis_gates: Vec<String>,
    #[serde(default)]
    coupling_map: Option<Vec<[u32; 2]>>,
    #[serde(default)]
    simulator: bool,
    #[serde(default)]
    max_shots: Option<u32>,
}

impl RawConfiguration {
    fn into_info(self, status: BackendStatus) -> BackendInfo {
        BackendInfo {
            name: self.backend_name,
            num_qubits: self.n_qubits,
            basis_gates: self.basis_gates,
            coupling_map: self
                .coupling_map
                .into_iter()
                .flatten()
                .map(|[a, b]| (a, b))
                .collect(),
            simulator: self.simulator,
            max_shots: self.max_shots,
            status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    state: bool,
    #[serde(default)]
    status: String,
    #[serde(default)]
    length_queue: u64,
}

impl From<RawStatus> for BackendStatus {
    fn from(raw: RawStatus) -> Self {
        Self {
            operational: raw.state,
            status_msg: Some(raw.status).filter(|s| !s.is_empty()),
            pending_jobs: u32::try_from(raw.length_queue).unwrap_or(u32::MAX),
        }
    }
}

/// A device's configuration merged with its live status.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendInfo {
    pub name: String,
    pub num_qubits: u32,
    pub basis_gates: Vec<String>,
    /// Directed pairs, both directions usually present.
    pub coupling_map: Vec<(u32, u32)>,
    pub simulator: bool,
    pub max_shots: Option<u32>,
    pub status: BackendStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendStatus {
    pub operational: bool,
    pub status_msg: Option<String>,
    /// Queue length.
    pub pending_jobs: u32,
}

/// `GET /v1/jobs/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteJob {
    pub id: String,
    /// Mixed case on the Cloud API, e.g. `"Completed"`.
    pub status: String,
    #[serde(default)]
    pub state: Option<RemoteJobState>,
    #[serde(default)]
    pub error: Option<RemoteJobError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteJobState {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteJobError {
    pub message: String,
}

impl RemoteJob {
    pub fn state_name(&self) -> String {
        self.status.to_ascii_uppercase()
    }

    /// `state.reason`, else `error.message`.
    pub fn failure_reason(&self) -> Option<&str> {
        self.state
            .as_ref()
            .and_then(|s| s.reason.as_deref())
            .or_else(|| self.error.as_ref().map(|e| e.message.as_str()))
    }
}

/// `GET /v1/jobs/{id}/results`, one entry per submitted PUB.
#[derive(Debug, Deserialize)]
pub struct SamplerOutput {
    pub results: Vec<PubResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PubResult {
    /// Per-shot samples keyed by classical register name.
    #[serde(default)]
    pub data: Option<HashMap<String, RegisterSamples>>,
    /// Older result shape: aggregated counts keyed by hex or binary outcome.
    #[serde(default)]
    pub counts: Option<HashMap<String, u64>>,
    #[serde(default)]
    pub quasi_dists: Option<Vec<HashMap<String, f64>>>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Hex-encoded outcomes, one per shot (`["0x0", "0x5"]`).
#[derive(Debug, Deserialize)]
pub struct RegisterSamples {
    pub samples: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_job_reason_from_state() {
        let job: RemoteJob = serde_json::from_str(
            r#"{"id": "job-1", "status": "Failed",
                "state": {"status": "Failed", "reason": "circuit too deep"}}"#,
        )
        .unwrap();
        assert_eq!(job.state_name(), "FAILED");
        assert_eq!(job.failure_reason(), Some("circuit too deep"));
    }

    #[test]
    fn test_failed_job_reason_from_error() {
        let job: RemoteJob =
            serde_json::from_str(r#"{"id": "job-2", "status": "ERROR", "error": {"message": "bad qasm"}}"#)
                .unwrap();
        assert_eq!(job.failure_reason(), Some("bad qasm"));
    }

    #[test]
    fn test_device_listing_ignores_extra_fields() {
        let listing: DeviceList = serde_json::from_str(
            r#"{"devices": [{"name": "ibm_fez", "status": {"name": "online"}}, {"name": "ibm_torino"}]}"#,
        )
        .unwrap();
        let names: Vec<_> = listing.devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["ibm_fez", "ibm_torino"]);
    }

    #[test]
    fn test_configuration_into_info() {
        let raw: RawConfiguration = serde_json::from_str(
            r#"{"backend_name": "ibm_torino", "n_qubits": 133,
                "basis_gates": ["cz", "id", "rz", "sx", "x"],
                "coupling_map": [[0, 1], [1, 0], [1, 2]]}"#,
        )
        .unwrap();
        let status = BackendStatus {
            operational: true,
            status_msg: None,
            pending_jobs: 0,
        };
        let info = raw.into_info(status);
        assert_eq!(info.num_qubits, 133);
        assert_eq!(info.coupling_map, vec![(0, 1), (1, 0), (1, 2)]);
        assert!(!info.simulator);
        assert_eq!(info.max_shots, None);
    }

    #[test]
    fn test_status_conversion() {
        let raw: RawStatus = serde_json::from_str(
            r#"{"state": true, "status": "active", "message": "", "length_queue": 12}"#,
        )
        .unwrap();
        let status = BackendStatus::from(raw);
        assert!(status.operational);
        assert_eq!(status.status_msg.as_deref(), Some("active"));
        assert_eq!(status.pending_jobs, 12);

        let quiet: RawStatus = serde_json::from_str(r#"{"state": false}"#).unwrap();
        assert_eq!(BackendStatus::from(quiet).status_msg, None);
    }

    #[test]
    fn test_sampler_samples_shape() {
        let output: SamplerOutput = serde_json::from_str(
            r#"{"results": [{"data": {"c": {"samples": ["0x0", "0x5"]}}, "metadata": {"version": 2}}]}"#,
        )
        .unwrap();
        let data = output.results[0].data.as_ref().unwrap();
        assert_eq!(data["c"].samples, ["0x0", "0x5"]);
    }
}
