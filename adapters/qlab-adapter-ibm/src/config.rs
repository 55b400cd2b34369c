//! Connection settings for IBM Quantum.

use std::fmt;

use qlab_hal::EnvTokenProvider;

use crate::error::{IbmError, IbmResult};

/// Default IBM Quantum Cloud API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://quantum.cloud.ibm.com/api";

/// IBM Cloud IAM token endpoint.
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// Environment variable holding the IBM Cloud service instance CRN.
pub const SERVICE_CRN_VAR: &str = "IBM_SERVICE_CRN";

/// Optional endpoint override.
pub const ENDPOINT_VAR: &str = "IBM_QUANTUM_ENDPOINT";

/// Optional IAM token endpoint override.
pub const IAM_URL_VAR: &str = "IBM_IAM_URL";

/// Credentials and endpoints for the IBM Quantum Cloud API.
///
/// Building a config never performs network I/O.
#[derive(Clone)]
pub struct IbmConfig {
    api_key: String,
    service_crn: String,
    endpoint: String,
    iam_url: String,
}

impl IbmConfig {
    /// Create a config for the public IBM Cloud endpoints.
    pub fn new(api_key: impl Into<String>, service_crn: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            service_crn: service_crn.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            iam_url: DEFAULT_IAM_URL.to_string(),
        }
    }

    /// Read the config from `IBM_QUANTUM_API_KEY` and `IBM_SERVICE_CRN`.
    ///
    /// `IBM_QUANTUM_ENDPOINT` and `IBM_IAM_URL` override the endpoints when set.
    pub fn from_env() -> IbmResult<Self> {
        let mut config = Self::from_providers(
            &EnvTokenProvider::ibm(),
            &EnvTokenProvider::new(SERVICE_CRN_VAR),
        )?;
        if let Ok(endpoint) = EnvTokenProvider::new(ENDPOINT_VAR).get_token() {
            config = config.with_endpoint(endpoint);
        }
        if let Ok(iam_url) = EnvTokenProvider::new(IAM_URL_VAR).get_token() {
            config = config.with_iam_url(iam_url);
        }
        Ok(config)
    }

    /// Read the API key and service CRN through the given providers.
    pub fn from_providers(
        api_key: &EnvTokenProvider,
        service_crn: &EnvTokenProvider,
    ) -> IbmResult<Self> {
        let key = read(api_key)?;
        let crn = read(service_crn)?;
        Ok(Self::new(key, crn))
    }

    /// Use a different API endpoint. A trailing slash is removed.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a different IAM token endpoint.
    pub fn with_iam_url(mut self, iam_url: impl Into<String>) -> Self {
        self.iam_url = iam_url.into();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn service_crn(&self) -> &str {
        &self.service_crn
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn iam_url(&self) -> &str {
        &self.iam_url
    }
}

fn read(provider: &EnvTokenProvider) -> IbmResult<String> {
    provider
        .get_token()
        .map_err(|_| IbmError::MissingCredential {
            var: provider.env_var().to_string(),
        })
}

impl fmt::Debug for IbmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmConfig")
            .field("api_key", &"[REDACTED]")
            .field("service_crn", &self.service_crn)
            .field("endpoint", &self.endpoint)
            .field("iam_url", &self.iam_url)
            .finish()
    }
}
