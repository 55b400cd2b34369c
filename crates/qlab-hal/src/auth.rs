//! Credentials read from the process environment.
//!
//! Reading a credential never touches the network, so callers can reject a
//! misconfigured process before any remote call is attempted.

use std::fmt;

use crate::error::{HalError, HalResult};

/// Reads an API token from an environment variable.
#[derive(Clone, PartialEq, Eq)]
pub struct EnvTokenProvider {
    env_var: String,
}

impl EnvTokenProvider {
    /// Create a provider for `env_var`.
    pub fn new(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
        }
    }

    /// Provider for the IBM Cloud API key (`IBM_QUANTUM_API_KEY`).
    pub fn ibm() -> Self {
        Self::new("IBM_QUANTUM_API_KEY")
    }

    /// Name of the environment variable.
    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    /// Read the token. Unset, empty and whitespace-only values are errors.
    pub fn get_token(&self) -> HalResult<String> {
        match std::env::var(&self.env_var) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            Ok(_) => Err(HalError::Configuration(format!(
                "Environment variable {} is empty",
                self.env_var
            ))),
            Err(_) => Err(HalError::Configuration(format!(
                "Environment variable {} not set",
                self.env_var
            ))),
        }
    }

    /// Check whether a usable token is present.
    pub fn has_valid_token(&self) -> bool {
        self.get_token().is_ok()
    }
}

impl fmt::Debug for EnvTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvTokenProvider")
            .field("env_var", &self.env_var)
            .finish()
    }
}
