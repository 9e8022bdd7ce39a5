//! Client for the remote load-flow solver.
//!
//! The solver is an HTTP service that takes the flattened payload as a JSON
//! body and answers with a JSON document of results. Requests are blocking;
//! the editor runs them off the UI thread.

use crate::constants::{
    DEFAULT_SOLVER_TIMEOUT_SECS, DEFAULT_SOLVER_URL, SOLVER_TIMEOUT_ENV, SOLVER_URL_ENV,
};
use crate::network::NetworkPayload;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Why a simulation request failed.
#[derive(Error, Debug)]
pub enum SolverError {
    /// Nothing in the drawing flattens to a component
    #[error("the diagram contains no components to simulate")]
    EmptyNetwork,

    /// Endpoint is not an http(s) URL
    #[error("solver endpoint {0:?} is not an http(s) URL")]
    InvalidEndpoint(String),

    /// Connection, TLS or timeout failure
    #[error("could not reach solver: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("solver answered with status {code}: {body}")]
    Status {
        /// HTTP status code
        code: u16,
        /// Response body, for the message
        body: String,
    },

    /// Response body is not JSON
    #[error("solver response is not valid JSON: {0}")]
    Decode(#[from] std::io::Error),
}

/// Where and how long to wait for the solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Solver URL the payload is POSTed to
    pub endpoint: String,
    /// Whole-request timeout
    pub timeout_secs: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SOLVER_URL.to_string(),
            timeout_secs: DEFAULT_SOLVER_TIMEOUT_SECS,
        }
    }
}

impl SolverConfig {
    /// Defaults overridden by `GRIDSKETCH_SOLVER_URL` and
    /// `GRIDSKETCH_SOLVER_TIMEOUT`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(
            std::env::var(SOLVER_URL_ENV).ok(),
            std::env::var(SOLVER_TIMEOUT_ENV).ok(),
        )
    }

    /// Applies raw override values; unparsable timeouts are ignored.
    pub fn with_overrides(mut self, endpoint: Option<String>, timeout: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Some(raw) = timeout {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => log::warn!("ignoring invalid {SOLVER_TIMEOUT_ENV} value {raw:?}"),
            }
        }
        self
    }

    fn check(&self) -> Result<(), SolverError> {
        let endpoint = self.endpoint.to_ascii_lowercase();
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            Ok(())
        } else {
            Err(SolverError::InvalidEndpoint(self.endpoint.clone()))
        }
    }
}

/// Posts the payload and returns the solver's JSON answer.
pub fn submit(
    config: &SolverConfig,
    payload: &NetworkPayload,
) -> Result<serde_json::Value, SolverError> {
    if payload.is_empty() {
        return Err(SolverError::EmptyNetwork);
    }
    config.check()?;

    log::info!(
        "submitting {} records to {}",
        payload.len(),
        config.endpoint
    );
    let response = ureq::post(&config.endpoint)
        .timeout(Duration::from_secs(config.timeout_secs))
        .send_json(payload)
        .map_err(|err| match err {
            ureq::Error::Status(code, response) => SolverError::Status {
                code,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => SolverError::Transport(transport.to_string()),
        })?;

    let body: serde_json::Value = response.into_json()?;
    log::debug!("solver answered: {body}");
    Ok(body)
}
