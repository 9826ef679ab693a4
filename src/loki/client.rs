//! Loki delivery client
//!
//! Every call does one POST with no retries. `send` logs the outcome and
//! never fails; `push` exposes the outcome for callers that want it.

use eyre::{Context, Result};
use std::io;
use std::time::Duration;
use ureq::Agent;

use super::payload::Payload;
use crate::report::{PolicyResult, Priority};
use crate::target::Target;

/// Path appended to the configured host
pub const PUSH_PATH: &str = "/api/prom/push";

/// User-Agent sent with every push
pub const USER_AGENT: &str = "Policy-API";

/// What the Loki endpoint said about a push
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Any status up to and including 400
    Accepted { status: u16 },
    /// Status above 400, with the response body
    Rejected { status: u16, body: String },
}

/// Pushes policy results to a Loki instance
#[derive(Clone)]
pub struct Client {
    endpoint: String,
    agent: Agent,
    minimum_priority: Option<Priority>,
}

impl Client {
    /// Create a client for the Loki instance at `host`
    pub fn new(host: &str) -> Self {
        Self::build(host, None)
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(host: &str, timeout: Duration) -> Self {
        Self::build(host, Some(timeout))
    }

    fn build(host: &str, timeout: Option<Duration>) -> Self {
        // Status codes are classified here, not by ureq
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();

        Self {
            endpoint: format!("{}{}", host, PUSH_PATH),
            agent: config.into(),
            minimum_priority: None,
        }
    }

    /// Only send results at or above `priority`
    pub fn with_minimum_priority(mut self, priority: Option<Priority>) -> Self {
        self.minimum_priority = priority;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Push one result, logging the outcome
    pub fn send(&self, result: &PolicyResult) {
        let payload = Payload::new(result);

        match self.push(&payload) {
            Ok(PushOutcome::Accepted { status }) => {
                log::info!("PUSH OK");
                log::debug!("Loki accepted push for {} with status {}", result.policy, status);
            }
            Ok(PushOutcome::Rejected { status, body }) => {
                log::error!("PUSH ERROR [{}]: {}", status, body);
            }
            Err(e) => {
                log::error!("PUSH ERROR: {:#}", e);
            }
        }
    }

    /// POST a payload and classify the response
    pub fn push(&self, payload: &Payload) -> Result<PushOutcome> {
        let body = serde_json::to_vec(payload).context("Failed to encode Loki payload")?;

        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("User-Agent", USER_AGENT)
            .send(&body[..])
            .context(format!("Failed to push to {}", self.endpoint))?;

        let status = response.status().as_u16();

        if status > 400 {
            let body = response.body_mut().read_to_string().unwrap_or_else(|e| {
                log::warn!("Failed to read Loki error response: {}", e);
                String::new()
            });
            return Ok(PushOutcome::Rejected { status, body });
        }

        // Drain so the connection can go back to the pool
        if let Err(e) = io::copy(&mut response.body_mut().as_reader(), &mut io::sink()) {
            log::debug!("Failed to drain Loki response: {}", e);
        }

        Ok(PushOutcome::Accepted { status })
    }
}

impl Target for Client {
    fn name(&self) -> &str {
        "loki"
    }

    fn minimum_priority(&self) -> Option<Priority> {
        self.minimum_priority
    }

    fn send(&self, result: &PolicyResult) {
        Client::send(self, result)
    }
}
