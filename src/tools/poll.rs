use crate::constants::{network, poll};
use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::sources::{HttpResponse, PollRequest, Transport};
use crate::utils::template::stringify_value;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::Instant;

/// Backoff and budget policy for one wait tool. Fixed per tool at
/// construction time; every field can be overridden from the tool's
/// `poll` config block.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    pub max_retries: usize,
    /// Overall wall-clock cutoff for the whole invocation.
    pub deadline: Duration,
    /// Bound on each individual request, separate from the deadline.
    pub request_timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(poll::INITIAL_DELAY_MS),
            multiplier: poll::MULTIPLIER,
            max_delay: Duration::from_millis(poll::MAX_DELAY_MS),
            max_retries: poll::MAX_RETRIES,
            deadline: Duration::from_millis(poll::DEADLINE_MS),
            request_timeout: Duration::from_millis(network::TIMEOUT_REQUEST_MS),
        }
    }
}

/// Optional `poll` block of the tool config surface.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOverrides {
    pub initial_delay_ms: Option<u64>,
    pub multiplier: Option<f64>,
    pub max_delay_ms: Option<u64>,
    pub max_retries: Option<usize>,
    pub deadline_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

impl PollPolicy {
    pub fn with_overrides(overrides: &PollOverrides) -> Result<Self, ToolError> {
        let multiplier = overrides.multiplier.unwrap_or(poll::MULTIPLIER);
        // mul_f64 panics on NaN or negative factors; reject them here.
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ToolError::config(format!(
                "Poll multiplier must be a finite value of at least 1, got {}",
                multiplier
            )));
        }

        let defaults = Self::default();
        Ok(Self {
            initial_delay: overrides
                .initial_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.initial_delay),
            multiplier,
            max_delay: overrides
                .max_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.max_delay),
            max_retries: overrides.max_retries.unwrap_or(defaults.max_retries),
            deadline: overrides
                .deadline_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.deadline),
            request_timeout: overrides
                .request_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
        })
    }

    /// `min(delay * multiplier, max_delay)`
    pub fn next_delay(&self, delay: Duration) -> Duration {
        let scaled = delay.mul_f64(self.multiplier);
        if scaled > self.max_delay {
            self.max_delay
        } else {
            scaled
        }
    }
}

/// Mutable state for one invocation. Never shared, never persisted.
struct PollState {
    delay: Duration,
    attempt: usize,
    started: Instant,
    deadline: Instant,
}

enum RoundVerdict {
    /// `done` stringifies to true, no `error` field: final body.
    Complete(String),
    /// Non-200 status, or `done` with an `error` field. Never retried.
    Fatal(ToolError),
    /// Anything else, including non-JSON bodies: poll again.
    NotDone,
}

/// Minimal structural view of a status body. Both fields are optional and
/// untyped; endpoints disagree on how they encode `done`.
#[derive(Debug, serde::Deserialize)]
struct OperationStatus {
    #[serde(default)]
    done: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Classifies one 200-or-otherwise response. Non-200 is fatal: a reachable
/// server returning an unexpected status will not self-resolve by waiting,
/// unlike transport-level blips. The `done` comparison is stringified to
/// tolerate boolean, string, and numeric encodings.
fn classify(response: &HttpResponse) -> RoundVerdict {
    if response.status != 200 {
        return RoundVerdict::Fatal(
            ToolError::operation(format!(
                "Unexpected status code during polling: {}, response body: {}",
                response.status, response.body
            ))
            .with_details(json!({"status": response.status, "body": response.body})),
        );
    }

    let Ok(status) = serde_json::from_str::<OperationStatus>(&response.body) else {
        // Some status endpoints emit non-JSON progress text before the
        // final payload. Keep polling.
        return RoundVerdict::NotDone;
    };

    match status.done {
        Some(ref done) if stringify_value(done) == "true" => {
            if status.error.is_some() {
                RoundVerdict::Fatal(ToolError::operation(format!(
                    "Operation finished with error: {}",
                    response.body
                )))
            } else {
                RoundVerdict::Complete(response.body.clone())
            }
        }
        _ => RoundVerdict::NotDone,
    }
}

/// The polling state machine. Rounds run strictly in order; each round
/// checks the deadline, builds and executes one request, classifies it,
/// and either returns or sleeps out the backoff. Transport failures and
/// not-yet-done responses draw from the same retry budget.
pub struct PollEngine<'a> {
    transport: &'a dyn Transport,
    policy: &'a PollPolicy,
    logger: &'a Logger,
}

impl<'a> PollEngine<'a> {
    pub fn new(transport: &'a dyn Transport, policy: &'a PollPolicy, logger: &'a Logger) -> Self {
        Self {
            transport,
            policy,
            logger,
        }
    }

    /// Runs rounds until a terminal state, returning the final response
    /// body on success. `build_request` is consulted every round, so
    /// header composition errors surface in invocation order.
    pub async fn run<F>(&self, mut build_request: F) -> Result<String, ToolError>
    where
        F: FnMut() -> Result<PollRequest, ToolError>,
    {
        let started = Instant::now();
        let mut state = PollState {
            delay: self.policy.initial_delay,
            attempt: 0,
            started,
            deadline: started + self.policy.deadline,
        };

        while state.attempt < self.policy.max_retries {
            if Instant::now() >= state.deadline {
                return Err(ToolError::timeout(format!(
                    "Timed out waiting for operation after {:.1}s",
                    state.started.elapsed().as_secs_f64()
                )));
            }

            let request = build_request()?;
            match self.transport.execute(&request).await {
                Err(err) => {
                    self.logger.warn(
                        "Poll request failed",
                        Some(&json!({
                            "error": err.message,
                            "retry_in_ms": state.delay.as_millis() as u64,
                        })),
                    );
                    self.backoff(&mut state).await;
                }
                Ok(response) => match classify(&response) {
                    RoundVerdict::Complete(body) => return Ok(body),
                    RoundVerdict::Fatal(err) => return Err(err),
                    RoundVerdict::NotDone => {
                        self.logger.debug(
                            "Operation not complete",
                            Some(&json!({
                                "retry_in_ms": state.delay.as_millis() as u64,
                            })),
                        );
                        self.backoff(&mut state).await;
                    }
                },
            }
        }

        Err(
            ToolError::retries_exhausted("Exceeded max retries waiting for operation")
                .with_details(json!({"attempts": self.policy.max_retries})),
        )
    }

    async fn backoff(&self, state: &mut PollState) {
        tokio::time::sleep(state.delay).await;
        state.delay = self.policy.next_delay(state.delay);
        state.attempt += 1;
    }
}
