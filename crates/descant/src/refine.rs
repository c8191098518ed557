//! The generate-check-regenerate loop.
//!
//! Each iteration asks the oracle for a candidate, runs the full rule set,
//! and either accepts the result, feeds the violation report back as
//! corrective guidance, or gives up when the attempt budget is spent.
//! Iterations are strictly sequential: every request depends on the
//! previous report.

use counterpoint::{AggregateReport, Checker, Composition, Voice};
use serde::{Deserialize, Serialize};

use crate::oracle::{Oracle, OracleError};

/// Budgets for the refinement loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Candidate compositions to try before giving up
    pub max_attempts: u32,

    /// Local retries for a single failed oracle call
    pub oracle_retries: u32,

    /// Re-requests when the oracle repeats the previous melody
    pub stagnation_retries: u32,
}

impl Default for RefineConfig {
    fn default() -> Self {
        RefineConfig {
            max_attempts: 5,
            oracle_retries: 3,
            stagnation_retries: 3,
        }
    }
}

/// Terminal state of a refinement run.
///
/// The three variants are distinct so callers can tell success,
/// best-effort, and oracle failure apart without reading log text.
#[derive(Debug)]
pub enum RefineOutcome {
    /// Every analyzer came back clean.
    Accepted {
        composition: Composition,
        attempts: u32,
    },

    /// The attempt budget ran out with violations still present. The last
    /// candidate and its report are returned as a best-effort result.
    Exhausted {
        composition: Composition,
        report: AggregateReport,
        attempts: u32,
    },

    /// The oracle kept failing; there is no candidate to report.
    OracleFailed { error: OracleError, attempts: u32 },
}

impl RefineOutcome {
    /// Short status string for the score renderer.
    pub fn status_label(&self) -> String {
        match self {
            RefineOutcome::Accepted { attempts, .. } => {
                format!("successful solution ({attempts} attempts)")
            }
            RefineOutcome::Exhausted { attempts, .. } => {
                format!("unresolved after {attempts} attempts")
            }
            RefineOutcome::OracleFailed { .. } => "oracle failure".to_string(),
        }
    }

    /// The final composition, when one exists.
    pub fn composition(&self) -> Option<&Composition> {
        match self {
            RefineOutcome::Accepted { composition, .. }
            | RefineOutcome::Exhausted { composition, .. } => Some(composition),
            RefineOutcome::OracleFailed { .. } => None,
        }
    }
}

/// Drives an [`Oracle`] against a [`Checker`] until a candidate passes or
/// a budget runs out.
pub struct Refiner<O> {
    oracle: O,
    checker: Checker,
    config: RefineConfig,
}

impl<O: Oracle> Refiner<O> {
    pub fn new(oracle: O, checker: Checker, config: RefineConfig) -> Self {
        Refiner {
            oracle,
            checker,
            config,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn into_oracle(self) -> O {
        self.oracle
    }

    /// Run the loop to one of its three terminal states.
    pub async fn run(&self, cantus_firmus: &Voice) -> RefineOutcome {
        let max_attempts = self.config.max_attempts.max(1);
        let mut feedback: Option<String> = None;
        let mut previous: Option<Voice> = None;
        let mut attempt = 0;

        loop {
            attempt += 1;

            let candidate = match self.request(cantus_firmus, feedback.as_deref()).await {
                Ok(candidate) => candidate,
                Err(error) => {
                    return RefineOutcome::OracleFailed {
                        error,
                        attempts: attempt,
                    }
                }
            };

            let candidate = match &previous {
                Some(previous_upper) if candidate.counterpoint == *previous_upper => {
                    match self
                        .shake_stagnation(cantus_firmus, feedback.as_deref(), previous_upper)
                        .await
                    {
                        Ok(Some(fresh)) => fresh,
                        Ok(None) => candidate,
                        Err(error) => {
                            return RefineOutcome::OracleFailed {
                                error,
                                attempts: attempt,
                            }
                        }
                    }
                }
                _ => candidate,
            };

            let report = self.checker.check(&candidate);
            if report.accepted() {
                tracing::info!(attempt, "composition accepted");
                return RefineOutcome::Accepted {
                    composition: candidate,
                    attempts: attempt,
                };
            }

            tracing::info!(
                attempt,
                findings = report.finding_count(),
                "candidate has rule violations"
            );

            if attempt >= max_attempts {
                return RefineOutcome::Exhausted {
                    composition: candidate,
                    report,
                    attempts: attempt,
                };
            }

            feedback = Some(report.feedback());
            previous = Some(candidate.counterpoint.clone());
        }
    }

    /// The oracle answered with the same melody as last time. Ask again,
    /// more insistently, a bounded number of times. `Ok(None)` means it
    /// would not budge and the repeat should be kept.
    async fn shake_stagnation(
        &self,
        cantus_firmus: &Voice,
        feedback: Option<&str>,
        previous_upper: &Voice,
    ) -> Result<Option<Composition>, OracleError> {
        let insistent = format!(
            "{}\nIMPORTANT: You MUST create a COMPLETELY DIFFERENT melody.",
            feedback.unwrap_or_default()
        );
        let insistent = insistent.trim_start();

        for retry in 1..=self.config.stagnation_retries {
            tracing::warn!(retry, "oracle repeated the previous melody; re-requesting");
            let candidate = self.request(cantus_firmus, Some(insistent)).await?;
            if candidate.counterpoint != *previous_upper {
                return Ok(Some(candidate));
            }
        }

        tracing::warn!("oracle kept returning the same melody; continuing with the repeat");
        Ok(None)
    }

    /// One Requesting step: an oracle call with its local retry budget.
    async fn request(
        &self,
        cantus_firmus: &Voice,
        feedback: Option<&str>,
    ) -> Result<Composition, OracleError> {
        let tries = self.config.oracle_retries.max(1);
        let mut last_error = None;

        for call in 1..=tries {
            match self.oracle.propose(cantus_firmus, feedback).await {
                Ok(candidate) => return Ok(candidate),
                Err(error) => {
                    tracing::warn!(call, %error, "oracle call failed");
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or(OracleError::EmptyResponse))
    }
}
