//! Bounded polling loop for job completion.

use std::time::Duration;

use tokio::time::Instant;

use beautygen_core::poll::{PollConfig, PollPlanner, PollStep};

use crate::api::GenerationApi;
use crate::error::ClientError;
use crate::job::GenerationJob;

impl GenerationApi {
    /// Poll a job until it reaches a terminal state or `max_wait`
    /// elapses.
    ///
    /// Soft errors (mangled responses, protection pages, transport
    /// blips) are retried up to [`PollConfig::max_retries`] consecutive
    /// times; any healthy report refills the budget.  The loop is
    /// guaranteed to return within `max_wait` plus one poll interval.
    pub async fn wait_for_completion(
        &self,
        prompt_id: &str,
        max_wait: Duration,
        config: &PollConfig,
    ) -> Result<GenerationJob, ClientError> {
        let deadline = Instant::now() + max_wait;
        let mut planner = PollPlanner::new(config.clone());

        tracing::info!(prompt_id, max_wait_secs = max_wait.as_secs(), "Waiting for completion");

        while Instant::now() < deadline {
            let report = self.poll_status(prompt_id).await;

            match planner.on_report(&report.status, report.message.as_deref()) {
                PollStep::Completed => {
                    tracing::info!(prompt_id, "Generation completed");
                    return Ok(GenerationJob {
                        prompt_id: prompt_id.to_string(),
                        status: report.status,
                        message: report.message,
                        prompt: None,
                        images: report.images.unwrap_or_default(),
                    });
                }
                PollStep::Failed(message) => {
                    tracing::error!(prompt_id, %message, "Generation failed");
                    return Err(ClientError::GenerationFailed(message));
                }
                PollStep::RetriesExhausted(bound) => {
                    tracing::error!(prompt_id, bound, "Status checks kept failing");
                    return Err(ClientError::GenerationFailed(format!(
                        "status check failed after {bound} retries"
                    )));
                }
                PollStep::Sleep(delay) => {
                    tracing::debug!(
                        prompt_id,
                        status = %report.status,
                        delay_ms = delay.as_millis() as u64,
                        retries_used = planner.retries_used(),
                        "Job still pending",
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        tracing::error!(prompt_id, "Generation timed out");
        Err(ClientError::Timeout(max_wait.as_secs()))
    }
}
