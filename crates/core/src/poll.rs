//! Poll-decision state machine for job status checks.
//!
//! The async polling loop in `beautygen-client` feeds each status
//! report into a [`PollPlanner`] and acts on the returned [`PollStep`].
//! Keeping the decision logic here makes the retry-budget and backoff
//! semantics testable without a server: soft errors consume the budget,
//! any healthy report refills it, terminal statuses end the loop.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Terminal success: images are ready.
pub const STATUS_COMPLETED: &str = "completed";

/// Terminal failure reported by the server.  Not retried.
pub const STATUS_FAILED: &str = "failed";

/// Soft error: a malformed, blocked, or otherwise unusable status
/// response.  Retried up to the configured budget.
pub const STATUS_ERROR: &str = "error";

/// Classification of a reported job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Completed,
    Failed,
    SoftError,
    /// Any other status (`queued`, `processing`, ...) -- keep waiting.
    InProgress,
}

/// Classify a raw status string from the server.
pub fn classify_status(status: &str) -> StatusClass {
    match status {
        STATUS_COMPLETED => StatusClass::Completed,
        STATUS_FAILED => StatusClass::Failed,
        STATUS_ERROR => StatusClass::SoftError,
        _ => StatusClass::InProgress,
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunable parameters for the polling loop.
///
/// The defaults track observed server latency (jobs usually finish in
/// single-digit seconds).  None of these are contracts; callers may
/// tighten them for smoke tests or relax them for slow deployments.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the first re-poll after a healthy report.
    pub initial_interval: Duration,
    /// Upper bound on the poll interval.
    pub max_interval: Duration,
    /// Factor by which the interval grows after each healthy report.
    pub multiplier: f64,
    /// Delay before re-polling after a soft error.
    pub retry_interval: Duration,
    /// Consecutive soft errors tolerated before giving up.
    pub max_retries: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(3),
            max_interval: Duration::from_secs(15),
            multiplier: 1.5,
            retry_interval: Duration::from_secs(5),
            max_retries: 3,
        }
    }
}

/// Calculate the next poll interval from the current one.
///
/// The result is clamped to [`PollConfig::max_interval`].
pub fn next_interval(current: Duration, config: &PollConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_interval)
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// What the polling loop should do after one status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    /// Sleep for the given duration, then poll again.
    Sleep(Duration),
    /// The job finished successfully.
    Completed,
    /// The server reported a terminal failure; carries its message.
    Failed(String),
    /// Too many consecutive soft errors; carries the retry bound.
    RetriesExhausted(u32),
}

/// Sequential decision state for one job's polling loop.
///
/// Retry counters are private to the planner, so concurrent jobs each
/// own their budget.  Status never regresses: a terminal [`PollStep`]
/// ends the loop immediately.
#[derive(Debug)]
pub struct PollPlanner {
    config: PollConfig,
    interval: Duration,
    retries_used: u32,
}

impl PollPlanner {
    pub fn new(config: PollConfig) -> Self {
        let interval = config.initial_interval;
        Self {
            config,
            interval,
            retries_used: 0,
        }
    }

    /// Feed one status report and get the next action.
    pub fn on_report(&mut self, status: &str, message: Option<&str>) -> PollStep {
        match classify_status(status) {
            StatusClass::Completed => PollStep::Completed,
            StatusClass::Failed => {
                PollStep::Failed(message.unwrap_or("Unknown error").to_string())
            }
            StatusClass::SoftError => {
                self.retries_used += 1;
                if self.retries_used > self.config.max_retries {
                    PollStep::RetriesExhausted(self.config.max_retries)
                } else {
                    PollStep::Sleep(self.config.retry_interval)
                }
            }
            StatusClass::InProgress => {
                // A healthy report refills the retry budget.
                self.retries_used = 0;
                let delay = self.interval;
                self.interval = next_interval(self.interval, &self.config);
                PollStep::Sleep(delay)
            }
        }
    }

    /// Soft errors consumed since the last healthy report.
    pub fn retries_used(&self) -> u32 {
        self.retries_used
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> PollPlanner {
        PollPlanner::new(PollConfig::default())
    }

    // --- Status classification ---

    #[test]
    fn classify_known_statuses() {
        assert_eq!(classify_status("completed"), StatusClass::Completed);
        assert_eq!(classify_status("failed"), StatusClass::Failed);
        assert_eq!(classify_status("error"), StatusClass::SoftError);
        assert_eq!(classify_status("queued"), StatusClass::InProgress);
        assert_eq!(classify_status("processing"), StatusClass::InProgress);
    }

    // --- Backoff schedule ---

    #[test]
    fn interval_grows_and_clamps() {
        let config = PollConfig::default();
        let mut d = config.initial_interval;
        let mut last = Duration::ZERO;
        for _ in 0..10 {
            assert!(d >= last);
            assert!(d <= config.max_interval);
            last = d;
            d = next_interval(d, &config);
        }
        assert_eq!(d, config.max_interval);
    }

    #[test]
    fn interval_already_at_max_stays() {
        let config = PollConfig::default();
        let d = next_interval(config.max_interval, &config);
        assert_eq!(d, config.max_interval);
    }

    // --- Retry budget ---

    #[test]
    fn four_consecutive_errors_exhaust_budget_of_three() {
        // Scripted sequence: queued, queued, error, error, error, error,
        // completed.  The fourth consecutive error must end the loop
        // before the trailing "completed" is ever seen.
        let mut p = planner();
        let script = ["queued", "queued", "error", "error", "error", "error"];
        let mut steps = script.iter().map(|s| p.on_report(s, None));

        assert!(matches!(steps.next().unwrap(), PollStep::Sleep(_)));
        assert!(matches!(steps.next().unwrap(), PollStep::Sleep(_)));
        assert!(matches!(steps.next().unwrap(), PollStep::Sleep(_)));
        assert!(matches!(steps.next().unwrap(), PollStep::Sleep(_)));
        assert!(matches!(steps.next().unwrap(), PollStep::Sleep(_)));
        assert_eq!(steps.next().unwrap(), PollStep::RetriesExhausted(3));
    }

    #[test]
    fn healthy_report_resets_retry_counter() {
        // queued, error, queued, completed -- the intervening error must
        // not count against later soft errors.
        let mut p = planner();
        assert!(matches!(p.on_report("queued", None), PollStep::Sleep(_)));
        assert!(matches!(p.on_report("error", None), PollStep::Sleep(_)));
        assert_eq!(p.retries_used(), 1);
        assert!(matches!(p.on_report("queued", None), PollStep::Sleep(_)));
        assert_eq!(p.retries_used(), 0);
        assert_eq!(p.on_report("completed", None), PollStep::Completed);
    }

    #[test]
    fn failed_status_is_terminal_and_not_retried() {
        let mut p = planner();
        let step = p.on_report("failed", Some("NSFW content rejected"));
        assert_eq!(step, PollStep::Failed("NSFW content rejected".to_string()));
    }

    #[test]
    fn failed_without_message_uses_placeholder() {
        let mut p = planner();
        assert_eq!(
            p.on_report("failed", None),
            PollStep::Failed("Unknown error".to_string())
        );
    }

    #[test]
    fn soft_error_sleeps_retry_interval() {
        let config = PollConfig::default();
        let retry = config.retry_interval;
        let mut p = PollPlanner::new(config);
        assert_eq!(p.on_report("error", None), PollStep::Sleep(retry));
    }

    #[test]
    fn in_progress_sleep_follows_backoff() {
        let config = PollConfig {
            initial_interval: Duration::from_secs(3),
            max_interval: Duration::from_secs(15),
            multiplier: 2.0,
            ..Default::default()
        };
        let mut p = PollPlanner::new(config);
        assert_eq!(
            p.on_report("queued", None),
            PollStep::Sleep(Duration::from_secs(3))
        );
        assert_eq!(
            p.on_report("processing", None),
            PollStep::Sleep(Duration::from_secs(6))
        );
        assert_eq!(
            p.on_report("processing", None),
            PollStep::Sleep(Duration::from_secs(12))
        );
        assert_eq!(
            p.on_report("processing", None),
            PollStep::Sleep(Duration::from_secs(15))
        );
    }
}
