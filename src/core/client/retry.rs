use std::time::Duration;

/// Specifies the backoff strategy between attempts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backoff {
    /// Uses a fixed delay between attempts.
    Fixed(Duration),
    /// Waits `step * attempt` after the given (1-based) attempt, i.e. 1x, 2x, 3x ...
    Linear {
        /// Delay added for every attempt already made.
        step: Duration,
    },
}

impl Backoff {
    /// Delay to wait after `attempt` (1-based) failed and before the next one starts.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(d) => *d,
            Self::Linear { step } => step.saturating_mul(attempt.max(1)),
        }
    }
}

/// Configuration for the rate-limit retry loop.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Enables or disables retrying. When disabled, exactly one attempt is made.
    pub enabled: bool,
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// The backoff strategy to use between attempts.
    pub backoff: Backoff,
    /// HTTP status codes that trigger another attempt.
    pub retry_on_status: Vec<u16>,
}

impl RetryConfig {
    /// The attempt budget actually honored by the client.
    pub(crate) fn attempt_budget(&self) -> u32 {
        if self.enabled {
            self.max_attempts.max(1)
        } else {
            1
        }
    }

    pub(crate) fn should_retry(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            backoff: Backoff::Linear {
                step: Duration::from_millis(300),
            },
            retry_on_status: vec![429],
        }
    }
}
