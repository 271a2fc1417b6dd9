// Reconnect policies for the two stream consumers.
//
// Both consumers run unbounded retry loops, but with different delay
// behavior: the Pushbullet websocket always waits a fixed 3 seconds before
// reconnecting, while the status stream waits 10 seconds after an error but
// resubscribes immediately after a clean remote close. One policy type
// covers both so the consumer loops stay uniform.

use std::time::Duration;

/// How the previous connection attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOutcome {
    /// Connect failure, transport error, or any other fault.
    Error,
    /// The remote ended the stream without an error.
    CleanClose,
}

/// Delay strategy applied between reconnection attempts.
#[derive(Debug, Clone, Copy)]
pub enum RetryPolicy {
    /// Wait the same delay regardless of how the connection ended.
    FixedDelay(Duration),
    /// Wait `error_delay` after an error; reconnect immediately after a
    /// clean close.
    RetryThenRepeat { error_delay: Duration },
}

impl RetryPolicy {
    /// Pushbullet websocket policy: 3 seconds, unconditionally.
    pub fn pushbullet() -> Self {
        RetryPolicy::FixedDelay(Duration::from_secs(3))
    }

    /// Status stream policy: 10 seconds after an error, immediate
    /// resubscribe after a clean end of stream.
    pub fn status_stream() -> Self {
        RetryPolicy::RetryThenRepeat {
            error_delay: Duration::from_secs(10),
        }
    }

    /// Delay to wait before the next connection attempt.
    pub fn delay_after(&self, outcome: ConnectionOutcome) -> Duration {
        match self {
            RetryPolicy::FixedDelay(delay) => *delay,
            RetryPolicy::RetryThenRepeat { error_delay } => match outcome {
                ConnectionOutcome::Error => *error_delay,
                ConnectionOutcome::CleanClose => Duration::ZERO,
            },
        }
    }

    /// Sleep out the delay for the given outcome, if any.
    pub async fn wait_after(&self, outcome: ConnectionOutcome) {
        let delay = self.delay_after(outcome);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_delay_ignores_outcome() {
        let policy = RetryPolicy::pushbullet();
        assert_eq!(
            policy.delay_after(ConnectionOutcome::Error),
            Duration::from_secs(3)
        );
        assert_eq!(
            policy.delay_after(ConnectionOutcome::CleanClose),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn retry_then_repeat_distinguishes_outcomes() {
        let policy = RetryPolicy::status_stream();
        assert_eq!(
            policy.delay_after(ConnectionOutcome::Error),
            Duration::from_secs(10)
        );
        assert_eq!(
            policy.delay_after(ConnectionOutcome::CleanClose),
            Duration::ZERO
        );
    }
}
