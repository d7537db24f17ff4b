use std::{fmt::Display, future::Future, time::Duration};

#[derive(Clone, Debug)]
pub struct RetryConfig {
    pub enabled: bool,
    pub max_retries: u32,
    /// Fixed pause before each retry.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { enabled: true, max_retries: 1, delay: Duration::from_millis(250) }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Runs `operation`, repeating it while `classify_error` reports a transient
/// fault and the retry budget allows.
pub async fn execute_with_retry<T, E, Op, Fut, Classify>(
    retry_config: &RetryConfig,
    classify_error: Classify,
    mut operation: Op,
) -> Result<T, E>
where
    E: Display,
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    Classify: Fn(&E) -> bool,
{
    if !retry_config.enabled {
        return operation().await;
    }

    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < retry_config.max_retries && classify_error(&error) => {
                attempt += 1;
                docgen_telemetry::warn!(
                    attempt = attempt,
                    max_retries = retry_config.max_retries,
                    delay_ms = retry_config.delay.as_millis(),
                    error = %error,
                    "Backend request failed with transient error; retrying"
                );
                tokio::time::sleep(retry_config.delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    fn immediate() -> RetryConfig {
        RetryConfig::default().with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn retries_once_then_succeeds() {
        let attempts = Arc::new(AtomicU32::new(0));

        let result = execute_with_retry(&immediate(), |e: &String| e == "reset", || {
            let attempts = Arc::clone(&attempts);
            async move {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err("reset".to_string());
                }
                Ok("ok")
            }
        })
        .await
        .expect("second attempt should succeed");

        assert_eq!(result, "ok");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let attempts = Arc::new(AtomicU32::new(0));

        let error = execute_with_retry(&immediate(), |_: &String| true, || {
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("reset".to_string())
            }
        })
        .await
        .expect_err("operation keeps failing");

        assert_eq!(error, "reset");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let attempts = Arc::new(AtomicU32::new(0));

        execute_with_retry(&immediate(), |_: &String| false, || {
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("HTTP 500".to_string())
            }
        })
        .await
        .expect_err("operation should fail without retries");

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disabled_config_runs_once() {
        let attempts = Arc::new(AtomicU32::new(0));

        execute_with_retry(&RetryConfig::disabled().with_max_retries(5), |_: &String| true, || {
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("reset".to_string())
            }
        })
        .await
        .expect_err("operation should fail");

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
