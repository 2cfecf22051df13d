use std::time::Duration;

#[derive(Clone)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    pub jitter_max: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(20),
            max_backoff: Duration::from_millis(250),
            jitter_max: Some(Duration::from_millis(50)),
        }
    }
}

/// Retries a fallible async operation with doubling, jittered backoff.
/// Returns the last error once attempts are exhausted.
pub async fn retry_async_with_config<F, Fut, T, E>(config: RetryConfig, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut attempts_left = config.max_attempts;
    let mut backoff = config.base_backoff;

    loop {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                attempts_left = attempts_left.saturating_sub(1);
                if attempts_left == 0 {
                    return Err(e);
                }

                let jitter = config
                    .jitter_max
                    .map(|max| {
                        let ms = max.as_millis() as u64;
                        if ms == 0 {
                            0
                        } else {
                            rand::random::<u64>() % (ms + 1)
                        }
                    })
                    .unwrap_or(0);

                tokio::time::sleep(backoff + Duration::from_millis(jitter)).await;
                backoff = (backoff * 2).min(config.max_backoff);
            }
        }
    }
}
