use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::AgentError;

pub(crate) const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE: Duration = Duration::from_millis(300);
const JITTER_MAX_MS: u64 = 150;

/// Run an external-service call under a per-attempt timeout with bounded,
/// jittered retries. Exhausting every attempt is reported as the service
/// being unavailable, which callers keep distinct from internal faults.
pub(crate) async fn call_with_retry<T, E, F, Fut>(
    service: &'static str,
    timeout: Duration,
    mut op: F,
) -> Result<T, AgentError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut last_error = String::new();

    for attempt in 1..=MAX_ATTEMPTS {
        match tokio::time::timeout(timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => last_error = e.to_string(),
            Err(_) => last_error = format!("timed out after {}ms", timeout.as_millis()),
        }

        if attempt < MAX_ATTEMPTS {
            let backoff = BACKOFF_BASE * 2u32.pow(attempt - 1);
            let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..JITTER_MAX_MS));
            tracing::warn!(service, attempt, error = %last_error, "external call failed, retrying");
            tokio::time::sleep(backoff + jitter).await;
        }
    }

    Err(AgentError::ServiceUnavailable {
        service,
        attempts: MAX_ATTEMPTS,
        reason: last_error,
    })
}
