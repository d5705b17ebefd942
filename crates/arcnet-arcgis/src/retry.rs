//! Transient-failure retry for ArcGIS requests.
//!
//! Location services occasionally answer with a gateway error, either as an
//! HTTP 5xx or as a 5xx `code` inside an HTTP 200 error envelope. Both are
//! retried with doubling, jittered delays; anything else surfaces at once.

use std::future::Future;
use std::time::Duration;

use crate::error::ArcgisError;

/// Upper bound on a single back-off sleep.
const MAX_DELAY: Duration = Duration::from_secs(60);

/// `true` for failures another attempt might fix: timeouts, refused
/// connections, and server-side (5xx) errors in either form.
pub(crate) fn is_retriable(err: &ArcgisError) -> bool {
    match err {
        ArcgisError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ArcgisError::Api { code, .. } => (500..600).contains(code),
        ArcgisError::Deserialize { .. }
        | ArcgisError::Encode { .. }
        | ArcgisError::InvalidUrl { .. }
        | ArcgisError::TravelModeNotFound(_)
        | ArcgisError::JobFailed { .. }
        | ArcgisError::JobTimeout { .. }
        | ArcgisError::MissingResult { .. } => false,
    }
}

/// Nominal delay before retry number `retry` (1-based): `base_ms · 2^(retry-1)`,
/// capped at [`MAX_DELAY`].
fn nominal_delay(retry: u32, base_ms: u64) -> Duration {
    let factor = 1u64 << retry.saturating_sub(1).min(16);
    Duration::from_millis(base_ms.saturating_mul(factor)).min(MAX_DELAY)
}

/// Scales `delay` by a random factor in `[0.75, 1.25)`.
fn jittered(delay: Duration) -> Duration {
    delay.mul_f64(0.75 + rand::random::<f64>() * 0.5)
}

/// Calls `operation` until it succeeds, fails with a non-retriable error, or
/// has been retried `max_retries` times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ArcgisError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ArcgisError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retry >= max_retries || !is_retriable(&err) {
            return Err(err);
        }

        retry += 1;
        let delay = jittered(nominal_delay(retry, backoff_base_ms));
        tracing::warn!(
            retry,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transient ArcGIS failure, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
