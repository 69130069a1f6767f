use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

/// Polls until a condition is met, the check fails, or the timeout is reached.
///
/// # Arguments
/// * `check` - Closure that returns `Ok(true)` when condition is met, `Ok(false)` to continue polling
/// * `max_wait` - Maximum time to wait before giving up
/// * `poll_interval` - Time to sleep between polls
/// * `operation_name` - Name of the operation for logging
///
/// # Returns
/// * `Ok(true)` - Condition was met within timeout
/// * `Ok(false)` - Timeout reached without condition being met
/// * `Err(e)` - The first error returned by `check`; polling stops immediately
pub async fn poll_until<F, Fut, E>(
    check: F,
    max_wait: Duration,
    poll_interval: Duration,
    operation_name: &str,
) -> Result<bool, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let start = std::time::Instant::now();

    loop {
        if check().await? {
            debug!("{} completed", operation_name);
            return Ok(true);
        }

        if start.elapsed() > max_wait {
            warn!("Timed out waiting for {} to complete", operation_name);
            return Ok(false);
        }

        tokio::time::sleep(poll_interval).await;
    }
}
