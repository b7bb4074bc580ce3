//! Reachability probe for a detected dev server.

use std::time::Duration;

use termdock_config::schema::ProbeConfig;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Poll `url` until any HTTP response comes back, sleeping the configured
/// delay before each attempt. Each attempt is abandoned at
/// `attempt_timeout_ms`. Returns `false` when the schedule runs out or
/// `cancel` fires.
pub async fn wait_until_reachable(url: &str, config: &ProbeConfig, cancel: &CancellationToken) -> bool {
    let client = match reqwest::Client::builder().build() {
        Ok(client) => client,
        Err(e) => {
            debug!(url, "probe client unavailable: {e}");
            return false;
        }
    };
    let attempt_timeout = Duration::from_millis(config.attempt_timeout_ms);

    for (attempt, delay) in config.retry_delays_ms.iter().enumerate() {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return false,
            _ = tokio::time::sleep(Duration::from_millis(*delay)) => {}
        }
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return false,
            outcome = tokio::time::timeout(attempt_timeout, client.get(url).send()) => outcome,
        };
        match outcome {
            Ok(Ok(response)) => {
                debug!(url, attempt, status = %response.status(), "dev server reachable");
                return true;
            }
            Ok(Err(e)) => debug!(url, attempt, "probe failed: {e}"),
            Err(_) => debug!(url, attempt, "probe timed out"),
        }
    }
    false
}
