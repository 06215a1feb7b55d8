use std::time;

use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::client::RegistryClient;
use crate::identity::InstanceIdentity;

/// Register `identity` with the registry, retrying until any response is received.
///
/// Transport failures are logged and retried after a fixed `retry_delay`, with no
/// limit on the number of attempts. The first HTTP response ends the loop whatever
/// its status code: a rejection from the registry is logged, not retried.
///
/// Returns the acknowledged status, or `None` if `cancel` fired first.
pub async fn register_until_acknowledged<C>(
    client: &C,
    identity: &InstanceIdentity,
    retry_delay: time::Duration,
    cancel: CancellationToken,
) -> Option<StatusCode>
where
    C: RegistryClient + ?Sized,
{
    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => return None,
            result = client.register(identity) => result,
        };

        match result {
            Ok(status) => {
                metrics::counter!("registry_registration_attempts_total", "outcome" => "ok")
                    .increment(1);
                metrics::gauge!("registry_last_status", "call" => "register")
                    .set(f64::from(status.as_u16()));
                info!(
                    "eureka registration status for {}: {}",
                    identity.instance_id(),
                    status
                );
                return Some(status);
            }
            Err(e) => {
                metrics::counter!("registry_registration_attempts_total", "outcome" => "error")
                    .increment(1);
                error!("eureka registration error: {}", e);
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return None,
            _ = tokio::time::sleep(retry_delay) => {}
        }
    }
}
