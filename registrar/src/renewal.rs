use std::time;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::client::RegistryClient;
use crate::identity::InstanceIdentity;

/// Heartbeat the registration of `identity` every `interval` until cancelled.
///
/// The first heartbeat is sent immediately. No outcome is fatal: failures and
/// error statuses are logged and the next heartbeat goes out on the next tick.
pub async fn renew_forever<C>(
    client: &C,
    identity: &InstanceIdentity,
    interval: time::Duration,
    cancel: CancellationToken,
) where
    C: RegistryClient + ?Sized,
{
    let mut ticker = tokio::time::interval(interval);
    // Keep the schedule fixed: a slow heartbeat must not cause a burst of catch-up ticks.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = client.renew(identity) => result,
        };

        match result {
            Ok(status) => {
                metrics::counter!("registry_renewals_total", "outcome" => "ok").increment(1);
                metrics::gauge!("registry_last_status", "call" => "renew")
                    .set(f64::from(status.as_u16()));
                info!("eureka renew status: {}", status);
            }
            Err(e) => {
                metrics::counter!("registry_renewals_total", "outcome" => "error").increment(1);
                error!("eureka renew error: {}", e);
            }
        }
    }

    info!("eureka renewal for {} stopped", identity.instance_id());
}
