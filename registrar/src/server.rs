use std::ffi::OsString;
use std::future::Future;
use std::io;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::client::{EurekaClient, RegistryClient};
use crate::config::Config;
use crate::error::ServeError;
use crate::identity::InstanceIdentity;
use crate::metrics::setup_metrics_recorder;
use crate::registration::register_until_acknowledged;
use crate::renewal::renew_forever;
use crate::router;

/// Handles to the background registration and renewal tasks.
pub struct Registrar {
    pub registration: JoinHandle<()>,
    pub renewal: JoinHandle<()>,
}

/// Launch registration and renewal for `identity` as independent tasks.
///
/// Neither task blocks the caller. Both stop when `cancel` fires.
pub fn spawn_registrar(
    client: Arc<dyn RegistryClient>,
    identity: Arc<InstanceIdentity>,
    config: &Config,
    cancel: CancellationToken,
) -> Registrar {
    let registration = {
        let client = client.clone();
        let identity = identity.clone();
        let retry_delay = config.registration_retry_delay.0;
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if register_until_acknowledged(client.as_ref(), &identity, retry_delay, cancel)
                .await
                .is_none()
            {
                info!("eureka registration cancelled before acknowledgement");
            }
        })
    };

    let renewal = {
        let interval = config.renewal_interval.0;
        tokio::spawn(async move {
            renew_forever(client.as_ref(), &identity, interval, cancel).await;
        })
    };

    Registrar {
        registration,
        renewal,
    }
}

/// Resolve this instance's identity, start registering it, and serve HTTP on
/// `listener` until `shutdown` resolves.
///
/// Fails before serving anything if the identity cannot be resolved.
pub async fn serve<F>(config: Config, listener: TcpListener, shutdown: F) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    serve_with_host_name(config, listener, shutdown, hostname::get).await
}

async fn serve_with_host_name<F, H>(
    config: Config,
    listener: TcpListener,
    shutdown: F,
    host_name: H,
) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
    H: FnOnce() -> io::Result<OsString>,
{
    let identity = Arc::new(InstanceIdentity::resolve_with(&config, host_name)?);
    info!("registering as {}", identity.instance_id());

    let client = EurekaClient::new(config.eureka_server()?, config.request_timeout.0)?;

    // Don't install metrics unless asked to
    let recorder_handle = if config.export_prometheus {
        match setup_metrics_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("failed to install metrics recorder: {}", e);
                None
            }
        }
    } else {
        None
    };
    let app = router::router(recorder_handle);

    let cancel = CancellationToken::new();
    let registrar = spawn_registrar(Arc::new(client), identity, &config, cancel.clone());

    info!("listening on {:?}", listener.local_addr()?);
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    cancel.cancel();
    for task in [registrar.registration, registrar.renewal] {
        if let Err(e) = task.await {
            error!("registry task failed: {}", e);
        }
    }

    Ok(result?)
}
