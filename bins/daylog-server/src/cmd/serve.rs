use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use daylog_store::BucketStore;

use crate::config::ConfigArgs;
use crate::error::ServerError;

pub async fn run(args: ConfigArgs) -> Result<(), ServerError> {
    tracing::info!("daylog-server starting");

    // --- Load config / open store ---
    let (config, store) = super::open(&args)?;
    let store = Arc::new(store);
    tracing::info!(
        config = %args.config,
        data_dir = %store.root().display(),
        retention_days = store.window().days(),
        suffix = store.key().suffix(),
        id_format = ?store.key().format(),
        "opened store"
    );

    // --- CancellationToken for graceful shutdown ---
    let token = CancellationToken::new();
    let mut handles: Vec<JoinHandle<()>> = Vec::new();

    // --- Periodic sweep ---
    if let Some(secs) = config.sweep_interval_secs {
        handles.push(spawn_sweeper(store.clone(), Duration::from_secs(secs), token.clone()));
        tracing::info!(interval_secs = secs, "spawned retention sweeper");
    }

    // --- HTTP API ---
    let port = config.api_port;
    let mut api = tokio::spawn(crate::http::run(port, store.clone(), token.clone()));
    tracing::info!(port, "serving history api");

    let outcome = tokio::select! {
        res = &mut api => Some(res),
        sig = tokio::signal::ctrl_c() => {
            sig?;
            tracing::info!("shutting down...");
            None
        }
    };

    token.cancel();
    let api_result = match outcome {
        Some(res) => res,
        None => api.await,
    };
    for handle in handles {
        let _ = handle.await;
    }

    match api_result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ServerError::Serve(e)),
        Err(e) => Err(ServerError::Serve(format!("api task: {e}"))),
    }
}

fn spawn_sweeper(
    store: Arc<BucketStore>,
    period: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    let report = store.cleanup_now().await;
                    tracing::info!(
                        scanned = report.scanned,
                        removed = report.removed.len(),
                        failed = report.failed.len(),
                        "retention sweep"
                    );
                }
            }
        }
    })
}
