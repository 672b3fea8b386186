use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Cancels `cancellation` once the process receives Ctrl-C.
pub async fn detect_shutdown(cancellation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, stopping");
            cancellation.cancel();
        },
        _ = cancellation.cancelled() => (),
    };
}
