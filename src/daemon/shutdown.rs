use tokio::select;
use tokio_util::sync::CancellationToken;

/// Detects signals sent to the process. Also completes when another part of
/// the daemon cancels the token, so a dead writer still lets the process
/// exit.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => (),
    };
}
