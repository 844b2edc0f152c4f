use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::config::PollPolicy;
use reelsmith_client::GenerationClient;
use reelsmith_core::{AppError, GenerationOperation};

/// Run `fut` unless `cancel` fires first.
pub(crate) async fn cancellable<F>(cancel: &CancellationToken, fut: F) -> Result<F::Output, AppError>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        out = fut => Ok(out),
    }
}

/// Refresh `operation` every `policy.interval` until the service reports it done.
pub(crate) async fn wait_until_done(
    client: &dyn GenerationClient,
    mut operation: GenerationOperation,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    segment: u32,
) -> Result<GenerationOperation, AppError> {
    let mut attempts: u32 = 0;

    while !operation.is_done() {
        if let Some(max_attempts) = policy.max_attempts {
            if attempts >= max_attempts {
                return Err(AppError::PollTimeout {
                    operation: operation.name().to_string(),
                    attempts,
                });
            }
        }

        cancellable(cancel, tokio::time::sleep(policy.interval)).await?;
        let refreshed = cancellable(cancel, client.poll_operation(&operation)).await??;
        operation = refreshed;
        attempts += 1;

        tracing::debug!(
            operation = %operation.name(),
            segment,
            attempt = attempts,
            done = operation.is_done(),
            "Polled generation operation"
        );
    }

    Ok(operation)
}
