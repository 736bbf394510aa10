//! Cancellation of multi-step workflows

use std::future::Future;

use tokio_util::sync::CancellationToken;

use ctf_core::DomainError;

/// Run one workflow step unless `token` is cancelled first
///
/// A token cancelled before the step starts aborts without polling it. A
/// token cancelled mid-step drops the step; whatever the collaborator already
/// did stays done.
pub async fn step<T, F>(token: &CancellationToken, fut: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    if token.is_cancelled() {
        return Err(DomainError::Cancelled);
    }

    tokio::select! {
        biased;
        () = token.cancelled() => Err(DomainError::Cancelled),
        result = fut => result,
    }
}
