use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Poll until `stop` completes, waiting `interval` between polls.
///
/// Every outcome of `poll`, failures included, goes to `report`; a failed poll
/// does not end the loop. Only an error from `report` itself does.
pub async fn watch<T, E, P, Fut, R>(
    interval: Duration,
    mut poll: P,
    mut report: R,
    stop: impl Future<Output = ()>,
) -> Result<()>
where
    P: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    R: FnMut(std::result::Result<T, E>) -> Result<()>,
{
    tokio::pin!(stop);
    loop {
        tokio::select! {
            result = poll() => report(result)?,
            _ = &mut stop => return Ok(()),
        }
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = &mut stop => return Ok(()),
        }
    }
}
