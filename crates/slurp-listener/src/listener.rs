use std::time::Duration;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::ListenerError;
use crate::source::FeedSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Silence longer than this is treated as a dead subscription
    pub recv_timeout: Duration,
    /// First wait after a transport error; doubles on each further error
    pub reconnect_delay: Duration,
    pub max_reconnect_delay: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            recv_timeout: Duration::from_secs(600),
            reconnect_delay: Duration::from_secs(5),
            max_reconnect_delay: Duration::from_secs(300),
        }
    }
}

/// Totals for one [`Listener::run`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListenerStats {
    pub frames: u64,
    pub reconnects: u64,
}

/// Drives a [`FeedSource`] and hands every frame to a callback.
pub struct Listener<S: FeedSource> {
    source: S,
    config: ListenerConfig,
    shutdown: CancellationToken,
}

impl<S: FeedSource> Listener<S> {
    pub fn new(source: S, config: ListenerConfig) -> Self {
        Self::with_shutdown(source, config, CancellationToken::new())
    }

    /// Share an existing token, e.g. one cancelled by a signal handler.
    pub fn with_shutdown(source: S, config: ListenerConfig, shutdown: CancellationToken) -> Self {
        Self {
            source,
            config,
            shutdown,
        }
    }

    /// Token that stops [`Listener::run`] when cancelled
    pub fn stop_handle(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Receive until stopped or the source closes.
    ///
    /// `on_frame` runs inline, so a frame being handled when the stop arrives
    /// is always finished before this returns. A receive timeout reconnects
    /// immediately; a transport error reconnects after the backoff delay.
    pub async fn run<F>(&mut self, mut on_frame: F) -> ListenerStats
    where
        F: FnMut(Bytes),
    {
        let shutdown = self.shutdown.clone();
        let mut stats = ListenerStats::default();
        let mut delay = self.config.reconnect_delay;
        let mut first_connect = true;

        'session: while !shutdown.is_cancelled() {
            if !first_connect {
                stats.reconnects += 1;
            }
            first_connect = false;

            let connected = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break 'session,
                result = self.source.connect() => result,
            };
            if let Err(e) = connected {
                error!(error = %e, "Relay connection failed");
                if !wait_before_reconnect(&shutdown, &mut delay, self.config.max_reconnect_delay).await {
                    break 'session;
                }
                continue 'session;
            }
            info!("Listening for relay frames");

            loop {
                let received = tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break 'session,
                    result = tokio::time::timeout(self.config.recv_timeout, self.source.recv()) => result,
                };

                match received {
                    Ok(Ok(frame)) => {
                        delay = self.config.reconnect_delay;
                        stats.frames += 1;
                        on_frame(frame);
                    }
                    Ok(Err(ListenerError::Closed)) => {
                        info!(frames = stats.frames, "Feed closed");
                        self.source.disconnect().await;
                        return stats;
                    }
                    Ok(Err(e)) => {
                        error!(error = %e, "Relay receive failed");
                        self.source.disconnect().await;
                        if !wait_before_reconnect(&shutdown, &mut delay, self.config.max_reconnect_delay)
                            .await
                        {
                            break 'session;
                        }
                        continue 'session;
                    }
                    Err(_) => {
                        warn!(
                            timeout_secs = self.config.recv_timeout.as_secs_f64(),
                            "No relay frames within timeout, reconnecting"
                        );
                        self.source.disconnect().await;
                        continue 'session;
                    }
                }
            }
        }

        self.source.disconnect().await;
        info!(
            frames = stats.frames,
            reconnects = stats.reconnects,
            "Listener stopped"
        );
        stats
    }
}

/// Doubles `delay`, capped at `max`.
fn next_delay(delay: Duration, max: Duration) -> Duration {
    delay.saturating_mul(2).min(max)
}

/// Sleeps for the current backoff delay, then advances it. Returns false if
/// shutdown was requested while waiting.
async fn wait_before_reconnect(
    shutdown: &CancellationToken,
    delay: &mut Duration,
    max: Duration,
) -> bool {
    info!(delay_secs = delay.as_secs_f64(), "Waiting before reconnect");
    let wait = *delay;
    *delay = next_delay(wait, max);
    tokio::select! {
        _ = shutdown.cancelled() => false,
        _ = tokio::time::sleep(wait) => true,
    }
}
