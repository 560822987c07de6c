use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use slurp_listener::{ChannelSource, FeedSource, Listener, ListenerConfig, ListenerError};

fn fast_config() -> ListenerConfig {
    ListenerConfig {
        recv_timeout: Duration::from_millis(30),
        reconnect_delay: Duration::from_millis(5),
        max_reconnect_delay: Duration::from_millis(20),
    }
}

#[tokio::test]
async fn test_frames_delivered_in_order_until_closed() {
    let (source, tx) = ChannelSource::new(8);
    let mut listener = Listener::new(source, ListenerConfig::default());

    for i in 0..3u8 {
        tx.send(Bytes::from(vec![i])).await.unwrap();
    }
    drop(tx);

    let mut seen = Vec::new();
    let stats = listener.run(|frame| seen.push(frame[0])).await;

    assert_eq!(seen, vec![0, 1, 2]);
    assert_eq!(stats.frames, 3);
    assert_eq!(stats.reconnects, 0);
}

#[tokio::test]
async fn test_stop_from_callback_finishes_current_frame() {
    let (source, tx) = ChannelSource::new(8);
    let mut listener = Listener::new(source, ListenerConfig::default());
    let stop = listener.stop_handle();

    for i in 0..5u8 {
        tx.send(Bytes::from(vec![i])).await.unwrap();
    }

    let mut seen = Vec::new();
    let stats = listener
        .run(|frame| {
            seen.push(frame[0]);
            if frame[0] == 1 {
                stop.cancel();
            }
        })
        .await;

    assert_eq!(seen, vec![0, 1]);
    assert_eq!(stats.frames, 2);
}

#[tokio::test]
async fn test_receive_timeout_reconnects() {
    let (source, _tx) = ChannelSource::new(8);
    let connects = source.connect_count();
    let mut listener = Listener::new(source, fast_config());
    let stop = listener.stop_handle();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        stop.cancel();
    });
    let stats = listener.run(|_| {}).await;

    assert!(connects.load(Ordering::SeqCst) >= 2);
    assert!(stats.reconnects >= 1);
    assert_eq!(stats.frames, 0);
}

/// Fails the first `failures` connects, then serves frames from a list.
struct FlakySource {
    failures: usize,
    attempts: Arc<AtomicUsize>,
    frames: Vec<Bytes>,
}

#[async_trait]
impl FeedSource for FlakySource {
    async fn connect(&mut self) -> Result<(), ListenerError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            Err(ListenerError::ConnectionFailed("relay unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    async fn recv(&mut self) -> Result<Bytes, ListenerError> {
        if self.frames.is_empty() {
            Err(ListenerError::Closed)
        } else {
            Ok(self.frames.remove(0))
        }
    }

    async fn disconnect(&mut self) {}
}

#[tokio::test]
async fn test_connect_failures_back_off_then_recover() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let source = FlakySource {
        failures: 2,
        attempts: Arc::clone(&attempts),
        frames: vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")],
    };
    let mut listener = Listener::new(source, fast_config());

    let mut count = 0;
    let stats = listener.run(|_| count += 1).await;

    assert_eq!(count, 2);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(stats.reconnects, 2);
}

#[tokio::test]
async fn test_stop_interrupts_backoff() {
    let source = FlakySource {
        failures: usize::MAX,
        attempts: Arc::new(AtomicUsize::new(0)),
        frames: Vec::new(),
    };
    let config = ListenerConfig {
        reconnect_delay: Duration::from_secs(60),
        max_reconnect_delay: Duration::from_secs(60),
        ..ListenerConfig::default()
    };
    let mut listener = Listener::new(source, config);
    let stop = listener.stop_handle();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        stop.cancel();
    });

    let result = tokio::time::timeout(Duration::from_secs(5), listener.run(|_| {})).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_stop_before_run_returns_immediately() {
    let (source, _tx) = ChannelSource::new(1);
    let connects = source.connect_count();
    let mut listener = Listener::new(source, ListenerConfig::default());
    listener.stop();

    let stats = listener.run(|_| {}).await;
    assert_eq!(stats, Default::default());
    assert_eq!(connects.load(Ordering::SeqCst), 0);
}
