//! Frame loop: source → monitor → renderer

use anyhow::Context;
use dms::{DrowsinessMonitor, Renderer};
use landmark_feed::{frame_slot, FeedError, LandmarkFrame, LandmarkSource, SlotSender};
use serde::Serialize;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// End-of-run totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Frames handed to the monitor
    pub frames: u64,
    pub processed: u64,
    pub idle: u64,
    pub malformed: u64,
    /// Frames skipped because a newer one arrived first
    pub dropped: u64,
    pub blinks: u32,
    pub yawns: u32,
    pub alerts_raised: u64,
}

impl RunSummary {
    fn collect(frames: u64, dropped: u64, monitor: &DrowsinessMonitor) -> Self {
        let stats = monitor.stats();
        let counters = monitor.counters();
        Self {
            frames,
            processed: stats.frames_processed,
            idle: stats.idle_frames,
            malformed: stats.malformed_frames,
            dropped,
            blinks: counters.blink_count,
            yawns: counters.yawn_count,
            alerts_raised: stats.alerts_raised,
        }
    }

    pub fn log(&self) {
        info!(
            frames = self.frames,
            processed = self.processed,
            idle = self.idle,
            malformed = self.malformed,
            dropped = self.dropped,
            alerts = self.alerts_raised,
            "Session finished: {} blink(s), {} yawn(s)",
            self.blinks,
            self.yawns
        );
    }
}

fn handle_frame<R: Renderer + ?Sized>(
    monitor: &mut DrowsinessMonitor,
    renderer: &mut R,
    frame: &LandmarkFrame,
) {
    match monitor.analyze(frame) {
        Ok(snapshot) => renderer.render(&snapshot, frame.primary_face()),
        Err(e) => warn!(sequence = frame.sequence, "Skipping frame: {}", e),
    }
}

/// Process every frame in order, as fast as the source yields them
pub fn replay<S, R>(
    monitor: &mut DrowsinessMonitor,
    source: &mut S,
    renderer: &mut R,
) -> anyhow::Result<RunSummary>
where
    S: LandmarkSource + ?Sized,
    R: Renderer + ?Sized,
{
    let mut frames = 0;
    while let Some(frame) = source.next_frame().context("Failed to read landmark frame")? {
        frames += 1;
        handle_frame(monitor, renderer, &frame);
    }
    Ok(RunSummary::collect(frames, 0, monitor))
}

/// Replay frames at their recorded pace on a capture thread and process only
/// the freshest one. Stops at end of input or Ctrl-C.
pub async fn run_realtime<S, R>(
    monitor: &mut DrowsinessMonitor,
    source: S,
    renderer: &mut R,
) -> anyhow::Result<RunSummary>
where
    S: LandmarkSource + 'static,
    R: Renderer + ?Sized,
{
    run_realtime_until(monitor, source, renderer, tokio::signal::ctrl_c()).await
}

/// Like [`run_realtime`], stopping early once `shutdown` completes.
///
/// An interrupted capture thread is detached, not joined: it may be blocked
/// reading stdin and exits with the process.
pub async fn run_realtime_until<S, R, F>(
    monitor: &mut DrowsinessMonitor,
    source: S,
    renderer: &mut R,
    shutdown: F,
) -> anyhow::Result<RunSummary>
where
    S: LandmarkSource + 'static,
    R: Renderer + ?Sized,
    F: Future,
{
    let (tx, mut rx) = frame_slot();
    let (done_tx, done_rx) = oneshot::channel();

    std::thread::Builder::new()
        .name("landmark-capture".to_string())
        .spawn(move || {
            let _ = done_tx.send(capture(source, tx));
        })
        .context("Failed to start capture thread")?;

    tokio::pin!(shutdown);

    let mut frames = 0;
    let mut interrupted = false;
    loop {
        tokio::select! {
            next = rx.next() => match next {
                Some(frame) => {
                    frames += 1;
                    handle_frame(monitor, renderer, &frame);
                }
                None => break,
            },
            _ = &mut shutdown => {
                info!("Interrupted, stopping");
                interrupted = true;
                break;
            }
        }
    }

    let dropped = rx.dropped();
    drop(rx);

    if interrupted {
        debug!("Capture thread detached");
    } else {
        match done_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e).context("Landmark capture failed"),
            Err(_) => anyhow::bail!("Capture thread exited without reporting"),
        }
    }

    Ok(RunSummary::collect(frames, dropped, monitor))
}

fn capture<S: LandmarkSource>(mut source: S, tx: SlotSender) -> Result<(), FeedError> {
    let started = Instant::now();
    let mut origin: Option<Duration> = None;

    while let Some(frame) = source.next_frame()? {
        let offset = frame
            .timestamp()
            .saturating_sub(*origin.get_or_insert(frame.timestamp()));
        if let Some(wait) = offset.checked_sub(started.elapsed()) {
            std::thread::sleep(wait);
        }
        if tx.publish(frame).is_err() {
            debug!("Consumer gone, capture stopping");
            break;
        }
    }
    Ok(())
}
