//! Latest-frame handoff between capture and processing
//!
//! Depth is exactly one: publishing replaces whatever the consumer has not
//! picked up yet, so a slow consumer skips stale frames instead of building a
//! backlog.

use crate::frame::LandmarkFrame;
use crate::FeedError;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Create a connected producer/consumer pair
pub fn frame_slot() -> (SlotSender, SlotReceiver) {
    let (tx, rx) = watch::channel(None);
    (
        SlotSender { tx },
        SlotReceiver {
            rx,
            last_sequence: None,
            dropped: 0,
        },
    )
}

/// Producer half. Dropping it ends the stream once the last frame is taken.
pub struct SlotSender {
    tx: watch::Sender<Option<Arc<LandmarkFrame>>>,
}

impl SlotSender {
    /// Replace the pending frame
    pub fn publish(&self, frame: LandmarkFrame) -> Result<(), FeedError> {
        if self.tx.is_closed() {
            return Err(FeedError::Closed);
        }
        self.tx.send_replace(Some(Arc::new(frame)));
        Ok(())
    }
}

/// Consumer half
pub struct SlotReceiver {
    rx: watch::Receiver<Option<Arc<LandmarkFrame>>>,
    last_sequence: Option<u64>,
    dropped: u64,
}

impl SlotReceiver {
    /// Wait for the freshest unseen frame; `None` once the producer is gone
    pub async fn next(&mut self) -> Option<Arc<LandmarkFrame>> {
        loop {
            self.rx.changed().await.ok()?;
            let Some(frame) = self.rx.borrow_and_update().clone() else {
                continue;
            };

            if let Some(last) = self.last_sequence {
                let skipped = frame.sequence.saturating_sub(last.saturating_add(1));
                if skipped > 0 {
                    debug!("Skipped {} stale frame(s) before #{}", skipped, frame.sequence);
                    self.dropped += skipped;
                }
            }
            self.last_sequence = Some(frame.sequence);
            return Some(frame);
        }
    }

    /// Frames replaced before the consumer reached them
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
