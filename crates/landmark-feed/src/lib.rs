//! Landmark Feed
//!
//! Input side of the driver monitor. A face-mesh detector runs upstream and
//! hands over normalized landmark sets, one per detected face:
//! - Landmark frame model (468-point face-mesh convention)
//! - Recorded JSON-lines source for replay
//! - Synthetic scripted source for demos
//! - Depth-1 handoff slot between capture and processing tasks

pub mod frame;
pub mod mesh;
pub mod slot;
pub mod source;
pub mod synthetic;

pub use frame::{Landmark, LandmarkFrame, LandmarkSet};
pub use slot::{frame_slot, SlotReceiver, SlotSender};
pub use source::{JsonLinesSource, LandmarkSource};
pub use synthetic::{Segment, SyntheticSource};

use thiserror::Error;

/// Feed error types
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to read landmark input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid landmark frame on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Frame slot closed")]
    Closed,
}
