//! Landmark sources

use crate::frame::{LandmarkFrame, LandmarkSet};
use crate::FeedError;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Anything that yields detector output frame by frame.
///
/// `Ok(None)` marks the end of the stream.
pub trait LandmarkSource: Send {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, FeedError>;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, FeedError> {
        (**self).next_frame()
    }
}

/// Frame as recorded on disk; sequence numbers are optional
#[derive(Debug, Deserialize)]
struct RecordedFrame {
    sequence: Option<u64>,
    timestamp_ms: u64,
    #[serde(default)]
    faces: Vec<LandmarkSet>,
}

/// Replays recorded detector output, one JSON frame per line.
///
/// Blank lines and lines starting with `#` are skipped. Frames without a
/// `sequence` field are numbered in file order.
pub struct JsonLinesSource<R> {
    reader: R,
    line: usize,
    next_sequence: u64,
    buf: String,
}

impl<R: BufRead + Send> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            next_sequence: 0,
            buf: String::new(),
        }
    }
}

impl JsonLinesSource<Box<dyn BufRead + Send>> {
    /// Open a recording; `-` reads standard input
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let reader: Box<dyn BufRead + Send> = if path == Path::new("-") {
            info!("Reading landmark frames from stdin");
            Box::new(BufReader::new(io::stdin()))
        } else {
            info!("Reading landmark frames from {}", path.display());
            Box::new(BufReader::new(File::open(path)?))
        };
        Ok(Self::new(reader))
    }
}

impl<R: BufRead + Send> LandmarkSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, FeedError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                debug!("Landmark recording exhausted after {} lines", self.line);
                return Ok(None);
            }
            self.line += 1;

            let trimmed = self.buf.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let recorded: RecordedFrame =
                serde_json::from_str(trimmed).map_err(|source| FeedError::Parse {
                    line: self.line,
                    source,
                })?;

            let sequence = recorded.sequence.unwrap_or(self.next_sequence);
            self.next_sequence = sequence.wrapping_add(1);

            return Ok(Some(LandmarkFrame::new(
                sequence,
                recorded.timestamp_ms,
                recorded.faces,
            )));
        }
    }
}
