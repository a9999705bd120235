//! Location feed adapter.
//!
//! Turns a stream of newline-delimited JSON objects into [`LocationSample`]s:
//!
//! ```text
//! {"latitude": 19.0176, "longitude": 72.8561, "accuracy": 5.0, "timestamp": "2024-10-04T12:00:00Z"}
//! ```
//!
//! `timestamp` is optional and defaults to the time the line was read.

use domain::models::LocationSample;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::warn;

pub type BoxedSource = Box<dyn AsyncBufRead + Unpin + Send>;

pub struct LocationFeed<R> {
    lines: Lines<R>,
    line_number: usize,
    skipped: usize,
}

impl<R: AsyncBufRead + Unpin> LocationFeed<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            skipped: 0,
        }
    }

    /// Next parsable sample, or `None` at end of input.
    ///
    /// Blank lines are ignored; lines that are not valid sample JSON are
    /// logged and skipped.
    pub async fn next_sample(&mut self) -> std::io::Result<Option<LocationSample>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<LocationSample>(line) {
                Ok(sample) => return Ok(Some(sample)),
                Err(err) => {
                    self.skipped += 1;
                    warn!(
                        line = self.line_number,
                        error = %err,
                        "Skipping unparsable location sample"
                    );
                }
            }
        }

        Ok(None)
    }

    /// Number of lines that could not be parsed so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Opens the configured feed source: "-" for stdin, otherwise a file path.
pub async fn open(source: &str) -> std::io::Result<LocationFeed<BoxedSource>> {
    let reader: BoxedSource = if source == "-" {
        Box::new(BufReader::new(tokio::io::stdin()))
    } else {
        Box::new(BufReader::new(tokio::fs::File::open(source).await?))
    };
    Ok(LocationFeed::new(reader))
}
