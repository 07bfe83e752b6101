//! Terminator-aware segment writer

use crate::segment::OutputSegment;
use crate::syntax::Terminators;
use crate::Result;
use std::io::Write;
use tracing::trace;

/// Writes segments to a sink, one per line
#[derive(Debug)]
pub struct SegmentWriter<W: Write> {
    sink: W,
    terminators: Terminators,
    segments_written: usize,
}

impl<W: Write> SegmentWriter<W> {
    /// Create a new writer with the given terminators
    pub fn new(sink: W, terminators: Terminators) -> Self {
        Self {
            sink,
            terminators,
            segments_written: 0,
        }
    }

    /// Terminators in use
    pub fn terminators(&self) -> &Terminators {
        &self.terminators
    }

    /// Number of segments written so far
    pub fn segments_written(&self) -> usize {
        self.segments_written
    }

    /// Serialize a segment and write it to the sink
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] when the sink rejects the write.
    pub fn write(&mut self, segment: &OutputSegment) -> Result<()> {
        let mut line = segment.format(&self.terminators);
        line.push(self.terminators.segment);
        line.push_str(&self.terminators.line_end);

        self.sink.write_all(line.as_bytes())?;
        self.segments_written += 1;
        trace!(segment = %segment.id, count = self.segments_written, "Wrote segment");
        Ok(())
    }

    /// Flush the sink and hand it back
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] when flushing fails.
    pub fn finish(mut self) -> Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}
