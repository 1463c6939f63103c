//! Resumable frame splitter.
//!
//! [`split_frames`] extracts every complete frame from a buffer in one pass
//! and returns the unconsumed tail. [`FrameSplitter`] applies the same rules
//! incrementally: it keeps the tail between reads and remembers how far it has
//! scanned, so each byte is inspected once however the stream is chunked.
//! Feeding a stream chunk by chunk yields exactly the frames that feeding it
//! whole would, no matter where the chunk boundaries fall (mid-marker,
//! mid-line, mid-delimiter, or mid-code-point).
//!
//! Lines end at `\n`; a trailing `\r` is stripped, so both `\n\n` and
//! `\r\n\r\n` delimit frames. Only complete lines are inspected, so nothing is
//! ever guessed from a partial line.

use super::utf8::Utf8Decoder;

/// Prefix of the lines that carry a frame's payload. Case-sensitive.
pub const DATA_MARKER: &str = "data:";

/// One complete frame: the joined contents of its `data:` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: String,
}

/// Extract all complete frames from `buffer`.
///
/// Returns the frames in arrival order and the tail that starts after the
/// last blank line. Frames without any `data:` line yield nothing. With no
/// blank line in the buffer the whole buffer is returned as the tail.
pub fn split_frames(buffer: &str) -> (Vec<Frame>, &str) {
    let mut frames = Vec::new();
    let mut data_lines: Vec<&str> = Vec::new();
    let mut frame_start = 0;
    let mut pos = 0;

    while let Some(offset) = buffer[pos..].find('\n') {
        let line_end = pos + offset;
        let raw = &buffer[pos..line_end];
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        pos = line_end + 1;

        if line.is_empty() {
            if !data_lines.is_empty() {
                frames.push(Frame {
                    data: data_lines.join("\n"),
                });
                data_lines.clear();
            }
            frame_start = pos;
        } else if let Some(content) = line.strip_prefix(DATA_MARKER) {
            data_lines.push(content.trim_start());
        }
    }

    (frames, &buffer[frame_start..])
}

/// Stateful splitter fed with raw chunks from a transport.
#[derive(Debug, Default)]
pub struct FrameSplitter {
    /// Text from the start of the current, unfinished frame.
    buffer: String,
    /// Start of the line not yet terminated.
    line_start: usize,
    /// Everything before this offset has been searched for `\n`.
    searched: usize,
    /// Payload ranges of the current frame's `data:` lines.
    data_ranges: Vec<(usize, usize)>,
    decoder: Utf8Decoder,
}

impl FrameSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text chunk and return the frames it completes.
    pub fn push_str(&mut self, chunk: &str) -> Vec<Frame> {
        self.buffer.push_str(chunk);
        self.drain_frames()
    }

    /// Append a byte chunk and return the frames it completes.
    ///
    /// A multi-byte character split across chunks is held back until it is
    /// complete.
    pub fn push_bytes(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.decoder.decode_into(chunk, &mut self.buffer);
        self.drain_frames()
    }

    /// Text received but not yet part of a complete frame.
    pub fn remainder(&self) -> &str {
        &self.buffer
    }

    /// Total bytes buffered without having produced a frame yet.
    pub fn pending_len(&self) -> usize {
        self.buffer.len() + self.decoder.pending_len()
    }

    fn drain_frames(&mut self) -> Vec<Frame> {
        let mut frames = Vec::new();
        let mut frame_end = 0;

        while let Some(offset) = self.buffer[self.searched..].find('\n') {
            let line_end = self.searched + offset;
            let (blank, payload) = {
                let raw = &self.buffer[self.line_start..line_end];
                let line = raw.strip_suffix('\r').unwrap_or(raw);
                let payload = line.strip_prefix(DATA_MARKER).map(|content| {
                    let end = self.line_start + line.len();
                    (end - content.trim_start().len(), end)
                });
                (line.is_empty(), payload)
            };
            self.line_start = line_end + 1;
            self.searched = self.line_start;

            if blank {
                if !self.data_ranges.is_empty() {
                    let lines: Vec<&str> = self
                        .data_ranges
                        .iter()
                        .map(|&(start, end)| &self.buffer[start..end])
                        .collect();
                    frames.push(Frame {
                        data: lines.join("\n"),
                    });
                    self.data_ranges.clear();
                }
                frame_end = self.line_start;
            } else if let Some(range) = payload {
                self.data_ranges.push(range);
            }
        }
        self.searched = self.buffer.len();

        if frame_end > 0 {
            self.buffer.drain(..frame_end);
            self.line_start -= frame_end;
            self.searched -= frame_end;
            for (start, end) in &mut self.data_ranges {
                *start -= frame_end;
                *end -= frame_end;
            }
        }
        frames
    }
}
