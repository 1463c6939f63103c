//! Frame splitting for the `data:`-framed chat stream.
//!
//! A frame is one or more lines terminated by a blank line. Only lines
//! starting with `data:` carry payload; everything else is ignored.

pub mod splitter;
mod utf8;

pub use splitter::{split_frames, Frame, FrameSplitter, DATA_MARKER};
