//! Live capture: frame sources and the capture sequencer.
//!
//! Frames come from a [`FrameSource`]; the [`CaptureSession`] decides each
//! loop tick whether to pull a new frame and whether to export the current
//! one as a numbered image/label pair.

mod frame;
mod session;

pub use frame::{Frame, FrameSource, ImageSequenceSource};
pub use session::{CaptureMode, CaptureSession, ExportedPair, TickOutcome};
