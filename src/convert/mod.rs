//! Video to GIF conversion through the system `ffmpeg`.
//!
//! The workflow is a straight line: resolve the input, check prerequisites, run the transcoder
//! once under a timeout, then inspect the produced file.

/// `ffmpeg` process wrapper and the [`ffmpeg::Transcoder`] seam.
pub mod ffmpeg;
/// Conversion parameters and the fixed filter chain.
pub mod job;
/// Input resolution, the conversion workflow, and its console report.
pub mod workflow;
