//! Export module for shapestep
//!
//! Frames leave the pipeline as tightly packed RGBA8 rasters. The PNG
//! exporter here is the lossless encoder the step sequencer writes with.

pub mod png;

pub use png::{encode_rgba_to_png, PngExporter};
