//! Rust implementation of the H.264 deblocking filter, run over whole frames.
//! This is intended to be used as a postprocessing step, not as a loop filter.
//!
//! Frames are expected to be padded to a multiple of 8 in both dimensions
//! before they are handed over, and cropped back afterwards by the caller.

pub mod config;
pub mod deblock;
mod error;
pub mod filter;
pub mod format;
pub mod params;
pub mod pixel;
pub mod plane;
pub mod tables;

pub use config::{FilterConfig, Strength};
pub use deblock::deblock_plane;
pub use error::{Error, Result};
pub use filter::Deblock;
pub use format::{SampleType, VideoFormat};
pub use params::{Backend, DeblockParams, PlaneSet};
pub use pixel::Sample;
pub use plane::{PlaneBytes, PlaneMut};
