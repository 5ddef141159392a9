//! Description of the frames a filter instance is going to see.

use crate::error::{Error, Result};

/// How samples are stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SampleType {
    Integer,
    Float,
}

/// The (constant) format of every frame passed to one filter instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VideoFormat {
    pub sample_type: SampleType,

    /// Significant bits per sample; 8 to 16 for integer and 32 for float
    /// formats are supported.
    pub bits_per_sample: u32,

    /// Number of planes in each frame, e.g. 3 for YUV and 1 for grayscale.
    pub num_planes: usize,
}

impl VideoFormat {
    /// Highest number of planes a frame can carry.
    pub const MAX_PLANES: usize = 3;

    pub fn new(sample_type: SampleType, bits_per_sample: u32, num_planes: usize) -> Self {
        Self {
            sample_type,
            bits_per_sample,
            num_planes,
        }
    }

    /// Storage size of a single sample.
    pub fn bytes_per_sample(&self) -> usize {
        match self.sample_type {
            SampleType::Float => 4,
            SampleType::Integer if self.bits_per_sample <= 8 => 1,
            SampleType::Integer => 2,
        }
    }

    /// Rejects every format the filter has no kernels for.
    pub(crate) fn validate(&self) -> Result<()> {
        let depth_ok = match self.sample_type {
            SampleType::Integer => (8..=16).contains(&self.bits_per_sample),
            SampleType::Float => self.bits_per_sample == 32,
        };

        if !depth_ok || !(1..=Self::MAX_PLANES).contains(&self.num_planes) {
            return Err(Error::InvalidFormat);
        }

        Ok(())
    }
}
