//! Derivation of the filter's operating constants from the user parameters.

use crate::error::{Error, Result};
use crate::format::{SampleType, VideoFormat};
use crate::params::PlaneSet;
use crate::tables::{ALPHAS, BETAS, CS, QUANT_MAX};

/// Thresholds looked up from the strength tables, on the 8-bit scale.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Strength {
    /// Index into `ALPHAS` and `CS`.
    pub a_index: usize,

    /// Index into `BETAS`.
    pub b_index: usize,

    pub alpha: i32,
    pub beta: i32,
    pub c0: i32,
}

impl Strength {
    /// Looks up the thresholds for `quant`, shifted by the two offsets.
    ///
    /// The offsets saturate so that both indices stay inside the tables,
    /// only `quant` itself has to be in range.
    pub fn new(quant: i32, a_offset: i32, b_offset: i32) -> Result<Self> {
        if !(0..=QUANT_MAX).contains(&quant) {
            return Err(Error::QuantOutOfRange(quant));
        }

        let a_offset = a_offset.clamp(-quant, QUANT_MAX - quant);
        let b_offset = b_offset.clamp(-quant, QUANT_MAX - quant);
        let a_index = (quant + a_offset).clamp(0, QUANT_MAX) as usize;
        let b_index = (quant + b_offset).clamp(0, QUANT_MAX) as usize;

        Ok(Self {
            a_index,
            b_index,
            alpha: ALPHAS[a_index],
            beta: BETAS[b_index],
            c0: CS[a_index],
        })
    }
}

/// The constants the edge kernels operate with.
///
/// Only one of the two domains is meaningful for a given format: the integer
/// fields for integer samples, the `_f` fields for float samples.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FilterConfig {
    pub alpha: i32,
    pub beta: i32,
    pub c0: i32,

    /// Bonus added to the clipping budget for each flat side of an edge.
    pub c1: i32,

    /// Largest representable sample value.
    pub peak: i32,

    pub alpha_f: f32,
    pub beta_f: f32,
    pub c0_f: f32,
    pub c1_f: f32,

    /// Planes to run the filter on.
    pub planes: PlaneSet,
}

impl FilterConfig {
    /// Scales the 8-bit thresholds to the sample domain of `format`.
    ///
    /// `format` is expected to be validated already.
    pub fn new(strength: Strength, format: &VideoFormat, planes: PlaneSet) -> Self {
        let mut config = Self {
            alpha: strength.alpha,
            beta: strength.beta,
            c0: strength.c0,
            c1: 0,
            peak: 0,
            alpha_f: 0.0,
            beta_f: 0.0,
            c0_f: 0.0,
            c1_f: 0.0,
            planes,
        };

        match format.sample_type {
            SampleType::Integer => {
                let bits = format.bits_per_sample;
                let scale = 1 << (bits - 8);
                config.alpha *= scale;
                config.beta *= scale;
                config.c0 *= scale;
                config.c1 = scale;
                config.peak = (1 << bits) - 1;
            }
            SampleType::Float => {
                config.alpha_f = strength.alpha as f32 / 255.0;
                config.beta_f = strength.beta as f32 / 255.0;
                config.c0_f = strength.c0 as f32 / 255.0;
                config.c1_f = 1.0 / 255.0;
            }
        }

        config
    }
}
