//! Sample representations the filter has kernels for.

use crate::config::FilterConfig;
use crate::deblock::{scalar_impl, simd_impl};
use bytemuck::Pod;
use std::fmt::Debug;

/// A type that can be used as a sample type.
///
/// This is a closed set: `u8` and `u16` for integer formats of 8 and 9-16
/// bits, `f32` for float formats. Each type binds the edge kernels of its
/// sample domain.
pub trait Sample: Pod + Debug + PartialEq + Send + Sync + 'static {
    /// Filters a single line of `p2 p1 p0 q0 q1 q2` samples in place.
    fn filter_line(line: &mut [Self; 6], config: &FilterConfig);

    /// Filters four parallel lines at once, indexed by position then line.
    fn filter_lines(lines: &mut [[Self; 4]; 6], config: &FilterConfig);
}

impl Sample for u8 {
    #[inline]
    fn filter_line(line: &mut [Self; 6], config: &FilterConfig) {
        scalar_impl::process(line, config)
    }

    #[inline]
    fn filter_lines(lines: &mut [[Self; 4]; 6], config: &FilterConfig) {
        simd_impl::process_simd(lines, config)
    }
}

impl Sample for u16 {
    #[inline]
    fn filter_line(line: &mut [Self; 6], config: &FilterConfig) {
        scalar_impl::process(line, config)
    }

    #[inline]
    fn filter_lines(lines: &mut [[Self; 4]; 6], config: &FilterConfig) {
        simd_impl::process_simd(lines, config)
    }
}

impl Sample for f32 {
    #[inline]
    fn filter_line(line: &mut [Self; 6], config: &FilterConfig) {
        scalar_impl::process_float(line, config)
    }

    #[inline]
    fn filter_lines(lines: &mut [[Self; 4]; 6], config: &FilterConfig) {
        simd_impl::process_float_simd(lines, config)
    }
}
