//! Rust implementation of the H.264 deblocking filter (ITU-T H.264 8.7), with
//! a single global strength applied to every 4x4 block edge of the frame.
//! This is intended to be used as a postprocessing step, not as a loop filter.

use crate::config::FilterConfig;
use crate::params::Backend;
use crate::pixel::Sample;
use crate::plane::PlaneMut;

// Positions of the samples on a line crossing an edge. The `p` samples come
// before the edge in memory, the `q` samples after it.
const P2: usize = 0;
const P1: usize = 1;
const P0: usize = 2;
const Q0: usize = 3;
const Q1: usize = 4;
const Q2: usize = 5;

pub(crate) mod scalar_impl {
    use super::*;
    use num_traits::{AsPrimitive, PrimInt, Unsigned};

    /// Filters one line of integer samples, ITU-T H.264 8.7.2.3 for bS < 4.
    #[inline]
    pub fn process<T>(line: &mut [T; 6], config: &FilterConfig)
    where
        T: PrimInt + Unsigned + AsPrimitive<i32>,
        i32: AsPrimitive<T>,
    {
        let [p2, p1, p0, q0, q1, q2]: [i32; 6] = (*line).map(|s| s.as_());
        let FilterConfig {
            alpha,
            beta,
            c0,
            c1,
            peak,
            ..
        } = *config;

        if !((p0 - q0).abs() < alpha && (p1 - p0).abs() < beta && (q0 - q1).abs() < beta) {
            return;
        }

        let ap = (p2 - p0).abs();
        let aq = (q2 - q0).abs();

        let mut c = c0;
        if aq < beta {
            c += c1;
        }
        if ap < beta {
            c += c1;
        }

        let avg = (p0 + q0 + 1) >> 1;
        let delta = (((q0 - p0) * 4 + p1 - q1 + 4) >> 3).clamp(-c, c);
        let deltap1 = ((p2 + avg - p1 * 2) >> 1).clamp(-c0, c0);
        let deltaq1 = ((q2 + avg - q1 * 2) >> 1).clamp(-c0, c0);

        line[P0] = (p0 + delta).clamp(0, peak).as_();
        line[Q0] = (q0 - delta).clamp(0, peak).as_();
        // These stay between p1 (q1) and the average of p2 (q2) and the edge,
        // so they can't leave the sample range.
        if ap < beta {
            line[P1] = (p1 + deltap1).as_();
        }
        if aq < beta {
            line[Q1] = (q1 + deltaq1).as_();
        }
    }

    /// Same as `process`, for float samples. Nothing is rounded, and the edge
    /// samples are not clipped to any range.
    #[inline]
    pub fn process_float(line: &mut [f32; 6], config: &FilterConfig) {
        let [p2, p1, p0, q0, q1, q2] = *line;
        let FilterConfig {
            alpha_f: alpha,
            beta_f: beta,
            c0_f: c0,
            c1_f: c1,
            ..
        } = *config;

        if !((p0 - q0).abs() < alpha && (p1 - p0).abs() < beta && (q0 - q1).abs() < beta) {
            return;
        }

        let ap = (p2 - p0).abs();
        let aq = (q2 - q0).abs();

        let mut c = c0;
        if aq < beta {
            c += c1;
        }
        if ap < beta {
            c += c1;
        }

        let avg = (p0 + q0) / 2.0;
        let delta = (((q0 - p0) * 4.0 + p1 - q1) / 8.0).clamp(-c, c);
        let deltap1 = ((p2 + avg - p1 * 2.0) / 2.0).clamp(-c0, c0);
        let deltaq1 = ((q2 + avg - q1 * 2.0) / 2.0).clamp(-c0, c0);

        line[P0] = p0 + delta;
        line[Q0] = q0 - delta;
        if ap < beta {
            line[P1] = p1 + deltap1;
        }
        if aq < beta {
            line[Q1] = q1 + deltaq1;
        }
    }
}

pub(crate) mod simd_impl {
    use super::*;
    use num_traits::{AsPrimitive, PrimInt, Unsigned};
    use std::ops::Shr;
    use wide::{f32x4, i32x4, CmpLt};

    /// Utility mimicking `i32::clamp` for `i32x4`.
    #[inline]
    fn clamp_simd(x: i32x4, min: i32x4, max: i32x4) -> i32x4 {
        x.max(min).min(max)
    }

    /// Utility mimicking `f32::clamp` for `f32x4`.
    #[inline]
    fn clamp_float_simd(x: f32x4, min: f32x4, max: f32x4) -> f32x4 {
        x.max(min).min(max)
    }

    /// Utility to upcast and convert 4 samples into an `i32x4` vector.
    #[inline]
    fn into_simd32<T: AsPrimitive<i32>>(a: [T; 4]) -> i32x4 {
        i32x4::from([a[0].as_(), a[1].as_(), a[2].as_(), a[3].as_()])
    }

    /// Inverse of `into_simd32`; every lane must already be in sample range.
    #[inline]
    fn from_simd32<T: Copy + 'static>(v: i32x4) -> [T; 4]
    where
        i32: AsPrimitive<T>,
    {
        let a = v.as_array_ref();
        [a[0].as_(), a[1].as_(), a[2].as_(), a[3].as_()]
    }

    /// Same as `scalar_impl::process`, but performs it on the 4 lines of an
    /// edge segment in parallel. Lines that don't pass the edge test are put
    /// back unchanged with a blend.
    #[inline]
    pub fn process_simd<T>(lines: &mut [[T; 4]; 6], config: &FilterConfig)
    where
        T: PrimInt + Unsigned + AsPrimitive<i32>,
        i32: AsPrimitive<T>,
    {
        let [p2, p1, p0, q0, q1, q2] = (*lines).map(into_simd32);

        let alpha = i32x4::splat(config.alpha);
        let beta = i32x4::splat(config.beta);
        let c0 = i32x4::splat(config.c0);
        let c1 = i32x4::splat(config.c1);
        let peak = i32x4::splat(config.peak);
        let one = i32x4::splat(1);
        let two = i32x4::splat(2);
        let four = i32x4::splat(4);

        let filtered = (p0 - q0).abs().cmp_lt(alpha)
            & (p1 - p0).abs().cmp_lt(beta)
            & (q0 - q1).abs().cmp_lt(beta);
        let p_flat = (p2 - p0).abs().cmp_lt(beta);
        let q_flat = (q2 - q0).abs().cmp_lt(beta);

        let c = c0 + q_flat.blend(c1, i32x4::ZERO) + p_flat.blend(c1, i32x4::ZERO);

        let avg: i32x4 = (p0 + q0 + one).shr(1);
        let sum: i32x4 = (q0 - p0) * four + p1 - q1 + four;
        let delta = clamp_simd(sum.shr(3), -c, c);
        let sum_p1: i32x4 = p2 + avg - p1 * two;
        let sum_q1: i32x4 = q2 + avg - q1 * two;
        let deltap1 = clamp_simd(sum_p1.shr(1), -c0, c0);
        let deltaq1 = clamp_simd(sum_q1.shr(1), -c0, c0);

        let res_p0 = clamp_simd(p0 + delta, i32x4::ZERO, peak);
        let res_q0 = clamp_simd(q0 - delta, i32x4::ZERO, peak);

        lines[P0] = from_simd32(filtered.blend(res_p0, p0));
        lines[Q0] = from_simd32(filtered.blend(res_q0, q0));
        lines[P1] = from_simd32((filtered & p_flat).blend(p1 + deltap1, p1));
        lines[Q1] = from_simd32((filtered & q_flat).blend(q1 + deltaq1, q1));
    }

    /// Same as `scalar_impl::process_float`, but performs it on the 4 lines
    /// of an edge segment in parallel.
    #[inline]
    pub fn process_float_simd(lines: &mut [[f32; 4]; 6], config: &FilterConfig) {
        let [p2, p1, p0, q0, q1, q2] = (*lines).map(f32x4::from);

        let alpha = f32x4::splat(config.alpha_f);
        let beta = f32x4::splat(config.beta_f);
        let c0 = f32x4::splat(config.c0_f);
        let c1 = f32x4::splat(config.c1_f);
        let two = f32x4::splat(2.0);
        let four = f32x4::splat(4.0);
        let eight = f32x4::splat(8.0);

        let filtered = (p0 - q0).abs().cmp_lt(alpha)
            & (p1 - p0).abs().cmp_lt(beta)
            & (q0 - q1).abs().cmp_lt(beta);
        let p_flat = (p2 - p0).abs().cmp_lt(beta);
        let q_flat = (q2 - q0).abs().cmp_lt(beta);

        let c = c0 + q_flat.blend(c1, f32x4::ZERO) + p_flat.blend(c1, f32x4::ZERO);

        let avg = (p0 + q0) / two;
        let delta = clamp_float_simd(((q0 - p0) * four + p1 - q1) / eight, -c, c);
        let deltap1 = clamp_float_simd((p2 + avg - p1 * two) / two, -c0, c0);
        let deltaq1 = clamp_float_simd((q2 + avg - q1 * two) / two, -c0, c0);

        lines[P0] = *filtered.blend(p0 + delta, p0).as_array_ref();
        lines[Q0] = *filtered.blend(q0 - delta, q0).as_array_ref();
        lines[P1] = *(filtered & p_flat).blend(p1 + deltap1, p1).as_array_ref();
        lines[Q1] = *(filtered & q_flat).blend(q1 + deltaq1, q1).as_array_ref();
    }
}

/// Runs the scalar kernel on each of the 4 lines separately.
#[inline]
fn process_lines_scalar<T: Sample>(lines: &mut [[T; 4]; 6], config: &FilterConfig) {
    for i in 0..4 {
        let mut line = [
            lines[P2][i],
            lines[P1][i],
            lines[P0][i],
            lines[Q0][i],
            lines[Q1][i],
            lines[Q2][i],
        ];
        T::filter_line(&mut line, config);
        for (k, sample) in line.into_iter().enumerate() {
            lines[k][i] = sample;
        }
    }
}

/// Deblocks the horizontal edge segment between rows `y - 1` and `y`,
/// over columns `x..x + 4`.
#[inline]
fn deblock_hor_edge<T, F>(
    plane: &mut PlaneMut<T>,
    x: usize,
    y: usize,
    config: &FilterConfig,
    kernel: F,
)
where
    T: Sample,
    F: Fn(&mut [[T; 4]; 6], &FilterConfig),
{
    let mut lines = plane.gather_columns(x, y);
    kernel(&mut lines, config);
    plane.scatter_columns(x, y, &lines);
}

/// Deblocks the vertical edge segment between columns `x - 1` and `x`,
/// over rows `y..y + 4`.
#[inline]
fn deblock_ver_edge<T, F>(
    plane: &mut PlaneMut<T>,
    x: usize,
    y: usize,
    config: &FilterConfig,
    kernel: F,
)
where
    T: Sample,
    F: Fn(&mut [[T; 4]; 6], &FilterConfig),
{
    let mut lines = plane.gather_rows(x, y);
    kernel(&mut lines, config);
    plane.scatter_rows(x, y, &lines);
}

/// Walks the 4x4 grid of the plane in the fixed order the output depends on.
///
/// Every kernel invocation may read samples written by the previous ones:
/// within a band of 4 rows, the top edge of a block is filtered before its
/// left edge.
fn deblock_grid<T, F>(plane: &mut PlaneMut<T>, config: &FilterConfig, kernel: F)
where
    T: Sample,
    F: Fn(&mut [[T; 4]; 6], &FilterConfig) + Copy,
{
    let width = plane.width();
    let height = plane.height();

    // The first band has no horizontal edge above it.
    for x in (4..width).step_by(4) {
        deblock_ver_edge(plane, x, 0, config, kernel);
    }

    for y in (4..height).step_by(4) {
        deblock_hor_edge(plane, 0, y, config, kernel);

        for x in (4..width).step_by(4) {
            deblock_hor_edge(plane, x, y, config, kernel);
            deblock_ver_edge(plane, x, y, config, kernel);
        }
    }
}

/// Applies the deblocking filter in place to every 4x4 block edge of the
/// given plane, with the strength and sample domain of `config`.
pub fn deblock_plane<T: Sample>(
    plane: &mut PlaneMut<T>,
    config: &FilterConfig,
    backend: Backend,
) {
    match backend {
        Backend::Scalar => deblock_grid(plane, config, process_lines_scalar::<T>),
        Backend::Simd => deblock_grid(plane, config, T::filter_lines),
    }
}
