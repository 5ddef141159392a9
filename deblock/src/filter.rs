//! The filter instance: validated parameters plus the kernels for one format.

use crate::config::{FilterConfig, Strength};
use crate::deblock::deblock_plane;
use crate::error::{Error, Result};
use crate::format::VideoFormat;
use crate::params::{Backend, DeblockParams};
use crate::pixel::Sample;
use crate::plane::{PlaneBytes, PlaneMut};
use log::{debug, trace};
use std::fmt;

/// Filters all selected planes of one frame.
type FrameFn = fn(&FilterConfig, Backend, &mut [PlaneBytes<'_>]) -> Result<()>;

/// A deblocking filter, set up for frames of a single format.
///
/// Immutable once constructed, so one instance may filter any number of
/// frames, also from several threads at once.
pub struct Deblock {
    format: VideoFormat,
    config: FilterConfig,
    backend: Backend,

    /// The sample type specialization, picked once in `new`.
    filter: FrameFn,
}

impl Deblock {
    /// Validates `params` against `format` and derives the filter constants.
    ///
    /// `format` is `None` if frames of the clip don't all share the same
    /// format, which is not supported.
    pub fn new(format: Option<&VideoFormat>, params: &DeblockParams) -> Result<Self> {
        let format = *format.ok_or(Error::InvalidFormat)?;
        format.validate()?;

        let strength = Strength::new(params.quant, params.aoffset, params.boffset)?;
        let planes = params.plane_set(format.num_planes)?;
        let config = FilterConfig::new(strength, &format, planes);

        let filter: FrameFn = match format.bytes_per_sample() {
            1 => filter_frame::<u8>,
            2 => filter_frame::<u16>,
            _ => filter_frame::<f32>,
        };

        debug!(
            "deblock: {:?} {}-bit, quant {} (a_index {}, b_index {}), planes {:?}, backend {:?}",
            format.sample_type,
            format.bits_per_sample,
            params.quant,
            strength.a_index,
            strength.b_index,
            planes,
            params.backend,
        );
        debug!("deblock: {:?}", config);

        Ok(Self {
            format,
            config,
            backend: params.backend,
            filter,
        })
    }

    pub fn format(&self) -> &VideoFormat {
        &self.format
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Deblocks a frame in place, given as one entry per plane.
    ///
    /// Every plane must already be padded to a multiple of 8 in both
    /// dimensions. Planes that aren't selected are neither checked nor
    /// modified. If any selected plane breaks the layout contract, nothing
    /// is modified at all.
    pub fn process(&self, planes: &mut [PlaneBytes<'_>]) -> Result<()> {
        if planes.len() != self.format.num_planes {
            return Err(Error::PlaneCountMismatch {
                expected: self.format.num_planes,
                actual: planes.len(),
            });
        }

        (self.filter)(&self.config, self.backend, planes)
    }
}

impl fmt::Debug for Deblock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deblock")
            .field("format", &self.format)
            .field("config", &self.config)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

fn filter_frame<T: Sample>(
    config: &FilterConfig,
    backend: Backend,
    planes: &mut [PlaneBytes<'_>],
) -> Result<()> {
    let selected = |index: &usize| config.planes.contains_index(*index);

    for (_, plane) in planes.iter_mut().enumerate().filter(|(i, _)| selected(i)) {
        PlaneMut::<T>::from_bytes(&mut *plane.data, plane.width, plane.height, plane.stride)?;
    }

    for (index, plane) in planes.iter_mut().enumerate().filter(|(i, _)| selected(i)) {
        trace!(
            "deblock: plane {}, {}x{}, stride {}",
            index,
            plane.width,
            plane.height,
            plane.stride
        );

        let mut view =
            PlaneMut::<T>::from_bytes(&mut *plane.data, plane.width, plane.height, plane.stride)?;
        deblock_plane(&mut view, config, backend);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::format::SampleType;

    fn yuv8() -> VideoFormat {
        VideoFormat::new(SampleType::Integer, 8, 3)
    }

    /// An 8x8 plane with a small step between its left and right halves.
    fn step_plane(left: u8, right: u8, stride: usize) -> Vec<u8> {
        (0..stride * 8)
            .map(|i| if i % stride < 4 { left } else { right })
            .collect()
    }

    #[test]
    fn test_new_errors() {
        let params = DeblockParams::default();
        assert_eq!(Deblock::new(None, &params).unwrap_err(), Error::InvalidFormat);

        let format = VideoFormat::new(SampleType::Float, 16, 3);
        assert_eq!(Deblock::new(Some(&format), &params).unwrap_err(), Error::InvalidFormat);

        #[rustfmt::skip]
        let data: &[(DeblockParams, Error)] = &[
            (DeblockParams::default().with_quant(61), Error::QuantOutOfRange(61)),
            (DeblockParams::default().with_quant(-5), Error::QuantOutOfRange(-5)),
            (DeblockParams::default().with_planes(&[0, 3]), Error::PlaneIndexOutOfRange(3)),
            (DeblockParams::default().with_planes(&[1, 1]), Error::DuplicatePlane(1)),
            // The quant is checked before the planes.
            (DeblockParams::default().with_quant(99).with_planes(&[7]), Error::QuantOutOfRange(99)),
        ];

        for (params, expected) in data.iter() {
            assert_eq!(Deblock::new(Some(&yuv8()), params).unwrap_err(), *expected);
        }
    }

    #[test]
    fn test_new_extreme_offsets() {
        let params = DeblockParams::default().with_offsets(i32::MAX, i32::MIN);
        let deblock = Deblock::new(Some(&yuv8()), &params).unwrap();
        assert_eq!((deblock.config().alpha, deblock.config().beta), (255, 0));
    }

    #[test]
    fn test_process_selected_planes() {
        let params = DeblockParams::default().with_planes(&[0, 2]);
        let deblock = Deblock::new(Some(&yuv8()), &params).unwrap();

        let mut y = step_plane(100, 110, 8);
        let mut u = step_plane(100, 110, 8);
        let mut v = step_plane(100, 110, 16);
        let mut frame = [
            PlaneBytes::new(&mut y, 8, 8, 8),
            PlaneBytes::new(&mut u, 8, 8, 8),
            PlaneBytes::new(&mut v, 8, 8, 16),
        ];
        deblock.process(&mut frame).unwrap();

        assert_eq!(&y[..8], &[100, 100, 101, 103, 107, 109, 110, 110]);
        assert_eq!(u, step_plane(100, 110, 8));
        assert_eq!(&v[..8], &[100, 100, 101, 103, 107, 109, 110, 110]);
        // The stride padding of the last plane is left alone.
        assert!(v.chunks(16).all(|row| row[8..].iter().all(|&s| s == 110)));
    }

    #[test]
    fn test_process_plane_count() {
        let deblock = Deblock::new(Some(&yuv8()), &DeblockParams::default()).unwrap();

        let mut y = step_plane(100, 110, 8);
        let mut frame = [PlaneBytes::new(&mut y, 8, 8, 8)];
        assert_eq!(
            deblock.process(&mut frame),
            Err(Error::PlaneCountMismatch {
                expected: 3,
                actual: 1
            })
        );
    }

    #[test]
    fn test_process_bad_layout_is_atomic() {
        let deblock = Deblock::new(Some(&yuv8()), &DeblockParams::default()).unwrap();

        let mut y = step_plane(100, 110, 8);
        let mut u = step_plane(100, 110, 8);
        let mut v = vec![0u8; 8 * 6];
        let mut frame = [
            PlaneBytes::new(&mut y, 8, 8, 8),
            PlaneBytes::new(&mut u, 8, 8, 8),
            // Not padded to a multiple of 8.
            PlaneBytes::new(&mut v, 8, 6, 8),
        ];

        assert!(matches!(
            deblock.process(&mut frame),
            Err(Error::InvalidPlaneLayout(_))
        ));
        assert_eq!(y, step_plane(100, 110, 8));
        assert_eq!(u, step_plane(100, 110, 8));
    }

    #[test]
    fn test_process_16bit() {
        let format = VideoFormat::new(SampleType::Integer, 16, 1);
        let deblock = Deblock::new(Some(&format), &DeblockParams::default()).unwrap();

        let mut samples: Vec<u16> = (0..64)
            .map(|i| if i % 8 < 4 { 100 * 256 } else { 110 * 256 })
            .collect();
        let mut frame = [PlaneBytes::new(bytemuck::cast_slice_mut(&mut samples), 8, 8, 16)];
        deblock.process(&mut frame).unwrap();

        assert_eq!(
            &samples[..8],
            &[100u16, 100, 101, 103, 107, 109, 110, 110].map(|s| s * 256)
        );
    }

    #[test]
    fn test_process_float() {
        let format = VideoFormat::new(SampleType::Float, 32, 1);
        let params = DeblockParams::default().with_backend(Backend::Scalar);
        let deblock = Deblock::new(Some(&format), &params).unwrap();

        let mut samples: Vec<f32> = (0..64)
            .map(|i| if i % 8 < 4 { 0.4 } else { 0.42 })
            .collect();
        let mut frame = [PlaneBytes::new(bytemuck::cast_slice_mut(&mut samples), 8, 8, 32)];
        deblock.process(&mut frame).unwrap();

        assert!(samples[3] > 0.4 && samples[4] < 0.42);
        assert_eq!(samples[0], 0.4);
        assert_eq!(samples[7], 0.42);
    }

    #[test]
    fn test_process_concurrently() {
        let deblock = Deblock::new(Some(&yuv8()), &DeblockParams::default().with_planes(&[0]))
            .unwrap();

        let mut frames: Vec<Vec<u8>> = (0..4).map(|_| step_plane(100, 110, 8)).collect();
        std::thread::scope(|scope| {
            for luma in frames.iter_mut() {
                let deblock = &deblock;
                scope.spawn(move || {
                    let mut u = vec![0u8; 64];
                    let mut v = vec![0u8; 64];
                    let mut frame = [
                        PlaneBytes::new(luma, 8, 8, 8),
                        PlaneBytes::new(&mut u, 8, 8, 8),
                        PlaneBytes::new(&mut v, 8, 8, 8),
                    ];
                    deblock.process(&mut frame).unwrap();
                });
            }
        });

        for luma in frames.iter() {
            assert_eq!(&luma[..8], &[100, 100, 101, 103, 107, 109, 110, 110]);
        }
    }
}
