//! Borrowed, writable views of a single plane.

use crate::error::{Error, Result};
use crate::pixel::Sample;
use std::mem::size_of;

/// A plane as handed over by the owner of the frame: raw bytes, with the
/// row pitch in bytes.
#[derive(Debug)]
pub struct PlaneBytes<'a> {
    pub data: &'a mut [u8],
    pub width: usize,
    pub height: usize,

    /// Distance between the starts of two consecutive rows, in bytes.
    pub stride: usize,
}

impl<'a> PlaneBytes<'a> {
    pub fn new(data: &'a mut [u8], width: usize, height: usize, stride: usize) -> Self {
        Self {
            data,
            width,
            height,
            stride,
        }
    }
}

/// A mutable view of one plane of samples.
///
/// The width and height are always non-zero multiples of 8, and the buffer
/// always covers every row, so the edge kernels never need bounds to be
/// rechecked. The stride may be wider than the plane.
#[derive(Debug)]
pub struct PlaneMut<'a, T> {
    data: &'a mut [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T: Sample> PlaneMut<'a, T> {
    /// Wraps `data`, with `stride` counted in samples.
    pub fn new(data: &'a mut [T], width: usize, height: usize, stride: usize) -> Result<Self> {
        if width == 0 || height == 0 || width % 8 != 0 || height % 8 != 0 {
            return Err(Error::InvalidPlaneLayout(
                "dimensions must be non-zero multiples of 8",
            ));
        }

        if stride < width {
            return Err(Error::InvalidPlaneLayout("stride is narrower than the plane"));
        }

        let required = stride
            .checked_mul(height - 1)
            .and_then(|len| len.checked_add(width));
        if required.map_or(true, |required| data.len() < required) {
            return Err(Error::InvalidPlaneLayout("buffer is too small for the plane"));
        }

        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Reinterprets a byte buffer as samples, with `stride` counted in bytes.
    pub fn from_bytes(
        bytes: &'a mut [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<Self> {
        let sample_size = size_of::<T>();
        if stride % sample_size != 0 {
            return Err(Error::InvalidPlaneLayout(
                "stride is not a whole number of samples",
            ));
        }

        // A trailing partial sample can't be part of any row.
        let usable = bytes.len() - bytes.len() % sample_size;
        let data = bytemuck::try_cast_slice_mut(&mut bytes[..usable]).map_err(|_| {
            Error::InvalidPlaneLayout("buffer is not aligned to the sample size")
        })?;

        Self::new(data, width, height, stride / sample_size)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row pitch, in samples.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn row(&self, y: usize) -> &[T] {
        &self.data[y * self.stride..][..self.width]
    }

    /// Collects the four columns `x..x + 4` crossing the horizontal edge
    /// above row `y`, from row `y - 3` to row `y + 2`.
    #[inline]
    pub(crate) fn gather_columns(&self, x: usize, y: usize) -> [[T; 4]; 6] {
        let mut lines = [[T::zeroed(); 4]; 6];
        for (k, line) in lines.iter_mut().enumerate() {
            let start = (y + k - 3) * self.stride + x;
            line.copy_from_slice(&self.data[start..start + 4]);
        }
        lines
    }

    /// Inverse of `gather_columns`.
    #[inline]
    pub(crate) fn scatter_columns(&mut self, x: usize, y: usize, lines: &[[T; 4]; 6]) {
        for (k, line) in lines.iter().enumerate() {
            let start = (y + k - 3) * self.stride + x;
            self.data[start..start + 4].copy_from_slice(line);
        }
    }

    /// Collects the four rows `y..y + 4` crossing the vertical edge left of
    /// column `x`, from column `x - 3` to column `x + 2`.
    #[inline]
    pub(crate) fn gather_rows(&self, x: usize, y: usize) -> [[T; 4]; 6] {
        let mut lines = [[T::zeroed(); 4]; 6];
        for i in 0..4 {
            let start = (y + i) * self.stride + x - 3;
            for (k, &sample) in self.data[start..start + 6].iter().enumerate() {
                lines[k][i] = sample;
            }
        }
        lines
    }

    /// Inverse of `gather_rows`.
    #[inline]
    pub(crate) fn scatter_rows(&mut self, x: usize, y: usize, lines: &[[T; 4]; 6]) {
        for i in 0..4 {
            let start = (y + i) * self.stride + x - 3;
            for (k, sample) in self.data[start..start + 6].iter_mut().enumerate() {
                *sample = lines[k][i];
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_layout_checks() {
        let mut data = vec![0u8; 16 * 8];

        assert!(PlaneMut::new(&mut data, 8, 8, 16).is_ok());
        assert!(PlaneMut::new(&mut data, 16, 8, 16).is_ok());
        // The last row doesn't need the padding after it.
        assert!(PlaneMut::new(&mut data[..16 * 7 + 8], 8, 8, 16).is_ok());

        #[rustfmt::skip]
        let bad: &[(usize, usize, usize)] = &[
            (0, 8, 16),  // empty
            (12, 8, 16), // unpadded width
            (8, 4, 16),  // unpadded height
            (16, 8, 8),  // stride too narrow
            (16, 16, 16), // buffer too small
        ];
        for &(width, height, stride) in bad {
            assert!(matches!(
                PlaneMut::new(&mut data, width, height, stride),
                Err(Error::InvalidPlaneLayout(_))
            ));
        }
    }

    #[test]
    fn test_from_bytes() {
        let mut samples = vec![0u16; 12 * 8];
        samples[12 + 3] = 0xabcd;
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut samples);

        let plane = PlaneMut::<u16>::from_bytes(bytes, 8, 8, 24).unwrap();
        assert_eq!(plane.stride(), 12);
        assert_eq!(plane.row(1)[3], 0xabcd);

        // An odd byte stride would split a sample.
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut samples);
        assert!(matches!(
            PlaneMut::<u16>::from_bytes(bytes, 8, 8, 23),
            Err(Error::InvalidPlaneLayout(_))
        ));
    }

    #[test]
    fn test_gather_scatter() {
        let mut data: Vec<u8> = (0..64).collect();
        let mut plane = PlaneMut::new(&mut data, 8, 8, 8).unwrap();

        let columns = plane.gather_columns(4, 4);
        assert_eq!(columns[0], [12, 13, 14, 15]);
        assert_eq!(columns[3], [36, 37, 38, 39]);
        assert_eq!(columns[5], [52, 53, 54, 55]);

        let rows = plane.gather_rows(4, 4);
        assert_eq!(rows[0], [33, 41, 49, 57]);
        assert_eq!(rows[3], [36, 44, 52, 60]);
        assert_eq!(rows[5], [38, 46, 54, 62]);

        let mut lines = rows;
        lines[2] = [0; 4];
        plane.scatter_rows(4, 4, &lines);
        assert_eq!(plane.row(5), &[40, 41, 42, 0, 44, 45, 46, 47]);

        let mut lines = plane.gather_columns(0, 4);
        lines[4] = [9; 4];
        plane.scatter_columns(0, 4, &lines);
        assert_eq!(plane.row(5), &[9, 9, 9, 9, 44, 45, 46, 47]);
    }
}
