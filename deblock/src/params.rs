//! User-facing filter parameters

use crate::error::{Error, Result};
use bitflags::bitflags;

bitflags! {
    /// The planes of a frame that get filtered.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct PlaneSet : u8 {
        const PLANE_0 = 0b1;
        const PLANE_1 = 0b10;
        const PLANE_2 = 0b100;
    }
}

impl PlaneSet {
    /// The set holding only the plane at `index`, if there can be one.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::PLANE_0),
            1 => Some(Self::PLANE_1),
            2 => Some(Self::PLANE_2),
            _ => None,
        }
    }

    /// Every plane of a frame with `num_planes` planes.
    pub fn first(num_planes: usize) -> Self {
        (0..num_planes)
            .filter_map(Self::from_index)
            .fold(Self::empty(), |set, plane| set | plane)
    }

    pub fn contains_index(self, index: usize) -> bool {
        Self::from_index(index).is_some_and(|plane| self.contains(plane))
    }
}

/// Which implementation of the edge kernels to run.
///
/// Both produce bit-identical results, `Scalar` mostly exists as a reference.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    /// One line of samples at a time.
    Scalar,

    /// All four lines of an edge segment at once, in SIMD lanes.
    #[default]
    Simd,
}

/// Parameters of a filter instance, as they come in from the host.
///
/// Nothing is validated until the filter is constructed from them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeblockParams {
    /// Quantization index in `0..=60`; higher means stronger deblocking.
    pub quant: i32,

    /// Offset added to `quant` for looking up alpha and c0.
    ///
    /// Saturates instead of failing when it would leave the table.
    pub aoffset: i32,

    /// Offset added to `quant` for looking up beta.
    pub boffset: i32,

    /// Indices of the planes to filter. Empty means all of them.
    pub planes: Vec<i32>,

    pub backend: Backend,
}

impl Default for DeblockParams {
    fn default() -> Self {
        Self {
            quant: 25,
            aoffset: 0,
            boffset: 0,
            planes: Vec::new(),
            backend: Backend::default(),
        }
    }
}

impl DeblockParams {
    pub fn with_quant(mut self, quant: i32) -> Self {
        self.quant = quant;
        self
    }

    pub fn with_offsets(mut self, aoffset: i32, boffset: i32) -> Self {
        self.aoffset = aoffset;
        self.boffset = boffset;
        self
    }

    pub fn with_planes(mut self, planes: &[i32]) -> Self {
        self.planes = planes.to_vec();
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Turns the plane list into a set, for a frame of `num_planes` planes.
    pub(crate) fn plane_set(&self, num_planes: usize) -> Result<PlaneSet> {
        if self.planes.is_empty() {
            return Ok(PlaneSet::first(num_planes));
        }

        let mut set = PlaneSet::empty();
        for &n in self.planes.iter() {
            let plane = usize::try_from(n)
                .ok()
                .filter(|&index| index < num_planes)
                .and_then(PlaneSet::from_index)
                .ok_or(Error::PlaneIndexOutOfRange(n))?;

            if set.contains(plane) {
                return Err(Error::DuplicatePlane(n));
            }

            set |= plane;
        }

        Ok(set)
    }
}
