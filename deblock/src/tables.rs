//! Strength tables of the H.264 deblocking filter, extended past the
//! standard's maximum QP of 51 for really strong deblocking.

/// Highest accepted quantization index.
pub const QUANT_MAX: i32 = 60;

/// Table 8-16/H.264 - indexA to alpha, the edge detection threshold.
#[rustfmt::skip]
pub static ALPHAS: [i32; QUANT_MAX as usize + 1] = [
      0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   4,   4,   5,   6,   7,   8,   9,  10,
     12,  13,  15,  17,  20,  22,  25,  28,  32,  36,  40,  45,
     50,  56,  63,  71,  80,  90, 101, 113, 127, 144, 162, 182,
    203, 226, 255, 255,
    // 52..=60
    255, 255, 255, 255, 255, 255, 255, 255, 255,
];

/// Table 8-16/H.264 - indexB to beta, the flatness threshold.
#[rustfmt::skip]
pub static BETAS: [i32; QUANT_MAX as usize + 1] = [
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  2,  2,  2,  3,  3,  3,  3,  4,
     4,  4,  6,  6,  7,  7,  8,  8,  9,  9, 10, 10,
    11, 11, 12, 12, 13, 13, 14, 14, 15, 15, 16, 16,
    17, 17, 18, 18,
    // 52..=60
    19, 20, 21, 22, 23, 24, 25, 26, 27,
];

/// Table 8-17/H.264 - indexA to tC0, the base clipping budget.
#[rustfmt::skip]
pub static CS: [i32; QUANT_MAX as usize + 1] = [
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,  0,  1,  1,  1,
     1,  1,  1,  1,  1,  1,  1,  2,  2,  2,  2,  3,
     3,  3,  4,  4,  5,  5,  6,  7,  8,  8, 10, 11,
    12, 13, 15, 17,
    // 52..=60
    19, 21, 23, 25, 27, 29, 31, 33, 35,
];
