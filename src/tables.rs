/* cordic_pipeline | tables.rs
 * Copyright (c) 2025 L. Sartory
 * SPDX-License-Identifier: MIT
 */

/* CORDIC seed tables, generated by build.rs */

/******************************************************************************/

include!(concat!(env!("OUT_DIR"), "/cordic_tables.rs"));

/******************************************************************************/

const fn round_positive(value: f64) -> i64 {
    (value + 0.5) as i64
}

/// Arctangent correction for iteration `index`, scaled so that a full turn is `2^angle_width`
///
/// Iterations past the end of the seed table contribute nothing.
pub const fn atan_entry(index: usize, angle_width: u32) -> i64 {
    if index >= TABLE_DEPTH {
        return 0;
    }
    round_positive(ATAN_TURNS[index] * (1u64 << angle_width) as f64)
}

/// Gain compensation constant for `iterations` stages, in the data format (`1.0 = 2^(data_width - 1)`)
pub const fn gain_inverse(iterations: usize, data_width: u32) -> i64 {
    round_positive(GAIN_TABLE[iterations - 1] * (1u64 << (data_width - 1)) as f64)
}

/// Vector length growth after `iterations` stages
pub const fn gain(iterations: usize) -> f64 {
    1.0 / GAIN_TABLE[iterations - 1]
}

/******************************************************************************/
