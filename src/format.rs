/* cordic_pipeline | format.rs
 * Copyright (c) 2025 L. Sartory
 * SPDX-License-Identifier: MIT
 */

/* Fixed-point conventions shared by every stage */

/******************************************************************************/

use crate::tables;

/******************************************************************************/

/// Two's complement wrap of `value` to a signed signal that is `bits` wide
///
/// Example: `wrap(0x1_0000, 17) == -0x1_0000`, `wrap(0x2_0001, 17) == 1`
pub const fn wrap(value: i64, bits: u32) -> i64 {
    let shift = i64::BITS - bits;
    (value << shift) >> shift
}

/// Engine configuration
///
/// * `DATA_WIDTH`: width of the `x` / `y` inputs. Values use `DATA_WIDTH - 1` fractional bits, and
///   gain one guard bit inside the pipeline.
/// * `ANGLE_WIDTH`: width of the angle. A full turn maps to `2^ANGLE_WIDTH`, so the two most
///   significant bits hold the quadrant.
/// * `ITERATIONS`: number of rotation stages, which is also the pipeline depth.
///
/// Unsupported combinations are rejected at compile time.
pub struct Format<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize>;

impl<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize> Format<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS> {
    pub const IS_VALID: bool = {
        assert!(DATA_WIDTH >= 8 && DATA_WIDTH <= 32, "DATA_WIDTH must be between 8 and 32 bits");
        assert!(ANGLE_WIDTH >= 8 && ANGLE_WIDTH <= 48, "ANGLE_WIDTH must be between 8 and 48 bits");
        assert!(ITERATIONS >= 1, "At least one rotation stage is required");
        assert!(ITERATIONS <= tables::TABLE_DEPTH, "ITERATIONS exceeds the arctangent table depth");
        true
    };

    /// Width of the internal and output data path
    pub const OUTPUT_WIDTH: u32 = DATA_WIDTH + 1;
    /// Fixed-point representation of 1.0
    pub const ONE: i64 = 1 << (DATA_WIDTH - 1);
    /// Most negative output value, reported as overflow
    pub const OUTPUT_MIN: i64 = -(1 << DATA_WIDTH);
    /// Most positive output value
    pub const OUTPUT_MAX: i64 = (1 << DATA_WIDTH) - 1;
    /// One quarter turn in the angle format
    pub const QUARTER_TURN: i64 = 1 << (ANGLE_WIDTH - 2);
    /// Clock ticks from presenting a sample to its result, counting the accepting tick
    pub const LATENCY: usize = ITERATIONS + 1;

    /// Vector length growth through all rotation stages
    pub const GAIN: f64 = tables::gain(ITERATIONS);

    /// Initial `x` which cancels the rotation gain of all stages
    pub const GAIN_INVERSE: i64 = {
        assert!(Self::IS_VALID);
        tables::gain_inverse(ITERATIONS, DATA_WIDTH)
    };

    /// Per-stage rotation angles
    pub const ATAN_TABLE: [i64; ITERATIONS] = {
        assert!(Self::IS_VALID);
        let mut table = [0; ITERATIONS];
        let mut i = 0;
        while i < ITERATIONS {
            table[i] = tables::atan_entry(i, ANGLE_WIDTH);
            i += 1;
        }
        table
    };

    /// Truncates a value to the input data width
    pub const fn wrap_input(value: i64) -> i64 {
        wrap(value, DATA_WIDTH)
    }

    /// Truncates a value to the internal data width
    pub const fn wrap_data(value: i64) -> i64 {
        wrap(value, Self::OUTPUT_WIDTH)
    }

    /// Truncates a value to the angle width
    pub const fn wrap_angle(value: i64) -> i64 {
        wrap(value, ANGLE_WIDTH)
    }

    /// Checks for the saturation pattern (sign bit set, all magnitude bits clear)
    pub const fn is_saturated(value: i64) -> bool {
        value == Self::OUTPUT_MIN
    }
}

/******************************************************************************/
