/* cordic_pipeline | stage.rs
 * Copyright (c) 2025 L. Sartory
 * SPDX-License-Identifier: MIT
 */

/* Pipeline stages */

/******************************************************************************/

use crate::format::Format;

/******************************************************************************/

/// Register contents at one stage boundary
///
/// `x` and `y` use the internal data width, `z` the angle width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub valid: bool
}

/// Angle quadrant, taken from the two most significant angle bits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    /// `00`: 0° to 90°
    First,
    /// `01`: 90° to 180°
    Second,
    /// `10`: -180° to -90°
    Third,
    /// `11`: -90° to 0°
    Fourth
}

impl Quadrant {
    pub const fn from_angle(z: i64, angle_width: u32) -> Self {
        match (z >> (angle_width - 2)) & 0b11 {
            0b00 => Quadrant::First,
            0b01 => Quadrant::Second,
            0b10 => Quadrant::Third,
            _ => Quadrant::Fourth
        }
    }
}

/******************************************************************************/

/// Input stage: brings the angle within ±90° with a quarter turn pre-rotation
pub struct QuadrantStage<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize>;

impl<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize> QuadrantStage<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS> {
    const LOW_BITS: i64 = Format::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::QUARTER_TURN - 1;

    /// Builds the stage 0 record for a new sample
    ///
    /// The inputs are truncated to their signal widths first.
    pub const fn load(x_in: i64, y_in: i64, z_in: i64) -> Record {
        let x = Format::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::wrap_input(x_in);
        let y = Format::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::wrap_input(y_in);
        let z = Format::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::wrap_angle(z_in);

        let (x, y, z) = match Quadrant::from_angle(z, ANGLE_WIDTH) {
            Quadrant::First | Quadrant::Fourth => (x, y, z),
            // Rotate by +90°, remove a quarter turn from the angle
            Quadrant::Second => (-y, x, z & Self::LOW_BITS),
            // Rotate by -90°, add a quarter turn to the angle
            Quadrant::Third => (y, -x, z | !Self::LOW_BITS)
        };

        Record { x, y, z, valid: true }
    }

    /// Record loaded on cycles without a new sample
    pub const fn idle() -> Record {
        Record { x: 0, y: 0, z: 0, valid: false }
    }
}

/******************************************************************************/

/// One shift-add rotation
#[derive(Clone, Copy, Debug)]
pub struct RotationStage<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize> {
    shift: u32,
    atan: i64
}

impl<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize> RotationStage<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS> {
    pub const fn new(index: usize) -> Self {
        Self {
            shift: index as u32,
            atan: Format::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::ATAN_TABLE[index]
        }
    }

    /// Position in the pipeline, which is also the shift amount
    pub const fn index(&self) -> usize {
        self.shift as usize
    }

    /// Computes the next record
    ///
    /// Invalid records are forwarded untouched.
    pub const fn advance(&self, input: Record) -> Record {
        if !input.valid {
            return input;
        }

        let x_shift = input.x >> self.shift;
        let y_shift = input.y >> self.shift;
        let (x, y, z) = if input.z < 0 {
            (input.x + y_shift, input.y - x_shift, input.z + self.atan)
        } else {
            (input.x - y_shift, input.y + x_shift, input.z - self.atan)
        };

        Record {
            x: Format::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::wrap_data(x),
            y: Format::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::wrap_data(y),
            z: Format::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::wrap_angle(z),
            valid: true
        }
    }
}

/******************************************************************************/
