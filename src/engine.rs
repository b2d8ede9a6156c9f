/* cordic_pipeline | engine.rs
 * Copyright (c) 2025 L. Sartory
 * SPDX-License-Identifier: MIT
 */

/* Pipelined CORDIC rotation engine */

/******************************************************************************/

use crate::format::Format;
use crate::stage::{QuadrantStage, Record, RotationStage};

/******************************************************************************/

/// Signals sampled on each clock edge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoreInputs {
    pub x: i64,
    pub y: i64,
    pub z: i64,
    /// A new sample is present on `x`, `y` and `z`
    pub data_valid: bool,
    /// Clock enable. All registers hold while it is low.
    pub enable: bool,
    /// The consumer takes the result currently presented
    pub data_ready: bool,
    /// Synchronous reset, active low
    pub reset_n: bool
}

impl Default for CoreInputs {
    /// Idle cycle: no sample, enabled, consumer ready, out of reset
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            z: 0,
            data_valid: false,
            enable: true,
            data_ready: true,
            reset_n: true
        }
    }
}

impl CoreInputs {
    /// Idle cycle carrying a new sample
    pub fn sample(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z, data_valid: true, ..Self::default() }
    }
}

/// Signals presented between two clock edges
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreOutputs {
    pub x: i64,
    pub y: i64,
    /// Residual angle
    pub z: i64,
    pub data_valid: bool,
    pub data_ready: bool,
    /// The presented result hit the saturation pattern
    pub overflow: bool,
    /// Accepted samples, wrapping
    pub iterations_count: u16,
    /// Delivered results, wrapping
    pub throughput_counter: u32
}

/// Clock-stepped rotation engine
///
/// The sine / cosine wrapper and the handshake policies are written against this trait.
pub trait RotationEngine {
    const DATA_WIDTH: u32;
    const ANGLE_WIDTH: u32;
    /// `x` seed which makes the output a unit vector
    const GAIN_INVERSE: i64;

    /// Advances by one clock edge
    fn tick(&mut self, inputs: CoreInputs);
    /// Current output signals
    fn outputs(&self) -> CoreOutputs;
    /// Clears all in-flight data and counters
    fn reset(&mut self);
}

/******************************************************************************/

/// Pipelined CORDIC in rotation mode
///
/// A quadrant pre-rotation stage feeds `ITERATIONS` rotation stages. Each call to
/// [`CordicCore::tick()`] moves every record forward by exactly one stage, so a sample
/// accepted on one tick is presented on the outputs `ITERATIONS` ticks later.
pub struct CordicCore<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize> {
    stages: [RotationStage<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>; ITERATIONS],
    /// Quadrant stage output
    head: Record,
    /// `pipeline[i]` is the output of `stages[i]`
    pipeline: [Record; ITERATIONS],
    enable: bool,
    iterations_count: u16,
    throughput_counter: u32
}

impl<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize> CordicCore<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS> {
    /// Creates an engine in its post-reset state
    pub fn new() -> Self {
        assert!(Format::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::IS_VALID);
        Self {
            stages: core::array::from_fn(RotationStage::new),
            head: QuadrantStage::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::idle(),
            pipeline: [Record::default(); ITERATIONS],
            enable: true,
            iterations_count: 0,
            throughput_counter: 0
        }
    }

    /// Advances the pipeline by one clock edge
    ///
    /// For example:
    /// ```
    /// use cordic_pipeline::{Cordic18, CoreInputs, Format};
    ///
    /// let mut engine = Cordic18::new();
    /// engine.tick(CoreInputs::sample(Format::<18, 32, 18>::GAIN_INVERSE, 0, 0));
    /// for _ in 0..18 {
    ///     assert!(!engine.outputs().data_valid);
    ///     engine.tick(CoreInputs::default());
    /// }
    /// let out = engine.outputs();
    /// assert!(out.data_valid);
    /// assert!((out.x - 131_072).abs() < 8);
    /// assert!(out.y.abs() < 8);
    /// ```
    pub fn tick(&mut self, inputs: CoreInputs) {
        self.enable = inputs.enable;
        if !inputs.reset_n {
            self.reset();
            return;
        }
        if !inputs.enable {
            return;
        }

        let tail = self.pipeline[ITERATIONS - 1];
        if tail.valid && inputs.data_ready {
            self.throughput_counter = self.throughput_counter.wrapping_add(1);
            log::trace!("result delivered: x = {}, y = {}", tail.x, tail.y);
        }

        // Last to first, so every stage reads its predecessor's previous value
        for i in (1..ITERATIONS).rev() {
            self.pipeline[i] = self.stages[i].advance(self.pipeline[i - 1]);
        }
        self.pipeline[0] = self.stages[0].advance(self.head);

        self.head = if inputs.data_valid {
            self.iterations_count = self.iterations_count.wrapping_add(1);
            log::trace!("sample accepted: x = {}, y = {}, z = {:#x}", inputs.x, inputs.y, inputs.z);
            QuadrantStage::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::load(inputs.x, inputs.y, inputs.z)
        } else {
            QuadrantStage::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::idle()
        };
    }

    /// Current output signals
    pub fn outputs(&self) -> CoreOutputs {
        let tail = &self.pipeline[ITERATIONS - 1];
        CoreOutputs {
            x: tail.x,
            y: tail.y,
            z: tail.z,
            data_valid: tail.valid,
            data_ready: self.enable,
            overflow: tail.valid && (Self::saturated(tail.x) || Self::saturated(tail.y)),
            iterations_count: self.iterations_count,
            throughput_counter: self.throughput_counter
        }
    }

    /// Clears every record and both counters
    pub fn reset(&mut self) {
        log::debug!("cordic core reset");
        self.head = QuadrantStage::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::idle();
        self.pipeline = [Record::default(); ITERATIONS];
        self.iterations_count = 0;
        self.throughput_counter = 0;
    }

    /// Number of valid records in flight
    pub fn occupancy(&self) -> usize {
        self.valid_flags().filter(|&valid| valid).count()
    }

    /// Valid bits from the quadrant stage to the last rotation stage
    pub fn valid_flags(&self) -> impl Iterator<Item = bool> + '_ {
        self.records().map(|r| r.valid)
    }

    /// Stage records from the quadrant stage to the last rotation stage
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        core::iter::once(&self.head).chain(self.pipeline.iter())
    }

    fn saturated(value: i64) -> bool {
        Format::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::is_saturated(value)
    }
}

impl<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize> Default for CordicCore<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize> RotationEngine for CordicCore<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS> {
    const DATA_WIDTH: u32 = DATA_WIDTH;
    const ANGLE_WIDTH: u32 = ANGLE_WIDTH;
    const GAIN_INVERSE: i64 = Format::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::GAIN_INVERSE;

    fn tick(&mut self, inputs: CoreInputs) {
        CordicCore::tick(self, inputs);
    }

    fn outputs(&self) -> CoreOutputs {
        CordicCore::outputs(self)
    }

    fn reset(&mut self) {
        CordicCore::reset(self);
    }
}

/******************************************************************************/
