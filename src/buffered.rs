/* cordic_pipeline | buffered.rs
 * Copyright (c) 2025 L. Sartory
 * SPDX-License-Identifier: MIT
 */

/* Output buffer with credit-based input gating */

/******************************************************************************/

use ringbuf::traits::{Consumer, Observer, Producer};
use ringbuf::StaticRb;

use crate::engine::{CordicCore, CoreInputs, CoreOutputs, RotationEngine};
use crate::format::Format;
use crate::stage::Record;

/******************************************************************************/

/// Rotation engine followed by a `DEPTH` entry result buffer
///
/// The plain [`CordicCore`] accepts whenever it is enabled and drops any result the consumer is
/// not ready for. This wrapper reserves a buffer slot for every sample it accepts instead, so
/// `data_ready` also depends on the free space: `occupancy + buffered < DEPTH`. Nothing is ever
/// dropped, and the stage arithmetic is unchanged.
///
/// Results go straight through while the buffer is empty, so the latency is the same as the
/// plain core. A `DEPTH` of at least [`Format::LATENCY`]` + 1` sustains one result per tick with a
/// ready consumer; smaller buffers throttle the input.
pub struct Buffered<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize, const DEPTH: usize> {
    core: CordicCore<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>,
    queue: StaticRb<Record, DEPTH>,
    enable: bool,
    delivered: u32
}

impl<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize, const DEPTH: usize> Buffered<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS, DEPTH> {
    const HAS_DEPTH: bool = {
        assert!(DEPTH >= 1, "The result buffer needs at least one entry");
        true
    };

    pub fn new() -> Self {
        assert!(Self::HAS_DEPTH);
        Self {
            core: CordicCore::new(),
            queue: StaticRb::default(),
            enable: true,
            delivered: 0
        }
    }

    /// Advances by one clock edge
    ///
    /// The head of the buffer is consumed when it is valid and `data_ready` is set. A new sample
    /// is accepted when `data_valid` is set and a slot was free before the edge.
    pub fn tick(&mut self, inputs: CoreInputs) {
        self.enable = inputs.enable;
        if !inputs.reset_n {
            self.reset();
            return;
        }
        if !inputs.enable {
            return;
        }

        let accept = inputs.data_valid && self.has_credit();

        let tail = self.core.outputs();
        if !self.queue.is_empty() {
            if inputs.data_ready {
                self.deliver();
            }
            if tail.data_valid {
                self.store(&tail);
            }
        } else if tail.data_valid {
            if inputs.data_ready {
                // Straight through, the buffer stays empty
                self.delivered = self.delivered.wrapping_add(1);
                log::trace!("result delivered: x = {}, y = {}", tail.x, tail.y);
            } else {
                self.store(&tail);
            }
        }

        self.core.tick(CoreInputs { data_valid: accept, data_ready: true, ..inputs });
    }

    /// Current output signals
    ///
    /// The oldest buffered result is presented first, the pipeline output once the buffer is empty.
    pub fn outputs(&self) -> CoreOutputs {
        let tail = self.core.outputs();
        let head = match self.queue.try_peek() {
            Some(r) => *r,
            None => Record { x: tail.x, y: tail.y, z: tail.z, valid: tail.data_valid }
        };
        CoreOutputs {
            x: head.x,
            y: head.y,
            z: head.z,
            data_valid: head.valid,
            data_ready: self.enable && self.has_credit(),
            overflow: head.valid && (Self::saturated(head.x) || Self::saturated(head.y)),
            iterations_count: tail.iterations_count,
            throughput_counter: self.delivered
        }
    }

    /// Clears the pipeline, the buffer and the counters
    pub fn reset(&mut self) {
        self.core.reset();
        self.queue.clear();
        self.delivered = 0;
    }

    /// Results waiting for the consumer
    pub fn buffered(&self) -> usize {
        self.queue.occupied_len()
    }

    /// Wrapped rotation pipeline
    pub fn core(&self) -> &CordicCore<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS> {
        &self.core
    }

    fn deliver(&mut self) {
        if let Some(r) = self.queue.try_pop() {
            self.delivered = self.delivered.wrapping_add(1);
            log::trace!("buffered result delivered: x = {}, y = {}", r.x, r.y);
        }
    }

    fn store(&mut self, tail: &CoreOutputs) {
        let pushed = self.queue.try_push(Record { x: tail.x, y: tail.y, z: tail.z, valid: true });
        debug_assert!(pushed.is_ok(), "result arrived without a reserved slot");
    }

    fn has_credit(&self) -> bool {
        self.core.occupancy() + self.queue.occupied_len() < DEPTH
    }

    fn saturated(value: i64) -> bool {
        Format::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::is_saturated(value)
    }
}

impl<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize, const DEPTH: usize> Default for Buffered<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS, DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DATA_WIDTH: u32, const ANGLE_WIDTH: u32, const ITERATIONS: usize, const DEPTH: usize> RotationEngine for Buffered<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS, DEPTH> {
    const DATA_WIDTH: u32 = DATA_WIDTH;
    const ANGLE_WIDTH: u32 = ANGLE_WIDTH;
    const GAIN_INVERSE: i64 = Format::<DATA_WIDTH, ANGLE_WIDTH, ITERATIONS>::GAIN_INVERSE;

    fn tick(&mut self, inputs: CoreInputs) {
        Buffered::tick(self, inputs);
    }

    fn outputs(&self) -> CoreOutputs {
        Buffered::outputs(self)
    }

    fn reset(&mut self) {
        Buffered::reset(self);
    }
}

/******************************************************************************/

#[cfg(test)]
mod tests {
    use super::*;

    const K: i64 = Format::<18, 32, 18>::GAIN_INVERSE;

    type Deep = Buffered<18, 32, 18, 20>;
    type Shallow = Buffered<18, 32, 18, 4>;

    /// Feeds `angles` back to back, with the consumer ready on the ticks `ready` allows
    fn stream<E: RotationEngine>(engine: &mut E, angles: &[i64], ready: impl Fn(usize) -> bool) -> (Vec<i64>, usize) {
        let mut received = Vec::new();
        let mut next = 0;
        let mut ticks = 0;
        while received.len() < angles.len() {
            let out = engine.outputs();
            let data_ready = ready(ticks);
            if out.data_valid && data_ready {
                received.push(out.y);
            }
            let mut inputs = CoreInputs { data_ready, ..CoreInputs::default() };
            if next < angles.len() && out.data_ready {
                inputs = CoreInputs { data_ready, ..CoreInputs::sample(K, 0, angles[next]) };
                next += 1;
            }
            engine.tick(inputs);
            ticks += 1;
            assert!(ticks < 10_000, "stream stalled");
        }
        (received, ticks)
    }

    fn expected(angles: &[i64]) -> Vec<i64> {
        let mut core = CordicCore::<18, 32, 18>::new();
        let (received, _) = stream(&mut core, angles, |_| true);
        received
    }

    fn angles(n: i64) -> Vec<i64> {
        (0..n).map(|i| i * 0x0123_4567).collect()
    }

    #[test]
    fn test_full_rate_with_ready_consumer() {
        let angles = angles(100);
        let mut engine = Deep::new();
        let (received, ticks) = stream(&mut engine, &angles, |_| true);
        assert_eq!(received, expected(&angles));
        // Same timing as the bare core
        assert_eq!(ticks, 100 + 19);
        assert_eq!(engine.outputs().throughput_counter, 100);
        assert_eq!(engine.outputs().iterations_count, 100);
    }

    #[test]
    fn test_no_loss_with_stalling_consumer() {
        let _ = env_logger::builder().is_test(true).try_init();
        let angles = angles(60);
        let mut engine = Deep::new();
        let (received, _) = stream(&mut engine, &angles, |t| (t / 7) % 3 == 0);
        assert_eq!(received, expected(&angles));
        assert_eq!(engine.outputs().throughput_counter, 60);
        assert_eq!(engine.buffered(), 0);
    }

    #[test]
    fn test_shallow_buffer_limits_in_flight_samples() {
        let mut engine = Shallow::new();
        for i in 0..10 {
            let out = engine.outputs();
            engine.tick(CoreInputs { data_ready: false, ..CoreInputs::sample(K, 0, i) });
            assert!(engine.core().occupancy() + engine.buffered() <= 4);
            if i >= 4 {
                assert!(!out.data_ready);
            }
        }
        assert_eq!(engine.outputs().iterations_count, 4);

        let angles = angles(12);
        let mut engine = Shallow::new();
        let (received, ticks) = stream(&mut engine, &angles, |_| true);
        assert_eq!(received, expected(&angles));
        assert!(ticks > 12 + 19);
    }

    #[test]
    fn test_consumer_never_ready_keeps_results() {
        let mut engine = Deep::new();
        engine.tick(CoreInputs { data_ready: false, ..CoreInputs::sample(K, 0, 0) });
        for _ in 0..40 {
            engine.tick(CoreInputs { data_ready: false, ..CoreInputs::default() });
        }
        let out = engine.outputs();
        assert!(out.data_valid);
        assert_eq!((out.x, out.y), (131_072, 3));
        assert_eq!(out.throughput_counter, 0);

        engine.tick(CoreInputs::default());
        assert!(!engine.outputs().data_valid);
        assert_eq!(engine.outputs().throughput_counter, 1);
    }

    #[test]
    fn test_reset_clears_buffer() {
        let mut engine = Deep::new();
        for i in 0..30 {
            engine.tick(CoreInputs { data_ready: false, ..CoreInputs::sample(K, 0, i) });
        }
        assert!(engine.buffered() > 0);
        engine.tick(CoreInputs { reset_n: false, ..CoreInputs::default() });
        assert_eq!(engine.buffered(), 0);
        assert_eq!(engine.core().occupancy(), 0);
        assert!(!engine.outputs().data_valid);
        assert_eq!(engine.outputs().iterations_count, 0);
    }

    #[test]
    fn test_reset_tick_samples_enable() {
        let mut engine = Deep::new();
        engine.tick(CoreInputs { enable: false, ..CoreInputs::default() });
        assert!(!engine.outputs().data_ready);
        engine.tick(CoreInputs { reset_n: false, ..CoreInputs::default() });
        assert!(engine.outputs().data_ready);
    }
}
