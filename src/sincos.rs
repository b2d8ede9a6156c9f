/* cordic_pipeline | sincos.rs
 * Copyright (c) 2025 L. Sartory
 * SPDX-License-Identifier: MIT
 */

/* Sine / cosine front end for a rotation engine */

/******************************************************************************/

use crate::engine::{CoreInputs, RotationEngine};

/******************************************************************************/

/// Signals sampled on each clock edge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinCosInputs {
    pub angle: i64,
    pub angle_valid: bool,
    pub result_ready: bool,
    /// Synchronous reset, active low
    pub reset_n: bool
}

impl Default for SinCosInputs {
    fn default() -> Self {
        Self { angle: 0, angle_valid: false, result_ready: true, reset_n: true }
    }
}

impl SinCosInputs {
    /// Cycle presenting a new angle
    pub fn angle(angle: i64) -> Self {
        Self { angle, angle_valid: true, ..Self::default() }
    }
}

/// Signals presented between two clock edges
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SinCosOutputs {
    pub cos: i64,
    pub sin: i64,
    pub angle_ready: bool,
    pub result_valid: bool
}

/******************************************************************************/

/// Sine and cosine of a fixed-point angle
///
/// Every sample starts from the vector `(GAIN_INVERSE, 0)`, so the rotation gain of the
/// pipeline is cancelled and the outputs are `cos` and `sin` scaled by `2^(DATA_WIDTH - 1)`.
/// The residual angle, the overflow flag and the counters stay available through
/// [`SinCos::engine()`].
pub struct SinCos<E> {
    engine: E
}

impl<E: RotationEngine> SinCos<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Advances by one clock edge
    pub fn tick(&mut self, inputs: SinCosInputs) {
        self.engine.tick(CoreInputs {
            x: E::GAIN_INVERSE,
            y: 0,
            z: inputs.angle,
            data_valid: inputs.angle_valid,
            enable: true,
            data_ready: inputs.result_ready,
            reset_n: inputs.reset_n
        });
    }

    pub fn outputs(&self) -> SinCosOutputs {
        let out = self.engine.outputs();
        SinCosOutputs {
            cos: out.x,
            sin: out.y,
            angle_ready: out.data_ready,
            result_valid: out.data_valid
        }
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Streams `angles` through the pipeline, one per tick while it is ready
    ///
    /// The engine is reset first. Results are stored in input order, and the number of
    /// results written is returned.
    ///
    /// For example:
    /// ```
    /// use cordic_pipeline::SinCos18;
    ///
    /// let angles = [0, 0x2000_0000, 0x4000_0000];
    /// let mut results = [(0, 0); 3];
    /// let n = SinCos18::default().process(&angles, &mut results);
    /// assert_eq!(n, 3);
    /// assert_eq!(results[1], (92_681, 92_683));
    /// ```
    pub fn process(&mut self, angles: &[i64], results: &mut [(i64, i64)]) -> usize {
        self.reset();
        let count = angles.len().min(results.len());
        let mut sent = 0;
        let mut received = 0;
        while received < count {
            let out = self.outputs();
            if out.result_valid {
                results[received] = (out.cos, out.sin);
                received += 1;
            }
            let inputs = if sent < count && out.angle_ready {
                sent += 1;
                SinCosInputs::angle(angles[sent - 1])
            } else {
                SinCosInputs::default()
            };
            self.tick(inputs);
        }
        count
    }

    /// Blocking computation of a single `(cos, sin)` pair
    ///
    /// For example:
    /// ```
    /// let (cos, sin) = cordic_pipeline::SinCos18::default().compute(0);
    /// assert_eq!(cos, 1 << 17);
    /// assert!(sin.abs() < 8);
    /// ```
    pub fn compute(&mut self, angle: i64) -> (i64, i64) {
        let mut result = [(0, 0)];
        self.process(&[angle], &mut result);
        result[0]
    }
}

impl<E: RotationEngine + Default> Default for SinCos<E> {
    fn default() -> Self {
        Self::new(E::default())
    }
}

/******************************************************************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Buffered, Cordic18, Format, SinCos18};

    #[test]
    fn test_seeds_gain_compensation() {
        let mut sincos = SinCos18::default();
        sincos.tick(SinCosInputs::angle(0x1234_5678));
        let head = sincos.engine().records().next().copied().unwrap_or_default();
        assert!(head.valid);
        assert_eq!((head.x, head.y, head.z), (79594, 0, 0x1234_5678));
    }

    #[test]
    fn test_forwards_handshake() {
        let mut sincos = SinCos18::default();
        assert!(sincos.outputs().angle_ready);
        sincos.tick(SinCosInputs::angle(0x2000_0000));
        for _ in 0..18 {
            assert!(!sincos.outputs().result_valid);
            sincos.tick(SinCosInputs { result_ready: false, ..SinCosInputs::default() });
        }
        let out = sincos.outputs();
        assert!(out.result_valid);
        assert_eq!((out.cos, out.sin), (92_681, 92_683));

        // Not taken: the plain core drops it
        sincos.tick(SinCosInputs { result_ready: false, ..SinCosInputs::default() });
        assert!(!sincos.outputs().result_valid);
        assert_eq!(sincos.engine().outputs().throughput_counter, 0);
        assert_eq!(sincos.engine().outputs().iterations_count, 1);
    }

    #[test]
    fn test_compute() {
        let mut sincos = SinCos18::default();
        assert_eq!(sincos.compute(0x2000_0000), (92_681, 92_683));
        assert_eq!(sincos.compute(0), (131_072, 3));
        assert_eq!(sincos.compute(0x4000_0000), (-3, 131_075));
    }

    #[test]
    fn test_process_keeps_order() {
        let angles: [i64; 40] = core::array::from_fn(|i| (i as i64) * 0x0666_6666);
        let mut results = [(0, 0); 40];
        let mut sincos = SinCos18::default();
        assert_eq!(sincos.process(&angles, &mut results), 40);
        for (angle, result) in angles.iter().zip(results.iter()) {
            assert_eq!(SinCos18::default().compute(*angle), *result);
        }
        assert_eq!(sincos.engine().outputs().iterations_count, 40);
    }

    #[test]
    fn test_process_stops_at_shorter_slice() {
        let angles = [0, 0x2000_0000, 0x4000_0000];
        let mut results = [(0, 0); 2];
        assert_eq!(SinCos18::default().process(&angles, &mut results), 2);
        assert_eq!(results[1], (92_681, 92_683));
        assert_eq!(SinCos18::default().process(&[], &mut results), 0);
    }

    #[test]
    fn test_buffered_engine() {
        let mut sincos = SinCos::new(Buffered::<18, 32, 18, 4>::new());
        let angles: [i64; 16] = core::array::from_fn(|i| (i as i64) << 28);
        let mut results = [(0, 0); 16];
        assert_eq!(sincos.process(&angles, &mut results), 16);
        let mut reference = [(0, 0); 16];
        SinCos::new(Cordic18::new()).process(&angles, &mut reference);
        assert_eq!(results, reference);
    }

    #[test]
    fn test_reset_input() {
        let mut sincos = SinCos18::default();
        sincos.tick(SinCosInputs::angle(0));
        sincos.tick(SinCosInputs { reset_n: false, ..SinCosInputs::angle(0) });
        assert_eq!(sincos.engine().occupancy(), 0);
        assert_eq!(sincos.engine().outputs().iterations_count, 0);
    }

    #[test]
    fn test_small_configuration() {
        let mut sincos = SinCos::new(crate::CordicCore::<12, 16, 12>::new());
        let (cos, sin) = sincos.compute(0x2000);
        let one = Format::<12, 16, 12>::ONE as f64;
        assert!((cos as f64 / one - core::f64::consts::FRAC_1_SQRT_2).abs() < 0.005);
        assert!((sin as f64 / one - core::f64::consts::FRAC_1_SQRT_2).abs() < 0.005);
    }
}
