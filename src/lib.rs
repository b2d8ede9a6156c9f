/* cordic_pipeline | lib.rs
 * Copyright (c) 2025 L. Sartory
 * SPDX-License-Identifier: MIT
 */

/* Cycle-stepped model of a pipelined CORDIC sine / cosine engine */

/******************************************************************************/

#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]

/******************************************************************************/

mod buffered;
mod engine;
mod format;
mod sincos;
mod stage;
mod tables;

pub use buffered::Buffered;
pub use engine::{CordicCore, CoreInputs, CoreOutputs, RotationEngine};
pub use format::{wrap, Format};
pub use sincos::{SinCos, SinCosInputs, SinCosOutputs};
pub use stage::{Quadrant, QuadrantStage, Record, RotationStage};

/******************************************************************************/

/// Rotation engine with 18 bit data, 32 bit angles and 18 stages
pub type Cordic18 = CordicCore<18, 32, 18>;

/// Sine / cosine engine with 18 bit data, 32 bit angles and 18 stages
///
/// Angles use the full 32 bit range for one turn, so 45° is `0x2000_0000`. Results are scaled by
/// `2^17`, and may reach `±2^17` on the axes thanks to the guard bit.
pub type SinCos18 = SinCos<Cordic18>;
