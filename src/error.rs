// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use thiserror::Error;

use crate::huc::InitializerState;
use crate::params::{CodecKind, RateControlMethod};

/// Malformed or self-contradictory parameters.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum InvalidParameter {
  /// The frame rate has a zero numerator or denominator.
  #[error("invalid frame rate {num}/{den} (expected non-zero terms)")]
  FrameRate { num: u64, den: u64 },
  /// The bitrate is zero under a bitrate-driven rate control method.
  #[error("bitrate must be non-zero for {0:?}")]
  ZeroBitrate(RateControlMethod),
  /// The minimum QP exceeds the maximum QP.
  #[error("invalid QP bounds: min {min} exceeds max {max}")]
  QpBounds { min: u8, max: u8 },
  /// The frame QP is outside of the codec range.
  #[error("invalid QP {actual} (expected <= {max})")]
  Qp { actual: i32, max: i32 },
  #[error("invalid number of temporal layers {actual} (expected 1..={max})")]
  TemporalLayers { actual: usize, max: usize },
  /// Cumulative layer bitrates must not decrease.
  #[error("temporal layer {layer} bitrate {bitrate} is below the layer below it")]
  TemporalBitrate { layer: usize, bitrate: u64 },
  /// The VBV buffer does not fit the 32-bit firmware fields.
  #[error("VBV buffer of {bits} bits exceeds the firmware range")]
  VbvSize { bits: u64 },
  #[error("invalid frame size {width}x{height}")]
  FrameSize { width: u32, height: u32 },
  #[error("invalid GOP of {gop} frames with {b_frames} B frames")]
  Gop { gop: u32, b_frames: u32 },
  #[error("invalid pass {pass} (expected < {max})")]
  Pass { pass: usize, max: usize },
  #[error("invalid pass count {actual} (expected 1..={max})")]
  PassCount { actual: usize, max: usize },
  #[error("invalid ring size {actual} (expected 1..={max})")]
  RingSize { actual: usize, max: usize },
  #[error("invalid ring index {index} (expected < {max})")]
  RingIndex { index: usize, max: usize },
  /// The command count does not match the layout profile.
  #[error("{actual} commands built, the layout expects {expected}")]
  CommandCount { actual: u32, expected: u32 },
  #[error("command payload of {actual} bytes exceeds {max}")]
  PayloadSize { actual: usize, max: usize },
  /// An operation was called out of order.
  #[error("{op} is not valid in the {state:?} state")]
  Transition { op: &'static str, state: InitializerState },
  /// The slot is still owned by the GPU.
  #[error("slot ({ring}, {pass}) is still in flight")]
  SlotBusy { ring: usize, pass: usize },
  #[error("fence does not belong to slot ({ring}, {pass})")]
  StaleFence { ring: usize, pass: usize },
  #[error("{0:?} is not supported by this operation")]
  Codec(CodecKind),
  #[error("{method:?} rate control is not supported for {codec:?}")]
  RateControl { codec: CodecKind, method: RateControlMethod },
}

/// Errors raised by the rate control core.
#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid parameter: {0}")]
  InvalidParameter(#[from] InvalidParameter),
  #[error("missing required {0} parameters")]
  NullParameter(&'static str),
  /// A table index fell outside of its table.
  #[error("index {index} out of range for {table} (length {len})")]
  IndexOutOfRange { table: &'static str, index: i64, len: usize },
  /// The resource provider failed a call, with its platform status code.
  #[error("resource provider failed to {op} (status {code})")]
  ResourceError { op: &'static str, code: i32 },
  #[error("GPU hang or timeout")]
  GpuHangOrTimeout,
  #[error("failed to pack payload")]
  Pack(#[from] std::io::Error),
}

impl Error {
  /// Whether the error must abort the encode session.
  ///
  /// Parameter errors are surfaced to the caller, who may fix the
  /// parameters and retry. Everything else is terminal at this layer.
  pub const fn is_fatal(&self) -> bool {
    !matches!(self, Error::InvalidParameter(_) | Error::NullParameter(_))
  }

  /// Whether the error may be skipped when reading back statistics.
  pub const fn is_recoverable(&self) -> bool {
    matches!(self, Error::ResourceError { .. })
  }
}

/// Bounds-checked table lookup.
pub(crate) fn lookup<T: Copy>(
  table: &'static str, data: &[T], index: i64,
) -> Result<T, Error> {
  usize::try_from(index)
    .ok()
    .and_then(|i| data.get(i).copied())
    .ok_or(Error::IndexOutOfRange { table, index, len: data.len() })
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn lookup_bounds() {
    const T: [u16; 3] = [4, 5, 6];
    assert_eq!(lookup("t", &T, 2).unwrap(), 6);
    assert!(matches!(
      lookup("t", &T, 3),
      Err(Error::IndexOutOfRange { table: "t", index: 3, len: 3 })
    ));
    assert!(matches!(
      lookup("t", &T, -1),
      Err(Error::IndexOutOfRange { index: -1, .. })
    ));
  }

  #[test]
  fn fatality() {
    assert!(Error::GpuHangOrTimeout.is_fatal());
    assert!(Error::ResourceError { op: "lock", code: -5 }.is_fatal());
    assert!(!Error::NullParameter("slice").is_fatal());
    let e: Error = InvalidParameter::FrameRate { num: 0, den: 1 }.into();
    assert!(!e.is_fatal());
    assert_eq!(
      e.to_string(),
      "invalid parameter: invalid frame rate 0/1 (expected non-zero terms)"
    );
  }
}
