// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

//! Bit-rate control state shared by the codecs.
//!
//! [`RateControlSession`] is created by the init/reset engine and then
//! advanced once per pass by the update engine.

use arrayvec::ArrayVec;

use crate::params::*;

mod init;
mod update;

pub use self::init::*;
pub use self::update::*;

/// Frame at which the global rate ratio adjustment starts, then the frames
/// at which its weight steps up.
pub const START_GLOBAL_ADJUST_FRAME: [u32; 4] = [10, 50, 100, 150];
pub const START_GLOBAL_ADJUST_MULT: [u8; 5] = [1, 1, 3, 2, 1];
pub const START_GLOBAL_ADJUST_DIV: [u8; 5] = [40, 5, 5, 3, 1];
/// Rate ratio buckets, in percent of the expected bits.
pub const RATE_RATIO_THRESHOLD: [u8; 6] = [40, 75, 97, 103, 125, 160];
pub const RATE_RATIO_THRESHOLD_QP: [i8; 7] = [-3, -2, -1, 0, 1, 2, 3];
/// Estimated rate buckets, on half of the 0..=51 QP scale.
pub const EST_RATE_THRESHOLD: [u8; 7] = [4, 8, 12, 16, 20, 24, 28];
/// Overshoot in percent of the frame budget that counts toward panic mode.
pub const OVERSHOOT_SKIP_FRAME_PCT: f64 = 100.0;

/// Whether the session starts from scratch or re-targets a running stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode {
  Init,
  Reset,
}

/// Frame size deviation thresholds, in percent, negative first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviationThresholds {
  pub pb: [i8; 8],
  pub vbr: [i8; 8],
  pub i: [i8; 8],
}

/// Rate control state owned by one encode session.
#[derive(Debug, Clone)]
pub struct RateControlSession {
  pub(crate) codec: CodecKind,
  pub(crate) rc_method: RateControlMethod,
  pub(crate) mode: InitMode,
  pub(crate) target_bitrate: u64,
  pub(crate) max_bitrate: u64,
  pub(crate) min_bitrate: u64,
  pub(crate) frame_rate: Rational,
  pub(crate) gop_size: u32,
  pub(crate) num_b_frames: u32,
  pub(crate) input_bits_per_frame: f64,
  pub(crate) buf_size_bits: f64,
  pub(crate) init_buf_fullness_bits: f64,
  /// Target decoder buffer fullness, advanced once per frame.
  pub(crate) target_buf_fullness: f64,
  /// Modeled decoder buffer level after the last finished frame.
  pub(crate) vbv_level: f64,
  pub(crate) bps_ratio: f64,
  pub(crate) thresholds: DeviationThresholds,
  pub(crate) temporal_ratios: ArrayVec<u8, MAX_TEMPORAL_LAYERS>,
  pub(crate) min_qp: u8,
  pub(crate) max_qp: u8,
  pub(crate) qp: i32,
  pub(crate) num_passes: usize,
  pub(crate) panic_enabled: bool,
  pub(crate) current_pass: usize,
  pub(crate) panic: bool,
  pub(crate) frame_type: FrameType,
  pub(crate) frame_count: u32,
  pub(crate) total_bits: f64,
  pub(crate) overshoot_streak: u32,
}

impl RateControlSession {
  pub fn codec(&self) -> CodecKind {
    self.codec
  }

  pub fn rc_method(&self) -> RateControlMethod {
    self.rc_method
  }

  pub fn mode(&self) -> InitMode {
    self.mode
  }

  pub fn input_bits_per_frame(&self) -> f64 {
    self.input_bits_per_frame
  }

  pub fn buf_size_bits(&self) -> f64 {
    self.buf_size_bits
  }

  pub fn init_buf_fullness_bits(&self) -> f64 {
    self.init_buf_fullness_bits
  }

  pub fn target_buf_fullness(&self) -> f64 {
    self.target_buf_fullness
  }

  pub fn vbv_level(&self) -> f64 {
    self.vbv_level
  }

  pub fn bps_ratio(&self) -> f64 {
    self.bps_ratio
  }

  pub fn thresholds(&self) -> &DeviationThresholds {
    &self.thresholds
  }

  /// Per layer shares of 64, empty for a single layer stream.
  pub fn temporal_ratios(&self) -> &[u8] {
    &self.temporal_ratios
  }

  pub fn max_bitrate(&self) -> u64 {
    self.max_bitrate
  }

  pub fn qp(&self) -> i32 {
    self.qp
  }

  pub fn qp_range(&self) -> (u8, u8) {
    (self.min_qp, self.max_qp)
  }

  pub fn current_pass(&self) -> usize {
    self.current_pass
  }

  /// Passes a frame may take, the panic pass included.
  pub fn max_passes(&self) -> usize {
    self.num_passes + self.panic_enabled as usize
  }

  pub fn in_panic(&self) -> bool {
    self.panic
  }

  pub fn frame_count(&self) -> u32 {
    self.frame_count
  }

  /// Starts a new frame at pass 0.
  pub fn begin_frame(&mut self, frame_type: FrameType) {
    self.frame_type = frame_type;
    self.current_pass = 0;
    self.panic = false;
  }

  /// Advances the target buffer fullness by one frame.
  ///
  /// Returns the target for the frame in bits and whether the buffer
  /// wrapped, in which case a buffer size was subtracted first.
  pub fn advance_target_fullness(&mut self) -> (u32, bool) {
    let mut overflow = false;
    if self.target_buf_fullness > self.buf_size_bits {
      self.target_buf_fullness -= self.buf_size_bits;
      overflow = true;
    }
    let target = self.target_buf_fullness as u32;
    self.target_buf_fullness += self.input_bits_per_frame;
    (target, overflow)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::config::{Generation, SessionConfig};

  fn cbr_session() -> RateControlSession {
    let cfg = SessionConfig::new(Generation::G11, CodecKind::VP8);
    let seq = SequenceParameters::new(640, 480)
      .with_bitrate(3_000_000, 3_000_000)
      .with_vbv(400_000, 350_000);
    let pic = PictureParameters::new(FrameType::I, 60);
    RateControlSession::init_or_reset(&seq, &pic, InitMode::Init, &cfg)
      .unwrap()
  }

  #[test]
  fn target_fullness_wraps_at_buffer_size() {
    let mut rc = cbr_session();
    assert_eq!(rc.input_bits_per_frame(), 100_000.0);
    assert_eq!(rc.buf_size_bits(), 400_000.0);
    assert_eq!(rc.advance_target_fullness(), (350_000, false));
    assert_eq!(rc.target_buf_fullness(), 450_000.0);
    assert_eq!(rc.advance_target_fullness(), (50_000, true));
    assert_eq!(rc.advance_target_fullness(), (150_000, false));
    assert_eq!(rc.target_buf_fullness(), 250_000.0);
  }

  #[test]
  fn begin_frame_restarts_passes() {
    let mut rc = cbr_session();
    rc.current_pass = 2;
    rc.panic = true;
    rc.begin_frame(FrameType::P);
    assert_eq!(rc.current_pass(), 0);
    assert!(!rc.in_panic());
    assert_eq!(rc.frame_type, FrameType::P);
  }
}
