// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use super::*;
use crate::error::{lookup, Error, InvalidParameter};
use crate::huc::REENCODE_MASK;
use crate::provider::{read_buffer, BufferHandle, ResourceProvider};
use crate::tables::{
  HEVC_BRC_QP_ADJUST_B, HEVC_BRC_QP_ADJUST_I, HEVC_BRC_QP_ADJUST_P,
};
use crate::util::{clamp, payload_reader};
use bitstream_io::ByteRead;

/// Size of the PAK statistics record read back after each pass.
pub const PASS_STATS_SIZE: usize = 12;

/// Image status bit set when the frame exceeded its maximum size.
pub const IMAGE_STATUS_MAX_SIZE_EXCEEDED: u32 = 1 << 1;

/// QP change on the 0..=51 scale that requests another pass.
pub const REENCODE_QP_DELTA_UP: i32 = 4;
pub const REENCODE_QP_DELTA_DOWN: i32 = -5;
const PANIC_OVERSHOOT_STREAK: u32 = 2;

/// PAK statistics of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassStats {
  pub frame_size_bytes: u32,
  pub image_status: u32,
  pub huc_status: u32,
}

impl PassStats {
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
    if bytes.len() < PASS_STATS_SIZE {
      return Err(
        InvalidParameter::PayloadSize {
          actual: bytes.len(),
          max: PASS_STATS_SIZE,
        }
        .into(),
      );
    }
    let mut r = payload_reader(bytes);
    Ok(PassStats {
      frame_size_bytes: r.read::<u32>()?,
      image_status: r.read::<u32>()?,
      huc_status: r.read::<u32>()?,
    })
  }

  pub fn to_bytes(&self) -> [u8; PASS_STATS_SIZE] {
    let mut out = [0u8; PASS_STATS_SIZE];
    out[..4].copy_from_slice(&self.frame_size_bytes.to_le_bytes());
    out[4..8].copy_from_slice(&self.image_status.to_le_bytes());
    out[8..].copy_from_slice(&self.huc_status.to_le_bytes());
    out
  }

  pub fn frame_bits(&self) -> f64 {
    self.frame_size_bytes as f64 * 8.0
  }
}

/// Reads the statistics record the PAK wrote to `handle`.
pub fn read_pass_stats<P: ResourceProvider + ?Sized>(
  provider: &mut P, handle: BufferHandle,
) -> Result<PassStats, Error> {
  read_buffer(provider, handle, PassStats::from_bytes)?
}

/// Outcome of one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateDecision {
  /// QP for the next pass, or for the next frame when the frame is done.
  pub next_qp: i32,
  pub continue_pass: bool,
  /// The next pass is the panic re-encode.
  pub panic: bool,
  /// Statistics were unavailable and the previous QP is reused.
  pub skipped: bool,
  /// Frame size cap for the panic pass, in bytes.
  pub frame_size_cap: Option<u32>,
  /// Status to report back, with `REENCODE_MASK` raised on panic.
  pub huc_status: u32,
}

impl RateControlSession {
  fn qp_adjust_grid(&self) -> &'static [[i8; 8]; 9] {
    match self.frame_type {
      FrameType::I => &HEVC_BRC_QP_ADJUST_I,
      FrameType::P => &HEVC_BRC_QP_ADJUST_P,
      FrameType::B => &HEVC_BRC_QP_ADJUST_B,
    }
  }

  fn frame_thresholds(&self) -> &[i8; 8] {
    if self.frame_type.is_intra() {
      &self.thresholds.i
    } else if self.rc_method == RateControlMethod::VBR {
      &self.thresholds.vbr
    } else {
      &self.thresholds.pb
    }
  }

  /// Scale between the codec QP and the 0..=51 scale of the grids.
  fn qp_scale(&self) -> f64 {
    self.codec.max_qp() as f64 / HEVC_MAX_QP as f64
  }

  /// Grid delta in quarter QP for a frame deviating by `deviation_pct`.
  fn grid_delta(&self, deviation_pct: f64) -> Result<i32, Error> {
    let row = self
      .frame_thresholds()
      .iter()
      .filter(|&&t| deviation_pct > t as f64)
      .count();
    let half_qp = (self.qp as f64 / self.qp_scale() / 2.0) as i64;
    let col = EST_RATE_THRESHOLD
      .iter()
      .filter(|&&t| half_qp >= t as i64)
      .count();
    let grid_row =
      lookup("BRC QP adjust grid", self.qp_adjust_grid(), row as i64)?;
    Ok(lookup("BRC QP adjust row", &grid_row, col as i64)? as i32)
  }

  /// Global correction in quarter QP from the rate achieved so far.
  fn global_delta(&self, frame_bits: f64) -> i32 {
    if self.frame_count < START_GLOBAL_ADJUST_FRAME[0] {
      return 0;
    }
    let expected = self.input_bits_per_frame * (self.frame_count + 1) as f64;
    let ratio = (self.total_bits + frame_bits) / expected * 100.0;
    let bucket =
      RATE_RATIO_THRESHOLD.iter().filter(|&&t| ratio > t as f64).count();
    let step = START_GLOBAL_ADJUST_FRAME
      .iter()
      .filter(|&&f| self.frame_count >= f)
      .count();
    let qp = RATE_RATIO_THRESHOLD_QP[bucket] as i32 * 4;
    qp * START_GLOBAL_ADJUST_MULT[step] as i32
      / START_GLOBAL_ADJUST_DIV[step] as i32
  }

  /// Feeds the statistics of the current pass to the controller.
  ///
  /// Another pass is requested while passes remain and the QP moved past
  /// the re-encode thresholds. A frame that would underflow the VBV, or
  /// that repeats a large overshoot, enters panic mode: one extra pass at
  /// the maximum QP under a frame size cap.
  pub fn update(&mut self, stats: &PassStats) -> Result<UpdateDecision, Error> {
    let frame_bits = stats.frame_bits();
    let budget = self.input_bits_per_frame;
    let deviation_pct = (frame_bits - budget) / budget * 100.0;

    let delta_q2 =
      self.grid_delta(deviation_pct)? + self.global_delta(frame_bits);
    let scale = self.qp_scale();
    let next_qp = clamp(
      (self.qp as f64 + delta_q2 as f64 / 4.0 * scale).round() as i32,
      self.min_qp as i32,
      self.max_qp as i32,
    );
    let norm_delta = ((next_qp - self.qp) as f64 / scale).round() as i32;

    let mut decision = UpdateDecision {
      next_qp,
      huc_status: stats.huc_status,
      ..Default::default()
    };

    let underflow = self.vbv_level - frame_bits < 0.0;
    let overshoot = deviation_pct > OVERSHOOT_SKIP_FRAME_PCT
      || stats.image_status & IMAGE_STATUS_MAX_SIZE_EXCEEDED != 0;
    let streak = if overshoot { self.overshoot_streak + 1 } else { 0 };
    let panic_allowed = self.panic_enabled
      && !self.panic
      && self.current_pass + 1 < self.max_passes();

    if panic_allowed
      && self.rc_method.brc_enabled()
      && (underflow || streak >= PANIC_OVERSHOOT_STREAK)
    {
      self.panic = true;
      decision.panic = true;
      decision.continue_pass = true;
      decision.next_qp = self.max_qp as i32;
      decision.huc_status |= REENCODE_MASK;
      let cap = self.vbv_level.max(budget) / 8.0;
      decision.frame_size_cap = Some(cap as u32);
      debug!(
        "panic on pass {}: {:.0} bits against a buffer level of {:.0}",
        self.current_pass, frame_bits, self.vbv_level
      );
    } else if !self.panic
      && self.current_pass + 1 < self.num_passes
      && (norm_delta >= REENCODE_QP_DELTA_UP
        || norm_delta <= REENCODE_QP_DELTA_DOWN)
    {
      decision.continue_pass = true;
      decision.huc_status |= REENCODE_MASK;
    }

    debug!(
      "{} frame pass {}: {} bytes, deviation {:.1}%, qp {} -> {}",
      self.frame_type,
      self.current_pass,
      stats.frame_size_bytes,
      deviation_pct,
      self.qp,
      decision.next_qp
    );

    if decision.continue_pass {
      self.current_pass += 1;
    } else {
      self.finish_frame(frame_bits, streak);
    }
    self.qp = decision.next_qp;
    Ok(decision)
  }

  /// Runs [`update`](Self::update) on read back statistics. A failed read
  /// back ends the frame with the previous QP.
  ///
  /// # Errors
  ///
  /// Returns read back errors other than `ResourceError` unchanged.
  pub fn update_from_readback(
    &mut self, readback: Result<PassStats, Error>,
  ) -> Result<UpdateDecision, Error> {
    match readback {
      Ok(stats) => self.update(&stats),
      Err(e) if e.is_recoverable() => {
        warn!("skipping BRC update for pass {}: {}", self.current_pass, e);
        self.frame_count += 1;
        Ok(UpdateDecision {
          next_qp: self.qp,
          skipped: true,
          ..Default::default()
        })
      }
      Err(e) => Err(e),
    }
  }

  fn finish_frame(&mut self, frame_bits: f64, streak: u32) {
    self.vbv_level = (self.vbv_level - frame_bits + self.input_bits_per_frame)
      .min(self.buf_size_bits);
    self.total_bits += frame_bits;
    self.frame_count += 1;
    self.overshoot_streak = streak;
  }
}
