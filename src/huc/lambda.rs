// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

//! Rate-distortion lambdas in the U8.2 / U14.2 fixed point the firmware
//! takes.

use crate::error::{lookup, Error};
use crate::params::{FrameType, HEVC_MAX_QP};
use crate::tables::VP9_AC_QLOOKUP;

/// HEVC lambda scale for intra or inter frames.
#[inline]
pub fn hevc_qp_scale(frame_type: FrameType) -> f64 {
  if frame_type.is_intra() {
    0.60
  } else {
    0.65
  }
}

/// VP9 lambda scale for intra or inter frames.
#[inline]
pub fn vp9_qp_scale(frame_type: FrameType) -> f64 {
  if frame_type.is_intra() {
    0.31
  } else {
    0.33
  }
}

/// `qp_scale * 2^((qp - 12) / 3)`, flat below QP 12.
#[inline]
pub fn rd_lambda_f64(qp_scale: f64, qp: i32) -> f64 {
  qp_scale * 2f64.powf((qp - 12).max(0) as f64 / 3.0)
}

#[inline]
pub fn sad_lambda_f64(qp_scale: f64, qp: i32) -> f64 {
  rd_lambda_f64(qp_scale, qp).sqrt()
}

/// Rounds to the nearest quarter step.
#[inline]
pub fn to_fixed_q2(value: f64) -> u16 {
  (value * 4.0 + 0.5) as u16
}

/// SAD lambda for an HEVC frame at `qp`, clamped to `[0, 51]`.
pub fn compute_sad_lambda(qp: i32, frame_type: FrameType) -> u16 {
  let qp = qp.clamp(0, HEVC_MAX_QP as i32);
  to_fixed_q2(sad_lambda_f64(hevc_qp_scale(frame_type), qp))
}

pub fn compute_rd_lambda(qp: i32, frame_type: FrameType) -> u16 {
  let qp = qp.clamp(0, HEVC_MAX_QP as i32);
  to_fixed_q2(rd_lambda_f64(hevc_qp_scale(frame_type), qp))
}

/// VP9 lambda from the luma AC quantizer step of `qindex`.
pub fn vp9_lambda(qindex: i64, frame_type: FrameType) -> Result<f64, Error> {
  let step = lookup("VP9 AC quantizer", &VP9_AC_QLOOKUP, qindex)?;
  Ok(vp9_qp_scale(frame_type) * step as f64 / 8.0)
}
