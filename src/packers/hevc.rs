// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use bitstream_io::ByteWrite;
use std::io;

use super::*;
use crate::error::InvalidParameter;
use crate::huc::{FirmwareLayoutProfile, MAX_CMD_SIZE};
use crate::params::*;
use crate::rate::*;
use crate::util::{clamp, write_zeros};

pub const HEVC_BRC_INIT_DMEM_SIZE: usize = 192;
pub const HEVC_BRC_UPDATE_DMEM_SIZE: usize = 192;

const LOW_DELAY_DEV_THRESH_PB: [i8; 8] = [-45, -33, -23, -15, -8, 0, 15, 25];
const LOW_DELAY_DEV_THRESH_VBR: [i8; 8] = [-45, -35, -25, -15, -8, 0, 20, 40];
const LOW_DELAY_DEV_THRESH_I: [i8; 8] = [-40, -30, -17, -10, -5, 0, 10, 20];

const INST_RATE_THRESH_P: [i8; 4] = [40, 60, 80, 120];
const INST_RATE_THRESH_B: [i8; 4] = [35, 60, 80, 120];
const INST_RATE_THRESH_I: [i8; 4] = [40, 60, 90, 115];

/// BRC flag of the low delay mode, which overrides the method flag.
const LOW_DELAY_BRC_FLAG: u8 = 5;
const SLIDING_WINDOW_MAX_SIZE: u32 = 60;
const SLIDING_WINDOW_MAX_RATE_RATIO: u8 = 120;

/// Size of one weighted prediction histogram in the BRC data buffer.
const WEIGHT_HIST_SIZE: u16 = 1024;
/// Marks a command the firmware must leave alone.
const START_UNUSED: u16 = 0xFFFF;

const SAD_ZONE_DELTA_QP: [i8; 4] = [-5, -2, 2, 5];
const MV_ZERO_DELTA_QP: i8 = -4;
const MV_ZONE_DELTA_QP: [i8; 3] = [-2, 0, 2];
const SCENE_CHANGE_PREV_INTRA_PCT: u8 = 96;
const SCENE_CHANGE_CUR_INTRA_PCT: u8 = 192;
const LOG2_LCU_SIZE: u8 = 6;

/// Maximum number of slices per picture at a HEVC level, zero when the
/// level is unknown.
pub fn max_allowed_slices(level_idc: u8) -> u16 {
  match level_idc {
    10 | 20 => 16,
    21 => 20,
    30 => 30,
    31 => 40,
    40 | 41 => 75,
    50 | 51 | 52 => 200,
    60 | 61 | 62 => 600,
    _ => 0,
  }
}

/// Firmware value of the rate control method.
///
/// # Errors
///
/// Returns `RateControl` for a method the HEVC BRC does not implement.
pub fn hevc_brc_flag(
  method: RateControlMethod,
) -> Result<u8, InvalidParameter> {
  use RateControlMethod::*;

  match method {
    ICQ | CQP => Ok(0),
    CBR => Ok(1),
    VBR | QVBR => Ok(2),
    VCM => Ok(3),
    AVBR => {
      Err(InvalidParameter::RateControl { codec: CodecKind::HEVC, method })
    }
  }
}

/// Estimates the starting QPs of I/P and B frames from the bits available
/// per pixel, then clamps them into `[min_qp, max_qp]`.
pub fn hevc_init_qp(
  seq: &SequenceParameters, min_qp: u8, max_qp: u8,
) -> (u8, u8) {
  let frame_size = (seq.width as u64 * seq.height as u64 * 3 / 2) as f64;
  let fr = seq.frame_rate;
  let bits_per_pixel = frame_size * 2.0 / 3.0 * fr.num as f64
    / (fr.den as f64 * seq.target_bitrate.max(1) as f64);
  let mut qp_ip =
    (1.0 / 1.2 * 10f64.powf(bits_per_pixel.log10() * (0.56 / 1.75) + 1.19)
      + 0.5) as i32;
  qp_ip += 2;

  let gop = seq.gop_size as i32;
  if gop == 1 {
    qp_ip += 12;
  } else if gop < 15 {
    qp_ip += (14 - gop) >> 1;
  }

  let (lo, hi) = (min_qp as i32, max_qp as i32);
  qp_ip = clamp(qp_ip, lo, hi) - 1;
  if qp_ip < 0 {
    qp_ip = 1;
  }
  let mut qp_b = clamp(((qp_ip + qp_ip) * 563 >> 10) + 1, lo, hi);

  let drop = if gop > 300 { 8 } else { 2 };
  qp_ip -= drop;
  qp_b -= drop;
  (clamp(qp_ip, lo, hi) as u8, clamp(qp_b, lo, hi) as u8)
}

/// BRC init/reset DMEM of the HEVC VDEnc firmware.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HevcBrcInitDmem {
  /// 0 for init, 2 for reset.
  pub brc_func: u32,
  pub user_max_frame: u32,
  pub init_buf_full: u32,
  pub buf_size: u32,
  pub target_bitrate: u32,
  pub max_rate: u32,
  pub min_rate: u32,
  pub frame_rate_m: u32,
  pub frame_rate_d: u32,
  pub luma_log2_weight_denom: u32,
  pub chroma_log2_weight_denom: u32,
  /// Seven bits of method flag.
  pub brc_flag: u8,
  pub slice_size_control: bool,
  pub gop_p: u16,
  pub gop_b: u16,
  pub frame_width: u16,
  pub frame_height: u16,
  pub gop_b1: u16,
  pub gop_b2: u16,
  pub min_qp: u8,
  pub max_qp: u8,
  pub max_brc_level: u8,
  pub luma_bit_depth: u8,
  pub chroma_bit_depth: u8,
  pub cu_qp_ctrl: u8,
  pub dev_thresh: DeviationThresholds,
  pub inst_rate_thresh_p: [i8; 4],
  pub inst_rate_thresh_b: [i8; 4],
  pub inst_rate_thresh_i: [i8; 4],
  pub low_delay_mode: bool,
  pub init_qp_ip: u8,
  pub init_qp_b: u8,
  pub qp_delta_thr_for_adapt_2pass: u8,
  pub top_frame_size_thr_for_adapt_2pass: u8,
  pub bot_frame_size_thr_for_adapt_2pass: u8,
  pub qp_select_for_first_pass: u8,
  pub mb_header_compensation: u8,
  pub overshoot_carry_flag: u8,
  pub overshoot_skip_frame_pct: u8,
  pub est_rate_thresh_p: [u8; 7],
  pub est_rate_thresh_b: [u8; 7],
  pub est_rate_thresh_i: [u8; 7],
  pub qp_p: u8,
  pub stream_in_surface_enable: bool,
  pub stream_in_roi_enable: bool,
  pub timing_budget: u8,
  pub rdoq_adaptation_enable: bool,
  pub rdoq_intra_pct: u8,
  pub rdoq_high_intra_dist_thr: u8,
  pub top_qp_delta_thr_for_adapt_2pass: u8,
  pub bot_qp_delta_thr_for_adapt_2pass: u8,
  pub network_trace: u8,
  pub low_delay_scene_change: u8,
  /// ICQ quality factor under QVBR.
  pub acqp: u32,
  pub sliding_window_size: u32,
  pub sliding_window_max_rate_ratio: u8,
  pub cb_qp_offset: i8,
  pub cr_qp_offset: i8,
  pub profile_level_max_frame_pb: u32,
  pub brc_pyramid: u8,
  pub long_term_ref: u8,
  pub ltr_interval: u16,
}

impl HevcBrcInitDmem {
  /// Fills the DMEM from an initialized session.
  ///
  /// # Errors
  ///
  /// Returns `RateControl` when the method has no HEVC firmware flag.
  pub fn new(
    rc: &RateControlSession, seq: &SequenceParameters, pic: &PictureParameters,
    slice: &SliceParameters,
  ) -> Result<Self, Error> {
    let brc = rc.rc_method().brc_enabled();
    let mut dmem = HevcBrcInitDmem {
      brc_func: match rc.mode() {
        InitMode::Init => 0,
        InitMode::Reset => 2,
      },
      user_max_frame: uncompressed_frame_bytes(seq.width, seq.height),
      init_buf_full: rc.init_buf_fullness_bits() as u32,
      buf_size: rc.buf_size_bits() as u32,
      target_bitrate: bitrate_u32(rc.target_bitrate),
      max_rate: bitrate_u32(rc.max_bitrate()),
      frame_rate_m: rc.frame_rate.num as u32,
      frame_rate_d: rc.frame_rate.den as u32,
      gop_p: seq.gop_size.saturating_sub(seq.num_b_frames + 1) as u16,
      gop_b: seq.num_b_frames as u16,
      frame_width: seq.width as u16,
      frame_height: seq.height as u16,
      min_qp: pic.min_qp.max(10),
      max_qp: if pic.max_qp < 10 {
        HEVC_MAX_QP
      } else {
        pic.max_qp.min(HEVC_MAX_QP)
      },
      max_brc_level: 1,
      luma_bit_depth: if seq.bit_depth == 10 { 10 } else { 8 },
      chroma_bit_depth: if seq.bit_depth == 10 { 10 } else { 8 },
      low_delay_mode: seq.low_delay,
      inst_rate_thresh_p: INST_RATE_THRESH_P,
      inst_rate_thresh_b: INST_RATE_THRESH_B,
      inst_rate_thresh_i: INST_RATE_THRESH_I,
      top_frame_size_thr_for_adapt_2pass: 32,
      bot_frame_size_thr_for_adapt_2pass: 24,
      est_rate_thresh_p: EST_RATE_THRESHOLD,
      est_rate_thresh_b: EST_RATE_THRESHOLD,
      est_rate_thresh_i: EST_RATE_THRESHOLD,
      stream_in_surface_enable: pic.roi_enabled,
      stream_in_roi_enable: pic.roi_enabled,
      top_qp_delta_thr_for_adapt_2pass: 2,
      bot_qp_delta_thr_for_adapt_2pass: 1,
      sliding_window_size: (rc.frame_rate.num / rc.frame_rate.den.max(1))
        .min(SLIDING_WINDOW_MAX_SIZE as u64) as u32,
      sliding_window_max_rate_ratio: SLIDING_WINDOW_MAX_RATE_RATIO,
      ..Default::default()
    };
    dmem.profile_level_max_frame_pb = dmem.user_max_frame;

    if brc {
      dmem.brc_flag = hevc_brc_flag(rc.rc_method())?;
      if rc.rc_method() == RateControlMethod::QVBR {
        dmem.acqp = seq.icq_quality_factor as u32;
      }
      if seq.low_delay {
        dmem.brc_flag = LOW_DELAY_BRC_FLAG;
      }
      dmem.cu_qp_ctrl = if seq.mb_brc == MbBrc::Disabled { 0 } else { 3 };
      let (ip, b) = hevc_init_qp(seq, dmem.min_qp, dmem.max_qp);
      dmem.init_qp_ip = ip;
      dmem.init_qp_b = b;
    } else {
      dmem.cu_qp_ctrl = if seq.qp_adjustment { 3 } else { 0 };
      let qp = clamp(
        pic.qp.saturating_add(slice.slice_qp_delta as i32),
        0,
        HEVC_MAX_QP as i32,
      );
      dmem.init_qp_ip = qp as u8;
      dmem.init_qp_b = qp as u8;
    }

    dmem.dev_thresh = if seq.low_delay {
      DeviationThresholds {
        pb: LOW_DELAY_DEV_THRESH_PB,
        vbr: LOW_DELAY_DEV_THRESH_VBR,
        i: LOW_DELAY_DEV_THRESH_I,
      }
    } else {
      *rc.thresholds()
    };

    Ok(dmem)
  }
}

fn write_i8s(w: &mut PayloadWriter<'_>, values: &[i8]) -> io::Result<()> {
  for &v in values {
    w.write::<i8>(v)?;
  }
  Ok(())
}

impl BrcPayload for HevcBrcInitDmem {
  const SIZE: usize = HEVC_BRC_INIT_DMEM_SIZE;

  fn write_to(&self, w: &mut PayloadWriter<'_>) -> io::Result<()> {
    for dw in [
      self.brc_func,
      self.user_max_frame,
      self.init_buf_full,
      self.buf_size,
      self.target_bitrate,
      self.max_rate,
      self.min_rate,
      self.frame_rate_m,
      self.frame_rate_d,
      self.luma_log2_weight_denom,
      self.chroma_log2_weight_denom,
    ] {
      w.write::<u32>(dw)?;
    }
    let slice_size_control = (self.slice_size_control as u8) << 7;
    w.write::<u8>((self.brc_flag & 0x7f) | slice_size_control)?;
    w.write::<u8>(0)?;
    for hw in [
      self.gop_p,
      self.gop_b,
      self.frame_width,
      self.frame_height,
      self.gop_b1,
      self.gop_b2,
    ] {
      w.write::<u16>(hw)?;
    }
    w.write_bytes(&[
      self.min_qp,
      self.max_qp,
      self.max_brc_level,
      self.luma_bit_depth,
      self.chroma_bit_depth,
      self.cu_qp_ctrl,
    ])?;
    write_zeros(w, 4)?;
    write_i8s(w, &self.dev_thresh.pb)?;
    write_i8s(w, &self.dev_thresh.vbr)?;
    write_i8s(w, &self.dev_thresh.i)?;
    write_i8s(w, &self.inst_rate_thresh_p)?;
    write_i8s(w, &self.inst_rate_thresh_b)?;
    write_i8s(w, &self.inst_rate_thresh_i)?;
    w.write_bytes(&[
      self.low_delay_mode as u8,
      self.init_qp_ip,
      self.init_qp_b,
      self.qp_delta_thr_for_adapt_2pass,
      self.top_frame_size_thr_for_adapt_2pass,
      self.bot_frame_size_thr_for_adapt_2pass,
      self.qp_select_for_first_pass,
      self.mb_header_compensation,
      self.overshoot_carry_flag,
      self.overshoot_skip_frame_pct,
    ])?;
    w.write_bytes(&self.est_rate_thresh_p)?;
    w.write_bytes(&self.est_rate_thresh_b)?;
    w.write_bytes(&self.est_rate_thresh_i)?;
    w.write_bytes(&[
      self.qp_p,
      self.stream_in_surface_enable as u8,
      self.stream_in_roi_enable as u8,
      self.timing_budget,
      self.rdoq_adaptation_enable as u8,
      self.rdoq_intra_pct,
      self.rdoq_high_intra_dist_thr,
      self.top_qp_delta_thr_for_adapt_2pass,
      self.bot_qp_delta_thr_for_adapt_2pass,
      0,
      0,
      self.network_trace,
      self.low_delay_scene_change,
    ])?;
    w.write::<u32>(self.acqp)?;
    w.write::<u32>(self.sliding_window_size)?;
    w.write::<u8>(self.sliding_window_max_rate_ratio)?;
    w.write::<u8>(0)?;
    w.write::<i8>(self.cb_qp_offset)?;
    w.write::<i8>(self.cr_qp_offset)?;
    w.write::<u32>(self.profile_level_max_frame_pb)?;
    w.write::<u8>(self.brc_pyramid)?;
    w.write::<u8>(self.long_term_ref)?;
    w.write::<u16>(self.ltr_interval)?;
    write_zeros(w, 6 * 4)
  }
}

/// Where the generated commands sit in the second level batch that the
/// BRC update firmware patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlbLayout {
  pub cmd1_start: u16,
  pub cmd2_start: u16,
  pub pic_state_start: u16,
  pub size: u16,
}

impl SlbLayout {
  /// Layout written by the command initializer of a generation.
  pub fn hevc(profile: &dyn FirmwareLayoutProfile, brc_enabled: bool) -> Self {
    let pic_state = profile.cmd5_offset(brc_enabled);
    let commands = 2 + pic_state.is_some() as u32;
    SlbLayout {
      cmd1_start: profile.cmd1_offset(brc_enabled),
      cmd2_start: profile.cmd2_offset(brc_enabled),
      pic_state_start: pic_state.unwrap_or(START_UNUSED),
      size: (commands * MAX_CMD_SIZE) as u16,
    }
  }
}

/// BRC update DMEM of the HEVC VDEnc firmware, one per pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HevcBrcUpdateDmem {
  pub target_size: u32,
  pub frame_id: u32,
  pub ref_l0: [u32; 8],
  pub ref_l1: [u32; 8],
  pub start_global_adjust_frame: [u16; 4],
  pub target_slice_size: u16,
  pub slb_data_size: u16,
  pub pic_state_start: u16,
  pub cmd2_start: u16,
  pub cmd1_start: u16,
  pub pipe_mode_select_start: u16,
  pub current_data_offset: u16,
  pub ref_data_offset: [u16; 3],
  pub max_num_slice_allowed: u16,
  /// 1 for BRC, 3 for BRC with weighted prediction.
  pub op_mode: u8,
  pub current_frame_type: u8,
  pub num_ref_l0: u8,
  pub num_ref_l1: u8,
  pub num_slices: u8,
  pub cqp_qp: u8,
  pub cqp_frac_qp: u8,
  pub max_num_pass: u8,
  pub rate_ratio_threshold: [u8; 7],
  pub start_global_adjust_mult: [u8; 5],
  pub start_global_adjust_div: [u8; 5],
  pub rate_ratio_threshold_qp: [i8; 8],
  pub scene_change_prev_intra_pct: u8,
  pub scene_change_cur_intra_pct: u8,
  pub ip_average_coeff: u8,
  pub current_pass: u8,
  pub delta_qp_mv_zero: i8,
  pub delta_qp_mv_zone: [i8; 3],
  pub delta_qp_sad_zone: [i8; 4],
  pub delta_qp_roi: [i8; 4],
  pub luma_log2_weight_denom: i8,
  pub chroma_log2_weight_denom: i8,
  pub disabled_feature: u8,
  pub sliding_window_enable: bool,
  pub log2_lcu_size: u8,
  pub rdoq_enable: bool,
  pub network_trace_entry: u16,
  pub low_delay_scene_change: u16,
  pub reencode_positive_qp_delta_thr: i8,
  pub reencode_negative_qp_delta_thr: i8,
  pub num_frame_skipped: u32,
  pub skip_frame_size: u32,
  pub slice_header_size: u32,
  pub enable_motion_adaptive: i8,
}

impl HevcBrcUpdateDmem {
  /// Fills the DMEM for the current pass of the session.
  ///
  /// `frame_id` counts frames from 1 and selects the rotating histogram
  /// offsets.
  pub fn new(
    rc: &RateControlSession, seq: &SequenceParameters, pic: &PictureParameters,
    slice: &SliceParameters, frame_id: u32, layout: SlbLayout,
  ) -> Self {
    let brc = rc.rc_method().brc_enabled();
    let circular = (frame_id.saturating_sub(1) % 4) as u16;
    let rotate = |start: u16| ((start + circular) % 4) * WEIGHT_HIST_SIZE;

    let mut rate_ratio_threshold = [0; 7];
    rate_ratio_threshold[..6].copy_from_slice(&RATE_RATIO_THRESHOLD);
    let mut rate_ratio_threshold_qp = [0; 8];
    rate_ratio_threshold_qp[..7].copy_from_slice(&RATE_RATIO_THRESHOLD_QP);

    let mut dmem = HevcBrcUpdateDmem {
      target_size: rc.init_buf_fullness_bits() as u32,
      frame_id,
      start_global_adjust_frame: START_GLOBAL_ADJUST_FRAME.map(|f| f as u16),
      slb_data_size: layout.size,
      pic_state_start: layout.pic_state_start,
      cmd2_start: layout.cmd2_start,
      cmd1_start: layout.cmd1_start,
      pipe_mode_select_start: START_UNUSED,
      current_data_offset: rotate(0),
      ref_data_offset: [rotate(3), rotate(2), rotate(1)],
      max_num_slice_allowed: max_allowed_slices(seq.level_idc),
      op_mode: 1,
      current_frame_type: if pic.frame_type.is_intra() { 2 } else { 0 },
      num_ref_l0: slice.num_ref_idx_l0_active_minus1 + 1,
      num_ref_l1: slice.num_ref_idx_l1_active_minus1 + 1,
      num_slices: pic.num_slices,
      cqp_qp: clamp(
        pic.qp.saturating_add(slice.slice_qp_delta as i32),
        0,
        HEVC_MAX_QP as i32,
      ) as u8,
      max_num_pass: if seq.brc_precision == 1 {
        1
      } else {
        rc.max_passes() as u8
      },
      rate_ratio_threshold,
      start_global_adjust_mult: START_GLOBAL_ADJUST_MULT,
      start_global_adjust_div: START_GLOBAL_ADJUST_DIV,
      rate_ratio_threshold_qp,
      scene_change_prev_intra_pct: SCENE_CHANGE_PREV_INTRA_PCT,
      scene_change_cur_intra_pct: SCENE_CHANGE_CUR_INTRA_PCT,
      ip_average_coeff: if seq.low_delay { 0 } else { 64 },
      current_pass: rc.current_pass() as u8,
      sliding_window_enable: seq.sliding_window,
      log2_lcu_size: LOG2_LCU_SIZE,
      reencode_positive_qp_delta_thr: REENCODE_QP_DELTA_UP as i8,
      reencode_negative_qp_delta_thr: REENCODE_QP_DELTA_DOWN as i8,
      ..Default::default()
    };

    let zones = (!brc && seq.qp_adjustment)
      || (brc && seq.mb_brc != MbBrc::Disabled);
    if zones {
      dmem.delta_qp_sad_zone = SAD_ZONE_DELTA_QP;
      dmem.delta_qp_mv_zero = MV_ZERO_DELTA_QP;
      dmem.delta_qp_mv_zone = MV_ZONE_DELTA_QP;
    }
    if pic.roi_enabled {
      dmem.delta_qp_roi.copy_from_slice(&pic.roi_delta_qp[..4]);
    }
    dmem
  }
}

impl BrcPayload for HevcBrcUpdateDmem {
  const SIZE: usize = HEVC_BRC_UPDATE_DMEM_SIZE;

  fn write_to(&self, w: &mut PayloadWriter<'_>) -> io::Result<()> {
    w.write::<u32>(self.target_size)?;
    w.write::<u32>(self.frame_id)?;
    for &r in self.ref_l0.iter().chain(&self.ref_l1) {
      w.write::<u32>(r)?;
    }
    for &f in self.start_global_adjust_frame.iter() {
      w.write::<u16>(f)?;
    }
    for hw in [
      self.target_slice_size,
      self.slb_data_size,
      self.pic_state_start,
      self.cmd2_start,
      self.cmd1_start,
      self.pipe_mode_select_start,
      self.current_data_offset,
    ] {
      w.write::<u16>(hw)?;
    }
    for &o in self.ref_data_offset.iter() {
      w.write::<u16>(o)?;
    }
    w.write::<u16>(self.max_num_slice_allowed)?;
    w.write_bytes(&[
      self.op_mode,
      self.current_frame_type,
      self.num_ref_l0,
      self.num_ref_l1,
      self.num_slices,
      self.cqp_qp,
      self.cqp_frac_qp,
      self.max_num_pass,
    ])?;
    w.write_bytes(&self.rate_ratio_threshold)?;
    w.write_bytes(&self.start_global_adjust_mult)?;
    w.write_bytes(&self.start_global_adjust_div)?;
    write_i8s(w, &self.rate_ratio_threshold_qp)?;
    w.write_bytes(&[
      self.scene_change_prev_intra_pct,
      self.scene_change_cur_intra_pct,
      self.ip_average_coeff,
      self.current_pass,
    ])?;
    w.write::<i8>(self.delta_qp_mv_zero)?;
    write_i8s(w, &self.delta_qp_mv_zone)?;
    write_i8s(w, &self.delta_qp_sad_zone)?;
    write_i8s(w, &self.delta_qp_roi)?;
    w.write::<i8>(self.luma_log2_weight_denom)?;
    w.write::<i8>(self.chroma_log2_weight_denom)?;
    w.write_bytes(&[
      self.disabled_feature,
      self.sliding_window_enable as u8,
      self.log2_lcu_size,
      self.rdoq_enable as u8,
      0,
    ])?;
    w.write::<u16>(self.network_trace_entry)?;
    w.write::<u16>(self.low_delay_scene_change)?;
    w.write::<i8>(self.reencode_positive_qp_delta_thr)?;
    w.write::<i8>(self.reencode_negative_qp_delta_thr)?;
    w.write::<u32>(self.num_frame_skipped)?;
    w.write::<u32>(self.skip_frame_size)?;
    w.write::<u32>(self.slice_header_size)?;
    w.write::<i8>(self.enable_motion_adaptive)?;
    write_zeros(w, 15)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::config::{Generation, SessionConfig};
  use crate::huc::layout_profile;
  use interpolate_name::interpolate_test;
  use nom::number::complete::{le_i8, le_u16, le_u32, le_u8};
  use nom::sequence::tuple;
  use pretty_assertions::assert_eq;

  fn seq() -> SequenceParameters {
    SequenceParameters::new(1920, 1080)
      .with_bitrate(4_000_000, 4_000_000)
      .with_gop(30, 0)
  }

  fn session(
    seq: &SequenceParameters, pic: &PictureParameters,
  ) -> RateControlSession {
    let config = SessionConfig::new(Generation::G11, CodecKind::HEVC);
    RateControlSession::init_or_reset(seq, pic, InitMode::Init, &config)
      .unwrap()
  }

  #[test]
  fn init_qp_estimate() {
    assert_eq!(hevc_init_qp(&seq(), 10, 51), (30, 34));
    let intra_only = seq().with_gop(1, 0);
    let (ip, _) = hevc_init_qp(&intra_only, 10, 51);
    assert!(ip > 30);
    assert_eq!(hevc_init_qp(&seq(), 36, 40), (36, 37));
  }

  #[test]
  fn init_layout() {
    let seq = seq();
    let pic = PictureParameters::new(FrameType::I, 30);
    let rc = session(&seq, &pic);
    let dmem =
      HevcBrcInitDmem::new(&rc, &seq, &pic, &SliceParameters::default())
        .unwrap();
    let bytes = dmem.to_bytes().unwrap();
    assert_eq!(bytes.len(), HEVC_BRC_INIT_DMEM_SIZE);

    let (_, (func, max_frame, init_full, buf, target, max)) = tuple((
      le_u32::<_, ()>,
      le_u32,
      le_u32,
      le_u32,
      le_u32,
      le_u32,
    ))(&bytes[..])
    .unwrap();
    assert_eq!(func, 0);
    assert_eq!(max_frame, 3_110_400);
    assert_eq!(buf, rc.buf_size_bits() as u32);
    assert_eq!(init_full, rc.init_buf_fullness_bits() as u32);
    assert_eq!((target, max), (4_000_000, 4_000_000));

    assert_eq!(bytes[44], 1);
    let (_, (gop_p, gop_b, w, h)) =
      tuple((le_u16::<_, ()>, le_u16, le_u16, le_u16))(&bytes[46..]).unwrap();
    assert_eq!((gop_p, gop_b, w, h), (29, 0, 1920, 1080));
    assert_eq!(&bytes[58..64], &[10, 51, 1, 8, 8, 3]);
    assert_eq!(&bytes[92..96], &[40, 60, 80, 120]);
    assert_eq!(&bytes[105..107], &[30, 34]);
    assert_eq!(&bytes[114..121], &EST_RATE_THRESHOLD);
    assert_eq!(&bytes[142..144], &[2, 1]);
    let (_, (acqp, window, ratio)) =
      tuple((le_u32::<_, ()>, le_u32, le_u8))(&bytes[148..]).unwrap();
    assert_eq!((acqp, window, ratio), (0, 30, 120));
  }

  #[test]
  fn low_delay_tables() {
    let seq = seq().with_low_delay(true);
    let pic = PictureParameters::new(FrameType::P, 30);
    let rc = session(&seq, &pic);
    let dmem =
      HevcBrcInitDmem::new(&rc, &seq, &pic, &SliceParameters::default())
        .unwrap();
    assert_eq!(dmem.brc_flag, LOW_DELAY_BRC_FLAG);
    let bytes = dmem.to_bytes().unwrap();
    let (_, first) = le_i8::<_, ()>(&bytes[68..]).unwrap();
    assert_eq!(first, -45);
    assert_eq!(bytes[104], 1);
    assert_eq!(bytes[84] as i8, -40);
  }

  #[test]
  fn cqp_uses_frame_qp() {
    let seq = seq()
      .with_rc_method(RateControlMethod::CQP)
      .with_mb_brc(MbBrc::Disabled);
    let pic = PictureParameters::new(FrameType::I, 27);
    let rc = session(&seq, &pic);
    let slice = SliceParameters::new(SliceType::I).with_qp_delta(-2);
    let dmem = HevcBrcInitDmem::new(&rc, &seq, &pic, &slice).unwrap();
    assert_eq!((dmem.init_qp_ip, dmem.init_qp_b), (25, 25));
    assert_eq!(dmem.brc_flag, 0);
    assert_eq!(dmem.cu_qp_ctrl, 0);
  }

  #[test]
  fn avbr_is_rejected() {
    assert_eq!(
      hevc_brc_flag(RateControlMethod::AVBR),
      Err(InvalidParameter::RateControl {
        codec: CodecKind::HEVC,
        method: RateControlMethod::AVBR
      })
    );
    assert_eq!(hevc_brc_flag(RateControlMethod::QVBR), Ok(2));
  }

  #[interpolate_test(first, 1, 0, 3072, 2048, 1024)]
  #[interpolate_test(second, 2, 1024, 0, 3072, 2048)]
  #[interpolate_test(fifth, 5, 0, 3072, 2048, 1024)]
  fn rotating_offsets(frame_id: u32, current: u16, r0: u16, r1: u16, r2: u16) {
    let seq = seq();
    let pic = PictureParameters::new(FrameType::P, 30);
    let rc = session(&seq, &pic);
    let layout = SlbLayout::hevc(layout_profile(Generation::G11), true);
    let dmem = HevcBrcUpdateDmem::new(
      &rc,
      &seq,
      &pic,
      &SliceParameters::new(SliceType::P),
      frame_id,
      layout,
    );
    assert_eq!(dmem.current_data_offset, current);
    assert_eq!(dmem.ref_data_offset, [r0, r1, r2]);
  }

  #[test]
  fn update_layout() {
    let seq = seq().with_mb_brc(MbBrc::Enabled);
    let pic = PictureParameters::new(FrameType::I, 30);
    let rc = session(&seq, &pic);
    let layout = SlbLayout::hevc(layout_profile(Generation::G11), true);
    assert_eq!(layout.size, 768);
    let slice = SliceParameters::new(SliceType::I).with_refs([0; 4], 1, 0);
    let dmem = HevcBrcUpdateDmem::new(&rc, &seq, &pic, &slice, 1, layout);
    let bytes = dmem.to_bytes().unwrap();
    assert_eq!(bytes.len(), HEVC_BRC_UPDATE_DMEM_SIZE);

    let (_, (a, b, c, d)) =
      tuple((le_u16::<_, ()>, le_u16, le_u16, le_u16))(&bytes[72..]).unwrap();
    assert_eq!((a, b, c, d), (10, 50, 100, 150));
    let (_, (slb, pic_state, cmd2, cmd1, pipe)) =
      tuple((le_u16::<_, ()>, le_u16, le_u16, le_u16, le_u16))(&bytes[82..])
        .unwrap();
    assert_eq!((slb, pic_state, cmd2, cmd1, pipe), (768, 156, 308, 36, 0xFFFF));
    let (_, max_slices) = le_u16::<_, ()>(&bytes[100..]).unwrap();
    assert_eq!(max_slices, 200);
    assert_eq!(&bytes[102..110], &[1, 2, 2, 1, 1, 30, 0, 2]);
    assert_eq!(&bytes[110..117], &[40, 75, 97, 103, 125, 160, 0]);
    assert_eq!(&bytes[117..122], &[1, 1, 3, 2, 1]);
    assert_eq!(&bytes[122..127], &[40, 5, 5, 3, 1]);
    assert_eq!(&bytes[127..135], &[253, 254, 255, 0, 1, 2, 3, 0]);
    assert_eq!(&bytes[135..139], &[96, 192, 64, 0]);
    assert_eq!(bytes[139] as i8, -4);
    assert_eq!(&bytes[143..147], &[(-5i8) as u8, (-2i8) as u8, 2, 5]);
    assert_eq!(bytes[155], 6);
    assert_eq!((bytes[162] as i8, bytes[163] as i8), (4, -5));
    assert!(bytes[177..].iter().all(|&b| b == 0));
  }

  #[test]
  fn zones_off_without_mb_brc() {
    let seq = seq().with_mb_brc(MbBrc::Disabled);
    let pic = PictureParameters::new(FrameType::P, 30);
    let rc = session(&seq, &pic);
    let layout = SlbLayout::hevc(layout_profile(Generation::G10), true);
    assert_eq!(layout.pic_state_start, 0xFFFF);
    let dmem = HevcBrcUpdateDmem::new(
      &rc,
      &seq,
      &pic,
      &SliceParameters::new(SliceType::P),
      3,
      layout,
    );
    assert_eq!(dmem.delta_qp_sad_zone, [0; 4]);
    assert_eq!(dmem.current_frame_type, 0);
  }
}
