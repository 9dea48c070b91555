// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use arrayvec::ArrayVec;
use itertools::izip;
use std::io;

use super::*;
use crate::error::{lookup, InvalidParameter};
use crate::params::*;
use crate::rate::*;
use crate::tables::{VP8_MAINREF, VP8_QUANT_DC};
use crate::util::{clamp, pack_dword, pack_i8x4, write_dwords};

pub const VP8_BRC_INIT_CURBE_DWORDS: usize = 28;
pub const VP8_BRC_UPDATE_CURBE_DWORDS: usize = 35;

const BRC_FLAG_CBR: u32 = 0x10;
const BRC_FLAG_VBR: u32 = 0x20;

/// Binding table indices of the update kernel surfaces, history first.
const UPDATE_SURFACE_BTI: [u32; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];
const INIT_HISTORY_BTI: u32 = 0;
const INIT_DISTORTION_BTI: u32 = 1;

/// Target usage that runs the kernels in performance mode.
const PERFORMANCE_TARGET_USAGE: u8 = 7;

/// Max level ratios of the VP8 kernels, from frames per 100 seconds.
///
/// Each layer gets its share of 64 of the stream bitrate, then the share is
/// spread over the frames the layer contributes to one base period.
///
/// # Errors
///
/// Returns `FrameRate` when a layer frame rate rounds to zero or two layers
/// contribute the same frames.
pub fn vp8_max_level_ratios(
  layers: &[TemporalLayer],
) -> Result<ArrayVec<u8, MAX_TEMPORAL_LAYERS>, InvalidParameter> {
  use InvalidParameter::*;

  if layers.len() <= 1 || layers.len() > MAX_TEMPORAL_LAYERS {
    return Err(TemporalLayers { actual: layers.len(), max: MAX_TEMPORAL_LAYERS });
  }
  let top = layers.len() - 1;
  let fps: ArrayVec<u64, MAX_TEMPORAL_LAYERS> =
    layers.iter().map(|l| l.frame_rate.per_100_sec()).collect();
  for (l, &f) in layers.iter().zip(&fps) {
    if f == 0 {
      return Err(FrameRate { num: l.frame_rate.num, den: l.frame_rate.den });
    }
  }
  let top_bitrate = layers[top].bitrate;
  if top_bitrate == 0 {
    return Err(TemporalBitrate { layer: top, bitrate: 0 });
  }

  let steps: ArrayVec<u64, MAX_TEMPORAL_LAYERS> =
    fps.iter().map(|&f| (fps[top] / f).max(1)).collect();
  let frames: ArrayVec<u64, MAX_TEMPORAL_LAYERS> = steps
    .iter()
    .map(|&s| (0..steps[0]).filter(|t| t % s == 0).count() as u64)
    .collect();

  let mut shares = [0u64; MAX_TEMPORAL_LAYERS];
  shares[0] = layers[0].bitrate * 64 / top_bitrate;
  let mut acc = shares[0];
  for i in 1..top {
    shares[i] =
      layers[i].bitrate.saturating_sub(layers[i - 1].bitrate) * 64 / top_bitrate;
    acc += shares[i];
  }
  shares[top] = 64u64.saturating_sub(acc);

  let mut ratios = ArrayVec::new();
  for i in 0..=top {
    let level_frames = if i == 0 {
      frames[0]
    } else {
      frames[i].saturating_sub(frames[i - 1])
    };
    if level_frames == 0 {
      let fr = layers[i].frame_rate;
      return Err(FrameRate { num: fr.num, den: fr.den });
    }
    let ratio = steps[0] * shares[i] / level_frames;
    ratios.push(ratio.min(u8::MAX as u64) as u8);
  }
  Ok(ratios)
}

/// CURBE of the VP8 BRC init/reset kernel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vp8BrcInitCurbe {
  pub profile_level_max_frame: u32,
  pub init_buf_full_in_bits: u32,
  pub buf_size_in_bits: u32,
  pub average_bitrate: u32,
  pub max_bitrate: u32,
  pub min_bitrate: u32,
  /// Frames per 100 seconds.
  pub frame_rate_m: u32,
  pub frame_rate_d: u32,
  pub brc_flag: u32,
  pub gop_p: u32,
  pub frame_width: u32,
  pub frame_height: u32,
  pub avbr_accuracy: u32,
  pub avbr_convergence: u32,
  pub min_qp: u32,
  pub max_qp: u32,
  pub level_qp: u32,
  pub max_section_pct: u32,
  pub overshoot_cbr_pct: u32,
  pub vbr_bias_pct: u32,
  pub min_section_pct: u32,
  pub inst_rate_thresh_p: [i8; 4],
  pub inst_rate_thresh_i: [i8; 4],
  pub dev_thresh: DeviationThresholds,
  pub num_t_levels: u32,
  pub max_level_ratio: [u8; 4],
}

impl Vp8BrcInitCurbe {
  /// # Errors
  ///
  /// Returns the temporal layer errors of [`vp8_max_level_ratios`].
  pub fn new(
    rc: &RateControlSession, seq: &SequenceParameters, pic: &PictureParameters,
  ) -> Result<Self, Error> {
    let mut curbe = Vp8BrcInitCurbe {
      profile_level_max_frame: seq.width.saturating_mul(seq.height),
      init_buf_full_in_bits: rc.init_buf_fullness_bits() as u32,
      buf_size_in_bits: rc.buf_size_bits() as u32,
      average_bitrate: bitrate_u32(rc.target_bitrate),
      max_bitrate: bitrate_u32(rc.max_bitrate()),
      min_bitrate: bitrate_u32(rc.min_bitrate),
      frame_rate_m: seq.top_layer_frame_rate().per_100_sec() as u32,
      frame_rate_d: 100,
      brc_flag: match rc.rc_method() {
        RateControlMethod::CBR => BRC_FLAG_CBR,
        RateControlMethod::VBR => BRC_FLAG_VBR,
        _ => 0,
      },
      gop_p: seq.gop_size.saturating_sub(1),
      frame_width: seq.width,
      frame_height: seq.height,
      avbr_accuracy: 30,
      avbr_convergence: 150,
      min_qp: pic.vp8.clamp_qindex_low as u32,
      max_qp: pic.vp8.clamp_qindex_high as u32,
      level_qp: 60,
      max_section_pct: 100,
      overshoot_cbr_pct: 115,
      vbr_bias_pct: 100,
      min_section_pct: 100,
      inst_rate_thresh_p: [30, 50, 70, 120],
      inst_rate_thresh_i: [30, 50, 90, 115],
      dev_thresh: *rc.thresholds(),
      num_t_levels: seq.num_temporal_layers() as u32,
      max_level_ratio: [0; 4],
    };
    if seq.temporal_layers.len() > 1 {
      let ratios = vp8_max_level_ratios(&seq.temporal_layers)?;
      curbe.max_level_ratio[..ratios.len()].copy_from_slice(&ratios);
    }
    Ok(curbe)
  }

  fn dwords(&self) -> [u32; VP8_BRC_INIT_CURBE_DWORDS] {
    let dev = |t: &[i8; 8]| {
      [pack_i8x4([t[0], t[1], t[2], t[3]]), pack_i8x4([t[4], t[5], t[6], t[7]])]
    };
    let [pb0, pb1] = dev(&self.dev_thresh.pb);
    let [vbr0, vbr1] = dev(&self.dev_thresh.vbr);
    let [i0, i1] = dev(&self.dev_thresh.i);
    let r = self.max_level_ratio.map(u32::from);
    [
      self.profile_level_max_frame,
      self.init_buf_full_in_bits,
      self.buf_size_in_bits,
      self.average_bitrate,
      self.max_bitrate,
      self.min_bitrate,
      self.frame_rate_m,
      self.frame_rate_d,
      pack_dword(&[(self.brc_flag, 16), (self.gop_p, 16)]),
      pack_dword(&[(0, 16), (self.frame_width, 16)]),
      pack_dword(&[(self.frame_height, 16), (self.avbr_accuracy, 16)]),
      pack_dword(&[(self.avbr_convergence, 16), (self.min_qp, 16)]),
      pack_dword(&[(self.max_qp, 16), (self.level_qp, 16)]),
      pack_dword(&[(self.max_section_pct, 16), (self.overshoot_cbr_pct, 16)]),
      pack_dword(&[(self.vbr_bias_pct, 16), (self.min_section_pct, 16)]),
      pack_i8x4(self.inst_rate_thresh_p),
      0,
      pack_i8x4(self.inst_rate_thresh_i),
      pb0,
      pb1,
      vbr0,
      vbr1,
      i0,
      i1,
      pack_dword(&[(self.num_t_levels, 8), (r[0], 8), (r[1], 8), (r[2], 8)]),
      r[3],
      INIT_HISTORY_BTI,
      INIT_DISTORTION_BTI,
    ]
  }
}

impl BrcPayload for Vp8BrcInitCurbe {
  const SIZE: usize = VP8_BRC_INIT_CURBE_DWORDS * 4;

  fn write_to(&self, w: &mut PayloadWriter<'_>) -> io::Result<()> {
    write_dwords(w, &self.dwords())
  }
}

/// Main reference and reference flags of a P frame.
///
/// With temporal layers the order comes from the first and second
/// reference of the picture, otherwise from the fixed ordering table.
pub fn vp8_main_ref(
  pic: &PictureParameters, num_temporal_layers: usize,
) -> Result<(u8, u8), Error> {
  let ctrl = pic.vp8.ref_frame_ctrl;
  if num_temporal_layers <= 1 {
    let main_ref = lookup("VP8 main reference", &VP8_MAINREF, ctrl as i64)?;
    return Ok((main_ref, ctrl));
  }

  let first = pic.vp8.first_ref as i64;
  let second = pic.vp8.second_ref as i64;
  let order = [6 - first - second, second, first];
  let mut main_ref = 0u32;
  let mut k = 0;
  for &r in order.iter() {
    if !(1..=3).contains(&r) {
      return Err(Error::IndexOutOfRange {
        table: "VP8 reference order",
        index: r,
        len: 3,
      });
    }
    if ctrl & (1 << (r - 1)) != 0 {
      main_ref |= (r as u32) << (2 * k);
      k += 1;
    }
  }
  Ok((main_ref as u8, ctrl))
}

/// CURBE of the VP8 BRC update kernel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vp8BrcUpdateCurbe {
  pub target_size: u32,
  pub frame_number: u32,
  pub picture_header_size: u32,
  pub start_global_adjust_frame: [u32; 4],
  pub target_size_flag: bool,
  pub brc_flag: u32,
  pub max_num_paks: u32,
  pub curr_frame_type: u32,
  pub tid: u32,
  pub num_t_levels: u32,
  pub frame_width_in_mb: u32,
  pub frame_height_in_mb: u32,
  pub qindex: [u8; 4],
  pub qindex_delta: [i8; 5],
  pub main_ref: u8,
  pub ref_frame_flags: u8,
  pub segmentation_on: bool,
  pub mb_rc: bool,
  pub brc_method: u32,
  pub vme_intra_prediction: bool,
}

impl Vp8BrcUpdateCurbe {
  /// `fullness` is the frame target from
  /// [`RateControlSession::advance_target_fullness`].
  ///
  /// # Errors
  ///
  /// Returns `IndexOutOfRange` for a reference control outside of the
  /// ordering table or a reference order outside of 1..=3.
  pub fn new(
    rc: &RateControlSession, seq: &SequenceParameters, pic: &PictureParameters,
    fullness: (u32, bool),
  ) -> Result<Self, Error> {
    let (main_ref, ref_frame_flags) = if pic.frame_type == FrameType::P {
      vp8_main_ref(pic, seq.num_temporal_layers())?
    } else {
      (0, 0)
    };
    Ok(Vp8BrcUpdateCurbe {
      target_size: fullness.0,
      frame_number: rc.frame_count(),
      picture_header_size: 0,
      start_global_adjust_frame: START_GLOBAL_ADJUST_FRAME,
      target_size_flag: fullness.1,
      brc_flag: 16 * rc.rc_method() as u32,
      max_num_paks: rc.max_passes() as u32,
      curr_frame_type: if pic.frame_type.is_intra() { 2 } else { 0 },
      tid: pic.temporal_id as u32,
      num_t_levels: seq.num_temporal_layers() as u32,
      frame_width_in_mb: (seq.width + 15) / 16,
      frame_height_in_mb: (seq.height + 15) / 16,
      qindex: pic.vp8.qindex,
      qindex_delta: pic.vp8.qindex_delta,
      main_ref,
      ref_frame_flags,
      segmentation_on: pic.vp8.segmentation_enabled,
      mb_rc: seq.mb_brc == MbBrc::Enabled,
      brc_method: rc.rc_method() as u32,
      vme_intra_prediction: seq.target_usage == PERFORMANCE_TARGET_USAGE,
    })
  }

  fn dwords(&self) -> [u32; VP8_BRC_UPDATE_CURBE_DWORDS] {
    let mult = START_GLOBAL_ADJUST_MULT.map(u32::from);
    let div = START_GLOBAL_ADJUST_DIV.map(u32::from);
    let rr = RATE_RATIO_THRESHOLD.map(u32::from);
    let rrqp = RATE_RATIO_THRESHOLD_QP;
    let g = self.start_global_adjust_frame;
    let q = u32::from_le_bytes(self.qindex);
    let d = self.qindex_delta;

    let mut dw = [0u32; VP8_BRC_UPDATE_CURBE_DWORDS];
    dw[0] = self.target_size;
    dw[1] = self.frame_number;
    dw[2] = self.picture_header_size;
    dw[3] = pack_dword(&[(g[0], 16), (g[1], 16)]);
    dw[4] = pack_dword(&[(g[2], 16), (g[3], 16)]);
    dw[5] = pack_dword(&[
      (self.target_size_flag as u32, 8),
      (self.brc_flag, 8),
      (self.max_num_paks, 8),
      (self.curr_frame_type, 8),
    ]);
    dw[6] = pack_dword(&[(self.tid, 8), (self.num_t_levels, 8)]);
    dw[8] = pack_dword(&[(mult[0], 8), (mult[1], 8), (mult[2], 8), (mult[3], 8)]);
    dw[9] = pack_dword(&[(mult[4], 8), (div[0], 8), (div[1], 8), (div[2], 8)]);
    dw[10] = pack_dword(&[(div[3], 8), (div[4], 8), (20, 8), (40, 8)]);
    dw[11] = pack_dword(&[(60, 8), (90, 8), (rr[0], 8), (rr[1], 8)]);
    dw[12] = pack_dword(&[(rr[2], 8), (rr[3], 8), (rr[4], 8), (rr[5], 8)]);
    dw[13] = pack_i8x4([rrqp[0], rrqp[1], rrqp[2], rrqp[3]]);
    dw[14] = pack_i8x4([rrqp[4], rrqp[5], rrqp[6], 0]);
    dw[15] = pack_dword(&[
      (self.frame_width_in_mb, 16),
      (self.frame_height_in_mb, 16),
    ]);
    dw[16] = q;
    dw[17] = q;
    dw[18] = pack_i8x4([d[0], d[1], d[2], d[3]]);
    dw[19] = pack_dword(&[
      (d[4] as u8 as u32, 8),
      (0, 8),
      (self.main_ref as u32, 8),
      (self.ref_frame_flags as u32, 8),
    ]);
    dw[20] = pack_dword(&[
      (self.segmentation_on as u32, 8),
      (self.mb_rc as u32, 8),
      (self.brc_method, 8),
      (self.vme_intra_prediction as u32, 8),
    ]);
    dw[22..].copy_from_slice(&UPDATE_SURFACE_BTI);
    dw
  }
}

impl BrcPayload for Vp8BrcUpdateCurbe {
  const SIZE: usize = VP8_BRC_UPDATE_CURBE_DWORDS * 4;

  fn write_to(&self, w: &mut PayloadWriter<'_>) -> io::Result<()> {
    write_dwords(w, &self.dwords())
  }
}

/// Per segment lambdas of the MB encode kernel, from the squared DC
/// quantizer of each segment. Only segment 0 is filled when segmentation
/// is off.
pub fn vp8_segment_lambdas(pic: &PictureParameters) -> Result<[u32; 4], Error> {
  let segments = if pic.vp8.segmentation_enabled { 4 } else { 1 };
  let delta = pic.vp8.qindex_delta[0] as i32;
  let mut lambdas = [0u32; 4];
  for (lambda, &q) in izip!(&mut lambdas, &pic.vp8.qindex).take(segments) {
    let index = clamp(q as i32 + delta, 0, VP8_MAX_QINDEX as i32);
    let dc = lookup("VP8 DC quantizer", &VP8_QUANT_DC, index as i64)? as u32;
    *lambda = dc * dc / 4;
  }
  Ok(lambdas)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::config::{Generation, SessionConfig};
  use interpolate_name::interpolate_test;
  use nom::multi::count;
  use nom::number::complete::le_u32;
  use pretty_assertions::assert_eq;

  fn layer(kbps: u64, fps: u64) -> TemporalLayer {
    TemporalLayer {
      bitrate: kbps * BRC_KBPS,
      frame_rate: Rational::new(fps, 1),
    }
  }

  fn session(seq: &SequenceParameters) -> RateControlSession {
    let config = SessionConfig::new(Generation::G11, CodecKind::VP8);
    let pic = PictureParameters::new(FrameType::I, 60);
    RateControlSession::init_or_reset(seq, &pic, InitMode::Init, &config)
      .unwrap()
  }

  fn parse(bytes: &[u8], n: usize) -> Vec<u32> {
    let (rest, dwords) = count(le_u32::<_, ()>, n)(bytes).unwrap();
    assert!(rest.is_empty());
    dwords
  }

  #[test]
  fn level_ratios() {
    let two = [layer(1000, 15), layer(2000, 30)];
    assert_eq!(&vp8_max_level_ratios(&two).unwrap()[..], &[64, 64]);
    let three = [
      TemporalLayer {
        bitrate: 1_000_000,
        frame_rate: Rational::new(15, 2),
      },
      layer(1500, 15),
      layer(3000, 30),
    ];
    assert_eq!(&vp8_max_level_ratios(&three).unwrap()[..], &[84, 40, 66]);
  }

  #[test]
  fn level_ratio_errors() {
    assert!(vp8_max_level_ratios(&[layer(1000, 30)]).is_err());
    let same = [layer(1000, 30), layer(2000, 30)];
    assert!(matches!(
      vp8_max_level_ratios(&same),
      Err(InvalidParameter::FrameRate { num: 30, den: 1 })
    ));
    let zero = [
      TemporalLayer { bitrate: 1, frame_rate: Rational::new(0, 1) },
      layer(2000, 30),
    ];
    assert!(vp8_max_level_ratios(&zero).is_err());
  }

  #[test]
  fn init_layout() {
    let seq = SequenceParameters::new(640, 480)
      .with_rc_method(RateControlMethod::VBR)
      .with_bitrate(1_000_000, 500_000);
    let rc = session(&seq);
    let mut pic = PictureParameters::new(FrameType::I, 60);
    pic.vp8.clamp_qindex_low = 4;
    pic.vp8.clamp_qindex_high = 120;
    let curbe = Vp8BrcInitCurbe::new(&rc, &seq, &pic).unwrap();
    let dw = parse(&curbe.to_bytes().unwrap(), VP8_BRC_INIT_CURBE_DWORDS);

    assert_eq!(dw[0], 640 * 480);
    assert_eq!(dw[3], 1_000_000);
    assert_eq!(dw[4], 2_000_000);
    assert_eq!((dw[6], dw[7]), (3000, 100));
    assert_eq!(dw[8], BRC_FLAG_VBR | 29 << 16);
    assert_eq!(dw[9], 640 << 16);
    assert_eq!(dw[10], 480 | 30 << 16);
    assert_eq!(dw[11], 150 | 4 << 16);
    assert_eq!(dw[12], 120 | 60 << 16);
    assert_eq!(dw[13], 100 | 115 << 16);
    assert_eq!(dw[15], u32::from_le_bytes([30, 50, 70, 120]));
    assert_eq!(dw[16], 0);
    assert_eq!(dw[17], u32::from_le_bytes([30, 50, 90, 115]));
    assert_eq!(dw[18] as u8 as i8, rc.thresholds().pb[0]);
    assert_eq!(dw[24], 1);
    assert_eq!((dw[26], dw[27]), (0, 1));
  }

  #[test]
  fn init_with_layers() {
    let seq = SequenceParameters::new(640, 480)
      .with_temporal_layers(&[layer(1000, 15), layer(2000, 30)]);
    let rc = session(&seq);
    let pic = PictureParameters::new(FrameType::I, 60);
    let curbe = Vp8BrcInitCurbe::new(&rc, &seq, &pic).unwrap();
    assert_eq!(curbe.max_level_ratio, [64, 64, 0, 0]);
    assert_eq!(curbe.brc_flag, BRC_FLAG_CBR);
    assert_eq!(curbe.average_bitrate, 2_000_000);
    let dw = curbe.dwords();
    assert_eq!(dw[24], 2 | 64 << 8 | 64 << 16);
  }

  #[interpolate_test(single_layer, 1, 3, 9)]
  #[interpolate_test(single_layer_all, 1, 7, 57)]
  #[interpolate_test(layered_last_golden, 2, 3, 6)]
  #[interpolate_test(layered_all, 2, 7, 27)]
  fn main_ref(layers: usize, ctrl: u8, expected: u32) {
    let mut pic = PictureParameters::new(FrameType::P, 60);
    pic.vp8.ref_frame_ctrl = ctrl;
    assert_eq!(vp8_main_ref(&pic, layers).unwrap(), (expected as u8, ctrl));
  }

  #[test]
  fn main_ref_out_of_range() {
    let mut pic = PictureParameters::new(FrameType::P, 60);
    pic.vp8.ref_frame_ctrl = 8;
    assert!(matches!(
      vp8_main_ref(&pic, 1),
      Err(Error::IndexOutOfRange { index: 8, len: 8, .. })
    ));
    pic.vp8.ref_frame_ctrl = 1;
    pic.vp8.first_ref = 3;
    pic.vp8.second_ref = 3;
    assert!(matches!(
      vp8_main_ref(&pic, 2),
      Err(Error::IndexOutOfRange { index: 0, .. })
    ));
  }

  #[test]
  fn update_layout() {
    let seq = SequenceParameters::new(1920, 1080).with_mb_brc(MbBrc::Enabled);
    let mut rc = session(&seq);
    let mut pic = PictureParameters::new(FrameType::P, 60);
    pic.vp8.qindex = [10, 20, 30, 40];
    pic.vp8.qindex_delta = [-1, 2, 0, 0, -3];
    pic.vp8.ref_frame_ctrl = 3;
    let fullness = rc.advance_target_fullness();
    let curbe = Vp8BrcUpdateCurbe::new(&rc, &seq, &pic, fullness).unwrap();
    let dw = parse(&curbe.to_bytes().unwrap(), VP8_BRC_UPDATE_CURBE_DWORDS);

    assert_eq!(dw[0], fullness.0);
    assert_eq!(dw[3], 10 | 50 << 16);
    assert_eq!(dw[4], 100 | 150 << 16);
    assert_eq!(dw[5], 16 << 8 | 2 << 16);
    assert_eq!(dw[6], 1 << 8);
    assert_eq!(dw[8], u32::from_le_bytes([1, 1, 3, 2]));
    assert_eq!(dw[9], u32::from_le_bytes([1, 40, 5, 5]));
    assert_eq!(dw[10], u32::from_le_bytes([3, 1, 20, 40]));
    assert_eq!(dw[11], u32::from_le_bytes([60, 90, 40, 75]));
    assert_eq!(dw[12], u32::from_le_bytes([97, 103, 125, 160]));
    assert_eq!(dw[13], u32::from_le_bytes([253, 254, 255, 0]));
    assert_eq!(dw[14], u32::from_le_bytes([1, 2, 3, 0]));
    assert_eq!(dw[15], 120 | 68 << 16);
    assert_eq!(dw[16], u32::from_le_bytes([10, 20, 30, 40]));
    assert_eq!(dw[17], dw[16]);
    assert_eq!(dw[18], u32::from_le_bytes([255, 2, 0, 0]));
    assert_eq!(dw[19], u32::from_le_bytes([253, 0, 9, 3]));
    assert_eq!(dw[20], u32::from_le_bytes([0, 1, 1, 0]));
    assert_eq!(&dw[22..], &UPDATE_SURFACE_BTI);
  }

  #[test]
  fn lambdas_follow_segments() {
    let mut pic = PictureParameters::new(FrameType::I, 0);
    pic.vp8.qindex = [0, 127, 10, 20];
    assert_eq!(vp8_segment_lambdas(&pic).unwrap(), [4, 0, 0, 0]);
    pic.vp8.segmentation_enabled = true;
    pic.vp8.qindex_delta[0] = 5;
    let l = vp8_segment_lambdas(&pic).unwrap();
    assert_eq!(l[0], 9 * 9 / 4);
    assert_eq!(l[1], 157 * 157 / 4);
    assert_eq!(l[2], 17 * 17 / 4);
  }
}
