// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use arrayvec::ArrayVec;
use bitstream_io::ByteWrite;
use std::io;

use super::*;
use crate::error::InvalidParameter;
use crate::huc::{VP9_CMD1_START, VP9_CMD2_SIZE};
use crate::params::*;
use crate::rate::*;
use crate::util::{clamp, lcm, write_zeros};

pub const VP9_BRC_INIT_DMEM_SIZE: usize = 192;
pub const VP9_BRC_UPDATE_DMEM_SIZE: usize = 256;

pub const VP9_BRC_FLAG_CBR: u16 = 0x10;
pub const VP9_BRC_FLAG_VBR: u16 = 0x20;
pub const VP9_BRC_FLAG_AVBR: u16 = 0x40;
pub const VP9_BRC_FLAG_CQL: u16 = 0x80;

const INST_RATE_THRESH_P: [i8; 4] = [30, 50, 70, 120];
const INST_RATE_THRESH_I: [i8; 4] = [30, 50, 90, 115];
const OVERSHOOT_CBR_PCT: u16 = 115;
const QP_THRESHOLD: [u8; 4] = [20, 40, 60, 90];

/// Firmware flag of the rate control method. ICQ runs as constant quality
/// level.
pub fn vp9_brc_flag(method: RateControlMethod) -> Result<u16, InvalidParameter> {
  use RateControlMethod::*;

  match method {
    CBR => Ok(VP9_BRC_FLAG_CBR),
    VBR => Ok(VP9_BRC_FLAG_VBR),
    AVBR => Ok(VP9_BRC_FLAG_AVBR),
    ICQ => Ok(VP9_BRC_FLAG_CQL),
    _ => Err(InvalidParameter::RateControl { codec: CodecKind::VP9, method }),
  }
}

/// Starting quantizer indices `(I, P)` estimated from the base layer.
pub fn vp9_init_qp(seq: &SequenceParameters) -> (u8, u8) {
  let (bitrate, fr) = seq
    .temporal_layers
    .first()
    .map_or((seq.target_bitrate, seq.frame_rate), |l| (l.bitrate, l.frame_rate));
  let frame_size = (seq.width as u64 * seq.height as u64 * 3 / 2) as f64;
  let bits_per_pixel = frame_size * 2.0 / 3.0 * fr.num as f64
    / (bitrate.max(1) as f64 * fr.den.max(1) as f64);
  let mut qp_p =
    (1.0 / 1.2 * 10f64.powf(bits_per_pixel.log10() * (0.56 / 1.75) + 1.19)
      + 0.5) as i32;
  qp_p = clamp(qp_p * 5 - 20, 1, 200);

  let mut qp_i = if qp_p > 4 { qp_p - 4 } else { qp_p };
  let qi_boost = clamp(seq.gop_size.saturating_sub(1) as i32 / 30 - 1, 0, 20);
  qp_i = clamp(qp_i - qi_boost, 1, 200);
  qp_p = qp_i + 20;
  (qp_i as u8, qp_p as u8)
}

/// Shares of 64 of each temporal layer, scaled by the frame rate the layer
/// runs at relative to the stream.
///
/// # Errors
///
/// Returns `InvalidParameter` for a single layer or more than four, a zero
/// stream bitrate or frame rate term, or two layers with the same rate.
pub fn vp9_max_level_ratios(
  layers: &[TemporalLayer],
) -> Result<ArrayVec<u8, MAX_TEMPORAL_LAYERS>, InvalidParameter> {
  use InvalidParameter::*;

  if layers.len() <= 1 || layers.len() > MAX_TEMPORAL_LAYERS {
    return Err(TemporalLayers { actual: layers.len(), max: MAX_TEMPORAL_LAYERS });
  }
  for l in layers {
    if !l.has_valid_frame_rate() {
      return Err(FrameRate { num: l.frame_rate.num, den: l.frame_rate.den });
    }
  }
  let top = layers[layers.len() - 1];
  if top.bitrate == 0 {
    return Err(TemporalBitrate { layer: layers.len() - 1, bitrate: 0 });
  }

  let norm = layers
    .iter()
    .fold(1u128, |acc, l| lcm(acc, l.frame_rate.den as u128));
  let normalized = |l: &TemporalLayer| {
    l.frame_rate.num as u128 * (norm / l.frame_rate.den as u128)
  };
  let max_fr = top.frame_rate;

  let mut ratios = ArrayVec::new();
  let mut below: Option<&TemporalLayer> = None;
  for (layer, l) in layers.iter().enumerate() {
    let (bitrate, num) = match below {
      None => (l.bitrate, normalized(l)),
      Some(b) => (
        l.bitrate.saturating_sub(b.bitrate),
        normalized(l).saturating_sub(normalized(b)),
      ),
    };
    if num == 0 {
      return Err(TemporalBitrate { layer, bitrate: l.bitrate });
    }
    let ratio = ((bitrate as u128) << 6) / top.bitrate as u128 * norm
      / max_fr.den as u128
      * max_fr.num as u128
      / num;
    ratios.push(ratio.min(u8::MAX as u128) as u8);
    below = Some(l);
  }
  Ok(ratios)
}

/// BRC init/reset DMEM of the VP9 VDEnc firmware.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vp9BrcInitDmem {
  pub brc_func: u32,
  pub profile_level_max_frame: u32,
  pub init_buf_fullness: u32,
  pub buf_size: u32,
  pub target_bitrate: u32,
  pub max_rate: u32,
  pub min_rate: u32,
  pub frame_rate_m: u32,
  pub frame_rate_d: u32,
  pub brc_flag: u16,
  pub gop_p: u16,
  pub frame_width: u16,
  pub frame_height: u16,
  pub min_qp: u16,
  pub max_qp: u16,
  /// Quality level under CQL.
  pub level_qp: u16,
  /// Zero lets the firmware derive it.
  pub golden_frame_interval: u16,
  pub enable_scaling: bool,
  pub overshoot_cbr: u16,
  pub inst_rate_thresh_p: [i8; 4],
  pub inst_rate_thresh_i: [i8; 4],
  pub dev_thresh: DeviationThresholds,
  pub init_qp_p: u8,
  pub init_qp_i: u8,
  pub total_level: u8,
  pub max_level_ratio: [u8; 16],
  pub sliding_window_enable: bool,
  pub sliding_window_size: u8,
}

impl Vp9BrcInitDmem {
  /// # Errors
  ///
  /// Returns `RateControl` for a method the firmware does not run, or the
  /// temporal layer errors of [`vp9_max_level_ratios`].
  pub fn new(
    rc: &RateControlSession, seq: &SequenceParameters,
  ) -> Result<Self, Error> {
    let (init_qp_i, init_qp_p) = vp9_init_qp(seq);
    let mut dmem = Vp9BrcInitDmem {
      brc_func: match rc.mode() {
        InitMode::Init => 0,
        InitMode::Reset => 2,
      },
      profile_level_max_frame: uncompressed_frame_bytes(seq.width, seq.height),
      init_buf_fullness: rc.init_buf_fullness_bits() as u32,
      buf_size: rc.buf_size_bits() as u32,
      target_bitrate: bitrate_u32(rc.target_bitrate),
      max_rate: bitrate_u32(rc.max_bitrate()),
      min_rate: bitrate_u32(rc.min_bitrate),
      frame_rate_m: rc.frame_rate.num as u32,
      frame_rate_d: rc.frame_rate.den as u32,
      brc_flag: vp9_brc_flag(rc.rc_method())?,
      gop_p: seq.gop_size.saturating_sub(1) as u16,
      frame_width: seq.width as u16,
      frame_height: seq.height as u16,
      min_qp: 1,
      max_qp: VP9_MAX_QINDEX as u16,
      enable_scaling: seq.dynamic_scaling,
      overshoot_cbr: OVERSHOOT_CBR_PCT,
      inst_rate_thresh_p: INST_RATE_THRESH_P,
      inst_rate_thresh_i: INST_RATE_THRESH_I,
      dev_thresh: *rc.thresholds(),
      init_qp_p,
      init_qp_i,
      total_level: seq.num_temporal_layers() as u8,
      sliding_window_enable: seq.sliding_window,
      ..Default::default()
    };
    if rc.rc_method() == RateControlMethod::ICQ {
      dmem.level_qp = seq.icq_quality_factor as u16;
    }
    if seq.sliding_window {
      dmem.sliding_window_size =
        (rc.frame_rate.num / rc.frame_rate.den.max(1)).min(60) as u8;
    }
    if dmem.total_level > 1 {
      let ratios = vp9_max_level_ratios(&seq.temporal_layers)?;
      dmem.max_level_ratio[..ratios.len()].copy_from_slice(&ratios);
    }
    Ok(dmem)
  }
}

impl BrcPayload for Vp9BrcInitDmem {
  const SIZE: usize = VP9_BRC_INIT_DMEM_SIZE;

  fn write_to(&self, w: &mut PayloadWriter<'_>) -> io::Result<()> {
    for dw in [
      self.brc_func,
      self.profile_level_max_frame,
      self.init_buf_fullness,
      self.buf_size,
      self.target_bitrate,
      self.max_rate,
      self.min_rate,
      self.frame_rate_m,
      self.frame_rate_d,
    ] {
      w.write::<u32>(dw)?;
    }
    write_zeros(w, 4 * 4)?;
    for hw in [
      self.brc_flag,
      self.gop_p,
      0,
      self.frame_width,
      self.frame_height,
      self.min_qp,
      self.max_qp,
      self.level_qp,
      self.golden_frame_interval,
      self.enable_scaling as u16,
      self.overshoot_cbr,
    ] {
      w.write::<u16>(hw)?;
    }
    write_zeros(w, 5 * 2)?;
    for &v in self.inst_rate_thresh_p.iter() {
      w.write::<i8>(v)?;
    }
    write_zeros(w, 4)?;
    for &v in self
      .inst_rate_thresh_i
      .iter()
      .chain(&self.dev_thresh.pb)
      .chain(&self.dev_thresh.vbr)
      .chain(&self.dev_thresh.i)
    {
      w.write::<i8>(v)?;
    }
    w.write_bytes(&[self.init_qp_p, self.init_qp_i, 0, self.total_level])?;
    w.write_bytes(&self.max_level_ratio)?;
    w.write::<u8>(self.sliding_window_enable as u8)?;
    w.write::<u8>(self.sliding_window_size)?;
    write_zeros(w, 47 + 3)
  }
}

impl SlbLayout {
  /// Layout written by the VP9 command initializer, with the picture state
  /// at the start of the batch and Cmd1 after it.
  pub const fn vp9() -> Self {
    SlbLayout {
      cmd1_start: VP9_CMD1_START,
      cmd2_start: 0,
      pic_state_start: 0,
      size: VP9_CMD1_START + VP9_CMD2_SIZE as u16,
    }
  }
}

/// BRC update DMEM of the VP9 VDEnc firmware, one per pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vp9BrcUpdateDmem {
  pub target_buf_fullness: i32,
  pub frame_num: u32,
  pub hrd_buf_fullness_upper: i32,
  pub hrd_buf_fullness_lower: i32,
  pub start_global_adjust_frame: [u16; 4],
  pub cur_width: u16,
  pub cur_height: u16,
  pub asyn: u16,
  pub vdenc_img_state_offset: u16,
  pub slbb_size: u16,
  pub pic_state_offset: u16,
  pub overflow: bool,
  pub brc_flag: u8,
  pub max_num_paks: u8,
  pub curr_frame_type: i8,
  pub qp_threshold: [u8; 4],
  pub rate_ratio_threshold: [u8; 6],
  pub start_global_adjust_mult: [u8; 5],
  pub start_global_adjust_div: [u8; 5],
  pub rate_ratio_threshold_qp: [i8; 7],
  pub dist_threshld_i: [u8; 9],
  pub dist_threshld_p: [u8; 9],
  pub dist_threshld_b: [u8; 9],
  pub max_frame_thresh_i: [u8; 5],
  pub max_frame_thresh_p: [u8; 5],
  pub max_frame_thresh_b: [u8; 5],
  pub pak_pass_num: u8,
  pub acq_qp: u8,
  pub sad_zone_delta_qp: [i8; 4],
  pub mv_zero_delta_qp: i8,
  pub mv_zone_delta_qp: [i8; 3],
  pub temporal_level: u8,
  pub seg_map_generating: bool,
}

impl Vp9BrcUpdateDmem {
  /// Fills the DMEM for the current pass.
  ///
  /// `fullness` carries the frame target and overflow flag from
  /// [`RateControlSession::advance_target_fullness`] on the first pass, and
  /// is `None` on the passes after it.
  pub fn new(
    rc: &RateControlSession, seq: &SequenceParameters, pic: &PictureParameters,
    fullness: Option<(u32, bool)>, layout: SlbLayout,
  ) -> Self {
    let buf = rc.buf_size_bits();
    let hrd = |pct: u8| (buf * pct as f64 / 100.0) as i32;
    let (target, overflow) = fullness.unwrap_or((0, false));
    Vp9BrcUpdateDmem {
      target_buf_fullness: target as i32,
      frame_num: rc.frame_count(),
      hrd_buf_fullness_upper: hrd(seq.vbv_upper_threshold),
      hrd_buf_fullness_lower: hrd(seq.vbv_lower_threshold),
      start_global_adjust_frame: START_GLOBAL_ADJUST_FRAME.map(|f| f as u16),
      cur_width: seq.width as u16,
      cur_height: seq.height as u16,
      asyn: 0,
      vdenc_img_state_offset: layout.cmd2_start,
      slbb_size: layout.size,
      pic_state_offset: layout.pic_state_start,
      overflow,
      brc_flag: 0,
      max_num_paks: rc.max_passes() as u8,
      curr_frame_type: if pic.frame_type.is_intra() { 2 } else { 0 },
      qp_threshold: QP_THRESHOLD,
      rate_ratio_threshold: RATE_RATIO_THRESHOLD,
      start_global_adjust_mult: START_GLOBAL_ADJUST_MULT,
      start_global_adjust_div: START_GLOBAL_ADJUST_DIV,
      rate_ratio_threshold_qp: RATE_RATIO_THRESHOLD_QP,
      dist_threshld_i: [0; 9],
      dist_threshld_p: [0; 9],
      dist_threshld_b: [0; 9],
      max_frame_thresh_i: [0; 5],
      max_frame_thresh_p: [0; 5],
      max_frame_thresh_b: [0; 5],
      pak_pass_num: rc.current_pass() as u8,
      acq_qp: pic.vp9.luma_ac_qindex,
      sad_zone_delta_qp: [0; 4],
      mv_zero_delta_qp: 0,
      mv_zone_delta_qp: [0; 3],
      temporal_level: pic.temporal_id,
      seg_map_generating: pic.vp9.segmentation_enabled
        && !pic.vp9.segment_map_provided,
    }
  }
}

impl BrcPayload for Vp9BrcUpdateDmem {
  const SIZE: usize = VP9_BRC_UPDATE_DMEM_SIZE;

  fn write_to(&self, w: &mut PayloadWriter<'_>) -> io::Result<()> {
    w.write::<i32>(self.target_buf_fullness)?;
    w.write::<u32>(self.frame_num)?;
    w.write::<i32>(self.hrd_buf_fullness_upper)?;
    w.write::<i32>(self.hrd_buf_fullness_lower)?;
    write_zeros(w, 7 * 4)?;
    for &f in self.start_global_adjust_frame.iter() {
      w.write::<u16>(f)?;
    }
    for hw in [
      self.cur_width,
      self.cur_height,
      self.asyn,
      self.vdenc_img_state_offset,
      self.slbb_size,
      self.pic_state_offset,
    ] {
      w.write::<u16>(hw)?;
    }
    write_zeros(w, 6 * 2)?;
    w.write_bytes(&[self.overflow as u8, self.brc_flag, self.max_num_paks])?;
    w.write::<i8>(self.curr_frame_type)?;
    w.write_bytes(&self.qp_threshold)?;
    w.write_bytes(&self.rate_ratio_threshold)?;
    w.write_bytes(&self.start_global_adjust_mult)?;
    w.write_bytes(&self.start_global_adjust_div)?;
    for &v in self.rate_ratio_threshold_qp.iter() {
      w.write::<i8>(v)?;
    }
    for t in [
      &self.dist_threshld_i[..],
      &self.dist_threshld_p,
      &self.dist_threshld_b,
      &self.max_frame_thresh_i,
      &self.max_frame_thresh_p,
      &self.max_frame_thresh_b,
    ] {
      w.write_bytes(t)?;
    }
    w.write::<u8>(self.pak_pass_num)?;
    w.write::<u8>(self.acq_qp)?;
    for &v in self.sad_zone_delta_qp.iter() {
      w.write::<i8>(v)?;
    }
    w.write::<i8>(self.mv_zero_delta_qp)?;
    for &v in self.mv_zone_delta_qp.iter() {
      w.write::<i8>(v)?;
    }
    w.write::<u8>(self.temporal_level)?;
    w.write::<u8>(self.seg_map_generating as u8)?;
    write_zeros(w, 95)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::config::{Generation, SessionConfig};
  use crate::huc::layout_profile;
  use nom::number::complete::{le_i32, le_u16, le_u32};
  use nom::sequence::tuple;
  use pretty_assertions::assert_eq;

  fn seq() -> SequenceParameters {
    SequenceParameters::new(1920, 1080)
      .with_bitrate(4_000_000, 4_000_000)
      .with_gop(30, 0)
  }

  fn session(seq: &SequenceParameters) -> RateControlSession {
    let config = SessionConfig::new(Generation::G11, CodecKind::VP9);
    let pic = PictureParameters::new(FrameType::I, 120);
    RateControlSession::init_or_reset(seq, &pic, InitMode::Init, &config)
      .unwrap()
  }

  fn layer(kbps: u64, num: u64, den: u64) -> TemporalLayer {
    TemporalLayer { bitrate: kbps * BRC_KBPS, frame_rate: Rational::new(num, den) }
  }

  #[test]
  fn init_qp_estimate() {
    assert_eq!(vp9_init_qp(&seq()), (131, 151));
    let (long_i, _) = vp9_init_qp(&seq().with_gop(301, 0));
    assert_eq!(long_i, 131 - 9);
  }

  #[test]
  fn flags() {
    assert_eq!(vp9_brc_flag(RateControlMethod::ICQ), Ok(VP9_BRC_FLAG_CQL));
    assert_eq!(
      vp9_brc_flag(RateControlMethod::QVBR),
      Err(InvalidParameter::RateControl {
        codec: CodecKind::VP9,
        method: RateControlMethod::QVBR
      })
    );
  }

  #[test]
  fn level_ratios() {
    let layers = [layer(1000, 15, 1), layer(2000, 30, 1)];
    assert_eq!(&vp9_max_level_ratios(&layers).unwrap()[..], &[64, 64]);
    let layers = [layer(1000, 15, 2), layer(3000, 15, 1)];
    assert_eq!(&vp9_max_level_ratios(&layers).unwrap()[..], &[42, 84]);
  }

  #[test]
  fn level_ratio_errors() {
    assert!(vp9_max_level_ratios(&[layer(1000, 30, 1)]).is_err());
    let layers = [layer(1000, 30, 1), layer(2000, 30, 1)];
    assert_eq!(
      vp9_max_level_ratios(&layers),
      Err(InvalidParameter::TemporalBitrate { layer: 1, bitrate: 2_000_000 })
    );
    let layers = [layer(1000, 30, 0), layer(2000, 30, 1)];
    assert!(matches!(
      vp9_max_level_ratios(&layers),
      Err(InvalidParameter::FrameRate { .. })
    ));
  }

  #[test]
  fn coprime_layer_denominators() {
    let layers = [
      layer(1000, 7, 65_521),
      layer(2000, 11, 65_519),
      layer(3000, 13, 65_497),
      layer(4000, 17, 65_479),
    ];
    let ratios = vp9_max_level_ratios(&layers).unwrap();
    assert_eq!(ratios.len(), 4);
    let layers = [layer(1000, 7, 1), layer(2000, 11, 65_536)];
    assert_eq!(
      vp9_max_level_ratios(&layers),
      Err(InvalidParameter::FrameRate { num: 11, den: 65_536 })
    );
  }

  #[test]
  fn init_layout() {
    let seq = seq();
    let rc = session(&seq);
    let dmem = Vp9BrcInitDmem::new(&rc, &seq).unwrap();
    let bytes = dmem.to_bytes().unwrap();
    assert_eq!(bytes.len(), VP9_BRC_INIT_DMEM_SIZE);

    let (_, (func, _, _, _, target, max, min, m, d)) = tuple((
      le_u32::<_, ()>,
      le_u32,
      le_u32,
      le_u32,
      le_u32,
      le_u32,
      le_u32,
      le_u32,
      le_u32,
    ))(&bytes[..])
    .unwrap();
    assert_eq!((func, target, max, min, m, d), (0, 4_000_000, 4_000_000, 0, 30, 1));
    let (_, (flag, gop_p, _, w, h, min_qp, max_qp)) = tuple((
      le_u16::<_, ()>,
      le_u16,
      le_u16,
      le_u16,
      le_u16,
      le_u16,
      le_u16,
    ))(&bytes[52..])
    .unwrap();
    assert_eq!(
      (flag, gop_p, w, h, min_qp, max_qp),
      (VP9_BRC_FLAG_CBR, 29, 1920, 1080, 1, 255)
    );
    let (_, overshoot) = le_u16::<_, ()>(&bytes[72..]).unwrap();
    assert_eq!(overshoot, 115);
    assert_eq!(&bytes[84..88], &[30, 50, 70, 120]);
    assert_eq!(&bytes[92..96], &[30, 50, 90, 115]);
    assert_eq!(bytes[96] as i8, rc.thresholds().pb[0]);
    assert_eq!(&bytes[120..124], &[151, 131, 0, 1]);
    assert!(bytes[142..].iter().all(|&b| b == 0));
  }

  #[test]
  fn temporal_layers_fill_ratios() {
    let seq = seq().with_temporal_layers(&[layer(2000, 15, 1), layer(4000, 30, 1)]);
    let rc = session(&seq);
    let dmem = Vp9BrcInitDmem::new(&rc, &seq).unwrap();
    assert_eq!(dmem.total_level, 2);
    assert_eq!(&dmem.max_level_ratio[..3], &[64, 64, 0]);
  }

  #[test]
  fn update_layout() {
    let seq = SequenceParameters { vbv_upper_threshold: 80, ..seq() };
    let mut rc = session(&seq);
    let mut pic = PictureParameters::new(FrameType::P, 120);
    pic.vp9.luma_ac_qindex = 140;
    pic.temporal_id = 1;
    let layout = SlbLayout::hevc(layout_profile(Generation::G11), true);
    let fullness = rc.advance_target_fullness();
    let dmem =
      Vp9BrcUpdateDmem::new(&rc, &seq, &pic, Some(fullness), layout);
    let bytes = dmem.to_bytes().unwrap();
    assert_eq!(bytes.len(), VP9_BRC_UPDATE_DMEM_SIZE);

    let (_, (target, frame, upper, lower)) =
      tuple((le_i32::<_, ()>, le_u32, le_i32, le_i32))(&bytes[..]).unwrap();
    assert_eq!(target, fullness.0 as i32);
    assert_eq!(frame, 0);
    assert_eq!(upper, (rc.buf_size_bits() * 80.0 / 100.0) as i32);
    assert_eq!(lower, 0);
    let (_, (w, h)) = tuple((le_u16::<_, ()>, le_u16))(&bytes[52..]).unwrap();
    assert_eq!((w, h), (1920, 1080));
    assert_eq!(&bytes[76..80], &[0, 0, 2, 0]);
    assert_eq!(&bytes[80..84], &QP_THRESHOLD);
    assert_eq!(&bytes[84..90], &RATE_RATIO_THRESHOLD);
    assert_eq!((bytes[149], bytes[150]), (0, 140));
    assert_eq!(bytes[159], 1);
    assert!(bytes[161..].iter().all(|&b| b == 0));
  }

  #[test]
  fn overflow_is_flagged() {
    let seq = seq();
    let rc = session(&seq);
    let layout = SlbLayout::hevc(layout_profile(Generation::G11), true);
    let pic = PictureParameters::new(FrameType::I, 120);
    let dmem = Vp9BrcUpdateDmem::new(&rc, &seq, &pic, Some((5, true)), layout);
    assert!(dmem.overflow);
    assert_eq!(dmem.curr_frame_type, 2);
    let later = Vp9BrcUpdateDmem::new(&rc, &seq, &pic, None, layout);
    assert_eq!((later.target_buf_fullness, later.overflow), (0, false));
  }
}
