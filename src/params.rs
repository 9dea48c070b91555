// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

//! Sequence, picture and slice parameters supplied by the application.

use arg_enum_proc_macro::ArgEnum;
use arrayvec::ArrayVec;
use num_derive::FromPrimitive;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::error::InvalidParameter;

/// Maximum number of temporal layers.
pub const MAX_TEMPORAL_LAYERS: usize = 4;
/// Largest temporal layer frame rate denominator. The layer rates are
/// brought to a common denominator, which must fit 64 bits.
pub const MAX_LAYER_FRAME_RATE_DEN: u64 = u16::MAX as u64;
/// Highest HEVC QP.
pub const HEVC_MAX_QP: u8 = 51;
/// Highest VP8 quantizer index.
pub const VP8_MAX_QINDEX: u8 = 127;
/// Highest VP9 quantizer index.
pub const VP9_MAX_QINDEX: u8 = 255;
/// Conversion factor from kilobits to bits.
pub const BRC_KBPS: u64 = 1000;

/// A rational number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct Rational {
  /// Numerator.
  pub num: u64,
  /// Denominator.
  pub den: u64,
}

impl Rational {
  /// Creates a rational number from the given numerator and denominator.
  pub const fn new(num: u64, den: u64) -> Self {
    Rational { num, den }
  }

  /// Returns the rational number as a floating-point number.
  pub fn as_f64(self) -> f64 {
    self.num as f64 / self.den as f64
  }

  /// Frames per 100 seconds, the unit the VP8 kernels take.
  pub fn per_100_sec(self) -> u64 {
    if self.den == 0 {
      0
    } else {
      self.num * 100 / self.den
    }
  }
}

impl Default for Rational {
  fn default() -> Self {
    Rational::new(30, 1)
  }
}

#[cfg(feature = "serialize")]
impl serde::Serialize for Rational {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    (self.num, self.den).serialize(serializer)
  }
}

#[cfg(feature = "serialize")]
impl<'a> serde::Deserialize<'a> for Rational {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'a>,
  {
    let (num, den) = serde::Deserialize::deserialize(deserializer)?;

    Ok(Rational::new(num, den))
  }
}

/// Codec driven by the rate controller.
#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub enum CodecKind {
  HEVC,
  VP8,
  VP9,
}

impl Default for CodecKind {
  fn default() -> Self {
    CodecKind::HEVC
  }
}

impl CodecKind {
  /// Highest quantizer value accepted by the codec.
  pub const fn max_qp(self) -> u8 {
    match self {
      CodecKind::HEVC => HEVC_MAX_QP,
      CodecKind::VP8 => VP8_MAX_QINDEX,
      CodecKind::VP9 => VP9_MAX_QINDEX,
    }
  }
}

/// Rate control method, with the values used by the application interface.
#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub enum RateControlMethod {
  /// Constant bitrate
  CBR = 1,
  /// Variable bitrate
  VBR = 2,
  /// Constant QP, no bitrate control
  CQP = 3,
  /// Average variable bitrate
  AVBR = 4,
  /// Video conferencing mode
  VCM = 8,
  /// Intelligent constant quality
  ICQ = 9,
  /// Quality defined variable bitrate
  QVBR = 11,
}

impl Default for RateControlMethod {
  fn default() -> Self {
    RateControlMethod::CBR
  }
}

impl RateControlMethod {
  pub const fn brc_enabled(self) -> bool {
    !matches!(self, RateControlMethod::CQP)
  }

  /// Whether the method needs a non-zero bitrate.
  pub const fn is_bitrate_driven(self) -> bool {
    !matches!(self, RateControlMethod::CQP | RateControlMethod::ICQ)
  }
}

/// Picture coding type. The discriminants match the hardware convention,
/// so `type - 1` yields the firmware frame type.
#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub enum FrameType {
  I = 1,
  P = 2,
  B = 3,
}

impl Default for FrameType {
  fn default() -> Self {
    FrameType::I
  }
}

impl FrameType {
  #[inline]
  pub fn is_intra(self) -> bool {
    self == FrameType::I
  }

  /// Frame type as carried in the command-initializer DMEM.
  pub const fn dmem_frame_type(self) -> u8 {
    self as u8 - 1
  }
}

/// HEVC slice type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub enum SliceType {
  B = 0,
  P = 1,
  I = 2,
}

impl Default for SliceType {
  fn default() -> Self {
    SliceType::I
  }
}

impl From<FrameType> for SliceType {
  fn from(frame_type: FrameType) -> Self {
    match frame_type {
      FrameType::I => SliceType::I,
      FrameType::P => SliceType::P,
      FrameType::B => SliceType::B,
    }
  }
}

/// Macroblock level rate control mode.
#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub enum MbBrc {
  /// Decided internally from the target usage
  Internal = 0,
  Enabled = 1,
  Disabled = 2,
}

impl Default for MbBrc {
  fn default() -> Self {
    MbBrc::Internal
  }
}

/// Cumulative bitrate and frame rate of one temporal layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct TemporalLayer {
  /// Bits per second, including every layer below.
  pub bitrate: u64,
  pub frame_rate: Rational,
}

impl TemporalLayer {
  pub const fn has_valid_frame_rate(&self) -> bool {
    let fr = self.frame_rate;
    fr.num != 0
      && fr.num <= u32::MAX as u64
      && fr.den != 0
      && fr.den <= MAX_LAYER_FRAME_RATE_DEN
  }
}

/// Session wide encode settings.
///
/// Bitrates are in bits per second. A zero VBV size or fullness means the
/// application left it unset.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct SequenceParameters {
  pub width: u32,
  pub height: u32,
  pub rc_method: RateControlMethod,
  pub target_bitrate: u64,
  pub max_bitrate: u64,
  pub min_bitrate: u64,
  pub frame_rate: Rational,
  pub vbv_buffer_size: u64,
  pub init_vbv_fullness: u64,
  pub gop_size: u32,
  /// B frames between two reference frames.
  pub num_b_frames: u32,
  /// Layers from the base layer up. Empty for a single layer stream.
  pub temporal_layers: ArrayVec<TemporalLayer, MAX_TEMPORAL_LAYERS>,
  pub target_usage: u8,
  pub icq_quality_factor: u8,
  pub mb_brc: MbBrc,
  pub low_delay: bool,
  pub qp_adjustment: bool,
  /// 1 selects single pass BRC.
  pub brc_precision: u8,
  pub log2_min_cb_size: u8,
  /// HEVC level scaled by ten, 51 for level 5.1.
  pub level_idc: u8,
  pub bit_depth: u8,
  pub sliding_window: bool,
  /// VP9 HRD buffer thresholds, in percent of the buffer.
  pub vbv_upper_threshold: u8,
  pub vbv_lower_threshold: u8,
  pub dynamic_scaling: bool,
}

impl Default for SequenceParameters {
  fn default() -> Self {
    SequenceParameters {
      width: 1920,
      height: 1080,
      rc_method: RateControlMethod::CBR,
      target_bitrate: 4_000_000,
      max_bitrate: 4_000_000,
      min_bitrate: 0,
      frame_rate: Rational::new(30, 1),
      vbv_buffer_size: 0,
      init_vbv_fullness: 0,
      gop_size: 30,
      num_b_frames: 0,
      temporal_layers: ArrayVec::new(),
      target_usage: 4,
      icq_quality_factor: 0,
      mb_brc: MbBrc::Internal,
      low_delay: false,
      qp_adjustment: false,
      brc_precision: 0,
      log2_min_cb_size: 3,
      level_idc: 51,
      bit_depth: 8,
      sliding_window: false,
      vbv_upper_threshold: 0,
      vbv_lower_threshold: 0,
      dynamic_scaling: false,
    }
  }
}

impl SequenceParameters {
  pub fn new(width: u32, height: u32) -> Self {
    SequenceParameters { width, height, ..Default::default() }
  }

  pub const fn with_rc_method(mut self, rc_method: RateControlMethod) -> Self {
    self.rc_method = rc_method;
    self
  }

  /// Set the target and maximum bitrates, in bits per second.
  pub const fn with_bitrate(mut self, target: u64, max: u64) -> Self {
    self.target_bitrate = target;
    self.max_bitrate = max;
    self
  }

  pub const fn with_frame_rate(mut self, frame_rate: Rational) -> Self {
    self.frame_rate = frame_rate;
    self
  }

  /// Set the VBV buffer size and initial fullness, in bits.
  pub const fn with_vbv(mut self, size: u64, init_fullness: u64) -> Self {
    self.vbv_buffer_size = size;
    self.init_vbv_fullness = init_fullness;
    self
  }

  pub const fn with_gop(mut self, gop_size: u32, num_b_frames: u32) -> Self {
    self.gop_size = gop_size;
    self.num_b_frames = num_b_frames;
    self
  }

  pub const fn with_low_delay(mut self, low_delay: bool) -> Self {
    self.low_delay = low_delay;
    self
  }

  pub const fn with_target_usage(mut self, target_usage: u8) -> Self {
    self.target_usage = target_usage;
    self
  }

  pub const fn with_mb_brc(mut self, mb_brc: MbBrc) -> Self {
    self.mb_brc = mb_brc;
    self
  }

  /// Set the temporal layers from the base layer up.
  pub fn with_temporal_layers(mut self, layers: &[TemporalLayer]) -> Self {
    self.temporal_layers = layers.iter().copied().take(MAX_TEMPORAL_LAYERS).collect();
    self
  }

  /// Number of temporal layers, at least one.
  pub fn num_temporal_layers(&self) -> usize {
    self.temporal_layers.len().max(1)
  }

  /// Bitrate of the top layer, which is the stream bitrate.
  pub fn top_layer_bitrate(&self) -> u64 {
    self.temporal_layers.last().map_or(self.target_bitrate, |l| l.bitrate)
  }

  /// Frame rate of the top layer, which is the stream frame rate.
  pub fn top_layer_frame_rate(&self) -> Rational {
    self.temporal_layers.last().map_or(self.frame_rate, |l| l.frame_rate)
  }

  /// Frame width in minimum coding blocks, minus one.
  pub fn width_in_min_cb_minus1(&self) -> u16 {
    let cb = 1u32 << self.log2_min_cb_size;
    (((self.width + cb - 1) / cb).saturating_sub(1)) as u16
  }

  /// Frame height in minimum coding blocks, minus one.
  pub fn height_in_min_cb_minus1(&self) -> u16 {
    let cb = 1u32 << self.log2_min_cb_size;
    (((self.height + cb - 1) / cb).saturating_sub(1)) as u16
  }

  /// # Errors
  ///
  /// Returns the first inconsistency found in the parameters.
  pub fn validate(&self) -> Result<(), InvalidParameter> {
    use InvalidParameter::*;

    if self.width == 0
      || self.height == 0
      || self.width > u16::MAX as u32
      || self.height > u16::MAX as u32
    {
      return Err(FrameSize { width: self.width, height: self.height });
    }
    let fr = self.frame_rate;
    if fr.num == 0 || fr.den == 0 || fr.num > u32::MAX as u64 {
      return Err(FrameRate { num: fr.num, den: fr.den });
    }
    if self.rc_method.is_bitrate_driven()
      && (self.target_bitrate == 0 || self.max_bitrate == 0)
      && self.rc_method != RateControlMethod::VBR
    {
      return Err(ZeroBitrate(self.rc_method));
    }
    if self.rc_method == RateControlMethod::VBR && self.target_bitrate == 0 {
      return Err(ZeroBitrate(self.rc_method));
    }
    if self.gop_size > 0 && self.num_b_frames + 1 > self.gop_size {
      return Err(Gop { gop: self.gop_size, b_frames: self.num_b_frames });
    }
    let mut prev = 0;
    for (layer, l) in self.temporal_layers.iter().enumerate() {
      if l.bitrate == 0 || l.bitrate < prev {
        return Err(TemporalBitrate { layer, bitrate: l.bitrate });
      }
      if !l.has_valid_frame_rate() {
        return Err(FrameRate { num: l.frame_rate.num, den: l.frame_rate.den });
      }
      prev = l.bitrate;
    }

    Ok(())
  }
}

/// Rolling intra refresh controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct RollingIntraRefresh {
  pub enabled: bool,
  pub qp_delta: i8,
  pub size: u16,
  pub location: u16,
  pub reference_location: [u16; 3],
}

/// VP9 specific picture settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct Vp9Picture {
  pub luma_ac_qindex: u8,
  pub luma_dc_qindex_delta: i8,
  pub log2_tile_columns: u8,
  pub log2_tile_rows: u8,
  /// Source size before dynamic scaling, zero when equal to the frame.
  pub src_width: u32,
  pub src_height: u32,
  pub segmentation_enabled: bool,
  pub prev_frame_segmentation: bool,
  pub segment_map_provided: bool,
  pub segment_qindex_delta: [i16; 8],
  pub num_ref_frames: u8,
}

/// VP8 specific picture settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct Vp8Picture {
  /// Quantizer index per segment.
  pub qindex: [u8; 4],
  /// Deltas for Y1 DC, Y2 AC, Y2 DC, UV AC and UV DC.
  pub qindex_delta: [i8; 5],
  pub ref_frame_ctrl: u8,
  pub first_ref: u8,
  pub second_ref: u8,
  pub segmentation_enabled: bool,
  pub clamp_qindex_low: u8,
  pub clamp_qindex_high: u8,
}

impl Default for Vp8Picture {
  fn default() -> Self {
    Vp8Picture {
      qindex: [0; 4],
      qindex_delta: [0; 5],
      ref_frame_ctrl: 0,
      first_ref: 1,
      second_ref: 2,
      segmentation_enabled: false,
      clamp_qindex_low: 0,
      clamp_qindex_high: VP8_MAX_QINDEX,
    }
  }
}

/// Number of reference POC entries tracked per picture.
pub const MAX_REF_FRAMES: usize = 16;

/// Per frame settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct PictureParameters {
  pub frame_type: FrameType,
  /// Frame QP in the units of the codec.
  pub qp: i32,
  pub curr_poc: i32,
  pub ref_poc: [i32; MAX_REF_FRAMES],
  pub roi_delta_qp: [i8; 8],
  pub roi_enabled: bool,
  pub rolling_intra: RollingIntraRefresh,
  /// BRC QP clamps, zero when unset.
  pub min_qp: u8,
  pub max_qp: u8,
  pub transform_skip: bool,
  pub tiles_enabled: bool,
  pub num_slices: u8,
  pub temporal_id: u8,
  pub vp9: Vp9Picture,
  pub vp8: Vp8Picture,
}

impl Default for PictureParameters {
  fn default() -> Self {
    PictureParameters {
      frame_type: FrameType::I,
      qp: 26,
      curr_poc: 0,
      ref_poc: [0; MAX_REF_FRAMES],
      roi_delta_qp: [0; 8],
      roi_enabled: false,
      rolling_intra: RollingIntraRefresh::default(),
      min_qp: 0,
      max_qp: 0,
      transform_skip: false,
      tiles_enabled: false,
      num_slices: 1,
      temporal_id: 0,
      vp9: Vp9Picture::default(),
      vp8: Vp8Picture::default(),
    }
  }
}

impl PictureParameters {
  pub fn new(frame_type: FrameType, qp: i32) -> Self {
    PictureParameters { frame_type, qp, ..Default::default() }
  }

  pub const fn with_poc(mut self, curr_poc: i32) -> Self {
    self.curr_poc = curr_poc;
    self
  }

  pub const fn with_qp_range(mut self, min_qp: u8, max_qp: u8) -> Self {
    self.min_qp = min_qp;
    self.max_qp = max_qp;
    self
  }

  pub const fn with_roi(mut self, roi_delta_qp: [i8; 8]) -> Self {
    self.roi_delta_qp = roi_delta_qp;
    self.roi_enabled = true;
    self
  }

  /// # Errors
  ///
  /// Returns an error when the QP or its clamps fall outside the codec range.
  pub fn validate(&self, codec: CodecKind) -> Result<(), InvalidParameter> {
    use InvalidParameter::*;

    let max = codec.max_qp() as i32;
    if self.qp < 0 || self.qp > max {
      return Err(Qp { actual: self.qp, max });
    }
    if self.min_qp != 0 && self.max_qp != 0 && self.min_qp > self.max_qp {
      return Err(QpBounds { min: self.min_qp, max: self.max_qp });
    }
    if codec == CodecKind::VP8
      && self.vp8.clamp_qindex_low > self.vp8.clamp_qindex_high
    {
      return Err(QpBounds {
        min: self.vp8.clamp_qindex_low,
        max: self.vp8.clamp_qindex_high,
      });
    }

    Ok(())
  }
}

/// Per slice settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct SliceParameters {
  pub slice_type: SliceType,
  pub slice_qp_delta: i8,
  /// Indices into the picture reference POC list, list 0.
  pub ref_list0: [u8; 4],
  pub temporal_mvp: bool,
  pub num_ref_idx_l0_active_minus1: u8,
  pub num_ref_idx_l1_active_minus1: u8,
}

impl SliceParameters {
  pub fn new(slice_type: SliceType) -> Self {
    SliceParameters { slice_type, ..Default::default() }
  }

  pub const fn with_qp_delta(mut self, slice_qp_delta: i8) -> Self {
    self.slice_qp_delta = slice_qp_delta;
    self
  }

  pub const fn with_refs(mut self, ref_list0: [u8; 4], l0: u8, l1: u8) -> Self {
    self.ref_list0 = ref_list0;
    self.num_ref_idx_l0_active_minus1 = l0;
    self.num_ref_idx_l1_active_minus1 = l1;
    self
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn default_sequence_is_valid() {
    assert_eq!(SequenceParameters::default().validate(), Ok(()));
  }

  #[test]
  fn zero_frame_rate() {
    let seq = SequenceParameters::default().with_frame_rate(Rational::new(0, 1));
    assert_eq!(
      seq.validate(),
      Err(InvalidParameter::FrameRate { num: 0, den: 1 })
    );
  }

  #[test]
  fn zero_bitrate_only_matters_with_brc() {
    let seq = SequenceParameters::default().with_bitrate(0, 0);
    assert_eq!(
      seq.validate(),
      Err(InvalidParameter::ZeroBitrate(RateControlMethod::CBR))
    );
    let seq = seq.with_rc_method(RateControlMethod::CQP);
    assert_eq!(seq.validate(), Ok(()));
  }

  #[test]
  fn descending_layers_rejected() {
    let fr = Rational::new(30, 1);
    let seq = SequenceParameters::default().with_temporal_layers(&[
      TemporalLayer { bitrate: 2_000_000, frame_rate: fr },
      TemporalLayer { bitrate: 1_000_000, frame_rate: fr },
    ]);
    assert_eq!(
      seq.validate(),
      Err(InvalidParameter::TemporalBitrate { layer: 1, bitrate: 1_000_000 })
    );
  }

  #[test]
  fn layer_frame_rate_bounds() {
    let layers = |den| {
      [
        TemporalLayer { bitrate: 1_000_000, frame_rate: Rational::new(15, 1) },
        TemporalLayer { bitrate: 2_000_000, frame_rate: Rational::new(30, den) },
      ]
    };
    let seq = SequenceParameters::default().with_temporal_layers(&layers(1001));
    assert_eq!(seq.validate(), Ok(()));
    let seq =
      SequenceParameters::default().with_temporal_layers(&layers(4_294_967_291));
    assert_eq!(
      seq.validate(),
      Err(InvalidParameter::FrameRate { num: 30, den: 4_294_967_291 })
    );
  }

  #[test]
  fn min_cb_dimensions() {
    let seq = SequenceParameters::new(1920, 1080);
    assert_eq!(seq.width_in_min_cb_minus1(), 239);
    assert_eq!(seq.height_in_min_cb_minus1(), 134);
  }

  #[test]
  fn inverted_qp_bounds() {
    let pic = PictureParameters::new(FrameType::P, 30).with_qp_range(40, 20);
    assert_eq!(
      pic.validate(CodecKind::HEVC),
      Err(InvalidParameter::QpBounds { min: 40, max: 20 })
    );
    let pic = PictureParameters::new(FrameType::P, 60);
    assert_eq!(
      pic.validate(CodecKind::HEVC),
      Err(InvalidParameter::Qp { actual: 60, max: 51 })
    );
    assert_eq!(pic.validate(CodecKind::VP9), Ok(()));
  }

  #[test]
  fn frame_type_parses_from_cli_names() {
    assert_eq!("P".parse::<FrameType>().unwrap(), FrameType::P);
    assert_eq!(FrameType::I.to_string(), "I");
    assert_eq!(FrameType::B.dmem_frame_type(), 2);
    assert_eq!(
      "vbr".parse::<RateControlMethod>().unwrap(),
      RateControlMethod::VBR
    );
  }
}
