// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use arrayvec::ArrayVec;

use super::*;
use crate::config::SessionConfig;
use crate::error::{Error, InvalidParameter};
use crate::util::clamp;

/// Shares of 64 summed by [`calculate_temporal_ratios`].
pub const TEMPORAL_RATIO_TOTAL: u32 = 64;

/// Bounds of the bits per frame to buffer ratio used for the thresholds.
const BPS_RATIO_MIN: f64 = 0.1;
const BPS_RATIO_MAX: f64 = 3.5;

/// Splits 64 between the layers in proportion to the bitrate each layer
/// adds. The top layer takes the rounding remainder so the shares always
/// sum to 64.
///
/// # Errors
///
/// Returns `TemporalBitrate` when a layer bitrate is zero or below the
/// layer under it.
pub fn calculate_temporal_ratios(
  layers: &[TemporalLayer],
) -> Result<ArrayVec<u8, MAX_TEMPORAL_LAYERS>, InvalidParameter> {
  if layers.is_empty() || layers.len() > MAX_TEMPORAL_LAYERS {
    return Err(InvalidParameter::TemporalLayers {
      actual: layers.len(),
      max: MAX_TEMPORAL_LAYERS,
    });
  }
  let mut prev = 0;
  for (layer, l) in layers.iter().enumerate() {
    if l.bitrate == 0 || l.bitrate < prev {
      return Err(InvalidParameter::TemporalBitrate {
        layer,
        bitrate: l.bitrate,
      });
    }
    prev = l.bitrate;
  }

  let top = layers.len() - 1;
  let top_bitrate = layers[top].bitrate;
  let mut ratios = ArrayVec::new();
  let mut acc = 0u32;
  let mut below = 0u64;
  for l in &layers[..top] {
    let share =
      ((l.bitrate - below) * TEMPORAL_RATIO_TOTAL as u64 / top_bitrate) as u32;
    ratios.push(share as u8);
    acc += share;
    below = l.bitrate;
  }
  ratios.push((TEMPORAL_RATIO_TOTAL - acc) as u8);
  Ok(ratios)
}

fn scaled(scale: f64, bases: [f64; 4], ratio: f64) -> [i8; 4] {
  bases.map(|b| (scale * b.powf(ratio)) as i8)
}

fn join(lo: [i8; 4], hi: [i8; 4]) -> [i8; 8] {
  [lo[0], lo[1], lo[2], lo[3], hi[0], hi[1], hi[2], hi[3]]
}

/// Frame size deviation thresholds for a bits per frame to buffer ratio.
/// Smaller buffers relative to the frame size widen the thresholds.
pub fn deviation_thresholds(bps_ratio: f64) -> DeviationThresholds {
  let r = bps_ratio;
  DeviationThresholds {
    pb: join(
      scaled(-50.0, [0.90, 0.66, 0.46, 0.3], r),
      scaled(50.0, [0.3, 0.46, 0.70, 0.90], r),
    ),
    vbr: join(
      scaled(-50.0, [0.9, 0.7, 0.5, 0.3], r),
      scaled(100.0, [0.4, 0.5, 0.75, 0.90], r),
    ),
    i: join(
      scaled(-50.0, [0.8, 0.6, 0.34, 0.2], r),
      scaled(50.0, [0.2, 0.4, 0.66, 0.9], r),
    ),
  }
}

/// Effective maximum bitrate of a rate control method.
pub fn effective_max_bitrate(
  rc_method: RateControlMethod, target: u64, max: u64,
) -> u64 {
  match rc_method {
    RateControlMethod::CBR => target,
    RateControlMethod::VBR if max < target => 2 * target,
    _ => max,
  }
}

impl RateControlSession {
  /// Builds the rate control state for a stream, either from scratch or
  /// as a reset after a sequence parameter change.
  ///
  /// # Errors
  ///
  /// Returns `InvalidParameter` for a zero frame rate, a zero bitrate
  /// under a bitrate driven method, inverted QP bounds, non-ascending
  /// temporal layer bitrates or a VBV that does not fit 32 bits.
  pub fn init_or_reset(
    seq: &SequenceParameters, pic: &PictureParameters, mode: InitMode,
    config: &SessionConfig,
  ) -> Result<Self, Error> {
    seq.validate()?;
    pic.validate(config.codec)?;

    let max_bitrate = effective_max_bitrate(
      seq.rc_method,
      seq.target_bitrate,
      seq.max_bitrate,
    );
    if seq.rc_method.is_bitrate_driven() && max_bitrate == 0 {
      return Err(InvalidParameter::ZeroBitrate(seq.rc_method).into());
    }

    let frame_rate = seq.top_layer_frame_rate();
    let input_bits_per_frame =
      max_bitrate as f64 * frame_rate.den as f64 / frame_rate.num as f64;
    let buf_size_bits =
      (seq.vbv_buffer_size as f64).max(4.0 * input_bits_per_frame);
    if buf_size_bits > u32::MAX as f64 {
      return Err(
        InvalidParameter::VbvSize { bits: buf_size_bits as u64 }.into(),
      );
    }

    let requested = if seq.init_vbv_fullness > 0 {
      seq.init_vbv_fullness as f64
    } else {
      buf_size_bits * 7.0 / 8.0
    };
    let init_buf_fullness_bits =
      requested.max(2.0 * input_bits_per_frame).min(buf_size_bits);

    let bps_ratio = clamp(
      input_bits_per_frame / (buf_size_bits / 30.0),
      BPS_RATIO_MIN,
      BPS_RATIO_MAX,
    );

    let temporal_ratios = if seq.temporal_layers.len() > 1 {
      calculate_temporal_ratios(&seq.temporal_layers)?
    } else {
      ArrayVec::new()
    };

    let codec_max = config.codec.max_qp();
    let max_qp =
      if pic.max_qp == 0 { codec_max } else { pic.max_qp.min(codec_max) };

    info!(
      "BRC {:?} {:?}: {:.1} bits per frame, buffer {:.0}, initial fullness {:.0}",
      mode, seq.rc_method, input_bits_per_frame, buf_size_bits,
      init_buf_fullness_bits
    );

    Ok(RateControlSession {
      codec: config.codec,
      rc_method: seq.rc_method,
      mode,
      target_bitrate: seq.top_layer_bitrate(),
      max_bitrate,
      min_bitrate: seq.min_bitrate,
      frame_rate,
      gop_size: seq.gop_size,
      num_b_frames: seq.num_b_frames,
      input_bits_per_frame,
      buf_size_bits,
      init_buf_fullness_bits,
      target_buf_fullness: init_buf_fullness_bits,
      vbv_level: init_buf_fullness_bits,
      bps_ratio,
      thresholds: deviation_thresholds(bps_ratio),
      temporal_ratios,
      min_qp: pic.min_qp,
      max_qp,
      qp: pic.qp,
      num_passes: config.num_passes,
      panic_enabled: config.panic_enabled,
      current_pass: 0,
      panic: false,
      frame_type: pic.frame_type,
      frame_count: 0,
      total_bits: 0.0,
      overshoot_streak: 0,
    })
  }

  /// Re-targets the session after a sequence parameter change. The frame
  /// history, the running QP and the buffer model carry over; only an
  /// init seeds the target fullness.
  pub fn reset(
    &mut self, seq: &SequenceParameters, pic: &PictureParameters,
    config: &SessionConfig,
  ) -> Result<(), Error> {
    let mut next = Self::init_or_reset(seq, pic, InitMode::Reset, config)?;
    next.frame_count = self.frame_count;
    next.total_bits = self.total_bits;
    next.qp = clamp(self.qp, next.min_qp as i32, next.max_qp as i32);
    next.target_buf_fullness = self.target_buf_fullness;
    next.vbv_level = self.vbv_level.min(next.buf_size_bits);
    *self = next;
    Ok(())
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::config::Generation;
  use quickcheck::quickcheck;

  fn config() -> SessionConfig {
    SessionConfig::new(Generation::G11, CodecKind::HEVC)
  }

  fn vbr(target: u64, max: u64) -> SequenceParameters {
    SequenceParameters::new(1920, 1080)
      .with_rc_method(RateControlMethod::VBR)
      .with_bitrate(target, max)
  }

  fn session(seq: &SequenceParameters) -> Result<RateControlSession, Error> {
    let pic = PictureParameters::new(FrameType::I, 30);
    RateControlSession::init_or_reset(seq, &pic, InitMode::Init, &config())
  }

  #[test]
  fn vbr_scenario() {
    let rc = session(&vbr(2_000_000, 4_000_000)).unwrap();
    assert!((rc.input_bits_per_frame() - 133_333.33).abs() < 0.01);
    assert!((rc.buf_size_bits() - 533_333.33).abs() < 0.01);
    assert!((rc.init_buf_fullness_bits() - 466_666.67).abs() < 0.01);
    assert_eq!(rc.bps_ratio(), BPS_RATIO_MAX);
    assert_eq!(rc.mode(), InitMode::Init);
  }

  #[test]
  fn cbr_forces_max_to_target() {
    let seq = SequenceParameters::new(1280, 720)
      .with_bitrate(3_000_000, 9_000_000)
      .with_vbv(6_000_000, 0);
    let rc = session(&seq).unwrap();
    assert_eq!(rc.max_bitrate(), 3_000_000);
    assert_eq!(rc.buf_size_bits(), 6_000_000.0);
  }

  #[test]
  fn vbr_with_low_max_doubles_target() {
    let rc = session(&vbr(2_000_000, 1_000_000)).unwrap();
    assert_eq!(rc.max_bitrate(), 4_000_000);
  }

  #[test]
  fn initial_fullness_is_clamped() {
    let seq = vbr(2_000_000, 4_000_000).with_vbv(8_000_000, 1000);
    let rc = session(&seq).unwrap();
    assert_eq!(rc.init_buf_fullness_bits(), 2.0 * rc.input_bits_per_frame());
    let seq = vbr(2_000_000, 4_000_000).with_vbv(8_000_000, 9_000_000);
    let rc = session(&seq).unwrap();
    assert_eq!(rc.init_buf_fullness_bits(), 8_000_000.0);
  }

  #[test]
  fn invalid_inputs() {
    let seq = vbr(2_000_000, 4_000_000).with_frame_rate(Rational::new(30, 0));
    assert!(matches!(
      session(&seq),
      Err(Error::InvalidParameter(InvalidParameter::FrameRate { .. }))
    ));
    let seq = SequenceParameters::new(64, 64).with_bitrate(0, 0);
    assert!(matches!(
      session(&seq),
      Err(Error::InvalidParameter(InvalidParameter::ZeroBitrate(_)))
    ));
    let pic =
      PictureParameters::new(FrameType::I, 30).with_qp_range(40, 20);
    assert!(RateControlSession::init_or_reset(
      &vbr(1, 1),
      &pic,
      InitMode::Init,
      &config()
    )
    .is_err());
    let seq = vbr(u32::MAX as u64 * 40, u32::MAX as u64 * 40);
    assert!(matches!(
      session(&seq),
      Err(Error::InvalidParameter(InvalidParameter::VbvSize { .. }))
    ));
  }

  #[test]
  fn temporal_ratios() {
    let fr = Rational::new(30, 1);
    let layers = [
      TemporalLayer { bitrate: 1_000_000, frame_rate: fr },
      TemporalLayer { bitrate: 1_500_000, frame_rate: fr },
      TemporalLayer { bitrate: 3_000_000, frame_rate: fr },
    ];
    let ratios = calculate_temporal_ratios(&layers).unwrap();
    assert_eq!(&ratios[..], &[21, 10, 33]);
    let seq = vbr(3_000_000, 3_000_000).with_temporal_layers(&layers);
    assert_eq!(session(&seq).unwrap().temporal_ratios(), &[21, 10, 33]);
    assert!(calculate_temporal_ratios(&[]).is_err());
  }

  #[test]
  fn reset_keeps_history() {
    let cfg = config();
    let pic = PictureParameters::new(FrameType::I, 30);
    let mut rc = RateControlSession::init_or_reset(
      &vbr(2_000_000, 4_000_000),
      &pic,
      InitMode::Init,
      &cfg,
    )
    .unwrap();
    rc.frame_count = 12;
    rc.qp = 34;
    for _ in 0..5 {
      rc.advance_target_fullness();
    }
    let target = rc.target_buf_fullness();
    rc.vbv_level = 100_000.0;
    rc.reset(&vbr(1_000_000, 1_000_000), &pic, &cfg).unwrap();
    assert_eq!(rc.mode(), InitMode::Reset);
    assert_eq!(rc.frame_count(), 12);
    assert_eq!(rc.qp(), 34);
    assert_eq!(rc.max_bitrate(), 1_000_000);
    assert_eq!(rc.target_buf_fullness(), target);
    assert_ne!(rc.target_buf_fullness(), rc.init_buf_fullness_bits());
    assert_eq!(rc.vbv_level(), 100_000.0);
  }

  #[test]
  fn reset_clamps_level_to_smaller_buffer() {
    let cfg = config();
    let pic = PictureParameters::new(FrameType::I, 30);
    let mut rc = session(&vbr(2_000_000, 4_000_000)).unwrap();
    rc.vbv_level = rc.buf_size_bits();
    rc.reset(&vbr(500_000, 500_000), &pic, &cfg).unwrap();
    assert_eq!(rc.vbv_level(), rc.buf_size_bits());
  }

  #[test]
  fn thresholds_shrink_with_ratio() {
    let narrow = deviation_thresholds(BPS_RATIO_MAX);
    let wide = deviation_thresholds(BPS_RATIO_MIN);
    assert!(narrow.pb[0] > wide.pb[0]);
    assert!(narrow.i[7] < wide.i[7]);
    assert!(wide.vbr.windows(2).all(|w| w[0] <= w[1]));
  }

  quickcheck! {
    fn ratios_sum_to_64(increments: Vec<u32>) -> bool {
      let fr = Rational::new(30, 1);
      let mut bitrate = 0u64;
      let layers: Vec<TemporalLayer> = increments
        .iter()
        .take(MAX_TEMPORAL_LAYERS)
        .map(|&inc| {
          bitrate += inc as u64 % 10_000_000 + 1;
          TemporalLayer { bitrate, frame_rate: fr }
        })
        .collect();
      if layers.is_empty() {
        return true;
      }
      let ratios = calculate_temporal_ratios(&layers).unwrap();
      ratios.len() == layers.len()
        && ratios.iter().map(|&r| r as u32).sum::<u32>() == 64
    }

    fn fullness_within_bounds(
      target: u32, vbv: u32, init: u32, fps: u8
    ) -> bool {
      let target = target as u64 % 50_000_000 + 1;
      let seq = vbr(target, target)
        .with_vbv(vbv as u64, init as u64)
        .with_frame_rate(Rational::new(fps as u64 % 120 + 1, 1));
      let rc = session(&seq).unwrap();
      let ibpf = rc.input_bits_per_frame();
      2.0 * ibpf <= rc.init_buf_fullness_bits()
        && rc.init_buf_fullness_bits() <= rc.buf_size_bits()
        && rc.buf_size_bits() <= u32::MAX as f64
    }
  }
}
