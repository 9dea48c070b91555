// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

//! Input command payloads of the command initializer.

use bitstream_io::ByteWrite;

use super::lambda::*;
use super::{FirmwareLayoutProfile, InputCommand, CMD_LIST_MODE};
use crate::error::{lookup, Error};
use crate::params::*;
use crate::util::{clamp, payload_writer, write_zeros};

pub const CMD1_ID: u16 = 1;
pub const CMD2_ID: u16 = 2;
pub const CMD3_ID: u16 = 3;
pub const CMD5_ID: u16 = 5;

/// Size of the packed [`Cmd1`] in bytes.
pub const CMD1_SIZE: usize = 84;
/// Size of the packed [`Cmd3`] in dwords.
pub const CMD3_SIZE_DWORDS: u16 = 0xF;

/// QP where the visual quality ramps start.
const VQI_QP_START: i32 = 22;
/// Intra 32x32 modes left enabled under visual quality tuning.
const VQI_INTRA32_MODE_MASK: u16 = 507;

/// Driver side toggles that shape the generated commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CmdFlags {
  pub stream_in: bool,
  pub pak_only: bool,
  /// Adaptive QP from the application.
  pub acqp: bool,
  pub panic_enabled: bool,
  pub rounding: bool,
  pub region_boost: bool,
  pub vqi: bool,
  /// 16x hierarchical motion estimation, which feeds VP9 stream-in.
  pub me16: bool,
  pub dys_multi_pass: bool,
}

/// Picture level state for the HCP and VDEnc commands generated by the
/// firmware. HEVC and VP9 share the record.
///
/// Fields are packed little endian in declaration order, with two bytes of
/// padding to close the last dword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cmd1 {
  pub frame_width_in_min_cb_minus1: u16,
  pub frame_height_in_min_cb_minus1: u16,
  pub log2_min_cb_size_minus3: u8,
  pub vdenc_stream_in: bool,
  pub pak_only_multipass: bool,
  pub num_ref_idx_l0_active_minus1: u8,
  pub sad_qp_lambda: u16,
  pub rd_qp_lambda: u16,
  pub num_ref_idx_l1_active_minus1: u8,
  pub tiles_enabled: bool,
  pub roi_stream_in: bool,
  pub use_default_qp_deltas: bool,
  pub roi_delta_qp: [i8; 8],
  /// Forward POC distance per reference, L0 then L1 for each reference.
  pub fwd_poc: [[u8; 2]; 4],
  pub rolling_intra: bool,
  pub qp_delta_for_inserted_intra: i8,
  pub intra_insertion_size: u16,
  pub intra_insertion_location: u16,
  pub qp_y: i8,
  pub rounding: bool,
  pub panic_enabled: bool,
  pub temporal_mvp: bool,
  pub src_frame_width: u16,
  pub src_frame_height: u16,
  pub segmentation_enabled: bool,
  pub prev_frame_seg_enabled: bool,
  pub seg_map_stream_in: bool,
  pub luma_ac_qindex: u8,
  pub luma_dc_qindex_delta: i8,
  pub log2_tile_columns: u8,
  pub log2_tile_rows: u8,
  pub dynamic_scaling: bool,
  pub dys_multi_pass: bool,
  pub transform_skip: bool,
  pub segment_qindex_delta: [i16; 8],
  pub intra32x32_mode_mask: u16,
  pub brc_min_qp: u8,
  pub brc_max_qp: u8,
  pub intra_insertion_reference_location: [u16; 3],
}

const DEFAULT_FWD_POC: [[u8; 2]; 4] =
  [[0x01, 0xff], [0x02, 0xfe], [0x03, 0xfd], [0x04, 0xfc]];

impl Cmd1 {
  /// Builds the HEVC record for one pass.
  pub fn hevc(
    seq: &SequenceParameters, pic: &PictureParameters, slice: &SliceParameters,
    flags: CmdFlags, profile: &dyn FirmwareLayoutProfile,
  ) -> Result<Self, Error> {
    let frame_type = pic.frame_type;
    let qp_scale = hevc_qp_scale(frame_type);
    let slice_qp = pic.qp.saturating_add(slice.slice_qp_delta as i32);
    let qp_prime_y_ac =
      clamp(slice_qp, profile.min_lambda_qp(), HEVC_MAX_QP as i32);
    let lambda = sad_lambda_f64(qp_scale, qp_prime_y_ac);
    let vqi = flags.vqi && profile.qp_ramped_penalty();
    let roi_stream_in = pic.roi_enabled;

    let mut sad_qp_lambda = to_fixed_q2(lambda);
    let mut intra32x32_mode_mask = 0;
    if vqi {
      if (VQI_QP_START..=HEVC_MAX_QP as i32).contains(&qp_prime_y_ac)
        && slice.slice_type == SliceType::I
      {
        let scale =
          (1.0 + 0.025 * (qp_prime_y_ac - VQI_QP_START) as f64).min(1.5);
        sad_qp_lambda = to_fixed_q2(scale * lambda);
      }
      if (VQI_QP_START..=HEVC_MAX_QP as i32).contains(&pic.qp) {
        intra32x32_mode_mask = VQI_INTRA32_MODE_MASK;
      }
    }

    let mut fwd_poc = DEFAULT_FWD_POC;
    if !frame_type.is_intra() {
      for (poc, &frame_idx) in fwd_poc.iter_mut().zip(&slice.ref_list0).take(3)
      {
        let ref_poc =
          lookup("reference POC list", &pic.ref_poc, frame_idx as i64)?;
        let diff = ref_poc.wrapping_sub(pic.curr_poc) as i8;
        let dist = diff.wrapping_neg() as u8;
        *poc = [dist, dist];
      }
    }

    let brc_enabled = seq.rc_method.brc_enabled();
    let (min_qp, max_qp) = hevc_brc_qp_clamps(pic);

    Ok(Cmd1 {
      frame_width_in_min_cb_minus1: seq.width_in_min_cb_minus1(),
      frame_height_in_min_cb_minus1: seq.height_in_min_cb_minus1(),
      log2_min_cb_size_minus3: seq.log2_min_cb_size.saturating_sub(3),
      vdenc_stream_in: flags.stream_in,
      pak_only_multipass: flags.pak_only,
      num_ref_idx_l0_active_minus1: slice.num_ref_idx_l0_active_minus1,
      sad_qp_lambda,
      rd_qp_lambda: to_fixed_q2(rd_lambda_f64(qp_scale, pic.qp)),
      num_ref_idx_l1_active_minus1: slice.num_ref_idx_l1_active_minus1,
      tiles_enabled: pic.tiles_enabled,
      roi_stream_in: roi_stream_in || flags.region_boost,
      use_default_qp_deltas: (flags.acqp && seq.qp_adjustment)
        || (brc_enabled && seq.mb_brc != MbBrc::Disabled),
      roi_delta_qp: if roi_stream_in { pic.roi_delta_qp } else { [0; 8] },
      fwd_poc,
      rolling_intra: pic.rolling_intra.enabled,
      qp_delta_for_inserted_intra: pic.rolling_intra.qp_delta,
      intra_insertion_size: pic.rolling_intra.size,
      intra_insertion_location: pic.rolling_intra.location,
      qp_y: slice_qp as i8,
      rounding: flags.rounding,
      panic_enabled: flags.panic_enabled,
      temporal_mvp: slice.temporal_mvp,
      transform_skip: pic.transform_skip,
      intra32x32_mode_mask,
      brc_min_qp: min_qp,
      brc_max_qp: max_qp,
      intra_insertion_reference_location: pic.rolling_intra.reference_location,
      ..Default::default()
    })
  }

  /// Builds the VP9 record for one pass.
  pub fn vp9(
    seq: &SequenceParameters, pic: &PictureParameters, flags: CmdFlags,
  ) -> Result<Self, Error> {
    let vp9 = &pic.vp9;
    let lambda = vp9_lambda(vp9.luma_ac_qindex as i64, pic.frame_type)?;
    let stream_in = vp9.segment_map_provided || flags.me16;
    let num_ref = if pic.frame_type.is_intra() {
      0
    } else {
      vp9.num_ref_frames.saturating_sub(1)
    };
    let src_width = if vp9.src_width == 0 { seq.width } else { vp9.src_width };
    let src_height =
      if vp9.src_height == 0 { seq.height } else { vp9.src_height };

    Ok(Cmd1 {
      vdenc_stream_in: stream_in,
      seg_map_stream_in: stream_in,
      pak_only_multipass: flags.pak_only,
      num_ref_idx_l0_active_minus1: num_ref,
      sad_qp_lambda: to_fixed_q2(lambda),
      rd_qp_lambda: to_fixed_q2(lambda * lambda),
      src_frame_width: src_width as u16,
      src_frame_height: src_height as u16,
      segmentation_enabled: vp9.segmentation_enabled,
      prev_frame_seg_enabled: vp9.prev_frame_segmentation,
      luma_ac_qindex: vp9.luma_ac_qindex,
      luma_dc_qindex_delta: vp9.luma_dc_qindex_delta,
      log2_tile_columns: vp9.log2_tile_columns,
      log2_tile_rows: vp9.log2_tile_rows,
      dynamic_scaling: seq.dynamic_scaling,
      dys_multi_pass: flags.dys_multi_pass,
      segment_qindex_delta: if vp9.segmentation_enabled {
        vp9.segment_qindex_delta
      } else {
        [0; 8]
      },
      ..Default::default()
    })
  }

  pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::with_capacity(CMD1_SIZE);
    {
      let mut w = payload_writer(&mut buf);
      w.write::<u16>(self.frame_width_in_min_cb_minus1)?;
      w.write::<u16>(self.frame_height_in_min_cb_minus1)?;
      w.write::<u8>(self.log2_min_cb_size_minus3)?;
      w.write::<u8>(self.vdenc_stream_in as u8)?;
      w.write::<u8>(self.pak_only_multipass as u8)?;
      w.write::<u8>(self.num_ref_idx_l0_active_minus1)?;
      w.write::<u16>(self.sad_qp_lambda)?;
      w.write::<u16>(self.rd_qp_lambda)?;
      w.write::<u8>(self.num_ref_idx_l1_active_minus1)?;
      w.write::<u8>(self.tiles_enabled as u8)?;
      w.write::<u8>(self.roi_stream_in as u8)?;
      w.write::<u8>(self.use_default_qp_deltas as u8)?;
      for &d in self.roi_delta_qp.iter() {
        w.write::<i8>(d)?;
      }
      for poc in self.fwd_poc.iter() {
        w.write_bytes(poc)?;
      }
      w.write::<u8>(self.rolling_intra as u8)?;
      w.write::<i8>(self.qp_delta_for_inserted_intra)?;
      w.write::<u16>(self.intra_insertion_size)?;
      w.write::<u16>(self.intra_insertion_location)?;
      w.write::<i8>(self.qp_y)?;
      w.write::<u8>(self.rounding as u8)?;
      w.write::<u8>(self.panic_enabled as u8)?;
      w.write::<u8>(self.temporal_mvp as u8)?;
      w.write::<u16>(self.src_frame_width)?;
      w.write::<u16>(self.src_frame_height)?;
      w.write::<u8>(self.segmentation_enabled as u8)?;
      w.write::<u8>(self.prev_frame_seg_enabled as u8)?;
      w.write::<u8>(self.seg_map_stream_in as u8)?;
      w.write::<u8>(self.luma_ac_qindex)?;
      w.write::<i8>(self.luma_dc_qindex_delta)?;
      w.write::<u8>(self.log2_tile_columns)?;
      w.write::<u8>(self.log2_tile_rows)?;
      w.write::<u8>(self.dynamic_scaling as u8)?;
      w.write::<u8>(self.dys_multi_pass as u8)?;
      w.write::<u8>(self.transform_skip as u8)?;
      for &d in self.segment_qindex_delta.iter() {
        w.write::<i16>(d)?;
      }
      w.write::<u16>(self.intra32x32_mode_mask)?;
      w.write::<u8>(self.brc_min_qp)?;
      w.write::<u8>(self.brc_max_qp)?;
      for &loc in self.intra_insertion_reference_location.iter() {
        w.write::<u16>(loc)?;
      }
      write_zeros(&mut w, 2)?;
    }
    debug_assert_eq!(buf.len(), CMD1_SIZE);
    Ok(buf)
  }

  /// Input record, sized in dwords.
  pub fn to_input_command(&self) -> Result<InputCommand, Error> {
    let mut cmd = InputCommand::from_bytes(CMD1_ID, &self.to_bytes()?)?;
    cmd.size_of_data = (CMD1_SIZE / 4) as u16;
    Ok(cmd)
  }
}

/// BRC QP clamps of the firmware: the floor is 10 and unset or out of
/// range ceilings fall back to 51.
fn hevc_brc_qp_clamps(pic: &PictureParameters) -> (u8, u8) {
  let min = pic.min_qp.max(10);
  let max =
    if pic.max_qp < 10 { HEVC_MAX_QP } else { pic.max_qp.min(HEVC_MAX_QP) };
  (min, max)
}

/// SAD lambda and VDEnc tuning flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cmd2 {
  pub sad_qp_lambda: u32,
  pub intra_non_dc_penalty: u8,
  pub roi_stream_in: bool,
}

impl Cmd2 {
  pub fn hevc(
    pic: &PictureParameters, slice: &SliceParameters, flags: CmdFlags,
    profile: &dyn FirmwareLayoutProfile,
  ) -> Self {
    // The firmware model evaluates this lambda at a fixed QP of 10.
    let lambda = sad_lambda_f64(hevc_qp_scale(pic.frame_type), 10);
    let mut penalty = 0u8;
    if flags.vqi && profile.qp_ramped_penalty() {
      let qp = clamp(
        pic.qp.saturating_add(slice.slice_qp_delta as i32),
        profile.min_lambda_qp(),
        HEVC_MAX_QP as i32,
      );
      if (VQI_QP_START..=HEVC_MAX_QP as i32).contains(&qp) {
        penalty = ((0.1 * 63.0) * (qp - VQI_QP_START) as f64) as u8;
        penalty = penalty.min(63);
      }
    }
    Cmd2 {
      sad_qp_lambda: (lambda * 4.0 + 0.5) as u32,
      intra_non_dc_penalty: penalty,
      roi_stream_in: pic.roi_enabled,
    }
  }

  pub fn vp9(pic: &PictureParameters) -> Result<Self, Error> {
    let lambda = vp9_lambda(pic.vp9.luma_ac_qindex as i64, pic.frame_type)?;
    Ok(Cmd2 {
      sad_qp_lambda: (lambda * 4.0 + 0.5) as u32,
      ..Default::default()
    })
  }

  pub fn to_input_command(&self) -> Result<InputCommand, Error> {
    let flags =
      (self.intra_non_dc_penalty as u32) << 8 | self.roi_stream_in as u32;
    InputCommand::new(CMD2_ID, 2, &[self.sad_qp_lambda, flags])
  }
}

/// Buffer copy performed by the firmware through a second level batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cmd3 {
  pub selection_for_ind_data: u8,
  pub cmd_mode: u8,
  pub length_of_table: u16,
  pub src_addr: u64,
  pub dst_addr: u64,
  pub copy_size: u32,
}

impl Cmd3 {
  pub fn new(
    src_addr: u64, dst_addr: u64, copy_size: u32, length_of_table: u16,
    content_protection: bool,
  ) -> Self {
    Cmd3 {
      selection_for_ind_data: if content_protection { 4 } else { 0 },
      cmd_mode: CMD_LIST_MODE,
      length_of_table,
      src_addr,
      dst_addr,
      copy_size,
    }
  }

  pub fn to_input_command(&self) -> Result<InputCommand, Error> {
    let mut data = [0u32; CMD3_SIZE_DWORDS as usize];
    data[0] = self.selection_for_ind_data as u32
      | (self.cmd_mode as u32) << 8
      | (self.length_of_table as u32) << 16;
    data[1] = self.src_addr as u32;
    data[2] = (self.src_addr >> 32) as u32;
    data[3] = self.dst_addr as u32;
    data[4] = (self.dst_addr >> 32) as u32;
    data[5] = self.copy_size;
    InputCommand::new(CMD3_ID, CMD3_SIZE_DWORDS, &data)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::huc::{G10Profile, G11Profile};
  use pretty_assertions::assert_eq;

  fn hevc_inputs() -> (SequenceParameters, PictureParameters, SliceParameters)
  {
    let seq = SequenceParameters::new(1920, 1080);
    let mut pic = PictureParameters::new(FrameType::P, 30).with_poc(8);
    pic.ref_poc[0] = 7;
    pic.ref_poc[1] = 6;
    pic.ref_poc[2] = 4;
    let slice =
      SliceParameters::new(SliceType::P).with_refs([0, 1, 2, 0], 2, 0);
    (seq, pic, slice)
  }

  #[test]
  fn packed_size() {
    let cmd = Cmd1::default();
    assert_eq!(cmd.to_bytes().unwrap().len(), CMD1_SIZE);
    let input = cmd.to_input_command().unwrap();
    assert_eq!(input.size_of_data, 21);
    assert_eq!(input.data.len(), 21);
  }

  #[test]
  fn hevc_forward_poc() {
    let (seq, pic, slice) = hevc_inputs();
    let cmd =
      Cmd1::hevc(&seq, &pic, &slice, CmdFlags::default(), &G11Profile)
        .unwrap();
    assert_eq!(cmd.fwd_poc, [[1, 1], [2, 2], [4, 4], [0x04, 0xfc]]);
    assert_eq!(cmd.frame_width_in_min_cb_minus1, 239);
    assert_eq!(cmd.qp_y, 30);
    assert!(cmd.use_default_qp_deltas);
  }

  #[test]
  fn intra_keeps_default_poc() {
    let (seq, mut pic, slice) = hevc_inputs();
    pic.frame_type = FrameType::I;
    let cmd =
      Cmd1::hevc(&seq, &pic, &slice, CmdFlags::default(), &G11Profile)
        .unwrap();
    assert_eq!(cmd.fwd_poc, DEFAULT_FWD_POC);
  }

  #[test]
  fn extreme_pocs_truncate() {
    let (seq, mut pic, slice) = hevc_inputs();
    pic.curr_poc = i32::MAX;
    pic.ref_poc[0] = i32::MIN;
    pic.ref_poc[1] = 6;
    let cmd =
      Cmd1::hevc(&seq, &pic, &slice, CmdFlags::default(), &G11Profile)
        .unwrap();
    assert_eq!(cmd.fwd_poc[0], [0xff, 0xff]);
    assert_eq!(cmd.fwd_poc[1], [0xf9, 0xf9]);
  }

  #[test]
  fn bad_reference_index() {
    let (seq, pic, _) = hevc_inputs();
    let slice =
      SliceParameters::new(SliceType::P).with_refs([0, 1, 16, 0], 2, 0);
    assert!(matches!(
      Cmd1::hevc(&seq, &pic, &slice, CmdFlags::default(), &G11Profile),
      Err(Error::IndexOutOfRange { index: 16, len: 16, .. })
    ));
  }

  #[test]
  fn vqi_tuning() {
    let (seq, mut pic, _) = hevc_inputs();
    pic.frame_type = FrameType::I;
    pic.qp = 32;
    let slice = SliceParameters::new(SliceType::I);
    let flags = CmdFlags { vqi: true, ..Default::default() };
    let cmd = Cmd1::hevc(&seq, &pic, &slice, flags, &G11Profile).unwrap();
    let lambda = sad_lambda_f64(0.60, 32);
    assert_eq!(cmd.sad_qp_lambda, to_fixed_q2(1.25 * lambda));
    assert_eq!(cmd.intra32x32_mode_mask, 507);
    let cmd2 = Cmd2::hevc(&pic, &slice, flags, &G11Profile);
    assert_eq!(cmd2.intra_non_dc_penalty, 63);
    assert_eq!(cmd2.sad_qp_lambda, 3);
    let cmd2 = Cmd2::hevc(&pic, &slice, flags, &G10Profile);
    assert_eq!(cmd2.intra_non_dc_penalty, 0);
  }

  #[test]
  fn qp_clamps() {
    let pic = PictureParameters::default().with_qp_range(4, 60);
    assert_eq!(hevc_brc_qp_clamps(&pic), (10, 51));
    let pic = PictureParameters::default().with_qp_range(20, 40);
    assert_eq!(hevc_brc_qp_clamps(&pic), (20, 40));
    let pic = PictureParameters::default().with_qp_range(0, 5);
    assert_eq!(hevc_brc_qp_clamps(&pic), (10, 51));
  }

  #[test]
  fn vp9_lambdas() {
    let seq = SequenceParameters::new(640, 480);
    let mut pic = PictureParameters::new(FrameType::P, 100);
    pic.vp9.luma_ac_qindex = 100;
    pic.vp9.num_ref_frames = 3;
    let cmd = Cmd1::vp9(&seq, &pic, CmdFlags::default()).unwrap();
    let step = crate::tables::VP9_AC_QLOOKUP[100] as f64;
    let lambda = 0.33 * step / 8.0;
    assert_eq!(cmd.sad_qp_lambda, to_fixed_q2(lambda));
    assert_eq!(cmd.rd_qp_lambda, to_fixed_q2(lambda * lambda));
    assert_eq!(cmd.num_ref_idx_l0_active_minus1, 2);
    assert_eq!((cmd.src_frame_width, cmd.src_frame_height), (640, 480));
    let cmd2 = Cmd2::vp9(&pic).unwrap();
    assert_eq!(cmd2.sad_qp_lambda, (lambda * 4.0 + 0.5) as u32);
  }

  #[test]
  fn copy_command_layout() {
    let cmd = Cmd3::new(0x1_2345_6780, 0x2_0000_0040, 4096, 3, true);
    let input = cmd.to_input_command().unwrap();
    assert_eq!(input.id, 3);
    assert_eq!(input.size_of_data, 0xF);
    assert_eq!(input.data[0], 4 | 1 << 8 | 3 << 16);
    assert_eq!(&input.data[1..6], &[0x2345_6780, 1, 0x40, 2, 4096]);
  }
}
