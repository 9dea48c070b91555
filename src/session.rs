// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

//! Drives the BRC core for one encode session.
//!
//! An [`EncodeSession`] owns everything a codec needs between frames: the
//! constant tables, the command initializer with its slot ring, the rate
//! control state and the buffers the BRC payloads are packed into. Each
//! call to [`encode_frame`](EncodeSession::encode_frame) runs the passes of
//! one frame until the controller settles on a QP.

use crate::config::SessionConfig;
use crate::error::{Error, InvalidParameter};
use crate::huc::*;
use crate::packers::*;
use crate::params::*;
use crate::provider::*;
use crate::rate::*;
use crate::tables::{build_constant_table, ConstantTableSet};

/// Device buffers the BRC payloads are packed into, allocated once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrcBuffers {
  /// BRC init DMEM or CURBE.
  pub init: BufferHandle,
  /// BRC update DMEM or CURBE of the current pass.
  pub update: BufferHandle,
  /// PAK statistics of the current pass.
  pub stats: BufferHandle,
  /// Second level batch generated by the command initializer.
  pub batch: BufferHandle,
}

/// What the PAK stage is asked to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassInfo {
  pub frame_type: FrameType,
  pub pass: usize,
  pub qp: i32,
  pub panic: bool,
  /// Frame size cap of a panic pass, in bytes.
  pub frame_size_cap: Option<u32>,
  /// Where the PAK statistics of the pass must be written.
  pub stats: BufferHandle,
}

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
  pub frame_type: FrameType,
  pub passes: usize,
  /// QP of the last pass.
  pub qp: i32,
  pub panic: bool,
  /// The decision that ended the frame.
  pub decision: UpdateDecision,
}

/// Optional inputs of one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput<'a> {
  /// HEVC slice parameters, required for HEVC.
  pub slice: Option<&'a SliceParameters>,
  /// Prebuilt PIC_STATE command, patched into the batch on generations
  /// that emit one. Zeros are used when absent.
  pub pic_state: Option<&'a [u8]>,
}

pub struct EncodeSession {
  config: SessionConfig,
  tables: ConstantTableSet,
  initializer: Option<CommandInitializer>,
  rc: Option<RateControlSession>,
  sequence: Option<SequenceParameters>,
  buffers: BrcBuffers,
  fences: Vec<Option<CompletedFence>>,
  copy_fences: Vec<Option<CompletedFence>>,
  cmds: CommandBuffer,
  ring: usize,
  frame_id: u32,
}

const fn payload_sizes(codec: CodecKind) -> (usize, usize) {
  match codec {
    CodecKind::HEVC => (HevcBrcInitDmem::SIZE, HevcBrcUpdateDmem::SIZE),
    CodecKind::VP9 => (Vp9BrcInitDmem::SIZE, Vp9BrcUpdateDmem::SIZE),
    CodecKind::VP8 => (Vp8BrcInitCurbe::SIZE, Vp8BrcUpdateCurbe::SIZE),
  }
}

impl EncodeSession {
  /// Builds the constant tables and allocates every buffer of the session.
  ///
  /// VP8 runs its BRC as kernels and has no command initializer.
  ///
  /// # Errors
  ///
  /// Returns `InvalidParameter` for a bad configuration and
  /// `ResourceError` when an allocation fails.
  pub fn new<P: ResourceProvider + ?Sized>(
    config: SessionConfig, provider: &mut P, dynamic_scaling: bool,
  ) -> Result<Self, Error> {
    config.validate()?;
    let tables = build_constant_table(config.codec, provider)?;
    let initializer = match config.codec {
      CodecKind::VP8 => None,
      _ => Some(CommandInitializer::new(config, provider, dynamic_scaling)?),
    };
    let (init_size, update_size) = payload_sizes(config.codec);
    let buffers = BrcBuffers {
      init: provider.allocate_buffer(init_size, "BRC Init Buffer")?,
      update: provider.allocate_buffer(update_size, "BRC Update Buffer")?,
      stats: provider.allocate_buffer(PASS_STATS_SIZE, "PAK Statistics")?,
      batch: provider.allocate_buffer(PAGE_SIZE, "VDEnc Picture State SLB")?,
    };
    let slots = config.ring_size * config.max_passes();
    info!(
      "{:?} session on {:?}: {} passes, ring of {}",
      config.codec,
      config.generation,
      config.max_passes(),
      config.ring_size
    );
    Ok(EncodeSession {
      config,
      tables,
      initializer,
      rc: None,
      sequence: None,
      buffers,
      fences: vec![None; slots],
      copy_fences: vec![None; slots],
      cmds: CommandBuffer::new(),
      ring: 0,
      frame_id: 0,
    })
  }

  pub fn config(&self) -> &SessionConfig {
    &self.config
  }

  pub fn tables(&self) -> &ConstantTableSet {
    &self.tables
  }

  pub fn buffers(&self) -> BrcBuffers {
    self.buffers
  }

  pub fn initializer(&self) -> Option<&CommandInitializer> {
    self.initializer.as_ref()
  }

  /// Rate control state, present once the first frame started.
  pub fn rate_control(&self) -> Option<&RateControlSession> {
    self.rc.as_ref()
  }

  /// Frames started so far.
  pub fn frame_id(&self) -> u32 {
    self.frame_id
  }

  /// Ring slot the next frame uses.
  pub fn ring(&self) -> usize {
    self.ring
  }

  /// Initializes the controller on the first frame and resets it when the
  /// sequence parameters change. Returns the mode when either happened.
  fn prepare(
    &mut self, seq: &SequenceParameters, pic: &PictureParameters,
  ) -> Result<Option<InitMode>, Error> {
    match self.rc.as_mut() {
      None => {
        let rc = RateControlSession::init_or_reset(
          seq,
          pic,
          InitMode::Init,
          &self.config,
        )?;
        info!(
          "BRC init: {:?} at {} bps, {:.0} bits per frame",
          rc.rc_method(),
          seq.target_bitrate,
          rc.input_bits_per_frame()
        );
        self.rc = Some(rc);
      }
      Some(rc) if self.sequence.as_ref() != Some(seq) => {
        rc.reset(seq, pic, &self.config)?;
        info!(
          "BRC reset: {:?} at {} bps after frame {}",
          rc.rc_method(),
          seq.target_bitrate,
          rc.frame_count()
        );
      }
      Some(_) => return Ok(None),
    }
    self.sequence = Some(seq.clone());
    Ok(self.rc.as_ref().map(RateControlSession::mode))
  }

  fn write_init_payload<P: ResourceProvider + ?Sized>(
    &self, provider: &mut P, rc: &RateControlSession, seq: &SequenceParameters,
    pic: &PictureParameters, input: FrameInput<'_>,
  ) -> Result<(), Error> {
    let handle = self.buffers.init;
    match self.config.codec {
      CodecKind::HEVC => {
        let slice = input.slice.ok_or(Error::NullParameter("slice"))?;
        HevcBrcInitDmem::new(rc, seq, pic, slice)?
          .write_to_buffer(provider, handle)
      }
      CodecKind::VP9 => {
        Vp9BrcInitDmem::new(rc, seq)?.write_to_buffer(provider, handle)
      }
      CodecKind::VP8 => {
        Vp8BrcInitCurbe::new(rc, seq, pic)?.write_to_buffer(provider, handle)
      }
    }
  }

  #[allow(clippy::too_many_arguments)]
  fn write_update_payload<P: ResourceProvider + ?Sized>(
    &self, provider: &mut P, rc: &RateControlSession, seq: &SequenceParameters,
    pic: &PictureParameters, input: FrameInput<'_>, fullness: (u32, bool),
    layout: SlbLayout,
  ) -> Result<(), Error> {
    let handle = self.buffers.update;
    match self.config.codec {
      CodecKind::HEVC => {
        let slice = input.slice.ok_or(Error::NullParameter("slice"))?;
        HevcBrcUpdateDmem::new(rc, seq, pic, slice, self.frame_id, layout)
          .write_to_buffer(provider, handle)
      }
      CodecKind::VP9 => {
        let fullness = (rc.current_pass() == 0).then_some(fullness);
        Vp9BrcUpdateDmem::new(rc, seq, pic, fullness, layout)
          .write_to_buffer(provider, handle)
      }
      CodecKind::VP8 => Vp8BrcUpdateCurbe::new(rc, seq, pic, fullness)?
        .write_to_buffer(provider, handle),
    }
  }

  fn slot(&self, pass: usize) -> usize {
    self.ring * self.config.max_passes() + pass
  }

  /// Builds the firmware commands of one pass and submits them.
  ///
  /// A pass that fails before submission leaves the initializer idle and
  /// its slot free.
  fn dispatch_initializer<P: ResourceProvider + ?Sized>(
    &mut self, provider: &mut P, seq: &SequenceParameters,
    pic: &PictureParameters, input: FrameInput<'_>, pass: usize,
    brc_enabled: bool,
  ) -> Result<Option<GpuFence>, Error> {
    let slot = self.slot(pass);
    let completed = self.fences[slot];
    let flags = CmdFlags {
      pak_only: pass > 0,
      panic_enabled: self.config.panic_enabled,
      vqi: self.config.vqi_enabled,
      ..Default::default()
    };
    let Some(init) = self.initializer.as_mut() else {
      return Ok(None);
    };

    let pic_state_len = match self.config.codec {
      CodecKind::HEVC => {
        let profile = init.profile();
        profile
          .cmd5_offset(brc_enabled)
          .map(|start| (profile.cmd2_offset(brc_enabled) - start) as usize)
      }
      _ => None,
    };
    let zeros = vec![0; pic_state_len.unwrap_or(0)];
    let pic_state = pic_state_len.map(|_| input.pic_state.unwrap_or(&zeros));
    if let Some(bytes) = pic_state {
      if bytes.len() > MAX_PAYLOAD_DWORDS * 4 {
        return Err(
          InvalidParameter::PayloadSize {
            actual: bytes.len(),
            max: MAX_PAYLOAD_DWORDS * 4,
          }
          .into(),
        );
      }
    }

    let data = ConstDataInput {
      sequence: Some(seq),
      picture: Some(pic),
      slice: input.slice,
    };
    init.set_const_data(provider, data, flags, self.ring, pass, completed)?;
    self.fences[slot] = None;

    self.cmds.clear();
    let built = build_pass(
      init,
      provider,
      &mut self.cmds,
      self.buffers.batch,
      pic_state,
      brc_enabled,
    );
    let fence = match built {
      Ok(fence) => fence,
      Err(e) => {
        init.abort();
        return Err(e);
      }
    };
    if let Err(e) =
      provider.submit_command_buffer(&self.cmds, SubmitFlags::default())
    {
      init.release(fence)?;
      return Err(e);
    }
    Ok(Some(fence))
  }

  /// Runs every pass of one frame.
  ///
  /// `pak` stands in for the PAK stage: it encodes the pass described by
  /// [`PassInfo`] and writes the statistics record into `stats`. The
  /// controller then decides whether the frame needs another pass.
  ///
  /// # Errors
  ///
  /// Parameter errors leave the session usable. `GpuHangOrTimeout` and
  /// resource errors other than a failed statistics read back are fatal.
  pub fn encode_frame<P, F>(
    &mut self, provider: &mut P, seq: &SequenceParameters,
    pic: &PictureParameters, input: FrameInput<'_>, mut pak: F,
  ) -> Result<FrameReport, Error>
  where
    P: ResourceProvider + ?Sized,
    F: FnMut(&mut P, &PassInfo) -> Result<(), Error>,
  {
    if self.config.codec == CodecKind::HEVC && input.slice.is_none() {
      return Err(Error::NullParameter("slice"));
    }
    let mode = self.prepare(seq, pic)?;
    let Some(mut rc) = self.rc.take() else {
      return Err(Error::NullParameter("rate control"));
    };
    let res =
      self.run_passes(provider, &mut rc, seq, pic, input, mode, &mut pak);
    self.rc = Some(rc);
    if res.is_ok() {
      self.ring = (self.ring + 1) % self.config.ring_size;
    }
    res
  }

  #[allow(clippy::too_many_arguments)]
  fn run_passes<P, F>(
    &mut self, provider: &mut P, rc: &mut RateControlSession,
    seq: &SequenceParameters, pic: &PictureParameters, input: FrameInput<'_>,
    mode: Option<InitMode>, pak: &mut F,
  ) -> Result<FrameReport, Error>
  where
    P: ResourceProvider + ?Sized,
    F: FnMut(&mut P, &PassInfo) -> Result<(), Error>,
  {
    let brc_enabled = rc.rc_method().brc_enabled();
    if brc_enabled && mode.is_some() {
      self.write_init_payload(provider, rc, seq, pic, input)?;
    }

    self.frame_id += 1;
    rc.begin_frame(pic.frame_type);
    let fullness = rc.advance_target_fullness();
    let profile = layout_profile(self.config.generation);
    let layout = match self.config.codec {
      CodecKind::VP9 => SlbLayout::vp9(),
      _ => SlbLayout::hevc(profile, brc_enabled),
    };

    let mut info = PassInfo {
      frame_type: pic.frame_type,
      pass: 0,
      qp: if brc_enabled { rc.qp() } else { pic.qp },
      panic: false,
      frame_size_cap: None,
      stats: self.buffers.stats,
    };
    loop {
      info.pass = rc.current_pass();
      let mut pass_pic = pic.clone();
      pass_pic.qp = info.qp;
      match self.config.codec {
        CodecKind::VP9 => pass_pic.vp9.luma_ac_qindex = info.qp as u8,
        CodecKind::VP8 if !pic.vp8.segmentation_enabled => {
          pass_pic.vp8.qindex = [info.qp as u8; 4]
        }
        _ => {}
      }

      if brc_enabled {
        self.write_update_payload(
          provider, rc, seq, &pass_pic, input, fullness, layout,
        )?;
      }
      let fence = self.dispatch_initializer(
        provider,
        seq,
        &pass_pic,
        input,
        info.pass,
        brc_enabled,
      )?;

      // the submitted work is retired even when the PAK stage fails
      let encoded = pak(provider, &info);
      match fence {
        Some(fence) => {
          let slot = self.slot(fence.pass());
          self.fences[slot] = Some(fence.wait(provider)?);
        }
        None => provider.wait_idle()?,
      }
      encoded?;

      let decision = if brc_enabled {
        rc.update_from_readback(read_pass_stats(provider, info.stats))?
      } else {
        UpdateDecision { next_qp: info.qp, ..Default::default() }
      };
      if !decision.continue_pass {
        debug!(
          "frame {} done after {} passes at qp {}",
          self.frame_id,
          info.pass + 1,
          info.qp
        );
        return Ok(FrameReport {
          frame_type: pic.frame_type,
          passes: info.pass + 1,
          qp: info.qp,
          panic: info.panic,
          decision,
        });
      }
      info.qp = decision.next_qp;
      info.panic = decision.panic;
      info.frame_size_cap = decision.frame_size_cap;
    }
  }

  /// Copies a buffer through the firmware copy command and waits for it.
  ///
  /// # Errors
  ///
  /// Returns `Codec` for VP8, which has no command initializer.
  pub fn copy<P: ResourceProvider + ?Sized>(
    &mut self, provider: &mut P, params: CopyParams,
  ) -> Result<(), Error> {
    let codec = self.config.codec;
    let slot = self.slot(0);
    let Some(init) = self.initializer.as_mut() else {
      return Err(InvalidParameter::Codec(codec).into());
    };
    self.cmds.clear();
    let completed = self.copy_fences[slot];
    let fence = init.add_copy_cmds(
      provider,
      &mut self.cmds,
      params,
      self.ring,
      0,
      completed,
    )?;
    self.copy_fences[slot] = None;
    if let Err(e) =
      provider.submit_command_buffer(&self.cmds, SubmitFlags::default())
    {
      init.release(fence)?;
      return Err(e);
    }
    self.copy_fences[slot] = Some(fence.wait(provider)?);
    Ok(())
  }
}

/// Appends the PIC_STATE record when the generation has one, then the
/// DMEM, then the firmware invocation.
fn build_pass<P: ResourceProvider + ?Sized>(
  init: &mut CommandInitializer, provider: &mut P, cmds: &mut CommandBuffer,
  batch: BufferHandle, pic_state: Option<&[u8]>, brc_enabled: bool,
) -> Result<GpuFence, Error> {
  if let Some(bytes) = pic_state {
    init.add_cmd_const_data(provider, CMD5_ID, bytes)?;
  }
  init.set_dmem(provider, brc_enabled)?;
  init.execute(cmds, batch)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::config::Generation;
  use pretty_assertions::assert_eq;

  fn stats(bytes: u32) -> [u8; PASS_STATS_SIZE] {
    PassStats { frame_size_bytes: bytes, ..Default::default() }.to_bytes()
  }

  /// A PAK stage that produces `fraction` of the frame budget per pass.
  fn pak_at(
    budget_bits: f64, fraction: f64,
  ) -> impl FnMut(&mut RecordingProvider, &PassInfo) -> Result<(), Error> {
    move |p, info| {
      let bytes = (budget_bits * fraction / 8.0) as u32;
      write_buffer(p, info.stats, &stats(bytes))
    }
  }

  fn hevc_seq() -> SequenceParameters {
    SequenceParameters::new(1920, 1080)
      .with_bitrate(4_000_000, 4_000_000)
      .with_vbv(8_000_000, 0)
  }

  fn session(
    p: &mut RecordingProvider, generation: Generation, codec: CodecKind,
    passes: usize,
  ) -> EncodeSession {
    let cfg = SessionConfig::new(generation, codec).with_passes(passes);
    EncodeSession::new(cfg, p, false).unwrap()
  }

  #[test]
  fn first_frame_initializes() {
    let mut p = RecordingProvider::new();
    let mut s = session(&mut p, Generation::G11, CodecKind::HEVC, 1);
    assert!(s.rate_control().is_none());
    let seq = hevc_seq();
    let pic = PictureParameters::new(FrameType::I, 30);
    let slice = SliceParameters::new(SliceType::I);
    let input = FrameInput { slice: Some(&slice), pic_state: None };
    let report = s
      .encode_frame(&mut p, &seq, &pic, input, pak_at(133_333.0, 1.0))
      .unwrap();
    assert_eq!(report.passes, 1);
    assert_eq!(s.frame_id(), 1);
    assert_eq!(s.ring(), 1);
    let rc = s.rate_control().unwrap();
    assert_eq!(rc.mode(), InitMode::Init);
    assert_eq!(rc.frame_count(), 1);
    assert_eq!(p.submissions().len(), 1);
    assert_eq!(p.waits(), 1);
    let init = p.contents(s.buffers().init).unwrap();
    assert_eq!(init.len(), HevcBrcInitDmem::SIZE);
    assert!(init.iter().any(|&b| b != 0));
  }

  #[test]
  fn sequence_change_resets() {
    let mut p = RecordingProvider::new();
    let mut s = session(&mut p, Generation::G11, CodecKind::HEVC, 1);
    let seq = hevc_seq();
    let pic = PictureParameters::new(FrameType::P, 30);
    let slice = SliceParameters::new(SliceType::P);
    let input = FrameInput { slice: Some(&slice), pic_state: None };
    for _ in 0..2 {
      s.encode_frame(&mut p, &seq, &pic, input, pak_at(133_333.0, 1.0))
        .unwrap();
    }
    assert_eq!(s.rate_control().unwrap().mode(), InitMode::Init);
    let seq = seq.with_bitrate(2_000_000, 2_000_000);
    s.encode_frame(&mut p, &seq, &pic, input, pak_at(66_666.0, 1.0)).unwrap();
    let rc = s.rate_control().unwrap();
    assert_eq!(rc.mode(), InitMode::Reset);
    assert_eq!(rc.frame_count(), 3);
  }

  #[test]
  fn reset_keeps_target_fullness() {
    let mut p = RecordingProvider::new();
    let mut s = session(&mut p, Generation::G11, CodecKind::HEVC, 1);
    let seq = hevc_seq();
    let pic = PictureParameters::new(FrameType::P, 30);
    let slice = SliceParameters::new(SliceType::P);
    let input = FrameInput { slice: Some(&slice), pic_state: None };
    for _ in 0..2 {
      s.encode_frame(&mut p, &seq, &pic, input, pak_at(133_333.0, 1.0))
        .unwrap();
    }
    let rc = s.rate_control().unwrap();
    let mut before = rc.target_buf_fullness();
    assert_ne!(before, rc.init_buf_fullness_bits());
    if before > rc.buf_size_bits() {
      before -= rc.buf_size_bits();
    }

    let seq = seq.with_bitrate(2_000_000, 2_000_000);
    s.encode_frame(&mut p, &seq, &pic, input, pak_at(66_666.0, 1.0)).unwrap();
    let rc = s.rate_control().unwrap();
    assert_eq!(rc.mode(), InitMode::Reset);
    assert_eq!(rc.target_buf_fullness(), before + rc.input_bits_per_frame());
  }

  fn hevc_frame(
    s: &mut EncodeSession, p: &mut RecordingProvider,
    pic_state: Option<&[u8]>,
  ) -> Result<FrameReport, Error> {
    let pic = PictureParameters::new(FrameType::P, 30);
    let slice = SliceParameters::new(SliceType::P);
    let input = FrameInput { slice: Some(&slice), pic_state };
    s.encode_frame(p, &hevc_seq(), &pic, input, pak_at(133_333.0, 1.0))
  }

  #[test]
  fn oversized_pic_state_rejected() {
    let mut p = RecordingProvider::new();
    let cfg = SessionConfig::new(Generation::G11, CodecKind::HEVC)
      .with_ring_size(1)
      .with_passes(1);
    let mut s = EncodeSession::new(cfg, &mut p, false).unwrap();
    let res = hevc_frame(&mut s, &mut p, Some(&[0; 200]));
    assert!(matches!(
      res,
      Err(Error::InvalidParameter(InvalidParameter::PayloadSize {
        actual: 200,
        max: 160
      }))
    ));
    assert!(p.submissions().is_empty());
    assert_eq!(
      s.initializer().unwrap().slot_state(0, 0),
      InitializerState::Idle
    );
    hevc_frame(&mut s, &mut p, None).unwrap();
    assert_eq!(p.submissions().len(), 1);
  }

  #[test]
  fn failed_build_leaves_slot_usable() {
    let mut p = RecordingProvider::new();
    let cfg = SessionConfig::new(Generation::G11, CodecKind::HEVC)
      .with_ring_size(1)
      .with_passes(1);
    let mut s = EncodeSession::new(cfg, &mut p, false).unwrap();
    let dmem = s
      .initializer()
      .unwrap()
      .pool()
      .buffers(SlotKind::Initializer, 0, 0)
      .unwrap()
      .dmem;
    p.fail_lock(Some(dmem));
    assert!(matches!(
      hevc_frame(&mut s, &mut p, None),
      Err(Error::ResourceError { op: "lock", .. })
    ));
    assert_eq!(
      s.initializer().unwrap().slot_state(0, 0),
      InitializerState::Idle
    );
    p.fail_lock(None);
    hevc_frame(&mut s, &mut p, None).unwrap();
    hevc_frame(&mut s, &mut p, None).unwrap();
    assert_eq!(p.submissions().len(), 2);
  }

  #[test]
  fn failed_pak_retires_pass() {
    let mut p = RecordingProvider::new();
    let cfg = SessionConfig::new(Generation::G11, CodecKind::HEVC)
      .with_ring_size(1)
      .with_passes(1);
    let mut s = EncodeSession::new(cfg, &mut p, false).unwrap();
    let pic = PictureParameters::new(FrameType::P, 30);
    let slice = SliceParameters::new(SliceType::P);
    let input = FrameInput { slice: Some(&slice), pic_state: None };
    let res = s.encode_frame(&mut p, &hevc_seq(), &pic, input, |_, _| {
      Err(Error::NullParameter("pak"))
    });
    assert!(matches!(res, Err(Error::NullParameter("pak"))));
    assert_eq!(p.waits(), 1);
    hevc_frame(&mut s, &mut p, None).unwrap();
    assert_eq!(p.submissions().len(), 2);
  }

  #[test]
  fn failed_submit_frees_slot() {
    let mut p = RecordingProvider::new();
    let cfg = SessionConfig::new(Generation::G11, CodecKind::HEVC)
      .with_ring_size(1)
      .with_passes(1);
    let mut s = EncodeSession::new(cfg, &mut p, false).unwrap();
    p.fail_next_submit();
    assert!(matches!(
      hevc_frame(&mut s, &mut p, None),
      Err(Error::ResourceError { op: "submit", code: STATUS_SUBMIT_FAILED })
    ));
    assert!(p.submissions().is_empty());
    assert!(!s.initializer().unwrap().pool().is_in_flight(
      SlotKind::Initializer,
      0,
      0
    ));
    hevc_frame(&mut s, &mut p, None).unwrap();
    assert_eq!(p.submissions().len(), 1);

    let src = p.allocate_buffer(64, "src").unwrap();
    let dst = p.allocate_buffer(64, "dst").unwrap();
    let params = CopyParams {
      src,
      dst,
      size: 64,
      length_of_table: 1,
      frame_type: FrameType::I,
    };
    p.fail_next_submit();
    assert!(s.copy(&mut p, params).is_err());
    s.copy(&mut p, params).unwrap();
  }

  #[test]
  fn overshoot_runs_extra_passes() {
    let mut p = RecordingProvider::new();
    let mut s = session(&mut p, Generation::G11, CodecKind::HEVC, 2);
    let seq = hevc_seq();
    let pic = PictureParameters::new(FrameType::P, 30);
    let slice = SliceParameters::new(SliceType::P);
    let input = FrameInput { slice: Some(&slice), pic_state: None };
    let mut qps = Vec::new();
    let report = s
      .encode_frame(&mut p, &seq, &pic, input, |p, info| {
        qps.push(info.qp);
        write_buffer(p, info.stats, &stats(8_000_000 / 8))
      })
      .unwrap();
    assert!(report.passes > 1);
    assert_eq!(qps.len(), report.passes);
    assert!(qps[1] > qps[0]);
    assert_eq!(p.submissions().len(), report.passes);
  }

  #[test]
  fn ring_recycles_slots() {
    let mut p = RecordingProvider::new();
    let cfg = SessionConfig::new(Generation::G11, CodecKind::HEVC)
      .with_ring_size(2)
      .with_passes(1);
    let mut s = EncodeSession::new(cfg, &mut p, false).unwrap();
    let seq = hevc_seq();
    let pic = PictureParameters::new(FrameType::P, 30);
    let slice = SliceParameters::new(SliceType::P);
    let input = FrameInput { slice: Some(&slice), pic_state: None };
    for _ in 0..5 {
      s.encode_frame(&mut p, &seq, &pic, input, pak_at(133_333.0, 1.0))
        .unwrap();
    }
    assert_eq!(s.frame_id(), 5);
    assert_eq!(s.ring(), 1);
    assert_eq!(
      s.initializer().unwrap().slot_state(0, 0),
      InitializerState::Dispatched
    );
  }

  #[test]
  fn hevc_needs_slice() {
    let mut p = RecordingProvider::new();
    let mut s = session(&mut p, Generation::G10, CodecKind::HEVC, 1);
    let pic = PictureParameters::new(FrameType::I, 30);
    let res = s.encode_frame(
      &mut p,
      &hevc_seq(),
      &pic,
      FrameInput::default(),
      pak_at(1.0, 1.0),
    );
    assert!(matches!(res, Err(Error::NullParameter("slice"))));
    assert!(s.rate_control().is_none());
  }

  #[test]
  fn lost_statistics_reuse_qp() {
    let mut p = RecordingProvider::new();
    let mut s = session(&mut p, Generation::G11, CodecKind::HEVC, 2);
    let stats_buf = s.buffers().stats;
    let seq = hevc_seq();
    let pic = PictureParameters::new(FrameType::P, 30);
    let slice = SliceParameters::new(SliceType::P);
    let input = FrameInput { slice: Some(&slice), pic_state: None };
    let report = s
      .encode_frame(&mut p, &seq, &pic, input, |p, _| {
        p.fail_lock(Some(stats_buf));
        Ok(())
      })
      .unwrap();
    assert!(report.decision.skipped);
    assert_eq!(report.qp, 30);
  }

  #[test]
  fn hang_is_fatal() {
    let mut p = RecordingProvider::new();
    let mut s = session(&mut p, Generation::G11, CodecKind::VP9, 1);
    let seq = SequenceParameters::new(1280, 720)
      .with_bitrate(2_000_000, 2_000_000);
    let pic = PictureParameters::new(FrameType::I, 60);
    let res = s.encode_frame(
      &mut p,
      &seq,
      &pic,
      FrameInput::default(),
      |p, _| {
        p.inject_hang();
        Ok(())
      },
    );
    let err = res.unwrap_err();
    assert!(matches!(err, Error::GpuHangOrTimeout));
    assert!(err.is_fatal());
  }

  fn run_vp_codec(codec: CodecKind) {
    let mut p = RecordingProvider::new();
    let mut s = session(&mut p, Generation::G11, codec, 1);
    assert_eq!(s.initializer().is_some(), codec == CodecKind::VP9);
    let seq = SequenceParameters::new(1280, 720)
      .with_bitrate(2_000_000, 2_000_000);
    let pic = PictureParameters::new(FrameType::I, 60);
    let report = s
      .encode_frame(
        &mut p,
        &seq,
        &pic,
        FrameInput::default(),
        pak_at(66_666.0, 1.0),
      )
      .unwrap();
    assert_eq!(report.passes, 1);
    let (init, update) = payload_sizes(codec);
    assert_eq!(p.contents(s.buffers().init).unwrap().len(), init);
    assert_eq!(p.contents(s.buffers().update).unwrap().len(), update);
    assert_eq!(p.waits(), 1);
  }

  #[test]
  fn vp9_runs() {
    run_vp_codec(CodecKind::VP9);
  }

  #[test]
  fn vp8_runs() {
    run_vp_codec(CodecKind::VP8);
  }

  #[test]
  fn cqp_keeps_frame_qp() {
    let mut p = RecordingProvider::new();
    let mut s = session(&mut p, Generation::G11, CodecKind::HEVC, 2);
    let seq = hevc_seq().with_rc_method(RateControlMethod::CQP);
    let pic = PictureParameters::new(FrameType::P, 24);
    let slice = SliceParameters::new(SliceType::P);
    let input = FrameInput { slice: Some(&slice), pic_state: None };
    let report = s
      .encode_frame(&mut p, &seq, &pic, input, pak_at(133_333.0, 4.0))
      .unwrap();
    assert_eq!(report.passes, 1);
    assert_eq!(report.qp, 24);
    assert!(p.contents(s.buffers().init).unwrap().iter().all(|&b| b == 0));
  }

  #[test]
  fn copy_command() {
    let mut p = RecordingProvider::new();
    let mut s = session(&mut p, Generation::G11, CodecKind::HEVC, 1);
    let src = p.allocate_buffer(64, "src").unwrap();
    let dst = p.allocate_buffer(64, "dst").unwrap();
    let params = CopyParams {
      src,
      dst,
      size: 64,
      length_of_table: 1,
      frame_type: FrameType::I,
    };
    s.copy(&mut p, params).unwrap();
    s.copy(&mut p, params).unwrap();
    let last = p.submissions().last().unwrap();
    assert_eq!(last.as_slice().last(), Some(&HucCommand::MfxWait));
    assert_eq!(p.waits(), 2);

    let mut p = RecordingProvider::new();
    let mut s = session(&mut p, Generation::G11, CodecKind::VP8, 1);
    assert!(matches!(
      s.copy(&mut p, params),
      Err(Error::InvalidParameter(InvalidParameter::Codec(CodecKind::VP8)))
    ));
  }
}
